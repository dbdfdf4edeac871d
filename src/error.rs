//! Error types for the decawave-ble-survey crate.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Bluetooth-related error from the underlying BLE library.
    #[error("Bluetooth error: {0}")]
    Bluetooth(#[from] btleplug::Error),

    /// Bluetooth is not available or is disabled on this system.
    #[error("Bluetooth not available or disabled")]
    BluetoothUnavailable,

    /// No adapter exists at the requested index.
    #[error("Bluetooth adapter {index} not found ({available} available)")]
    AdapterNotFound {
        /// The requested adapter index.
        index: usize,
        /// Number of adapters reported by the platform.
        available: usize,
    },

    /// The discovery pass could not be completed.
    #[error("Scan failed: {reason}")]
    ScanFailed {
        /// Description of why the scan failed.
        reason: String,
    },

    /// The address was not seen during the last scan.
    #[error("Device not found: {address}")]
    DeviceNotFound {
        /// The address that was looked up.
        address: String,
    },

    /// Failed to establish a connection to the device.
    #[error("Connection to {address} failed: {reason}")]
    ConnectionFailed {
        /// The address of the device.
        address: String,
        /// Description of why the connection failed.
        reason: String,
    },

    /// Operation requires a connection but the device is not connected.
    #[error("Device not connected")]
    NotConnected,

    /// A GATT request was rejected or timed out.
    #[error("GATT operation failed: {reason}")]
    GattFailed {
        /// Description of the failure.
        reason: String,
    },

    /// Service not found on the device.
    #[error("Service not found: {uuid}")]
    ServiceNotFound {
        /// The UUID of the service that was not found.
        uuid: String,
    },

    /// Characteristic data could not be decoded.
    #[error("Invalid data: {context}")]
    InvalidData {
        /// Description of what was invalid about the data.
        context: String,
    },

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {name} = {value}")]
    InvalidParameter {
        /// The name of the parameter.
        name: String,
        /// The invalid value that was provided.
        value: String,
    },

    /// The report could not be persisted.
    #[error("Failed to write report to {}: {source}", .path.display())]
    ReportWrite {
        /// Destination of the report.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Step of device enumeration at which a terminal failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnumerationStage {
    /// Opening the connection.
    Connect,
}

impl std::fmt::Display for EnumerationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connect => write!(f, "Connect"),
        }
    }
}

/// A device that produced no report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{stage} failed for {address}: {cause}")]
pub struct EnumerationFailure {
    /// Address of the device.
    pub address: String,
    /// Step that failed.
    pub stage: EnumerationStage,
    /// Rendered cause.
    pub cause: String,
}

impl EnumerationFailure {
    /// Create a new failure from any displayable cause.
    pub fn new(
        address: impl Into<String>,
        stage: EnumerationStage,
        cause: impl std::fmt::Display,
    ) -> Self {
        Self {
            address: address.into(),
            stage,
            cause: cause.to_string(),
        }
    }
}
