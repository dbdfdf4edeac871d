//! Device and scan report data structures.
//!
//! These are the terminal output of a survey: one [`DeviceReport`] per
//! device that accepted a connection, collected into a [`ScanReport`].

use chrono::{DateTime, Utc};

use crate::ble::advertising::{AddressType, AdvertisementRecord};
use crate::data::candidate::ScanCandidate;
use crate::data::gatt::ServiceDescriptor;

/// Everything learned about one device: scan metadata plus GATT topology.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceReport {
    /// The scan observation this report was built from.
    pub candidate: ScanCandidate,
    /// Services in discovery order, from a single connection.
    pub services: Vec<ServiceDescriptor>,
    /// Why the service list could not be read, if it could not.
    pub discovery_failure: Option<String>,
}

impl DeviceReport {
    /// Create a new device report.
    pub fn new(candidate: ScanCandidate, services: Vec<ServiceDescriptor>) -> Self {
        Self {
            candidate,
            services,
            discovery_failure: None,
        }
    }

    /// Create a report for a device that connected but whose service list
    /// could not be read.
    pub fn discovery_failed(candidate: ScanCandidate, cause: impl Into<String>) -> Self {
        Self {
            candidate,
            services: Vec::new(),
            discovery_failure: Some(cause.into()),
        }
    }

    /// Check if service discovery succeeded.
    pub fn is_complete(&self) -> bool {
        self.discovery_failure.is_none()
    }

    /// Link-layer address.
    pub fn address(&self) -> &str {
        &self.candidate.address
    }

    /// Address type.
    pub fn address_type(&self) -> AddressType {
        self.candidate.address_type
    }

    /// Advertised short name.
    pub fn device_name(&self) -> Option<&str> {
        self.candidate.device_name()
    }

    /// Advertising fields captured at scan time.
    pub fn advertisement(&self) -> &AdvertisementRecord {
        &self.candidate.advertisement
    }

    /// Number of services whose characteristics could not be listed.
    pub fn failed_service_count(&self) -> usize {
        self.services.iter().filter(|s| !s.is_complete()).count()
    }

    /// Total characteristics across all services.
    pub fn characteristic_count(&self) -> usize {
        self.services.iter().map(|s| s.characteristics.len()).sum()
    }
}

/// Ordered device reports from one survey run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanReport {
    /// When the report was assembled.
    pub generated_at: DateTime<Utc>,
    /// One entry per device that accepted a connection, in candidate order.
    pub devices: Vec<DeviceReport>,
}

impl ScanReport {
    /// Create a report stamped with the current time.
    pub fn new(devices: Vec<DeviceReport>) -> Self {
        Self::with_timestamp(devices, Utc::now())
    }

    /// Create a report with an explicit timestamp.
    pub fn with_timestamp(devices: Vec<DeviceReport>, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            devices,
        }
    }

    /// Number of devices in the report.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Check if the report has no devices.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Find a device by address.
    pub fn device(&self, address: &str) -> Option<&DeviceReport> {
        self.devices.iter().find(|d| d.address() == address)
    }
}
