// Allow unusual byte groupings for UUIDs which have standard format
#![allow(clippy::unusual_byte_groupings)]

//! # decawave-ble-survey
//!
//! A cross-platform Rust library for surveying Decawave DWM1001 nodes over
//! Bluetooth Low Energy.
//!
//! A survey runs one discovery pass and keeps the peripherals whose
//! shortened local name starts with `DW`. It connects to each of them in
//! turn, walks the GATT service and characteristic table, and writes a
//! report covering every device's advertising data and topology.
//!
//! ## Features
//!
//! - **Discovery**: one timed scan, every advertisement kept with its typed fields
//! - **Classification**: short-name prefix matching, configurable
//! - **Enumeration**: strictly sequential, one connection open at a time,
//!   always closed; a failing service never hides its siblings
//! - **Decoding**: Network Node values (operation mode, device info,
//!   location data, anchor list, update rate) read while connected
//! - **Reporting**: ordered device → service → characteristic model,
//!   written as text (or JSON with the `json` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use decawave_ble_survey::{BleScanner, Result, Survey, SurveyConfig, TextReportWriter};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = SurveyConfig::default();
//!     let scanner = BleScanner::new(&config).await?;
//!
//!     let survey = Survey::new(scanner, &config)?;
//!     let outcome = survey
//!         .run(&TextReportWriter::new(&config.output_path))
//!         .await?;
//!
//!     println!(
//!         "Reported {} of {} Decawave devices",
//!         outcome.succeeded(),
//!         outcome.attempted()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Platform Notes
//!
//! ### macOS
//! Requires Bluetooth permission. CoreBluetooth hides MAC addresses, so the
//! platform peripheral identifier is reported instead.
//!
//! ### Linux
//! Requires BlueZ. User may need to be in the `bluetooth` group.
//!
//! ### Windows
//! Requires Windows 10 or later with Bluetooth LE support.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for data types
//! - `json`: Enable [`writer::JsonReportWriter`]

// Public modules
pub mod ble;
pub mod builder;
pub mod config;
pub mod data;
pub mod enumerator;
pub mod error;
pub mod protocol;
pub mod survey;
pub mod utils;
pub mod writer;

// Re-exports for convenience
pub use builder::{build_report, BuildOutcome};
pub use config::SurveyConfig;
pub use enumerator::{DeviceEnumerator, Enumerate};
pub use error::{EnumerationFailure, EnumerationStage, Error, Result};
pub use protocol::NodeValue;
pub use survey::{Survey, SurveyOutcome};
pub use utils::to_hex;
pub use writer::{ReportWriter, TextReportWriter};

#[cfg(feature = "json")]
pub use writer::JsonReportWriter;

// Re-export commonly used types from submodules
pub use ble::{
    filter_candidates, AddressType, AdvertisementClassifier, AdvertisementField,
    AdvertisementRecord, BleScanner, Connection, Transport, DECAWAVE_NAME_PREFIX,
};
pub use data::{
    CharacteristicDescriptor, DeviceReport, ScanCandidate, ScanReport, ServiceDescriptor,
};
