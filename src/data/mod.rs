//! Data structures for survey results.
//!
//! This module contains the immutable record types produced by the
//! pipeline: scan candidates, GATT descriptors and the final reports.

pub mod candidate;
pub mod gatt;
pub mod report;

pub use candidate::ScanCandidate;
pub use gatt::{CharacteristicDescriptor, ServiceDescriptor};
pub use report::{DeviceReport, ScanReport};
