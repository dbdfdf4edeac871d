//! BLE communication module.
//!
//! This module provides the low-level Bluetooth Low Energy pieces of a
//! survey: advertisement classification, scanning, and GATT connections.

pub mod advertising;
pub mod connection;
pub mod filter;
pub mod mock;
pub mod scanner;
pub mod transport;
pub mod uuids;

pub use advertising::{
    AddressType, AdvertisementClassifier, AdvertisementField, AdvertisementRecord,
    DECAWAVE_NAME_PREFIX,
};
pub use connection::{ConnectionState, PeripheralConnection};
pub use filter::filter_candidates;
pub use mock::{MockConnection, MockDevice, MockTransport};
pub use scanner::BleScanner;
pub use transport::{Connection, Transport};
pub use uuids::*;
