//! Protocol module for decoding Network Node characteristic values.
//!
//! This module contains the decoders for:
//! - Operation mode flags
//! - Device info
//! - Location data mode, location data and proxy positions
//! - Network id, anchor list and tag update rate

pub mod device_info;
pub mod location;
pub mod network;
pub mod operation_mode;
pub mod value;

mod reader;

pub use device_info::DeviceInfo;
pub use location::{Distance, LocationData, LocationDataMode, Position, ProxyPosition};
pub use network::{parse_anchor_list, parse_network_id, UpdateRate};
pub use operation_mode::{DeviceType, OperationMode, UwbMode};
pub use value::{is_decoded, NodeValue, DECODED_CHARACTERISTICS};
