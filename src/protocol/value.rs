//! Decoded Network Node characteristic values.

use std::fmt;

use uuid::Uuid;

use crate::ble::uuids::*;
use crate::error::Result;
use crate::protocol::device_info::DeviceInfo;
use crate::protocol::location::{LocationData, LocationDataMode, ProxyPosition};
use crate::protocol::network::{parse_anchor_list, parse_network_id, UpdateRate};
use crate::protocol::operation_mode::OperationMode;

/// Network Node characteristics read during enumeration, in read order.
pub const DECODED_CHARACTERISTICS: [Uuid; 8] = [
    OPERATION_MODE_UUID,
    DEVICE_INFO_UUID,
    NETWORK_ID_UUID,
    LOCATION_DATA_MODE_UUID,
    LOCATION_DATA_UUID,
    PROXY_POSITIONS_UUID,
    ANCHOR_LIST_UUID,
    TAG_UPDATE_RATE_UUID,
];

/// Check if a characteristic has a decoder.
pub fn is_decoded(uuid: &Uuid) -> bool {
    DECODED_CHARACTERISTICS.contains(uuid)
}

/// A decoded characteristic value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeValue {
    /// Operation mode flags.
    OperationMode(OperationMode),
    /// Identity and firmware versions.
    DeviceInfo(DeviceInfo),
    /// UWB network id, `None` when unset.
    NetworkId(Option<u16>),
    /// Location data content selection.
    LocationDataMode(LocationDataMode),
    /// Last position and distances.
    LocationData(LocationData),
    /// Tag positions relayed by this node.
    ProxyPositions(Vec<ProxyPosition>),
    /// Anchors seen by this node.
    AnchorList(Vec<u16>),
    /// Tag update rates.
    UpdateRate(UpdateRate),
}

impl NodeValue {
    /// Decode the value of a known characteristic.
    ///
    /// Returns `Ok(None)` for characteristics without a decoder.
    pub fn decode(characteristic: &Uuid, data: &[u8]) -> Result<Option<Self>> {
        let value = match *characteristic {
            OPERATION_MODE_UUID => Self::OperationMode(OperationMode::parse(data)?),
            DEVICE_INFO_UUID => Self::DeviceInfo(DeviceInfo::parse(data)?),
            NETWORK_ID_UUID => Self::NetworkId(parse_network_id(data)?),
            LOCATION_DATA_MODE_UUID => Self::LocationDataMode(LocationDataMode::parse(data)?),
            LOCATION_DATA_UUID => Self::LocationData(LocationData::parse(data)?),
            PROXY_POSITIONS_UUID => Self::ProxyPositions(ProxyPosition::parse_list(data)?),
            ANCHOR_LIST_UUID => Self::AnchorList(parse_anchor_list(data)?),
            TAG_UPDATE_RATE_UUID => Self::UpdateRate(UpdateRate::parse(data)?),
            _ => return Ok(None),
        };
        Ok(Some(value))
    }
}

impl fmt::Display for NodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OperationMode(mode) => write!(f, "{}", mode),
            Self::DeviceInfo(info) => write!(f, "{}", info),
            Self::NetworkId(Some(id)) => write!(f, "0x{:04x}", id),
            Self::NetworkId(None) => write!(f, "not set"),
            Self::LocationDataMode(mode) => write!(f, "{}", mode),
            Self::LocationData(data) => write!(f, "{}", data),
            Self::ProxyPositions(entries) if entries.is_empty() => write!(f, "none"),
            Self::ProxyPositions(entries) => {
                let list: Vec<String> = entries.iter().map(ToString::to_string).collect();
                write!(f, "{}", list.join("; "))
            }
            Self::AnchorList(ids) if ids.is_empty() => write!(f, "none"),
            Self::AnchorList(ids) => {
                let list: Vec<String> = ids.iter().map(|id| format!("0x{:04x}", id)).collect();
                write!(f, "{}", list.join(", "))
            }
            Self::UpdateRate(rate) => write!(f, "{}", rate),
        }
    }
}
