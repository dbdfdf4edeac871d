//! Network characteristics: network id, anchor list and tag update rate.

use std::fmt;

use crate::error::Result;
use crate::protocol::reader::ByteReader;

/// Parse the network id characteristic.
///
/// Returns `None` for an empty value, which nodes report before joining a
/// network.
pub fn parse_network_id(data: &[u8]) -> Result<Option<u16>> {
    if data.is_empty() {
        return Ok(None);
    }
    ByteReader::new(data, "Network ID").u16().map(Some)
}

/// Parse the anchor list characteristic: a count byte followed by 16-bit
/// node ids. An empty value decodes to no anchors.
pub fn parse_anchor_list(data: &[u8]) -> Result<Vec<u16>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = ByteReader::new(data, "Anchor list");
    let count = reader.u8()? as usize;
    (0..count).map(|_| reader.u16()).collect()
}

/// Tag position update rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpdateRate {
    /// Interval while moving, in milliseconds.
    pub moving_ms: u32,
    /// Interval while stationary, in milliseconds.
    pub stationary_ms: u32,
}

impl UpdateRate {
    /// Size of the characteristic value.
    pub const SIZE: usize = 8;

    /// Parse the tag update rate characteristic.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(data, "Update rate");
        Ok(Self {
            moving_ms: reader.u32()?,
            stationary_ms: reader.u32()?,
        })
    }
}

impl fmt::Display for UpdateRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "moving {} ms, stationary {} ms",
            self.moving_ms, self.stationary_ms
        )
    }
}
