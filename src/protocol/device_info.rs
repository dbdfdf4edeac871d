//! Device info characteristic.

use std::fmt;

use crate::error::{Error, Result};
use crate::protocol::reader::ByteReader;

/// Identity and firmware information of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceInfo {
    /// 64-bit UWB node id.
    pub node_id: u64,
    /// Hardware version.
    pub hw_version: u32,
    /// Firmware 1 version.
    pub fw1_version: u32,
    /// Firmware 2 version.
    pub fw2_version: u32,
    /// Firmware 1 checksum.
    pub fw1_checksum: u32,
    /// Firmware 2 checksum.
    pub fw2_checksum: u32,
    /// Anchor acts as a bridge.
    pub bridge: bool,
}

impl DeviceInfo {
    /// Size of the characteristic value.
    pub const SIZE: usize = 29;

    /// Parse the characteristic value.
    ///
    /// Layout (all little-endian):
    /// - Bytes 0-7: node id
    /// - Bytes 8-11: hardware version
    /// - Bytes 12-15: firmware 1 version
    /// - Bytes 16-19: firmware 2 version
    /// - Bytes 20-23: firmware 1 checksum
    /// - Bytes 24-27: firmware 2 checksum
    /// - Byte 28: flags, bit 7 set on bridge nodes
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(Error::InvalidData {
                context: format!(
                    "Device info too short: {} bytes (need {})",
                    data.len(),
                    Self::SIZE
                ),
            });
        }

        let mut reader = ByteReader::new(data, "Device info");
        Ok(Self {
            node_id: reader.u64()?,
            hw_version: reader.u32()?,
            fw1_version: reader.u32()?,
            fw2_version: reader.u32()?,
            fw1_checksum: reader.u32()?,
            fw2_checksum: reader.u32()?,
            bridge: reader.u8()? & 0x80 != 0,
        })
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node 0x{:016x}, HW 0x{:08x}, FW1 0x{:08x} (checksum 0x{:08x}), FW2 0x{:08x} (checksum 0x{:08x}), bridge {}",
            self.node_id,
            self.hw_version,
            self.fw1_version,
            self.fw1_checksum,
            self.fw2_version,
            self.fw2_checksum,
            if self.bridge { "yes" } else { "no" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bytes() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&0xdeca_0000_0000_1a2bu64.to_le_bytes());
        data.extend_from_slice(&0xdeca_002au32.to_le_bytes());
        data.extend_from_slice(&0x0102_0301u32.to_le_bytes());
        data.extend_from_slice(&0x0102_0302u32.to_le_bytes());
        data.extend_from_slice(&0x1111_1111u32.to_le_bytes());
        data.extend_from_slice(&0x2222_2222u32.to_le_bytes());
        data.push(0x80);
        data
    }

    #[test]
    fn test_parse() {
        let info = DeviceInfo::parse(&sample_bytes()).unwrap();
        assert_eq!(info.node_id, 0xdeca_0000_0000_1a2b);
        assert_eq!(info.hw_version, 0xdeca_002a);
        assert_eq!(info.fw1_version, 0x0102_0301);
        assert_eq!(info.fw2_version, 0x0102_0302);
        assert_eq!(info.fw1_checksum, 0x1111_1111);
        assert_eq!(info.fw2_checksum, 0x2222_2222);
        assert!(info.bridge);
    }

    #[test]
    fn test_parse_without_bridge_flag() {
        let mut data = sample_bytes();
        data[28] = 0x00;
        assert!(!DeviceInfo::parse(&data).unwrap().bridge);
    }

    #[test]
    fn test_parse_rejects_short_and_empty() {
        assert!(matches!(DeviceInfo::parse(&[]), Err(Error::InvalidData { .. })));
        let data = sample_bytes();
        assert!(matches!(
            DeviceInfo::parse(&data[..28]),
            Err(Error::InvalidData { .. })
        ));
    }

    #[test]
    fn test_display() {
        let info = DeviceInfo::parse(&sample_bytes()).unwrap();
        assert!(info.to_string().starts_with("node 0xdeca000000001a2b, HW 0xdeca002a"));
        assert!(info.to_string().ends_with("bridge yes"));
    }
}
