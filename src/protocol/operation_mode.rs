//! Operation mode characteristic.
//!
//! Two bytes of packed flags, most significant bit first:
//! - Byte 0 bit 7: node type (0 = tag, 1 = anchor)
//! - Byte 0 bits 5-6: UWB mode (0 = off, 1 = passive, 2 = active)
//! - Byte 0 bit 4: firmware slot (0 = firmware 1, 1 = firmware 2)
//! - Byte 0 bit 3: accelerometer enabled
//! - Byte 0 bit 2: LED indication enabled
//! - Byte 0 bit 1: firmware update enabled
//! - Byte 1 bit 7: initiator
//! - Byte 1 bit 6: low power mode
//! - Byte 1 bit 5: location engine enabled

use std::fmt;

use crate::error::{Error, Result};

/// Role of a node in the UWB network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceType {
    /// Mobile node that gets positioned.
    Tag,
    /// Fixed reference node.
    Anchor,
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag => write!(f, "Tag"),
            Self::Anchor => write!(f, "Anchor"),
        }
    }
}

/// UWB radio mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UwbMode {
    /// Radio off.
    Off,
    /// Listening only.
    Passive,
    /// Ranging.
    Active,
}

impl UwbMode {
    fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Off),
            1 => Some(Self::Passive),
            2 => Some(Self::Active),
            _ => None,
        }
    }
}

impl fmt::Display for UwbMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "Off"),
            Self::Passive => write!(f, "Passive"),
            Self::Active => write!(f, "Active"),
        }
    }
}

/// Decoded operation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperationMode {
    /// Tag or anchor.
    pub device_type: DeviceType,
    /// UWB radio mode.
    pub uwb_mode: UwbMode,
    /// Firmware slot running, 1 or 2.
    pub firmware: u8,
    /// Accelerometer enabled.
    pub accelerometer_enabled: bool,
    /// LED indication enabled.
    pub led_enabled: bool,
    /// Firmware update enabled.
    pub firmware_update_enabled: bool,
    /// Anchor acts as network initiator.
    pub initiator: bool,
    /// Tag low power mode.
    pub low_power_mode: bool,
    /// Tag location engine enabled.
    pub location_engine: bool,
}

impl OperationMode {
    /// Size of the characteristic value.
    pub const SIZE: usize = 2;

    /// Parse the characteristic value.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(Error::InvalidData {
                context: format!(
                    "Operation mode too short: {} bytes (need {})",
                    data.len(),
                    Self::SIZE
                ),
            });
        }

        let (first, second) = (data[0], data[1]);
        let bit = |byte: u8, n: u8| (byte >> n) & 0x01 == 1;

        let raw_uwb = (first >> 5) & 0x03;
        let uwb_mode = UwbMode::from_raw(raw_uwb).ok_or_else(|| Error::InvalidData {
            context: format!("Unknown UWB mode {}", raw_uwb),
        })?;

        Ok(Self {
            device_type: if bit(first, 7) {
                DeviceType::Anchor
            } else {
                DeviceType::Tag
            },
            uwb_mode,
            firmware: if bit(first, 4) { 2 } else { 1 },
            accelerometer_enabled: bit(first, 3),
            led_enabled: bit(first, 2),
            firmware_update_enabled: bit(first, 1),
            initiator: bit(second, 7),
            low_power_mode: bit(second, 6),
            location_engine: bit(second, 5),
        })
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on_off = |flag: bool| if flag { "on" } else { "off" };
        write!(
            f,
            "{}, UWB {}, firmware {}, accelerometer {}, LED {}, FW update {}, initiator {}, low power {}, location engine {}",
            self.device_type,
            self.uwb_mode,
            self.firmware,
            on_off(self.accelerometer_enabled),
            on_off(self.led_enabled),
            on_off(self.firmware_update_enabled),
            on_off(self.initiator),
            on_off(self.low_power_mode),
            on_off(self.location_engine),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_active_anchor() {
        // Anchor, active, firmware 2, LED on; initiator
        let mode = OperationMode::parse(&[0b1101_0100, 0b1000_0000]).unwrap();
        assert_eq!(mode.device_type, DeviceType::Anchor);
        assert_eq!(mode.uwb_mode, UwbMode::Active);
        assert_eq!(mode.firmware, 2);
        assert!(!mode.accelerometer_enabled);
        assert!(mode.led_enabled);
        assert!(!mode.firmware_update_enabled);
        assert!(mode.initiator);
        assert!(!mode.low_power_mode);
        assert!(!mode.location_engine);
    }

    #[test]
    fn test_parse_passive_tag() {
        // Tag, passive, firmware 1, accelerometer on; low power, location engine
        let mode = OperationMode::parse(&[0b0010_1000, 0b0110_0000]).unwrap();
        assert_eq!(mode.device_type, DeviceType::Tag);
        assert_eq!(mode.uwb_mode, UwbMode::Passive);
        assert_eq!(mode.firmware, 1);
        assert!(mode.accelerometer_enabled);
        assert!(mode.low_power_mode);
        assert!(mode.location_engine);
        assert!(!mode.initiator);
    }

    #[test]
    fn test_parse_rejects_short_and_empty() {
        assert!(matches!(
            OperationMode::parse(&[]),
            Err(Error::InvalidData { .. })
        ));
        assert!(matches!(
            OperationMode::parse(&[0x80]),
            Err(Error::InvalidData { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_uwb_mode() {
        assert!(matches!(
            OperationMode::parse(&[0b0110_0000, 0x00]),
            Err(Error::InvalidData { .. })
        ));
    }

    #[test]
    fn test_display() {
        let mode = OperationMode::parse(&[0b1101_0100, 0b1000_0000]).unwrap();
        assert_eq!(
            mode.to_string(),
            "Anchor, UWB Active, firmware 2, accelerometer off, LED on, FW update off, initiator on, low power off, location engine off"
        );
    }
}
