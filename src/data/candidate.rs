//! Scan candidate data structures.
//!
//! A candidate is one peripheral observation from a single scan pass.

use crate::ble::advertising::{AddressType, AdvertisementRecord};

/// Signal strength recorded when the platform reported none.
pub const RSSI_UNAVAILABLE: i16 = i16::MIN;

/// Identity and radio metadata of one peripheral seen during a scan pass.
///
/// Candidates are never mutated after the scan that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanCandidate {
    /// Link-layer address (MAC style, e.g. `c4:3e:8a:01:02:03`).
    pub address: String,
    /// Address type.
    pub address_type: AddressType,
    /// Index of the local adapter that saw the advertisement.
    pub interface_index: usize,
    /// Signal strength in dB at scan time.
    pub signal_strength: i16,
    /// Whether the peripheral accepts connections.
    pub connectable: bool,
    /// Advertising fields in broadcast order.
    pub advertisement: AdvertisementRecord,
}

impl ScanCandidate {
    /// Create a new candidate.
    pub fn new(
        address: impl Into<String>,
        address_type: AddressType,
        interface_index: usize,
        signal_strength: i16,
        connectable: bool,
        advertisement: AdvertisementRecord,
    ) -> Self {
        Self {
            address: address.into(),
            address_type,
            interface_index,
            signal_strength,
            connectable,
            advertisement,
        }
    }

    /// The advertised short name, e.g. `DW1001`.
    pub fn device_name(&self) -> Option<&str> {
        self.advertisement.short_local_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ble::advertising::{ad_type, AdvertisementField};

    #[test]
    fn test_device_name() {
        let candidate = ScanCandidate::new(
            "c4:3e:8a:01:02:03",
            AddressType::Random,
            0,
            -61,
            true,
            AdvertisementRecord::new(vec![AdvertisementField::typed(
                ad_type::SHORT_LOCAL_NAME,
                "DW1001",
            )]),
        );
        assert_eq!(candidate.device_name(), Some("DW1001"));
        assert_eq!(candidate.address_type, AddressType::Random);
    }

    #[test]
    fn test_device_name_absent() {
        let candidate = ScanCandidate::new(
            "c4:3e:8a:01:02:03",
            AddressType::Public,
            0,
            -70,
            false,
            AdvertisementRecord::default(),
        );
        assert_eq!(candidate.device_name(), None);
    }
}
