//! Advertising data records and classification.
//!
//! An advertisement is kept as the ordered list of typed fields a peripheral
//! broadcast during the scan window. The classifier decides from those
//! fields whether a peripheral is a Decawave node.

/// Standard advertising data type codes.
///
/// Values from the Bluetooth Assigned Numbers "Common Data Types" table.
pub mod ad_type {
    /// Flags.
    pub const FLAGS: u8 = 0x01;
    /// Incomplete list of 16-bit service UUIDs.
    pub const INCOMPLETE_16B_SERVICES: u8 = 0x02;
    /// Complete list of 16-bit service UUIDs.
    pub const COMPLETE_16B_SERVICES: u8 = 0x03;
    /// Incomplete list of 32-bit service UUIDs.
    pub const INCOMPLETE_32B_SERVICES: u8 = 0x04;
    /// Complete list of 32-bit service UUIDs.
    pub const COMPLETE_32B_SERVICES: u8 = 0x05;
    /// Incomplete list of 128-bit service UUIDs.
    pub const INCOMPLETE_128B_SERVICES: u8 = 0x06;
    /// Complete list of 128-bit service UUIDs.
    pub const COMPLETE_128B_SERVICES: u8 = 0x07;
    /// Shortened local name.
    pub const SHORT_LOCAL_NAME: u8 = 0x08;
    /// Complete local name.
    pub const COMPLETE_LOCAL_NAME: u8 = 0x09;
    /// Transmit power level.
    pub const TX_POWER: u8 = 0x0A;
    /// 16-bit service solicitation UUIDs.
    pub const SERVICE_SOLICITATION_16B: u8 = 0x14;
    /// 128-bit service solicitation UUIDs.
    pub const SERVICE_SOLICITATION_128B: u8 = 0x15;
    /// Service data with a 16-bit UUID.
    pub const SERVICE_DATA_16B: u8 = 0x16;
    /// Appearance.
    pub const APPEARANCE: u8 = 0x19;
    /// 32-bit service solicitation UUIDs.
    pub const SERVICE_SOLICITATION_32B: u8 = 0x1F;
    /// Service data with a 32-bit UUID.
    pub const SERVICE_DATA_32B: u8 = 0x20;
    /// Service data with a 128-bit UUID.
    pub const SERVICE_DATA_128B: u8 = 0x21;
    /// Manufacturer specific data.
    pub const MANUFACTURER: u8 = 0xFF;

    /// Human readable description of a type code.
    pub fn description(type_code: u8) -> &'static str {
        match type_code {
            FLAGS => "Flags",
            INCOMPLETE_16B_SERVICES => "Incomplete 16b Services",
            COMPLETE_16B_SERVICES => "Complete 16b Services",
            INCOMPLETE_32B_SERVICES => "Incomplete 32b Services",
            COMPLETE_32B_SERVICES => "Complete 32b Services",
            INCOMPLETE_128B_SERVICES => "Incomplete 128b Services",
            COMPLETE_128B_SERVICES => "Complete 128b Services",
            SHORT_LOCAL_NAME => "Short Local Name",
            COMPLETE_LOCAL_NAME => "Complete Local Name",
            TX_POWER => "Tx Power",
            SERVICE_SOLICITATION_16B => "16b Service Solicitation",
            SERVICE_SOLICITATION_128B => "128b Service Solicitation",
            SERVICE_DATA_16B => "16b Service Data",
            APPEARANCE => "Appearance",
            SERVICE_SOLICITATION_32B => "32b Service Solicitation",
            SERVICE_DATA_32B => "32b Service Data",
            SERVICE_DATA_128B => "128b Service Data",
            MANUFACTURER => "Manufacturer",
            _ => "Unknown",
        }
    }
}

/// Name prefix shared by all Decawave DWM1001 firmware images.
pub const DECAWAVE_NAME_PREFIX: &str = "DW";

/// Link-layer address type of a peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AddressType {
    /// IEEE-assigned public address.
    #[default]
    Public,
    /// Random (static or private) address.
    Random,
}

impl AddressType {
    /// Get the address type as a string.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Random => "random",
        }
    }
}

impl std::fmt::Display for AddressType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One `(type code, description, value)` entry of an advertisement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdvertisementField {
    /// Advertising data type code.
    pub type_code: u8,
    /// Human readable type description.
    pub description: String,
    /// Decoded value: text for names, hex for binary payloads.
    pub value: String,
}

impl AdvertisementField {
    /// Create a field with an explicit description.
    pub fn new(type_code: u8, description: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_code,
            description: description.into(),
            value: value.into(),
        }
    }

    /// Create a field described by the standard type table.
    pub fn typed(type_code: u8, value: impl Into<String>) -> Self {
        Self::new(type_code, ad_type::description(type_code), value)
    }
}

/// Ordered advertising fields captured for one peripheral at scan time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdvertisementRecord {
    fields: Vec<AdvertisementField>,
}

impl AdvertisementRecord {
    /// Create a record from fields in broadcast order.
    pub fn new(fields: Vec<AdvertisementField>) -> Self {
        Self { fields }
    }

    /// All fields in broadcast order.
    pub fn fields(&self) -> &[AdvertisementField] {
        &self.fields
    }

    /// Check if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Value of the first field with the given type code.
    pub fn value_text(&self, type_code: u8) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.type_code == type_code)
            .map(|field| field.value.as_str())
    }

    /// The shortened local name, if advertised.
    pub fn short_local_name(&self) -> Option<&str> {
        self.value_text(ad_type::SHORT_LOCAL_NAME)
    }
}

impl FromIterator<AdvertisementField> for AdvertisementRecord {
    fn from_iter<I: IntoIterator<Item = AdvertisementField>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Decides whether an advertisement belongs to the target device class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvertisementClassifier {
    prefix: String,
}

impl AdvertisementClassifier {
    /// Create a classifier matching a custom short-name prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The short-name prefix this classifier matches.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Classify one advertisement.
    ///
    /// Returns `true` only when a shortened local name is present and starts
    /// with the prefix. A record without that field is not a match.
    pub fn classify(&self, record: &AdvertisementRecord) -> bool {
        record
            .short_local_name()
            .map(|name| name.starts_with(self.prefix.as_str()))
            .unwrap_or(false)
    }
}

impl Default for AdvertisementClassifier {
    fn default() -> Self {
        Self::with_prefix(DECAWAVE_NAME_PREFIX)
    }
}
