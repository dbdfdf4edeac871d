//! GATT topology data structures.
//!
//! Services and characteristics as discovered over one live connection.

use uuid::Uuid;

use crate::protocol::NodeValue;

/// A characteristic discovered under a service.
///
/// Network Node characteristics with a known encoding also carry their
/// decoded value, or the reason it could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacteristicDescriptor {
    /// Characteristic UUID.
    pub uuid: Uuid,
    /// Decoded value, if it was read.
    pub value: Option<NodeValue>,
    /// Why reading or decoding the value failed, if it did.
    pub read_failure: Option<String>,
}

impl CharacteristicDescriptor {
    /// Create a new descriptor.
    pub fn new(uuid: Uuid) -> Self {
        Self {
            uuid,
            value: None,
            read_failure: None,
        }
    }

    /// Create a descriptor with a decoded value.
    pub fn with_value(uuid: Uuid, value: NodeValue) -> Self {
        Self {
            value: Some(value),
            ..Self::new(uuid)
        }
    }

    /// Create a descriptor whose value could not be read.
    pub fn read_failed(uuid: Uuid, cause: impl Into<String>) -> Self {
        Self {
            read_failure: Some(cause.into()),
            ..Self::new(uuid)
        }
    }
}

/// A service and its characteristics, in discovery order.
///
/// Characteristic UUIDs may repeat; devices do expose duplicates and they
/// are kept as reported.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceDescriptor {
    /// Service UUID.
    pub uuid: Uuid,
    /// Characteristics in the order the transport returned them.
    pub characteristics: Vec<CharacteristicDescriptor>,
    /// Why characteristic discovery failed for this service, if it did.
    pub failure: Option<String>,
}

impl ServiceDescriptor {
    /// Create a fully enumerated service.
    pub fn new(uuid: Uuid, characteristics: Vec<CharacteristicDescriptor>) -> Self {
        Self {
            uuid,
            characteristics,
            failure: None,
        }
    }

    /// Create a marker for a service whose characteristics could not be listed.
    pub fn failed(uuid: Uuid, cause: impl Into<String>) -> Self {
        Self {
            uuid,
            characteristics: Vec::new(),
            failure: Some(cause.into()),
        }
    }

    /// Check if characteristic discovery succeeded.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Number of characteristics whose value could not be read.
    pub fn failed_read_count(&self) -> usize {
        self.characteristics
            .iter()
            .filter(|c| c.read_failure.is_some())
            .count()
    }

    /// Characteristic UUIDs in discovery order.
    pub fn characteristic_uuids(&self) -> Vec<Uuid> {
        self.characteristics.iter().map(|c| c.uuid).collect()
    }
}
