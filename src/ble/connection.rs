//! BLE connection handling.
//!
//! Wraps a connected btleplug peripheral as a [`Connection`].

use async_trait::async_trait;
use btleplug::api::{CharPropFlags, Peripheral as _, Service};
use btleplug::platform::Peripheral;
use tracing::{debug, info, trace};
use uuid::Uuid;

use crate::ble::transport::Connection;
use crate::error::{Error, Result};

/// Connection state for a peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    /// Not connected.
    #[default]
    Disconnected,
    /// Connected, services not yet discovered.
    Connected,
    /// Connected and the GATT table has been read.
    ServicesDiscovered,
}

impl ConnectionState {
    /// Check if connected.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected | Self::ServicesDiscovered)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connected => write!(f, "Connected"),
            Self::ServicesDiscovered => write!(f, "Services discovered"),
        }
    }
}

/// An open connection to a btleplug peripheral.
pub struct PeripheralConnection {
    /// Address the connection was opened for.
    address: String,
    /// The connected peripheral.
    peripheral: Peripheral,
    /// Current state.
    state: ConnectionState,
    /// GATT table read by the last service discovery.
    services: Vec<Service>,
}

impl PeripheralConnection {
    /// Connect to a peripheral.
    pub async fn open(address: impl Into<String>, peripheral: Peripheral) -> Result<Self> {
        let address = address.into();

        // Check if already connected at BLE level
        if peripheral.is_connected().await.unwrap_or(false) {
            info!("Peripheral {} already connected at BLE level", address);
        } else {
            peripheral
                .connect()
                .await
                .map_err(|e| Error::ConnectionFailed {
                    address: address.clone(),
                    reason: e.to_string(),
                })?;
            info!("Connected to {}", address);
        }

        Ok(Self {
            address,
            peripheral,
            state: ConnectionState::Connected,
            services: Vec::new(),
        })
    }

    fn set_state(&mut self, new_state: ConnectionState) {
        if self.state != new_state {
            debug!(
                "Connection {} state changed: {} -> {}",
                self.address, self.state, new_state
            );
            self.state = new_state;
        }
    }
}

#[async_trait]
impl Connection for PeripheralConnection {
    async fn services(&mut self) -> Result<Vec<Uuid>> {
        if !self.state.is_connected() {
            return Err(Error::NotConnected);
        }

        self.peripheral.discover_services().await?;
        self.services = self.peripheral.services().into_iter().collect();
        self.set_state(ConnectionState::ServicesDiscovered);

        debug!(
            "Discovered {} services on {}",
            self.services.len(),
            self.address
        );

        Ok(self.services.iter().map(|s| s.uuid).collect())
    }

    async fn characteristics(&mut self, service: &Uuid) -> Result<Vec<Uuid>> {
        if self.state != ConnectionState::ServicesDiscovered {
            return Err(Error::NotConnected);
        }

        let found = self
            .services
            .iter()
            .find(|s| s.uuid == *service)
            .ok_or_else(|| Error::ServiceNotFound {
                uuid: service.to_string(),
            })?;

        let uuids: Vec<Uuid> = found.characteristics.iter().map(|c| c.uuid).collect();
        trace!("Service {} has {} characteristics", service, uuids.len());

        Ok(uuids)
    }

    async fn read(&mut self, service: &Uuid, characteristic: &Uuid) -> Result<Vec<u8>> {
        if self.state != ConnectionState::ServicesDiscovered {
            return Err(Error::NotConnected);
        }

        let found = self
            .services
            .iter()
            .find(|s| s.uuid == *service)
            .ok_or_else(|| Error::ServiceNotFound {
                uuid: service.to_string(),
            })?
            .characteristics
            .iter()
            .find(|c| c.uuid == *characteristic)
            .cloned()
            .ok_or_else(|| Error::GattFailed {
                reason: format!("characteristic {} not found", characteristic),
            })?;

        if !found.properties.contains(CharPropFlags::READ) {
            return Err(Error::GattFailed {
                reason: format!("characteristic {} is not readable", characteristic),
            });
        }

        let value = self.peripheral.read(&found).await?;
        trace!(
            "Read {} bytes from {} on {}",
            value.len(),
            characteristic,
            self.address
        );

        Ok(value)
    }

    async fn close(mut self) -> Result<()> {
        self.set_state(ConnectionState::Disconnected);
        self.peripheral.disconnect().await?;
        info!("Disconnected from {}", self.address);
        Ok(())
    }
}

impl std::fmt::Debug for PeripheralConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeripheralConnection")
            .field("address", &self.address)
            .field("state", &self.state)
            .field("services", &self.services.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_state() {
        assert!(!ConnectionState::Disconnected.is_connected());
        assert!(ConnectionState::Connected.is_connected());
        assert!(ConnectionState::ServicesDiscovered.is_connected());
        assert_eq!(ConnectionState::default(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_connection_state_display() {
        assert_eq!(format!("{}", ConnectionState::Connected), "Connected");
        assert_eq!(format!("{}", ConnectionState::Disconnected), "Disconnected");
        assert_eq!(
            format!("{}", ConnectionState::ServicesDiscovered),
            "Services discovered"
        );
    }
}
