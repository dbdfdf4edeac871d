//! Scripted in-memory transport.
//!
//! Plays back a fixed scan and GATT table, with per-device failures, and
//! counts connects, reads and closes so callers can check connection
//! hygiene.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::ble::transport::{Connection, Transport};
use crate::data::ScanCandidate;
use crate::error::{Error, Result};

/// One scripted service.
#[derive(Debug, Clone)]
pub struct MockService {
    /// Service UUID.
    pub uuid: Uuid,
    /// Characteristics, or the reason listing them fails.
    pub characteristics: std::result::Result<Vec<Uuid>, String>,
}

/// Scripted GATT behaviour of one device.
#[derive(Debug, Clone, Default)]
pub struct MockDevice {
    connect_error: Option<String>,
    service_list_error: Option<String>,
    close_error: Option<String>,
    services: Vec<MockService>,
    values: HashMap<Uuid, std::result::Result<Vec<u8>, String>>,
}

impl MockDevice {
    /// A reachable device with no services.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a service with the given characteristics.
    pub fn with_service(mut self, uuid: Uuid, characteristics: Vec<Uuid>) -> Self {
        self.services.push(MockService {
            uuid,
            characteristics: Ok(characteristics),
        });
        self
    }

    /// Add a service whose characteristic listing fails.
    pub fn with_failing_service(mut self, uuid: Uuid, reason: impl Into<String>) -> Self {
        self.services.push(MockService {
            uuid,
            characteristics: Err(reason.into()),
        });
        self
    }

    /// Script the value returned when `characteristic` is read.
    pub fn with_value(mut self, characteristic: Uuid, value: impl Into<Vec<u8>>) -> Self {
        self.values.insert(characteristic, Ok(value.into()));
        self
    }

    /// Make reading `characteristic` fail.
    pub fn with_read_error(mut self, characteristic: Uuid, reason: impl Into<String>) -> Self {
        self.values.insert(characteristic, Err(reason.into()));
        self
    }

    /// Make connecting fail.
    pub fn unreachable(mut self, reason: impl Into<String>) -> Self {
        self.connect_error = Some(reason.into());
        self
    }

    /// Make the service listing fail.
    pub fn with_service_list_error(mut self, reason: impl Into<String>) -> Self {
        self.service_list_error = Some(reason.into());
        self
    }

    /// Make closing the connection report an error.
    pub fn with_close_error(mut self, reason: impl Into<String>) -> Self {
        self.close_error = Some(reason.into());
        self
    }
}

#[derive(Debug, Default)]
struct Counters {
    connects: AtomicUsize,
    reads: AtomicUsize,
    closes: AtomicUsize,
    open: AtomicUsize,
    max_open: AtomicUsize,
}

/// Transport that replays a scripted scan and GATT table.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    candidates: Vec<ScanCandidate>,
    scan_error: Option<String>,
    devices: HashMap<String, MockDevice>,
    counters: Arc<Counters>,
}

impl MockTransport {
    /// An empty transport: scans return nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scan result.
    pub fn with_candidate(mut self, candidate: ScanCandidate) -> Self {
        self.candidates.push(candidate);
        self
    }

    /// Script the device at `address`. Unscripted addresses are not found.
    pub fn with_device(mut self, address: impl Into<String>, device: MockDevice) -> Self {
        self.devices.insert(address.into(), device);
        self
    }

    /// Make the scan fail.
    pub fn with_scan_failure(mut self, reason: impl Into<String>) -> Self {
        self.scan_error = Some(reason.into());
        self
    }

    /// Number of successful connects.
    pub fn connect_count(&self) -> usize {
        self.counters.connects.load(Ordering::SeqCst)
    }

    /// Number of characteristic reads.
    pub fn read_count(&self) -> usize {
        self.counters.reads.load(Ordering::SeqCst)
    }

    /// Number of close calls.
    pub fn close_count(&self) -> usize {
        self.counters.closes.load(Ordering::SeqCst)
    }

    /// Highest number of connections open at the same time.
    pub fn max_open_connections(&self) -> usize {
        self.counters.max_open.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    type Connection = MockConnection;

    async fn scan(&self) -> Result<Vec<ScanCandidate>> {
        match &self.scan_error {
            Some(reason) => Err(Error::ScanFailed {
                reason: reason.clone(),
            }),
            None => Ok(self.candidates.clone()),
        }
    }

    async fn connect(&self, address: &str) -> Result<MockConnection> {
        let device = self
            .devices
            .get(address)
            .cloned()
            .ok_or_else(|| Error::DeviceNotFound {
                address: address.to_string(),
            })?;

        if let Some(reason) = &device.connect_error {
            return Err(Error::ConnectionFailed {
                address: address.to_string(),
                reason: reason.clone(),
            });
        }

        self.counters.connects.fetch_add(1, Ordering::SeqCst);
        let open = self.counters.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_open.fetch_max(open, Ordering::SeqCst);

        Ok(MockConnection {
            device,
            counters: self.counters.clone(),
        })
    }
}

/// Connection handed out by [`MockTransport`].
#[derive(Debug)]
pub struct MockConnection {
    device: MockDevice,
    counters: Arc<Counters>,
}

#[async_trait]
impl Connection for MockConnection {
    async fn services(&mut self) -> Result<Vec<Uuid>> {
        if let Some(reason) = &self.device.service_list_error {
            return Err(Error::GattFailed {
                reason: reason.clone(),
            });
        }
        Ok(self.device.services.iter().map(|s| s.uuid).collect())
    }

    async fn characteristics(&mut self, service: &Uuid) -> Result<Vec<Uuid>> {
        let found = self
            .device
            .services
            .iter()
            .find(|s| s.uuid == *service)
            .ok_or_else(|| Error::ServiceNotFound {
                uuid: service.to_string(),
            })?;

        found
            .characteristics
            .clone()
            .map_err(|reason| Error::GattFailed { reason })
    }

    async fn read(&mut self, service: &Uuid, characteristic: &Uuid) -> Result<Vec<u8>> {
        self.counters.reads.fetch_add(1, Ordering::SeqCst);

        let listed = self
            .device
            .services
            .iter()
            .find(|s| s.uuid == *service)
            .ok_or_else(|| Error::ServiceNotFound {
                uuid: service.to_string(),
            })?
            .characteristics
            .as_ref()
            .map(|c| c.contains(characteristic))
            .unwrap_or(false);

        if !listed {
            return Err(Error::GattFailed {
                reason: format!("characteristic {} not found", characteristic),
            });
        }

        match self.device.values.get(characteristic) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(reason)) => Err(Error::GattFailed {
                reason: reason.clone(),
            }),
            None => Err(Error::GattFailed {
                reason: format!("characteristic {} is not readable", characteristic),
            }),
        }
    }

    async fn close(self) -> Result<()> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        self.counters.open.fetch_sub(1, Ordering::SeqCst);

        match self.device.close_error {
            Some(reason) => Err(Error::GattFailed { reason }),
            None => Ok(()),
        }
    }
}
