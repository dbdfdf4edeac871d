//! BLE scanning functionality.
//!
//! Provides the btleplug-backed [`Transport`]: one timed discovery pass that
//! turns every peripheral seen into a [`ScanCandidate`], and connections to
//! the peripherals found by that pass.

use async_trait::async_trait;
use btleplug::api::{
    AddressType as BtAddressType, Central, CentralEvent, Manager as _, Peripheral as _,
    PeripheralProperties, ScanFilter,
};
use btleplug::platform::{Adapter, Manager, Peripheral, PeripheralId};
use futures::stream::{Stream, StreamExt};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace};
use uuid::Uuid;

use crate::ble::advertising::{ad_type, AddressType, AdvertisementField, AdvertisementRecord};
use crate::ble::connection::PeripheralConnection;
use crate::ble::transport::Transport;
use crate::config::SurveyConfig;
use crate::data::candidate::{ScanCandidate, RSSI_UNAVAILABLE};
use crate::error::{Error, Result};
use crate::utils::{to_hex, u16_to_le_hex};

/// BLE scanner and connector backed by a btleplug adapter.
pub struct BleScanner {
    /// The BLE adapter to use for scanning.
    adapter: Adapter,
    /// Index of the adapter in the platform's adapter list.
    interface_index: usize,
    /// Length of one discovery pass.
    scan_duration: Duration,
    /// Peripherals seen by the last scan, by address.
    discovered: Arc<RwLock<HashMap<String, Peripheral>>>,
}

impl BleScanner {
    /// Create a scanner on the adapter selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if Bluetooth is not available or the adapter index
    /// does not exist.
    pub async fn new(config: &SurveyConfig) -> Result<Self> {
        config.validate()?;

        let manager = Manager::new()
            .await
            .map_err(|_e| Error::BluetoothUnavailable)?;

        let adapters = manager.adapters().await.map_err(Error::Bluetooth)?;
        let available = adapters.len();

        let adapter = adapters
            .into_iter()
            .nth(config.adapter_index)
            .ok_or(Error::AdapterNotFound {
                index: config.adapter_index,
                available,
            })?;

        info!(
            "Using Bluetooth adapter {}: {:?}",
            config.adapter_index,
            adapter.adapter_info().await.ok()
        );

        Ok(Self::with_adapter(
            adapter,
            config.adapter_index,
            config.scan_duration,
        ))
    }

    /// Create a scanner with a specific adapter.
    pub fn with_adapter(adapter: Adapter, interface_index: usize, scan_duration: Duration) -> Self {
        Self {
            adapter,
            interface_index,
            scan_duration,
            discovered: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Run the timed discovery window, returning peripheral ids in the order
    /// they were first seen advertising.
    async fn discover(&self) -> Result<Vec<PeripheralId>> {
        let events = self.adapter.events().await.map_err(Error::Bluetooth)?;

        self.adapter
            .start_scan(ScanFilter::default())
            .await
            .map_err(|e| Error::ScanFailed {
                reason: e.to_string(),
            })?;

        let seen = collect_window(events, self.scan_duration, advertising_peripheral).await;

        self.adapter.stop_scan().await.map_err(|e| Error::ScanFailed {
            reason: e.to_string(),
        })?;

        Ok(seen)
    }
}

/// Peripheral an adapter event shows to be advertising.
///
/// Peripherals already known to the platform report `DeviceUpdated`
/// instead of `DeviceDiscovered`; both count as seen.
fn advertising_peripheral(event: CentralEvent) -> Option<PeripheralId> {
    match event {
        CentralEvent::DeviceDiscovered(id)
        | CentralEvent::DeviceUpdated(id)
        | CentralEvent::ManufacturerDataAdvertisement { id, .. }
        | CentralEvent::ServiceDataAdvertisement { id, .. }
        | CentralEvent::ServicesAdvertisement { id, .. } => Some(id),
        _ => None,
    }
}

/// Drain `events` until `window` elapses or the stream ends, keeping the
/// ids `seen` extracts in first-seen order without repeats.
async fn collect_window<S, E, I, F>(mut events: S, window: Duration, seen: F) -> Vec<I>
where
    S: Stream<Item = E> + Unpin,
    I: PartialEq + fmt::Debug,
    F: Fn(E) -> Option<I>,
{
    let deadline = tokio::time::Instant::now() + window;
    let mut order: Vec<I> = Vec::new();

    loop {
        tokio::select! {
            event = events.next() => match event {
                Some(event) => {
                    if let Some(id) = seen(event) {
                        if !order.contains(&id) {
                            trace!("Device seen: {:?}", id);
                            order.push(id);
                        }
                    }
                }
                None => {
                    debug!("Adapter event stream ended before scan window");
                    break;
                }
            },
            _ = tokio::time::sleep_until(deadline) => break,
        }
    }

    order
}

#[async_trait]
impl Transport for BleScanner {
    type Connection = PeripheralConnection;

    async fn scan(&self) -> Result<Vec<ScanCandidate>> {
        info!(
            "Scanning for BLE devices ({:?} window)",
            self.scan_duration
        );

        let order = self.discover().await?;
        let mut discovered = HashMap::new();
        let mut candidates = Vec::with_capacity(order.len());

        for id in order {
            let peripheral = match self.adapter.peripheral(&id).await {
                Ok(p) => p,
                Err(e) => {
                    trace!("Failed to get peripheral {:?}: {}", id, e);
                    continue;
                }
            };

            let properties = match peripheral.properties().await {
                Ok(Some(p)) => p,
                _ => continue,
            };

            let address = peripheral_address(&peripheral, &properties);
            let candidate = candidate_from_properties(&address, self.interface_index, &properties);
            trace!(
                "Scan entry {} ({:?}, {} dB)",
                address,
                candidate.device_name(),
                candidate.signal_strength
            );

            discovered.insert(address, peripheral);
            candidates.push(candidate);
        }

        *self.discovered.write() = discovered;

        info!("Finished scanning, {} devices seen", candidates.len());
        Ok(candidates)
    }

    async fn connect(&self, address: &str) -> Result<PeripheralConnection> {
        let peripheral = self
            .discovered
            .read()
            .get(address)
            .cloned()
            .ok_or_else(|| Error::DeviceNotFound {
                address: address.to_string(),
            })?;

        PeripheralConnection::open(address, peripheral).await
    }
}

/// MAC-style address of a peripheral.
///
/// Platforms that hide the address (CoreBluetooth) report all zeros; the
/// platform identifier is used instead.
fn peripheral_address(peripheral: &Peripheral, properties: &PeripheralProperties) -> String {
    if properties.address.into_inner() == [0u8; 6] {
        format!("{:?}", peripheral.id())
    } else {
        properties.address.to_string().to_lowercase()
    }
}

/// Build a scan candidate from btleplug's decoded properties.
fn candidate_from_properties(
    address: &str,
    interface_index: usize,
    properties: &PeripheralProperties,
) -> ScanCandidate {
    let address_type = match properties.address_type {
        Some(BtAddressType::Random) => AddressType::Random,
        _ => AddressType::Public,
    };

    let advertisement = advertisement_fields(
        properties.local_name.as_deref(),
        properties.tx_power_level,
        &properties.services,
        &properties.service_data,
        &properties.manufacturer_data,
    );

    // btleplug does not expose the advertising PDU type, so every reported
    // peripheral is taken as connectable.
    ScanCandidate::new(
        address,
        address_type,
        interface_index,
        properties.rssi.unwrap_or(RSSI_UNAVAILABLE),
        true,
        advertisement,
    )
}

/// Rebuild typed advertising fields from decoded advertisement parts.
///
/// btleplug does not distinguish shortened from complete local names; the
/// name is reported as a shortened local name, which is how DWM1001
/// firmware advertises it. Maps are emitted in key order.
pub(crate) fn advertisement_fields(
    local_name: Option<&str>,
    tx_power: Option<i16>,
    services: &[Uuid],
    service_data: &HashMap<Uuid, Vec<u8>>,
    manufacturer_data: &HashMap<u16, Vec<u8>>,
) -> AdvertisementRecord {
    let mut fields = Vec::new();

    if !services.is_empty() {
        let list = services
            .iter()
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(",");
        fields.push(AdvertisementField::typed(ad_type::COMPLETE_128B_SERVICES, list));
    }

    if let Some(name) = local_name {
        fields.push(AdvertisementField::typed(ad_type::SHORT_LOCAL_NAME, name));
    }

    if let Some(power) = tx_power {
        fields.push(AdvertisementField::typed(ad_type::TX_POWER, power.to_string()));
    }

    let mut service_data: Vec<_> = service_data.iter().collect();
    service_data.sort_by_key(|(uuid, _)| **uuid);
    for (uuid, data) in service_data {
        fields.push(AdvertisementField::typed(
            ad_type::SERVICE_DATA_128B,
            format!("{} {}", uuid, to_hex(data)),
        ));
    }

    let mut manufacturer_data: Vec<_> = manufacturer_data.iter().collect();
    manufacturer_data.sort_by_key(|(company, _)| **company);
    for (company, data) in manufacturer_data {
        fields.push(AdvertisementField::typed(
            ad_type::MANUFACTURER,
            format!("{}{}", u16_to_le_hex(*company), to_hex(data)),
        ));
    }

    AdvertisementRecord::new(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ble::uuids::NETWORK_NODE_SERVICE_UUID;

    #[tokio::test]
    async fn test_window_keeps_first_seen_order_without_repeats() {
        // (id, advertising) pairs standing in for adapter events
        let events = futures::stream::iter(vec![
            (3, true),
            (1, true),
            (3, true),
            (7, false),
            (2, true),
            (1, true),
        ]);

        let seen = collect_window(events, Duration::from_secs(5), |(id, advertising)| {
            advertising.then_some(id)
        })
        .await;

        assert_eq!(seen, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_window_ends_at_deadline() {
        let events = futures::stream::iter(vec![9u32]).chain(futures::stream::pending());

        let started = std::time::Instant::now();
        let seen = collect_window(events, Duration::from_millis(50), Some).await;

        assert_eq!(seen, vec![9]);
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_advertisement_fields_empty() {
        let record = advertisement_fields(None, None, &[], &HashMap::new(), &HashMap::new());
        assert!(record.is_empty());
    }

    #[test]
    fn test_advertisement_fields_order_and_values() {
        let mut manufacturer = HashMap::new();
        manufacturer.insert(0x0060u16, vec![0x01, 0x02]);
        manufacturer.insert(0x0006u16, vec![0xff]);

        let mut service_data = HashMap::new();
        service_data.insert(NETWORK_NODE_SERVICE_UUID, vec![0xaa]);

        let record = advertisement_fields(
            Some("DW1001"),
            Some(-4),
            &[NETWORK_NODE_SERVICE_UUID],
            &service_data,
            &manufacturer,
        );

        let codes: Vec<u8> = record.fields().iter().map(|f| f.type_code).collect();
        assert_eq!(
            codes,
            vec![
                ad_type::COMPLETE_128B_SERVICES,
                ad_type::SHORT_LOCAL_NAME,
                ad_type::TX_POWER,
                ad_type::SERVICE_DATA_128B,
                ad_type::MANUFACTURER,
                ad_type::MANUFACTURER,
            ]
        );

        assert_eq!(record.short_local_name(), Some("DW1001"));
        assert_eq!(record.value_text(ad_type::TX_POWER), Some("-4"));
        assert_eq!(
            record.value_text(ad_type::SERVICE_DATA_128B),
            Some("680c21d9-c946-4c1f-9c11-baa1c21329e7 aa")
        );
        // Lowest company id first, little-endian id prefix
        assert_eq!(record.fields()[4].value, "0600ff");
        assert_eq!(record.fields()[5].value, "60000102");
        assert_eq!(record.fields()[5].description, "Manufacturer");
    }
}
