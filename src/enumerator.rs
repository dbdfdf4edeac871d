//! Per-device GATT enumeration.
//!
//! Drives connect → service discovery → characteristic discovery →
//! disconnect for one candidate. Only a connect failure ends the device.
//! A failure to list services is recorded on the device report, and a
//! failure on one service or one characteristic read is recorded where it
//! happened while the walk moves on.

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ble::transport::{Connection, Transport};
use crate::ble::uuids::is_network_node_service;
use crate::data::{CharacteristicDescriptor, DeviceReport, ScanCandidate, ServiceDescriptor};
use crate::error::{EnumerationFailure, EnumerationStage, Result};
use crate::protocol::{is_decoded, NodeValue};

/// Turns one candidate into a device report.
#[async_trait]
pub trait Enumerate: Send + Sync {
    /// Enumerate one candidate.
    async fn enumerate(
        &self,
        candidate: &ScanCandidate,
    ) -> std::result::Result<DeviceReport, EnumerationFailure>;
}

/// Enumerates candidates over a [`Transport`], one connection at a time.
pub struct DeviceEnumerator<'a, T> {
    transport: &'a T,
    read_values: bool,
}

impl<'a, T: Transport> DeviceEnumerator<'a, T> {
    /// Create an enumerator over a transport. Network Node values are read.
    pub fn new(transport: &'a T) -> Self {
        Self {
            transport,
            read_values: true,
        }
    }

    /// Enable or disable reading Network Node characteristic values.
    pub fn with_value_reads(mut self, enabled: bool) -> Self {
        self.read_values = enabled;
        self
    }
}

#[async_trait]
impl<'a, T: Transport> Enumerate for DeviceEnumerator<'a, T> {
    async fn enumerate(
        &self,
        candidate: &ScanCandidate,
    ) -> std::result::Result<DeviceReport, EnumerationFailure> {
        let address = candidate.address.as_str();

        info!("Connecting to device {}", address);
        let mut connection = self.transport.connect(address).await.map_err(|e| {
            warn!("Could not connect to {}: {}", address, e);
            EnumerationFailure::new(address, EnumerationStage::Connect, e)
        })?;

        let discovered = discover_services(&mut connection, address, self.read_values).await;

        // Closed on every path once the connection exists.
        if let Err(e) = connection.close().await {
            warn!("Failed to disconnect from {}: {}", address, e);
        }

        let report = match discovered {
            Ok(services) => DeviceReport::new(candidate.clone(), services),
            Err(e) => {
                warn!("Could not list services of {}: {}", address, e);
                DeviceReport::discovery_failed(candidate.clone(), e.to_string())
            }
        };

        Ok(report)
    }
}

/// Walk the service table of an open connection in discovery order.
async fn discover_services<C: Connection>(
    connection: &mut C,
    address: &str,
    read_values: bool,
) -> Result<Vec<ServiceDescriptor>> {
    debug!("Getting services for {}", address);
    let uuids = connection.services().await?;

    let mut services = Vec::with_capacity(uuids.len());
    for uuid in uuids {
        debug!("Getting characteristics for service {}", uuid);

        let service = match connection.characteristics(&uuid).await {
            Ok(characteristics) => {
                let read_here = read_values && is_network_node_service(&uuid);
                let mut descriptors = Vec::with_capacity(characteristics.len());
                for characteristic in characteristics {
                    debug!("\tCharacteristic UUID: {}", characteristic);
                    let descriptor = if read_here && is_decoded(&characteristic) {
                        read_value(connection, &uuid, characteristic, address).await
                    } else {
                        CharacteristicDescriptor::new(characteristic)
                    };
                    descriptors.push(descriptor);
                }
                ServiceDescriptor::new(uuid, descriptors)
            }
            Err(e) => {
                warn!(
                    "Failed to list characteristics of service {} on {}: {}",
                    uuid, address, e
                );
                ServiceDescriptor::failed(uuid, e.to_string())
            }
        };

        services.push(service);
    }

    Ok(services)
}

/// Read and decode one characteristic, recording any failure on it.
async fn read_value<C: Connection>(
    connection: &mut C,
    service: &Uuid,
    characteristic: Uuid,
    address: &str,
) -> CharacteristicDescriptor {
    let decoded = match connection.read(service, &characteristic).await {
        Ok(bytes) => NodeValue::decode(&characteristic, &bytes),
        Err(e) => Err(e),
    };

    match decoded {
        Ok(Some(value)) => {
            debug!("\t\tValue: {}", value);
            CharacteristicDescriptor::with_value(characteristic, value)
        }
        Ok(None) => CharacteristicDescriptor::new(characteristic),
        Err(e) => {
            warn!(
                "Failed to read characteristic {} on {}: {}",
                characteristic, address, e
            );
            CharacteristicDescriptor::read_failed(characteristic, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ble::advertising::{AddressType, AdvertisementRecord};
    use crate::ble::mock::{MockDevice, MockTransport};
    use crate::ble::uuids::*;
    use pretty_assertions::assert_eq;

    const ADDRESS: &str = "c4:3e:8a:01:02:03";

    fn candidate() -> ScanCandidate {
        ScanCandidate::new(
            ADDRESS,
            AddressType::Random,
            0,
            -58,
            true,
            AdvertisementRecord::default(),
        )
    }

    #[tokio::test]
    async fn test_connect_failure_is_terminal() {
        let transport =
            MockTransport::new().with_device(ADDRESS, MockDevice::new().unreachable("no ack"));
        let enumerator = DeviceEnumerator::new(&transport);

        let failure = enumerator.enumerate(&candidate()).await.unwrap_err();
        assert_eq!(failure.address, ADDRESS);
        assert_eq!(failure.stage, EnumerationStage::Connect);
        assert!(failure.cause.contains("no ack"));
        assert_eq!(transport.connect_count(), 0);
        assert_eq!(transport.close_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_device_is_connect_failure() {
        let transport = MockTransport::new();
        let enumerator = DeviceEnumerator::new(&transport);

        let failure = enumerator.enumerate(&candidate()).await.unwrap_err();
        assert_eq!(failure.stage, EnumerationStage::Connect);
    }

    #[tokio::test]
    async fn test_failed_service_does_not_abort_siblings() {
        let transport = MockTransport::new().with_device(
            ADDRESS,
            MockDevice::new()
                .with_failing_service(GENERIC_ACCESS_SERVICE_UUID, "insufficient authentication")
                .with_service(
                    NETWORK_NODE_SERVICE_UUID,
                    vec![OPERATION_MODE_UUID, NETWORK_ID_UUID],
                ),
        );
        let enumerator = DeviceEnumerator::new(&transport);

        let report = enumerator.enumerate(&candidate()).await.unwrap();
        assert_eq!(report.services.len(), 2);

        let failed = &report.services[0];
        assert_eq!(failed.uuid, GENERIC_ACCESS_SERVICE_UUID);
        assert!(failed.characteristics.is_empty());
        assert!(failed
            .failure
            .as_deref()
            .unwrap()
            .contains("insufficient authentication"));

        let populated = &report.services[1];
        assert!(populated.is_complete());
        assert_eq!(
            populated.characteristic_uuids(),
            vec![OPERATION_MODE_UUID, NETWORK_ID_UUID]
        );
        assert_eq!(transport.close_count(), 1);
    }

    #[tokio::test]
    async fn test_service_list_failure_keeps_connected_device() {
        let transport = MockTransport::new().with_device(
            ADDRESS,
            MockDevice::new().with_service_list_error("link lost"),
        );
        let enumerator = DeviceEnumerator::new(&transport);

        let report = enumerator.enumerate(&candidate()).await.unwrap();
        assert_eq!(report.candidate, candidate());
        assert!(report.services.is_empty());
        assert!(!report.is_complete());
        assert!(report
            .discovery_failure
            .as_deref()
            .unwrap()
            .contains("link lost"));
        assert_eq!(transport.connect_count(), 1);
        assert_eq!(transport.close_count(), 1);
    }

    #[tokio::test]
    async fn test_network_node_values_are_decoded() {
        let transport = MockTransport::new().with_device(
            ADDRESS,
            MockDevice::new()
                .with_service(GENERIC_ACCESS_SERVICE_UUID, vec![NETWORK_ID_UUID])
                .with_service(
                    NETWORK_NODE_SERVICE_UUID,
                    vec![
                        OPERATION_MODE_UUID,
                        NETWORK_ID_UUID,
                        LOCATION_DATA_UUID,
                        DEVICE_INFO_UUID,
                        STATISTICS_UUID,
                    ],
                )
                .with_value(OPERATION_MODE_UUID, [0b1100_0000, 0x80])
                .with_value(NETWORK_ID_UUID, [0x34, 0x12])
                .with_read_error(LOCATION_DATA_UUID, "insufficient authorization")
                .with_value(DEVICE_INFO_UUID, [0x01, 0x02]),
        );
        let enumerator = DeviceEnumerator::new(&transport);

        let report = enumerator.enumerate(&candidate()).await.unwrap();

        // Values are only read under the Network Node service
        assert_eq!(report.services[0].characteristics[0].value, None);

        let node = &report.services[1];
        assert!(matches!(
            node.characteristics[0].value,
            Some(NodeValue::OperationMode(_))
        ));
        assert_eq!(
            node.characteristics[1].value,
            Some(NodeValue::NetworkId(Some(0x1234)))
        );
        assert!(node.characteristics[2]
            .read_failure
            .as_deref()
            .unwrap()
            .contains("insufficient authorization"));
        assert!(node.characteristics[3]
            .read_failure
            .as_deref()
            .unwrap()
            .contains("Device info too short"));
        assert_eq!(node.characteristics[4].value, None);
        assert_eq!(node.characteristics[4].read_failure, None);
        assert_eq!(node.failed_read_count(), 2);

        // Statistics has no decoder and is never read
        assert_eq!(transport.read_count(), 4);
        assert_eq!(transport.close_count(), 1);
    }

    #[tokio::test]
    async fn test_value_reads_can_be_disabled() {
        let transport = MockTransport::new().with_device(
            ADDRESS,
            MockDevice::new()
                .with_service(NETWORK_NODE_SERVICE_UUID, vec![NETWORK_ID_UUID])
                .with_value(NETWORK_ID_UUID, [0x34, 0x12]),
        );
        let enumerator = DeviceEnumerator::new(&transport).with_value_reads(false);

        let report = enumerator.enumerate(&candidate()).await.unwrap();
        assert_eq!(report.services[0].characteristics[0].value, None);
        assert_eq!(transport.read_count(), 0);
    }

    #[tokio::test]
    async fn test_close_called_once_per_enumeration() {
        let scripts = vec![
            MockDevice::new(),
            MockDevice::new().with_service(NETWORK_NODE_SERVICE_UUID, vec![LOCATION_DATA_UUID]),
            MockDevice::new().with_failing_service(NETWORK_NODE_SERVICE_UUID, "busy"),
            MockDevice::new().with_service_list_error("link lost"),
            MockDevice::new().with_close_error("already gone"),
        ];

        for script in scripts {
            let transport = MockTransport::new().with_device(ADDRESS, script);
            let enumerator = DeviceEnumerator::new(&transport);
            let _ = enumerator.enumerate(&candidate()).await;
            assert_eq!(transport.close_count(), 1);
        }
    }

    #[tokio::test]
    async fn test_close_error_keeps_report() {
        let transport = MockTransport::new().with_device(
            ADDRESS,
            MockDevice::new()
                .with_service(NETWORK_NODE_SERVICE_UUID, vec![DEVICE_INFO_UUID])
                .with_close_error("already gone"),
        );
        let enumerator = DeviceEnumerator::new(&transport);

        let report = enumerator.enumerate(&candidate()).await.unwrap();
        assert_eq!(report.characteristic_count(), 1);
    }

    #[tokio::test]
    async fn test_order_and_duplicates_preserved() {
        let transport = MockTransport::new().with_device(
            ADDRESS,
            MockDevice::new()
                .with_service(GENERIC_ATTRIBUTE_SERVICE_UUID, Vec::new())
                .with_service(GENERIC_ACCESS_SERVICE_UUID, Vec::new())
                .with_service(
                    NETWORK_NODE_SERVICE_UUID,
                    vec![
                        TAG_UPDATE_RATE_UUID,
                        OPERATION_MODE_UUID,
                        TAG_UPDATE_RATE_UUID,
                    ],
                ),
        );
        let enumerator = DeviceEnumerator::new(&transport);

        let report = enumerator.enumerate(&candidate()).await.unwrap();
        let service_order: Vec<_> = report.services.iter().map(|s| s.uuid).collect();
        assert_eq!(
            service_order,
            vec![
                GENERIC_ATTRIBUTE_SERVICE_UUID,
                GENERIC_ACCESS_SERVICE_UUID,
                NETWORK_NODE_SERVICE_UUID,
            ]
        );
        assert_eq!(
            report.services[2].characteristic_uuids(),
            vec![TAG_UPDATE_RATE_UUID, OPERATION_MODE_UUID, TAG_UPDATE_RATE_UUID]
        );
        assert_eq!(report.candidate, candidate());
    }
}
