//! Report persistence.
//!
//! The pipeline hands a finished [`ScanReport`] to a [`ReportWriter`]. The
//! text writer produces the human readable survey file; with the `json`
//! feature a JSON writer is available as well.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::ble::uuids::{known_characteristic_name, known_service_name};
use crate::data::candidate::RSSI_UNAVAILABLE;
use crate::data::{DeviceReport, ScanReport};
use crate::error::{Error, Result};

/// Sink for a finished report.
#[cfg_attr(test, mockall::automock)]
pub trait ReportWriter {
    /// Persist the report.
    fn write(&self, report: &ScanReport) -> Result<()>;
}

/// Writes the report as an indented text document.
#[derive(Debug, Clone)]
pub struct TextReportWriter {
    path: PathBuf,
}

impl TextReportWriter {
    /// Create a writer targeting `path`. Nothing is touched until [`ReportWriter::write`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Destination of the report.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render a report into any writer.
    pub fn render<W: Write>(report: &ScanReport, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "Decawave devices found:")?;
        writeln!(
            out,
            "Generated at: {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;

        for device in &report.devices {
            Self::render_device(device, out)?;
        }

        Ok(())
    }

    fn render_device<W: Write>(device: &DeviceReport, out: &mut W) -> io::Result<()> {
        let candidate = &device.candidate;

        writeln!(out)?;
        writeln!(out, "Device MAC address: {}", candidate.address)?;
        if let Some(name) = candidate.device_name() {
            writeln!(out, "Device name: {}", name)?;
        }
        writeln!(out, "Address type: {}", candidate.address_type)?;
        writeln!(out, "Interface number: {}", candidate.interface_index)?;
        if candidate.signal_strength == RSSI_UNAVAILABLE {
            writeln!(out, "RSSI (dB): unavailable")?;
        } else {
            writeln!(out, "RSSI (dB): {}", candidate.signal_strength)?;
        }
        writeln!(out, "Connectable: {}", candidate.connectable)?;

        for field in candidate.advertisement.fields() {
            writeln!(out)?;
            writeln!(out, "\tType code: {}", field.type_code)?;
            writeln!(out, "\tDesc: {}", field.description)?;
            writeln!(out, "\tValue: {}", field.value)?;
        }

        if let Some(cause) = &device.discovery_failure {
            writeln!(out)?;
            writeln!(out, "\tService discovery failed: {}", cause)?;
        }

        for service in &device.services {
            writeln!(out)?;
            match known_service_name(&service.uuid) {
                Some(name) => writeln!(out, "\tService UUID: {} ({})", service.uuid, name)?,
                None => writeln!(out, "\tService UUID: {}", service.uuid)?,
            }

            if let Some(cause) = &service.failure {
                writeln!(out, "\t\tCharacteristic discovery failed: {}", cause)?;
            }

            for characteristic in &service.characteristics {
                match known_characteristic_name(&characteristic.uuid) {
                    Some(name) => writeln!(
                        out,
                        "\t\tCharacteristic UUID: {} ({})",
                        characteristic.uuid, name
                    )?,
                    None => writeln!(out, "\t\tCharacteristic UUID: {}", characteristic.uuid)?,
                }

                if let Some(value) = &characteristic.value {
                    writeln!(out, "\t\t\tValue: {}", value)?;
                }
                if let Some(cause) = &characteristic.read_failure {
                    writeln!(out, "\t\t\tRead failed: {}", cause)?;
                }
            }
        }

        Ok(())
    }
}

impl ReportWriter for TextReportWriter {
    fn write(&self, report: &ScanReport) -> Result<()> {
        info!("Saving results in {}", self.path.display());

        let to_error = |source| Error::ReportWrite {
            path: self.path.clone(),
            source,
        };

        let file = File::create(&self.path).map_err(to_error)?;
        let mut out = BufWriter::new(file);
        Self::render(report, &mut out).map_err(to_error)?;
        out.flush().map_err(to_error)?;

        Ok(())
    }
}

/// Writes the report as pretty-printed JSON.
#[cfg(feature = "json")]
#[derive(Debug, Clone)]
pub struct JsonReportWriter {
    path: PathBuf,
}

#[cfg(feature = "json")]
impl JsonReportWriter {
    /// Create a writer targeting `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Destination of the report.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(feature = "json")]
impl ReportWriter for JsonReportWriter {
    fn write(&self, report: &ScanReport) -> Result<()> {
        info!("Saving results in {}", self.path.display());

        let to_error = |source| Error::ReportWrite {
            path: self.path.clone(),
            source,
        };

        let file = File::create(&self.path).map_err(to_error)?;
        let mut out = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut out, report).map_err(|e| to_error(e.into()))?;
        out.flush().map_err(to_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ble::advertising::{ad_type, AddressType, AdvertisementField, AdvertisementRecord};
    use crate::ble::uuids::*;
    use crate::data::{CharacteristicDescriptor, ScanCandidate, ServiceDescriptor};
    use crate::protocol::NodeValue;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn sample_report() -> ScanReport {
        let candidate = ScanCandidate::new(
            "c4:3e:8a:01:02:03",
            AddressType::Random,
            0,
            -61,
            true,
            AdvertisementRecord::new(vec![
                AdvertisementField::typed(ad_type::FLAGS, "06"),
                AdvertisementField::typed(ad_type::SHORT_LOCAL_NAME, "DW1001"),
            ]),
        );
        let unknown = Uuid::from_u128(0x1234);
        let device = crate::data::DeviceReport::new(
            candidate,
            vec![
                ServiceDescriptor::new(
                    NETWORK_NODE_SERVICE_UUID,
                    vec![
                        CharacteristicDescriptor::new(OPERATION_MODE_UUID),
                        CharacteristicDescriptor::new(unknown),
                    ],
                ),
                ServiceDescriptor::failed(GENERIC_ACCESS_SERVICE_UUID, "GATT operation failed: busy"),
            ],
        );
        let generated_at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        ScanReport::with_timestamp(vec![device], generated_at)
    }

    fn render_to_string(report: &ScanReport) -> String {
        let mut buf = Vec::new();
        TextReportWriter::render(report, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_render_layout() {
        let expected = "\n\
Decawave devices found:\n\
Generated at: 2024-01-02 03:04:05 UTC\n\
\n\
Device MAC address: c4:3e:8a:01:02:03\n\
Device name: DW1001\n\
Address type: random\n\
Interface number: 0\n\
RSSI (dB): -61\n\
Connectable: true\n\
\n\
\tType code: 1\n\
\tDesc: Flags\n\
\tValue: 06\n\
\n\
\tType code: 8\n\
\tDesc: Short Local Name\n\
\tValue: DW1001\n\
\n\
\tService UUID: 680c21d9-c946-4c1f-9c11-baa1c21329e7 (Network Node)\n\
\t\tCharacteristic UUID: 3f0afd88-7770-46b0-b5e7-9fc099598964 (Operation Mode)\n\
\t\tCharacteristic UUID: 00000000-0000-0000-0000-000000001234\n\
\n\
\tService UUID: 00001800-0000-1000-8000-00805f9b34fb (Generic Access)\n\
\t\tCharacteristic discovery failed: GATT operation failed: busy\n";

        assert_eq!(render_to_string(&sample_report()), expected);
    }

    #[test]
    fn test_render_empty_report() {
        let generated_at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let report = ScanReport::with_timestamp(Vec::new(), generated_at);
        assert_eq!(
            render_to_string(&report),
            "\nDecawave devices found:\nGenerated at: 2024-01-02 03:04:05 UTC\n"
        );
    }

    #[test]
    fn test_render_values_and_read_failures() {
        let mut report = sample_report();
        report.devices[0].services[0].characteristics = vec![
            CharacteristicDescriptor::with_value(
                NETWORK_ID_UUID,
                NodeValue::NetworkId(Some(0x1234)),
            ),
            CharacteristicDescriptor::read_failed(
                LOCATION_DATA_UUID,
                "GATT operation failed: denied",
            ),
        ];

        let text = render_to_string(&report);
        assert!(text.contains(
            "\t\tCharacteristic UUID: 80f9d8bc-3bff-45bb-a181-2d6a37991208 (Network ID)\n\t\t\tValue: 0x1234\n"
        ));
        assert!(text.contains(
            "\t\tCharacteristic UUID: 003bbdf2-c634-4b3d-ab56-7ec889b89a37 (Location Data)\n\t\t\tRead failed: GATT operation failed: denied\n"
        ));
    }

    #[test]
    fn test_render_discovery_failure() {
        let mut report = sample_report();
        let candidate = report.devices[0].candidate.clone();
        report.devices[0] =
            crate::data::DeviceReport::discovery_failed(candidate, "Bluetooth error: link lost");

        let text = render_to_string(&report);
        assert!(text.ends_with(
            "\tValue: DW1001\n\n\tService discovery failed: Bluetooth error: link lost\n"
        ));
        assert!(!text.contains("Service UUID"));
    }

    #[test]
    fn test_render_unavailable_rssi() {
        let mut report = sample_report();
        report.devices[0].candidate.signal_strength = RSSI_UNAVAILABLE;
        assert!(render_to_string(&report).contains("RSSI (dB): unavailable\n"));
    }

    #[test]
    fn test_write_to_file() {
        let path = std::env::temp_dir().join(format!(
            "decawave-survey-{}.txt",
            uuid::Uuid::new_v4()
        ));
        let writer = TextReportWriter::new(&path);
        writer.write(&sample_report()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_to_string(&sample_report()));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_failure_reports_path() {
        let path = std::env::temp_dir()
            .join(format!("missing-{}", uuid::Uuid::new_v4()))
            .join("out.txt");
        let writer = TextReportWriter::new(&path);

        match writer.write(&sample_report()) {
            Err(Error::ReportWrite { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected ReportWrite, got {:?}", other),
        }
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_writer() {
        let path = std::env::temp_dir().join(format!(
            "decawave-survey-{}.json",
            uuid::Uuid::new_v4()
        ));
        JsonReportWriter::new(&path).write(&sample_report()).unwrap();

        let written: ScanReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, sample_report());
        std::fs::remove_file(&path).unwrap();
    }
}
