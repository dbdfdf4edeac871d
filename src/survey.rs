//! Survey orchestration.
//!
//! A survey is one scan pass, the classifier filter, sequential enumeration
//! of every match, and a single report write at the end.

use tracing::info;

use crate::ble::advertising::AdvertisementClassifier;
use crate::ble::filter::filter_candidates;
use crate::ble::transport::Transport;
use crate::builder::{build_report, BuildOutcome};
use crate::config::SurveyConfig;
use crate::data::ScanReport;
use crate::enumerator::DeviceEnumerator;
use crate::error::{EnumerationFailure, Result};
use crate::writer::ReportWriter;

/// Summary of a survey run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyOutcome {
    /// Advertisements seen by the scan, before filtering.
    pub scanned: usize,
    /// Devices that accepted a connection.
    pub report: ScanReport,
    /// Matching devices that produced no report.
    pub failures: Vec<EnumerationFailure>,
}

impl SurveyOutcome {
    fn from_build(scanned: usize, build: BuildOutcome) -> Self {
        Self {
            scanned,
            report: build.report,
            failures: build.failures,
        }
    }

    /// Number of matching devices that were attempted.
    pub fn attempted(&self) -> usize {
        self.report.len() + self.failures.len()
    }

    /// Number of devices in the report.
    pub fn succeeded(&self) -> usize {
        self.report.len()
    }
}

/// Runs the discover, filter and enumerate pipeline over a transport.
pub struct Survey<T> {
    transport: T,
    classifier: AdvertisementClassifier,
    read_values: bool,
}

impl<T: Transport> Survey<T> {
    /// Create a survey using the name prefix and value reads from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`](crate::Error::InvalidParameter)
    /// if the configuration does not validate.
    pub fn new(transport: T, config: &SurveyConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self::with_classifier(
            transport,
            AdvertisementClassifier::with_prefix(config.name_prefix.clone()),
        )
        .with_value_reads(config.read_values))
    }

    /// Create a survey with an explicit classifier. Characteristic values
    /// are read.
    pub fn with_classifier(transport: T, classifier: AdvertisementClassifier) -> Self {
        Self {
            transport,
            classifier,
            read_values: true,
        }
    }

    /// Enable or disable reading Network Node characteristic values.
    pub fn with_value_reads(mut self, enabled: bool) -> Self {
        self.read_values = enabled;
        self
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Scan, filter and enumerate without writing anything.
    ///
    /// # Errors
    ///
    /// Returns an error only if the scan itself fails. Per-device failures
    /// are collected in the outcome.
    pub async fn collect(&self) -> Result<SurveyOutcome> {
        let scanned = self.transport.scan().await?;
        let scanned_count = scanned.len();

        let candidates = filter_candidates(scanned, &self.classifier);
        info!(
            "Found {} Decawave devices among {} advertisements",
            candidates.len(),
            scanned_count
        );

        let enumerator =
            DeviceEnumerator::new(&self.transport).with_value_reads(self.read_values);
        let build = build_report(&candidates, &enumerator).await;

        Ok(SurveyOutcome::from_build(scanned_count, build))
    }

    /// Run the full survey and hand the report to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the scan fails or the report cannot be written.
    pub async fn run<W>(&self, writer: &W) -> Result<SurveyOutcome>
    where
        W: ReportWriter + ?Sized,
    {
        let outcome = self.collect().await?;
        writer.write(&outcome.report)?;

        info!(
            "Survey complete: {} of {} devices reported",
            outcome.succeeded(),
            outcome.attempted()
        );

        Ok(outcome)
    }
}
