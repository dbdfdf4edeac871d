//! Report assembly.
//!
//! Runs an [`Enumerate`] implementation over the filtered candidates, one
//! at a time and in order, and folds the results into a [`ScanReport`].

use tracing::{info, warn};

use crate::data::{DeviceReport, ScanCandidate, ScanReport};
use crate::enumerator::Enumerate;
use crate::error::EnumerationFailure;

/// Result of assembling a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    /// Devices that accepted a connection, in candidate order.
    pub report: ScanReport,
    /// Candidates that produced no device report, in candidate order.
    pub failures: Vec<EnumerationFailure>,
}

impl BuildOutcome {
    /// Number of candidates that were enumerated.
    pub fn attempted(&self) -> usize {
        self.report.len() + self.failures.len()
    }

    /// Number of candidates that produced a device report.
    pub fn succeeded(&self) -> usize {
        self.report.len()
    }
}

/// Enumerate every candidate in order and collect the results.
///
/// Enumeration is strictly sequential; no two connections are ever open at
/// once. Failed candidates are left out of the report and returned in
/// [`BuildOutcome::failures`].
pub async fn build_report<E>(candidates: &[ScanCandidate], enumerator: &E) -> BuildOutcome
where
    E: Enumerate + ?Sized,
{
    let mut devices: Vec<DeviceReport> = Vec::with_capacity(candidates.len());
    let mut failures = Vec::new();

    for candidate in candidates {
        match enumerator.enumerate(candidate).await {
            Ok(device) => devices.push(device),
            Err(failure) => {
                warn!("Skipping device: {}", failure);
                failures.push(failure);
            }
        }
    }

    let outcome = BuildOutcome {
        report: ScanReport::new(devices),
        failures,
    };

    info!(
        "Enumerated {} of {} devices",
        outcome.succeeded(),
        outcome.attempted()
    );

    outcome
}
