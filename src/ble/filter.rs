//! Scan result filtering.

use tracing::debug;

use crate::ble::advertising::AdvertisementClassifier;
use crate::data::ScanCandidate;

/// Keep the candidates whose advertisement the classifier accepts.
///
/// Order is preserved. Entries are not deduplicated by address: two
/// observations of the same device are both kept.
pub fn filter_candidates<I>(candidates: I, classifier: &AdvertisementClassifier) -> Vec<ScanCandidate>
where
    I: IntoIterator<Item = ScanCandidate>,
{
    candidates
        .into_iter()
        .filter(|candidate| {
            let matched = classifier.classify(&candidate.advertisement);
            if !matched {
                debug!("Skipping {} ({:?})", candidate.address, candidate.device_name());
            }
            matched
        })
        .collect()
}
