//! Hand-off to the contamination detector, which compares a sample's major
//! and minor haplotype classifications.

use crate::haplogroup::TestSample;
use crate::variants::{split_profiles, Sample, SplitProfiles};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContaminationStatus {
    Yes,
    No,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContaminationVerdict {
    pub sample_id: String,
    pub status: ContaminationStatus,
    pub distance: u32,
}

/// A raw sample with its classified major and minor profiles.
#[derive(Debug, Clone, Copy)]
pub struct ClassifiedSample<'a> {
    pub ledger: &'a Sample,
    pub major: &'a TestSample,
    pub minor: &'a TestSample,
}

impl<'a> ClassifiedSample<'a> {
    pub fn new(ledger: &'a Sample, profiles: &'a SplitProfiles) -> Self {
        Self {
            ledger,
            major: &profiles.major,
            minor: &profiles.minor,
        }
    }

    /// Both profiles have been searched.
    pub fn is_classified(&self) -> bool {
        self.major.top_result().is_some() && self.minor.top_result().is_some()
    }
}

pub trait ContaminationDetector {
    fn detect(&self, sample: &ClassifiedSample<'_>) -> anyhow::Result<ContaminationVerdict>;
}

/// Split every sample into profiles ready for classification, keyed in the
/// same order as `samples`.
pub fn prepare_profiles<'a, I>(samples: I) -> Vec<(&'a Sample, SplitProfiles)>
where
    I: IntoIterator<Item = &'a Sample>,
{
    samples
        .into_iter()
        .map(|sample| (sample, split_profiles(sample)))
        .collect()
}

/// Run `detector` over classified samples; unclassified ones are skipped and
/// failures are logged without stopping the rest.
pub fn detect_all(detector: &dyn ContaminationDetector, classified: &[(&Sample, SplitProfiles)]) -> Vec<ContaminationVerdict> {
    classified
        .iter()
        .map(|(ledger, profiles)| ClassifiedSample::new(ledger, profiles))
        .filter(|sample| {
            let ready = sample.is_classified();
            if !ready {
                tracing::debug!("{}: profiles not classified, skipping", sample.ledger.id());
            }
            ready
        })
        .filter_map(|sample| match detector.detect(&sample) {
            Ok(verdict) => Some(verdict),
            Err(e) => {
                tracing::warn!("Contamination check failed for {}: {}", sample.ledger.id(), e);
                None
            }
        })
        .collect()
}
