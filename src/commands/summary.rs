use crate::config::Config;
use crate::variants::{Sample, SampleStats};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SampleSummary<'a> {
    pub id: &'a str,
    pub range: String,
    #[serde(flatten)]
    pub stats: &'a SampleStats,
}

impl<'a> From<&'a Sample> for SampleSummary<'a> {
    fn from(sample: &'a Sample) -> Self {
        Self {
            id: sample.id(),
            range: sample.range().to_string(),
            stats: sample.stats(),
        }
    }
}

pub fn run(config: &Config, vcf_file: String, chip: bool) -> Result<()> {
    let imported = super::import_samples(config, &vcf_file, chip)?;

    let summaries: Vec<SampleSummary> = imported.samples.values().map(SampleSummary::from).collect();
    println!("{}", serde_json::to_string_pretty(&summaries)?);

    Ok(())
}
