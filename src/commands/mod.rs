pub mod split;
pub mod summary;

use crate::config::Config;
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use crate::variants::{ImportedSamples, VcfImporter};
use anyhow::{Context, Result};

/// Import a VCF behind a spinner; rejected samples are logged by the importer, not fatal.
pub(crate) fn import_samples(config: &Config, vcf_file: &str, chip: bool) -> Result<ImportedSamples> {
    let progress = ProgressBarBuilder::new(format!("Reading {}...", vcf_file))
        .with_tick()
        .build()?;

    let imported = VcfImporter::new(config.contig_length)
        .chip(chip)
        .load(vcf_file)
        .with_context(|| format!("Failed to import {}", vcf_file))?;

    progress.finish_with_message(format!(
        "{} samples imported, {} rejected",
        imported.samples.len(),
        imported.rejected.len()
    ));
    Ok(imported)
}
