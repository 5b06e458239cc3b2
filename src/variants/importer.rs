use crate::error::{HaploError, Result};
use crate::variants::decoder::{GenotypeCall, VariantDecoder};
use crate::variants::ranges::SampleRanges;
use crate::variants::sample::Sample;
use rust_htslib::bcf::{self, record::Numeric, Read};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Samples read from one VCF, plus the ones whose import was aborted.
#[derive(Debug, Default)]
pub struct ImportedSamples {
    pub samples: BTreeMap<String, Sample>,
    pub rejected: Vec<HaploError>,
}

pub struct VcfImporter {
    decoder: VariantDecoder,
    contig_length: u32,
    chip: bool,
}

impl VcfImporter {
    pub fn new(contig_length: u32) -> Self {
        Self {
            decoder: VariantDecoder::new(contig_length),
            contig_length,
            chip: false,
        }
    }

    /// Genotyping-array input: only record positions count as covered.
    pub fn chip(mut self, chip: bool) -> Self {
        self.chip = chip;
        self
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<ImportedSamples> {
        let path = path.as_ref();
        let range = if self.chip {
            chip_range(path)?
        } else {
            SampleRanges::full(self.contig_length)
        };

        let mut reader = bcf::Reader::from_path(path)?;
        let sample_ids: Vec<String> = reader
            .header()
            .samples()
            .iter()
            .map(|s| String::from_utf8_lossy(s).into_owned())
            .collect();

        let mut samples: BTreeMap<String, Sample> = sample_ids
            .iter()
            .map(|id| (id.clone(), Sample::new(id.clone(), range.clone())))
            .collect();
        let mut rejected: HashMap<String, HaploError> = HashMap::new();
        let mut records = 0usize;

        for result in reader.records() {
            let record = result?;
            records += 1;
            let position = record.pos() as u32 + 1;
            if position > self.contig_length {
                tracing::warn!(
                    "Position {} outside the range 1-{}. Please double check the VCF includes variants mapped to rCRS only.",
                    position,
                    self.contig_length
                );
            }
            let calls = genotype_calls(&record, sample_ids.len())?;

            for (id, call) in sample_ids.iter().zip(calls) {
                if rejected.contains_key(id) {
                    continue;
                }
                match self.decoder.decode(&call) {
                    Ok(variants) => {
                        if let Some(sample) = samples.get_mut(id) {
                            sample.extend(variants);
                        }
                    }
                    Err(e) => {
                        let e = e.for_sample(id);
                        tracing::warn!("{}", e);
                        samples.remove(id);
                        rejected.insert(id.clone(), e);
                    }
                }
            }
        }

        tracing::info!(
            "Imported {} samples from {} records in {} ({} rejected)",
            samples.len(),
            records,
            path.display(),
            rejected.len()
        );

        let mut rejected: Vec<(String, HaploError)> = rejected.into_iter().collect();
        rejected.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(ImportedSamples {
            samples,
            rejected: rejected.into_iter().map(|(_, e)| e).collect(),
        })
    }
}

impl Default for VcfImporter {
    fn default() -> Self {
        Self::new(crate::config::RCRS_LENGTH)
    }
}

fn chip_range(path: &Path) -> Result<SampleRanges> {
    let mut reader = bcf::Reader::from_path(path)?;
    let mut positions = Vec::new();
    for result in reader.records() {
        positions.push(result?.pos() as u32 + 1);
    }
    Ok(SampleRanges::from_positions(positions))
}

/// One call per sample for a record, in header sample order.
fn genotype_calls(record: &bcf::Record, sample_count: usize) -> Result<Vec<GenotypeCall>> {
    let position = record.pos() as u32 + 1;
    let alleles: Vec<String> = record
        .alleles()
        .iter()
        .map(|a| String::from_utf8_lossy(a).into_owned())
        .collect();
    let reference = alleles.first().cloned().unwrap_or_default();

    let depths = format_depths(record, sample_count);
    let frequencies = format_frequencies(record, sample_count);
    let genotypes = record.genotypes()?;

    let calls = (0..sample_count)
        .map(|i| {
            let called = genotypes
                .get(i)
                .iter()
                .map(|gt| {
                    gt.index()
                        .and_then(|idx| alleles.get(idx as usize))
                        .cloned()
                })
                .collect();
            GenotypeCall {
                position,
                reference: reference.clone(),
                alleles: called,
                depth: depths[i],
                allele_frequency: frequencies[i].clone(),
            }
        })
        .collect();

    Ok(calls)
}

fn format_depths(record: &bcf::Record, sample_count: usize) -> Vec<Option<u32>> {
    match record.format(b"DP").integer() {
        Ok(values) => (0..sample_count)
            .map(|i| {
                values
                    .get(i)
                    .and_then(|v| v.first())
                    .filter(|d| !d.is_missing() && **d >= 0)
                    .map(|d| *d as u32)
            })
            .collect(),
        Err(_) => vec![None; sample_count],
    }
}

/// `AF` as the comma separated text the decoder expects, whether the header
/// declares it as Float or String.
fn format_frequencies(record: &bcf::Record, sample_count: usize) -> Vec<Option<String>> {
    if let Ok(values) = record.format(b"AF").float() {
        return (0..sample_count)
            .map(|i| {
                let present: Vec<String> = values
                    .get(i)
                    .map(|v| v.iter().filter(|f| !f.is_missing() && !f.is_nan()).map(|f| f.to_string()).collect())
                    .unwrap_or_default();
                (!present.is_empty()).then(|| present.join(","))
            })
            .collect();
    }

    if let Ok(values) = record.format(b"AF").string() {
        return (0..sample_count)
            .map(|i| {
                values
                    .get(i)
                    .map(|v| String::from_utf8_lossy(v).trim_end_matches('\0').to_string())
                    .filter(|s| !s.is_empty() && s != ".")
            })
            .collect();
    }

    vec![None; sample_count]
}
