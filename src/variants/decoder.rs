use crate::config::RCRS_LENGTH;
use crate::error::{HaploError, Result};
use crate::variants::types::{
    AlleleLevel, HeteroplasmyCall, Variant, DELETION_MARKER, SPANNING_DELETION,
};

/// A single sample's genotype at one VCF record.
#[derive(Debug, Clone, PartialEq)]
pub struct GenotypeCall {
    /// 1-based record position.
    pub position: u32,
    pub reference: String,
    /// Called alleles in GT order; `None` is a missing allele.
    pub alleles: Vec<Option<String>>,
    pub depth: Option<u32>,
    /// Raw `AF` value, comma separated.
    pub allele_frequency: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zygosity {
    NoCall,
    HomRef,
    HomVar,
    Het,
}

impl GenotypeCall {
    /// Build a call from allele strings, `.` marking a missing allele.
    pub fn new(position: u32, reference: &str, alleles: &[&str]) -> Self {
        Self {
            position,
            reference: reference.to_string(),
            alleles: alleles
                .iter()
                .map(|a| (*a != ".").then(|| a.to_string()))
                .collect(),
            depth: None,
            allele_frequency: None,
        }
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_allele_frequency(mut self, af: &str) -> Self {
        self.allele_frequency = Some(af.to_string());
        self
    }

    pub fn ploidy(&self) -> usize {
        self.alleles.len()
    }

    pub fn zygosity(&self) -> Zygosity {
        let called: Option<Vec<&str>> = self.alleles.iter().map(|a| a.as_deref()).collect();
        let Some(called) = called else {
            return Zygosity::NoCall;
        };
        let Some(first) = called.first() else {
            return Zygosity::NoCall;
        };

        if called.iter().all(|a| a == first) {
            if *first == self.reference {
                Zygosity::HomRef
            } else {
                Zygosity::HomVar
            }
        } else {
            Zygosity::Het
        }
    }
}

/// Turns genotype calls into typed mitochondrial variants.
#[derive(Debug, Clone, Copy)]
pub struct VariantDecoder {
    contig_length: u32,
}

impl Default for VariantDecoder {
    fn default() -> Self {
        Self::new(RCRS_LENGTH)
    }
}

impl VariantDecoder {
    pub fn new(contig_length: u32) -> Self {
        Self { contig_length }
    }

    pub fn decode(&self, call: &GenotypeCall) -> Result<Vec<Variant>> {
        if call.position > self.contig_length {
            tracing::debug!("Decoding call at {} past contig end {}", call.position, self.contig_length);
        }

        match call.zygosity() {
            Zygosity::HomVar => decode_homoplasmy(call),
            Zygosity::Het => decode_heteroplasmy(call),
            Zygosity::HomRef | Zygosity::NoCall => Ok(Vec::new()),
        }
    }
}

fn checked_allele<'a>(allele: &'a str, position: u32) -> Result<&'a str> {
    if allele.is_empty() || !allele.is_ascii() {
        return Err(HaploError::InvalidAllele(format!(
            "'{}' at position {}",
            allele, position
        )));
    }
    Ok(allele)
}

fn reference_base(call: &GenotypeCall) -> Result<char> {
    let reference = checked_allele(&call.reference, call.position)?;
    Ok(reference.as_bytes()[0] as char)
}

fn decode_homoplasmy(call: &GenotypeCall) -> Result<Vec<Variant>> {
    let reference = checked_allele(&call.reference, call.position)?;
    let ref_base = reference_base(call)?;
    // Multi-ploidy calls collapse to the first allele; all alleles agree here anyway.
    let called = call
        .alleles
        .first()
        .and_then(|a| a.as_deref())
        .ok_or_else(|| HaploError::InvalidAllele(format!("no allele at position {}", call.position)))?;
    let called = checked_allele(called, call.position)?;

    let start = call.position;
    let (c, r) = (called.len(), reference.len());
    let mut variants = Vec::new();

    if c == r {
        if c == 1 {
            if called == SPANNING_DELETION {
                variants.push(Variant::deletion(start, ref_base));
            } else {
                variants.push(Variant::substitution(start, ref_base, called.as_bytes()[0] as char));
            }
        } else {
            // Complex genotype, e.g. REF ACA called ACT: only the differing bases are SNPs.
            // The reference base recorded is always the record's first base.
            for (i, (ref_b, alt_b)) in reference.bytes().zip(called.bytes()).enumerate() {
                if ref_b != alt_b {
                    variants.push(Variant::substitution(start + i as u32, ref_base, alt_b as char));
                }
            }
        }
    } else if r > c {
        for i in 0..(r - c) {
            variants.push(Variant::deletion(start + (c + i) as u32, ref_base));
        }
    } else {
        // New bases follow a single-base anchor, otherwise they are taken from the left.
        let inserted = if r == 1 { &called[1..] } else { &called[..c - r] };
        variants.push(Variant::insertion(start, ref_base, inserted));
    }

    Ok(variants
        .into_iter()
        .map(|v| v.with_coverage(call.depth))
        .collect())
}

/// Parse an `AF` list; a missing second value defaults to `1 - first`.
pub fn parse_frequencies(af: &str) -> Result<(f64, f64)> {
    let parse = |value: &str| -> Result<f64> {
        value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| HaploError::InvalidFrequency(af.to_string()))
    };

    // Trailing empty fields are ignored, so "0.3," reads as "0.3".
    let mut splits = af.trim_end_matches(',').split(',');
    let first = parse(splits.next().unwrap_or_default())?;
    let second = match splits.next() {
        Some(value) => parse(value)?,
        None => 1.0 - first,
    };
    Ok((first, second))
}

fn allele_base(allele: &str, position: u32) -> Result<char> {
    if allele == SPANNING_DELETION {
        return Ok(DELETION_MARKER);
    }
    Ok(checked_allele(allele, position)?.as_bytes()[0] as char)
}

fn decode_heteroplasmy(call: &GenotypeCall) -> Result<Vec<Variant>> {
    let Some(af) = call.allele_frequency.as_deref() else {
        tracing::debug!(
            "Skipping heterozygous call at {} without AF annotation",
            call.position
        );
        return Ok(Vec::new());
    };

    let (level, second_level) = parse_frequencies(af)?;
    let ref_base = reference_base(call)?;

    let mut alleles = call.alleles.iter().flatten();
    let (Some(first), Some(second)) = (alleles.next(), alleles.next()) else {
        return Err(HaploError::InvalidAllele(format!(
            "heterozygous call at {} needs two alleles",
            call.position
        )));
    };
    let allele1 = allele_base(first, call.position)?;
    let allele2 = allele_base(second, call.position)?;

    // AF always reports the non-reference level, so it may fall on either side of 0.5.
    let (base, major, minor) = if allele1 == ref_base {
        if level >= 0.5 {
            (
                allele2,
                AlleleLevel { allele: allele2, level },
                AlleleLevel { allele: allele1, level: second_level },
            )
        } else {
            (
                allele2,
                AlleleLevel { allele: allele1, level: second_level },
                AlleleLevel { allele: allele2, level },
            )
        }
    } else {
        // Both alleles non-reference (GT 1/2).
        (
            allele1,
            AlleleLevel { allele: allele1, level },
            AlleleLevel { allele: allele2, level: second_level },
        )
    };

    let variant = Variant::heteroplasmy(
        call.position,
        ref_base,
        HeteroplasmyCall {
            base,
            level,
            major,
            minor,
        },
    )
    .with_coverage(call.depth);

    Ok(vec![variant])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variants::types::{VariantCall, VariantKind};

    fn decode(call: GenotypeCall) -> Vec<Variant> {
        VariantDecoder::default().decode(&call).unwrap()
    }

    #[test]
    fn single_base_substitution_keeps_depth() {
        let variants = decode(GenotypeCall::new(100, "A", &["T"]).with_depth(50));
        assert_eq!(
            variants,
            vec![Variant {
                position: 100,
                reference: 'A',
                coverage: Some(50),
                call: VariantCall::Substitution { base: 'T' },
            }]
        );
    }

    #[test]
    fn diploid_hom_var_collapses_to_one_allele() {
        let variants = decode(GenotypeCall::new(100, "A", &["T", "T"]));
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].called_base(), Some('T'));
    }

    #[test]
    fn spanning_deletion_becomes_deletion() {
        let variants = decode(GenotypeCall::new(150, "C", &["*"]));
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].kind(), VariantKind::Deletion);
        assert_eq!(variants[0].called_base(), Some('d'));
    }

    #[test]
    fn complex_genotype_emits_differing_bases_only() {
        let variants = decode(GenotypeCall::new(500, "ACA", &["GCT"]).with_depth(12));
        let positions: Vec<u32> = variants.iter().map(|v| v.position).collect();
        assert_eq!(positions, vec![500, 502]);
        assert_eq!(variants[1].called_base(), Some('T'));
        assert!(variants.iter().all(|v| v.reference == 'A'));
        assert!(variants.iter().all(|v| v.coverage == Some(12)));
    }

    #[test]
    fn deletion_covers_missing_suffix() {
        let variants = decode(GenotypeCall::new(200, "ACA", &["AC"]));
        assert_eq!(variants, vec![Variant::deletion(202, 'A')]);

        let variants = decode(GenotypeCall::new(200, "ACAG", &["A"]));
        let positions: Vec<u32> = variants.iter().map(|v| v.position).collect();
        assert_eq!(positions, vec![201, 202, 203]);
        assert!(variants.iter().all(|v| v.kind() == VariantKind::Deletion));
    }

    #[test]
    fn insertion_after_single_anchor() {
        let variants = decode(GenotypeCall::new(300, "C", &["CAT"]));
        assert_eq!(variants, vec![Variant::insertion(300, 'C', "AT")]);
    }

    #[test]
    fn insertion_with_longer_reference_is_left_anchored() {
        let variants = decode(GenotypeCall::new(310, "CT", &["CCCT"]));
        assert_eq!(variants, vec![Variant::insertion(310, 'C', "CC")]);
    }

    #[test]
    fn het_without_af_is_skipped() {
        assert!(decode(GenotypeCall::new(400, "A", &["A", "G"])).is_empty());
    }

    #[test]
    fn het_with_minor_non_reference() {
        let variants = decode(GenotypeCall::new(400, "A", &["A", "G"]).with_allele_frequency("0.3"));
        assert_eq!(variants.len(), 1);
        let v = &variants[0];
        assert_eq!(v.kind(), VariantKind::Heteroplasmy);
        assert_eq!(v.heteroplasmy_level(), 0.3);
        assert_eq!(v.called_base(), Some('G'));
        let major = v.major().unwrap();
        let minor = v.minor().unwrap();
        assert_eq!(major.allele, 'A');
        assert!((major.level - 0.7).abs() < 1e-12);
        assert_eq!(minor.allele, 'G');
        assert_eq!(minor.level, 0.3);
    }

    #[test]
    fn het_with_major_non_reference() {
        let variants = decode(GenotypeCall::new(400, "A", &["A", "G"]).with_allele_frequency("0.5"));
        let v = &variants[0];
        assert_eq!(v.major().unwrap().allele, 'G');
        assert_eq!(v.minor().unwrap().allele, 'A');
    }

    #[test]
    fn het_without_reference_keeps_allele_one_major() {
        let variants = decode(
            GenotypeCall::new(400, "A", &["C", "G"]).with_allele_frequency("0.2,0.8"),
        );
        let v = &variants[0];
        assert_eq!(v.major().unwrap(), AlleleLevel { allele: 'C', level: 0.2 });
        assert_eq!(v.minor().unwrap(), AlleleLevel { allele: 'G', level: 0.8 });
    }

    #[test]
    fn het_spanning_deletion_allele() {
        let variants = decode(GenotypeCall::new(400, "A", &["A", "*"]).with_allele_frequency("0.9"));
        assert_eq!(variants[0].major().unwrap().allele, 'd');
    }

    #[test]
    fn bad_frequency_is_an_error() {
        let call = GenotypeCall::new(400, "A", &["A", "G"]).with_allele_frequency("abc");
        assert!(matches!(
            VariantDecoder::default().decode(&call),
            Err(HaploError::InvalidFrequency(_))
        ));
    }

    #[test]
    fn trailing_empty_frequency_is_ignored() {
        let (first, second) = parse_frequencies("0.3,").unwrap();
        assert_eq!(first, 0.3);
        assert!((second - 0.7).abs() < 1e-12);

        let variants = decode(GenotypeCall::new(400, "A", &["A", "G"]).with_allele_frequency("0.3,"));
        assert_eq!(variants[0].minor().unwrap().allele, 'G');
    }

    #[test]
    fn hom_ref_and_no_call_yield_nothing() {
        assert!(decode(GenotypeCall::new(10, "A", &["A"])).is_empty());
        assert!(decode(GenotypeCall::new(10, "A", &[".", "."])).is_empty());
    }

    #[test]
    fn out_of_range_position_is_still_recorded() {
        let variants = decode(GenotypeCall::new(16570, "A", &["G"]));
        assert_eq!(variants.len(), 1);
    }

    #[test]
    fn decoding_is_deterministic() {
        let call = GenotypeCall::new(200, "ACAG", &["A"]).with_depth(3);
        assert_eq!(decode(call.clone()), decode(call));
    }
}
