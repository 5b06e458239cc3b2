use crate::haplogroup::{Polymorphism, TestSample};
use crate::variants::sample::Sample;
use crate::variants::types::{AlleleLevel, Variant, VariantCall, DELETION_MARKER};

/// Major and minor haplotype profiles derived from one sample.
#[derive(Debug, Clone)]
pub struct SplitProfiles {
    pub major: TestSample,
    pub minor: TestSample,
}

/// Split a sample into `<id>_maj` and `<id>_min` search profiles.
///
/// Homoplasmic variants go to both profiles; heteroplasmies contribute their
/// major allele to the first and their minor allele to the second, unless that
/// allele is the reference base.
pub fn split_profiles(sample: &Sample) -> SplitProfiles {
    let mut major = Vec::new();
    let mut minor = Vec::new();

    for variant in sample.variants() {
        match &variant.call {
            VariantCall::Heteroplasmy(het) => {
                major.extend(allele_polymorphism(variant, het.major));
                minor.extend(allele_polymorphism(variant, het.minor));
            }
            _ => {
                if let Some(poly) = homoplasmy_polymorphism(variant) {
                    major.push(poly.clone());
                    minor.push(poly);
                }
            }
        }
    }

    let range = sample.range().clone();
    SplitProfiles {
        major: TestSample::new(&format!("{}_maj", sample.id()), major, range.clone()),
        minor: TestSample::new(&format!("{}_min", sample.id()), minor, range),
    }
}

fn homoplasmy_polymorphism(variant: &Variant) -> Option<Polymorphism> {
    match &variant.call {
        VariantCall::Substitution { base } => Some(Polymorphism::new(variant.position, base.to_string())),
        VariantCall::Deletion => Some(Polymorphism::new(variant.position, DELETION_MARKER.to_string())),
        VariantCall::Insertion { sequence } => Some(Polymorphism::new(variant.position, format!(".1{}", sequence))),
        VariantCall::Heteroplasmy(_) => None,
    }
}

fn allele_polymorphism(variant: &Variant, allele: AlleleLevel) -> Option<Polymorphism> {
    (allele.allele != variant.reference).then(|| Polymorphism::new(variant.position, allele.allele.to_string()))
}
