use crate::variants::ranges::SampleRanges;
use crate::variants::types::{Variant, VariantKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// One sample's variants keyed by position, plus running aggregates.
///
/// Counters are bumped on every [`Sample::add_variant`] call and never
/// recomputed, so overwriting a position still counts the second insert.
#[derive(Debug, Clone)]
pub struct Sample {
    id: String,
    range: SampleRanges,
    variants: BTreeMap<u32, Variant>,
    stats: SampleStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SampleStats {
    pub variants: u32,
    pub substitutions: u32,
    pub heteroplasmies: u32,
    pub coverage_sum: f64,
    pub heteroplasmy_level_sum: f64,
}

impl Sample {
    pub fn new(id: impl Into<String>, range: SampleRanges) -> Self {
        Self {
            id: id.into(),
            range,
            variants: BTreeMap::new(),
            stats: SampleStats::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn range(&self) -> &SampleRanges {
        &self.range
    }

    pub fn add_variant(&mut self, variant: Variant) {
        self.stats.variants += 1;
        match variant.kind() {
            VariantKind::Substitution => self.stats.substitutions += 1,
            VariantKind::Heteroplasmy => {
                self.stats.heteroplasmies += 1;
                self.stats.heteroplasmy_level_sum += variant.heteroplasmy_level();
            }
            VariantKind::Deletion | VariantKind::Insertion => {}
        }
        self.stats.coverage_sum += f64::from(variant.coverage.unwrap_or(0));

        self.variants.insert(variant.position, variant);
    }

    /// Variants in ascending position order.
    pub fn variants(&self) -> impl Iterator<Item = &Variant> {
        self.variants.values()
    }

    pub fn variant(&self, position: u32) -> Option<&Variant> {
        self.variants.get(&position)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn stats(&self) -> &SampleStats {
        &self.stats
    }
}

impl Extend<Variant> for Sample {
    fn extend<T: IntoIterator<Item = Variant>>(&mut self, iter: T) {
        for variant in iter {
            self.add_variant(variant);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variants::types::{AlleleLevel, HeteroplasmyCall};

    fn sample() -> Sample {
        Sample::new("S1", SampleRanges::full(16569))
    }

    #[test]
    fn last_write_wins_per_position() {
        let mut s = sample();
        s.add_variant(Variant::substitution(73, 'A', 'G'));
        s.add_variant(Variant::deletion(73, 'A'));

        assert_eq!(s.len(), 1);
        assert_eq!(s.variant(73).unwrap().kind(), VariantKind::Deletion);
        assert_eq!(s.stats().variants, 2);
        assert_eq!(s.stats().substitutions, 1);
    }

    #[test]
    fn variants_iterate_in_position_order() {
        let mut s = sample();
        s.extend([
            Variant::substitution(16519, 'T', 'C'),
            Variant::substitution(73, 'A', 'G'),
            Variant::insertion(315, 'C', "C"),
        ]);
        let positions: Vec<u32> = s.variants().map(|v| v.position).collect();
        assert_eq!(positions, vec![73, 315, 16519]);
    }

    #[test]
    fn aggregates_track_heteroplasmy_and_coverage() {
        let mut s = sample();
        s.add_variant(Variant::substitution(73, 'A', 'G').with_coverage(Some(40)));
        s.add_variant(
            Variant::heteroplasmy(
                152,
                'T',
                HeteroplasmyCall {
                    base: 'C',
                    level: 0.25,
                    major: AlleleLevel { allele: 'T', level: 0.75 },
                    minor: AlleleLevel { allele: 'C', level: 0.25 },
                },
            )
            .with_coverage(Some(60)),
        );

        let stats = s.stats();
        assert_eq!(stats.variants, 2);
        assert_eq!(stats.heteroplasmies, 1);
        assert_eq!(stats.coverage_sum, 100.0);
        assert_eq!(stats.heteroplasmy_level_sum, 0.25);
    }
}
