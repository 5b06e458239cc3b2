use crate::variants::ranges::SampleRanges;
use crate::variants::sample::Sample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentPolicy {
    /// Each fragment keeps only the variants inside its own sub-range.
    Bucketed,
    /// Each fragment keeps the complete variant set.
    Replicate,
}

/// Split `sample` into one derived sample per sub-range of `fragments`.
///
/// Derived ids are `<id>_Frag_<start>`. With [`FragmentPolicy::Bucketed`] a
/// variant outside every sub-range is dropped; fragments that receive no
/// variants are still returned.
pub fn split_fragments(sample: &Sample, fragments: &SampleRanges, policy: FragmentPolicy) -> Vec<Sample> {
    let mut derived: Vec<Sample> = fragments
        .starts()
        .enumerate()
        .map(|(index, start)| {
            let range = fragments.subrange(index).unwrap_or_default();
            Sample::new(format!("{}_Frag_{}", sample.id(), start), range)
        })
        .collect();

    match policy {
        FragmentPolicy::Replicate => {
            for fragment in &mut derived {
                fragment.extend(sample.variants().cloned());
            }
        }
        FragmentPolicy::Bucketed => {
            for variant in sample.variants() {
                match fragments.subrange_id(variant.position) {
                    Some(index) => derived[index].add_variant(variant.clone()),
                    None => tracing::debug!(
                        "{}: variant at {} is outside every fragment",
                        sample.id(),
                        variant.position
                    ),
                }
            }
        }
    }

    derived
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variants::types::Variant;

    fn sample() -> Sample {
        let mut s = Sample::new("S1", SampleRanges::full(16569));
        s.extend([
            Variant::substitution(73, 'A', 'G'),
            Variant::substitution(263, 'A', 'G'),
            Variant::substitution(16519, 'T', 'C'),
        ]);
        s
    }

    #[test]
    fn bucketed_assigns_by_subrange() {
        let fragments: SampleRanges = "16000-16569;1-200;5000-6000".parse().unwrap();
        let derived = split_fragments(&sample(), &fragments, FragmentPolicy::Bucketed);

        assert_eq!(derived.len(), 3);
        assert_eq!(derived[0].id(), "S1_Frag_16000");
        assert_eq!(derived[0].variants().map(|v| v.position).collect::<Vec<_>>(), vec![16519]);
        assert_eq!(derived[1].variants().map(|v| v.position).collect::<Vec<_>>(), vec![73]);
        assert!(derived[2].is_empty());
        assert_eq!(derived[2].range().to_string(), "5000-6000;");
    }

    #[test]
    fn replicate_copies_everything() {
        let fragments: SampleRanges = "1-8000;8001-16569".parse().unwrap();
        let derived = split_fragments(&sample(), &fragments, FragmentPolicy::Replicate);

        assert_eq!(derived.len(), 2);
        assert!(derived.iter().all(|d| d.len() == 3));
        assert_eq!(derived[1].id(), "S1_Frag_8001");
        assert_eq!(derived[1].range().to_string(), "8001-16569;");
    }
}
