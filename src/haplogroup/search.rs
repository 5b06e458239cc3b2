use crate::haplogroup::test_sample::Profile;
use crate::haplogroup::types::{Haplogroup, RankedResult};
use std::ops::Range;

/// Ranking applied by the search service (e.g. Kulczynski, Hamming).
pub trait RankingMethod: Send + Sync {
    fn name(&self) -> &str;
}

/// Phylogenetic search over an immutable, externally loaded tree.
///
/// Implementations are shared by reference across worker threads and must not
/// mutate the tree while searching.
pub trait SearchService: Send + Sync {
    /// Candidates ordered best first.
    fn search(&self, profile: &Profile, ranking: &dyn RankingMethod) -> anyhow::Result<Vec<RankedResult>>;
}

/// Ranked candidates together with their equal-distance clusters.
///
/// Clusters are derived from the ranked list on construction and cannot be
/// changed on their own.
#[derive(Debug, Clone, Default)]
pub struct RankedResults {
    ranked: Vec<RankedResult>,
    clusters: Vec<Range<usize>>,
}

impl RankedResults {
    pub fn new(ranked: Vec<RankedResult>, tie_epsilon: f64) -> Self {
        let clusters = cluster_by_distance(&ranked, tie_epsilon);
        Self { ranked, clusters }
    }

    pub fn ranked(&self) -> &[RankedResult] {
        &self.ranked
    }

    pub fn top(&self) -> Option<&RankedResult> {
        self.ranked.first()
    }

    pub fn get(&self, haplogroup: &Haplogroup) -> Option<&RankedResult> {
        self.ranked.iter().find(|r| &r.haplogroup == haplogroup)
    }

    /// All candidates sharing the distance of `haplogroup`, itself included.
    pub fn cluster_of(&self, haplogroup: &Haplogroup) -> Option<&[RankedResult]> {
        let index = self.ranked.iter().position(|r| &r.haplogroup == haplogroup)?;
        self.clusters
            .iter()
            .find(|range| range.contains(&index))
            .map(|range| &self.ranked[range.clone()])
    }

    pub fn clusters(&self) -> impl Iterator<Item = &[RankedResult]> {
        self.clusters.iter().map(|range| &self.ranked[range.clone()])
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }
}

/// Group consecutive candidates whose distances differ by at most `epsilon`.
fn cluster_by_distance(ranked: &[RankedResult], epsilon: f64) -> Vec<Range<usize>> {
    let mut clusters = Vec::new();
    let mut start = 0;

    for i in 1..=ranked.len() {
        let boundary = i == ranked.len() || (ranked[i].distance - ranked[start].distance).abs() > epsilon;
        if boundary {
            clusters.push(start..i);
            start = i;
        }
    }

    clusters
}
