use crate::config::Config;
use crate::error::{HaploError, Result};
use crate::haplogroup::search::{RankedResults, RankingMethod, SearchService};
use crate::haplogroup::tree::{PathTreeMerger, PresentationTree};
use crate::haplogroup::types::{Haplogroup, Polymorphism, RankedResult, SearchResultTreeNode};
use crate::variants::ranges::SampleRanges;
use std::fmt;

/// Polymorphisms observed in a sample together with the covered range.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub polymorphisms: Vec<Polymorphism>,
    pub range: SampleRanges,
}

/// One sample under classification: the profile searched against the tree,
/// the expected haplogroup and the latest ranked results.
#[derive(Debug, Clone)]
pub struct TestSample {
    id: String,
    expected: Option<Haplogroup>,
    profile: Profile,
    results: RankedResults,
    tie_epsilon: f64,
    quality_level: u32,
    reset: bool,
}

impl TestSample {
    pub fn new(id: &str, polymorphisms: Vec<Polymorphism>, range: SampleRanges) -> Self {
        Self {
            id: id.replace(' ', "_"),
            expected: None,
            profile: Profile {
                polymorphisms,
                range,
            },
            results: RankedResults::default(),
            tie_epsilon: Config::default().tie_epsilon,
            quality_level: 0,
            reset: false,
        }
    }

    /// Parse a tab separated profile line: `id  range  expected  poly...`.
    ///
    /// `?` and `SEQ` in the expected column mean the haplogroup is unknown.
    pub fn parse(line: &str) -> Result<Self> {
        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() < 3 {
            return Err(HaploError::InvalidColumnCount(columns.len()).for_sample(columns[0].trim()));
        }

        let id = columns[0].trim();
        let parse_rest = || -> Result<Self> {
            let range: SampleRanges = columns[1].replace('"', "").parse()?;
            let polymorphisms = columns[3..]
                .iter()
                .flat_map(|c| c.split_whitespace())
                .map(str::parse::<Polymorphism>)
                .collect::<Result<Vec<Polymorphism>>>()?;

            let mut sample = TestSample::new(id, polymorphisms, range);
            // Ids from profile lines are kept verbatim.
            sample.id = id.to_string();
            sample.expected = match columns[2].trim() {
                "?" | "SEQ" | "" => None,
                name => Some(Haplogroup::new(name)),
            };
            Ok(sample)
        };

        parse_rest().map_err(|e| e.for_sample(id))
    }

    pub fn with_tie_epsilon(mut self, tie_epsilon: f64) -> Self {
        self.set_tie_epsilon(tie_epsilon);
        self
    }

    pub fn with_config(self, config: &Config) -> Self {
        self.with_tie_epsilon(config.tie_epsilon)
    }

    /// Change the tie threshold; existing results are re-clustered.
    pub fn set_tie_epsilon(&mut self, tie_epsilon: f64) {
        self.tie_epsilon = tie_epsilon;
        self.results = RankedResults::new(self.results.ranked().to_vec(), tie_epsilon);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn expected_haplogroup(&self) -> Option<&Haplogroup> {
        self.expected.as_ref()
    }

    pub fn set_expected_haplogroup(&mut self, expected: Option<Haplogroup>) {
        self.expected = expected;
    }

    /// Haplogroup of the best ranked result, if a search has run.
    pub fn detected_haplogroup(&self) -> Option<&Haplogroup> {
        self.results.top().map(|r| &r.haplogroup)
    }

    pub fn top_result(&self) -> Option<&RankedResult> {
        self.results.top()
    }

    pub fn results(&self) -> &RankedResults {
        &self.results
    }

    pub fn result(&self, haplogroup: &Haplogroup) -> Option<&RankedResult> {
        self.results.get(haplogroup)
    }

    pub fn quality_level(&self) -> u32 {
        self.quality_level
    }

    pub fn set_quality_level(&mut self, level: u32) {
        self.quality_level = level;
    }

    pub fn is_reset(&self) -> bool {
        self.reset
    }

    pub fn set_reset(&mut self, reset: bool) {
        self.reset = reset;
    }

    /// Rerun the search and replace ranked results and clusters together.
    ///
    /// On failure the previous results are kept.
    pub fn update_results(&mut self, service: &dyn SearchService, ranking: &dyn RankingMethod) -> Result<()> {
        let ranked = service
            .search(&self.profile, ranking)
            .map_err(|e| HaploError::Search {
                sample_id: self.id.clone(),
                message: e.to_string(),
            })?;

        tracing::debug!(
            "{}: {} candidates ranked by {}",
            self.id,
            ranked.len(),
            ranking.name()
        );
        self.results = RankedResults::new(ranked, self.tie_epsilon);
        Ok(())
    }

    pub fn clear_results(&mut self) {
        self.results = RankedResults::default();
    }

    /// Candidates for the requested haplogroups, each expanded to its tie cluster.
    pub fn select(&self, names: &[&str]) -> Result<Vec<&RankedResult>> {
        let mut selected: Vec<&RankedResult> = Vec::new();

        for name in names {
            let haplogroup = Haplogroup::new(*name);
            let cluster = self
                .results
                .cluster_of(&haplogroup)
                .ok_or_else(|| HaploError::UnknownHaplogroup(name.to_string()))?;

            for candidate in cluster {
                if !selected.iter().any(|s| s.haplogroup == candidate.haplogroup) {
                    selected.push(candidate);
                }
            }
        }

        Ok(selected)
    }

    /// Merge the paths of the selected candidates into one presentation tree.
    ///
    /// Returns `None` when nothing is selected.
    pub fn select_subtree(&self, names: &[&str], merger: &PathTreeMerger) -> Result<Option<PresentationTree>> {
        let selected = self.select(names)?;
        if selected.is_empty() {
            return Ok(None);
        }

        let paths: Vec<&[SearchResultTreeNode]> = selected
            .iter()
            .map(|r| r.detailed.path.as_slice())
            .collect();
        merger.merge(&paths, self.results.top()).map(Some)
    }

    pub fn to_profile_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TestSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expected = self.expected.as_ref().map_or("?", |h| h.name());
        write!(f, "{}\t{}\t{}", self.id, self.profile.range, expected)?;
        for poly in &self.profile.polymorphisms {
            write!(f, "\t{}", poly)?;
        }
        Ok(())
    }
}
