//! Classification results for mitochondrial samples: ranked candidates from
//! an external phylogenetic search, tie clusters and the merged path tree
//! used for presentation.

pub mod batch;
pub mod search;
pub mod test_sample;
pub mod tree;
pub mod types;

pub use batch::{classify_all, BatchOutcome};
pub use search::{RankedResults, RankingMethod, SearchService};
pub use test_sample::{Profile, TestSample};
pub use tree::{PathTreeMerger, PolyState, PresentationTree};
pub use types::{DetailedResult, Haplogroup, Polymorphism, RankedResult, SearchResultTreeNode};
