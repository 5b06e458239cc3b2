pub mod decoder;
pub mod fragments;
pub mod importer;
pub mod ranges;
pub mod sample;
pub mod splitter;
pub mod types;

pub use decoder::{GenotypeCall, VariantDecoder, Zygosity};
pub use fragments::{split_fragments, FragmentPolicy};
pub use importer::{ImportedSamples, VcfImporter};
pub use ranges::SampleRanges;
pub use sample::{Sample, SampleStats};
pub use splitter::{split_profiles, SplitProfiles};
pub use types::{AlleleLevel, HeteroplasmyCall, Variant, VariantCall, VariantKind};
