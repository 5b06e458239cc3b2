use thiserror::Error;

/// Errors raised while decoding calls, building samples or selecting results.
#[derive(Error, Debug)]
pub enum HaploError {
    #[error("invalid allele frequency list: '{0}'")]
    InvalidFrequency(String),

    #[error("invalid allele: {0}")]
    InvalidAllele(String),

    #[error("invalid sample range: '{0}'")]
    InvalidRange(String),

    #[error("expected at least 3 tab separated columns, found {0}")]
    InvalidColumnCount(usize),

    #[error("invalid polymorphism: '{0}'")]
    InvalidPolymorphism(String),

    #[error("sample '{sample_id}' rejected: {source}")]
    MalformedSample {
        sample_id: String,
        #[source]
        source: Box<HaploError>,
    },

    #[error("haplogroup '{0}' is not among the ranked results")]
    UnknownHaplogroup(String),

    #[error("malformed result path: {0}")]
    MalformedPath(String),

    #[error("search failed for sample '{sample_id}': {message}")]
    Search { sample_id: String, message: String },

    #[error("VCF error: {0}")]
    Vcf(#[from] rust_htslib::errors::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HaploError {
    /// Attach the id of the sample whose construction this error aborted.
    pub fn for_sample(self, sample_id: &str) -> Self {
        match self {
            already @ HaploError::MalformedSample { .. } => already,
            other => HaploError::MalformedSample {
                sample_id: sample_id.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The id of the affected sample, when the error carries one.
    pub fn sample_id(&self) -> Option<&str> {
        match self {
            HaploError::MalformedSample { sample_id, .. } | HaploError::Search { sample_id, .. } => {
                Some(sample_id)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, HaploError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_sample_wraps_once() {
        let err = HaploError::InvalidFrequency("x".into()).for_sample("S1");
        let err = err.for_sample("S2");
        assert_eq!(err.sample_id(), Some("S1"));
        assert!(err.to_string().contains("invalid allele frequency list"));
    }
}
