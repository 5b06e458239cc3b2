use crate::error::{HaploError, Result};
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A clade label of the classification tree, compared by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Haplogroup(String);

impl Haplogroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Haplogroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Haplogroup {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A mutation in phylotree notation (`73G`, `8281d`, `315.1C`).
///
/// Identity is (position, base); the heteroplasmy flag is carried along but
/// takes no part in equality or hashing.
#[derive(Debug, Clone, Serialize)]
pub struct Polymorphism {
    pub position: u32,
    pub base: String,
    pub heteroplasmy: bool,
}

/// IUPAC ambiguity codes that mark a heteroplasmic call. `D` is absent: in
/// phylotree notation it is the deletion marker.
const HETEROPLASMY_CODES: &[char] = &['R', 'Y', 'K', 'M', 'S', 'W', 'B', 'H', 'V', 'N'];

impl Polymorphism {
    pub fn new(position: u32, base: impl Into<String>) -> Self {
        let base = base.into();
        let heteroplasmy = base.len() == 1 && base.chars().all(|c| HETEROPLASMY_CODES.contains(&c));
        Self {
            position,
            base,
            heteroplasmy,
        }
    }

    pub fn heteroplasmic(position: u32, base: impl Into<String>) -> Self {
        Self {
            position,
            base: base.into(),
            heteroplasmy: true,
        }
    }
}

impl PartialEq for Polymorphism {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position && self.base == other.base
    }
}

impl Eq for Polymorphism {}

impl Hash for Polymorphism {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.hash(state);
        self.base.hash(state);
    }
}

impl fmt::Display for Polymorphism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.position, self.base)
    }
}

impl FromStr for Polymorphism {
    type Err = HaploError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || HaploError::InvalidPolymorphism(s.to_string());
        let token = s.trim();
        let split = token
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (digits, rest) = token.split_at(split);
        let position: u32 = digits.parse().map_err(|_| invalid())?;

        let base = if let Some(insertion) = rest.strip_prefix('.') {
            let seq_start = insertion
                .find(|c: char| !c.is_ascii_digit())
                .ok_or_else(invalid)?;
            let (index, seq) = insertion.split_at(seq_start);
            if index.is_empty() || !seq.chars().all(|c| "ACGTNacgtn".contains(c)) {
                return Err(invalid());
            }
            format!(".{}{}", index, seq.to_ascii_uppercase())
        } else {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some('d' | 'D'), None) => "d".to_string(),
                (Some(c), None) if c.is_ascii_alphabetic() => c.to_ascii_uppercase().to_string(),
                _ => return Err(invalid()),
            }
        };

        Ok(Polymorphism::new(position, base))
    }
}

/// One step of a search result's path from the tree root to a candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResultTreeNode {
    pub haplogroup: Haplogroup,
    pub expected: Vec<Polymorphism>,
    pub found: Vec<Polymorphism>,
    pub not_in_range: Vec<Polymorphism>,
}

impl SearchResultTreeNode {
    pub fn new(haplogroup: impl Into<Haplogroup>) -> Self {
        Self {
            haplogroup: haplogroup.into(),
            expected: Vec::new(),
            found: Vec::new(),
            not_in_range: Vec::new(),
        }
    }
}

impl From<String> for Haplogroup {
    fn from(name: String) -> Self {
        Self(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetailedResult {
    /// Path from the tree root down to the candidate, root first.
    pub path: Vec<SearchResultTreeNode>,
    pub corrected_backmutations: Vec<Polymorphism>,
}

/// One classification candidate as ranked by the search service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub haplogroup: Haplogroup,
    pub distance: f64,
    pub detailed: DetailedResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn parses_phylotree_notation() {
        let p: Polymorphism = "73G".parse().unwrap();
        assert_eq!((p.position, p.base.as_str(), p.heteroplasmy), (73, "G", false));

        let d: Polymorphism = "8281d".parse().unwrap();
        assert_eq!(d.to_string(), "8281d");

        let i: Polymorphism = "315.1c".parse().unwrap();
        assert_eq!(i.to_string(), "315.1C");

        let h: Polymorphism = "16093Y".parse().unwrap();
        assert!(h.heteroplasmy);
    }

    #[test]
    fn uppercase_d_is_a_deletion_not_a_heteroplasmy() {
        let d: Polymorphism = "8281D".parse().unwrap();
        assert_eq!(d.base, "d");
        assert!(!d.heteroplasmy);
        assert!(!Polymorphism::new(8281, "D").heteroplasmy);
    }

    #[test]
    fn rejects_malformed_tokens() {
        for token in ["G73", "73", "73GA", "315.C", "abc"] {
            assert!(token.parse::<Polymorphism>().is_err(), "{token}");
        }
    }

    #[test]
    fn identity_ignores_heteroplasmy_flag() {
        let plain = Polymorphism::new(16093, "C");
        let flagged = Polymorphism::heteroplasmic(16093, "C");
        assert_eq!(plain, flagged);

        let set: HashSet<_> = [plain, flagged].into_iter().collect();
        assert_eq!(set.len(), 1);
    }
}
