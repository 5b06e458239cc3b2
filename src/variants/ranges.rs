use crate::error::{HaploError, Result};
use std::fmt;
use std::str::FromStr;

/// Covered positions of a sample as an ordered list of inclusive sub-ranges.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SampleRanges {
    ranges: Vec<(u32, u32)>,
}

impl SampleRanges {
    pub fn full(contig_length: u32) -> Self {
        Self {
            ranges: vec![(1, contig_length)],
        }
    }

    /// Chip-style coverage: every position is its own sub-range.
    pub fn from_positions<I: IntoIterator<Item = u32>>(positions: I) -> Self {
        Self {
            ranges: positions.into_iter().map(|p| (p, p)).collect(),
        }
    }

    pub fn push(&mut self, start: u32, end: u32) {
        self.ranges.push((start.min(end), start.max(end)));
    }

    pub fn contains(&self, position: u32) -> bool {
        self.subrange_id(position).is_some()
    }

    /// Index of the first sub-range containing `position`.
    pub fn subrange_id(&self, position: u32) -> Option<usize> {
        self.ranges
            .iter()
            .position(|&(start, end)| start <= position && position <= end)
    }

    pub fn subrange(&self, index: usize) -> Option<SampleRanges> {
        self.ranges.get(index).map(|&range| SampleRanges {
            ranges: vec![range],
        })
    }

    pub fn starts(&self) -> impl Iterator<Item = u32> + '_ {
        self.ranges.iter().map(|(start, _)| *start)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl FromStr for SampleRanges {
    type Err = HaploError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || HaploError::InvalidRange(s.to_string());
        let mut ranges = SampleRanges::default();

        for part in s.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (start, end) = match part.split_once('-') {
                Some((start, end)) => (start.trim(), end.trim()),
                None => (part, part),
            };
            let start: u32 = start.parse().map_err(|_| invalid())?;
            let end: u32 = end.parse().map_err(|_| invalid())?;
            ranges.push(start, end);
        }

        if ranges.is_empty() {
            return Err(invalid());
        }
        Ok(ranges)
    }
}

impl fmt::Display for SampleRanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (start, end) in &self.ranges {
            if start == end {
                write!(f, "{};", start)?;
            } else {
                write!(f, "{}-{};", start, end)?;
            }
        }
        Ok(())
    }
}
