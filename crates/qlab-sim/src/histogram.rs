//! Outcome histograms aggregated over shots.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Occurrence counts keyed by classical bitstring.
///
/// Classical bit 0 is the rightmost character of each key. Keys are kept in
/// lexicographic order so printing and serialization are stable, and
/// [`OutcomeHistogram::merge`] is commutative, so partial histograms can be
/// combined in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeHistogram {
    counts: BTreeMap<String, u64>,
}

impl OutcomeHistogram {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Occurrences of `bitstring` (0 if never observed).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of recorded shots.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(bitstring, count)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// The most frequent outcome. Ties go to the smallest key.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.iter()
            .fold(None, |best: Option<(&str, u64)>, (k, v)| match best {
                Some((_, bv)) if bv >= v => best,
                _ => Some((k, v)),
            })
    }

    /// Relative frequency of `bitstring`.
    pub fn probability(&self, bitstring: &str) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.get(bitstring) as f64 / total as f64
    }

    /// Relative frequency of every observed outcome.
    pub fn probabilities(&self) -> BTreeMap<String, f64> {
        let total = self.total() as f64;
        self.counts
            .iter()
            .map(|(k, &v)| (k.clone(), v as f64 / total))
            .collect()
    }

    /// Counts of classical bit `clbit` reading 0 and 1.
    pub fn marginal(&self, clbit: usize) -> [u64; 2] {
        let mut out = [0u64; 2];
        for (key, &count) in &self.counts {
            let bit = key
                .len()
                .checked_sub(clbit + 1)
                .and_then(|pos| key.as_bytes().get(pos))
                .is_some_and(|&b| b == b'1');
            out[usize::from(bit)] += count;
        }
        out
    }

    /// Add every count of `other` into `self`.
    pub fn merge(&mut self, other: &OutcomeHistogram) {
        for (key, count) in other.iter() {
            self.insert(key, count);
        }
    }
}

impl FromIterator<(String, u64)> for OutcomeHistogram {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut histogram = Self::new();
        for (k, v) in iter {
            histogram.insert(k, v);
        }
        histogram
    }
}

impl fmt::Display for OutcomeHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total();
        for (key, count) in self.iter() {
            let pct = if total == 0 {
                0.0
            } else {
                100.0 * count as f64 / total as f64
            };
            writeln!(f, "{key}: {count} ({pct:.1}%)")?;
        }
        Ok(())
    }
}
