//! Composite panel index over respondent and wave.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Range;

use crate::error::{ImportError, Result};

/// Key identifying a single interview in the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PanelKey {
    /// Respondent identifier
    pub respondent: i64,
    /// Wave identifier, the vendor period code
    pub wave: i32,
}

/// Sorted, duplicate-free index shared by the full and extract tables.
///
/// Rows for one respondent are contiguous and ordered by wave, so every
/// respondent maps to a half-open row range. Broadcast and carry-forward
/// operations walk these ranges instead of re-grouping per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelIndex {
    keys: Vec<PanelKey>,
    groups: Vec<(usize, usize)>,
}

impl PanelIndex {
    /// Builds an index from keys already sorted by respondent, then wave.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::DuplicateKey`] if the same interview appears
    /// twice and [`ImportError::Schema`] if the keys are out of order.
    pub fn from_sorted_keys(keys: Vec<PanelKey>) -> Result<Self> {
        for pair in keys.windows(2) {
            match pair[1].cmp(&pair[0]) {
                Ordering::Greater => {}
                Ordering::Equal => {
                    return Err(ImportError::DuplicateKey {
                        respondent: pair[0].respondent,
                        wave: pair[0].wave,
                    });
                }
                Ordering::Less => {
                    return Err(ImportError::Schema(
                        "panel keys are not sorted by respondent and wave".to_string(),
                    ));
                }
            }
        }

        let mut groups = Vec::new();
        let mut start = 0;
        for (row, key) in keys.iter().enumerate() {
            if key.respondent != keys[start].respondent {
                groups.push((start, row));
                start = row;
            }
        }
        if !keys.is_empty() {
            groups.push((start, keys.len()));
        }

        Ok(Self { keys, groups })
    }

    /// Number of interviews in the panel
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the panel has no interviews
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// All keys in index order
    #[must_use]
    pub fn keys(&self) -> &[PanelKey] {
        &self.keys
    }

    /// Number of distinct respondents
    #[must_use]
    pub fn respondents(&self) -> usize {
        self.groups.len()
    }

    /// Iterates over respondents and their contiguous row ranges
    pub fn respondent_ranges(&self) -> impl Iterator<Item = (i64, Range<usize>)> + '_ {
        self.groups
            .iter()
            .map(|&(start, end)| (self.keys[start].respondent, start..end))
    }

    /// Distribution of interviews per respondent, keyed by spell length
    #[must_use]
    pub fn spell_distribution(&self) -> BTreeMap<usize, usize> {
        let mut distribution = BTreeMap::new();
        for &(start, end) in &self.groups {
            *distribution.entry(end - start).or_insert(0) += 1;
        }
        distribution
    }
}
