//! Income rank merger.
//!
//! Census-derived median income ranks are keyed by calendar year and income
//! bracket. Survey income refers to the twelve months before the interview,
//! so each interview is aligned to the year covering most of that window
//! before the lookup.

use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};
use log::warn;
use rustc_hash::FxHashMap;

use crate::error::{ImportError, Result};
use crate::frame::PanelFrame;
use crate::raw::RawTable;
use crate::schema::SURVEY_DATE;

/// Year column in the rank table
pub const RANK_YEAR: &str = "year";
/// Income bracket column in the rank table
pub const RANK_BRACKET: &str = "ibin";
/// Rank value column in the rank table
pub const RANK_VALUE: &str = "rank";

/// One row of the rank lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankRecord {
    /// Calendar year the rank refers to
    pub year: i32,
    /// Income bracket code
    pub bracket: i32,
    /// Median rank of the bracket, on `[0, 1]` or `[0, 100]`
    pub rank: f64,
}

/// Median income rank lookup keyed by year and bracket
#[derive(Debug, Clone)]
pub struct RankTable {
    ranks: FxHashMap<(i32, i32), f64>,
}

impl RankTable {
    /// Builds the lookup from rank records.
    ///
    /// Ranks on the unit interval are rescaled to percentiles on
    /// `[0, 100]`; the convention is decided from the largest rank in the
    /// input.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::DuplicateRankKey`] if a (year, bracket) pair
    /// appears twice, since the merge must match at most one rank per
    /// interview.
    pub fn from_records(records: impl IntoIterator<Item = RankRecord>) -> Result<Self> {
        let records: Vec<RankRecord> = records.into_iter().collect();
        let largest = records.iter().map(|record| record.rank).fold(f64::NEG_INFINITY, f64::max);
        let scale = if largest <= 1.0 { 100.0 } else { 1.0 };

        let mut ranks = FxHashMap::default();
        for record in records {
            if ranks.insert((record.year, record.bracket), record.rank * scale).is_some() {
                return Err(ImportError::DuplicateRankKey {
                    year: record.year,
                    bracket: record.bracket,
                });
            }
        }
        Ok(Self { ranks })
    }

    /// Builds the lookup from a record batch with `year`, `ibin` and `rank`
    /// columns.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::ColumnNotFound`] or
    /// [`ImportError::InvalidColumnType`] for a malformed table and
    /// [`ImportError::DuplicateRankKey`] for a duplicated key.
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Self> {
        let raw = RawTable::new(batch.clone());
        let years = raw.int32_column(RANK_YEAR)?;
        let brackets = raw.int32_column(RANK_BRACKET)?;
        let ranks = raw.float_column(RANK_VALUE)?;

        let mut records = Vec::with_capacity(years.len());
        let mut incomplete = 0usize;
        for row in 0..years.len() {
            match (years[row], brackets[row], ranks[row]) {
                (Some(year), Some(bracket), Some(rank)) => {
                    records.push(RankRecord { year, bracket, rank });
                }
                _ => incomplete += 1,
            }
        }
        if incomplete > 0 {
            warn!("Skipping {incomplete} incomplete rows in the income rank table");
        }
        Self::from_records(records)
    }

    /// Number of (year, bracket) entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Whether the lookup is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Rank for a year and bracket, if present
    #[must_use]
    pub fn get(&self, year: i32, bracket: i32) -> Option<f64> {
        self.ranks.get(&(year, bracket)).copied()
    }

    /// Appends `<bracket_column>_rank` to a panel frame.
    ///
    /// Each interview is matched on its fiscal year and bracket code; rows
    /// with a missing date or bracket, or without a matching rank entry,
    /// stay missing.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::ColumnNotFound`] or
    /// [`ImportError::InvalidColumnType`] if the frame lacks the interview
    /// date or bracket column.
    pub fn merge_onto(&self, frame: &mut PanelFrame, bracket_column: &str) -> Result<()> {
        let dates = frame.date_column(SURVEY_DATE)?.to_vec();
        let brackets = frame.float_column(bracket_column)?.to_vec();

        let merged: Vec<Option<f64>> = dates
            .iter()
            .zip(&brackets)
            .map(|(date, bracket)| {
                let date = (*date)?;
                let bracket = (*bracket)?;
                if bracket.fract() != 0.0 {
                    return None;
                }
                self.get(fiscal_year(date), bracket as i32)
            })
            .collect();

        frame.insert(format!("{bracket_column}_rank"), merged)
    }
}

/// Calendar year covering most of the twelve months before `date`.
///
/// The window is aligned to the start of the interview month; an interview
/// in July or later maps to its own year, anything earlier to the year
/// before.
#[must_use]
pub fn fiscal_year(date: NaiveDate) -> i32 {
    let month_start = date.with_day(1).unwrap_or(date);
    let within_year = f64::from(month_start.month0()) / 11.0;
    if within_year < 0.5 { date.year() - 1 } else { date.year() }
}
