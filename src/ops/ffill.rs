//! Carry-forward of answers within respondent spells.
//!
//! Fills never cross from one respondent into the next; a respondent's first
//! waves stay missing until their first recorded answer.

use smallvec::SmallVec;

use crate::error::{ImportError, Result};
use crate::frame::PanelIndex;

/// Carries the last non-missing value forward within each respondent spell
///
/// # Errors
///
/// Returns [`ImportError::LengthMismatch`] if `values` does not align with
/// the index.
pub fn forward_fill<T: Copy>(values: &mut [Option<T>], index: &PanelIndex) -> Result<()> {
    if values.len() != index.len() {
        return Err(ImportError::LengthMismatch {
            expected: index.len(),
            actual: values.len(),
        });
    }
    for (_, range) in index.respondent_ranges() {
        let mut last: Option<T> = None;
        for row in range {
            match values[row] {
                Some(value) => last = Some(value),
                None => values[row] = last,
            }
        }
    }
    Ok(())
}

/// Carries the last fully answered row of a column group forward within each
/// respondent spell.
///
/// A row counts as a signal only when every column has a value; rows with a
/// partial answer are overwritten by the preceding signal, or left entirely
/// missing when no signal precedes them. This backs the household roster,
/// where a valid state is all counts or nothing.
///
/// # Errors
///
/// Returns [`ImportError::LengthMismatch`] if any column does not align with
/// the index.
pub fn forward_fill_complete_rows(
    columns: &mut [Vec<Option<f64>>],
    index: &PanelIndex,
) -> Result<()> {
    for column in columns.iter() {
        if column.len() != index.len() {
            return Err(ImportError::LengthMismatch {
                expected: index.len(),
                actual: column.len(),
            });
        }
    }
    for (_, range) in index.respondent_ranges() {
        let mut last: Option<SmallVec<[f64; 8]>> = None;
        for row in range {
            let candidate: Option<SmallVec<[f64; 8]>> =
                columns.iter().map(|column| column[row]).collect();
            if let Some(values) = candidate {
                last = Some(values);
            }
            match &last {
                Some(values) => {
                    for (column, &value) in columns.iter_mut().zip(values.iter()) {
                        column[row] = Some(value);
                    }
                }
                None => {
                    for column in columns.iter_mut() {
                        column[row] = None;
                    }
                }
            }
        }
    }
    Ok(())
}
