//! First non-missing value across aligned columns.

use crate::error::{ImportError, Result};

/// Returns `primary` with missing entries filled from the first fallback
/// that has a value at that row.
///
/// This backs the questionnaire pattern where repeat respondents answer an
/// update question (`DQ38`, `D6`) instead of the baseline question.
///
/// # Errors
///
/// Returns [`ImportError::LengthMismatch`] if a fallback has a different
/// length than `primary`.
pub fn coalesce<T: Copy>(primary: &[Option<T>], fallbacks: &[&[Option<T>]]) -> Result<Vec<Option<T>>> {
    for fallback in fallbacks {
        if fallback.len() != primary.len() {
            return Err(ImportError::LengthMismatch {
                expected: primary.len(),
                actual: fallback.len(),
            });
        }
    }
    Ok((0..primary.len())
        .map(|row| {
            primary[row].or_else(|| fallbacks.iter().find_map(|fallback| fallback[row]))
        })
        .collect())
}
