//! Small categorical recodes.

use crate::error::{ImportError, Result};

/// Maps raw codes through a lookup table, leaving missing and unlisted
/// codes missing.
#[must_use]
pub fn map_codes(values: &[Option<f64>], table: &[(i32, u8)]) -> Vec<Option<u8>> {
    values
        .iter()
        .map(|value| {
            value.and_then(|v| {
                table
                    .iter()
                    .find(|&&(code, _)| v == f64::from(code))
                    .map(|&(_, recoded)| recoded)
            })
        })
        .collect()
}

/// Flags membership in a code set, leaving missing values missing
#[must_use]
pub fn flag_in(values: &[Option<f64>], members: &[i32]) -> Vec<Option<u8>> {
    values
        .iter()
        .map(|value| {
            value.map(|v| u8::from(members.iter().any(|&member| v == f64::from(member))))
        })
        .collect()
}

/// Flags equality with a code; missing values count as not matching
#[must_use]
pub fn flag_eq(values: &[Option<f64>], code: f64) -> Vec<u8> {
    values.iter().map(|value| u8::from(*value == Some(code))).collect()
}

/// Flags rows where either column equals a code; missing counts as not
/// matching, so the flag is never missing.
///
/// # Errors
///
/// Returns [`ImportError::LengthMismatch`] if the columns differ in length.
pub fn flag_either_eq(
    left: &[Option<f64>],
    right: &[Option<f64>],
    code: f64,
) -> Result<Vec<u8>> {
    if left.len() != right.len() {
        return Err(ImportError::LengthMismatch {
            expected: left.len(),
            actual: right.len(),
        });
    }
    Ok((0..left.len())
        .map(|row| u8::from(left[row] == Some(code) || right[row] == Some(code)))
        .collect())
}
