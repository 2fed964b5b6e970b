//! Broadcasting respondent-constant answers across interviews.

use crate::error::{ImportError, Result};
use crate::frame::PanelIndex;

/// Spreads each respondent's single answer to a once-asked question across
/// all of their interviews.
///
/// A respondent may answer the question in any one wave, or repeat the same
/// answer; respondents who never answered stay missing in every wave.
///
/// # Errors
///
/// Returns [`ImportError::AmbiguousConstant`] if a respondent has two
/// distinct non-missing answers and [`ImportError::LengthMismatch`] if
/// `values` does not align with the index.
pub fn broadcast_constant<T: Copy + PartialEq>(
    name: &str,
    values: &[Option<T>],
    index: &PanelIndex,
) -> Result<Vec<Option<T>>> {
    if values.len() != index.len() {
        return Err(ImportError::LengthMismatch {
            expected: index.len(),
            actual: values.len(),
        });
    }

    let mut tiled = vec![None; values.len()];
    for (respondent, range) in index.respondent_ranges() {
        let mut constant: Option<T> = None;
        for row in range.clone() {
            if let Some(value) = values[row] {
                match constant {
                    None => constant = Some(value),
                    Some(seen) if seen == value => {}
                    Some(_) => {
                        return Err(ImportError::AmbiguousConstant {
                            column: name.to_string(),
                            respondent,
                        });
                    }
                }
            }
        }
        for row in range {
            tiled[row] = constant;
        }
    }
    Ok(tiled)
}
