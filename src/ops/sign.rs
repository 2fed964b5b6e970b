//! Whole-batch sign normalization for direction and magnitude pairs.
//!
//! Several questions ask for a direction (increase or decrease) and then a
//! magnitude in percent. Some vendor files store the magnitude already
//! signed, others store it as an absolute value. The convention cannot be
//! decided row by row, so it is inferred from the whole batch: if every
//! magnitude reported alongside a decrease is non-negative, the file uses
//! absolute values and the flagged rows are negated.

use log::{info, warn};
use serde::Serialize;

use crate::error::{ImportError, Result};

/// How a direction and magnitude pair was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignResolution {
    /// Decreases were already negative, values kept as-is
    Unchanged,
    /// Decreases were stored as absolute values and have been negated
    Flipped,
    /// Both signs appear among decreases; values kept as-is
    Ambiguous,
}

/// Marks the rows where the direction answer reports a decrease
#[must_use]
pub fn decrease_mask(direction: &[Option<f64>], decrease_code: f64) -> Vec<bool> {
    direction.iter().map(|value| *value == Some(decrease_code)).collect()
}

/// Normalizes a magnitude column so decreases are negative.
///
/// Missing magnitudes count as zero for the inference and are never
/// rewritten. An ambiguous batch is left untouched and reported to the
/// caller rather than failing the run.
///
/// # Errors
///
/// Returns [`ImportError::LengthMismatch`] if the mask does not align with
/// the magnitudes.
pub fn resolve_sign(
    magnitude: &mut [Option<f64>],
    decrease: &[bool],
    name: &str,
) -> Result<SignResolution> {
    if decrease.len() != magnitude.len() {
        return Err(ImportError::LengthMismatch {
            expected: magnitude.len(),
            actual: decrease.len(),
        });
    }

    let mut any_positive = false;
    let mut any_negative = false;
    for (value, &flagged) in magnitude.iter().zip(decrease) {
        if flagged {
            let value = value.unwrap_or(0.0);
            if value > 0.0 {
                any_positive = true;
            } else if value < 0.0 {
                any_negative = true;
            }
        }
    }

    if !any_positive {
        info!("Leaving sign in {name} unchanged");
        Ok(SignResolution::Unchanged)
    } else if !any_negative {
        info!("Flipping sign in {name} to negative");
        for (value, &flagged) in magnitude.iter_mut().zip(decrease) {
            if flagged {
                if let Some(v) = value.as_mut() {
                    *v = -*v;
                }
            }
        }
        Ok(SignResolution::Flipped)
    } else {
        warn!("{name} has ambiguous sign");
        Ok(SignResolution::Ambiguous)
    }
}
