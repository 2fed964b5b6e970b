//! Best-effort integer downcasts for coded columns.

use log::warn;

use crate::frame::{Column, DType};

/// Result of a [`try_cast`] attempt
#[derive(Debug, Clone)]
pub struct CastOutcome {
    /// The converted column, or a copy of the original if conversion failed
    pub column: Column,
    /// Number of non-missing values that could not be represented
    pub unconverted: usize,
}

impl CastOutcome {
    /// Whether the conversion succeeded
    #[must_use]
    pub const fn converted(&self) -> bool {
        self.unconverted == 0
    }
}

/// Attempts to convert a column to a narrower integer type.
///
/// Missing values pass through unchanged. If any non-missing value is
/// fractional or out of range for the target, the conversion is abandoned,
/// a warning is logged, and the original values are returned so the run can
/// continue.
#[must_use]
pub fn try_cast(column: &Column, target: DType, name: &str) -> CastOutcome {
    if column.dtype() == target {
        return CastOutcome { column: column.clone(), unconverted: 0 };
    }
    let outcome = match (column, target) {
        (Column::Float64(values), DType::Int8) => {
            convert(values, |value| i8::try_from(integral(value)?).ok()).map(Column::Int8)
        }
        (Column::Float64(values), DType::UInt8) => {
            convert(values, |value| u8::try_from(integral(value)?).ok()).map(Column::UInt8)
        }
        (Column::Float64(values), DType::Int32) => {
            convert(values, |value| i32::try_from(integral(value)?).ok()).map(Column::Int32)
        }
        (Column::Int32(values), DType::Int8) => {
            convert(values, |value| i8::try_from(value).ok()).map(Column::Int8)
        }
        (Column::Int32(values), DType::UInt8) => {
            convert(values, |value| u8::try_from(value).ok()).map(Column::UInt8)
        }
        _ => Err(column.len()),
    };

    match outcome {
        Ok(column) => CastOutcome { column, unconverted: 0 },
        Err(unconverted) => {
            warn!("Failed to cast '{name}' to {target}: {unconverted} values cannot be represented");
            CastOutcome { column: column.clone(), unconverted }
        }
    }
}

/// Converts every non-missing value or reports how many do not fit
fn convert<S: Copy, T>(
    values: &[Option<S>],
    convert_one: impl Fn(S) -> Option<T>,
) -> std::result::Result<Vec<Option<T>>, usize> {
    let mut failures = 0usize;
    let converted: Vec<Option<T>> = values
        .iter()
        .map(|value| match value {
            None => None,
            Some(v) => {
                let result = convert_one(*v);
                if result.is_none() {
                    failures += 1;
                }
                result
            }
        })
        .collect();
    if failures > 0 { Err(failures) } else { Ok(converted) }
}

fn integral(value: f64) -> Option<i64> {
    if value.fract() == 0.0 && value.is_finite() {
        let truncated = value as i64;
        (truncated as f64 == value).then_some(truncated)
    } else {
        None
    }
}
