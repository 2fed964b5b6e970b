//! Derivation stages, one per questionnaire section.
//!
//! Each stage is a pure function of the [`StageInput`]: it reads the raw
//! table and the frames built by earlier stages and returns the columns it
//! adds. The helpers here cover the recurring patterns of the codebook.

pub(crate) mod demographics;
pub(crate) mod employment;
pub(crate) mod finances;
pub(crate) mod household;
pub(crate) mod housing;
pub(crate) mod inflation;
pub(crate) mod literacy;
pub(crate) mod meta;
pub(crate) mod outlook;

use crate::error::Result;
use crate::frame::{Column, DType};
use crate::importer::context::{StageInput, StageOutput};
use crate::ops::{decrease_mask, resolve_sign, try_cast};
use crate::report::RunReport;

/// Copies a question into the full table and the extract under an analysis
/// name
pub(crate) fn copy_question(
    input: &StageInput<'_>,
    out: &mut StageOutput,
    question: &str,
    extract_name: &str,
) -> Result<()> {
    let values = input.raw.float_column(question)?;
    out.push_full(question, values.clone());
    out.push_extract(extract_name, values);
    Ok(())
}

/// Copies a question into the full table only
pub(crate) fn copy_to_full(
    input: &StageInput<'_>,
    out: &mut StageOutput,
    question: &str,
) -> Result<()> {
    let values = input.raw.float_column(question)?;
    out.push_full(question, values);
    Ok(())
}

/// Copies a discovered indexed question group into the full table,
/// returning the member names in suffix order
pub(crate) fn copy_indexed_group(
    input: &StageInput<'_>,
    out: &mut StageOutput,
    prefix: &str,
) -> Result<Vec<String>> {
    let names = input.raw.columns_with_indexed_prefix(prefix);
    for name in &names {
        out.push_full(name.clone(), input.raw.float_column(name)?);
    }
    Ok(names)
}

/// Normalizes a direction and magnitude pair and queues the signed
/// magnitude for the full table and the extract
pub(crate) fn signed_magnitude(
    input: &StageInput<'_>,
    report: &mut RunReport,
    out: &mut StageOutput,
    direction: &str,
    decrease_code: f64,
    magnitude: &str,
    extract_name: &str,
) -> Result<()> {
    let mut values = input.raw.float_column(magnitude)?;
    let decrease = decrease_mask(&input.raw.float_column(direction)?, decrease_code);
    let resolution = resolve_sign(&mut values, &decrease, magnitude)?;
    let flagged_rows = decrease.iter().filter(|&&flagged| flagged).count();
    report.record_sign(magnitude, direction, resolution, flagged_rows);
    out.push_full(magnitude, values.clone());
    out.push_extract(extract_name, values);
    Ok(())
}

/// Attempts a downcast, recording an abandoned conversion on the report
pub(crate) fn cast_reported(
    column: &Column,
    target: DType,
    name: &str,
    report: &mut RunReport,
) -> Column {
    let outcome = try_cast(column, target, name);
    if !outcome.converted() {
        report.record_cast(name, &target.to_string(), outcome.unconverted);
    }
    outcome.column
}
