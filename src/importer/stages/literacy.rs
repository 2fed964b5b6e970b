//! Numerical literacy battery.
//!
//! Each question is copied as answered and graded against the codebook
//! answer; the grade stays missing where the question was not answered.

use crate::error::Result;
use crate::importer::context::{StageInput, StageOutput};
use crate::report::RunReport;

pub(crate) fn derive(input: &StageInput<'_>, _report: &mut RunReport) -> Result<StageOutput> {
    let mut out = StageOutput::default();
    let tolerance = input.config.literacy_tolerance;

    // 50% discount on a $300 sofa
    graded(input, &mut out, "QNUM1", "num_lit_q1", |answer| answer == 150.0)?;
    // Gross balance of $200 at 10% interest after two years; free-form
    // dollar answers get a tolerance
    let compound_balance = 200.0 * 1.1f64.powi(2);
    graded(input, &mut out, "QNUM2", "num_lit_q2", |answer| {
        (answer - compound_balance).abs() < tolerance
    })?;
    // Winners out of 1,000 lottery tickets at a 1% chance
    graded(input, &mut out, "QNUM3", "num_lit_q3", |answer| answer == 10.0)?;
    // Expected cases out of 1,000 at a 10% infection chance
    graded(input, &mut out, "QNUM5", "num_lit_q5", |answer| answer == 100.0)?;
    // Expected cases out of 10,000 at a 0.05% infection chance
    graded(input, &mut out, "QNUM6", "num_lit_q6", |answer| answer == 10_000.0 * 0.0005)?;
    // Purchasing power after a year at 1% interest and 2% inflation:
    // (1) more than today (2) exactly the same (3) less than today
    graded(input, &mut out, "QNUM8", "num_lit_q8", |answer| answer == 3.0)?;
    // Single company stock is safer than a mutual fund: (1) true (2) false
    graded(input, &mut out, "QNUM9", "num_lit_q9", |answer| answer == 2.0)?;

    Ok(out)
}

/// Copies a literacy question and grades it with the supplied rule.
///
/// The extract receives both the raw answer and a `_correct` flag.
fn graded(
    input: &StageInput<'_>,
    out: &mut StageOutput,
    question: &str,
    extract_name: &str,
    correct: impl Fn(f64) -> bool,
) -> Result<()> {
    let answers = input.raw.float_column(question)?;
    let grades: Vec<Option<u8>> = answers
        .iter()
        .map(|answer| answer.map(|value| u8::from(correct(value))))
        .collect();
    out.push_full(question, answers.clone());
    out.push_extract(extract_name, answers);
    out.push_extract(format!("{extract_name}_correct"), grades);
    Ok(())
}
