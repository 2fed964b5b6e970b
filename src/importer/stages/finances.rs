//! Earnings, income, spending, tax and credit expectations.

use crate::error::Result;
use crate::importer::context::{StageInput, StageOutput};
use crate::importer::stages::{copy_indexed_group, copy_question, copy_to_full, signed_magnitude};
use crate::report::RunReport;

/// Direction code meaning a decrease in this question family
const DECREASE: f64 = 3.0;

pub(crate) fn derive(input: &StageInput<'_>, report: &mut RunReport) -> Result<StageOutput> {
    let mut out = StageOutput::default();

    // Earnings growth on the main job over the next 12 months
    copy_to_full(input, &mut out, "Q23v2")?;
    signed_magnitude(input, report, &mut out, "Q23v2", DECREASE, "Q23v2part2", "earnings_change")?;
    // Probabilistic forecast over earnings changes
    copy_indexed_group(input, &mut out, "Q24_")?;

    // Total household income
    copy_to_full(input, &mut out, "Q25v2")?;
    signed_magnitude(input, report, &mut out, "Q25v2", DECREASE, "Q25v2part2", "hh_inc_change")?;

    // Total household spending
    copy_to_full(input, &mut out, "Q26v2")?;
    signed_magnitude(
        input,
        report,
        &mut out,
        "Q26v2",
        DECREASE,
        "Q26v2part2",
        "hh_spending_change",
    )?;

    // Total taxes at the current income
    copy_to_full(input, &mut out, "Q27v2")?;
    signed_magnitude(input, report, &mut out, "Q27v2", DECREASE, "Q27v2part2", "taxes_change")?;

    // Credit access compared to a year ago, and a year from now
    copy_question(input, &mut out, "Q28", "credit_cond_past12m")?;
    copy_question(input, &mut out, "Q29", "credit_cond_12m")?;
    // Chance to miss a debt payment over the next 3 months
    copy_question(input, &mut out, "Q30new", "prob_miss_paym_3m")?;

    Ok(out)
}
