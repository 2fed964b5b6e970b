//! House price and government debt expectations.

use crate::error::Result;
use crate::importer::context::{StageInput, StageOutput};
use crate::importer::stages::{copy_indexed_group, copy_to_full, signed_magnitude};
use crate::report::RunReport;

/// Direction code meaning a decrease in this question family
const DECREASE: f64 = 3.0;

pub(crate) fn derive(input: &StageInput<'_>, report: &mut RunReport) -> Result<StageOutput> {
    let mut out = StageOutput::default();

    // Nationwide house prices over the next 12 months
    copy_to_full(input, &mut out, "Q31v2")?;
    signed_magnitude(
        input,
        report,
        &mut out,
        "Q31v2",
        DECREASE,
        "Q31v2part2",
        "house_price_change",
    )?;
    // Probabilistic forecast over national house price changes
    copy_indexed_group(input, &mut out, "C1_")?;

    // Nationwide house prices between 24 and 36 months from now
    copy_to_full(input, &mut out, "C2")?;
    signed_magnitude(input, report, &mut out, "C2", DECREASE, "C2part2", "house_price_change_3y")?;

    // Outstanding US government debt over the next 12 months
    copy_to_full(input, &mut out, "C3")?;
    signed_magnitude(input, report, &mut out, "C3", DECREASE, "C3part2", "govt_debt_change")?;

    Ok(out)
}
