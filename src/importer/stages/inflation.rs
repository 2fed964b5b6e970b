//! Inflation expectations at one, three and five year horizons.
//!
//! Each horizon pairs a direction question (inflation or deflation) with a
//! magnitude in percent, plus a probabilistic forecast over outcome bins.
//! The five-year block exists only in later vintages, and its bins were
//! retired again before the block itself.

use crate::error::Result;
use crate::importer::context::{StageInput, StageOutput};
use crate::importer::stages::{copy_to_full, signed_magnitude};
use crate::report::RunReport;

/// Direction code meaning deflation in the inflation question family
const DEFLATION: f64 = 2.0;

pub(crate) fn derive(input: &StageInput<'_>, report: &mut RunReport) -> Result<StageOutput> {
    let mut out = StageOutput::default();

    // Inflation over the next 12 months
    copy_to_full(input, &mut out, "Q8v2")?;
    signed_magnitude(input, report, &mut out, "Q8v2", DEFLATION, "Q8v2part2", "infl_1y")?;
    copy_bin_grid(input, &mut out, "Q9_bin")?;
    copy_moments(input, &mut out, "Q9", "infl_1y")?;

    // Inflation between 24 and 36 months from the interview
    copy_to_full(input, &mut out, "Q9bv2")?;
    signed_magnitude(input, report, &mut out, "Q9bv2", DEFLATION, "Q9bv2part2", "infl_3y")?;
    copy_bin_grid(input, &mut out, "Q9c_bin")?;
    copy_moments(input, &mut out, "Q9c", "infl_3y")?;

    // Inflation between 48 and 60 months, present in later vintages only
    if input.caps.five_year_inflation {
        copy_to_full(input, &mut out, "Q1a")?;
        signed_magnitude(input, report, &mut out, "Q1a", DEFLATION, "Q1apart2", "infl_5y")?;
        if input.caps.five_year_bins {
            for name in input.raw.columns_with_indexed_prefix("Q9new2_bin") {
                out.push_full(name.clone(), input.raw.float_column(&name)?);
            }
        }
    }

    Ok(out)
}

/// Copies the ten forecast bins of a horizon into the full table
fn copy_bin_grid(input: &StageInput<'_>, out: &mut StageOutput, prefix: &str) -> Result<()> {
    for bin in 1..=10 {
        let name = format!("{prefix}{bin}");
        out.push_full(name.clone(), input.raw.float_column(&name)?);
    }
    Ok(())
}

/// Copies the vendor-computed moments of a bin forecast into the extract
fn copy_moments(
    input: &StageInput<'_>,
    out: &mut StageOutput,
    question: &str,
    horizon: &str,
) -> Result<()> {
    for (suffix, moment) in [
        ("mean", "bin_mean"),
        ("var", "bin_var"),
        ("cent50", "bin_median"),
        ("iqr", "bin_iqr"),
        ("probdeflation", "bin_prob_defl"),
    ] {
        let values = input.raw.float_column(&format!("{question}_{suffix}"))?;
        out.push_extract(format!("{horizon}_{moment}"), values);
    }
    Ok(())
}
