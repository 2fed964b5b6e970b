//! Updates reported by repeat respondents.
//!
//! Repeat interviews ask short update questions instead of repeating the
//! baseline battery. This stage folds those updates into the baseline
//! variables inserted by the demographics stage, so every wave reflects the
//! household as of that interview.

use itertools::izip;
use rustc_hash::FxHashMap;

use crate::error::{ImportError, Result};
use crate::frame::{Column, DType};
use crate::importer::context::{StageInput, StageOutput};
use crate::importer::stages::{cast_reported, copy_to_full};
use crate::ops::{
    coalesce, flag_eq, flag_either_eq, flag_in, forward_fill, forward_fill_complete_rows,
    map_codes,
};
use crate::report::RunReport;

/// `D1` code reporting a household composition change
const HOUSEHOLD_CHANGED: f64 = 2.0;

pub(crate) fn derive(input: &StageInput<'_>, report: &mut RunReport) -> Result<StageOutput> {
    let mut out = StageOutput::default();

    // Did household composition change since the last interview?
    let change_code = input.raw.float_column("D1")?;
    out.push_full("D1", change_code.clone());
    let changed = flag_eq(&change_code, HOUSEHOLD_CHANGED);
    out.push_extract("hh_changed", changed.clone());

    // Household roster: waves reporting a change take their counts from the
    // update block, then the last complete roster is carried forward within
    // each respondent. Waves without a signal stay missing until the first
    // complete roster.
    let roster_names = input.raw.columns_with_indexed_prefix("Q45new_");
    let mut roster: Vec<Vec<Option<f64>>> = Vec::with_capacity(roster_names.len());
    for name in &roster_names {
        let baseline = input.full.float_column(name)?;
        let suffix = name.strip_prefix("Q45new_").unwrap_or_default();
        let update = input.raw.float_column(&format!("D2new_{suffix}"))?;
        let merged: Vec<Option<f64>> = izip!(&changed, baseline, &update)
            .map(|(&flag, &base, &update)| if flag == 1 { update } else { base })
            .collect();
        roster.push(merged);
    }
    forward_fill_complete_rows(&mut roster, input.index)?;
    for (name, values) in roster_names.iter().zip(&roster) {
        out.push_full(name.clone(), values.clone());
    }

    // Children implied by the roster: sum of the four child age categories,
    // missing unless all four are known
    let child_categories = ["Q45new_2", "Q45new_3", "Q45new_4", "Q45new_5"];
    let mut children: Vec<Option<f64>> = vec![Some(0.0); input.index.len()];
    for category in child_categories {
        let position = roster_names
            .iter()
            .position(|name| name == category)
            .ok_or_else(|| ImportError::ColumnNotFound { column: category.to_string() })?;
        let counts = &roster[position];
        for (total, count) in children.iter_mut().zip(counts) {
            *total = match (*total, count) {
                (Some(sum), Some(value)) => Some(sum + value),
                _ => None,
            };
        }
    }
    out.push_extract(
        "num_kids",
        cast_reported(&Column::from(children), DType::Int32, "num_kids", report),
    );

    // Moved to a new primary residence since the last interview?
    copy_to_full(input, &mut out, "D3")?;

    // Same employer as at the last interview: (1) same employer (2) same
    // job duties for a new employer
    let same_employer = input.raw.float_column("DSAME")?;
    out.push_full("DSAME", same_employer.clone());
    out.push_extract("same_employer", flag_in(&same_employer, &[1, 2]));

    // Partnership status: the baseline answer patched with the repeat
    // question, then carried over waves where neither question was answered
    let mut partnered =
        coalesce(input.full.float_column("Q38")?, &[&input.raw.float_column("DQ38")?])?;
    forward_fill(&mut partnered, input.index)?;
    out.push_extract("couple", map_codes(&partnered, &[(1, 1), (2, 0)]));
    out.push_full("Q38", partnered);

    // Spouse employment updates folded into the baseline block. A vintage
    // that retired a baseline column keeps the update answers under the
    // baseline name; the question content is the same, only the
    // repeat-interview code differs.
    let mut patched_spouse: FxHashMap<String, Vec<Option<f64>>> = FxHashMap::default();
    if input.caps.spouse_employment_update {
        for update_name in input.raw.columns_with_indexed_prefix("DHH2_") {
            let target = update_name.strip_prefix('D').unwrap_or(&update_name).to_string();
            let update = input.raw.float_column(&update_name)?;
            let merged = if input.full.contains(&target) {
                coalesce(input.full.float_column(&target)?, &[&update])?
            } else {
                update
            };
            out.push_full(target.clone(), merged.clone());
            patched_spouse.insert(target, merged);
        }
    }

    // Spouse working full- or part-time, from the patched block; skipped
    // when the vintage carries only one of the two indicators
    if input.caps.spouse_employment || input.caps.spouse_employment_update {
        if let (Some(full_time), Some(part_time)) = (
            spouse_indicator(input, &patched_spouse, "HH2_1")?,
            spouse_indicator(input, &patched_spouse, "HH2_2")?,
        ) {
            out.push_extract("spouse_working", flag_either_eq(&full_time, &part_time, 1.0)?);
        }
    }

    // Income bracket: the baseline answer patched with the repeat question
    let income = coalesce(input.full.float_column("Q47")?, &[&input.raw.float_column("D6")?])?;
    out.push_extract("hh_inc", income.clone());
    out.push_full("Q47", income);

    Ok(out)
}

/// Reads a spouse employment indicator, preferring the patched values;
/// `None` when neither the update block nor the baseline carries it
fn spouse_indicator(
    input: &StageInput<'_>,
    patched: &FxHashMap<String, Vec<Option<f64>>>,
    name: &str,
) -> Result<Option<Vec<Option<f64>>>> {
    if let Some(values) = patched.get(name) {
        return Ok(Some(values.clone()));
    }
    if input.full.contains(name) {
        return Ok(Some(input.full.float_column(name)?.to_vec()));
    }
    Ok(None)
}
