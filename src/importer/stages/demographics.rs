//! Demographics, mostly asked once per respondent and broadcast across
//! their interviews.

use crate::error::{ImportError, Result};
use crate::frame::{Column, DType};
use crate::importer::context::{StageInput, StageOutput};
use crate::importer::stages::{cast_reported, copy_indexed_group, copy_to_full};
use crate::ops::{broadcast_constant, flag_in, map_codes};
use crate::report::RunReport;

pub(crate) fn derive(input: &StageInput<'_>, report: &mut RunReport) -> Result<StageOutput> {
    let mut out = StageOutput::default();
    let index = input.index.as_ref();

    // Age at panel entry; not asked again in later waves
    let age = broadcast_constant("Q32", &input.raw.float_column("Q32")?, index)?;
    let age = cast_reported(&Column::from(age), DType::Int32, "Q32", report);
    out.push_full("Q32", age.clone());
    out.push_extract("age_init", age);

    // Gender: (1) female (2) male
    let gender = broadcast_constant("Q33", &input.raw.float_column("Q33")?, index)?;
    out.push_extract("female", map_codes(&gender, &[(1, 1), (2, 0)]));
    out.push_full("Q33", cast_reported(&Column::from(gender), DType::UInt8, "Q33", report));

    // Hispanic origin: (1) yes (2) no
    let hispanic = broadcast_constant("Q34", &input.raw.float_column("Q34")?, index)?;
    out.push_extract("hispanic", map_codes(&hispanic, &[(1, 1), (2, 0)]));
    out.push_full("Q34", cast_reported(&Column::from(hispanic), DType::UInt8, "Q34", report));

    // Race is a multi-select block of indicators
    let mut saw_black_indicator = false;
    for name in input.raw.columns_with_indexed_prefix("Q35_") {
        let race = broadcast_constant(&name, &input.raw.float_column(&name)?, index)?;
        let race = cast_reported(&Column::from(race), DType::UInt8, &name, report);
        if name == "Q35_2" {
            saw_black_indicator = true;
            out.push_extract("black", race.clone());
        }
        out.push_full(name, race);
    }
    if !saw_black_indicator {
        return Err(ImportError::ColumnNotFound { column: "Q35_2".to_string() });
    }

    // Highest level of education, eight codes from less than high school to
    // doctorate
    let education = broadcast_constant("Q36", &input.raw.float_column("Q36")?, index)?;
    out.push_extract("college", flag_in(&education, &[5, 6, 7, 8]));
    out.push_extract(
        "educ",
        map_codes(
            &education,
            &[(1, 1), (2, 2), (3, 3), (4, 3), (5, 4), (6, 4), (7, 4), (8, 4)],
        ),
    );
    out.push_full("Q36", cast_reported(&Column::from(education), DType::UInt8, "Q36", report));

    // Years at the current job
    copy_to_full(input, &mut out, "Q37")?;
    // Married or living with a partner; repeat interviews patch this later
    copy_to_full(input, &mut out, "Q38")?;

    // Spouse or partner employment, a multi-select block like Q10
    if input.caps.spouse_employment {
        copy_indexed_group(input, &mut out, "HH2_")?;
    }

    // Years at the primary residence and in the current state
    copy_to_full(input, &mut out, "Q41")?;
    copy_to_full(input, &mut out, "Q42")?;

    // Housing tenure: (1) own (2) rent (3) other
    let housing = input.raw.float_column("Q43")?;
    out.push_full("Q43", housing.clone());
    out.push_extract("owner", map_codes(&housing, &[(1, 1), (2, 0), (3, 0)]));

    // Other homes owned
    copy_to_full(input, &mut out, "Q44")?;

    // Household roster by member category; repeat interviews patch this later
    copy_indexed_group(input, &mut out, "Q45new_")?;

    // Self-reported health on a five-point scale
    let health = input.raw.float_column("Q45b")?;
    out.push_full("Q45b", health.clone());
    out.push_extract(
        "health",
        cast_reported(&Column::from(health), DType::UInt8, "Q45b", report),
    );

    // Share of household financial decisions made by the respondent
    let decisions = broadcast_constant("Q46", &input.raw.float_column("Q46")?, index)?;
    out.push_full("Q46", cast_reported(&Column::from(decisions), DType::UInt8, "Q46", report));

    // Willingness to take financial risk, a late addition to the survey
    if input.caps.financial_risk {
        let appetite = broadcast_constant("QRA1", &input.raw.float_column("QRA1")?, index)?;
        let appetite = cast_reported(&Column::from(appetite), DType::UInt8, "QRA1", report);
        out.push_full("QRA1", appetite.clone());
        out.push_extract("take_fin_risk", appetite);
    }

    // Willingness to take risk in daily activities
    if input.caps.daily_risk {
        let appetite = broadcast_constant("QRA2", &input.raw.float_column("QRA2")?, index)?;
        out.push_full("QRA2", cast_reported(&Column::from(appetite), DType::UInt8, "QRA2", report));
    }

    // Pre-tax household income bracket; repeat interviews patch this later
    copy_to_full(input, &mut out, "Q47")?;

    Ok(out)
}
