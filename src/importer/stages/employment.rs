//! Employment status and job search questions.

use crate::error::{ImportError, Result};
use crate::importer::context::{StageInput, StageOutput};
use crate::importer::stages::{copy_indexed_group, copy_question, copy_to_full};
use crate::ops::{coalesce, flag_eq, flag_either_eq, map_codes};
use crate::report::RunReport;
use crate::schema::codes::{EmploymentStatus, EmploymentType, JobSearch};

pub(crate) fn derive(input: &StageInput<'_>, _report: &mut RunReport) -> Result<StageOutput> {
    let mut out = StageOutput::default();

    // Employment situation is a multi-select block of indicators
    copy_indexed_group(input, &mut out, "Q10_")?;
    let full_time = input
        .raw
        .float_column(&format!("Q10_{}", EmploymentStatus::FullTime.option_index()))?;
    let part_time = input
        .raw
        .float_column(&format!("Q10_{}", EmploymentStatus::PartTime.option_index()))?;
    out.push_extract("working", flag_either_eq(&full_time, &part_time, 1.0)?);

    // Number of jobs, asked of the working and those on layoff or leave
    copy_question(input, &mut out, "Q11", "num_jobs")?;

    // Working for someone else or self-employed
    let employer_type = input.raw.float_column("Q12new")?;
    out.push_full("Q12new", employer_type.clone());
    out.push_extract(
        "self_employed",
        map_codes(
            &employer_type,
            &[
                (EmploymentType::ForSomeoneElse.code(), 0),
                (EmploymentType::SelfEmployed.code(), 1),
            ],
        ),
    );

    // Chance of losing the current job, and of leaving it voluntarily
    copy_question(input, &mut out, "Q13new", "prob_lose_job")?;
    copy_question(input, &mut out, "Q14new", "prob_leave_job")?;

    // Job search gate for the duration questions below
    let search = input.raw.float_column("Q15")?;
    out.push_full("Q15", search.clone());
    out.push_extract(
        "looking_for_job",
        flag_eq(&search, f64::from(JobSearch::Looking.code())),
    );

    // Unemployment duration is asked only of active searchers
    let searching_duration = input.raw.float_column("Q16")?;
    require_gated(
        &search,
        &searching_duration,
        JobSearch::Looking,
        "Q16",
        "answered only by respondents looking for a job",
    )?;
    out.push_full("Q16", searching_duration.clone());

    // Chance to find and accept a job within 12 and 3 months
    copy_question(input, &mut out, "Q17new", "prob_accept_job_12m")?;
    copy_question(input, &mut out, "Q18new", "prob_accept_job_3m")?;

    // Time out of work is asked only of respondents not searching
    let out_of_work_duration = input.raw.float_column("Q19")?;
    require_gated(
        &search,
        &out_of_work_duration,
        JobSearch::NotLooking,
        "Q19",
        "answered only by respondents not looking for a job",
    )?;
    out.push_full("Q19", out_of_work_duration.clone());

    // The two durations are mutually exclusive by the gate above
    out.push_extract(
        "jobless_length",
        coalesce(&searching_duration, &[&out_of_work_duration])?,
    );

    // Chance to start looking for a job within 12 and 3 months
    copy_question(input, &mut out, "Q20new", "prob_search_job_12m")?;
    copy_question(input, &mut out, "Q21new", "prob_search_job_3m")?;

    // Reemployment chance after a hypothetical job loss this month
    copy_to_full(input, &mut out, "Q22new")?;

    Ok(out)
}

/// Requires that a gated question is missing whenever the gate is not open
fn require_gated(
    gate: &[Option<f64>],
    values: &[Option<f64>],
    open: JobSearch,
    variable: &str,
    detail: &str,
) -> Result<()> {
    let open_code = f64::from(open.code());
    let violations = gate
        .iter()
        .zip(values)
        .filter(|(gate_value, value)| **gate_value != Some(open_code) && value.is_some())
        .count();
    if violations > 0 {
        return Err(ImportError::DomainInvariant {
            variable: variable.to_string(),
            detail: detail.to_string(),
            violations,
        });
    }
    Ok(())
}
