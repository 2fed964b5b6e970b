//! Financial well-being and twelve-month outlook questions.

use crate::error::Result;
use crate::importer::context::{StageInput, StageOutput};
use crate::importer::stages::copy_question;
use crate::report::RunReport;

pub(crate) fn derive(input: &StageInput<'_>, _report: &mut RunReport) -> Result<StageOutput> {
    let mut out = StageOutput::default();

    // Better or worse off financially than 12 months ago, and in 12 months.
    // Unanswered rows get the sentinel so the column stays integral.
    for (question, extract_name) in [("Q1", "financial_past_12m"), ("Q2", "financial_12m")] {
        let sentinel = input.config.opinion_sentinel;
        let codes: Vec<Option<i8>> = input
            .raw
            .float_column(question)?
            .iter()
            .map(|value| Some(value.map_or(sentinel, |v| v as i8)))
            .collect();
        out.push_full(question, codes.clone());
        out.push_extract(extract_name, codes);
    }

    // Chance to move primary residence in the next 12 months
    copy_question(input, &mut out, "Q3", "prob_move_house")?;
    // Chance that unemployment will be higher 12 months from now
    copy_question(input, &mut out, "Q4new", "prob_unrate_up")?;
    // Chance that savings interest rates will be higher 12 months from now
    copy_question(input, &mut out, "Q5new", "prob_irate_up")?;
    // Chance that stock prices will be higher 12 months from now
    copy_question(input, &mut out, "Q6new", "prob_stocks_up")?;

    Ok(out)
}
