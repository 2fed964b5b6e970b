//! Panel metadata carried into both output tables.

use crate::error::Result;
use crate::importer::context::{StageInput, StageOutput};
use crate::report::RunReport;
use crate::schema::{RAW_SURVEY_DATE, SURVEY_DATE, TENURE, WEIGHT};

pub(crate) fn derive(input: &StageInput<'_>, _report: &mut RunReport) -> Result<StageOutput> {
    let mut out = StageOutput::default();

    let dates = input.raw.date_column(RAW_SURVEY_DATE, &input.config.date_formats)?;
    out.push_full(SURVEY_DATE, dates.clone());
    out.push_extract(SURVEY_DATE, dates);

    for column in [TENURE, WEIGHT] {
        let values = input.raw.float_column(column)?;
        out.push_full(column, values.clone());
        out.push_extract(column, values);
    }

    Ok(out)
}
