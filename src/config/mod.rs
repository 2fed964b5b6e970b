//! Configuration for the survey importer.

use crate::schema::codes::WellBeing;

/// Configuration for a [`SurveyImporter`](crate::importer::SurveyImporter) run
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Sentinel code stored for unanswered financial well-being questions
    pub opinion_sentinel: i8,
    /// Absolute tolerance when grading the compound-interest literacy answer
    pub literacy_tolerance: f64,
    /// Log the distribution of interviews per respondent after indexing
    pub log_spell_distribution: bool,
    /// Date formats tried when a date column arrives as strings
    pub date_formats: Vec<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            opinion_sentinel: WellBeing::NotAsked.code(),
            literacy_tolerance: 1e-6,
            log_spell_distribution: true,
            date_formats: vec![
                "%Y-%m-%d".to_string(), // ISO format: 2023-01-15
                "%m/%d/%Y".to_string(), // US: 01/15/2023
                "%Y%m%d".to_string(),   // Compact: 20230115
            ],
        }
    }
}
