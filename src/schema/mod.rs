//! Naming conventions and coded values for the vendor response tables.
//!
//! Monthly response files share a common core schema; question blocks added
//! or retired over the life of the survey are described by
//! [`SchemaCapabilities`].

pub mod capabilities;
pub mod codes;

pub use capabilities::SchemaCapabilities;

/// Respondent identifier column, present in every vendor file
pub const RESPONDENT_ID: &str = "userid";
/// Wave identifier column in the output panel index
pub const WAVE_ID: &str = "wid";
/// Wave period code as shipped by the vendor, renamed to [`WAVE_ID`] on import
pub const RAW_WAVE: &str = "date";
/// Interview date as shipped by the vendor, renamed to [`SURVEY_DATE`] on import
pub const RAW_SURVEY_DATE: &str = "survey_date";
/// Interview calendar date column in the output tables
pub const SURVEY_DATE: &str = "date";
/// Months the respondent has spent in the rotating panel
pub const TENURE: &str = "tenure";
/// Vendor sampling weight
pub const WEIGHT: &str = "weight";
