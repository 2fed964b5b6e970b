//! The survey import engine.
//!
//! Derivation runs as a fixed sequence of stages over an immutable raw
//! table. Each stage is a pure function of the run context returning the
//! columns it adds; the engine owns all mutation of the output frames, so
//! stage order is explicit here rather than implied by call sites.

pub mod context;
pub mod stages;

pub use context::{StageFn, StageInput, StageOutput};

use std::sync::Arc;

use arrow::array::UInt32Array;
use arrow::record_batch::RecordBatch;
use log::{debug, info};

use crate::config::ImportConfig;
use crate::error::{ImportError, Result};
use crate::frame::{PanelFrame, PanelIndex, PanelKey};
use crate::raw::RawTable;
use crate::report::RunReport;
use crate::schema::{RAW_WAVE, RESPONDENT_ID, SchemaCapabilities};

/// Stage execution order; later stages may read columns inserted by
/// earlier ones
const STAGES: &[(&str, StageFn)] = &[
    ("meta", stages::meta::derive),
    ("outlook", stages::outlook::derive),
    ("inflation", stages::inflation::derive),
    ("employment", stages::employment::derive),
    ("finances", stages::finances::derive),
    ("housing", stages::housing::derive),
    ("literacy", stages::literacy::derive),
    ("demographics", stages::demographics::derive),
    ("household", stages::household::derive),
];

/// Output of a completed import run
#[derive(Debug)]
pub struct ImportOutput {
    /// Near-raw panel keyed by question codes
    pub full: PanelFrame,
    /// Analysis panel keyed by semantic names
    pub extract: PanelFrame,
    /// Accounting of what the run did and skipped
    pub report: RunReport,
}

/// The survey import engine
#[derive(Debug, Clone, Default)]
pub struct SurveyImporter {
    config: ImportConfig,
}

impl SurveyImporter {
    /// Creates an importer with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an importer with an explicit configuration
    #[must_use]
    pub fn with_config(config: ImportConfig) -> Self {
        Self { config }
    }

    /// Runs the full derivation over one response table.
    ///
    /// The table holds one row per interview; rows may arrive in any order
    /// and are sorted by respondent and wave before derivation.
    ///
    /// # Errors
    ///
    /// Returns an error if the table violates a structural requirement:
    /// a missing or duplicated panel key, an absent required column, a
    /// respondent-constant question with conflicting answers, or a broken
    /// skip-pattern invariant.
    pub fn process(&self, batch: &RecordBatch) -> Result<ImportOutput> {
        let raw = RawTable::new(batch.clone());
        let (index, order) = build_index(&raw)?;
        let raw = raw.reordered(&order)?;
        let index = Arc::new(index);
        let caps = SchemaCapabilities::detect(&raw);

        let mut report = RunReport {
            rows: index.len(),
            respondents: index.respondents(),
            spell_distribution: index.spell_distribution(),
            ..RunReport::default()
        };
        for block in caps.missing_blocks() {
            debug!("Vintage lacks the {block} block");
            report.record_skipped_block(block);
        }

        info!(
            "Importing {} interviews from {} respondents",
            index.len(),
            index.respondents()
        );
        if self.config.log_spell_distribution {
            for (length, count) in &report.spell_distribution {
                info!("{count} respondent(s) with {length} interview(s)");
            }
        }

        let mut full = PanelFrame::new(Arc::clone(&index));
        let mut extract = PanelFrame::new(Arc::clone(&index));
        for (name, stage) in STAGES {
            debug!("Running derivation stage '{name}'");
            let output = {
                let stage_input = StageInput {
                    raw: &raw,
                    caps: &caps,
                    index: &index,
                    full: &full,
                    extract: &extract,
                    config: &self.config,
                };
                stage(&stage_input, &mut report)?
            };
            for (column_name, column) in output.full {
                full.insert(column_name, column)?;
            }
            for (column_name, column) in output.extract {
                extract.insert(column_name, column)?;
            }
        }

        Ok(ImportOutput { full, extract, report })
    }
}

/// Processes a response table with the default configuration
///
/// # Errors
///
/// See [`SurveyImporter::process`].
pub fn process_survey(batch: &RecordBatch) -> Result<ImportOutput> {
    SurveyImporter::new().process(batch)
}

/// Extracts the panel keys, sorts them, and returns the index together
/// with the row permutation that puts the raw table in the same order
fn build_index(raw: &RawTable) -> Result<(PanelIndex, UInt32Array)> {
    let respondents = raw.int64_column(RESPONDENT_ID)?;
    let waves = raw.int32_column(RAW_WAVE)?;

    let mut keyed: Vec<(PanelKey, u32)> = Vec::with_capacity(respondents.len());
    for (row, (respondent, wave)) in respondents.iter().zip(&waves).enumerate() {
        let (Some(respondent), Some(wave)) = (respondent, wave) else {
            return Err(ImportError::Schema(format!(
                "row {row} has a missing respondent or wave identifier"
            )));
        };
        keyed.push((PanelKey { respondent: *respondent, wave: *wave }, row as u32));
    }
    keyed.sort_unstable_by_key(|&(key, _)| key);

    let order: UInt32Array = keyed.iter().map(|&(_, row)| row).collect::<Vec<u32>>().into();
    let keys: Vec<PanelKey> = keyed.into_iter().map(|(key, _)| key).collect();
    let index = PanelIndex::from_sorted_keys(keys)?;
    Ok((index, order))
}
