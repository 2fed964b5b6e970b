//! Post-run accounting of what the importer did and could not do.
//!
//! Recoverable conditions do not fail a run, but they must not disappear
//! into the log either. The report collects them in structured form so a
//! batch job can assert on them or archive them next to the output.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Result;
use crate::ops::SignResolution;

/// Outcome of one sign normalization
#[derive(Debug, Clone, Serialize)]
pub struct SignEvent {
    /// Magnitude column that was normalized
    pub variable: String,
    /// Direction column that supplied the decrease flags
    pub direction: String,
    /// How the batch was resolved
    pub resolution: SignResolution,
    /// Number of rows flagged as decreases
    pub flagged_rows: usize,
}

/// A downcast that had to be abandoned
#[derive(Debug, Clone, Serialize)]
pub struct CastEvent {
    /// Column that kept its original type
    pub variable: String,
    /// Type the conversion aimed for
    pub target: String,
    /// Number of values that could not be represented
    pub unconverted: usize,
}

/// Summary of a completed import run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Interviews in the panel
    pub rows: usize,
    /// Distinct respondents in the panel
    pub respondents: usize,
    /// Interviews per respondent, keyed by spell length
    pub spell_distribution: BTreeMap<usize, usize>,
    /// Sign normalizations performed, in stage order
    pub sign_events: Vec<SignEvent>,
    /// Downcasts that were abandoned
    pub cast_events: Vec<CastEvent>,
    /// Optional question blocks absent from this vintage
    pub skipped_blocks: Vec<String>,
}

impl RunReport {
    pub(crate) fn record_sign(
        &mut self,
        variable: &str,
        direction: &str,
        resolution: SignResolution,
        flagged_rows: usize,
    ) {
        self.sign_events.push(SignEvent {
            variable: variable.to_string(),
            direction: direction.to_string(),
            resolution,
            flagged_rows,
        });
    }

    pub(crate) fn record_cast(&mut self, variable: &str, target: &str, unconverted: usize) {
        self.cast_events.push(CastEvent {
            variable: variable.to_string(),
            target: target.to_string(),
            unconverted,
        });
    }

    pub(crate) fn record_skipped_block(&mut self, block: &str) {
        self.skipped_blocks.push(block.to_string());
    }

    /// Sign normalizations that could not be resolved
    pub fn ambiguous_signs(&self) -> impl Iterator<Item = &SignEvent> {
        self.sign_events
            .iter()
            .filter(|event| event.resolution == SignResolution::Ambiguous)
    }

    /// Whether the run hit any recoverable condition worth review
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.ambiguous_signs().next().is_some() || !self.cast_events.is_empty()
    }

    /// Serializes the report as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Report`](crate::error::ImportError::Report) if
    /// serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
