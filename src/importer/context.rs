//! Shared context threaded through the derivation stages.

use std::sync::Arc;

use crate::config::ImportConfig;
use crate::error::Result;
use crate::frame::{Column, PanelFrame, PanelIndex};
use crate::raw::RawTable;
use crate::report::RunReport;
use crate::schema::SchemaCapabilities;

/// Read-only view of the run handed to each derivation stage
#[derive(Debug)]
pub struct StageInput<'a> {
    /// The vendor response table, in panel order
    pub raw: &'a RawTable,
    /// Optional question blocks present in this vintage
    pub caps: &'a SchemaCapabilities,
    /// The shared panel index
    pub index: &'a Arc<PanelIndex>,
    /// Full-table columns inserted by earlier stages
    pub full: &'a PanelFrame,
    /// Extract columns inserted by earlier stages
    pub extract: &'a PanelFrame,
    /// Run configuration
    pub config: &'a ImportConfig,
}

/// Columns produced by one derivation stage.
///
/// Stages never write to the frames directly; they queue columns here and
/// the engine applies them, so a failed stage leaves the frames untouched.
#[derive(Debug, Default)]
pub struct StageOutput {
    pub(crate) full: Vec<(String, Column)>,
    pub(crate) extract: Vec<(String, Column)>,
}

impl StageOutput {
    /// Queues a column for the full table
    pub fn push_full(&mut self, name: impl Into<String>, column: impl Into<Column>) {
        self.full.push((name.into(), column.into()));
    }

    /// Queues a column for the extract
    pub fn push_extract(&mut self, name: impl Into<String>, column: impl Into<Column>) {
        self.extract.push((name.into(), column.into()));
    }
}

/// A derivation stage over the shared context
pub type StageFn = fn(&StageInput<'_>, &mut RunReport) -> Result<StageOutput>;
