//! A Rust library for transforming Survey of Consumer Expectations microdata
//! into analysis-ready panel datasets, with sign normalization, cross-wave
//! reconciliation and income rank merging.

pub mod config;
pub mod error;
pub mod frame;
pub mod importer;
pub mod ops;
pub mod rank;
pub mod raw;
pub mod report;
pub mod schema;

// Re-export the most common types for easier use
// Core types
pub use config::ImportConfig;
pub use error::{ImportError, Result};
pub use importer::{ImportOutput, SurveyImporter, process_survey};

// Panel tables
pub use frame::{Column, DType, PanelFrame, PanelIndex, PanelKey};
pub use raw::RawTable;

// Arrow types
pub use arrow::datatypes::Schema as ArrowSchema;
pub use arrow::record_batch::RecordBatch;

// Income rank merging
pub use rank::{RankRecord, RankTable, fiscal_year};

// Run accounting
pub use ops::SignResolution;
pub use report::{CastEvent, RunReport, SignEvent};
pub use schema::SchemaCapabilities;
