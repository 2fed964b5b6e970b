//! Output panel tables.
//!
//! A [`PanelFrame`] is an ordered set of named [`Column`]s sharing one
//! [`PanelIndex`]. The importer produces two frames: the full table keyed by
//! raw question codes and the extract keyed by analysis names.

pub mod column;
pub mod index;

pub use column::{Column, DType};
pub use index::{PanelIndex, PanelKey};

use std::sync::Arc;

use arrow::array::{ArrayRef, Int32Array, Int64Array};
use arrow::record_batch::RecordBatch;
use arrow_schema::{DataType, Field, Schema};
use chrono::NaiveDate;
use rustc_hash::FxHashMap;

use crate::error::{ImportError, Result};
use crate::schema::{RESPONDENT_ID, WAVE_ID};

/// A panel table under construction
#[derive(Debug, Clone)]
pub struct PanelFrame {
    index: Arc<PanelIndex>,
    names: Vec<String>,
    positions: FxHashMap<String, usize>,
    columns: Vec<Column>,
}

impl PanelFrame {
    /// Creates an empty frame over the given index
    #[must_use]
    pub fn new(index: Arc<PanelIndex>) -> Self {
        Self {
            index,
            names: Vec::new(),
            positions: FxHashMap::default(),
            columns: Vec::new(),
        }
    }

    /// The shared panel index
    #[must_use]
    pub fn index(&self) -> &PanelIndex {
        &self.index
    }

    /// Number of rows, equal to the index length
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.index.len()
    }

    /// Number of columns
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Whether a column with this name exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Column names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Inserts a column, replacing any existing column of the same name in
    /// place so the original position is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::LengthMismatch`] if the column length differs
    /// from the index length.
    pub fn insert(&mut self, name: impl Into<String>, column: impl Into<Column>) -> Result<()> {
        let name = name.into();
        let column = column.into();
        if column.len() != self.index.len() {
            return Err(ImportError::LengthMismatch {
                expected: self.index.len(),
                actual: column.len(),
            });
        }
        if let Some(&position) = self.positions.get(&name) {
            self.columns[position] = column;
        } else {
            self.positions.insert(name.clone(), self.columns.len());
            self.names.push(name);
            self.columns.push(column);
        }
        Ok(())
    }

    /// Looks up a column by name
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.positions.get(name).map(|&position| &self.columns[position])
    }

    /// Returns a float column by name.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::ColumnNotFound`] if no such column exists and
    /// [`ImportError::InvalidColumnType`] if it is not a float column.
    pub fn float_column(&self, name: &str) -> Result<&[Option<f64>]> {
        let column = self.required(name)?;
        column.as_float64().ok_or_else(|| ImportError::InvalidColumnType {
            column: name.to_string(),
            expected: DType::Float64.to_string(),
            actual: column.dtype().to_string(),
        })
    }

    /// Returns a date column by name.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::ColumnNotFound`] if no such column exists and
    /// [`ImportError::InvalidColumnType`] if it is not a date column.
    pub fn date_column(&self, name: &str) -> Result<&[Option<NaiveDate>]> {
        let column = self.required(name)?;
        column.as_date().ok_or_else(|| ImportError::InvalidColumnType {
            column: name.to_string(),
            expected: DType::Date.to_string(),
            actual: column.dtype().to_string(),
        })
    }

    fn required(&self, name: &str) -> Result<&Column> {
        self.column(name).ok_or_else(|| ImportError::ColumnNotFound {
            column: name.to_string(),
        })
    }

    /// Materializes the frame as an Arrow record batch.
    ///
    /// The panel key leads the batch as two non-nullable columns followed by
    /// the data columns in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Arrow`] if batch assembly fails.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let respondents: Int64Array = self
            .index
            .keys()
            .iter()
            .map(|key| key.respondent)
            .collect::<Vec<i64>>()
            .into();
        let waves: Int32Array = self
            .index
            .keys()
            .iter()
            .map(|key| key.wave)
            .collect::<Vec<i32>>()
            .into();

        let mut fields = vec![
            Field::new(RESPONDENT_ID, DataType::Int64, false),
            Field::new(WAVE_ID, DataType::Int32, false),
        ];
        let mut arrays: Vec<ArrayRef> = vec![Arc::new(respondents), Arc::new(waves)];

        for (name, column) in self.names.iter().zip(&self.columns) {
            fields.push(Field::new(name, column.dtype().arrow_type(), true));
            arrays.push(column.to_array());
        }

        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
    }
}
