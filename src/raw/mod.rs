//! Access to the vendor response table.
//!
//! A [`RawTable`] wraps the ingested record batch with name-based lookup and
//! typed extraction. Numeric columns are adapted to the requested type with
//! Arrow's cast kernel, so a question block that ships as `Int64` one month
//! and `Float64` the next reads the same either way.

use arrow::array::{Array, Date32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::compute::kernels::cast::cast;
use arrow::compute::take;
use arrow::record_batch::RecordBatch;
use arrow_schema::DataType;
use chrono::NaiveDate;
use log::warn;
use rustc_hash::FxHashMap;

use crate::error::{ImportError, Result};

/// The vendor response table for one import run
#[derive(Debug, Clone)]
pub struct RawTable {
    batch: RecordBatch,
    positions: FxHashMap<String, usize>,
}

impl RawTable {
    /// Wraps a record batch for column access
    #[must_use]
    pub fn new(batch: RecordBatch) -> Self {
        let positions = batch
            .schema()
            .fields()
            .iter()
            .enumerate()
            .map(|(idx, field)| (field.name().clone(), idx))
            .collect();
        Self { batch, positions }
    }

    /// Number of rows in the table
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Whether a column with this name exists
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Column names in schema order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.batch.schema_ref().fields().iter().map(|field| field.name().as_str())
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.positions.get(name).copied().ok_or_else(|| ImportError::ColumnNotFound {
            column: name.to_string(),
        })
    }

    /// Reads a column as nullable floats.
    ///
    /// Any numeric or boolean storage type is accepted and cast; NaN values
    /// are treated as missing.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::ColumnNotFound`] if the column is absent and
    /// [`ImportError::InvalidColumnType`] if it is not numeric.
    pub fn float_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let column = self.batch.column(self.index_of(name)?);
        let casted;
        let floats = if *column.data_type() == DataType::Float64 {
            column.as_ref()
        } else if is_castable_to_numeric(column.data_type()) {
            casted = cast(column, &DataType::Float64)?;
            casted.as_ref()
        } else {
            return Err(self.type_error(name, &DataType::Float64, column.data_type()));
        };
        let floats = floats
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| self.type_error(name, &DataType::Float64, column.data_type()))?;
        Ok((0..floats.len())
            .map(|row| {
                if floats.is_null(row) {
                    None
                } else {
                    let value = floats.value(row);
                    if value.is_nan() { None } else { Some(value) }
                }
            })
            .collect())
    }

    /// Reads a column as nullable 64-bit integers
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::ColumnNotFound`] if the column is absent and
    /// [`ImportError::InvalidColumnType`] if it is not numeric.
    pub fn int64_column(&self, name: &str) -> Result<Vec<Option<i64>>> {
        let column = self.batch.column(self.index_of(name)?);
        if !is_castable_to_numeric(column.data_type()) {
            return Err(self.type_error(name, &DataType::Int64, column.data_type()));
        }
        let casted = cast(column, &DataType::Int64)?;
        let ints = casted
            .as_any()
            .downcast_ref::<Int64Array>()
            .ok_or_else(|| self.type_error(name, &DataType::Int64, column.data_type()))?;
        Ok((0..ints.len())
            .map(|row| if ints.is_null(row) { None } else { Some(ints.value(row)) })
            .collect())
    }

    /// Reads a column as nullable 32-bit integers
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::ColumnNotFound`] if the column is absent and
    /// [`ImportError::InvalidColumnType`] if it is not numeric.
    pub fn int32_column(&self, name: &str) -> Result<Vec<Option<i32>>> {
        let column = self.batch.column(self.index_of(name)?);
        if !is_castable_to_numeric(column.data_type()) {
            return Err(self.type_error(name, &DataType::Int32, column.data_type()));
        }
        let casted = cast(column, &DataType::Int32)?;
        let ints = casted
            .as_any()
            .downcast_ref::<Int32Array>()
            .ok_or_else(|| self.type_error(name, &DataType::Int32, column.data_type()))?;
        Ok((0..ints.len())
            .map(|row| if ints.is_null(row) { None } else { Some(ints.value(row)) })
            .collect())
    }

    /// Reads a column as calendar dates.
    ///
    /// `Date32`, `Date64` and timestamp columns are converted directly;
    /// string columns are parsed with the supplied formats, first match wins.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::ColumnNotFound`] if the column is absent and
    /// [`ImportError::InvalidColumnType`] if it is neither temporal nor text.
    pub fn date_column(&self, name: &str, formats: &[String]) -> Result<Vec<Option<NaiveDate>>> {
        let column = self.batch.column(self.index_of(name)?);
        match column.data_type() {
            DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
                let casted = cast(column, &DataType::Date32)?;
                let days = casted
                    .as_any()
                    .downcast_ref::<Date32Array>()
                    .ok_or_else(|| self.type_error(name, &DataType::Date32, column.data_type()))?;
                Ok((0..days.len())
                    .map(|row| {
                        if days.is_null(row) {
                            None
                        } else {
                            date_from_epoch_days(days.value(row))
                        }
                    })
                    .collect())
            }
            DataType::Utf8 => {
                let strings = column
                    .as_any()
                    .downcast_ref::<StringArray>()
                    .ok_or_else(|| self.type_error(name, &DataType::Utf8, column.data_type()))?;
                let mut unparsed = 0usize;
                let dates = (0..strings.len())
                    .map(|row| {
                        if strings.is_null(row) {
                            None
                        } else {
                            let parsed = parse_date(strings.value(row), formats);
                            if parsed.is_none() {
                                unparsed += 1;
                            }
                            parsed
                        }
                    })
                    .collect();
                if unparsed > 0 {
                    warn!("Could not parse {unparsed} values in date column '{name}'");
                }
                Ok(dates)
            }
            DataType::Null => Ok(vec![None; column.len()]),
            other => Err(self.type_error(name, &DataType::Date32, other)),
        }
    }

    /// Finds columns named `<prefix><digits>`, ordered by the numeric suffix.
    ///
    /// Question groups like `Q10_1`, `Q10_2` are discovered this way; a name
    /// with a non-numeric suffix does not belong to the group.
    #[must_use]
    pub fn columns_with_indexed_prefix(&self, prefix: &str) -> Vec<String> {
        let mut found: Vec<(u32, String)> = self
            .column_names()
            .filter_map(|name| {
                let suffix = name.strip_prefix(prefix)?;
                if suffix.is_empty() {
                    return None;
                }
                suffix.parse::<u32>().ok().map(|index| (index, name.to_string()))
            })
            .collect();
        found.sort_unstable();
        found.into_iter().map(|(_, name)| name).collect()
    }

    /// Returns a copy of the table with rows rearranged by `order`.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Arrow`] if an index is out of bounds.
    pub fn reordered(&self, order: &arrow::array::UInt32Array) -> Result<Self> {
        let columns = self
            .batch
            .columns()
            .iter()
            .map(|column| take(column.as_ref(), order, None))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let batch = RecordBatch::try_new(self.batch.schema(), columns)?;
        Ok(Self::new(batch))
    }

    fn type_error(&self, name: &str, expected: &DataType, actual: &DataType) -> ImportError {
        ImportError::InvalidColumnType {
            column: name.to_string(),
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        }
    }
}

fn is_castable_to_numeric(data_type: &DataType) -> bool {
    data_type.is_numeric() || matches!(data_type, DataType::Boolean | DataType::Null)
}

fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    chrono::TimeDelta::try_days(i64::from(days))
        .and_then(|delta| NaiveDate::default().checked_add_signed(delta))
}

fn parse_date(text: &str, formats: &[String]) -> Option<NaiveDate> {
    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text.trim(), format).ok())
}
