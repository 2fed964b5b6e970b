//! Typed columns for the output panel tables.

use std::fmt;
use std::sync::Arc;

use arrow::array::{ArrayRef, Date32Array, Float64Array, Int8Array, Int32Array, UInt8Array};
use arrow_schema::DataType;
use chrono::NaiveDate;

/// Physical type of a panel column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 64-bit float
    Float64,
    /// 32-bit signed integer
    Int32,
    /// 8-bit signed integer
    Int8,
    /// 8-bit unsigned integer
    UInt8,
    /// Calendar date
    Date,
}

impl DType {
    /// Arrow data type backing this column type
    #[must_use]
    pub const fn arrow_type(self) -> DataType {
        match self {
            Self::Float64 => DataType::Float64,
            Self::Int32 => DataType::Int32,
            Self::Int8 => DataType::Int8,
            Self::UInt8 => DataType::UInt8,
            Self::Date => DataType::Date32,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Float64 => "float64",
            Self::Int32 => "int32",
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Date => "date32",
        };
        write!(f, "{name}")
    }
}

/// A nullable column of the full or extract table
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// 64-bit float values
    Float64(Vec<Option<f64>>),
    /// 32-bit signed integer values
    Int32(Vec<Option<i32>>),
    /// 8-bit signed integer values
    Int8(Vec<Option<i8>>),
    /// 8-bit unsigned integer values
    UInt8(Vec<Option<u8>>),
    /// Calendar date values
    Date(Vec<Option<NaiveDate>>),
}

impl Column {
    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Float64(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Int8(v) => v.len(),
            Self::UInt8(v) => v.len(),
            Self::Date(v) => v.len(),
        }
    }

    /// Whether the column has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Physical type of the column
    #[must_use]
    pub const fn dtype(&self) -> DType {
        match self {
            Self::Float64(_) => DType::Float64,
            Self::Int32(_) => DType::Int32,
            Self::Int8(_) => DType::Int8,
            Self::UInt8(_) => DType::UInt8,
            Self::Date(_) => DType::Date,
        }
    }

    /// Float values, if this is a float column
    #[must_use]
    pub fn as_float64(&self) -> Option<&[Option<f64>]> {
        match self {
            Self::Float64(v) => Some(v),
            _ => None,
        }
    }

    /// Date values, if this is a date column
    #[must_use]
    pub fn as_date(&self) -> Option<&[Option<NaiveDate>]> {
        match self {
            Self::Date(v) => Some(v),
            _ => None,
        }
    }

    /// Unsigned byte values, if this is a `uint8` column
    #[must_use]
    pub fn as_uint8(&self) -> Option<&[Option<u8>]> {
        match self {
            Self::UInt8(v) => Some(v),
            _ => None,
        }
    }

    /// Converts the column into an Arrow array.
    ///
    /// Dates are stored as `Date32`, days since the Unix epoch.
    #[must_use]
    pub fn to_array(&self) -> ArrayRef {
        match self {
            Self::Float64(v) => Arc::new(Float64Array::from(v.clone())),
            Self::Int32(v) => Arc::new(Int32Array::from(v.clone())),
            Self::Int8(v) => Arc::new(Int8Array::from(v.clone())),
            Self::UInt8(v) => Arc::new(UInt8Array::from(v.clone())),
            Self::Date(v) => {
                let days: Vec<Option<i32>> = v
                    .iter()
                    .map(|d| d.map(days_since_epoch))
                    .collect();
                Arc::new(Date32Array::from(days))
            }
        }
    }
}

/// Days between the Unix epoch and `date`
pub(crate) fn days_since_epoch(date: NaiveDate) -> i32 {
    date.signed_duration_since(NaiveDate::default()).num_days() as i32
}

impl From<Vec<Option<f64>>> for Column {
    fn from(values: Vec<Option<f64>>) -> Self {
        Self::Float64(values)
    }
}

impl From<Vec<Option<i32>>> for Column {
    fn from(values: Vec<Option<i32>>) -> Self {
        Self::Int32(values)
    }
}

impl From<Vec<Option<i8>>> for Column {
    fn from(values: Vec<Option<i8>>) -> Self {
        Self::Int8(values)
    }
}

impl From<Vec<Option<u8>>> for Column {
    fn from(values: Vec<Option<u8>>) -> Self {
        Self::UInt8(values)
    }
}

impl From<Vec<u8>> for Column {
    fn from(values: Vec<u8>) -> Self {
        Self::UInt8(values.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<NaiveDate>>> for Column {
    fn from(values: Vec<Option<NaiveDate>>) -> Self {
        Self::Date(values)
    }
}
