//! Column Schema Module
//! Maps Polars data types onto the four element kinds used for chart suggestions.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Declared element kind of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Integer and floating point columns
    Numeric,
    /// Dates, datetimes and times of day
    Temporal,
    /// Finite, explicitly tagged label sets
    Categorical,
    /// Free text, booleans, nested and anything else
    Other,
}

impl ColumnKind {
    /// Classify a Polars data type. Looks only at the declared type, never at values.
    pub fn of(dtype: &DataType) -> Self {
        match dtype {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64 => ColumnKind::Numeric,
            DataType::Date | DataType::Datetime(_, _) | DataType::Time => ColumnKind::Temporal,
            DataType::Categorical(_, _) | DataType::Enum(_, _) => ColumnKind::Categorical,
            _ => ColumnKind::Other,
        }
    }

    /// Classify a column of a DataFrame.
    pub fn of_column(column: &Column) -> Self {
        Self::of(column.dtype())
    }
}

/// Name and kind of every column, in declared order.
pub fn column_kinds(df: &DataFrame) -> Vec<(String, ColumnKind)> {
    df.get_columns()
        .iter()
        .map(|col| (col.name().to_string(), ColumnKind::of_column(col)))
        .collect()
}
