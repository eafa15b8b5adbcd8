//! Data Loader Module
//! Loads CSV files and JSON tables into Polars DataFrames.

use polars::prelude::*;
use serde_json::{Map, Value};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use super::ColumnKind;
use crate::advisor::ChartAdvisor;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("No data loaded")]
    NoData,
    #[error("Not a table: {0}")]
    InvalidShape(String),
}

static NULL: Value = Value::Null;

/// Handles dataset loading and hands out advisors over the loaded frame.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a CSV file. ISO formatted date columns are parsed as temporal.
    pub fn load_csv(&mut self, file_path: &str) -> Result<&DataFrame, LoaderError> {
        self.file_path = Some(PathBuf::from(file_path));

        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_try_parse_dates(true)
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        debug!(
            path = file_path,
            rows = df.height(),
            columns = df.width(),
            "loaded csv"
        );
        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Load a JSON table, either an array of records or an object of columns.
    pub fn load_json(&mut self, value: &Value) -> Result<&DataFrame, LoaderError> {
        self.file_path = None;
        self.df = Some(frame_from_json(value)?);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get names of the columns with the given element kind.
    pub fn get_columns_of_kind(&self, kind: ColumnKind) -> Vec<String> {
        let Some(df) = &self.df else {
            return Vec::new();
        };

        df.get_columns()
            .iter()
            .filter(|col| ColumnKind::of_column(col) == kind)
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Advisor borrowing the loaded DataFrame.
    pub fn advisor(&self) -> Result<ChartAdvisor<'_>, LoaderError> {
        self.df
            .as_ref()
            .map(ChartAdvisor::new)
            .ok_or(LoaderError::NoData)
    }
}

/// Build a DataFrame from `[{"col": v, ..}, ..]` or `{"col": [v, ..], ..}`.
///
/// Column order follows first appearance. Numbers, booleans and strings keep
/// their type when a column is uniform; mixed columns become strings.
pub fn frame_from_json(value: &Value) -> Result<DataFrame, LoaderError> {
    let columns: Vec<(String, Vec<&Value>)> = match value {
        Value::Object(map) => columns_from_object(map)?,
        Value::Array(rows) => columns_from_records(rows)?,
        other => {
            return Err(LoaderError::InvalidShape(format!(
                "expected an array of records or an object of columns, got {}",
                json_kind(other)
            )))
        }
    };

    let columns = columns
        .into_iter()
        .map(|(name, values)| json_column(&name, &values))
        .collect();

    DataFrame::new(columns).map_err(|e| LoaderError::InvalidShape(e.to_string()))
}

fn columns_from_object(map: &Map<String, Value>) -> Result<Vec<(String, Vec<&Value>)>, LoaderError> {
    map.iter()
        .map(|(name, values)| match values {
            Value::Array(values) => Ok((name.clone(), values.iter().collect())),
            other => Err(LoaderError::InvalidShape(format!(
                "column `{}` is {}, not an array",
                name,
                json_kind(other)
            ))),
        })
        .collect()
}

fn columns_from_records(rows: &[Value]) -> Result<Vec<(String, Vec<&Value>)>, LoaderError> {
    let mut names: Vec<String> = Vec::new();
    let mut records: Vec<&Map<String, Value>> = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let Value::Object(record) = row else {
            return Err(LoaderError::InvalidShape(format!(
                "row {} is {}, not a record",
                i,
                json_kind(row)
            )));
        };
        for key in record.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
        records.push(record);
    }

    Ok(names
        .into_iter()
        .map(|name| {
            let values = records
                .iter()
                .map(|record| record.get(&name).unwrap_or(&NULL))
                .collect();
            (name, values)
        })
        .collect())
}

fn json_column(name: &str, values: &[&Value]) -> Column {
    let present = || values.iter().filter(|v| !v.is_null());
    let typed = present().next().is_some();

    if typed && present().all(|v| v.is_i64()) {
        let data: Vec<Option<i64>> = values.iter().map(|v| v.as_i64()).collect();
        Column::new(name.into(), data)
    } else if typed && present().all(|v| v.is_number()) {
        let data: Vec<Option<f64>> = values.iter().map(|v| v.as_f64()).collect();
        Column::new(name.into(), data)
    } else if typed && present().all(|v| v.is_boolean()) {
        let data: Vec<Option<bool>> = values.iter().map(|v| v.as_bool()).collect();
        Column::new(name.into(), data)
    } else {
        let data: Vec<Option<String>> = values
            .iter()
            .map(|v| match v {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect();
        Column::new(name.into(), data)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
