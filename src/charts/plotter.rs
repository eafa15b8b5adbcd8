//! Chart Plotter Module
//! Builds single-trace figures from DataFrame columns.

use polars::prelude::*;
use thiserror::Error;

use super::{ChartType, Figure, SeriesData, Trace};
use crate::data::ColumnKind;

const MS_PER_DAY: i64 = 86_400_000;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("{token} chart requires a {axis} column", token = .chart.token())]
    MissingAxis {
        chart: ChartType,
        axis: &'static str,
    },
}

/// Creates figures for the four supported chart types.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Line chart of `y` over `x`.
    pub fn line(
        df: &DataFrame,
        x: &str,
        y: Option<&str>,
        title: &str,
    ) -> Result<Figure, PlotError> {
        Self::xy_chart(df, ChartType::Line, x, y, title)
    }

    /// Bar chart with one bar per row.
    pub fn bar(
        df: &DataFrame,
        x: &str,
        y: Option<&str>,
        title: &str,
    ) -> Result<Figure, PlotError> {
        Self::xy_chart(df, ChartType::Bar, x, y, title)
    }

    pub fn scatter(
        df: &DataFrame,
        x: &str,
        y: Option<&str>,
        title: &str,
    ) -> Result<Figure, PlotError> {
        Self::xy_chart(df, ChartType::Scatter, x, y, title)
    }

    /// Histogram of `x`. Binning happens at render time.
    pub fn histogram(df: &DataFrame, x: &str, title: &str) -> Result<Figure, PlotError> {
        let trace = Trace {
            name: title.to_string(),
            kind: ChartType::Histogram,
            x: Self::extract(df, x)?,
            y: None,
        };

        let mut fig = Figure::new();
        fig.add_trace(trace)
            .set_title(title)
            .set_axis_titles(x, Some("count".to_string()));
        Ok(fig)
    }

    /// Dispatch to the constructor for `kind`.
    pub fn build(
        kind: ChartType,
        df: &DataFrame,
        x: &str,
        y: Option<&str>,
        title: &str,
    ) -> Result<Figure, PlotError> {
        match kind {
            ChartType::Line => Self::line(df, x, y, title),
            ChartType::Bar => Self::bar(df, x, y, title),
            ChartType::Scatter => Self::scatter(df, x, y, title),
            ChartType::Histogram => Self::histogram(df, x, title),
        }
    }

    fn xy_chart(
        df: &DataFrame,
        kind: ChartType,
        x: &str,
        y: Option<&str>,
        title: &str,
    ) -> Result<Figure, PlotError> {
        let y = y.ok_or(PlotError::MissingAxis {
            chart: kind,
            axis: "y",
        })?;

        let trace = Trace {
            name: title.to_string(),
            kind,
            x: Self::extract(df, x)?,
            y: Some(Self::extract(df, y)?),
        };

        let mut fig = Figure::new();
        fig.add_trace(trace)
            .set_title(title)
            .set_axis_titles(x, Some(y.to_string()));
        Ok(fig)
    }

    /// Pull a column out of the DataFrame as plottable values.
    ///
    /// Temporal columns become epoch milliseconds (times of day: milliseconds
    /// since midnight), numeric ones `f64`, everything else its string form.
    pub fn extract(df: &DataFrame, name: &str) -> Result<SeriesData, PlotError> {
        let column = df.column(name)?;

        let data = match column.dtype() {
            DataType::Date => {
                let days = column.cast(&DataType::Int32)?;
                let days = days.as_materialized_series().i32()?;
                SeriesData::Temporal(
                    days.into_iter()
                        .map(|d| d.map(|d| i64::from(d) * MS_PER_DAY))
                        .collect(),
                )
            }
            DataType::Datetime(unit, _) => {
                let divisor = match unit {
                    TimeUnit::Nanoseconds => 1_000_000,
                    TimeUnit::Microseconds => 1_000,
                    TimeUnit::Milliseconds => 1,
                };
                let raw = column.cast(&DataType::Int64)?;
                let raw = raw.as_materialized_series().i64()?;
                SeriesData::Temporal(
                    raw.into_iter()
                        .map(|v| v.map(|v| v.div_euclid(divisor)))
                        .collect(),
                )
            }
            DataType::Time => {
                let nanos = column.cast(&DataType::Int64)?;
                let nanos = nanos.as_materialized_series().i64()?;
                SeriesData::Temporal(
                    nanos
                        .into_iter()
                        .map(|v| v.map(|v| v / 1_000_000))
                        .collect(),
                )
            }
            dtype if ColumnKind::of(dtype) == ColumnKind::Numeric => {
                let values = column.cast(&DataType::Float64)?;
                let values = values.as_materialized_series().f64()?;
                SeriesData::Numeric(values.into_iter().collect())
            }
            _ => {
                let text = column.cast(&DataType::String)?;
                let text = text.as_materialized_series().str()?;
                SeriesData::Labels(
                    text.into_iter()
                        .map(|s| s.map(str::to_string))
                        .collect(),
                )
            }
        };

        Ok(data)
    }
}
