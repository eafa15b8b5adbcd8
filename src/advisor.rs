//! Chart Advisor Module
//! Suggests a chart per column and builds charts and dashboards on request.

use polars::prelude::*;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::borrow::Cow;
use thiserror::Error;
use tracing::{debug, trace};

use crate::charts::{ChartPlotter, ChartType, Figure, PlotError, UnknownChartType};
use crate::data::{frame_from_json, ColumnKind, LoaderError};

/// Title of every dashboard figure.
pub const DASHBOARD_TITLE: &str = "Dashboard";

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Data must be a table: {0}")]
    InvalidInputKind(String),
    #[error("Unsupported chart type: {0}")]
    UnsupportedChartType(String),
    #[error(transparent)]
    Plot(#[from] PlotError),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

impl From<UnknownChartType> for AdvisorError {
    fn from(err: UnknownChartType) -> Self {
        AdvisorError::UnsupportedChartType(err.0)
    }
}

/// Suggested chart for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSuggestion {
    pub column: String,
    #[serde(serialize_with = "serialize_label")]
    pub chart: ChartType,
}

fn serialize_label<S: Serializer>(chart: &ChartType, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(chart.label())
}

impl ColumnSuggestion {
    /// Request for the suggested chart with this column on x.
    pub fn request(&self, y: Option<&str>) -> ChartRequest {
        ChartRequest::new(&self.column, y, self.chart.token())
    }
}

/// One chart of a dashboard.
///
/// `chart_type` stays a raw token so unknown types are reported by
/// `generate_chart` rather than at deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub x: String,
    #[serde(default)]
    pub y: Option<String>,
    pub chart_type: String,
}

impl ChartRequest {
    pub fn new(x: &str, y: Option<&str>, chart_type: &str) -> Self {
        Self {
            x: x.to_string(),
            y: y.map(str::to_string),
            chart_type: chart_type.to_string(),
        }
    }
}

/// Classifies the columns of a DataFrame and builds charts from it.
///
/// The DataFrame is only ever read.
#[derive(Debug, Clone)]
pub struct ChartAdvisor<'a> {
    data: Cow<'a, DataFrame>,
}

impl<'a> ChartAdvisor<'a> {
    pub fn new(data: &'a DataFrame) -> Self {
        Self {
            data: Cow::Borrowed(data),
        }
    }

    /// Build an advisor from a JSON table.
    ///
    /// Accepts an array of records or an object of equally long column
    /// arrays; anything else fails with `InvalidInputKind`.
    pub fn from_json(value: &Value) -> Result<ChartAdvisor<'static>, AdvisorError> {
        let df = frame_from_json(value).map_err(|e| match e {
            LoaderError::InvalidShape(reason) => AdvisorError::InvalidInputKind(reason),
            other => AdvisorError::InvalidInputKind(other.to_string()),
        })?;
        Ok(ChartAdvisor {
            data: Cow::Owned(df),
        })
    }

    /// Collect a lazy query and advise on its result.
    pub fn from_lazy(lf: LazyFrame) -> Result<ChartAdvisor<'static>, AdvisorError> {
        Ok(ChartAdvisor {
            data: Cow::Owned(lf.collect()?),
        })
    }

    pub fn dataset(&self) -> &DataFrame {
        &self.data
    }

    /// One suggestion per column, in column order.
    pub fn suggest_chart(&self) -> Vec<ColumnSuggestion> {
        self.data
            .get_columns()
            .iter()
            .map(|col| {
                let kind = ColumnKind::of_column(col);
                let chart = ChartType::suggested_for(kind);
                trace!(column = %col.name(), ?kind, chart = chart.label(), "classified column");
                ColumnSuggestion {
                    column: col.name().to_string(),
                    chart,
                }
            })
            .collect()
    }

    /// Build a chart of `x` (against `y`) of the given type.
    ///
    /// `chart_type` must be one of `line`, `bar`, `scatter` or `histogram`.
    /// Column names are not checked here; a missing column surfaces as
    /// `AdvisorError::Plot`.
    pub fn generate_chart(
        &self,
        x: &str,
        y: Option<&str>,
        chart_type: &str,
    ) -> Result<Figure, AdvisorError> {
        let kind: ChartType = chart_type.parse()?;
        let title = kind.title(x, y);
        debug!(x, ?y, chart_type, %title, "generating chart");

        Ok(ChartPlotter::build(kind, &self.data, x, y, &title)?)
    }

    pub fn generate_request(&self, request: &ChartRequest) -> Result<Figure, AdvisorError> {
        self.generate_chart(&request.x, request.y.as_deref(), &request.chart_type)
    }

    /// Combine the first trace of each requested chart into one figure.
    ///
    /// All traces share a single plot area. Any failing request fails the
    /// whole dashboard.
    pub fn generate_dashboard(&self, charts: &[ChartRequest]) -> Result<Figure, AdvisorError> {
        let mut fig = Figure::new();

        for request in charts {
            let chart = self.generate_request(request)?;
            if let Some(first) = chart.into_traces().into_iter().next() {
                fig.add_trace(first);
            }
        }

        fig.set_title(DASHBOARD_TITLE).show_legend(true);
        debug!(traces = fig.data().len(), "built dashboard");
        Ok(fig)
    }
}

impl<'a> From<&'a DataFrame> for ChartAdvisor<'a> {
    fn from(data: &'a DataFrame) -> Self {
        Self::new(data)
    }
}

impl TryFrom<&Value> for ChartAdvisor<'static> {
    type Error = AdvisorError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        ChartAdvisor::from_json(value)
    }
}
