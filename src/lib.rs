//! autochart - chart suggestions and quick charts for Polars DataFrames
//!
//! Looks at the declared type of every column to suggest a chart, builds
//! line, bar, scatter and histogram figures from column pairs, and combines
//! several charts into a single dashboard figure.
//!
//! ```no_run
//! use autochart::{ChartAdvisor, ChartRequest, RenderOptions, StaticChartRenderer};
//! use polars::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let df = df!("Sales" => [100, 200, 150], "Region" => ["N", "S", "N"])?;
//! let advisor = ChartAdvisor::new(&df);
//!
//! for suggestion in advisor.suggest_chart() {
//!     println!("{} -> {}", suggestion.column, suggestion.chart);
//! }
//!
//! let fig = advisor.generate_dashboard(&[
//!     ChartRequest::new("Region", Some("Sales"), "bar"),
//!     ChartRequest::new("Sales", None, "histogram"),
//! ])?;
//! let svg = StaticChartRenderer::render_svg(&fig, &RenderOptions::default())?;
//! # let _ = svg;
//! # Ok(())
//! # }
//! ```

pub mod advisor;
pub mod charts;
pub mod config;
pub mod data;
pub mod telemetry;

pub use advisor::{AdvisorError, ChartAdvisor, ChartRequest, ColumnSuggestion, DASHBOARD_TITLE};
pub use charts::{
    ChartPlotter, ChartType, Figure, Layout, PlotError, RenderError, SeriesData,
    StaticChartRenderer, Trace,
};
pub use config::{ConfigError, RenderOptions};
pub use data::{ColumnKind, DataLoader, LoaderError};
