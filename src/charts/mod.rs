//! Charts module - chart vocabulary, figures, construction and rendering

mod figure;
mod kind;
mod plotter;
mod renderer;

pub use figure::{Figure, Layout, SeriesData, Trace};
pub use kind::{ChartType, UnknownChartType};
pub use plotter::{ChartPlotter, PlotError};
pub use renderer::{RenderError, StaticChartRenderer};
