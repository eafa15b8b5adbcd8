//! Static Chart Renderer
//! Draws a `Figure` to SVG or PNG with plotters.
//!
//! Layout:
//! 1. Title (figure title) centered on top
//! 2. One shared plot area holding every trace
//! 3. Legend in the upper right when the figure asks for it
//!
//! Label-valued axes place each distinct label in a slot, in order of first
//! appearance across traces. Temporal axes are plotted in epoch milliseconds.

use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

use super::{ChartType, Figure, SeriesData, Trace};
use crate::config::RenderOptions;

const MS_PER_DAY: f64 = 86_400_000.0;
const BAR_FILL: f64 = 0.8;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Backend(String),
    #[error("Figure has no plottable points")]
    EmptyFigure,
    #[error("{axis} axis range overflows f64")]
    RangeOverflow { axis: &'static str },
}

fn backend<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Backend(err.to_string())
}

/// Geometry of one trace in plot coordinates.
#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Line(Vec<(f64, f64)>),
    Points(Vec<(f64, f64)>),
    /// (left, right, height)
    Bars(Vec<(f64, f64, f64)>),
}

impl Shape {
    fn is_empty(&self) -> bool {
        match self {
            Shape::Line(p) | Shape::Points(p) => p.is_empty(),
            Shape::Bars(b) => b.is_empty(),
        }
    }
}

/// Label slots shared by every trace on one axis.
#[derive(Debug, Default)]
struct Slots {
    labels: Vec<String>,
}

impl Slots {
    fn slot(&mut self, label: &str) -> f64 {
        let idx = match self.labels.iter().position(|l| l == label) {
            Some(idx) => idx,
            None => {
                self.labels.push(label.to_string());
                self.labels.len() - 1
            }
        };
        idx as f64
    }

    fn coords(&mut self, data: &SeriesData) -> Vec<Option<f64>> {
        match data {
            SeriesData::Numeric(v) => v.iter().map(|x| x.filter(|x| x.is_finite())).collect(),
            SeriesData::Temporal(v) => v.iter().map(|x| x.map(|x| x as f64)).collect(),
            SeriesData::Labels(v) => v
                .iter()
                .map(|x| x.as_deref().map(|l| self.slot(l)))
                .collect(),
        }
    }
}

/// How tick values are printed.
#[derive(Debug, Clone)]
enum AxisFormat {
    Number,
    Temporal { span: f64 },
    Labels(Vec<String>),
}

impl AxisFormat {
    fn label(&self, v: f64) -> String {
        match self {
            AxisFormat::Number => {
                if v.fract() == 0.0 {
                    format!("{:.0}", v)
                } else {
                    format!("{:.2}", v)
                }
            }
            AxisFormat::Temporal { span } => {
                let pattern = if *span < MS_PER_DAY {
                    "%H:%M:%S"
                } else {
                    "%Y-%m-%d"
                };
                chrono::DateTime::from_timestamp_millis(v as i64)
                    .map(|dt| dt.format(pattern).to_string())
                    .unwrap_or_default()
            }
            AxisFormat::Labels(labels) => {
                let rounded = v.round();
                if (v - rounded).abs() > 1e-6 || rounded < 0.0 {
                    return String::new();
                }
                labels.get(rounded as usize).cloned().unwrap_or_default()
            }
        }
    }
}

/// Axis extent accumulated over all shapes.
#[derive(Debug, Clone, Copy)]
struct Extent {
    min: f64,
    max: f64,
}

impl Extent {
    fn empty() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn include(&mut self, v: f64) {
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }

    fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Padded plot range. Fails when its width does not fit in an `f64`.
    fn padded(&self, axis: &'static str) -> Result<std::ops::Range<f64>, RenderError> {
        let range = if self.min == self.max {
            (self.min - 1.0)..(self.max + 1.0)
        } else {
            let pad = (self.max - self.min) * 0.05;
            (self.min - pad)..(self.max + pad)
        };

        if (range.end - range.start).is_finite() {
            Ok(range)
        } else {
            Err(RenderError::RangeOverflow { axis })
        }
    }
}

/// Renders figures into static images.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render to an SVG document.
    pub fn render_svg(fig: &Figure, opts: &RenderOptions) -> Result<String, RenderError> {
        let mut svg = String::new();
        {
            let root =
                SVGBackend::with_string(&mut svg, (opts.width, opts.height)).into_drawing_area();
            Self::draw(&root, fig, opts)?;
            root.present().map_err(backend)?;
        }
        Ok(svg)
    }

    /// Render to a PNG file.
    pub fn render_png(
        fig: &Figure,
        path: impl AsRef<Path>,
        opts: &RenderOptions,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path.as_ref(), (opts.width, opts.height)).into_drawing_area();
        Self::draw(&root, fig, opts)?;
        root.present().map_err(backend)?;
        Ok(())
    }

    fn draw<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        fig: &Figure,
        opts: &RenderOptions,
    ) -> Result<(), RenderError> {
        let mut x_slots = Slots::default();
        let mut y_slots = Slots::default();

        let shapes: Vec<Shape> = fig
            .data()
            .iter()
            .map(|trace| Self::shape(trace, &mut x_slots, &mut y_slots))
            .collect();

        if shapes.iter().all(Shape::is_empty) {
            return Err(RenderError::EmptyFigure);
        }

        let (x_extent, y_extent) = Self::extents(&shapes);
        let x_range = x_extent.padded("x")?;
        let y_range = y_extent.padded("y")?;
        let x_format = Self::axis_format(fig.data(), x_slots, &x_extent, |t| Some(&t.x));
        let y_format = Self::axis_format(fig.data(), y_slots, &y_extent, |t| t.y.as_ref());

        root.fill(&WHITE).map_err(backend)?;

        let mut builder = ChartBuilder::on(root);
        builder
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60);
        if let Some(title) = fig.title() {
            builder.caption(
                title,
                (opts.font_family.as_str(), f64::from(opts.title_font_size)).into_font(),
            );
        }
        let mut chart = builder
            .build_cartesian_2d(x_range, y_range)
            .map_err(backend)?;

        let layout = fig.layout();
        chart
            .configure_mesh()
            .x_desc(layout.x_axis_title.clone().unwrap_or_default())
            .y_desc(layout.y_axis_title.clone().unwrap_or_default())
            .x_label_formatter(&|v| x_format.label(*v))
            .y_label_formatter(&|v| y_format.label(*v))
            .draw()
            .map_err(backend)?;

        for (idx, (trace, shape)) in fig.data().iter().zip(shapes).enumerate() {
            let (r, g, b) = opts.color(idx);
            let color = RGBColor(r, g, b);

            let anno = match shape {
                Shape::Line(points) => chart
                    .draw_series(LineSeries::new(points, color.stroke_width(2)))
                    .map_err(backend)?,
                Shape::Points(points) => chart
                    .draw_series(
                        points
                            .into_iter()
                            .map(|p| Circle::new(p, 3, color.filled())),
                    )
                    .map_err(backend)?,
                Shape::Bars(bars) => chart
                    .draw_series(bars.into_iter().map(|(left, right, height)| {
                        Rectangle::new([(left, 0.0), (right, height)], color.mix(0.8).filled())
                    }))
                    .map_err(backend)?,
            };

            if layout.show_legend {
                anno.label(trace.name.clone()).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
            }
        }

        if layout.show_legend {
            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(backend)?;
        }

        Ok(())
    }

    fn shape(trace: &Trace, x_slots: &mut Slots, y_slots: &mut Slots) -> Shape {
        let xs = x_slots.coords(&trace.x);

        if trace.kind == ChartType::Histogram {
            return if trace.x.is_labels() {
                Shape::Bars(Self::count_slots(&xs))
            } else {
                Shape::Bars(Self::bin(&xs))
            };
        }

        let ys = match &trace.y {
            Some(y) => y_slots.coords(y),
            None => Vec::new(),
        };
        let points: Vec<(f64, f64)> = xs
            .into_iter()
            .zip(ys)
            .filter_map(|(x, y)| Some((x?, y?)))
            .collect();

        match trace.kind {
            ChartType::Line => Shape::Line(points),
            ChartType::Scatter => Shape::Points(points),
            _ => Shape::Bars(Self::bars(&points)),
        }
    }

    /// One bar per point, sized to the closest gap between distinct x values.
    fn bars(points: &[(f64, f64)]) -> Vec<(f64, f64, f64)> {
        let mut xs: Vec<f64> = points.iter().map(|p| p.0).collect();
        xs.sort_by(|a, b| a.total_cmp(b));
        xs.dedup();

        let gap = xs
            .windows(2)
            .map(|w| w[1] - w[0])
            .fold(f64::INFINITY, f64::min);
        let width = if gap.is_finite() { gap * BAR_FILL } else { BAR_FILL };

        points
            .iter()
            .map(|&(x, y)| (x - width / 2.0, x + width / 2.0, y))
            .collect()
    }

    /// Counts per label slot.
    fn count_slots(xs: &[Option<f64>]) -> Vec<(f64, f64, f64)> {
        let slots = xs.iter().flatten().fold(0.0f64, |m, &x| m.max(x + 1.0)) as usize;
        let mut counts = vec![0usize; slots];
        for &x in xs.iter().flatten() {
            counts[x as usize] += 1;
        }
        counts
            .into_iter()
            .enumerate()
            .filter(|(_, c)| *c > 0)
            .map(|(slot, c)| {
                let slot = slot as f64;
                (slot - BAR_FILL / 2.0, slot + BAR_FILL / 2.0, c as f64)
            })
            .collect()
    }

    /// Equal-width bins, count chosen with Sturges' rule.
    fn bin(xs: &[Option<f64>]) -> Vec<(f64, f64, f64)> {
        let values: Vec<f64> = xs.iter().flatten().copied().collect();
        if values.is_empty() {
            return Vec::new();
        }

        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            return vec![(lo - 0.5, hi + 0.5, values.len() as f64)];
        }

        let bins = (values.len() as f64).log2().ceil() as usize + 1;
        // Halved before subtracting so extreme values keep finite edges.
        let width = (hi / 2.0 - lo / 2.0) / bins as f64 * 2.0;
        let mut counts = vec![0usize; bins];
        for v in &values {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, c)| {
                let left = lo + i as f64 * width;
                (left, left + width, c as f64)
            })
            .collect()
    }

    fn extents(shapes: &[Shape]) -> (Extent, Extent) {
        let mut x = Extent::empty();
        let mut y = Extent::empty();

        for shape in shapes {
            match shape {
                Shape::Line(points) | Shape::Points(points) => {
                    for &(px, py) in points {
                        x.include(px);
                        y.include(py);
                    }
                }
                Shape::Bars(bars) => {
                    for &(left, right, height) in bars {
                        x.include(left);
                        x.include(right);
                        y.include(0.0);
                        y.include(height);
                    }
                }
            }
        }

        if x.is_empty() {
            x.include(0.0);
        }
        if y.is_empty() {
            y.include(0.0);
        }
        (x, y)
    }

    /// Pick a tick format from the data every trace puts on the axis.
    fn axis_format(
        traces: &[Trace],
        slots: Slots,
        extent: &Extent,
        axis: impl Fn(&Trace) -> Option<&SeriesData>,
    ) -> AxisFormat {
        // Histograms put counts on y, which `axis` reports as None.
        let plotted: Vec<&SeriesData> = traces.iter().filter_map(|t| axis(t)).collect();
        let has_counts = plotted.len() < traces.len();

        if plotted.is_empty() || has_counts {
            return AxisFormat::Number;
        }
        if plotted.iter().all(|d| d.is_labels()) {
            return AxisFormat::Labels(slots.labels);
        }
        if plotted.iter().all(|d| d.is_temporal()) {
            return AxisFormat::Temporal {
                span: extent.max - extent.min,
            };
        }
        AxisFormat::Number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(values: &[f64]) -> SeriesData {
        SeriesData::Numeric(values.iter().copied().map(Some).collect())
    }

    #[test]
    fn sturges_bins_cover_every_value() {
        let xs: Vec<Option<f64>> = (0..8).map(|v| Some(v as f64)).collect();
        let bins = StaticChartRenderer::bin(&xs);
        assert_eq!(bins.len(), 4);
        let total: f64 = bins.iter().map(|b| b.2).sum();
        assert_eq!(total, 8.0);
        assert_eq!(bins[0].0, 0.0);
        assert_eq!(bins[3].1, 7.0);
    }

    #[test]
    fn constant_values_make_one_bin() {
        let bins = StaticChartRenderer::bin(&[Some(2.0), Some(2.0), None]);
        assert_eq!(bins, vec![(1.5, 2.5, 2.0)]);
    }

    #[test]
    fn labels_share_slots_across_traces() {
        let mut slots = Slots::default();
        let a = slots.coords(&SeriesData::Labels(vec![Some("A".into()), Some("B".into())]));
        let b = slots.coords(&SeriesData::Labels(vec![Some("B".into()), None]));
        assert_eq!(a, vec![Some(0.0), Some(1.0)]);
        assert_eq!(b, vec![Some(1.0), None]);
    }

    #[test]
    fn label_histogram_counts_per_slot() {
        let bars = StaticChartRenderer::count_slots(&[Some(0.0), Some(1.0), Some(0.0)]);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].2, 2.0);
        assert_eq!(bars[1].2, 1.0);
    }

    #[test]
    fn bar_width_follows_closest_gap() {
        let bars = StaticChartRenderer::bars(&[(0.0, 1.0), (10.0, 2.0), (12.0, 3.0)]);
        let width = bars[0].1 - bars[0].0;
        assert!((width - 2.0 * BAR_FILL).abs() < 1e-9);
    }

    #[test]
    fn null_points_are_dropped() {
        let trace = Trace {
            name: "t".into(),
            kind: ChartType::Scatter,
            x: SeriesData::Numeric(vec![Some(1.0), None, Some(3.0)]),
            y: Some(numeric(&[1.0, 2.0, 3.0])),
        };
        let shape =
            StaticChartRenderer::shape(&trace, &mut Slots::default(), &mut Slots::default());
        assert_eq!(shape, Shape::Points(vec![(1.0, 1.0), (3.0, 3.0)]));
    }

    #[test]
    fn label_axis_prints_only_whole_slots() {
        let fmt = AxisFormat::Labels(vec!["A".into(), "B".into()]);
        assert_eq!(fmt.label(1.0), "B");
        assert_eq!(fmt.label(0.5), "");
        assert_eq!(fmt.label(-1.0), "");
        assert_eq!(fmt.label(5.0), "");
    }

    #[test]
    fn temporal_axis_prints_dates() {
        let fmt = AxisFormat::Temporal { span: 10.0 * MS_PER_DAY };
        assert_eq!(fmt.label(MS_PER_DAY), "1970-01-02");
    }

    #[test]
    fn extreme_bins_have_finite_edges() {
        let bins = StaticChartRenderer::bin(&[Some(-1e308), Some(1e308), Some(0.0)]);
        assert!(bins.iter().all(|b| b.0.is_finite() && b.1.is_finite()));
        let total: f64 = bins.iter().map(|b| b.2).sum();
        assert_eq!(total, 3.0);
    }

    #[test]
    fn overflowing_axis_range_is_an_error() {
        let extreme = numeric(&[-1e308, 1e308, 0.0]);

        let mut scatter = Figure::new();
        scatter.add_trace(Trace {
            name: "t".into(),
            kind: ChartType::Scatter,
            x: extreme.clone(),
            y: Some(numeric(&[1.0, 2.0, 3.0])),
        });
        let err = StaticChartRenderer::render_svg(&scatter, &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::RangeOverflow { axis: "x" }));

        let mut histogram = Figure::new();
        histogram.add_trace(Trace {
            name: "h".into(),
            kind: ChartType::Histogram,
            x: extreme,
            y: None,
        });
        let err =
            StaticChartRenderer::render_svg(&histogram, &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::RangeOverflow { axis: "x" }));
    }

    #[test]
    fn padding_that_overflows_is_an_error() {
        let mut extent = Extent::empty();
        extent.include(-1e307);
        extent.include(1.7e308);
        assert!(matches!(
            extent.padded("y"),
            Err(RenderError::RangeOverflow { axis: "y" })
        ));

        let mut extent = Extent::empty();
        extent.include(0.0);
        extent.include(10.0);
        assert_eq!(extent.padded("x").unwrap(), -0.5..10.5);
    }

    #[test]
    fn empty_figure_is_rejected() {
        let mut fig = Figure::new();
        fig.add_trace(Trace {
            name: "t".into(),
            kind: ChartType::Line,
            x: numeric(&[]),
            y: Some(numeric(&[])),
        });
        let err = StaticChartRenderer::render_svg(&fig, &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::EmptyFigure));
    }
}
