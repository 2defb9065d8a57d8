//! PNG figures of the data and the fitted curves, drawn with [`plotters`].
//!
//! [`render_analysis`] writes the full set for one run:
//! - `raw_data.png` and `filtered_data.png`: scatter plots of experience against wage
//! - `fit_<variant>.png`: the filtered data with one fitted curve
//! - `overlay.png`: the filtered data with every fitted curve
//!
//! Every curve is drawn over its own prediction grid.
use std::{
    ops::Range,
    path::{Path, PathBuf},
};

use plotters::prelude::*;

use crate::{
    data::Dataset,
    error::{Error, Result},
    pipeline::{Analysis, VariantReport},
    value::min_max,
};

pub use plotters;

const PALETTE: [RGBColor; 6] = [
    RED,
    BLUE,
    GREEN,
    MAGENTA,
    CYAN,
    RGBColor(255, 165, 0), // Orange
];

/// Fraction of each axis span left empty around the data.
const AXIS_PADDING: f64 = 0.05;

/// Options shared by every figure
#[derive(Debug, Clone)]
pub struct PlotOptions {
    /// Size of the output image in pixels
    pub size: (u32, u32),

    /// X-axis label
    pub x_label: String,

    /// Y-axis label
    pub y_label: String,
}
impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            size: (800, 600),
            x_label: "experience".into(),
            y_label: "wage".into(),
        }
    }
}

/// A labelled line to draw over the data.
#[derive(Debug, Clone, Copy)]
pub struct Curve<'a> {
    /// Legend entry
    pub label: &'a str,

    /// `(x, y)` points, drawn in order
    pub points: &'a [(f64, f64)],
}
impl<'a> From<&'a VariantReport> for Curve<'a> {
    fn from(variant: &'a VariantReport) -> Self {
        Self {
            label: &variant.label,
            points: &variant.grid,
        }
    }
}

/// Writes every figure for an analysis into `dir`, creating it if needed.
///
/// Returns the paths written, in drawing order.
///
/// # Errors
/// - [`Error::Io`] if the directory cannot be created.
/// - [`Error::Plot`] if a figure cannot be drawn.
pub fn render_analysis(
    dir: impl AsRef<Path>,
    analysis: &Analysis,
    options: &PlotOptions,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(analysis.variants.len() + 3);

    let path = dir.join("raw_data.png");
    scatter(&path, "Raw data", &analysis.raw, options)?;
    written.push(path);

    let path = dir.join("filtered_data.png");
    scatter(&path, "Filtered data", &analysis.filtered, options)?;
    written.push(path);

    for variant in &analysis.variants {
        let path = dir.join(format!("fit_{}.png", file_stem(&variant.label)));
        draw(&path, &variant.label, &analysis.filtered, &[variant.into()], options)?;
        written.push(path);
    }

    let curves: Vec<Curve> = analysis.variants.iter().map(Curve::from).collect();
    let path = dir.join("overlay.png");
    draw(&path, "All models", &analysis.filtered, &curves, options)?;
    written.push(path);

    log::info!("Wrote {} figures to {}", written.len(), dir.display());
    Ok(written)
}

/// Scatter plot of a dataset.
///
/// # Errors
/// Returns [`Error::Plot`] if the figure cannot be drawn.
pub fn scatter(path: &Path, title: &str, data: &Dataset, options: &PlotOptions) -> Result<()> {
    draw(path, title, data, &[], options)
}

/// Scatter plot of a dataset with curves drawn over it.
///
/// Axis ranges cover the data and every curve.
///
/// # Errors
/// Returns [`Error::Plot`] if the figure cannot be drawn, or if there is nothing to draw.
pub fn draw(
    path: &Path,
    title: &str,
    data: &Dataset,
    curves: &[Curve],
    options: &PlotOptions,
) -> Result<()> {
    let points = data.points();
    let all = || {
        points
            .iter()
            .chain(curves.iter().flat_map(|c| c.points.iter()))
            .copied()
    };
    let x_range = padded(all().map(|(x, _)| x)).ok_or_else(nothing_to_draw)?;
    let y_range = padded(all().map(|(_, y)| y)).ok_or_else(nothing_to_draw)?;

    let root = BitMapBackend::new(path, options.size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FontFamily::SansSerif, 18).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .label_style((FontFamily::SansSerif, 12))
        .x_desc(options.x_label.as_str())
        .y_desc(options.y_label.as_str())
        .draw()
        .map_err(plot_error)?;

    let point_style = BLACK.mix(0.35).filled();
    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 2, point_style)),
        )
        .map_err(plot_error)?
        .label("data")
        .legend(move |(x, y)| Circle::new((x, y), 3, point_style));

    for (i, curve) in curves.iter().enumerate() {
        let style = PALETTE[i % PALETTE.len()].stroke_width(2);
        chart
            .draw_series(LineSeries::new(curve.points.iter().copied(), style))
            .map_err(plot_error)?
            .label(curve.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    chart
        .configure_series_labels()
        .label_font((FontFamily::SansSerif, 12))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

/// Axis range covering `values`, widened by [`AXIS_PADDING`] on each side.
///
/// A single repeated value gets a unit-wide range around it.
fn padded(values: impl Iterator<Item = f64>) -> Option<Range<f64>> {
    let range = min_max(values.filter(|v| v.is_finite()))?;
    let (lo, hi) = range.into_inner();

    let pad = if hi > lo { (hi - lo) * AXIS_PADDING } else { 0.5 };
    Some(lo - pad..hi + pad)
}

/// `Polynomial(degree=2)` -> `polynomial_degree_2`
fn file_stem(label: &str) -> String {
    let mut stem = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c.to_ascii_lowercase());
        } else if !stem.is_empty() && !stem.ends_with('_') {
            stem.push('_');
        }
    }

    while stem.ends_with('_') {
        stem.pop();
    }
    stem
}

fn nothing_to_draw() -> Error {
    Error::Plot("no finite points to draw".into())
}

fn plot_error(e: impl std::fmt::Display) -> Error {
    Error::Plot(e.to_string())
}
