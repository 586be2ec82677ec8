//! Render table columns as line charts to **SVG** or **PNG**, with
//! optional recession shading.
//!
//! The x column may hold calendar dates (plotted as fractional years)
//! or plain year numbers; every y column becomes one series. Shading
//! reuses the same `YearAxis` hook that external plotters users get:
//! the chart context itself knows how to draw a band.

pub mod util;

use crate::error::Error;
use crate::recession::{RecessionInterval, ShadeOptions, YearAxis, apply_bands_to, year_fraction};
use crate::table::{Table, Value};
use anyhow::{Result, anyhow};

use plotters::backend::DrawingBackend;
use plotters::chart::ChartContext;
use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::series::LineSeries;
use plotters::style::FontFamily;

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;
use std::sync::Once;

use util::office_color;

/// One-time registration for a fallback "sans-serif" font when using the
/// `ab_glyph` text path. Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    // Safe to call many times; only runs once.
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

/// The x coordinate of a cell: dates become fractional years, numbers
/// pass through.
fn x_value(v: &Value) -> Option<f64> {
    match v {
        Value::Date(d) => Some(year_fraction(*d)),
        other => other.as_f64(),
    }
}

impl<'a, DB: DrawingBackend> YearAxis
    for ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>
{
    fn shade_band(
        &mut self,
        x0: f64,
        x1: f64,
        color: (u8, u8, u8),
        alpha: f64,
    ) -> crate::error::Result<()> {
        let y = self.y_range();
        let style = RGBColor(color.0, color.1, color.2).mix(alpha).filled();
        self.draw_series(std::iter::once(Rectangle::new(
            [(x0, y.start), (x1, y.end)],
            style,
        )))
        .map_err(|e| Error::Draw(format!("{:?}", e)))?;
        Ok(())
    }
}

/// Plot `ys` against `x` as a line chart; backend chosen by extension
/// (`.svg`, anything else bitmap).
pub fn plot_series<P: AsRef<Path>>(
    table: &Table,
    x: &str,
    ys: &[String],
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    plot_series_shaded(table, x, ys, out_path, width, height, "", None)
}

/// As `plot_series`, with a custom title and recession bands drawn
/// underneath the series.
#[allow(clippy::too_many_arguments)]
pub fn plot_series_shaded<P: AsRef<Path>>(
    table: &Table,
    x: &str,
    ys: &[String],
    out_path: P,
    width: u32,
    height: u32,
    title: &str,
    shading: Option<(&[RecessionInterval], ShadeOptions)>,
) -> Result<()> {
    if ys.is_empty() {
        return Err(anyhow!("no columns to plot"));
    }
    ensure_fonts_registered();

    let xi = table
        .column_index(x)
        .ok_or_else(|| anyhow!("no column named `{x}`"))?;
    let mut series: Vec<(String, Vec<(f64, f64)>)> = Vec::with_capacity(ys.len());
    for name in ys {
        let yi = table
            .column_index(name)
            .ok_or_else(|| anyhow!("no column named `{name}`"))?;
        let points: Vec<(f64, f64)> = table
            .rows()
            .iter()
            .filter_map(|row| match (x_value(&row[xi]), row[yi].as_f64()) {
                (Some(xv), Some(yv)) => Some((xv, yv)),
                _ => None,
            })
            .collect();
        series.push((name.clone(), points));
    }
    if series.iter().all(|(_, pts)| pts.is_empty()) {
        return Err(anyhow!("no numeric values to plot"));
    }

    let xs = series.iter().flat_map(|(_, pts)| pts.iter().map(|p| p.0));
    let (mut x_min, mut x_max) = (
        xs.clone().fold(f64::INFINITY, f64::min),
        xs.fold(f64::NEG_INFINITY, f64::max),
    );
    if (x_max - x_min).abs() < f64::EPSILON {
        x_min -= 1.0;
        x_max += 1.0;
    }
    let vals = series.iter().flat_map(|(_, pts)| pts.iter().map(|p| p.1));
    let (mut y_min, mut y_max) = (
        vals.clone().fold(f64::INFINITY, f64::min),
        vals.fold(f64::NEG_INFINITY, f64::max),
    );
    if (y_max - y_min).abs() < f64::EPSILON {
        y_min -= 1.0;
        y_max += 1.0;
    }

    let caption = if title.trim().is_empty() {
        ys.join(", ")
    } else {
        title.to_string()
    };

    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, &series, x_min, x_max, y_min, y_max, &caption, shading)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, &series, x_min, x_max, y_min, y_max, &caption, shading)?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    series: &[(String, Vec<(f64, f64)>)],
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    caption: &str,
    shading: Option<(&[RecessionInterval], ShadeOptions)>,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(16u32)
        .caption(caption, (FontFamily::SansSerif, 24))
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 48)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| anyhow!("{:?}", e))?;

    let x_label_fmt = |x: &f64| (x.round() as i64).to_string();
    chart
        .configure_mesh()
        .x_desc("Year")
        .x_labels(10)
        .y_labels(10)
        .x_label_formatter(&x_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    // Bands go in first so the series stay on top.
    if let Some((intervals, opts)) = shading {
        apply_bands_to(&mut chart, intervals, &opts)?;
    }

    for (idx, (name, points)) in series.iter().enumerate() {
        let color = office_color(idx);
        let style = ShapeStyle {
            color,
            filled: false,
            stroke_width: 2,
        };
        let legend_color = color;
        chart
            .draw_series(LineSeries::new(points.clone(), style))
            .map_err(|e| anyhow!("{:?}", e))?
            .label(name.clone())
            .legend(move |(x, y)| Circle::new((x + 8, y), 4, legend_color.filled()));
    }

    if series.len() > 1 {
        chart
            .configure_series_labels()
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85))
            .label_font((FontFamily::SansSerif, 14))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
