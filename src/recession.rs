//! Recession shading over the official Japanese business-cycle
//! reference dates.
//!
//! A contraction runs from a cycle's peak to the following trough;
//! shading draws one translucent band per contraction on every axis of
//! a target. Targets come in three shapes: a single axis, a row of
//! axes, and a grid of axes, unified by `AsAxisTarget` so one call
//! shades them all.

use crate::error::{Error, Result};
use crate::table::Table;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// One business cycle: trough to trough, with the contraction phase
/// between `peak` and `next_trough`.
///
/// The first cycle in the reference table opens at its peak, so its
/// starting trough and expansion length are unknown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecessionInterval {
    pub cycle: u32,
    pub trough: Option<NaiveDate>,
    pub peak: NaiveDate,
    pub next_trough: NaiveDate,
    /// Expansion length in months.
    pub expansion: Option<u32>,
    /// Contraction length in months.
    pub contraction: u32,
}

impl RecessionInterval {
    /// Build intervals from the reference-date table
    /// (columns `cycle`, `trough`, `peak`, `trough2`, `expansion`,
    /// `contraction`).
    pub fn from_table(table: &Table) -> Result<Vec<RecessionInterval>> {
        let mut out = Vec::with_capacity(table.n_rows());
        for i in 0..table.n_rows() {
            let int_cell = |col: &str| -> Result<Option<u32>> {
                match table.get(i, col) {
                    Some(v) => Ok(v.as_i64().map(|x| x as u32)),
                    None => Err(Error::MissingColumn(col.to_string())),
                }
            };
            let date_cell = |col: &str| -> Result<Option<NaiveDate>> {
                match table.get(i, col) {
                    Some(v) => Ok(v.as_date()),
                    None => Err(Error::MissingColumn(col.to_string())),
                }
            };
            let bad = |col: &str| Error::Parse {
                column: col.to_string(),
                row: i,
                value: "NA".to_string(),
            };
            out.push(RecessionInterval {
                cycle: int_cell("cycle")?.ok_or_else(|| bad("cycle"))?,
                trough: date_cell("trough")?,
                peak: date_cell("peak")?.ok_or_else(|| bad("peak"))?,
                next_trough: date_cell("trough2")?.ok_or_else(|| bad("trough2"))?,
                expansion: int_cell("expansion")?,
                contraction: int_cell("contraction")?.ok_or_else(|| bad("contraction"))?,
            });
        }
        Ok(out)
    }

    /// The contraction phase as fractional years, for an x axis in
    /// calendar years.
    pub fn band(&self) -> (f64, f64) {
        (year_fraction(self.peak), year_fraction(self.next_trough))
    }
}

/// A calendar date as a fractional year: `1951-06-01` sits at
/// 1951 + 151/365.
pub fn year_fraction(d: NaiveDate) -> f64 {
    let days = if d.leap_year() { 366.0 } else { 365.0 };
    d.year() as f64 + d.ordinal0() as f64 / days
}

/// Shading controls: which cycles to keep and what the bands look like.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadeOptions {
    /// Keep contractions whose peak falls in `start_year..=end_year`.
    pub start_year: i32,
    pub end_year: i32,
    /// Band colour as RGB.
    pub color: (u8, u8, u8),
    /// Band opacity in `0.0..=1.0`.
    pub alpha: f64,
}

impl Default for ShadeOptions {
    fn default() -> Self {
        Self {
            start_year: 1980,
            end_year: 2999,
            color: (0, 0, 0),
            alpha: 0.1,
        }
    }
}

/// Anything that can draw one vertical band over a year-valued x axis.
pub trait YearAxis {
    fn shade_band(&mut self, x0: f64, x1: f64, color: (u8, u8, u8), alpha: f64) -> Result<()>;
}

/// The three target shapes a shading call can fan out over.
pub enum AxisTarget<'a, A> {
    Single(&'a mut A),
    Row(&'a mut [A]),
    Grid(&'a mut [Vec<A>]),
}

/// Adapter from concrete targets (an axis, a `Vec` of axes, a `Vec` of
/// rows of axes) to `AxisTarget`.
pub trait AsAxisTarget<A> {
    fn as_axis_target(&mut self) -> AxisTarget<'_, A>;
}

impl<A: YearAxis> AsAxisTarget<A> for A {
    fn as_axis_target(&mut self) -> AxisTarget<'_, A> {
        AxisTarget::Single(self)
    }
}

impl<A: YearAxis> AsAxisTarget<A> for Vec<A> {
    fn as_axis_target(&mut self) -> AxisTarget<'_, A> {
        AxisTarget::Row(self.as_mut_slice())
    }
}

impl<A: YearAxis> AsAxisTarget<A> for Vec<Vec<A>> {
    fn as_axis_target(&mut self) -> AxisTarget<'_, A> {
        AxisTarget::Grid(self.as_mut_slice())
    }
}

/// Keep the contractions whose peak year falls inside the option window.
pub fn filter_intervals<'a>(
    intervals: &'a [RecessionInterval],
    opts: &ShadeOptions,
) -> Vec<&'a RecessionInterval> {
    intervals
        .iter()
        .filter(|iv| {
            let y = iv.peak.year();
            y >= opts.start_year && y <= opts.end_year
        })
        .collect()
}

fn shade_one<A: YearAxis>(
    axis: &mut A,
    kept: &[&RecessionInterval],
    opts: &ShadeOptions,
) -> Result<()> {
    for iv in kept {
        let (x0, x1) = iv.band();
        axis.shade_band(x0, x1, opts.color, opts.alpha)?;
    }
    Ok(())
}

/// Shade every axis of `target` with the contraction bands selected by
/// `opts`. An empty row or grid is an error: the caller asked to shade
/// nothing.
pub fn apply_bands_to<A, T>(
    target: &mut T,
    intervals: &[RecessionInterval],
    opts: &ShadeOptions,
) -> Result<()>
where
    A: YearAxis,
    T: AsAxisTarget<A> + ?Sized,
{
    if opts.start_year < 1951 {
        eprintln!(
            "Note: the reference dates begin with the June 1951 peak; nothing is shaded before that."
        );
    }
    let kept = filter_intervals(intervals, opts);
    log::debug!(
        "shading {} of {} contractions ({}..={})",
        kept.len(),
        intervals.len(),
        opts.start_year,
        opts.end_year
    );
    match target.as_axis_target() {
        AxisTarget::Single(axis) => shade_one(axis, &kept, opts),
        AxisTarget::Row(axes) => {
            if axes.is_empty() {
                return Err(Error::EmptyAxisTarget);
            }
            for axis in axes.iter_mut() {
                shade_one(axis, &kept, opts)?;
            }
            Ok(())
        }
        AxisTarget::Grid(grid) => {
            let mut any = false;
            for row in grid.iter_mut() {
                for axis in row.iter_mut() {
                    any = true;
                    shade_one(axis, &kept, opts)?;
                }
            }
            if !any {
                return Err(Error::EmptyAxisTarget);
            }
            Ok(())
        }
    }
}

/// Run a plotting closure, shade whatever axes it hands back, and
/// return them unchanged.
pub fn with_recession_shading<A, T, F>(
    intervals: &[RecessionInterval],
    opts: &ShadeOptions,
    plot: F,
) -> Result<T>
where
    A: YearAxis,
    T: AsAxisTarget<A>,
    F: FnOnce() -> Result<T>,
{
    let mut made = plot()?;
    apply_bands_to(&mut made, intervals, opts)?;
    Ok(made)
}
