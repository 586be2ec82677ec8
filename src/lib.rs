//! macrodata
//!
//! A lightweight Rust library for working with the macroeconomic
//! datasets bundled into the binary: national accounts panels, price
//! and money series, and the Japanese business-cycle reference dates.
//! Pairs with the `macrodata` CLI.
//!
//! ### Features
//! - Load any bundled dataset as a typed table, with variable
//!   definitions and (for the WEO) estimate metadata one flag away
//! - Shade recessions onto a single axis, a row of axes, or a grid of
//!   axes with one call
//! - Hodrick-Prescott trend extraction and quick column statistics
//! - Save as CSV or JSON; render SVG/PNG line charts
//!
//! ### Example
//! ```no_run
//! use macrodata::{Catalog, ShadeOptions, stats};
//!
//! let catalog = Catalog::new();
//! let gdp = catalog.table("jpn-q")?;
//! let series: Vec<f64> = gdp
//!     .numeric_column("gdp")?
//!     .into_iter()
//!     .flatten()
//!     .collect();
//! let tau = stats::trend(&series);
//! println!("first trend value: {:.1}", tau[0]);
//!
//! let intervals = catalog.recession_intervals()?;
//! macrodata::viz::plot_series_shaded(
//!     &gdp,
//!     "dates",
//!     &["gdp".into()],
//!     "gdp.svg",
//!     1000,
//!     600,
//!     "Real GDP",
//!     Some((&intervals, ShadeOptions::default())),
//! )?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod catalog;
pub mod error;
pub mod models;
pub mod recession;
pub mod registry;
pub mod reshape;
pub mod stats;
pub mod storage;
pub mod store;
pub mod table;
pub mod viz;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use models::{Capabilities, Mode};
pub use recession::{
    AsAxisTarget, AxisTarget, RecessionInterval, ShadeOptions, YearAxis, apply_bands_to,
    with_recession_shading, year_fraction,
};
pub use stats::{trend, trend_with, xvalues};
pub use store::{BundledStore, DatasetStore, MemoryStore};
pub use table::{DecodeSpec, Table, Value};
