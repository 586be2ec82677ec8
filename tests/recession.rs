use chrono::NaiveDate;
use macrodata::{
    Catalog, Error, Result, ShadeOptions, YearAxis, apply_bands_to, with_recession_shading,
    year_fraction,
};

#[derive(Debug, Default)]
struct RecordingAxis {
    bands: Vec<(f64, f64)>,
}

impl YearAxis for RecordingAxis {
    fn shade_band(&mut self, x0: f64, x1: f64, _color: (u8, u8, u8), _alpha: f64) -> Result<()> {
        self.bands.push((x0, x1));
        Ok(())
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn bundled_reference_dates_cover_sixteen_cycles() {
    let ivs = Catalog::new().recession_intervals().unwrap();
    assert_eq!(ivs.len(), 16);

    let first = &ivs[0];
    assert_eq!(first.cycle, 1);
    assert!(first.trough.is_none());
    assert!(first.expansion.is_none());
    assert_eq!(first.peak, ymd(1951, 6, 1));
    assert_eq!(first.next_trough, ymd(1951, 10, 1));
    assert_eq!(first.contraction, 4);

    let last = &ivs[15];
    assert_eq!(last.cycle, 16);
    assert_eq!(last.trough, Some(ymd(2012, 11, 1)));
    assert_eq!(last.peak, ymd(2018, 10, 1));
    assert_eq!(last.next_trough, ymd(2020, 5, 1));
    assert_eq!(last.expansion, Some(71));
    assert_eq!(last.contraction, 19);
}

#[test]
fn default_window_shades_eight_contractions() {
    let ivs = Catalog::new().recession_intervals().unwrap();
    let mut ax = RecordingAxis::default();
    apply_bands_to(&mut ax, &ivs, &ShadeOptions::default()).unwrap();
    assert_eq!(ax.bands.len(), 8);

    // first band is the 1980 peak, last the 2018 peak
    let (x0, _) = ax.bands[0];
    assert!((x0 - year_fraction(ymd(1980, 2, 1))).abs() < 1e-12);
    let (x0, x1) = ax.bands[7];
    assert!((x0 - year_fraction(ymd(2018, 10, 1))).abs() < 1e-12);
    assert!((x1 - year_fraction(ymd(2020, 5, 1))).abs() < 1e-12);
    for (x0, x1) in &ax.bands {
        assert!(x0 < x1);
    }
}

#[test]
fn widening_the_window_recovers_the_fifties() {
    let ivs = Catalog::new().recession_intervals().unwrap();
    let mut ax = RecordingAxis::default();
    let opts = ShadeOptions {
        start_year: 1951,
        end_year: 1959,
        ..ShadeOptions::default()
    };
    apply_bands_to(&mut ax, &ivs, &opts).unwrap();
    // peaks in 1951, 1954 and 1957
    assert_eq!(ax.bands.len(), 3);

    let mut ax = RecordingAxis::default();
    let opts = ShadeOptions {
        start_year: 1960,
        end_year: 1970,
        ..ShadeOptions::default()
    };
    apply_bands_to(&mut ax, &ivs, &opts).unwrap();
    // peaks in 1961, 1964 and 1970
    assert_eq!(ax.bands.len(), 3);

    // asking for years before the table starts shades everything we have
    let mut ax = RecordingAxis::default();
    let opts = ShadeOptions {
        start_year: 1900,
        ..ShadeOptions::default()
    };
    apply_bands_to(&mut ax, &ivs, &opts).unwrap();
    assert_eq!(ax.bands.len(), 16);
}

#[test]
fn rows_and_grids_get_identical_bands() {
    let ivs = Catalog::new().recession_intervals().unwrap();
    let opts = ShadeOptions::default();

    let mut row = vec![RecordingAxis::default(), RecordingAxis::default(), RecordingAxis::default()];
    apply_bands_to(&mut row, &ivs, &opts).unwrap();
    assert!(row.iter().all(|p| p.bands.len() == 8));
    assert_eq!(row[0].bands, row[2].bands);

    let mut grid = vec![
        vec![RecordingAxis::default(), RecordingAxis::default()],
        vec![RecordingAxis::default(), RecordingAxis::default()],
    ];
    apply_bands_to(&mut grid, &ivs, &opts).unwrap();
    assert!(grid.iter().flatten().all(|p| p.bands.len() == 8));

    let mut empty: Vec<RecordingAxis> = Vec::new();
    assert!(matches!(
        apply_bands_to(&mut empty, &ivs, &opts),
        Err(Error::EmptyAxisTarget)
    ));
}

#[test]
fn wrapper_runs_the_plot_then_shades_it() {
    let ivs = Catalog::new().recession_intervals().unwrap();
    let axes = with_recession_shading(&ivs, &ShadeOptions::default(), || {
        Ok(vec![RecordingAxis::default(), RecordingAxis::default()])
    })
    .unwrap();
    assert_eq!(axes.len(), 2);
    assert!(axes.iter().all(|p| p.bands.len() == 8));

    // a failing plot closure short-circuits before any shading
    let failed: Result<RecordingAxis> = with_recession_shading(&ivs, &ShadeOptions::default(), || {
        Err(Error::MissingColumn("gdp".to_string()))
    });
    assert!(matches!(failed, Err(Error::MissingColumn(_))));
}

#[test]
fn bands_sit_at_fractional_year_positions() {
    // 1980 is a leap year; February 1st is its 32nd day
    let x = year_fraction(ymd(1980, 2, 1));
    assert!((x - (1980.0 + 31.0 / 366.0)).abs() < 1e-12);
    let x = year_fraction(ymd(2018, 10, 1));
    assert!((x - (2018.0 + 273.0 / 365.0)).abs() < 1e-12);
}
