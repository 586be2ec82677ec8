//! The dataset catalog: one static entry per bundled dataset.
//!
//! Each entry names the archive member, how to decode it, how to bring
//! it into its published shape, and which description layers it ships.

use crate::error::{Error, Result};
use crate::models::{Capabilities, Mode};
use crate::table::DecodeSpec;

/// How a decoded member becomes the table handed to callers.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Recipe {
    /// Straight decode.
    Plain,
    /// Decode, then drop rows whose cell in the named column is missing.
    DropNulls(&'static str),
    /// IMF WEO wide sheet: years run across columns, one row per
    /// country and subject. Reshaped to one row per country-year with
    /// one column per subject code.
    WeoLong,
    /// Maddison regional sheet: a GDP-per-capita block and a population
    /// block side by side, years down the first column. Both blocks are
    /// melted and merged one-to-one on (region, year).
    RegionsLong,
}

/// Where a dataset's variable definitions come from.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Defs {
    /// Static (variable, definition) pairs.
    Inline(&'static [(&'static str, &'static str)]),
    /// Definitions ship as their own archive member.
    Member(&'static str),
    /// Japan's subject rows sliced from the raw WEO sheet.
    WeoSlice,
}

/// One catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct DatasetInfo {
    pub key: &'static str,
    pub title: &'static str,
    pub source: &'static str,
    pub caps: Capabilities,
    pub(crate) member: &'static str,
    pub(crate) spec: DecodeSpec,
    pub(crate) recipe: Recipe,
    pub(crate) defs: Defs,
}

impl DatasetInfo {
    /// Resolve a numeric description flag against this dataset's
    /// capabilities. Flags outside the table and flags the dataset
    /// cannot answer both fail.
    pub fn mode_for(&self, flag: i8) -> Result<Mode> {
        match Mode::from_flag(flag) {
            Some(m) if self.caps.allows(m) => Ok(m),
            _ => Err(Error::InvalidMode {
                dataset: self.key.to_string(),
                mode: flag,
                supported: self
                    .supported_flags()
                    .iter()
                    .map(|f| f.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    /// Flags this dataset answers, in display order.
    pub fn supported_flags(&self) -> Vec<i8> {
        [0i8, 1, 2, -1, -2]
            .into_iter()
            .filter(|&f| Mode::from_flag(f).is_some_and(|m| self.caps.allows(m)))
            .collect()
    }
}

const BASE: DecodeSpec = DecodeSpec {
    skip_rows: &[],
    skip_footer: 0,
    thousands_comma: false,
    na_markers: &[],
    date_columns: &[],
    int_columns: &[],
};

const YEAR_PANEL: DecodeSpec = DecodeSpec {
    int_columns: &["year"],
    ..BASE
};

const MONTHLY: DecodeSpec = DecodeSpec {
    date_columns: &["dates"],
    ..BASE
};

static JPN_Q_DEFS: &[(&str, &str)] = &[
    ("dates", "Start date of the quarter"),
    ("gdp", "Real GDP (billions of 2015 yen, seasonally adjusted)"),
    ("consumption", "Real private consumption"),
    ("investment", "Real private investment"),
    ("government", "Real government spending"),
    ("exports", "Real exports"),
    ("imports", "Real imports"),
    ("capital", "Real capital stock"),
    ("employed", "Employed persons (millions)"),
    ("unemployed", "Unemployed persons (millions)"),
    ("unemployment_rate", "Unemployment rate (percent)"),
    ("hours", "Monthly hours worked per employed person"),
    ("total_hours", "Employed persons times hours worked"),
];

static JPN_YR_DEFS: &[(&str, &str)] = &[
    ("year", "Calendar year"),
    ("gdp", "Real GDP (billions of 2015 yen)"),
    ("consumption", "Real private consumption"),
    ("investment", "Real private investment"),
    ("government", "Real government spending"),
    ("exports", "Real exports"),
    ("imports", "Real imports"),
    ("capital", "Real capital stock"),
    ("employed", "Employed persons (millions)"),
    ("deflator", "GDP deflator (2015=100)"),
];

static JPN_MONEY_DEFS: &[(&str, &str)] = &[
    ("dates", "First day of the month"),
    ("cpi", "Consumer price index (2015=100)"),
    ("money", "M1 money stock (hundred million yen)"),
];

static WORLD_MONEY_DEFS: &[(&str, &str)] = &[
    ("countrycode", "3-letter ISO country code"),
    ("country", "Country name"),
    ("year", "Calendar year"),
    ("money", "M1 money stock, index (2010=100)"),
    ("deflator", "GDP deflator, index (2010=100)"),
];

static EX_DEFS: &[(&str, &str)] = &[
    ("dates", "First day of the month"),
    ("ex_jpus", "Yen per U.S. dollar, monthly average"),
    ("cpi_jp", "Japan consumer price index (2015=100)"),
    ("cpi_us", "U.S. consumer price index (2015=100)"),
];

static DATES_DEFS: &[(&str, &str)] = &[
    ("cycle", "Business cycle number"),
    ("trough", "Trough starting the cycle (missing for the first cycle)"),
    ("peak", "Peak ending the expansion"),
    ("trough2", "Trough ending the contraction"),
    ("expansion", "Expansion length in months (missing for the first cycle)"),
    ("contraction", "Contraction length in months"),
];

static BIGMAC_DEFS: &[(&str, &str)] = &[
    ("date", "Survey date"),
    ("iso_a3", "3-letter ISO country code"),
    ("currency_code", "Local currency code"),
    ("name", "Country or currency-area name"),
    ("local_price", "Price of a Big Mac in local currency"),
    ("dollar_ex", "Local currency units per U.S. dollar"),
    ("dollar_price", "Price of a Big Mac in U.S. dollars"),
];

static DEBTS_DEFS: &[(&str, &str)] = &[
    ("countrycode", "3-letter ISO country code"),
    ("country", "Country name"),
    ("year", "Calendar year"),
    ("debt_gdp", "Gross central government debt as a share of GDP (percent)"),
];

static MAD_DEFS: &[(&str, &str)] = &[
    ("countrycode", "3-letter ISO country code"),
    ("country", "Country name"),
    ("year", "Calendar year"),
    ("gdppc", "Real GDP per capita (2011 US dollars)"),
    ("pop", "Population (thousands)"),
];

static MAD_REGIONS_DEFS: &[(&str, &str)] = &[
    ("regions", "Region name"),
    ("year", "Calendar year"),
    ("gdppc", "Regional average real GDP per capita (2011 US dollars)"),
    ("pop", "Regional population (thousands)"),
];

static DATASETS: [DatasetInfo; 12] = [
    DatasetInfo {
        key: "pwt",
        title: "Penn World Table 10.0",
        source: "Groningen Growth and Development Centre",
        caps: Capabilities::WITH_DEFINITIONS,
        member: "pwt_data.csv",
        spec: YEAR_PANEL,
        recipe: Recipe::Plain,
        defs: Defs::Member("pwt_definitions.csv"),
    },
    DatasetInfo {
        key: "weo",
        title: "IMF World Economic Outlook, April 2021",
        source: "International Monetary Fund",
        caps: Capabilities::FULL,
        member: "weo.csv",
        spec: DecodeSpec {
            skip_footer: 1,
            thousands_comma: true,
            na_markers: &["--", "n/a"],
            int_columns: &["WEO Country Code", "Estimates Start After"],
            ..BASE
        },
        recipe: Recipe::WeoLong,
        defs: Defs::WeoSlice,
    },
    DatasetInfo {
        key: "mad",
        title: "Maddison Project Database 2020, country data",
        source: "Groningen Growth and Development Centre",
        caps: Capabilities::WITH_DEFINITIONS,
        member: "mad_country.csv",
        spec: DecodeSpec {
            thousands_comma: true,
            int_columns: &["year"],
            ..BASE
        },
        // Population is recorded for years with no GDP estimate; those
        // rows carry no usable observation and are dropped.
        recipe: Recipe::DropNulls("gdppc"),
        defs: Defs::Inline(MAD_DEFS),
    },
    DatasetInfo {
        key: "mad-regions",
        title: "Maddison Project Database 2020, regional data",
        source: "Groningen Growth and Development Centre",
        caps: Capabilities::BASIC,
        member: "mad_regions.csv",
        // The sheet opens with a title row and a units row; the header
        // labels the first column `Region` although its cells are years.
        spec: DecodeSpec {
            skip_rows: &[0, 2],
            thousands_comma: true,
            int_columns: &["Region"],
            ..BASE
        },
        recipe: Recipe::RegionsLong,
        defs: Defs::Inline(MAD_REGIONS_DEFS),
    },
    DatasetInfo {
        key: "jpn-q",
        title: "Japan quarterly national accounts and labour data",
        source: "Cabinet Office of Japan",
        caps: Capabilities::BASIC,
        member: "jpn_quarterly.csv",
        spec: MONTHLY,
        recipe: Recipe::Plain,
        defs: Defs::Inline(JPN_Q_DEFS),
    },
    DatasetInfo {
        key: "jpn-yr",
        title: "Japan annual national accounts",
        source: "Cabinet Office of Japan",
        caps: Capabilities::BASIC,
        member: "jpn_annual.csv",
        spec: YEAR_PANEL,
        recipe: Recipe::Plain,
        defs: Defs::Inline(JPN_YR_DEFS),
    },
    DatasetInfo {
        key: "jpn-money",
        title: "Japan monthly CPI and money stock",
        source: "Bank of Japan; Statistics Bureau of Japan",
        caps: Capabilities::BASIC,
        member: "jpn_money.csv",
        spec: MONTHLY,
        recipe: Recipe::Plain,
        defs: Defs::Inline(JPN_MONEY_DEFS),
    },
    DatasetInfo {
        key: "world-money",
        title: "Money stock and deflator panel",
        source: "IMF International Financial Statistics",
        caps: Capabilities::BASIC,
        member: "world_money.csv",
        spec: YEAR_PANEL,
        recipe: Recipe::Plain,
        defs: Defs::Inline(WORLD_MONEY_DEFS),
    },
    DatasetInfo {
        key: "ex",
        title: "Yen/dollar exchange rate and consumer prices",
        source: "FRED, Federal Reserve Bank of St. Louis",
        caps: Capabilities::BASIC,
        member: "exchange_rates.csv",
        spec: MONTHLY,
        recipe: Recipe::Plain,
        defs: Defs::Inline(EX_DEFS),
    },
    DatasetInfo {
        key: "dates",
        title: "Japanese business cycle reference dates",
        source: "Cabinet Office of Japan",
        caps: Capabilities::BASIC,
        member: "cycle_dates.csv",
        spec: DecodeSpec {
            date_columns: &["trough", "peak", "trough2"],
            int_columns: &["cycle", "expansion", "contraction"],
            ..BASE
        },
        recipe: Recipe::Plain,
        defs: Defs::Inline(DATES_DEFS),
    },
    DatasetInfo {
        key: "bigmac",
        title: "Big Mac index",
        source: "The Economist",
        caps: Capabilities::BASIC,
        member: "bigmac.csv",
        spec: DecodeSpec {
            date_columns: &["date"],
            ..BASE
        },
        recipe: Recipe::Plain,
        defs: Defs::Inline(BIGMAC_DEFS),
    },
    DatasetInfo {
        key: "debts",
        title: "Central government debt panel",
        source: "IMF Historical Public Debt Database",
        caps: Capabilities::BASIC,
        member: "debt.csv",
        spec: YEAR_PANEL,
        recipe: Recipe::Plain,
        defs: Defs::Inline(DEBTS_DEFS),
    },
];

/// All datasets, in catalog order.
pub fn all() -> &'static [DatasetInfo] {
    &DATASETS
}

/// Look a dataset up by key. `mad-region` is accepted as an alias for
/// `mad-regions`.
pub fn lookup(name: &str) -> Result<&'static DatasetInfo> {
    let canon = match name {
        "mad-region" => "mad-regions",
        other => other,
    };
    DATASETS
        .iter()
        .find(|d| d.key == canon)
        .ok_or_else(|| Error::UnknownDataset {
            name: name.to_string(),
            expected: DATASETS
                .iter()
                .map(|d| d.key)
                .collect::<Vec<_>>()
                .join(", "),
        })
}
