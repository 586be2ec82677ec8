//! The user-facing loader: look a dataset up by key, decode it from the
//! store, reshape it into its published form, and answer the
//! description modes.

use crate::error::Result;
use crate::models::Mode;
use crate::recession::RecessionInterval;
use crate::registry::{self, DatasetInfo, Defs, Recipe};
use crate::reshape;
use crate::store::{BundledStore, DatasetStore};
use crate::table::{DecodeSpec, Table, Value};

/// Dataset access over an injectable byte store.
///
/// `Catalog::new()` serves the archive bundled into the binary; tests
/// and embedders can swap in any other `DatasetStore`.
///
/// ```no_run
/// use macrodata::Catalog;
///
/// let catalog = Catalog::new();
/// let pwt = catalog.table("pwt")?;
/// println!("{}", pwt.head(5));
/// # Ok::<(), macrodata::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Catalog<S: DatasetStore = BundledStore> {
    store: S,
}

impl Catalog<BundledStore> {
    pub fn new() -> Self {
        Self {
            store: BundledStore,
        }
    }
}

impl Default for Catalog<BundledStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DatasetStore> Catalog<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    /// Numeric-flag entry point, the notebook-style call.
    ///
    /// Returns the requested table for data/definitions/estimates modes;
    /// print modes write to stdout and return `None`.
    pub fn load(&self, name: &str, flag: i8) -> Result<Option<Table>> {
        let info = registry::lookup(name)?;
        let mode = info.mode_for(flag)?;
        log::debug!("load `{}` mode {flag}", info.key);
        match mode {
            Mode::Data => Ok(Some(self.data(info)?)),
            Mode::Definitions => Ok(Some(self.definitions_table(info)?)),
            Mode::Estimates => Ok(Some(self.estimates_table(info)?)),
            Mode::ShowDefinitions => {
                self.print_definitions(info)?;
                Ok(None)
            }
            Mode::ShowEstimates => {
                println!("{}", self.estimates_table(info)?);
                Ok(None)
            }
        }
    }

    /// The dataset itself (flag `0`).
    pub fn table(&self, name: &str) -> Result<Table> {
        let info = registry::lookup(name)?;
        info.mode_for(0)?;
        self.data(info)
    }

    /// The variable definitions as a table (flag `2`).
    pub fn definitions(&self, name: &str) -> Result<Table> {
        let info = registry::lookup(name)?;
        info.mode_for(2)?;
        self.definitions_table(info)
    }

    /// Print the variable definitions (flag `1`).
    pub fn show_definitions(&self, name: &str) -> Result<()> {
        let info = registry::lookup(name)?;
        info.mode_for(1)?;
        self.print_definitions(info)
    }

    /// The estimate start years as a table (flag `-2`).
    pub fn estimates(&self, name: &str) -> Result<Table> {
        let info = registry::lookup(name)?;
        info.mode_for(-2)?;
        self.estimates_table(info)
    }

    /// Print the estimate start years (flag `-1`).
    pub fn show_estimates(&self, name: &str) -> Result<()> {
        let info = registry::lookup(name)?;
        info.mode_for(-1)?;
        println!("{}", self.estimates_table(info)?);
        Ok(())
    }

    /// The business-cycle reference dates as typed intervals.
    pub fn recession_intervals(&self) -> Result<Vec<RecessionInterval>> {
        let table = self.table("dates")?;
        RecessionInterval::from_table(&table)
    }

    /// One row per dataset: key, title, source, and supported flags.
    pub fn list(&self) -> Table {
        let mut out = Table::new(vec!["key", "title", "source", "modes"]);
        for info in registry::all() {
            let modes = info
                .supported_flags()
                .iter()
                .map(|f| f.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            out.push_row(vec![
                Value::Str(info.key.to_string()),
                Value::Str(info.title.to_string()),
                Value::Str(info.source.to_string()),
                Value::Str(modes),
            ]);
        }
        out
    }

    fn raw(&self, info: &DatasetInfo) -> Result<Table> {
        let bytes = self.store.resolve(info.member)?;
        Table::from_csv(&bytes, &info.spec)
    }

    fn data(&self, info: &DatasetInfo) -> Result<Table> {
        let raw = self.raw(info)?;
        match info.recipe {
            Recipe::Plain => Ok(raw),
            Recipe::DropNulls(column) => raw.drop_nulls(column),
            Recipe::WeoLong => reshape::pivot_weo(&raw),
            Recipe::RegionsLong => reshape::regions_long(&raw),
        }
    }

    fn definitions_table(&self, info: &DatasetInfo) -> Result<Table> {
        match info.defs {
            Defs::Inline(pairs) => {
                let mut out = Table::new(vec!["variable", "definition"]);
                for (var, def) in pairs {
                    out.push_row(vec![
                        Value::Str((*var).to_string()),
                        Value::Str((*def).to_string()),
                    ]);
                }
                Ok(out)
            }
            Defs::Member(member) => {
                let bytes = self.store.resolve(member)?;
                let raw = Table::from_csv(&bytes, &DecodeSpec::default())?;
                // section-header rows carry a definition but no name
                raw.drop_nulls(&raw.columns()[0])
            }
            Defs::WeoSlice => {
                let raw = self.raw(info)?;
                raw.filter_eq("Country", "Japan")?.select(&[
                    "WEO Subject Code",
                    "Subject Descriptor",
                    "Subject Notes",
                    "Units",
                    "Scale",
                ])
            }
        }
    }

    fn print_definitions(&self, info: &DatasetInfo) -> Result<()> {
        println!("{} ({})", info.title, info.source);
        println!("{}", self.definitions_table(info)?);
        Ok(())
    }

    fn estimates_table(&self, info: &DatasetInfo) -> Result<Table> {
        let raw = self.raw(info)?;
        let slice =
            raw.select(&["ISO", "WEO Subject Code", "Country", "Estimates Start After"])?;
        Ok(slice.drop_incomplete())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::store::MemoryStore;

    #[test]
    fn memory_store_injection() {
        let mut store = MemoryStore::new();
        store.insert(
            "debt.csv",
            b"countrycode,country,year,debt_gdp\nJPN,Japan,2000,140.1\nJPN,Japan,2001,148.7\n"
                .to_vec(),
        );
        let catalog = Catalog::with_store(store);
        let t = catalog.table("debts").unwrap();
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.get(0, "year").unwrap().as_i64(), Some(2000));
        assert_eq!(t.get(1, "debt_gdp").unwrap().as_f64(), Some(148.7));
    }

    #[test]
    fn missing_member_surfaces() {
        let catalog = Catalog::with_store(MemoryStore::new());
        assert!(matches!(
            catalog.table("pwt"),
            Err(Error::MissingMember { .. })
        ));
    }

    #[test]
    fn definitions_need_the_capability() {
        let catalog = Catalog::with_store(MemoryStore::new());
        // capability check happens before any store access
        assert!(matches!(
            catalog.definitions("jpn-q"),
            Err(Error::InvalidMode { .. })
        ));
        assert!(matches!(
            catalog.estimates("pwt"),
            Err(Error::InvalidMode { .. })
        ));
        assert!(matches!(
            catalog.load("mad", -1),
            Err(Error::InvalidMode { .. })
        ));
    }

    #[test]
    fn list_covers_the_whole_catalog() {
        let catalog = Catalog::new();
        let t = catalog.list();
        assert_eq!(t.n_rows(), 12);
        assert_eq!(t.columns(), &["key", "title", "source", "modes"]);
    }
}
