//! A small column-labelled table: the in-memory shape of every dataset.
//!
//! Cells are dynamically typed (`Value`), columns are named, and decoding
//! from CSV is driven by a per-file `DecodeSpec` so that oddities like
//! thousands separators, `--` markers, preamble rows, and source footers
//! are handled at the edge, once.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt;

/// A single cell.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
    Date(NaiveDate),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            // Bit equality keeps Eq/Hash lawful; cells never hold NaN (missing is Null).
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0u8.hash(state),
            Value::Int(i) => {
                1u8.hash(state);
                i.hash(state);
            }
            Value::Float(f) => {
                2u8.hash(state);
                f.to_bits().hash(state);
            }
            Value::Str(s) => {
                3u8.hash(state);
                s.hash(state);
            }
            Value::Date(d) => {
                4u8.hash(state);
                d.hash(state);
            }
        }
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view: `Int` and `Float` cells only.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Ordering used by table sorts: nulls first, numbers by value,
    /// dates and strings by their natural order. Mixed types fall back
    /// to a fixed rank so sorting is total.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        fn rank(v: &Value) -> u8 {
            match v {
                Value::Null => 0,
                Value::Int(_) | Value::Float(_) => 1,
                Value::Date(_) => 2,
                Value::Str(_) => 3,
            }
        }
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).total_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.total_cmp(&(*b as f64)),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NA"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// How to decode one CSV member into typed cells.
///
/// Everything is borrowed `'static` so specs can live in the catalog's
/// const tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeSpec {
    /// Physical row indices (0-based, counted over the raw file) dropped
    /// before the header is taken.
    pub skip_rows: &'static [usize],
    /// Trailing rows dropped, e.g. a source attribution line.
    pub skip_footer: usize,
    /// Strip `,` from numeric cells ("447,103.1").
    pub thousands_comma: bool,
    /// Cell spellings decoded as missing, in addition to the empty cell.
    pub na_markers: &'static [&'static str],
    /// Columns parsed as `Date` (format `%Y-%m-%d`).
    pub date_columns: &'static [&'static str],
    /// Columns parsed as `Int`; everything else numeric becomes `Float`.
    pub int_columns: &'static [&'static str],
}

/// Column-labelled rows. Row access is positional, column access by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: Vec<S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate one column's cells top to bottom.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &Value> + '_> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))?;
        Ok(self.rows.iter().map(move |r| &r[idx]))
    }

    /// One column as numbers, `None` where the cell is null or non-numeric.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        Ok(self.column(name)?.map(|v| v.as_f64()).collect())
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// New table with the named columns, in the given order.
    pub fn select(&self, names: &[&str]) -> Result<Table> {
        let idx: Vec<usize> = names
            .iter()
            .map(|n| {
                self.column_index(n)
                    .ok_or_else(|| Error::MissingColumn(n.to_string()))
            })
            .collect::<Result<_>>()?;
        let mut out = Table::new(names.to_vec());
        for row in &self.rows {
            out.push_row(idx.iter().map(|&i| row[i].clone()).collect());
        }
        Ok(out)
    }

    /// New table without the rows whose cell in `column` is null.
    pub fn drop_nulls(&self, column: &str) -> Result<Table> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| Error::MissingColumn(column.to_string()))?;
        let mut out = Table::new(self.columns.clone());
        for row in &self.rows {
            if !row[idx].is_null() {
                out.push_row(row.clone());
            }
        }
        Ok(out)
    }

    /// New table without the rows that have a null in any cell.
    pub fn drop_incomplete(&self) -> Table {
        let mut out = Table::new(self.columns.clone());
        for row in &self.rows {
            if !row.iter().any(Value::is_null) {
                out.push_row(row.clone());
            }
        }
        out
    }

    /// Keep rows whose cell in `column` renders equal to `needle`.
    pub fn filter_eq(&self, column: &str, needle: &str) -> Result<Table> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| Error::MissingColumn(column.to_string()))?;
        let mut out = Table::new(self.columns.clone());
        for row in &self.rows {
            if row[idx].to_string() == needle {
                out.push_row(row.clone());
            }
        }
        Ok(out)
    }

    /// First `n` rows (all of them when the table is shorter).
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Stable sort by the named key columns, nulls first.
    pub fn sort_by(&mut self, keys: &[&str]) -> Result<()> {
        let idx: Vec<usize> = keys
            .iter()
            .map(|k| {
                self.column_index(k)
                    .ok_or_else(|| Error::MissingColumn(k.to_string()))
            })
            .collect::<Result<_>>()?;
        self.rows.sort_by(|a, b| {
            for &i in &idx {
                let ord = a[i].sort_cmp(&b[i]);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
        Ok(())
    }

    /// Decode CSV bytes into a typed table per `spec`.
    ///
    /// The first row that survives `skip_rows` is the header. Short rows
    /// are padded with nulls; long rows are truncated to the header width.
    pub fn from_csv(data: &[u8], spec: &DecodeSpec) -> Result<Table> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data);

        let mut records: Vec<csv::StringRecord> = Vec::new();
        for (i, rec) in rdr.records().enumerate() {
            let rec = rec?;
            if spec.skip_rows.contains(&i) {
                continue;
            }
            records.push(rec);
        }
        if spec.skip_footer > 0 {
            let keep = records.len().saturating_sub(spec.skip_footer);
            records.truncate(keep);
        }
        let mut it = records.into_iter();
        let header = it
            .next()
            .ok_or_else(|| Error::Reshape("empty CSV input".to_string()))?;
        let columns: Vec<String> = header.iter().map(|c| c.trim().to_string()).collect();

        let mut table = Table::new(columns);
        for (rowno, rec) in it.enumerate() {
            let mut row = Vec::with_capacity(table.n_cols());
            for col in 0..table.n_cols() {
                let raw = rec.get(col).unwrap_or("");
                row.push(decode_cell(raw, &table.columns[col], rowno, spec)?);
            }
            table.rows.push(row);
        }
        Ok(table)
    }
}

fn decode_cell(raw: &str, column: &str, row: usize, spec: &DecodeSpec) -> Result<Value> {
    let s = raw.trim();
    if s.is_empty() || spec.na_markers.contains(&s) {
        return Ok(Value::Null);
    }
    let parse_err = || Error::Parse {
        column: column.to_string(),
        row,
        value: s.to_string(),
    };
    if spec.date_columns.contains(&column) {
        let d = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| parse_err())?;
        return Ok(Value::Date(d));
    }
    if spec.int_columns.contains(&column) {
        let cleaned = if spec.thousands_comma {
            s.replace(',', "")
        } else {
            s.to_string()
        };
        let i = cleaned.parse::<i64>().map_err(|_| parse_err())?;
        return Ok(Value::Int(i));
    }
    let candidate = if spec.thousands_comma {
        s.replace(',', "")
    } else {
        s.to_string()
    };
    if let Ok(f) = candidate.parse::<f64>() {
        // non-finite spellings ("NaN", "inf") count as missing
        return Ok(if f.is_finite() {
            Value::Float(f)
        } else {
            Value::Null
        });
    }
    Ok(Value::Str(s.to_string()))
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Render everything first, then pad. Numeric columns are
        // right-aligned, everything else left-aligned.
        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| r.iter().map(|v| v.to_string()).collect())
            .collect();
        let numeric: Vec<bool> = (0..self.n_cols())
            .map(|c| {
                let mut any = false;
                for row in &self.rows {
                    match &row[c] {
                        Value::Int(_) | Value::Float(_) => any = true,
                        Value::Null => {}
                        _ => return false,
                    }
                }
                any
            })
            .collect();
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &rendered {
            for (c, cell) in row.iter().enumerate() {
                widths[c] = widths[c].max(cell.chars().count());
            }
        }
        let write_row = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
            for (c, cell) in cells.iter().enumerate() {
                if c > 0 {
                    write!(f, "  ")?;
                }
                let pad = widths[c].saturating_sub(cell.chars().count());
                if numeric[c] {
                    write!(f, "{}{}", " ".repeat(pad), cell)?;
                } else {
                    write!(f, "{}{}", cell, " ".repeat(pad))?;
                }
            }
            writeln!(f)
        };
        let header: Vec<String> = self.columns.clone();
        write_row(f, &header)?;
        for row in &rendered {
            write_row(f, row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: DecodeSpec = DecodeSpec {
        skip_rows: &[],
        skip_footer: 0,
        thousands_comma: false,
        na_markers: &[],
        date_columns: &[],
        int_columns: &["year"],
    };

    #[test]
    fn decode_thousands_and_na_markers() {
        let spec = DecodeSpec {
            thousands_comma: true,
            na_markers: &["--"],
            int_columns: &["year"],
            ..DecodeSpec::default()
        };
        let csv = b"year,gdp,note\n1980,\"1,234.5\",--\n1981,,ok\n1982,NaN,ok\n";
        let t = Table::from_csv(csv, &spec).unwrap();
        assert_eq!(t.n_rows(), 3);
        assert_eq!(t.get(0, "year"), Some(&Value::Int(1980)));
        assert_eq!(t.get(0, "gdp"), Some(&Value::Float(1234.5)));
        assert!(t.get(0, "note").unwrap().is_null());
        assert!(t.get(1, "gdp").unwrap().is_null());
        assert_eq!(t.get(1, "note").unwrap().as_str(), Some("ok"));
        // a literal NaN never becomes a Float cell
        assert!(t.get(2, "gdp").unwrap().is_null());
    }

    #[test]
    fn skip_rows_and_footer() {
        let spec = DecodeSpec {
            skip_rows: &[0, 2],
            skip_footer: 1,
            ..PLAIN
        };
        let csv = b"title row\na,b\nunits,units\n1.5,x\n2.5,y\nsource line,\n";
        let t = Table::from_csv(csv, &spec).unwrap();
        assert_eq!(t.columns(), &["a".to_string(), "b".to_string()]);
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.get(1, "a"), Some(&Value::Float(2.5)));
    }

    #[test]
    fn date_columns_parse_and_reject() {
        let spec = DecodeSpec {
            date_columns: &["when"],
            ..PLAIN
        };
        let ok = Table::from_csv(b"when,v\n2020-05-01,1\n", &spec).unwrap();
        assert_eq!(
            ok.get(0, "when").unwrap().as_date(),
            NaiveDate::from_ymd_opt(2020, 5, 1)
        );
        let bad = Table::from_csv(b"when,v\nnot-a-date,1\n", &spec);
        assert!(matches!(bad, Err(Error::Parse { .. })));
    }

    #[test]
    fn sort_puts_nulls_first() {
        let mut t = Table::new(vec!["k"]);
        t.push_row(vec![Value::Float(2.0)]);
        t.push_row(vec![Value::Null]);
        t.push_row(vec![Value::Float(1.0)]);
        t.sort_by(&["k"]).unwrap();
        assert!(t.rows()[0][0].is_null());
        assert_eq!(t.rows()[1][0], Value::Float(1.0));
    }

    #[test]
    fn drop_incomplete_keeps_fully_valued_rows() {
        let mut t = Table::new(vec!["a", "b"]);
        t.push_row(vec![Value::Int(1), Value::Str("x".into())]);
        t.push_row(vec![Value::Int(2), Value::Null]);
        t.push_row(vec![Value::Null, Value::Str("y".into())]);
        let kept = t.drop_incomplete();
        assert_eq!(kept.n_rows(), 1);
        assert_eq!(kept.get(0, "a"), Some(&Value::Int(1)));
    }

    #[test]
    fn select_unknown_column_errors() {
        let t = Table::new::<&str>(vec!["a"]);
        assert!(matches!(
            t.select(&["nope"]),
            Err(Error::MissingColumn(_))
        ));
    }

    #[test]
    fn display_marks_missing_as_na() {
        let mut t = Table::new(vec!["name", "v"]);
        t.push_row(vec![Value::Str("x".into()), Value::Null]);
        let s = t.to_string();
        assert!(s.contains("name"));
        assert!(s.contains("NA"));
    }
}
