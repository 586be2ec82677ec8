//! Reshaping primitives: melt wide blocks into long form, merge long
//! tables back together, and the two drivers that bring the WEO and
//! Maddison regional sheets into their published shapes.

use crate::error::{Error, Result};
use crate::table::{Table, Value};
use std::collections::{HashMap, HashSet};

/// Unpivot: one output row per (input row, value column).
///
/// The id column is carried through under `id_name`, the value column's
/// header lands in `var_name`, and its cell in `value_name`.
pub fn melt(
    table: &Table,
    id: usize,
    value_cols: &[usize],
    id_name: &str,
    var_name: &str,
    value_name: &str,
) -> Table {
    let mut out = Table::new(vec![id_name, var_name, value_name]);
    for row in table.rows() {
        for &c in value_cols {
            out.push_row(vec![
                row[id].clone(),
                Value::Str(table.columns()[c].clone()),
                row[c].clone(),
            ]);
        }
    }
    out
}

/// Inner join on `keys`, requiring each key to appear at most once per
/// side. Output columns are the left table's followed by the right
/// table's non-key columns.
pub fn merge_one_to_one(left: &Table, right: &Table, keys: &[&str]) -> Result<Table> {
    let col_idx = |t: &Table, k: &str| {
        t.column_index(k)
            .ok_or_else(|| Error::MissingColumn(k.to_string()))
    };
    let lidx: Vec<usize> = keys.iter().map(|k| col_idx(left, k)).collect::<Result<_>>()?;
    let ridx: Vec<usize> = keys.iter().map(|k| col_idx(right, k)).collect::<Result<_>>()?;

    let mut rmap: HashMap<Vec<Value>, usize> = HashMap::with_capacity(right.n_rows());
    for (i, row) in right.rows().iter().enumerate() {
        let key: Vec<Value> = ridx.iter().map(|&c| row[c].clone()).collect();
        if rmap.insert(key, i).is_some() {
            return Err(Error::Reshape(
                "merge key is not unique on the right side".to_string(),
            ));
        }
    }

    let extra: Vec<usize> = (0..right.n_cols()).filter(|c| !ridx.contains(c)).collect();
    let mut columns: Vec<String> = left.columns().to_vec();
    columns.extend(extra.iter().map(|&c| right.columns()[c].clone()));

    let mut seen: HashSet<Vec<Value>> = HashSet::with_capacity(left.n_rows());
    let mut out = Table::new(columns);
    for row in left.rows() {
        let key: Vec<Value> = lidx.iter().map(|&c| row[c].clone()).collect();
        if !seen.insert(key.clone()) {
            return Err(Error::Reshape(
                "merge key is not unique on the left side".to_string(),
            ));
        }
        let Some(&ri) = rmap.get(&key) else {
            continue;
        };
        let mut new_row = row.clone();
        new_row.extend(extra.iter().map(|&c| right.rows()[ri][c].clone()));
        out.push_row(new_row);
    }
    Ok(out)
}

/// IMF WEO sheet to long form: the raw table has one row per country
/// and subject with years across the columns. The result has one row
/// per country-year, subject codes as columns (sorted), and drops
/// country-years where every subject is missing.
pub(crate) fn pivot_weo(raw: &Table) -> Result<Table> {
    let need = |name: &str| {
        raw.column_index(name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    };
    let iso_i = need("ISO")?;
    let country_i = need("Country")?;
    let subj_i = need("WEO Subject Code")?;

    let year_cols: Vec<(usize, i64)> = raw
        .columns()
        .iter()
        .enumerate()
        .filter_map(|(i, c)| c.parse::<i64>().ok().map(|y| (i, y)))
        .collect();
    if year_cols.is_empty() {
        return Err(Error::Reshape("no year columns in the sheet".to_string()));
    }
    let mut years: Vec<i64> = year_cols.iter().map(|&(_, y)| y).collect();
    years.sort_unstable();

    let mut subjects: Vec<String> = Vec::new();
    let mut names: HashMap<String, String> = HashMap::new();
    let mut isos: Vec<String> = Vec::new();
    let mut values: HashMap<(String, i64, String), Value> = HashMap::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    for row in raw.rows() {
        let Some(iso) = row[iso_i].as_str() else {
            continue;
        };
        let Some(subj) = row[subj_i].as_str() else {
            continue;
        };
        if !seen.insert((iso.to_string(), subj.to_string())) {
            return Err(Error::Reshape(format!(
                "subject `{subj}` appears more than once for {iso}"
            )));
        }
        if !names.contains_key(iso) {
            let name = row[country_i].as_str().unwrap_or(iso).to_string();
            names.insert(iso.to_string(), name);
            isos.push(iso.to_string());
        }
        if !subjects.iter().any(|s| s == subj) {
            subjects.push(subj.to_string());
        }
        for &(c, y) in &year_cols {
            values.insert((iso.to_string(), y, subj.to_string()), row[c].clone());
        }
    }
    subjects.sort_unstable();

    let mut columns = vec![
        "countrycode".to_string(),
        "country".to_string(),
        "year".to_string(),
    ];
    columns.extend(subjects.iter().cloned());
    let mut out = Table::new(columns);
    for iso in &isos {
        let name = &names[iso];
        for &y in &years {
            let mut row = vec![
                Value::Str(iso.clone()),
                Value::Str(name.clone()),
                Value::Int(y),
            ];
            let mut all_null = true;
            for s in &subjects {
                let v = values
                    .get(&(iso.clone(), y, s.clone()))
                    .cloned()
                    .unwrap_or(Value::Null);
                if !v.is_null() {
                    all_null = false;
                }
                row.push(v);
            }
            if all_null {
                continue;
            }
            out.push_row(row);
        }
    }
    out.sort_by(&["countrycode", "year"])?;
    Ok(out)
}

/// Maddison regional sheet to long form: the id column holds years and
/// the value columns come as a GDP-per-capita block followed by an
/// equally wide population block, both headed by the region names.
pub(crate) fn regions_long(raw: &Table) -> Result<Table> {
    let n = raw.n_cols();
    if n < 3 || (n - 1) % 2 != 0 {
        return Err(Error::Reshape(format!(
            "expected paired GDP and population blocks, got {n} columns"
        )));
    }
    let half = (n - 1) / 2;
    let gdp_cols: Vec<usize> = (1..=half).collect();
    let pop_cols: Vec<usize> = (half + 1..n).collect();
    let gdp = melt(raw, 0, &gdp_cols, "year", "regions", "gdppc");
    let pop = melt(raw, 0, &pop_cols, "year", "regions", "pop");
    let merged = merge_one_to_one(&gdp, &pop, &["year", "regions"])?;
    let mut out = merged.select(&["regions", "year", "gdppc", "pop"])?;
    out.sort_by(&["regions", "year"])?;
    Ok(out)
}
