use crate::table::{Table, Value};
use anyhow::Result;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn csv_cell(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_cell(v: &Value) -> serde_json::Value {
    match v {
        Value::Null => serde_json::Value::Null,
        Value::Int(i) => serde_json::json!(i),
        Value::Float(f) => serde_json::json!(f),
        Value::Str(s) => serde_json::json!(s),
        Value::Date(d) => serde_json::json!(d.format("%Y-%m-%d").to_string()),
    }
}

/// Save a table as CSV with header. Missing cells become empty fields.
pub fn save_csv<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(csv_cell))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save a table as a pretty JSON array of row objects.
pub fn save_json<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = table
        .rows()
        .iter()
        .map(|row| {
            table
                .columns()
                .iter()
                .zip(row)
                .map(|(c, v)| (c.clone(), json_cell(v)))
                .collect()
        })
        .collect();
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(&rows)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
