use crate::error::{Error, Result};
use crate::table::{Table, Value};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Summary statistics for one numeric column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub column: String,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Compute statistics for every numeric column, in table order.
/// Non-numeric columns are skipped; missing cells are counted, not imputed.
pub fn column_summary(table: &Table) -> Vec<Summary> {
    let mut out = Vec::new();
    for (ci, name) in table.columns().iter().enumerate() {
        let mut vals: Vec<f64> = Vec::new();
        let mut missing = 0usize;
        let mut non_numeric = false;
        for row in table.rows() {
            match &row[ci] {
                Value::Null => missing += 1,
                v => match v.as_f64() {
                    Some(x) => vals.push(x),
                    None => {
                        non_numeric = true;
                        break;
                    }
                },
            }
        }
        if non_numeric || vals.is_empty() {
            continue;
        }
        vals.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let count = vals.len();
        let min = vals.first().cloned();
        let max = vals.last().cloned();
        let mean = Some(vals.iter().copied().sum::<f64>() / count as f64);
        let median = if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        out.push(Summary {
            column: name.clone(),
            count,
            missing,
            min,
            max,
            mean,
            median,
        });
    }
    out
}

/// Hodrick-Prescott trend with the standard quarterly smoothing
/// parameter (lambda = 1600).
pub fn trend(y: &[f64]) -> Vec<f64> {
    trend_with(y, 1600.0)
}

/// Hodrick-Prescott trend with an explicit smoothing parameter.
///
/// Minimizes `sum((y - tau)^2) + lambda * sum((delta^2 tau)^2)` by
/// solving `(I + lambda * D'D) tau = y` where `D` is the second
/// difference operator. Series shorter than three observations come
/// back unchanged.
pub fn trend_with(y: &[f64], lambda: f64) -> Vec<f64> {
    let n = y.len();
    if n < 3 {
        return y.to_vec();
    }
    let d = DMatrix::<f64>::from_fn(n - 2, n, |i, j| {
        if j == i {
            1.0
        } else if j == i + 1 {
            -2.0
        } else if j == i + 2 {
            1.0
        } else {
            0.0
        }
    });
    let a = DMatrix::<f64>::identity(n, n) + d.transpose() * d * lambda;
    let b = DVector::<f64>::from_column_slice(y);
    // The system matrix is symmetric positive definite for finite input.
    match a.cholesky() {
        Some(chol) => chol.solve(&b).iter().copied().collect(),
        None => y.to_vec(),
    }
}

/// Evenly spaced grid over `[low, high]`, endpoints included.
pub fn xvalues(low: f64, high: f64, count: usize) -> Result<Vec<f64>> {
    if !(low < high) || count < 2 {
        return Err(Error::InvalidRange { low, high, count });
    }
    let step = (high - low) / (count - 1) as f64;
    let mut out: Vec<f64> = (0..count).map(|i| low + step * i as f64).collect();
    // last element is exactly `high`
    out[count - 1] = high;
    Ok(out)
}
