use crate::error::{Result, TradeblendError};
use crate::types::{PriceSeries, SignalSet};
use polars::prelude::*;

/// Read a price column as `f64`. Nulls are rejected.
pub fn prices_from_frame(df: &DataFrame, column: &str) -> Result<PriceSeries> {
    let values = df.column(column)?.cast(&DataType::Float64)?;
    let values = values.f64()?;

    let prices = values
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            v.ok_or_else(|| {
                TradeblendError::InputShape(format!("Null price in column '{}' at row {}", column, i))
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(PriceSeries::new(prices))
}

/// Build a `SignalSet` from paired boolean columns.
///
/// `entry_columns[i]` and `exit_columns[i]` form source `i`. Nulls read as no
/// signal.
pub fn signals_from_frame(
    df: &DataFrame,
    entry_columns: &[&str],
    exit_columns: &[&str],
) -> Result<SignalSet> {
    let entries = entry_columns
        .iter()
        .map(|name| bool_column(df, name))
        .collect::<Result<Vec<_>>>()?;
    let exits = exit_columns
        .iter()
        .map(|name| bool_column(df, name))
        .collect::<Result<Vec<_>>>()?;

    SignalSet::new(entries, exits)
}

fn bool_column(df: &DataFrame, name: &str) -> Result<Vec<bool>> {
    let column = df.column(name)?;
    let flags = column.bool().map_err(|_| {
        TradeblendError::InputShape(format!(
            "Signal column '{}' must be boolean, found {}",
            name,
            column.dtype()
        ))
    })?;
    Ok(flags.into_iter().map(|v| v.unwrap_or(false)).collect())
}
