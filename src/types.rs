use crate::error::{Result, TradeblendError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Blend weights, one per signal source, summing to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightVector(Vec<f64>);

impl WeightVector {
    /// Validate raw weights and scale them onto the simplex.
    ///
    /// Weights must be finite, non-negative and have a positive sum. Relative
    /// proportions are kept; no floor is applied here.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(TradeblendError::InputShape(
                "Weight vector must contain at least one weight".to_string(),
            ));
        }
        if let Some(bad) = values.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(TradeblendError::InputShape(format!(
                "Weights must be finite and non-negative, got {}",
                bad
            )));
        }
        let total: f64 = values.iter().sum();
        if total <= 0.0 {
            return Err(TradeblendError::InputShape(
                "Weights must have a positive sum".to_string(),
            ));
        }
        Ok(Self(values.into_iter().map(|w| w / total).collect()))
    }

    /// Every element equal to `1 / len`.
    pub fn uniform(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(TradeblendError::InputShape(
                "Cannot build a weight vector of length 0".to_string(),
            ));
        }
        Ok(Self(vec![1.0 / len as f64; len]))
    }

    /// Wrap values that are already normalized.
    pub(crate) fn from_normalized(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl AsRef<[f64]> for WeightVector {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// Comma-joined weights in vector order.
impl fmt::Display for WeightVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, w) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", w)?;
        }
        Ok(())
    }
}

/// Aligned entry and exit series from N signal sources.
///
/// `entries[i][t]` and `exits[i][t]` refer to source `i` at bar `t`. All series
/// share one length.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSet {
    entries: Vec<Vec<bool>>,
    exits: Vec<Vec<bool>>,
}

impl SignalSet {
    pub fn new(entries: Vec<Vec<bool>>, exits: Vec<Vec<bool>>) -> Result<Self> {
        check_alignment(&entries, &exits)?;
        Ok(Self { entries, exits })
    }

    pub fn entries(&self) -> &[Vec<bool>] {
        &self.entries
    }

    pub fn exits(&self) -> &[Vec<bool>] {
        &self.exits
    }

    pub fn num_sources(&self) -> usize {
        self.entries.len()
    }

    /// Number of bars per series.
    pub fn len(&self) -> usize {
        self.entries.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shape check shared by `SignalSet::new` and the blender.
pub(crate) fn check_alignment(entries: &[Vec<bool>], exits: &[Vec<bool>]) -> Result<usize> {
    if entries.is_empty() {
        return Err(TradeblendError::InputShape(
            "At least one signal source is required".to_string(),
        ));
    }
    if entries.len() != exits.len() {
        return Err(TradeblendError::InputShape(format!(
            "Got {} entry sources but {} exit sources",
            entries.len(),
            exits.len()
        )));
    }
    let expected = entries[0].len();
    for (i, series) in entries.iter().chain(exits.iter()).enumerate() {
        if series.len() != expected {
            return Err(TradeblendError::InputShape(format!(
                "Series {} has length {}, expected {}",
                i,
                series.len(),
                expected
            )));
        }
    }
    Ok(expected)
}

/// Close prices the signals were derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries(Vec<f64>);

impl PriceSeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for PriceSeries {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// Composite entry/exit series produced by the blender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlendedSignal {
    pub entries: Vec<bool>,
    pub exits: Vec<bool>,
}

impl BlendedSignal {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.iter().filter(|e| **e).count()
    }
}

/// Closed long trade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub entry_bar: usize,
    pub exit_bar: usize,
    pub entry_price: f64,
    pub exit_price: f64,
    pub size: f64,
    pub profit: f64,
    pub fees: f64,
}

/// Outcome of one portfolio simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub metrics: HashMap<String, f64>,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<f64>,
    pub open_position: bool,
}

impl SimulationReport {
    /// Metric value, NaN when the metric was not produced.
    pub fn metric(&self, name: &str) -> f64 {
        self.metrics.get(name).copied().unwrap_or(f64::NAN)
    }
}
