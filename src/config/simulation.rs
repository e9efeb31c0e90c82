use super::traits::ConfigSection;
use crate::error::TradeblendError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub initial_capital: f64,
    /// Fee charged on traded notional, both sides
    pub commission: f64,
    /// Share of available cash committed on each entry
    pub position_fraction: f64,
    pub fitness_metric: FitnessMetric,
    /// Periods per year used to annualize Sharpe and Sortino
    pub annualization_factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitnessMetric {
    SharpeRatio,
    SortinoRatio,
    TotalReturnPct,
    ProfitFactor,
}

impl FitnessMetric {
    /// Key of this metric in a simulation report.
    pub fn metric_name(&self) -> &'static str {
        match self {
            FitnessMetric::SharpeRatio => "sharpe_ratio",
            FitnessMetric::SortinoRatio => "sortino_ratio",
            FitnessMetric::TotalReturnPct => "total_return_pct",
            FitnessMetric::ProfitFactor => "profit_factor",
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            commission: 0.0,
            position_fraction: 1.0,
            fitness_metric: FitnessMetric::SharpeRatio,
            annualization_factor: 252.0,
        }
    }
}

impl ConfigSection for SimulationConfig {
    fn section_name() -> &'static str {
        "simulation"
    }

    fn validate(&self) -> Result<(), TradeblendError> {
        if !(self.initial_capital.is_finite() && self.initial_capital > 0.0) {
            return Err(TradeblendError::Configuration(
                "Initial capital must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.commission) {
            return Err(TradeblendError::Configuration(
                "Commission must be in [0, 1)".to_string(),
            ));
        }
        if !(self.position_fraction > 0.0 && self.position_fraction <= 1.0) {
            return Err(TradeblendError::Configuration(
                "Position fraction must be in (0, 1]".to_string(),
            ));
        }
        if !(self.annualization_factor > 0.0) {
            return Err(TradeblendError::Configuration(
                "Annualization factor must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
