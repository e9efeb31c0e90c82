// src/engines/metrics/engine.rs
use crate::engines::metrics::{ProfitabilityMetrics, RiskMetrics};
use crate::types::Trade;
use std::collections::HashMap;

pub struct MetricsEngine {
    initial_balance: f64,
    annualization_factor: f64,
}

impl MetricsEngine {
    pub fn new(initial_balance: f64, annualization_factor: f64) -> Self {
        Self {
            initial_balance,
            annualization_factor,
        }
    }

    pub fn calculate_all(&self, trades: &[Trade], equity_curve: &[f64]) -> HashMap<String, f64> {
        let mut all_metrics = HashMap::new();

        all_metrics.extend(ProfitabilityMetrics::calculate(trades, self.initial_balance));
        all_metrics.extend(RiskMetrics::calculate(equity_curve, self.annualization_factor));

        let final_balance = equity_curve.last().copied().unwrap_or(self.initial_balance);
        let total_return_pct = (final_balance - self.initial_balance) / self.initial_balance * 100.0;
        all_metrics.insert("total_return_pct".to_string(), total_return_pct);
        all_metrics.insert("num_trades".to_string(), trades.len() as f64);
        all_metrics.insert("final_balance".to_string(), final_balance);

        all_metrics
    }
}
