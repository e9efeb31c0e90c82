// src/engines/metrics/risk.rs
use std::collections::HashMap;

pub struct RiskMetrics;

impl RiskMetrics {
    /// Risk metrics over an equity curve.
    ///
    /// Ratios are always inserted. A flat curve has zero volatility, so its
    /// Sharpe and Sortino ratios come out non-finite; callers decide how to rank that.
    pub fn calculate(equity_curve: &[f64], annualization_factor: f64) -> HashMap<String, f64> {
        let mut metrics = HashMap::new();

        if equity_curve.len() < 2 {
            metrics.insert("sharpe_ratio".to_string(), f64::NAN);
            metrics.insert("sortino_ratio".to_string(), f64::NAN);
            return metrics;
        }

        let max_dd = Self::max_drawdown(equity_curve);
        metrics.insert("max_drawdown_pct".to_string(), max_dd);

        let returns = Self::calculate_returns(equity_curve);
        let volatility = Self::std_dev(&returns);
        metrics.insert("volatility".to_string(), volatility);

        // Risk-free rate of zero
        let avg_return = returns.iter().sum::<f64>() / returns.len() as f64;
        let scale = annualization_factor.sqrt();
        metrics.insert("sharpe_ratio".to_string(), avg_return / volatility * scale);

        let downside_returns: Vec<f64> = returns.iter().filter(|&&r| r < 0.0).copied().collect();
        let downside_dev = Self::downside_deviation(&downside_returns, returns.len());
        metrics.insert("sortino_ratio".to_string(), avg_return / downside_dev * scale);

        metrics
    }

    fn max_drawdown(equity: &[f64]) -> f64 {
        let mut max_dd = 0.0;
        let mut peak = equity[0];

        for &value in equity.iter() {
            if value > peak {
                peak = value;
            }
            if peak > 0.0 {
                let dd = ((peak - value) / peak) * 100.0;
                if dd > max_dd {
                    max_dd = dd;
                }
            }
        }

        max_dd
    }

    fn calculate_returns(equity: &[f64]) -> Vec<f64> {
        equity.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
    }

    fn std_dev(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let variance = values.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

        variance.sqrt()
    }

    /// Root mean square of the negative returns over the full sample.
    fn downside_deviation(downside: &[f64], total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        (downside.iter().map(|r| r * r).sum::<f64>() / total as f64).sqrt()
    }
}
