use crate::{
    config::simulation::{FitnessMetric, SimulationConfig},
    engines::evaluation::{FitnessEvaluator, Portfolio},
    engines::metrics::MetricsEngine,
    error::{Result, TradeblendError},
    types::{BlendedSignal, PriceSeries, SimulationReport},
};

/// Reference evaluator: long-only portfolio simulation scored by one metric.
#[derive(Debug, Clone)]
pub struct PortfolioEvaluator {
    metric: FitnessMetric,
}

impl PortfolioEvaluator {
    pub fn new(metric: FitnessMetric) -> Self {
        Self { metric }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.fitness_metric)
    }

    pub fn metric(&self) -> FitnessMetric {
        self.metric
    }
}

impl Default for PortfolioEvaluator {
    fn default() -> Self {
        Self::new(FitnessMetric::SharpeRatio)
    }
}

impl FitnessEvaluator for PortfolioEvaluator {
    type Config = SimulationConfig;
    type Handle = SimulationReport;

    fn evaluate(
        &self,
        prices: &PriceSeries,
        signal: &BlendedSignal,
        config: &SimulationConfig,
    ) -> Result<SimulationReport> {
        if prices.is_empty() {
            return Err(TradeblendError::Evaluation(
                "Cannot simulate an empty price series".to_string(),
            ));
        }
        if signal.entries.len() != prices.len() || signal.exits.len() != prices.len() {
            return Err(TradeblendError::Evaluation(format!(
                "Signal length {}/{} does not match {} prices",
                signal.entries.len(),
                signal.exits.len(),
                prices.len()
            )));
        }

        let mut portfolio = Portfolio::with_costs(
            config.initial_capital,
            config.commission,
            config.position_fraction,
        );

        for (i, price) in prices.as_slice().iter().enumerate() {
            portfolio.process_bar(i, signal.entries[i], signal.exits[i], *price)?;
        }

        let metrics = MetricsEngine::new(config.initial_capital, config.annualization_factor)
            .calculate_all(portfolio.get_trades(), portfolio.get_equity_curve());

        Ok(SimulationReport {
            metrics,
            trades: portfolio.get_trades().to_vec(),
            equity_curve: portfolio.get_equity_curve().to_vec(),
            open_position: portfolio.position.is_some(),
        })
    }

    fn score(&self, handle: &SimulationReport) -> f64 {
        handle.metric(self.metric.metric_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::evaluation::{sanitize_fitness, FITNESS_SENTINEL};

    fn signal(entries: &[bool], exits: &[bool]) -> BlendedSignal {
        BlendedSignal {
            entries: entries.to_vec(),
            exits: exits.to_vec(),
        }
    }

    #[test]
    fn test_round_trip_trade() {
        let prices = PriceSeries::new(vec![100.0, 105.0, 110.0, 108.0]);
        let s = signal(&[true, false, false, false], &[false, false, true, false]);
        let report = PortfolioEvaluator::default()
            .evaluate(&prices, &s, &SimulationConfig::default())
            .unwrap();

        assert_eq!(report.trades.len(), 1);
        assert_eq!(report.trades[0].entry_bar, 0);
        assert_eq!(report.trades[0].exit_bar, 2);
        assert!(report.trades[0].profit > 0.0);
        assert!(!report.open_position);
        assert_eq!(report.equity_curve.len(), prices.len() + 1);
    }

    #[test]
    fn test_no_entries_scores_as_sentinel() {
        let prices = PriceSeries::new(vec![100.0, 101.0, 99.0]);
        let s = signal(&[false; 3], &[false; 3]);
        let evaluator = PortfolioEvaluator::default();
        let report = evaluator.evaluate(&prices, &s, &SimulationConfig::default()).unwrap();

        assert!(report.trades.is_empty());
        assert!(!evaluator.score(&report).is_finite());
        assert_eq!(sanitize_fitness(evaluator.score(&report)), FITNESS_SENTINEL);
    }

    #[test]
    fn test_total_return_metric() {
        let prices = PriceSeries::new(vec![100.0, 110.0, 121.0]);
        let s = signal(&[true, false, false], &[false, false, true]);
        let evaluator = PortfolioEvaluator::new(FitnessMetric::TotalReturnPct);
        let report = evaluator.evaluate(&prices, &s, &SimulationConfig::default()).unwrap();
        assert!((evaluator.score(&report) - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let evaluator = PortfolioEvaluator::default();
        let config = SimulationConfig::default();

        let empty = evaluator.evaluate(&PriceSeries::new(vec![]), &signal(&[], &[]), &config);
        assert!(matches!(empty, Err(TradeblendError::Evaluation(_))));

        let mismatched = evaluator.evaluate(
            &PriceSeries::new(vec![1.0, 2.0]),
            &signal(&[true], &[false]),
            &config,
        );
        assert!(matches!(mismatched, Err(TradeblendError::Evaluation(_))));

        let bad_price = evaluator.evaluate(
            &PriceSeries::new(vec![1.0, -2.0]),
            &signal(&[true, false], &[false, true]),
            &config,
        );
        assert!(matches!(bad_price, Err(TradeblendError::Evaluation(_))));
    }
}
