use crate::config::{AcceptancePolicy, OptimizerConfig};
use crate::engines::blending::DEFAULT_WEIGHT_FLOOR;
use crate::engines::evaluation::FitnessEvaluator;
use crate::types::{PriceSeries, SignalSet};

/// Read-only inputs shared by every candidate of a population.
///
/// Held behind an `Arc`; nothing in here changes once the run starts.
pub struct EvaluationContext<E: FitnessEvaluator> {
    pub prices: PriceSeries,
    pub signals: SignalSet,
    pub evaluator: E,
    pub evaluator_config: E::Config,
    pub entry_threshold: f64,
    pub exit_threshold: f64,
    pub weight_floor: f64,
    pub acceptance: AcceptancePolicy,
}

impl<E: FitnessEvaluator> EvaluationContext<E> {
    pub fn new(prices: PriceSeries, signals: SignalSet, evaluator: E, evaluator_config: E::Config) -> Self {
        Self {
            prices,
            signals,
            evaluator,
            evaluator_config,
            entry_threshold: 0.5,
            exit_threshold: 0.5,
            weight_floor: DEFAULT_WEIGHT_FLOOR,
            acceptance: AcceptancePolicy::Tolerant,
        }
    }

    pub fn with_thresholds(mut self, entry_threshold: f64, exit_threshold: f64) -> Self {
        self.entry_threshold = entry_threshold;
        self.exit_threshold = exit_threshold;
        self
    }

    pub fn with_weight_floor(mut self, weight_floor: f64) -> Self {
        self.weight_floor = weight_floor;
        self
    }

    pub fn with_acceptance(mut self, acceptance: AcceptancePolicy) -> Self {
        self.acceptance = acceptance;
        self
    }

    /// Take thresholds, floor and acceptance policy from an optimizer config.
    pub fn with_optimizer_config(self, config: &OptimizerConfig) -> Self {
        self.with_thresholds(config.entry_threshold, config.exit_threshold)
            .with_weight_floor(config.weight_floor)
            .with_acceptance(config.acceptance)
    }

    pub fn num_sources(&self) -> usize {
        self.signals.num_sources()
    }
}
