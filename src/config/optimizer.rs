use super::traits::ConfigSection;
use crate::engines::blending::DEFAULT_WEIGHT_FLOOR;
use crate::engines::evolution::AnnealingSchedule;
use crate::error::TradeblendError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub population_size: usize,
    pub n_steps: usize,
    pub generation_size: usize,
    pub initial_temperature: f64,
    pub decay: f64,
    pub entry_threshold: f64,
    pub exit_threshold: f64,
    pub weight_floor: f64,
    pub acceptance: AcceptancePolicy,
    pub parallel: bool,
    pub seed: Option<u64>,
}

/// When a mutated trial replaces the current candidate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AcceptancePolicy {
    /// Accept when the trial scores at least as well; drifts across plateaus
    #[default]
    Tolerant,
    /// Accept only strict improvements
    Strict,
}

impl AcceptancePolicy {
    pub fn accepts(&self, trial: f64, current: f64) -> bool {
        match self {
            AcceptancePolicy::Tolerant => trial >= current,
            AcceptancePolicy::Strict => trial > current,
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            n_steps: 20,
            generation_size: 10,
            initial_temperature: 1.0,
            decay: 1.0,
            entry_threshold: 0.5,
            exit_threshold: 0.5,
            weight_floor: DEFAULT_WEIGHT_FLOOR,
            acceptance: AcceptancePolicy::Tolerant,
            parallel: false,
            seed: None,
        }
    }
}

impl OptimizerConfig {
    pub fn schedule(&self) -> AnnealingSchedule {
        AnnealingSchedule {
            n_steps: self.n_steps,
            generation_size: self.generation_size,
            initial_temperature: self.initial_temperature,
            decay: self.decay,
        }
    }
}

impl ConfigSection for OptimizerConfig {
    fn section_name() -> &'static str {
        "optimizer"
    }

    fn validate(&self) -> Result<(), TradeblendError> {
        if self.population_size == 0 {
            return Err(TradeblendError::Configuration(
                "Population size must be at least 1".to_string(),
            ));
        }
        self.schedule().validate()?;
        for (name, threshold) in [("Entry", self.entry_threshold), ("Exit", self.exit_threshold)] {
            if !(0.0..1.0).contains(&threshold) {
                return Err(TradeblendError::Configuration(format!(
                    "{} threshold must be in [0, 1), got {}",
                    name, threshold
                )));
            }
        }
        if !(self.weight_floor > 0.0 && self.weight_floor < 1.0) {
            return Err(TradeblendError::Configuration(format!(
                "Weight floor must be in (0, 1), got {}",
                self.weight_floor
            )));
        }
        Ok(())
    }
}
