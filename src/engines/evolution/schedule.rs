use crate::error::TradeblendError;
use serde::{Deserialize, Serialize};

/// Mutation-rate annealing: the temperature is multiplied by `decay` once at
/// every generation boundary, never per step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnealingSchedule {
    pub n_steps: usize,
    pub generation_size: usize,
    pub initial_temperature: f64,
    pub decay: f64,
}

impl Default for AnnealingSchedule {
    fn default() -> Self {
        Self {
            n_steps: 20,
            generation_size: 10,
            initial_temperature: 1.0,
            decay: 1.0,
        }
    }
}

impl AnnealingSchedule {
    pub fn validate(&self) -> Result<(), TradeblendError> {
        if self.generation_size == 0 {
            return Err(TradeblendError::Configuration(
                "Generation size must be at least 1".to_string(),
            ));
        }
        if !(self.initial_temperature.is_finite() && self.initial_temperature >= 0.0) {
            return Err(TradeblendError::Configuration(format!(
                "Initial temperature must be a non-negative number, got {}",
                self.initial_temperature
            )));
        }
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(TradeblendError::Configuration(format!(
                "Decay must be in (0, 1], got {}",
                self.decay
            )));
        }
        Ok(())
    }

    /// True when `step` (1-based) closes a generation.
    pub fn is_boundary(&self, step: usize) -> bool {
        step > 0 && step % self.generation_size == 0
    }

    pub fn generations(&self) -> usize {
        self.n_steps / self.generation_size.max(1)
    }
}
