use super::{optimizer::OptimizerConfig, simulation::SimulationConfig, traits::ConfigSection};
use crate::error::TradeblendError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlendConfig {
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl BlendConfig {
    pub fn validate(&self) -> Result<(), TradeblendError> {
        self.optimizer.validate()?;
        self.simulation.validate()?;
        Ok(())
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, TradeblendError> {
        let config: BlendConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, TradeblendError> {
        toml::to_string_pretty(self)
            .map_err(|e| TradeblendError::Configuration(format!("Failed to serialize: {}", e)))
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<BlendConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(BlendConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TradeblendError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TradeblendError::Configuration(format!("Failed to read config: {}", e)))?;

        let config = BlendConfig::from_toml_str(&contents)?;

        *self.write_lock()? = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TradeblendError> {
        let toml_str = self.get()?.to_toml_string()?;

        std::fs::write(path, toml_str)
            .map_err(|e| TradeblendError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> Result<BlendConfig, TradeblendError> {
        self.config
            .read()
            .map(|config| config.clone())
            .map_err(|_| TradeblendError::Configuration("Config lock poisoned".to_string()))
    }

    /// Apply `f` to a copy and commit it only if the result validates.
    pub fn update<F>(&self, f: F) -> Result<(), TradeblendError>
    where
        F: FnOnce(&mut BlendConfig),
    {
        let mut guard = self.write_lock()?;
        let mut candidate = guard.clone();
        f(&mut candidate);
        candidate.validate()?;
        *guard = candidate;
        Ok(())
    }

    fn write_lock(&self) -> Result<std::sync::RwLockWriteGuard<'_, BlendConfig>, TradeblendError> {
        self.config
            .write()
            .map_err(|_| TradeblendError::Configuration("Config lock poisoned".to_string()))
    }
}
