pub mod manager;
pub mod optimizer;
pub mod simulation;
pub mod traits;

pub use manager::{BlendConfig, ConfigManager};
pub use optimizer::{AcceptancePolicy, OptimizerConfig};
pub use simulation::{FitnessMetric, SimulationConfig};
pub use traits::ConfigSection;
