pub mod evaluator;
pub mod portfolio;
pub mod simulator;

pub use evaluator::{deserialize_fitness, sanitize_fitness, FitnessEvaluator, FITNESS_SENTINEL};
pub use portfolio::Portfolio;
pub use simulator::PortfolioEvaluator;
