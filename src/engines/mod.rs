pub mod blending;
pub mod evaluation;
pub mod evolution;
pub mod metrics;
