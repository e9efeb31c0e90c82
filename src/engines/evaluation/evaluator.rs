use crate::error::Result;
use crate::types::{BlendedSignal, PriceSeries};

/// Score assigned to any candidate whose raw fitness is not finite.
///
/// Strictly below every finite score, including `-f64::MAX`, so a blend that
/// never traded cannot tie or outrank one that did. Displays as `-inf`.
pub const FITNESS_SENTINEL: f64 = f64::NEG_INFINITY;

/// Map a raw evaluator score to a comparable fitness.
pub fn sanitize_fitness(raw: f64) -> f64 {
    if raw.is_finite() {
        raw
    } else {
        FITNESS_SENTINEL
    }
}

/// Deserialize a fitness written by `serde_json`, which stores non-finite
/// numbers as `null`.
pub fn deserialize_fitness<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<f64> = serde::Deserialize::deserialize(deserializer)?;
    Ok(value.map_or(FITNESS_SENTINEL, sanitize_fitness))
}

/// Turns a blended signal into a scored simulation.
///
/// The optimizer treats `Handle` as opaque: it stores it, clones it with its
/// candidate, and only ever passes it back to [`FitnessEvaluator::score`].
/// `Config` is handed through unchanged on every call.
pub trait FitnessEvaluator: Send + Sync {
    type Config: Clone + Send + Sync;
    type Handle: Clone + Send + Sync;

    /// Simulate `signal` against `prices`.
    ///
    /// Must fail with `TradeblendError::Evaluation` when the signal cannot be
    /// simulated, rather than returning a placeholder handle.
    fn evaluate(
        &self,
        prices: &PriceSeries,
        signal: &BlendedSignal,
        config: &Self::Config,
    ) -> Result<Self::Handle>;

    /// Raw fitness of a simulation. May be non-finite.
    fn score(&self, handle: &Self::Handle) -> f64;
}
