use crate::error::{Result, TradeblendError};
use crate::types::{check_alignment, BlendedSignal, SignalSet, WeightVector};

/// Blend N entry/exit series into one pair by weighted vote.
///
/// At each bar the weighted average of the sources is compared against the
/// threshold; a bar fires when the average is strictly above it. Weights are
/// normalized here, so any non-negative vector with a positive sum is accepted.
pub fn blend_signals(
    entries: &[Vec<bool>],
    exits: &[Vec<bool>],
    weights: &[f64],
    entry_threshold: f64,
    exit_threshold: f64,
) -> Result<BlendedSignal> {
    let len = check_alignment(entries, exits)?;

    if weights.len() != entries.len() {
        return Err(TradeblendError::InputShape(format!(
            "Got {} weights for {} signal sources",
            weights.len(),
            entries.len()
        )));
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(TradeblendError::InputShape(
            "Weights must be finite and non-negative".to_string(),
        ));
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(TradeblendError::InputShape(
            "Weights must have a positive sum".to_string(),
        ));
    }

    Ok(BlendedSignal {
        entries: vote(entries, weights, total, len, entry_threshold),
        exits: vote(exits, weights, total, len, exit_threshold),
    })
}

/// `blend_signals` over a validated `SignalSet`.
pub fn blend(
    signals: &SignalSet,
    weights: &WeightVector,
    entry_threshold: f64,
    exit_threshold: f64,
) -> Result<BlendedSignal> {
    blend_signals(
        signals.entries(),
        signals.exits(),
        weights.as_slice(),
        entry_threshold,
        exit_threshold,
    )
}

fn vote(series: &[Vec<bool>], weights: &[f64], total: f64, len: usize, threshold: f64) -> Vec<bool> {
    (0..len)
        .map(|t| {
            let score: f64 = series
                .iter()
                .zip(weights)
                .filter(|(s, _)| s[t])
                .map(|(_, w)| *w)
                .sum();
            score / total > threshold
        })
        .collect()
}
