use crate::error::{Result, TradeblendError};
use crate::types::WeightVector;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Default lower bound for every mutated weight.
pub const DEFAULT_WEIGHT_FLOOR: f64 = 0.01;

/// Produce the next weight vector.
///
/// With no current vector the uniform seed `1 / length` is returned. Otherwise
/// every element receives independent `N(0, mutation_rate)` noise, is clipped to
/// `floor`, and the vector is renormalized so it sums to 1 with every element
/// still at or above `floor`. A non-positive rate skips the noise.
pub fn generate_weights<R: Rng + ?Sized>(
    current: Option<&WeightVector>,
    length: usize,
    mutation_rate: f64,
    floor: f64,
    rng: &mut R,
) -> Result<WeightVector> {
    let current = match current {
        None => return WeightVector::uniform(length),
        Some(current) => current,
    };

    if current.len() != length {
        return Err(TradeblendError::InputShape(format!(
            "Expected {} weights, current vector has {}",
            length,
            current.len()
        )));
    }
    check_floor(floor, length)?;

    let mut mutated: Vec<f64> = current.as_slice().to_vec();
    if mutation_rate > 0.0 {
        let noise = Normal::new(0.0, mutation_rate).map_err(|e| {
            TradeblendError::Configuration(format!("Invalid mutation rate {}: {}", mutation_rate, e))
        })?;
        for w in mutated.iter_mut() {
            *w += noise.sample(rng);
        }
    }

    for w in mutated.iter_mut() {
        if w.is_nan() || *w < floor {
            *w = floor;
        }
    }

    Ok(WeightVector::from_normalized(renormalize_above_floor(mutated, floor)))
}

/// Map clipped weights back onto the simplex without pushing any below `floor`.
///
/// The mass above the floor is rescaled to `1 - n * floor`, so a vector that is
/// already a valid simplex point is returned unchanged.
fn renormalize_above_floor(clipped: Vec<f64>, floor: f64) -> Vec<f64> {
    let n = clipped.len() as f64;
    let excess: f64 = clipped.iter().map(|w| w - floor).sum();
    if excess <= 0.0 || !excess.is_finite() {
        return vec![1.0 / n; clipped.len()];
    }
    let free_mass = (1.0 - n * floor).max(0.0);
    clipped
        .into_iter()
        .map(|w| floor + free_mass * (w - floor) / excess)
        .collect()
}

/// Reject floors that would allow a zero weight or cannot fit `length` sources.
pub(crate) fn check_floor(floor: f64, length: usize) -> Result<()> {
    if length == 0 {
        return Err(TradeblendError::InputShape(
            "Cannot mutate an empty weight vector".to_string(),
        ));
    }
    if !(floor.is_finite() && floor > 0.0) {
        return Err(TradeblendError::Configuration(format!(
            "Weight floor must be a positive number, got {}",
            floor
        )));
    }
    if floor * length as f64 > 1.0 + 1e-12 {
        return Err(TradeblendError::Configuration(format!(
            "Weight floor {} is too large for {} sources",
            floor, length
        )));
    }
    Ok(())
}
