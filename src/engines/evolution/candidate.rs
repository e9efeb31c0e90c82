use crate::engines::blending::{blend, generate_weights};
use crate::engines::evaluation::{sanitize_fitness, FitnessEvaluator};
use crate::engines::evolution::EvaluationContext;
use crate::error::Result;
use crate::types::{BlendedSignal, WeightVector};
use rand::Rng;
use std::sync::Arc;

/// One weight vector together with everything derived from it.
pub struct Candidate<E: FitnessEvaluator> {
    context: Arc<EvaluationContext<E>>,
    weights: WeightVector,
    signal: BlendedSignal,
    handle: E::Handle,
    fitness: f64,
}

impl<E: FitnessEvaluator> Candidate<E> {
    /// Blend and evaluate `weights` once.
    pub fn new(context: Arc<EvaluationContext<E>>, weights: WeightVector) -> Result<Self> {
        let (signal, handle, fitness) = Self::assess(&context, &weights)?;
        Ok(Self {
            context,
            weights,
            signal,
            handle,
            fitness,
        })
    }

    /// Try one mutation at `mutation_rate` and keep it if the acceptance policy
    /// allows. Returns whether the trial was accepted.
    pub fn evolve<R: Rng + ?Sized>(&mut self, mutation_rate: f64, rng: &mut R) -> Result<bool> {
        let trial_weights = generate_weights(
            Some(&self.weights),
            self.weights.len(),
            mutation_rate,
            self.context.weight_floor,
            rng,
        )?;
        let (signal, handle, fitness) = Self::assess(&self.context, &trial_weights)?;

        if !self.context.acceptance.accepts(fitness, self.fitness) {
            return Ok(false);
        }

        log::trace!("Accepted trial: fitness {} -> {}", self.fitness, fitness);
        self.weights = trial_weights;
        self.signal = signal;
        self.handle = handle;
        self.fitness = fitness;
        Ok(true)
    }

    fn assess(
        context: &EvaluationContext<E>,
        weights: &WeightVector,
    ) -> Result<(BlendedSignal, E::Handle, f64)> {
        let signal = blend(
            &context.signals,
            weights,
            context.entry_threshold,
            context.exit_threshold,
        )?;
        let handle = context
            .evaluator
            .evaluate(&context.prices, &signal, &context.evaluator_config)?;
        let fitness = sanitize_fitness(context.evaluator.score(&handle));
        Ok((signal, handle, fitness))
    }

    /// Cached fitness, never recomputed.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    pub fn signal(&self) -> &BlendedSignal {
        &self.signal
    }

    pub fn handle(&self) -> &E::Handle {
        &self.handle
    }
}

/// Owned state is copied; only the read-only context is shared.
impl<E: FitnessEvaluator> Clone for Candidate<E> {
    fn clone(&self) -> Self {
        Self {
            context: Arc::clone(&self.context),
            weights: self.weights.clone(),
            signal: self.signal.clone(),
            handle: self.handle.clone(),
            fitness: self.fitness,
        }
    }
}
