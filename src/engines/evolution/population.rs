use crate::config::{ConfigSection, OptimizerConfig};
use crate::engines::blending::mutator::check_floor;
use crate::engines::evaluation::{deserialize_fitness, FitnessEvaluator};
use crate::engines::evolution::{
    AnnealingSchedule, Candidate, EvaluationContext, GenerationRecord, LogSink, ProgressCallback,
};
use crate::error::{Result, TradeblendError};
use crate::types::WeightVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// A results-log write that failed during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogFailure {
    pub step: usize,
    pub message: String,
}

/// Outcome of `Population::run`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub steps: usize,
    pub generations: usize,
    pub final_temperature: f64,
    #[serde(deserialize_with = "deserialize_fitness")]
    pub best_fitness: f64,
    pub best_weights: WeightVector,
    pub log_failures: Vec<LogFailure>,
}

impl RunSummary {
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Fixed-size set of candidates evolved in lockstep.
pub struct Population<E: FitnessEvaluator> {
    context: Arc<EvaluationContext<E>>,
    candidates: Vec<Candidate<E>>,
    rng: StdRng,
    parallel: bool,
}

impl<E: FitnessEvaluator> Population<E> {
    /// Build `count` candidates, each evaluated independently from `initial_weights`.
    ///
    /// `seed` fixes every mutation drawn during the run; `None` seeds from entropy.
    pub fn new(
        context: Arc<EvaluationContext<E>>,
        initial_weights: WeightVector,
        count: usize,
        seed: Option<u64>,
    ) -> Result<Self> {
        if count == 0 {
            return Err(TradeblendError::Configuration(
                "Population needs at least one candidate".to_string(),
            ));
        }
        if initial_weights.len() != context.num_sources() {
            return Err(TradeblendError::InputShape(format!(
                "Got {} initial weights for {} signal sources",
                initial_weights.len(),
                context.num_sources()
            )));
        }
        check_floor(context.weight_floor, context.num_sources())?;

        let candidates = (0..count)
            .map(|_| Candidate::new(Arc::clone(&context), initial_weights.clone()))
            .collect::<Result<Vec<_>>>()?;

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            context,
            candidates,
            rng,
            parallel: false,
        })
    }

    /// Validate `config` and build a population from it.
    pub fn from_config(
        context: Arc<EvaluationContext<E>>,
        initial_weights: WeightVector,
        config: &OptimizerConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(context, initial_weights, config.population_size, config.seed)?
            .with_parallel(config.parallel))
    }

    /// Evaluate each generation on the rayon pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Evolve every candidate once at `mutation_rate`. Returns the number of
    /// accepted trials.
    ///
    /// Each candidate draws from its own generator, seeded from the population
    /// generator in candidate order, so serial and parallel runs agree.
    pub fn evolve_generation(&mut self, mutation_rate: f64) -> Result<usize> {
        let seeds: Vec<u64> = (0..self.candidates.len()).map(|_| self.rng.gen()).collect();

        let accepted: Vec<bool> = if self.parallel {
            self.candidates
                .par_iter_mut()
                .zip(seeds.par_iter())
                .map(|(candidate, seed)| {
                    candidate.evolve(mutation_rate, &mut StdRng::seed_from_u64(*seed))
                })
                .collect::<Result<Vec<_>>>()?
        } else {
            self.candidates
                .iter_mut()
                .zip(seeds.iter())
                .map(|(candidate, seed)| {
                    candidate.evolve(mutation_rate, &mut StdRng::seed_from_u64(*seed))
                })
                .collect::<Result<Vec<_>>>()?
        };

        Ok(accepted.into_iter().filter(|a| *a).count())
    }

    /// Candidate with the highest cached fitness; the first one wins ties.
    pub fn select_best(&self) -> &Candidate<E> {
        let mut best = &self.candidates[0];
        for candidate in &self.candidates[1..] {
            if candidate.fitness() > best.fitness() {
                best = candidate;
            }
        }
        best
    }

    /// Replace every member with an independent copy of the best.
    pub fn collapse_to_best(&mut self) {
        let best = self.select_best().clone();
        self.candidates = vec![best; self.candidates.len()];
    }

    /// Run the annealed evolve/collapse loop for `schedule.n_steps` steps.
    ///
    /// At every generation boundary the temperature decays, the population
    /// collapses onto its best member, and a record goes to `log_sink`. Sink
    /// failures are logged and collected in the summary; they do not stop the run.
    pub fn run<C: ProgressCallback>(
        &mut self,
        schedule: &AnnealingSchedule,
        mut log_sink: Option<&mut dyn LogSink>,
        progress: &mut C,
    ) -> Result<RunSummary> {
        schedule.validate()?;

        let mut temperature = schedule.initial_temperature;
        let mut generations = 0;
        let mut log_failures = Vec::new();

        log::info!(
            "Starting run: {} candidates, {} sources, {} steps, generation size {}",
            self.candidates.len(),
            self.context.num_sources(),
            schedule.n_steps,
            schedule.generation_size
        );

        for step in 1..=schedule.n_steps {
            progress.on_step(step, temperature);
            let accepted = self.evolve_generation(temperature)?;
            log::debug!(
                "Step {}: accepted {}/{} trials at temperature {}",
                step,
                accepted,
                self.candidates.len(),
                temperature
            );

            if !schedule.is_boundary(step) {
                continue;
            }

            temperature *= schedule.decay;
            self.collapse_to_best();
            generations += 1;

            let best = self.select_best();
            let record = GenerationRecord {
                step,
                best_fitness: best.fitness(),
                weights: best.weights().clone(),
            };
            progress.on_generation_complete(step, record.best_fitness, &record.weights);

            if let Some(sink) = log_sink.as_deref_mut() {
                if let Err(e) = sink.append(&record) {
                    log::warn!("Failed to append results for step {}: {}", step, e);
                    log_failures.push(LogFailure {
                        step,
                        message: e.to_string(),
                    });
                }
            }
        }

        let best = self.select_best();
        Ok(RunSummary {
            steps: schedule.n_steps,
            generations,
            final_temperature: temperature,
            best_fitness: best.fitness(),
            best_weights: best.weights().clone(),
            log_failures,
        })
    }

    pub fn candidates(&self) -> &[Candidate<E>] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
