use crate::types::WeightVector;
use std::sync::mpsc::Sender;

pub trait ProgressCallback {
    /// Called before the step runs, with the mutation rate it will use.
    fn on_step(&mut self, step: usize, temperature: f64);
    fn on_generation_complete(&mut self, step: usize, best_fitness: f64, best_weights: &WeightVector);
}

pub struct SilentProgress;

impl ProgressCallback for SilentProgress {
    fn on_step(&mut self, _step: usize, _temperature: f64) {}

    fn on_generation_complete(&mut self, _step: usize, _best_fitness: f64, _best_weights: &WeightVector) {}
}

pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_step(&mut self, step: usize, temperature: f64) {
        log::debug!("Step {} at temperature {:.6}", step, temperature);
    }

    fn on_generation_complete(&mut self, step: usize, best_fitness: f64, best_weights: &WeightVector) {
        log::info!(
            "Generation closed at step {}. Best fitness: {:.4}, weights: [{}]",
            step,
            best_fitness,
            best_weights
        );
    }
}

// For reporting from a worker thread
pub struct ChannelProgressCallback {
    sender: Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    Step { step: usize, temperature: f64 },
    GenerationComplete { step: usize, best_fitness: f64, best_weights: WeightVector },
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_step(&mut self, step: usize, temperature: f64) {
        let _ = self.sender.send(ProgressMessage::Step { step, temperature });
    }

    fn on_generation_complete(&mut self, step: usize, best_fitness: f64, best_weights: &WeightVector) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete {
            step,
            best_fitness,
            best_weights: best_weights.clone(),
        });
    }
}
