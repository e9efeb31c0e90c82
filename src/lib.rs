//! Evolve linear blends of binary trading signals.
//!
//! A [`Population`](engines::evolution::Population) of weight vectors is
//! mutated every step, each candidate keeping its trial only when the
//! [`FitnessEvaluator`](engines::evaluation::FitnessEvaluator) scores it at
//! least as well. Every `generation_size` steps the population collapses onto
//! its best member and the mutation rate decays.

pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod types;

pub use error::{Result, TradeblendError};
