pub mod blender;
pub mod mutator;

pub use blender::{blend, blend_signals};
pub use mutator::{generate_weights, DEFAULT_WEIGHT_FLOOR};
