pub mod frame;

pub use frame::{prices_from_frame, signals_from_frame};
