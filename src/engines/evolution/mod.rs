pub mod candidate;
pub mod context;
pub mod population;
pub mod progress;
pub mod results_log;
pub mod schedule;

pub use candidate::Candidate;
pub use context::EvaluationContext;
pub use population::{LogFailure, Population, RunSummary};
pub use progress::{
    ChannelProgressCallback, ConsoleProgressCallback, ProgressCallback, ProgressMessage, SilentProgress,
};
pub use results_log::{GenerationRecord, LogSink, MemoryLog, ResultsLog};
pub use schedule::AnnealingSchedule;
