use crate::engines::evaluation::deserialize_fitness;
use crate::types::WeightVector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Best candidate at one generation boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// 1-based evolve-step count at the boundary
    pub step: usize,
    #[serde(deserialize_with = "deserialize_fitness")]
    pub best_fitness: f64,
    pub weights: WeightVector,
}

/// `<step>,<best_fitness>,<w1>,...,<wN>`, no trailing newline.
impl fmt::Display for GenerationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.step, self.best_fitness, self.weights)
    }
}

/// Append-only destination for generation records.
pub trait LogSink {
    fn append(&mut self, record: &GenerationRecord) -> io::Result<()>;
}

/// CSV-style results file, opened in append mode for each record.
///
/// The handle lives only for the duration of one write, so a failure on one
/// record leaves earlier lines intact. Each line is formatted in full before
/// the file is opened and goes out in a single `write_all`; an I/O error part
/// way through that write can still leave a torn final line.
#[derive(Debug, Clone)]
pub struct ResultsLog {
    path: PathBuf,
}

impl ResultsLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for ResultsLog {
    fn append(&mut self, record: &GenerationRecord) -> io::Result<()> {
        let line = format!("{}\n", record);
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.flush()
    }
}

/// In-memory sink, one string per line.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    pub lines: Vec<String>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogSink for MemoryLog {
    fn append(&mut self, record: &GenerationRecord) -> io::Result<()> {
        self.lines.push(record.to_string());
        Ok(())
    }
}
