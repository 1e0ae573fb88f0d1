//! Run reports.
//!
//! The engine does not write anything itself. After a run, a [`RunReport`]
//! wraps the [`EvolutionResult`], which carries the configuration it was
//! produced with, and a [`Reporter`] persists it. Two reporters are provided: [`TextReporter`] renders to any
//! [`io::Write`], [`FileReporter`] writes a timestamped file per run.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use log::info;

use crate::error::Result;
use crate::evolution::{Cost, EvolutionResult};

const SECTION_RULE: &str = "######################";

/// Everything a reporter receives about a finished run.
#[derive(Debug, Clone, Copy)]
pub struct RunReport<'a, G, C> {
    /// The finished run.
    pub result: &'a EvolutionResult<G, C>,
}

impl<'a, G, C> RunReport<'a, G, C> {
    /// Reports `result` under the configuration stored in it.
    pub fn new(result: &'a EvolutionResult<G, C>) -> Self {
        Self { result }
    }
}

impl<G: fmt::Debug, C: Cost> fmt::Display for RunReport<'_, G, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        let config = &result.config;

        writeln!(f, "Population size: {}", config.population_size)?;
        writeln!(f, "Probability of crossover: {}", config.crossover_rate)?;
        writeln!(f, "Probability of mutation: {}", config.mutation_rate)?;
        writeln!(f, "Seed: {}", config.seed)?;
        writeln!(f, "Stop criterion: {}", config.stop.name())?;
        writeln!(f, "Stop criterion value: {}", config.stop.value())?;
        writeln!(f, "Rounds: {}", result.rounds)?;
        writeln!(f, "Mutations: {}", result.mutations)?;
        if result.cancelled {
            writeln!(f, "Cancelled: yes")?;
        }
        writeln!(f)?;

        writeln!(f, "Cost of best candidate: {}", result.best_cost)?;
        for (i, gene) in result.best.genes().iter().enumerate() {
            writeln!(f, "{}: {:?}", i + 1, gene)?;
        }
        writeln!(f)?;

        writeln!(f, "{SECTION_RULE} Details of each round {SECTION_RULE}")?;
        for record in &result.trajectory {
            writeln!(
                f,
                "Round {}: best cost {}, candidate {:?}",
                record.round,
                record.best_cost,
                record.best.genes()
            )?;
        }
        Ok(())
    }
}

/// Persists the outcome of a run.
pub trait Reporter<G, C> {
    /// Writes one report.
    fn report(&mut self, report: &RunReport<'_, G, C>) -> Result<()>;
}

/// Renders the human-readable report into a writer.
///
/// # Examples
///
/// ```ignore
/// let mut reporter = TextReporter::new(Vec::new());
/// reporter.report(&RunReport::new(&result))?;
/// let text = String::from_utf8(reporter.into_inner()).unwrap();
/// ```
#[derive(Debug)]
pub struct TextReporter<W> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    /// Wraps a writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<G: fmt::Debug, C: Cost, W: Write> Reporter<G, C> for TextReporter<W> {
    fn report(&mut self, report: &RunReport<'_, G, C>) -> Result<()> {
        write!(self.out, "{report}")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Writes each report to `result_<YYYYmmdd-HHMMSS>.txt` inside a directory.
///
/// The directory is created on first use. When a file with the same
/// timestamp already exists, a numeric suffix is appended instead of
/// overwriting it.
#[derive(Debug, Clone)]
pub struct FileReporter {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl FileReporter {
    /// Reporter writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths of the files written so far, oldest first.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn create_file(&self) -> io::Result<(PathBuf, File)> {
        fs::create_dir_all(&self.dir)?;
        let stamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
        let mut suffix = 0usize;
        loop {
            let name = if suffix == 0 {
                format!("result_{stamp}.txt")
            } else {
                format!("result_{stamp}_{suffix}.txt")
            };
            let path = self.dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => suffix += 1,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<G: fmt::Debug, C: Cost> Reporter<G, C> for FileReporter {
    fn report(&mut self, report: &RunReport<'_, G, C>) -> Result<()> {
        let (path, file) = self.create_file()?;
        let mut out = io::BufWriter::new(file);
        write!(out, "{report}")?;
        out.flush()?;
        info!("run report written to {}", path.display());
        self.written.push(path);
        Ok(())
    }
}
