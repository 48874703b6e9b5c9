//! Stencil programs: grid generator, printer, serial and parallel
//! smoothers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use blockgrid_engine::{Checkpoint, Coordinator, RunConfig};
use blockgrid_io::{open_stacked, read_grid2d, write_grid2d};
use blockgrid_kernels::{serial, stencil_initial, NinePointStencil};
use clap::Parser;
use tracing::warn;

use crate::args::positive;
use crate::report::{file_size, TimingReport, RULE};

/// Open the stacked checkpoint file, or warn and run without one.
fn open_checkpoint(path: &Path) -> Option<Checkpoint<BufWriter<File>>> {
    match Checkpoint::open(path) {
        Ok(checkpoint) => Some(checkpoint),
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "cannot open stacked file; continuing without it"
            );
            None
        }
    }
}

// ── make-2d ─────────────────────────────────────────────────────

/// Write a stencil starting grid: side columns 1, everything else 0.
#[derive(Parser, Debug)]
#[command(name = "make-2d", version, about)]
pub struct Make2d {
    /// Row count (at least 3).
    #[arg(value_name = "ROWS", value_parser = positive)]
    pub rows: usize,
    /// Column count (at least 3).
    #[arg(value_name = "COLS", value_parser = positive)]
    pub cols: usize,
    /// Output grid file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

impl Make2d {
    /// Generate and write the grid.
    pub fn run(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        let grid = stencil_initial(self.rows, self.cols)?;
        write_grid2d(&self.file, &grid)
            .with_context(|| format!("cannot write grid to '{}'", self.file.display()))?;
        writeln!(
            out,
            "Wrote matrix A[{}x{}] --- {}",
            self.rows,
            self.cols,
            file_size(&self.file)?
        )?;
        Ok(())
    }
}

// ── print-2d ────────────────────────────────────────────────────

/// Print a 2-D grid, or every frame of a stacked file.
#[derive(Parser, Debug)]
#[command(name = "print-2d", version, about)]
pub struct Print2d {
    /// Grid file, or stacked file with `--stacked`.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    /// Treat FILE as a stacked checkpoint of ROWS x COLS frames.
    #[arg(long, num_args = 2, value_names = ["ROWS", "COLS"], value_parser = positive)]
    pub stacked: Option<Vec<usize>>,
}

impl Print2d {
    /// Read and print.
    pub fn run(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        writeln!(out, "Reading data from '{}'", self.file.display())?;
        let Some(dims) = &self.stacked else {
            let grid = read_grid2d(&self.file)
                .with_context(|| format!("cannot read grid from '{}'", self.file.display()))?;
            write!(out, "{grid}")?;
            return Ok(());
        };
        let &[rows, cols] = dims.as_slice() else {
            bail!("--stacked takes exactly ROWS and COLS");
        };

        let mut reader = open_stacked::<f64>(&self.file, rows, cols)
            .with_context(|| format!("cannot open '{}'", self.file.display()))?;
        for (k, frame) in reader.frames().enumerate() {
            let frame = frame.with_context(|| format!("bad frame {k} in '{}'", self.file.display()))?;
            writeln!(out, "{RULE}")?;
            writeln!(out, "frame {k}")?;
            write!(out, "{frame}")?;
        }
        Ok(())
    }
}

// ── stencil-2d ──────────────────────────────────────────────────

/// Serial 9-point stencil, recording every step to a stacked file.
#[derive(Parser, Debug)]
#[command(name = "stencil-2d", version, about)]
pub struct Stencil2d {
    /// Number of stencil iterations.
    #[arg(value_name = "ITERS", value_parser = positive)]
    pub iterations: usize,
    /// Input grid file.
    #[arg(value_name = "IN")]
    pub input: PathBuf,
    /// Output grid file.
    #[arg(value_name = "OUT")]
    pub output: PathBuf,
    /// Stacked file receiving the initial grid and every step.
    #[arg(value_name = "ALL_FILE")]
    pub all_file: PathBuf,
}

impl Stencil2d {
    /// Run and write the results.
    pub fn run(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        let started = Instant::now();
        let grid = read_grid2d(&self.input)
            .with_context(|| format!("cannot read grid from '{}'", self.input.display()))?;
        let rows = grid.rows();

        let mut checkpoint = open_checkpoint(&self.all_file);
        if let Some(cp) = checkpoint.as_mut() {
            cp.append(&grid, rows);
        }

        writeln!(out, "Running {} serial stencil iterations...", self.iterations)?;
        let mut io = Duration::ZERO;
        let sweep = Instant::now();
        let result = serial::stencil(grid, self.iterations, |_, g| {
            if let Some(cp) = checkpoint.as_mut() {
                let t = Instant::now();
                cp.append(g, rows);
                io += t.elapsed();
            }
        });
        let compute = sweep.elapsed().saturating_sub(io);
        let report = checkpoint.map(Checkpoint::close);

        write_grid2d(&self.output, &result)
            .with_context(|| format!("cannot write grid to '{}'", self.output.display()))?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "Wrote final matrix state: {}", file_size(&self.output)?)?;
        if report.as_ref().is_some_and(|r| r.is_complete()) {
            writeln!(out, "{RULE}")?;
            writeln!(
                out,
                "Wrote initial matrix state + {} iterations: {}",
                self.iterations,
                file_size(&self.all_file)?
            )?;
        }

        write!(
            out,
            "{}",
            TimingReport {
                overall: started.elapsed(),
                compute,
            }
        )?;
        Ok(())
    }
}

// ── pth-stencil-2d ──────────────────────────────────────────────

/// Parallel 9-point stencil through the worker pool.
#[derive(Parser, Debug)]
#[command(name = "pth-stencil-2d", version, about)]
pub struct PthStencil2d {
    /// Number of stencil iterations.
    #[arg(value_name = "ITERS", value_parser = positive)]
    pub iterations: usize,
    /// Input grid file.
    #[arg(value_name = "IN")]
    pub input: PathBuf,
    /// Output grid file.
    #[arg(value_name = "OUT")]
    pub output: PathBuf,
    /// 0 quiet, 1 progress and file sizes, 2 also dump the grid each step.
    #[arg(value_name = "DEBUG", value_parser = clap::value_parser!(u8).range(0..=2))]
    pub debug: u8,
    /// Worker threads.
    #[arg(value_name = "THREADS", value_parser = positive)]
    pub threads: usize,
    /// Optional stacked file receiving the initial grid and every step.
    #[arg(value_name = "ALL_FILE")]
    pub all_file: Option<PathBuf>,
}

impl PthStencil2d {
    /// Run and write the results.
    pub fn run(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        let started = Instant::now();
        let grid = read_grid2d(&self.input)
            .with_context(|| format!("cannot read grid from '{}'", self.input.display()))?;

        let config = RunConfig::new(self.threads, self.iterations).with_debug_dump(self.debug >= 2);
        if self.debug > 0 {
            writeln!(out, "Running {} parallel stencil iterations...", self.iterations)?;
        }

        let coordinator = Coordinator::new();
        let checkpoint = self.all_file.as_deref().and_then(open_checkpoint);
        let output = match checkpoint {
            Some(checkpoint) => {
                coordinator.run_with_checkpoint(grid, &config, &NinePointStencil, checkpoint)
            }
            None => coordinator.run(grid, &config, &NinePointStencil),
        }
        .context("parallel stencil failed")?
        .require_complete()?;

        write_grid2d(&self.output, &output.grid)
            .with_context(|| format!("cannot write grid to '{}'", self.output.display()))?;

        if self.debug > 0 {
            writeln!(out, "{RULE}")?;
            writeln!(out, "Wrote final matrix state: {}", file_size(&self.output)?)?;
            if let (Some(path), Some(report)) = (&self.all_file, &output.checkpoint) {
                if report.is_complete() {
                    writeln!(out, "{RULE}")?;
                    writeln!(
                        out,
                        "Wrote initial matrix state + {} iterations: {}",
                        self.iterations,
                        file_size(path)?
                    )?;
                }
            }
        }

        write!(
            out,
            "{}",
            TimingReport {
                overall: started.elapsed(),
                compute: output.metrics.compute,
            }
        )?;
        Ok(())
    }
}
