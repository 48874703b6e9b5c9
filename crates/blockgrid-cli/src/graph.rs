//! Shortest-path programs: graph generators, printer, serial and
//! parallel solvers.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use blockgrid_engine::{Coordinator, RunConfig};
use blockgrid_io::{read_graph, write_graph};
use blockgrid_kernels::{random_graph, reference_graph, serial, PairwiseRelaxation, DEFAULT_SEED};
use clap::Parser;
use tracing::info;

use crate::args::{positive, probability};
use crate::report::TimingReport;

// ── make-graph ──────────────────────────────────────────────────

/// Write a random weighted adjacency matrix.
#[derive(Parser, Debug)]
#[command(name = "make-graph", version, about)]
pub struct MakeGraph {
    /// Number of nodes.
    #[arg(value_name = "N", value_parser = positive)]
    pub nodes: usize,
    /// Output graph file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    /// Probability that an edge exists.
    #[arg(value_name = "P", value_parser = probability)]
    pub probability: f64,
    /// Smallest edge weight.
    #[arg(value_name = "L", value_parser = clap::value_parser!(i32).range(1..))]
    pub lo: i32,
    /// Largest edge weight.
    #[arg(value_name = "U", value_parser = clap::value_parser!(i32).range(1..))]
    pub hi: i32,
    /// Random seed.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

impl MakeGraph {
    /// Generate and write the graph.
    pub fn run(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        let graph = random_graph(self.nodes, self.probability, self.lo, self.hi, self.seed)?;
        writeln!(
            out,
            "Writing random adjacency matrix A[{n}][{n}] to '{}'...",
            self.file.display(),
            n = self.nodes
        )?;
        write_graph(&self.file, &graph)
            .with_context(|| format!("cannot write graph to '{}'", self.file.display()))
    }
}

// ── make-graph-fixture ──────────────────────────────────────────

/// Write the six-node reference graph.
#[derive(Parser, Debug)]
#[command(name = "make-graph-fixture", version, about)]
pub struct MakeGraphFixture {
    /// Output graph file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

impl MakeGraphFixture {
    /// Write the fixture.
    pub fn run(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        let graph = reference_graph()?;
        writeln!(
            out,
            "Writing reference adjacency matrix A[{n}][{n}] to '{}'...",
            self.file.display(),
            n = graph.rows()
        )?;
        write_graph(&self.file, &graph)
            .with_context(|| format!("cannot write graph to '{}'", self.file.display()))
    }
}

// ── print-graph ─────────────────────────────────────────────────

/// Print an adjacency matrix, tab separated.
#[derive(Parser, Debug)]
#[command(name = "print-graph", version, about)]
pub struct PrintGraph {
    /// Graph file to print.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

impl PrintGraph {
    /// Read and print.
    pub fn run(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        writeln!(out, "Reading adjacency matrix from '{}'", self.file.display())?;
        let graph = read_graph(&self.file)
            .with_context(|| format!("cannot read graph from '{}'", self.file.display()))?;
        write!(out, "{graph}")?;
        Ok(())
    }
}

// ── floyds ──────────────────────────────────────────────────────

/// Serial all-pairs shortest paths.
#[derive(Parser, Debug)]
#[command(name = "floyds", version, about)]
pub struct Floyds {
    /// Input graph file.
    #[arg(value_name = "IN")]
    pub input: PathBuf,
    /// Output graph file.
    #[arg(value_name = "OUT")]
    pub output: PathBuf,
}

impl Floyds {
    /// Solve and write the distance matrix.
    pub fn run(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        let started = Instant::now();
        writeln!(out, "Reading adjacency matrix from '{}'", self.input.display())?;
        let mut graph = read_graph(&self.input)
            .with_context(|| format!("cannot read graph from '{}'", self.input.display()))?;

        writeln!(out, "Running floyds algorithm in serial...")?;
        let sweep = Instant::now();
        serial::shortest_paths(&mut graph).context("shortest-path relaxation failed")?;
        let compute = sweep.elapsed();

        let n = graph.rows();
        writeln!(out, "Writing result matrix A[{n}x{n}] to '{}'", self.output.display())?;
        write_graph(&self.output, &graph)
            .with_context(|| format!("cannot write graph to '{}'", self.output.display()))?;

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

// ── pth-floyds ──────────────────────────────────────────────────

/// Parallel all-pairs shortest paths through the worker pool.
#[derive(Parser, Debug)]
#[command(name = "pth-floyds", version, about)]
pub struct PthFloyds {
    /// Input graph file.
    #[arg(value_name = "IN")]
    pub input: PathBuf,
    /// Output graph file.
    #[arg(value_name = "OUT")]
    pub output: PathBuf,
    /// Worker threads.
    #[arg(value_name = "THREADS", value_parser = positive)]
    pub threads: usize,
}

impl PthFloyds {
    /// Solve and write the distance matrix.
    pub fn run(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        let started = Instant::now();
        writeln!(out, "Reading adjacency matrix from '{}'", self.input.display())?;
        let graph = read_graph(&self.input)
            .with_context(|| format!("cannot read graph from '{}'", self.input.display()))?;
        let n = graph.rows();

        writeln!(out, "Running floyds algorithm with {} thread(s)...", self.threads)?;
        let config = RunConfig::new(self.threads, n);
        let output = Coordinator::new()
            .run(graph, &config, &PairwiseRelaxation)
            .context("parallel shortest paths failed")?
            .require_complete()?;
        info!(
            compute_ms = output.metrics.compute.as_millis() as u64,
            other_ms = output.metrics.other().as_millis() as u64,
            "solve finished"
        );

        writeln!(out, "Writing result matrix A[{n}x{n}] to '{}'", self.output.display())?;
        write_graph(&self.output, &output.grid)
            .with_context(|| format!("cannot write graph to '{}'", self.output.display()))?;

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
