//! Worker pool lifecycle: validate, spawn, join, aggregate.
//!
//! [`Coordinator`] owns everything a run touches. The grid pair and the
//! shared run state live on its stack frame; workers borrow them inside
//! a [`std::thread::scope`], so no worker can outlive the data it
//! references and the barrier is dropped only after every join.
//!
//! Threads are started through a [`ThreadLauncher`]. The default
//! [`OsThreads`] uses named OS threads; tests substitute launchers that
//! fail after a number of spawns to exercise partial-spawn cleanup.

use std::io::{self, Sink, Write};
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::Instant;

use blockgrid_core::{Cell, Grid};
use tracing::{debug, error, info};

use crate::buffer::SharedGrid;
use crate::checkpoint::Checkpoint;
use crate::config::RunConfig;
use crate::error::RunError;
use crate::kernel::RowKernel;
use crate::metrics::{RunMetrics, RunOutput, RunStatus};
use crate::worker::{RunShared, Worker, DUMP_TARGET};

/// Starts one worker thread inside a scope.
pub trait ThreadLauncher: Sync {
    /// Spawn `body` as worker `worker` on `scope`.
    fn launch<'scope, 'env, F, R>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        worker: usize,
        body: F,
    ) -> io::Result<ScopedJoinHandle<'scope, R>>
    where
        F: FnOnce() -> R + Send + 'scope,
        R: Send + 'scope;
}

/// Named OS threads via [`std::thread::Builder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OsThreads {
    /// Threads are named `{name_prefix}-{id}`.
    pub name_prefix: String,
    /// Stack size in bytes; `None` uses the platform default.
    pub stack_size: Option<usize>,
}

impl Default for OsThreads {
    fn default() -> Self {
        Self {
            name_prefix: "blockgrid-worker".to_string(),
            stack_size: None,
        }
    }
}

impl ThreadLauncher for OsThreads {
    fn launch<'scope, 'env, F, R>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        worker: usize,
        body: F,
    ) -> io::Result<ScopedJoinHandle<'scope, R>>
    where
        F: FnOnce() -> R + Send + 'scope,
        R: Send + 'scope,
    {
        let mut builder = thread::Builder::new().name(format!("{}-{worker}", self.name_prefix));
        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }
        builder.spawn_scoped(scope, body)
    }
}

/// Runs a kernel over a grid with a fixed pool of workers.
#[derive(Clone, Debug, Default)]
pub struct Coordinator<L = OsThreads> {
    launcher: L,
}

impl Coordinator<OsThreads> {
    /// A coordinator using default-named OS threads.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: ThreadLauncher> Coordinator<L> {
    /// A coordinator using a custom launcher.
    pub fn with_launcher(launcher: L) -> Self {
        Self { launcher }
    }

    /// The launcher in use.
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Run `config.iterations` steps of `kernel` over `grid`.
    pub fn run<T, K>(&self, grid: Grid<T>, config: &RunConfig, kernel: &K) -> Result<RunOutput<T>, RunError>
    where
        T: Cell,
        K: RowKernel<T> + ?Sized,
    {
        self.execute::<T, K, Sink>(grid, config, kernel, None)
    }

    /// Like [`run`](Self::run), streaming the initial grid and every
    /// step's result to `checkpoint`.
    pub fn run_with_checkpoint<T, K, W>(
        &self,
        grid: Grid<T>,
        config: &RunConfig,
        kernel: &K,
        checkpoint: Checkpoint<W>,
    ) -> Result<RunOutput<T>, RunError>
    where
        T: Cell,
        K: RowKernel<T> + ?Sized,
        W: Write + Send,
    {
        self.execute(grid, config, kernel, Some(checkpoint))
    }

    fn execute<T, K, W>(
        &self,
        grid: Grid<T>,
        config: &RunConfig,
        kernel: &K,
        mut checkpoint: Option<Checkpoint<W>>,
    ) -> Result<RunOutput<T>, RunError>
    where
        T: Cell,
        K: RowKernel<T> + ?Sized,
        W: Write + Send,
    {
        let layout = kernel.layout();
        let blocks = config.plan(&grid, &layout)?;
        let workers = blocks.len();
        info!(
            kernel = kernel.name(),
            rows = grid.rows(),
            cols = grid.cols(),
            workers,
            iterations = config.iterations,
            "starting run"
        );
        for (id, block) in blocks.iter().enumerate() {
            debug!(worker = id, start = block.start, count = block.count, "row block");
        }

        let wall = Instant::now();
        if let Some(cp) = checkpoint.as_mut() {
            cp.append(&grid, grid.rows());
        }
        if config.debug_dump {
            debug!(target: DUMP_TARGET, "initial grid:\n{grid}");
        }

        let shared_grid = SharedGrid::new(grid, layout, &blocks);
        let shared = RunShared::new(workers, config.iterations, config.debug_dump);

        let (mut reports, panicked, spawn_failure) = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            let mut spawn_failure = None;
            for (id, &rows) in blocks.iter().enumerate() {
                let cp = if id == 0 { checkpoint.take() } else { None };
                let worker = Worker::new(id, rows, &shared_grid, kernel, &shared, cp);
                match self.launcher.launch(scope, id, move || worker.run()) {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        error!(worker = id, requested = workers, error = %e, "failed to spawn worker");
                        shared.cancel();
                        spawn_failure = Some((id, e));
                        break;
                    }
                }
            }

            let mut reports = Vec::with_capacity(handles.len());
            let mut panicked = Vec::new();
            for (id, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(report) => reports.push(report),
                    Err(_) => {
                        error!(worker = id, "worker thread panicked");
                        panicked.push(id);
                    }
                }
            }
            (reports, panicked, spawn_failure)
        });

        if let Some((spawned, source)) = spawn_failure {
            return Err(RunError::Spawn {
                requested: workers,
                spawned,
                source,
            });
        }
        if !panicked.is_empty() {
            return Err(RunError::WorkerPanicked { workers: panicked });
        }

        let checkpoint = reports
            .first_mut()
            .and_then(|(_, cp)| cp.take())
            .map(Checkpoint::close);
        let reports = reports.into_iter().map(|(report, _)| report).collect();
        let metrics = RunMetrics::from_reports(reports, config.iterations, wall.elapsed());

        let status = match shared.take_failure() {
            Some(failure) => RunStatus::Interrupted {
                completed: metrics.iterations_completed,
                failure,
            },
            None => RunStatus::Completed,
        };
        drop(shared);

        match &status {
            RunStatus::Completed => info!(
                compute_secs = metrics.compute.as_secs_f64(),
                wall_secs = metrics.wall.as_secs_f64(),
                "run completed"
            ),
            RunStatus::Interrupted { completed, failure } => error!(
                completed,
                %failure,
                "run interrupted"
            ),
        }

        Ok(RunOutput {
            grid: shared_grid.into_grid()?,
            metrics,
            status,
            checkpoint,
        })
    }
}
