//! Fault injection for the worker pool.
//!
//! - [`FailAtWorker`]: a launcher whose `n`-th spawn fails.
//! - [`CountingLauncher`]: counts threads that started and finished.
//! - [`FailingWriter`]: a checkpoint sink that runs out of space.
//! - [`FailingKernel`] / [`PanickingKernel`]: kernels that fail at a
//!   chosen step in the block holding a chosen row.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{Scope, ScopedJoinHandle};

use blockgrid_engine::{
    BlockMut, KernelError, KernelLayout, OsThreads, RowKernel, RowSource, ThreadLauncher,
};

// ── Launchers ───────────────────────────────────────────────────

/// Counts launched and finished worker threads.
#[derive(Clone, Default)]
pub struct CountingLauncher {
    inner: OsThreads,
    launched: Arc<AtomicUsize>,
    finished: Arc<AtomicUsize>,
}

impl CountingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launched(&self) -> usize {
        self.launched.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

impl ThreadLauncher for CountingLauncher {
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
        let finished = Arc::clone(&self.finished);
        let handle = self.inner.launch(scope, worker, move || {
            let out = body();
            finished.fetch_add(1, Ordering::SeqCst);
            out
        })?;
        self.launched.fetch_add(1, Ordering::SeqCst);
        Ok(handle)
    }
}

/// Spawns workers normally until worker `fail_at`, whose spawn fails.
#[derive(Clone)]
pub struct FailAtWorker {
    pub fail_at: usize,
    pub counter: CountingLauncher,
}

impl FailAtWorker {
    pub fn new(fail_at: usize) -> Self {
        Self {
            fail_at,
            counter: CountingLauncher::new(),
        }
    }
}

impl ThreadLauncher for FailAtWorker {
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
        if worker == self.fail_at {
            return Err(io::Error::new(
                io::ErrorKind::WouldBlock,
                "simulated thread spawn failure",
            ));
        }
        self.counter.launch(scope, worker, body)
    }
}

// ── Writers ─────────────────────────────────────────────────────

/// Accepts `limit` bytes, then fails every write with `StorageFull`.
///
/// The accepted bytes stay visible through [`bytes`](Self::bytes) after
/// the writer has been moved into a checkpoint.
pub struct FailingWriter {
    limit: usize,
    buf: Arc<Mutex<Vec<u8>>>,
    failures: Arc<AtomicUsize>,
}

impl FailingWriter {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            buf: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fails on frame `n` (1-based) of `frame_bytes` bytes each.
    pub fn on_frame(n: usize, frame_bytes: usize) -> Self {
        Self::new((n - 1) * frame_bytes)
    }

    pub fn bytes(&self) -> Arc<Mutex<Vec<u8>>> {
        Arc::clone(&self.buf)
    }

    pub fn failures(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.failures)
    }
}

impl Write for FailingWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut buf = self.buf.lock().unwrap();
        if buf.len() + data.len() > self.limit {
            self.failures.fetch_add(1, Ordering::SeqCst);
            return Err(io::Error::new(io::ErrorKind::StorageFull, "simulated full disk"));
        }
        buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ── Kernels ─────────────────────────────────────────────────────

/// Wraps a kernel and returns [`KernelError::Failed`] at `step` in the
/// block that owns `row`.
pub struct FailingKernel<K> {
    pub inner: K,
    pub step: usize,
    pub row: usize,
}

impl<K> FailingKernel<K> {
    pub fn new(inner: K, step: usize, row: usize) -> Self {
        Self { inner, step, row }
    }
}

impl<T, K: RowKernel<T>> RowKernel<T> for FailingKernel<K> {
    fn name(&self) -> &str {
        "failing"
    }

    fn layout(&self) -> KernelLayout {
        self.inner.layout()
    }

    fn update(
        &self,
        src: &dyn RowSource<T>,
        dest: &mut BlockMut<'_, T>,
        step: usize,
    ) -> Result<(), KernelError> {
        if step == self.step && dest.range().contains(self.row) {
            return Err(KernelError::Failed {
                reason: format!("injected failure at step {step}"),
            });
        }
        self.inner.update(src, dest, step)
    }
}

/// Wraps a kernel and panics at `step` in the block that owns `row`.
pub struct PanickingKernel<K> {
    pub inner: K,
    pub step: usize,
    pub row: usize,
}

impl<K> PanickingKernel<K> {
    pub fn new(inner: K, step: usize, row: usize) -> Self {
        Self { inner, step, row }
    }
}

impl<T, K: RowKernel<T>> RowKernel<T> for PanickingKernel<K> {
    fn name(&self) -> &str {
        "panicking"
    }

    fn layout(&self) -> KernelLayout {
        self.inner.layout()
    }

    fn update(
        &self,
        src: &dyn RowSource<T>,
        dest: &mut BlockMut<'_, T>,
        step: usize,
    ) -> Result<(), KernelError> {
        if step == self.step && dest.range().contains(self.row) {
            panic!("injected panic at step {step}");
        }
        self.inner.update(src, dest, step)
    }
}
