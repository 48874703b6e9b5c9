//! Reusable phase barrier with failure propagation.
//!
//! [`PhaseBarrier`] behaves like [`std::sync::Barrier`] with two additions
//! the worker pool needs:
//!
//! - [`abort`](PhaseBarrier::abort) breaks the barrier permanently. Every
//!   current and future [`wait`](PhaseBarrier::wait) returns
//!   [`BarrierError::Broken`] instead of blocking, so a pool that lost a
//!   worker (spawn failure, kernel error, panic) never deadlocks.
//! - The last thread to arrive in each generation is reported as the
//!   leader, mirroring the "serial thread" result of POSIX barriers.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

/// Error returned by [`PhaseBarrier::wait`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BarrierError {
    /// The barrier was aborted before every party arrived.
    #[error("barrier broken before all parties arrived")]
    Broken,
}

/// Successful rendezvous.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarrierWaitResult {
    leader: bool,
    generation: u64,
}

impl BarrierWaitResult {
    /// Whether this thread was the last to arrive.
    pub fn is_leader(&self) -> bool {
        self.leader
    }

    /// Generation that was completed by this rendezvous.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

struct BarrierState {
    arrived: usize,
    generation: u64,
    broken: bool,
}

/// A cyclic barrier for a fixed number of parties that can be broken.
pub struct PhaseBarrier {
    parties: usize,
    state: Mutex<BarrierState>,
    released: Condvar,
}

// Compile-time assertion: the barrier is shared by reference across threads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<PhaseBarrier>();
};

impl PhaseBarrier {
    /// Create a barrier for `parties` threads.
    ///
    /// # Panics
    ///
    /// Panics if `parties == 0`.
    pub fn new(parties: usize) -> Self {
        assert!(parties > 0, "a barrier needs at least one party");
        Self {
            parties,
            state: Mutex::new(BarrierState {
                arrived: 0,
                generation: 0,
                broken: false,
            }),
            released: Condvar::new(),
        }
    }

    /// Number of threads that must arrive to release a generation.
    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Block until all parties have arrived or the barrier is broken.
    pub fn wait(&self) -> Result<BarrierWaitResult, BarrierError> {
        let mut state = self.lock();
        if state.broken {
            return Err(BarrierError::Broken);
        }

        let generation = state.generation;
        state.arrived += 1;
        if state.arrived == self.parties {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            self.released.notify_all();
            return Ok(BarrierWaitResult {
                leader: true,
                generation,
            });
        }

        while state.generation == generation && !state.broken {
            state = self
                .released
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        // A generation that completed before the abort still counts.
        if state.generation != generation {
            Ok(BarrierWaitResult {
                leader: false,
                generation,
            })
        } else {
            Err(BarrierError::Broken)
        }
    }

    /// Break the barrier, releasing every waiter with an error.
    ///
    /// Idempotent.
    pub fn abort(&self) {
        let mut state = self.lock();
        state.broken = true;
        self.released.notify_all();
    }

    /// Whether [`abort`](Self::abort) has been called.
    pub fn is_broken(&self) -> bool {
        self.lock().broken
    }

    fn lock(&self) -> MutexGuard<'_, BarrierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn single_party_never_blocks() {
        let b = PhaseBarrier::new(1);
        for g in 0..3 {
            let r = b.wait().unwrap();
            assert!(r.is_leader());
            assert_eq!(r.generation(), g);
        }
    }

    #[test]
    fn exactly_one_leader_per_generation() {
        let b = PhaseBarrier::new(4);
        let leaders = AtomicUsize::new(0);
        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..10 {
                        if b.wait().unwrap().is_leader() {
                            leaders.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        });
        assert_eq!(leaders.load(Ordering::Relaxed), 10);
    }

    #[test]
    fn no_thread_passes_early() {
        let b = PhaseBarrier::new(3);
        let arrived = AtomicUsize::new(0);
        thread::scope(|s| {
            for _ in 0..3 {
                s.spawn(|| {
                    for round in 1..=5 {
                        arrived.fetch_add(1, Ordering::SeqCst);
                        b.wait().unwrap();
                        assert!(arrived.load(Ordering::SeqCst) >= round * 3);
                        b.wait().unwrap();
                    }
                });
            }
        });
    }

    #[test]
    fn abort_releases_waiters() {
        let b = PhaseBarrier::new(3);
        thread::scope(|s| {
            let h1 = s.spawn(|| b.wait());
            let h2 = s.spawn(|| b.wait());
            thread::sleep(Duration::from_millis(20));
            b.abort();
            assert_eq!(h1.join().unwrap(), Err(BarrierError::Broken));
            assert_eq!(h2.join().unwrap(), Err(BarrierError::Broken));
        });
        assert!(b.is_broken());
    }

    #[test]
    fn waits_after_abort_fail_immediately() {
        let b = PhaseBarrier::new(2);
        b.abort();
        b.abort();
        assert_eq!(b.wait(), Err(BarrierError::Broken));
    }

    #[test]
    #[should_panic(expected = "at least one party")]
    fn zero_parties_rejected() {
        let _ = PhaseBarrier::new(0);
    }
}
