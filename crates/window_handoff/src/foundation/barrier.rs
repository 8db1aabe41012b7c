//! One-shot wait/signal barrier
//!
//! A `Barrier` starts out pending. Any number of threads may block in
//! [`Barrier::wait`] until some thread calls [`Barrier::signal`]; from then on
//! every wait, current or future, returns immediately. Unlike
//! `std::sync::Barrier` there is no participant count: the signaler and the
//! waiters are different roles.
//!
//! The mutex/condvar pair gives the usual happens-before edge: everything the
//! signaling thread wrote before `signal` is visible to a thread once its
//! `wait` returns.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Binary pending/signaled synchronization primitive
#[derive(Debug, Default)]
pub struct Barrier {
    signaled: Mutex<bool>,
    cond: Condvar,
}

impl Barrier {
    /// Create a barrier in the pending state
    pub fn new() -> Self {
        Self::default()
    }

    /// Block the calling thread until the barrier is signaled
    ///
    /// Returns immediately if it already was.
    pub fn wait(&self) {
        let mut signaled = self.lock();
        while !*signaled {
            signaled = self
                .cond
                .wait(signaled)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Move to the signaled state and release every waiter
    ///
    /// Signaling an already signaled barrier does nothing.
    pub fn signal(&self) {
        let mut signaled = self.lock();
        if !*signaled {
            *signaled = true;
            self.cond.notify_all();
        }
    }

    /// Return to the pending state
    ///
    /// Only meaningful while no thread is blocked in [`Barrier::wait`]; a
    /// waiter that has already observed the signal is unaffected.
    pub fn reset(&self) {
        *self.lock() = false;
    }

    /// Non-blocking check of the current state
    pub fn is_signaled(&self) -> bool {
        *self.lock()
    }

    // A panic while holding the lock cannot leave the bool half-written.
    fn lock(&self) -> MutexGuard<'_, bool> {
        self.signaled.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_new_barrier_is_pending() {
        let barrier = Barrier::new();
        assert!(!barrier.is_signaled());
    }

    #[test]
    fn test_signal_before_wait_returns_immediately() {
        let barrier = Barrier::new();
        barrier.signal();
        barrier.wait();
        barrier.wait();
        assert!(barrier.is_signaled());
    }

    #[test]
    fn test_double_signal_is_noop() {
        let barrier = Barrier::new();
        barrier.signal();
        barrier.signal();
        assert!(barrier.is_signaled());
    }

    #[test]
    fn test_signal_releases_all_waiters() {
        let barrier = Arc::new(Barrier::new());
        let released = Arc::new(AtomicUsize::new(0));

        let waiters: Vec<_> = (0..8)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                let released = Arc::clone(&released);
                thread::spawn(move || {
                    barrier.wait();
                    released.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        assert_eq!(released.load(Ordering::SeqCst), 0);

        barrier.signal();
        for waiter in waiters {
            waiter.join().unwrap();
        }
        assert_eq!(released.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn test_signal_publishes_prior_writes() {
        let barrier = Arc::new(Barrier::new());
        let value = Arc::new(AtomicUsize::new(0));

        let reader = {
            let barrier = Arc::clone(&barrier);
            let value = Arc::clone(&value);
            thread::spawn(move || {
                barrier.wait();
                value.load(Ordering::Relaxed)
            })
        };

        value.store(42, Ordering::Relaxed);
        barrier.signal();
        assert_eq!(reader.join().unwrap(), 42);
    }

    #[test]
    fn test_reset_rearms_barrier() {
        let barrier = Barrier::new();
        barrier.signal();
        barrier.reset();
        assert!(!barrier.is_signaled());

        barrier.signal();
        barrier.wait();
        assert!(barrier.is_signaled());
    }
}
