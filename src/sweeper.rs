use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tracing::trace;

/// Handle to the recurring background sweep timer.
///
/// The timer is a scoped resource: it is acquired at cache construction
/// (and again on `clear`, which restarts the period), and it is guaranteed
/// released on `dispose`: [`stop`](Self::stop) flags the latch, wakes the
/// thread, and joins it, and `Drop` does the same on every other code path.
///
/// The worker parks on a condvar with a timeout rather than sleeping, so a
/// stop request takes effect immediately instead of after the current
/// period elapses.
pub(crate) struct Sweeper {
    signal: Arc<StopSignal>,
    handle: Option<JoinHandle<()>>,
}

struct StopSignal {
    stopped: Mutex<bool>,
    condvar: Condvar,
}

impl Sweeper {
    /// Spawns a worker that calls `sweep` every `period`.
    ///
    /// `sweep` returns false when its target is gone, which also ends the
    /// worker.
    pub(crate) fn spawn<F>(name: &str, period: Duration, mut sweep: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let signal = Arc::new(StopSignal {
            stopped: Mutex::new(false),
            condvar: Condvar::new(),
        });
        let thread_signal = Arc::clone(&signal);
        let thread_name = format!("{name}-sweeper");

        trace!(target: "stratacache", sweeper = %thread_name, period_ms = period.as_millis() as u64, "sweeper started");

        let handle = thread::spawn(move || {
            let mut stopped = thread_signal.stopped.lock();
            loop {
                if *stopped {
                    return;
                }
                let wait = thread_signal.condvar.wait_for(&mut stopped, period);
                if *stopped {
                    return;
                }
                // A timeout means a full period elapsed without a stop
                // request; anything else was a spurious wakeup.
                if wait.timed_out() && !sweep() {
                    return;
                }
            }
        });

        Self {
            signal,
            handle: Some(handle),
        }
    }

    /// Stops the timer and waits for the worker to finish, including a
    /// sweep already in progress.
    pub(crate) fn stop(&mut self) {
        *self.signal.stopped.lock() = true;
        self.signal.condvar.notify_one();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_sweeper_fires_periodically() {
        let count = Arc::new(AtomicUsize::new(0));
        let worker_count = Arc::clone(&count);

        let mut sweeper = Sweeper::spawn("test", Duration::from_millis(10), move || {
            worker_count.fetch_add(1, Ordering::SeqCst);
            true
        });

        thread::sleep(Duration::from_millis(120));
        sweeper.stop();
        assert!(count.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn test_stop_is_prompt_and_final() {
        let count = Arc::new(AtomicUsize::new(0));
        let worker_count = Arc::clone(&count);

        let mut sweeper = Sweeper::spawn("test", Duration::from_secs(3600), move || {
            worker_count.fetch_add(1, Ordering::SeqCst);
            true
        });

        // stop() must not wait a full period
        sweeper.stop();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_worker_exits_when_sweep_reports_gone() {
        let mut sweeper = Sweeper::spawn("test", Duration::from_millis(5), || false);
        thread::sleep(Duration::from_millis(50));
        // Worker already exited on its own; stop() just joins.
        sweeper.stop();
    }
}
