//! Wall-clock deadline signalling, grounded on the original's `set_time_limit`
//! sleeper thread: a background thread sleeps for the size-dependent
//! interval (minus a safety margin) and then raises an atomic flag the
//! annealing loop polls.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// A stop signal shared between the timer thread and every annealing
/// worker. Workers poll [`Deadline::expired`] at the top of each
/// iteration; the timer thread is the only writer.
pub struct Deadline {
    flag: Arc<AtomicBool>,
}

impl Deadline {
    /// Spawns the timer thread and returns a handle for polling plus the
    /// thread's `JoinHandle` so callers can wait for a clean shutdown.
    pub fn spawn(interval: Duration, safety_margin: Duration) -> (Self, JoinHandle<()>) {
        let flag = Arc::new(AtomicBool::new(false));
        let sleep_for = interval.saturating_sub(safety_margin);
        let handle = {
            let flag = Arc::clone(&flag);
            std::thread::spawn(move || {
                std::thread::sleep(sleep_for);
                flag.store(true, Ordering::Release);
            })
        };
        (Self { flag }, handle)
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// A cheap, cloneable handle sharing the same underlying flag, for
    /// handing to worker threads/rayon tasks.
    pub fn handle(&self) -> DeadlineHandle {
        DeadlineHandle {
            flag: Arc::clone(&self.flag),
        }
    }
}

#[derive(Clone)]
pub struct DeadlineHandle {
    flag: Arc<AtomicBool>,
}

impl DeadlineHandle {
    #[inline]
    pub fn expired(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
