//! Interval timer and tick clock
//!
//! `RepeatingTimer` calls one callback per period on its own thread, so
//! calls are always serialized. The callback can end the loop itself by
//! returning `ControlFlow::Break`.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Measures wall-clock seconds between successive calls
#[derive(Debug, Clone, Copy)]
pub struct TickClock {
    last: Instant,
}

impl TickClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Seconds since the previous call (or since construction)
    pub fn elapsed(&mut self) -> f64 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f64();
        self.last = now;
        dt
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

pub struct RepeatingTimer {
    interval: Duration,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RepeatingTimer {
    /// Start calling `callback` every `interval`
    pub fn start<F>(interval: Duration, mut callback: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = thread::spawn(move || {
            let mut next = Instant::now() + interval;
            while flag.load(Ordering::Acquire) {
                let now = Instant::now();
                if next > now {
                    thread::sleep(next - now);
                }
                if !flag.load(Ordering::Acquire) {
                    break;
                }
                if callback().is_break() {
                    break;
                }
                // Fixed cadence; skip missed periods instead of bursting
                next += interval;
                let now = Instant::now();
                if next < now {
                    next = now + interval;
                }
            }
            flag.store(false, Ordering::Release);
        });

        Self {
            interval,
            running,
            handle: Some(handle),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop issuing callbacks and wait for the worker to exit
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        self.join();
    }

    /// Block until the callback ends the loop (or `stop` is called elsewhere)
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Timer callback panicked");
            }
        }
    }
}

impl Drop for RepeatingTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
