//! Clock Module
//!
//! Time capabilities injected into the cache and its expiration sweeper.
//!
//! Production code uses [`SystemClock`] and [`TokioTimer`]. Tests swap in
//! [`ManualClock`] and [`StepTimer`] so expirations and sweep cycles can be
//! driven one step at a time without waiting on the wall clock.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use tokio::sync::mpsc;

// == Clock ==
/// Source of "now" used both to stamp and to check expirations.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Real wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can hand one clone to the cache
/// and keep another to advance time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Moves the clock to an absolute instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock() = instant;
    }

    /// Moves the clock by a signed number of seconds.
    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock();
        *now = offset_secs(*now, secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

// == Offset Helper ==
/// Returns `instant + secs`, saturating at the representable range instead
/// of panicking on overflow.
pub fn offset_secs(instant: DateTime<Utc>, secs: i64) -> DateTime<Utc> {
    TimeDelta::try_seconds(secs)
        .and_then(|delta| instant.checked_add_signed(delta))
        .unwrap_or(if secs < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

// == Sweep Timer ==
/// Pacing hooks for the expiration sweeper.
///
/// `sleep` runs between sweep cycles with no lock held; `after_sweep` runs
/// once the lock from a finished cycle has been released.
#[async_trait]
pub trait SweepTimer: Send + Sync {
    async fn sleep(&self, interval: Duration);

    async fn after_sweep(&self) {}
}

/// Sleeps on the tokio timer; the post-sweep hook is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioTimer;

#[async_trait]
impl SweepTimer for TokioTimer {
    async fn sleep(&self, interval: Duration) {
        tokio::time::sleep(interval).await;
    }
}

// == Step Timer ==
/// Timer whose sleeps end only when a [`SweepStepper`] releases them.
///
/// Each `sleep` waits for one tick from the stepper and each `after_sweep`
/// reports back, so [`SweepStepper::step`] returns only after a full sweep
/// cycle has completed.
#[derive(Debug)]
pub struct StepTimer {
    ticks: tokio::sync::Mutex<mpsc::Receiver<()>>,
    done: mpsc::Sender<()>,
}

/// Controlling side of a [`StepTimer`].
#[derive(Debug)]
pub struct SweepStepper {
    ticks: mpsc::Sender<()>,
    done: mpsc::Receiver<()>,
}

impl StepTimer {
    /// Creates a linked timer and stepper.
    pub fn pair() -> (StepTimer, SweepStepper) {
        let (tick_tx, tick_rx) = mpsc::channel(1);
        let (done_tx, done_rx) = mpsc::channel(1);
        (
            StepTimer {
                ticks: tokio::sync::Mutex::new(tick_rx),
                done: done_tx,
            },
            SweepStepper {
                ticks: tick_tx,
                done: done_rx,
            },
        )
    }
}

#[async_trait]
impl SweepTimer for StepTimer {
    async fn sleep(&self, _interval: Duration) {
        if self.ticks.lock().await.recv().await.is_none() {
            // Stepper dropped: never wake again.
            std::future::pending::<()>().await;
        }
    }

    async fn after_sweep(&self) {
        let _ = self.done.send(()).await;
    }
}

impl SweepStepper {
    /// Lets the sweeper run exactly one cycle and waits for it to finish.
    ///
    /// Returns `false` if the sweeper is gone.
    pub async fn step(&mut self) -> bool {
        if self.ticks.send(()).await.is_err() {
            return false;
        }
        self.done.recv().await.is_some()
    }
}
