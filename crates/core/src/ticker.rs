//! Self rescheduling background tasks.
//!
//! A [Ticker] runs an action over and over. Each run returns how long to wait before
//! the next one. [Ticker::wake] cuts the wait short, [Ticker::cancel] stops the task.
//! [Backoff] computes waits that grow while the ring stays unchanged.
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::error::Error;
use crate::error::Result;

/// Interval of a maintenance task as a function of the time since the last topology change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Interval right after a change.
    pub min: Duration,
    /// Interval once the ring has been quiet for `gear_down`.
    pub max: Duration,
    /// Quiet time after which `max` is used.
    pub gear_down: Duration,
}

impl Backoff {
    pub fn new(min: Duration, max: Duration, gear_down: Duration) -> Self {
        Self { min, max, gear_down }
    }

    /// Always the same interval.
    pub fn constant(interval: Duration) -> Self {
        Self::new(interval, interval, Duration::ZERO)
    }

    /// The wait before the next run, easing from `min` to `max` along a half cosine.
    pub fn interval(&self, since_change: Duration) -> Duration {
        let x = if self.gear_down.is_zero() {
            1.0
        } else {
            since_change.as_secs_f64() / self.gear_down.as_secs_f64()
        };
        let secs = ease(self.min.as_secs_f64(), self.max.as_secs_f64(), x);
        Duration::try_from_secs_f64(secs).unwrap_or(self.max)
    }
}

/// `min * (1 - mu) + max * mu` with `mu = (1 - cos(x * pi)) / 2`, `x` clamped to \[0, 1\].
pub fn ease(min: f64, max: f64, x: f64) -> f64 {
    let x = if x.is_nan() { 1.0 } else { x.clamp(0.0, 1.0) };
    let mu = (1.0 - (x * std::f64::consts::PI).cos()) / 2.0;
    min * (1.0 - mu) + max * mu
}

/// A named periodic task that can be woken early and cancelled.
pub struct Ticker {
    name: &'static str,
    wake_tx: mpsc::Sender<()>,
    wake_rx: Mutex<Option<mpsc::Receiver<()>>>,
    token: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Ticker {
    pub fn new(name: &'static str) -> Self {
        // one pending wake at most, further wakes coalesce into it
        let (wake_tx, wake_rx) = mpsc::channel(1);
        Self {
            name,
            wake_tx,
            wake_rx: Mutex::new(Some(wake_rx)),
            token: CancellationToken::new(),
            handle: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Spawn the task. The first run happens after `first_delay`, each later run after
    /// the duration returned by the previous one, or right away when woken.
    /// A ticker can be started once.
    pub fn start<F, Fut>(&self, first_delay: Duration, span: tracing::Span, mut action: F) -> Result<()>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Duration> + Send + 'static,
    {
        let mut wake_rx = self
            .wake_rx
            .lock()
            .map_err(|_| Error::LockPoisoned)?
            .take()
            .ok_or(Error::TickerAlreadyStarted(self.name))?;
        let token = self.token.clone();
        let name = self.name;

        let task = async move {
            tracing::debug!("{} started", name);
            let mut delay = first_delay;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                    woken = wake_rx.recv() => match woken {
                        Some(()) => tracing::trace!("{} woken", name),
                        None => break,
                    },
                }
                tokio::select! {
                    _ = token.cancelled() => break,
                    next = action() => delay = next,
                }
                tracing::trace!("{} next run in {:?}", name, delay);
            }
            tracing::debug!("{} stopped", name);
        };

        let handle = tokio::spawn(task.instrument(span));
        *self.handle.lock().map_err(|_| Error::LockPoisoned)? = Some(handle);
        Ok(())
    }

    /// Ask for a run as soon as possible. Never blocks.
    pub fn wake(&self) {
        // a full channel means a wake is already pending
        let _ = self.wake_tx.try_send(());
    }

    /// Stop the task and wait until it has finished, including an in-flight run.
    pub async fn cancel(&self) {
        self.token.cancel();
        let handle = self.handle.lock().ok().and_then(|mut h| h.take());
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!("{} ended abnormally: {}", self.name, e);
            }
        }
    }

    /// Whether the task is spawned and not finished yet.
    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .map(|h| h.as_ref().map(|h| !h.is_finished()).unwrap_or(false))
            .unwrap_or(false)
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
