use std::{
    num::NonZeroU64,
    sync::atomic::{AtomicI64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

/// Source of the current Unix time in seconds.
pub trait Clock: Send + Sync {
    fn now_unix_seconds(&self) -> i64;
}

/// Wall clock of the host.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_seconds(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_secs() as i64,
            Err(err) => -(err.duration().as_secs() as i64),
        }
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now_unix_seconds: i64) -> Self {
        Self {
            now: AtomicI64::new(now_unix_seconds),
        }
    }

    pub fn set(&self, now_unix_seconds: i64) {
        self.now.store(now_unix_seconds, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_unix_seconds(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// `floor(now / step)`. Instants before the epoch map to counter 0.
pub fn current_counter(now_unix_seconds: i64, step: NonZeroU64) -> u64 {
    match u64::try_from(now_unix_seconds) {
        Ok(now) => now / step.get(),
        Err(_) => 0,
    }
}

/// Seconds until the counter for `now_unix_seconds` rolls over.
pub fn seconds_remaining(now_unix_seconds: i64, step: NonZeroU64) -> u64 {
    match u64::try_from(now_unix_seconds) {
        Ok(now) => step.get() - now % step.get(),
        Err(_) => step.get(),
    }
}
