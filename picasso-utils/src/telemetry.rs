//! Lightweight timing utilities for optional performance tracing.
//!
//! A [`TimingGuard`] records when a scoped operation started and logs the elapsed time
//! under the `picasso::telemetry` target when dropped. Guards only activate when
//! telemetry has been switched on with [`configure`] and the requested level is within
//! the configured threshold, so disabled tracing costs one atomic load.

use std::{
    borrow::Cow,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    time::{Duration, Instant},
};

use log::{Level, LevelFilter, log, log_enabled};

const TARGET: &str = "picasso::telemetry";

static TELEMETRY_ENABLED: AtomicBool = AtomicBool::new(false);
static TELEMETRY_LEVEL: AtomicUsize = AtomicUsize::new(LevelFilter::Off as usize);

/// RAII helper that logs how long an operation took when dropped.
pub struct TimingGuard {
    label: Cow<'static, str>,
    level: Level,
    start: Instant,
    active: bool,
}

impl TimingGuard {
    /// Returns `true` when the guard will emit a log entry on drop.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Consume the guard and return the elapsed duration without logging.
    pub fn finish(mut self) -> Duration {
        self.active = false;
        self.start.elapsed()
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        if self.active {
            log!(
                target: TARGET,
                self.level,
                "{} completed in {:.2?}",
                self.label,
                self.start.elapsed()
            );
        }
    }
}

/// Create a timing guard that logs at `level` once telemetry allows it.
pub fn timing_guard(label: impl Into<Cow<'static, str>>, level: Level) -> TimingGuard {
    let active = telemetry_allows(level) && log_enabled!(target: TARGET, level);
    TimingGuard {
        label: label.into(),
        level,
        start: Instant::now(),
        active,
    }
}

/// Configure the global telemetry state from user settings.
pub fn configure(enabled: bool, level: LevelFilter) {
    TELEMETRY_ENABLED.store(enabled, Ordering::Relaxed);
    TELEMETRY_LEVEL.store(level as usize, Ordering::Relaxed);
}

/// Returns whether telemetry logging is currently enabled.
pub fn telemetry_enabled() -> bool {
    TELEMETRY_ENABLED.load(Ordering::Relaxed)
}

/// Returns `true` when telemetry is enabled and `level` is within the configured threshold.
pub fn telemetry_allows(level: Level) -> bool {
    telemetry_enabled() && (level as usize) <= TELEMETRY_LEVEL.load(Ordering::Relaxed)
}
