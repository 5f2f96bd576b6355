use std::time::Duration;

use chrono::{DateTime, Local};

/// Wall-clock access for scheduling and retry delays.
///
/// Schedulers and the retry policy never call `Local::now()` or
/// `thread::sleep` directly; they go through this trait so tests can drive
/// a manual clock. Production code uses [`SystemClock`].
///
/// [`SystemClock`]: crate::sched::clock::SystemClock
pub trait Clock: Send + Sync {
    /// Current wall-clock time in the local timezone.
    fn now(&self) -> DateTime<Local>;

    /// Suspend the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}
