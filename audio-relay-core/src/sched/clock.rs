use std::thread;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone, Timelike};

use crate::traits::clock::Clock;

/// Real wall clock backed by `Local::now()` and `thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// The wall-clock instant of the next top-of-hour strictly after `now`.
///
/// An instant already on a boundary maps to the following hour, so a job
/// fired at the boundary never re-targets the same instant.
pub fn next_hour_boundary<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let top_of_hour = now
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0));
    match top_of_hour {
        Some(t) => t + chrono::Duration::hours(1),
        // Unrepresentable local time (DST gap); land an hour out instead.
        None => now.clone() + chrono::Duration::hours(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 7, h, m, s).unwrap()
    }

    #[test]
    fn mid_hour_rounds_up() {
        assert_eq!(next_hour_boundary(&local(14, 30, 15)), local(15, 0, 0));
        assert_eq!(next_hour_boundary(&local(14, 59, 59)), local(15, 0, 0));
    }

    #[test]
    fn exact_boundary_maps_to_next_hour() {
        assert_eq!(next_hour_boundary(&local(14, 0, 0)), local(15, 0, 0));
    }

    #[test]
    fn just_after_boundary_waits_almost_a_full_hour() {
        let now = local(14, 0, 1);
        let target = next_hour_boundary(&now);

        assert_eq!(target, local(15, 0, 0));
        assert_eq!((target - now).num_seconds(), 3599);
    }
}
