use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use crate::models::state::SchedulerPhase;
use crate::sched::clock::next_hour_boundary;
use crate::settings::provider::SettingsProvider;
use crate::supervisor::registry::CancelToken;
use crate::traits::clock::Clock;

/// Pause after each hourly firing before the next boundary is computed.
/// Stops a job that completes within the boundary second from seeing the
/// same boundary twice.
pub const FIRE_COOLDOWN: Duration = Duration::from_secs(10);

/// Drives one scheduled job: hourly-aligned, fixed-interval, or one-shot.
///
/// Each worker owns its own `Scheduler`; the observable [`SchedulerPhase`]
/// is per-loop. Every firing runs on its own thread, so a failed or slow
/// firing never stalls the loop itself. Loops poll their cancellation
/// token at iteration boundaries only; a loop mid-sleep observes
/// cancellation once the sleep returns.
#[derive(Clone)]
pub struct Scheduler {
    clock: Arc<dyn Clock>,
    settings: Arc<SettingsProvider>,
    phase: Arc<Mutex<SchedulerPhase>>,
}

impl Scheduler {
    pub fn new(clock: Arc<dyn Clock>, settings: Arc<SettingsProvider>) -> Self {
        Self {
            clock,
            settings,
            phase: Arc::new(Mutex::new(SchedulerPhase::Idle)),
        }
    }

    pub fn phase(&self) -> SchedulerPhase {
        *self.phase.lock()
    }

    fn set_phase(&self, phase: SchedulerPhase) {
        *self.phase.lock() = phase;
    }

    /// Fire `job` once, immediately, on a detached named thread.
    pub fn fire_once(label: &str, job: impl FnOnce() + Send + 'static) {
        thread::Builder::new()
            .name(format!("{label}-firing"))
            .spawn(job)
            .expect("failed to spawn firing thread");
    }

    /// Fire `job` at the top of every hour until cancelled.
    pub fn run_hourly<F>(&self, label: &str, cancel: &CancelToken, job: F)
    where
        F: Fn() + Clone + Send + 'static,
    {
        while !cancel.is_cancelled() {
            self.set_phase(SchedulerPhase::Waiting);
            let now = self.clock.now();
            let target = next_hour_boundary(&now);
            let wait = (target - now).to_std().unwrap_or(Duration::ZERO);
            log::debug!("{label}: next firing at {target} ({}s away)", wait.as_secs());
            self.clock.sleep(wait);
            if cancel.is_cancelled() {
                break;
            }

            self.set_phase(SchedulerPhase::Firing);
            Self::fire_once(label, job.clone());

            self.set_phase(SchedulerPhase::Cooldown);
            self.clock.sleep(FIRE_COOLDOWN);
        }
        self.set_phase(SchedulerPhase::Cancelled);
        log::info!("{label}: hourly schedule stopped");
    }

    /// Fire `job` immediately and then every `SyncInterval` minutes until
    /// cancelled. Settings are reloaded before every firing; if a reload
    /// fails the previous snapshot's interval stays in effect.
    pub fn run_interval<F>(&self, label: &str, cancel: &CancelToken, job: F)
    where
        F: Fn() + Clone + Send + 'static,
    {
        while !cancel.is_cancelled() {
            let snapshot = match self.settings.reload() {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    log::warn!("{label}: settings reload failed, keeping previous: {e}");
                    self.settings.current()
                }
            };

            self.set_phase(SchedulerPhase::Firing);
            Self::fire_once(label, job.clone());

            let interval = Duration::from_secs(snapshot.schedule.sync_interval.saturating_mul(60));
            self.set_phase(SchedulerPhase::Cooldown);
            self.clock.sleep(interval);
            self.set_phase(SchedulerPhase::Waiting);
        }
        self.set_phase(SchedulerPhase::Cancelled);
        log::info!("{label}: interval schedule stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    use chrono::{Local, TimeZone};

    use crate::test_support::{ManualClock, SampleConfig};

    fn fixture(sample: &SampleConfig) -> (tempfile::TempDir, Arc<SettingsProvider>, Arc<ManualClock>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        sample.write_to(&path);
        let provider = Arc::new(SettingsProvider::open(&path).unwrap());
        let clock = ManualClock::at(Local.with_ymd_and_hms(2025, 3, 7, 14, 30, 0).unwrap());
        (dir, provider, clock)
    }

    fn wait_for(fired: &AtomicUsize, count: usize) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while fired.load(Ordering::SeqCst) < count {
            assert!(Instant::now() < deadline, "timed out waiting for firings");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn hourly_firings_align_to_boundaries_with_cooldown() {
        let (_dir, provider, clock) = fixture(&SampleConfig::default());
        let scheduler = Scheduler::new(clock.clone(), provider);
        let cancel = CancelToken::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let loop_scheduler = scheduler.clone();
        let loop_cancel = cancel.clone();
        let loop_fired = Arc::clone(&fired);
        let handle = thread::spawn(move || {
            loop_scheduler.run_hourly("test-hourly", &loop_cancel, move || {
                loop_fired.fetch_add(1, Ordering::SeqCst);
            });
        });

        wait_for(&fired, 3);
        cancel.cancel();
        handle.join().unwrap();

        // First wait reaches 15:00 from 14:30; afterwards the pattern is
        // cooldown then a (3600 - cooldown)s wait, so consecutive firings
        // are a full hour apart.
        let sleeps = clock.sleeps();
        assert_eq!(sleeps[0], Duration::from_secs(1800));
        assert_eq!(sleeps[1], FIRE_COOLDOWN);
        assert_eq!(sleeps[2], Duration::from_secs(3590));
        assert!(sleeps[1] + sleeps[2] >= Duration::from_secs(3590));
        assert_eq!(sleeps[3], FIRE_COOLDOWN);
        assert_eq!(sleeps[4], Duration::from_secs(3590));
        assert_eq!(scheduler.phase(), SchedulerPhase::Cancelled);
    }

    #[test]
    fn interval_fires_immediately_then_every_interval() {
        let sample = SampleConfig {
            sync_interval: 5,
            ..SampleConfig::default()
        };
        let (_dir, provider, clock) = fixture(&sample);
        let scheduler = Scheduler::new(clock.clone(), Arc::clone(&provider));
        let cancel = CancelToken::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let loop_scheduler = scheduler.clone();
        let loop_cancel = cancel.clone();
        let loop_fired = Arc::clone(&fired);
        let handle = thread::spawn(move || {
            loop_scheduler.run_interval("test-sync", &loop_cancel, move || {
                loop_fired.fetch_add(1, Ordering::SeqCst);
            });
        });

        wait_for(&fired, 3);
        cancel.cancel();
        handle.join().unwrap();

        // Three firings at t=0, 5min, 10min: the first two gaps are full
        // five-minute sleeps, and every firing re-read the file first.
        let sleeps = clock.sleeps();
        assert_eq!(sleeps[0], Duration::from_secs(300));
        assert_eq!(sleeps[1], Duration::from_secs(300));
        assert!(provider.current().version >= 4);
        assert_eq!(scheduler.phase(), SchedulerPhase::Cancelled);
    }

    #[test]
    fn cancelled_mid_wait_never_fires() {
        let (_dir, provider, clock) = fixture(&SampleConfig::default());
        let scheduler = Scheduler::new(clock.clone(), provider);
        let cancel = CancelToken::new();
        let fired = Arc::new(AtomicUsize::new(0));

        cancel.cancel();
        let loop_fired = Arc::clone(&fired);
        scheduler.run_hourly("test-cancelled", &cancel, move || {
            loop_fired.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.phase(), SchedulerPhase::Cancelled);
    }

    #[test]
    fn one_shot_fires_exactly_once() {
        let fired = Arc::new(AtomicUsize::new(0));
        let job_fired = Arc::clone(&fired);

        Scheduler::fire_once("test-once", move || {
            job_fired.fetch_add(1, Ordering::SeqCst);
        });

        wait_for(&fired, 1);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
