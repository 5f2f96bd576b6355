//! Manual clock, config fixtures, and scripted collaborators shared by the
//! unit tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use parking_lot::Mutex;

use crate::models::config::ConfigSnapshot;
use crate::models::error::RelayError;
use crate::models::job::AudioJobSpec;
use crate::traits::archive_sync::ArchiveSync;
use crate::traits::audio_pipeline::AudioPipeline;
use crate::traits::clock::Clock;

/// Deterministic clock: `sleep` advances virtual time instead of waiting.
///
/// A one-millisecond real pause inside `sleep` lets observer threads
/// interleave with fast-forwarded scheduling loops.
pub(crate) struct ManualClock {
    now: Mutex<DateTime<Local>>,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub fn at(start: DateTime<Local>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(start),
            sleeps: Mutex::new(Vec::new()),
        })
    }

    pub fn at_default() -> Arc<Self> {
        Self::at(Local.with_ymd_and_hms(2025, 3, 7, 14, 30, 0).unwrap())
    }

    /// Every duration passed to `sleep`, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
        {
            let mut now = self.now.lock();
            *now = *now
                + chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::zero());
        }
        thread::sleep(Duration::from_millis(1));
    }
}

/// INI fixture exposing the knobs tests vary; everything else is fixed.
pub(crate) struct SampleConfig {
    pub max_retries: u32,
    pub retry_delay: u64,
    pub backoff_factor: u32,
    pub sync_interval: u64,
    pub enable_streaming: bool,
    pub enable_sync: bool,
    pub enable_recording: bool,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: 1,
            backoff_factor: 2,
            sync_interval: 5,
            enable_streaming: true,
            enable_sync: true,
            enable_recording: true,
        }
    }
}

impl SampleConfig {
    pub fn render(&self) -> String {
        format!(
            "[Icecast]\n\
             URL = radio.example.org:8000/live\n\
             Username = source\n\
             Password = hackme\n\
             MountPoint = testfm\n\
             \n\
             [RetrySettings]\n\
             MaxRetries = {}\n\
             RetryDelay = {}\n\
             BackoffFactor = {}\n\
             \n\
             [RemoteServer]\n\
             SyncPath = archive@backup.example.org:/srv/audio\n\
             \n\
             [ScheduleSettings]\n\
             SyncInterval = {}\n\
             \n\
             [AudioSettings]\n\
             HighPassFilter = 80\n\
             LowPassFilter = 12000\n\
             NoiseReduction = 12\n\
             NoiseType = w\n\
             IntegratedLoudnessTarget = -16\n\
             LoudnessRangeTarget = 11\n\
             TruePeak = -1.5\n\
             AudioCodec = libmp3lame\n\
             AudioFormat = mp3\n\
             AudioBitrate = 128k\n\
             BufferSize = 512k\n\
             \n\
             [LocalRecording]\n\
             AudioCodec = libmp3lame\n\
             AudioFormat = mp3\n\
             AudioBitrate = 192k\n\
             FileLength = 3600\n\
             RecordingRootDir = recordings\n\
             \n\
             [SystemSettings]\n\
             EnableStreaming = {}\n\
             EnableSync = {}\n\
             EnableRecording = {}\n",
            self.max_retries,
            self.retry_delay,
            self.backoff_factor,
            self.sync_interval,
            self.enable_streaming,
            self.enable_sync,
            self.enable_recording,
        )
    }

    pub fn write_to(&self, path: &Path) {
        std::fs::write(path, self.render()).expect("failed to write config fixture");
    }
}

/// A parsed snapshot of the default fixture, for tests that need no file.
pub(crate) fn sample_snapshot() -> ConfigSnapshot {
    let cfg = config::Config::builder()
        .add_source(config::File::from_str(
            &SampleConfig::default().render(),
            config::FileFormat::Ini,
        ))
        .build()
        .expect("fixture ini parses");
    ConfigSnapshot::from_file(&cfg, 1).expect("fixture config is complete")
}

/// Pipeline double that records every job and always succeeds.
#[derive(Default)]
pub(crate) struct CountingPipeline {
    calls: Mutex<Vec<AudioJobSpec>>,
}

impl CountingPipeline {
    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls(&self) -> Vec<AudioJobSpec> {
        self.calls.lock().clone()
    }
}

impl AudioPipeline for CountingPipeline {
    fn run_job(&self, spec: &AudioJobSpec, _config: &ConfigSnapshot) -> Result<(), RelayError> {
        self.calls.lock().push(spec.clone());
        Ok(())
    }
}

/// Archive double that records every mirror pass and always succeeds.
#[derive(Default)]
pub(crate) struct CountingSync {
    calls: Mutex<Vec<(PathBuf, String)>>,
}

impl CountingSync {
    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls.lock().clone()
    }
}

impl ArchiveSync for CountingSync {
    fn mirror(&self, local_root: &Path, remote_path: &str) -> Result<(), RelayError> {
        self.calls
            .lock()
            .push((local_root.to_path_buf(), remote_path.to_string()));
        Ok(())
    }
}
