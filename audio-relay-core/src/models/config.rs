use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::RelayError;

/// Broadcast endpoint settings (`[Icecast]`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IcecastSettings {
    /// Host, port, and mount path, e.g. `radio.example.org:8000/live`.
    pub url: String,
    pub username: String,
    /// Never serialized into status documents.
    #[serde(skip_serializing)]
    pub password: String,
    /// Logical stream identifier; also the recording subdirectory and
    /// segment filename prefix.
    pub mount_point: String,
}

/// Retry policy parameters (`[RetrySettings]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetrySettings {
    pub max_retries: u32,
    /// Base delay in seconds before the second attempt.
    pub retry_delay: u64,
    pub backoff_factor: u32,
}

/// Remote archive settings (`[RemoteServer]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteServerSettings {
    /// rsync-style destination, e.g. `archive@backup.example.org:/srv/audio`.
    pub sync_path: String,
}

/// Recurring job cadence (`[ScheduleSettings]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduleSettings {
    /// Minutes between archive mirror passes.
    pub sync_interval: u64,
}

/// Filter chain and broadcast encoding parameters (`[AudioSettings]`).
///
/// These are passed through to the external pipeline untouched; the core
/// does not interpret them beyond argument construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioSettings {
    pub high_pass_filter: u32,
    pub low_pass_filter: u32,
    pub noise_reduction: u32,
    pub noise_type: String,
    pub integrated_loudness_target: f64,
    pub loudness_range_target: f64,
    pub true_peak: f64,
    pub audio_codec: String,
    pub audio_format: String,
    pub audio_bitrate: String,
    pub buffer_size: String,
}

/// Local segment encoding parameters (`[LocalRecording]`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalRecordingSettings {
    pub audio_codec: String,
    pub audio_format: String,
    pub audio_bitrate: String,
    /// Segment duration limit in ffmpeg `-t` syntax (`3600` or `01:00:00`).
    pub file_length: String,
    pub recording_root_dir: PathBuf,
}

/// Feature flags read at startup and after reloads (`[SystemSettings]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SystemSettings {
    pub enable_streaming: bool,
    pub enable_sync: bool,
    pub enable_recording: bool,
}

/// One immutable, fully-validated view of the configuration file.
///
/// Snapshots are replaced wholesale on reload; a snapshot held by an
/// in-flight operation is never mutated, only superseded. `version` is
/// monotonic across loads within one provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigSnapshot {
    pub version: u64,
    pub loaded_at: DateTime<Utc>,
    pub icecast: IcecastSettings,
    pub retry: RetrySettings,
    pub remote_server: RemoteServerSettings,
    pub schedule: ScheduleSettings,
    pub audio: AudioSettings,
    pub local_recording: LocalRecordingSettings,
    pub system: SystemSettings,
}

impl ConfigSnapshot {
    /// Extract every required key eagerly. A missing or malformed key fails
    /// here, not at first use.
    pub fn from_file(cfg: &config::Config, version: u64) -> Result<Self, RelayError> {
        let snapshot = Self {
            version,
            loaded_at: Utc::now(),
            icecast: IcecastSettings {
                url: req_string(cfg, "Icecast.URL")?,
                username: req_string(cfg, "Icecast.Username")?,
                password: req_string(cfg, "Icecast.Password")?,
                mount_point: req_string(cfg, "Icecast.MountPoint")?,
            },
            retry: RetrySettings {
                max_retries: req_u32(cfg, "RetrySettings.MaxRetries")?,
                retry_delay: req_u64(cfg, "RetrySettings.RetryDelay")?,
                backoff_factor: req_u32(cfg, "RetrySettings.BackoffFactor")?,
            },
            remote_server: RemoteServerSettings {
                sync_path: req_string(cfg, "RemoteServer.SyncPath")?,
            },
            schedule: ScheduleSettings {
                sync_interval: req_u64(cfg, "ScheduleSettings.SyncInterval")?,
            },
            audio: AudioSettings {
                high_pass_filter: req_u32(cfg, "AudioSettings.HighPassFilter")?,
                low_pass_filter: req_u32(cfg, "AudioSettings.LowPassFilter")?,
                noise_reduction: req_u32(cfg, "AudioSettings.NoiseReduction")?,
                noise_type: req_string(cfg, "AudioSettings.NoiseType")?,
                integrated_loudness_target: req_f64(cfg, "AudioSettings.IntegratedLoudnessTarget")?,
                loudness_range_target: req_f64(cfg, "AudioSettings.LoudnessRangeTarget")?,
                true_peak: req_f64(cfg, "AudioSettings.TruePeak")?,
                audio_codec: req_string(cfg, "AudioSettings.AudioCodec")?,
                audio_format: req_string(cfg, "AudioSettings.AudioFormat")?,
                audio_bitrate: req_string(cfg, "AudioSettings.AudioBitrate")?,
                buffer_size: req_string(cfg, "AudioSettings.BufferSize")?,
            },
            local_recording: LocalRecordingSettings {
                audio_codec: req_string(cfg, "LocalRecording.AudioCodec")?,
                audio_format: req_string(cfg, "LocalRecording.AudioFormat")?,
                audio_bitrate: req_string(cfg, "LocalRecording.AudioBitrate")?,
                file_length: req_string(cfg, "LocalRecording.FileLength")?,
                recording_root_dir: PathBuf::from(req_string(cfg, "LocalRecording.RecordingRootDir")?),
            },
            system: SystemSettings {
                enable_streaming: req_bool(cfg, "SystemSettings.EnableStreaming")?,
                enable_sync: req_bool(cfg, "SystemSettings.EnableSync")?,
                enable_recording: req_bool(cfg, "SystemSettings.EnableRecording")?,
            },
        };
        snapshot.validate().map_err(RelayError::Config)?;
        Ok(snapshot)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.icecast.url.is_empty() {
            return Err("Icecast.URL must not be empty".into());
        }
        if self.icecast.mount_point.is_empty() {
            return Err("Icecast.MountPoint must not be empty".into());
        }
        if self.retry.max_retries == 0 {
            return Err("RetrySettings.MaxRetries must be at least 1".into());
        }
        if self.retry.backoff_factor == 0 {
            return Err("RetrySettings.BackoffFactor must be at least 1".into());
        }
        if self.schedule.sync_interval == 0 {
            return Err("ScheduleSettings.SyncInterval must be at least 1 minute".into());
        }
        if self.local_recording.recording_root_dir.as_os_str().is_empty() {
            return Err("LocalRecording.RecordingRootDir must not be empty".into());
        }
        Ok(())
    }
}

fn req_string(cfg: &config::Config, key: &str) -> Result<String, RelayError> {
    cfg.get_string(key)
        .map_err(|e| RelayError::Config(format!("{key}: {e}")))
}

fn req_u32(cfg: &config::Config, key: &str) -> Result<u32, RelayError> {
    let value = cfg
        .get_int(key)
        .map_err(|e| RelayError::Config(format!("{key}: {e}")))?;
    u32::try_from(value).map_err(|_| RelayError::Config(format!("{key}: out of range: {value}")))
}

fn req_u64(cfg: &config::Config, key: &str) -> Result<u64, RelayError> {
    let value = cfg
        .get_int(key)
        .map_err(|e| RelayError::Config(format!("{key}: {e}")))?;
    u64::try_from(value).map_err(|_| RelayError::Config(format!("{key}: out of range: {value}")))
}

fn req_f64(cfg: &config::Config, key: &str) -> Result<f64, RelayError> {
    cfg.get_float(key)
        .map_err(|e| RelayError::Config(format!("{key}: {e}")))
}

fn req_bool(cfg: &config::Config, key: &str) -> Result<bool, RelayError> {
    cfg.get_bool(key)
        .map_err(|e| RelayError::Config(format!("{key}: {e}")))
}
