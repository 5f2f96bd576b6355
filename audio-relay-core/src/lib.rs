//! # audio-relay-core
//!
//! Orchestration core for a continuous audio relay: streams live audio to
//! an Icecast-compatible endpoint, records rolling timestamped segments,
//! and mirrors finished recordings to a remote archive.
//!
//! The audio data path itself is delegated to external tools (ffmpeg for
//! capture/encode, rsync for mirroring); this crate owns the control
//! plane: wall-clock scheduling, named-worker supervision, bounded retry
//! with live settings reload, and the status/toggle surface.
//!
//! ## Architecture
//!
//! ```text
//! audio-relay-core (this crate)
//! ├── models/       ← RelayError, ConfigSnapshot, AudioJobSpec, SchedulerPhase
//! ├── traits/       ← Clock, AudioPipeline, ArchiveSync (seams for tests)
//! ├── settings/     ← SettingsProvider (atomic snapshot swap, versioned)
//! ├── retry/        ← RetryPolicy (exponential backoff + reload per attempt)
//! ├── sched/        ← Scheduler (hourly-aligned, interval, one-shot), SystemClock
//! ├── supervisor/   ← WorkerSupervisor (named workers, CancelToken)
//! ├── pipeline/     ← FfmpegInvoker + date-partitioned segment layout
//! ├── syncer/       ← RsyncInvoker
//! └── control/      ← ControlCenter (toggles, status JSON, worker bodies)
//! ```

pub mod control;
pub mod models;
pub mod pipeline;
pub mod retry;
pub mod sched;
pub mod settings;
pub mod supervisor;
pub mod syncer;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export key types at crate root for convenience.
pub use control::center::{ControlCenter, Feature, SystemStatus};
pub use models::config::ConfigSnapshot;
pub use models::error::RelayError;
pub use models::job::AudioJobSpec;
pub use models::state::SchedulerPhase;
pub use pipeline::ffmpeg::FfmpegInvoker;
pub use retry::policy::RetryPolicy;
pub use sched::clock::SystemClock;
pub use sched::scheduler::Scheduler;
pub use settings::provider::SettingsProvider;
pub use supervisor::registry::{CancelToken, WorkerSupervisor};
pub use syncer::rsync::RsyncInvoker;
pub use traits::archive_sync::ArchiveSync;
pub use traits::audio_pipeline::AudioPipeline;
pub use traits::clock::Clock;
