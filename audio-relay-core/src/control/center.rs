use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use crate::control::workers::{self, WorkerContext};
use crate::models::config::ConfigSnapshot;
use crate::models::error::RelayError;
use crate::models::job::AudioJobSpec;
use crate::pipeline::ffmpeg::FfmpegInvoker;
use crate::retry::policy::RetryPolicy;
use crate::sched::clock::SystemClock;
use crate::sched::scheduler::Scheduler;
use crate::settings::provider::SettingsProvider;
use crate::supervisor::registry::WorkerSupervisor;
use crate::syncer::rsync::RsyncInvoker;
use crate::traits::archive_sync::ArchiveSync;
use crate::traits::audio_pipeline::AudioPipeline;
use crate::traits::clock::Clock;

/// Toggleable subsystems, each backed by one named worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Streaming,
    Recording,
    Syncing,
}

impl Feature {
    pub const ALL: [Feature; 3] = [Feature::Streaming, Feature::Recording, Feature::Syncing];

    /// The worker name registered with the supervisor.
    pub fn worker_name(self) -> &'static str {
        match self {
            Feature::Streaming => "streaming",
            Feature::Recording => "recording",
            Feature::Syncing => "syncing",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.worker_name())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "streaming" | "stream" => Ok(Feature::Streaming),
            "recording" | "record" => Ok(Feature::Recording),
            "syncing" | "sync" => Ok(Feature::Syncing),
            other => Err(format!("unknown feature: {other}")),
        }
    }
}

/// Status document handed to control-surface callers.
#[derive(Debug, Clone, Serialize)]
pub struct SystemStatus {
    /// Worker name → liveness, for every registered worker.
    pub workers: BTreeMap<String, bool>,
    pub config: ConfigSnapshot,
}

/// Run-time control surface: feature toggles, status, one-shot capture.
///
/// Owns the worker supervisor and the production collaborators (system
/// clock, ffmpeg, rsync); tests inject doubles through
/// [`with_collaborators`](Self::with_collaborators). Callers get status
/// strings and typed errors, never panics.
pub struct ControlCenter {
    settings: Arc<SettingsProvider>,
    supervisor: WorkerSupervisor,
    clock: Arc<dyn Clock>,
    pipeline: Arc<dyn AudioPipeline>,
    syncer: Arc<dyn ArchiveSync>,
}

impl ControlCenter {
    pub fn new(settings: Arc<SettingsProvider>) -> Self {
        Self::with_collaborators(
            settings,
            Arc::new(SystemClock),
            Arc::new(FfmpegInvoker::new()),
            Arc::new(RsyncInvoker::new()),
        )
    }

    pub fn with_collaborators(
        settings: Arc<SettingsProvider>,
        clock: Arc<dyn Clock>,
        pipeline: Arc<dyn AudioPipeline>,
        syncer: Arc<dyn ArchiveSync>,
    ) -> Self {
        Self {
            settings,
            supervisor: WorkerSupervisor::new(),
            clock,
            pipeline,
            syncer,
        }
    }

    fn context(&self) -> WorkerContext {
        WorkerContext {
            settings: Arc::clone(&self.settings),
            clock: Arc::clone(&self.clock),
            pipeline: Arc::clone(&self.pipeline),
            syncer: Arc::clone(&self.syncer),
        }
    }

    /// Start or stop one feature's worker.
    ///
    /// Enabling an already-running feature reports the conflict without
    /// starting a duplicate; disabling an idle one reports "not found".
    pub fn toggle(&self, feature: Feature, enabled: bool) -> Result<String, RelayError> {
        if !enabled {
            self.supervisor.stop(feature.worker_name())?;
            return Ok(format!("{feature} stop requested"));
        }

        let ctx = self.context();
        let name = feature.worker_name();
        match feature {
            Feature::Streaming => {
                self.supervisor.start(name, move |cancel| workers::run_streaming(ctx, cancel))?
            }
            Feature::Recording => {
                self.supervisor.start(name, move |cancel| workers::run_recording(ctx, cancel))?
            }
            Feature::Syncing => {
                self.supervisor.start(name, move |cancel| workers::run_syncing(ctx, cancel))?
            }
        };
        Ok(format!("{feature} enabled"))
    }

    /// Apply the `[SystemSettings]` flags from the current snapshot: start
    /// what should run, stop what should not. Used at startup and after
    /// reloads.
    pub fn apply_system_flags(&self) {
        let system = self.settings.current().system;
        for feature in Feature::ALL {
            let desired = match feature {
                Feature::Streaming => system.enable_streaming,
                Feature::Recording => system.enable_recording,
                Feature::Syncing => system.enable_sync,
            };
            if desired == self.supervisor.is_live(feature.worker_name()) {
                continue;
            }
            match self.toggle(feature, desired) {
                Ok(message) => log::info!("{message}"),
                Err(e) => log::warn!("{feature}: {e}"),
            }
        }
    }

    /// Fire one immediate capture job (dual or single output) without
    /// registering a named worker.
    pub fn capture_once(&self, spec: AudioJobSpec) {
        let ctx = self.context();
        Scheduler::fire_once("capture", move || {
            let policy = RetryPolicy::from_snapshot(&ctx.settings.current());
            let result = policy.guard("capture_once", &ctx.settings, ctx.clock.as_ref(), |snapshot| {
                ctx.pipeline.run_job(&spec, &snapshot)
            });
            if let Err(e) = result {
                log::error!("one-shot capture failed: {e}");
            }
        });
    }

    pub fn status(&self) -> SystemStatus {
        SystemStatus {
            workers: self.supervisor.status(),
            config: (*self.settings.current()).clone(),
        }
    }

    pub fn status_json(&self) -> String {
        serde_json::to_string_pretty(&self.status())
            .unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
    }

    /// Reload settings without touching the workers. Callers re-apply the
    /// system flags if they want the new flags to take effect.
    pub fn reload(&self) -> Result<Arc<ConfigSnapshot>, RelayError> {
        self.settings.reload()
    }

    /// Request cancellation of every worker.
    pub fn shutdown(&self) {
        self.supervisor.stop_all();
    }
}
