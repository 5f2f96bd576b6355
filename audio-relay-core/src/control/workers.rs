use std::sync::Arc;
use std::time::Duration;

use crate::models::job::AudioJobSpec;
use crate::retry::policy::RetryPolicy;
use crate::sched::scheduler::Scheduler;
use crate::settings::provider::SettingsProvider;
use crate::supervisor::registry::CancelToken;
use crate::traits::archive_sync::ArchiveSync;
use crate::traits::audio_pipeline::AudioPipeline;
use crate::traits::clock::Clock;

/// Pause between restarts of the continuous stream, so a permanently
/// broken pipeline cannot hot-loop between exhaustion cycles.
const STREAM_RESTART_PAUSE: Duration = Duration::from_secs(5);

/// Shared collaborators handed to every worker body.
#[derive(Clone)]
pub(crate) struct WorkerContext {
    pub settings: Arc<SettingsProvider>,
    pub clock: Arc<dyn Clock>,
    pub pipeline: Arc<dyn AudioPipeline>,
    pub syncer: Arc<dyn ArchiveSync>,
}

/// Continuous broadcast: run the stream job, and whenever the pipeline
/// exits (encoder gone, network drop, retries exhausted) start over until
/// cancelled.
pub(crate) fn run_streaming(ctx: WorkerContext, cancel: CancelToken) {
    while !cancel.is_cancelled() {
        let policy = RetryPolicy::from_snapshot(&ctx.settings.current());
        let spec = AudioJobSpec::stream_only();
        let result = policy.guard("stream_audio", &ctx.settings, ctx.clock.as_ref(), |snapshot| {
            ctx.pipeline.run_job(&spec, &snapshot)
        });
        match result {
            Ok(()) => log::info!("stream pipeline exited; restarting"),
            Err(e) => log::error!("streaming halted: {e}"),
        }
        if cancel.is_cancelled() {
            break;
        }
        ctx.clock.sleep(STREAM_RESTART_PAUSE);
    }
    log::info!("streaming worker stopped");
}

/// Hourly-aligned segment recording. Exhaustion in one firing is logged
/// and the loop continues to the next boundary.
pub(crate) fn run_recording(ctx: WorkerContext, cancel: CancelToken) {
    let scheduler = Scheduler::new(Arc::clone(&ctx.clock), Arc::clone(&ctx.settings));
    scheduler.run_hourly("recording", &cancel, move || {
        let policy = RetryPolicy::from_snapshot(&ctx.settings.current());
        let spec = AudioJobSpec::record_only();
        let result = policy.guard("record_segment", &ctx.settings, ctx.clock.as_ref(), |snapshot| {
            ctx.pipeline.run_job(&spec, &snapshot)
        });
        if let Err(e) = result {
            log::error!("segment recording failed: {e}");
        }
    });
}

/// Interval-driven archive mirroring.
pub(crate) fn run_syncing(ctx: WorkerContext, cancel: CancelToken) {
    let scheduler = Scheduler::new(Arc::clone(&ctx.clock), Arc::clone(&ctx.settings));
    scheduler.run_interval("syncing", &cancel, move || {
        let policy = RetryPolicy::from_snapshot(&ctx.settings.current());
        let result = policy.guard("sync_recordings", &ctx.settings, ctx.clock.as_ref(), |snapshot| {
            ctx.syncer.mirror(
                &snapshot.local_recording.recording_root_dir,
                &snapshot.remote_server.sync_path,
            )
        });
        if let Err(e) = result {
            log::error!("archive sync failed: {e}");
        }
    });
}
