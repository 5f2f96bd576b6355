use crate::models::config::ConfigSnapshot;
use crate::models::error::RelayError;
use crate::models::job::AudioJobSpec;

/// Boundary to the external audio pipeline.
///
/// Implemented by [`FfmpegInvoker`] in production and by scripted mocks in
/// tests. One call runs one job to completion; a continuous streaming job
/// returns only when the underlying process exits.
///
/// [`FfmpegInvoker`]: crate::pipeline::ffmpeg::FfmpegInvoker
pub trait AudioPipeline: Send + Sync {
    /// Run one audio job to completion.
    ///
    /// Abnormal termination of the external tool surfaces as
    /// [`RelayError::Pipeline`].
    fn run_job(&self, spec: &AudioJobSpec, config: &ConfigSnapshot) -> Result<(), RelayError>;
}
