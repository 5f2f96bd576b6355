/// Describes one audio pipeline invocation: where audio comes from and
/// which sinks are enabled.
///
/// Built per invocation from the current [`ConfigSnapshot`]; never
/// persisted. A job with both sinks enabled is a dual-output job (single
/// input split to broadcast and file); with one sink it is single-output.
///
/// [`ConfigSnapshot`]: super::config::ConfigSnapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioJobSpec {
    /// Capture device name or network source URL.
    pub input_source: String,
    /// Whether `input_source` is a network URL rather than a local device.
    pub network_input: bool,
    pub stream_enabled: bool,
    pub record_enabled: bool,
}

impl AudioJobSpec {
    fn new(stream_enabled: bool, record_enabled: bool) -> Self {
        Self {
            input_source: "default".into(),
            network_input: false,
            stream_enabled,
            record_enabled,
        }
    }

    /// Continuous broadcast job with no local segment.
    pub fn stream_only() -> Self {
        Self::new(true, false)
    }

    /// Bounded local segment job with no broadcast sink.
    pub fn record_only() -> Self {
        Self::new(false, true)
    }

    /// Single input split to both the broadcast sink and a local segment.
    pub fn dual_output() -> Self {
        Self::new(true, true)
    }

    /// Replace the default capture device with an explicit source.
    pub fn with_input(mut self, source: impl Into<String>, network: bool) -> Self {
        self.input_source = source.into();
        self.network_input = network;
        self
    }

    pub fn is_dual(&self) -> bool {
        self.stream_enabled && self.record_enabled
    }

    pub fn has_output(&self) -> bool {
        self.stream_enabled || self.record_enabled
    }
}
