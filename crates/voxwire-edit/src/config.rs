use voxwire_proto::MAX_PACKET_SIZE;

/// Default cap on edits held while no voxel server is known.
pub const DEFAULT_MAX_PENDING_MESSAGES: usize = 30;

/// Construction-time sender parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SenderConfig {
    /// Largest packet the sender will assemble.
    pub max_packet_size: usize,
    /// Combined cap on the two pre-server queues; zero disables
    /// pre-server buffering entirely.
    pub max_pending_messages: usize,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            max_packet_size: MAX_PACKET_SIZE,
            max_pending_messages: DEFAULT_MAX_PENDING_MESSAGES,
        }
    }
}

impl SenderConfig {
    /// Starts a fluent builder over the defaults.
    pub fn builder() -> SenderConfigBuilder {
        SenderConfigBuilder::default()
    }
}

/// Fluent builder for [`SenderConfig`].
#[derive(Debug, Clone, Default)]
pub struct SenderConfigBuilder {
    cfg: SenderConfig,
}

impl SenderConfigBuilder {
    pub fn max_packet_size(mut self, value: usize) -> Self {
        self.cfg.max_packet_size = value;
        self
    }

    pub fn max_pending_messages(mut self, value: usize) -> Self {
        self.cfg.max_pending_messages = value;
        self
    }

    pub fn build(self) -> SenderConfig {
        self.cfg
    }
}
