use crate::codec::DEFAULT_MAX_PAYLOAD_SIZE;

/// Default size of the scratch buffer the upgrade request is read into
pub const DEFAULT_HANDSHAKE_BUFFER_SIZE: usize = 8 * 1024;

/// Default initial capacity of the frame read buffer
pub const DEFAULT_READ_BUFFER_CAPACITY: usize = 8 * 1024;

/// Settings for a [`WsConnection`](crate::connection::WsConnection).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WsConfig {
    handshake_buffer_size: usize,
    read_buffer_capacity: usize,
    max_payload_size: usize,
}

impl WsConfig {
    pub fn builder() -> WsConfigBuilder {
        WsConfigBuilder::new()
    }

    /// Size of the buffer used for the single handshake read. An upgrade
    /// request larger than this is cut off and rejected.
    pub fn handshake_buffer_size(&self) -> usize {
        self.handshake_buffer_size
    }

    pub fn read_buffer_capacity(&self) -> usize {
        self.read_buffer_capacity
    }

    /// Largest declared payload accepted from the peer
    pub fn max_payload_size(&self) -> usize {
        self.max_payload_size
    }
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            handshake_buffer_size: DEFAULT_HANDSHAKE_BUFFER_SIZE,
            read_buffer_capacity: DEFAULT_READ_BUFFER_CAPACITY,
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WsConfigBuilder {
    config: WsConfig,
}

impl WsConfigBuilder {
    fn new() -> Self {
        Self { config: WsConfig::default() }
    }

    #[must_use]
    pub fn handshake_buffer_size(mut self, size: usize) -> Self {
        self.config.handshake_buffer_size = size;
        self
    }

    #[must_use]
    pub fn read_buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.read_buffer_capacity = capacity;
        self
    }

    #[must_use]
    pub fn max_payload_size(mut self, size: usize) -> Self {
        self.config.max_payload_size = size;
        self
    }

    pub fn build(self) -> WsConfig {
        self.config
    }
}
