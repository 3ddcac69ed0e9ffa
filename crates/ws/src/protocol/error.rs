use std::fmt;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WsError {
    #[error("handshake error: {source}")]
    HandshakeError {
        #[from]
        source: HandshakeError,
    },

    #[error("frame error: {source}")]
    FrameError {
        #[from]
        source: FrameError,
    },
}

/// Failures of the byte-level header scanner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("param \"{name}\" not found in buffer")]
    ParamNotFound { name: String },

    #[error("no CRLF found")]
    NoCrlf,
}

impl ScanError {
    pub fn param_not_found(name: &[u8]) -> Self {
        Self::ParamNotFound { name: String::from_utf8_lossy(name).into_owned() }
    }
}

#[derive(Error, Debug)]
pub enum HandshakeError {
    #[error("invalid or nonexistent \"Connection\" header: {reason}")]
    InvalidConnectionHeader { reason: String },

    #[error("invalid or nonexistent \"Upgrade\" header: {reason}")]
    InvalidUpgradeHeader { reason: String },

    #[error("invalid or nonexistent \"Sec-WebSocket-Version\" header: {reason}")]
    InvalidVersion { reason: String },

    #[error("invalid or nonexistent \"Sec-WebSocket-Key\" header: {reason}")]
    MissingKey { reason: String },

    #[error("failed to read from connection: {source}")]
    ReadFailure { source: io::Error },

    #[error("failed to write handshake response: {source}")]
    WriteFailure { source: io::Error },
}

impl HandshakeError {
    pub fn invalid_connection_header<S: ToString>(str: S) -> Self {
        Self::InvalidConnectionHeader { reason: str.to_string() }
    }

    pub fn invalid_upgrade_header<S: ToString>(str: S) -> Self {
        Self::InvalidUpgradeHeader { reason: str.to_string() }
    }

    pub fn invalid_version<S: ToString>(str: S) -> Self {
        Self::InvalidVersion { reason: str.to_string() }
    }

    pub fn missing_key<S: ToString>(str: S) -> Self {
        Self::MissingKey { reason: str.to_string() }
    }

    pub fn read_failure<E: Into<io::Error>>(e: E) -> Self {
        Self::ReadFailure { source: e.into() }
    }

    pub fn write_failure<E: Into<io::Error>>(e: E) -> Self {
        Self::WriteFailure { source: e.into() }
    }

    /// Returns true if the request itself was rejected, as opposed to the
    /// connection failing underneath the handshake.
    pub fn is_validation_error(&self) -> bool {
        !matches!(self, Self::ReadFailure { .. } | Self::WriteFailure { .. })
    }
}

/// The point of the frame layout at which a buffer ran out.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FramePart {
    /// The two fixed header bytes
    Header,
    /// The 16-bit or 64-bit extended payload length
    ExtendedLength,
    /// The 4-byte masking key
    MaskKey,
    /// The payload itself
    Payload,
}

impl fmt::Display for FramePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FramePart::Header => "header",
            FramePart::ExtendedLength => "extended payload length",
            FramePart::MaskKey => "mask key",
            FramePart::Payload => "payload",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("frame too short to read {part}, need {needed} bytes but only {available} available")]
    TooShort { part: FramePart, needed: u64, available: usize },

    #[error("malformed frame: {reason}")]
    Malformed { reason: String },

    #[error("payload size too large, current: {size} exceed the limit {max_size}")]
    PayloadTooLarge { size: u64, max_size: usize },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl FrameError {
    pub fn too_short(part: FramePart, needed: u64, available: usize) -> Self {
        Self::TooShort { part, needed, available }
    }

    pub fn malformed<S: ToString>(str: S) -> Self {
        Self::Malformed { reason: str.to_string() }
    }

    pub fn payload_too_large(size: u64, max_size: usize) -> Self {
        Self::PayloadTooLarge { size, max_size }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Returns true if more input could turn this failure into a complete frame.
    pub fn is_too_short(&self) -> bool {
        matches!(self, Self::TooShort { .. })
    }
}
