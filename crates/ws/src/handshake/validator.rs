//! RFC 6455 upgrade request checks.
//!
//! Only the headers a WebSocket server has to see are checked, in this order:
//!
//! 1. `Connection` is `Upgrade` or `upgrade`
//! 2. `Upgrade` is `websocket`
//! 3. `Sec-WebSocket-Version` is `13`
//! 4. `Sec-WebSocket-Key` is present
//!
//! The first failing check is reported. The request line (verb, path and
//! HTTP version) is not looked at, and the key is not checked for length or
//! base64 alphabet.

use crate::handshake::header_scanner::extract;
use crate::protocol::HandshakeError;

pub const CONNECTION: &[u8] = b"Connection";
pub const UPGRADE: &[u8] = b"Upgrade";
pub const SEC_WEBSOCKET_VERSION: &[u8] = b"Sec-WebSocket-Version";
pub const SEC_WEBSOCKET_KEY: &[u8] = b"Sec-WebSocket-Key";

/// The only protocol version this crate speaks
pub const WEBSOCKET_VERSION: &[u8] = b"13";

/// Validates `buf` as a WebSocket upgrade request and returns the raw
/// `Sec-WebSocket-Key` value.
///
/// # Errors
///
/// Returns the [`HandshakeError`] variant of the first header that is
/// missing, unterminated or holds an unexpected value.
pub fn validate_upgrade(buf: &[u8]) -> Result<&[u8], HandshakeError> {
    let connection = extract(buf, CONNECTION).map_err(HandshakeError::invalid_connection_header)?;
    if connection != b"Upgrade" && connection != b"upgrade" {
        return Err(HandshakeError::invalid_connection_header(unexpected(connection)));
    }

    let upgrade = extract(buf, UPGRADE).map_err(HandshakeError::invalid_upgrade_header)?;
    if upgrade != b"websocket" {
        return Err(HandshakeError::invalid_upgrade_header(unexpected(upgrade)));
    }

    let version = extract(buf, SEC_WEBSOCKET_VERSION).map_err(HandshakeError::invalid_version)?;
    if version != WEBSOCKET_VERSION {
        return Err(HandshakeError::invalid_version(unexpected(version)));
    }

    extract(buf, SEC_WEBSOCKET_KEY).map_err(HandshakeError::missing_key)
}

/// Returns true if `buf` passes every check of [`validate_upgrade`].
pub fn is_valid_upgrade(buf: &[u8]) -> bool {
    validate_upgrade(buf).is_ok()
}

fn unexpected(value: &[u8]) -> String {
    format!("unexpected value \"{}\"", String::from_utf8_lossy(value))
}
