//! The server side of the opening handshake.
//!
//! [`upgrade`] reads the client's upgrade request with a single read, checks
//! it with [`validate_upgrade`] and answers with either
//! `101 Switching Protocols` or `400 Bad Request`.
//!
//! The whole request has to arrive in that one read. A request split across
//! several reads fails validation (or CRLF detection) and gets a 400.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::{BufMut, BytesMut};
use http::StatusCode;
use sha1::{Digest, Sha1};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{error, info, trace, warn};

use crate::handshake::validator::validate_upgrade;
use crate::protocol::HandshakeError;

/// GUID appended to the client key before hashing, see RFC 6455 section 1.3
pub const WEBSOCKET_GUID: &str = "258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// Initial buffer size allocated for response serialization
const INIT_RESPONSE_SIZE: usize = 256;

/// Computes the `Sec-WebSocket-Accept` value for a client's `Sec-WebSocket-Key`.
///
/// The key is used exactly as sent, followed by [`WEBSOCKET_GUID`], then
/// SHA-1 hashed and base64 encoded.
pub fn compute_accept_key(key: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(key);
    hasher.update(WEBSOCKET_GUID.as_bytes());
    BASE64.encode(hasher.finalize())
}

/// A response to an upgrade request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeResponse {
    /// The upgrade was accepted
    SwitchingProtocols { accept: String },
    /// The upgrade request was rejected
    BadRequest,
}

impl HandshakeResponse {
    /// Builds the accepting response for a client's `Sec-WebSocket-Key`.
    pub fn accept(key: &[u8]) -> Self {
        Self::SwitchingProtocols { accept: compute_accept_key(key) }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            HandshakeResponse::SwitchingProtocols { .. } => StatusCode::SWITCHING_PROTOCOLS,
            HandshakeResponse::BadRequest => StatusCode::BAD_REQUEST,
        }
    }

    /// Appends the response bytes to `dst`.
    ///
    /// The accepting response always announces version 13 and does not echo
    /// the client's HTTP or WebSocket version.
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(INIT_RESPONSE_SIZE);

        let status = self.status();
        dst.put_slice(b"HTTP/1.1 ");
        dst.put_slice(status.as_str().as_bytes());
        dst.put_u8(b' ');
        dst.put_slice(status.canonical_reason().unwrap_or_default().as_bytes());
        dst.put_slice(b"\r\n");

        if let HandshakeResponse::SwitchingProtocols { accept } = self {
            dst.put_slice(b"Sec-WebSocket-Version: 13\r\n");
            dst.put_slice(b"Upgrade: websocket\r\n");
            dst.put_slice(b"Connection: Upgrade\r\n");
            dst.put_slice(b"Sec-WebSocket-Accept: ");
            dst.put_slice(accept.as_bytes());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
    }

    pub fn to_bytes(&self) -> BytesMut {
        let mut dst = BytesMut::new();
        self.encode(&mut dst);
        dst
    }
}

/// Performs the server side of the opening handshake.
///
/// Reads once from `reader` into `buf`, validates what was read and writes the
/// response to `writer`. On success the connection is ready for frames.
///
/// # Errors
///
/// - [`HandshakeError::ReadFailure`] if the read fails; nothing is written
/// - the validation error if the request is rejected, after the 400 response
///   has been written
/// - [`HandshakeError::WriteFailure`] if writing either response fails
pub async fn upgrade<R, W>(reader: &mut R, writer: &mut W, buf: &mut [u8]) -> Result<(), HandshakeError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let n = reader.read(buf).await.map_err(HandshakeError::read_failure)?;
    trace!(read_bytes = n, "read upgrade request");

    let response = match validate_upgrade(&buf[..n]) {
        Ok(key) => HandshakeResponse::accept(key),
        Err(e) => {
            warn!(cause = %e, "reject websocket upgrade request");
            send_response(writer, &HandshakeResponse::BadRequest).await?;
            return Err(e);
        }
    };

    send_response(writer, &response).await?;
    info!("websocket upgrade accepted");
    Ok(())
}

async fn send_response<W>(writer: &mut W, response: &HandshakeResponse) -> Result<(), HandshakeError>
where
    W: AsyncWrite + Unpin,
{
    let bytes = response.to_bytes();
    let result = match writer.write_all(&bytes).await {
        Ok(()) => writer.flush().await,
        Err(e) => Err(e),
    };

    result.map_err(|e| {
        error!(cause = %e, status = %response.status(), "failed to write handshake response");
        HandshakeError::write_failure(e)
    })
}
