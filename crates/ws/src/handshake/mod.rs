//! The RFC 6455 opening handshake.
//!
//! The request flows through three steps:
//!
//! - [`header_scanner`]: pulls single header values out of the raw request
//!   bytes without a general HTTP parser
//! - [`validator`]: checks the headers a WebSocket upgrade requires
//! - [`responder`]: computes `Sec-WebSocket-Accept` and writes the
//!   `101 Switching Protocols` or `400 Bad Request` response
//!
//! # Example
//!
//! ```no_run
//! use micro_ws::handshake::upgrade;
//! use tokio::net::TcpStream;
//!
//! # async fn run(stream: TcpStream) -> Result<(), micro_ws::protocol::HandshakeError> {
//! let (mut reader, mut writer) = stream.into_split();
//! let mut buf = [0u8; 8 * 1024];
//! upgrade(&mut reader, &mut writer, &mut buf).await?;
//! # Ok(())
//! # }
//! ```

pub mod header_scanner;
pub mod responder;
pub mod validator;

pub use header_scanner::{extract, read_until_crlf};
pub use responder::{HandshakeResponse, WEBSOCKET_GUID, compute_accept_key, upgrade};
pub use validator::{is_valid_upgrade, validate_upgrade};
