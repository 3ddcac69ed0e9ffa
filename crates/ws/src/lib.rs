//! The wire-level mechanics of RFC 6455 WebSocket connections
//!
//! This crate provides the pieces a WebSocket server needs between accepting
//! a TCP connection and handing messages to application code: recognizing an
//! upgrade request, answering it, and encoding/decoding frames. It is built
//! on top of tokio and keeps every step small and byte-exact.
//!
//! # Features
//!
//! - Upgrade request validation by byte scanning, without a general HTTP parser
//! - `Sec-WebSocket-Accept` computation and handshake responses
//! - Frame encoding/decoding with masking and 7/16/64-bit payload lengths
//! - Zero-copy decoding: payloads are unmasked in place
//! - `tokio_util` codecs and a framed connection type
//!
//! # Example
//!
//! ```no_run
//! use micro_ws::connection::{WsConfig, WsConnection};
//! use micro_ws::protocol::Opcode;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn, Level};
//! use tracing_subscriber::FmtSubscriber;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Initialize logging
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::INFO)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     info!(port = 8080, "start listening");
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             let mut connection = match WsConnection::accept(reader, writer, &WsConfig::default()).await {
//!                 Ok(connection) => connection,
//!                 Err(e) => {
//!                     warn!(cause = %e, "handshake failed");
//!                     return;
//!                 }
//!             };
//!
//!             while let Some(Ok(frame)) = connection.next_frame().await {
//!                 if frame.opcode == Opcode::CLOSE {
//!                     break;
//!                 }
//!                 info!(opcode = %frame.opcode, len = frame.payload.len(), "receive frame");
//!             }
//!         });
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`handshake`]: Header scanning, upgrade validation and handshake responses
//! - [`protocol`]: Frame and opcode types, the frame wire format, error types
//! - [`codec`]: `tokio_util` decoder/encoder adapters for frames
//! - [`connection`]: Handshake plus framed I/O over a pair of stream halves
//!
//! # Error Handling
//!
//! The crate uses custom error types that implement `std::error::Error`:
//!
//! - [`protocol::WsError`]: Top-level error type
//! - [`protocol::ScanError`]: Header scanning errors
//! - [`protocol::HandshakeError`]: Upgrade validation and handshake I/O errors
//! - [`protocol::FrameError`]: Frame decoding errors
//!
//! # Limitations
//!
//! - The upgrade request must arrive in a single read
//! - The request line (verb, path, HTTP version) is not validated
//! - The response always announces `Sec-WebSocket-Version: 13`
//! - No extensions (e.g. permessage-deflate); reserved bits are passed through
//! - No message reassembly and no automatic ping/pong or close handling
//! - No TLS support (use a reverse proxy for `wss://`)

pub mod codec;
pub mod connection;
pub mod handshake;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
