//! WebSocket connection handling
//!
//! # Components
//!
//! - [`WsConnection`]: performs the opening handshake on a pair of stream
//!   halves and then reads and writes one frame at a time
//! - [`WsConfig`]: buffer sizes and the payload size limit
//!
//! Messages split over several frames are not reassembled and control
//! frames get no automatic reply; both are left to the caller, which sees
//! every frame with its `fin` bit and opcode.

mod config;
mod ws_connection;

pub use config::{DEFAULT_HANDSHAKE_BUFFER_SIZE, DEFAULT_READ_BUFFER_CAPACITY, WsConfig, WsConfigBuilder};
pub use ws_connection::WsConnection;
