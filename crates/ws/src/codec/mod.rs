//! `tokio_util` codec adapters for WebSocket frames
//!
//! - [`FrameDecoder`]: splits complete frames off a read buffer, waiting
//!   while a frame is still incomplete and enforcing a payload size limit
//! - [`FrameEncoder`]: appends encoded frames to a write buffer
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use micro_ws::codec::{FrameDecoder, FrameEncoder};
//! use micro_ws::protocol::Frame;
//! use tokio_util::codec::{Decoder, Encoder};
//!
//! let mut buffer = BytesMut::new();
//! FrameEncoder.encode(Frame::text("hello"), &mut buffer).unwrap();
//!
//! let frame = FrameDecoder::new().decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(&frame.payload[..], b"hello");
//! ```

mod frame_decoder;
mod frame_encoder;

pub use frame_decoder::{DEFAULT_MAX_PAYLOAD_SIZE, FrameDecoder};
pub use frame_encoder::FrameEncoder;
