//! Streaming frame decoder for use with `tokio_util::codec::FramedRead`.
//!
//! The decoder keeps no state between frames. Each call inspects the header
//! at the front of the buffer and either waits for more input or splits
//! exactly one frame off and hands it to [`Frame::deserialize`].

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::{Frame, FrameError, FrameHead};

/// Largest payload accepted by default
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 64 * 1024 * 1024;

/// Decoder producing one [`Frame`] per complete frame in the input.
///
/// Frames whose declared payload exceeds `max_payload_size` are rejected as
/// soon as their header is readable, before any payload is buffered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameDecoder {
    max_payload_size: usize,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_max_payload_size(max_payload_size: usize) -> Self {
        Self { max_payload_size }
    }

    pub fn max_payload_size(&self) -> usize {
        self.max_payload_size
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self { max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE }
    }
}

impl Decoder for FrameDecoder {
    type Item = Frame;
    type Error = FrameError;

    /// Attempts to decode one frame from the front of `src`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(frame))` if a complete frame was split off `src`
    /// - `Ok(None)` if the header or payload is still incomplete
    /// - `Err(FrameError::PayloadTooLarge)` if the declared payload exceeds the limit
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let head = match FrameHead::parse(src) {
            Ok(head) => head,
            Err(e) if e.is_too_short() => return Ok(None),
            Err(e) => return Err(e),
        };

        ensure!(
            head.payload_len <= self.max_payload_size as u64,
            FrameError::payload_too_large(head.payload_len, self.max_payload_size)
        );

        let frame_len = match head.complete_len(src.len()) {
            Ok(frame_len) => frame_len,
            Err(e) if e.is_too_short() => {
                // bounded by max_payload_size plus at most 14 header bytes
                let missing = head
                    .frame_len()
                    .ok()
                    .and_then(|len| usize::try_from(len).ok())
                    .map_or(0, |len| len - src.len());
                trace!(missing_bytes = missing, "wait for the rest of the frame");
                src.reserve(missing);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        Frame::deserialize(src.split_to(frame_len)).map(Some)
    }
}
