//! Frame encoder for use with `tokio_util::codec::FramedWrite`.

use bytes::BytesMut;
use tokio_util::codec::Encoder;
use tracing::trace;

use crate::protocol::{Frame, FrameError};

/// Encoder writing each [`Frame`] with [`Frame::encode_to`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameEncoder;

impl FrameEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder<Frame> for FrameEncoder {
    type Error = FrameError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        trace!(opcode = %item.opcode, payload_len = item.payload.len(), "encode frame");
        item.encode_to(dst);
        Ok(())
    }
}
