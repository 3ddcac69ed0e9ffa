use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info};

use crate::codec::{FrameDecoder, FrameEncoder};
use crate::connection::WsConfig;
use crate::handshake::upgrade;
use crate::protocol::{Frame, FrameError, HandshakeError};

/// A WebSocket connection over a reader and a writer half.
///
/// `WsConnection` handles:
/// - the opening handshake ([`WsConnection::accept`])
/// - decoding incoming frames, one per [`WsConnection::next_frame`] call
/// - encoding and flushing outgoing frames
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct WsConnection<R, W> {
    framed_read: FramedRead<R, FrameDecoder>,
    framed_write: FramedWrite<W, FrameEncoder>,
}

impl<R, W> WsConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Runs the server side of the opening handshake and returns the
    /// upgraded connection.
    ///
    /// The upgrade request has to arrive in a single read of at most
    /// `config.handshake_buffer_size()` bytes.
    ///
    /// # Errors
    ///
    /// Returns the [`HandshakeError`] from [`upgrade`]. For a rejected
    /// request the `400 Bad Request` response has already been sent.
    pub async fn accept(mut reader: R, mut writer: W, config: &WsConfig) -> Result<Self, HandshakeError> {
        let mut buf = vec![0u8; config.handshake_buffer_size()];
        upgrade(&mut reader, &mut writer, &mut buf).await?;
        Ok(Self::from_upgraded(reader, writer, config))
    }

    /// Wraps stream halves on which the handshake has already completed.
    pub fn from_upgraded(reader: R, writer: W, config: &WsConfig) -> Self {
        let decoder = FrameDecoder::with_max_payload_size(config.max_payload_size());
        Self {
            framed_read: FramedRead::with_capacity(reader, decoder, config.read_buffer_capacity()),
            framed_write: FramedWrite::new(writer, FrameEncoder),
        }
    }

    /// Reads the next frame.
    ///
    /// Returns `None` once the peer has closed the stream. A stream that ends
    /// in the middle of a frame yields an error instead.
    pub async fn next_frame(&mut self) -> Option<Result<Frame, FrameError>> {
        let next = self.framed_read.next().await;
        match &next {
            Some(Ok(frame)) => debug!(opcode = %frame.opcode, fin = frame.fin, payload_len = frame.payload.len(), "receive frame"),
            Some(Err(e)) => debug!(cause = %e, "can't decode frame"),
            None => info!("peer closed websocket stream"),
        }
        next
    }

    /// Writes a frame and flushes the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Io`] if writing or flushing fails.
    pub async fn send_frame(&mut self, frame: Frame) -> Result<(), FrameError> {
        self.framed_write.send(frame).await
    }

    /// Buffers a frame without flushing, for writing several frames at once.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Io`] if the write buffer had to be drained and that failed.
    pub async fn feed_frame(&mut self, frame: Frame) -> Result<(), FrameError> {
        self.framed_write.feed(frame).await
    }

    /// Flushes frames buffered by [`WsConnection::feed_frame`].
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Io`] if writing or flushing fails.
    pub async fn flush(&mut self) -> Result<(), FrameError> {
        SinkExt::<Frame>::flush(&mut self.framed_write).await
    }

    /// Returns the underlying reader and writer.
    ///
    /// Bytes already read but not yet decoded are dropped.
    pub fn into_inner(self) -> (R, W) {
        (self.framed_read.into_inner(), self.framed_write.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handshake::HandshakeResponse;
    use crate::protocol::Opcode;
    use bytes::BytesMut;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, ReadHalf, WriteHalf};

    const REQUEST: &[u8] = b"GET /chat HTTP/1.1\r\nHost: server.example.com\r\nUpgrade: websocket\r\nConnection: Upgrade\r\nSec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\nSec-WebSocket-Version: 13\r\n\r\n";

    type ServerConnection = WsConnection<ReadHalf<DuplexStream>, WriteHalf<DuplexStream>>;

    async fn handshake(config: &WsConfig) -> (DuplexStream, ServerConnection) {
        let (mut client, server) = tokio::io::duplex(64 * 1024);
        let (reader, writer) = tokio::io::split(server);

        client.write_all(REQUEST).await.unwrap();
        let connection = WsConnection::accept(reader, writer, config).await.unwrap();

        let expected = HandshakeResponse::accept(b"dGhlIHNhbXBsZSBub25jZQ==").to_bytes();
        let mut response = vec![0u8; expected.len()];
        client.read_exact(&mut response).await.unwrap();
        assert_eq!(&response[..], &expected[..]);

        (client, connection)
    }

    #[tokio::test]
    async fn receive_masked_client_frames() {
        let (mut client, mut connection) = handshake(&WsConfig::default()).await;

        let mut bytes = BytesMut::new();
        Frame::text("Hello, ").with_fin(false).with_mask([1, 2, 3, 4]).encode_to(&mut bytes);
        Frame::continuation("world!").with_mask([5, 6, 7, 8]).encode_to(&mut bytes);
        client.write_all(&bytes).await.unwrap();

        let first = connection.next_frame().await.unwrap().unwrap();
        assert_eq!(first.opcode, Opcode::TEXT);
        assert!(!first.fin);
        assert_eq!(&first.payload[..], b"Hello, ");

        let second = connection.next_frame().await.unwrap().unwrap();
        assert_eq!(second.opcode, Opcode::CONTINUATION);
        assert!(second.fin);
        assert_eq!(&second.payload[..], b"world!");

        drop(client);
        assert!(connection.next_frame().await.is_none());
    }

    #[tokio::test]
    async fn send_unmasked_server_frames() {
        let (mut client, mut connection) = handshake(&WsConfig::default()).await;

        connection.send_frame(Frame::text("hi")).await.unwrap();
        connection.feed_frame(Frame::binary(vec![0u8; 200])).await.unwrap();
        connection.feed_frame(Frame::close(vec![0x03, 0xE8])).await.unwrap();
        connection.flush().await.unwrap();

        let mut expected = BytesMut::new();
        Frame::text("hi").encode_to(&mut expected);
        Frame::binary(vec![0u8; 200]).encode_to(&mut expected);
        Frame::close(vec![0x03, 0xE8]).encode_to(&mut expected);

        let mut received = vec![0u8; expected.len()];
        client.read_exact(&mut received).await.unwrap();
        assert_eq!(&received[..], &expected[..]);
    }

    #[tokio::test]
    async fn reject_frame_over_payload_limit() {
        let config = WsConfig::builder().max_payload_size(16).build();
        let (mut client, mut connection) = handshake(&config).await;

        client.write_all(&Frame::binary(vec![0u8; 17]).with_mask([1, 1, 1, 1]).serialize()).await.unwrap();

        let result = connection.next_frame().await.unwrap();
        assert!(matches!(result, Err(FrameError::PayloadTooLarge { size: 17, max_size: 16 })));
    }

    #[tokio::test]
    async fn stream_ending_mid_frame_is_an_error() {
        let (mut client, mut connection) = handshake(&WsConfig::default()).await;

        client.write_all(&Frame::text("truncated").serialize()[..5]).await.unwrap();
        drop(client);

        assert!(matches!(connection.next_frame().await, Some(Err(FrameError::Io { .. }))));
    }

    #[tokio::test]
    async fn accept_rejects_bad_request() {
        let (mut client, server) = tokio::io::duplex(4096);
        let (reader, writer) = tokio::io::split(server);

        client.write_all(b"GET / HTTP/1.1\r\nConnection: Upgrade\r\nUpgrade: h2c\r\n\r\n").await.unwrap();
        let result = WsConnection::accept(reader, writer, &WsConfig::default()).await;
        assert!(matches!(result, Err(HandshakeError::InvalidUpgradeHeader { .. })));

        let mut response = Vec::new();
        client.read_to_end(&mut response).await.unwrap();
        assert_eq!(response, b"HTTP/1.1 400 Bad Request\r\n\r\n");
    }
}
