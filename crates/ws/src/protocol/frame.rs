//! The WebSocket frame and its wire representation.
//!
//! A [`Frame`] is one unit of transport as laid out in RFC 6455 section 5.2.
//! Decoding and encoding are pure transforms over caller-supplied memory:
//! no I/O happens here and no state is kept between calls, so independent
//! buffers can be processed concurrently.
//!
//! Fragmented messages are not reassembled. Each call handles exactly one
//! frame and leaves `fin`/`opcode` interpretation across frames to the caller.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::ensure;
use crate::protocol::bits::{self, EXTENDED_LEN_16, EXTENDED_LEN_64, MAX_INLINE_LEN};
use crate::protocol::{FrameError, FramePart, Opcode};

/// Size of the masking key in bytes
pub const MASK_KEY_LEN: usize = 4;

/// XORs `payload` with `mask_key`, cycling through the key every four bytes.
///
/// The operation is its own inverse, so the same call masks and unmasks.
#[inline]
pub fn apply_mask(payload: &mut [u8], mask_key: [u8; MASK_KEY_LEN]) {
    for (i, byte) in payload.iter_mut().enumerate() {
        *byte ^= mask_key[i % MASK_KEY_LEN];
    }
}

/// The decoded header of a frame, without its payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools, reason = "one field per flag bit of the wire header")]
pub struct FrameHead {
    pub fin: bool,
    pub rsv1: bool,
    pub rsv2: bool,
    pub rsv3: bool,
    pub opcode: Opcode,
    pub mask_key: Option<[u8; MASK_KEY_LEN]>,
    /// Declared payload length
    pub payload_len: u64,
    /// Number of bytes in front of the payload: fixed bytes, extended length and mask key
    pub header_len: usize,
}

impl FrameHead {
    /// Parses the frame header at the start of `buf`.
    ///
    /// Only the header is inspected; the payload does not need to be present.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::TooShort`] naming the part of the header that
    /// `buf` ends in front of: the two fixed bytes, the extended length or
    /// the mask key.
    pub fn parse(buf: &[u8]) -> Result<Self, FrameError> {
        ensure!(buf.len() >= 2, FrameError::too_short(FramePart::Header, 2, buf.len()));

        let first = buf[0];
        let second = buf[1];

        let (payload_len, mut header_len) = match bits::base_len(second) {
            EXTENDED_LEN_16 => {
                ensure!(buf.len() >= 4, FrameError::too_short(FramePart::ExtendedLength, 4, buf.len()));
                (u64::from(u16::from_be_bytes([buf[2], buf[3]])), 4)
            }
            EXTENDED_LEN_64 => {
                ensure!(buf.len() >= 10, FrameError::too_short(FramePart::ExtendedLength, 10, buf.len()));
                let mut extended = [0u8; 8];
                extended.copy_from_slice(&buf[2..10]);
                (u64::from_be_bytes(extended), 10)
            }
            len => (u64::from(len), 2),
        };

        let mask_key = if bits::masked(second) {
            let key_end = header_len + MASK_KEY_LEN;
            ensure!(buf.len() >= key_end, FrameError::too_short(FramePart::MaskKey, key_end as u64, buf.len()));
            let mut key = [0u8; MASK_KEY_LEN];
            key.copy_from_slice(&buf[header_len..key_end]);
            header_len = key_end;
            Some(key)
        } else {
            None
        };

        Ok(Self {
            fin: bits::fin(first),
            rsv1: bits::rsv1(first),
            rsv2: bits::rsv2(first),
            rsv3: bits::rsv3(first),
            opcode: bits::opcode(first),
            mask_key,
            payload_len,
            header_len,
        })
    }

    #[inline]
    pub fn is_masked(&self) -> bool {
        self.mask_key.is_some()
    }

    /// Total length of the frame on the wire: header plus declared payload.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Malformed`] if the sum does not fit in a `u64`.
    #[inline]
    pub fn frame_len(&self) -> Result<u64, FrameError> {
        (self.header_len as u64)
            .checked_add(self.payload_len)
            .ok_or_else(|| FrameError::malformed(format!("payload length {} overflows the frame length", self.payload_len)))
    }

    /// Checks that `available` bytes hold the whole frame and returns its length.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::TooShort`] for [`FramePart::Payload`] when the
    /// declared payload does not fit in `available` bytes, and
    /// [`FrameError::Malformed`] when the declared length cannot be represented.
    pub fn complete_len(&self, available: usize) -> Result<usize, FrameError> {
        let frame_len = self.frame_len()?;
        ensure!(available as u64 >= frame_len, FrameError::too_short(FramePart::Payload, frame_len, available));
        usize::try_from(frame_len).map_err(|_| FrameError::malformed(format!("frame length {frame_len} is not addressable")))
    }

    fn into_frame(self, payload: Bytes) -> Frame {
        Frame {
            fin: self.fin,
            rsv1: self.rsv1,
            rsv2: self.rsv2,
            rsv3: self.rsv3,
            opcode: self.opcode,
            mask_key: self.mask_key,
            payload,
        }
    }
}

/// A single WebSocket frame.
///
/// `payload` always holds the unmasked application data. `mask_key` is
/// `Some` exactly when the frame is masked on the wire; the key is applied
/// while encoding and removed while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools, reason = "one field per flag bit of the wire header")]
pub struct Frame {
    pub fin: bool,
    pub rsv1: bool,
    pub rsv2: bool,
    pub rsv3: bool,
    pub opcode: Opcode,
    pub mask_key: Option<[u8; MASK_KEY_LEN]>,
    pub payload: Bytes,
}

impl Frame {
    /// Creates a final, unmasked frame with all reserved bits cleared.
    pub fn new(opcode: Opcode, payload: impl Into<Bytes>) -> Self {
        Self { fin: true, rsv1: false, rsv2: false, rsv3: false, opcode, mask_key: None, payload: payload.into() }
    }

    pub fn text(payload: impl Into<Bytes>) -> Self {
        Self::new(Opcode::TEXT, payload)
    }

    pub fn binary(payload: impl Into<Bytes>) -> Self {
        Self::new(Opcode::BINARY, payload)
    }

    pub fn continuation(payload: impl Into<Bytes>) -> Self {
        Self::new(Opcode::CONTINUATION, payload)
    }

    pub fn close(payload: impl Into<Bytes>) -> Self {
        Self::new(Opcode::CLOSE, payload)
    }

    pub fn ping(payload: impl Into<Bytes>) -> Self {
        Self::new(Opcode::PING, payload)
    }

    pub fn pong(payload: impl Into<Bytes>) -> Self {
        Self::new(Opcode::PONG, payload)
    }

    #[must_use]
    pub fn with_fin(mut self, fin: bool) -> Self {
        self.fin = fin;
        self
    }

    #[must_use]
    pub fn with_rsv(mut self, rsv1: bool, rsv2: bool, rsv3: bool) -> Self {
        self.rsv1 = rsv1;
        self.rsv2 = rsv2;
        self.rsv3 = rsv3;
        self
    }

    #[must_use]
    pub fn with_mask(mut self, mask_key: [u8; MASK_KEY_LEN]) -> Self {
        self.mask_key = Some(mask_key);
        self
    }

    #[inline]
    pub fn is_masked(&self) -> bool {
        self.mask_key.is_some()
    }

    /// Decodes one frame from the start of `buf`, taking ownership of it.
    ///
    /// The payload is unmasked in place and returned without copying, as a
    /// view into the memory that `buf` owned. Bytes following the frame are
    /// dropped together with the rest of the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::TooShort`] when `buf` ends before the header,
    /// extended length, mask key or declared payload is complete. A frame is
    /// never truncated or padded to fit.
    pub fn deserialize(mut buf: BytesMut) -> Result<Self, FrameError> {
        let head = FrameHead::parse(&buf)?;
        let frame_len = head.complete_len(buf.len())?;
        trace!(header_len = head.header_len, payload_len = head.payload_len, "parsed frame head");

        buf.truncate(frame_len);
        let mut payload = buf.split_off(head.header_len);
        if let Some(mask_key) = head.mask_key {
            apply_mask(&mut payload, mask_key);
        }

        Ok(head.into_frame(payload.freeze()))
    }

    /// Encodes this frame into a freshly allocated buffer.
    pub fn serialize(&self) -> BytesMut {
        let mut dst = BytesMut::with_capacity(self.encoded_len());
        self.encode_to(&mut dst);
        dst
    }

    /// Appends the wire representation of this frame to `dst`.
    ///
    /// The payload length uses the shortest encoding that holds it, and the
    /// payload is masked in the output when a mask key is set.
    pub fn encode_to(&self, dst: &mut BytesMut) {
        dst.reserve(self.encoded_len());

        let masked = self.is_masked();
        dst.put_u8(bits::pack_first_byte(self.fin, self.rsv1, self.rsv2, self.rsv3, self.opcode));

        let payload_len = self.payload.len();
        match u8::try_from(payload_len) {
            Ok(len) if len <= MAX_INLINE_LEN => dst.put_u8(bits::pack_second_byte(masked, len)),
            _ => match u16::try_from(payload_len) {
                Ok(len) => {
                    dst.put_u8(bits::pack_second_byte(masked, EXTENDED_LEN_16));
                    dst.put_u16(len);
                }
                Err(_) => {
                    dst.put_u8(bits::pack_second_byte(masked, EXTENDED_LEN_64));
                    dst.put_u64(payload_len as u64);
                }
            },
        }

        match self.mask_key {
            Some(mask_key) => {
                dst.put_slice(&mask_key);
                let payload_start = dst.len();
                dst.put_slice(&self.payload);
                apply_mask(&mut dst[payload_start..], mask_key);
            }
            None => dst.put_slice(&self.payload),
        }
    }

    /// Number of bytes [`Frame::encode_to`] appends for this frame.
    pub fn encoded_len(&self) -> usize {
        let payload_len = self.payload.len();
        let length_len = if payload_len <= usize::from(MAX_INLINE_LEN) {
            0
        } else if payload_len <= usize::from(u16::MAX) {
            2
        } else {
            8
        };
        let mask_len = if self.is_masked() { MASK_KEY_LEN } else { 0 };
        2 + length_len + mask_len + payload_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_MASKED: [u8; 19] =
        [0x81, 0x8d, 0x0e, 0x21, 0xbf, 0x6d, 0x46, 0x44, 0xd3, 0x01, 0x61, 0x0d, 0x9f, 0x1a, 0x61, 0x53, 0xd3, 0x09, 0x2f];

    fn decode(bytes: &[u8]) -> Result<Frame, FrameError> {
        Frame::deserialize(BytesMut::from(bytes))
    }

    fn too_short_part(result: Result<Frame, FrameError>) -> FramePart {
        match result {
            Err(FrameError::TooShort { part, .. }) => part,
            other => panic!("expected TooShort, got {other:?}"),
        }
    }

    #[test]
    fn deserialize_masked_text() {
        let frame = decode(&HELLO_MASKED).unwrap();

        assert!(frame.fin);
        assert!(!frame.rsv1);
        assert!(!frame.rsv2);
        assert!(!frame.rsv3);
        assert_eq!(frame.opcode, Opcode::TEXT);
        assert_eq!(frame.mask_key, Some([14, 33, 191, 109]));
        assert_eq!(&frame.payload[..], b"Hello, world!");
    }

    #[test]
    fn serialize_masked_text() {
        let frame = Frame::text("Hello, world!").with_mask([14, 33, 191, 109]);
        let bytes = frame.serialize();

        assert_eq!(bytes.len(), HELLO_MASKED.len());
        assert_eq!(&bytes[..], &HELLO_MASKED[..]);
    }

    #[test]
    fn serialize_masked_binary() {
        let frame = Frame::binary(vec![1u8, 2, 3, 4]).with_mask([50, 131, 3, 51]);

        assert_eq!(&frame.serialize()[..], &[0x82, 0x84, 0x32, 0x83, 0x03, 0x33, 0x33, 0x81, 0x00, 0x37][..]);
    }

    #[test]
    fn unmasked_frame_has_no_key_on_the_wire() {
        let bytes = Frame::text("hi").serialize();
        assert_eq!(&bytes[..], &[0x81, 0x02, b'h', b'i'][..]);

        let frame = decode(&bytes).unwrap();
        assert_eq!(frame.mask_key, None);
        assert_eq!(&frame.payload[..], b"hi");
    }

    #[test]
    fn round_trip_length_boundaries() {
        for len in [0usize, 1, 125, 126, 65535, 65536] {
            let payload: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
            for mask_key in [None, Some([0xde, 0xad, 0xbe, 0xef])] {
                let mut frame = Frame::binary(payload.clone());
                frame.mask_key = mask_key;

                let bytes = frame.serialize();
                assert_eq!(bytes.len(), frame.encoded_len());
                assert_eq!(decode(&bytes).unwrap(), frame, "payload length {len}, mask {mask_key:?}");
            }
        }
    }

    #[test]
    fn minimal_length_encoding() {
        assert_eq!(Frame::binary(vec![0u8; 125]).serialize()[1], 125);

        let bytes = Frame::binary(vec![0u8; 126]).serialize();
        assert_eq!(&bytes[1..4], &[126, 0x00, 0x7E][..]);

        let bytes = Frame::binary(vec![0u8; 65535]).serialize();
        assert_eq!(&bytes[1..4], &[126, 0xFF, 0xFF][..]);

        let bytes = Frame::binary(vec![0u8; 65536]).serialize();
        assert_eq!(&bytes[1..10], &[127, 0, 0, 0, 0, 0, 1, 0, 0][..]);
    }

    #[test]
    fn sixty_four_bit_length_uses_all_eight_bytes() {
        let mut bytes = vec![0x82, 0x7F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03];
        let head = FrameHead::parse(&bytes).unwrap();
        assert_eq!(head.payload_len, 0x0001_0203);
        assert_eq!(head.header_len, 10);

        bytes.resize(10 + 0x0001_0203, 0xAB);
        let frame = decode(&bytes).unwrap();
        assert_eq!(frame.payload.len(), 0x0001_0203);
        assert!(frame.payload.iter().all(|b| *b == 0xAB));
    }

    #[test]
    fn reserved_bits_and_opcodes_round_trip() {
        for bits in 0..=0x0F {
            let frame = Frame::new(Opcode::from_bits(bits), "x").with_fin(bits % 2 == 0).with_rsv(true, bits > 7, false);
            assert_eq!(decode(&frame.serialize()).unwrap(), frame);
        }
    }

    #[test]
    fn too_short_at_each_stage() {
        assert_eq!(too_short_part(decode(&[])), FramePart::Header);
        assert_eq!(too_short_part(decode(&[0x81])), FramePart::Header);
        assert_eq!(too_short_part(decode(&[0x81, 0x7E, 0x01])), FramePart::ExtendedLength);
        assert_eq!(too_short_part(decode(&[0x81, 0x7F, 0, 0, 0, 0, 0, 0, 1])), FramePart::ExtendedLength);
        assert_eq!(too_short_part(decode(&HELLO_MASKED[..4])), FramePart::MaskKey);
        assert_eq!(too_short_part(decode(&HELLO_MASKED[..18])), FramePart::Payload);
        assert_eq!(too_short_part(decode(&[0x82, 0x7E, 0x00, 0x80, 1, 2, 3])), FramePart::Payload);
    }

    #[test]
    fn too_short_reports_required_size() {
        match decode(&HELLO_MASKED[..10]) {
            Err(FrameError::TooShort { part, needed, available }) => {
                assert_eq!(part, FramePart::Payload);
                assert_eq!(needed, 19);
                assert_eq!(available, 10);
            }
            other => panic!("expected TooShort, got {other:?}"),
        }
    }

    #[test]
    fn huge_declared_length_is_rejected_not_truncated() {
        let unmasked = [0x82, 0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
        assert!(matches!(decode(&unmasked), Err(FrameError::Malformed { .. })));

        let masked = [0x82, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xF5, 1, 2, 3, 4];
        assert!(matches!(decode(&masked), Err(FrameError::Malformed { .. })));

        // header plus payload is exactly u64::MAX
        let unmasked = [0x82, 0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xF5];
        match decode(&unmasked) {
            Err(FrameError::TooShort { part, needed, available }) => {
                assert_eq!(part, FramePart::Payload);
                assert_eq!(needed, u64::MAX);
                assert_eq!(available, 10);
            }
            other => panic!("expected TooShort, got {other:?}"),
        }

        let masked = [0x82, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xF1, 1, 2, 3, 4, 0xAA];
        assert_eq!(too_short_part(decode(&masked)), FramePart::Payload);
    }

    #[test]
    fn trailing_bytes_are_not_part_of_payload() {
        let mut bytes = Frame::text("abc").serialize();
        bytes.extend_from_slice(b"\x81\x01z");

        let frame = Frame::deserialize(bytes).unwrap();
        assert_eq!(&frame.payload[..], b"abc");
    }

    #[test]
    fn apply_mask_is_self_inverse() {
        let key = [1, 2, 3, 4];
        let mut data = *b"mask me twice";
        apply_mask(&mut data, key);
        assert_ne!(&data, b"mask me twice");
        apply_mask(&mut data, key);
        assert_eq!(&data, b"mask me twice");
    }
}
