//! Accessors for the two fixed header bytes of a WebSocket frame.
//!
//! ```text
//!  0 1 2 3 4 5 6 7   0 1 2 3 4 5 6 7
//! +-+-+-+-+-------+ +-+-------------+
//! |F|R|R|R| opcode| |M| Payload len |
//! |I|S|S|S|  (4)  | |A|     (7)     |
//! |N|V|V|V|       | |S|             |
//! | |1|2|3|       | |K|             |
//! +-+-+-+-+-------+ +-+-------------+
//! ```
//!
//! Every shift and mask used by the codec lives here, so the packing can be
//! audited and tested apart from the length and masking logic.

use crate::protocol::Opcode;

const FIN_BIT: u8 = 0x80;
const RSV1_BIT: u8 = 0x40;
const RSV2_BIT: u8 = 0x20;
const RSV3_BIT: u8 = 0x10;
const OPCODE_BITS: u8 = 0x0F;

const MASK_BIT: u8 = 0x80;
const LEN_BITS: u8 = 0x7F;

/// Largest payload length that fits in the 7-bit length field
pub const MAX_INLINE_LEN: u8 = 125;

/// 7-bit length value announcing a 16-bit extended length
pub const EXTENDED_LEN_16: u8 = 126;

/// 7-bit length value announcing a 64-bit extended length
pub const EXTENDED_LEN_64: u8 = 127;

#[inline]
pub const fn fin(first: u8) -> bool {
    first & FIN_BIT != 0
}

#[inline]
pub const fn rsv1(first: u8) -> bool {
    first & RSV1_BIT != 0
}

#[inline]
pub const fn rsv2(first: u8) -> bool {
    first & RSV2_BIT != 0
}

#[inline]
pub const fn rsv3(first: u8) -> bool {
    first & RSV3_BIT != 0
}

#[inline]
pub const fn opcode(first: u8) -> Opcode {
    Opcode::from_bits(first & OPCODE_BITS)
}

#[inline]
pub const fn masked(second: u8) -> bool {
    second & MASK_BIT != 0
}

/// The 7-bit length field, either the payload length itself or one of
/// [`EXTENDED_LEN_16`] / [`EXTENDED_LEN_64`].
#[inline]
pub const fn base_len(second: u8) -> u8 {
    second & LEN_BITS
}

#[inline]
#[allow(clippy::fn_params_excessive_bools, reason = "mirrors the four flag bits of the wire byte")]
pub const fn pack_first_byte(fin: bool, rsv1: bool, rsv2: bool, rsv3: bool, opcode: Opcode) -> u8 {
    let mut byte = opcode.as_u8() & OPCODE_BITS;
    if fin {
        byte |= FIN_BIT;
    }
    if rsv1 {
        byte |= RSV1_BIT;
    }
    if rsv2 {
        byte |= RSV2_BIT;
    }
    if rsv3 {
        byte |= RSV3_BIT;
    }
    byte
}

/// Packs the mask flag with a 7-bit length value; bits above the 7th are dropped.
#[inline]
pub const fn pack_second_byte(masked: bool, base_len: u8) -> u8 {
    let byte = base_len & LEN_BITS;
    if masked { byte | MASK_BIT } else { byte }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpack_first_byte() {
        assert!(fin(0x81));
        assert!(!fin(0x01));
        assert!(rsv1(0x40) && !rsv2(0x40) && !rsv3(0x40));
        assert!(!rsv1(0x20) && rsv2(0x20) && !rsv3(0x20));
        assert!(!rsv1(0x10) && !rsv2(0x10) && rsv3(0x10));
        assert_eq!(opcode(0x81), Opcode::TEXT);
        assert_eq!(opcode(0xFA), Opcode::PONG);
    }

    #[test]
    fn unpack_second_byte() {
        assert!(masked(0x8D));
        assert_eq!(base_len(0x8D), 13);
        assert!(!masked(0x7E));
        assert_eq!(base_len(0x7E), EXTENDED_LEN_16);
        assert_eq!(base_len(0xFF), EXTENDED_LEN_64);
    }

    #[test]
    fn pack_first_byte_flags() {
        assert_eq!(pack_first_byte(true, false, false, false, Opcode::TEXT), 0x81);
        assert_eq!(pack_first_byte(false, false, false, false, Opcode::CONTINUATION), 0x00);
        assert_eq!(pack_first_byte(true, true, true, true, Opcode::from_bits(0x0F)), 0xFF);
        assert_eq!(pack_first_byte(false, true, false, true, Opcode::BINARY), 0x52);
    }

    #[test]
    fn pack_first_byte_unpacks_to_same_flags() {
        for first in 0..=u8::MAX {
            let repacked = pack_first_byte(fin(first), rsv1(first), rsv2(first), rsv3(first), opcode(first));
            assert_eq!(repacked, first);
        }
    }

    #[test]
    fn pack_second_byte_drops_high_bit_of_length() {
        assert_eq!(pack_second_byte(true, 4), 0x84);
        assert_eq!(pack_second_byte(false, EXTENDED_LEN_64), 0x7F);
        assert_eq!(pack_second_byte(false, 0xFF), 0x7F);
    }
}
