use std::fmt;

/// A 4-bit WebSocket frame opcode.
///
/// Reserved values (`0x3`-`0x7`, `0xB`-`0xF`) are kept as-is so that any frame
/// read off the wire can be written back unchanged; deciding what to do with
/// them is left to the layer above the codec.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Opcode(u8);

impl Opcode {
    pub const CONTINUATION: Opcode = Opcode(0x0);
    pub const TEXT: Opcode = Opcode(0x1);
    pub const BINARY: Opcode = Opcode(0x2);
    pub const CLOSE: Opcode = Opcode(0x8);
    pub const PING: Opcode = Opcode(0x9);
    pub const PONG: Opcode = Opcode(0xA);

    /// Builds an opcode from the low nibble of `bits`; the high nibble is ignored.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Opcode(bits & 0x0F)
    }

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Returns true for close, ping, pong and the reserved control range
    #[inline]
    pub const fn is_control(self) -> bool {
        self.0 & 0x08 != 0
    }

    /// Returns true for continuation, text, binary and the reserved data range
    #[inline]
    pub const fn is_data(self) -> bool {
        !self.is_control()
    }

    #[inline]
    pub const fn is_reserved(self) -> bool {
        matches!(self.0, 0x3..=0x7 | 0xB..=0xF)
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> Self {
        opcode.0
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Opcode::CONTINUATION => f.write_str("continuation"),
            Opcode::TEXT => f.write_str("text"),
            Opcode::BINARY => f.write_str("binary"),
            Opcode::CLOSE => f.write_str("close"),
            Opcode::PING => f.write_str("ping"),
            Opcode::PONG => f.write_str("pong"),
            Opcode(bits) => write!(f, "reserved(0x{bits:X})"),
        }
    }
}
