//! Core WebSocket protocol types.
//!
//! - **Frames**: the transport unit and its wire encoding
//!   - [`Frame`]: one decoded frame with an unmasked payload
//!   - [`FrameHead`]: the parsed header of a frame, used to size reads
//!   - [`apply_mask`]: the symmetric XOR masking transform
//!
//! - **Opcodes** ([`Opcode`]): the 4-bit frame type, reserved values included
//!
//! - **Header bytes** ([`bits`]): named accessors over the two fixed header bytes
//!
//! - **Error Handling**:
//!   - [`WsError`]: Top-level error type
//!   - [`ScanError`]: Header scanning errors
//!   - [`HandshakeError`]: Upgrade validation and handshake I/O errors
//!   - [`FrameError`]: Frame decoding errors

pub mod bits;

mod frame;
pub use frame::Frame;
pub use frame::FrameHead;
pub use frame::MASK_KEY_LEN;
pub use frame::apply_mask;

mod opcode;
pub use opcode::Opcode;

mod error;
pub use error::FrameError;
pub use error::FramePart;
pub use error::HandshakeError;
pub use error::ScanError;
pub use error::WsError;
