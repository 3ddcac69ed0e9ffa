//! Header lookup over a raw HTTP message without a general parser.
//!
//! The handshake only needs four header values, so instead of tokenizing the
//! whole request the scanner walks the buffer once per header name and hands
//! back a slice of the original bytes. Nothing is copied.
//!
//! # Matching rules
//!
//! - names are compared byte for byte, so matching is case-sensitive
//! - a name only matches at the start of the buffer or right after a `\n`
//! - the name must be directly followed by `:`
//! - spaces (`0x20`) after the colon are skipped
//! - the value runs up to, not including, the next `\r\n`
//!
//! A partial match that breaks off is discarded and matching restarts from
//! the following byte. Since only the byte in front of a candidate is looked
//! at, a buffer that starts in the middle of a header line can match a shorter
//! name that is a suffix of the real one.

use crate::ensure;
use crate::protocol::ScanError;

/// Returns the value of header `name` in `buf`.
///
/// # Errors
///
/// - [`ScanError::ParamNotFound`] if no line of `buf` starts with `name:`
/// - [`ScanError::NoCrlf`] if the value is not terminated by `\r\n`
pub fn extract<'a>(buf: &'a [u8], name: &[u8]) -> Result<&'a [u8], ScanError> {
    ensure!(!name.is_empty(), ScanError::param_not_found(name));

    let mut matched = 0;
    let mut value_start = None;
    for (i, &byte) in buf.iter().enumerate() {
        if byte != name[matched] {
            matched = 0;
            continue;
        }

        // a candidate has to begin a line
        if matched == 0 && i != 0 && buf[i - 1] != b'\n' {
            continue;
        }

        matched += 1;
        if matched < name.len() {
            continue;
        }

        // `name` is complete, the next byte has to be ':' and something must follow it
        if i + 2 >= buf.len() || buf[i + 1] != b':' {
            matched = 0;
            continue;
        }

        value_start = Some(i + 2);
        break;
    }

    let Some(mut start) = value_start else {
        return Err(ScanError::param_not_found(name));
    };

    while start < buf.len() && buf[start] == b' ' {
        start += 1;
    }

    read_until_crlf(&buf[start..])
}

/// Returns every byte of `buf` in front of the first `\r\n`.
///
/// Only a `\r` directly followed by `\n` terminates; lone `\r` or `\n` bytes
/// are part of the returned value.
///
/// # Errors
///
/// Returns [`ScanError::NoCrlf`] if `buf` holds no adjacent `\r\n` pair.
pub fn read_until_crlf(buf: &[u8]) -> Result<&[u8], ScanError> {
    buf.windows(2).position(|pair| pair == b"\r\n").map(|end| &buf[..end]).ok_or(ScanError::NoCrlf)
}
