//! Internal helper macros shared by the handshake and frame code.

/// Returns early with `Err($error)` when `$predicate` does not hold.
///
/// Used for the bounds checks in front of every slice access on untrusted
/// input, so that a short buffer turns into an error instead of a panic.
///
/// ```ignore
/// ensure!(buf.len() >= 2, FrameError::too_short(FramePart::Header, 2, buf.len()));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
