//! Bounded copies between buffers.

use super::{dst_range, src_range};
use crate::error::{Error, Result};

/// Copy `count` bytes from `src[src_offset..]` into `dst[dst_offset..]`.
///
/// The destination is checked before the source, so a call that is wrong on
/// both sides reports [`Error::DestinationTooSmall`]. Nothing is copied on
/// error.
///
/// # Errors
///
/// Returns [`Error::DestinationTooSmall`] if `dst_offset + count` exceeds
/// `dst.len()`, or [`Error::SourceTooShort`] if `src_offset + count` exceeds
/// `src.len()`.
pub fn copy_range(
    src: &[u8],
    src_offset: usize,
    dst: &mut [u8],
    dst_offset: usize,
    count: usize,
) -> Result<()> {
    let to = dst_range(dst.len(), dst_offset, count)?;
    let from = src_range(src.len(), src_offset, count)?;
    dst[to].copy_from_slice(&src[from]);
    Ok(())
}

/// Return `bytes` right-padded with `fill` to exactly `total_len` bytes.
///
/// # Errors
///
/// Returns [`Error::DestinationTooSmall`] if `bytes` is already longer than
/// `total_len`.
pub fn pad_right(bytes: &[u8], total_len: usize, fill: u8) -> Result<Vec<u8>> {
    if bytes.len() > total_len {
        return Err(Error::destination_too_small(0, bytes.len(), total_len));
    }
    let mut out = Vec::with_capacity(total_len);
    out.extend_from_slice(bytes);
    out.resize(total_len, fill);
    Ok(out)
}
