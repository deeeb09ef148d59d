//! Little-endian primitive decoding over a [`ReadAt`] byte source.
//!
//! Two offset conventions are in play, both taken verbatim from the
//! on-disk format: header fields, row starts and first-octet index
//! entries are stored as 1-indexed file offsets and need `- 1` before
//! they reach a (0-indexed) [`ReadAt::read_at`] call; string pointers
//! embedded in rows already point at the length byte one position
//! "early" relative to that rule and must be used as-is. Mixing the two
//! up is the single easiest bug in this kind of decoder, so the two
//! cases get distinct helpers rather than a single `read_at(offset)`
//! that callers have to remember to adjust.

use byteorder::{ByteOrder, LE};
use positioned_io::{ReadAt, ReadBytesAtExt as _};

use crate::error::Result;

/// Reads a little-endian `u32` at a 1-indexed file offset.
pub(crate) fn read_u32_1indexed<B: ReadAt>(src: &B, pos1: u64) -> Result<u32> {
    Ok(src.read_u32_at::<LE>(pos1 - 1)?)
}

/// Reads a little-endian `u128` (v6 address) at a 1-indexed file offset.
pub(crate) fn read_u128_1indexed<B: ReadAt>(src: &B, pos1: u64) -> Result<u128> {
    let mut buf = [0u8; 16];
    src.read_exact_at(pos1 - 1, &mut buf)?;
    Ok(LE::read_u128(&buf))
}

/// Reads a little-endian `f32` at a 1-indexed file offset.
///
/// Rounds out the primitive set spec.md §4.2 names alongside the `u32`/
/// `u128` readers. The current schema always decodes latitude/longitude
/// from a pre-fetched row buffer via [`read_f32_row`] instead, so this is
/// exercised directly by its own test rather than called from the lookup
/// engine.
pub(crate) fn read_f32_1indexed<B: ReadAt>(src: &B, pos1: u64) -> Result<f32> {
    Ok(src.read_f32_at::<LE>(pos1 - 1)?)
}

/// Reads the length-prefixed string pointed to by `ptr`.
///
/// `ptr` is a raw pointer value as stored in a row: it already names
/// the length byte's position under the byte source's 0-indexed API,
/// so no adjustment is applied here (unlike every other pointer in the
/// format).
pub(crate) fn read_str_at_ptr<B: ReadAt>(src: &B, ptr: u64) -> Result<String> {
    let len = src.read_u8_at(ptr)? as usize;
    let mut buf = vec![0u8; len];
    src.read_exact_at(ptr + 1, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Reads a little-endian `u32` from a pre-fetched row buffer.
pub(crate) fn read_u32_row(buf: &[u8], offset: usize) -> u32 {
    LE::read_u32(&buf[offset..offset + 4])
}

/// Reads a little-endian `f32` from a pre-fetched row buffer.
pub(crate) fn read_f32_row(buf: &[u8], offset: usize) -> f32 {
    LE::read_f32(&buf[offset..offset + 4])
}
