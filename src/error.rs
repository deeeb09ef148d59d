use std::io;

use thiserror::Error;

/// Failure modes surfaced by this crate.
///
/// Invalid addresses and attributes unsupported by a product type are
/// *not* represented here — they are signaled in-band via placeholder
/// strings in [`crate::Record`] so that [`crate::Database::query`] stays
/// total over all inputs once the database is open.
#[derive(Debug, Error)]
pub enum Error {
    /// A read against the byte source failed or returned fewer bytes
    /// than requested.
    #[error("i/o error reading database")]
    Io(#[from] io::Error),

    /// The 29-byte header described a row layout the decoder cannot work
    /// with (currently: a column count too small to derive a row stride).
    /// Product type is *not* validated here — an out-of-range product type
    /// degrades to an all-absent schema instead (spec.md §4.4).
    #[error("invalid database header: {0}")]
    InvalidHeader(&'static str),

    /// A query was issued after the database was closed.
    #[error("database handle is closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, Error>;
