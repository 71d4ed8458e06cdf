//! Error types for sflash-core

use thiserror::Error;

/// Crate-wide error type.
///
/// Transport failures are fatal for the operation that hit them; an
/// unrecognized chip is *not* an error (identification falls back to a
/// generic device and the caller decides what to do with zero geometry).
#[derive(Debug, Error)]
pub enum Error {
    /// The SPI bridge failed mid-transfer. The flash may be left in an
    /// undefined state (CS asserted, write latch set).
    #[error("SPI transfer failed: {0}")]
    Transfer(String),

    /// An operation needs a geometry field the identified chip did not
    /// provide. Checked before any command is issued to the chip.
    #[error("flash {0} is unknown, override it on the command line")]
    GeometryUnknown(&'static str),

    /// Offset or length not aligned to the erase block.
    #[error("0x{offset:x}+0x{len:x} is not aligned to the {erase_block} byte erase block")]
    Alignment {
        /// Requested offset
        offset: u32,
        /// Requested length
        len: u32,
        /// Erase block size of the chip
        erase_block: u32,
    },

    /// The requested range does not fit the chip.
    #[error("range 0x{offset:x}+0x{len:x} exceeds the flash size 0x{size:x}")]
    OutOfRange {
        /// Requested offset
        offset: u32,
        /// Requested length
        len: u32,
        /// Size of the chip
        size: u32,
    },

    /// Reading a source or writing a sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the crate Error type
pub type Result<T> = core::result::Result<T, Error>;
