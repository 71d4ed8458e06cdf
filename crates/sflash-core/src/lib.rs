//! sflash-core - SPI-NOR protocol engine and chip identification
//!
//! This crate implements the flash side of a SPI-NOR programmer: JEDEC
//! command framing, the write-enable/poll/write-disable sequence, read,
//! erase and program engines (including the boundary-preserving "smart"
//! variants), and chip identification from the JEDEC ID.
//!
//! The bus itself is abstracted behind [`bridge::SpiBridge`]; transport
//! crates implement it and everything here is generic over it. All
//! operations are synchronous and blocking.
//!
//! # Example
//!
//! ```ignore
//! use sflash_core::{bridge::SpiBridge, chip, flash};
//!
//! fn dump<B: SpiBridge>(bridge: &mut B) -> sflash_core::Result<Vec<u8>> {
//!     let dev = chip::identify(bridge)?;
//!     let mut buf = vec![0u8; dev.size as usize];
//!     flash::read(bridge, &dev, 0, &mut buf)?;
//!     Ok(buf)
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod bridge;
pub mod chip;
pub mod error;
pub mod flash;
pub mod progress;
pub mod protocol;
pub mod spi;

#[cfg(test)]
pub(crate) mod mock;

pub use error::{Error, Result};
pub use flash::device::{FlashDevice, Requires, ID_LEN};
