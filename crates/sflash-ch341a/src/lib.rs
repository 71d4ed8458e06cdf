//! sflash-ch341a - CH341A USB-to-SPI bridge support
//!
//! The CH341A is a cheap and widely available USB bridge commonly used for
//! programming SPI flash chips. It speaks a packetized bulk protocol: SPI
//! data goes out in `SPI_STREAM` packets of at most 31 payload bytes,
//! chip-select and pin direction are driven through `UIO_STREAM` commands,
//! and every data byte is bit-reversed because the chip shifts LSB first.
//!
//! # Example
//!
//! ```no_run
//! use sflash_ch341a::Ch341a;
//! use sflash_core::chip;
//!
//! let mut bridge = Ch341a::open()?;
//! let dev = chip::identify(&mut bridge)?;
//! println!("found {}", dev);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod device;
mod error;
mod protocol;

pub use device::Ch341a;
pub use error::{Ch341aError, Result};
