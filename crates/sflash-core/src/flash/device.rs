//! Identified flash device

use crate::error::{Error, Result};
use bitflags::bitflags;
use core::fmt;

/// Fixed length of the stored JEDEC ID response
pub const ID_LEN: usize = 16;

bitflags! {
    /// Geometry fields an operation needs before it may touch the chip.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Requires: u8 {
        /// Total size must be known
        const SIZE = 1 << 0;
        /// Erase block size must be known
        const ERASE_BLOCK = 1 << 1;
        /// Page size must be known
        const PAGE = 1 << 2;
    }
}

/// An identified (or caller-described) flash chip.
///
/// Geometry fields are in bytes; zero means unknown. The device is an owned
/// value threaded through every operation, so overriding a detected field is
/// just a plain assignment before use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlashDevice {
    /// Human-readable part name
    pub name: String,
    /// Total size in bytes (0 = unknown)
    pub size: u32,
    /// Erase block size in bytes (0 = unknown)
    pub erase_block: u32,
    /// Program page size in bytes (0 = unknown)
    pub page: u32,
    /// Raw JEDEC Read-ID response
    pub id: [u8; ID_LEN],
}

impl FlashDevice {
    /// Fail with [`Error::GeometryUnknown`] if any field in `req` is zero.
    ///
    /// Every engine calls this before issuing its first chip command.
    pub fn require(&self, req: Requires) -> Result<()> {
        if req.contains(Requires::SIZE) && self.size == 0 {
            return Err(Error::GeometryUnknown("size"));
        }
        if req.contains(Requires::ERASE_BLOCK) && self.erase_block == 0 {
            return Err(Error::GeometryUnknown("erase block size"));
        }
        if req.contains(Requires::PAGE) && self.page == 0 {
            return Err(Error::GeometryUnknown("page size"));
        }
        Ok(())
    }

    /// Check that `offset..offset + len` fits the chip.
    pub fn check_range(&self, offset: u32, len: u32) -> Result<()> {
        if u64::from(offset) + u64::from(len) > u64::from(self.size) {
            return Err(Error::OutOfRange {
                offset,
                len,
                size: self.size,
            });
        }
        Ok(())
    }

    /// Whether commands to this chip carry a 4-byte address.
    pub fn uses_4byte_addressing(&self) -> bool {
        crate::spi::AddressWidth::for_size(self.size) == crate::spi::AddressWidth::FourByte
    }
}

impl fmt::Display for FlashDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.name, self.size)
    }
}
