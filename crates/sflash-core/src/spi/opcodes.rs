//! Standard JEDEC SPI-NOR opcodes
//!
//! Only the opcodes the engine actually issues are listed. Commands with a
//! 4-byte address variant are paired up in [`crate::spi::OpcodePair`]
//! constants next to the raw values.

// ============================================================================
// Identification and status
// ============================================================================

/// Read JEDEC ID
pub const RDID: u8 = 0x9F;

/// Read status register 1
pub const RDSR: u8 = 0x05;

/// Status register 1: write in progress
pub const SR_WIP: u8 = 0x01;

/// Status register 1: write enable latch
pub const SR_WEL: u8 = 0x02;

// ============================================================================
// Write latch
// ============================================================================

/// Write enable
pub const WREN: u8 = 0x06;

/// Write disable
pub const WRDI: u8 = 0x04;

// ============================================================================
// Read / program / erase (3-byte and 4-byte address forms)
// ============================================================================

/// Fast read (3-byte address, 1 dummy byte)
pub const FAST_READ: u8 = 0x0B;

/// Fast read with 4-byte address
pub const FAST_READ_4B: u8 = 0x0C;

/// Page program
pub const PAGE_PROGRAM: u8 = 0x02;

/// Page program with 4-byte address
pub const PAGE_PROGRAM_4B: u8 = 0x12;

/// Sector (erase block) erase
pub const SECTOR_ERASE: u8 = 0xD8;

/// Sector erase with 4-byte address
pub const SECTOR_ERASE_4B: u8 = 0xDC;

/// 4 KiB subsector erase
pub const ERASE_4K: u8 = 0x20;

/// 4 KiB subsector erase with 4-byte address
pub const ERASE_4K_4B: u8 = 0x21;
