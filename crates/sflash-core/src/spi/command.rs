//! Command frame builder

use super::{opcodes, AddressWidth};

/// A command that exists in a 3-byte and a 4-byte address form.
#[derive(Clone, Copy, Debug)]
pub struct OpcodePair {
    /// Opcode for the 3-byte address form
    pub three_byte: u8,
    /// Opcode for the 4-byte address form
    pub four_byte: u8,
}

/// Fast read, 1 dummy byte after the address
pub const FAST_READ: OpcodePair = OpcodePair {
    three_byte: opcodes::FAST_READ,
    four_byte: opcodes::FAST_READ_4B,
};

/// Page program
pub const PAGE_PROGRAM: OpcodePair = OpcodePair {
    three_byte: opcodes::PAGE_PROGRAM,
    four_byte: opcodes::PAGE_PROGRAM_4B,
};

/// Sector (erase block) erase
pub const SECTOR_ERASE: OpcodePair = OpcodePair {
    three_byte: opcodes::SECTOR_ERASE,
    four_byte: opcodes::SECTOR_ERASE_4B,
};

/// Longest frame: opcode + 4 address bytes + dummy bytes
const MAX_FRAME: usize = 1 + 4 + 3;

/// An encoded command header: opcode, big-endian address, dummy bytes.
///
/// The address width (and with it the opcode picked from the pair) follows
/// from the chip size, so every command path frames identically.
#[derive(Clone, Copy, Debug)]
pub struct CommandFrame {
    buf: [u8; MAX_FRAME],
    len: usize,
}

impl CommandFrame {
    /// Frame a command for a chip of `flash_size` bytes.
    ///
    /// `dummy` trailing `0xFF` bytes are appended after the address (at
    /// most 3).
    pub fn new(pair: OpcodePair, flash_size: u32, address: u32, dummy: usize) -> Self {
        debug_assert!(dummy <= 3);
        let width = AddressWidth::for_size(flash_size);
        let mut buf = [0xFFu8; MAX_FRAME];
        buf[0] = match width {
            AddressWidth::ThreeByte => pair.three_byte,
            AddressWidth::FourByte => pair.four_byte,
        };
        width.encode(address, &mut buf[1..1 + width.bytes()]);
        Self {
            buf,
            len: 1 + width.bytes() + dummy,
        }
    }

    /// The encoded frame, ready to clock out
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_byte_fast_read_frame() {
        let frame = CommandFrame::new(FAST_READ, 16 * 1024 * 1024, 0x012345, 1);
        assert_eq!(frame.as_bytes(), &[0x0B, 0x01, 0x23, 0x45, 0xFF]);
    }

    #[test]
    fn four_byte_form_kicks_in_above_16_mib() {
        let frame = CommandFrame::new(FAST_READ, 16 * 1024 * 1024 + 1, 0x0102_0304, 1);
        assert_eq!(frame.as_bytes(), &[0x0C, 0x01, 0x02, 0x03, 0x04, 0xFF]);
    }

    #[test]
    fn erase_frame_has_no_dummy() {
        let frame = CommandFrame::new(SECTOR_ERASE, 8 * 1024 * 1024, 0x10000, 0);
        assert_eq!(frame.as_bytes(), &[0xD8, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn program_frame_uses_4b_opcode_on_large_chips() {
        let frame = CommandFrame::new(PAGE_PROGRAM, 32 * 1024 * 1024, 0x100, 0);
        assert_eq!(frame.as_bytes(), &[0x12, 0x00, 0x00, 0x01, 0x00]);
    }
}
