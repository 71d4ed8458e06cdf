//! Address width types

/// Threshold above which a chip needs 4-byte addressing
const THREE_BYTE_MAX: u32 = 16 * 1024 * 1024;

/// Address width for SPI commands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressWidth {
    /// 3-byte (24-bit) address - supports up to 16 MiB
    ThreeByte,
    /// 4-byte (32-bit) address - supports up to 4 GiB
    FourByte,
}

impl AddressWidth {
    /// Select the width for a chip of `size` bytes.
    ///
    /// Exactly 16 MiB still fits 3-byte addressing; only larger chips
    /// switch to the 4-byte command forms.
    pub const fn for_size(size: u32) -> Self {
        if size > THREE_BYTE_MAX {
            Self::FourByte
        } else {
            Self::ThreeByte
        }
    }

    /// Returns the number of address bytes
    pub const fn bytes(&self) -> usize {
        match self {
            Self::ThreeByte => 3,
            Self::FourByte => 4,
        }
    }

    /// Encode an address big-endian into `buf`
    pub fn encode(&self, address: u32, buf: &mut [u8]) {
        match self {
            Self::ThreeByte => {
                buf[0] = (address >> 16) as u8;
                buf[1] = (address >> 8) as u8;
                buf[2] = address as u8;
            }
            Self::FourByte => {
                buf[0] = (address >> 24) as u8;
                buf[1] = (address >> 16) as u8;
                buf[2] = (address >> 8) as u8;
                buf[3] = address as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_threshold_is_exclusive_at_16_mib() {
        assert_eq!(AddressWidth::for_size(16 * 1024 * 1024), AddressWidth::ThreeByte);
        assert_eq!(AddressWidth::for_size(16 * 1024 * 1024 + 1), AddressWidth::FourByte);
        assert_eq!(AddressWidth::for_size(32 * 1024 * 1024), AddressWidth::FourByte);
        assert_eq!(AddressWidth::for_size(1024), AddressWidth::ThreeByte);
    }

    #[test]
    fn encode_is_big_endian() {
        let mut buf = [0u8; 4];
        AddressWidth::ThreeByte.encode(0x123456, &mut buf[..3]);
        assert_eq!(&buf[..3], &[0x12, 0x34, 0x56]);
        AddressWidth::FourByte.encode(0x0102_0304, &mut buf);
        assert_eq!(buf, [0x01, 0x02, 0x03, 0x04]);
    }
}
