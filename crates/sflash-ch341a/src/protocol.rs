//! CH341A wire protocol constants
//!
//! The CH341A multiplexes several stream protocols over its bulk pipe; the
//! first byte of every 32-byte packet selects one. SPI payload bytes are
//! shifted LSB first, so they are bit-reversed relative to SPI's MSB-first
//! order.

/// USB vendor ID
pub const CH341A_USB_VENDOR: u16 = 0x1A86;
/// USB product ID
pub const CH341A_USB_PRODUCT: u16 = 0x5512;

/// Bulk OUT endpoint
pub const WRITE_EP: u8 = 0x02;
/// Bulk IN endpoint
pub const READ_EP: u8 = 0x82;

/// Packet size of the bulk protocol
pub const CH341_PACKET_LENGTH: usize = 32;

/// SPI stream: shifts the remaining packet bytes out on MOSI
pub const CH341A_CMD_SPI_STREAM: u8 = 0xA8;

/// UIO stream: GPIO control (CS, clock idle, pin direction)
pub const CH341A_CMD_UIO_STREAM: u8 = 0xAB;
/// UIO sub-command: drive output pins
pub const CH341A_CMD_UIO_STM_OUT: u8 = 0x80;
/// UIO sub-command: set pin direction mask
pub const CH341A_CMD_UIO_STM_DIR: u8 = 0x40;
/// UIO sub-command: end of stream
pub const CH341A_CMD_UIO_STM_END: u8 = 0x20;

/// I2C stream: carries the shared clock configuration
pub const CH341A_CMD_I2C_STREAM: u8 = 0xAA;
/// I2C sub-command: set stream speed
pub const CH341A_CMD_I2C_STM_SET: u8 = 0x60;
/// I2C sub-command: end of stream
pub const CH341A_CMD_I2C_STM_END: u8 = 0x00;

/// Base clock configuration (100 kHz I2C, ~2 MHz SPI)
pub const CH341A_STM_I2C_100K: u8 = 0x01;
/// Doubles the SPI clock
pub const CH341A_STM_SPI_DBL: u8 = 0x04;

/// Output value with CS (D0) pulled low, clock idle low, data high
pub const UIO_CS_ASSERT: u8 = 0x36;
/// Output value with CS high
pub const UIO_CS_DEASSERT: u8 = 0x37;
/// Direction mask driving D0-D5
pub const UIO_DIR_OUTPUT: u8 = 0x3F;
/// Direction mask floating all pins
pub const UIO_DIR_INPUT: u8 = 0x00;

/// Swap the bit order of a byte (the CH341A shifts LSB first).
pub const fn reverse_byte(byte: u8) -> u8 {
    let mut byte = byte;
    byte = (byte & 0xF0) >> 4 | (byte & 0x0F) << 4;
    byte = (byte & 0xCC) >> 2 | (byte & 0x33) << 2;
    (byte & 0xAA) >> 1 | (byte & 0x55) << 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_byte_mirrors_bits() {
        assert_eq!(reverse_byte(0x00), 0x00);
        assert_eq!(reverse_byte(0xFF), 0xFF);
        assert_eq!(reverse_byte(0x80), 0x01);
        assert_eq!(reverse_byte(0x9F), 0xF9);
        assert_eq!(reverse_byte(0x0B), 0xD0);
        for b in 0..=255u8 {
            assert_eq!(reverse_byte(reverse_byte(b)), b);
        }
    }
}
