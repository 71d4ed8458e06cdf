//! CH341A device implementation
//!
//! USB I/O is blocking: each bulk transfer is submitted and waited on with
//! `futures_lite::future::block_on`. SPI streaming runs in lockstep, one
//! 31-byte `SPI_STREAM` packet out, its echo back in, which keeps the
//! device's packet pipeline trivially in sync.

use futures_lite::future::block_on;
use nusb::transfer::RequestBuffer;
use nusb::Interface;
use sflash_core::bridge::SpiBridge;
use sflash_core::error::Result as CoreResult;

use crate::error::{Ch341aError, Result};
use crate::protocol::*;

/// An opened CH341A bridge.
pub struct Ch341a {
    interface: Interface,
}

impl Ch341a {
    /// Open the first CH341A on the bus.
    pub fn open() -> Result<Self> {
        Self::open_nth(0)
    }

    /// Open the nth CH341A (0-indexed), for setups with several plugged in.
    pub fn open_nth(index: usize) -> Result<Self> {
        let info = nusb::list_devices()
            .map_err(|e| Ch341aError::OpenFailed(e.to_string()))?
            .filter(|d| {
                d.vendor_id() == CH341A_USB_VENDOR && d.product_id() == CH341A_USB_PRODUCT
            })
            .nth(index)
            .ok_or(Ch341aError::DeviceNotFound)?;

        log::info!(
            "opening CH341A at bus {} address {}",
            info.bus_number(),
            info.device_address()
        );

        let device = info
            .open()
            .map_err(|e| Ch341aError::OpenFailed(e.to_string()))?;
        let interface = device
            .detach_and_claim_interface(0)
            .map_err(|e| Ch341aError::ClaimFailed(e.to_string()))?;

        let mut bridge = Self { interface };
        bridge.configure()?;
        Ok(bridge)
    }

    /// Put the chip into SPI mode: base clock, pins driven, CS high.
    fn configure(&mut self) -> Result<()> {
        self.config_stream(CH341A_STM_I2C_100K)?;
        self.enable_pins(true)?;
        log::debug!("CH341A configured for SPI");
        Ok(())
    }

    fn config_stream(&mut self, speed: u8) -> Result<()> {
        self.usb_write(&[
            CH341A_CMD_I2C_STREAM,
            CH341A_CMD_I2C_STM_SET | (speed & 0x7),
            CH341A_CMD_I2C_STM_END,
        ])
    }

    fn enable_pins(&mut self, enable: bool) -> Result<()> {
        let dir = if enable { UIO_DIR_OUTPUT } else { UIO_DIR_INPUT };
        self.usb_write(&[
            CH341A_CMD_UIO_STREAM,
            CH341A_CMD_UIO_STM_OUT | UIO_CS_DEASSERT,
            CH341A_CMD_UIO_STM_DIR | dir,
            CH341A_CMD_UIO_STM_END,
        ])
    }

    fn usb_write(&mut self, data: &[u8]) -> Result<()> {
        let completion = block_on(self.interface.bulk_out(WRITE_EP, data.to_vec()));
        completion
            .status
            .map_err(|e| Ch341aError::TransferFailed(e.to_string()))?;
        if completion.data.actual_length() != data.len() {
            return Err(Ch341aError::TransferFailed("short bulk write".into()));
        }
        log::trace!("USB write {} bytes", data.len());
        Ok(())
    }

    fn usb_read(&mut self, len: usize) -> Result<Vec<u8>> {
        let completion = block_on(
            self.interface
                .bulk_in(READ_EP, RequestBuffer::new(CH341_PACKET_LENGTH.max(len))),
        );
        completion
            .status
            .map_err(|e| Ch341aError::TransferFailed(e.to_string()))?;
        log::trace!("USB read {} bytes", completion.data.len());
        Ok(completion.data)
    }

    /// Clock `out` over the bus; bytes from position `capture_from` on are
    /// collected into `rx`.
    ///
    /// The CH341A echoes one response byte per payload byte, so a transfer
    /// is a sequence of write-packet/read-packet pairs.
    fn stream(&mut self, out: &[u8], capture_from: usize, rx: &mut [u8]) -> Result<()> {
        let mut pos = 0;
        while pos < out.len() {
            let n = (out.len() - pos).min(CH341_PACKET_LENGTH - 1);
            let mut packet = Vec::with_capacity(n + 1);
            packet.push(CH341A_CMD_SPI_STREAM);
            packet.extend(out[pos..pos + n].iter().map(|&b| reverse_byte(b)));
            self.usb_write(&packet)?;

            let resp = self.usb_read(n)?;
            if resp.len() < n {
                return Err(Ch341aError::ShortResponse);
            }
            for (i, &echo) in resp[..n].iter().enumerate() {
                let abs = pos + i;
                if abs >= capture_from {
                    rx[abs - capture_from] = reverse_byte(echo);
                }
            }
            pos += n;
        }
        Ok(())
    }

    fn set_cs(&mut self, assert: bool) -> Result<()> {
        let value = if assert { UIO_CS_ASSERT } else { UIO_CS_DEASSERT };
        self.usb_write(&[
            CH341A_CMD_UIO_STREAM,
            CH341A_CMD_UIO_STM_OUT | value,
            CH341A_CMD_UIO_STM_END,
        ])
    }
}

impl Drop for Ch341a {
    fn drop(&mut self) {
        // leave the bus released: CS high, pins floating
        if let Err(e) = self.set_cs(false).and_then(|()| self.enable_pins(false)) {
            log::warn!("failed to release CH341A pins: {}", e);
        }
    }
}

impl SpiBridge for Ch341a {
    fn set_speed(&mut self, fast: bool) -> CoreResult<()> {
        let mut speed = CH341A_STM_I2C_100K;
        if fast {
            speed |= CH341A_STM_SPI_DBL;
        }
        self.config_stream(speed).map_err(Into::into)
    }

    fn chip_select(&mut self, assert: bool) -> CoreResult<()> {
        self.set_cs(assert).map_err(Into::into)
    }

    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> CoreResult<()> {
        let mut out = vec![0xFFu8; tx.len() + rx.len()];
        out[..tx.len()].copy_from_slice(tx);
        self.stream(&out, tx.len(), rx).map_err(Into::into)
    }

    fn transfer_duplex(&mut self, tx: &[u8], rx: &mut [u8]) -> CoreResult<()> {
        debug_assert_eq!(tx.len(), rx.len());
        self.stream(tx, 0, rx).map_err(Into::into)
    }
}
