//! SPI bridge abstraction
//!
//! A [`SpiBridge`] is the USB-to-SPI adapter (or a simulation of one) that
//! the protocol engine drives. The trait exposes explicit chip-select
//! control because the fast-read path streams many transfers under a single
//! CS assertion.

use crate::error::Result;

/// A SPI master the flash engine can drive.
///
/// All methods are blocking. Implementations map their transport errors
/// into [`crate::Error::Transfer`].
pub trait SpiBridge {
    /// Switch between the normal and the doubled SPI clock.
    fn set_speed(&mut self, fast: bool) -> Result<()>;

    /// Assert (`true`) or deassert (`false`) the chip-select line.
    fn chip_select(&mut self, assert: bool) -> Result<()>;

    /// Clock `tx` out, then clock `rx.len()` further bytes into `rx`.
    ///
    /// Chip-select is the caller's responsibility; this is the primitive
    /// the streamed read path builds on.
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<()>;

    /// Full-duplex exchange: the capture window starts with the first
    /// transmitted byte. `tx` and `rx` must be the same length.
    fn transfer_duplex(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<()>;

    /// CS-bracketed [`transfer`](Self::transfer).
    ///
    /// Chip-select is deasserted even when the transfer fails; the first
    /// error wins.
    fn transaction(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<()> {
        self.chip_select(true)?;
        let res = self.transfer(tx, rx);
        let cs = self.chip_select(false);
        res.and(cs)
    }
}

impl<B: SpiBridge + ?Sized> SpiBridge for &mut B {
    fn set_speed(&mut self, fast: bool) -> Result<()> {
        (**self).set_speed(fast)
    }

    fn chip_select(&mut self, assert: bool) -> Result<()> {
        (**self).chip_select(assert)
    }

    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<()> {
        (**self).transfer(tx, rx)
    }

    fn transfer_duplex(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<()> {
        (**self).transfer_duplex(tx, rx)
    }
}
