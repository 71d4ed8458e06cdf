//! SPI25 command sequences

use crate::bridge::SpiBridge;
use crate::error::Result;
use crate::flash::device::{FlashDevice, ID_LEN};
use crate::spi::{opcodes, CommandFrame, OpcodePair};

/// Read the JEDEC ID into `id`.
///
/// The response is clocked straight after the opcode; unknown trailing
/// bytes come back as whatever the chip drives (usually 0x00 or 0xFF).
pub fn read_id<B: SpiBridge + ?Sized>(bridge: &mut B, id: &mut [u8; ID_LEN]) -> Result<()> {
    bridge.transaction(&[opcodes::RDID], id)?;
    log::debug!("JEDEC ID: {:02x} {:02x} {:02x}", id[0], id[1], id[2]);
    Ok(())
}

/// Read status register 1.
pub fn read_status<B: SpiBridge + ?Sized>(bridge: &mut B) -> Result<u8> {
    let mut status = [0u8; 1];
    bridge.transaction(&[opcodes::RDSR], &mut status)?;
    Ok(status[0])
}

/// Set the write enable latch.
pub fn write_enable<B: SpiBridge + ?Sized>(bridge: &mut B) -> Result<()> {
    bridge.transaction(&[opcodes::WREN], &mut [])
}

/// Clear the write enable latch.
pub fn write_disable<B: SpiBridge + ?Sized>(bridge: &mut B) -> Result<()> {
    bridge.transaction(&[opcodes::WRDI], &mut [])
}

/// Busy-poll status until the write-in-progress bit clears.
///
/// There is no timeout and no backoff: erase and program times vary by
/// orders of magnitude between parts, and the USB round trip already paces
/// the loop. A wedged chip keeps us polling until the transport fails.
pub fn wait_ready<B: SpiBridge + ?Sized>(bridge: &mut B) -> Result<()> {
    loop {
        if read_status(bridge)? & opcodes::SR_WIP == 0 {
            return Ok(());
        }
    }
}

/// Clock out a framed command header without touching chip-select.
pub fn send_frame<B: SpiBridge + ?Sized>(
    bridge: &mut B,
    dev: &FlashDevice,
    pair: OpcodePair,
    address: u32,
    dummy: usize,
) -> Result<()> {
    let frame = CommandFrame::new(pair, dev.size, address, dummy);
    bridge.transfer(frame.as_bytes(), &mut [])
}

/// Erase the block at `offset`.
///
/// Full write sequence: WREN, sector-erase command, WIP poll, WRDI. A
/// transport failure aborts on the spot with no WRDI cleanup.
pub fn erase_block<B: SpiBridge + ?Sized>(
    bridge: &mut B,
    dev: &FlashDevice,
    offset: u32,
) -> Result<()> {
    log::trace!("erase block at 0x{:08x}", offset);
    write_enable(bridge)?;
    bridge.chip_select(true)?;
    send_frame(bridge, dev, crate::spi::SECTOR_ERASE, offset, 0)?;
    bridge.chip_select(false)?;
    wait_ready(bridge)?;
    write_disable(bridge)
}

/// Program up to one page at `offset`.
///
/// `data` longer than the page is truncated to it; crossing a page
/// boundary would wrap inside the chip's page buffer.
pub fn program_page<B: SpiBridge + ?Sized>(
    bridge: &mut B,
    dev: &FlashDevice,
    offset: u32,
    data: &[u8],
) -> Result<()> {
    let data = &data[..data.len().min(dev.page as usize)];
    log::trace!("program {} bytes at 0x{:08x}", data.len(), offset);
    write_enable(bridge)?;
    bridge.chip_select(true)?;
    send_frame(bridge, dev, crate::spi::PAGE_PROGRAM, offset, 0)?;
    bridge.transfer(data, &mut [])?;
    bridge.chip_select(false)?;
    wait_ready(bridge)?;
    write_disable(bridge)
}
