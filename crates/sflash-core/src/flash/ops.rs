//! Read, erase and program engines
//!
//! Every operation takes the bridge and the identified [`FlashDevice`]
//! explicitly and validates the requested range and the geometry it needs
//! before the first chip command goes out. The "smart" variants handle
//! arbitrary, unaligned ranges by preserving the partial blocks and pages
//! around them.

use std::io::{Read, Write};

use crate::bridge::SpiBridge;
use crate::error::{Error, Result};
use crate::flash::device::{FlashDevice, Requires};
use crate::progress::{NoProgress, Progress};
use crate::protocol;
use crate::spi;

/// Chunk size of the streamed read path
pub const READ_CHUNK: usize = 16 * 1024;

/// Read `buf.len()` bytes starting at `offset` in a single transfer.
///
/// The whole read happens under one chip-select assertion; CS is released
/// on the way out even when the transfer fails.
pub fn read<B: SpiBridge + ?Sized>(
    bridge: &mut B,
    dev: &FlashDevice,
    offset: u32,
    buf: &mut [u8],
) -> Result<()> {
    dev.require(Requires::SIZE)?;
    dev.check_range(offset, buf.len() as u32)?;

    bridge.chip_select(true)?;
    let res = protocol::send_frame(bridge, dev, spi::FAST_READ, offset, 1)
        .and_then(|()| bridge.transfer(&[], buf));
    let cs = bridge.chip_select(false);
    res.and(cs)
}

/// Stream `len` bytes starting at `offset` into `sink`.
///
/// The chip keeps streaming sequentially while CS stays asserted, so the
/// whole range is one fast-read command pulled in [`READ_CHUNK`] pieces.
/// Progress reports the position before each chunk.
pub fn read_to<B, W, P>(
    bridge: &mut B,
    dev: &FlashDevice,
    offset: u32,
    len: u32,
    sink: &mut W,
    progress: &mut P,
) -> Result<()>
where
    B: SpiBridge + ?Sized,
    W: Write + ?Sized,
    P: Progress + ?Sized,
{
    dev.require(Requires::SIZE)?;
    dev.check_range(offset, len)?;

    bridge.chip_select(true)?;
    let res = read_stream(bridge, dev, offset, len, sink, progress);
    let cs = bridge.chip_select(false);
    res.and(cs)
}

fn read_stream<B, W, P>(
    bridge: &mut B,
    dev: &FlashDevice,
    offset: u32,
    len: u32,
    sink: &mut W,
    progress: &mut P,
) -> Result<()>
where
    B: SpiBridge + ?Sized,
    W: Write + ?Sized,
    P: Progress + ?Sized,
{
    protocol::send_frame(bridge, dev, spi::FAST_READ, offset, 1)?;
    let mut chunk = vec![0u8; READ_CHUNK];
    let mut pos: u32 = 0;
    while pos < len {
        let n = (len - pos).min(READ_CHUNK as u32) as usize;
        progress.report(pos, len);
        bridge.transfer(&[], &mut chunk[..n])?;
        sink.write_all(&chunk[..n])?;
        pos += n as u32;
    }
    Ok(())
}

/// Erase an aligned range, block by block.
///
/// Both `offset` and `len` must be erase-block aligned; nothing is rounded
/// here. Progress reports the position before each block. A failure mid-loop
/// leaves the blocks erased so far as they are.
pub fn erase<B, P>(
    bridge: &mut B,
    dev: &FlashDevice,
    offset: u32,
    len: u32,
    progress: &mut P,
) -> Result<()>
where
    B: SpiBridge + ?Sized,
    P: Progress + ?Sized,
{
    dev.require(Requires::SIZE | Requires::ERASE_BLOCK)?;
    dev.check_range(offset, len)?;
    if offset % dev.erase_block != 0 || len % dev.erase_block != 0 {
        return Err(Error::Alignment {
            offset,
            len,
            erase_block: dev.erase_block,
        });
    }

    let mut pos = 0;
    while pos < len {
        progress.report(pos, len);
        protocol::erase_block(bridge, dev, offset + pos)?;
        pos += dev.erase_block;
    }
    Ok(())
}

/// Erase an arbitrary range, preserving the rest of the boundary blocks.
///
/// The partial head and tail of the aligned superset are read out first
/// (both reads happen before anything is erased), the superset is erased,
/// then the preserved data is programmed back.
pub fn erase_smart<B, P>(
    bridge: &mut B,
    dev: &FlashDevice,
    offset: u32,
    len: u32,
    progress: &mut P,
) -> Result<()>
where
    B: SpiBridge + ?Sized,
    P: Progress + ?Sized,
{
    dev.require(Requires::SIZE | Requires::ERASE_BLOCK)?;
    dev.check_range(offset, len)?;

    let size_pre = offset % dev.erase_block;
    let mut size_post = dev.erase_block - ((offset + len) % dev.erase_block);
    if size_post == dev.erase_block {
        size_post = 0;
    }
    // reprogramming the boundaries needs the page size; aligned ranges don't
    if size_pre != 0 || size_post != 0 {
        dev.require(Requires::PAGE)?;
    }

    let mut buf_pre = vec![0u8; size_pre as usize];
    if size_pre != 0 {
        read(bridge, dev, offset - size_pre, &mut buf_pre)?;
    }
    let mut buf_post = vec![0u8; size_post as usize];
    if size_post != 0 {
        read(bridge, dev, offset + len, &mut buf_post)?;
    }

    erase(bridge, dev, offset - size_pre, len + size_pre + size_post, progress)?;

    if size_pre != 0 {
        program(bridge, dev, offset - size_pre, &buf_pre, &mut NoProgress)?;
    }
    if size_post != 0 {
        program_smart(bridge, dev, offset + len, &buf_post, false, &mut NoProgress)?;
    }
    Ok(())
}

/// Program a buffer in page strides. Returns the number of bytes written.
///
/// `offset` is expected to be page aligned; unaligned starts are the smart
/// variant's job. Progress reports the position before each page.
pub fn program<B, P>(
    bridge: &mut B,
    dev: &FlashDevice,
    offset: u32,
    data: &[u8],
    progress: &mut P,
) -> Result<u32>
where
    B: SpiBridge + ?Sized,
    P: Progress + ?Sized,
{
    dev.require(Requires::SIZE | Requires::PAGE)?;
    dev.check_range(offset, data.len() as u32)?;

    let len = data.len() as u32;
    let mut pos = 0;
    while pos < len {
        progress.report(pos, len);
        let stride = (len - pos).min(dev.page);
        protocol::program_page(
            bridge,
            dev,
            offset + pos,
            &data[pos as usize..(pos + stride) as usize],
        )?;
        pos += stride;
    }
    Ok(pos)
}

/// Program up to `len` bytes pulled from `source` in page strides.
///
/// A source that runs dry early stops the loop; the return value is the
/// number of bytes actually written.
pub fn program_from<B, R, P>(
    bridge: &mut B,
    dev: &FlashDevice,
    offset: u32,
    len: u32,
    source: &mut R,
    progress: &mut P,
) -> Result<u32>
where
    B: SpiBridge + ?Sized,
    R: Read + ?Sized,
    P: Progress + ?Sized,
{
    dev.require(Requires::SIZE | Requires::PAGE)?;
    dev.check_range(offset, len)?;

    let mut page_buf = vec![0u8; dev.page as usize];
    let mut pos = 0;
    while pos < len {
        progress.report(pos, len);
        let stride = (len - pos).min(dev.page) as usize;
        let got = fill_from(source, &mut page_buf[..stride])?;
        if got == 0 {
            break;
        }
        protocol::program_page(bridge, dev, offset + pos, &page_buf[..got])?;
        pos += got as u32;
        if got < stride {
            break;
        }
    }
    Ok(pos)
}

/// Program a buffer at an arbitrary offset.
///
/// An unaligned start is handled by reading the full page containing
/// `offset`, overlaying the head of the data and programming the whole page
/// back. A partial *last* page is programmed as-is - on a chip that is not
/// erased underneath, the bytes after the range in that page degrade,
/// matching the page-program semantics callers rely on. With `need_erase`
/// the range is smart-erased first.
pub fn program_smart<B, P>(
    bridge: &mut B,
    dev: &FlashDevice,
    offset: u32,
    data: &[u8],
    need_erase: bool,
    progress: &mut P,
) -> Result<u32>
where
    B: SpiBridge + ?Sized,
    P: Progress + ?Sized,
{
    dev.require(Requires::SIZE | Requires::PAGE)?;
    dev.check_range(offset, data.len() as u32)?;

    if need_erase {
        erase_smart(bridge, dev, offset, data.len() as u32, &mut NoProgress)?;
    }

    let size_pre = offset % dev.page;
    let mut offset = offset;
    let mut data = data;
    let mut written = 0;
    if size_pre != 0 {
        let take = (data.len() as u32).min(dev.page - size_pre);
        let mut page_buf = vec![0u8; dev.page as usize];
        read(bridge, dev, offset - size_pre, &mut page_buf)?;
        page_buf[size_pre as usize..(size_pre + take) as usize]
            .copy_from_slice(&data[..take as usize]);
        protocol::program_page(bridge, dev, offset - size_pre, &page_buf)?;
        written += take;
        offset += take;
        data = &data[take as usize..];
    }

    written += program(bridge, dev, offset, data, progress)?;
    Ok(written)
}

/// [`program_smart`] pulling from an `io::Read` source.
pub fn program_smart_from<B, R, P>(
    bridge: &mut B,
    dev: &FlashDevice,
    offset: u32,
    len: u32,
    source: &mut R,
    need_erase: bool,
    progress: &mut P,
) -> Result<u32>
where
    B: SpiBridge + ?Sized,
    R: Read + ?Sized,
    P: Progress + ?Sized,
{
    dev.require(Requires::SIZE | Requires::PAGE)?;
    dev.check_range(offset, len)?;

    if need_erase {
        erase_smart(bridge, dev, offset, len, &mut NoProgress)?;
    }

    let size_pre = offset % dev.page;
    let mut offset = offset;
    let mut len = len;
    let mut written = 0;
    if size_pre != 0 {
        let take = len.min(dev.page - size_pre);
        let mut page_buf = vec![0u8; dev.page as usize];
        read(bridge, dev, offset - size_pre, &mut page_buf)?;
        let got = fill_from(source, &mut page_buf[size_pre as usize..(size_pre + take) as usize])?
            as u32;
        if got != 0 {
            protocol::program_page(bridge, dev, offset - size_pre, &page_buf)?;
        }
        written += got;
        offset += got;
        len -= got;
        if got < take {
            return Ok(written);
        }
    }

    written += program_from(bridge, dev, offset, len, source, progress)?;
    Ok(written)
}

/// Ship a raw command and collect `rx_len` response bytes.
///
/// With `duplex` the capture window starts with the first transmitted byte
/// (the bus clocks `max(tx, rx)` bytes, tx padded with 0xFF); otherwise
/// `rx_len` bytes are clocked after the command went out.
pub fn custom<B: SpiBridge + ?Sized>(
    bridge: &mut B,
    tx: &[u8],
    rx_len: usize,
    duplex: bool,
) -> Result<Vec<u8>> {
    let mut rx = vec![0u8; rx_len];
    if duplex {
        let total = tx.len().max(rx_len);
        let mut out = vec![0xFFu8; total];
        out[..tx.len()].copy_from_slice(tx);
        let mut full = vec![0u8; total];
        bridge.chip_select(true)?;
        let res = bridge.transfer_duplex(&out, &mut full);
        let cs = bridge.chip_select(false);
        res.and(cs)?;
        rx.copy_from_slice(&full[..rx_len]);
    } else {
        bridge.transaction(tx, &mut rx)?;
    }
    Ok(rx)
}

/// Bytes the erase pass will actually wipe for a request, after rounding
/// `offset` down and the end up to erase-block boundaries.
pub fn erase_span(dev: &FlashDevice, offset: u32, len: u32) -> u32 {
    if len == 0 {
        return 0;
    }
    ((offset + len - 1) | (dev.erase_block - 1)) - (offset & !(dev.erase_block - 1)) + 1
}

fn fill_from<R: Read + ?Sized>(source: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut n = 0;
    while n < buf.len() {
        match source.read(&mut buf[n..])? {
            0 => break,
            k => n += k,
        }
    }
    Ok(n)
}
