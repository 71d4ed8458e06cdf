use std::error::Error;

use sflash_core::bridge::SpiBridge;
use sflash_core::{flash, FlashDevice, Requires};

use super::Meter;

pub fn run<B: SpiBridge + ?Sized>(
    bridge: &mut B,
    dev: &FlashDevice,
    offset: u32,
    size: u32,
    show_progress: bool,
) -> Result<(), Box<dyn Error>> {
    dev.require(Requires::ERASE_BLOCK)?;

    let span = flash::erase_span(dev, offset, size);
    let start = offset & !(dev.erase_block - 1);
    if span != size {
        println!(
            "Erasing {} bytes, rounded to {} bytes ({} sectors, starting from {})...",
            size,
            span,
            span / dev.erase_block,
            start
        );
    } else {
        println!(
            "Erasing {} bytes ({} sectors, starting from {})...",
            size,
            span / dev.erase_block,
            start
        );
    }

    let mut meter = Meter::new(size, !show_progress);
    let res = flash::erase_smart(bridge, dev, offset, size, &mut meter);
    meter.finish();
    res?;
    println!("Erase completed");
    Ok(())
}
