use std::error::Error;
use std::io::Read;
use std::path::Path;

use sflash_core::bridge::SpiBridge;
use sflash_core::{flash, FlashDevice};

use super::Meter;

pub fn run<B: SpiBridge + ?Sized>(
    bridge: &mut B,
    dev: &FlashDevice,
    input: &Path,
    offset: u32,
    size: u32,
    show_progress: bool,
) -> Result<(), Box<dyn Error>> {
    let data = if input == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin().lock().read_to_end(&mut buf)?;
        buf
    } else {
        std::fs::read(input)?
    };

    let size = size.min(data.len() as u32);
    let data = &data[..size as usize];

    // Erase first; the boundary blocks outside the range are preserved, so
    // the program pass below does not need to read-modify-write again.
    super::erase::run(bridge, dev, offset, size, show_progress)?;

    println!("Flashing {} bytes to offset {}...", size, offset);
    let mut meter = Meter::new(size, !show_progress);
    let res = flash::program_smart(bridge, dev, offset, data, false, &mut meter);
    meter.finish();
    let written = res?;
    println!("Flash completed ({} bytes written)", written);
    Ok(())
}
