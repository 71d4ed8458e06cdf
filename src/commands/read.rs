use std::error::Error;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use sflash_core::bridge::SpiBridge;
use sflash_core::{flash, FlashDevice};

use super::Meter;

pub fn run<B: SpiBridge + ?Sized>(
    bridge: &mut B,
    dev: &FlashDevice,
    output: &Path,
    offset: u32,
    size: u32,
    show_progress: bool,
) -> Result<(), Box<dyn Error>> {
    let mut sink: Box<dyn Write> = if output == Path::new("-") {
        Box::new(io::stdout().lock())
    } else {
        Box::new(File::create(output)?)
    };

    println!("Reading {} bytes from offset {}...", size, offset);
    let mut meter = Meter::new(size, !show_progress);
    let res = flash::read_to(bridge, dev, offset, size, &mut sink, &mut meter);
    meter.finish();
    res?;
    sink.flush()?;
    println!("Read completed");
    Ok(())
}
