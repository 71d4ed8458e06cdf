use std::error::Error;

use sflash_core::bridge::SpiBridge;
use sflash_core::flash;

pub fn run<B: SpiBridge + ?Sized>(
    bridge: &mut B,
    tx: &[u8],
    read: usize,
    duplex: bool,
) -> Result<(), Box<dyn Error>> {
    let rx = flash::custom(bridge, tx, read, duplex)?;
    for (i, chunk) in rx.chunks(16).enumerate() {
        print!("{:04x}:", i * 16);
        for b in chunk {
            print!(" {:02x}", b);
        }
        println!();
    }
    Ok(())
}
