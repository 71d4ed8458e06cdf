//! sflash - SPI-NOR flash programmer for CH341A USB bridges

mod cli;
mod commands;

use std::error::Error;

use clap::Parser;
use log::LevelFilter;
use sflash_core::bridge::SpiBridge;
use sflash_core::{chip, FlashDevice, Requires};

use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .init();

    let mut bridge = sflash_ch341a::Ch341a::open_nth(cli.device)?;
    bridge.set_speed(cli.fast)?;

    let mut dev = chip::identify(&mut bridge)?;
    if let Some(size) = cli.flash_size {
        dev.size = size;
    }
    if let Some(erase_block) = cli.flash_erase_block {
        dev.erase_block = erase_block;
    }
    if let Some(page) = cli.flash_page {
        dev.page = page;
    }

    commands::print_banner(&dev);

    let show_progress = !cli.no_progress;
    match cli.command {
        Commands::Probe => Ok(()),
        Commands::Read {
            output,
            offset,
            size,
        } => {
            let size = effective_size(&dev, offset, size, true)?;
            commands::read::run(&mut bridge, &dev, &output, offset, size, show_progress)
        }
        Commands::Flash {
            input,
            offset,
            size,
        } => {
            // the size is clamped to the input length inside the command, so
            // a chip-size truncation here is not worth a warning
            let size = effective_size(&dev, offset, size, false)?;
            commands::flash::run(&mut bridge, &dev, &input, offset, size, show_progress)
        }
        Commands::Erase { offset, size } => {
            let size = effective_size(&dev, offset, size, true)?;
            commands::erase::run(&mut bridge, &dev, offset, size, show_progress)
        }
        Commands::Raw { tx, read, duplex } => {
            commands::raw::run(&mut bridge, &tx, read, duplex)
        }
    }
}

/// Resolve the requested size against the chip geometry: default to the
/// rest of the chip, clamp anything that runs past the end.
fn effective_size(
    dev: &FlashDevice,
    offset: u32,
    requested: Option<u32>,
    warn_on_truncate: bool,
) -> Result<u32, Box<dyn Error>> {
    dev.require(Requires::SIZE)?;
    if offset > dev.size {
        return Err(format!(
            "offset {} is beyond the flash size {}",
            offset, dev.size
        )
        .into());
    }
    let max = dev.size - offset;
    match requested {
        Some(size) if size > max => {
            if warn_on_truncate {
                log::warn!("size is truncated to the flash size ({} bytes)", max);
            }
            Ok(max)
        }
        Some(size) => Ok(size),
        None => Ok(max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev() -> FlashDevice {
        FlashDevice {
            name: "test".into(),
            size: 4096,
            erase_block: 1024,
            page: 256,
            id: [0; sflash_core::ID_LEN],
        }
    }

    #[test]
    fn effective_size_defaults_to_rest_of_chip() {
        assert_eq!(effective_size(&dev(), 0, None, true).unwrap(), 4096);
        assert_eq!(effective_size(&dev(), 1000, None, true).unwrap(), 3096);
    }

    #[test]
    fn effective_size_clamps_to_chip_end() {
        assert_eq!(effective_size(&dev(), 4000, Some(500), true).unwrap(), 96);
        assert_eq!(effective_size(&dev(), 0, Some(100), true).unwrap(), 100);
    }

    #[test]
    fn effective_size_rejects_offset_past_end() {
        assert!(effective_size(&dev(), 5000, None, true).is_err());
    }

    #[test]
    fn effective_size_needs_a_known_size() {
        let mut d = dev();
        d.size = 0;
        assert!(effective_size(&d, 0, Some(16), true).is_err());
    }
}
