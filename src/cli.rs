//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse a size with an optional multiplier suffix.
///
/// Accepts decimal or `0x` hex, with `B`, `K`/`KiB`, `M`/`MiB`, `G`/`GiB`
/// (binary) and `kB`/`MB`/`GB` (decimal) suffixes.
pub fn parse_size(s: &str) -> Result<u32, String> {
    const MULTIPLIERS: &[(&str, u64)] = &[
        ("B", 1),
        ("K", 1024),
        ("KiB", 1024),
        ("M", 1024 * 1024),
        ("MiB", 1024 * 1024),
        ("G", 1024 * 1024 * 1024),
        ("GiB", 1024 * 1024 * 1024),
        ("kB", 1000),
        ("MB", 1000 * 1000),
        ("GB", 1000 * 1000 * 1000),
    ];

    let s = s.trim();
    let digits_end = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        2 + hex.chars().take_while(|c| c.is_ascii_hexdigit()).count()
    } else {
        s.chars().take_while(|c| c.is_ascii_digit()).count()
    };
    let (num, suffix) = s.split_at(digits_end);

    let value: u64 = if let Some(hex) = num.strip_prefix("0x").or_else(|| num.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).map_err(|e| format!("can not parse '{}': {}", s, e))?
    } else {
        num.parse()
            .map_err(|e| format!("can not parse '{}': {}", s, e))?
    };

    let value = if suffix.is_empty() {
        value
    } else {
        let mul = MULTIPLIERS
            .iter()
            .find(|(name, _)| *name == suffix)
            .map(|(_, mul)| *mul)
            .ok_or_else(|| format!("can not parse '{}'", s))?;
        value
            .checked_mul(mul)
            .ok_or_else(|| format!("out of range '{}'", s))?
    };

    u32::try_from(value).map_err(|_| format!("out of range '{}' ({})", s, value))
}

/// Parse one hex byte ("9f" or "0x9f")
pub fn parse_hex_byte(s: &str) -> Result<u8, String> {
    let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    u8::from_str_radix(s, 16).map_err(|e| format!("invalid hex byte '{}': {}", s, e))
}

#[derive(Parser)]
#[command(name = "sflash")]
#[command(author, version, about = "SPI-NOR flash programmer for CH341A bridges", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Override the detected flash size
    #[arg(long, value_parser = parse_size, global = true)]
    pub flash_size: Option<u32>,

    /// Override the detected erase block size
    #[arg(long, value_parser = parse_size, global = true)]
    pub flash_erase_block: Option<u32>,

    /// Override the detected page size
    #[arg(long, value_parser = parse_size, global = true)]
    pub flash_page: Option<u32>,

    /// Do not show progress bars
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Run the SPI clock at double speed
    #[arg(long, global = true)]
    pub fast: bool,

    /// Open the nth CH341A when several are plugged in
    #[arg(long, default_value = "0", global = true)]
    pub device: usize,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Identify the flash chip and print its geometry
    Probe,

    /// Read flash contents to a file ('-' for stdout)
    Read {
        /// Output file path
        output: PathBuf,

        /// Offset into the flash to start reading at
        #[arg(short, long, value_parser = parse_size, default_value = "0")]
        offset: u32,

        /// Number of bytes to read (default: up to the end of the chip)
        #[arg(short, long, value_parser = parse_size)]
        size: Option<u32>,
    },

    /// Erase a range, then write a file into it ('-' for stdin)
    Flash {
        /// Input file path
        input: PathBuf,

        /// Offset into the flash to start writing at
        #[arg(short, long, value_parser = parse_size, default_value = "0")]
        offset: u32,

        /// Write at most this many bytes of the input
        #[arg(short, long, value_parser = parse_size)]
        size: Option<u32>,
    },

    /// Erase a range (boundary blocks are preserved outside the range)
    Erase {
        /// Offset into the flash to start erasing at
        #[arg(short, long, value_parser = parse_size, default_value = "0")]
        offset: u32,

        /// Number of bytes to erase (default: up to the end of the chip)
        #[arg(short, long, value_parser = parse_size)]
        size: Option<u32>,
    },

    /// Send a raw SPI command and print the response
    Raw {
        /// Command bytes to transmit, in hex
        #[arg(value_parser = parse_hex_byte, required = true)]
        tx: Vec<u8>,

        /// Number of response bytes to read back
        #[arg(short, long, default_value = "0")]
        read: usize,

        /// Capture the response from the first transmitted byte on
        #[arg(long)]
        duplex: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_size_plain_and_hex() {
        assert_eq!(parse_size("4096"), Ok(4096));
        assert_eq!(parse_size("0x1000"), Ok(4096));
        assert_eq!(parse_size("0"), Ok(0));
    }

    #[test]
    fn parse_size_binary_and_decimal_suffixes() {
        assert_eq!(parse_size("64K"), Ok(64 * 1024));
        assert_eq!(parse_size("64KiB"), Ok(64 * 1024));
        assert_eq!(parse_size("1kB"), Ok(1000));
        assert_eq!(parse_size("16M"), Ok(16 * 1024 * 1024));
        assert_eq!(parse_size("16MB"), Ok(16_000_000));
        assert_eq!(parse_size("2G"), Ok(2 * 1024 * 1024 * 1024));
        assert_eq!(parse_size("0x100K"), Ok(0x100 * 1024));
        assert_eq!(parse_size("512B"), Ok(512));
    }

    #[test]
    fn parse_size_rejects_junk_and_overflow() {
        assert!(parse_size("12Q").is_err());
        assert!(parse_size("").is_err());
        assert!(parse_size("8G").is_err());
        assert!(parse_size("k").is_err());
    }

    #[test]
    fn parse_hex_byte_forms() {
        assert_eq!(parse_hex_byte("9f"), Ok(0x9F));
        assert_eq!(parse_hex_byte("0x9F"), Ok(0x9F));
        assert!(parse_hex_byte("100").is_err());
    }

    #[test]
    fn cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
