//! Command implementations and shared CLI plumbing

pub mod erase;
pub mod flash;
pub mod raw;
pub mod read;

use indicatif::{ProgressBar, ProgressStyle};
use sflash_core::progress::Progress;
use sflash_core::FlashDevice;

/// Progress meter for flash operations: an indicatif bar, or nothing.
pub enum Meter {
    Bar(ProgressBar),
    Hidden,
}

impl Meter {
    pub fn new(total: u32, hidden: bool) -> Self {
        if hidden {
            return Meter::Hidden;
        }
        let pb = ProgressBar::new(u64::from(total));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
                .expect("static template")
                .progress_chars("#>-"),
        );
        Meter::Bar(pb)
    }

    pub fn finish(&self) {
        if let Meter::Bar(pb) = self {
            pb.finish_and_clear();
        }
    }
}

impl Progress for Meter {
    fn report(&mut self, done: u32, _total: u32) {
        if let Meter::Bar(pb) = self {
            pb.set_position(u64::from(done));
        }
    }
}

/// Render a byte count with the largest binary suffix that divides it.
pub fn format_size(value: u32) -> String {
    const SUFFIXES: [&str; 4] = ["", "KiB", "MiB", "GiB"];
    let mut value = value;
    let mut idx = 0;
    if value != 0 {
        for i in 1..SUFFIXES.len() {
            if value % 1024 == 0 {
                value /= 1024;
                idx = i;
            } else {
                break;
            }
        }
    }
    format!("{}{}", value, SUFFIXES[idx])
}

/// Identification banner printed before any command runs.
pub fn print_banner(dev: &FlashDevice) {
    println!("Flash:      {}", dev.name);
    println!("Size:       {}", format_size(dev.size));
    println!("EraseBlock: {}", format_size(dev.erase_block));
    println!("Page:       {}", format_size(dev.page));
    print!("ID:        ");
    for byte in dev.id {
        print!(" {:02x}", byte);
    }
    println!();
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_size_reduces_exact_multiples() {
        assert_eq!(format_size(0), "0");
        assert_eq!(format_size(256), "256");
        assert_eq!(format_size(64 * 1024), "64KiB");
        assert_eq!(format_size(4 * 1024 * 1024), "4MiB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1GiB");
        assert_eq!(format_size(1000), "1000");
        assert_eq!(format_size(1536), "1536");
    }
}
