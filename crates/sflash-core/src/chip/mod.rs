//! Chip identification
//!
//! Reads the JEDEC ID and matches it against a small catalog of known
//! families. Identification never fails on an unknown chip: the fallback
//! device carries the raw ID, a generic name and whatever size the JEDEC
//! size class encodes, leaving geometry overrides to the caller.

mod catalog;

use crate::bridge::SpiBridge;
use crate::error::Result;
use crate::flash::device::{FlashDevice, ID_LEN};
use crate::protocol;

pub use catalog::size_from_class;

/// Read the JEDEC ID and build the matching [`FlashDevice`].
pub fn identify<B: SpiBridge + ?Sized>(bridge: &mut B) -> Result<FlashDevice> {
    let mut id = [0u8; ID_LEN];
    protocol::read_id(bridge, &mut id)?;
    let dev = device_from_id(&id);
    log::debug!(
        "identified {} (size {}, erase block {}, page {})",
        dev.name,
        dev.size,
        dev.erase_block,
        dev.page
    );
    Ok(dev)
}

/// Match an ID against the catalog.
///
/// Entries are tried in declaration order; the first one whose decoder
/// accepts the ID wins. A rejecting decoder leaves the entry's defaults in
/// place and falls through to the next matching entry. The size always
/// comes from the generic size class unless a decoder set it.
pub fn device_from_id(id: &[u8; ID_LEN]) -> FlashDevice {
    let mut dev = FlashDevice {
        name: "Unknown".into(),
        size: 0,
        erase_block: 0,
        page: 0,
        id: *id,
    };

    for entry in catalog::CATALOG {
        if !id.starts_with(entry.id) {
            continue;
        }
        dev.name = entry.name.into();
        dev.erase_block = entry.erase_block;
        dev.page = entry.page;
        if let Some(refined) = entry.family.decode(id) {
            dev.name = refined.name;
            if let Some(erase_block) = refined.erase_block {
                dev.erase_block = erase_block;
            }
            if let Some(page) = refined.page {
                dev.page = page;
            }
            break;
        }
    }

    if dev.size == 0 {
        dev.size = size_from_class(id[2]);
    }
    dev
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(bytes: &[u8]) -> [u8; ID_LEN] {
        let mut id = [0u8; ID_LEN];
        id[..bytes.len()].copy_from_slice(bytes);
        id
    }

    #[test]
    fn winbond_w25q32bv() {
        let dev = device_from_id(&id(&[0xEF, 0x40, 0x16]));
        assert_eq!(dev.name, "W25Q32BV");
        assert_eq!(dev.size, 4 * 1024 * 1024);
        assert_eq!(dev.erase_block, 64 * 1024);
        assert_eq!(dev.page, 256);
    }

    #[test]
    fn winbond_w25q256fw() {
        let dev = device_from_id(&id(&[0xEF, 0x60, 0x18]));
        assert_eq!(dev.name, "W25Q256FW");
        assert_eq!(dev.size, 32 * 1024 * 1024);
    }

    #[test]
    fn winbond_unknown_suffix_keeps_the_family_defaults() {
        // 0x40/0x19 is not in the suffix table: the decoder rejects and no
        // other entry matches 0xEF, so the entry defaults survive.
        let dev = device_from_id(&id(&[0xEF, 0x40, 0x19]));
        assert_eq!(dev.name, "W25Q");
        assert_eq!(dev.erase_block, 64 * 1024);
        assert_eq!(dev.size, 32 * 1024 * 1024);
    }

    #[test]
    fn micron_m25p40() {
        // 512 KiB part: mark 4 becomes 40
        let dev = device_from_id(&id(&[0x20, 0x20, 0x13]));
        assert_eq!(dev.name, "M25P40");
        assert_eq!(dev.size, 512 * 1024);
    }

    #[test]
    fn micron_mt25q_wins_after_m25p_rejects() {
        // 2 Gbit: mark 2048 > 512, so the M25P entry falls through to the
        // MT25Q entry with the same manufacturer byte.
        let dev = device_from_id(&id(&[0x20, 0xBA, 0x22]));
        assert_eq!(dev.name, "MT25QL02G");
        assert_eq!(dev.size, 256 * 1024 * 1024);
        assert_eq!(dev.erase_block, 64 * 1024);
    }

    #[test]
    fn m25p_entry_shadows_mt25q_for_small_micron_parts() {
        // marks up to 512 are claimed by the earlier M25P entry
        let dev = device_from_id(&id(&[0x20, 0xBB, 0x19]));
        assert_eq!(dev.name, "M25P256");
    }

    #[test]
    fn spansion_s25fl256s() {
        let dev = device_from_id(&id(&[0x01, 0x02, 0x19, 0x00, 0x01, 0x80]));
        assert_eq!(dev.name, "S25FL256S");
        assert_eq!(dev.size, 32 * 1024 * 1024);
        assert_eq!(dev.erase_block, 64 * 1024);
        assert_eq!(dev.page, 256);
    }

    #[test]
    fn spansion_family_79_doubles_the_erase_block() {
        let dev = device_from_id(&id(&[0x01, 79, 0x19, 0x00, 0x01, 0x81]));
        assert_eq!(dev.name, "S79FS256S");
        assert_eq!(dev.erase_block, 128 * 1024);
        assert_eq!(dev.page, 512);
    }

    #[test]
    fn unknown_manufacturer_falls_back_to_the_size_class() {
        let dev = device_from_id(&id(&[0xC2, 0x20, 0x17]));
        assert_eq!(dev.name, "Unknown");
        assert_eq!(dev.size, 8 * 1024 * 1024);
        assert_eq!(dev.erase_block, 0);
        assert_eq!(dev.page, 0);
    }

    #[test]
    fn invalid_size_class_yields_zero_size() {
        let dev = device_from_id(&id(&[0xC2, 0x20, 0x1B]));
        assert_eq!(dev.size, 0);
        let dev = device_from_id(&id(&[0xC2, 0x20, 0x26]));
        assert_eq!(dev.size, 0);
        let dev = device_from_id(&id(&[0xC2, 0x20, 0x0F]));
        assert_eq!(dev.size, 0);
    }

    #[test]
    fn identify_reads_the_id_over_the_bridge() {
        let mut chip =
            crate::mock::MockChip::new(0x400000, 0x10000, 256).with_id(&[0xEF, 0x40, 0x16]);
        let dev = identify(&mut chip).unwrap();
        assert_eq!(dev.name, "W25Q32BV");
        assert_eq!(&dev.id[..3], &[0xEF, 0x40, 0x16]);
    }
}
