//! Known flash families
//!
//! The catalog is matched by manufacturer-ID prefix in declaration order.
//! Decoding is a closed set of families; each decoder refines the part name
//! (and for Spansion also the geometry) from the full ID, or rejects it so
//! the walk falls through to the next matching entry.

const KIB: u32 = 1024;

/// A catalog entry: defaults plus the family decoder for the full ID.
pub(crate) struct FlashDescriptor {
    pub name: &'static str,
    pub erase_block: u32,
    pub page: u32,
    /// Manufacturer-ID prefix this entry matches
    pub id: &'static [u8],
    pub family: Family,
}

/// Order matters: M25P claims Micron parts up to 512 MBit, larger ones
/// fall through to the MT25Q entry with the same manufacturer byte.
pub(crate) const CATALOG: &[FlashDescriptor] = &[
    FlashDescriptor {
        name: "M25P",
        erase_block: 64 * KIB,
        page: 256,
        id: &[0x20],
        family: Family::M25p,
    },
    FlashDescriptor {
        name: "S25F",
        erase_block: 0,
        page: 0,
        id: &[0x01],
        family: Family::S25fl,
    },
    FlashDescriptor {
        name: "W25Q",
        erase_block: 64 * KIB,
        page: 256,
        id: &[0xEF],
        family: Family::W25q,
    },
    FlashDescriptor {
        name: "MT25Qxxxx",
        erase_block: 64 * KIB,
        page: 256,
        id: &[0x20],
        family: Family::Mt25q,
    },
];

/// Size from the JEDEC size-class byte (ID byte 2).
///
/// Valid classes are 0x10..=0x19 and 0x20..=0x25; the upper bank encodes
/// the exponent offset by 6. Anything else means the size stays unknown.
pub fn size_from_class(class: u8) -> u32 {
    if !matches!(class, 0x10..=0x19 | 0x20..=0x25) {
        return 0;
    }
    let exp = if class >= 0x20 { class - 6 } else { class };
    1 << exp
}

/// What a decoder learned from the full ID.
pub(crate) struct Refined {
    pub name: String,
    pub erase_block: Option<u32>,
    pub page: Option<u32>,
}

impl Refined {
    fn name(name: String) -> Self {
        Self {
            name,
            erase_block: None,
            page: None,
        }
    }
}

/// Chip family of a catalog entry.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Family {
    M25p,
    S25fl,
    W25q,
    Mt25q,
}

impl Family {
    /// Decode the full ID, or reject it (`None`) to fall through.
    pub fn decode(self, id: &[u8]) -> Option<Refined> {
        // the megabit mark the vendors put in part names
        let mark = size_from_class(id[2]) >> 17;
        match self {
            Family::M25p => {
                if mark > 512 {
                    return None;
                }
                let mark = if mark <= 8 { mark * 10 } else { mark };
                Some(Refined::name(format!("M25P{mark}")))
            }
            Family::W25q => {
                let suffix = match (id[1], id[2]) {
                    (0x40, 0x16) => "BV",
                    (0x40, 0x17) => "FV",
                    (0x40, 0x18) => "JV-IN/IQ/JQ",
                    (0x60, 0x18) => "FW",
                    (0x70, 0x18) => "JV-IM/JM",
                    _ => return None,
                };
                Some(Refined::name(format!("W25Q{mark}{suffix}")))
            }
            Family::S25fl => {
                let family: u32 = if id[1] == 79 { 79 } else { 25 };
                let mark = if mark <= 8 { mark * 10 } else { mark };
                let mut erase_block = match id[4] {
                    0 => Some(256 * KIB),
                    1 => Some(64 * KIB),
                    _ => None,
                };
                let page;
                if family == 79 {
                    erase_block = erase_block.map(|eb| eb * 2);
                    page = 512;
                } else {
                    page = 256;
                }
                let (medium, endian) = match id[5] {
                    0x80 => ('L', 'S'),
                    0x81 => ('S', 'S'),
                    _ => ('L', 'P'),
                };
                let name = if mark <= 512 {
                    format!("S{family:02}F{medium}{mark}{endian}")
                } else {
                    format!("S{family:02}GF{medium}{}{endian}", mark / 1024)
                };
                Some(Refined {
                    name,
                    erase_block,
                    page: Some(page),
                })
            }
            Family::Mt25q => {
                let series = match id[1] {
                    0xBA => 'L',
                    0xBB => 'U',
                    _ => 'x',
                };
                let name = if mark >= 1024 {
                    format!("MT25Q{series}0{}G", mark / 1024)
                } else {
                    format!("MT25Q{series}{mark:03}")
                };
                Some(Refined::name(name))
            }
        }
    }
}
