//! Flash operations
//!
//! High-level read, erase and program engines on top of the protocol
//! layer, plus the [`FlashDevice`] they operate on.

pub mod device;
mod ops;

pub use device::{FlashDevice, Requires, ID_LEN};
pub use ops::{
    custom, erase, erase_smart, erase_span, program, program_from, program_smart,
    program_smart_from, read, read_to, READ_CHUNK,
};
