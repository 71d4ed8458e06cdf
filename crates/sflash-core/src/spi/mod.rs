//! SPI command framing
//!
//! Opcode constants, address-width selection and the command frame builder
//! shared by the read, erase and program paths.

mod address;
mod command;
pub mod opcodes;

pub use address::AddressWidth;
pub use command::{CommandFrame, OpcodePair, FAST_READ, PAGE_PROGRAM, SECTOR_ERASE};
