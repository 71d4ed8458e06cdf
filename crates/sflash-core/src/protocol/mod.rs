//! SPI-NOR protocol sequences
//!
//! Single JEDEC command sequences (identification, status polling, the
//! write-enable bracket, one erase block, one page program). The loops that
//! string these together live in [`crate::flash`].

mod spi25;

pub use spi25::{
    erase_block, program_page, read_id, read_status, send_frame, wait_ready, write_disable,
    write_enable,
};
