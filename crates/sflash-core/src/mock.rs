//! Simulated SPI-NOR chip for tests
//!
//! Implements [`SpiBridge`] as the chip side of the wire: bytes clocked in
//! while chip-select is asserted are decoded as JEDEC commands, so framing,
//! chip-select handling and the write-enable sequence are all exercised.
//! Program pulls bits low (AND semantics), erase sets blocks to 0xFF.

use crate::bridge::SpiBridge;
use crate::error::{Error, Result};
use crate::flash::device::{FlashDevice, ID_LEN};
use crate::spi::opcodes;

pub struct MockChip {
    pub mem: Vec<u8>,
    pub erase_block: u32,
    pub page: u32,
    id: [u8; ID_LEN],
    cs: bool,
    cmd: Vec<u8>,
    out_pos: usize,
    wel: bool,
    /// Number of status polls left that still report write-in-progress
    pub busy_polls: u32,
    pub erase_count: u32,
    pub program_count: u32,
    pub status_reads: u32,
    pub speed_fast: bool,
    /// When set, the transfer after this many more calls fails
    pub fail_transfer_after: Option<u32>,
}

impl MockChip {
    pub fn new(size: usize, erase_block: u32, page: u32) -> Self {
        Self {
            mem: vec![0xFF; size],
            erase_block,
            page,
            id: [0xFF; ID_LEN],
            cs: false,
            cmd: Vec::new(),
            out_pos: 0,
            wel: false,
            busy_polls: 0,
            erase_count: 0,
            program_count: 0,
            status_reads: 0,
            speed_fast: false,
            fail_transfer_after: None,
        }
    }

    pub fn with_id(mut self, id: &[u8]) -> Self {
        self.id[..id.len()].copy_from_slice(id);
        self
    }

    pub fn fill(&mut self, byte: u8) {
        self.mem.fill(byte);
    }

    pub fn cs_asserted(&self) -> bool {
        self.cs
    }

    /// A device matching this chip's geometry.
    pub fn device(&self) -> FlashDevice {
        FlashDevice {
            name: "mock".into(),
            size: self.mem.len() as u32,
            erase_block: self.erase_block,
            page: self.page,
            id: self.id,
        }
    }

    fn addr_bytes(opcode: u8) -> usize {
        match opcode {
            opcodes::FAST_READ_4B
            | opcodes::PAGE_PROGRAM_4B
            | opcodes::SECTOR_ERASE_4B
            | opcodes::ERASE_4K_4B => 4,
            _ => 3,
        }
    }

    fn decode_addr(&self, n: usize) -> Option<usize> {
        if self.cmd.len() < 1 + n {
            return None;
        }
        let mut addr = 0usize;
        for &b in &self.cmd[1..1 + n] {
            addr = (addr << 8) | b as usize;
        }
        Some(addr)
    }

    /// Next byte the chip would drive onto MISO.
    fn next_out(&mut self) -> u8 {
        let Some(&opcode) = self.cmd.first() else {
            return 0xFF;
        };
        match opcode {
            opcodes::RDID => {
                let byte = self.id.get(self.out_pos).copied().unwrap_or(0xFF);
                self.out_pos += 1;
                byte
            }
            opcodes::RDSR => {
                self.status_reads += 1;
                let mut status = if self.wel { opcodes::SR_WEL } else { 0 };
                if self.busy_polls > 0 {
                    self.busy_polls -= 1;
                    status |= opcodes::SR_WIP;
                }
                status
            }
            opcodes::FAST_READ | opcodes::FAST_READ_4B => {
                let n = Self::addr_bytes(opcode);
                let Some(addr) = self.decode_addr(n) else {
                    return 0xFF;
                };
                let byte = self.mem.get(addr + self.out_pos).copied().unwrap_or(0xFF);
                self.out_pos += 1;
                byte
            }
            _ => 0xFF,
        }
    }

    /// Execute the command accumulated over the chip-select window.
    fn finalize(&mut self) {
        let Some(&opcode) = self.cmd.first() else {
            return;
        };
        match opcode {
            opcodes::WREN => self.wel = true,
            opcodes::WRDI => self.wel = false,
            opcodes::SECTOR_ERASE
            | opcodes::SECTOR_ERASE_4B
            | opcodes::ERASE_4K
            | opcodes::ERASE_4K_4B => {
                // without the latch the chip ignores the command
                if !self.wel {
                    return;
                }
                let n = Self::addr_bytes(opcode);
                let Some(addr) = self.decode_addr(n) else {
                    return;
                };
                let block = match opcode {
                    opcodes::ERASE_4K | opcodes::ERASE_4K_4B => 4096,
                    _ => self.erase_block as usize,
                };
                let base = addr - (addr % block);
                let end = (base + block).min(self.mem.len());
                self.mem[base..end].fill(0xFF);
                self.erase_count += 1;
                self.wel = false;
            }
            opcodes::PAGE_PROGRAM | opcodes::PAGE_PROGRAM_4B => {
                if !self.wel {
                    return;
                }
                let n = Self::addr_bytes(opcode);
                let Some(addr) = self.decode_addr(n) else {
                    return;
                };
                let page = self.page as usize;
                let base = addr - (addr % page);
                let data = self.cmd[1 + n..].to_vec();
                for (i, byte) in data.into_iter().enumerate() {
                    // the chip's page buffer wraps at the page boundary
                    let a = base + (addr - base + i) % page;
                    if a < self.mem.len() {
                        self.mem[a] &= byte;
                    }
                }
                self.program_count += 1;
                self.wel = false;
            }
            _ => {}
        }
    }

    fn check_fail(&mut self) -> Result<()> {
        if let Some(left) = self.fail_transfer_after {
            if left == 0 {
                return Err(Error::Transfer("injected failure".into()));
            }
            self.fail_transfer_after = Some(left - 1);
        }
        Ok(())
    }
}

impl SpiBridge for MockChip {
    fn set_speed(&mut self, fast: bool) -> Result<()> {
        self.speed_fast = fast;
        Ok(())
    }

    fn chip_select(&mut self, assert: bool) -> Result<()> {
        if assert {
            self.cmd.clear();
            self.out_pos = 0;
        } else if self.cs {
            self.finalize();
        }
        self.cs = assert;
        Ok(())
    }

    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<()> {
        assert!(self.cs, "transfer while chip-select is deasserted");
        self.check_fail()?;
        self.cmd.extend_from_slice(tx);
        for byte in rx.iter_mut() {
            *byte = self.next_out();
        }
        Ok(())
    }

    fn transfer_duplex(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<()> {
        assert!(self.cs, "transfer while chip-select is deasserted");
        assert_eq!(tx.len(), rx.len());
        self.check_fail()?;
        for (out, byte) in tx.iter().zip(rx.iter_mut()) {
            *byte = if self.cmd.is_empty() {
                0xFF
            } else {
                self.next_out()
            };
            self.cmd.push(*out);
        }
        Ok(())
    }
}
