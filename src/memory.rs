use crate::error::{EmulationError, EmulationResult};

pub const MEMORY_SIZE: usize = 0x10000;

/// Flat byte-addressable store covering the full 16-bit address space.
/// Used for both program and data; no mirroring or bank switching.
pub struct Memory {
    bytes: Box<[u8; MEMORY_SIZE]>,
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            bytes: Box::new([0; MEMORY_SIZE]),
        }
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.bytes[addr as usize] = value;
    }

    /// Sequential bulk write starting at `load_address`. Loads that would
    /// run past 0xFFFF are rejected rather than wrapped or truncated.
    pub fn load(&mut self, program: &[u8], load_address: u16) -> EmulationResult<()> {
        let start = load_address as usize;
        if start + program.len() > MEMORY_SIZE {
            return Err(EmulationError::AddressOutOfRange {
                load_address,
                len: program.len(),
            });
        }
        self.bytes[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..]
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
