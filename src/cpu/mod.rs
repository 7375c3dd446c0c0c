use bitflags::bitflags;

use crate::error::{EmulationError, EmulationResult};
use crate::memory::Memory;

pub(crate) mod addressing;
pub mod instruction;


use instruction::{Addressing, Instruction, Mnemonic};

/// Program counter value at power-on, matching the conventional ROM load
/// offset used by the console's load entry points.
pub const RESET_PC: u16 = 0x0600;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        const CARRY = 0b00000001;
        const ZERO = 0b00000010;
        const INTERRUPT_DISABLE = 0b00000100;
        const DECIMAL = 0b00001000;
        const BREAK = 0b00010000;
        const UNUSED = 0b00100000;
        const OVERFLOW = 0b01000000;
        const NEGATIVE = 0b10000000;
    }
}

pub struct Cpu {
    pub a: u8,   // Accumulator
    pub x: u8,   // X register
    pub y: u8,   // Y register
    pub sp: u8,  // Stack pointer
    pub pc: u16, // Program counter
    pub status: StatusFlags,
}

impl Cpu {
    pub fn new() -> Self {
        Cpu {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: RESET_PC,
            status: StatusFlags::from_bits_truncate(0x24),
        }
    }

    /// Execute exactly one instruction: fetch, decode, resolve, apply,
    /// advance. An opcode with no dispatch entry fails before any state
    /// changes, leaving the program counter at the faulting byte.
    pub fn step(&mut self, memory: &mut Memory) -> EmulationResult<()> {
        let opcode = memory.read(self.pc);
        let instruction = Instruction::decode(opcode).ok_or(EmulationError::UnknownOpcode {
            opcode,
            pc: self.pc,
        })?;
        let operand = self.fetch_operand(memory, instruction.addressing);

        // Branches may overwrite this below.
        self.pc = self
            .pc
            .wrapping_add(1 + instruction.addressing.operand_len());

        match instruction.mnemonic {
            Mnemonic::Lda => {
                let value = self.value_operand(instruction, operand, memory);
                self.a = value;
                self.set_zero_negative_flags(value);
            }
            Mnemonic::Ldx => {
                let value = self.value_operand(instruction, operand, memory);
                self.x = value;
                self.set_zero_negative_flags(value);
            }
            Mnemonic::Ldy => {
                let value = self.value_operand(instruction, operand, memory);
                self.y = value;
                self.set_zero_negative_flags(value);
            }
            Mnemonic::Sta => {
                let addr = self.address_operand(instruction, operand, memory);
                memory.write(addr, self.a);
            }
            Mnemonic::Asl => {
                if instruction.addressing == Addressing::Accumulator {
                    self.a = self.shift_left(self.a);
                } else {
                    let addr = self.address_operand(instruction, operand, memory);
                    let result = self.shift_left(memory.read(addr));
                    memory.write(addr, result);
                }
            }
            Mnemonic::Cmp => {
                let value = self.value_operand(instruction, operand, memory);
                self.compare(self.a, value);
            }
            Mnemonic::Cpx => {
                let value = self.value_operand(instruction, operand, memory);
                self.compare(self.x, value);
            }
            Mnemonic::Cpy => {
                let value = self.value_operand(instruction, operand, memory);
                self.compare(self.y, value);
            }
            Mnemonic::Clc => self.status.remove(StatusFlags::CARRY),
            Mnemonic::Sec => self.status.insert(StatusFlags::CARRY),
            Mnemonic::Cli => self.status.remove(StatusFlags::INTERRUPT_DISABLE),
            Mnemonic::Sei => self.status.insert(StatusFlags::INTERRUPT_DISABLE),
            Mnemonic::Clv => self.status.remove(StatusFlags::OVERFLOW),
            Mnemonic::Cld => self.status.remove(StatusFlags::DECIMAL),
            Mnemonic::Sed => self.status.insert(StatusFlags::DECIMAL),
            Mnemonic::Bpl => self.branch(!self.status.contains(StatusFlags::NEGATIVE), operand),
            Mnemonic::Bmi => self.branch(self.status.contains(StatusFlags::NEGATIVE), operand),
            Mnemonic::Bvc => self.branch(!self.status.contains(StatusFlags::OVERFLOW), operand),
            Mnemonic::Bvs => self.branch(self.status.contains(StatusFlags::OVERFLOW), operand),
            Mnemonic::Bcc => self.branch(!self.status.contains(StatusFlags::CARRY), operand),
            Mnemonic::Bcs => self.branch(self.status.contains(StatusFlags::CARRY), operand),
            Mnemonic::Bne => self.branch(!self.status.contains(StatusFlags::ZERO), operand),
            Mnemonic::Beq => self.branch(self.status.contains(StatusFlags::ZERO), operand),
            Mnemonic::Nop => {}
        }
        Ok(())
    }

    /// Raw operand bytes following the opcode, composed little-endian.
    fn fetch_operand(&self, memory: &Memory, addressing: Addressing) -> u16 {
        match addressing.operand_len() {
            0 => 0,
            1 => memory.read(self.pc.wrapping_add(1)) as u16,
            _ => {
                let low = memory.read(self.pc.wrapping_add(1)) as u16;
                let high = memory.read(self.pc.wrapping_add(2)) as u16;
                (high << 8) | low
            }
        }
    }

    fn value_operand(&self, instruction: Instruction, operand: u16, memory: &Memory) -> u8 {
        addressing::operand_value(instruction.addressing, operand, self, memory).unwrap_or_else(
            || {
                unreachable!(
                    "dispatch table pairs {:?} with a value-producing mode",
                    instruction.mnemonic
                )
            },
        )
    }

    fn address_operand(&self, instruction: Instruction, operand: u16, memory: &Memory) -> u16 {
        addressing::operand_address(instruction.addressing, operand, self, memory).unwrap_or_else(
            || {
                unreachable!(
                    "dispatch table pairs {:?} with an addressable mode",
                    instruction.mnemonic
                )
            },
        )
    }

    fn branch(&mut self, taken: bool, operand: u16) {
        if taken {
            // Signed offset relative to the PC after the operand byte.
            let offset = operand as u8 as i8;
            self.pc = self.pc.wrapping_add(offset as u16);
        }
    }

    fn shift_left(&mut self, value: u8) -> u8 {
        let result = value << 1;
        self.status.set(StatusFlags::CARRY, value & 0x80 != 0);
        self.set_zero_negative_flags(result);
        result
    }

    /// Carry uses strict greater-than: an equal compare sets Zero and
    /// leaves Carry clear. Negative is untouched by compares.
    fn compare(&mut self, register: u8, value: u8) {
        self.status.set(StatusFlags::ZERO, register == value);
        self.status.set(StatusFlags::CARRY, register > value);
    }

    fn set_zero_negative_flags(&mut self, value: u8) {
        self.status.set(StatusFlags::ZERO, value == 0);
        self.status.set(StatusFlags::NEGATIVE, value & 0x80 != 0);
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
