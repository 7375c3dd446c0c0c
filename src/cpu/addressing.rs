//! Operand resolution for the standard 6502 addressing modes.
//!
//! Resolution is a pure read over the current registers and memory: it
//! never advances the program counter and never writes. Relative offsets
//! are consumed by branch dispatch, not here.

use crate::cpu::instruction::Addressing;
use crate::cpu::Cpu;
use crate::memory::Memory;

/// Effective address for modes that name a memory location. `None` for
/// Implied, Accumulator, Immediate and Relative.
pub(crate) fn operand_address(
    addressing: Addressing,
    operand: u16,
    cpu: &Cpu,
    memory: &Memory,
) -> Option<u16> {
    match addressing {
        Addressing::Implied
        | Addressing::Accumulator
        | Addressing::Immediate
        | Addressing::Relative => None,
        Addressing::ZeroPage => Some(operand & 0xFF),
        Addressing::ZeroPageX => Some((operand as u8).wrapping_add(cpu.x) as u16),
        Addressing::ZeroPageY => Some((operand as u8).wrapping_add(cpu.y) as u16),
        Addressing::Absolute => Some(operand),
        Addressing::AbsoluteX => Some(operand.wrapping_add(cpu.x as u16)),
        Addressing::AbsoluteY => Some(operand.wrapping_add(cpu.y as u16)),
        Addressing::IndexedIndirect => {
            let zp = (operand as u8).wrapping_add(cpu.x);
            Some(read_zero_page_pointer(memory, zp))
        }
        Addressing::IndirectIndexed => {
            let base = read_zero_page_pointer(memory, operand as u8);
            Some(base.wrapping_add(cpu.y as u16))
        }
    }
}

/// Resolved operand byte: immediate operand itself, the accumulator, or
/// the byte at the effective address.
pub(crate) fn operand_value(
    addressing: Addressing,
    operand: u16,
    cpu: &Cpu,
    memory: &Memory,
) -> Option<u8> {
    match addressing {
        Addressing::Immediate => Some(operand as u8),
        Addressing::Accumulator => Some(cpu.a),
        Addressing::Implied | Addressing::Relative => None,
        _ => operand_address(addressing, operand, cpu, memory).map(|addr| memory.read(addr)),
    }
}

/// Little-endian pointer fetched from the zero page. The high byte wraps
/// within page 0.
fn read_zero_page_pointer(memory: &Memory, zp: u8) -> u16 {
    let low = memory.read(zp as u16) as u16;
    let high = memory.read(zp.wrapping_add(1) as u16) as u16;
    (high << 8) | low
}
