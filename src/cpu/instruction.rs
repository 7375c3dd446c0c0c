/// One decoded instruction. Produced per fetch cycle and consumed
/// immediately; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u8,
    pub mnemonic: Mnemonic,
    pub addressing: Addressing,
}

impl Instruction {
    /// Decode an opcode byte against the dispatch table. Opcodes outside
    /// the modeled subset return `None`; the caller halts on them.
    pub fn decode(opcode: u8) -> Option<Self> {
        use Addressing::*;
        use Mnemonic::*;

        let (mnemonic, addressing) = match opcode {
            // ASL
            0x0A => (Asl, Accumulator),
            0x06 => (Asl, ZeroPage),
            0x16 => (Asl, ZeroPageX),
            0x0E => (Asl, Absolute),
            0x1E => (Asl, AbsoluteX),

            // Register loads
            0xA9 => (Lda, Immediate),
            0xA5 => (Lda, ZeroPage),
            0xB5 => (Lda, ZeroPageX),
            0xAD => (Lda, Absolute),
            0xBD => (Lda, AbsoluteX),
            0xB9 => (Lda, AbsoluteY),
            0xA1 => (Lda, IndexedIndirect),
            0xB1 => (Lda, IndirectIndexed),
            0xA2 => (Ldx, Immediate),
            0xA6 => (Ldx, ZeroPage),
            0xB6 => (Ldx, ZeroPageY),
            0xAE => (Ldx, Absolute),
            0xBE => (Ldx, AbsoluteY),
            0xA0 => (Ldy, Immediate),
            0xA4 => (Ldy, ZeroPage),
            0xB4 => (Ldy, ZeroPageX),
            0xAC => (Ldy, Absolute),
            0xBC => (Ldy, AbsoluteX),

            // Store accumulator
            0x85 => (Sta, ZeroPage),
            0x95 => (Sta, ZeroPageX),
            0x8D => (Sta, Absolute),
            0x9D => (Sta, AbsoluteX),
            0x99 => (Sta, AbsoluteY),
            0x81 => (Sta, IndexedIndirect),
            0x91 => (Sta, IndirectIndexed),

            // Compares
            0xC9 => (Cmp, Immediate),
            0xC5 => (Cmp, ZeroPage),
            0xD5 => (Cmp, ZeroPageX),
            0xCD => (Cmp, Absolute),
            0xDD => (Cmp, AbsoluteX),
            0xD9 => (Cmp, AbsoluteY),
            0xC1 => (Cmp, IndexedIndirect),
            0xD1 => (Cmp, IndirectIndexed),
            0xE0 => (Cpx, Immediate),
            0xE4 => (Cpx, ZeroPage),
            0xEC => (Cpx, Absolute),
            0xC0 => (Cpy, Immediate),
            0xC4 => (Cpy, ZeroPage),
            0xCC => (Cpy, Absolute),

            // Flag set/clear
            0x18 => (Clc, Implied),
            0x38 => (Sec, Implied),
            0x58 => (Cli, Implied),
            0x78 => (Sei, Implied),
            0xB8 => (Clv, Implied),
            0xD8 => (Cld, Implied),
            0xF8 => (Sed, Implied),

            // Branches
            0x10 => (Bpl, Relative),
            0x30 => (Bmi, Relative),
            0x50 => (Bvc, Relative),
            0x70 => (Bvs, Relative),
            0x90 => (Bcc, Relative),
            0xB0 => (Bcs, Relative),
            0xD0 => (Bne, Relative),
            0xF0 => (Beq, Relative),

            0xEA => (Nop, Implied),

            _ => return None,
        };
        Some(Instruction {
            opcode,
            mnemonic,
            addressing,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    Lda,
    Ldx,
    Ldy,
    Sta,
    Asl,
    Cmp,
    Cpx,
    Cpy,
    Clc,
    Sec,
    Cli,
    Sei,
    Clv,
    Cld,
    Sed,
    Bpl,
    Bmi,
    Bvc,
    Bvs,
    Bcc,
    Bcs,
    Bne,
    Beq,
    Nop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addressing {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Relative,
    IndexedIndirect,
    IndirectIndexed,
}

impl Addressing {
    /// Number of operand bytes following the opcode.
    pub fn operand_len(self) -> u16 {
        match self {
            Addressing::Implied | Addressing::Accumulator => 0,
            Addressing::Immediate
            | Addressing::ZeroPage
            | Addressing::ZeroPageX
            | Addressing::ZeroPageY
            | Addressing::Relative
            | Addressing::IndexedIndirect
            | Addressing::IndirectIndexed => 1,
            Addressing::Absolute | Addressing::AbsoluteX | Addressing::AbsoluteY => 2,
        }
    }
}
