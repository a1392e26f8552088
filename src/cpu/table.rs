//! Flat 256-entry opcode decode table. Each opcode byte maps to an
//! `(Operation, AddressingMode)` pair; unassigned bytes decode to
//! `Operation::Illegal`, which `execute` treats as a 2-cycle NOP.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndirectX,
    IndirectY,
    Relative,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Lda, Ldx, Ldy, Sta, Stx, Sty,
    Tax, Tay, Txa, Tya, Tsx, Txs,
    Pha, Php, Pla, Plp,
    And, Ora, Eor, Bit,
    Adc, Sbc,
    Cmp, Cpx, Cpy,
    Asl, Lsr, Rol, Ror,
    Inc, Dec, Inx, Iny, Dex, Dey,
    Clc, Sec, Cld, Sed, Cli, Sei, Clv,
    Bcc, Bcs, Beq, Bne, Bmi, Bpl, Bvc, Bvs,
    Jmp, JmpIndirect, Jsr, Rts,
    Brk, Rti, Nop,
    Illegal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DecodedOpcode {
    pub op: Operation,
    pub mode: AddressingMode,
}

const fn d(op: Operation, mode: AddressingMode) -> DecodedOpcode {
    DecodedOpcode { op, mode }
}

const ILLEGAL: DecodedOpcode = d(Operation::Illegal, AddressingMode::Implied);

/// Decode a single opcode byte. Implemented as a match rather than a static
/// array so illegal bytes fall through to one shared `ILLEGAL` arm.
pub fn decode(opcode: u8) -> DecodedOpcode {
    use AddressingMode::*;
    use Operation::*;
    match opcode {
        0x00 => d(Brk, Implied),
        0x01 => d(Ora, IndirectX),
        0x05 => d(Ora, ZeroPage),
        0x06 => d(Asl, ZeroPage),
        0x08 => d(Php, Implied),
        0x09 => d(Ora, Immediate),
        0x0A => d(Asl, Accumulator),
        0x0D => d(Ora, Absolute),
        0x0E => d(Asl, Absolute),

        0x10 => d(Bpl, Relative),
        0x11 => d(Ora, IndirectY),
        0x15 => d(Ora, ZeroPageX),
        0x16 => d(Asl, ZeroPageX),
        0x18 => d(Clc, Implied),
        0x19 => d(Ora, AbsoluteY),
        0x1D => d(Ora, AbsoluteX),
        0x1E => d(Asl, AbsoluteX),

        0x20 => d(Jsr, Absolute),
        0x21 => d(And, IndirectX),
        0x24 => d(Bit, ZeroPage),
        0x25 => d(And, ZeroPage),
        0x26 => d(Rol, ZeroPage),
        0x28 => d(Plp, Implied),
        0x29 => d(And, Immediate),
        0x2A => d(Rol, Accumulator),
        0x2C => d(Bit, Absolute),
        0x2D => d(And, Absolute),
        0x2E => d(Rol, Absolute),

        0x30 => d(Bmi, Relative),
        0x31 => d(And, IndirectY),
        0x35 => d(And, ZeroPageX),
        0x36 => d(Rol, ZeroPageX),
        0x38 => d(Sec, Implied),
        0x39 => d(And, AbsoluteY),
        0x3D => d(And, AbsoluteX),
        0x3E => d(Rol, AbsoluteX),

        0x40 => d(Rti, Implied),
        0x41 => d(Eor, IndirectX),
        0x45 => d(Eor, ZeroPage),
        0x46 => d(Lsr, ZeroPage),
        0x48 => d(Pha, Implied),
        0x49 => d(Eor, Immediate),
        0x4A => d(Lsr, Accumulator),
        0x4C => d(Jmp, Absolute),
        0x4D => d(Eor, Absolute),
        0x4E => d(Lsr, Absolute),

        0x50 => d(Bvc, Relative),
        0x51 => d(Eor, IndirectY),
        0x55 => d(Eor, ZeroPageX),
        0x56 => d(Lsr, ZeroPageX),
        0x58 => d(Cli, Implied),
        0x59 => d(Eor, AbsoluteY),
        0x5D => d(Eor, AbsoluteX),
        0x5E => d(Lsr, AbsoluteX),

        0x60 => d(Rts, Implied),
        0x61 => d(Adc, IndirectX),
        0x65 => d(Adc, ZeroPage),
        0x66 => d(Ror, ZeroPage),
        0x68 => d(Pla, Implied),
        0x69 => d(Adc, Immediate),
        0x6A => d(Ror, Accumulator),
        0x6C => d(JmpIndirect, Indirect),
        0x6D => d(Adc, Absolute),
        0x6E => d(Ror, Absolute),

        0x70 => d(Bvs, Relative),
        0x71 => d(Adc, IndirectY),
        0x75 => d(Adc, ZeroPageX),
        0x76 => d(Ror, ZeroPageX),
        0x78 => d(Sei, Implied),
        0x79 => d(Adc, AbsoluteY),
        0x7D => d(Adc, AbsoluteX),
        0x7E => d(Ror, AbsoluteX),

        0x81 => d(Sta, IndirectX),
        0x84 => d(Sty, ZeroPage),
        0x85 => d(Sta, ZeroPage),
        0x86 => d(Stx, ZeroPage),
        0x88 => d(Dey, Implied),
        0x8A => d(Txa, Implied),
        0x8C => d(Sty, Absolute),
        0x8D => d(Sta, Absolute),
        0x8E => d(Stx, Absolute),

        0x90 => d(Bcc, Relative),
        0x91 => d(Sta, IndirectY),
        0x94 => d(Sty, ZeroPageX),
        0x95 => d(Sta, ZeroPageX),
        0x96 => d(Stx, ZeroPageY),
        0x98 => d(Tya, Implied),
        0x99 => d(Sta, AbsoluteY),
        0x9A => d(Txs, Implied),
        0x9D => d(Sta, AbsoluteX),

        0xA0 => d(Ldy, Immediate),
        0xA1 => d(Lda, IndirectX),
        0xA2 => d(Ldx, Immediate),
        0xA4 => d(Ldy, ZeroPage),
        0xA5 => d(Lda, ZeroPage),
        0xA6 => d(Ldx, ZeroPage),
        0xA8 => d(Tay, Implied),
        0xA9 => d(Lda, Immediate),
        0xAA => d(Tax, Implied),
        0xAC => d(Ldy, Absolute),
        0xAD => d(Lda, Absolute),
        0xAE => d(Ldx, Absolute),

        0xB0 => d(Bcs, Relative),
        0xB1 => d(Lda, IndirectY),
        0xB4 => d(Ldy, ZeroPageX),
        0xB5 => d(Lda, ZeroPageX),
        0xB6 => d(Ldx, ZeroPageY),
        0xB8 => d(Clv, Implied),
        0xB9 => d(Lda, AbsoluteY),
        0xBA => d(Tsx, Implied),
        0xBC => d(Ldy, AbsoluteX),
        0xBD => d(Lda, AbsoluteX),
        0xBE => d(Ldx, AbsoluteY),

        0xC0 => d(Cpy, Immediate),
        0xC1 => d(Cmp, IndirectX),
        0xC4 => d(Cpy, ZeroPage),
        0xC5 => d(Cmp, ZeroPage),
        0xC6 => d(Dec, ZeroPage),
        0xC8 => d(Iny, Implied),
        0xC9 => d(Cmp, Immediate),
        0xCA => d(Dex, Implied),
        0xCC => d(Cpy, Absolute),
        0xCD => d(Cmp, Absolute),
        0xCE => d(Dec, Absolute),

        0xD0 => d(Bne, Relative),
        0xD1 => d(Cmp, IndirectY),
        0xD5 => d(Cmp, ZeroPageX),
        0xD6 => d(Dec, ZeroPageX),
        0xD8 => d(Cld, Implied),
        0xD9 => d(Cmp, AbsoluteY),
        0xDD => d(Cmp, AbsoluteX),
        0xDE => d(Dec, AbsoluteX),

        0xE0 => d(Cpx, Immediate),
        0xE1 => d(Sbc, IndirectX),
        0xE4 => d(Cpx, ZeroPage),
        0xE5 => d(Sbc, ZeroPage),
        0xE6 => d(Inc, ZeroPage),
        0xE8 => d(Inx, Implied),
        0xE9 => d(Sbc, Immediate),
        0xEA => d(Nop, Implied),
        0xEC => d(Cpx, Absolute),
        0xED => d(Sbc, Absolute),
        0xEE => d(Inc, Absolute),

        0xF0 => d(Beq, Relative),
        0xF1 => d(Sbc, IndirectY),
        0xF5 => d(Sbc, ZeroPageX),
        0xF6 => d(Inc, ZeroPageX),
        0xF8 => d(Sed, Implied),
        0xF9 => d(Sbc, AbsoluteY),
        0xFD => d(Sbc, AbsoluteX),
        0xFE => d(Inc, AbsoluteX),

        _ => ILLEGAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lda_immediate_decodes() {
        let d = decode(0xA9);
        assert_eq!(d.op, Operation::Lda);
        assert_eq!(d.mode, AddressingMode::Immediate);
    }

    #[test]
    fn unassigned_byte_is_illegal() {
        let d = decode(0x02);
        assert_eq!(d.op, Operation::Illegal);
    }

    #[test]
    fn jmp_indirect_decodes() {
        let d = decode(0x6C);
        assert_eq!(d.op, Operation::JmpIndirect);
        assert_eq!(d.mode, AddressingMode::Indirect);
    }
}
