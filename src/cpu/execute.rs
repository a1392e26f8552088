//! Instruction dispatch. `Cpu::step` fetches one opcode and issues exactly
//! the bus traffic real hardware issues for it (including dummy reads and
//! internal filler cycles), so the embedded per-access PPU tick in `Bus`
//! keeps CPU and PPU locked together even though a whole instruction resolves
//! within a single call.

use super::addressing::{self, AccessKind};
use super::operations::{apply_read_op, apply_rmw_op, value_for_store};
use super::state::{CpuState, BREAK, CARRY, IRQ_DISABLE, NEGATIVE, OVERFLOW, ZERO};
use super::table::{decode, AddressingMode, Operation};
use crate::bus::Bus;

/// The 6502 core: architectural registers plus instruction dispatch.
#[derive(Debug, Clone)]
pub struct Cpu {
    state: CpuState,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            state: CpuState::new(),
        }
    }

    pub fn reset(&mut self, bus: &mut Bus) {
        self.state.reset(bus);
    }

    pub fn pc(&self) -> u16 {
        self.state.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.state.pc = pc;
    }

    pub fn a(&self) -> u8 {
        self.state.a
    }

    pub fn x(&self) -> u8 {
        self.state.x
    }

    pub fn y(&self) -> u8 {
        self.state.y
    }

    pub fn sp(&self) -> u8 {
        self.state.sp
    }

    pub fn status(&self) -> u8 {
        self.state.status
    }

    /// Runs one instruction (or one interrupt-entry sequence, if NMI/IRQ is
    /// pending at this boundary) and returns the CPU cycle count it consumed.
    pub fn step(&mut self, bus: &mut Bus) -> u32 {
        if bus.take_nmi_edge() {
            self.service_interrupt(bus, 0xFFFA, false);
            return 7;
        }
        if bus.irq_line() && !self.state.is_flag_set(IRQ_DISABLE) {
            self.service_interrupt(bus, 0xFFFE, false);
            return 7;
        }

        let opcode = addressing::fetch_u8(&mut self.state, bus);
        let decoded = decode(opcode);
        self.dispatch(bus, decoded.op, decoded.mode)
    }

    fn dispatch(&mut self, bus: &mut Bus, op: Operation, mode: AddressingMode) -> u32 {
        use AddressingMode::*;
        use Operation::*;

        match op {
            Brk => {
                self.execute_brk(bus);
                return 7;
            }
            Rti => {
                self.execute_rti(bus);
                return 6;
            }
            Jsr => {
                self.execute_jsr(bus);
                return 6;
            }
            Rts => {
                self.execute_rts(bus);
                return 6;
            }
            Jmp => {
                let addr = addressing::absolute(&mut self.state, bus);
                self.state.pc = addr;
                return 3;
            }
            JmpIndirect => {
                let ptr = addressing::absolute(&mut self.state, bus);
                let addr = addressing::indirect_jmp_target(bus, ptr);
                self.state.pc = addr;
                return 5;
            }
            Pha => {
                let _ = bus.read(self.state.pc);
                self.state.push_u8(bus, self.state.a);
                return 3;
            }
            Php => {
                let _ = bus.read(self.state.pc);
                let v = self.state.compose_status_for_push(true);
                self.state.push_u8(bus, v);
                return 3;
            }
            Pla => {
                let _ = bus.read(self.state.pc);
                let _ = bus.read(0x0100 | self.state.sp as u16);
                let v = self.state.pop_u8(bus);
                self.state.a = v;
                self.state.update_zn(v);
                return 4;
            }
            Plp => {
                let _ = bus.read(self.state.pc);
                let _ = bus.read(0x0100 | self.state.sp as u16);
                let pulled = self.state.pop_u8(bus);
                self.state.status = (pulled & !BREAK) | super::state::UNUSED;
                return 4;
            }
            Bcc => return self.execute_branch(bus, !self.state.is_flag_set(CARRY)),
            Bcs => return self.execute_branch(bus, self.state.is_flag_set(CARRY)),
            Beq => return self.execute_branch(bus, self.state.is_flag_set(ZERO)),
            Bne => return self.execute_branch(bus, !self.state.is_flag_set(ZERO)),
            Bmi => return self.execute_branch(bus, self.state.is_flag_set(NEGATIVE)),
            Bpl => return self.execute_branch(bus, !self.state.is_flag_set(NEGATIVE)),
            Bvc => return self.execute_branch(bus, !self.state.is_flag_set(OVERFLOW)),
            Bvs => return self.execute_branch(bus, self.state.is_flag_set(OVERFLOW)),
            Clc => {
                let _ = bus.read(self.state.pc);
                self.state.clear_flag_bit(CARRY);
                return 2;
            }
            Sec => {
                let _ = bus.read(self.state.pc);
                self.state.set_flag_bit(CARRY);
                return 2;
            }
            Cld => {
                let _ = bus.read(self.state.pc);
                self.state.clear_flag_bit(super::state::DECIMAL);
                return 2;
            }
            Sed => {
                let _ = bus.read(self.state.pc);
                self.state.set_flag_bit(super::state::DECIMAL);
                return 2;
            }
            Cli => {
                let _ = bus.read(self.state.pc);
                self.state.clear_flag_bit(IRQ_DISABLE);
                return 2;
            }
            Sei => {
                let _ = bus.read(self.state.pc);
                self.state.set_flag_bit(IRQ_DISABLE);
                return 2;
            }
            Clv => {
                let _ = bus.read(self.state.pc);
                self.state.clear_flag_bit(OVERFLOW);
                return 2;
            }
            Tax => {
                let _ = bus.read(self.state.pc);
                self.state.x = self.state.a;
                self.state.update_zn(self.state.x);
                return 2;
            }
            Tay => {
                let _ = bus.read(self.state.pc);
                self.state.y = self.state.a;
                self.state.update_zn(self.state.y);
                return 2;
            }
            Txa => {
                let _ = bus.read(self.state.pc);
                self.state.a = self.state.x;
                self.state.update_zn(self.state.a);
                return 2;
            }
            Tya => {
                let _ = bus.read(self.state.pc);
                self.state.a = self.state.y;
                self.state.update_zn(self.state.a);
                return 2;
            }
            Tsx => {
                let _ = bus.read(self.state.pc);
                self.state.x = self.state.sp;
                self.state.update_zn(self.state.x);
                return 2;
            }
            Txs => {
                let _ = bus.read(self.state.pc);
                self.state.sp = self.state.x;
                return 2;
            }
            Inx => {
                let _ = bus.read(self.state.pc);
                self.state.x = self.state.x.wrapping_add(1);
                self.state.update_zn(self.state.x);
                return 2;
            }
            Iny => {
                let _ = bus.read(self.state.pc);
                self.state.y = self.state.y.wrapping_add(1);
                self.state.update_zn(self.state.y);
                return 2;
            }
            Dex => {
                let _ = bus.read(self.state.pc);
                self.state.x = self.state.x.wrapping_sub(1);
                self.state.update_zn(self.state.x);
                return 2;
            }
            Dey => {
                let _ = bus.read(self.state.pc);
                self.state.y = self.state.y.wrapping_sub(1);
                self.state.update_zn(self.state.y);
                return 2;
            }
            Nop | Illegal => {
                let _ = bus.read(self.state.pc);
                return 2;
            }
            _ => {}
        }

        self.dispatch_memory_op(bus, op, mode)
    }

    fn dispatch_memory_op(&mut self, bus: &mut Bus, op: Operation, mode: AddressingMode) -> u32 {
        use AddressingMode::*;
        use Operation::*;

        let kind = match op {
            Sta | Stx | Sty => AccessKind::Write,
            Asl | Lsr | Rol | Ror | Inc | Dec => AccessKind::Rmw,
            _ => AccessKind::Read,
        };

        match mode {
            Immediate => {
                let value = addressing::fetch_u8(&mut self.state, bus);
                apply_read_op(&mut self.state, op, value);
                2
            }
            Accumulator => {
                let _ = bus.read(self.state.pc);
                let result = apply_rmw_op(&mut self.state, op, self.state.a);
                self.state.a = result;
                2
            }
            ZeroPage => {
                let addr = addressing::zero_page(&mut self.state, bus);
                self.run_memory_access(bus, op, kind, addr);
                match kind {
                    AccessKind::Read => 3,
                    AccessKind::Write => 3,
                    AccessKind::Rmw => 5,
                }
            }
            ZeroPageX => {
                let addr = addressing::zero_page_indexed(&mut self.state, bus, self.state.x);
                self.run_memory_access(bus, op, kind, addr);
                match kind {
                    AccessKind::Read | AccessKind::Write => 4,
                    AccessKind::Rmw => 6,
                }
            }
            ZeroPageY => {
                let addr = addressing::zero_page_indexed(&mut self.state, bus, self.state.y);
                self.run_memory_access(bus, op, kind, addr);
                4
            }
            Absolute => {
                let addr = addressing::absolute(&mut self.state, bus);
                self.run_memory_access(bus, op, kind, addr);
                match kind {
                    AccessKind::Read => 4,
                    AccessKind::Write => 4,
                    AccessKind::Rmw => 6,
                }
            }
            AbsoluteX => {
                let (addr, crossed) = addressing::absolute_indexed(&mut self.state, bus, self.state.x, kind);
                self.run_memory_access(bus, op, kind, addr);
                match kind {
                    AccessKind::Read => {
                        if crossed {
                            5
                        } else {
                            4
                        }
                    }
                    AccessKind::Write => 5,
                    AccessKind::Rmw => 7,
                }
            }
            AbsoluteY => {
                let (addr, crossed) = addressing::absolute_indexed(&mut self.state, bus, self.state.y, kind);
                self.run_memory_access(bus, op, kind, addr);
                match kind {
                    AccessKind::Read => {
                        if crossed {
                            5
                        } else {
                            4
                        }
                    }
                    AccessKind::Write => 5,
                    AccessKind::Rmw => 7,
                }
            }
            IndirectX => {
                let addr = addressing::indirect_x(&mut self.state, bus, self.state.x);
                self.run_memory_access(bus, op, kind, addr);
                6
            }
            IndirectY => {
                let (addr, crossed) = addressing::indirect_y(&mut self.state, bus, self.state.y, kind);
                self.run_memory_access(bus, op, kind, addr);
                match kind {
                    AccessKind::Read => {
                        if crossed {
                            6
                        } else {
                            5
                        }
                    }
                    AccessKind::Write => 6,
                    AccessKind::Rmw => unreachable!("no legal opcode pairs (indirect),Y with an RMW operation"),
                }
            }
            Implied | Relative | Indirect => {
                unreachable!("{op:?}/{mode:?} is dispatched by its own arm in `dispatch`")
            }
        }
    }

    fn run_memory_access(&mut self, bus: &mut Bus, op: Operation, kind: AccessKind, addr: u16) {
        match kind {
            AccessKind::Read => {
                let v = bus.read(addr);
                apply_read_op(&mut self.state, op, v);
            }
            AccessKind::Write => {
                let v = value_for_store(&self.state, op);
                bus.write(addr, v);
            }
            AccessKind::Rmw => {
                let v = bus.read(addr);
                bus.write(addr, v); // dummy write-back of the unmodified value
                let result = apply_rmw_op(&mut self.state, op, v);
                bus.write(addr, result);
            }
        }
    }

    fn execute_branch(&mut self, bus: &mut Bus, condition: bool) -> u32 {
        let offset = addressing::fetch_u8(&mut self.state, bus) as i8;
        if !condition {
            return 2;
        }
        let old_pc = self.state.pc;
        let new_pc = old_pc.wrapping_add(offset as i16 as u16);
        // Taken-branch dummy read uses the old high byte with the new low byte,
        // same "unfixed high | fixed low" pattern as the indexed addressing
        // fixup reads; only a page-crossing branch gets the fully corrected PC.
        let partial = (old_pc & 0xFF00) | (new_pc & 0x00FF);
        let _ = bus.read(partial);
        let crossed = (old_pc & 0xFF00) != (new_pc & 0xFF00);
        self.state.pc = new_pc;
        if crossed {
            let _ = bus.read(self.state.pc);
            return 4;
        }
        3
    }

    fn execute_jsr(&mut self, bus: &mut Bus) {
        let lo = addressing::fetch_u8(&mut self.state, bus) as u16;
        let _ = bus.read(0x0100 | self.state.sp as u16);
        let return_addr = self.state.pc;
        self.state.push_u8(bus, (return_addr >> 8) as u8);
        self.state.push_u8(bus, return_addr as u8);
        let hi = addressing::fetch_u8(&mut self.state, bus) as u16;
        self.state.pc = (hi << 8) | lo;
    }

    fn execute_rts(&mut self, bus: &mut Bus) {
        let _ = bus.read(self.state.pc);
        let _ = bus.read(0x0100 | self.state.sp as u16);
        let lo = self.state.pop_u8(bus) as u16;
        let hi = self.state.pop_u8(bus) as u16;
        let addr = (hi << 8) | lo;
        let _ = bus.read(addr);
        self.state.pc = addr.wrapping_add(1);
    }

    fn execute_rti(&mut self, bus: &mut Bus) {
        let _ = bus.read(self.state.pc);
        let _ = bus.read(0x0100 | self.state.sp as u16);
        let pulled = self.state.pop_u8(bus);
        self.state.status = (pulled & !BREAK) | super::state::UNUSED;
        let lo = self.state.pop_u8(bus) as u16;
        let hi = self.state.pop_u8(bus) as u16;
        self.state.pc = (hi << 8) | lo;
    }

    fn execute_brk(&mut self, bus: &mut Bus) {
        let _ = addressing::fetch_u8(&mut self.state, bus); // discarded signature byte
        self.state.push_u8(bus, (self.state.pc >> 8) as u8);
        self.state.push_u8(bus, self.state.pc as u8);
        let status = self.state.compose_status_for_push(true);
        self.state.push_u8(bus, status);
        self.state.set_flag_bit(IRQ_DISABLE);
        let lo = bus.read(0xFFFE) as u16;
        let hi = bus.read(0xFFFF) as u16;
        self.state.pc = (hi << 8) | lo;
    }

    fn service_interrupt(&mut self, bus: &mut Bus, vector: u16, set_break: bool) {
        let _ = bus.read(self.state.pc);
        let _ = bus.read(self.state.pc);
        self.state.push_u8(bus, (self.state.pc >> 8) as u8);
        self.state.push_u8(bus, self.state.pc as u8);
        let status = self.state.compose_status_for_push(set_break);
        self.state.push_u8(bus, status);
        self.state.set_flag_bit(IRQ_DISABLE);
        let lo = bus.read(vector) as u16;
        let hi = bus.read(vector.wrapping_add(1)) as u16;
        self.state.pc = (hi << 8) | lo;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::ActivityKind;
    use crate::cartridge::Cartridge;
    use crate::cpu::state::ZERO;
    use crate::test_utils::build_nrom_with_prg;

    fn bus_with_prg(prg: &[u8]) -> Bus {
        let rom = build_nrom_with_prg(prg, 1, 1, None);
        let cart = Cartridge::from_ines_bytes(&rom).expect("parse cart");
        let mut bus = Bus::new();
        bus.attach_cartridge(cart);
        bus
    }

    #[test]
    fn branch_taken_with_page_cross_reads_partial_then_fixed_target() {
        let mut bus = bus_with_prg(&[0xEA]);
        bus.write(0x00F0, 0xF0); // BEQ
        bus.write(0x00F1, 0x20); // operand: +0x20

        let mut cpu = Cpu::new();
        cpu.set_pc(0x00F0);
        cpu.state.status |= ZERO;

        bus.clear_activity_log();
        let cycles = cpu.step(&mut bus);

        assert_eq!(cycles, 4);
        assert_eq!(cpu.pc(), 0x0112);

        let log = bus.activity_log();
        assert_eq!(log.len(), 4);
        assert_eq!(log[0].address, 0x00F0); // opcode fetch
        assert_eq!(log[1].address, 0x00F1); // operand fetch
        // Taken-branch dummy read: old PC's high byte with the new low byte,
        // not yet the fully corrected target.
        assert_eq!(log[2].address, 0x0012);
        assert_eq!(log[2].kind, ActivityKind::Read);
        // Page-cross fixup reads the fully corrected target.
        assert_eq!(log[3].address, 0x0112);
    }

    #[test]
    fn branch_taken_without_page_cross_is_three_cycles() {
        let mut bus = bus_with_prg(&[0xEA]);
        bus.write(0x0080, 0xF0); // BEQ
        bus.write(0x0081, 0x10); // operand: +0x10, stays within the same page

        let mut cpu = Cpu::new();
        cpu.set_pc(0x0080);
        cpu.state.status |= ZERO;

        bus.clear_activity_log();
        let cycles = cpu.step(&mut bus);

        assert_eq!(cycles, 3);
        assert_eq!(cpu.pc(), 0x0092);
        assert_eq!(bus.activity_log().len(), 3);
    }
}
