//! Pure flag/register effects for the ALU, load/store, and read-modify-write
//! operation families. These functions never touch the bus; `execute`
//! supplies the operand and writes results back.

use super::state::{CpuState, CARRY, NEGATIVE, OVERFLOW, ZERO};
use super::table::Operation;

pub fn apply_read_op(cpu: &mut CpuState, op: Operation, value: u8) {
    use Operation::*;
    match op {
        Lda => {
            cpu.a = value;
            cpu.update_zn(value);
        }
        Ldx => {
            cpu.x = value;
            cpu.update_zn(value);
        }
        Ldy => {
            cpu.y = value;
            cpu.update_zn(value);
        }
        And => {
            cpu.a &= value;
            cpu.update_zn(cpu.a);
        }
        Ora => {
            cpu.a |= value;
            cpu.update_zn(cpu.a);
        }
        Eor => {
            cpu.a ^= value;
            cpu.update_zn(cpu.a);
        }
        Adc => adc(cpu, value),
        Sbc => adc(cpu, !value),
        Cmp => compare(cpu, cpu.a, value),
        Cpx => compare(cpu, cpu.x, value),
        Cpy => compare(cpu, cpu.y, value),
        Bit => {
            cpu.assign_flag(ZERO, (cpu.a & value) == 0);
            cpu.assign_flag(NEGATIVE, value & 0x80 != 0);
            cpu.assign_flag(OVERFLOW, value & 0x40 != 0);
        }
        other => unreachable!("{other:?} is not a read-class operation"),
    }
}

pub fn apply_rmw_op(cpu: &mut CpuState, op: Operation, value: u8) -> u8 {
    use Operation::*;
    match op {
        Asl => {
            let carry = value & 0x80 != 0;
            let r = value << 1;
            cpu.assign_flag(CARRY, carry);
            cpu.update_zn(r);
            r
        }
        Lsr => {
            let carry = value & 0x01 != 0;
            let r = value >> 1;
            cpu.assign_flag(CARRY, carry);
            cpu.update_zn(r);
            r
        }
        Rol => {
            let carry_in = cpu.is_flag_set(CARRY) as u8;
            let carry_out = value & 0x80 != 0;
            let r = (value << 1) | carry_in;
            cpu.assign_flag(CARRY, carry_out);
            cpu.update_zn(r);
            r
        }
        Ror => {
            let carry_in = if cpu.is_flag_set(CARRY) { 0x80 } else { 0 };
            let carry_out = value & 0x01 != 0;
            let r = (value >> 1) | carry_in;
            cpu.assign_flag(CARRY, carry_out);
            cpu.update_zn(r);
            r
        }
        Inc => {
            let r = value.wrapping_add(1);
            cpu.update_zn(r);
            r
        }
        Dec => {
            let r = value.wrapping_sub(1);
            cpu.update_zn(r);
            r
        }
        other => unreachable!("{other:?} is not a read-modify-write operation"),
    }
}

pub fn value_for_store(cpu: &CpuState, op: Operation) -> u8 {
    match op {
        Operation::Sta => cpu.a,
        Operation::Stx => cpu.x,
        Operation::Sty => cpu.y,
        other => unreachable!("{other:?} is not a store operation"),
    }
}

fn adc(cpu: &mut CpuState, value: u8) {
    let carry_in = cpu.is_flag_set(CARRY) as u16;
    let a = cpu.a as u16;
    let v = value as u16;
    let sum = a + v + carry_in;
    let result = sum as u8;
    let carry = sum > 0xFF;
    let overflow = (!(cpu.a ^ value) & (cpu.a ^ result) & 0x80) != 0;
    cpu.a = result;
    cpu.update_zn(result);
    cpu.assign_flag(CARRY, carry);
    cpu.assign_flag(OVERFLOW, overflow);
}

fn compare(cpu: &mut CpuState, reg: u8, value: u8) {
    let result = reg.wrapping_sub(value);
    cpu.assign_flag(CARRY, reg >= value);
    cpu.update_zn(result);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adc_sets_overflow_on_signed_wraparound() {
        let mut cpu = CpuState::new();
        cpu.a = 0x50;
        cpu.clear_flag_bit(CARRY);
        apply_read_op(&mut cpu, Operation::Adc, 0x50);
        assert_eq!(cpu.a, 0xA0);
        assert!(cpu.is_flag_set(OVERFLOW));
        assert!(cpu.is_flag_set(NEGATIVE));
        assert!(!cpu.is_flag_set(CARRY));
    }

    #[test]
    fn sbc_is_adc_of_complement() {
        let mut cpu = CpuState::new();
        cpu.a = 0x10;
        cpu.set_flag_bit(CARRY); // no borrow
        apply_read_op(&mut cpu, Operation::Sbc, 0x05);
        assert_eq!(cpu.a, 0x0B);
        assert!(cpu.is_flag_set(CARRY));
    }

    #[test]
    fn cmp_sets_carry_when_register_is_greater_or_equal() {
        let mut cpu = CpuState::new();
        cpu.a = 0x40;
        apply_read_op(&mut cpu, Operation::Cmp, 0x40);
        assert!(cpu.is_flag_set(ZERO));
        assert!(cpu.is_flag_set(CARRY));
    }

    #[test]
    fn rmw_shift_ops_update_carry_and_zn() {
        let mut cpu = CpuState::new();
        let r = apply_rmw_op(&mut cpu, Operation::Asl, 0x81);
        assert_eq!(r, 0x02);
        assert!(cpu.is_flag_set(CARRY));
    }
}
