//! Arithmetic/logic unit operating on `AL`.

use crate::instruction::AluOp;
use crate::state::{FLAG_CF, FLAG_OF, FLAG_SF, FLAG_ZF};

/// Value and flag register produced by one ALU operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluOutcome {
    /// New `AL`.
    pub value: u8,
    /// New `F` register.
    pub flags: u8,
}

/// Applies `op` to `al` (and `source` for two-operand ops).
///
/// Only the arithmetic flags are touched; `IF` and `US` pass through. Logic
/// operations leave `CF`/`OF` as they were.
#[must_use]
pub fn evaluate(op: AluOp, al: u8, source: u8, flags: u8) -> AluOutcome {
    let mut out = FlagWriter(flags);
    let value = match op {
        AluOp::Add => add(al, source, &mut out),
        AluOp::Sub => add(al, (!source).wrapping_add(1), &mut out),
        AluOp::And => al & source,
        AluOp::Or => al | source,
        AluOp::Not => !al,
        AluOp::Shl | AluOp::Sal => {
            out.set(FLAG_CF, al & 0x80 != 0);
            let sign_changes = (al ^ (al << 1)) & 0x80 != 0;
            out.set(FLAG_OF, op == AluOp::Sal && sign_changes);
            al << 1
        }
        AluOp::Shr | AluOp::Sar => {
            out.set(FLAG_CF, al & 0x01 != 0);
            out.set(FLAG_OF, false);
            if op == AluOp::Sar {
                (al >> 1) | (al & 0x80)
            } else {
                al >> 1
            }
        }
        AluOp::Cmp => {
            compare(al, source, &mut out);
            return AluOutcome {
                value: al,
                flags: out.0,
            };
        }
    };

    out.set(FLAG_ZF, value == 0);
    out.set(FLAG_SF, value & 0x80 != 0);
    AluOutcome {
        value,
        flags: out.0,
    }
}

struct FlagWriter(u8);

impl FlagWriter {
    const fn set(&mut self, flag: u8, enabled: bool) {
        if enabled {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }
}

// Overflow is the carry into bit 7 disagreeing with the carry out of it.
const fn add(al: u8, operand: u8, out: &mut FlagWriter) -> u8 {
    let (value, carry_out) = al.overflowing_add(operand);
    let carry_into_sign = ((al & 0x7F) + (operand & 0x7F)) & 0x80 != 0;
    out.set(FLAG_CF, carry_out);
    out.set(FLAG_OF, carry_out != carry_into_sign);
    value
}

// Flags describe SOURCE relative to AL: CF means SOURCE is below AL, and
// SF != OF means SOURCE is less than AL as signed bytes.
const fn compare(al: u8, source: u8, out: &mut FlagWriter) {
    let sign = al & 0x80 != 0;
    #[allow(clippy::cast_possible_wrap)]
    let source_less = (source as i8) < (al as i8);
    out.set(FLAG_ZF, al == source);
    out.set(FLAG_CF, al > source);
    out.set(FLAG_SF, sign);
    out.set(FLAG_OF, sign != source_less);
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::evaluate;
    use crate::instruction::AluOp;
    use crate::state::{FLAG_CF, FLAG_IF, FLAG_OF, FLAG_SF, FLAG_US, FLAG_ZF};
    use crate::JumpCondition;

    #[test]
    fn add_wraps_with_carry_and_zero() {
        let out = evaluate(AluOp::Add, 0xFF, 0x01, 0);
        assert_eq!(out.value, 0x00);
        assert_eq!(out.flags, FLAG_CF | FLAG_ZF);
    }

    #[test]
    fn sub_reports_signed_overflow() {
        let out = evaluate(AluOp::Sub, 0x80, 0x01, 0);
        assert_eq!(out.value, 0x7F);
        assert_ne!(out.flags & FLAG_OF, 0);
        assert_eq!(out.flags & FLAG_SF, 0);
    }

    #[test]
    fn cmp_equal_sets_zero_and_keeps_al() {
        let out = evaluate(AluOp::Cmp, 0x05, 0x05, FLAG_CF);
        assert_eq!(out.value, 0x05);
        assert_ne!(out.flags & FLAG_ZF, 0);
        assert_eq!(out.flags & FLAG_CF, 0);
    }

    #[rstest]
    #[case(AluOp::Add, 0x7F, 0x01, 0x80, FLAG_SF | FLAG_OF)]
    #[case(AluOp::Add, 0x10, 0x20, 0x30, 0)]
    #[case(AluOp::Sub, 0x05, 0x05, 0x00, FLAG_CF | FLAG_ZF)]
    #[case(AluOp::Sub, 0x00, 0x01, 0xFF, FLAG_SF)]
    #[case(AluOp::And, 0xF0, 0x0F, 0x00, FLAG_ZF)]
    #[case(AluOp::Or, 0x80, 0x01, 0x81, FLAG_SF)]
    #[case(AluOp::Not, 0x0F, 0x00, 0xF0, FLAG_SF)]
    #[case(AluOp::Shl, 0xC0, 0x00, 0x80, FLAG_CF | FLAG_SF)]
    #[case(AluOp::Shl, 0x40, 0x00, 0x80, FLAG_SF)]
    #[case(AluOp::Sal, 0x40, 0x00, 0x80, FLAG_SF | FLAG_OF)]
    #[case(AluOp::Shr, 0x81, 0x00, 0x40, FLAG_CF)]
    #[case(AluOp::Sar, 0x81, 0x00, 0xC0, FLAG_CF | FLAG_SF)]
    #[case(AluOp::Shr, 0x01, 0x00, 0x00, FLAG_CF | FLAG_ZF)]
    fn alu_flag_table(
        #[case] op: AluOp,
        #[case] al: u8,
        #[case] source: u8,
        #[case] value: u8,
        #[case] flags: u8,
    ) {
        let out = evaluate(op, al, source, 0);
        assert_eq!(out.value, value);
        assert_eq!(out.flags, flags);
    }

    #[test]
    fn logic_ops_preserve_carry_and_overflow() {
        let out = evaluate(AluOp::And, 0xFF, 0x01, FLAG_CF | FLAG_OF);
        assert_eq!(out.flags, FLAG_CF | FLAG_OF);
    }

    #[test]
    fn control_flags_pass_through() {
        let out = evaluate(AluOp::Add, 0x01, 0x01, FLAG_IF | FLAG_US);
        assert_eq!(out.flags, FLAG_IF | FLAG_US);
    }

    proptest! {
        #[test]
        fn cmp_conditions_order_source_against_al(al in any::<u8>(), source in any::<u8>()) {
            let flags = evaluate(AluOp::Cmp, al, source, 0).flags;
            prop_assert_eq!(JumpCondition::Below.holds(flags), source < al);
            prop_assert_eq!(JumpCondition::Above.holds(flags), source > al);
            prop_assert_eq!(JumpCondition::Equal.holds(flags), source == al);
            #[allow(clippy::cast_possible_wrap)]
            let (s, a) = (source as i8, al as i8);
            prop_assert_eq!(JumpCondition::Less.holds(flags), s < a);
            prop_assert_eq!(JumpCondition::Greater.holds(flags), s > a);
            prop_assert_eq!(JumpCondition::GreaterOrEqual.holds(flags), s >= a);
        }

        #[test]
        fn add_matches_wrapping_arithmetic(al in any::<u8>(), source in any::<u8>()) {
            let out = evaluate(AluOp::Add, al, source, 0);
            prop_assert_eq!(out.value, al.wrapping_add(source));
            prop_assert_eq!(out.flags & FLAG_CF != 0, u16::from(al) + u16::from(source) > 0xFF);
            #[allow(clippy::cast_possible_wrap)]
            let signed = (al as i8).checked_add(source as i8).is_none();
            prop_assert_eq!(out.flags & FLAG_OF != 0, signed);
        }
    }
}
