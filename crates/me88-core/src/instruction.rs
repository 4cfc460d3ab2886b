//! Instruction classifier: format groups, ALU categories and jump conditions.

use crate::state::{FLAG_CF, FLAG_OF, FLAG_SF, FLAG_ZF};

/// Operand-fetch format selected by bits 7..5 of an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum Format {
    /// No operand.
    F0 = 0,
    /// One byte from `DS:DI` into `SOURCE`.
    F1 = 1,
    /// Store target is `DS:DI`.
    F2 = 2,
    /// One immediate byte into `SOURCE`.
    F3 = 3,
    /// Little-endian displacement, operand loaded from `DS:disp` (or port `0:disp`).
    F4 = 4,
    /// Little-endian absolute store offset under `DS` (or `0` for `out`).
    F5 = 5,
    /// Little-endian near target under `CS`.
    F6 = 6,
    /// Little-endian `offset`, then `selector`.
    F7 = 7,
}

impl Format {
    /// Extracts the format group from the top three bits of `opcode`.
    #[must_use]
    pub const fn of(opcode: u8) -> Self {
        match opcode >> 5 {
            0 => Self::F0,
            1 => Self::F1,
            2 => Self::F2,
            3 => Self::F3,
            4 => Self::F4,
            5 => Self::F5,
            6 => Self::F6,
            _ => Self::F7,
        }
    }
}

/// Arithmetic/logic operation applied to `AL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum AluOp {
    Add,
    Sub,
    And,
    Or,
    Cmp,
    Not,
    Shl,
    Sal,
    Shr,
    Sar,
}

impl AluOp {
    /// Classifies an opcode into its ALU operation, if it has one.
    #[must_use]
    pub const fn classify(opcode: u8) -> Option<Self> {
        match opcode {
            0x22 | 0x62 | 0x82 => Some(Self::Add),
            0x23 | 0x63 | 0x83 => Some(Self::Sub),
            0x24 | 0x64 | 0x84 => Some(Self::And),
            0x25 | 0x65 | 0x85 => Some(Self::Or),
            0x21 | 0x61 | 0x81 => Some(Self::Cmp),
            0x11 => Some(Self::Not),
            0x0D => Some(Self::Shl),
            0x0E => Some(Self::Sal),
            0x0F => Some(Self::Shr),
            0x10 => Some(Self::Sar),
            _ => None,
        }
    }
}

/// Flag expression guarding a control transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JumpCondition {
    /// Always taken (`jmp`, `call`).
    Always,
    /// `ZF` (`je`, `jz`).
    Equal,
    /// `!ZF` (`jne`, `jnz`).
    NotEqual,
    /// `!CF && !ZF` (`ja`).
    Above,
    /// `!CF` (`jae`, `jnc`).
    AboveOrEqual,
    /// `CF` (`jb`, `jc`).
    Below,
    /// `CF && ZF` (`jbe`).
    BelowOrEqual,
    /// `!ZF && SF == OF` (`jg`).
    Greater,
    /// `SF == OF` (`jge`).
    GreaterOrEqual,
    /// `SF != OF` (`jl`).
    Less,
    /// `ZF || SF != OF` (`jle`).
    LessOrEqual,
    /// `OF` (`jo`).
    Overflow,
    /// `!OF` (`jno`).
    NoOverflow,
    /// `SF` (`js`).
    Sign,
    /// `!SF` (`jns`).
    NoSign,
}

impl JumpCondition {
    /// Classifies a control-transfer opcode.
    #[must_use]
    pub const fn classify(opcode: u8) -> Option<Self> {
        match opcode {
            0xC0 | 0xD3 | 0xE0 | 0xE1 => Some(Self::Always),
            0xC6 | 0xD2 => Some(Self::Equal),
            0xCC | 0xCF => Some(Self::NotEqual),
            0xC1 => Some(Self::Above),
            0xC2 | 0xCB => Some(Self::AboveOrEqual),
            0xC3 | 0xC5 => Some(Self::Below),
            0xC4 => Some(Self::BelowOrEqual),
            0xC7 => Some(Self::Greater),
            0xC8 => Some(Self::GreaterOrEqual),
            0xC9 => Some(Self::Less),
            0xCA => Some(Self::LessOrEqual),
            0xD0 => Some(Self::Overflow),
            0xCD => Some(Self::NoOverflow),
            0xD1 => Some(Self::Sign),
            0xCE => Some(Self::NoSign),
            _ => None,
        }
    }

    /// Evaluates the condition against a flag register value.
    #[must_use]
    pub const fn holds(self, flags: u8) -> bool {
        let cf = flags & FLAG_CF != 0;
        let zf = flags & FLAG_ZF != 0;
        let sf = flags & FLAG_SF != 0;
        let of = flags & FLAG_OF != 0;
        match self {
            Self::Always => true,
            Self::Equal => zf,
            Self::NotEqual => !zf,
            Self::Above => !cf && !zf,
            Self::AboveOrEqual => !cf,
            Self::Below => cf,
            Self::BelowOrEqual => cf && zf,
            Self::Greater => !zf && sf == of,
            Self::GreaterOrEqual => sf == of,
            Self::Less => sf != of,
            Self::LessOrEqual => zf || sf != of,
            Self::Overflow => of,
            Self::NoOverflow => !of,
            Self::Sign => sf,
            Self::NoSign => !sf,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{AluOp, Format, JumpCondition};
    use crate::opcode::OPCODE_TABLE;
    use crate::state::{FLAG_CF, FLAG_OF, FLAG_SF, FLAG_ZF};

    #[rstest]
    #[case(0x01, Format::F0)]
    #[case(0x1A, Format::F0)]
    #[case(0x25, Format::F1)]
    #[case(0x40, Format::F2)]
    #[case(0x66, Format::F3)]
    #[case(0x86, Format::F4)]
    #[case(0xA1, Format::F5)]
    #[case(0xD3, Format::F6)]
    #[case(0xE1, Format::F7)]
    fn format_is_top_three_bits(#[case] opcode: u8, #[case] expected: Format) {
        assert_eq!(Format::of(opcode), expected);
        assert_eq!(Format::of(opcode) as u8, opcode >> 5);
    }

    #[test]
    fn every_format_six_and_seven_opcode_has_a_condition() {
        for (opcode, _, _) in OPCODE_TABLE {
            let code = opcode.code();
            if matches!(Format::of(code), Format::F6 | Format::F7) {
                assert!(JumpCondition::classify(code).is_some(), "{code:#04x}");
            }
        }
    }

    #[test]
    fn alu_classification_covers_arithmetic_rows() {
        assert_eq!(AluOp::classify(0x62), Some(AluOp::Add));
        assert_eq!(AluOp::classify(0x83), Some(AluOp::Sub));
        assert_eq!(AluOp::classify(0x21), Some(AluOp::Cmp));
        assert_eq!(AluOp::classify(0x10), Some(AluOp::Sar));
        assert_eq!(AluOp::classify(0x60), None);
        assert_eq!(AluOp::classify(0x86), None);
    }

    #[rstest]
    #[case(0xC0, 0, true)]
    #[case(0xC6, FLAG_ZF, true)]
    #[case(0xD2, 0, false)]
    #[case(0xCC, 0, true)]
    #[case(0xCF, FLAG_ZF, false)]
    #[case(0xC1, 0, true)]
    #[case(0xC1, FLAG_ZF, false)]
    #[case(0xC2, FLAG_ZF, true)]
    #[case(0xC4, FLAG_CF | FLAG_ZF, true)]
    #[case(0xC4, FLAG_CF, false)]
    #[case(0xC7, FLAG_SF | FLAG_OF, true)]
    #[case(0xC7, FLAG_ZF, false)]
    #[case(0xC8, FLAG_SF, false)]
    #[case(0xC9, FLAG_OF, true)]
    #[case(0xCA, FLAG_ZF, true)]
    #[case(0xCA, 0, false)]
    #[case(0xD0, FLAG_OF, true)]
    #[case(0xCD, FLAG_OF, false)]
    #[case(0xD1, FLAG_SF, true)]
    #[case(0xCE, FLAG_SF, false)]
    fn jump_table_rows(#[case] opcode: u8, #[case] flags: u8, #[case] taken: bool) {
        let condition = JumpCondition::classify(opcode).expect("jump opcode");
        assert_eq!(condition.holds(flags), taken);
    }

    #[test]
    fn below_taken_and_above_or_equal_not_taken_with_carry() {
        let flags = FLAG_CF;
        for code in [0xC3_u8, 0xC5] {
            assert!(JumpCondition::classify(code).expect("below").holds(flags));
        }
        for code in [0xC2_u8, 0xCB] {
            assert!(!JumpCondition::classify(code).expect("above-or-equal").holds(flags));
        }
    }
}
