//! Closed opcode table with bidirectional mnemonic lookup.

/// Sentinel returned by [`to_mnemonic`] for bytes outside the table.
pub const UNKNOWN_MNEMONIC: &str = "unknown";

/// Every instruction byte understood by the processor.
///
/// Operand order in the mnemonics is source first: `mov al, ah` copies AL into
/// AH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Opcode {
    // F0
    MovAlAh = 0x01,
    MovAhAl = 0x02,
    MovDsAx = 0x03,
    MovSsAx = 0x04,
    MovSpAx = 0x05,
    MovDiAx = 0x06,
    MovAxDs = 0x07,
    MovAxSs = 0x08,
    MovAxSp = 0x09,
    MovAxDi = 0x0A,
    PushAl = 0x0B,
    PopAl = 0x0C,
    ShlAl = 0x0D,
    SalAl = 0x0E,
    ShrAl = 0x0F,
    SarAl = 0x10,
    NotAl = 0x11,
    Retn = 0x12,
    Retf = 0x13,
    Nop = 0x14,
    Hlt = 0x15,
    Iret = 0x16,
    Cli = 0x17,
    Sti = 0x18,
    Ldpsr = 0x19,
    Stum = 0x1A,
    // F1
    MovDsDiAl = 0x20,
    CmpDsDiAl = 0x21,
    AddDsDiAl = 0x22,
    SubDsDiAl = 0x23,
    AndDsDiAl = 0x24,
    OrDsDiAl = 0x25,
    // F2
    MovAlDsDi = 0x40,
    // F3
    MovImmAl = 0x60,
    CmpImmAl = 0x61,
    AddImmAl = 0x62,
    SubImmAl = 0x63,
    AndImmAl = 0x64,
    OrImmAl = 0x65,
    IntImm = 0x66,
    // F4
    MovDsOffAl = 0x80,
    CmpDsOffAl = 0x81,
    AddDsOffAl = 0x82,
    SubDsOffAl = 0x83,
    AndDsOffAl = 0x84,
    OrDsOffAl = 0x85,
    InOffAl = 0x86,
    // F5
    MovAlDsOff = 0xA0,
    OutAlOff = 0xA1,
    // F6
    Jmp = 0xC0,
    Ja = 0xC1,
    Jae = 0xC2,
    Jb = 0xC3,
    Jbe = 0xC4,
    Jc = 0xC5,
    Je = 0xC6,
    Jg = 0xC7,
    Jge = 0xC8,
    Jl = 0xC9,
    Jle = 0xCA,
    Jnc = 0xCB,
    Jne = 0xCC,
    Jno = 0xCD,
    Jns = 0xCE,
    Jnz = 0xCF,
    Jo = 0xD0,
    Js = 0xD1,
    Jz = 0xD2,
    CallNear = 0xD3,
    // F7
    JmpFar = 0xE0,
    CallFar = 0xE1,
}

/// Single source-of-truth opcode table: `(opcode, mnemonic, identifier)`.
///
/// The identifier column is the spelling emitted by code generators; the
/// mnemonic column is the display form. Any byte not present here is invalid.
pub const OPCODE_TABLE: &[(Opcode, &str, &str)] = &[
    (Opcode::MovAlAh, "mov al, ah", "mov_al_ah"),
    (Opcode::MovAhAl, "mov ah, al", "mov_ah_al"),
    (Opcode::MovDsAx, "mov ds, ax", "mov_ds_ax"),
    (Opcode::MovSsAx, "mov ss, ax", "mov_ss_ax"),
    (Opcode::MovSpAx, "mov sp, ax", "mov_sp_ax"),
    (Opcode::MovDiAx, "mov di, ax", "mov_di_ax"),
    (Opcode::MovAxDs, "mov ax, ds", "mov_ax_ds"),
    (Opcode::MovAxSs, "mov ax, ss", "mov_ax_ss"),
    (Opcode::MovAxSp, "mov ax, sp", "mov_ax_sp"),
    (Opcode::MovAxDi, "mov ax, di", "mov_ax_di"),
    (Opcode::PushAl, "push al", "push_al"),
    (Opcode::PopAl, "pop al", "pop_al"),
    (Opcode::ShlAl, "shl al", "shl_al"),
    (Opcode::SalAl, "sal al", "sal_al"),
    (Opcode::ShrAl, "shr al", "shr_al"),
    (Opcode::SarAl, "sar al", "sar_al"),
    (Opcode::NotAl, "not al", "not_al"),
    (Opcode::Retn, "retn", "retn_"),
    (Opcode::Retf, "retf", "retf_"),
    (Opcode::Nop, "nop", "nop_"),
    (Opcode::Hlt, "hlt", "hlt_"),
    (Opcode::Iret, "iret", "iret_"),
    (Opcode::Cli, "cli", "cli_"),
    (Opcode::Sti, "sti", "sti_"),
    (Opcode::Ldpsr, "ldpsr", "ldpsr_"),
    (Opcode::Stum, "stum", "stum_"),
    (Opcode::MovDsDiAl, "mov ds:(di), al", "mov_ds$di_al"),
    (Opcode::CmpDsDiAl, "cmp ds:(di), al", "cmp_ds$di_al"),
    (Opcode::AddDsDiAl, "add ds:(di), al", "add_ds$di_al"),
    (Opcode::SubDsDiAl, "sub ds:(di), al", "sub_ds$di_al"),
    (Opcode::AndDsDiAl, "and ds:(di), al", "and_ds$di_al"),
    (Opcode::OrDsDiAl, "or ds:(di), al", "or_ds$di_al"),
    (Opcode::MovAlDsDi, "mov al, ds:(di)", "mov_al_ds$di"),
    (Opcode::MovImmAl, "mov $operand, al", "mov_operand_al"),
    (Opcode::CmpImmAl, "cmp $operand, al", "cmp_operand_al"),
    (Opcode::AddImmAl, "add $operand, al", "add_operand_al"),
    (Opcode::SubImmAl, "sub $operand, al", "sub_operand_al"),
    (Opcode::AndImmAl, "and $operand, al", "and_operand_al"),
    (Opcode::OrImmAl, "or $operand, al", "or_operand_al"),
    (Opcode::IntImm, "int $operand", "int_operand"),
    (Opcode::MovDsOffAl, "mov ds:offset, al", "mov_ds$offset_al"),
    (Opcode::CmpDsOffAl, "cmp ds:offset, al", "cmp_ds$offset_al"),
    (Opcode::AddDsOffAl, "add ds:offset, al", "add_ds$offset_al"),
    (Opcode::SubDsOffAl, "sub ds:offset, al", "sub_ds$offset_al"),
    (Opcode::AndDsOffAl, "and ds:offset, al", "and_ds$offset_al"),
    (Opcode::OrDsOffAl, "or ds:offset, al", "or_ds$offset_al"),
    (Opcode::InOffAl, "in offset, al", "in_offset_al"),
    (Opcode::MovAlDsOff, "mov al, ds:offset", "mov_al_ds$offset"),
    (Opcode::OutAlOff, "out al, offset", "out_al_offset"),
    (Opcode::Jmp, "jmp cs, offset", "jmp_cs_offset"),
    (Opcode::Ja, "ja cs, offset", "ja_cs_offset"),
    (Opcode::Jae, "jae cs, offset", "jae_cs_offset"),
    (Opcode::Jb, "jb cs, offset", "jb_cs_offset"),
    (Opcode::Jbe, "jbe cs, offset", "jbe_cs_offset"),
    (Opcode::Jc, "jc cs, offset", "jc_cs_offset"),
    (Opcode::Je, "je cs, offset", "je_cs_offset"),
    (Opcode::Jg, "jg cs, offset", "jg_cs_offset"),
    (Opcode::Jge, "jge cs, offset", "jge_cs_offset"),
    (Opcode::Jl, "jl cs, offset", "jl_cs_offset"),
    (Opcode::Jle, "jle cs, offset", "jle_cs_offset"),
    (Opcode::Jnc, "jnc cs, offset", "jnc_cs_offset"),
    (Opcode::Jne, "jne cs, offset", "jne_cs_offset"),
    (Opcode::Jno, "jno cs, offset", "jno_cs_offset"),
    (Opcode::Jns, "jns cs, offset", "jns_cs_offset"),
    (Opcode::Jnz, "jnz cs, offset", "jnz_cs_offset"),
    (Opcode::Jo, "jo cs, offset", "jo_cs_offset"),
    (Opcode::Js, "js cs, offset", "js_cs_offset"),
    (Opcode::Jz, "jz cs, offset", "jz_cs_offset"),
    (Opcode::CallNear, "call cs, offset", "call_cs_offset"),
    (Opcode::JmpFar, "jmp selector:offset", "jmp_selector$offset"),
    (Opcode::CallFar, "call selector:offset", "call_selector$offset"),
];

impl Opcode {
    /// Raw instruction byte.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Looks up the opcode assigned to an instruction byte.
    ///
    /// `None` means the byte is not a valid instruction.
    #[must_use]
    pub fn from_u8(code: u8) -> Option<Self> {
        OPCODE_TABLE
            .iter()
            .find_map(|(opcode, _, _)| (opcode.code() == code).then_some(*opcode))
    }

    /// Display mnemonic, e.g. `"push al"`.
    #[must_use]
    pub fn mnemonic(self) -> &'static str {
        self.entry().1
    }

    /// Code-generator identifier, e.g. `"push_al"`.
    #[must_use]
    pub fn identifier(self) -> &'static str {
        self.entry().2
    }

    /// Returns `true` for opcodes that may only run in system mode.
    #[must_use]
    pub const fn is_privileged(self) -> bool {
        matches!(
            self,
            Self::Hlt
                | Self::Iret
                | Self::Cli
                | Self::Sti
                | Self::Ldpsr
                | Self::Stum
                | Self::InOffAl
                | Self::OutAlOff
        )
    }

    fn entry(self) -> &'static (Opcode, &'static str, &'static str) {
        // The table is exhaustive; `opcode_table_covers_every_variant` guards it.
        OPCODE_TABLE
            .iter()
            .find(|(opcode, _, _)| *opcode == self)
            .unwrap_or(&(Opcode::Nop, UNKNOWN_MNEMONIC, UNKNOWN_MNEMONIC))
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Returns the display mnemonic for an instruction byte, or
/// [`UNKNOWN_MNEMONIC`] when the byte is not in the table.
#[must_use]
pub fn to_mnemonic(code: u8) -> &'static str {
    Opcode::from_u8(code).map_or(UNKNOWN_MNEMONIC, Opcode::mnemonic)
}

/// Resolves either a display mnemonic or a code-generator identifier.
///
/// Surrounding whitespace is ignored; matching is otherwise exact.
#[must_use]
pub fn from_mnemonic(text: &str) -> Option<Opcode> {
    let text = text.trim();
    OPCODE_TABLE
        .iter()
        .find_map(|(opcode, mnemonic, identifier)| {
            (*mnemonic == text || *identifier == text).then_some(*opcode)
        })
}
