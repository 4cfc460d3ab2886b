//! Micro-program states and transitions.
//!
//! `STAR` holds the state that drives the current clock, `MJR` the state to
//! resume once a shared sub-sequence (the per-format operand fetch) ends.

use crate::instruction::Format;
use crate::opcode::Opcode;

/// Opcode fetch and per-format operand fetch states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum FetchState {
    Fetch0,
    Fetch1,
    Fetch2,
    Fetch3,
    F0Dispatch,
    F1Fetch0,
    F1Fetch1,
    F1Fetch2,
    F2Fetch0,
    F3Fetch0,
    F3Fetch1,
    F3Fetch2,
    F4Fetch0,
    F4Fetch1,
    F4Fetch2,
    F4Fetch3,
    F4Fetch4,
    F4Fetch5,
    F4Fetch6,
    F4Fetch7,
    F5Fetch0,
    F5Fetch1,
    F5Fetch2,
    F5Fetch3,
    F5Fetch4,
    F6Fetch0,
    F6Fetch1,
    F6Fetch2,
    F6Fetch3,
    F6Fetch4,
    F7Fetch0,
    F7Fetch1,
    F7Fetch2,
    F7Fetch3,
    F7Fetch4,
    F7Fetch5,
    F7Fetch6,
    F7Fetch7,
    F7Fetch8,
    /// Rejected opcode; selects the fault code.
    Invalid,
}

/// Operation-category execution states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum ExecuteState {
    Nop,
    /// Terminal state entered by `hlt`.
    Halt,
    AhFromAl,
    AlFromAh,
    DsFromAx,
    SsFromAx,
    SpFromAx,
    DiFromAx,
    AxFromDs,
    AxFromSs,
    AxFromSp,
    AxFromDi,
    Store0,
    Store1,
    Store2,
    Out0,
    Out1,
    Out2,
    Alu,
    AlFromSource,
    Jump,
    Push0,
    Push1,
    Push2,
    Pop0,
    Pop1,
    Pop2,
    Call0,
    Call1,
    Call2,
    Call3,
    Call4,
    Call5,
    Call6,
    Call7,
    Call8,
    Call9,
    Call10,
    Call11,
    Call12,
    Ret0,
    Ret1,
    Ret2,
    Ret3,
    Ret4,
    Ret5,
    Ret6,
    Ret7,
    Ret8,
    Cli,
    Sti,
    Ldpsr,
    Stum,
}

/// Interrupt acknowledge, interrupt entry and return states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum InterruptState {
    IntAck0,
    IntAck1,
    /// Suppressed user-mode store; selects the access-violation vector.
    AccessViolation,
    Int0,
    Int1,
    Int2,
    Int3,
    Int4,
    Int5,
    Int6,
    Int7,
    Int8,
    Int9,
    Int10,
    Int11,
    Int12,
    Int13,
    Int14,
    Int15,
    Int16,
    Int17,
    Int18,
    Int19,
    Int20,
    Int21,
    Int22,
    Int23,
    Int24,
    Iret0,
    Iret1,
    Iret2,
    Iret3,
    Iret4,
    Iret5,
    Iret6,
    Iret7,
    Iret8,
    Iret9,
    Iret10,
    Iret11,
}

/// One micro-program state, grouped by phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum MicroState {
    /// Opcode or operand fetch.
    Fetch(FetchState),
    /// Operation execution.
    Execute(ExecuteState),
    /// Interrupt entry or return.
    Interrupt(InterruptState),
}

impl Default for MicroState {
    fn default() -> Self {
        Self::FETCH_START
    }
}

impl From<FetchState> for MicroState {
    fn from(state: FetchState) -> Self {
        Self::Fetch(state)
    }
}

impl From<ExecuteState> for MicroState {
    fn from(state: ExecuteState) -> Self {
        Self::Execute(state)
    }
}

impl From<InterruptState> for MicroState {
    fn from(state: InterruptState) -> Self {
        Self::Interrupt(state)
    }
}

impl MicroState {
    /// First state of every instruction.
    pub const FETCH_START: Self = Self::Fetch(FetchState::Fetch0);
    /// Terminal halt state.
    pub const HALT: Self = Self::Execute(ExecuteState::Halt);

    /// Entry state of the operand-fetch sequence for `format`.
    #[must_use]
    pub const fn format_entry(format: Format) -> Self {
        Self::Fetch(match format {
            Format::F0 => FetchState::F0Dispatch,
            Format::F1 => FetchState::F1Fetch0,
            Format::F2 => FetchState::F2Fetch0,
            Format::F3 => FetchState::F3Fetch0,
            Format::F4 => FetchState::F4Fetch0,
            Format::F5 => FetchState::F5Fetch0,
            Format::F6 => FetchState::F6Fetch0,
            Format::F7 => FetchState::F7Fetch0,
        })
    }

    /// First execution state for a decoded opcode.
    #[must_use]
    pub const fn execution_entry(opcode: Opcode) -> Self {
        use ExecuteState as E;
        match opcode {
            Opcode::Nop => Self::Execute(E::Nop),
            Opcode::Hlt => Self::Execute(E::Halt),
            Opcode::MovAlAh => Self::Execute(E::AhFromAl),
            Opcode::MovAhAl => Self::Execute(E::AlFromAh),
            Opcode::MovAxDs => Self::Execute(E::DsFromAx),
            Opcode::MovAxSs => Self::Execute(E::SsFromAx),
            Opcode::MovAxSp => Self::Execute(E::SpFromAx),
            Opcode::MovAxDi => Self::Execute(E::DiFromAx),
            Opcode::MovDsAx => Self::Execute(E::AxFromDs),
            Opcode::MovSsAx => Self::Execute(E::AxFromSs),
            Opcode::MovSpAx => Self::Execute(E::AxFromSp),
            Opcode::MovDiAx => Self::Execute(E::AxFromDi),
            Opcode::MovAlDsDi | Opcode::MovAlDsOff => Self::Execute(E::Store0),
            Opcode::OutAlOff => Self::Execute(E::Out0),
            Opcode::CmpDsDiAl
            | Opcode::AddDsDiAl
            | Opcode::SubDsDiAl
            | Opcode::AndDsDiAl
            | Opcode::OrDsDiAl
            | Opcode::CmpImmAl
            | Opcode::AddImmAl
            | Opcode::SubImmAl
            | Opcode::AndImmAl
            | Opcode::OrImmAl
            | Opcode::CmpDsOffAl
            | Opcode::AddDsOffAl
            | Opcode::SubDsOffAl
            | Opcode::AndDsOffAl
            | Opcode::OrDsOffAl
            | Opcode::NotAl
            | Opcode::ShlAl
            | Opcode::SalAl
            | Opcode::ShrAl
            | Opcode::SarAl => Self::Execute(E::Alu),
            Opcode::MovDsDiAl | Opcode::MovImmAl | Opcode::MovDsOffAl | Opcode::InOffAl => {
                Self::Execute(E::AlFromSource)
            }
            Opcode::Jmp
            | Opcode::Ja
            | Opcode::Jae
            | Opcode::Jb
            | Opcode::Jbe
            | Opcode::Jc
            | Opcode::Je
            | Opcode::Jg
            | Opcode::Jge
            | Opcode::Jl
            | Opcode::Jle
            | Opcode::Jnc
            | Opcode::Jne
            | Opcode::Jno
            | Opcode::Jns
            | Opcode::Jnz
            | Opcode::Jo
            | Opcode::Js
            | Opcode::Jz
            | Opcode::JmpFar => Self::Execute(E::Jump),
            Opcode::PushAl => Self::Execute(E::Push0),
            Opcode::PopAl => Self::Execute(E::Pop0),
            Opcode::CallNear | Opcode::CallFar => Self::Execute(E::Call0),
            Opcode::Retn | Opcode::Retf => Self::Execute(E::Ret0),
            Opcode::IntImm => Self::Interrupt(InterruptState::Int0),
            Opcode::Iret => Self::Interrupt(InterruptState::Iret0),
            Opcode::Cli => Self::Execute(E::Cli),
            Opcode::Sti => Self::Execute(E::Sti),
            Opcode::Ldpsr => Self::Execute(E::Ldpsr),
            Opcode::Stum => Self::Execute(E::Stum),
        }
    }

    /// Returns `true` for the terminal halt state.
    #[must_use]
    pub const fn is_halt(self) -> bool {
        matches!(self, Self::Execute(ExecuteState::Halt))
    }
}

impl std::fmt::Display for MicroState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch(state) => write!(f, "{state:?}"),
            Self::Execute(state) => write!(f, "{state:?}"),
            Self::Interrupt(state) => write!(f, "{state:?}"),
        }
    }
}

/// Result of one state handler: the next `STAR` and, optionally, a new `MJR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// State for the next clock.
    pub next: MicroState,
    /// Replacement continuation, if the handler sets one.
    pub resume: Option<MicroState>,
}

impl Transition {
    /// Moves to `next` and leaves the continuation untouched.
    #[must_use]
    pub fn to(next: impl Into<MicroState>) -> Self {
        Self {
            next: next.into(),
            resume: None,
        }
    }

    /// Moves to `next` and loads `resume` into the continuation register.
    #[must_use]
    pub fn with_resume(next: impl Into<MicroState>, resume: MicroState) -> Self {
        Self {
            next: next.into(),
            resume: Some(resume),
        }
    }
}
