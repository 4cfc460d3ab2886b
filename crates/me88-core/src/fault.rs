use thiserror::Error;

/// Fault taxonomy for conditions the processor resolves through its own
/// interrupt sequence.
///
/// None of these ever surface as host-level errors: the processor latches the
/// code into `SOURCE` and enters the interrupt-acknowledge path with it as the
/// vector number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum FaultCode {
    /// User-mode write into the protected vector table.
    #[error("user-mode access to protected memory")]
    AccessViolation = 0x04,
    /// Supervisor-only opcode fetched while in user mode.
    #[error("privileged instruction executed in user mode")]
    PrivilegedInstruction = 0x05,
    /// Opcode byte outside the instruction table.
    #[error("invalid opcode")]
    InvalidOpcode = 0x06,
}

impl FaultCode {
    /// Stable byte value of this fault code.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a stable byte value back into a fault code.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x04 => Some(Self::AccessViolation),
            0x05 => Some(Self::PrivilegedInstruction),
            0x06 => Some(Self::InvalidOpcode),
            _ => None,
        }
    }

    /// Interrupt vector number dispatched for this fault.
    #[must_use]
    pub const fn vector(self) -> u8 {
        self.as_u8()
    }
}
