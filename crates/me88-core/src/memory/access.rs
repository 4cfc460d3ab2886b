//! Privilege policy for processor-initiated stores.

use super::map::VECTOR_TABLE_END;
use crate::FaultCode;

/// Returns `true` when `addr` falls inside the protected vector table.
#[must_use]
pub const fn is_protected(addr: u32) -> bool {
    addr <= VECTOR_TABLE_END
}

/// Validates a processor store (plain store, push or call push).
///
/// System mode may write anywhere. User mode may not write into the vector
/// table.
///
/// # Errors
///
/// Returns [`FaultCode::AccessViolation`] for a user-mode store into the
/// protected range.
pub const fn validate_store_access(addr: u32, user_mode: bool) -> Result<(), FaultCode> {
    if user_mode && is_protected(addr) {
        Err(FaultCode::AccessViolation)
    } else {
        Ok(())
    }
}
