//! Processor state: register file, bus latches and micro-program states.

/// Bus address/data/control latches.
pub mod lines;
/// Micro-program state enumeration and transitions.
pub mod micro;
/// Register file and flag bits.
pub mod registers;

pub use lines::BusLines;
pub use micro::{ExecuteState, FetchState, InterruptState, MicroState, Transition};
pub use registers::{
    Registers, FLAGS_ACTIVE_MASK, FLAG_CF, FLAG_IF, FLAG_OF, FLAG_SF, FLAG_US, FLAG_ZF,
};
