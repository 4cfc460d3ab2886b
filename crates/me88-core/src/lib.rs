//! Core emulator crate for the me88 microcoded 8-bit processor.

/// Segmented address arithmetic helpers.
pub mod address;
pub use address::{concat, high_byte, low_byte, physical_address, PHYSICAL_ADDRESS_MASK};

/// Closed opcode table and mnemonic lookup.
pub mod opcode;
pub use opcode::{from_mnemonic, to_mnemonic, Opcode, OPCODE_TABLE, UNKNOWN_MNEMONIC};

/// Format, ALU and jump-condition classification.
pub mod instruction;
pub use instruction::{AluOp, Format, JumpCondition};

/// Fault taxonomy resolved through the interrupt sequence.
pub mod fault;
pub use fault::FaultCode;

/// Memory devices, fixed address map and store protection.
pub mod memory;
pub use memory::{
    is_protected, validate_store_access, DeviceAccess, MemoryDevice, MemoryRegion, EPROM_END,
    EPROM_START, INTERRUPT_HANDLER_BASE, INTERRUPT_HANDLER_SELECTOR, RAM_ONE_END, RAM_ONE_START,
    RAM_TWO_END, RAM_TWO_START, VECTOR_TABLE_END, VIDEO_END, VIDEO_START,
};

/// Device registry and the processor-facing bus trait.
pub mod bus;
pub use bus::{Bus, SystemBus};

/// Register file, bus latches and micro-program states.
pub mod state;
pub use state::{
    BusLines, ExecuteState, FetchState, InterruptState, MicroState, Registers, Transition,
    FLAGS_ACTIVE_MASK, FLAG_CF, FLAG_IF, FLAG_OF, FLAG_SF, FLAG_US, FLAG_ZF,
};

/// Session configuration.
pub mod config;
pub use config::{
    MachineConfig, DEFAULT_BUS_LOG_CAPACITY, DEFAULT_NOISE_SEED, DEFAULT_RESET_CS,
    DEFAULT_RESET_IP,
};

/// Processor status snapshot.
pub mod status;
pub use status::{BusAccess, BusAccessKind, ProcessorStatus};

/// The cycle-stepped processor.
pub mod processor;
pub use processor::{AluOutcome, Processor};

/// Binary-text program image codec.
pub mod image;
pub use image::{encode_image, load_image, parse_image, ImageError};

/// Machine assembly and run loop.
pub mod machine;
pub use machine::{Machine, RunOutcome, VectorTable};
