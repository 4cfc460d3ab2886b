//! Memory devices, the session address map and store protection policy.

/// Store legality policy for the protected vector table.
pub mod access;
/// Sparse memory device model.
pub mod device;
/// Fixed session address map.
pub mod map;

pub use access::{is_protected, validate_store_access};
pub use device::{DeviceAccess, MemoryDevice};
pub use map::{
    MemoryRegion, EPROM_END, EPROM_START, INTERRUPT_HANDLER_BASE, INTERRUPT_HANDLER_SELECTOR,
    RAM_ONE_END, RAM_ONE_START, RAM_TWO_END, RAM_TWO_START, VECTOR_TABLE_END, VIDEO_END,
    VIDEO_START,
};
