//! Tension module for cable-motion.
//!
//! Inverse kinematics for force control: which cable tensions produce a
//! desired net force on the payload.

mod allocator;

pub use allocator::{Allocation, AllocationStatus, TensionAllocator, SINGULAR_TOLERANCE};
