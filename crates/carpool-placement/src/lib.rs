//! carpool-placement — seat allocation and the waiting queue.
//!
//! This crate decides where groups ride. It does NOT know about group
//! lifecycles (that's `carpool-scheduler`); it only answers placement
//! questions and keeps its indexes in sync.
//!
//! # Components
//!
//! - **`allocator`** — Best-fit seat allocation and the refill step
//! - **`admission`** — Arrival-ordered waiting queue indexed by group size
//! - **`error`** — Placement faults

pub mod admission;
pub mod allocator;
pub mod error;

pub use admission::AdmissionQueue;
pub use allocator::CapacityAllocator;
pub use error::{PlacementError, PlacementResult};
