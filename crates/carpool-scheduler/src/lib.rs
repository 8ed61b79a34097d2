//! carpool-scheduler — group journeys over a fleet of cars.
//!
//! Wires the best-fit allocator and the waiting queue from
//! `carpool-placement` into one owned service:
//!
//! - Adding a journey seats the group or queues it
//! - Dropping off a seated group refills the car it leaves
//! - Locating a group reports its car, or nothing while it waits
//!
//! # Architecture
//!
//! ```text
//! MatchingService
//!   ├── CapacityAllocator (available seats, group → car)
//!   ├── AdmissionQueue    (waiting groups, indexed by size)
//!   └── groups            (every known group → people)
//! ```
//!
//! The service is synchronous and not internally synchronized; callers
//! that share it serialize access themselves.

pub mod error;
pub mod service;

pub use error::{SchedulerError, SchedulerResult};
pub use service::MatchingService;
