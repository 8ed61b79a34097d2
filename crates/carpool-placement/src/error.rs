//! Placement error types.
//!
//! Apart from `DuplicateCar`, every variant signals that the allocator
//! and the waiting queue disagree about a group. Callers treat them as
//! internal faults rather than user errors.

use carpool_core::{CarId, GroupId, Seats};
use thiserror::Error;

/// Result type alias for placement operations.
pub type PlacementResult<T> = Result<T, PlacementError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("duplicate car id: {0}")]
    DuplicateCar(CarId),

    #[error("group already waiting: {0}")]
    DuplicateWaiting(GroupId),

    #[error("group not waiting: {0}")]
    MissingWaiting(GroupId),

    #[error("unknown car: {0}")]
    UnknownCar(CarId),

    #[error("car {car} has {available} seats available, cannot seat {people}")]
    Overcommit {
        car: CarId,
        available: Seats,
        people: Seats,
    },
}
