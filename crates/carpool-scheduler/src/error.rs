//! Scheduler error types.

use carpool_core::{CarId, GroupId};
use carpool_placement::PlacementError;
use thiserror::Error;

/// Errors that can occur during matching operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("duplicate id: {0}")]
    DuplicateCar(CarId),

    #[error("duplicate id: {0}")]
    DuplicateGroup(GroupId),

    #[error("group not found: {0}")]
    MissingGroup(GroupId),

    /// The allocator and the waiting queue disagree. Indicates a bug,
    /// never a bad request.
    #[error("matching state is inconsistent: {0}")]
    Inconsistent(PlacementError),
}

impl From<PlacementError> for SchedulerError {
    fn from(err: PlacementError) -> Self {
        match err {
            PlacementError::DuplicateCar(id) => SchedulerError::DuplicateCar(id),
            other => SchedulerError::Inconsistent(other),
        }
    }
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
