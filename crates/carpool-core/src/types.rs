//! Shared types used across carpool crates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of seats (car capacity) or people (group size).
pub type Seats = u32;

/// Identity of a car. Fixed for the lifetime of a fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarId(pub u64);

/// Identity of a group. Free for reuse once the group is dropped off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u64);

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A car with its total seat count. Only the available seats change
/// over time, and those are tracked by the allocator, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    pub id: CarId,
    pub seats: Seats,
}

impl Car {
    pub fn new(id: u64, seats: Seats) -> Self {
        Self {
            id: CarId(id),
            seats,
        }
    }
}

/// A group of people travelling together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub people: Seats,
}

impl Group {
    pub fn new(id: u64, people: Seats) -> Self {
        Self {
            id: GroupId(id),
            people,
        }
    }
}

/// Point-in-time counters for a matching service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetStatus {
    pub cars: usize,
    pub assigned: usize,
    pub waiting: usize,
}
