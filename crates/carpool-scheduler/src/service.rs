//! Matching service — the group lifecycle on top of placement.
//!
//! A group is either seated in a car or waiting, never both:
//!
//! ```text
//! add ──► seated ──drop_off──► gone
//!  │                  ▲
//!  └──► waiting ──────┘  (drop_off cancels)
//!          │
//!          └──► seated   (when a drop-off frees a car it fits in)
//! ```
//!
//! When a seated group is dropped off, only the car it leaves is
//! refilled, from the waiting queue in arrival order.

use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;

use tracing::{error, info, warn};

use carpool_core::{Car, CarId, FleetStatus, Group, GroupId, MatchingConfig, Seats};
use carpool_placement::{AdmissionQueue, CapacityAllocator, PlacementError};

use crate::error::{SchedulerError, SchedulerResult};

#[derive(Debug, Clone)]
pub struct MatchingService {
    /// Fleet as loaded, for reporting total seats.
    cars: HashMap<CarId, Car>,
    /// Every known group and its size, seated or waiting.
    groups: HashMap<GroupId, Seats>,
    allocator: CapacityAllocator,
    queue: AdmissionQueue,
}

impl MatchingService {
    /// Build a service for a fleet of empty cars.
    pub fn new(
        cars: impl IntoIterator<Item = Car>,
        group_sizes: RangeInclusive<Seats>,
    ) -> SchedulerResult<Self> {
        let cars: Vec<Car> = cars.into_iter().collect();
        let allocator = CapacityAllocator::new(cars.iter().copied())?;

        info!(cars = cars.len(), "fleet loaded");
        Ok(Self {
            cars: cars.into_iter().map(|car| (car.id, car)).collect(),
            groups: HashMap::new(),
            allocator,
            queue: AdmissionQueue::new(group_sizes),
        })
    }

    pub fn with_config(
        cars: impl IntoIterator<Item = Car>,
        config: &MatchingConfig,
    ) -> SchedulerResult<Self> {
        Self::new(cars, config.group_sizes.as_range())
    }

    /// Register a journey. Seats the group right away in the best
    /// fitting car, or queues it if none fits.
    ///
    /// Returns the car the group was seated in, if any.
    pub fn add(&mut self, group: Group) -> SchedulerResult<Option<CarId>> {
        let Group { id, people } = group;
        if self.groups.contains_key(&id) {
            warn!(group = %id, "duplicate group rejected");
            return Err(SchedulerError::DuplicateGroup(id));
        }

        let car = self.allocator.place(id, people);
        match car {
            Some(car) => info!(group = %id, people, %car, "group assigned"),
            None => {
                self.queue.enqueue(id, people).map_err(inconsistent)?;
                info!(group = %id, people, waiting = self.queue.len(), "group queued");
            }
        }

        self.groups.insert(id, people);
        Ok(car)
    }

    /// Forget a group, seated or waiting. If it was seated, the car it
    /// leaves is refilled from the waiting queue.
    ///
    /// Returns the waiting groups that were seated as a result.
    ///
    /// The group is forgotten even when the call fails with
    /// [`SchedulerError::Inconsistent`].
    pub fn drop_off(&mut self, id: GroupId) -> SchedulerResult<Vec<GroupId>> {
        let Some(people) = self.groups.remove(&id) else {
            warn!(group = %id, "drop-off of unknown group");
            return Err(SchedulerError::MissingGroup(id));
        };

        let released = self.allocator.release(id, people).map_err(inconsistent)?;
        let seated = match released {
            Some(car) => {
                let seated = self
                    .allocator
                    .refill(car, &mut self.queue)
                    .map_err(inconsistent)?;
                info!(
                    group = %id,
                    %car,
                    refilled = seated.len(),
                    available = self.allocator.available_seats(car).unwrap_or_default(),
                    "group dropped off"
                );
                seated.into_iter().map(|(group, _)| group).collect()
            }
            None => {
                self.queue.remove(id).map_err(inconsistent)?;
                info!(group = %id, "waiting group cancelled");
                Vec::new()
            }
        };
        Ok(seated)
    }

    /// The car a group rides in, or `None` while it is still waiting.
    pub fn locate(&self, id: GroupId) -> SchedulerResult<Option<Car>> {
        if !self.groups.contains_key(&id) {
            return Err(SchedulerError::MissingGroup(id));
        }

        match self.allocator.car_for(id) {
            None => Ok(None),
            Some(car_id) => self
                .cars
                .get(&car_id)
                .copied()
                .map(Some)
                .ok_or_else(|| inconsistent(PlacementError::UnknownCar(car_id))),
        }
    }

    pub fn status(&self) -> FleetStatus {
        FleetStatus {
            cars: self.cars.len(),
            assigned: self.allocator.seated_count(),
            waiting: self.queue.len(),
        }
    }

    /// Waiting groups in arrival order.
    pub fn waiting(&self) -> Vec<(GroupId, Seats)> {
        self.queue.to_vec()
    }

    pub fn available_seats(&self, car: CarId) -> Option<Seats> {
        self.allocator.available_seats(car)
    }

    /// Available seats per car.
    pub fn snapshot(&self) -> BTreeMap<CarId, Seats> {
        self.allocator.snapshot()
    }

    pub fn cars(&self) -> impl Iterator<Item = &Car> {
        self.cars.values()
    }

    /// Size of a known group.
    pub fn people(&self, id: GroupId) -> Option<Seats> {
        self.groups.get(&id).copied()
    }
}

fn inconsistent(err: PlacementError) -> SchedulerError {
    error!(error = %err, "matching state inconsistent");
    SchedulerError::Inconsistent(err)
}
