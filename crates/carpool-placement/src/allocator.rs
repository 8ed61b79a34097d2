//! Best-fit seat allocation.
//!
//! Tracks the available seats of every car and which car each seated
//! group rides in. A second index groups cars by their current number
//! of available seats, so finding the car that is left fullest after
//! seating a group is a single ordered-map range lookup.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use carpool_core::{Car, CarId, GroupId, Seats};

use crate::admission::AdmissionQueue;
use crate::error::{PlacementError, PlacementResult};

#[derive(Debug, Clone, Default)]
pub struct CapacityAllocator {
    /// Car → seats currently available.
    available: HashMap<CarId, Seats>,
    /// Available seats → cars with exactly that many. No empty sets.
    by_available: BTreeMap<Seats, BTreeSet<CarId>>,
    /// Seated group → car.
    assignments: HashMap<GroupId, CarId>,
}

impl CapacityAllocator {
    /// Build an allocator with every car empty.
    pub fn new(cars: impl IntoIterator<Item = Car>) -> PlacementResult<Self> {
        let mut allocator = Self::default();
        for car in cars {
            if allocator.available.insert(car.id, car.seats).is_some() {
                return Err(PlacementError::DuplicateCar(car.id));
            }
            allocator
                .by_available
                .entry(car.seats)
                .or_default()
                .insert(car.id);
        }
        Ok(allocator)
    }

    /// Seat a group in the car whose available seats are the smallest
    /// value still `>= people`. Ties go to the lowest car id.
    ///
    /// Returns `None` without mutating anything if no car fits.
    pub fn place(&mut self, group: GroupId, people: Seats) -> Option<CarId> {
        let (&available, cars) = self.by_available.range(people..).next()?;
        let car = *cars.first()?;

        self.set_available(car, available, available - people);
        self.assignments.insert(group, car);
        debug!(%group, %car, people, available = available - people, "group seated");
        Some(car)
    }

    /// Free the seats held by `group`.
    ///
    /// Returns the car the group was riding in, or `None` if the group
    /// was not seated. Nothing changes if the group's car is unknown.
    pub fn release(&mut self, group: GroupId, people: Seats) -> PlacementResult<Option<CarId>> {
        let Some(&car) = self.assignments.get(&group) else {
            return Ok(None);
        };
        let available = self
            .available_seats(car)
            .ok_or(PlacementError::UnknownCar(car))?;

        self.assignments.remove(&group);
        self.set_available(car, available, available + people);
        debug!(%group, %car, people, available = available + people, "group released");
        Ok(Some(car))
    }

    /// Refill `car` from the waiting queue, earliest arrival first,
    /// until the car is full or nothing waiting fits.
    ///
    /// Groups that do not fit are skipped and keep their place in the
    /// queue. Returns the groups seated, in the order they were seated.
    pub fn refill(
        &mut self,
        car: CarId,
        queue: &mut AdmissionQueue,
    ) -> PlacementResult<Vec<(GroupId, Seats)>> {
        let mut seated = Vec::new();
        loop {
            let available = self
                .available_seats(car)
                .ok_or(PlacementError::UnknownCar(car))?;
            if available == 0 {
                break;
            }
            let Some((group, people)) = queue.first_fitting(available) else {
                break;
            };

            self.place_onto(car, group, people)?;
            queue.remove(group)?;
            seated.push((group, people));
        }
        Ok(seated)
    }

    pub fn available_seats(&self, car: CarId) -> Option<Seats> {
        self.available.get(&car).copied()
    }

    pub fn car_for(&self, group: GroupId) -> Option<CarId> {
        self.assignments.get(&group).copied()
    }

    pub fn car_count(&self) -> usize {
        self.available.len()
    }

    pub fn seated_count(&self) -> usize {
        self.assignments.len()
    }

    /// Available seats per car, ordered by car id.
    pub fn snapshot(&self) -> BTreeMap<CarId, Seats> {
        self.available.iter().map(|(&car, &seats)| (car, seats)).collect()
    }

    /// Seat a group in a specific car, bypassing best-fit selection.
    /// Only reachable through [`refill`](Self::refill).
    fn place_onto(&mut self, car: CarId, group: GroupId, people: Seats) -> PlacementResult<()> {
        let available = self
            .available_seats(car)
            .ok_or(PlacementError::UnknownCar(car))?;
        if people > available {
            return Err(PlacementError::Overcommit {
                car,
                available,
                people,
            });
        }

        self.set_available(car, available, available - people);
        self.assignments.insert(group, car);
        debug!(%group, %car, people, available = available - people, "waiting group seated");
        Ok(())
    }

    /// Move `car` between `by_available` buckets and record its new count.
    fn set_available(&mut self, car: CarId, from: Seats, to: Seats) {
        if let Some(cars) = self.by_available.get_mut(&from) {
            cars.remove(&car);
            if cars.is_empty() {
                self.by_available.remove(&from);
            }
        }
        self.by_available.entry(to).or_default().insert(car);
        self.available.insert(car, to);
    }

    #[cfg(test)]
    fn index_consistent(&self) -> bool {
        let mut rebuilt: BTreeMap<Seats, BTreeSet<CarId>> = BTreeMap::new();
        for (&car, &seats) in &self.available {
            rebuilt.entry(seats).or_default().insert(car);
        }
        rebuilt == self.by_available
    }
}
