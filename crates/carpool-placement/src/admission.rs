//! Waiting queue for groups that no car can currently seat.
//!
//! Groups are kept in arrival order. Alongside the canonical order the
//! queue maintains one derived view per size threshold `t`: the waiting
//! groups with `people <= t`, still in arrival order. Answering "who is
//! the earliest group that fits in `n` seats" then costs a lookup in the
//! threshold map plus the first entry of one view, independent of how
//! many groups are waiting.
//!
//! Every size currently waiting has its own threshold, so the view for
//! the largest threshold `t <= n` holds exactly the groups that fit in
//! `n`. Thresholds outside the configured range are grown on demand and
//! dropped again once no waiting group has that size.

use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;

use tracing::debug;

use carpool_core::{GroupId, Seats};

use crate::error::{PlacementError, PlacementResult};

/// Arrival sequence number → group, ordered by arrival.
type View = BTreeMap<u64, GroupId>;

#[derive(Debug, Clone, Copy)]
struct Waiting {
    arrival: u64,
    people: Seats,
}

#[derive(Debug, Clone)]
pub struct AdmissionQueue {
    entries: HashMap<GroupId, Waiting>,
    arrivals: View,
    views: BTreeMap<Seats, View>,
    /// Thresholds that are never dropped.
    sizes: RangeInclusive<Seats>,
    /// Waiting groups per exact size.
    per_size: HashMap<Seats, usize>,
    next_arrival: u64,
}

impl Default for AdmissionQueue {
    fn default() -> Self {
        Self::new(1..=6)
    }
}

impl AdmissionQueue {
    /// Create an empty queue with thresholds pre-created for `sizes`.
    pub fn new(sizes: RangeInclusive<Seats>) -> Self {
        Self {
            entries: HashMap::new(),
            arrivals: View::new(),
            views: sizes.clone().map(|size| (size, View::new())).collect(),
            sizes,
            per_size: HashMap::new(),
            next_arrival: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: GroupId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Append a group at the back of the queue.
    pub fn enqueue(&mut self, id: GroupId, people: Seats) -> PlacementResult<()> {
        if self.entries.contains_key(&id) {
            return Err(PlacementError::DuplicateWaiting(id));
        }

        self.ensure_threshold(people);

        let arrival = self.next_arrival;
        self.next_arrival += 1;

        for view in self.views.range_mut(people..).map(|(_, v)| v) {
            view.insert(arrival, id);
        }
        self.arrivals.insert(arrival, id);
        self.entries.insert(id, Waiting { arrival, people });
        *self.per_size.entry(people).or_default() += 1;
        Ok(())
    }

    /// Earliest-arrived group with `people <= seats`, if any.
    ///
    /// Does not remove the group: callers seat it first and then call
    /// [`remove`](Self::remove).
    pub fn first_fitting(&self, seats: Seats) -> Option<(GroupId, Seats)> {
        let (_, view) = self.views.range(..=seats).next_back()?;
        let (_, &id) = view.first_key_value()?;
        let waiting = self.entries.get(&id)?;
        Some((id, waiting.people))
    }

    pub fn remove(&mut self, id: GroupId) -> PlacementResult<()> {
        let Waiting { arrival, people } = self
            .entries
            .remove(&id)
            .ok_or(PlacementError::MissingWaiting(id))?;

        self.arrivals.remove(&arrival);
        for view in self.views.range_mut(people..).map(|(_, v)| v) {
            view.remove(&arrival);
        }

        let remaining = self.per_size.get_mut(&people).map(|count| {
            *count -= 1;
            *count
        });
        if remaining == Some(0) {
            self.per_size.remove(&people);
            if !self.sizes.contains(&people) {
                // Same contents as the nearest lower view now.
                self.views.remove(&people);
                debug!(threshold = people, "waiting threshold dropped");
            }
        }
        Ok(())
    }

    /// Waiting groups in arrival order.
    pub fn to_vec(&self) -> Vec<(GroupId, Seats)> {
        self.arrivals
            .values()
            .filter_map(|id| self.entries.get(id).map(|w| (*id, w.people)))
            .collect()
    }

    /// Create the view for `people` if this size has never been seen.
    ///
    /// Groups that fit the new threshold are exactly those in the
    /// nearest lower view, since no waiting group has a size strictly
    /// between the two thresholds.
    fn ensure_threshold(&mut self, people: Seats) {
        if self.views.contains_key(&people) {
            return;
        }
        let seed = self
            .views
            .range(..people)
            .next_back()
            .map(|(_, view)| view.clone())
            .unwrap_or_default();
        debug!(threshold = people, seeded = seed.len(), "new waiting threshold");
        self.views.insert(people, seed);
    }

    #[cfg(test)]
    fn view(&self, threshold: Seats) -> Option<Vec<GroupId>> {
        self.views
            .get(&threshold)
            .map(|view| view.values().copied().collect())
    }

    #[cfg(test)]
    fn thresholds(&self) -> Vec<Seats> {
        self.views.keys().copied().collect()
    }
}
