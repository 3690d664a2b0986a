use super::errors::{EntityRef, SimResult, SimulationError};
use super::types::{QueueEntity, SimTime};
use indexmap::IndexMap;
use serde::Serialize;

/// FIFO waiting line of entities with identity-based removal.
///
/// Entries keep their insertion order and the clock at which they entered,
/// so the queue can report waiting times alongside its length history.
/// Inserting an entity that is already queued, or removing one that is not,
/// is an invariant violation.
#[derive(Debug, Clone)]
pub struct ResourceQueue<T: QueueEntity> {
    name: &'static str,
    entries: IndexMap<T, SimTime>,
    observations: u64,
    max_length: usize,
    /// Integral of the queue length over time since the start of the run
    length_area: f64,
    last_change: SimTime,
    removals: u64,
    zeros: u64,
    total_wait: f64,
    max_wait: f64,
}

/// Read-only snapshot of a queue's statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueStatistics {
    pub name: &'static str,
    pub length: usize,
    pub max_length: usize,
    pub observations: u64,
    pub average_length: f64,
    pub zeros: u64,
    pub average_wait: f64,
    pub max_wait: f64,
}

impl<T: QueueEntity> ResourceQueue<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: IndexMap::new(),
            observations: 0,
            max_length: 0,
            length_area: 0.0,
            last_change: 0.0,
            removals: 0,
            zeros: 0,
            total_wait: 0.0,
            max_wait: 0.0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Append an entity at the tail of the queue
    pub fn insert(&mut self, entity: T, now: SimTime) -> SimResult<()> {
        if self.entries.contains_key(&entity) {
            return Err(SimulationError::invariant(
                self.name,
                EntityRef::One(entity.into()),
                now,
                "is already queued",
            ));
        }

        self.accumulate(now);
        self.entries.insert(entity, now);
        self.observations += 1;
        self.max_length = self.max_length.max(self.entries.len());
        Ok(())
    }

    /// Remove an entity wherever it sits in the queue
    pub fn remove(&mut self, entity: T, now: SimTime) -> SimResult<()> {
        let entered = match self.entries.get(&entity) {
            Some(&entered) => entered,
            None => {
                return Err(SimulationError::invariant(
                    self.name,
                    EntityRef::One(entity.into()),
                    now,
                    "is not queued",
                ))
            }
        };

        self.accumulate(now);
        self.entries.shift_remove(&entity);

        let wait = now - entered;
        self.removals += 1;
        self.total_wait += wait;
        self.max_wait = self.max_wait.max(wait);
        if wait == 0.0 {
            self.zeros += 1;
        }
        Ok(())
    }

    /// Entity at the head of the queue, if any
    pub fn first(&self) -> Option<T> {
        self.entries.first().map(|(entity, _)| *entity)
    }

    pub fn contains(&self, entity: T) -> bool {
        self.entries.contains_key(&entity)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entities in service order
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.entries.keys().copied()
    }

    pub fn statistics(&self, now: SimTime) -> QueueStatistics {
        let area = self.length_area + self.entries.len() as f64 * (now - self.last_change);
        let average_length = if now > 0.0 {
            area / now
        } else {
            self.entries.len() as f64
        };
        let average_wait = if self.removals > 0 {
            self.total_wait / self.removals as f64
        } else {
            0.0
        };

        QueueStatistics {
            name: self.name,
            length: self.entries.len(),
            max_length: self.max_length,
            observations: self.observations,
            average_length,
            zeros: self.zeros,
            average_wait,
            max_wait: self.max_wait,
        }
    }

    fn accumulate(&mut self, now: SimTime) {
        self.length_area += self.entries.len() as f64 * (now - self.last_change);
        self.last_change = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CustomerId;

    #[test]
    fn test_fifo_order() {
        let mut queue = ResourceQueue::new("WaitingCustomers");
        for n in 1..=3 {
            queue.insert(CustomerId(n), 0.0).unwrap();
        }
        assert_eq!(queue.first(), Some(CustomerId(1)));

        queue.remove(CustomerId(1), 1.0).unwrap();
        assert_eq!(queue.first(), Some(CustomerId(2)));
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec![CustomerId(2), CustomerId(3)]);
    }

    #[test]
    fn test_remove_from_middle_keeps_order() {
        let mut queue = ResourceQueue::new("PendingPayment");
        for n in 1..=4 {
            queue.insert(CustomerId(n), 0.0).unwrap();
        }
        queue.remove(CustomerId(2), 0.5).unwrap();
        assert_eq!(
            queue.iter().collect::<Vec<_>>(),
            vec![CustomerId(1), CustomerId(3), CustomerId(4)]
        );
    }

    #[test]
    fn test_duplicate_insert_is_violation() {
        let mut queue = ResourceQueue::new("WaitingCustomers");
        queue.insert(CustomerId(1), 0.0).unwrap();

        let err = queue.insert(CustomerId(1), 2.0).unwrap_err();
        assert!(err.is_invariant_violation());
        assert!(err.to_string().contains("WaitingCustomers"));
        assert!(err.to_string().contains("Customer#1"));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_missing_remove_is_violation() {
        let mut queue: ResourceQueue<CustomerId> = ResourceQueue::new("PendingPayment");
        let err = queue.remove(CustomerId(9), 1.0).unwrap_err();
        assert!(err.is_invariant_violation());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_statistics() {
        let mut queue = ResourceQueue::new("WaitingCustomers");
        queue.insert(CustomerId(1), 0.0).unwrap();
        queue.insert(CustomerId(2), 2.0).unwrap();
        queue.remove(CustomerId(1), 4.0).unwrap();
        queue.remove(CustomerId(2), 4.0).unwrap();
        queue.insert(CustomerId(3), 6.0).unwrap();
        queue.remove(CustomerId(3), 6.0).unwrap();

        let stats = queue.statistics(8.0);
        assert_eq!(stats.length, 0);
        assert_eq!(stats.max_length, 2);
        assert_eq!(stats.observations, 3);
        assert_eq!(stats.zeros, 1);
        // length 1 over [0,2), 2 over [2,4), 0 afterwards
        assert!((stats.average_length - 6.0 / 8.0).abs() < 1e-12);
        assert!((stats.average_wait - 2.0).abs() < 1e-12);
        assert_eq!(stats.max_wait, 4.0);
    }
}
