use super::errors::{SimResult, SimulationError};
use super::event::SimEvent;
use super::types::SimTime;
use log::trace;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone)]
pub struct ScheduledEvent {
    pub time: SimTime,
    pub sequence_num: u64,
    pub event: SimEvent,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.sequence_num.cmp(&self.sequence_num))
    }
}

/// Pending event list plus the simulation clock.
///
/// Events fire in timestamp order; events with equal timestamps fire in the
/// order they were scheduled. The clock only moves forward.
#[derive(Debug, Clone, Default)]
pub struct EventScheduler {
    event_queue: BinaryHeap<ScheduledEvent>,
    sequence_counter: u64,
    clock: SimTime,
}

impl EventScheduler {
    /// Create a new EventScheduler with the clock at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an event to fire `delay` after the current clock.
    /// Returns the execution time.
    pub fn schedule_event(&mut self, event: SimEvent, delay: f64) -> SimResult<SimTime> {
        if !(delay >= 0.0 && delay.is_finite()) {
            return Err(SimulationError::Scheduling {
                delay,
                clock: self.clock,
            });
        }

        let time = self.clock + delay;
        trace!("schedule {:?} at {:.4} (seq {})", event, time, self.sequence_counter);
        self.event_queue.push(ScheduledEvent {
            time,
            sequence_num: self.sequence_counter,
            event,
        });
        self.sequence_counter += 1;
        Ok(time)
    }

    /// Pop the earliest event unless it lies beyond `stop_time`, advancing
    /// the clock to its timestamp
    pub fn pop_next(&mut self, stop_time: SimTime) -> Option<(SimTime, SimEvent)> {
        if self.peek_next_time()? > stop_time {
            return None;
        }
        let scheduled = self.event_queue.pop()?;
        self.clock = scheduled.time;
        trace!("fire {:?} at {:.4}", scheduled.event, scheduled.time);
        Some((scheduled.time, scheduled.event))
    }

    /// Move the clock forward without firing anything. Never moves it back.
    pub fn advance_to(&mut self, time: SimTime) {
        if time > self.clock {
            self.clock = time;
        }
    }

    pub fn clock(&self) -> SimTime {
        self.clock
    }

    /// Check if there are any events remaining in the queue
    pub fn has_events(&self) -> bool {
        !self.event_queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.event_queue.len()
    }

    /// Get the next event time without removing events
    pub fn peek_next_time(&self) -> Option<SimTime> {
        self.event_queue.peek().map(|scheduled| scheduled.time)
    }

    /// Pending events in the order they will fire
    pub fn pending(&self) -> Vec<(SimTime, SimEvent)> {
        let mut events = self.event_queue.clone().into_sorted_vec();
        events.reverse();
        events.into_iter().map(|s| (s.time, s.event)).collect()
    }
}
