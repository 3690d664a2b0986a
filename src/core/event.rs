use super::types::{CustomerId, Entity, PrepperId, SimTime, TakerId};
use serde::Serialize;
use std::fmt;

/// A state transition waiting on the event list. Each variant carries the
/// entities its handler operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SimEvent {
    /// Create a customer and re-arm after an inter-arrival time
    Generate,
    Arrive(CustomerId),
    OrderTaken(TakerId),
    OrderCooked { prepper: PrepperId, taker: TakerId },
    PaymentEnd(TakerId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    Generate,
    Arrive,
    OrderTaken,
    OrderCooked,
    PaymentEnd,
}

impl SimEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SimEvent::Generate => EventKind::Generate,
            SimEvent::Arrive(_) => EventKind::Arrive,
            SimEvent::OrderTaken(_) => EventKind::OrderTaken,
            SimEvent::OrderCooked { .. } => EventKind::OrderCooked,
            SimEvent::PaymentEnd(_) => EventKind::PaymentEnd,
        }
    }

    /// Entities named by the event itself
    pub fn entities(&self) -> Vec<Entity> {
        match *self {
            SimEvent::Generate => Vec::new(),
            SimEvent::Arrive(customer) => vec![customer.into()],
            SimEvent::OrderTaken(taker) | SimEvent::PaymentEnd(taker) => vec![taker.into()],
            SimEvent::OrderCooked { prepper, taker } => vec![prepper.into(), taker.into()],
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Generate => "Generate",
            EventKind::Arrive => "Arrive",
            EventKind::OrderTaken => "OrderTaken",
            EventKind::OrderCooked => "OrderCooked",
            EventKind::PaymentEnd => "PaymentEnd",
        };
        f.write_str(name)
    }
}

/// What a handler did, reported to trace consumers once it has completed.
///
/// `entities` lists the event's own entities followed by any the handler
/// touched: the generated customer, the served customer, or the next
/// taker or customer pulled from a queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    /// Position of the event in execution order, starting at 1
    pub sequence: u64,
    pub time: SimTime,
    pub kind: EventKind,
    pub entities: Vec<Entity>,
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>6}] t={:.4} {}", self.sequence, self.time, self.kind)?;
        for entity in &self.entities {
            write!(f, " {entity}")?;
        }
        Ok(())
    }
}
