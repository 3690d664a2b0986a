use super::types::{CustomerId, Entity, PrepperId, SimTime, TakerId};
use std::fmt;

/// Errors that end a simulation run. None of them are recoverable once the
/// run has started.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("configuration error: {parameter} {reason}")]
    Configuration {
        parameter: &'static str,
        reason: String,
    },

    #[error("scheduling error: delay {delay} requested at clock {clock}")]
    Scheduling { delay: f64, clock: SimTime },

    #[error("invariant violation in {queue} at clock {clock}: {entity} {detail}")]
    InvariantViolation {
        queue: &'static str,
        entity: EntityRef,
        clock: SimTime,
        detail: String,
    },

    #[error("simulation has not been initialized")]
    NotInitialized,

    #[error("replication thread pool: {0}")]
    ThreadPool(String),
}

pub type SimResult<T> = Result<T, SimulationError>;

impl SimulationError {
    pub fn configuration(parameter: &'static str, reason: impl Into<String>) -> Self {
        SimulationError::Configuration {
            parameter,
            reason: reason.into(),
        }
    }

    pub fn invariant(
        queue: &'static str,
        entity: impl Into<EntityRef>,
        clock: SimTime,
        detail: impl Into<String>,
    ) -> Self {
        SimulationError::InvariantViolation {
            queue,
            entity: entity.into(),
            clock,
            detail: detail.into(),
        }
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, SimulationError::InvariantViolation { .. })
    }
}

/// The entity a violation is about. Network-wide checks such as customer
/// conservation are not about any single entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityRef {
    One(Entity),
    Network,
}

impl From<Entity> for EntityRef {
    fn from(entity: Entity) -> Self {
        EntityRef::One(entity)
    }
}

impl From<CustomerId> for EntityRef {
    fn from(id: CustomerId) -> Self {
        EntityRef::One(id.into())
    }
}

impl From<TakerId> for EntityRef {
    fn from(id: TakerId) -> Self {
        EntityRef::One(id.into())
    }
}

impl From<PrepperId> for EntityRef {
    fn from(id: PrepperId) -> Self {
        EntityRef::One(id.into())
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::One(entity) => write!(f, "{}", entity),
            EntityRef::Network => f.write_str("network"),
        }
    }
}
