use serde::Serialize;
use std::fmt;
use std::hash::Hash;

/// Simulation time in model minutes
pub type SimTime = f64;

/// The three kinds of entity that flow through the queue network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EntityKind {
    Customer,
    Taker,
    Prepper,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Customer => "Customer",
            EntityKind::Taker => "Taker",
            EntityKind::Prepper => "Prepper",
        }
    }
}

/// Identity of a customer. Customers carry no other state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CustomerId(pub u64);

/// Identity of a taker agent; indexes into the taker pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TakerId(pub u32);

/// Identity of a prep agent; indexes into the prepper pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PrepperId(pub u32);

/// Tagged entity identity, used wherever an entity of any kind has to be
/// named: trace records, diagnostics, queue statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Entity {
    Customer(CustomerId),
    Taker(TakerId),
    Prepper(PrepperId),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Customer(_) => EntityKind::Customer,
            Entity::Taker(_) => EntityKind::Taker,
            Entity::Prepper(_) => EntityKind::Prepper,
        }
    }

    /// Numeric part of the identity, 1-based for agents to match the names
    /// shown in traces
    pub fn number(&self) -> u64 {
        match self {
            Entity::Customer(id) => id.0,
            Entity::Taker(id) => id.0 as u64 + 1,
            Entity::Prepper(id) => id.0 as u64 + 1,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind().name(), self.number())
    }
}

/// Anything that can sit in a `ResourceQueue`
pub trait QueueEntity: Copy + Eq + Hash + fmt::Debug + Into<Entity> {}

impl QueueEntity for CustomerId {}
impl QueueEntity for TakerId {}
impl QueueEntity for PrepperId {}

impl From<CustomerId> for Entity {
    fn from(id: CustomerId) -> Self {
        Entity::Customer(id)
    }
}

impl From<TakerId> for Entity {
    fn from(id: TakerId) -> Self {
        Entity::Taker(id)
    }
}

impl From<PrepperId> for Entity {
    fn from(id: PrepperId) -> Self {
        Entity::Prepper(id)
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Entity::from(*self), f)
    }
}

impl fmt::Display for TakerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Entity::from(*self), f)
    }
}

impl fmt::Display for PrepperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Entity::from(*self), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_display_names() {
        assert_eq!(CustomerId(7).to_string(), "Customer#7");
        assert_eq!(TakerId(0).to_string(), "Taker#1");
        assert_eq!(PrepperId(2).to_string(), "Prepper#3");
    }

    #[test]
    fn test_entity_kind_tagging() {
        let entity: Entity = TakerId(1).into();
        assert_eq!(entity.kind(), EntityKind::Taker);
        assert_ne!(Entity::from(TakerId(1)), Entity::from(PrepperId(1)));
    }
}
