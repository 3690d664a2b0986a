use super::entity_pool::EntityPool;
use super::event_scheduler::EventScheduler;
use super::queue_network::QueueNetwork;
use super::types::SimTime;
use super::variates::VariateSource;

/// All mutable state of a run, handed to each transition handler in turn.
///
/// Handlers run one at a time, so plain `&mut` access is all the
/// coordination the network needs.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub scheduler: EventScheduler,
    pub network: QueueNetwork,
    pub pool: EntityPool,
    pub variates: VariateSource,
}

impl SimulationContext {
    pub fn new(pool: EntityPool, variates: VariateSource) -> Self {
        Self {
            scheduler: EventScheduler::new(),
            network: QueueNetwork::new(),
            pool,
            variates,
        }
    }

    pub fn now(&self) -> SimTime {
        self.scheduler.clock()
    }
}
