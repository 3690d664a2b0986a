pub mod core;

// Re-export commonly used types
pub use crate::core::errors::{SimResult, SimulationError};
pub use crate::core::event::{EventKind, EventRecord, SimEvent};
pub use crate::core::execution::{
    run_replications, ConcurrencyMode, DelayMode, ServiceTimes, Simulation, SimulationConfig,
};
pub use crate::core::observer::{LogObserver, SimulationObserver};
pub use crate::core::queue_network::QueueName;
pub use crate::core::report::RunReport;
pub use crate::core::types::{CustomerId, Entity, PrepperId, SimTime, TakerId};
