pub mod config;
pub mod replication;
pub mod simulation_engine;

// Re-export commonly used types
pub use config::{ConcurrencyMode, DelayMode, ServiceTimes, SimulationConfig, TraceWindow};
pub use replication::run_replications;
pub use simulation_engine::Simulation;
