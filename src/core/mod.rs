pub mod context;
pub mod entity_pool;
pub mod errors;
pub mod event;
pub mod event_scheduler;
pub mod execution;
pub mod handlers;
pub mod observer;
pub mod queue_network;
pub mod report;
pub mod resource_queue;
pub mod types;
pub mod variates;
