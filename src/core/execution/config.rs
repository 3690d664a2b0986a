//! Configuration for a McBurger simulation run
//!
//! This module provides the parameters of a run (seed, horizon, pool sizes,
//! service-time means) together with the execution options that control
//! tracing, invariant checking and how replications are spread over threads.

use crate::core::errors::{SimResult, SimulationError};
use serde::{Deserialize, Serialize};

/// Enumeration of supported concurrency modes for replications.
///
/// Events of a single run are always executed one at a time; the mode only
/// decides whether independent replications share a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcurrencyMode {
    /// Replications run one after another on the calling thread
    Sequential,
    /// Replications run on a Rayon thread pool
    Rayon,
}

impl Default for ConcurrencyMode {
    fn default() -> Self {
        ConcurrencyMode::Sequential
    }
}

/// How durations are drawn from their configured means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelayMode {
    /// Exponentially distributed around the mean
    Exponential,
    /// Always exactly the mean
    Fixed,
}

impl Default for DelayMode {
    fn default() -> Self {
        DelayMode::Exponential
    }
}

/// Mean durations, in minutes, of the four random processes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceTimes {
    pub inter_arrival: f64,
    pub order_taking: f64,
    pub cooking: f64,
    pub paying: f64,
}

impl Default for ServiceTimes {
    fn default() -> Self {
        Self {
            inter_arrival: 5.0,
            order_taking: 4.0,
            cooking: 7.0,
            paying: 1.5,
        }
    }
}

/// Simulation period during which events are recorded in the trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceWindow {
    pub start: f64,
    pub end: f64,
}

impl TraceWindow {
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    /// Simulation time at which the run ends
    pub stop_time: f64,
    pub num_takers: u32,
    pub num_preppers: u32,
    pub service_times: ServiceTimes,
    pub delay_mode: DelayMode,
    /// Keep an in-memory trace of executed events
    pub record_trace: bool,
    /// Only record events inside this window; `None` records all of them
    pub trace_window: Option<TraceWindow>,
    /// Check every queue invariant after each event
    pub verify_invariants: bool,
    pub concurrency_mode: ConcurrencyMode,
    /// The size of the thread pool for replications.
    /// Only relevant when concurrency_mode is Rayon
    pub thread_pool_size: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 728873,
            stop_time: 900.0,
            num_takers: 2,
            num_preppers: 3,
            service_times: ServiceTimes::default(),
            delay_mode: DelayMode::default(),
            record_trace: false,
            trace_window: None,
            verify_invariants: false,
            concurrency_mode: ConcurrencyMode::default(),
            thread_pool_size: None,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and validate a configuration from the model parameters
    #[allow(clippy::too_many_arguments)]
    pub fn configure(
        seed: u64,
        stop_time: f64,
        num_takers: u32,
        num_preppers: u32,
        mean_inter_arrival: f64,
        mean_order_taking: f64,
        mean_cooking: f64,
        mean_paying: f64,
    ) -> SimResult<Self> {
        let config = Self::new()
            .with_seed(seed)
            .with_stop_time(stop_time)
            .with_pool_sizes(num_takers, num_preppers)
            .with_service_times(ServiceTimes {
                inter_arrival: mean_inter_arrival,
                order_taking: mean_order_taking,
                cooking: mean_cooking,
                paying: mean_paying,
            });
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from JSON; absent fields take their defaults
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SimulationError::configuration("config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_stop_time(mut self, stop_time: f64) -> Self {
        self.stop_time = stop_time;
        self
    }

    pub fn with_pool_sizes(mut self, num_takers: u32, num_preppers: u32) -> Self {
        self.num_takers = num_takers;
        self.num_preppers = num_preppers;
        self
    }

    pub fn with_service_times(mut self, service_times: ServiceTimes) -> Self {
        self.service_times = service_times;
        self
    }

    pub fn with_delay_mode(mut self, mode: DelayMode) -> Self {
        self.delay_mode = mode;
        self
    }

    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.record_trace = enabled;
        self
    }

    pub fn with_trace_window(mut self, start: f64, end: f64) -> Self {
        self.record_trace = true;
        self.trace_window = Some(TraceWindow { start, end });
        self
    }

    pub fn with_invariant_checks(mut self, enabled: bool) -> Self {
        self.verify_invariants = enabled;
        self
    }

    /// Set the concurrency mode for replications
    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the thread pool size for parallel replications
    ///
    /// # Note
    /// This setting only affects execution when concurrency_mode is Rayon
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        if !(self.stop_time > 0.0 && self.stop_time.is_finite()) {
            return Err(SimulationError::configuration(
                "stop_time",
                format!("must be positive and finite, got {}", self.stop_time),
            ));
        }
        if self.num_takers == 0 {
            return Err(SimulationError::configuration("num_takers", "must be positive"));
        }
        if self.num_preppers == 0 {
            return Err(SimulationError::configuration("num_preppers", "must be positive"));
        }

        let means = [
            ("mean_inter_arrival", self.service_times.inter_arrival),
            ("mean_order_taking", self.service_times.order_taking),
            ("mean_cooking", self.service_times.cooking),
            ("mean_paying", self.service_times.paying),
        ];
        for (parameter, mean) in means {
            if !(mean > 0.0 && mean.is_finite()) {
                return Err(SimulationError::configuration(
                    parameter,
                    format!("must be positive and finite, got {mean}"),
                ));
            }
        }

        if let Some(window) = self.trace_window {
            if !(window.start <= window.end) {
                return Err(SimulationError::configuration(
                    "trace_window",
                    format!("start {} is after end {}", window.start, window.end),
                ));
            }
        }
        if self.thread_pool_size == Some(0) {
            return Err(SimulationError::configuration(
                "thread_pool_size",
                "must be positive",
            ));
        }
        Ok(())
    }
}
