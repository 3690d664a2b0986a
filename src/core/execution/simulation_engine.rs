use crate::core::context::SimulationContext;
use crate::core::entity_pool::EntityPool;
use crate::core::errors::{SimResult, SimulationError};
use crate::core::event::{EventRecord, SimEvent};
use crate::core::execution::config::SimulationConfig;
use crate::core::handlers;
use crate::core::observer::SimulationObserver;
use crate::core::queue_network::{QueueName, QueueNetwork};
use crate::core::report::RunReport;
use crate::core::types::{Entity, SimTime};
use crate::core::variates::VariateSource;
use log::{debug, info, warn};
use uuid::Uuid;

/// Drives one run of the McBurger model: populates the agent pools, arms
/// the customer generator and fires events until the stop time.
pub struct Simulation {
    run_id: Uuid,
    config: SimulationConfig,
    context: SimulationContext,
    initialized: bool,
    events_processed: u64,
    /// Set once a handler fails; the run cannot continue after that
    failure: Option<SimulationError>,
    trace: Vec<EventRecord>,
    observers: Vec<Box<dyn SimulationObserver>>,
}

impl Simulation {
    /// Validate the configuration and build the entity pools and random
    /// streams. No event runs until `initialize` and `run`.
    pub fn configure(config: SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        let pool = EntityPool::new(config.num_takers, config.num_preppers);
        let variates = VariateSource::new(config.seed, &config.service_times, config.delay_mode)?;

        Ok(Self {
            run_id: Uuid::new_v4(),
            context: SimulationContext::new(pool, variates),
            config,
            initialized: false,
            events_processed: 0,
            failure: None,
            trace: Vec::new(),
            observers: Vec::new(),
        })
    }

    /// Put every agent in its idle queue and schedule the first customer
    /// generation at time zero
    pub fn initialize(&mut self) -> SimResult<()> {
        if self.initialized {
            warn!("run {} is already initialized", self.run_id);
            return Ok(());
        }

        let now = self.context.now();
        let ctx = &mut self.context;
        for agent in ctx.pool.takers() {
            ctx.network.idle_takers.insert(agent.id, now)?;
        }
        for agent in ctx.pool.preppers() {
            ctx.network.idle_preppers.insert(agent.id, now)?;
        }
        ctx.scheduler.schedule_event(SimEvent::Generate, 0.0)?;

        self.initialized = true;
        debug!(
            "run {} initialized with {} takers and {} preppers",
            self.run_id, self.config.num_takers, self.config.num_preppers
        );
        Ok(())
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    /// Place an extra event on the event list, `delay` after the current clock
    pub fn schedule(&mut self, event: SimEvent, delay: f64) -> SimResult<SimTime> {
        self.context.scheduler.schedule_event(event, delay)
    }

    /// Run until the next event would fall after the stop time or no events
    /// remain. The clock then stands at the stop time.
    pub fn run(&mut self) -> SimResult<RunReport> {
        if !self.initialized {
            return Err(SimulationError::NotInitialized);
        }
        info!(
            "run {} started: seed {}, stop time {}",
            self.run_id, self.config.seed, self.config.stop_time
        );

        while self.step()?.is_some() {}

        if self.context.scheduler.has_events() {
            self.context.scheduler.advance_to(self.config.stop_time);
        }

        let report = self.report();
        for observer in &mut self.observers {
            observer.on_finish(&report);
        }
        info!(
            "run {} finished at {:.4} after {} events",
            self.run_id,
            self.clock(),
            self.events_processed
        );
        Ok(report)
    }

    /// Fire the next event if it is due by the stop time. Returns `None`
    /// when nothing is left to do.
    pub fn step(&mut self) -> SimResult<Option<EventRecord>> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        if !self.initialized {
            return Err(SimulationError::NotInitialized);
        }

        let Some((time, event)) = self.context.scheduler.pop_next(self.config.stop_time) else {
            return Ok(None);
        };

        let touched = match self.execute(event) {
            Ok(touched) => touched,
            Err(err) => {
                warn!("run {} aborted at {:.4}: {}", self.run_id, time, err);
                self.failure = Some(err.clone());
                return Err(err);
            }
        };

        self.events_processed += 1;
        let mut entities = event.entities();
        entities.extend(touched);
        let record = EventRecord {
            sequence: self.events_processed,
            time,
            kind: event.kind(),
            entities,
        };

        if self.config.record_trace
            && self
                .config
                .trace_window
                .map_or(true, |window| window.contains(time))
        {
            self.trace.push(record.clone());
        }
        for observer in &mut self.observers {
            observer.on_event(&record, &self.context.network);
        }
        Ok(Some(record))
    }

    fn execute(&mut self, event: SimEvent) -> SimResult<Vec<Entity>> {
        let touched = handlers::dispatch(&mut self.context, event)?;
        if self.config.verify_invariants {
            self.context
                .network
                .check_invariants(&self.context.pool, self.context.now())?;
        }
        Ok(touched)
    }

    /// Snapshot of the run's counters and queue statistics
    pub fn report(&self) -> RunReport {
        let pool = &self.context.pool;
        let now = self.clock();
        RunReport {
            run_id: self.run_id,
            seed: self.config.seed,
            stop_time: self.config.stop_time,
            final_clock: now,
            events_processed: self.events_processed,
            customers_created: pool.customers_created(),
            customers_departed: pool.customers_departed(),
            customers_waiting: self.context.network.waiting_customers.len() as u64,
            customers_in_service: pool.customers_in_service(),
            queues: self.context.network.statistics(now),
        }
    }

    /// Get current simulation time
    pub fn clock(&self) -> SimTime {
        self.context.now()
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn queue_len(&self, queue: QueueName) -> usize {
        self.context.network.len(queue)
    }

    pub fn network(&self) -> &QueueNetwork {
        &self.context.network
    }

    pub fn pool(&self) -> &EntityPool {
        &self.context.pool
    }

    /// Events still on the event list, in the order they will fire
    pub fn pending_events(&self) -> Vec<(SimTime, SimEvent)> {
        self.context.scheduler.pending()
    }

    /// Recorded events, in execution order
    pub fn trace(&self) -> &[EventRecord] {
        &self.trace
    }

    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Check every network invariant against the current state
    pub fn check_invariants(&self) -> SimResult<()> {
        self.context
            .network
            .check_invariants(&self.context.pool, self.context.now())
    }
}
