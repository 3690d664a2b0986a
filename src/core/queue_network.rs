use super::entity_pool::EntityPool;
use super::errors::{EntityRef, SimResult, SimulationError};
use super::resource_queue::{QueueStatistics, ResourceQueue};
use super::types::{CustomerId, PrepperId, SimTime, TakerId};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// The six queues of the service network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QueueName {
    WaitingCustomers,
    IdleTakers,
    PendingPayment,
    TakersAwaitingPrep,
    TakersInPrep,
    IdlePreppers,
}

impl QueueName {
    pub const ALL: [QueueName; 6] = [
        QueueName::WaitingCustomers,
        QueueName::IdleTakers,
        QueueName::PendingPayment,
        QueueName::TakersAwaitingPrep,
        QueueName::TakersInPrep,
        QueueName::IdlePreppers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueueName::WaitingCustomers => "WaitingCustomers",
            QueueName::IdleTakers => "IdleTakers",
            QueueName::PendingPayment => "PendingPayment",
            QueueName::TakersAwaitingPrep => "TakersAwaitingPrep",
            QueueName::TakersInPrep => "TakersInPrep",
            QueueName::IdlePreppers => "IdlePreppers",
        }
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The queue topology shared by all transition handlers
#[derive(Debug, Clone)]
pub struct QueueNetwork {
    pub waiting_customers: ResourceQueue<CustomerId>,
    pub idle_takers: ResourceQueue<TakerId>,
    pub pending_payment: ResourceQueue<CustomerId>,
    pub takers_awaiting_prep: ResourceQueue<TakerId>,
    pub takers_in_prep: ResourceQueue<TakerId>,
    pub idle_preppers: ResourceQueue<PrepperId>,
}

impl QueueNetwork {
    pub fn new() -> Self {
        Self {
            waiting_customers: ResourceQueue::new(QueueName::WaitingCustomers.as_str()),
            idle_takers: ResourceQueue::new(QueueName::IdleTakers.as_str()),
            pending_payment: ResourceQueue::new(QueueName::PendingPayment.as_str()),
            takers_awaiting_prep: ResourceQueue::new(QueueName::TakersAwaitingPrep.as_str()),
            takers_in_prep: ResourceQueue::new(QueueName::TakersInPrep.as_str()),
            idle_preppers: ResourceQueue::new(QueueName::IdlePreppers.as_str()),
        }
    }

    pub fn len(&self, queue: QueueName) -> usize {
        match queue {
            QueueName::WaitingCustomers => self.waiting_customers.len(),
            QueueName::IdleTakers => self.idle_takers.len(),
            QueueName::PendingPayment => self.pending_payment.len(),
            QueueName::TakersAwaitingPrep => self.takers_awaiting_prep.len(),
            QueueName::TakersInPrep => self.takers_in_prep.len(),
            QueueName::IdlePreppers => self.idle_preppers.len(),
        }
    }

    /// Lengths of all six queues, in `QueueName::ALL` order
    pub fn lengths(&self) -> [usize; 6] {
        QueueName::ALL.map(|queue| self.len(queue))
    }

    pub fn statistics(&self, now: SimTime) -> Vec<QueueStatistics> {
        vec![
            self.waiting_customers.statistics(now),
            self.idle_takers.statistics(now),
            self.pending_payment.statistics(now),
            self.takers_awaiting_prep.statistics(now),
            self.takers_in_prep.statistics(now),
            self.idle_preppers.statistics(now),
        ]
    }

    /// Check membership exclusivity, taker bindings, prepper accounting and
    /// customer conservation against the entity pool
    pub fn check_invariants(&self, pool: &EntityPool, now: SimTime) -> SimResult<()> {
        self.check_takers(pool, now)?;
        self.check_customers(pool, now)?;

        let busy_preppers = self.takers_in_prep.len();
        if self.idle_preppers.len() + busy_preppers != pool.preppers().len() {
            return Err(SimulationError::invariant(
                QueueName::IdlePreppers.as_str(),
                EntityRef::Network,
                now,
                format!(
                    "{} idle and {} cooking preppers do not add up to a pool of {}",
                    self.idle_preppers.len(),
                    busy_preppers,
                    pool.preppers().len()
                ),
            ));
        }

        let accounted = pool.customers_departed()
            + self.waiting_customers.len() as u64
            + pool.customers_in_service()
            + pool.customers_arriving();
        if accounted != pool.customers_created() {
            return Err(SimulationError::invariant(
                QueueName::WaitingCustomers.as_str(),
                EntityRef::Network,
                now,
                format!(
                    "{} customers created but {} accounted for",
                    pool.customers_created(),
                    accounted
                ),
            ));
        }
        Ok(())
    }

    fn check_takers(&self, pool: &EntityPool, now: SimTime) -> SimResult<()> {
        for agent in pool.takers() {
            let queues = [
                &self.idle_takers,
                &self.takers_awaiting_prep,
                &self.takers_in_prep,
            ];
            let mut member_of = queues.iter().filter(|queue| queue.contains(agent.id));
            let queue = member_of.next();
            if let Some(second) = member_of.next() {
                return Err(SimulationError::invariant(
                    second.name(),
                    agent.id,
                    now,
                    "is queued in more than one taker queue",
                ));
            }

            let idle = queue.map_or(false, |q| q.name() == self.idle_takers.name());
            match (idle, agent.served_customer) {
                (true, Some(customer)) => {
                    return Err(SimulationError::invariant(
                        self.idle_takers.name(),
                        agent.id,
                        now,
                        format!("is idle while serving {customer}"),
                    ))
                }
                (false, None) => {
                    return Err(SimulationError::invariant(
                        queue.map_or("TakerPool", |q| q.name()),
                        agent.id,
                        now,
                        "is busy without a served customer",
                    ))
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn check_customers(&self, pool: &EntityPool, now: SimTime) -> SimResult<()> {
        let served: HashSet<CustomerId> = pool
            .takers()
            .iter()
            .filter_map(|agent| agent.served_customer)
            .collect();

        for customer in self.waiting_customers.iter() {
            if self.pending_payment.contains(customer) || served.contains(&customer) {
                return Err(SimulationError::invariant(
                    self.waiting_customers.name(),
                    customer,
                    now,
                    "is waiting while already being served",
                ));
            }
        }
        for customer in self.pending_payment.iter() {
            if !served.contains(&customer) {
                return Err(SimulationError::invariant(
                    self.pending_payment.name(),
                    customer,
                    now,
                    "awaits payment without a taker",
                ));
            }
        }
        Ok(())
    }
}

impl Default for QueueNetwork {
    fn default() -> Self {
        Self::new()
    }
}
