use super::errors::{SimResult, SimulationError};
use super::types::{CustomerId, PrepperId, SimTime, TakerId};

const TAKER_POOL: &str = "TakerPool";

/// Resource that takes a customer's order and later collects the payment
#[derive(Debug, Clone, PartialEq)]
pub struct TakerAgent {
    pub id: TakerId,
    /// Customer this taker is serving, from order-taking until payment ends
    pub served_customer: Option<CustomerId>,
}

/// Resource that cooks orders
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrepAgent {
    pub id: PrepperId,
}

/// Owns every entity of a run: the fixed agent pools and the customer
/// counters. Agents are created once and recirculate through the queues;
/// customers are numbered as they are generated and forgotten once they
/// depart.
#[derive(Debug, Clone)]
pub struct EntityPool {
    takers: Vec<TakerAgent>,
    preppers: Vec<PrepAgent>,
    customers_created: u64,
    customers_departed: u64,
    /// Customers created whose arrival event has not fired yet
    customers_arriving: u64,
}

impl EntityPool {
    pub fn new(num_takers: u32, num_preppers: u32) -> Self {
        Self {
            takers: (0..num_takers)
                .map(|n| TakerAgent {
                    id: TakerId(n),
                    served_customer: None,
                })
                .collect(),
            preppers: (0..num_preppers)
                .map(|n| PrepAgent { id: PrepperId(n) })
                .collect(),
            customers_created: 0,
            customers_departed: 0,
            customers_arriving: 0,
        }
    }

    pub fn takers(&self) -> &[TakerAgent] {
        &self.takers
    }

    pub fn preppers(&self) -> &[PrepAgent] {
        &self.preppers
    }

    pub fn taker(&self, id: TakerId) -> Option<&TakerAgent> {
        self.takers.get(id.0 as usize)
    }

    /// Create the next customer. It counts as arriving until `mark_arrived`.
    pub fn create_customer(&mut self) -> CustomerId {
        self.customers_created += 1;
        self.customers_arriving += 1;
        CustomerId(self.customers_created)
    }

    pub fn mark_arrived(&mut self, customer: CustomerId, now: SimTime) -> SimResult<()> {
        if self.customers_arriving == 0 {
            return Err(SimulationError::invariant(
                "ArrivingCustomers",
                customer,
                now,
                "arrived without being generated",
            ));
        }
        self.customers_arriving -= 1;
        Ok(())
    }

    /// Attach `customer` to an idle taker
    pub fn bind(&mut self, taker: TakerId, customer: CustomerId, now: SimTime) -> SimResult<()> {
        let agent = self.taker_mut(taker, now)?;
        if let Some(current) = agent.served_customer {
            return Err(SimulationError::invariant(
                TAKER_POOL,
                taker,
                now,
                format!("is still serving {current}"),
            ));
        }
        agent.served_customer = Some(customer);
        Ok(())
    }

    /// Customer the taker is currently serving
    pub fn served_customer(&self, taker: TakerId, now: SimTime) -> SimResult<CustomerId> {
        self.taker(taker)
            .and_then(|agent| agent.served_customer)
            .ok_or_else(|| {
                SimulationError::invariant(TAKER_POOL, taker, now, "has no served customer")
            })
    }

    /// Detach the served customer from the taker and count it as departed
    pub fn depart(&mut self, taker: TakerId, now: SimTime) -> SimResult<CustomerId> {
        let customer = self.taker_mut(taker, now)?.served_customer.take().ok_or_else(|| {
            SimulationError::invariant(TAKER_POOL, taker, now, "has no served customer")
        })?;
        self.customers_departed += 1;
        Ok(customer)
    }

    pub fn customers_created(&self) -> u64 {
        self.customers_created
    }

    pub fn customers_departed(&self) -> u64 {
        self.customers_departed
    }

    pub fn customers_arriving(&self) -> u64 {
        self.customers_arriving
    }

    /// Customers currently attached to a taker
    pub fn customers_in_service(&self) -> u64 {
        self.takers
            .iter()
            .filter(|agent| agent.served_customer.is_some())
            .count() as u64
    }

    fn taker_mut(&mut self, id: TakerId, now: SimTime) -> SimResult<&mut TakerAgent> {
        self.takers
            .get_mut(id.0 as usize)
            .ok_or_else(|| SimulationError::invariant(TAKER_POOL, id, now, "is not in the pool"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pools_are_populated() {
        let pool = EntityPool::new(2, 3);
        assert_eq!(pool.takers().len(), 2);
        assert_eq!(pool.preppers().len(), 3);
        assert!(pool.takers().iter().all(|t| t.served_customer.is_none()));
        assert_eq!(pool.preppers()[2].id, PrepperId(2));
    }

    #[test]
    fn test_customer_numbering_and_arrival() {
        let mut pool = EntityPool::new(1, 1);
        let first = pool.create_customer();
        let second = pool.create_customer();
        assert_eq!(first, CustomerId(1));
        assert_eq!(second, CustomerId(2));
        assert_eq!(pool.customers_arriving(), 2);

        pool.mark_arrived(first, 0.0).unwrap();
        assert_eq!(pool.customers_arriving(), 1);
    }

    #[test]
    fn test_bind_and_depart() {
        let mut pool = EntityPool::new(1, 1);
        let customer = pool.create_customer();
        pool.bind(TakerId(0), customer, 0.0).unwrap();
        assert_eq!(pool.served_customer(TakerId(0), 0.0).unwrap(), customer);
        assert_eq!(pool.customers_in_service(), 1);

        // a bound taker cannot take a second customer
        let other = pool.create_customer();
        assert!(pool.bind(TakerId(0), other, 1.0).unwrap_err().is_invariant_violation());

        assert_eq!(pool.depart(TakerId(0), 2.0).unwrap(), customer);
        assert_eq!(pool.customers_departed(), 1);
        assert!(pool.served_customer(TakerId(0), 2.0).is_err());
        assert!(pool.depart(TakerId(0), 2.0).is_err());
    }

    #[test]
    fn test_unknown_taker() {
        let mut pool = EntityPool::new(1, 1);
        let customer = pool.create_customer();
        assert!(pool.bind(TakerId(5), customer, 0.0).is_err());
    }
}
