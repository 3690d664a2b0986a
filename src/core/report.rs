use super::resource_queue::QueueStatistics;
use super::types::SimTime;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Final state of a run, handed to whatever renders reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub seed: u64,
    pub stop_time: SimTime,
    pub final_clock: SimTime,
    pub events_processed: u64,
    pub customers_created: u64,
    pub customers_departed: u64,
    pub customers_waiting: u64,
    pub customers_in_service: u64,
    pub queues: Vec<QueueStatistics>,
}

impl RunReport {
    pub fn queue(&self, name: &str) -> Option<&QueueStatistics> {
        self.queues.iter().find(|stats| stats.name == name)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run {} (seed {})", self.run_id, self.seed)?;
        writeln!(
            f,
            "  clock {:.2} of {:.2}, {} events",
            self.final_clock, self.stop_time, self.events_processed
        )?;
        writeln!(
            f,
            "  customers: {} created, {} departed, {} waiting, {} in service",
            self.customers_created,
            self.customers_departed,
            self.customers_waiting,
            self.customers_in_service
        )?;
        writeln!(
            f,
            "  {:<20} {:>6} {:>6} {:>8} {:>9} {:>6} {:>9} {:>9}",
            "queue", "len", "max", "obs", "avg.len", "zeros", "avg.wait", "max.wait"
        )?;
        for q in &self.queues {
            writeln!(
                f,
                "  {:<20} {:>6} {:>6} {:>8} {:>9.3} {:>6} {:>9.3} {:>9.3}",
                q.name,
                q.length,
                q.max_length,
                q.observations,
                q.average_length,
                q.zeros,
                q.average_wait,
                q.max_wait
            )?;
        }
        Ok(())
    }
}
