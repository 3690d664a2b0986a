use super::event::EventRecord;
use super::queue_network::{QueueName, QueueNetwork};
use super::report::RunReport;
use log::info;

/// Observer trait for simulation events.
///
/// Observers get read-only views; they cannot change the run.
pub trait SimulationObserver {
    /// Called after each event handler has completed
    fn on_event(&mut self, record: &EventRecord, network: &QueueNetwork);

    /// Called once when `run` returns
    fn on_finish(&mut self, _report: &RunReport) {}
}

/// Writes every event and the resulting queue lengths to the log
#[derive(Debug, Default)]
pub struct LogObserver;

impl SimulationObserver for LogObserver {
    fn on_event(&mut self, record: &EventRecord, network: &QueueNetwork) {
        let lengths = QueueName::ALL
            .iter()
            .map(|queue| format!("{}={}", queue, network.len(*queue)))
            .collect::<Vec<_>>()
            .join(" ");
        info!("{} | {}", record, lengths);
    }

    fn on_finish(&mut self, report: &RunReport) {
        info!(
            "run {} finished at {:.4}: {} events, {} customers served",
            report.run_id, report.final_clock, report.events_processed, report.customers_departed
        );
    }
}
