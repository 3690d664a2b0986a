use super::errors::{SimResult, SimulationError};
use super::execution::config::{DelayMode, ServiceTimes};
use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp};

/// The four random processes of the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Process {
    InterArrival,
    OrderTaking,
    Cooking,
    Paying,
}

impl Process {
    pub fn name(&self) -> &'static str {
        match self {
            Process::InterArrival => "InterArrivalTimeStream",
            Process::OrderTaking => "OrderTakingTimeStream",
            Process::Cooking => "CookingTimeStream",
            Process::Paying => "PayingTimeStream",
        }
    }
}

/// One independently seeded stream of exponential durations
#[derive(Debug, Clone)]
struct DurationStream {
    process: Process,
    mean: f64,
    distribution: Exp<f64>,
    rng: StdRng,
    samples: u64,
}

impl DurationStream {
    fn new(process: Process, mean: f64, seed: u64) -> SimResult<Self> {
        let distribution = Exp::new(1.0 / mean).map_err(|e| {
            SimulationError::configuration(process.name(), format!("invalid mean {mean}: {e}"))
        })?;
        Ok(Self {
            process,
            mean,
            distribution,
            rng: StdRng::seed_from_u64(seed),
            samples: 0,
        })
    }

    fn sample(&mut self, mode: DelayMode) -> f64 {
        self.samples += 1;
        let value = match mode {
            DelayMode::Fixed => self.mean,
            DelayMode::Exponential => loop {
                let value = self.distribution.sample(&mut self.rng);
                if value >= 0.0 && value.is_finite() {
                    break value;
                }
            },
        };
        trace!("{} sample #{}: {:.4}", self.process.name(), self.samples, value);
        value
    }
}

/// Source of the random durations that drive the model.
///
/// A master generator seeded with the run seed hands out one seed per
/// stream, so every stream is reproducible and drawing from one never
/// shifts another.
#[derive(Debug, Clone)]
pub struct VariateSource {
    mode: DelayMode,
    inter_arrival: DurationStream,
    order_taking: DurationStream,
    cooking: DurationStream,
    paying: DurationStream,
}

impl VariateSource {
    pub fn new(seed: u64, means: &ServiceTimes, mode: DelayMode) -> SimResult<Self> {
        let mut seeds = StdRng::seed_from_u64(seed);
        Ok(Self {
            mode,
            inter_arrival: DurationStream::new(Process::InterArrival, means.inter_arrival, seeds.gen())?,
            order_taking: DurationStream::new(Process::OrderTaking, means.order_taking, seeds.gen())?,
            cooking: DurationStream::new(Process::Cooking, means.cooking, seeds.gen())?,
            paying: DurationStream::new(Process::Paying, means.paying, seeds.gen())?,
        })
    }

    pub fn inter_arrival(&mut self) -> f64 {
        self.inter_arrival.sample(self.mode)
    }

    pub fn order_taking(&mut self) -> f64 {
        self.order_taking.sample(self.mode)
    }

    pub fn cooking(&mut self) -> f64 {
        self.cooking.sample(self.mode)
    }

    pub fn paying(&mut self) -> f64 {
        self.paying.sample(self.mode)
    }

    pub fn sample(&mut self, process: Process) -> f64 {
        match process {
            Process::InterArrival => self.inter_arrival(),
            Process::OrderTaking => self.order_taking(),
            Process::Cooking => self.cooking(),
            Process::Paying => self.paying(),
        }
    }

    /// Number of samples drawn so far from a stream
    pub fn samples_drawn(&self, process: Process) -> u64 {
        match process {
            Process::InterArrival => self.inter_arrival.samples,
            Process::OrderTaking => self.order_taking.samples,
            Process::Cooking => self.cooking.samples,
            Process::Paying => self.paying.samples,
        }
    }
}
