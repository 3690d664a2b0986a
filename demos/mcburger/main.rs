use mcburger_sim::{run_replications, LogObserver, Simulation, SimulationConfig};
use std::env;
use std::fs;

/// Usage: mcburger [CONFIG.json] [REPLICATIONS]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let mut args = env::args().skip(1);
    let config = match args.next() {
        Some(path) => SimulationConfig::from_json(&fs::read_to_string(path)?)?,
        None => SimulationConfig::default(),
    };
    let replications: u64 = match args.next() {
        Some(n) => n.parse()?,
        None => 0,
    };

    println!("McBurger service simulation");
    println!("  seed {}, stop time {}", config.seed, config.stop_time);
    println!(
        "  {} order takers, {} food preppers",
        config.num_takers, config.num_preppers
    );
    println!(
        "  means: inter-arrival {}, order taking {}, cooking {}, paying {} ({:?})",
        config.service_times.inter_arrival,
        config.service_times.order_taking,
        config.service_times.cooking,
        config.service_times.paying,
        config.delay_mode
    );
    println!();

    let mut sim = Simulation::configure(config.clone())?;
    sim.add_observer(Box::new(LogObserver));
    sim.initialize()?;
    let report = sim.run()?;

    println!("{report}");
    println!("{}", serde_json::to_string_pretty(&report)?);

    if replications > 0 {
        let seeds: Vec<u64> = (1..=replications).map(|n| config.seed.wrapping_add(n)).collect();
        let reports = run_replications(&config, &seeds)?;
        println!("\n{} replications ({:?})", reports.len(), config.concurrency_mode);
        for r in &reports {
            let waiting = r
                .queue("WaitingCustomers")
                .map(|q| q.average_wait)
                .unwrap_or_default();
            println!(
                "  seed {:>10}: {:>4} served, avg wait in line {:.3}",
                r.seed, r.customers_departed, waiting
            );
        }
    }

    Ok(())
}
