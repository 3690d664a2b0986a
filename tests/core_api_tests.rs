use mcburger_sim::core::variates::VariateSource;
use mcburger_sim::{
    DelayMode, Entity, EventKind, EventRecord, PrepperId, QueueName, ServiceTimes, SimEvent,
    Simulation, SimulationConfig, SimulationError, TakerId,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn started(config: SimulationConfig) -> Simulation {
    let mut sim = Simulation::configure(config).unwrap();
    sim.initialize().unwrap();
    sim
}

/// Step until an event of `kind` has fired, returning its record
fn step_until(sim: &mut Simulation, kind: EventKind) -> EventRecord {
    loop {
        let record = sim.step().unwrap().expect("ran out of events");
        if record.kind == kind {
            return record;
        }
    }
}

fn fixed(inter_arrival: f64, order_taking: f64, cooking: f64, paying: f64) -> SimulationConfig {
    SimulationConfig::default()
        .with_delay_mode(DelayMode::Fixed)
        .with_service_times(ServiceTimes {
            inter_arrival,
            order_taking,
            cooking,
            paying,
        })
}

#[test]
fn test_idle_system_first_arrival() {
    let config = SimulationConfig::default().with_seed(2024).with_pool_sizes(2, 3);
    let mut expected = VariateSource::new(2024, &config.service_times, config.delay_mode).unwrap();
    let order_taking = expected.order_taking();

    let mut sim = started(config);
    let arrive = step_until(&mut sim, EventKind::Arrive);

    assert_eq!(arrive.time, 0.0);
    assert_eq!(sim.queue_len(QueueName::IdleTakers), 1);
    assert_eq!(sim.queue_len(QueueName::WaitingCustomers), 0);
    assert_eq!(sim.queue_len(QueueName::IdlePreppers), 3);
    assert!(sim
        .pending_events()
        .contains(&(order_taking, SimEvent::OrderTaken(TakerId(0)))));
}

#[test]
fn test_prepper_backlog_has_no_idle_gap() {
    let config = fixed(1.0, 1.0, 10.0, 1.0).with_pool_sizes(2, 1);
    let mut sim = started(config);

    // both orders are taken long before the first one is cooked
    while sim.network().takers_awaiting_prep.is_empty() {
        sim.step().unwrap();
    }
    assert_eq!(sim.network().takers_awaiting_prep.first(), Some(TakerId(1)));
    assert_eq!(sim.network().takers_in_prep.first(), Some(TakerId(0)));

    let cooked = step_until(&mut sim, EventKind::OrderCooked);
    assert_eq!(cooked.time, 11.0);
    assert_eq!(
        &cooked.entities[..2],
        &[Entity::Prepper(PrepperId(0)), Entity::Taker(TakerId(0))]
    );

    assert!(sim.network().takers_awaiting_prep.is_empty());
    assert!(sim.network().idle_preppers.is_empty());
    assert_eq!(sim.network().takers_in_prep.first(), Some(TakerId(1)));
    let pending = sim.pending_events();
    assert!(pending.contains(&(12.0, SimEvent::PaymentEnd(TakerId(0)))));
    assert!(pending.contains(&(
        21.0,
        SimEvent::OrderCooked {
            prepper: PrepperId(0),
            taker: TakerId(1)
        }
    )));
}

#[test]
fn test_taker_busy_until_payment_ends() {
    let config = fixed(20.0, 1.0, 5.0, 2.0).with_pool_sizes(1, 1);
    let mut sim = started(config);

    let cooked = step_until(&mut sim, EventKind::OrderCooked);
    assert_eq!(cooked.time, 6.0);
    assert!(sim.network().idle_takers.is_empty());
    assert!(sim.pool().taker(TakerId(0)).unwrap().served_customer.is_some());

    let paid = step_until(&mut sim, EventKind::PaymentEnd);
    assert_eq!(paid.time, 8.0);
    assert_eq!(sim.network().idle_takers.first(), Some(TakerId(0)));
    assert!(sim.pool().taker(TakerId(0)).unwrap().served_customer.is_none());
}

#[test]
fn test_takers_only_go_idle_on_their_payment_end() {
    let config = SimulationConfig::default()
        .with_seed(99)
        .with_pool_sizes(3, 1)
        .with_stop_time(600.0);
    let mut sim = started(config);

    let mut idle: HashSet<TakerId> = sim.network().idle_takers.iter().collect();
    while let Some(record) = sim.step().unwrap() {
        let now_idle: HashSet<TakerId> = sim.network().idle_takers.iter().collect();
        for taker in now_idle.difference(&idle) {
            assert_eq!(record.kind, EventKind::PaymentEnd, "{record}");
            assert_eq!(record.entities[0], Entity::Taker(*taker));
        }
        idle = now_idle;
    }
}

#[test]
fn test_duplicate_insert_halts_run() {
    let config = fixed(20.0, 1.0, 5.0, 2.0).with_pool_sizes(1, 1);
    let mut sim = started(config);
    step_until(&mut sim, EventKind::OrderTaken);

    // a second order-taken for the same customer inserts it into
    // PendingPayment twice
    sim.schedule(SimEvent::OrderTaken(TakerId(0)), 0.0).unwrap();
    let err = sim.run().unwrap_err();

    match &err {
        SimulationError::InvariantViolation {
            queue,
            entity,
            clock,
            ..
        } => {
            assert_eq!(*queue, "PendingPayment");
            assert_eq!(entity.to_string(), "Customer#1");
            assert_eq!(*clock, 1.0);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(sim.step().unwrap_err(), err);
}

#[test]
fn test_same_seed_same_trace() {
    let config = SimulationConfig::default()
        .with_seed(728873)
        .with_stop_time(300.0)
        .with_trace(true);

    let mut a = started(config.clone());
    let mut b = started(config);
    a.run().unwrap();
    b.run().unwrap();

    assert!(!a.trace().is_empty());
    assert_eq!(a.trace(), b.trace());
}

#[test]
fn test_different_seed_different_trace() {
    let config = SimulationConfig::default().with_stop_time(300.0).with_trace(true);
    let mut a = started(config.clone().with_seed(1));
    let mut b = started(config.with_seed(2));
    a.run().unwrap();
    b.run().unwrap();

    assert_ne!(a.trace(), b.trace());
}

#[test]
fn test_customers_served_in_arrival_order() {
    // one taker and a busy line so customers queue up
    let config = SimulationConfig::default()
        .with_seed(5)
        .with_pool_sizes(1, 2)
        .with_stop_time(900.0)
        .with_trace(true);
    let mut sim = started(config);
    sim.run().unwrap();

    // a customer starts service on its own arrival (taker touched) or when a
    // payment end hands the taker the head of the line
    let started_service: Vec<Entity> = sim
        .trace()
        .iter()
        .filter_map(|record| match record.kind {
            EventKind::Arrive if record.entities.len() == 2 => Some(record.entities[0]),
            EventKind::PaymentEnd if record.entities.len() == 3 => Some(record.entities[2]),
            _ => None,
        })
        .collect();

    assert!(started_service.len() > 10);
    let numbers: Vec<u64> = started_service.iter().map(|e| e.number()).collect();
    let mut sorted = numbers.clone();
    sorted.sort_unstable();
    assert_eq!(numbers, sorted);
    assert_eq!(numbers[0], 1);
}

#[test]
fn test_report_serializes() {
    let mut sim = started(SimulationConfig::default().with_stop_time(100.0));
    let report = sim.run().unwrap();
    let json = serde_json::to_string(&report).unwrap();

    for queue in QueueName::ALL {
        assert!(json.contains(queue.as_str()));
        assert!(report.queue(queue.as_str()).is_some());
    }
    assert!(json.contains(&report.run_id.to_string()));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_network_invariants_hold(
        seed in any::<u64>(),
        takers in 1u32..5,
        preppers in 1u32..5,
        stop_time in 20.0f64..400.0,
    ) {
        let config = SimulationConfig::default()
            .with_seed(seed)
            .with_pool_sizes(takers, preppers)
            .with_stop_time(stop_time)
            .with_invariant_checks(true);
        let mut sim = started(config);
        let report = sim.run().unwrap();

        prop_assert_eq!(
            report.customers_created,
            report.customers_departed + report.customers_waiting + report.customers_in_service
        );
        prop_assert_eq!(
            sim.queue_len(QueueName::IdlePreppers) + sim.queue_len(QueueName::TakersInPrep),
            preppers as usize
        );
        prop_assert!(report.customers_in_service <= takers as u64);
        prop_assert!(sim.check_invariants().is_ok());
    }

    #[test]
    fn prop_no_entity_in_two_queues(seed in any::<u64>(), takers in 1u32..4) {
        let config = SimulationConfig::default()
            .with_seed(seed)
            .with_pool_sizes(takers, 1)
            .with_stop_time(200.0);
        let mut sim = started(config);

        while sim.step().unwrap().is_some() {
            let network = sim.network();
            let mut seen_takers = HashSet::new();
            for taker in network
                .idle_takers
                .iter()
                .chain(network.takers_awaiting_prep.iter())
                .chain(network.takers_in_prep.iter())
            {
                prop_assert!(seen_takers.insert(taker));
            }
            for customer in network.waiting_customers.iter() {
                prop_assert!(!network.pending_payment.contains(customer));
            }
        }
    }
}
