//! Transition rules of the service network.
//!
//! Each handler runs to completion against the shared context: it moves
//! entities between queues and schedules the follow-up events. A taker stays
//! busy from the moment it picks up a customer until that customer's payment
//! ends, so taker capacity limits the whole pipeline.

use super::context::SimulationContext;
use super::errors::SimResult;
use super::event::SimEvent;
use super::types::{CustomerId, Entity, PrepperId, TakerId};
use log::debug;

/// Execute the handler for `event`. Returns the entities the handler
/// touched beyond those named in the event.
pub fn dispatch(ctx: &mut SimulationContext, event: SimEvent) -> SimResult<Vec<Entity>> {
    match event {
        SimEvent::Generate => generate(ctx),
        SimEvent::Arrive(customer) => arrive(ctx, customer),
        SimEvent::OrderTaken(taker) => order_taken(ctx, taker),
        SimEvent::OrderCooked { prepper, taker } => order_cooked(ctx, prepper, taker),
        SimEvent::PaymentEnd(taker) => payment_end(ctx, taker),
    }
}

/// Create a customer, let it arrive now, and re-arm the generator
fn generate(ctx: &mut SimulationContext) -> SimResult<Vec<Entity>> {
    let customer = ctx.pool.create_customer();
    ctx.scheduler.schedule_event(SimEvent::Arrive(customer), 0.0)?;

    let delay = ctx.variates.inter_arrival();
    let next = ctx.scheduler.schedule_event(SimEvent::Generate, delay)?;
    debug!("{} generated, next customer due at {:.4}", customer, next);

    Ok(vec![customer.into()])
}

/// The customer joins the line; an idle taker, if any, starts on its order
fn arrive(ctx: &mut SimulationContext, customer: CustomerId) -> SimResult<Vec<Entity>> {
    let now = ctx.now();
    ctx.pool.mark_arrived(customer, now)?;
    ctx.network.waiting_customers.insert(customer, now)?;
    debug!(
        "{} arrives. WaitingCustomers length: {}",
        customer,
        ctx.network.waiting_customers.len()
    );

    let Some(taker) = ctx.network.idle_takers.first() else {
        return Ok(Vec::new());
    };
    ctx.network.idle_takers.remove(taker, now)?;
    ctx.network.waiting_customers.remove(customer, now)?;
    start_order(ctx, taker, customer)?;

    Ok(vec![taker.into()])
}

/// The order goes to the kitchen; the customer now waits to pay
fn order_taken(ctx: &mut SimulationContext, taker: TakerId) -> SimResult<Vec<Entity>> {
    let now = ctx.now();
    let customer = ctx.pool.served_customer(taker, now)?;
    ctx.network.pending_payment.insert(customer, now)?;
    debug!("order of {} taken by {}", customer, taker);

    let mut touched: Vec<Entity> = vec![customer.into()];
    match ctx.network.idle_preppers.first() {
        Some(prepper) => {
            ctx.network.idle_preppers.remove(prepper, now)?;
            start_cooking(ctx, prepper, taker)?;
            touched.push(prepper.into());
        }
        None => {
            ctx.network.takers_awaiting_prep.insert(taker, now)?;
            debug!(
                "no prepper free, {} waits. TakersAwaitingPrep length: {}",
                taker,
                ctx.network.takers_awaiting_prep.len()
            );
        }
    }
    Ok(touched)
}

/// The order is ready: payment starts, and the prepper either picks up the
/// next waiting order straight away or goes idle
fn order_cooked(
    ctx: &mut SimulationContext,
    prepper: PrepperId,
    taker: TakerId,
) -> SimResult<Vec<Entity>> {
    let now = ctx.now();
    ctx.network.takers_in_prep.remove(taker, now)?;
    let customer = ctx.pool.served_customer(taker, now)?;
    ctx.network.pending_payment.remove(customer, now)?;
    debug!("order of {} taken by {} cooked by {}", customer, taker, prepper);

    let delay = ctx.variates.paying();
    ctx.scheduler.schedule_event(SimEvent::PaymentEnd(taker), delay)?;

    let mut touched: Vec<Entity> = vec![customer.into()];
    match ctx.network.takers_awaiting_prep.first() {
        Some(next) => {
            ctx.network.takers_awaiting_prep.remove(next, now)?;
            start_cooking(ctx, prepper, next)?;
            touched.push(next.into());
        }
        None => {
            ctx.network.idle_preppers.insert(prepper, now)?;
        }
    }
    Ok(touched)
}

/// The customer leaves; the taker serves the next customer in line or idles
fn payment_end(ctx: &mut SimulationContext, taker: TakerId) -> SimResult<Vec<Entity>> {
    let now = ctx.now();
    let customer = ctx.pool.depart(taker, now)?;
    debug!("payment ended: {} leaves", customer);

    ctx.network.idle_takers.insert(taker, now)?;

    let mut touched: Vec<Entity> = vec![customer.into()];
    if let Some(next) = ctx.network.waiting_customers.first() {
        ctx.network.waiting_customers.remove(next, now)?;
        ctx.network.idle_takers.remove(taker, now)?;
        start_order(ctx, taker, next)?;
        touched.push(next.into());
    }
    Ok(touched)
}

fn start_order(ctx: &mut SimulationContext, taker: TakerId, customer: CustomerId) -> SimResult<()> {
    let now = ctx.now();
    ctx.pool.bind(taker, customer, now)?;
    let delay = ctx.variates.order_taking();
    let due = ctx.scheduler.schedule_event(SimEvent::OrderTaken(taker), delay)?;
    debug!("{} takes the order of {}, done at {:.4}", taker, customer, due);
    Ok(())
}

fn start_cooking(ctx: &mut SimulationContext, prepper: PrepperId, taker: TakerId) -> SimResult<()> {
    let now = ctx.now();
    ctx.network.takers_in_prep.insert(taker, now)?;
    let delay = ctx.variates.cooking();
    let due = ctx
        .scheduler
        .schedule_event(SimEvent::OrderCooked { prepper, taker }, delay)?;
    debug!("{} cooks the order held by {}, done at {:.4}", prepper, taker, due);
    Ok(())
}
