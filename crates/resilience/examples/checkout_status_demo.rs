//! Checkout Status Polling Demonstration
//!
//! Polls a simulated checkout intent that walks through a few states, once
//! with a fixed interval and once with exponential backoff, printing every
//! lifecycle event through a hook.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rye_resilience::{PollConfig, PollEvent, PollHook, Poller, TerminalStates};
use serde_json::{Value, json};

struct SimulatedCheckout {
    states: &'static [&'static str],
    calls: AtomicUsize,
}

impl SimulatedCheckout {
    const fn new(states: &'static [&'static str]) -> Self {
        Self {
            states,
            calls: AtomicUsize::new(0),
        }
    }

    async fn fetch(&self) -> Result<Value, std::io::Error> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let state = self.states[call.min(self.states.len() - 1)];
        Ok(json!({ "id": "ci_demo", "state": state }))
    }
}

struct PrintHook {
    started: Instant,
}

impl PollHook for PrintHook {
    fn on_event(&self, event: &PollEvent) {
        println!("    [{:>6.2?}] {event}", self.started.elapsed());
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let terminal = TerminalStates::new("state", ["awaiting_confirmation", "completed", "failed"]);

    println!("Fixed interval, terminal on attempt 3:");
    let checkout = SimulatedCheckout::new(&["retrieving_offer", "retrieving_offer", "awaiting_confirmation"]);
    let result = Poller::new(PollConfig::fixed(5, Duration::from_millis(200)))?
        .with_hook(Arc::new(PrintHook {
            started: Instant::now(),
        }))
        .run(|| checkout.fetch(), &terminal)
        .await?;
    println!(
        "    => {} after {} attempt(s), terminal = {}\n",
        result.value["state"], result.attempts_used, result.terminal
    );

    println!("Exponential backoff, attempts run out:");
    let checkout = SimulatedCheckout::new(&["retrieving_offer"]);
    let result = Poller::new(PollConfig::exponential(
        5,
        Duration::from_millis(50),
        Duration::from_millis(300),
    ))?
    .with_hook(Arc::new(PrintHook {
        started: Instant::now(),
    }))
    .run(|| checkout.fetch(), &terminal)
    .await?;
    println!(
        "    => {} after {} attempt(s), terminal = {}",
        result.value["state"], result.attempts_used, result.terminal
    );

    Ok(())
}
