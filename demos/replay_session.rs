//! # Example: replay_session
//!
//! Records activations on one panel session and replays them on a second,
//! identically-registered session through the async replay queue.
//!
//! Demonstrates how to:
//! - Implement a [`TargetResolver`] and a [`Page`].
//! - Register plain, keyed and page-trigger handlers.
//! - Capture events with [`EventLog`] and ship them as JSON.
//! - Feed them to [`ReplayEngine::drain`] on another registry.
//!
//! ## Flow
//! ```text
//! session A: activate ──► Bus ──► EventLog ──► to_json_lines()
//!                                                  │
//! session B: Event::from_json ──► mpsc queue ──► ReplayEngine::drain ──► handlers
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example replay_session
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use panelbus::{
    Bus, Config, ControlRegistry, Event, EventLog, NodeHandle, Origin, OwnerId, Page, PageRef,
    Registration, ReplayEngine, Scope, Selector, TargetResolver,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

struct Cockpit;

impl TargetResolver for Cockpit {
    fn sub_target_count(&self) -> usize {
        2
    }

    fn find_target(&self, scope: Scope, name: &str) -> Option<NodeHandle> {
        let base = match scope {
            Scope::Surface(surface) => surface.0 as u64 * 10,
            Scope::Container => 100,
        };
        match name {
            "Throttle" => Some(NodeHandle(base + 1)),
            "Gear" => Some(NodeHandle(base + 2)),
            "MfdNext" => Some(NodeHandle(base + 3)),
            _ => None,
        }
    }
}

struct MfdPage {
    number: i32,
    shown: AtomicBool,
}

impl Page for MfdPage {
    fn page_number(&self) -> i32 {
        self.number
    }

    fn is_active(&self) -> bool {
        self.shown.load(Ordering::Relaxed)
    }
}

fn build_session(label: &'static str, owner: OwnerId, cfg: &Config) -> (ControlRegistry, Arc<EventLog>) {
    let bus = Bus::with_config(cfg);
    let log = Arc::new(EventLog::with_config(cfg));
    bus.subscribe(log.clone());
    let mut registry = ControlRegistry::with_config(bus, cfg);
    let origin = Origin::new(owner, 0);

    registry.bind(
        &Cockpit,
        origin,
        "Throttle",
        Registration::plain(move || println!("[{label}] throttle up")),
    );
    registry.bind(
        &Cockpit,
        origin,
        "Gear|1",
        Registration::keyed(
            2,
            move |id| println!("[{label}] gear {id} down"),
            move |id| println!("[{label}] gear {id} released"),
        ),
    );

    let show = Selector::new(move |page: &PageRef| {
        println!("[{label}] showing page {}", page.page_number());
    });
    for number in 0..3 {
        let page: PageRef = Arc::new(MfdPage {
            number,
            shown: AtomicBool::new(true),
        });
        registry.bind(&Cockpit, origin, "MfdNext", Registration::page_trigger(&show, page));
    }

    (registry, log)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = Config::default();
    let owner = OwnerId::random();

    // 1. Session A: press some buttons.
    let (mut a, log) = build_session("A", owner, &cfg);
    for key in [
        format!("{owner}-0-Throttle-clicked"),
        format!("{owner}-1-Gear-clicked-2"),
        format!("{owner}-0-MfdNext-monitor_page-0"),
        format!("{owner}-0-MfdNext-monitor_page-0"),
    ] {
        if let Some(id) = a.lookup_by_key(&key) {
            a.activate(id)?;
            a.release(id)?;
        }
    }
    let wire = log.to_json_lines()?;
    println!("captured {} events", log.len());

    // 2. Session B: same registrations, fed from the wire.
    let (mut b, _) = build_session("B", owner, &cfg);
    let (tx, rx) = cfg.replay_channel();
    for line in wire.lines() {
        tx.send(Event::from_json(line)?).await?;
    }
    drop(tx);

    let stats = ReplayEngine::new()
        .drain(&mut b, rx, CancellationToken::new())
        .await;
    println!("replayed={} failed={}", stats.replayed, stats.failed);
    Ok(())
}
