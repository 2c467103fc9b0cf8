//! Demonstration of the Client Data Collector.
//!
//! This example shows how to:
//! 1. Load a host fixture
//! 2. Create a collector and subscribe to snapshots
//! 3. Attach an event binder and replay a recorded event script
//! 4. Inspect the interaction log and collection statistics
//!
//! Run with: cargo run --example replay_demo

use std::sync::Arc;

use client_data_collector::{
    Collector, Config, EventBinder, ReplayScript, StaticHost, Trigger, DATA_DECLARATION,
};

const HOST_FIXTURE: &str = include_str!("host.json");
const EVENT_SCRIPT: &str = include_str!("events.jsonl");

fn main() {
    println!("Client Data Collector - Replay Demo");
    println!("===================================");
    println!();
    println!("{DATA_DECLARATION}");
    println!();

    let host = match StaticHost::from_json(HOST_FIXTURE) {
        Ok(host) => Arc::new(host),
        Err(e) => {
            eprintln!("Error loading host fixture: {e}");
            std::process::exit(1);
        }
    };
    let script = match ReplayScript::parse(EVENT_SCRIPT) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Error parsing event script: {e}");
            std::process::exit(1);
        }
    };

    let config = Config::default();
    let settle = ReplayScript::settle_for(config.scroll_debounce);
    let collector = Arc::new(Collector::new(host.clone(), config));

    collector.on_update(|snapshot| {
        println!(
            "[{}] {:<16} title={:?} hidden={} params={:?}",
            snapshot.collected_at,
            snapshot.trigger.to_string(),
            snapshot.tab_details.identity.title,
            snapshot.tab_details.state.hidden,
            snapshot.url_details.query.params,
        );
    });

    let mut binder = match EventBinder::attach(collector.clone()) {
        Ok(binder) => binder,
        Err(e) => {
            eprintln!("Error attaching binder: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "Replaying {} events over {}ms...",
        script.len(),
        script.duration().as_millis()
    );
    println!();

    if let Err(e) = script.run(&host, &binder, settle) {
        eprintln!("Replay failed: {e}");
    }
    binder.detach();

    // A manual collection after the binder is gone still works.
    if let Ok(snapshot) = collector.collect(Trigger::Manual) {
        println!();
        println!(
            "Final snapshot at {}",
            snapshot.time_locale.time.now_iso
        );
    }

    println!();
    println!("Interaction log:");
    for record in collector.history() {
        println!(
            "  {} {:<7} {}",
            record.time,
            record.kind.to_string(),
            record.tag.as_deref().unwrap_or("-")
        );
    }

    println!();
    println!("{}", collector.transparency_log().summary());
}
