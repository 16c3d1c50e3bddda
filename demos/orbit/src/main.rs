//! Orbit demo — a minimal per-tick simulation.
//!
//! Three bodies carry `position` and `velocity` template components; one is
//! additionally `frozen`. A movement system advances the unfrozen bodies
//! every tick. Because position updates are value-only changes, the
//! movement filter's cache survives from tick to tick — only the initial
//! tick pays for a full scan.

use anyhow::Result;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use weft::{ComponentDefinition, Criteria, System, World};

const TICKS: u32 = 5;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("orbit=info".parse()?))
        .init();

    let mut world = World::new();
    world.add_component("position", ComponentDefinition::from(json!({"x": 0.0, "y": 0.0})));
    world.add_component("velocity", ComponentDefinition::from(json!({"dx": 0.0, "dy": 0.0})));
    world.add_component("frozen", ComponentDefinition::constant(true));

    let comet = world.spawn();
    world.set(comet, "position", json!({"x": 1.0}));
    world.set(comet, "velocity", json!({"dx": 0.5, "dy": 0.25}));

    let moon = world.spawn();
    world.set(moon, "position", json!({"y": 3.0}));
    world.set(moon, "velocity", json!({"dx": -0.25}));

    let relic = world.spawn();
    world.set(relic, "position", json!({"x": 9.0, "y": 9.0}));
    world.set(relic, "velocity", json!({"dx": 1.0}));
    world.set(relic, "frozen", json!(null));

    info!(entities = world.entities().len(), "world populated");

    let mut movement = System::new("movement", Criteria::components(["position", "velocity"]));

    for tick in 0..TICKS {
        // Read phase: collect the next positions.
        let mut updates = Vec::new();
        movement.run(&world, |entity| {
            if entity.has("frozen") {
                return;
            }
            let position = entity.get("position").expect("matched on position");
            let velocity = entity.get("velocity").expect("matched on velocity");
            let x = position["x"].as_f64().unwrap_or(0.0) + velocity["dx"].as_f64().unwrap_or(0.0);
            let y = position["y"].as_f64().unwrap_or(0.0) + velocity["dy"].as_f64().unwrap_or(0.0);
            updates.push((entity.id(), json!({"x": x, "y": y})));
        });

        // Write phase: value-only position changes, so the movement
        // filter's cache stays valid for the next tick.
        let moved = updates.len();
        for (entity, position) in updates {
            world.set(entity, "position", position);
        }

        let rescanned = movement
            .filter_mut()
            .refresh(world.entities(), world.components());
        info!(tick, moved, rescanned, "tick complete");
    }

    println!("{}", world.to_json()?);
    Ok(())
}
