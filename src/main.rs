//! Skirmish Demo
//!
//! Runs a scripted arena headless and logs what happens.
//!
//! Usage: `skirmish-demo [config.json]`. `RUST_LOG` controls verbosity.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Vec3;
use tracing::info;
use tracing_subscriber::EnvFilter;

use skirmish::{
    core::terrain::HeightFn,
    game::{
        actor::Loadout,
        weapon::Firearm,
    },
    Actor, ActorId, GameEventData, InputFrame, SimConfig, World, TICK_DT, TICK_RATE, VERSION,
};

/// Demo length in seconds
const DEMO_SECONDS: u32 = 20;

fn main() -> Result<()> {
    init_tracing();

    info!("Skirmish Core v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            SimConfig::from_json_str(&raw).with_context(|| format!("parsing {path}"))?
        }
        None => SimConfig::default(),
    };

    demo_arena(config)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Scripted scene: the player shoots down a line of NPCs, grabs ammo,
/// then drives the car into a wall.
fn demo_arena(config: SimConfig) -> Result<()> {
    info!("=== Starting Demo Arena ===");

    let gravity = config.physics.gravity;
    let terrain = HeightFn(|x: f32, z: f32| 0.5 * (x * 0.05).sin() * (z * 0.05).cos());
    let mut world = World::builder()
        .config(config)
        .terrain(Arc::new(terrain))
        .build()
        .context("building world")?;

    let player = world.spawn(Actor::player(
        Vec3::new(0.0, 2.0, 0.0),
        gravity,
        Loadout::new(Box::new(Firearm::pistol()), Some(Box::new(Firearm::knife()))),
    ))?;
    for i in 0..3 {
        let x = (i as f32 - 1.0) * 0.6;
        world.spawn(Actor::npc(Vec3::new(x, 2.0, -8.0 - 2.0 * i as f32), gravity).with_health(20))?;
    }
    world.spawn(Actor::ammo(Vec3::new(4.0, 0.0, 0.0)))?;
    let car = world.spawn(Actor::car(
        Vec3::new(4.0, 0.0, 4.0),
        Some(Box::new(Firearm::submachine_gun())),
    ))?;
    world.spawn(Actor::structure(Vec3::new(4.0, 0.0, -20.0), Vec3::new(3.0, 2.0, 0.5)))?;

    let mut total_events = 0;
    let mut last_report_tick = 0;

    for t in 0..DEMO_SECONDS * TICK_RATE {
        let frame = scripted_input(&mut world, player, t);
        let inputs = BTreeMap::from([(player, frame)]);

        let result = world.tick(&inputs, TICK_DT);
        total_events += result.events.len();

        // Report every 5 seconds
        if t - last_report_tick >= 5 * TICK_RATE {
            if let Some(hud) = world.hud(player) {
                info!(
                    tick = world.tick_count(),
                    enemies = hud.enemy_count,
                    health = hud.health,
                    riding = hud.riding.is_some(),
                    "status"
                );
            }
            last_report_tick = t;
        }

        for event in &result.events {
            match &event.data {
                GameEventData::ActorDowned { id, category } => {
                    info!(tick = event.tick, actor = ?id, ?category, "actor downed");
                }
                GameEventData::AmmoCollected { total_rounds, .. } => {
                    info!(tick = event.tick, total_rounds, "ammo collected");
                }
                GameEventData::VehicleMounted { vehicle, .. } if *vehicle == car => {
                    info!(tick = event.tick, "player took the car");
                }
                _ => {}
            }
        }
    }

    info!("=== Demo Results ===");
    if let Some(hud) = world.hud(player) {
        info!("Wave cleared: {}", hud.wave_cleared);
        if let Some(weapon) = hud.weapon {
            info!(
                "{}: {}/{} in magazine, {}/{} spare",
                weapon.name, weapon.mag_rounds, weapon.max_mag_rounds, weapon.total_rounds, weapon.max_total_rounds
            );
        }
    }
    world.render(|view| {
        info!(
            actor = ?view.id,
            category = ?view.category,
            x = view.position.x,
            y = view.position.y,
            z = view.position.z,
            tilt = view.tilt,
            health = view.health,
            "final"
        );
    });
    info!("Total events: {}", total_events);

    Ok(())
}

/// Input for tick `t` of the script.
///
/// 0-4 s: stand and shoot. 4-7 s: walk to the ammo. 7-9 s: walk to the car.
/// 9 s: mount. 9-20 s: drive north.
fn scripted_input(world: &mut World, player: ActorId, t: u32) -> InputFrame {
    let seconds = t / TICK_RATE;
    let frame_in_second = t % TICK_RATE;
    match seconds {
        0..=3 => {
            world.set_facing(player, Vec3::NEG_Z);
            if frame_in_second % 15 == 0 {
                InputFrame::new().with_flags(InputFrame::FLAG_FIRE_PRESSED)
            } else {
                InputFrame::new()
            }
        }
        4..=6 => {
            world.set_facing(player, Vec3::X);
            InputFrame::with_movement(0, 1).with_flags(InputFrame::FLAG_SPRINT)
        }
        7..=8 => {
            world.set_facing(player, Vec3::Z);
            InputFrame::with_movement(0, 1)
        }
        9 if frame_in_second == 0 => InputFrame::new().with_flags(InputFrame::FLAG_INTERACT),
        _ => InputFrame::with_movement(0, 1).with_steer(if seconds % 4 == 0 { 1 } else { 0 }),
    }
}
