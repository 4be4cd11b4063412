//! Stride - Headless host for the VR rig locomotion core
//!
//! Usage: `stride [settings.toml] [replay.json]`, or `stride --init` to write
//! the default settings to the config directory.
//!
//! Builds a small collision world, spawns one rig, and drives it with either
//! a recorded replay or the built-in script on a fixed timestep.

mod replay;
mod settings;

use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;
use stride_core::{GameTime, Transform};
use stride_locomotion::LocomotionRig;
use stride_physics::{CharacterController, PhysicsMover, PhysicsWorld};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::replay::Replay;
use crate::settings::StrideSettings;

/// Totals gathered over a run
#[derive(Debug, Default)]
struct RunSummary {
    ticks: u32,
    snaps: u32,
    sprint_ticks: u32,
    airborne_ticks: u32,
    footsteps: u32,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("--init") {
        return StrideSettings::default().save();
    }

    let settings = StrideSettings::load(args.first().map(Path::new))?;
    let replay = match args.get(1) {
        Some(path) => Replay::load(Path::new(path))?,
        None => Replay::builtin(1.0 / settings.time.fixed_timestep),
    };

    if replay.is_empty() {
        warn!("Replay has no frames, nothing to simulate");
        return Ok(());
    }
    debug!("Replay ready with {} frames", replay.len());

    run(settings, replay)
}

fn build_world(character: &mut CharacterController, spawn: Vec3) -> PhysicsWorld {
    let mut world = PhysicsWorld::new();
    world.create_ground(0.0);
    // A low kerb across the walking path and a wall further ahead
    world.create_static_box(Vec3::new(4.0, 0.1, 0.5), Vec3::new(0.0, 0.1, -4.0));
    world.create_static_box(Vec3::new(4.0, 2.0, 0.5), Vec3::new(0.0, 2.0, -14.0));
    character.spawn(&mut world, spawn);
    world.sync_queries();
    world
}

fn run(settings: StrideSettings, replay: Replay) -> Result<()> {
    let spawn = Vec3::new(0.0, settings.simulation.spawn_height, 0.0);
    let mut character = CharacterController::new();
    let mut world = build_world(&mut character, spawn);

    let (inputs, head) = replay.into_parts();
    let mut rig = LocomotionRig::builder()
        .transform(Transform::from_position(spawn))
        .config(settings.locomotion.clone())
        .footsteps(settings.footsteps.clone())
        .head(head)
        .build()
        .context("Failed to build locomotion rig")?;

    info!(
        "Simulating rig {} for {} ticks ({} turning)",
        rig.id(),
        inputs.len(),
        settings.locomotion.turn_style
    );

    let mut time = GameTime::new(settings.time.clone());
    let fixed_dt = time.config.fixed_timestep;
    let hitch_frame = inputs.len() / 2;
    let mut summary = RunSummary::default();
    let mut pending = inputs.iter();
    let mut frame_index = 0usize;

    'frames: loop {
        let frame_delta = match settings.simulation.hitch_seconds {
            Some(hitch) if frame_index == hitch_frame => {
                info!("Injecting a {hitch}s hitch");
                hitch
            }
            _ => settings.simulation.frame_delta,
        };
        frame_index += 1;
        time.update(frame_delta);

        for _ in 0..time.fixed_steps() {
            let Some(input) = pending.next() else {
                break 'frames;
            };

            let mut mover = PhysicsMover::new(&mut world, &mut character);
            let frame = rig.update(fixed_dt, input, &mut mover);

            summary.ticks += 1;
            summary.snaps += u32::from(frame.locomotion.snapped);
            summary.sprint_ticks += u32::from(frame.locomotion.sprinting);
            summary.airborne_ticks += u32::from(!frame.ground.is_grounded);
            if let Some(step) = frame.footstep {
                summary.footsteps += 1;
                debug!("Footstep variant {:?} at {:.2?}", step.variant, frame.position);
            }
        }
    }

    let transform = rig.transform();
    info!(
        "Finished after {} ticks ({:.2}s simulated): position {:.2?}, heading {:.1}° facing {:.2?}, grounded {}",
        summary.ticks,
        time.total_time,
        transform.position,
        transform.heading(),
        transform.forward(),
        rig.ground().is_grounded
    );
    info!(
        "{} snap turns, {} sprint ticks, {} airborne ticks, {} footsteps",
        summary.snaps, summary.sprint_ticks, summary.airborne_ticks, summary.footsteps
    );

    Ok(())
}
