//! Ball Room headless driver
//!
//! Builds the stock scene, points a camera at it and runs a fixed number of
//! frames, logging what happened. Rendering is left to an embedding application.
//!
//! Usage: `ball-room [settings.json] [--seed N] [--balls N] [--frames N]`

use std::process::ExitCode;

use glam::{Mat4, Vec3};

use ball_room::renderer::body_instances;
use ball_room::sim::{Frustum, Projection, World, build_default_scene};
use ball_room::{Result, SimConfig, SimError};

/// Options from the command line
struct Options {
    settings: Option<String>,
    seed: u64,
    balls: usize,
    frames: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            settings: None,
            seed: 0x5eed,
            balls: 100,
            frames: 600,
        }
    }
}

fn parse_args() -> Result<Options> {
    let mut options = Options::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => options.seed = parse_value(args.next(), "seed")?,
            "--balls" => options.balls = parse_value(args.next(), "balls")?,
            "--frames" => options.frames = parse_value(args.next(), "frames")?,
            _ => options.settings = Some(arg),
        }
    }
    Ok(options)
}

fn parse_value<T: std::str::FromStr>(value: Option<String>, name: &'static str) -> Result<T> {
    let value = value.unwrap_or_default();
    value
        .parse()
        .map_err(|_| SimError::InvalidArgument { name, value })
}

/// Third-person camera hovering above the room, looking at `target`
fn camera_frustum(target: Vec3) -> Result<Frustum> {
    let eye = Vec3::new(0.0, 15.0, 25.0);
    let view = Mat4::look_at_rh(eye, target, Vec3::Y);
    Frustum::from_camera(
        Projection::Perspective {
            fov_y: 45.0,
            aspect: 800.0 / 600.0,
            near: 0.1,
            far: 100.0,
        },
        view,
    )
}

fn run() -> Result<()> {
    let options = parse_args()?;
    let config = match &options.settings {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    let mut world = World::new(config)?;
    build_default_scene(&mut world, options.seed, options.balls)?;

    let frame_dt = 1.0 / 60.0;
    for frame in 0..options.frames {
        // Camera follows the first ball, so the view volume changes every frame
        let target = world
            .bodies()
            .first()
            .map(|b| b.position())
            .unwrap_or(world.config().room.center());
        world.set_frustum(camera_frustum(target)?);

        let stats = world.advance(frame_dt)?;
        if frame % 60 == 0 {
            log::info!(
                "frame {}: walls={} balls={} boxes={} | inside={} intersecting={} outside={}",
                frame,
                stats.wall_hits,
                stats.ball_hits,
                stats.obstacle_hits,
                stats.inside,
                stats.intersecting,
                stats.outside
            );
        }
    }

    if let Some(first) = world.bodies().first() {
        let diagnostics = world.diagnostics(first.id())?;
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
    }
    log::info!(
        "Finished {} frames, {} instances ready for upload",
        world.frame_count(),
        body_instances(&world).len()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Ball Room (native) starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
