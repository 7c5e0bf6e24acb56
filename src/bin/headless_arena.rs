//! Headless Arena
//!
//! Runs the simulation without a renderer: loads optional settings, world
//! and asset catalog files, then plays a scripted session at 60 Hz and
//! logs what happens.
//!
//! ```text
//! headless_arena [--settings FILE] [--world FILE] [--catalog FILE] [--seconds N]
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use bus_stop_engine::game::{
    ActorKind, AssetCatalog, GameEvent, GameLoop, GameSettings, LoadError, LoadGate, UiEvent,
    WorldData,
};
use bus_stop_engine::input::{InputEvent, KeyCode, KeyboardState};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const FRAME_SECONDS: f64 = 1.0 / 60.0;
const DEFAULT_RUN_SECONDS: f64 = 30.0;
/// Seconds between scripted shots
const FIRE_INTERVAL: f64 = 0.75;
/// Seconds between turning the walk direction
const TURN_INTERVAL: f64 = 4.0;

#[derive(Debug, Default)]
struct Args {
    settings: Option<PathBuf>,
    world: Option<PathBuf>,
    catalog: Option<PathBuf>,
    seconds: Option<f64>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        let mut value = || iter.next().ok_or_else(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--settings" => args.settings = Some(PathBuf::from(value()?)),
            "--world" => args.world = Some(PathBuf::from(value()?)),
            "--catalog" => args.catalog = Some(PathBuf::from(value()?)),
            "--seconds" => {
                let raw = value()?;
                let seconds = raw
                    .parse()
                    .map_err(|_| format!("--seconds expects a number, got {raw}"))?;
                args.seconds = Some(seconds);
            }
            other => return Err(format!("unknown argument {other}")),
        }
    }
    Ok(args)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

struct LoadedAssets {
    settings: GameSettings,
    world: Option<WorldData>,
    catalog: AssetCatalog,
}

fn load_assets(args: &Args) -> Result<LoadedAssets, LoadError> {
    let settings = match &args.settings {
        Some(path) => GameSettings::load(path)?,
        None => GameSettings::default(),
    };

    // Each requested data file holds the gate until it loads or fails.
    let requested = usize::from(args.world.is_some()) + usize::from(args.catalog.is_some());
    let mut gate = LoadGate::new(requested);

    let world = args
        .world
        .as_deref()
        .and_then(|path| load_gated(&mut gate, path, WorldData::load));
    if args.world.is_some() && world.is_none() {
        warn!("no world geometry, using fallback floor");
    }

    let catalog = args
        .catalog
        .as_deref()
        .and_then(|path| load_gated(&mut gate, path, AssetCatalog::load))
        .unwrap_or_else(|| {
            if args.catalog.is_some() {
                warn!("no asset catalog, actors spawn as placeholders");
            }
            AssetCatalog::default()
        });

    if let Some(outcome) = gate.take_outcome() {
        info!(?outcome, "loading finished");
    }

    Ok(LoadedAssets {
        settings,
        world,
        catalog,
    })
}

/// Load one file against the gate, charging its load time to the gate's
/// deadline. Files requested after the deadline are skipped.
fn load_gated<T>(
    gate: &mut LoadGate,
    path: &Path,
    load: impl FnOnce(&Path) -> Result<T, LoadError>,
) -> Option<T> {
    let name = path.display().to_string();
    if gate.is_ready() {
        warn!(asset = %name, "load window closed, skipping");
        return None;
    }
    let started = Instant::now();
    let result = load(path);
    gate.advance(started.elapsed().as_secs_f32());
    gate.settle_result(&name, result)
}

fn run(game: &mut GameLoop, seconds: f64) {
    let mut keyboard = KeyboardState::new();
    let mut now = 0.0;
    let mut next_shot = FIRE_INTERVAL;
    let mut next_turn = TURN_INTERVAL;
    let mut kills = 0usize;

    game.handle_input(InputEvent::PointerLocked, now);
    keyboard.handle_key(KeyCode::W, true);

    while now < seconds {
        now += FRAME_SECONDS;

        if now >= next_turn {
            next_turn += TURN_INTERVAL;
            game.handle_input(
                InputEvent::Look {
                    yaw: std::f32::consts::FRAC_PI_2,
                    pitch: 0.0,
                },
                now,
            );
            if let Some(jump) = keyboard.handle_key(KeyCode::Space, true) {
                game.handle_input(jump, now);
            }
            keyboard.handle_key(KeyCode::Space, false);
        }
        if now >= next_shot {
            next_shot += FIRE_INTERVAL;
            game.handle_input(InputEvent::Fire, now);
        }

        game.frame(now, &keyboard.movement);

        for event in game.drain_ui() {
            match event {
                UiEvent::Health(health) => {
                    info!(health = health.value, critical = health.critical, "health")
                }
                UiEvent::Status { text, .. } => info!(%text, "status"),
                UiEvent::GameOver => info!(at = now, "game over"),
                _ => {}
            }
        }
        kills += game
            .drain_events()
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    GameEvent::Despawned {
                        kind: ActorKind::Enemy | ActorKind::Npc,
                        ..
                    }
                )
            })
            .count();

        if game.session().is_game_over() {
            break;
        }
    }

    let snapshot = game.snapshot();
    info!(
        seconds = now,
        health = snapshot.health,
        aggro = snapshot.aggro,
        mobs_left = game.registry().mobs().len(),
        kills,
        "session finished"
    );
}

fn main() -> ExitCode {
    init_tracing();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            error!(%message, "bad arguments");
            return ExitCode::FAILURE;
        }
    };

    let assets = match load_assets(&args) {
        Ok(assets) => assets,
        Err(err) => {
            error!(%err, "failed to load game data");
            return ExitCode::FAILURE;
        }
    };

    let models = assets.catalog.asset_count();
    let mut game = GameLoop::new(assets.settings, assets.world.as_ref(), assets.catalog);
    info!(
        mobs = game.registry().mobs().len(),
        models,
        routes = game.routes().len(),
        colliders = game.colliders().len(),
        "arena ready"
    );

    run(&mut game, args.seconds.unwrap_or(DEFAULT_RUN_SECONDS));
    ExitCode::SUCCESS
}
