//! Headless runner: plays a whole campaign with a simple autopilot and prints
//! the board after every turn.
//!
//! ```bash
//! tilebrawl [config.json] [seed]
//! RUST_LOG=tilebrawl=debug tilebrawl
//! ```

use tilebrawl::config::ArenaConfig;
use tilebrawl::geometry::{Direction, GridPoint};
use tilebrawl::input::{InputEvent, KeyCode};
use tilebrawl::level::Level;
use tilebrawl::pathfinding::prelude::astar;
use tilebrawl::render::RecordingSurface;
use tilebrawl::scene::run_frame;
use tilebrawl::Campaign;

/// Fixed frame time, roughly 60 fps.
const DT_MS: f32 = 16.0;
const MAX_FRAMES: u32 = 200_000;

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).compact().init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match ArenaConfig::from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("failed to load {path}: {e}");
                std::process::exit(1);
            }
        },
        None => ArenaConfig::default(),
    };
    let seed = args.next().and_then(|s| s.parse::<u64>().ok());

    let campaign = match seed {
        Some(seed) => Campaign::seeded(config.clone(), seed),
        None => Campaign::new(config.clone()),
    };
    let mut campaign = match campaign {
        Ok(campaign) => campaign,
        Err(e) => {
            eprintln!("invalid config: {e}");
            std::process::exit(1);
        }
    };

    let (width, height) = config.surface_size();
    let mut surface = RecordingSurface::new(width, height);
    let mut last_seen: Option<(u32, u32)> = None;

    for frame in 0..MAX_FRAMES {
        let events = next_events(&campaign);
        surface.clear();
        if let Some(exit) = run_frame(&mut campaign, &events, &mut surface, DT_MS) {
            tracing::info!(?exit, frame, score = campaign.score(), "campaign over");
            println!("final score {}", campaign.score());
            return;
        }

        if let (Some(number), Some(level)) = (campaign.level_number(), campaign.level()) {
            let seen = (number, level.turns());
            if last_seen != Some(seen) {
                println!("level {number}\n{level}\n");
                last_seen = Some(seen);
            }
        }
    }
    tracing::warn!(frames = MAX_FRAMES, "gave up waiting for the campaign to finish");
}

/// What the autopilot presses this frame.
fn next_events(campaign: &Campaign) -> Vec<InputEvent> {
    if campaign.on_title() {
        return vec![InputEvent::KeyDown(KeyCode::Enter), InputEvent::KeyUp(KeyCode::Enter)];
    }
    if campaign.on_summary() {
        return vec![InputEvent::KeyDown(KeyCode::Escape)];
    }
    let Some(level) = campaign.level() else { return Vec::new() };
    if !level.player().is_some_and(|p| p.can_act()) {
        return Vec::new();
    }
    match autopilot(level) {
        Some(dir) => vec![InputEvent::KeyDown(arrow_for(dir))],
        None => Vec::new(),
    }
}

/// Walk toward the nearest enemy, or hit it if it's adjacent.
fn autopilot(level: &Level) -> Option<Direction> {
    let from = level.player()?.body.location();
    let enemies: Vec<GridPoint> = level.enemies().iter().map(|e| e.body.location()).collect();
    let target = enemies.iter().copied().min_by_key(|&e| from.manhattan(e))?;

    let config = level.config();
    let path = astar(from, target, config.grid_width, config.grid_height, |p| enemies.contains(&p))?;
    let next = *path.get(1)?;
    Direction::ALL.into_iter().find(|d| from + d.delta() == next)
}

fn arrow_for(dir: Direction) -> KeyCode {
    match dir {
        Direction::Up => KeyCode::ArrowUp,
        Direction::Right => KeyCode::ArrowRight,
        Direction::Down => KeyCode::ArrowDown,
        Direction::Left => KeyCode::ArrowLeft,
    }
}
