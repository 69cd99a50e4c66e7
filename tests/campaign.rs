use tilebrawl::campaign::{Campaign, clear_bonus};
use tilebrawl::config::ArenaConfig;
use tilebrawl::geometry::Direction;
use tilebrawl::input::{InputEvent, KeyCode};
use tilebrawl::level::{Level, LevelState};
use tilebrawl::pathfinding::prelude::astar;
use tilebrawl::render::RecordingSurface;
use tilebrawl::scene::{Scene, SceneExit, run_frame};

const DT_MS: f32 = 16.0;

fn harmless() -> ArenaConfig {
    let mut config = ArenaConfig::default();
    config.enemy.hit_chance = 0.0;
    config
}

fn surface() -> RecordingSurface {
    RecordingSurface::new(256.0, 256.0)
}

fn press_enter(campaign: &mut Campaign, surface: &mut RecordingSurface) {
    let events = [InputEvent::KeyDown(KeyCode::Enter), InputEvent::KeyUp(KeyCode::Enter)];
    run_frame(campaign, &events, surface, DT_MS);
    run_frame(campaign, &[], surface, DT_MS);
}

/// Step toward (or hit) the nearest enemy.
fn chase(level: &Level) -> Option<InputEvent> {
    let player = level.player()?;
    if !player.can_act() {
        return None;
    }
    let from = player.body.location();
    let enemies: Vec<_> = level.enemies().iter().map(|e| e.body.location()).collect();
    let target = enemies.iter().copied().min_by_key(|&e| from.manhattan(e))?;
    let path = astar(from, target, 8, 8, |c| enemies.contains(&c))?;
    let next = *path.get(1)?;
    let key = match Direction::ALL.into_iter().find(|d| from + d.delta() == next)? {
        Direction::Up => KeyCode::ArrowUp,
        Direction::Right => KeyCode::ArrowRight,
        Direction::Down => KeyCode::ArrowDown,
        Direction::Left => KeyCode::ArrowLeft,
    };
    Some(InputEvent::KeyDown(key))
}

#[test]
fn clear_bonus_rewards_speed() {
    assert_eq!(clear_bonus(1, 0), 4);
    assert_eq!(clear_bonus(1, 48), 1);
    assert_eq!(clear_bonus(2, 20), 4);
    assert_eq!(clear_bonus(3, 63), 0);
    assert_eq!(clear_bonus(5, 200), 0);
}

#[test]
fn starts_on_title() {
    let campaign = Campaign::seeded(harmless(), 1).unwrap();
    assert!(campaign.on_title());
    assert_eq!(campaign.level_number(), None);
    assert_eq!(campaign.score(), 0);
    assert_eq!(campaign.exit(), None);
}

#[test]
fn bad_board_fails_up_front() {
    let mut config = harmless();
    config.player_start = tilebrawl::geometry::GridPoint::new(8, 0);
    assert!(Campaign::new(config).is_err());
}

#[test]
fn enter_starts_level_one() {
    let mut campaign = Campaign::seeded(harmless(), 1).unwrap();
    let mut surface = surface();
    press_enter(&mut campaign, &mut surface);

    assert_eq!(campaign.level_number(), Some(1));
    let level = campaign.level().unwrap();
    assert_eq!(level.enemies().len(), 1);
    assert_eq!(level.state(), LevelState::InProgress);
}

#[test]
fn escape_on_title_finishes() {
    let mut campaign = Campaign::seeded(harmless(), 1).unwrap();
    let mut surface = surface();
    run_frame(&mut campaign, &[InputEvent::KeyDown(KeyCode::Escape)], &mut surface, DT_MS);
    assert_eq!(run_frame(&mut campaign, &[], &mut surface, DT_MS), Some(SceneExit::Quit));
}

#[test]
fn quit_event_finishes_anywhere() {
    let mut campaign = Campaign::seeded(harmless(), 1).unwrap();
    let mut surface = surface();
    press_enter(&mut campaign, &mut surface);
    assert_eq!(run_frame(&mut campaign, &[InputEvent::Quit], &mut surface, DT_MS), Some(SceneExit::Quit));
}

#[test]
fn abandoning_a_level_shows_score_screen() {
    let mut campaign = Campaign::seeded(harmless(), 1).unwrap();
    let mut surface = surface();
    press_enter(&mut campaign, &mut surface);

    run_frame(&mut campaign, &[InputEvent::KeyDown(KeyCode::Escape)], &mut surface, DT_MS);
    surface.clear();
    run_frame(&mut campaign, &[], &mut surface, DT_MS);
    assert!(campaign.on_summary());
    assert_eq!(surface.texts(), vec!["0"]);

    // Play again from the top.
    press_enter(&mut campaign, &mut surface);
    assert_eq!(campaign.level_number(), Some(1));
    assert_eq!(campaign.score(), 0);
}

#[test]
fn winning_every_level_reaches_summary() {
    let mut config = harmless();
    config.enemy.health = 1;
    config.final_level = 2;
    let mut campaign = Campaign::seeded(config, 7).unwrap();
    let mut surface = surface();
    press_enter(&mut campaign, &mut surface);

    let mut reached_two = false;
    for _ in 0..5000 {
        if campaign.on_summary() {
            break;
        }
        reached_two |= campaign.level_number() == Some(2);
        let events: Vec<InputEvent> = campaign.level().and_then(chase).into_iter().collect();
        run_frame(&mut campaign, &events, &mut surface, DT_MS);
    }

    assert!(reached_two);
    assert!(campaign.on_summary());
    // At least one point per kill.
    assert!(campaign.score() >= 2);
}
