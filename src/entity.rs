//! Player and enemy actors, and the enemy's move decision.

use std::collections::{HashSet, VecDeque};

use rand::Rng;

use crate::animation::AnimationController;
use crate::config::{ArenaConfig, StepPolicy};
use crate::error::Result;
use crate::geometry::{GridPoint, Offset};
use crate::input::InputEvent;
use crate::motion::Motion;
use crate::pathfinding::prelude::astar;
use crate::render::RenderSurface;

/// Animation played after a successful step.
pub const WALK_ANIMATION: &str = "walk";

// ── Body ─────────────────────────────────────────────────────────────────────

/// What every actor has: a cell, a glide, and a sprite animation.
#[derive(Clone, Debug)]
pub struct Body {
    pub motion: Motion,
    pub anim: AnimationController,
    tile_px: f32,
}

impl Body {
    pub fn new(location: GridPoint, anim: AnimationController, config: &ArenaConfig) -> Self {
        Self { motion: Motion::new(location, config.glide_rate), anim, tile_px: config.tile_px }
    }

    pub fn location(&self) -> GridPoint {
        self.motion.location()
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_moving()
    }

    /// Step to an adjacent (or near) cell and start the walk cycle.
    pub fn relocate(&mut self, to: GridPoint) {
        self.motion.step_to(to);
        if let Err(e) = self.anim.play(WALK_ANIMATION) {
            tracing::warn!(error = %e, "no walk animation");
        }
    }

    /// Advance the glide and the animation by `dt_ms`, then blit the frame.
    pub fn draw(&mut self, surface: &mut dyn RenderSurface, dt_ms: f32) {
        self.motion.tick(dt_ms);
        let frame = self.anim.frame_advance(dt_ms);
        surface.blit(frame, self.motion.visual_position().to_vec2() * self.tile_px);
    }
}

// ── Player ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    /// Damage dealt per hit; the player loses once it drops below 1.
    pub multiplier: i32,
    /// True while the level is waiting for the player's next action.
    pub turn_ready: bool,
    /// Key presses that arrived mid-glide or off-turn, oldest first.
    pub pending: VecDeque<InputEvent>,
}

impl Player {
    pub fn new(config: &ArenaConfig) -> Result<Self> {
        let anim = AnimationController::from_spec(&config.player_animations)?;
        Ok(Self {
            body: Body::new(config.player_start, anim, config),
            multiplier: config.player_multiplier,
            turn_ready: true,
            pending: VecDeque::new(),
        })
    }

    /// Idle and waiting for input.
    pub fn can_act(&self) -> bool {
        self.turn_ready && !self.body.is_moving()
    }
}

// ── Enemy ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Enemy {
    pub body: Body,
    pub health: i32,
    pub damage: i32,
    /// Applied to the player's multiplier when this enemy dies.
    pub multiplier: i32,
    hit_chance: f64,
}

/// What an enemy chose to do this turn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EnemyAction {
    Hold,
    Strike { damage: i32 },
    Advance(GridPoint),
}

/// The board as seen by one enemy when it decides.
pub struct Surroundings<'a> {
    pub width: i32,
    pub height: i32,
    pub player: GridPoint,
    /// Cells held by *other* enemies.
    pub enemies: &'a HashSet<GridPoint>,
    pub policy: StepPolicy,
}

impl Enemy {
    pub fn new(location: GridPoint, config: &ArenaConfig) -> Result<Self> {
        let anim = AnimationController::from_spec(&config.enemy_animations)?;
        Ok(Self {
            body: Body::new(location, anim, config),
            health: config.enemy.health,
            damage: config.enemy.damage,
            multiplier: config.enemy.multiplier,
            hit_chance: config.enemy.hit_chance,
        })
    }

    pub fn is_dead(&self) -> bool {
        self.health < 1
    }

    /// Path toward the player and pick this turn's action.
    pub fn decide(&self, view: &Surroundings<'_>, rng: &mut impl Rng) -> EnemyAction {
        let from = self.body.location();
        let Some(path) = astar(from, view.player, view.width, view.height, |p| view.enemies.contains(&p)) else {
            tracing::trace!(%from, player = %view.player, "no path to player");
            return EnemyAction::Hold;
        };
        let Some(target) = step_target(&path, view.policy) else {
            return EnemyAction::Hold;
        };

        if target == view.player {
            if rng.random_bool(self.hit_chance.clamp(0.0, 1.0)) {
                EnemyAction::Strike { damage: self.damage }
            } else {
                EnemyAction::Hold
            }
        } else {
            EnemyAction::Advance(target)
        }
    }
}

/// The cell an enemy moves to along `path` (start → goal).
///
/// `policy.skip()` leading entries are dropped and the next one is the target.
/// When that leaves nothing but the path did reach past the start, the goal
/// itself is the target, so an enemy right next to the player still threatens it.
pub fn step_target(path: &[GridPoint], policy: StepPolicy) -> Option<GridPoint> {
    path.get(policy.skip())
        .or_else(|| if path.len() >= 2 { path.last() } else { None })
        .copied()
}

// ── Actor ────────────────────────────────────────────────────────────────────

/// Closed set of things that occupy a cell.
#[derive(Clone, Debug)]
pub enum Actor {
    Player(Player),
    Enemy(Enemy),
}

impl Actor {
    pub fn body(&self) -> &Body {
        match self {
            Actor::Player(p) => &p.body,
            Actor::Enemy(e) => &e.body,
        }
    }

    pub fn body_mut(&mut self) -> &mut Body {
        match self {
            Actor::Player(p) => &mut p.body,
            Actor::Enemy(e) => &mut e.body,
        }
    }

    pub fn location(&self) -> GridPoint {
        self.body().location()
    }

    pub fn visual_position(&self) -> Offset {
        self.body().motion.visual_position()
    }

    /// A hit lowers a player's multiplier and an enemy's health.
    pub fn take_damage(&mut self, amount: i32) {
        match self {
            Actor::Player(p) => p.multiplier = p.multiplier.saturating_sub(amount),
            Actor::Enemy(e) => e.health = e.health.saturating_sub(amount),
        }
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Actor::Player(p) => Some(p),
            Actor::Enemy(_) => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match self {
            Actor::Player(p) => Some(p),
            Actor::Enemy(_) => None,
        }
    }

    pub fn as_enemy(&self) -> Option<&Enemy> {
        match self {
            Actor::Enemy(e) => Some(e),
            Actor::Player(_) => None,
        }
    }

    pub fn as_enemy_mut(&mut self) -> Option<&mut Enemy> {
        match self {
            Actor::Enemy(e) => Some(e),
            Actor::Player(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(points: &[(i32, i32)]) -> Vec<GridPoint> {
        points.iter().map(|&(x, y)| GridPoint::new(x, y)).collect()
    }

    #[test]
    fn skip_nearest_takes_third_cell() {
        let p = path(&[(0, 0), (1, 0), (2, 0), (3, 0)]);
        assert_eq!(step_target(&p, StepPolicy::SkipNearest), Some(GridPoint::new(2, 0)));
        assert_eq!(step_target(&p, StepPolicy::Adjacent), Some(GridPoint::new(1, 0)));
    }

    #[test]
    fn adjacent_enemy_targets_goal() {
        let p = path(&[(0, 0), (1, 0)]);
        assert_eq!(step_target(&p, StepPolicy::SkipNearest), Some(GridPoint::new(1, 0)));
    }

    #[test]
    fn lone_start_has_no_target() {
        let p = path(&[(0, 0)]);
        assert_eq!(step_target(&p, StepPolicy::SkipNearest), None);
    }
}
