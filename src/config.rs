use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Result};
use crate::geometry::GridPoint;
use crate::render::ImageId;

// ── StepPolicy ────────────────────────────────────────────────────────────────

/// Which cell of a reconstructed path an enemy steps to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPolicy {
    /// Drop the start cell *and* the nearest cell, then take the next one.
    /// Enemies close two cells per turn and threaten from two cells away.
    #[default]
    SkipNearest,
    /// Take the cell right after the start.
    Adjacent,
}

impl StepPolicy {
    /// Number of leading path entries discarded before picking the target.
    pub fn skip(self) -> usize {
        match self {
            StepPolicy::SkipNearest => 2,
            StepPolicy::Adjacent => 1,
        }
    }
}

// ── Animation descriptors ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationSpec {
    pub frames: Vec<ImageId>,
    /// Frames per second.
    pub framerate: f32,
    #[serde(default)]
    pub repeat: bool,
}

/// Named animations for one kind of actor plus the one it starts on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationSetSpec {
    pub default: String,
    pub animations: BTreeMap<String, AnimationSpec>,
}

impl AnimationSetSpec {
    fn single(default: &str, frames: &[u32], framerate: f32, repeat: bool) -> Self {
        let mut animations = BTreeMap::new();
        animations.insert(
            default.to_string(),
            AnimationSpec { frames: frames.iter().copied().map(ImageId).collect(), framerate, repeat },
        );
        Self { default: default.to_string(), animations }
    }

    fn with(mut self, name: &str, frames: &[u32], framerate: f32, repeat: bool) -> Self {
        self.animations.insert(
            name.to_string(),
            AnimationSpec { frames: frames.iter().copied().map(ImageId).collect(), framerate, repeat },
        );
        self
    }
}

// ── Actor stats ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyStats {
    pub health: i32,
    /// Taken off the player's multiplier on a successful hit.
    pub damage: i32,
    /// Multiplies the player's multiplier when this enemy dies.
    pub multiplier: i32,
    /// Chance per turn that an enemy targeting the player lands its hit.
    pub hit_chance: f64,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self { health: 3, damage: 1, multiplier: 2, hit_chance: 0.1 }
    }
}

// ── ArenaConfig ───────────────────────────────────────────────────────────────

/// Everything the core needs that the host supplies: arena dimensions, actor
/// stats, and asset handles. Every field has a default, so a partial JSON
/// document only overrides what it names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub grid_width: i32,
    pub grid_height: i32,
    /// Size of one cell on the render surface, in pixels.
    pub tile_px: f32,
    /// Visual offset decay, in cells per second equivalent.
    pub glide_rate: f32,
    pub player_start: GridPoint,
    pub player_multiplier: i32,
    pub enemy: EnemyStats,
    pub step_policy: StepPolicy,
    /// Highest level of a campaign before the score screen.
    pub final_level: u32,
    pub floor_tile: ImageId,
    pub player_animations: AnimationSetSpec,
    pub enemy_animations: AnimationSetSpec,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            grid_width: 8,
            grid_height: 8,
            tile_px: 32.0,
            glide_rate: 20.0,
            player_start: GridPoint::new(0, 0),
            player_multiplier: 1,
            enemy: EnemyStats::default(),
            step_policy: StepPolicy::SkipNearest,
            final_level: 10,
            floor_tile: ImageId(1),
            player_animations: AnimationSetSpec::single("idle", &[10, 11], 4.0, true)
                .with("walk", &[12, 13, 14, 15], 12.0, false),
            enemy_animations: AnimationSetSpec::single("idle", &[20, 21], 4.0, true)
                .with("walk", &[22, 23, 24, 25], 12.0, false),
        }
    }
}

impl ArenaConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Reject boards with no cells and a player start off the board.
    pub fn validate(&self) -> Result<()> {
        if self.grid_width < 1 || self.grid_height < 1 {
            return Err(ArenaError::EmptyGrid { width: self.grid_width, height: self.grid_height });
        }
        if !self.in_bounds(self.player_start) {
            return Err(ArenaError::OutOfBounds(self.player_start));
        }
        Ok(())
    }

    /// Inclusive top-left and bottom-right cells.
    pub fn bounds(&self) -> (GridPoint, GridPoint) {
        (GridPoint::new(0, 0), GridPoint::new(self.grid_width - 1, self.grid_height - 1))
    }

    pub fn in_bounds(&self, p: GridPoint) -> bool {
        let (lo, hi) = self.bounds();
        lo <= p && p <= hi
    }

    /// Pixel size of the whole arena.
    pub fn surface_size(&self) -> (f32, f32) {
        (self.grid_width as f32 * self.tile_px, self.grid_height as f32 * self.tile_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ArenaConfig::from_json(r#"{ "step_policy": "adjacent", "enemy": { "health": 5 } }"#).unwrap();
        assert_eq!(cfg.step_policy, StepPolicy::Adjacent);
        assert_eq!(cfg.enemy.health, 5);
        assert_eq!(cfg.enemy.damage, 1);
        assert_eq!(cfg.grid_width, 8);
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = ArenaConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, crate::error::ArenaError::Config(_)));
    }

    #[test]
    fn bounds_are_inclusive() {
        let cfg = ArenaConfig::default();
        assert!(cfg.in_bounds(GridPoint::new(7, 7)));
        assert!(!cfg.in_bounds(GridPoint::new(8, 0)));
        assert!(!cfg.in_bounds(GridPoint::new(0, -1)));
    }

    #[test]
    fn validate_rejects_empty_grid_and_stray_start() {
        assert!(ArenaConfig::default().validate().is_ok());

        let cfg = ArenaConfig { grid_width: 0, ..ArenaConfig::default() };
        assert!(matches!(cfg.validate(), Err(ArenaError::EmptyGrid { width: 0, height: 8 })));

        let cfg = ArenaConfig { player_start: GridPoint::new(20, 20), ..ArenaConfig::default() };
        assert!(matches!(cfg.validate(), Err(ArenaError::OutOfBounds(p)) if p == GridPoint::new(20, 20)));
    }
}
