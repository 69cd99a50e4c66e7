//! Title → levels → score screen, carrying the score between levels.

use crate::config::ArenaConfig;
use crate::entity::{Enemy, Player};
use crate::error::Result;
use crate::geometry::GridPoint;
use crate::input::InputEvent;
use crate::level::Level;
use crate::render::RenderSurface;
use crate::scene::{Scene, SceneExit};
use crate::title::TitleScreen;

pub const TITLE: &str = "tilebrawl";

/// Bonus for clearing level `number` in `turns` turns.
pub fn clear_bonus(number: u32, turns: u32) -> i64 {
    number as i64 * ((64 - turns as i64).max(0) / 16)
}

enum Stage {
    Title(TitleScreen),
    Playing { level: Box<Level>, number: u32 },
    Summary(TitleScreen),
    Finished,
}

/// Owns whichever scene is current and decides what follows it.
pub struct Campaign {
    config: ArenaConfig,
    stage: Stage,
    score: i64,
    seed: Option<u64>,
}

impl Campaign {
    /// Fails early if the board or the config's animations can't be built.
    pub fn new(config: ArenaConfig) -> Result<Self> {
        config.validate()?;
        Player::new(&config)?;
        Enemy::new(GridPoint::ZERO, &config)?;
        let title = TitleScreen::new(TITLE)?;
        Ok(Self { config, stage: Stage::Title(title), score: 0, seed: None })
    }

    /// Every level's enemy placement and hit rolls derive from `seed`.
    pub fn seeded(config: ArenaConfig, seed: u64) -> Result<Self> {
        let mut campaign = Self::new(config)?;
        campaign.seed = Some(seed);
        Ok(campaign)
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    /// Number of the level in play, if any.
    pub fn level_number(&self) -> Option<u32> {
        match &self.stage {
            Stage::Playing { number, .. } => Some(*number),
            _ => None,
        }
    }

    pub fn level(&self) -> Option<&Level> {
        match &self.stage {
            Stage::Playing { level, .. } => Some(&**level),
            _ => None,
        }
    }

    pub fn level_mut(&mut self) -> Option<&mut Level> {
        match &mut self.stage {
            Stage::Playing { level, .. } => Some(&mut **level),
            _ => None,
        }
    }

    pub fn on_title(&self) -> bool {
        matches!(self.stage, Stage::Title(_))
    }

    pub fn on_summary(&self) -> bool {
        matches!(self.stage, Stage::Summary(_))
    }

    fn scene_mut(&mut self) -> Option<&mut dyn Scene> {
        match &mut self.stage {
            Stage::Title(s) | Stage::Summary(s) => Some(s as &mut dyn Scene),
            Stage::Playing { level, .. } => Some(&mut **level as &mut dyn Scene),
            Stage::Finished => None,
        }
    }

    fn start_level(&self, number: u32) -> Stage {
        let level = match self.seed {
            Some(seed) => Level::seeded(number, self.score, &self.config, seed.wrapping_add(number as u64)),
            None => Level::new(number, self.score, &self.config),
        };
        match level {
            Ok(level) => {
                tracing::info!(level = number, score = self.score, "level start");
                Stage::Playing { level: Box::new(level), number }
            }
            Err(e) => {
                tracing::error!(error = %e, "could not build level");
                Stage::Finished
            }
        }
    }

    fn summary(&self) -> Stage {
        match TitleScreen::new(&self.score.to_string()) {
            Ok(screen) => Stage::Summary(screen),
            Err(e) => {
                tracing::error!(error = %e, "could not build score screen");
                Stage::Finished
            }
        }
    }

    /// Swap in the next stage if the current scene has finished.
    fn advance(&mut self) {
        let next = match &self.stage {
            Stage::Title(title) => match title.exit() {
                Some(SceneExit::StartGame) => self.start_level(1),
                Some(_) => Stage::Finished,
                None => return,
            },
            Stage::Playing { level, number } => {
                let number = *number;
                match level.exit() {
                    Some(SceneExit::Won) => {
                        self.score = level.score() + clear_bonus(number, level.turns());
                        tracing::info!(level = number, turns = level.turns(), score = self.score, "level won");
                        if number >= self.config.final_level {
                            self.summary()
                        } else {
                            self.start_level(number + 1)
                        }
                    }
                    Some(_) => {
                        self.score = level.score();
                        tracing::info!(level = number, score = self.score, "level lost");
                        self.summary()
                    }
                    None => return,
                }
            }
            Stage::Summary(summary) => match summary.exit() {
                Some(SceneExit::StartGame) => {
                    self.score = 0;
                    self.start_level(1)
                }
                Some(_) => Stage::Finished,
                None => return,
            },
            Stage::Finished => return,
        };
        self.stage = next;
    }
}

impl Scene for Campaign {
    fn update(&mut self) {
        self.advance();
        if let Some(scene) = self.scene_mut() {
            scene.update();
        }
    }

    fn handle(&mut self, event: &InputEvent) {
        if *event == InputEvent::Quit {
            self.stage = Stage::Finished;
            return;
        }
        if let Some(scene) = self.scene_mut() {
            scene.handle(event);
        }
    }

    fn draw(&mut self, surface: &mut dyn RenderSurface, dt_ms: f32) {
        if let Some(scene) = self.scene_mut() {
            scene.draw(surface, dt_ms);
        }
    }

    fn exit(&self) -> Option<SceneExit> {
        match self.stage {
            Stage::Finished => Some(SceneExit::Quit),
            _ => None,
        }
    }
}
