//! The arena: one player, a few enemies, and the turn loop that binds them.

use std::collections::HashSet;
use std::fmt;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::ArenaConfig;
use crate::entity::{Actor, Enemy, EnemyAction, Player, Surroundings};
use crate::error::{ArenaError, Result};
use crate::geometry::{Direction, GridPoint};
use crate::hud::TextSprite;
use crate::input::{ActionMap, Command, InputEvent};
use crate::render::{Anchor, Color, ImageId, RenderSurface};
use crate::scene::{Node, NodeId, Scene, SceneExit, SceneTree};

/// Number of enemies spawned at `difficulty`: `round(log2(difficulty + 1))`.
pub fn enemy_count(difficulty: u32) -> usize {
    (difficulty as f64 + 1.0).log2().round() as usize
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LevelState {
    InProgress,
    Won,
    Lost,
}

// ── Tree nodes ───────────────────────────────────────────────────────────────

/// Background tiles, one per cell. Root of the level tree.
#[derive(Clone, Debug)]
pub struct Floor {
    tiles: Vec<(Vec2, ImageId)>,
}

impl Floor {
    fn new(config: &ArenaConfig) -> Self {
        let mut tiles = Vec::with_capacity((config.grid_width * config.grid_height) as usize);
        for y in 0..config.grid_height {
            for x in 0..config.grid_width {
                tiles.push((GridPoint::new(x, y).to_vec2() * config.tile_px, config.floor_tile));
            }
        }
        Self { tiles }
    }
}

#[derive(Clone, Debug)]
pub enum LevelNode {
    Floor(Floor),
    Actor(Actor),
    Text(TextSprite),
}

impl Node for LevelNode {
    fn kind(&self) -> &'static str {
        match self {
            LevelNode::Floor(_) => "floor",
            LevelNode::Actor(Actor::Player(_)) => "player",
            LevelNode::Actor(Actor::Enemy(_)) => "enemy",
            LevelNode::Text(_) => "text",
        }
    }

    fn draw(&mut self, surface: &mut dyn RenderSurface, dt_ms: f32) {
        match self {
            LevelNode::Floor(floor) => {
                for &(pos, tile) in &floor.tiles {
                    surface.blit(tile, pos);
                }
            }
            LevelNode::Actor(actor) => actor.body_mut().draw(surface, dt_ms),
            LevelNode::Text(text) => text.draw(surface),
        }
    }

    fn depth(&self) -> f32 {
        match self {
            LevelNode::Floor(_) => f32::NEG_INFINITY,
            LevelNode::Actor(actor) => actor.visual_position().y,
            // HUD always sits on top.
            LevelNode::Text(_) => f32::INFINITY,
        }
    }
}

// ── Level ────────────────────────────────────────────────────────────────────

pub struct Level {
    tree: SceneTree<LevelNode>,
    player: NodeId,
    score_hud: NodeId,
    multiplier_hud: NodeId,
    turns: u32,
    score: i64,
    state: LevelState,
    config: ArenaConfig,
    bindings: ActionMap<Command>,
    rng: StdRng,
}

impl Level {
    /// A level with enemies at random distinct cells, seeded from the OS.
    pub fn new(difficulty: u32, score: i64, config: &ArenaConfig) -> Result<Self> {
        Self::with_rng(difficulty, score, config, StdRng::from_os_rng())
    }

    /// Same as [`Level::new`] but reproducible.
    pub fn seeded(difficulty: u32, score: i64, config: &ArenaConfig, seed: u64) -> Result<Self> {
        Self::with_rng(difficulty, score, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(difficulty: u32, score: i64, config: &ArenaConfig, mut rng: StdRng) -> Result<Self> {
        config.validate()?;
        let cells = (config.grid_width * config.grid_height).max(1) as usize;
        let count = enemy_count(difficulty).min(cells - 1);

        let mut taken = HashSet::from([config.player_start]);
        let mut enemies = Vec::with_capacity(count);
        while enemies.len() < count {
            let cell = GridPoint::new(
                rng.random_range(0..config.grid_width),
                rng.random_range(0..config.grid_height),
            );
            if taken.insert(cell) {
                enemies.push(cell);
            }
        }
        Self::build(&enemies, score, config, rng)
    }

    /// A level with enemies exactly where given. Fails if a cell is off the
    /// board or shared with the player or another enemy.
    pub fn with_layout(enemies: &[GridPoint], score: i64, config: &ArenaConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let mut taken = HashSet::from([config.player_start]);
        for &cell in enemies {
            if !config.in_bounds(cell) {
                return Err(ArenaError::OutOfBounds(cell));
            }
            if !taken.insert(cell) {
                return Err(ArenaError::Occupied(cell));
            }
        }
        Self::build(enemies, score, config, StdRng::seed_from_u64(seed))
    }

    fn build(enemies: &[GridPoint], score: i64, config: &ArenaConfig, rng: StdRng) -> Result<Self> {
        let mut tree = SceneTree::new(LevelNode::Floor(Floor::new(config)));
        let root = tree.root();

        let player = tree.add(root, LevelNode::Actor(Actor::Player(Player::new(config)?)))?;
        for &cell in enemies {
            tree.add(root, LevelNode::Actor(Actor::Enemy(Enemy::new(cell, config)?)))?;
        }

        let (_, height) = config.surface_size();
        let score_hud = tree.add(
            root,
            LevelNode::Text(TextSprite::new(score.to_string(), Color::WHITE, Anchor::TopLeft, Vec2::ZERO)),
        )?;
        let multiplier_hud = tree.add(
            root,
            LevelNode::Text(TextSprite::new(
                format!("x{}", config.player_multiplier),
                Color::WHITE,
                Anchor::BottomLeft,
                Vec2::new(0.0, height),
            )),
        )?;

        tracing::debug!(enemies = enemies.len(), score, "level created");
        Ok(Self {
            tree,
            player,
            score_hud,
            multiplier_hud,
            turns: 0,
            score,
            state: LevelState::InProgress,
            config: config.clone(),
            bindings: ActionMap::arena_defaults(),
            rng,
        })
    }

    // -- Accessors ----------------------------------------------------------

    pub fn state(&self) -> LevelState { self.state }
    pub fn score(&self) -> i64 { self.score }
    pub fn turns(&self) -> u32 { self.turns }
    pub fn tree(&self) -> &SceneTree<LevelNode> { &self.tree }
    pub fn config(&self) -> &ArenaConfig { &self.config }

    pub fn player(&self) -> Option<&Player> {
        match self.tree.get(self.player)? {
            LevelNode::Actor(actor) => actor.as_player(),
            _ => None,
        }
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        match self.tree.get_mut(self.player)? {
            LevelNode::Actor(actor) => actor.as_player_mut(),
            _ => None,
        }
    }

    /// Handles of the remaining enemies, in tree order.
    pub fn enemy_ids(&self) -> Vec<NodeId> {
        let root = self.tree.root();
        self.tree
            .children(root)
            .iter()
            .copied()
            .filter(|&id| self.enemy(id).is_some())
            .collect()
    }

    pub fn enemies(&self) -> Vec<&Enemy> {
        self.enemy_ids().into_iter().filter_map(|id| self.enemy(id)).collect()
    }

    pub fn enemy(&self, id: NodeId) -> Option<&Enemy> {
        match self.tree.get(id)? {
            LevelNode::Actor(actor) => actor.as_enemy(),
            _ => None,
        }
    }

    pub fn enemy_mut(&mut self, id: NodeId) -> Option<&mut Enemy> {
        match self.tree.get_mut(id)? {
            LevelNode::Actor(actor) => actor.as_enemy_mut(),
            _ => None,
        }
    }

    /// The actor standing on `cell`, if any.
    pub fn actor_at(&self, cell: GridPoint) -> Option<NodeId> {
        let root = self.tree.root();
        self.tree.children(root).iter().copied().find(|&id| match self.tree.get(id) {
            Some(LevelNode::Actor(actor)) => actor.location() == cell,
            _ => false,
        })
    }

    // -- Player actions -----------------------------------------------------

    /// Resolve one player step: attack whatever is on the target cell, or
    /// walk into it. Either way the player's turn is spent.
    ///
    /// Fails with [`ArenaError::NotReady`] mid-glide or before the enemies
    /// have answered the previous action.
    pub fn act(&mut self, dir: Direction) -> Result<()> {
        let Some(player) = self.player() else { return Ok(()) };
        if !player.can_act() {
            return Err(ArenaError::NotReady);
        }
        let (from, damage) = (player.body.location(), player.multiplier);
        let to = from + dir.delta();
        if !self.config.in_bounds(to) {
            return Err(ArenaError::OutOfBounds(to));
        }

        if let Some(target) = self.actor_at(to) {
            if let Some(LevelNode::Actor(actor)) = self.tree.get_mut(target) {
                actor.take_damage(damage);
            }
            tracing::debug!(%to, damage, "player attacks");
        } else if let Some(player) = self.player_mut() {
            player.body.relocate(to);
            tracing::trace!(%from, %to, "player steps");
        }

        if let Some(player) = self.player_mut() {
            player.turn_ready = false;
        }
        Ok(())
    }

    fn try_act(&mut self, dir: Direction) {
        if let Err(e) = self.act(dir) {
            tracing::trace!(error = %e, "move rejected");
        }
    }

    /// Replay the oldest buffered press once the player is free again, but
    /// only when more than one press is waiting.
    fn replay_pending(&mut self) {
        let Some(player) = self.player_mut() else { return };
        if !player.can_act() || player.pending.len() <= 1 {
            return;
        }
        let Some(event) = player.pending.pop_front() else { return };
        if let Some(Command::Step(dir)) = self.bindings.action_for(&event) {
            self.try_act(dir);
        }
    }

    // -- Turn resolution ----------------------------------------------------

    /// One enemy pass after the player has acted.
    ///
    /// At most one dead enemy is removed per pass: the first death found ends
    /// the pass, and any others are collected on later passes.
    fn resolve_turn(&mut self) {
        let root = self.tree.root();
        let Some(player_at) = self.player().map(|p| p.body.location()) else { return };

        for id in self.tree.children(root).to_vec() {
            let Some(enemy) = self.enemy(id) else { continue };

            if enemy.is_dead() {
                let reward = enemy.multiplier;
                if let Some(player) = self.player_mut() {
                    let gained = player.multiplier as i64;
                    player.multiplier = player.multiplier.saturating_mul(reward);
                    self.score += gained;
                }
                self.tree.remove(root, id);
                tracing::debug!(score = self.score, "enemy defeated");
                break;
            }

            if enemy.body.is_moving() {
                continue;
            }

            let others: HashSet<GridPoint> = self
                .enemy_ids()
                .into_iter()
                .filter(|&other| other != id)
                .filter_map(|other| self.enemy(other).map(|e| e.body.location()))
                .collect();
            let view = Surroundings {
                width: self.config.grid_width,
                height: self.config.grid_height,
                player: player_at,
                enemies: &others,
                policy: self.config.step_policy,
            };
            let action = match self.tree.get(id) {
                Some(LevelNode::Actor(Actor::Enemy(enemy))) => enemy.decide(&view, &mut self.rng),
                _ => continue,
            };

            match action {
                EnemyAction::Hold => {}
                EnemyAction::Strike { damage } => {
                    if let Some(LevelNode::Actor(player)) = self.tree.get_mut(self.player) {
                        player.take_damage(damage);
                    }
                    tracing::debug!(damage, "player hit");
                }
                EnemyAction::Advance(to) => {
                    if let Some(enemy) = self.enemy_mut(id) {
                        enemy.body.relocate(to);
                    }
                }
            }
        }

        if self.enemy_ids().is_empty() {
            self.state = LevelState::Won;
        }
        if self.player().is_some_and(|p| p.multiplier < 1) {
            self.state = LevelState::Lost;
        }

        self.turns += 1;
        if let Some(player) = self.player_mut() {
            player.turn_ready = true;
        }
        tracing::debug!(turn = self.turns, state = ?self.state, "turn resolved");
    }

    fn refresh_hud(&mut self, surface_height: f32) {
        let score = self.score.to_string();
        let multiplier = format!("x{}", self.player().map_or(0, |p| p.multiplier));
        if let Some(LevelNode::Text(text)) = self.tree.get_mut(self.score_hud) {
            text.set_text(score);
        }
        if let Some(LevelNode::Text(text)) = self.tree.get_mut(self.multiplier_hud) {
            text.set_text(multiplier);
            text.set_position(Vec2::new(0.0, surface_height));
        }
    }
}

impl Scene for Level {
    /// Per-frame entry point. Enemies only act once the player has finished
    /// both choosing an action and gliding into place.
    fn update(&mut self) {
        if self.state != LevelState::InProgress {
            return;
        }
        let root = self.tree.root();
        self.tree.update(root);
        self.replay_pending();

        let Some(player) = self.player() else { return };
        if player.body.is_moving() || player.turn_ready {
            return;
        }
        self.resolve_turn();
    }

    fn handle(&mut self, event: &InputEvent) {
        if self.state != LevelState::InProgress {
            return;
        }
        let command = match event {
            InputEvent::Quit => Some(Command::Quit),
            _ => self.bindings.action_for(event),
        };
        match command {
            Some(Command::Quit) => {
                self.state = LevelState::Lost;
                tracing::debug!("level abandoned");
                return;
            }
            Some(Command::Step(dir)) => {
                let ready = self.player().is_some_and(|p| p.can_act());
                if ready {
                    self.try_act(dir);
                } else if let Some(player) = self.player_mut() {
                    player.pending.push_back(*event);
                }
            }
            None => {}
        }
        let root = self.tree.root();
        self.tree.handle(root, event);
    }

    fn draw(&mut self, surface: &mut dyn RenderSurface, dt_ms: f32) {
        self.refresh_hud(surface.size().y);
        let root = self.tree.root();
        self.tree.draw(root, surface, dt_ms);
    }

    fn exit(&self) -> Option<SceneExit> {
        match self.state {
            LevelState::InProgress => None,
            LevelState::Won => Some(SceneExit::Won),
            LevelState::Lost => Some(SceneExit::Lost),
        }
    }
}

/// Text view of the board: `@` player, `g` enemy, `.` floor.
impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.config.grid_height {
            for x in 0..self.config.grid_width {
                let glyph = match self.actor_at(GridPoint::new(x, y)).and_then(|id| self.tree.get(id)) {
                    Some(LevelNode::Actor(Actor::Player(_))) => '@',
                    Some(LevelNode::Actor(Actor::Enemy(_))) => 'g',
                    _ => '.',
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        let multiplier = self.player().map_or(0, |p| p.multiplier);
        write!(f, "turn {} score {} x{}", self.turns, self.score, multiplier)
    }
}
