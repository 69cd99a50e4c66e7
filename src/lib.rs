//! Turn-based brawler on a small square grid.
//!
//! The host owns the window, the clock and the pixels. Each frame it hands a
//! [`scene::Scene`] the elapsed time, a [`render::RenderSurface`] to paint on,
//! and whatever [`input::InputEvent`]s arrived.

pub mod animation;
pub mod campaign;
pub mod config;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod hud;
pub mod input;
pub mod level;
pub mod motion;
pub mod pathfinding;
pub mod render;
pub mod scene;
pub mod title;

pub use campaign::Campaign;
pub use config::ArenaConfig;
pub use error::{ArenaError, Result};
pub use level::{Level, LevelState};
pub use scene::{Scene, SceneExit};
