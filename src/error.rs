//! Error types for the arena core.

use thiserror::Error;

use crate::geometry::GridPoint;

/// Result type alias using [`ArenaError`].
pub type Result<T> = std::result::Result<T, ArenaError>;

#[derive(Debug, Error)]
pub enum ArenaError {
    /// A cell outside the arena was targeted.
    #[error("cell {0} is outside the arena")]
    OutOfBounds(GridPoint),

    /// The board has no cells.
    #[error("arena of {width}x{height} cells is empty")]
    EmptyGrid { width: i32, height: i32 },

    /// The player tried to act mid-glide or before the enemies moved.
    #[error("player is not ready to act")]
    NotReady,

    /// Two entities were placed on the same cell.
    #[error("cell {0} is already occupied")]
    Occupied(GridPoint),

    /// An animation controller was asked to play a name it doesn't know.
    #[error("unknown animation '{0}'")]
    UnknownAnimation(String),

    /// An animation was built without any frames.
    #[error("animation '{0}' has no frames")]
    EmptyAnimation(String),

    /// A node handle that no longer refers to a live node.
    #[error("node {0} is not alive")]
    StaleNode(u32),

    /// Configuration JSON could not be parsed.
    #[error("invalid arena config: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
