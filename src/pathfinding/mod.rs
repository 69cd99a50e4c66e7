mod astar;

pub mod prelude {
    pub use crate::pathfinding::astar::*;
}
