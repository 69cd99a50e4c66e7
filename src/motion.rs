//! Logical position vs. visual glide.
//!
//! A step changes `location` at once; the renderer sees `location + offset`,
//! and `offset` decays to zero over the following frames.

use crate::geometry::{GridPoint, Offset};

/// Default offset decay rate, in cells per second equivalent.
pub const GLIDE_RATE: f32 = 20.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Motion {
    location: GridPoint,
    offset: Offset,
    glide_rate: f32,
}

impl Motion {
    pub fn new(location: GridPoint, glide_rate: f32) -> Self {
        Self { location, offset: Offset::ZERO, glide_rate }
    }

    pub fn location(&self) -> GridPoint {
        self.location
    }

    /// Residual glide distance still to cover, in cells.
    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn is_moving(&self) -> bool {
        self.offset != Offset::ZERO
    }

    /// Where the renderer should draw this entity, in cells.
    pub fn visual_position(&self) -> Offset {
        self.location.to_f32() + self.offset
    }

    /// Relocate to `to` now and glide there from the old cell.
    pub fn step_to(&mut self, to: GridPoint) {
        let from = self.location;
        self.location = to;
        self.offset = (from - to).to_f32();
    }

    /// Decay the offset by one frame of `dt_ms` milliseconds.
    ///
    /// The per-frame factor is capped at 1 so long frames land exactly on the
    /// cell instead of overshooting.
    pub fn tick(&mut self, dt_ms: f32) {
        if self.offset.is_negligible() {
            // `location` is integral, so snapping the offset leaves the entity
            // exactly on its cell.
            self.offset = Offset::ZERO;
            return;
        }
        let factor = (dt_ms / 1000.0 * self.glide_rate).clamp(0.0, 1.0);
        self.offset -= self.offset * factor;
    }
}
