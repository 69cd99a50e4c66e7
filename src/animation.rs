//! Frame-based sprite animation.
//!
//! Purely cosmetic: driven by the per-frame time delta passed to `draw`, never
//! consulted by turn resolution.

use crate::config::{AnimationSetSpec, AnimationSpec};
use crate::error::{ArenaError, Result};
use crate::render::ImageId;

/// An ordered run of frames played at a fixed rate.
#[derive(Clone, Debug)]
pub struct Animation {
    frames: Vec<ImageId>,
    framerate: f32,
    repeat: bool,
    stopped: bool,
    last_frame: usize,
    /// Milliseconds since the last reset.
    play_time: f32,
}

impl Animation {
    pub fn new(name: &str, frames: Vec<ImageId>, framerate: f32, repeat: bool) -> Result<Self> {
        if frames.is_empty() || framerate <= 0.0 {
            return Err(ArenaError::EmptyAnimation(name.to_string()));
        }
        Ok(Self { frames, framerate, repeat, stopped: true, last_frame: 0, play_time: 0.0 })
    }

    pub fn from_spec(name: &str, spec: &AnimationSpec) -> Result<Self> {
        Self::new(name, spec.frames.clone(), spec.framerate, spec.repeat)
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn start(&mut self) {
        self.stopped = false;
    }

    pub fn reset(&mut self) {
        self.play_time = 0.0;
        self.last_frame = 0;
    }

    pub fn restart(&mut self) {
        self.reset();
        self.start();
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Duration of one pass, in milliseconds.
    pub fn length(&self) -> f32 {
        self.frames.len() as f32 * 1000.0 / self.framerate
    }

    pub fn current_frame(&self) -> ImageId {
        self.frames[self.last_frame]
    }

    /// Advance by `dt_ms` and return the frame to show.
    ///
    /// A repeating animation wraps around; a one-shot one stops on its last frame.
    pub fn frame_advance(&mut self, dt_ms: f32) -> ImageId {
        if self.stopped {
            return self.current_frame();
        }

        self.play_time += dt_ms;
        let length = self.length();
        if self.play_time >= length {
            if self.repeat {
                self.play_time %= length;
            } else {
                self.last_frame = self.frames.len() - 1;
                self.stop();
                return self.current_frame();
            }
        }

        let frame = (self.play_time / 1000.0 * self.framerate).floor() as usize;
        self.last_frame = frame.min(self.frames.len() - 1);
        self.current_frame()
    }
}

/// A set of named animations with exactly one active at a time.
#[derive(Clone, Debug)]
pub struct AnimationController {
    animations: Vec<(String, Animation)>,
    active: usize,
}

impl AnimationController {
    /// Build every animation in `spec` and start playing its default.
    pub fn from_spec(spec: &AnimationSetSpec) -> Result<Self> {
        let animations = spec
            .animations
            .iter()
            .map(|(name, a)| Animation::from_spec(name, a).map(|anim| (name.clone(), anim)))
            .collect::<Result<Vec<_>>>()?;
        let mut controller = Self { animations, active: 0 };
        controller.play(&spec.default)?;
        Ok(controller)
    }

    /// Switch to `name` and play it from the start.
    pub fn play(&mut self, name: &str) -> Result<()> {
        let index = self
            .animations
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| ArenaError::UnknownAnimation(name.to_string()))?;
        self.active = index;
        self.animations[index].1.restart();
        Ok(())
    }

    pub fn active_name(&self) -> &str {
        &self.animations[self.active].0
    }

    pub fn frame_advance(&mut self, dt_ms: f32) -> ImageId {
        self.animations[self.active].1.frame_advance(dt_ms)
    }

    pub fn current_frame(&self) -> ImageId {
        self.animations[self.active].1.current_frame()
    }

    pub fn stop(&mut self) {
        self.animations[self.active].1.stop();
    }
}
