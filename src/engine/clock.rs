//! Playback control over the simulated instant
//!
//! The simulated instant is always the wall-clock instant plus an offset.
//! Playing advances the offset by one step per tick; forward and rewind
//! move it by one step by hand, and reset returns to the present.

use crate::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    offset: f64,
    playing: bool,
    step: f64,
}

impl Clock {
    /// Create a paused clock at the present with a step in days
    pub fn new(step: f64) -> Self {
        Self {
            offset: 0.0,
            playing: false,
            step,
        }
    }

    /// Days between the simulated and the wall-clock instant
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn set_step(&mut self, step: f64) {
        self.step = step;
    }

    pub fn forward(&mut self) {
        self.offset += self.step;
    }

    pub fn rewind(&mut self) {
        self.offset -= self.step;
    }

    /// Return to the present
    pub fn reset(&mut self) {
        self.offset = 0.0;
    }

    pub fn toggle_play(&mut self) {
        self.playing = !self.playing;
    }

    /// Advance when playing and return the instant to simulate
    pub fn tick(&mut self, now: Instant) -> Instant {
        if self.playing {
            self.offset += self.step;
        }
        now + self.offset
    }
}
