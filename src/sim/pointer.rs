//! Pointer-target challenge
//!
//! A creature sits somewhere in the play area; every click on it counts as a
//! hit and sends it somewhere else. Ten hits clear the level.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::audio::AudioSink;
use crate::consts::*;

/// Cosmetic look of the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Creature {
    Invader,
    Ghost,
    Octopus,
    Dinosaur,
    Bat,
}

impl Creature {
    pub const ALL: [Creature; 5] = [
        Creature::Invader,
        Creature::Ghost,
        Creature::Octopus,
        Creature::Dinosaur,
        Creature::Bat,
    ];

    pub fn glyph(&self) -> &'static str {
        match self {
            Creature::Invader => "👾",
            Creature::Ghost => "👻",
            Creature::Octopus => "🐙",
            Creature::Dinosaur => "🦖",
            Creature::Bat => "🦇",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointerChallenge {
    hits: u32,
    /// x = left %, y = top %
    target: Vec2,
    creature: Creature,
    complete: bool,
}

impl Default for PointerChallenge {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerChallenge {
    /// Target starts in the middle of the play area
    pub fn new() -> Self {
        Self {
            hits: 0,
            target: Vec2::new(50.0, 50.0),
            creature: Creature::Invader,
            complete: false,
        }
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    /// Target position as (top %, left %)
    pub fn position(&self) -> (f32, f32) {
        (self.target.y, self.target.x)
    }

    pub fn creature(&self) -> Creature {
        self.creature
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Register a click on the target. Returns the reward on the tenth hit.
    pub fn hit<R: Rng>(&mut self, rng: &mut R, audio: &mut dyn AudioSink) -> Option<u32> {
        if self.complete {
            return None;
        }
        audio.success();
        self.hits += 1;
        log::debug!("Pointer hit {}/{}", self.hits, POINTER_HITS_REQUIRED);

        if self.hits >= POINTER_HITS_REQUIRED {
            self.complete = true;
            return Some(POINTER_REWARD);
        }
        self.relocate(rng);
        None
    }

    /// Independent uniform draws; repeats are allowed
    fn relocate<R: Rng>(&mut self, rng: &mut R) {
        let top = rng.random_range(POINTER_TOP_RANGE.0..=POINTER_TOP_RANGE.1);
        let left = rng.random_range(POINTER_LEFT_RANGE.0..=POINTER_LEFT_RANGE.1);
        self.target = Vec2::new(left, top);
        self.creature = Creature::ALL[rng.random_range(0..Creature::ALL.len())];
    }
}
