//! Copy/paste challenge
//!
//! The player copies the spell word and pastes it into the field. Each exact
//! paste grows an apple; five apples clear the level.

use serde::Serialize;

use crate::audio::AudioSink;
use crate::consts::*;

/// Word the player must copy
pub const SPELL_WORD: &str = "사과나무";

/// Shown once per good paste
pub const SUCCESS_MARKER: &str = "🍎";

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClipboardChallenge {
    markers: Vec<&'static str>,
    complete: bool,
}

impl ClipboardChallenge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> &'static str {
        SPELL_WORD
    }

    pub fn markers(&self) -> &[&'static str] {
        &self.markers
    }

    pub fn successes(&self) -> usize {
        self.markers.len()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Check a paste. Surrounding whitespace is ignored, everything else must
    /// match exactly. Returns the reward on the fifth good paste.
    pub fn paste(&mut self, text: &str, audio: &mut dyn AudioSink) -> Option<u32> {
        if self.complete {
            return None;
        }
        if text.trim() != SPELL_WORD {
            audio.error();
            log::debug!("Rejected paste {:?}", text);
            return None;
        }

        audio.success();
        self.markers.push(SUCCESS_MARKER);
        log::debug!("Good paste {}/{}", self.markers.len(), PASTES_REQUIRED);

        if self.markers.len() >= PASTES_REQUIRED {
            self.complete = true;
            return Some(CLIPBOARD_REWARD);
        }
        None
    }
}
