//! HUD view model
//!
//! Everything the screen host needs to draw the header bar, derived from the
//! controller on demand. Nothing here mutates game state.

use std::fmt::Write;

use serde::Serialize;

use crate::catalog::LEVELS;
use crate::sim::{FallingSymbol, GameController, GamePhase};

/// Contamination drops this much per cleared zone
const CONTAMINATION_STEP: u32 = 15;

/// State of one node on the level map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ZoneState {
    Cleared,
    Current,
    Locked,
}

/// Zero-padded six digit score, e.g. `000450`
pub fn format_score(score: u32) -> String {
    format!("{:06}", score)
}

/// System contamination shown by the guide character, in percent
pub fn contamination(level_index: usize) -> u32 {
    let cleared = u32::try_from(level_index).unwrap_or(u32::MAX);
    100u32.saturating_sub(cleared.saturating_mul(CONTAMINATION_STEP))
}

/// Level map, one entry per catalog level
pub fn progress_map(level_index: usize) -> Vec<ZoneState> {
    (0..LEVELS.len())
        .map(|i| match i.cmp(&level_index) {
            std::cmp::Ordering::Less => ZoneState::Cleared,
            std::cmp::Ordering::Equal => ZoneState::Current,
            std::cmp::Ordering::Greater => ZoneState::Locked,
        })
        .collect()
}

/// Markup for the falling-symbol layer. It changes every frame, so the host
/// redraws it on its own and leaves the rest of the screen alone.
pub fn symbol_layer(symbols: &[FallingSymbol]) -> String {
    let mut html = String::new();
    for symbol in symbols {
        let _ = write!(
            html,
            r#"<div class="symbol" style="left:{:.1}%;top:{:.1}%">{}</div>"#,
            symbol.pos.x, symbol.pos.y, symbol.glyph
        );
    }
    html
}

/// Header bar contents while a level is being played
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudView {
    /// One-based zone number
    pub zone: usize,
    pub title: &'static str,
    pub description: &'static str,
    pub instructions: &'static str,
    pub score: String,
    pub contamination: u32,
    pub map: Vec<ZoneState>,
}

impl HudView {
    /// `None` unless a level is mounted
    pub fn from_game(game: &GameController) -> Option<Self> {
        if game.phase() != GamePhase::Playing {
            return None;
        }
        let index = game.level_index();
        let level = game.level();
        Some(Self {
            zone: index + 1,
            title: level.title,
            description: level.description,
            instructions: level.instructions,
            score: format_score(game.score()),
            contamination: contamination(index),
            map: progress_map(index),
        })
    }
}
