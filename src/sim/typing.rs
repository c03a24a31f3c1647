//! Falling-symbol typing challenge
//!
//! Symbols spawn above the play area and fall at their own speed. Typing a
//! symbol that is on screen destroys the oldest copy of it. Missed symbols
//! just fall off the bottom; there is no penalty for misses or wrong keys.
//!
//! One engine serves both typing levels. The `Layout` picks the alphabet and
//! how a raw key is turned into a symbol: English keys are upper-cased,
//! Korean keys go through the two-set (dubeolsik) physical key table.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::scheduler::{Scheduler, TaskHandle};
use crate::audio::AudioSink;
use crate::consts::*;

/// Keyboard layout / alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layout {
    Korean,
    English,
}

const ENGLISH_ALPHABET: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// 14 basic consonants followed by 10 basic vowels
const KOREAN_ALPHABET: [char; 24] = [
    'ㄱ', 'ㄴ', 'ㄷ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅅ', 'ㅇ', 'ㅈ', 'ㅊ', 'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ', 'ㅏ', 'ㅑ',
    'ㅓ', 'ㅕ', 'ㅗ', 'ㅛ', 'ㅜ', 'ㅠ', 'ㅡ', 'ㅣ',
];

/// Two-set layout: physical (lowercase Latin) key -> jamo
const DUBEOLSIK: [(char, char); 24] = [
    ('r', 'ㄱ'),
    ('s', 'ㄴ'),
    ('e', 'ㄷ'),
    ('f', 'ㄹ'),
    ('a', 'ㅁ'),
    ('q', 'ㅂ'),
    ('t', 'ㅅ'),
    ('d', 'ㅇ'),
    ('w', 'ㅈ'),
    ('c', 'ㅊ'),
    ('z', 'ㅋ'),
    ('x', 'ㅌ'),
    ('v', 'ㅍ'),
    ('g', 'ㅎ'),
    ('k', 'ㅏ'),
    ('i', 'ㅑ'),
    ('j', 'ㅓ'),
    ('u', 'ㅕ'),
    ('h', 'ㅗ'),
    ('y', 'ㅛ'),
    ('n', 'ㅜ'),
    ('b', 'ㅠ'),
    ('m', 'ㅡ'),
    ('l', 'ㅣ'),
];

const ENGLISH_ROWS: [&[&str]; 3] = [
    &["Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P"],
    &["A", "S", "D", "F", "G", "H", "J", "K", "L"],
    &["Z", "X", "C", "V", "B", "N", "M"],
];

const KOREAN_ROWS: [&[&str]; 3] = [
    &["ㅂ", "ㅈ", "ㄷ", "ㄱ", "ㅅ", "ㅛ", "ㅕ", "ㅑ", "ㅐ", "ㅔ"],
    &["ㅁ", "ㄴ", "ㅇ", "ㄹ", "ㅎ", "ㅗ", "ㅓ", "ㅏ", "ㅣ"],
    &["ㅋ", "ㅌ", "ㅊ", "ㅍ", "ㅠ", "ㅜ", "ㅡ"],
];

/// Keys that never count as typing
const IGNORED_KEYS: [&str; 4] = ["Tab", "Alt", "Control", "Shift"];

impl Layout {
    /// Symbols that can spawn
    pub fn alphabet(&self) -> &'static [char] {
        match self {
            Layout::Korean => &KOREAN_ALPHABET,
            Layout::English => &ENGLISH_ALPHABET,
        }
    }

    /// On-screen keyboard rows
    pub fn keyboard_rows(&self) -> &'static [&'static [&'static str]] {
        match self {
            Layout::Korean => &KOREAN_ROWS,
            Layout::English => &ENGLISH_ROWS,
        }
    }

    /// Turn a raw key identifier into the symbol it types.
    ///
    /// Korean keys not in the table pass through unchanged, so clicking a
    /// jamo on the on-screen keyboard types that jamo. Multi-character key
    /// names ("Enter", "ArrowUp") and modifiers produce nothing.
    pub fn translate(&self, key: &str) -> Option<char> {
        if IGNORED_KEYS.contains(&key) {
            return None;
        }
        let symbol = match self {
            Layout::English => single_char(&key.to_uppercase())?,
            Layout::Korean => {
                let raw = single_char(key)?;
                let lower = single_char(&key.to_lowercase()).unwrap_or(raw);
                DUBEOLSIK
                    .iter()
                    .find(|(k, _)| *k == lower)
                    .map(|(_, jamo)| *jamo)
                    .unwrap_or(raw)
            }
        };
        Some(symbol)
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

/// A symbol on its way down
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingSymbol {
    pub id: u32,
    pub glyph: char,
    /// x = horizontal %, y = vertical %
    pub pos: Vec2,
    /// Percent per move step
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypingTask {
    Spawn,
    Fall,
    Complete,
}

#[derive(Debug, Clone)]
pub struct TypingChallenge {
    layout: Layout,
    /// Oldest first
    symbols: Vec<FallingSymbol>,
    hits: u32,
    next_id: u32,
    scheduler: Scheduler<TypingTask>,
    spawner: Option<TaskHandle>,
    mover: Option<TaskHandle>,
    /// Tenth hit landed, completion pending
    finishing: bool,
    complete: bool,
}

impl TypingChallenge {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            symbols: Vec::new(),
            hits: 0,
            next_id: 1,
            scheduler: Scheduler::new(),
            spawner: None,
            mover: None,
            finishing: false,
            complete: false,
        }
    }

    /// Start the spawner and the mover
    pub fn start(&mut self) {
        if self.spawner.is_none() {
            self.spawner = Some(self.scheduler.every(SPAWN_INTERVAL_MS, TypingTask::Spawn));
        }
        if self.mover.is_none() {
            self.mover = Some(self.scheduler.every(MOVE_INTERVAL_MS, TypingTask::Fall));
        }
    }

    /// Cancel every task
    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
        self.spawner = None;
        self.mover = None;
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn symbols(&self) -> &[FallingSymbol] {
        &self.symbols
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn live_tasks(&self) -> usize {
        self.scheduler.len()
    }

    /// Switch layout, dropping every symbol and all progress
    pub fn set_layout(&mut self, layout: Layout) {
        let running = self.spawner.is_some() || self.finishing;
        self.teardown();
        self.layout = layout;
        self.symbols.clear();
        self.hits = 0;
        self.finishing = false;
        self.complete = false;
        if running {
            self.start();
        }
        log::debug!("Typing layout switched to {:?}", layout);
    }

    /// Handle a raw key press. Returns true if it destroyed a symbol.
    pub fn key(&mut self, key: &str, audio: &mut dyn AudioSink) -> bool {
        if self.finishing || self.complete {
            return false;
        }
        let Some(symbol) = self.layout.translate(key) else {
            return false;
        };
        let Some(idx) = self.symbols.iter().position(|s| s.glyph == symbol) else {
            return false;
        };

        self.symbols.remove(idx);
        self.hits += 1;
        audio.success();
        log::debug!("Typed {} ({}/{})", symbol, self.hits, TYPING_HITS_REQUIRED);

        if self.hits >= TYPING_HITS_REQUIRED {
            self.finishing = true;
            if let Some(h) = self.spawner.take() {
                self.scheduler.cancel(h);
            }
            if let Some(h) = self.mover.take() {
                self.scheduler.cancel(h);
            }
            self.scheduler
                .after(TYPING_COMPLETE_DELAY_MS, TypingTask::Complete);
        }
        true
    }

    /// Advance time. Returns the reward once the completion delay has passed.
    pub fn tick<R: Rng>(&mut self, dt_ms: u64, rng: &mut R) -> Option<u32> {
        let until = self.scheduler.now() + dt_ms;
        while let Some(task) = self.scheduler.pop_due(until) {
            match task {
                TypingTask::Spawn => self.spawn(rng),
                TypingTask::Fall => self.fall(),
                TypingTask::Complete => {
                    self.complete = true;
                    self.teardown();
                    return Some(TYPING_REWARD);
                }
            }
        }
        self.scheduler.settle(until);
        None
    }

    fn spawn<R: Rng>(&mut self, rng: &mut R) {
        let alphabet = self.layout.alphabet();
        let glyph = alphabet[rng.random_range(0..alphabet.len())];
        let x = rng.random_range(SYMBOL_X_RANGE.0..SYMBOL_X_RANGE.1);
        let speed = rng.random_range(SYMBOL_SPEED_RANGE.0..SYMBOL_SPEED_RANGE.1);
        self.push_symbol(glyph, x, speed);
    }

    fn push_symbol(&mut self, glyph: char, x: f32, speed: f32) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.symbols.push(FallingSymbol {
            id,
            glyph,
            pos: Vec2::new(x, SYMBOL_START_Y),
            speed,
        });
        id
    }

    fn fall(&mut self) {
        for symbol in &mut self.symbols {
            symbol.pos.y += symbol.speed;
        }
        self.symbols.retain(|s| s.pos.y < SYMBOL_FLOOR_Y);
    }
}
