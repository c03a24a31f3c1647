//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual time only (the host feeds frame deltas)
//! - Seeded RNG only
//! - Audio through the injected sink, never directly
//! - No rendering or platform dependencies

pub mod admin;
pub mod challenge;
pub mod clipboard;
pub mod controller;
pub mod filesystem;
pub mod intro;
pub mod judgment;
pub mod pointer;
pub mod scheduler;
pub mod typing;

pub use admin::AdminGate;
pub use challenge::{Challenge, ChallengeInput};
pub use clipboard::ClipboardChallenge;
pub use controller::{GameController, GamePhase, GameSession};
pub use filesystem::FileSystemChallenge;
pub use intro::{Intro, IntroStage};
pub use judgment::{Feedback, JudgmentChallenge};
pub use pointer::{Creature, PointerChallenge};
pub use scheduler::{Scheduler, TaskHandle};
pub use typing::{FallingSymbol, Layout, TypingChallenge};
