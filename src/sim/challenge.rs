//! Active challenge dispatch
//!
//! One closed enum over the five challenge kinds so the controller can mount,
//! feed, tick and tear down whichever level is active without knowing which
//! it is. Completion comes back as `Some(points)`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::clipboard::ClipboardChallenge;
use super::filesystem::FileSystemChallenge;
use super::judgment::JudgmentChallenge;
use super::pointer::PointerChallenge;
use super::typing::{Layout, TypingChallenge};
use crate::audio::AudioSink;
use crate::catalog::LevelKind;

/// Raw player input, already decoded by the shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeInput {
    /// Click on the pointer target
    Hit,
    /// Key identifier as the browser reports it ("a", "Shift", "ㅎ")
    Key(String),
    /// Pasted text
    Paste(String),
    /// Open a folder or file by display name
    Open(String),
    /// Up one folder
    Back,
    /// Judgment answer: true = acceptable behaviour
    Choice(bool),
}

#[derive(Debug, Clone)]
pub enum Challenge {
    Pointer(PointerChallenge),
    Typing(TypingChallenge),
    Clipboard(ClipboardChallenge),
    FileSystem(FileSystemChallenge),
    Judgment(JudgmentChallenge),
}

impl Challenge {
    /// Fresh challenge for a level kind
    pub fn for_level<R: Rng>(kind: LevelKind, rng: &mut R) -> Self {
        if let Some(layout) = kind.layout() {
            return Challenge::Typing(TypingChallenge::new(layout));
        }
        match kind {
            LevelKind::Pointer => Challenge::Pointer(PointerChallenge::new()),
            LevelKind::Clipboard => Challenge::Clipboard(ClipboardChallenge::new()),
            LevelKind::FileSystem => Challenge::FileSystem(FileSystemChallenge::new(rng)),
            LevelKind::Judgment | LevelKind::TypeKorean | LevelKind::TypeEnglish => {
                Challenge::Judgment(JudgmentChallenge::new())
            }
        }
    }

    /// Begin any periodic work
    pub fn start(&mut self) {
        if let Challenge::Typing(typing) = self {
            typing.start();
        }
    }

    /// Cancel every pending task
    pub fn teardown(&mut self) {
        match self {
            Challenge::Typing(typing) => typing.teardown(),
            Challenge::Judgment(judgment) => judgment.teardown(),
            _ => {}
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            Challenge::Pointer(c) => c.is_complete(),
            Challenge::Typing(c) => c.is_complete(),
            Challenge::Clipboard(c) => c.is_complete(),
            Challenge::FileSystem(c) => c.is_complete(),
            Challenge::Judgment(c) => c.is_complete(),
        }
    }

    /// Pending scheduled tasks
    pub fn live_tasks(&self) -> usize {
        match self {
            Challenge::Typing(c) => c.live_tasks(),
            Challenge::Judgment(c) => c.live_tasks(),
            _ => 0,
        }
    }

    /// Route input to the challenge. Input meant for another kind is ignored.
    pub fn handle_input<R: Rng>(
        &mut self,
        input: &ChallengeInput,
        rng: &mut R,
        audio: &mut dyn AudioSink,
    ) -> Option<u32> {
        match (self, input) {
            (Challenge::Pointer(c), ChallengeInput::Hit) => c.hit(rng, audio),
            (Challenge::Typing(c), ChallengeInput::Key(key)) => {
                c.key(key, audio);
                None
            }
            (Challenge::Clipboard(c), ChallengeInput::Paste(text)) => c.paste(text, audio),
            (Challenge::FileSystem(c), ChallengeInput::Open(name)) => c.open(name, audio),
            (Challenge::FileSystem(c), ChallengeInput::Back) => {
                c.go_back(audio);
                None
            }
            (Challenge::Judgment(c), ChallengeInput::Choice(claim)) => {
                c.choose(*claim, audio);
                None
            }
            (_, input) => {
                log::debug!("Ignoring {:?} for this level", input);
                None
            }
        }
    }

    /// Advance virtual time
    pub fn tick<R: Rng>(&mut self, dt_ms: u64, rng: &mut R) -> Option<u32> {
        match self {
            Challenge::Typing(c) => c.tick(dt_ms, rng),
            Challenge::Judgment(c) => c.tick(dt_ms),
            _ => None,
        }
    }
}
