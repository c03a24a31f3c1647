//! Sound cues
//!
//! The game never talks to an audio device directly. It fires cues at an
//! `AudioSink` handed to the controller; the browser build plugs in
//! `WebAudio`, native builds and tests use `LogAudio` or `CueLog`.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

/// Background music loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BgmMode {
    /// Tense bass loop under the distress messages
    Intro,
    /// Upbeat melody for menus and play
    Game,
}

/// Fire-and-forget audio collaborator. Implementations must not panic.
pub trait AudioSink {
    /// UI click / folder open
    fn click(&mut self);
    /// Correct answer, hit, good paste
    fn success(&mut self);
    /// Wrong answer, bad paste
    fn error(&mut self);
    /// Level cleared / game started
    fn fanfare(&mut self);
    fn set_background_mode(&mut self, mode: BgmMode);
    fn stop_background_mode(&mut self);
}

/// A cue as recorded by `CueLog`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    Click,
    Success,
    Error,
    Fanfare,
    Background(BgmMode),
    StopBackground,
}

/// Sink that only writes cues to the log
#[derive(Debug, Default)]
pub struct LogAudio {
    background: Option<BgmMode>,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Background loop that would currently be playing
    pub fn background(&self) -> Option<BgmMode> {
        self.background
    }
}

impl AudioSink for LogAudio {
    fn click(&mut self) {
        log::trace!("cue: click");
    }

    fn success(&mut self) {
        log::trace!("cue: success");
    }

    fn error(&mut self) {
        log::trace!("cue: error");
    }

    fn fanfare(&mut self) {
        log::trace!("cue: fanfare");
    }

    fn set_background_mode(&mut self, mode: BgmMode) {
        if self.background != Some(mode) {
            log::debug!("background music: {:?}", mode);
            self.background = Some(mode);
        }
    }

    fn stop_background_mode(&mut self) {
        if self.background.take().is_some() {
            log::debug!("background music stopped");
        }
    }
}

/// Sink that records every cue. Clones share the same log, so a host can keep
/// one handle and give the other to the controller.
#[derive(Debug, Clone, Default)]
pub struct CueLog {
    cues: Rc<RefCell<Vec<Cue>>>,
}

impl CueLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn cues(&self) -> Vec<Cue> {
        self.cues.borrow().clone()
    }

    /// How many times `cue` was fired
    pub fn count(&self, cue: Cue) -> usize {
        self.cues.borrow().iter().filter(|c| **c == cue).count()
    }

    pub fn last(&self) -> Option<Cue> {
        self.cues.borrow().last().copied()
    }

    pub fn clear(&self) {
        self.cues.borrow_mut().clear();
    }

    fn push(&self, cue: Cue) {
        self.cues.borrow_mut().push(cue);
    }
}

impl AudioSink for CueLog {
    fn click(&mut self) {
        self.push(Cue::Click);
    }

    fn success(&mut self) {
        self.push(Cue::Success);
    }

    fn error(&mut self) {
        self.push(Cue::Error);
    }

    fn fanfare(&mut self) {
        self.push(Cue::Fanfare);
    }

    fn set_background_mode(&mut self, mode: BgmMode) {
        self.push(Cue::Background(mode));
    }

    fn stop_background_mode(&mut self) {
        self.push(Cue::StopBackground);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_log_shares_history_between_clones() {
        let log = CueLog::new();
        let mut sink: Box<dyn AudioSink> = Box::new(log.clone());

        sink.click();
        sink.success();
        sink.success();
        sink.set_background_mode(BgmMode::Game);

        assert_eq!(log.count(Cue::Success), 2);
        assert_eq!(log.last(), Some(Cue::Background(BgmMode::Game)));
        log.clear();
        assert!(log.cues().is_empty());
    }

    #[test]
    fn test_log_audio_tracks_background() {
        let mut sink = LogAudio::new();
        sink.set_background_mode(BgmMode::Intro);
        assert_eq!(sink.background(), Some(BgmMode::Intro));
        sink.stop_background_mode();
        assert_eq!(sink.background(), None);
    }
}
