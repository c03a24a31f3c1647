//! Game controller
//!
//! Owns the session (phase, level index, score), the one mounted challenge,
//! the seeded RNG and the audio sink. Challenges never see the session; they
//! hand back points and the controller does the bookkeeping.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::challenge::{Challenge, ChallengeInput};
use super::intro::Intro;
use super::typing::Layout;
use crate::audio::{AudioSink, BgmMode};
use crate::catalog::{self, LEVELS, LevelDefinition};
use crate::consts::*;
use crate::settings::Settings;

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Intro and start menu
    Welcome,
    /// A level is mounted
    Playing,
    /// All six levels cleared
    Result,
}

/// Progress through one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub phase: GamePhase,
    /// Always a valid index into `LEVELS`
    pub level_index: usize,
    pub score: u32,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            phase: GamePhase::Welcome,
            level_index: 0,
            score: 0,
        }
    }
}

pub struct GameController {
    session: GameSession,
    /// Mounted only while `Playing`
    challenge: Option<Challenge>,
    intro: Intro,
    rng: Pcg32,
    audio: Box<dyn AudioSink>,
}

impl GameController {
    pub fn new(seed: u64, audio: Box<dyn AudioSink>) -> Self {
        log::info!("Game controller seeded with {}", seed);
        Self {
            session: GameSession::default(),
            challenge: None,
            intro: Intro::new(),
            rng: Pcg32::seed_from_u64(seed),
            audio,
        }
    }

    /// Use the configured seed if there is one, else `fallback_seed`
    pub fn from_settings(settings: &Settings, fallback_seed: u64, audio: Box<dyn AudioSink>) -> Self {
        Self::new(settings.seed.unwrap_or(fallback_seed), audio)
    }

    pub fn session(&self) -> GameSession {
        self.session
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn level_index(&self) -> usize {
        self.session.level_index
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    /// Definition of the current level
    pub fn level(&self) -> &'static LevelDefinition {
        catalog::level(self.session.level_index).unwrap_or(&LEVELS[LEVELS.len() - 1])
    }

    pub fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }

    pub fn intro(&self) -> &Intro {
        &self.intro
    }

    /// Tasks still scheduled by the mounted challenge
    pub fn live_tasks(&self) -> usize {
        self.challenge.as_ref().map_or(0, Challenge::live_tasks)
    }

    /// Click through the welcome narrative
    pub fn advance_intro(&mut self) {
        if self.session.phase == GamePhase::Welcome {
            self.intro.advance(self.audio.as_mut());
        }
    }

    /// New run from level 0 with a zero score
    pub fn start_game(&mut self) {
        self.audio.fanfare();
        self.audio.set_background_mode(BgmMode::Game);
        self.session = GameSession {
            phase: GamePhase::Playing,
            level_index: 0,
            score: 0,
        };
        self.mount();
        log::info!("Game started");
    }

    /// Back to the welcome screen. Score and index are reset by the next
    /// `start_game`.
    pub fn restart(&mut self) {
        self.audio.click();
        self.unmount();
        self.session.phase = GamePhase::Welcome;
        self.intro = Intro::new();
        log::info!("Returned to welcome screen");
    }

    /// Direct jump to a level. Only while playing and only for a valid
    /// index; score and phase are untouched. Jumping to the current level
    /// keeps the mounted challenge and its progress.
    pub fn jump_to_level(&mut self, index: usize) -> bool {
        if self.session.phase != GamePhase::Playing || index >= catalog::level_count() {
            log::debug!("Ignoring jump to level {}", index);
            return false;
        }
        if index == self.session.level_index {
            return true;
        }
        self.session.level_index = index;
        self.mount();
        log::info!("Jumped to level {}", index + 1);
        true
    }

    /// Book the points of a finished level and move on
    pub fn on_level_complete(&mut self, points: u32) {
        if self.session.phase != GamePhase::Playing {
            return;
        }
        self.unmount();
        self.audio.fanfare();
        self.session.score = self.session.score.saturating_add(points);
        log::info!(
            "Level {} cleared for {} points (total {})",
            self.session.level_index + 1,
            points,
            self.session.score
        );

        if self.session.level_index + 1 < catalog::level_count() {
            self.session.level_index += 1;
            self.mount();
        } else {
            self.session.phase = GamePhase::Result;
            self.audio.set_background_mode(BgmMode::Game);
            log::info!("All levels cleared, final score {}", self.session.score);
        }
    }

    /// Feed player input to the mounted challenge
    pub fn handle_input(&mut self, input: ChallengeInput) {
        let Some(challenge) = self.challenge.as_mut() else {
            return;
        };
        if let Some(points) = challenge.handle_input(&input, &mut self.rng, self.audio.as_mut()) {
            self.on_level_complete(points);
        }
    }

    /// Switch the typing level's keyboard layout. Ignored on other levels.
    pub fn set_typing_layout(&mut self, layout: Layout) {
        if let Some(Challenge::Typing(typing)) = self.challenge.as_mut() {
            typing.set_layout(layout);
        }
    }

    /// Advance virtual time by one frame, clamped to `MAX_FRAME_MS`
    pub fn tick(&mut self, dt_ms: u64) {
        let dt = dt_ms.min(MAX_FRAME_MS);
        match self.session.phase {
            GamePhase::Welcome => self.intro.tick(dt),
            GamePhase::Playing => {
                let done = self
                    .challenge
                    .as_mut()
                    .and_then(|c| c.tick(dt, &mut self.rng));
                if let Some(points) = done {
                    self.on_level_complete(points);
                }
            }
            GamePhase::Result => {}
        }
    }

    /// Replace whatever is mounted with a fresh challenge for the current level
    fn mount(&mut self) {
        self.unmount();
        let mut challenge = Challenge::for_level(self.level().kind, &mut self.rng);
        challenge.start();
        self.challenge = Some(challenge);
        log::debug!("Mounted level {}: {}", self.level().id, self.level().title);
    }

    fn unmount(&mut self) {
        if let Some(mut challenge) = self.challenge.take() {
            challenge.teardown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{Cue, CueLog};
    use crate::catalog::LevelKind;
    use crate::sim::clipboard::SPELL_WORD;
    use crate::sim::filesystem::MASTER_CHIP;
    use crate::sim::intro::IntroStage;
    use crate::sim::judgment::SCENARIOS;
    use proptest::prelude::*;

    fn controller() -> (GameController, CueLog) {
        let log = CueLog::new();
        (GameController::new(42, Box::new(log.clone())), log)
    }

    fn playing() -> (GameController, CueLog) {
        let (mut game, log) = controller();
        game.start_game();
        log.clear();
        (game, log)
    }

    /// Type whatever is on screen until the level reports completion
    fn clear_typing(game: &mut GameController) {
        let start = game.level_index();
        while game.level_index() == start {
            game.tick(MAX_FRAME_MS);
            let glyph = match game.challenge() {
                Some(Challenge::Typing(t)) => t.symbols().first().map(|s| s.glyph),
                _ => None,
            };
            if let Some(glyph) = glyph {
                game.handle_input(ChallengeInput::Key(glyph.to_string()));
            }
        }
    }

    fn clear_filesystem(game: &mut GameController) {
        let Some(Challenge::FileSystem(fs)) = game.challenge() else {
            panic!("not on the folder level");
        };
        let treasure = fs.treasure();
        let parent = ["📂 시스템_코어", "📂 보관용_서버", "📂 관리자_실"]
            .into_iter()
            .find(|folder| {
                let mut peek = fs.clone();
                let mut silent = CueLog::new();
                peek.open(folder, &mut silent);
                peek.contents().contains(&treasure)
            })
            .unwrap();
        game.handle_input(ChallengeInput::Open(parent.into()));
        game.handle_input(ChallengeInput::Open(treasure.into()));
        game.handle_input(ChallengeInput::Open(MASTER_CHIP.into()));
    }

    #[test]
    fn test_starts_on_welcome_without_challenge() {
        let (game, _) = controller();
        assert_eq!(game.phase(), GamePhase::Welcome);
        assert!(game.challenge().is_none());
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_start_game_mounts_first_level() {
        let (mut game, log) = controller();
        game.start_game();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.level_index(), 0);
        assert!(matches!(game.challenge(), Some(Challenge::Pointer(_))));
        assert_eq!(
            log.cues(),
            vec![Cue::Fanfare, Cue::Background(BgmMode::Game)]
        );
    }

    #[test]
    fn test_intro_runs_only_on_welcome() {
        let (mut game, log) = controller();
        for _ in 0..(BOOT_DELAY_MS / MAX_FRAME_MS) {
            game.tick(MAX_FRAME_MS);
        }
        assert_eq!(game.intro().stage(), IntroStage::Distress);
        for _ in 0..5 {
            game.advance_intro();
        }
        assert_eq!(game.intro().stage(), IntroStage::Menu);
        assert_eq!(log.count(Cue::Click), 5);

        game.start_game();
        game.advance_intro();
        assert_eq!(log.count(Cue::Click), 5);
    }

    #[test]
    fn test_frame_time_is_clamped() {
        let (mut game, _) = controller();
        // A single long frame counts as MAX_FRAME_MS
        game.tick(BOOT_DELAY_MS * 10);
        assert_eq!(game.intro().stage(), IntroStage::Booting);
    }

    #[test]
    fn test_completion_advances_level() {
        let (mut game, log) = playing();
        for _ in 0..POINTER_HITS_REQUIRED {
            game.handle_input(ChallengeInput::Hit);
        }
        assert_eq!(game.level_index(), 1);
        assert_eq!(game.score(), POINTER_REWARD);
        assert_eq!(log.count(Cue::Fanfare), 1);
        assert!(matches!(game.challenge(), Some(Challenge::Typing(t)) if t.layout() == Layout::Korean));
        assert_eq!(game.live_tasks(), 2);
    }

    #[test]
    fn test_jump_replaces_challenge_and_keeps_score() {
        let (mut game, _) = playing();
        game.on_level_complete(200);
        assert_eq!(game.live_tasks(), 2);

        assert!(game.jump_to_level(4));
        assert_eq!(game.level().kind, LevelKind::FileSystem);
        assert_eq!(game.score(), 200);
        assert_eq!(game.phase(), GamePhase::Playing);
        // Typing tasks went away with the old challenge
        assert_eq!(game.live_tasks(), 0);

        assert!(!game.jump_to_level(LEVELS.len()));
        assert_eq!(game.level_index(), 4);
    }

    #[test]
    fn test_jump_to_current_level_keeps_progress() {
        let (mut game, _) = playing();
        for _ in 0..POINTER_HITS_REQUIRED - 1 {
            game.handle_input(ChallengeInput::Hit);
        }
        assert!(game.jump_to_level(0));
        assert!(matches!(game.challenge(), Some(Challenge::Pointer(p)) if p.hits() == 9));

        game.handle_input(ChallengeInput::Hit);
        assert_eq!(game.level_index(), 1);
        assert_eq!(game.score(), POINTER_REWARD);
    }

    #[test]
    fn test_configured_seed_overrides_fallback() {
        let settings = Settings {
            seed: Some(7),
            ..Settings::default()
        };
        let treasure = |fallback| {
            let mut game =
                GameController::from_settings(&settings, fallback, Box::new(CueLog::new()));
            game.start_game();
            game.jump_to_level(4);
            match game.challenge() {
                Some(Challenge::FileSystem(fs)) => fs.treasure(),
                _ => panic!("not on the folder level"),
            }
        };
        assert_eq!(treasure(1), treasure(99));
        let unseeded = GameController::from_settings(&Settings::default(), 3, Box::new(CueLog::new()));
        assert_eq!(unseeded.level().id, LEVELS[0].id);
    }

    #[test]
    fn test_jump_ignored_outside_playing() {
        let (mut game, _) = controller();
        assert!(!game.jump_to_level(3));
        assert_eq!(game.level_index(), 0);
        assert!(game.challenge().is_none());
    }

    #[test]
    fn test_stale_typing_tasks_never_complete_next_level() {
        let (mut game, _) = playing();
        game.jump_to_level(2);
        clear_typing(&mut game);
        assert_eq!(game.level_index(), 3);
        assert_eq!(game.score(), TYPING_REWARD);

        // Plenty of time for any leftover task to misfire
        for _ in 0..100 {
            game.tick(MAX_FRAME_MS);
        }
        assert_eq!(game.level_index(), 3);
        assert_eq!(game.score(), TYPING_REWARD);
    }

    #[test]
    fn test_layout_switch_only_on_typing_levels() {
        let (mut game, _) = playing();
        game.set_typing_layout(Layout::English);
        assert!(matches!(game.challenge(), Some(Challenge::Pointer(_))));

        game.jump_to_level(1);
        game.set_typing_layout(Layout::English);
        assert!(matches!(game.challenge(), Some(Challenge::Typing(t)) if t.layout() == Layout::English));
        assert_eq!(game.live_tasks(), 2);
    }

    #[test]
    fn test_restart_resets_on_next_start() {
        let (mut game, log) = playing();
        game.on_level_complete(100);
        game.restart();
        assert_eq!(game.phase(), GamePhase::Welcome);
        assert!(game.challenge().is_none());
        assert_eq!(log.last(), Some(Cue::Click));

        game.start_game();
        assert_eq!(game.score(), 0);
        assert_eq!(game.level_index(), 0);
    }

    #[test]
    fn test_full_playthrough() {
        let (mut game, log) = playing();

        for _ in 0..POINTER_HITS_REQUIRED {
            game.handle_input(ChallengeInput::Hit);
        }
        clear_typing(&mut game);
        clear_typing(&mut game);
        assert_eq!(game.level_index(), 3);

        for _ in 0..PASTES_REQUIRED {
            game.handle_input(ChallengeInput::Paste(SPELL_WORD.into()));
        }
        assert_eq!(game.level_index(), 4);

        clear_filesystem(&mut game);
        assert_eq!(game.level_index(), 5);

        // Answer the quiz correctly except for the first scenario
        for (i, scenario) in SCENARIOS.iter().enumerate() {
            let claim = if i == 0 { !scenario.acceptable } else { scenario.acceptable };
            game.handle_input(ChallengeInput::Choice(claim));
            for _ in 0..(FEEDBACK_DELAY_MS / MAX_FRAME_MS) {
                game.tick(MAX_FRAME_MS);
            }
        }

        assert_eq!(game.phase(), GamePhase::Result);
        assert!(game.challenge().is_none());
        assert_eq!(game.score(), 200 + 200 + 200 + 100 + 300 + 7 * 50);
        assert_eq!(log.count(Cue::Fanfare), 6 + 1);
        assert_eq!(log.last(), Some(Cue::Background(BgmMode::Game)));

        // Nothing moves once the run is over
        game.on_level_complete(500);
        game.tick(MAX_FRAME_MS);
        assert_eq!(game.score(), 1350);
    }

    proptest! {
        #[test]
        fn prop_score_is_sum_of_rewards(points in prop::collection::vec(0u32..1000, 0..6)) {
            let (mut game, _) = playing();
            for p in &points {
                game.on_level_complete(*p);
            }
            prop_assert_eq!(game.score(), points.iter().sum::<u32>());
            prop_assert_eq!(game.level_index(), points.len().min(LEVELS.len() - 1));
        }

        #[test]
        fn prop_jump_only_accepts_valid_index(index in 0usize..20, score in 0u32..1000) {
            let (mut game, _) = playing();
            game.on_level_complete(score);
            let before = game.session();

            let jumped = game.jump_to_level(index);
            prop_assert_eq!(jumped, index < LEVELS.len());
            let after = game.session();
            prop_assert_eq!(after.score, before.score);
            prop_assert_eq!(after.phase, before.phase);
            if jumped {
                prop_assert_eq!(after.level_index, index);
            } else {
                prop_assert_eq!(after, before);
            }
        }
    }
}
