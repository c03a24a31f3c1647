//! Classroom override
//!
//! Typing the shared secret unlocks a panel that jumps straight to any
//! level. Plain string comparison, nothing more.

use super::controller::{GameController, GamePhase};
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct AdminGate {
    secret: String,
    unlocked: bool,
    entered: String,
}

impl AdminGate {
    pub fn new(settings: &Settings) -> Self {
        Self {
            secret: settings.admin_secret.clone(),
            unlocked: false,
            entered: String::new(),
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Text typed into the secret field so far
    pub fn entered(&self) -> &str {
        &self.entered
    }

    /// Replace the secret field contents
    pub fn input(&mut self, text: &str) {
        self.entered.clear();
        self.entered.push_str(text);
    }

    /// Check the entered text. The field is cleared either way.
    pub fn submit(&mut self) -> bool {
        let ok = self.entered == self.secret;
        self.entered.clear();
        if ok {
            self.unlocked = true;
            log::info!("Admin panel unlocked");
        } else {
            log::warn!("Wrong admin secret");
        }
        ok
    }

    /// Convenience for `input` + `submit`
    pub fn enter(&mut self, text: &str) -> bool {
        self.input(text);
        self.submit()
    }

    pub fn lock(&mut self) {
        self.unlocked = false;
        self.entered.clear();
    }

    /// Jump the game to `index`. From the welcome screen a new run is started
    /// first. Requires the gate to be unlocked.
    pub fn jump(&self, game: &mut GameController, index: usize) -> bool {
        if !self.unlocked {
            return false;
        }
        if game.phase() == GamePhase::Welcome {
            game.start_game();
        }
        game.jump_to_level(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::LogAudio;
    use crate::settings::DEFAULT_ADMIN_SECRET;

    fn game() -> GameController {
        GameController::new(1, Box::new(LogAudio::new()))
    }

    #[test]
    fn test_wrong_secret_stays_locked() {
        let mut gate = AdminGate::new(&Settings::default());
        for guess in ["", "keyma", "KEYMA-ADMIN", " keyma-admin"] {
            assert!(!gate.enter(guess));
        }
        assert!(!gate.is_unlocked());
        assert_eq!(gate.entered(), "");
    }

    #[test]
    fn test_jump_requires_unlock() {
        let gate = AdminGate::new(&Settings::default());
        let mut game = game();
        game.start_game();
        assert!(!gate.jump(&mut game, 3));
        assert_eq!(game.level_index(), 0);
    }

    #[test]
    fn test_unlocked_jump_from_welcome_starts_game() {
        let mut gate = AdminGate::new(&Settings::default());
        assert!(gate.enter(DEFAULT_ADMIN_SECRET));

        let mut game = game();
        assert!(gate.jump(&mut game, 5));
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.level_index(), 5);
        assert_eq!(game.score(), 0);

        assert!(!gate.jump(&mut game, 6));
        assert_eq!(game.level_index(), 5);
    }

    #[test]
    fn test_configured_secret_and_lock() {
        let settings = Settings {
            admin_secret: "sesame".into(),
            ..Settings::default()
        };
        let mut gate = AdminGate::new(&settings);
        assert!(!gate.enter(DEFAULT_ADMIN_SECRET));
        gate.input("sesame");
        assert_eq!(gate.entered(), "sesame");
        assert!(gate.submit());

        gate.lock();
        assert!(!gate.is_unlocked());
        let mut game = game();
        assert!(!gate.jump(&mut game, 2));
    }

    #[test]
    fn test_jump_ignored_on_result_screen() {
        let mut gate = AdminGate::new(&Settings::default());
        gate.enter(DEFAULT_ADMIN_SECRET);
        let mut game = game();
        game.start_game();
        game.jump_to_level(5);
        game.on_level_complete(0);
        assert_eq!(game.phase(), GamePhase::Result);

        assert!(!gate.jump(&mut game, 1));
        assert_eq!(game.phase(), GamePhase::Result);
    }
}
