//! Session controller
//!
//! Owns the running [`GameState`] together with the things that outlive a
//! single run: settings, the high score and the storage they live in.

use glam::Vec2;

use crate::HighScore;
use crate::format_clock;
use crate::persistence::Storage;
use crate::settings::Settings;
use crate::sim::{Difficulty, GameEvent, GamePhase, GameState, TickInput, tick};

/// Score line for the HUD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    /// Kill score plus time bonus
    pub score: u64,
    pub high_score: u64,
    pub level: u32,
    /// Elapsed play time as `MM:SS`
    pub time: String,
    pub combo: u32,
}

impl Hud {
    /// Score text, with the combo shown once it is worth anything
    pub fn score_text(&self) -> String {
        if self.combo > 1 {
            format!("{} x{}", self.score, self.combo)
        } else {
            self.score.to_string()
        }
    }
}

/// Results of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalStats {
    pub score: u64,
    pub best: u64,
    pub level: u32,
    pub time: String,
    pub new_high_score: bool,
}

/// A game session bound to a storage backend
pub struct Game<S: Storage> {
    state: GameState,
    settings: Settings,
    high_score: HighScore,
    storage: S,
    final_stats: Option<FinalStats>,
}

impl<S: Storage> Game<S> {
    /// Load settings and high score from `storage` and start a run
    pub fn new(storage: S, bounds: Vec2, seed: u64, now_ms: f64) -> Self {
        let settings = Settings::load(&storage);
        let high_score = HighScore::load(&storage);
        let mut state = GameState::new(seed, bounds, settings.difficulty, now_ms);
        state.particles_enabled = settings.particles;

        log::info!(
            "New game: seed {}, difficulty {}, best {}",
            seed,
            settings.difficulty.as_str(),
            high_score.best
        );

        Self {
            state,
            settings,
            high_score,
            storage,
            final_stats: None,
        }
    }

    /// Read-only view for the renderer
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable state (for testing)
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Stats of the run that just ended
    pub fn final_stats(&self) -> Option<&FinalStats> {
        self.final_stats.as_ref()
    }

    /// Advance one frame; finishes the run if the ship was destroyed
    pub fn tick(&mut self, input: &TickInput, now_ms: f64) {
        let was_running = self.state.phase == GamePhase::Running;
        tick(&mut self.state, input, now_ms);
        if was_running && self.state.phase == GamePhase::GameOver {
            self.finish();
        }
    }

    /// Fire outside the tick (key-down handler); ignored unless running
    pub fn shoot(&mut self) -> bool {
        self.state.fire()
    }

    pub fn toggle_pause(&mut self, now_ms: f64) {
        self.state.toggle_pause(now_ms);
        log::info!("Phase: {:?}", self.state.phase);
    }

    pub fn resume(&mut self, now_ms: f64) {
        self.state.resume(now_ms);
    }

    /// Start a fresh run with the currently stored settings
    pub fn restart(&mut self, now_ms: f64) {
        self.settings = Settings::load(&self.storage);
        self.state.particles_enabled = self.settings.particles;
        self.state.restart(self.settings.difficulty, now_ms);
        self.final_stats = None;
        log::info!(
            "Game restarted ({})",
            self.settings.difficulty.as_str()
        );
    }

    /// Change difficulty mid-run and persist it
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.settings.difficulty = difficulty;
        self.settings.save(&mut self.storage);
        self.state.set_difficulty(difficulty);
    }

    /// Replace all settings, persist them and apply what affects the run
    pub fn apply_settings(&mut self, settings: Settings) {
        let difficulty_changed = settings.difficulty != self.settings.difficulty;
        self.settings = settings;
        self.settings.save(&mut self.storage);
        self.state.particles_enabled = self.settings.particles;
        if !self.settings.particles {
            self.state.particles.clear();
        }
        if difficulty_changed {
            self.state.set_difficulty(self.settings.difficulty);
        }
    }

    pub fn resize(&mut self, bounds: Vec2) {
        self.state.resize(bounds);
    }

    /// Drain pending audio events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.state.take_events()
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.state.total_score(),
            high_score: self.high_score.best,
            level: self.state.score.level,
            time: format_clock(self.state.elapsed_ms),
            combo: self.state.score.combo,
        }
    }

    fn finish(&mut self) {
        let score = self.state.total_score();
        let new_high_score = self.high_score.submit(score);
        if new_high_score {
            self.high_score.save(&mut self.storage);
            log::info!("New high score: {score}");
        }

        let stats = FinalStats {
            score,
            best: self.high_score.best,
            level: self.state.score.level,
            time: format_clock(self.state.elapsed_ms),
            new_high_score,
        };
        log::info!("Game over: {:?}", stats);
        self.final_stats = Some(stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::persistence::MemoryStorage;

    /// A backend that is never reachable
    struct UnavailableStorage;

    impl Storage for UnavailableStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::StorageUnavailable)
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::StorageUnavailable)
        }
    }

    fn bounds() -> Vec2 {
        Vec2::new(800.0, 600.0)
    }

    #[test]
    fn test_new_reads_storage() {
        let mut store = MemoryStorage::new();
        let mut settings = Settings::default();
        settings.difficulty = Difficulty::Easy;
        settings.particles = false;
        settings.save(&mut store);
        HighScore::new(777).save(&mut store);

        let game = Game::new(store, bounds(), 1, 0.0);
        assert_eq!(game.state().asteroids.len(), 3);
        assert!(!game.state().particles_enabled);
        assert_eq!(game.high_score(), 777);
        assert_eq!(game.hud().high_score, 777);
    }

    #[test]
    fn test_hud_text() {
        let hud = Hud {
            score: 120,
            high_score: 0,
            level: 1,
            time: "00:05".to_string(),
            combo: 3,
        };
        assert_eq!(hud.score_text(), "120 x3");
        let hud = Hud { combo: 1, ..hud };
        assert_eq!(hud.score_text(), "120");
    }

    #[test]
    fn test_set_difficulty_persists() {
        let mut game = Game::new(MemoryStorage::new(), bounds(), 1, 0.0);
        game.set_difficulty(Difficulty::Hard);
        assert_eq!(game.state().asteroids.len(), 7);
        assert_eq!(Settings::load(game.storage()).difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_apply_settings_toggles_particles() {
        let mut game = Game::new(MemoryStorage::new(), bounds(), 1, 0.0);
        let pos = game.state().asteroids[0].pos;
        game.state_mut().spawn_explosion(pos, 40.0);
        assert!(!game.state().particles.is_empty());

        let settings = Settings {
            particles: false,
            ..Settings::default()
        };
        game.apply_settings(settings);
        assert!(game.state().particles.is_empty());
        assert!(!game.state().particles_enabled);
        assert_eq!(game.state().asteroids.len(), 5);
    }

    #[test]
    fn test_restart_clears_final_stats() {
        let mut game = Game::new(MemoryStorage::new(), bounds(), 1, 0.0);
        let ship = game.state().ship.pos;
        game.state_mut().asteroids[0].pos = ship;
        game.tick(&TickInput::default(), 16.0);
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert!(game.final_stats().is_some());
        assert!(!game.shoot());

        game.restart(20_000.0);
        assert_eq!(game.phase(), GamePhase::Running);
        assert!(game.final_stats().is_none());
        assert_eq!(game.hud().score, 0);
    }

    #[test]
    fn test_restart_reports_the_settings_it_applied() {
        let mut game = Game::new(UnavailableStorage, bounds(), 1, 0.0);
        game.apply_settings(Settings {
            difficulty: Difficulty::Hard,
            ..Settings::default()
        });
        assert_eq!(game.settings().difficulty, Difficulty::Hard);

        // Nothing was persisted, so the restart falls back to defaults
        game.restart(1000.0);
        assert_eq!(game.settings(), &Settings::default());
        assert_eq!(game.state().difficulty, game.settings().difficulty);
        assert_eq!(game.state().asteroids.len(), 5);
        assert!(!game.state().ship.boost_active());
    }
}
