//! Game state and core simulation types
//!
//! Everything a running session needs lives in [`GameState`]. The frontend
//! only ever reads it between ticks.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::asteroid::{Asteroid, AsteroidSize};
use super::difficulty::{self, Difficulty};
use crate::consts::*;
use crate::{heading_vector, wrap_position};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// Ship destroyed, waiting for restart
    GameOver,
}

/// Fire-and-forget notifications for the audio frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Shoot,
    Explosion,
    /// Ship hit an asteroid
    Hit,
    Thrust,
    /// Consecutive hit; `level` is the raw combo count
    Combo { level: u32 },
    LevelUp { level: u32 },
    PowerUp,
}

/// Ship controls held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShipControls {
    pub turn_left: bool,
    pub turn_right: bool,
    pub thrust: bool,
}

/// Temporary thrust boost
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boost {
    /// Game time (ms) at which the boost ends
    pub expires_at_ms: f64,
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading (radians, 0 = +x, screen coordinates)
    pub angle: f32,
    pub radius: f32,
    /// Current thrust acceleration
    pub thrust: f32,
    /// Thrust of the current difficulty tier
    pub base_thrust: f32,
    pub friction: f32,
    pub boost: Option<Boost>,
}

impl Ship {
    pub fn new(pos: Vec2, base_thrust: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            radius: SHIP_RADIUS,
            thrust: base_thrust,
            base_thrust,
            friction: SHIP_FRICTION,
            boost: None,
        }
    }

    /// Apply one tick of controls, friction and movement
    pub fn update(&mut self, controls: &ShipControls, bounds: Vec2) {
        if controls.turn_left {
            self.angle -= SHIP_TURN_RATE;
        }
        if controls.turn_right {
            self.angle += SHIP_TURN_RATE;
        }
        if controls.thrust {
            self.vel += heading_vector(self.angle) * self.thrust;
        }

        self.vel *= self.friction;
        self.pos = wrap_position(self.pos + self.vel, bounds);
    }

    /// A projectile leaving the nose. The caller decides whether firing is allowed.
    pub fn shoot(&self) -> Projectile {
        let dir = heading_vector(self.angle);
        Projectile::new(self.pos + dir * SHIP_NOSE_OFFSET, dir * PROJECTILE_SPEED)
    }

    /// Raise thrust until `now_ms + duration_ms`
    pub fn grant_boost(&mut self, thrust: f32, now_ms: f64, duration_ms: f64) {
        self.thrust = thrust;
        self.boost = Some(Boost {
            expires_at_ms: now_ms + duration_ms,
        });
    }

    /// Drop a boost once its full duration has passed. Returns true if one expired.
    pub fn expire_boost(&mut self, now_ms: f64) -> bool {
        match self.boost {
            Some(boost) if now_ms > boost.expires_at_ms => {
                self.boost = None;
                self.thrust = self.base_thrust;
                true
            }
            _ => false,
        }
    }

    pub fn boost_active(&self) -> bool {
        self.boost.is_some()
    }

    /// Switch tiers without cancelling an active boost
    pub fn set_base_thrust(&mut self, thrust: f32) {
        self.base_thrust = thrust;
        if self.boost.is_none() {
            self.thrust = thrust;
        }
    }
}

/// A bullet
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks left before it fizzles
    pub life: u32,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            life: PROJECTILE_LIFE,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.life = self.life.saturating_sub(1);
    }

    /// Still alive and strictly inside the play area
    pub fn is_live(&self, bounds: Vec2) -> bool {
        self.life > 0
            && self.pos.x > 0.0
            && self.pos.x < bounds.x
            && self.pos.y > 0.0
            && self.pos.y < bounds.y
    }
}

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: u32,
    /// Hue in degrees (render only)
    pub hue: f32,
}

impl Particle {
    pub fn new<R: Rng>(pos: Vec2, rng: &mut R) -> Self {
        Self {
            pos,
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * PARTICLE_SPEED,
                (rng.random::<f32>() - 0.5) * PARTICLE_SPEED,
            ),
            life: PARTICLE_LIFE,
            hue: 10.0 + rng.random::<f32>() * 60.0,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel *= PARTICLE_DRAG;
        self.life = self.life.saturating_sub(1);
    }

    /// Remaining life in 0-1 (for fading)
    pub fn alpha(&self) -> f32 {
        self.life as f32 / PARTICLE_LIFE as f32
    }
}

/// Kill score, combo and level
#[derive(Debug, Clone)]
pub struct ScoreState {
    /// Points from destroyed asteroids
    pub kills: u64,
    /// Consecutive hits inside the combo window
    pub combo: u32,
    /// Game time (ms) of the last hit
    pub last_hit_ms: f64,
    pub level: u32,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self {
            kills: 0,
            combo: 0,
            last_hit_ms: 0.0,
            level: 1,
        }
    }
}

impl ScoreState {
    /// Count a hit and award its points. Returns the points awarded.
    pub fn register_hit(&mut self, size: AsteroidSize, now_ms: f64) -> u64 {
        self.combo += 1;
        self.last_hit_ms = now_ms;
        let points = size.points() * u64::from(self.combo.min(MAX_COMBO_MULTIPLIER));
        self.kills += points;
        points
    }

    /// Reset the combo once the hit-free window has passed
    pub fn expire_combo(&mut self, now_ms: f64) {
        if now_ms - self.last_hit_ms > COMBO_WINDOW_MS {
            self.combo = 0;
        }
    }
}

/// Wall-clock bookkeeping with paused time removed
#[derive(Debug, Clone, Copy)]
pub struct GameClock {
    start_ms: f64,
    paused_total_ms: f64,
    paused_at_ms: Option<f64>,
}

impl GameClock {
    pub fn new(now_ms: f64) -> Self {
        Self {
            start_ms: now_ms,
            paused_total_ms: 0.0,
            paused_at_ms: None,
        }
    }

    /// Milliseconds of unpaused play at wall-clock `now_ms`
    pub fn game_time(&self, now_ms: f64) -> f64 {
        let now = self.paused_at_ms.unwrap_or(now_ms);
        (now - self.start_ms - self.paused_total_ms).max(0.0)
    }

    pub fn pause(&mut self, now_ms: f64) {
        if self.paused_at_ms.is_none() {
            self.paused_at_ms = Some(now_ms);
        }
    }

    pub fn resume(&mut self, now_ms: f64) {
        if let Some(at) = self.paused_at_ms.take() {
            self.paused_total_ms += (now_ms - at).max(0.0);
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Random source for spawns, outlines and particles
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Play area size
    pub bounds: Vec2,
    pub difficulty: Difficulty,
    pub ship: Ship,
    pub asteroids: Vec<Asteroid>,
    pub projectiles: Vec<Projectile>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Whether explosions spawn particles
    pub particles_enabled: bool,
    pub score: ScoreState,
    pub clock: GameClock,
    /// Game time (ms) as of the last running tick
    pub elapsed_ms: f64,
    /// Pending events for audio (drained by the frontend)
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with the given seed, starting at wall-clock `now_ms`
    pub fn new(seed: u64, bounds: Vec2, difficulty: Difficulty, now_ms: f64) -> Self {
        Self::with_rng(seed, Pcg32::seed_from_u64(seed), bounds, difficulty, now_ms)
    }

    fn with_rng(seed: u64, rng: Pcg32, bounds: Vec2, difficulty: Difficulty, now_ms: f64) -> Self {
        debug_assert!(bounds.x > 0.0 && bounds.y > 0.0, "play area must be non-empty");

        let mut state = Self {
            seed,
            rng,
            phase: GamePhase::Running,
            bounds,
            difficulty,
            ship: Ship::new(bounds / 2.0, difficulty.thrust()),
            asteroids: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            particles_enabled: true,
            score: ScoreState::default(),
            clock: GameClock::new(now_ms),
            elapsed_ms: 0.0,
            events: Vec::new(),
        };

        difficulty::spawn_large(
            &mut state.asteroids,
            difficulty.initial_asteroid_count(),
            state.bounds,
            state.ship.pos,
            &mut state.rng,
        );

        state
    }

    /// Full reset for a new run; a hard-difficulty restart grants a thrust boost
    pub fn restart(&mut self, difficulty: Difficulty, now_ms: f64) {
        let particles_enabled = self.particles_enabled;
        let rng = self.rng.clone();
        *self = Self::with_rng(self.seed, rng, self.bounds, difficulty, now_ms);
        self.particles_enabled = particles_enabled;

        if let Some(thrust) = difficulty.restart_boost() {
            self.ship.grant_boost(thrust, 0.0, BOOST_DURATION_MS);
            self.events.push(GameEvent::PowerUp);
        }
    }

    /// Time bonus: points per whole elapsed second
    pub fn time_bonus(&self) -> u64 {
        (self.elapsed_ms / 1000.0).floor() as u64 * TIME_BONUS_PER_SECOND
    }

    /// Kill score plus time bonus
    pub fn total_score(&self) -> u64 {
        self.score.kills + self.time_bonus()
    }

    /// Fire a projectile; ignored unless running
    pub fn fire(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.projectiles.push(self.ship.shoot());
        self.events.push(GameEvent::Shoot);
        true
    }

    /// Running <-> Paused. Ignored after game over.
    pub fn toggle_pause(&mut self, now_ms: f64) {
        match self.phase {
            GamePhase::Running => {
                self.phase = GamePhase::Paused;
                self.clock.pause(now_ms);
            }
            GamePhase::Paused => self.resume(now_ms),
            GamePhase::GameOver => {}
        }
    }

    /// Paused -> Running
    pub fn resume(&mut self, now_ms: f64) {
        if self.phase == GamePhase::Paused {
            self.clock.resume(now_ms);
            self.phase = GamePhase::Running;
        }
    }

    /// Apply a new difficulty mid-run without teleporting anything
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.ship.set_base_thrust(difficulty.thrust());
        difficulty::rescale_speeds(&mut self.asteroids, difficulty);
        difficulty::adjust_population(
            &mut self.asteroids,
            difficulty,
            self.bounds,
            self.ship.pos,
            &mut self.rng,
        );
        log::debug!(
            "Difficulty -> {} ({} asteroids)",
            difficulty.as_str(),
            self.asteroids.len()
        );
    }

    /// Resize the play area, keeping the ship on the torus
    pub fn resize(&mut self, bounds: Vec2) {
        debug_assert!(bounds.x > 0.0 && bounds.y > 0.0, "play area must be non-empty");
        self.bounds = bounds;
        self.ship.pos = wrap_position(self.ship.pos, bounds);
    }

    /// Spawn debris for an explosion of the given radius
    pub fn spawn_explosion(&mut self, pos: Vec2, radius: f32) {
        if !self.particles_enabled {
            return;
        }
        let count = (radius / 2.0).floor() as usize;
        let room = MAX_PARTICLES.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            self.particles.push(Particle::new(pos, &mut self.rng));
        }
    }

    /// Take all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Vec2 {
        Vec2::new(800.0, 600.0)
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new(12345, bounds(), Difficulty::Normal, 1000.0);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.asteroids.len(), 5);
        assert!(state.asteroids.iter().all(|a| a.size == AsteroidSize::Large));
        assert_eq!(state.ship.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.ship.thrust, 0.5);
        assert_eq!(state.score.level, 1);
        for a in &state.asteroids {
            assert!(a.pos.distance(state.ship.pos) >= SPAWN_SAFE_DISTANCE);
        }
    }

    #[test]
    fn test_ship_shoot_from_nose() {
        let mut ship = Ship::new(Vec2::new(100.0, 100.0), 0.5);
        ship.angle = std::f32::consts::FRAC_PI_2;
        let p = ship.shoot();
        assert!((p.pos - Vec2::new(100.0, 115.0)).length() < 1e-4);
        assert!((p.vel - Vec2::new(0.0, 10.0)).length() < 1e-4);
        assert_eq!(p.life, PROJECTILE_LIFE);
    }

    #[test]
    fn test_ship_thrust_and_friction() {
        let mut ship = Ship::new(Vec2::new(100.0, 100.0), 0.5);
        let controls = ShipControls {
            thrust: true,
            ..Default::default()
        };
        ship.update(&controls, bounds());
        assert!((ship.vel.x - 0.5 * 0.99).abs() < 1e-6);
        assert!((ship.pos.x - (100.0 + 0.5 * 0.99)).abs() < 1e-4);
    }

    #[test]
    fn test_ship_turning() {
        let mut ship = Ship::new(Vec2::new(100.0, 100.0), 0.5);
        let left = ShipControls {
            turn_left: true,
            ..Default::default()
        };
        ship.update(&left, bounds());
        assert!((ship.angle + 0.1).abs() < 1e-6);
        let both = ShipControls {
            turn_left: true,
            turn_right: true,
            thrust: false,
        };
        ship.update(&both, bounds());
        assert!((ship.angle + 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_ship_wraps_exactly() {
        let mut ship = Ship::new(Vec2::new(799.5, 0.2), 0.5);
        ship.vel = Vec2::new(1.0, -1.0) / SHIP_FRICTION;
        ship.update(&ShipControls::default(), bounds());
        assert!((ship.pos.x - 0.5).abs() < 1e-3);
        assert!((ship.pos.y - 599.2).abs() < 1e-3);
    }

    #[test]
    fn test_boost_expires_to_base_thrust() {
        let mut ship = Ship::new(Vec2::ZERO, 0.4);
        ship.grant_boost(0.8, 0.0, 5000.0);
        assert_eq!(ship.thrust, 0.8);
        assert!(!ship.expire_boost(4999.0));
        // Still boosted on the last millisecond of the window
        assert!(!ship.expire_boost(5000.0));
        assert_eq!(ship.thrust, 0.8);
        assert!(ship.expire_boost(5000.5));
        assert_eq!(ship.thrust, 0.4);
        assert!(!ship.boost_active());
    }

    #[test]
    fn test_base_thrust_change_keeps_boost() {
        let mut ship = Ship::new(Vec2::ZERO, 0.4);
        ship.grant_boost(0.8, 0.0, 5000.0);
        ship.set_base_thrust(0.6);
        assert_eq!(ship.thrust, 0.8);
        ship.expire_boost(6000.0);
        assert_eq!(ship.thrust, 0.6);
    }

    #[test]
    fn test_projectile_liveness() {
        let mut p = Projectile::new(Vec2::new(10.0, 10.0), Vec2::new(-6.0, 0.0));
        assert!(p.is_live(bounds()));
        p.update();
        assert!(p.is_live(bounds()));
        p.update();
        assert!(!p.is_live(bounds()));

        let mut p = Projectile::new(Vec2::new(400.0, 300.0), Vec2::ZERO);
        for _ in 0..PROJECTILE_LIFE {
            assert!(p.is_live(bounds()));
            p.update();
        }
        assert!(!p.is_live(bounds()));
    }

    #[test]
    fn test_combo_scoring() {
        let mut score = ScoreState::default();
        assert_eq!(score.register_hit(AsteroidSize::Small, 10.0), 100);

        score.combo = 5;
        assert_eq!(score.register_hit(AsteroidSize::Small, 20.0), 500);
        assert_eq!(score.combo, 6);
        assert_eq!(score.kills, 600);
    }

    #[test]
    fn test_combo_expires_after_window() {
        let mut score = ScoreState::default();
        score.register_hit(AsteroidSize::Large, 1000.0);
        score.expire_combo(3000.0);
        assert_eq!(score.combo, 1);
        score.expire_combo(3001.0);
        assert_eq!(score.combo, 0);
    }

    #[test]
    fn test_clock_excludes_pauses() {
        let mut clock = GameClock::new(1000.0);
        assert_eq!(clock.game_time(2000.0), 1000.0);
        clock.pause(2000.0);
        assert_eq!(clock.game_time(9000.0), 1000.0);
        clock.resume(9000.0);
        assert_eq!(clock.game_time(9500.0), 1500.0);
    }

    #[test]
    fn test_pause_toggle_ignored_after_game_over() {
        let mut state = GameState::new(1, bounds(), Difficulty::Normal, 0.0);
        state.toggle_pause(10.0);
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(!state.fire());
        state.toggle_pause(20.0);
        assert_eq!(state.phase, GamePhase::Running);
        state.phase = GamePhase::GameOver;
        state.toggle_pause(30.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.fire());
    }

    #[test]
    fn test_fire_emits_intent_and_event() {
        let mut state = GameState::new(1, bounds(), Difficulty::Normal, 0.0);
        assert!(state.fire());
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.take_events(), vec![GameEvent::Shoot]);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_restart_on_hard_grants_boost() {
        let mut state = GameState::new(1, bounds(), Difficulty::Normal, 0.0);
        state.score.kills = 900;
        state.phase = GamePhase::GameOver;
        state.restart(Difficulty::Hard, 50_000.0);

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score.kills, 0);
        assert_eq!(state.asteroids.len(), 7);
        assert_eq!(state.ship.thrust, BOOST_THRUST);
        assert_eq!(state.ship.base_thrust, 0.4);
        assert!(state.events.contains(&GameEvent::PowerUp));
    }

    #[test]
    fn test_live_difficulty_change() {
        let mut state = GameState::new(3, bounds(), Difficulty::Normal, 0.0);
        let positions: Vec<Vec2> = state.asteroids.iter().map(|a| a.pos).collect();

        state.set_difficulty(Difficulty::Easy);
        assert_eq!(state.asteroids.len(), 3);
        assert_eq!(state.ship.thrust, 0.6);
        for (a, before) in state.asteroids.iter().zip(&positions) {
            assert_eq!(a.pos, *before);
            assert!((a.vel.length() - 2.0 * 0.7).abs() < 1e-4);
        }

        state.set_difficulty(Difficulty::Hard);
        assert_eq!(state.asteroids.len(), 7);
    }

    #[test]
    fn test_explosion_respects_toggle_and_cap() {
        let mut state = GameState::new(1, bounds(), Difficulty::Normal, 0.0);
        state.spawn_explosion(Vec2::new(50.0, 50.0), LARGE_RADIUS);
        assert_eq!(state.particles.len(), 20);

        state.particles_enabled = false;
        state.spawn_explosion(Vec2::new(50.0, 50.0), LARGE_RADIUS);
        assert_eq!(state.particles.len(), 20);

        state.particles_enabled = true;
        for _ in 0..100 {
            state.spawn_explosion(Vec2::new(50.0, 50.0), LARGE_RADIUS);
        }
        assert_eq!(state.particles.len(), MAX_PARTICLES);
    }
}
