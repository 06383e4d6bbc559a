//! Asteroid Rush - a fragmenting-asteroid arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation (entities, collisions, scoring, difficulty policy)
//! - `game`: Session controller (pause/restart lifecycle, high score)
//! - `persistence`: Key/value storage seam for settings and high score
//! - `platform`: Browser/native platform abstraction (input, storage, time)
//! - `audio`: Procedural sound effects driven by simulation events
//! - `renderer`: Canvas2D drawing (shape geometry everywhere, painter on web)

pub mod audio;
pub mod error;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use game::{FinalStats, Game, Hud};
pub use highscores::HighScore;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Ship turn rate (radians per tick)
    pub const SHIP_TURN_RATE: f32 = 0.1;
    /// Velocity retained each tick
    pub const SHIP_FRICTION: f32 = 0.99;
    /// Collision radius of the ship
    pub const SHIP_RADIUS: f32 = 10.0;
    /// Distance from ship center to nose, where projectiles spawn
    pub const SHIP_NOSE_OFFSET: f32 = 15.0;
    /// Thrust granted on a hard-difficulty restart
    pub const BOOST_THRUST: f32 = 0.8;
    /// How long the restart boost lasts (ms of game time)
    pub const BOOST_DURATION_MS: f64 = 5000.0;

    /// Projectile muzzle speed (units per tick)
    pub const PROJECTILE_SPEED: f32 = 10.0;
    /// Projectile lifetime in ticks
    pub const PROJECTILE_LIFE: u32 = 40;

    /// Asteroid radii by size class
    pub const LARGE_RADIUS: f32 = 40.0;
    pub const MEDIUM_RADIUS: f32 = 25.0;
    pub const SMALL_RADIUS: f32 = 15.0;
    /// Asteroid base speeds (units per tick, before difficulty multiplier)
    pub const LARGE_SPEED: f32 = 2.0;
    pub const MEDIUM_SPEED: f32 = 3.0;
    pub const SMALL_SPEED: f32 = 4.0;
    /// Points per kill, before combo multiplier
    pub const LARGE_POINTS: u64 = 20;
    pub const MEDIUM_POINTS: u64 = 50;
    pub const SMALL_POINTS: u64 = 100;
    /// Range of a freshly spawned asteroid's velocity components
    pub const ASTEROID_SPAWN_VELOCITY: f32 = 3.0;
    /// Range of a freshly spawned asteroid's spin (radians per tick)
    pub const ASTEROID_SPIN: f32 = 0.05;
    /// Outline vertex count range (inclusive)
    pub const OUTLINE_MIN_VERTICES: usize = 8;
    pub const OUTLINE_MAX_VERTICES: usize = 12;

    /// Asteroids spawned at the start of a run on normal difficulty
    pub const BASE_ASTEROID_COUNT: f32 = 5.0;
    /// Hard cap on asteroids spawned by a level transition
    pub const MAX_LEVEL_SPAWN: usize = 8;
    /// Minimum spawn distance from the ship
    pub const SPAWN_SAFE_DISTANCE: f32 = 100.0;
    /// Rejection sampling attempts before taking the farthest candidate
    pub const SPAWN_MAX_ATTEMPTS: u32 = 64;

    /// Padding added to an asteroid's radius for ship collisions
    pub const SHIP_COLLISION_PADDING: f32 = 10.0;
    /// Combo multiplier cap
    pub const MAX_COMBO_MULTIPLIER: u32 = 5;
    /// Hit-free window after which the combo resets (ms)
    pub const COMBO_WINDOW_MS: f64 = 2000.0;
    /// Time bonus awarded per whole elapsed second
    pub const TIME_BONUS_PER_SECOND: u64 = 2;

    /// Particle lifetime in ticks
    pub const PARTICLE_LIFE: u32 = 30;
    /// Velocity retained by particles each tick
    pub const PARTICLE_DRAG: f32 = 0.98;
    /// Range of a particle's initial velocity components
    pub const PARTICLE_SPEED: f32 = 8.0;
    /// Maximum live particles
    pub const MAX_PARTICLES: usize = 512;
}

/// Wrap a point onto the torus `[0, bounds.x) x [0, bounds.y)`
#[inline]
pub fn wrap_position(pos: Vec2, bounds: Vec2) -> Vec2 {
    Vec2::new(wrap_axis(pos.x, bounds.x), wrap_axis(pos.y, bounds.y))
}

/// Wrap a coordinate into `[0, extent)`
#[inline]
pub fn wrap_axis(value: f32, extent: f32) -> f32 {
    debug_assert!(extent > 0.0, "play area extent must be positive");
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent { 0.0 } else { wrapped }
}

/// Unit vector for a heading angle
#[inline]
pub fn heading_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Format milliseconds as `MM:SS`
pub fn format_clock(elapsed_ms: f64) -> String {
    let seconds = (elapsed_ms.max(0.0) / 1000.0).floor() as u64;
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_axis_edges() {
        assert_eq!(wrap_axis(-1.0, 800.0), 799.0);
        assert_eq!(wrap_axis(800.0, 800.0), 0.0);
        assert_eq!(wrap_axis(805.5, 800.0), 5.5);
        assert!(wrap_axis(-1e-9, 800.0) < 800.0);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(59_999.0), "00:59");
        assert_eq!(format_clock(61_000.0), "01:01");
        assert_eq!(format_clock(3_600_000.0), "60:00");
    }
}
