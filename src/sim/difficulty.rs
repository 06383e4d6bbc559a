//! Spawn and difficulty policy
//!
//! Difficulty drives three things: how many asteroids a run starts with, how
//! fast every asteroid moves (re-applied every tick), and the ship's thrust.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::asteroid::{Asteroid, AsteroidSize};
use crate::consts::*;

/// Difficulty tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Parse a tier key produced by our own controls.
    ///
    /// The controls only ever offer known keys, so anything else is a bug:
    /// debug builds panic, release builds log and return `None`.
    pub fn from_control(key: &str) -> Option<Self> {
        let parsed = Self::from_str(key);
        if parsed.is_none() {
            debug_assert!(false, "unknown difficulty {key:?}");
            log::warn!("Unknown difficulty {key:?}");
        }
        parsed
    }

    /// Asteroid speed multiplier
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.7,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
        }
    }

    /// Base ship thrust for this tier
    pub fn thrust(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.6,
            Difficulty::Normal => 0.5,
            Difficulty::Hard => 0.4,
        }
    }

    /// Thrust granted on restart, if this tier has a restart boost
    pub fn restart_boost(&self) -> Option<f32> {
        match self {
            Difficulty::Hard => Some(BOOST_THRUST),
            _ => None,
        }
    }

    /// Asteroids spawned at the start of a run: floor(5 x multiplier)
    pub fn initial_asteroid_count(&self) -> usize {
        (BASE_ASTEROID_COUNT * self.speed_multiplier()).floor() as usize
    }

    /// Target speed for an asteroid of the given size
    pub fn target_speed(&self, size: AsteroidSize) -> f32 {
        size.base_speed() * self.speed_multiplier()
    }
}

/// Number of large asteroids spawned when `level` begins
pub fn level_spawn_count(level: u32, difficulty: Difficulty) -> usize {
    (difficulty.initial_asteroid_count() + (level / 2) as usize).min(MAX_LEVEL_SPAWN)
}

/// Normalize every asteroid's speed to its size's target, keeping direction.
///
/// Stationary asteroids are left alone.
pub fn rescale_speeds(asteroids: &mut [Asteroid], difficulty: Difficulty) {
    for asteroid in asteroids.iter_mut() {
        let speed = asteroid.vel.length();
        if speed > 0.0 {
            asteroid.vel *= difficulty.target_speed(asteroid.size) / speed;
        }
    }
}

/// Pick a position inside `bounds` at least `SPAWN_SAFE_DISTANCE` from `avoid`.
///
/// Rejection sampled. If the play area is too small to ever satisfy the
/// distance, the farthest candidate seen is returned.
pub fn spawn_position<R: Rng>(bounds: Vec2, avoid: Vec2, rng: &mut R) -> Vec2 {
    let mut best = Vec2::ZERO;
    let mut best_dist = f32::NEG_INFINITY;

    for _ in 0..SPAWN_MAX_ATTEMPTS {
        let candidate = Vec2::new(
            rng.random::<f32>() * bounds.x,
            rng.random::<f32>() * bounds.y,
        );
        let dist = candidate.distance(avoid);
        if dist >= SPAWN_SAFE_DISTANCE {
            return candidate;
        }
        if dist > best_dist {
            best = candidate;
            best_dist = dist;
        }
    }

    log::debug!(
        "No spawn point {} units from ship after {} attempts, using {:?}",
        SPAWN_SAFE_DISTANCE,
        SPAWN_MAX_ATTEMPTS,
        best
    );
    best
}

/// Append `count` large asteroids at safe positions
pub fn spawn_large<R: Rng>(
    asteroids: &mut Vec<Asteroid>,
    count: usize,
    bounds: Vec2,
    ship_pos: Vec2,
    rng: &mut R,
) {
    for _ in 0..count {
        let pos = spawn_position(bounds, ship_pos, rng);
        asteroids.push(Asteroid::new(pos, AsteroidSize::Large, rng));
    }
}

/// Move the population toward the tier's starting count.
///
/// Grows by spawning fresh large asteroids away from the ship, shrinks by
/// dropping the tail of the collection.
pub fn adjust_population<R: Rng>(
    asteroids: &mut Vec<Asteroid>,
    difficulty: Difficulty,
    bounds: Vec2,
    ship_pos: Vec2,
    rng: &mut R,
) {
    let target = difficulty.initial_asteroid_count();
    let current = asteroids.len();
    if current < target {
        spawn_large(asteroids, target - current, bounds, ship_pos, rng);
    } else {
        asteroids.truncate(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_initial_counts() {
        assert_eq!(Difficulty::Easy.initial_asteroid_count(), 3);
        assert_eq!(Difficulty::Normal.initial_asteroid_count(), 5);
        assert_eq!(Difficulty::Hard.initial_asteroid_count(), 7);
    }

    #[test]
    fn test_level_spawn_count_is_capped() {
        assert_eq!(level_spawn_count(2, Difficulty::Normal), 6);
        assert_eq!(level_spawn_count(3, Difficulty::Normal), 6);
        assert_eq!(level_spawn_count(4, Difficulty::Easy), 5);
        assert_eq!(level_spawn_count(4, Difficulty::Hard), 8);
        assert_eq!(level_spawn_count(40, Difficulty::Easy), 8);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("insane"), None);
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
    }

    #[test]
    fn test_from_control_accepts_every_tier() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_control(d.as_str()), Some(d));
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "unknown difficulty")]
    fn test_from_control_rejects_unknown_key() {
        Difficulty::from_control("nightmare");
    }

    #[test]
    fn test_rescale_leaves_stationary_asteroid() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut asteroid = Asteroid::new(Vec2::new(10.0, 10.0), AsteroidSize::Medium, &mut rng);
        asteroid.vel = Vec2::ZERO;
        let mut field = vec![asteroid];
        rescale_speeds(&mut field, Difficulty::Hard);
        assert_eq!(field[0].vel, Vec2::ZERO);
    }

    #[test]
    fn test_spawn_position_respects_safe_distance() {
        let mut rng = Pcg32::seed_from_u64(7);
        let bounds = Vec2::new(800.0, 600.0);
        let ship = Vec2::new(400.0, 300.0);
        for _ in 0..200 {
            let pos = spawn_position(bounds, ship, &mut rng);
            assert!(pos.distance(ship) >= SPAWN_SAFE_DISTANCE);
            assert!(pos.x >= 0.0 && pos.x < bounds.x);
            assert!(pos.y >= 0.0 && pos.y < bounds.y);
        }
    }

    #[test]
    fn test_spawn_position_tiny_arena_terminates() {
        let mut rng = Pcg32::seed_from_u64(7);
        let bounds = Vec2::new(50.0, 50.0);
        let pos = spawn_position(bounds, Vec2::new(25.0, 25.0), &mut rng);
        assert!(pos.x <= 50.0 && pos.y <= 50.0);
    }

    #[test]
    fn test_adjust_population_grows_and_truncates_tail() {
        let mut rng = Pcg32::seed_from_u64(3);
        let bounds = Vec2::new(800.0, 600.0);
        let ship = Vec2::new(400.0, 300.0);

        let mut field = Vec::new();
        spawn_large(&mut field, 2, bounds, ship, &mut rng);
        adjust_population(&mut field, Difficulty::Hard, bounds, ship, &mut rng);
        assert_eq!(field.len(), 7);

        let kept: Vec<Vec2> = field.iter().take(3).map(|a| a.pos).collect();
        adjust_population(&mut field, Difficulty::Easy, bounds, ship, &mut rng);
        assert_eq!(field.len(), 3);
        let after: Vec<Vec2> = field.iter().map(|a| a.pos).collect();
        assert_eq!(kept, after);
    }

    proptest! {
        #[test]
        fn rescale_converges_to_target_speed(
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
            size_idx in 0usize..3,
            diff_idx in 0usize..3,
        ) {
            prop_assume!(vx.abs() > 1e-3 || vy.abs() > 1e-3);
            let size = [AsteroidSize::Large, AsteroidSize::Medium, AsteroidSize::Small][size_idx];
            let difficulty = Difficulty::ALL[diff_idx];
            let mut rng = Pcg32::seed_from_u64(11);
            let mut asteroid = Asteroid::new(Vec2::ZERO, size, &mut rng);
            asteroid.vel = Vec2::new(vx, vy);
            let direction = asteroid.vel.normalize();

            let mut field = vec![asteroid];
            rescale_speeds(&mut field, difficulty);

            let target = difficulty.target_speed(size);
            prop_assert!((field[0].vel.length() - target).abs() < 1e-3);
            prop_assert!(field[0].vel.normalize().dot(direction) > 0.999);
        }
    }
}
