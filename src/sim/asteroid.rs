//! Asteroids and their size classes

use glam::Vec2;
use rand::Rng;

use crate::consts::*;

/// Asteroid size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

impl AsteroidSize {
    /// Collision radius
    pub fn radius(&self) -> f32 {
        match self {
            AsteroidSize::Large => LARGE_RADIUS,
            AsteroidSize::Medium => MEDIUM_RADIUS,
            AsteroidSize::Small => SMALL_RADIUS,
        }
    }

    /// Speed before the difficulty multiplier
    pub fn base_speed(&self) -> f32 {
        match self {
            AsteroidSize::Large => LARGE_SPEED,
            AsteroidSize::Medium => MEDIUM_SPEED,
            AsteroidSize::Small => SMALL_SPEED,
        }
    }

    /// Points for destroying one, before the combo multiplier
    pub fn points(&self) -> u64 {
        match self {
            AsteroidSize::Large => LARGE_POINTS,
            AsteroidSize::Medium => MEDIUM_POINTS,
            AsteroidSize::Small => SMALL_POINTS,
        }
    }

    /// Size of the two fragments left behind, `None` if it just vanishes
    pub fn fragment(&self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }
}

/// An asteroid entity
#[derive(Debug, Clone)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Current rotation (radians, render only)
    pub rotation: f32,
    /// Rotation per tick
    pub rotation_speed: f32,
    pub size: AsteroidSize,
    /// Outline relative to the center, fixed at creation
    outline: Vec<Vec2>,
}

impl Asteroid {
    /// Create an asteroid with a random drift, spin and outline
    pub fn new<R: Rng>(pos: Vec2, size: AsteroidSize, rng: &mut R) -> Self {
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * ASTEROID_SPAWN_VELOCITY,
            (rng.random::<f32>() - 0.5) * ASTEROID_SPAWN_VELOCITY,
        );
        let rotation_speed = (rng.random::<f32>() - 0.5) * ASTEROID_SPIN;
        let outline = generate_outline(size.radius(), rng);
        debug_assert!(!outline.is_empty(), "asteroid outline must have vertices");

        Self {
            pos,
            vel,
            rotation: 0.0,
            rotation_speed,
            size,
            outline,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size.radius()
    }

    /// Outline vertices relative to the center (unrotated)
    pub fn outline(&self) -> &[Vec2] {
        &self.outline
    }

    /// Drift and spin one tick, wrapping once fully off-screen
    pub fn update(&mut self, bounds: Vec2) {
        self.pos += self.vel;
        self.rotation += self.rotation_speed;

        let r = self.radius();
        if self.pos.x < -r {
            self.pos.x = bounds.x + r;
        } else if self.pos.x > bounds.x + r {
            self.pos.x = -r;
        }
        if self.pos.y < -r {
            self.pos.y = bounds.y + r;
        } else if self.pos.y > bounds.y + r {
            self.pos.y = -r;
        }
    }
}

/// Irregular polygon: evenly spaced spokes with jittered angle and length
pub fn generate_outline<R: Rng>(radius: f32, rng: &mut R) -> Vec<Vec2> {
    let count = rng.random_range(OUTLINE_MIN_VERTICES..=OUTLINE_MAX_VERTICES);
    let step = std::f32::consts::TAU / count as f32;

    (0..count)
        .map(|i| {
            // Jitter stays under half a step so vertices keep their angular order
            let angle = i as f32 * step + (rng.random::<f32>() - 0.5) * step * 0.4;
            let variance = 0.8 + rng.random::<f32>() * 0.4;
            Vec2::new(angle.cos(), angle.sin()) * radius * variance
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_outline_shape() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..50 {
            let outline = generate_outline(LARGE_RADIUS, &mut rng);
            assert!((OUTLINE_MIN_VERTICES..=OUTLINE_MAX_VERTICES).contains(&outline.len()));
            for v in &outline {
                let len = v.length();
                assert!(len >= LARGE_RADIUS * 0.8 - 1e-3 && len <= LARGE_RADIUS * 1.2 + 1e-3);
            }
        }
    }

    #[test]
    fn test_outline_is_seedable() {
        let a = Asteroid::new(Vec2::ZERO, AsteroidSize::Large, &mut Pcg32::seed_from_u64(5));
        let b = Asteroid::new(Vec2::ZERO, AsteroidSize::Large, &mut Pcg32::seed_from_u64(5));
        assert_eq!(a.outline(), b.outline());
        assert_eq!(a.vel, b.vel);
    }

    #[test]
    fn test_outline_unchanged_by_update() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut asteroid = Asteroid::new(Vec2::new(100.0, 100.0), AsteroidSize::Medium, &mut rng);
        let before = asteroid.outline().to_vec();
        for _ in 0..100 {
            asteroid.update(Vec2::new(800.0, 600.0));
        }
        assert_eq!(asteroid.outline(), before.as_slice());
    }

    #[test]
    fn test_wraps_past_radius_extended_edge() {
        let mut rng = Pcg32::seed_from_u64(1);
        let bounds = Vec2::new(800.0, 600.0);
        let mut asteroid = Asteroid::new(Vec2::new(-39.0, 300.0), AsteroidSize::Large, &mut rng);
        asteroid.vel = Vec2::new(-2.0, 0.0);
        asteroid.update(bounds);
        assert_eq!(asteroid.pos.x, bounds.x + LARGE_RADIUS);

        asteroid.pos = Vec2::new(400.0, 639.0);
        asteroid.vel = Vec2::new(0.0, 2.0);
        asteroid.update(bounds);
        assert_eq!(asteroid.pos.y, -LARGE_RADIUS);
    }

    #[test]
    fn test_size_table() {
        assert_eq!(AsteroidSize::Large.radius(), 40.0);
        assert_eq!(AsteroidSize::Medium.radius(), 25.0);
        assert_eq!(AsteroidSize::Small.radius(), 15.0);
        assert_eq!(AsteroidSize::Small.fragment(), None);
        assert_eq!(AsteroidSize::Large.fragment(), Some(AsteroidSize::Medium));
    }
}
