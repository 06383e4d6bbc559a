//! Collision detection and scoring
//!
//! Everything here is circle-vs-circle. Projectiles are points tested against
//! an asteroid's radius; the ship is padded by `SHIP_COLLISION_PADDING`.

use glam::Vec2;
use rand::Rng;

use super::asteroid::{Asteroid, AsteroidSize};
use super::state::{Projectile, ScoreState, Ship};
use crate::consts::*;

/// One resolved projectile hit
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    /// Where the asteroid was destroyed
    pub pos: Vec2,
    pub size: AsteroidSize,
    /// Points awarded after the combo multiplier
    pub points: u64,
    /// Combo count after this hit
    pub combo: u32,
}

/// Whether a point lies strictly inside an asteroid
#[inline]
pub fn point_hits_asteroid(point: Vec2, asteroid: &Asteroid) -> bool {
    point.distance(asteroid.pos) < asteroid.radius()
}

/// Whether the ship overlaps an asteroid
#[inline]
pub fn ship_hits_asteroid(ship: &Ship, asteroid: &Asteroid) -> bool {
    ship.pos.distance(asteroid.pos) < asteroid.radius() + SHIP_COLLISION_PADDING
}

/// The two fragments (or none) an asteroid breaks into, at its position
pub fn fragment<R: Rng>(asteroid: &Asteroid, rng: &mut R) -> Vec<Asteroid> {
    match asteroid.size.fragment() {
        Some(size) => (0..2).map(|_| Asteroid::new(asteroid.pos, size, rng)).collect(),
        None => Vec::new(),
    }
}

/// Resolve projectile/asteroid hits for one tick.
///
/// Projectiles are scanned in collection order and each takes the first
/// asteroid (in collection order) it overlaps that no earlier projectile has
/// already claimed this tick. Destroyed asteroids are replaced by fragments
/// appended after the scan, so fragments cannot be hit until the next tick.
pub fn resolve_projectile_hits<R: Rng>(
    projectiles: &mut Vec<Projectile>,
    asteroids: &mut Vec<Asteroid>,
    score: &mut ScoreState,
    now_ms: f64,
    rng: &mut R,
) -> Vec<Hit> {
    let mut spent = vec![false; projectiles.len()];
    let mut destroyed = vec![false; asteroids.len()];
    let mut claimed: Vec<usize> = Vec::new();

    for (p_idx, projectile) in projectiles.iter().enumerate() {
        let target = asteroids
            .iter()
            .enumerate()
            .find(|(a_idx, asteroid)| !destroyed[*a_idx] && point_hits_asteroid(projectile.pos, asteroid))
            .map(|(a_idx, _)| a_idx);

        if let Some(a_idx) = target {
            spent[p_idx] = true;
            destroyed[a_idx] = true;
            claimed.push(a_idx);
        }
    }

    if claimed.is_empty() {
        return Vec::new();
    }

    let mut hits = Vec::with_capacity(claimed.len());
    let mut fragments = Vec::new();
    for &a_idx in &claimed {
        let asteroid = &asteroids[a_idx];
        let points = score.register_hit(asteroid.size, now_ms);
        hits.push(Hit {
            pos: asteroid.pos,
            size: asteroid.size,
            points,
            combo: score.combo,
        });
        fragments.extend(fragment(asteroid, rng));
    }

    let mut spent_iter = spent.iter();
    projectiles.retain(|_| !spent_iter.next().copied().unwrap_or(false));
    let mut destroyed_iter = destroyed.iter();
    asteroids.retain(|_| !destroyed_iter.next().copied().unwrap_or(false));
    asteroids.extend(fragments);

    hits
}

/// Index of the first asteroid touching the ship, if any
pub fn find_ship_collision(ship: &Ship, asteroids: &[Asteroid]) -> Option<usize> {
    asteroids.iter().position(|a| ship_hits_asteroid(ship, a))
}
