//! Shape generation for 2D primitives
//!
//! Everything here is plain geometry in ship/world space; the canvas module
//! only strokes and fills what it gets from these functions.

use glam::Vec2;

use crate::sim::{Asteroid, GameState, Particle};

/// Background
pub const BACKGROUND: &str = "#000";
/// Stars and asteroid outlines
pub const FOREGROUND: &str = "#fff";
/// Projectiles and the regular thrust flame
pub const BULLET_COLOR: &str = "#ff6b6b";
/// Boost glow and boosted flame
pub const BOOST_COLOR: &str = "#ffd93d";
/// FPS counter and pause overlay text
pub const ACCENT_COLOR: &str = "#4ecdc4";

/// Number of background stars
pub const STAR_COUNT: u32 = 50;

/// Ship hull in ship space, nose along +x
pub const SHIP_HULL: [Vec2; 4] = [
    Vec2::new(15.0, 0.0),
    Vec2::new(-10.0, -8.0),
    Vec2::new(-5.0, 0.0),
    Vec2::new(-10.0, 8.0),
];

/// A background star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
}

/// Fixed star pattern for a given canvas size
///
/// Deterministic so the field doesn't flicker between frames.
pub fn star_field(width: f32, height: f32) -> Vec<Star> {
    if width < 1.0 || height < 1.0 {
        return Vec::new();
    }
    (0..STAR_COUNT)
        .map(|i| Star {
            pos: Vec2::new((i * 73) as f32 % width, (i * 37) as f32 % height),
            size: (i % 3) as f32 * 0.5 + 0.5,
        })
        .collect()
}

/// Open three-point flame behind the hull
pub fn thrust_flame(boosted: bool) -> [Vec2; 3] {
    if boosted {
        [
            Vec2::new(-5.0, -6.0),
            Vec2::new(-15.0, 0.0),
            Vec2::new(-5.0, 6.0),
        ]
    } else {
        [
            Vec2::new(-5.0, -4.0),
            Vec2::new(-10.0, 0.0),
            Vec2::new(-5.0, 4.0),
        ]
    }
}

/// Ship outline colour: gold while boosted, the player's colour otherwise
pub fn ship_color(state: &GameState, custom: &str) -> String {
    if state.ship.boost_active() {
        BOOST_COLOR.to_string()
    } else {
        custom.to_string()
    }
}

/// Asteroid outline rotated and placed in world space
pub fn asteroid_polygon(asteroid: &Asteroid) -> Vec<Vec2> {
    let rot = Vec2::from_angle(asteroid.rotation);
    asteroid
        .outline()
        .iter()
        .map(|v| asteroid.pos + rot.rotate(*v))
        .collect()
}

/// Fading particle colour; lightness drops with remaining life
pub fn particle_color(particle: &Particle) -> String {
    let alpha = particle.alpha();
    format!("hsl({:.0}, 100%, {:.0}%)", particle.hue, 50.0 * alpha)
}

/// Top-left corner of a centered square
#[inline]
pub fn centered_square(center: Vec2, size: f32) -> Vec2 {
    center - Vec2::splat(size / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{AsteroidSize, Difficulty};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_star_field_inside_canvas() {
        let stars = star_field(800.0, 600.0);
        assert_eq!(stars.len(), STAR_COUNT as usize);
        for s in &stars {
            assert!(s.pos.x >= 0.0 && s.pos.x < 800.0);
            assert!(s.pos.y >= 0.0 && s.pos.y < 600.0);
            assert!(s.size >= 0.5 && s.size <= 1.5);
        }
        // Stable between calls
        assert_eq!(stars, star_field(800.0, 600.0));
    }

    #[test]
    fn test_star_field_degenerate_canvas() {
        assert!(star_field(0.0, 600.0).is_empty());
    }

    #[test]
    fn test_boosted_flame_is_longer() {
        let normal = thrust_flame(false);
        let boosted = thrust_flame(true);
        assert!(boosted[1].x < normal[1].x);
    }

    #[test]
    fn test_polygon_follows_rotation() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut a = Asteroid::new(Vec2::new(100.0, 100.0), AsteroidSize::Large, &mut rng);
        let unrotated = asteroid_polygon(&a);
        a.rotation = std::f32::consts::PI;
        let rotated = asteroid_polygon(&a);
        for (u, r) in unrotated.iter().zip(&rotated) {
            // Half a turn mirrors each vertex through the center
            let mirrored = a.pos * 2.0 - *u;
            assert!((mirrored - *r).length() < 1e-3);
        }
    }

    #[test]
    fn test_ship_color_switches_with_boost() {
        let mut state = GameState::new(1, Vec2::new(800.0, 600.0), Difficulty::Normal, 0.0);
        assert_eq!(ship_color(&state, "#abcdef"), "#abcdef");
        state.ship.grant_boost(0.8, 0.0, 5000.0);
        assert_eq!(ship_color(&state, "#abcdef"), BOOST_COLOR);
    }

    #[test]
    fn test_particle_color_fades() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut p = Particle::new(Vec2::ZERO, &mut rng);
        p.hue = 30.0;
        assert_eq!(particle_color(&p), "hsl(30, 100%, 50%)");
        p.life = 0;
        assert_eq!(particle_color(&p), "hsl(30, 100%, 0%)");
    }

    #[test]
    fn test_centered_square() {
        assert_eq!(centered_square(Vec2::new(10.0, 10.0), 4.0), Vec2::new(8.0, 8.0));
    }
}
