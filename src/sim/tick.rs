//! Simulation tick
//!
//! One call advances the session by one animation frame.

use super::collision::{find_ship_collision, resolve_projectile_hits};
use super::difficulty::{level_spawn_count, rescale_speeds, spawn_large};
use super::state::{GameEvent, GamePhase, GameState, ShipControls};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held ship controls
    pub controls: ShipControls,
    /// Fire one projectile (edge-triggered)
    pub fire: bool,
    /// Pause toggle (edge-triggered)
    pub pause: bool,
}

/// Advance the game state by one tick at wall-clock `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    // Handle pause toggle
    if input.pause {
        state.toggle_pause(now_ms);
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Running {
        return;
    }

    let now = state.clock.game_time(now_ms);
    state.elapsed_ms = now;

    if state.ship.expire_boost(now) {
        log::debug!("Boost expired, thrust back to {}", state.ship.base_thrust);
    }

    if input.fire {
        state.fire();
    }

    // Ship
    state.ship.update(&input.controls, state.bounds);
    if input.controls.thrust {
        state.events.push(GameEvent::Thrust);
    }

    // Projectiles
    let bounds = state.bounds;
    state.projectiles.retain_mut(|p| {
        p.update();
        p.is_live(bounds)
    });

    // Asteroids
    for asteroid in &mut state.asteroids {
        asteroid.update(bounds);
    }

    // Particles
    if state.particles_enabled {
        state.particles.retain_mut(|p| {
            p.update();
            p.life > 0
        });
    }

    // Collisions
    let hits = resolve_projectile_hits(
        &mut state.projectiles,
        &mut state.asteroids,
        &mut state.score,
        now,
        &mut state.rng,
    );
    for hit in &hits {
        state.spawn_explosion(hit.pos, hit.size.radius());
        if hit.combo > 1 {
            state.events.push(GameEvent::Combo { level: hit.combo });
        }
        state.events.push(GameEvent::Explosion);
        if hit.combo == 5 || hit.combo == 10 {
            state.events.push(GameEvent::PowerUp);
        }
    }

    if let Some(idx) = find_ship_collision(&state.ship, &state.asteroids) {
        log::debug!(
            "Ship hit by {:?} asteroid at {:?}",
            state.asteroids[idx].size,
            state.asteroids[idx].pos
        );
        state.events.push(GameEvent::Hit);
        state.phase = GamePhase::GameOver;
        return;
    }

    state.score.expire_combo(now);

    // Level complete
    if state.asteroids.is_empty() {
        state.score.level += 1;
        let count = level_spawn_count(state.score.level, state.difficulty);
        spawn_large(
            &mut state.asteroids,
            count,
            state.bounds,
            state.ship.pos,
            &mut state.rng,
        );
        state.events.push(GameEvent::LevelUp {
            level: state.score.level,
        });
        log::info!("Level {} ({} asteroids)", state.score.level, count);
    }

    rescale_speeds(&mut state.asteroids, state.difficulty);
}
