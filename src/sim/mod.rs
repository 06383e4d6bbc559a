//! Simulation module
//!
//! All gameplay logic lives here:
//! - Entities only return intents; the tick owns every collection
//! - Randomness comes from the session's seeded RNG
//! - Stable iteration order (collection order) for collision resolution
//! - No rendering, audio or storage dependencies

pub mod asteroid;
pub mod collision;
pub mod difficulty;
pub mod state;
pub mod tick;

pub use asteroid::{Asteroid, AsteroidSize, generate_outline};
pub use collision::{Hit, find_ship_collision, fragment, resolve_projectile_hits};
pub use difficulty::{Difficulty, level_spawn_count, rescale_speeds};
pub use state::{
    Boost, GameClock, GameEvent, GamePhase, GameState, Particle, Projectile, ScoreState, Ship,
    ShipControls,
};
pub use tick::{TickInput, tick};
