//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of entity vecs)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{circles_intersect, outside_canvas, past_floor};
pub use state::{
    Cannon, ColorTag, GameEvent, GamePhase, GameState, Particle, Projectile, Target,
};
pub use tick::{TickInput, tick};
