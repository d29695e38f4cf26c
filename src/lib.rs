//! Skyshot - a pointer-aimed arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, physics, collisions, game state)
//! - `session`: Per-instance game driver wiring input, sim, and score submission
//! - `leaderboard`: Score persistence traits and the LocalStorage-backed board
//! - `render`: Frame snapshot handed to a renderer each frame
//! - `settings`: Player preferences

pub mod leaderboard;
pub mod render;
pub mod session;
pub mod settings;
pub mod sim;

pub use leaderboard::{LeaderboardSource, LocalLeaderboard, ScoreSink};
pub use session::{Command, GameSession};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per animation frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Canvas dimensions
    pub const CANVAS_W: f32 = 800.0;
    pub const CANVAS_H: f32 = 600.0;

    /// Cannon anchor - centered near the bottom edge
    pub const CANNON_X: f32 = CANVAS_W / 2.0;
    pub const CANNON_Y: f32 = CANVAS_H - 30.0;
    pub const CANNON_WIDTH: f32 = 40.0;
    pub const CANNON_HEIGHT: f32 = 20.0;

    pub const START_LIVES: u32 = 3;
    /// Score threshold between levels
    pub const LEVEL_STEP: u32 = 500;

    /// Per-tick target spawn probability and its per-level increment
    pub const SPAWN_RATE_START: f32 = 0.02;
    pub const SPAWN_RATE_PER_LEVEL: f32 = 0.005;
    /// Base downward target speed (per-frame units) and its per-level increment
    pub const TARGET_SPEED_START: f32 = 1.0;
    pub const TARGET_SPEED_PER_LEVEL: f32 = 0.5;

    /// Scale from per-frame speeds to px/s at the 60 Hz timestep
    pub const FRAME_SCALE: f32 = 60.0;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 3.0;
    pub const PROJECTILE_SPEED: f32 = 8.0 * FRAME_SCALE;

    /// Target defaults
    pub const TARGET_RADIUS_MIN: f32 = 15.0;
    pub const TARGET_RADIUS_SPREAD: f32 = 10.0;
    pub const TARGET_POINTS_MIN: u32 = 10;
    pub const TARGET_POINTS_MAX: u32 = 59;
    /// Horizontal margin kept clear of the canvas edges when spawning
    pub const SPAWN_MARGIN: f32 = 20.0;
    pub const TARGET_DRIFT_MAX: f32 = 1.0 * FRAME_SCALE;
    /// Random extra fall speed on top of the level base (per-frame units)
    pub const TARGET_FALL_SPREAD: f32 = 2.0;

    /// Particle burst defaults
    pub const BURST_PARTICLES: usize = 8;
    pub const PARTICLE_LIFE_TICKS: u32 = 30;
    pub const PARTICLE_MAX_SPEED: f32 = 5.0 * FRAME_SCALE;
    pub const PARTICLE_RADIUS: f32 = 3.0;

    /// Soft caps on entity growth; spawns are skipped at the cap
    pub const MAX_TARGETS: usize = 64;
    pub const MAX_PROJECTILES: usize = 128;
    pub const MAX_PARTICLES: usize = 256;
}

/// Angle from one point toward another (atan2 convention, canvas coordinates)
#[inline]
pub fn aim_angle(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Unit vector for an angle in radians
#[inline]
pub fn unit_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
