//! Game state and core simulation types
//!
//! Everything the session and renderer read lives here. The state is
//! serde-serializable (particles excepted) so a run can be snapshotted.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::unit_from_angle;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start command
    Idle,
    /// Active gameplay
    Running,
    /// Game is paused; entities are frozen
    Paused,
    /// Run ended, final score submitted
    GameOver,
}

/// Palette slot for targets and particles
///
/// Tags rather than raw colors so the sim stays renderer-agnostic; each
/// tag maps to one CSS color in the seven-color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorTag {
    Coral,
    Turquoise,
    Sky,
    Sage,
    Butter,
    Plum,
    Seafoam,
    /// Escape bursts only, never assigned to targets
    Alarm,
}

impl ColorTag {
    /// Colors targets spawn with
    pub const PALETTE: [ColorTag; 7] = [
        ColorTag::Coral,
        ColorTag::Turquoise,
        ColorTag::Sky,
        ColorTag::Sage,
        ColorTag::Butter,
        ColorTag::Plum,
        ColorTag::Seafoam,
    ];

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::PALETTE[rng.random_range(0..Self::PALETTE.len())]
    }

    pub fn css(self) -> &'static str {
        match self {
            ColorTag::Coral => "#FF6B6B",
            ColorTag::Turquoise => "#4ECDC4",
            ColorTag::Sky => "#45B7D1",
            ColorTag::Sage => "#96CEB4",
            ColorTag::Butter => "#FFEAA7",
            ColorTag::Plum => "#DDA0DD",
            ColorTag::Seafoam => "#98D8C8",
            ColorTag::Alarm => "#ff4444",
        }
    }
}

/// The player's cannon, anchored at the bottom of the canvas
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Cannon {
    pub pos: Vec2,
    /// Barrel angle in radians, derived from the pointer each frame
    pub angle: f32,
}

impl Default for Cannon {
    fn default() -> Self {
        Self {
            pos: Vec2::new(CANNON_X, CANNON_Y),
            angle: -std::f32::consts::FRAC_PI_2, // Start pointing straight up
        }
    }
}

impl Cannon {
    /// Re-aim the barrel toward a pointer position
    pub fn aim(&mut self, pointer: Vec2) {
        self.angle = crate::aim_angle(self.pos, pointer);
    }

    /// Velocity of a projectile fired right now
    pub fn muzzle_velocity(&self) -> Vec2 {
        unit_from_angle(self.angle) * PROJECTILE_SPEED
    }
}

/// A player-fired shot
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Projectile {
    /// Fire from the cannon's current pose
    pub fn fire(cannon: &Cannon) -> Self {
        Self {
            pos: cannon.pos,
            vel: cannon.muzzle_velocity(),
            radius: PROJECTILE_RADIUS,
        }
    }
}

/// A falling circular target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: ColorTag,
    /// Score awarded when destroyed
    pub points: u32,
}

impl Target {
    /// Spawn a target at a random x along the top edge, drifting downward
    pub fn spawn<R: Rng>(rng: &mut R, base_speed: f32) -> Self {
        let x = rng.random_range(SPAWN_MARGIN..CANVAS_W - SPAWN_MARGIN);
        let vx = rng.random_range(-TARGET_DRIFT_MAX..TARGET_DRIFT_MAX);
        let vy = (base_speed + rng.random::<f32>() * TARGET_FALL_SPREAD) * FRAME_SCALE;
        Self {
            pos: Vec2::new(x, -20.0),
            vel: Vec2::new(vx, vy),
            radius: TARGET_RADIUS_MIN + rng.random::<f32>() * TARGET_RADIUS_SPREAD,
            color: ColorTag::random(rng),
            points: rng.random_range(TARGET_POINTS_MIN..=TARGET_POINTS_MAX),
        }
    }
}

/// A visual-effect particle
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in ticks; removed at zero
    pub life: u32,
    pub max_life: u32,
    pub color: ColorTag,
}

impl Particle {
    /// Remaining life as a 0-1 fade factor for rendering
    pub fn fade(&self) -> f32 {
        self.life as f32 / self.max_life as f32
    }
}

/// Something the simulation wants the host to know about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A threshold multiple was crossed
    LevelUp { level: u32 },
    /// A target reached the floor
    TargetEscaped { lives: u32 },
    /// Lives hit zero; emitted exactly once per run
    GameOver { score: u32, level: u32 },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    /// Per-tick target spawn probability (grows with level)
    pub spawn_rate: f32,
    /// Base target fall speed in per-frame units (grows with level)
    pub target_speed: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub cannon: Cannon,
    /// Latest pointer position in canvas space
    pub pointer: Vec2,
    pub projectiles: Vec<Projectile>,
    pub targets: Vec<Target>,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    /// RNG carried in-state so snapshots restore the stream position
    pub rng: Pcg32,
}

impl GameState {
    /// Create a fresh state in the Idle phase
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            phase: GamePhase::Idle,
            score: 0,
            lives: START_LIVES,
            level: 1,
            spawn_rate: SPAWN_RATE_START,
            target_speed: TARGET_SPEED_START,
            time_ticks: 0,
            cannon: Cannon::default(),
            pointer: Vec2::new(CANNON_X, 0.0),
            projectiles: Vec::new(),
            targets: Vec::new(),
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Return to the canonical initial state
    ///
    /// Clears every entity collection and restores the tunables; the RNG
    /// stream and pointer position carry over.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Idle;
        self.score = 0;
        self.lives = START_LIVES;
        self.level = 1;
        self.spawn_rate = SPAWN_RATE_START;
        self.target_speed = TARGET_SPEED_START;
        self.time_ticks = 0;
        self.projectiles.clear();
        self.targets.clear();
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_canonical() {
        let state = GameState::new(42);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, START_LIVES);
        assert_eq!(state.level, 1);
        assert!(state.projectiles.is_empty());
        assert!(state.targets.is_empty());
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_reset_restores_tunables() {
        let mut state = GameState::new(42);
        state.phase = GamePhase::GameOver;
        state.score = 1234;
        state.lives = 0;
        state.level = 4;
        state.spawn_rate = 0.035;
        state.target_speed = 2.5;
        state.targets.push(Target::spawn(&mut state.rng.clone(), 1.0));

        state.reset();

        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, START_LIVES);
        assert_eq!(state.level, 1);
        assert_eq!(state.spawn_rate, SPAWN_RATE_START);
        assert_eq!(state.target_speed, TARGET_SPEED_START);
        assert!(state.targets.is_empty());
    }

    #[test]
    fn test_cannon_aims_at_pointer() {
        let mut cannon = Cannon::default();
        // Pointer directly above the anchor
        cannon.aim(Vec2::new(CANNON_X, 0.0));
        assert!((cannon.angle - (-std::f32::consts::FRAC_PI_2)).abs() < 1e-5);

        // Pointer to the right
        cannon.aim(Vec2::new(CANNON_X + 100.0, CANNON_Y));
        assert!(cannon.angle.abs() < 1e-5);
    }

    #[test]
    fn test_target_spawn_ranges() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let target = Target::spawn(&mut rng, TARGET_SPEED_START);
            assert!(target.pos.x >= SPAWN_MARGIN);
            assert!(target.pos.x <= CANVAS_W - SPAWN_MARGIN);
            assert_eq!(target.pos.y, -20.0);
            assert!(target.vel.y > 0.0, "targets must fall downward");
            assert!(target.radius >= TARGET_RADIUS_MIN);
            assert!(target.radius < TARGET_RADIUS_MIN + TARGET_RADIUS_SPREAD);
            assert!((TARGET_POINTS_MIN..=TARGET_POINTS_MAX).contains(&target.points));
            assert_ne!(target.color, ColorTag::Alarm);
        }
    }
}
