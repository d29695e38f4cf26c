//! Per-frame simulation update
//!
//! `tick` advances the world by one fixed timestep. Commands that make no
//! sense in the current phase (start while running, pause while idle) are
//! no-ops, not errors. Anything the host should react to is pushed into the
//! caller-owned `GameEvent` buffer.

use glam::Vec2;
use rand::Rng;

use super::collision::{circles_intersect, outside_canvas, past_floor};
use super::state::{ColorTag, GameEvent, GamePhase, GameState, Particle, Projectile, Target};
use crate::consts::*;

/// Input latched for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer position in canvas space
    pub pointer: Option<Vec2>,
    /// Fire a projectile (click/tap)
    pub shoot: bool,
    /// Start command (Idle only)
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Reset to the canonical initial state
    pub reset: bool,
    /// Reset and immediately start a new run
    pub replay: bool,
}

impl TickInput {
    /// Clear everything that must not repeat on the next substep
    pub fn clear_one_shot(&mut self) {
        self.shoot = false;
        self.start = false;
        self.pause = false;
        self.reset = false;
        self.replay = false;
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, events: &mut Vec<GameEvent>) {
    // Commands first; reset wins over everything else in the same tick
    if input.reset {
        state.reset();
    }
    if input.replay {
        state.reset();
        state.phase = GamePhase::Running;
    }
    if input.start && state.phase == GamePhase::Idle {
        state.phase = GamePhase::Running;
    }
    if input.pause {
        match state.phase {
            GamePhase::Running => state.phase = GamePhase::Paused,
            GamePhase::Paused => state.phase = GamePhase::Running,
            _ => {}
        }
    }

    // Aiming tracks the pointer in every phase; entities only move while Running
    if let Some(pointer) = input.pointer {
        state.pointer = pointer;
        state.cannon.aim(pointer);
    }

    if state.phase != GamePhase::Running {
        return;
    }

    state.time_ticks += 1;

    // Fire
    if input.shoot && state.projectiles.len() < MAX_PROJECTILES {
        state.projectiles.push(Projectile::fire(&state.cannon));
    }

    // Spawn
    if state.targets.len() < MAX_TARGETS && state.rng.random::<f32>() < state.spawn_rate {
        let target = Target::spawn(&mut state.rng, state.target_speed);
        state.targets.push(target);
    }

    // Advance projectiles, cull off-canvas
    for projectile in &mut state.projectiles {
        projectile.pos += projectile.vel * dt;
    }
    state
        .projectiles
        .retain(|p| !outside_canvas(p.pos, CANVAS_W, CANVAS_H));

    // Advance targets, handle escapes
    for target in &mut state.targets {
        target.pos += target.vel * dt;
    }
    let mut i = 0;
    while i < state.targets.len() {
        if past_floor(state.targets[i].pos, state.targets[i].radius, CANVAS_H) {
            let target = state.targets.remove(i);
            spawn_burst(
                state,
                Vec2::new(target.pos.x, CANVAS_H),
                ColorTag::Alarm,
            );
            if state.lives > 0 {
                state.lives -= 1;
                events.push(GameEvent::TargetEscaped { lives: state.lives });
                if state.lives == 0 {
                    state.phase = GamePhase::GameOver;
                    events.push(GameEvent::GameOver {
                        score: state.score,
                        level: state.level,
                    });
                }
            }
        } else {
            i += 1;
        }
    }
    if state.phase == GamePhase::GameOver {
        return;
    }

    // Collision resolution: each projectile destroys at most one target,
    // first intersecting target in insertion order wins
    let mut p = 0;
    'projectiles: while p < state.projectiles.len() {
        for t in 0..state.targets.len() {
            let hit = circles_intersect(
                state.projectiles[p].pos,
                state.projectiles[p].radius,
                state.targets[t].pos,
                state.targets[t].radius,
            );
            if hit {
                let target = state.targets.remove(t);
                state.projectiles.remove(p);
                spawn_burst(state, target.pos, target.color);
                award_points(state, target.points, events);
                continue 'projectiles;
            }
        }
        p += 1;
    }

    // Advance particles
    for particle in &mut state.particles {
        particle.pos += particle.vel * dt;
        particle.life -= 1;
    }
    state.particles.retain(|p| p.life > 0);
}

/// Add score and apply one level-up per threshold multiple crossed
///
/// A +37 gain jumping 483 to 520 levels up once; a gain spanning two
/// multiples levels up twice, each step applying its own increments.
fn award_points(state: &mut GameState, points: u32, events: &mut Vec<GameEvent>) {
    let old_score = state.score;
    state.score += points;

    let crossed = state.score / LEVEL_STEP - old_score / LEVEL_STEP;
    for _ in 0..crossed {
        state.level += 1;
        state.spawn_rate += SPAWN_RATE_PER_LEVEL;
        state.target_speed += TARGET_SPEED_PER_LEVEL;
        events.push(GameEvent::LevelUp { level: state.level });
    }
}

/// Burst of particles at a destructive event
fn spawn_burst(state: &mut GameState, pos: Vec2, color: ColorTag) {
    for _ in 0..BURST_PARTICLES {
        if state.particles.len() >= MAX_PARTICLES {
            break;
        }
        let vel = Vec2::new(
            state.rng.random_range(-PARTICLE_MAX_SPEED..PARTICLE_MAX_SPEED),
            state.rng.random_range(-PARTICLE_MAX_SPEED..PARTICLE_MAX_SPEED),
        );
        state.particles.push(Particle {
            pos,
            vel,
            life: PARTICLE_LIFE_TICKS,
            max_life: PARTICLE_LIFE_TICKS,
            color,
        });
    }
}
