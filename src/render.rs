//! Frame snapshot and renderer seam
//!
//! The simulation never draws. Each frame the session hands a read-only
//! `FrameSnapshot` to whatever `Renderer` the host injected; on wasm32 that
//! is `CanvasRenderer` over the 2D canvas context.

use glam::Vec2;

use crate::sim::{Cannon, Particle, Projectile, Target};

/// Read-only view of one frame of simulation state
#[derive(Debug)]
pub struct FrameSnapshot<'a> {
    pub cannon: &'a Cannon,
    /// Latest pointer position (crosshair endpoint)
    pub pointer: Vec2,
    pub projectiles: &'a [Projectile],
    pub targets: &'a [Target],
    pub particles: &'a [Particle],
    pub paused: bool,
}

/// Draws a frame; all drawing state lives behind this trait
pub trait Renderer {
    fn draw(&mut self, frame: &FrameSnapshot<'_>);
}

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

#[cfg(target_arch = "wasm32")]
mod canvas {
    use wasm_bindgen::JsValue;
    use web_sys::CanvasRenderingContext2d;

    use super::{FrameSnapshot, Renderer};
    use crate::Settings;
    use crate::consts::*;

    /// Canvas 2D renderer
    pub struct CanvasRenderer {
        ctx: CanvasRenderingContext2d,
        settings: Settings,
    }

    impl CanvasRenderer {
        pub fn new(ctx: CanvasRenderingContext2d, settings: Settings) -> Self {
            Self { ctx, settings }
        }

        pub fn set_settings(&mut self, settings: Settings) {
            self.settings = settings;
        }

        fn draw_cannon(&self, frame: &FrameSnapshot<'_>) {
            let ctx = &self.ctx;
            let pos = frame.cannon.pos;

            ctx.save();
            let _ = ctx.translate(pos.x as f64, pos.y as f64);
            let _ = ctx.rotate(frame.cannon.angle as f64);

            // Body
            ctx.set_fill_style_str("#8B4513");
            ctx.fill_rect(
                -(CANNON_WIDTH as f64) / 2.0,
                -(CANNON_HEIGHT as f64) / 2.0,
                CANNON_WIDTH as f64,
                CANNON_HEIGHT as f64,
            );

            // Barrel
            ctx.set_fill_style_str("#654321");
            ctx.fill_rect(CANNON_WIDTH as f64 / 2.0, -5.0, 30.0, 10.0);

            ctx.restore();

            // Base
            ctx.begin_path();
            let _ = ctx.arc(pos.x as f64, pos.y as f64, 15.0, 0.0, std::f64::consts::TAU);
            ctx.set_fill_style_str("#8B4513");
            ctx.fill();
            ctx.set_stroke_style_str("#654321");
            ctx.set_line_width(3.0);
            ctx.stroke();
        }

        fn draw_crosshair(&self, frame: &FrameSnapshot<'_>) {
            let ctx = &self.ctx;
            ctx.set_stroke_style_str("#FF0000");
            ctx.set_line_width(2.0);
            let dashes = js_sys::Array::of2(&JsValue::from_f64(5.0), &JsValue::from_f64(5.0));
            let _ = ctx.set_line_dash(&dashes);

            ctx.begin_path();
            ctx.move_to(frame.cannon.pos.x as f64, frame.cannon.pos.y as f64);
            ctx.line_to(frame.pointer.x as f64, frame.pointer.y as f64);
            ctx.stroke();

            let _ = ctx.set_line_dash(&js_sys::Array::new());
        }
    }

    impl Renderer for CanvasRenderer {
        fn draw(&mut self, frame: &FrameSnapshot<'_>) {
            let ctx = &self.ctx;
            ctx.clear_rect(0.0, 0.0, CANVAS_W as f64, CANVAS_H as f64);

            self.draw_cannon(frame);
            if self.settings.crosshair && !frame.paused {
                self.draw_crosshair(frame);
            }

            // Targets, with their point value printed on top
            for target in frame.targets {
                ctx.begin_path();
                let _ = ctx.arc(
                    target.pos.x as f64,
                    target.pos.y as f64,
                    target.radius as f64,
                    0.0,
                    std::f64::consts::TAU,
                );
                ctx.set_fill_style_str(target.color.css());
                ctx.fill();
                ctx.set_stroke_style_str("#333");
                ctx.set_line_width(2.0);
                ctx.stroke();

                ctx.set_fill_style_str("#333");
                ctx.set_font("12px Arial");
                ctx.set_text_align("center");
                let _ = ctx.fill_text(
                    &target.points.to_string(),
                    target.pos.x as f64,
                    (target.pos.y + 4.0) as f64,
                );
            }

            // Projectiles
            for projectile in frame.projectiles {
                ctx.begin_path();
                let _ = ctx.arc(
                    projectile.pos.x as f64,
                    projectile.pos.y as f64,
                    projectile.radius as f64,
                    0.0,
                    std::f64::consts::TAU,
                );
                ctx.set_fill_style_str("#FFD700");
                ctx.fill();
                ctx.set_stroke_style_str("#FFA500");
                ctx.set_line_width(1.0);
                ctx.stroke();
            }

            // Particles fade with remaining life
            for particle in frame.particles.iter().take(self.settings.max_particles()) {
                ctx.set_global_alpha(particle.fade() as f64);
                ctx.set_fill_style_str(particle.color.css());
                ctx.begin_path();
                let _ = ctx.arc(
                    particle.pos.x as f64,
                    particle.pos.y as f64,
                    PARTICLE_RADIUS as f64,
                    0.0,
                    std::f64::consts::TAU,
                );
                ctx.fill();
            }
            ctx.set_global_alpha(1.0);

            if frame.paused {
                ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
                ctx.fill_rect(0.0, 0.0, CANVAS_W as f64, CANVAS_H as f64);
                ctx.set_fill_style_str("white");
                ctx.set_font("48px Arial");
                ctx.set_text_align("center");
                let _ = ctx.fill_text("PAUSED", CANVAS_W as f64 / 2.0, CANVAS_H as f64 / 2.0);
            }
        }
    }
}
