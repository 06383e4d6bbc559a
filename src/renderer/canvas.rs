//! Canvas2D painter

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::shapes::{self, Star};
use crate::error::{Error, Result};
use crate::sim::{GamePhase, GameState};

/// Per-frame presentation flags that don't live in the simulation
#[derive(Debug, Clone)]
pub struct FrameInfo<'a> {
    /// Thrust key held (flame is drawn even while the ship is coasting)
    pub thrusting: bool,
    pub show_particles: bool,
    pub show_fps: bool,
    pub fps: u32,
    pub ship_color: &'a str,
}

/// Canvas render state
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    size: Vec2,
    stars: Vec<Star>,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| Error::Render(format!("{e:?}")))?
            .ok_or_else(|| Error::Render("2d context unsupported".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| Error::Render("not a 2d context".to_string()))?;

        let size = Vec2::new(canvas.width() as f32, canvas.height() as f32);
        log::info!("Canvas renderer {}x{}", size.x, size.y);
        Ok(Self {
            ctx,
            size,
            stars: shapes::star_field(size.x, size.y),
        })
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
        self.stars = shapes::star_field(width, height);
    }

    /// Draw one frame
    pub fn render(&self, state: &GameState, frame: &FrameInfo) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(shapes::BACKGROUND);
        ctx.fill_rect(0.0, 0.0, self.size.x as f64, self.size.y as f64);

        self.draw_stars();
        if frame.show_particles {
            self.draw_particles(state);
        }
        self.draw_ship(state, frame);
        self.draw_asteroids(state);
        self.draw_projectiles(state);

        if frame.show_fps {
            self.draw_fps(frame.fps);
        }
        if state.phase == GamePhase::Paused {
            self.draw_pause_screen();
        }
    }

    fn draw_stars(&self) {
        self.ctx.set_fill_style_str(shapes::FOREGROUND);
        for star in &self.stars {
            self.ctx.fill_rect(
                star.pos.x as f64,
                star.pos.y as f64,
                star.size as f64,
                star.size as f64,
            );
        }
    }

    fn draw_particles(&self, state: &GameState) {
        for p in &state.particles {
            let corner = shapes::centered_square(p.pos, 4.0);
            self.ctx.set_fill_style_str(&shapes::particle_color(p));
            self.ctx.set_global_alpha(p.alpha() as f64);
            self.ctx.fill_rect(corner.x as f64, corner.y as f64, 4.0, 4.0);
        }
        self.ctx.set_global_alpha(1.0);
    }

    fn draw_ship(&self, state: &GameState, frame: &FrameInfo) {
        let ctx = &self.ctx;
        let ship = &state.ship;
        let boosted = ship.boost_active();

        ctx.save();
        if ctx.translate(ship.pos.x as f64, ship.pos.y as f64).is_err()
            || ctx.rotate(ship.angle as f64).is_err()
        {
            ctx.restore();
            return;
        }

        if boosted {
            ctx.set_shadow_blur(20.0);
            ctx.set_shadow_color(shapes::BOOST_COLOR);
        }
        ctx.set_stroke_style_str(&shapes::ship_color(state, frame.ship_color));
        ctx.set_line_width(2.0);
        self.stroke_path(&shapes::SHIP_HULL, true);

        if frame.thrusting && state.phase == GamePhase::Running {
            if boosted {
                ctx.set_stroke_style_str(shapes::BOOST_COLOR);
                ctx.set_line_width(3.0);
            } else {
                ctx.set_stroke_style_str(shapes::BULLET_COLOR);
            }
            self.stroke_path(&shapes::thrust_flame(boosted), false);
        }
        ctx.restore();
    }

    fn draw_asteroids(&self, state: &GameState) {
        self.ctx.set_stroke_style_str(shapes::FOREGROUND);
        self.ctx.set_line_width(2.0);
        for asteroid in &state.asteroids {
            self.stroke_path(&shapes::asteroid_polygon(asteroid), true);
        }
    }

    fn draw_projectiles(&self, state: &GameState) {
        self.ctx.set_fill_style_str(shapes::BULLET_COLOR);
        for p in &state.projectiles {
            let corner = shapes::centered_square(p.pos, 4.0);
            self.ctx
                .fill_rect(corner.x as f64, corner.y as f64, 4.0, 4.0);
        }
    }

    fn draw_fps(&self, fps: u32) {
        self.ctx.set_fill_style_str(shapes::ACCENT_COLOR);
        self.ctx.set_font("14px Arial");
        let _ = self.ctx.fill_text(&format!("FPS: {fps}"), 10.0, 20.0);
    }

    fn draw_pause_screen(&self) {
        let ctx = &self.ctx;
        let (w, h) = (self.size.x as f64, self.size.y as f64);
        ctx.set_fill_style_str("rgba(0, 0, 0, 0.7)");
        ctx.fill_rect(0.0, 0.0, w, h);

        ctx.set_fill_style_str(shapes::ACCENT_COLOR);
        ctx.set_text_align("center");
        ctx.set_font("bold 48px Arial");
        let _ = ctx.fill_text("PAUSED", w / 2.0, h / 2.0);
        ctx.set_font("20px Arial");
        let _ = ctx.fill_text("Press P to resume", w / 2.0, h / 2.0 + 40.0);
        ctx.set_text_align("left");
    }

    fn stroke_path(&self, points: &[Vec2], closed: bool) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            ctx.line_to(p.x as f64, p.y as f64);
        }
        if closed {
            ctx.close_path();
        }
        ctx.stroke();
        // Shadow only applies to the stroke that asked for it
        ctx.set_shadow_blur(0.0);
    }
}
