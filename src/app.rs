use std::time::Instant;

use egui::{Align2, Color32, Context, FontId, Key, Painter, Pos2};
use log::info;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::{Config, Rgb},
    coordinates::ScreenPoint,
    error::GeneratorError,
    frame::{ControllerState, FrameController, InputSource, Surface},
    pacer::FramePacer,
    point_generator::PointGenerator,
};

const STATS_FONT_SIZE: f32 = 16.0;

pub struct LsrlApp {
    controller: FrameController,
    pacer: FramePacer,
    last_pointer: ScreenPoint,
}

impl LsrlApp {
    /// Generates the point cloud. Called once before the first frame.
    pub fn new(config: Config) -> Result<Self, GeneratorError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        info!("generating {} points with seed {}", config.num_points, seed);

        let generator = PointGenerator::new(config.function, config.std, &config.plot)?;
        let points = generator.generate_points(config.num_points, &mut StdRng::seed_from_u64(seed));

        Ok(Self {
            pacer: FramePacer::new(config.frame_rate),
            controller: FrameController::new(config, points),
            last_pointer: ScreenPoint::default(),
        })
    }

    pub fn native_options(config: &Config) -> eframe::NativeOptions {
        eframe::NativeOptions {
            initial_window_size: Some(egui::vec2(
                config.window_width as f32,
                config.window_height as f32,
            )),
            resizable: false,
            ..Default::default()
        }
    }
}

impl eframe::App for LsrlApp {
    fn update(&mut self, ctx: &Context, frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let mut surface = PainterSurface {
                    painter: ui.painter(),
                    ctx,
                    pacer: &mut self.pacer,
                };
                let mut input = PointerInput {
                    ctx,
                    last_pointer: &mut self.last_pointer,
                };
                self.controller.tick(&mut surface, &mut input);
            });

        if self.controller.state() == ControllerState::Stopped {
            frame.close();
        }
    }
}

struct PainterSurface<'a> {
    painter: &'a Painter,
    ctx: &'a Context,
    pacer: &'a mut FramePacer,
}

impl Surface for PainterSurface<'_> {
    fn clear(&mut self, color: Rgb) {
        self.painter
            .rect_filled(self.painter.clip_rect(), 0.0, to_color(color));
    }

    fn draw_line(&mut self, from: ScreenPoint, to: ScreenPoint, color: Rgb, width: f64) {
        self.painter
            .line_segment([to_pos(from), to_pos(to)], (width as f32, to_color(color)));
    }

    fn draw_circle(&mut self, center: ScreenPoint, radius: f64, color: Rgb) {
        self.painter
            .circle_filled(to_pos(center), radius as f32, to_color(color));
    }

    fn draw_text(&mut self, text: &str, position: ScreenPoint, color: Rgb) {
        self.painter.text(
            to_pos(position),
            Align2::LEFT_TOP,
            text,
            FontId::proportional(STATS_FONT_SIZE),
            to_color(color),
        );
    }

    // egui presents once `update` returns, all that is left is scheduling the next tick
    fn present(&mut self) {
        let delay = self.pacer.frame_presented(Instant::now());
        self.ctx.request_repaint_after(delay);
    }
}

/// Pointer and keyboard state of the window. The pointer keeps its last position when it
/// leaves the window.
struct PointerInput<'a> {
    ctx: &'a Context,
    last_pointer: &'a mut ScreenPoint,
}

impl InputSource for PointerInput<'_> {
    fn current_pointer_position(&mut self) -> ScreenPoint {
        if let Some(pos) = self.ctx.pointer_hover_pos() {
            *self.last_pointer = ScreenPoint::new(pos.x as f64, pos.y as f64);
        }
        *self.last_pointer
    }

    fn poll_quit_requested(&mut self) -> bool {
        self.ctx.input().key_pressed(Key::Escape) || self.ctx.input().key_pressed(Key::Q)
    }
}

fn to_pos(point: ScreenPoint) -> Pos2 {
    Pos2::new(point.x as f32, point.y as f32)
}

fn to_color(Rgb(r, g, b): Rgb) -> Color32 {
    Color32::from_rgb(r, g, b)
}
