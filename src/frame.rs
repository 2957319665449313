use std::iter;

use itertools::Itertools;
use log::{debug, info};

use crate::{
    config::{Config, Rgb},
    coordinates::{CoordinateMapper, Point, ScreenPoint},
    error::RegressionError,
    lin_reg::{self, RegressionResult, Segment},
};

/// Something the frame can be drawn on. Positions are in screen coordinates.
pub trait Surface {
    fn clear(&mut self, color: Rgb);
    fn draw_line(&mut self, from: ScreenPoint, to: ScreenPoint, color: Rgb, width: f64);
    fn draw_circle(&mut self, center: ScreenPoint, radius: f64, color: Rgb);
    /// `position` is the top left corner of the text.
    fn draw_text(&mut self, text: &str, position: ScreenPoint, color: Rgb);
    fn present(&mut self);
}

pub trait InputSource {
    fn current_pointer_position(&mut self) -> ScreenPoint;
    fn poll_quit_requested(&mut self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    Running,
    Stopped,
}

/// What a single tick computed. Nothing in here is kept for the next tick.
#[derive(Debug)]
pub struct FrameReport {
    pub state: ControllerState,
    pub cursor: Point,
    pub fit: Result<RegressionResult, RegressionError>,
    pub segment: Option<Segment>,
}

pub const STAT_LABELS: [&str; 5] = [
    "Slope",
    "Y-Intercept",
    "R-Value",
    "P-Value",
    "Standard Error",
];

pub struct FrameController {
    config: Config,
    mapper: CoordinateMapper,
    points: Vec<Point>,
    state: ControllerState,
    degenerate: bool,
}

impl FrameController {
    pub fn new(config: Config, points: Vec<Point>) -> Self {
        Self {
            mapper: CoordinateMapper::new(config.plot),
            config,
            points,
            state: ControllerState::Running,
            degenerate: false,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs one frame. Returns `None` once the controller has stopped.
    pub fn tick<S, I>(&mut self, surface: &mut S, input: &mut I) -> Option<FrameReport>
    where
        S: Surface + ?Sized,
        I: InputSource + ?Sized,
    {
        if self.state == ControllerState::Stopped {
            return None;
        }
        let palette = self.config.palette;
        let style = self.config.style;

        surface.clear(palette.background);

        let [top_left, bottom_left, bottom_right] = self.mapper.axis_corners();
        surface.draw_line(top_left, bottom_left, palette.axis, style.axis_width);
        surface.draw_line(bottom_left, bottom_right, palette.axis, style.axis_width);

        for point in &self.points {
            surface.draw_circle(
                self.mapper.to_screen(*point),
                style.point_radius,
                palette.point,
            );
        }

        let pointer = input.current_pointer_position();
        surface.draw_circle(pointer, style.cursor_radius, palette.cursor);
        let cursor = self.mapper.to_cartesian(pointer);

        let augmented = self
            .points
            .iter()
            .copied()
            .chain(iter::once(cursor))
            .collect_vec();

        let fit = lin_reg::fit(&augmented);
        let segment = match fit.as_ref() {
            Ok(result) => match lin_reg::clip_to_region(result, &self.mapper.region()) {
                Ok(segment) => Ok(segment),
                Err(err) => Err(err.to_string()),
            },
            Err(err) => Err(err.to_string()),
        };
        match &segment {
            Err(reason) if !self.degenerate => {
                debug!("no regression line for cursor at {:?}: {}", cursor, reason);
                self.degenerate = true;
            }
            Ok(_) if self.degenerate => {
                debug!("regression line is defined again");
                self.degenerate = false;
            }
            _ => {}
        }
        let segment = segment.ok();

        if let Some(segment) = segment {
            surface.draw_line(
                self.mapper.to_screen(segment.start),
                self.mapper.to_screen(segment.end),
                palette.regression_line,
                style.line_width,
            );
        }

        let stats_x = self.config.window_width - style.stats_right_margin;
        for (i, line) in stat_lines(fit.as_ref().ok(), style.precision)
            .iter()
            .enumerate()
        {
            let position = ScreenPoint::new(
                stats_x,
                style.stats_top + i as f64 * style.stats_line_spacing,
            );
            surface.draw_text(line, position, palette.text);
        }

        if input.poll_quit_requested() {
            info!("quit requested, stopping");
            self.state = ControllerState::Stopped;
        } else {
            surface.present();
        }

        Some(FrameReport {
            state: self.state,
            cursor,
            fit,
            segment,
        })
    }
}

/// The statistics panel text, one line per entry of [`STAT_LABELS`].
pub fn stat_lines(result: Option<&RegressionResult>, precision: usize) -> Vec<String> {
    let values = match result {
        Some(result) => [
            Some(result.slope),
            Some(result.intercept),
            Some(result.r_value),
            result.p_value,
            result.std_err,
        ],
        None => [None; 5],
    };
    values
        .iter()
        .zip(STAT_LABELS)
        .map(|(value, label)| format!("{}: {}", label, format_stat(*value, precision)))
        .collect()
}

pub fn format_stat(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(value) if value.is_finite() => {
            let scale = 10f64.powi(precision as i32);
            let mut rounded = (value * scale).round() / scale;
            if rounded == 0.0 {
                // no "-0.0000"
                rounded = 0.0;
            }
            format!("{:.*}", precision, rounded)
        }
        _ => "undefined".to_string(),
    }
}
