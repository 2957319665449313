use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::{coordinates::PlotRegion, error::ConfigError, point_generator::LinearFunction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: Rgb,
    pub axis: Rgb,
    pub point: Rgb,
    pub regression_line: Rgb,
    pub cursor: Rgb,
    pub text: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb(0, 0, 0),
            axis: Rgb(255, 255, 255),
            point: Rgb(200, 200, 255),
            regression_line: Rgb(0, 128, 255),
            cursor: Rgb(255, 255, 0),
            text: Rgb(255, 255, 255),
        }
    }
}

/// Stroke widths, marker sizes and placement of the statistics panel, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub axis_width: f64,
    pub line_width: f64,
    pub point_radius: f64,
    pub cursor_radius: f64,
    /// distance of the statistics panel from the right window border
    pub stats_right_margin: f64,
    pub stats_top: f64,
    pub stats_line_spacing: f64,
    /// decimal places shown for every statistic
    pub precision: usize,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            axis_width: 2.0,
            line_width: 3.0,
            point_radius: 3.0,
            cursor_radius: 7.0,
            stats_right_margin: 200.0,
            stats_top: 10.0,
            stats_line_spacing: 25.0,
            precision: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub function: LinearFunction,
    pub std: f64,
    /// number of generated points, the cursor comes on top
    pub num_points: usize,
    pub window_width: f64,
    pub window_height: f64,
    pub plot: PlotRegion,
    pub frame_rate: u32,
    /// seed for the point generator, taken from the OS when missing
    pub seed: Option<u64>,
    pub palette: Palette,
    pub style: Style,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            function: LinearFunction::default(),
            std: 80.0,
            num_points: 30,
            window_width: 800.0,
            window_height: 800.0,
            plot: PlotRegion::default(),
            frame_rate: 60,
            seed: None,
            palette: Palette::default(),
            style: Style::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let mut s = String::new();
        BufReader::new(File::open(path)?).read_to_string(&mut s)?;
        Ok(toml::from_str(&s)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |value: f64| value.is_finite() && value > 0.0;
        if !positive(self.window_width) || !positive(self.window_height) {
            return Err(invalid(format!(
                "window size {}x{} must be positive",
                self.window_width, self.window_height
            )));
        }
        let plot = &self.plot;
        if !positive(plot.width) || !positive(plot.height) {
            return Err(invalid(format!(
                "plot size {}x{} must be positive",
                plot.width, plot.height
            )));
        }
        let fits = plot.offset_x >= 0.0
            && plot.offset_y >= 0.0
            && plot.offset_x + plot.width <= self.window_width
            && plot.offset_y + plot.height <= self.window_height;
        if !fits {
            return Err(invalid(format!(
                "plot {}x{} at ({}, {}) does not fit into the {}x{} window",
                plot.width,
                plot.height,
                plot.offset_x,
                plot.offset_y,
                self.window_width,
                self.window_height
            )));
        }
        if !(self.std.is_finite() && self.std >= 0.0) {
            return Err(invalid(format!(
                "standard deviation {} must be finite and not negative",
                self.std
            )));
        }
        if !self.function.slope.is_finite() || !self.function.intercept.is_finite() {
            return Err(invalid("slope and intercept must be finite".to_string()));
        }
        if self.frame_rate == 0 {
            return Err(invalid("frame rate must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}

/// Interactive least squares regression line
#[derive(Debug, Parser)]
#[command(name = "lsrl_sim", version)]
pub struct Args {
    /// TOML file overriding the default configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// seed for the point generator
    #[arg(long)]
    pub seed: Option<u64>,
    /// number of generated points
    #[arg(long)]
    pub points: Option<usize>,
    /// standard deviation of the points around the mean function
    #[arg(long)]
    pub std: Option<f64>,
    /// slope of the mean function
    #[arg(long, allow_negative_numbers = true)]
    pub slope: Option<f64>,
    /// y-intercept of the mean function
    #[arg(long, allow_negative_numbers = true)]
    pub intercept: Option<f64>,
    /// more logging, repeat for even more
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Defaults, overridden by the config file, overridden by the command line.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let mut config = match self.config.as_ref() {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(points) = self.points {
            config.num_points = points;
        }
        if let Some(std) = self.std {
            config.std = std;
        }
        if let Some(slope) = self.slope {
            config.function.slope = slope;
        }
        if let Some(intercept) = self.intercept {
            config.function.intercept = intercept;
        }
        config.validate()?;
        Ok(config)
    }
}
