use log::{debug, warn};
use rand::{
    distributions::{Distribution, Uniform},
    Rng,
};
use rand_distr::Normal;
use serde::{Deserialize, Serialize};
use statrs::function::erf::erfc;

use crate::{
    coordinates::{PlotRegion, Point},
    error::GeneratorError,
};

/// Below this expected acceptance rate the rejection sampler is considered starved.
pub const MIN_ACCEPTANCE_RATE: f64 = 1e-9;
const STARVATION_WARN_INTERVAL: u64 = 10_000;
const ACCEPTANCE_SAMPLES: usize = 1_000;
/// Means further than this many standard deviations outside the plot never get accepted in practice.
pub const NEGLIGIBLE_SIGMAS: f64 = 10.0;

/// The mean function `f(x) = slope * x + intercept` points are scattered around.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearFunction {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFunction {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

impl Default for LinearFunction {
    fn default() -> Self {
        Self {
            slope: 1.0,
            intercept: 0.0,
        }
    }
}

/// Draws points with `x ~ U[0, width)` and `y ~ N(f(x), std)`, rejecting every candidate with
/// `y` outside `[0, height]`.
///
/// Rejected candidates are redrawn completely, so accepted points follow the truncated
/// distribution instead of piling up on the border. A candidate is accepted with
/// probability [`PointGenerator::acceptance_rate`]; the expected number of draws per point is
/// its inverse.
#[derive(Debug, Clone)]
pub struct PointGenerator {
    function: LinearFunction,
    x_dist: Uniform<f64>,
    noise: Normal<f64>,
    height: f64,
    acceptance_rate: f64,
}

impl PointGenerator {
    pub fn new(
        function: LinearFunction,
        std: f64,
        region: &PlotRegion,
    ) -> Result<Self, GeneratorError> {
        let empty = !(region.width > 0.0 && region.height > 0.0)
            || !region.width.is_finite()
            || !region.height.is_finite();
        if empty {
            return Err(GeneratorError::EmptyPlot {
                width: region.width,
                height: region.height,
            });
        }
        if !(std >= 0.0) {
            return Err(GeneratorError::InvalidStd(std));
        }

        let acceptance_rate = expected_acceptance_rate(function, std, region);
        debug!(
            "expected acceptance rate of the point sampler: {:.6}",
            acceptance_rate
        );
        if !(acceptance_rate >= MIN_ACCEPTANCE_RATE) {
            return Err(GeneratorError::Starvation { acceptance_rate });
        }

        let noise = Normal::new(0.0, std)?;

        Ok(Self {
            function,
            x_dist: Uniform::new(0.0, region.width),
            noise,
            height: region.height,
            acceptance_rate,
        })
    }

    pub fn acceptance_rate(&self) -> f64 {
        self.acceptance_rate
    }

    pub fn generate_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        let mut rejected: u64 = 0;
        loop {
            let x = self.x_dist.sample(rng);
            let y = self.function.at(x) + self.noise.sample(rng);
            if (0.0..=self.height).contains(&y) {
                return Point::new(x, y);
            }
            rejected += 1;
            if rejected % STARVATION_WARN_INTERVAL == 0 {
                warn!(
                    "rejected {} candidate points in a row (expected acceptance rate {:.6})",
                    rejected, self.acceptance_rate
                );
            }
        }
    }

    pub fn generate_points<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Point> {
        (0..count).map(|_| self.generate_point(rng)).collect()
    }
}

/// Probability that a single candidate lands inside the plot, averaged over `x`.
///
/// Only the `x` range where `f(x)` lies within [`NEGLIGIBLE_SIGMAS`] standard deviations of
/// `[0, height]` contributes, so the midpoint rule runs over that range alone. Steep mean
/// functions cross the plot in a narrow band that a grid over the full width would step over.
pub fn expected_acceptance_rate(function: LinearFunction, std: f64, region: &PlotRegion) -> f64 {
    if !std.is_finite() || std < 0.0 {
        return 0.0;
    }
    let low = -NEGLIGIBLE_SIGMAS * std;
    let high = region.height + NEGLIGIBLE_SIGMAS * std;
    let (start, end) = if function.slope == 0.0 {
        if !(low..=high).contains(&function.intercept) {
            return 0.0;
        }
        (0.0, region.width)
    } else {
        let x_low = (low - function.intercept) / function.slope;
        let x_high = (high - function.intercept) / function.slope;
        (
            x_low.min(x_high).max(0.0),
            x_low.max(x_high).min(region.width),
        )
    };
    if !(start < end) {
        return 0.0;
    }

    let step = (end - start) / ACCEPTANCE_SAMPLES as f64;
    let total: f64 = (0..ACCEPTANCE_SAMPLES)
        .map(|i| {
            let mean = function.at(start + (i as f64 + 0.5) * step);
            if std == 0.0 {
                return if (0.0..=region.height).contains(&mean) {
                    1.0
                } else {
                    0.0
                };
            }
            standard_normal_cdf((region.height - mean) / std) - standard_normal_cdf(-mean / std)
        })
        .sum();
    total * step / region.width
}

fn standard_normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / std::f64::consts::SQRT_2)
}
