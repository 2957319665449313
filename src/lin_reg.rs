use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::{
    coordinates::{PlotRegion, Point},
    error::{ClipError, RegressionError},
};

// endpoints may leave the plot by this much due to rounding before the line counts as missing it
const CLIP_TOLERANCE: f64 = 1e-9;

/// Least squares fit of a point set, recomputed from scratch every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
    pub r_value: f64,
    /// Two sided p-value for a slope of zero. `None` with only two points (no degrees of freedom).
    pub p_value: Option<f64>,
    /// Standard error of the slope. `None` with only two points (no degrees of freedom).
    pub std_err: Option<f64>,
}

impl RegressionResult {
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// The regression line cut down to the visible plot region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// Ordinary least squares over the x and y components of `points`.
pub fn fit(points: &[Point]) -> Result<RegressionResult, RegressionError> {
    let n = points.len();
    if n < 2 {
        return Err(RegressionError::TooFewPoints(n));
    }
    let first_x = points[0].x;
    if points.iter().all(|point| point.x == first_x) {
        return Err(RegressionError::ZeroXVariance);
    }

    let len = n as f64;
    let mean_x = points.iter().map(|point| point.x).sum::<f64>() / len;
    let mean_y = points.iter().map(|point| point.y).sum::<f64>() / len;

    let (x_squared, y_squared, xy) =
        points
            .iter()
            .fold((0.0, 0.0, 0.0), |(x_squared, y_squared, xy), point| {
                let dev_x = point.x - mean_x;
                let dev_y = point.y - mean_y;
                (
                    x_squared + dev_x * dev_x,
                    y_squared + dev_y * dev_y,
                    xy + dev_x * dev_y,
                )
            });
    if x_squared == 0.0 {
        return Err(RegressionError::ZeroXVariance);
    }

    let slope = xy / x_squared;
    let intercept = mean_y - slope * mean_x;
    let r_value = if y_squared == 0.0 {
        0.0
    } else {
        (xy / (x_squared * y_squared).sqrt()).clamp(-1.0, 1.0)
    };

    let degrees_of_freedom = n - 2;
    if degrees_of_freedom == 0 {
        return Ok(RegressionResult {
            slope,
            intercept,
            r_value,
            p_value: None,
            std_err: None,
        });
    }
    let df = degrees_of_freedom as f64;

    let residual_squared = points.iter().fold(0.0, |acc, point| {
        let residual = point.y - (slope * point.x + intercept);
        acc + residual * residual
    });
    let std_err = (residual_squared / df / x_squared).sqrt();

    let one_minus_r_squared = (1.0 - r_value) * (1.0 + r_value);
    let p_value = if one_minus_r_squared <= 0.0 {
        0.0
    } else {
        let t = r_value * (df / one_minus_r_squared).sqrt();
        let dist = StudentsT::new(0.0, 1.0, df)?;
        (2.0 * dist.cdf(-t.abs())).clamp(0.0, 1.0)
    };

    Ok(RegressionResult {
        slope,
        intercept,
        r_value,
        p_value: Some(p_value),
        std_err: Some(std_err),
    })
}

/// Cuts the regression line to `[0, width] x [0, height]`.
///
/// Each end starts at `x = 0` or `x = width`; an end outside the vertical range is moved
/// along the line onto `y = 0` or `y = height`. Lines that never enter the region are an error.
pub fn clip_to_region(
    result: &RegressionResult,
    region: &PlotRegion,
) -> Result<Segment, ClipError> {
    let misses = ClipError::MissesRegion {
        slope: result.slope,
        intercept: result.intercept,
    };

    let start = clip_endpoint(result, 0.0, region.height).ok_or_else(|| misses.clone())?;
    let end = clip_endpoint(result, region.width, region.height).ok_or_else(|| misses.clone())?;

    if start.x > end.x + CLIP_TOLERANCE
        || start.x > region.width + CLIP_TOLERANCE
        || end.x < -CLIP_TOLERANCE
    {
        return Err(misses);
    }
    Ok(Segment { start, end })
}

fn clip_endpoint(result: &RegressionResult, x: f64, height: f64) -> Option<Point> {
    let y = result.value_at(x);
    let target = if y < 0.0 {
        0.0
    } else if y > height {
        height
    } else {
        return Some(Point::new(x, y));
    };
    if result.slope == 0.0 {
        return None;
    }
    Some(Point::new((target - result.intercept) / result.slope, target))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn points(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&xy| xy.into()).collect()
    }

    fn line(slope: f64, intercept: f64) -> RegressionResult {
        RegressionResult {
            slope,
            intercept,
            r_value: 0.0,
            p_value: None,
            std_err: None,
        }
    }

    fn square(side: f64) -> PlotRegion {
        PlotRegion {
            width: side,
            height: side,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    #[test]
    fn perfect_line() {
        let result = fit(&points(&[(0.0, 3.0), (1.0, 5.0), (2.0, 7.0), (3.0, 9.0)])).unwrap();
        assert_abs_diff_eq!(result.slope, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.intercept, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.r_value, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.p_value.unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.std_err.unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn falling_line_has_negative_r() {
        let result = fit(&points(&[(0.0, 4.0), (1.0, 3.0), (2.0, 2.0)])).unwrap();
        assert_abs_diff_eq!(result.slope, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.r_value, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn noisy_points() {
        // hand computed: sxx = 10, sxy = 19, syy = 37.2
        let result = fit(&points(&[
            (0.0, 0.0),
            (1.0, 2.0),
            (2.0, 3.0),
            (3.0, 5.0),
            (4.0, 8.0),
        ]))
        .unwrap();
        assert_abs_diff_eq!(result.slope, 1.9, epsilon = 1e-12);
        assert_abs_diff_eq!(result.intercept, -0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(result.r_value, 0.985104109993904, epsilon = 1e-9);
        assert_abs_diff_eq!(result.std_err.unwrap(), 0.19148542155126758, epsilon = 1e-9);
        assert_abs_diff_eq!(result.p_value.unwrap(), 0.0021775131135874756, epsilon = 1e-6);
    }

    #[test]
    fn two_points_leave_p_value_and_std_err_undefined() {
        let result = fit(&points(&[(1.0, 1.0), (3.0, 5.0)])).unwrap();
        assert_abs_diff_eq!(result.slope, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.intercept, -1.0, epsilon = 1e-12);
        assert_eq!(result.p_value, None);
        assert_eq!(result.std_err, None);
    }

    #[test]
    fn too_few_points() {
        assert!(matches!(fit(&[]), Err(RegressionError::TooFewPoints(0))));
        assert!(matches!(
            fit(&points(&[(1.0, 1.0)])),
            Err(RegressionError::TooFewPoints(1))
        ));
    }

    #[test]
    fn identical_x_values() {
        let vertical = points(&[(0.1, 1.0), (0.1, 2.0), (0.1, 7.0)]);
        assert!(matches!(fit(&vertical), Err(RegressionError::ZeroXVariance)));
    }

    #[test]
    fn constant_y_gives_flat_line() {
        let result = fit(&points(&[(0.0, 5.0), (1.0, 5.0), (2.0, 5.0), (3.0, 5.0)])).unwrap();
        assert_eq!(result.slope, 0.0);
        assert_abs_diff_eq!(result.intercept, 5.0, epsilon = 1e-12);
        assert_eq!(result.r_value, 0.0);
        assert_abs_diff_eq!(result.p_value.unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(result.std_err, Some(0.0));
    }

    #[test]
    fn line_inside_region_is_unchanged() {
        let segment = clip_to_region(&line(0.5, 100.0), &square(600.0)).unwrap();
        assert_eq!(segment.start, Point::new(0.0, 100.0));
        assert_eq!(segment.end, Point::new(600.0, 400.0));
    }

    #[test]
    fn negative_intercept_starts_at_x_intercept() {
        let segment = clip_to_region(&line(0.5, -50.0), &square(600.0)).unwrap();
        assert_eq!(segment.start.y, 0.0);
        assert_abs_diff_eq!(segment.start.x, 100.0, epsilon = 1e-12);
        assert_eq!(segment.end, Point::new(600.0, 250.0));
    }

    #[test]
    fn steep_line_ends_at_top() {
        let segment = clip_to_region(&line(2.0, 0.0), &square(600.0)).unwrap();
        assert_eq!(segment.start, Point::new(0.0, 0.0));
        assert_eq!(segment.end.y, 600.0);
        assert_abs_diff_eq!(segment.end.x, 300.0, epsilon = 1e-12);
    }

    #[test]
    fn falling_line_is_contained() {
        let segment = clip_to_region(&line(-2.0, 700.0), &square(600.0)).unwrap();
        assert_eq!(segment.start, Point::new(50.0, 600.0));
        assert_eq!(segment.end, Point::new(350.0, 0.0));
        assert!(square(600.0).contains(segment.start));
        assert!(square(600.0).contains(segment.end));
    }

    #[test]
    fn flat_line_outside_region_is_reported() {
        assert_eq!(
            clip_to_region(&line(0.0, -10.0), &square(600.0)),
            Err(ClipError::MissesRegion {
                slope: 0.0,
                intercept: -10.0
            })
        );
        assert!(clip_to_region(&line(0.0, 601.0), &square(600.0)).is_err());
    }

    #[test]
    fn nearly_flat_line_below_region_is_reported() {
        assert!(clip_to_region(&line(1e-12, -10.0), &square(600.0)).is_err());
    }

    #[test]
    fn line_passing_below_corner_is_reported() {
        assert!(clip_to_region(&line(1.0, -700.0), &square(600.0)).is_err());
    }
}
