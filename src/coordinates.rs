use serde::{Deserialize, Serialize};

/// A point in plot space: origin bottom left, y grows upwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A point on the window: origin top left, y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of the plotting area and its offset from the top left corner of the window, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotRegion {
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl PlotRegion {
    pub fn contains(&self, point: Point) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

impl Default for PlotRegion {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 600.0,
            offset_x: 100.0,
            offset_y: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
    region: PlotRegion,
}

impl CoordinateMapper {
    pub fn new(region: PlotRegion) -> Self {
        Self { region }
    }

    pub fn region(&self) -> PlotRegion {
        self.region
    }

    pub fn to_screen(&self, point: Point) -> ScreenPoint {
        ScreenPoint {
            x: point.x + self.region.offset_x,
            y: self.region.height - point.y + self.region.offset_y,
        }
    }

    pub fn to_cartesian(&self, screen: ScreenPoint) -> Point {
        Point {
            x: screen.x - self.region.offset_x,
            y: self.region.height - screen.y + self.region.offset_y,
        }
    }

    /// Screen positions of the plot corners: top left, bottom left and bottom right.
    pub fn axis_corners(&self) -> [ScreenPoint; 3] {
        [
            self.to_screen(Point::new(0.0, self.region.height)),
            self.to_screen(Point::new(0.0, 0.0)),
            self.to_screen(Point::new(self.region.width, 0.0)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    #[test]
    fn origin_maps_to_bottom_left_of_plot() {
        let mapper = CoordinateMapper::new(PlotRegion::default());
        assert_eq!(
            mapper.to_screen(Point::new(0.0, 0.0)),
            ScreenPoint::new(100.0, 700.0)
        );
        assert_eq!(
            mapper.to_screen(Point::new(600.0, 600.0)),
            ScreenPoint::new(700.0, 100.0)
        );
    }

    #[test]
    fn screen_y_grows_downwards() {
        let mapper = CoordinateMapper::new(PlotRegion::default());
        let low = mapper.to_screen(Point::new(10.0, 10.0));
        let high = mapper.to_screen(Point::new(10.0, 20.0));
        assert!(high.y < low.y);
    }

    #[test]
    fn round_trip_is_identity() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let region = PlotRegion {
                width: rng.gen_range(1.0..2000.0),
                height: rng.gen_range(1.0..2000.0),
                offset_x: rng.gen_range(-500.0..500.0),
                offset_y: rng.gen_range(-500.0..500.0),
            };
            let mapper = CoordinateMapper::new(region);
            let point = Point::new(rng.gen_range(-1e4..1e4), rng.gen_range(-1e4..1e4));
            let back = mapper.to_cartesian(mapper.to_screen(point));
            assert_abs_diff_eq!(back.x, point.x, epsilon = 1e-9);
            assert_abs_diff_eq!(back.y, point.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn axis_corners() {
        let mapper = CoordinateMapper::new(PlotRegion::default());
        assert_eq!(
            mapper.axis_corners(),
            [
                ScreenPoint::new(100.0, 100.0),
                ScreenPoint::new(100.0, 700.0),
                ScreenPoint::new(700.0, 700.0)
            ]
        );
    }
}
