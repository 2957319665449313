use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegressionError {
    #[error("at least 2 points are needed for a regression, got {0}")]
    TooFewPoints(usize),
    #[error("all x values are identical, the slope is undefined")]
    ZeroXVariance,
    #[error("could not build the t-distribution: {0}")]
    Distribution(#[from] statrs::StatsError),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClipError {
    #[error("the line y = {slope}x + {intercept} does not cross the plot region")]
    MissesRegion { slope: f64, intercept: f64 },
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("standard deviation must not be negative, got {0}")]
    InvalidStd(f64),
    #[error("{0}")]
    InvalidDistribution(#[from] rand_distr::NormalError),
    #[error("plot region {width}x{height} has no area to place points in")]
    EmptyPlot { width: f64, height: f64 },
    #[error("expected acceptance rate of {acceptance_rate:e} is too low to sample points")]
    Starvation { acceptance_rate: f64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
