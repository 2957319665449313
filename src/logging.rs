use tracing_subscriber::{filter::LevelFilter, prelude::*};

/// Logs to stdout, `log` records included. Only warnings by default, every `-v` lowers the bar.
pub fn init_native_log(verbosity: u8) {
    let stdout_log = tracing_subscriber::fmt::layer()
        .with_ansi(true)
        .pretty()
        .with_filter(level_filter(verbosity));

    tracing_subscriber::registry().with(stdout_log).init();
}

fn level_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_filter(0), LevelFilter::WARN);
        assert_eq!(level_filter(2), LevelFilter::DEBUG);
        assert_eq!(level_filter(9), LevelFilter::TRACE);
    }
}
