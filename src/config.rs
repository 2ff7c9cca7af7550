use std::path::PathBuf;
use chrono::{Datelike, Local};
use tracing::Level;

/// Document used when neither `--file` nor `MOVIE_JSON` is given
pub const DEFAULT_MOVIE_JSON: &str = "movies.json";

/// Lower bound (exclusive) for years typed into the menu
pub const MIN_YEAR_EXCLUSIVE: i32 = 1000;

/// Years the menu accepts: strictly between the two bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    pub after: i32,
    pub before: i32,
}

impl YearWindow {
    pub fn new(after: i32, before: i32) -> Self {
        Self { after, before }
    }

    /// Window ending at the current calendar year, read from the local clock.
    pub fn up_to_current_year() -> Self {
        Self::new(MIN_YEAR_EXCLUSIVE, Local::now().year())
    }

    pub fn contains(&self, year: i32) -> bool {
        self.after < year && year < self.before
    }
}

/// Runtime settings resolved once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub movie_json: PathBuf,
    pub log_level: Level,
    pub years: YearWindow,
}

impl AppConfig {
    pub fn resolve(movie_json: PathBuf, verbosity: u8) -> Self {
        let log_level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        };

        Self {
            movie_json,
            log_level,
            years: YearWindow::up_to_current_year(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_bounds_are_exclusive() {
        let window = YearWindow::new(1000, 2026);
        assert!(!window.contains(1000));
        assert!(window.contains(1001));
        assert!(window.contains(2025));
        assert!(!window.contains(2026));
    }

    #[test]
    fn verbosity_maps_to_levels() {
        let path = PathBuf::from(DEFAULT_MOVIE_JSON);
        assert_eq!(AppConfig::resolve(path.clone(), 0).log_level, Level::WARN);
        assert_eq!(AppConfig::resolve(path.clone(), 1).log_level, Level::INFO);
        assert_eq!(AppConfig::resolve(path, 5).log_level, Level::DEBUG);
    }

    #[test]
    fn current_window_starts_after_year_1000() {
        let window = YearWindow::up_to_current_year();
        assert_eq!(window.after, MIN_YEAR_EXCLUSIVE);
        assert!(window.before > 2020);
    }
}
