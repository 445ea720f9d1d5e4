//! Hex view configuration.
//!
//! [`Config`] deserializes from any serde format with every field optional,
//! and also offers `with_*` builders for programmatic setup.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::READ_CHUNK;
use crate::debounce::{DEFAULT_IDLE_TIMEOUT, DEFAULT_POLL_INTERVAL};
use crate::geometry::COLUMNS;

/// Default grid height.
pub const DEFAULT_ROWS: usize = 16;

/// Tallest grid a single backend read can fill.
pub const MAX_ROWS: usize = READ_CHUNK / COLUMNS;

/// Default quiet period before a page fetch.
pub const DEFAULT_FETCH_DEBOUNCE: Duration = Duration::from_millis(100);

/// Settings shared by every viewport of a [`FileTabs`](crate::tabs::FileTabs).
///
/// Durations are stored in milliseconds so the struct reads naturally from
/// TOML or JSON. Missing fields take their defaults.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use bubbletea_hexview::config::Config;
///
/// let config = Config::new()
///     .with_rows(8)
///     .with_hex_upper_case(false)
///     .with_fetch_debounce(Duration::from_millis(250));
///
/// assert_eq!(config.rows(), 8);
/// assert_eq!(config.fetch_debounce(), Duration::from_millis(250));
/// assert_eq!(config.idle_timeout(), Duration::from_millis(700));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Grid height in rows of 16 bytes. Read through [`Config::rows`],
    /// which clamps it.
    pub rows: usize,
    /// Render hex digits as `AB` rather than `ab`.
    pub hex_upper_case: bool,
    /// Quiet period after the last window move before a page is fetched.
    pub fetch_debounce_ms: u64,
    /// Quiet period without user input before released cell focus returns.
    pub idle_timeout_ms: u64,
    /// Tick interval of both debouncers.
    pub poll_interval_ms: u64,
    /// Whether wheel messages scroll the window.
    pub mouse_wheel_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            hex_upper_case: true,
            fetch_debounce_ms: DEFAULT_FETCH_DEBOUNCE.as_millis() as u64,
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT.as_millis() as u64,
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            mouse_wheel_enabled: true,
        }
    }
}

impl Config {
    /// Creates a configuration with every default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the grid height. Values outside `1..=MAX_ROWS` are clamped when
    /// read.
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    /// Chooses upper or lower case hex digits.
    pub fn with_hex_upper_case(mut self, upper: bool) -> Self {
        self.hex_upper_case = upper;
        self
    }

    /// Sets the quiet period before a page fetch.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Time the window must stay still. Sub-millisecond parts
    ///   are dropped.
    pub fn with_fetch_debounce(mut self, timeout: Duration) -> Self {
        self.fetch_debounce_ms = timeout.as_millis() as u64;
        self
    }

    /// Sets how long the user must be idle before cell focus is restored.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Sets the debouncer tick interval. A zero interval is read back as
    /// one millisecond.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Enables or disables wheel scrolling.
    pub fn with_mouse_wheel(mut self, enabled: bool) -> Self {
        self.mouse_wheel_enabled = enabled;
        self
    }

    /// Grid height clamped to `1..=MAX_ROWS`.
    pub fn rows(&self) -> usize {
        self.rows.clamp(1, MAX_ROWS)
    }

    /// Page fetch quiet period as a [`Duration`].
    pub fn fetch_debounce(&self) -> Duration {
        Duration::from_millis(self.fetch_debounce_ms)
    }

    /// Idle quiet period as a [`Duration`].
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    /// Polling interval, never zero.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.rows(), 16);
        assert_eq!(config.fetch_debounce(), Duration::from_millis(100));
        assert_eq!(config.idle_timeout(), Duration::from_millis(700));
        assert_eq!(config.poll_interval(), Duration::from_millis(50));
        assert!(config.mouse_wheel_enabled);
    }

    #[test]
    fn partial_documents_keep_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "rows": 4, "hex_upper_case": false }"#).expect("config");
        assert_eq!(config.rows(), 4);
        assert!(!config.hex_upper_case);
        assert_eq!(config.fetch_debounce_ms, 100);
    }

    #[test]
    fn tallest_grid_fits_one_read() {
        assert_eq!(MAX_ROWS * COLUMNS, READ_CHUNK);
        let config = Config::new().with_rows(usize::MAX);
        assert!(config.rows() * COLUMNS <= READ_CHUNK);
    }

    #[test]
    fn rows_are_clamped() {
        assert_eq!(Config::new().with_rows(0).rows(), 1);
        assert_eq!(Config::new().with_rows(1000).rows(), MAX_ROWS);
        assert_eq!(Config::new().with_poll_interval(Duration::ZERO).poll_interval(), Duration::from_millis(1));
    }
}
