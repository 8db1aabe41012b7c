//! # Startup Configuration
//!
//! Everything the coordinator needs to know before the first thread is
//! spawned. The values are read once by `presetup` and never change after.
//!
//! ```toml
//! defer_start = true
//! log_level = "debug"
//!
//! [window]
//! title = "My Program"
//! ```

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};

/// Default window title used when none is configured
pub const DEFAULT_WINDOW_TITLE: &str = "Untitled";

/// Default client area width in pixels
pub const DEFAULT_WINDOW_WIDTH: u32 = 640;

/// Default client area height in pixels
pub const DEFAULT_WINDOW_HEIGHT: u32 = 400;

/// Which startup path the coordinator takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupMode {
    /// Create the window on the primary thread before application logic starts
    Immediate,
    /// Run application logic windowless until it asks for a window
    Deferred,
}

impl StartupMode {
    /// Map the `defer_start` flag onto a mode
    pub fn from_defer_start(defer_start: bool) -> Self {
        if defer_start {
            Self::Deferred
        } else {
            Self::Immediate
        }
    }
}

/// # Window Configuration
///
/// Size and appearance of the single window created by bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title; `None` shows [`DEFAULT_WINDOW_TITLE`]
    pub title: Option<String>,
    /// Client area width in pixels
    pub width: u32,
    /// Client area height in pixels
    pub height: u32,
    /// Request a multisampled framebuffer
    pub multisample: bool,
}

impl WindowConfig {
    /// The title that will actually be shown
    pub fn effective_title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_WINDOW_TITLE)
    }

    /// Set the window title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: None,
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            // Only the Windows family asks for multisampling by default.
            multisample: cfg!(windows),
        }
    }
}

/// # Startup Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupConfig {
    /// Postpone window creation until the application requests it
    pub defer_start: bool,
    /// Default log level (overridden by `RUST_LOG`)
    pub log_level: String,
    /// Window parameters
    pub window: WindowConfig,
}

impl StartupConfig {
    /// Immediate-mode configuration with default window settings
    pub fn immediate() -> Self {
        Self::default()
    }

    /// Deferred-mode configuration with default window settings
    pub fn deferred() -> Self {
        Self {
            defer_start: true,
            ..Self::default()
        }
    }

    /// The startup path selected by `defer_start`
    pub fn mode(&self) -> StartupMode {
        StartupMode::from_defer_start(self.defer_start)
    }

    /// Replace the window configuration
    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            defer_start: false,
            log_level: "info".to_string(),
            window: WindowConfig::default(),
        }
    }
}

impl Config for StartupConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window() {
        let window = WindowConfig::default();
        assert_eq!(window.width, 640);
        assert_eq!(window.height, 400);
        assert_eq!(window.effective_title(), "Untitled");
        assert_eq!(window.with_title("Demo").effective_title(), "Demo");
    }

    #[test]
    fn test_mode_selection() {
        assert_eq!(StartupConfig::immediate().mode(), StartupMode::Immediate);
        assert_eq!(StartupConfig::deferred().mode(), StartupMode::Deferred);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: StartupConfig = toml::from_str("defer_start = true\n").unwrap();
        assert!(config.defer_start);
        assert_eq!(config.window, WindowConfig::default());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_partial_ron_window_section() {
        let config: StartupConfig =
            ron::from_str("(window: (title: Some(\"Editor\"), width: 800))").unwrap();
        assert!(!config.defer_start);
        assert_eq!(config.window.effective_title(), "Editor");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, DEFAULT_WINDOW_HEIGHT);
    }
}
