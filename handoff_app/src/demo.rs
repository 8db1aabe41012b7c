//! Pieces shared by the demo binaries

use std::sync::atomic::{AtomicI32, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use window_handoff::core::config::{Config, ConfigError, StartupConfig};
use window_handoff::foundation::logging;
use window_handoff::platform::{EventHandler, WindowEvent};
use window_handoff::CoordinatorError;

#[cfg(feature = "glfw")]
pub type DemoPlatform = window_handoff::platform::GlfwPlatform;
#[cfg(not(feature = "glfw"))]
pub type DemoPlatform = window_handoff::platform::HeadlessPlatform;

/// Demo startup failures
#[derive(Error, Debug)]
pub enum DemoError {
    /// Bad config file
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Coordinator refused to start
    #[error("Startup error: {0}")]
    Startup(#[from] CoordinatorError),
}

/// Command line options understood by both demos
#[derive(Debug, Default)]
pub struct DemoArgs {
    pub config_path: Option<String>,
    pub headless: bool,
}

impl DemoArgs {
    pub fn from_env() -> Self {
        let mut parsed = Self::default();
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => parsed.config_path = args.next(),
                "--headless" => parsed.headless = true,
                other => eprintln!("warning: ignoring unknown argument '{other}'"),
            }
        }
        parsed
    }

    /// Load the config file if one was given, then set up logging from it
    pub fn load_config(&self) -> Result<StartupConfig, DemoError> {
        let config = match &self.config_path {
            Some(path) => StartupConfig::load_from_file(path)?,
            None => StartupConfig::default(),
        };
        logging::init_with_level(logging::parse_level(&config.log_level));
        Ok(config)
    }
}

/// Window state written by the event callbacks, read by application logic
#[derive(Debug, Default)]
pub struct InputState {
    ticks: AtomicU64,
    repaints: AtomicU64,
    keys_down: AtomicI32,
    width: AtomicU32,
    height: AtomicU32,
}

impl InputState {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn repaints(&self) -> u64 {
        self.repaints.load(Ordering::Relaxed)
    }

    pub fn keys_down(&self) -> i32 {
        self.keys_down.load(Ordering::Relaxed)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width.load(Ordering::Relaxed), self.height.load(Ordering::Relaxed))
    }
}

impl EventHandler for InputState {
    fn handle(&self, event: &WindowEvent) {
        match *event {
            WindowEvent::Tick => {
                self.ticks.fetch_add(1, Ordering::Relaxed);
            }
            WindowEvent::Display => {
                self.repaints.fetch_add(1, Ordering::Relaxed);
            }
            WindowEvent::Keyboard { .. } | WindowEvent::Special { .. } => {
                self.keys_down.fetch_add(1, Ordering::Relaxed);
            }
            WindowEvent::KeyboardUp { .. } | WindowEvent::SpecialUp { .. } => {
                self.keys_down.fetch_sub(1, Ordering::Relaxed);
            }
            WindowEvent::Reshape { width, height } => {
                self.width.store(width, Ordering::Relaxed);
                self.height.store(height, Ordering::Relaxed);
            }
            _ => {}
        }
    }
}

/// Report the window state and end the process
pub fn finish(input: &InputState) -> ! {
    let (width, height) = input.size();
    log::info!(
        "Done: {} ticks, {} repaints, {}x{} window, {} keys held",
        input.ticks(),
        input.repaints(),
        width,
        height,
        input.keys_down()
    );
    std::process::exit(0);
}
