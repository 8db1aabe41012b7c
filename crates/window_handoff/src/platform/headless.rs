//! Headless platform with a virtual window
//!
//! Behaves like a real backend from the coordinator's point of view (it has a
//! window, callbacks and a never-ending event loop) but draws nothing. The
//! event loop sends one reshape and one repaint, then ticks forever.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::{
    DisplayMode, EventHandler, EventKind, Platform, PlatformError, TickSource, WindowEvent,
    TIMER_TICK_INTERVAL,
};
use crate::foundation::TickTimer;

/// Virtual window state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualWindow {
    /// Window title
    pub title: String,
    /// Client width
    pub width: u32,
    /// Client height
    pub height: u32,
    /// Framebuffer properties
    pub mode: DisplayMode,
}

/// Platform that runs without a display server
pub struct HeadlessPlatform {
    initialized: bool,
    mode: DisplayMode,
    size: (u32, u32),
    window: Option<VirtualWindow>,
    extensions: Vec<String>,
    tick_interval: Duration,
    handlers: HashMap<EventKind, Arc<dyn EventHandler>>,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPlatform {
    /// Create a headless platform ticking at the timer interval
    pub fn new() -> Self {
        Self {
            initialized: false,
            mode: DisplayMode::empty(),
            size: (0, 0),
            window: None,
            extensions: Vec::new(),
            tick_interval: TIMER_TICK_INTERVAL,
            handlers: HashMap::new(),
        }
    }

    /// Change the tick period of the event loop
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Advertise a GPU extension as supported
    pub fn with_extension(mut self, name: impl Into<String>) -> Self {
        self.extensions.push(name.into());
        self
    }

    /// The virtual window, once created
    pub fn window(&self) -> Option<&VirtualWindow> {
        self.window.as_ref()
    }

    /// Kinds that currently have a handler
    pub fn registered_kinds(&self) -> impl Iterator<Item = EventKind> + '_ {
        self.handlers.keys().copied()
    }

    fn dispatch(&self, event: &WindowEvent) {
        if let Some(handler) = self.handlers.get(&event.kind()) {
            handler.handle(event);
        }
    }
}

impl Platform for HeadlessPlatform {
    fn name(&self) -> &str {
        "headless"
    }

    fn init(&mut self) -> Result<(), PlatformError> {
        self.initialized = true;
        Ok(())
    }

    fn set_display_mode(&mut self, mode: DisplayMode, width: u32, height: u32) {
        self.mode = mode;
        self.size = (width, height);
    }

    fn display_mode_possible(&self) -> bool {
        self.initialized && self.mode.contains(DisplayMode::RGB) && self.size.0 > 0 && self.size.1 > 0
    }

    fn create_window(&mut self, title: &str) -> Result<(), PlatformError> {
        if !self.initialized {
            return Err(PlatformError::NotReady("create_window before init"));
        }
        let (width, height) = self.size;
        log::debug!("Headless window '{title}' {width}x{height} ({:?})", self.mode);
        self.window = Some(VirtualWindow {
            title: title.to_string(),
            width,
            height,
            mode: self.mode,
        });
        Ok(())
    }

    fn probe_extensions(&mut self) -> Result<(), PlatformError> {
        if self.window.is_none() {
            return Err(PlatformError::NotReady("extension probe without a window"));
        }
        Ok(())
    }

    fn extension_supported(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| ext == name)
    }

    fn alert(&mut self, message: &str) {
        log::warn!("[alert] {message}");
    }

    fn tick_source(&self) -> TickSource {
        TickSource::Timer(self.tick_interval)
    }

    fn register_callback(
        &mut self,
        kind: EventKind,
        handler: Arc<dyn EventHandler>,
    ) -> Result<(), PlatformError> {
        self.handlers.insert(kind, handler);
        Ok(())
    }

    fn run_event_loop(&mut self) -> ! {
        if let Some(window) = &self.window {
            let (width, height) = (window.width, window.height);
            self.dispatch(&WindowEvent::Reshape { width, height });
            self.dispatch(&WindowEvent::Display);
        } else {
            log::warn!("Headless event loop running without a window");
        }

        let mut timer = TickTimer::new(self.tick_interval);
        loop {
            timer.wait_next();
            self.dispatch(&WindowEvent::Tick);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_requires_init() {
        let mut platform = HeadlessPlatform::new();
        assert!(platform.create_window("early").is_err());

        platform.init().unwrap();
        platform.set_display_mode(DisplayMode::RGB | DisplayMode::DOUBLE, 320, 200);
        assert!(platform.display_mode_possible());
        platform.create_window("ok").unwrap();

        let window = platform.window().unwrap();
        assert_eq!(window.title, "ok");
        assert_eq!((window.width, window.height), (320, 200));
    }

    #[test]
    fn test_zero_size_mode_not_possible() {
        let mut platform = HeadlessPlatform::new();
        platform.init().unwrap();
        platform.set_display_mode(DisplayMode::RGB, 0, 200);
        assert!(!platform.display_mode_possible());
    }

    #[test]
    fn test_extension_list() {
        let platform = HeadlessPlatform::new().with_extension("GL_EXT_framebuffer_object");
        assert!(platform.extension_supported("GL_EXT_framebuffer_object"));
        assert!(!platform.extension_supported("GL_ARB_imaginary"));
    }
}
