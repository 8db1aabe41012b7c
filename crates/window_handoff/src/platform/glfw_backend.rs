//! Window management using GLFW
//!
//! GLFW must be initialized and pumped from the process's initial thread on
//! most platforms, which is exactly the constraint the coordinator is built
//! around. Closing the window ends the process.

use std::collections::HashMap;
use std::sync::Arc;

use glfw::{Action, Context, WindowHint};

use super::{
    ButtonState, DisplayMode, EventHandler, EventKind, Platform, PlatformError, TickSource,
    WindowEvent,
};

type EventReceiver = glfw::GlfwReceiver<(f64, glfw::WindowEvent)>;

/// GLFW-backed platform with an OpenGL context
pub struct GlfwPlatform {
    glfw: Option<glfw::Glfw>,
    window: Option<(glfw::PWindow, EventReceiver)>,
    size: (u32, u32),
    tick_source: TickSource,
    handlers: HashMap<EventKind, Arc<dyn EventHandler>>,
    buttons_held: u32,
    cursor: (i32, i32),
}

impl Default for GlfwPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl GlfwPlatform {
    /// Create an uninitialized GLFW platform
    pub fn new() -> Self {
        Self {
            glfw: None,
            window: None,
            size: (0, 0),
            tick_source: TickSource::for_current_platform(),
            handlers: HashMap::new(),
            buttons_held: 0,
            cursor: (0, 0),
        }
    }

    fn glfw_mut(&mut self) -> Result<&mut glfw::Glfw, PlatformError> {
        self.glfw
            .as_mut()
            .ok_or(PlatformError::NotReady("GLFW not initialized"))
    }

    fn dispatch(&self, event: &WindowEvent) {
        if let Some(handler) = self.handlers.get(&event.kind()) {
            handler.handle(event);
        }
    }

    /// Translate one GLFW event into zero or one of ours
    fn translate(&mut self, event: glfw::WindowEvent) -> Option<WindowEvent> {
        let (x, y) = self.cursor;
        match event {
            glfw::WindowEvent::Key(key, _, action, _) => {
                let code = key as i32;
                let pressed = action != Action::Release;
                // Printable ASCII keys go to the character callbacks.
                match u8::try_from(code) {
                    Ok(ch) if (32..=126).contains(&ch) => Some(if pressed {
                        WindowEvent::Keyboard { key: ch, x, y }
                    } else {
                        WindowEvent::KeyboardUp { key: ch, x, y }
                    }),
                    _ => Some(if pressed {
                        WindowEvent::Special { key: code, x, y }
                    } else {
                        WindowEvent::SpecialUp { key: code, x, y }
                    }),
                }
            }
            glfw::WindowEvent::MouseButton(button, action, _) => {
                let state = if action == Action::Press {
                    self.buttons_held += 1;
                    ButtonState::Down
                } else {
                    self.buttons_held = self.buttons_held.saturating_sub(1);
                    ButtonState::Up
                };
                Some(WindowEvent::Mouse { button: button as i32, state, x, y })
            }
            glfw::WindowEvent::CursorPos(px, py) => {
                self.cursor = (px as i32, py as i32);
                let (x, y) = self.cursor;
                Some(if self.buttons_held > 0 {
                    WindowEvent::Motion { x, y }
                } else {
                    WindowEvent::PassiveMotion { x, y }
                })
            }
            glfw::WindowEvent::Scroll(_, dy) if dy != 0.0 => Some(WindowEvent::MouseWheel {
                wheel: 0,
                direction: if dy > 0.0 { 1 } else { -1 },
                x,
                y,
            }),
            glfw::WindowEvent::FramebufferSize(width, height) => Some(WindowEvent::Reshape {
                width: u32::try_from(width).unwrap_or(0),
                height: u32::try_from(height).unwrap_or(0),
            }),
            glfw::WindowEvent::Refresh => Some(WindowEvent::Display),
            _ => None,
        }
    }
}

impl Platform for GlfwPlatform {
    fn name(&self) -> &str {
        "glfw"
    }

    fn init(&mut self) -> Result<(), PlatformError> {
        // Keep GLFW from printing its own diagnostics; they go to the log.
        let glfw = glfw::init(|error: glfw::Error, description: String| {
            log::debug!("GLFW {error:?}: {description}");
        })
        .map_err(|e| PlatformError::InitializationFailed(format!("{e:?}")))?;
        self.glfw = Some(glfw);
        Ok(())
    }

    fn set_display_mode(&mut self, mode: DisplayMode, width: u32, height: u32) {
        self.size = (width, height);
        let Some(glfw) = self.glfw.as_mut() else {
            return;
        };
        let color_bits = mode.contains(DisplayMode::RGB).then_some(8);
        glfw.window_hint(WindowHint::RedBits(color_bits));
        glfw.window_hint(WindowHint::GreenBits(color_bits));
        glfw.window_hint(WindowHint::BlueBits(color_bits));
        glfw.window_hint(WindowHint::DoubleBuffer(mode.contains(DisplayMode::DOUBLE)));
        glfw.window_hint(WindowHint::DepthBits(mode.contains(DisplayMode::DEPTH).then_some(24)));
        glfw.window_hint(WindowHint::Samples(mode.contains(DisplayMode::MULTISAMPLE).then_some(4)));
    }

    fn display_mode_possible(&self) -> bool {
        // GLFW has no up-front query; an impossible mode fails window creation.
        self.glfw.is_some() && self.size.0 > 0 && self.size.1 > 0
    }

    fn create_window(&mut self, title: &str) -> Result<(), PlatformError> {
        let (width, height) = self.size;
        let glfw = self.glfw_mut()?;
        let (mut window, events) = glfw
            .create_window(width, height, title, glfw::WindowMode::Windowed)
            .ok_or_else(|| PlatformError::WindowCreationFailed(title.to_string()))?;

        window.make_current();
        window.set_key_polling(true);
        window.set_mouse_button_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_scroll_polling(true);
        window.set_framebuffer_size_polling(true);
        window.set_refresh_polling(true);
        window.set_close_polling(true);

        self.window = Some((window, events));
        Ok(())
    }

    fn probe_extensions(&mut self) -> Result<(), PlatformError> {
        match &self.window {
            Some((window, _)) if window.is_current() => Ok(()),
            Some(_) => Err(PlatformError::ExtensionProbeFailed(
                "OpenGL context is not current".to_string(),
            )),
            None => Err(PlatformError::NotReady("extension probe without a window")),
        }
    }

    fn extension_supported(&self, name: &str) -> bool {
        self.glfw
            .as_ref()
            .is_some_and(|glfw| glfw.extension_supported(name))
    }

    fn alert(&mut self, message: &str) {
        log::warn!("{message}");
        eprintln!("warning: {message}");
    }

    fn tick_source(&self) -> TickSource {
        self.tick_source
    }

    fn register_callback(
        &mut self,
        kind: EventKind,
        handler: Arc<dyn EventHandler>,
    ) -> Result<(), PlatformError> {
        if self.window.is_none() {
            return Err(PlatformError::RegistrationFailed {
                kind,
                reason: "no window".to_string(),
            });
        }
        self.handlers.insert(kind, handler);
        Ok(())
    }

    fn run_event_loop(&mut self) -> ! {
        if self.glfw.is_none() || self.window.is_none() {
            log::error!("GLFW event loop entered without a window");
            std::process::exit(1);
        }

        loop {
            if let Some(glfw) = self.glfw.as_mut() {
                match self.tick_source {
                    TickSource::Timer(period) => glfw.wait_events_timeout(period.as_secs_f64()),
                    TickSource::Idle => glfw.poll_events(),
                }
            }

            let (pending, should_close) = match &self.window {
                Some((window, events)) => (
                    glfw::flush_messages(events)
                        .map(|(_, event)| event)
                        .collect::<Vec<_>>(),
                    window.should_close(),
                ),
                None => (Vec::new(), true),
            };

            for event in pending {
                if let Some(event) = self.translate(event) {
                    self.dispatch(&event);
                }
            }
            self.dispatch(&WindowEvent::Tick);

            if should_close {
                log::info!("Window closed, exiting");
                std::process::exit(0);
            }
        }
    }
}
