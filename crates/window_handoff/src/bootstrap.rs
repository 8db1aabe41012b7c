//! Windowing bootstrap
//!
//! The one-time sequence that brings the window up on the primary thread:
//! display mode selection, window creation, optional extension probe and
//! callback registration. It runs at most once per process; the coordinator
//! guarantees that.

use std::sync::Arc;

use thiserror::Error;

use crate::core::config::WindowConfig;
use crate::platform::{
    DisplayMode, EventHandler, EventKind, Platform, PlatformError, TickSource,
    FRAMEBUFFER_OBJECT_EXTENSION,
};

/// Optional features discovered during bootstrap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Framebuffer objects are available
    pub framebuffer_objects: bool,
}

/// Bootstrap failures
///
/// None of these are recoverable: there is no fallback display mode and no
/// second attempt.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// The platform cannot provide the requested framebuffer
    #[error("Display mode {mode:?} ({width}x{height}) is not supported")]
    DisplayModeUnsupported {
        /// Requested mode
        mode: DisplayMode,
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// A platform call failed
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Bring up the window and register `events` for every supported event kind
///
/// Must be called on the primary thread. An extension probe failure is shown
/// to the user as an alert and only disables framebuffer objects.
pub fn initialize_windowing<P>(
    platform: &mut P,
    window: &WindowConfig,
    events: &Arc<dyn EventHandler>,
) -> Result<Capabilities, BootstrapError>
where
    P: Platform + ?Sized,
{
    log::info!("Bootstrapping windowing on '{}' platform", platform.name());
    platform.init()?;

    let mode = DisplayMode::for_window(window);
    platform.set_display_mode(mode, window.width, window.height);
    if !platform.display_mode_possible() {
        return Err(BootstrapError::DisplayModeUnsupported {
            mode,
            width: window.width,
            height: window.height,
        });
    }

    let title = window.effective_title();
    platform.create_window(title)?;
    log::info!("Window '{}' created ({}x{})", title, window.width, window.height);

    let capabilities = probe_capabilities(platform);

    register_callbacks(platform, events)?;

    Ok(capabilities)
}

fn probe_capabilities<P>(platform: &mut P) -> Capabilities
where
    P: Platform + ?Sized,
{
    if let Err(e) = platform.probe_extensions() {
        log::warn!("GPU extension probe failed: {e}");
        platform.alert(&e.to_string());
        return Capabilities::default();
    }

    let framebuffer_objects = platform.extension_supported(FRAMEBUFFER_OBJECT_EXTENSION);
    log::debug!("{FRAMEBUFFER_OBJECT_EXTENSION}: {framebuffer_objects}");
    Capabilities { framebuffer_objects }
}

fn register_callbacks<P>(platform: &mut P, events: &Arc<dyn EventHandler>) -> Result<(), PlatformError>
where
    P: Platform + ?Sized,
{
    match platform.tick_source() {
        TickSource::Timer(period) => log::debug!("Ticks from a {period:?} timer"),
        TickSource::Idle => log::debug!("Ticks from the idle callback"),
    }

    for kind in EventKind::ALL {
        if platform.supports_event(kind) {
            platform.register_callback(kind, Arc::clone(events))?;
        } else {
            log::debug!("{kind:?} events not supported, skipping");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{HeadlessPlatform, IgnoreEvents};

    fn ignore() -> Arc<dyn EventHandler> {
        Arc::new(IgnoreEvents)
    }

    #[test]
    fn test_headless_bootstrap() {
        let mut platform = HeadlessPlatform::new();
        let window = WindowConfig::default().with_title("Bootstrap");

        let caps = initialize_windowing(&mut platform, &window, &ignore()).unwrap();
        assert!(!caps.framebuffer_objects);

        let created = platform.window().unwrap();
        assert_eq!(created.title, "Bootstrap");
        assert_eq!((created.width, created.height), (640, 400));
        assert_eq!(platform.registered_kinds().count(), EventKind::ALL.len());
    }

    #[test]
    fn test_framebuffer_objects_detected() {
        let mut platform = HeadlessPlatform::new().with_extension(FRAMEBUFFER_OBJECT_EXTENSION);
        let caps = initialize_windowing(&mut platform, &WindowConfig::default(), &ignore()).unwrap();
        assert!(caps.framebuffer_objects);
    }

    #[test]
    fn test_unsatisfiable_mode_is_error() {
        let mut platform = HeadlessPlatform::new();
        let window = WindowConfig {
            width: 0,
            ..WindowConfig::default()
        };

        let err = initialize_windowing(&mut platform, &window, &ignore()).unwrap_err();
        assert!(matches!(err, BootstrapError::DisplayModeUnsupported { width: 0, .. }));
        assert!(platform.window().is_none());
    }
}
