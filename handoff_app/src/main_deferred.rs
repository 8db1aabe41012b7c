//! Deferred-mode demo
//!
//! Application logic starts windowless. After one simulated second it asks
//! for the window (unless `--headless` is given) and keeps running with it for
//! two more seconds. With `--headless` the window is never created.

mod demo;

use std::time::Duration;

use demo::{DemoArgs, DemoError, DemoPlatform, InputState};
use window_handoff::foundation::TickTimer;

fn main() {
    if let Err(e) = run() {
        eprintln!("Application error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), DemoError> {
    let args = DemoArgs::from_env();
    let mut config = args.load_config()?;
    config.defer_start = true;
    let headless = args.headless;

    let input = InputState::shared();
    let coordinator = window_handoff::presetup(&config, DemoPlatform::new(), input.clone())?;

    let started = coordinator.start_application_thread(move |handle| {
        let mut frames = TickTimer::new(Duration::from_millis(16));
        while frames.simulated_elapsed() < Duration::from_secs(1) {
            frames.wait_next();
        }
        log::info!("Windowless phase done after {} frames", frames.tick_count());

        if headless {
            log::info!("Headless run, never showing the window");
        } else {
            handle.request_show();
            log::info!(
                "Window shown (framebuffer objects: {})",
                handle.capabilities().is_some_and(|caps| caps.framebuffer_objects)
            );
        }

        let mut frames = TickTimer::new(frames.interval());
        while frames.simulated_elapsed() < Duration::from_secs(2) {
            frames.wait_next();
        }
        demo::finish(&input);
    });
    match started {
        Ok(never) => match never {},
        Err(e) => Err(e.into()),
    }
}
