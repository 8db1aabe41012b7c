//! Immediate-mode demo
//!
//! The window is created on the main thread before application logic starts.
//! Application logic then runs for two seconds on its own thread while the
//! main thread pumps events.

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
    config.defer_start = false;
    if args.headless {
        log::warn!("--headless has no effect in immediate mode");
    }

    let input = InputState::shared();
    let coordinator = window_handoff::presetup(&config, DemoPlatform::new(), input.clone())?;
    log::info!("Window up before application start: {}", window_handoff::is_windowing_up());

    let started = coordinator.start_application_thread(move |handle| {
        log::info!("Application thread running, windowing up: {}", handle.is_windowing_up());

        let mut frames = TickTimer::new(Duration::from_millis(16));
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
