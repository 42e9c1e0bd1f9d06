/// Entry point and host loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{error, info, warn, LevelFilter};
use simplelog::{ConfigBuilder, WriteLogger};

use config::AppConfig;
use sim::app::HamletApp;
use sim::event::AppEvent;
use sim::platform::DeviceInfo;
use ui::bundle::Bundle;
use ui::display::HandsetScreen;
use ui::gamepad::GamepadState;
use ui::input::{HostInput, InputState};
use ui::renderer::{Renderer, Status};

type App = HamletApp<HandsetScreen>;

fn main() {
    let config = AppConfig::load();
    init_logging(&config);
    setup_panic_handler();

    if let Err(e) = run(&config) {
        error!("{e:#}");
        eprintln!("Hamlet: {e:#}");
        std::process::exit(1);
    }
}

/// Log to a file; a terminal logger would scribble over the alternate screen.
fn init_logging(config: &AppConfig) {
    if config.log_level == LevelFilter::Off {
        return;
    }
    let file = match File::create(&config.log_file) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: could not create {}: {e}", config.log_file.display());
            eprintln!("Logging disabled.");
            return;
        }
    };
    let log_config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build();
    if let Err(e) = WriteLogger::init(config.log_level, log_config, file) {
        eprintln!("Warning: logger init failed: {e}");
    }
}

/// Put the terminal back before the panic message prints.
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = Renderer::new().cleanup();
        error!("panic: {info}");
        default_hook(info);
    }));
}

fn run(config: &AppConfig) -> Result<()> {
    let bundle = Bundle::load(config.bundle.as_deref())?;
    let missing = bundle.missing_keys();
    if !missing.is_empty() {
        warn!("bundle lacks {} resources: {}", missing.len(), missing.join(", "));
    }

    let device = DeviceInfo {
        screen_width: config.device.screen_width,
        screen_height: config.device.screen_height,
    };
    let mut app = HamletApp::create(HandsetScreen::new(bundle, device))
        .context("could not start Hamlet")?;

    let mut renderer = Renderer::new();
    renderer.init().context("terminal init failed")?;

    let result = host_loop(&mut app, &mut renderer, config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    result?;

    println!();
    println!("Exeunt omnes.");
    Ok(())
}

fn host_loop(app: &mut App, renderer: &mut Renderer, config: &AppConfig) -> Result<()> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        info!("gamepad found");
    }

    let frame_sleep = Duration::from_millis(config.frame_sleep_ms);
    let clock = Instant::now();
    let now = || clock.elapsed().as_millis() as u64;

    // Suspended because the terminal lost focus, not by the user.
    let mut focus_paused = false;

    app.handle_event(AppEvent::Start, now());

    'frames: loop {
        kb.drain_events();
        gp.update();

        let mut inputs = kb.inputs().to_vec();
        inputs.extend(gp.inputs());

        for input in inputs {
            let t = now();
            match input {
                HostInput::Key(key) => {
                    app.handle_event(AppEvent::Key(key), t);
                }
                HostInput::Quit => break 'frames,
                HostInput::TogglePause => {
                    let event = if app.is_suspended() {
                        AppEvent::Resume
                    } else {
                        AppEvent::Suspend
                    };
                    focus_paused = false;
                    app.handle_event(event, t);
                }
                HostInput::FocusLost => {
                    if !app.is_suspended() {
                        focus_paused = true;
                        app.handle_event(AppEvent::Suspend, t);
                    }
                }
                HostInput::FocusGained => {
                    if focus_paused {
                        focus_paused = false;
                        app.handle_event(AppEvent::Resume, t);
                    }
                }
            }
        }

        app.tick(now());

        let status = Status {
            level: app.level(),
            paused: app.is_suspended(),
            finished: app.is_finished(),
        };
        renderer
            .render(app.platform().visible(), status)
            .context("terminal write failed")?;

        // Wake early if the next deadline is closer than a frame.
        let sleep = app.next_deadline().map_or(frame_sleep, |deadline| {
            frame_sleep.min(Duration::from_millis(deadline.saturating_sub(now())))
        });
        std::thread::sleep(sleep);
    }

    app.handle_event(AppEvent::Stop, now());
    Ok(())
}
