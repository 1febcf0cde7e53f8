//! chimeclick: sound-activated click automation.
//!
//! Listens to the microphone, tracks the ambient noise level, and clicks a
//! fixed (or random) screen position when a sustained burst stands out from
//! the background.

use anyhow::Result;
use chimeclick::audio::Recorder;
use chimeclick::click::{resolve_target, Clicker, DummyClicker, SystemClicker, FALLBACK_DISPLAY};
use chimeclick::config::AppConfig;
use chimeclick::detector::run_live;
use chimeclick::telemetry;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
#[cfg(unix)]
use std::sync::atomic::Ordering;
use tracing::{error, info, warn};

static STOP: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
extern "C" fn request_stop(_signal: libc::c_int) {
    STOP.store(true, Ordering::SeqCst);
}

#[cfg(unix)]
fn install_stop_handler() {
    unsafe {
        libc::signal(libc::SIGINT, request_stop as libc::sighandler_t);
        libc::signal(libc::SIGTERM, request_stop as libc::sighandler_t);
    }
}

#[cfg(not(unix))]
fn install_stop_handler() {}

fn main() -> ExitCode {
    let config = match AppConfig::parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err:#}");
            return ExitCode::FAILURE;
        }
    };
    telemetry::init_tracing();

    if config.list_input_devices {
        return match Recorder::list_devices() {
            Ok(names) if names.is_empty() => {
                println!("No audio input devices detected.");
                ExitCode::SUCCESS
            }
            Ok(names) => {
                for name in names {
                    println!("{name}");
                }
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("{err:#}");
                ExitCode::FAILURE
            }
        };
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("fatal: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &AppConfig) -> Result<()> {
    install_stop_handler();
    let recorder = Recorder::new(config.input_device.as_deref())?;
    let detector_config = config.detector_config();

    // Dry runs still want a real display size for target derivation, but can
    // fall back when none is reachable; live runs need the input stack.
    let (display, mut clicker): ((i32, i32), Box<dyn Clicker>) = if config.dummy {
        let display = SystemClicker::new()
            .and_then(|clicker| clicker.display_size())
            .unwrap_or_else(|err| {
                warn!(
                    "display unavailable ({err:#}), assuming {}x{}",
                    FALLBACK_DISPLAY.0, FALLBACK_DISPLAY.1
                );
                FALLBACK_DISPLAY
            });
        (display, Box::new(DummyClicker))
    } else {
        let clicker = SystemClicker::new()?;
        let display = clicker.display_size()?;
        (display, Box::new(clicker))
    };

    let target = resolve_target(config, display);
    info!(?target, dummy = config.dummy, "click target resolved");

    run_live(&recorder, &detector_config, &target, clicker.as_mut(), &STOP)
}
