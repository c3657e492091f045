// main.rs - RustRuler Entry Point
//
// Headless driver for the measurement core. Prints ruler readouts for a distance
// in every unit and, with --magnify, runs a magnifier session against the
// built-in pattern source.
//
// Usage: rustruler [POINTS] [--magnify] [--snapshot PATH]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::info;

use rustruler::capture::{MagnifierCapture, PatternSource};
use rustruler::geometry::{Rect, ScreenRect};
use rustruler::magnifier::ScreenInfo;
use rustruler::readout::ReadoutComponents;
use rustruler::settings::{JsonFileStore, KeyValueStore};
use rustruler::units::UnitType;
use rustruler::AppContext;

const DEFAULT_POINTS: f64 = 144.0;
const FIRST_FRAME_TIMEOUT: Duration = Duration::from_secs(2);
const IDLE_PAUSE_DELAY: Duration = Duration::from_secs(5);

fn print_readouts<K: KeyValueStore>(context: &AppContext<K>, points: f64) {
    let prefs = context.preferences();
    println!("{points} pt");
    for unit in UnitType::ALL {
        let readout = ReadoutComponents::make(
            points,
            unit,
            context.measurement_scale(),
            1.0,
            prefs.show_scale_override,
        );
        let marker = if unit == prefs.unit_type { "*" } else { " " };
        println!("{marker} {:<12} {}", unit.to_string(), readout.composed());
    }
}

fn run_magnifier<K: KeyValueStore>(
    context: &mut AppContext<K>,
    snapshot: Option<&str>,
) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;
    let _guard = runtime.enter();

    let screen = ScreenInfo {
        frame: Rect::new(0.0, 0.0, 1440.0, 900.0),
        backing_scale: 2.0,
    };
    let session = context
        .open_session(ScreenRect(Rect::new(200.0, 300.0, 160.0, 90.0)), screen, 900.0, 2.0)
        .clone();

    let mut capture = MagnifierCapture::new(PatternSource::new());
    capture.set_screen_scale(session.screen_scale())?;
    capture.update_capture_rect(session.capture_rect())?;
    capture.start()?;
    capture.pause_after(IDLE_PAUSE_DELAY)?;

    let deadline = Instant::now() + FIRST_FRAME_TIMEOUT;
    let frame = loop {
        if let Some(frame) = capture.poll() {
            break frame;
        }
        if Instant::now() >= deadline {
            capture.stop();
            anyhow::bail!("No frame arrived within {:?}", FIRST_FRAME_TIMEOUT);
        }
        std::thread::sleep(Duration::from_millis(5));
    };

    let viewport = session.viewport_size();
    let content_frame = Rect::new(0.0, 0.0, viewport.width, viewport.height);
    match session.center_sample(&frame, content_frame) {
        Some(sample) => println!(
            "center ({}, {}) {} rgb({}, {}, {})",
            sample.pixel_x,
            sample.pixel_y,
            sample.hex(),
            sample.red,
            sample.green,
            sample.blue
        ),
        None => println!("center sample unavailable"),
    }

    let unit = context.preferences().unit_type;
    println!(
        "{}",
        session
            .delta_readout(unit, context.measurement_scale())
            .composed()
    );

    if let Some(path) = snapshot {
        capture.save_snapshot(path)?;
    }

    capture.stop();
    context.close_session();
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("RustRuler starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let points = args
        .iter()
        .find_map(|arg| arg.parse::<f64>().ok())
        .unwrap_or(DEFAULT_POINTS);
    let magnify = args.iter().any(|arg| arg == "--magnify" || arg == "-m");
    let snapshot = args
        .iter()
        .position(|arg| arg == "--snapshot")
        .and_then(|i| args.get(i + 1))
        .map(String::as_str);

    let store = JsonFileStore::open_default();
    info!("Preferences file: {:?}", store.path());
    let mut context = AppContext::new(store);

    print_readouts(&context, points);
    if magnify || snapshot.is_some() {
        run_magnifier(&mut context, snapshot)?;
    }

    context.persist()
}
