// Magnifier capture driven by the pattern source on its own thread.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rustruler::capture::{CaptureFrame, CaptureState, MagnifierCapture, PatternSource, SystemEvent};
use rustruler::geometry::{GlobalRect, Rect};

fn wait_for_frame(capture: &mut MagnifierCapture<PatternSource>) -> Option<Arc<CaptureFrame>> {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if let Some(frame) = capture.poll() {
            return Some(frame);
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    None
}

fn started_capture() -> MagnifierCapture<PatternSource> {
    let mut capture = MagnifierCapture::new(PatternSource::new());
    capture.set_screen_scale(2.0).unwrap();
    capture
        .update_capture_rect(GlobalRect(Rect::new(10.0, 20.0, 30.0, 15.0)))
        .unwrap();
    capture.start().unwrap();
    capture
}

#[test]
fn first_frame_makes_capture_live() {
    let mut capture = started_capture();
    assert_eq!(capture.state(), CaptureState::Starting);

    let frame = wait_for_frame(&mut capture).expect("pattern source delivers frames");
    assert_eq!((frame.width, frame.height), (60, 30));
    assert_eq!(capture.state(), CaptureState::Live);
    assert!(capture.latest_frame().is_some());

    capture.stop();
    assert!(!capture.source().is_active());
}

#[test]
fn resizing_a_live_capture_changes_frame_size() {
    let mut capture = started_capture();
    wait_for_frame(&mut capture).unwrap();

    assert!(capture
        .update_capture_rect(GlobalRect(Rect::new(10.0, 20.0, 50.0, 25.0)))
        .unwrap());

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut resized = false;
    while Instant::now() < deadline && !resized {
        if let Some(frame) = capture.poll() {
            resized = (frame.width, frame.height) == (100, 50);
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    assert!(resized);
    capture.stop();
}

#[test]
fn sleep_and_wake_cycle_resumes_frames() {
    let mut capture = started_capture();
    wait_for_frame(&mut capture).unwrap();

    capture.handle_system_event(SystemEvent::WillSleep);
    assert_eq!(capture.state(), CaptureState::Paused);
    assert!(!capture.source().is_active());

    capture.handle_system_event(SystemEvent::DidWake);
    assert_eq!(capture.state(), CaptureState::Starting);
    assert!(wait_for_frame(&mut capture).is_some());
    assert_eq!(capture.state(), CaptureState::Live);
    capture.stop();
}

#[test]
fn snapshot_writes_png() {
    let mut capture = started_capture();
    wait_for_frame(&mut capture).unwrap();

    let path = std::env::temp_dir().join(format!("rustruler-snapshot-{}.png", std::process::id()));
    capture.save_snapshot(&path).unwrap();
    capture.stop();

    let image = image::open(&path).unwrap();
    assert_eq!((image.width(), image.height()), (60, 30));
    let _ = std::fs::remove_file(&path);
}
