// capture/pipeline.rs - Magnifier Capture Pipeline
//
// Owns one capture source and drives it through
//
//   Idle -> Starting -> Live -> Paused -> Live (resume) | Idle (stop/error)
//
// The pipeline belongs to the UI thread. The source delivers frames from its own
// thread into a single watch slot; delayed pauses and stream failures arrive as
// messages. Both are drained by `poll()`, so no state is shared behind a lock.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use super::{CaptureFrame, CaptureSource, FrameSink, PixelFormat, StreamConfiguration};
use crate::constants::capture::{DEFAULT_FRAME_RATE_CAP, FRAME_LOG_INTERVAL};
use crate::constants::scale::MIN_SCALE_FLOOR;
use crate::geometry::GlobalRect;

/// Lifecycle of the capture stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    /// Source started, waiting for the first frame
    Starting,
    Live,
    /// Delivery stopped, configuration kept for resume
    Paused,
}

impl CaptureState {
    pub fn is_running(self) -> bool {
        matches!(self, Self::Starting | Self::Live)
    }
}

/// Power notifications forwarded by the host application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemEvent {
    WillSleep,
    DidWake,
}

/// Messages crossing into the pipeline's owner thread
#[derive(Debug)]
pub(crate) enum PipelineMessage {
    StreamStopped { stream: u64, error: String },
    DelayedPause { generation: u64 },
}

#[derive(Debug)]
struct DelayedPause {
    generation: u64,
    token: CancellationToken,
}

pub struct MagnifierCapture<S: CaptureSource> {
    source: S,
    state: CaptureState,

    capture_rect: Option<GlobalRect>,
    screen_scale: f64,
    frame_rate_cap: u32,
    shows_cursor: bool,
    pixel_format: PixelFormat,
    /// Configuration the source is currently running with
    active_config: Option<StreamConfiguration>,

    frames_tx: Arc<watch::Sender<Option<Arc<CaptureFrame>>>>,
    frames_rx: watch::Receiver<Option<Arc<CaptureFrame>>>,
    messages_tx: mpsc::UnboundedSender<PipelineMessage>,
    messages_rx: mpsc::UnboundedReceiver<PipelineMessage>,
    latest: Option<Arc<CaptureFrame>>,
    frames_received: u64,

    delayed_pause: Option<DelayedPause>,
    pause_generation: u64,
    /// Bumped on every start so reports from replaced streams can be told apart
    stream_generation: u64,
    resume_after_wake: bool,
    /// Restart automatically when the stream stops with an error
    auto_restart_on_error: bool,
    last_error: Option<String>,
}

impl<S: CaptureSource> MagnifierCapture<S> {
    pub fn new(source: S) -> Self {
        let (frames_tx, frames_rx) = watch::channel(None);
        let (messages_tx, messages_rx) = mpsc::unbounded_channel();
        Self {
            source,
            state: CaptureState::Idle,
            capture_rect: None,
            screen_scale: 1.0,
            frame_rate_cap: DEFAULT_FRAME_RATE_CAP,
            shows_cursor: false,
            pixel_format: PixelFormat::default(),
            active_config: None,
            frames_tx: Arc::new(frames_tx),
            frames_rx,
            messages_tx,
            messages_rx,
            latest: None,
            frames_received: 0,
            delayed_pause: None,
            pause_generation: 0,
            stream_generation: 0,
            resume_after_wake: false,
            auto_restart_on_error: false,
            last_error: None,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn capture_rect(&self) -> Option<GlobalRect> {
        self.capture_rect
    }

    pub fn screen_scale(&self) -> f64 {
        self.screen_scale
    }

    /// Most recent frame, if any arrived since the last start
    pub fn latest_frame(&self) -> Option<&Arc<CaptureFrame>> {
        self.latest.as_ref()
    }

    /// Error from the last failed start or stream failure
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn has_pending_pause(&self) -> bool {
        self.delayed_pause.is_some()
    }

    pub fn set_auto_restart_on_error(&mut self, enabled: bool) {
        self.auto_restart_on_error = enabled;
    }

    pub fn set_frame_rate_cap(&mut self, frame_rate_cap: u32) -> Result<()> {
        if self.frame_rate_cap == frame_rate_cap {
            return Ok(());
        }
        let previous = std::mem::replace(&mut self.frame_rate_cap, frame_rate_cap);
        self.reconfigure().inspect_err(|_| self.frame_rate_cap = previous)
    }

    pub fn set_pixel_format(&mut self, pixel_format: PixelFormat) -> Result<()> {
        if self.pixel_format == pixel_format {
            return Ok(());
        }
        let previous = std::mem::replace(&mut self.pixel_format, pixel_format);
        self.reconfigure().inspect_err(|_| self.pixel_format = previous)
    }

    /// Configuration derived from the current rect and settings
    pub fn configuration(&self) -> Option<StreamConfiguration> {
        let rect = self.capture_rect?;
        Some(StreamConfiguration {
            frame_rate_cap: self.frame_rate_cap,
            shows_cursor: self.shows_cursor,
            pixel_format: self.pixel_format,
            ..StreamConfiguration::for_rect(rect, self.screen_scale)
        })
    }

    /// Start capturing the current rect. A running capture is left alone.
    pub fn start(&mut self) -> Result<()> {
        self.cancel_delayed_pause();
        if self.state.is_running() {
            return Ok(());
        }
        let config = self
            .configuration()
            .ok_or_else(|| anyhow!("No capture rectangle set"))?;
        self.begin(config)
    }

    fn begin(&mut self, config: StreamConfiguration) -> Result<()> {
        info!("Starting capture for {:?}", config);
        self.state = CaptureState::Starting;
        self.last_error = None;
        // A frame left over from an earlier stream must not count as the first frame.
        let _ = self.frames_rx.borrow_and_update();

        self.stream_generation += 1;
        let sink = FrameSink::new(
            self.stream_generation,
            self.frames_tx.clone(),
            self.messages_tx.clone(),
        );
        match self.source.start(&config, sink) {
            Ok(()) => {
                self.active_config = Some(config);
                Ok(())
            }
            Err(e) => {
                warn!("Capture failed to start: {:#}", e);
                self.state = CaptureState::Idle;
                self.active_config = None;
                self.last_error = Some(format!("{e:#}"));
                Err(e.context("Failed to start capture"))
            }
        }
    }

    /// Continue a paused capture with the kept configuration.
    pub fn resume(&mut self) -> Result<()> {
        match self.state {
            CaptureState::Paused => {
                self.cancel_delayed_pause();
                let config = self
                    .configuration()
                    .ok_or_else(|| anyhow!("No capture rectangle set"))?;
                self.begin(config)
            }
            CaptureState::Idle => self.start(),
            CaptureState::Starting | CaptureState::Live => {
                self.cancel_delayed_pause();
                Ok(())
            }
        }
    }

    /// Stop frame delivery but keep the configuration for an instant resume.
    pub fn pause(&mut self) {
        self.cancel_delayed_pause();
        self.suspend();
    }

    /// Pause once `delay` has elapsed, replacing any earlier delayed pause.
    ///
    /// The timer runs on the current tokio runtime; it only posts a message, which
    /// takes effect on the next [`MagnifierCapture::poll`].
    pub fn pause_after(&mut self, delay: Duration) -> Result<()> {
        self.cancel_delayed_pause();
        let runtime = tokio::runtime::Handle::try_current()
            .context("Delayed pause needs a running tokio runtime")?;

        self.pause_generation += 1;
        let generation = self.pause_generation;
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let messages = self.messages_tx.clone();

        runtime.spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = messages.send(PipelineMessage::DelayedPause { generation });
                }
            }
        });

        debug!("Scheduled pause #{} in {:?}", generation, delay);
        self.delayed_pause = Some(DelayedPause { generation, token });
        Ok(())
    }

    /// Stop capturing entirely and forget the latest frame.
    pub fn stop(&mut self) {
        self.cancel_delayed_pause();
        if self.state.is_running() {
            self.source.stop();
            info!("Capture stopped");
        }
        self.state = CaptureState::Idle;
        self.active_config = None;
        self.latest = None;
        self.resume_after_wake = false;
    }

    pub fn restart(&mut self) -> Result<()> {
        self.stop();
        self.start()
    }

    /// Move or resize the captured rectangle.
    ///
    /// Returns `Ok(false)` when `rect` equals the current one. A running capture is
    /// reconfigured in place; otherwise the new rect is used on the next start.
    pub fn update_capture_rect(&mut self, rect: GlobalRect) -> Result<bool> {
        if self.capture_rect == Some(rect) {
            return Ok(false);
        }
        let previous = self.capture_rect.replace(rect);
        self.reconfigure().inspect_err(|_| self.capture_rect = previous)?;
        Ok(true)
    }

    pub fn set_screen_scale(&mut self, screen_scale: f64) -> Result<bool> {
        let screen_scale = screen_scale.max(MIN_SCALE_FLOOR);
        if self.screen_scale == screen_scale {
            return Ok(false);
        }
        let previous = std::mem::replace(&mut self.screen_scale, screen_scale);
        self.reconfigure().inspect_err(|_| self.screen_scale = previous)?;
        Ok(true)
    }

    pub fn set_shows_cursor(&mut self, shows_cursor: bool) -> Result<()> {
        if self.shows_cursor == shows_cursor {
            return Ok(());
        }
        self.shows_cursor = shows_cursor;
        self.reconfigure().inspect_err(|_| self.shows_cursor = !shows_cursor)
    }

    fn reconfigure(&mut self) -> Result<()> {
        if !self.state.is_running() {
            debug!("Capture not running, configuration change deferred");
            return Ok(());
        }
        let Some(config) = self.configuration() else {
            return Ok(());
        };
        if self.active_config.as_ref() == Some(&config) {
            return Ok(());
        }
        self.source
            .update_configuration(&config)
            .context("Failed to reconfigure capture")?;
        debug!("Capture reconfigured to {:?}", config.source_rect);
        self.active_config = Some(config);
        Ok(())
    }

    /// React to system sleep and wake. Failures are logged, never returned.
    pub fn handle_system_event(&mut self, event: SystemEvent) {
        match event {
            SystemEvent::WillSleep => {
                if self.state.is_running() {
                    info!("System going to sleep, pausing capture");
                    self.pause();
                    self.resume_after_wake = true;
                }
            }
            SystemEvent::DidWake => {
                if std::mem::take(&mut self.resume_after_wake) {
                    info!("System woke up, restarting capture");
                    if let Err(e) = self.resume() {
                        warn!("Failed to restart capture after wake: {:#}", e);
                    }
                }
            }
        }
    }

    /// Apply pending messages and take the newest frame.
    ///
    /// Returns the frame only when one arrived since the last poll. The first
    /// frame moves a starting capture to `Live`.
    pub fn poll(&mut self) -> Option<Arc<CaptureFrame>> {
        while let Ok(message) = self.messages_rx.try_recv() {
            match message {
                PipelineMessage::DelayedPause { generation } => {
                    let current = self.delayed_pause.as_ref().map(|p| p.generation);
                    if current == Some(generation) {
                        self.delayed_pause = None;
                        info!("Delayed pause #{} elapsed", generation);
                        self.suspend();
                    }
                }
                PipelineMessage::StreamStopped { stream, error } => {
                    if stream == self.stream_generation {
                        self.on_stream_stopped(error);
                    } else {
                        debug!("Ignoring stop report from replaced stream #{}: {}", stream, error);
                    }
                }
            }
        }

        if !self.frames_rx.has_changed().unwrap_or(false) {
            return None;
        }
        let frame = self.frames_rx.borrow_and_update().clone()?;
        if !self.state.is_running() {
            return None;
        }

        if self.state == CaptureState::Starting {
            info!("First frame received ({}x{})", frame.width, frame.height);
            self.state = CaptureState::Live;
        }
        self.frames_received += 1;
        if self.frames_received % FRAME_LOG_INTERVAL == 0 {
            debug!("Received frame #{}", self.frames_received);
        }
        self.latest = Some(frame.clone());
        Some(frame)
    }

    /// Write the latest frame to `path` as an image.
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let frame = self.latest.as_ref().context("No frame captured yet")?;
        let image = frame
            .to_rgba_image()
            .context("Captured frame buffer is malformed")?;
        image
            .save(path)
            .with_context(|| format!("Failed to save snapshot to {:?}", path))?;
        info!("Snapshot saved to {:?}", path);
        Ok(())
    }

    fn on_stream_stopped(&mut self, error: String) {
        warn!("Capture stream stopped with error: {}", error);
        self.last_error = Some(error);
        if !self.state.is_running() {
            return;
        }
        self.suspend();
        if self.auto_restart_on_error {
            if let Err(e) = self.resume() {
                warn!("Automatic capture restart failed: {:#}", e);
            }
        }
    }

    fn suspend(&mut self) {
        if self.state.is_running() {
            self.source.stop();
            self.active_config = None;
            self.state = CaptureState::Paused;
            info!("Capture paused");
        }
    }

    fn cancel_delayed_pause(&mut self) {
        if let Some(pending) = self.delayed_pause.take() {
            pending.token.cancel();
            debug!("Cancelled delayed pause #{}", pending.generation);
        }
    }
}

impl<S: CaptureSource> Drop for MagnifierCapture<S> {
    fn drop(&mut self) {
        self.cancel_delayed_pause();
        if self.state.is_running() {
            self.source.stop();
        }
    }
}

impl<S: CaptureSource> std::fmt::Debug for MagnifierCapture<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MagnifierCapture")
            .field("state", &self.state)
            .field("capture_rect", &self.capture_rect)
            .field("screen_scale", &self.screen_scale)
            .field("frames_received", &self.frames_received)
            .field("has_pending_pause", &self.delayed_pause.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    #[derive(Default)]
    struct SpySource {
        starts: u32,
        stops: u32,
        reconfigurations: u32,
        fail_next_start: bool,
        fail_next_update: bool,
        last_config: Option<StreamConfiguration>,
        sink: Option<FrameSink>,
    }

    impl SpySource {
        fn push_frame(&self) {
            if let Some(sink) = &self.sink {
                sink.deliver(CaptureFrame::from_fn(2, 2, PixelFormat::Bgra8, |_, _| (1, 2, 3)));
            }
        }
    }

    impl CaptureSource for SpySource {
        fn start(&mut self, config: &StreamConfiguration, sink: FrameSink) -> Result<()> {
            if std::mem::take(&mut self.fail_next_start) {
                return Err(anyhow!("permission denied"));
            }
            self.starts += 1;
            self.last_config = Some(config.clone());
            self.sink = Some(sink);
            Ok(())
        }

        fn update_configuration(&mut self, config: &StreamConfiguration) -> Result<()> {
            if std::mem::take(&mut self.fail_next_update) {
                return Err(anyhow!("stream rejected configuration"));
            }
            self.reconfigurations += 1;
            self.last_config = Some(config.clone());
            Ok(())
        }

        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    fn rect(x: f64) -> GlobalRect {
        GlobalRect(Rect::new(x, 10.0, 100.0, 50.0))
    }

    fn live_capture() -> MagnifierCapture<SpySource> {
        let mut capture = MagnifierCapture::new(SpySource::default());
        capture.update_capture_rect(rect(0.0)).unwrap();
        capture.start().unwrap();
        capture.source().push_frame();
        capture.poll();
        capture
    }

    #[test]
    fn first_frame_makes_capture_live() {
        let mut capture = MagnifierCapture::new(SpySource::default());
        capture.update_capture_rect(rect(0.0)).unwrap();
        capture.start().unwrap();
        assert_eq!(capture.state(), CaptureState::Starting);
        assert!(capture.poll().is_none());

        capture.source().push_frame();
        assert!(capture.poll().is_some());
        assert_eq!(capture.state(), CaptureState::Live);
        assert!(capture.latest_frame().is_some());
    }

    #[test]
    fn start_without_rect_fails() {
        let mut capture = MagnifierCapture::new(SpySource::default());
        assert!(capture.start().is_err());
        assert_eq!(capture.state(), CaptureState::Idle);
    }

    #[test]
    fn failed_start_stays_idle_and_can_be_retried() {
        let mut capture = MagnifierCapture::new(SpySource::default());
        capture.update_capture_rect(rect(0.0)).unwrap();
        capture.source_mut().fail_next_start = true;

        assert!(capture.start().is_err());
        assert_eq!(capture.state(), CaptureState::Idle);
        assert!(capture.last_error().unwrap().contains("permission denied"));

        capture.start().unwrap();
        assert_eq!(capture.state(), CaptureState::Starting);
        assert!(capture.last_error().is_none());
    }

    #[test]
    fn identical_rect_does_not_reconfigure() {
        let mut capture = live_capture();
        assert!(capture.update_capture_rect(rect(5.0)).unwrap());
        assert!(!capture.update_capture_rect(rect(5.0)).unwrap());
        assert_eq!(capture.source().reconfigurations, 1);
        assert_eq!(capture.source().starts, 1);
    }

    #[test]
    fn failed_reconfiguration_can_be_retried() {
        let mut capture = live_capture();
        capture.source_mut().fail_next_update = true;
        assert!(capture.update_capture_rect(rect(50.0)).is_err());
        assert_eq!(capture.capture_rect(), Some(rect(0.0)));

        assert!(capture.update_capture_rect(rect(50.0)).unwrap());
        let config = capture.source().last_config.clone().unwrap();
        assert_eq!(config.source_rect, rect(50.0));
    }

    #[test]
    fn failed_scale_change_keeps_previous_scale() {
        let mut capture = live_capture();
        capture.source_mut().fail_next_update = true;
        assert!(capture.set_screen_scale(2.0).is_err());
        assert_eq!(capture.screen_scale(), 1.0);

        assert!(capture.set_screen_scale(2.0).unwrap());
        let config = capture.source().last_config.clone().unwrap();
        assert_eq!((config.pixel_width, config.pixel_height), (200, 100));
    }

    #[test]
    fn rect_changes_while_idle_are_deferred() {
        let mut capture = MagnifierCapture::new(SpySource::default());
        capture.update_capture_rect(rect(0.0)).unwrap();
        capture.update_capture_rect(rect(30.0)).unwrap();
        assert_eq!(capture.source().reconfigurations, 0);

        capture.start().unwrap();
        let config = capture.source().last_config.clone().unwrap();
        assert_eq!(config.source_rect, rect(30.0));
    }

    #[test]
    fn screen_scale_sets_pixel_size() {
        let mut capture = live_capture();
        capture.set_screen_scale(2.0).unwrap();
        let config = capture.source().last_config.clone().unwrap();
        assert_eq!((config.pixel_width, config.pixel_height), (200, 100));
    }

    #[test]
    fn pause_and_resume_keep_configuration() {
        let mut capture = live_capture();
        capture.pause();
        assert_eq!(capture.state(), CaptureState::Paused);
        assert_eq!(capture.source().stops, 1);

        capture.update_capture_rect(rect(40.0)).unwrap();
        assert_eq!(capture.source().reconfigurations, 0);

        capture.resume().unwrap();
        assert_eq!(capture.state(), CaptureState::Starting);
        assert_eq!(capture.source().last_config.clone().unwrap().source_rect, rect(40.0));
    }

    #[test]
    fn frames_after_pause_are_dropped() {
        let mut capture = live_capture();
        capture.pause();
        capture.source().push_frame();
        assert!(capture.poll().is_none());
        assert_eq!(capture.state(), CaptureState::Paused);
    }

    #[test]
    fn newest_frame_wins() {
        let mut capture = live_capture();
        let sink = capture.source().sink.clone().unwrap();
        for shade in 0..5u8 {
            sink.deliver(CaptureFrame::from_fn(1, 1, PixelFormat::Bgra8, |_, _| (shade, 0, 0)));
        }
        let frame = capture.poll().unwrap();
        assert_eq!(frame.rgb_at(0, 0), Some((4, 0, 0)));
        assert!(capture.poll().is_none());
    }

    #[test]
    fn stream_error_pauses_without_restart() {
        let mut capture = live_capture();
        capture.source().sink.clone().unwrap().stream_stopped("display disconnected");
        capture.poll();
        assert_eq!(capture.state(), CaptureState::Paused);
        assert_eq!(capture.source().starts, 1);
        assert_eq!(capture.last_error(), Some("display disconnected"));
    }

    #[test]
    fn stop_report_from_replaced_stream_is_ignored() {
        let mut capture = live_capture();
        let old_sink = capture.source().sink.clone().unwrap();
        old_sink.stream_stopped("old stream died");

        capture.restart().unwrap();
        capture.source().push_frame();
        assert!(capture.poll().is_some());
        assert_eq!(capture.state(), CaptureState::Live);
        assert_eq!(capture.source().starts, 2);
        assert!(capture.last_error().is_none());

        capture.source().sink.clone().unwrap().stream_stopped("new stream died");
        capture.poll();
        assert_eq!(capture.state(), CaptureState::Paused);
    }

    #[test]
    fn stream_error_restarts_when_enabled() {
        let mut capture = live_capture();
        capture.set_auto_restart_on_error(true);
        capture.source().sink.clone().unwrap().stream_stopped("hiccup");
        capture.poll();
        assert_eq!(capture.state(), CaptureState::Starting);
        assert_eq!(capture.source().starts, 2);
    }

    #[test]
    fn sleep_pauses_and_wake_restarts() {
        let mut capture = live_capture();
        capture.handle_system_event(SystemEvent::WillSleep);
        assert_eq!(capture.state(), CaptureState::Paused);

        capture.handle_system_event(SystemEvent::DidWake);
        assert_eq!(capture.state(), CaptureState::Starting);
        assert_eq!(capture.source().starts, 2);
    }

    #[test]
    fn wake_failure_is_only_logged() {
        let mut capture = live_capture();
        capture.handle_system_event(SystemEvent::WillSleep);
        capture.source_mut().fail_next_start = true;
        capture.handle_system_event(SystemEvent::DidWake);
        assert_eq!(capture.state(), CaptureState::Idle);
        assert!(capture.last_error().is_some());
    }

    #[test]
    fn wake_does_nothing_when_idle_before_sleep() {
        let mut capture = MagnifierCapture::new(SpySource::default());
        capture.update_capture_rect(rect(0.0)).unwrap();
        capture.handle_system_event(SystemEvent::WillSleep);
        capture.handle_system_event(SystemEvent::DidWake);
        assert_eq!(capture.state(), CaptureState::Idle);
        assert_eq!(capture.source().starts, 0);
    }

    #[test]
    fn stop_clears_latest_frame() {
        let mut capture = live_capture();
        capture.stop();
        assert_eq!(capture.state(), CaptureState::Idle);
        assert!(capture.latest_frame().is_none());
    }

    #[test]
    fn delayed_pause_needs_a_runtime() {
        let mut capture = live_capture();
        assert!(capture.pause_after(Duration::from_secs(1)).is_err());
        assert!(!capture.has_pending_pause());
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_pause_fires() {
        let mut capture = live_capture();
        capture.pause_after(Duration::from_secs(5)).unwrap();

        tokio::time::sleep(Duration::from_secs(4)).await;
        capture.poll();
        assert_eq!(capture.state(), CaptureState::Live);

        tokio::time::sleep(Duration::from_secs(2)).await;
        capture.poll();
        assert_eq!(capture.state(), CaptureState::Paused);
        assert!(!capture.has_pending_pause());
    }

    #[tokio::test(start_paused = true)]
    async fn newer_delayed_pause_replaces_older_one() {
        let mut capture = live_capture();
        capture.pause_after(Duration::from_secs(2)).unwrap();
        capture.pause_after(Duration::from_secs(10)).unwrap();

        tokio::time::sleep(Duration::from_secs(3)).await;
        capture.poll();
        assert_eq!(capture.state(), CaptureState::Live);

        tokio::time::sleep(Duration::from_secs(8)).await;
        capture.poll();
        assert_eq!(capture.state(), CaptureState::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_delayed_pause() {
        let mut capture = live_capture();
        capture.pause_after(Duration::from_secs(2)).unwrap();
        capture.stop();
        capture.update_capture_rect(rect(1.0)).unwrap();
        capture.start().unwrap();

        tokio::time::sleep(Duration::from_secs(3)).await;
        capture.poll();
        assert_eq!(capture.state(), CaptureState::Starting);
    }
}
