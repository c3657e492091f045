// app/state.rs - Core Application State
//
// The context is built once at startup and passed to whatever needs it. It owns
// the preference store, both rulers and the open magnifier session, and
// announces every change on the event bus.

use anyhow::{Context, Result};
use log::{info, warn};

use super::events::{EventBus, MeasureEvent};
use crate::geometry::ScreenRect;
use crate::magnifier::{ScreenInfo, SelectionSession};
use crate::readout::ReadoutComponents;
use crate::ruler::{
    DividerPair, DividerRangeModel, HandleSnapConfiguration, HandleSnapEngine, NudgeEvent,
    Orientation, RulerHandle,
};
use crate::settings::{keys, KeyValueStore, Preferences};
use crate::units::UnitType;

/// One ruler window's measurement state
#[derive(Debug)]
pub struct RulerState {
    orientation: Orientation,
    dividers: DividerRangeModel<RulerHandle>,
    snap: HandleSnapEngine,
    shown: bool,
}

impl RulerState {
    fn new(orientation: Orientation, axis_length: f64) -> Self {
        Self {
            orientation,
            dividers: DividerRangeModel::new(keys::dividers(orientation.key()), axis_length),
            snap: HandleSnapEngine::new(),
            shown: false,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn dividers(&self) -> &DividerRangeModel<RulerHandle> {
        &self.dividers
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn is_snapped(&self) -> bool {
        self.snap.is_snapped()
    }
}

/// Main application context
#[derive(Debug)]
pub struct AppContext<K: KeyValueStore> {
    store: K,
    preferences: Preferences,
    events: EventBus,
    horizontal: RulerState,
    vertical: RulerState,
    session: Option<SelectionSession>,
    next_session_id: u64,
    backing_scale: f64,
}

impl<K: KeyValueStore> AppContext<K> {
    /// Build the context from persisted preferences.
    pub fn new(store: K) -> Self {
        let preferences = Preferences::load(&store);
        let mut horizontal =
            RulerState::new(Orientation::Horizontal, preferences.window_frame_width);
        let mut vertical = RulerState::new(Orientation::Vertical, preferences.window_frame_height);
        horizontal.dividers.restore(&store);
        vertical.dividers.restore(&store);

        info!("Loaded preferences: unit={}, snap={:?}", preferences.unit_type, preferences.snap);

        Self {
            store,
            preferences,
            events: EventBus::new(),
            horizontal,
            vertical,
            session: None,
            next_session_id: 1,
            backing_scale: 1.0,
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn ruler(&self, orientation: Orientation) -> &RulerState {
        match orientation {
            Orientation::Horizontal => &self.horizontal,
            Orientation::Vertical => &self.vertical,
        }
    }

    fn ruler_mut(&mut self, orientation: Orientation) -> &mut RulerState {
        match orientation {
            Orientation::Horizontal => &mut self.horizontal,
            Orientation::Vertical => &mut self.vertical,
        }
    }

    pub fn session(&self) -> Option<&SelectionSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut SelectionSession> {
        self.session.as_mut()
    }

    pub fn set_backing_scale(&mut self, backing_scale: f64) {
        self.backing_scale = backing_scale;
    }

    pub fn set_unit(&mut self, unit: UnitType) {
        if self.preferences.unit_type == unit {
            return;
        }
        self.preferences.unit_type = unit;
        self.events.publish(MeasureEvent::UnitChanged(unit));
    }

    pub fn set_snap_configuration(&mut self, config: HandleSnapConfiguration) {
        if self.preferences.snap == config {
            return;
        }
        self.preferences.snap = config;
        self.events.publish(MeasureEvent::SnapSettingsChanged(config));
    }

    /// Set the user's scale override. Returns false for a non-positive or
    /// non-finite scale, which is ignored, or when nothing changed.
    pub fn set_measurement_scale(&mut self, measurement_scale: f64, show_override: bool) -> bool {
        if !(measurement_scale.is_finite() && measurement_scale > 0.0) {
            warn!("Ignoring invalid measurement scale {}", measurement_scale);
            return false;
        }
        let prefs = &mut self.preferences;
        let unchanged = prefs.measurement_scale == measurement_scale
            && prefs.show_scale_override == show_override;
        if unchanged {
            return false;
        }
        prefs.measurement_scale = measurement_scale;
        prefs.show_scale_override = show_override;
        self.events.publish(MeasureEvent::MeasurementScaleChanged {
            scale: measurement_scale,
            show_override,
        });
        true
    }

    /// Divisor applied to distances: the user's override when enabled,
    /// otherwise the backing scale of the display being measured.
    pub fn measurement_scale(&self) -> f64 {
        if self.preferences.show_scale_override {
            self.preferences.measurement_scale
        } else {
            self.backing_scale
        }
    }

    fn current_magnification(&self) -> f64 {
        self.session.as_ref().map_or(1.0, SelectionSession::magnification)
    }

    /// Drag a ruler handle to `raw_value`, given in the ruler's on-screen space.
    pub fn drag_handle(&mut self, orientation: Orientation, raw_value: f64) -> DividerPair {
        let magnification = self.current_magnification();
        let unit = self.preferences.unit_type;
        let snap_config = self.preferences.snap;

        let ruler = self.ruler_mut(orientation);
        let axis_length = ruler.dividers.axis_length();
        let value = ruler
            .snap
            .snapped_value(raw_value, axis_length, magnification, unit, &snap_config);
        let dividers = ruler.dividers.update_dividers(value, axis_length);
        let pulsed = ruler.snap.take_pulse();

        if pulsed {
            self.events.publish(MeasureEvent::SnapPulse { orientation, value });
        }
        self.events.publish(MeasureEvent::DividersChanged { orientation, dividers });
        dividers
    }

    /// End of a drag; the next drag starts without snap history.
    pub fn end_drag(&mut self, orientation: Orientation) {
        self.ruler_mut(orientation).snap.clear();
    }

    /// Route a keyboard nudge to the ruler owning its axis.
    pub fn apply_nudge(&mut self, event: NudgeEvent) -> DividerPair {
        let orientation = event.orientation();
        let delta = event.step_points(self.preferences.nudge_step, self.backing_scale);
        let dividers = self.ruler_mut(orientation).dividers.nudge_selected(delta);

        self.events.publish(MeasureEvent::Nudge(event));
        self.events.publish(MeasureEvent::DividersChanged { orientation, dividers });
        dividers
    }

    pub fn select_handle(&mut self, orientation: Orientation, handle: RulerHandle) {
        self.ruler_mut(orientation).dividers.select(handle);
    }

    /// Resize a ruler window. Unchanged lengths are ignored.
    pub fn resize_ruler(&mut self, orientation: Orientation, length: f64) {
        let ruler = self.ruler_mut(orientation);
        if !ruler.dividers.set_axis_length(length, true) {
            return;
        }
        let dividers = ruler.dividers.pair();
        match orientation {
            Orientation::Horizontal => self.preferences.window_frame_width = length,
            Orientation::Vertical => self.preferences.window_frame_height = length,
        }
        self.events.publish(MeasureEvent::DividersChanged { orientation, dividers });
    }

    pub fn set_ruler_shown(&mut self, orientation: Orientation, shown: bool) {
        self.ruler_mut(orientation).shown = shown;
        if let Some(session) = self.session.as_mut() {
            session.set_ruler_shown(orientation, shown);
        }
        self.events.publish(MeasureEvent::RulerVisibilityChanged { orientation, shown });
    }

    /// Open a magnifier session for a finished selection, replacing any open one.
    pub fn open_session(
        &mut self,
        selection: ScreenRect,
        screen: ScreenInfo,
        primary_screen_height: f64,
        magnification: f64,
    ) -> &SelectionSession {
        let id = self.next_session_id;
        self.next_session_id += 1;

        let mut session =
            SelectionSession::new(id, selection, screen, primary_screen_height, magnification);
        for orientation in Orientation::ALL {
            session.set_ruler_shown(orientation, self.ruler(orientation).shown);
        }
        self.backing_scale = screen.backing_scale;
        info!("Opened magnifier session #{} for {:?}", id, session.selection_rect_global());
        self.events
            .publish(MeasureEvent::MagnificationChanged(session.magnification()));
        self.session.insert(session)
    }

    pub fn close_session(&mut self) {
        if let Some(session) = self.session.take() {
            info!("Closed magnifier session #{}", session.id());
        }
    }

    /// Change the open session's magnification; returns the applied value.
    pub fn set_magnification(&mut self, magnification: f64) -> Option<f64> {
        let applied = self.session.as_mut()?.set_magnification(magnification);
        self.events.publish(MeasureEvent::MagnificationChanged(applied));
        Some(applied)
    }

    /// Readout for the span between a ruler's two dividers
    pub fn ruler_readout(&self, orientation: Orientation) -> Option<ReadoutComponents> {
        let distance = self.ruler(orientation).dividers.distance()?;
        Some(ReadoutComponents::make(
            distance,
            self.preferences.unit_type,
            self.measurement_scale(),
            self.current_magnification(),
            self.preferences.show_scale_override,
        ))
    }

    /// Write preferences and divider positions to the store.
    pub fn persist(&mut self) -> Result<()> {
        self.preferences.save(&mut self.store);
        self.horizontal.dividers.save(&mut self.store);
        self.vertical.dividers.save(&mut self.store);
        self.store.flush().context("Failed to persist preferences")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::ruler::NudgeDirection;
    use crate::settings::MemoryStore;

    fn context() -> AppContext<MemoryStore> {
        AppContext::new(MemoryStore::default())
    }

    fn screen() -> ScreenInfo {
        ScreenInfo { frame: Rect::new(0.0, 0.0, 1440.0, 900.0), backing_scale: 2.0 }
    }

    #[test]
    fn drag_snaps_and_announces_pulse() {
        let mut ctx = context();
        let mut rx = ctx.events().subscribe();

        let pair = ctx.drag_handle(Orientation::Horizontal, 52.0);
        assert_eq!(pair.first, Some(50.0));
        assert_eq!(
            rx.try_recv().unwrap(),
            MeasureEvent::SnapPulse { orientation: Orientation::Horizontal, value: 50.0 }
        );
        assert!(matches!(rx.try_recv().unwrap(), MeasureEvent::DividersChanged { .. }));
    }

    #[test]
    fn nudge_goes_to_owning_ruler() {
        let mut ctx = context();
        ctx.drag_handle(Orientation::Vertical, 100.0);
        ctx.set_backing_scale(2.0);

        let pair = ctx.apply_nudge(NudgeEvent::new(NudgeDirection::Down, true));
        assert_eq!(pair.first, Some(101.0));
        assert_eq!(ctx.ruler(Orientation::Horizontal).dividers().first(), None);
    }

    #[test]
    fn readout_reflects_unit_and_session_magnification() {
        let mut ctx = context();
        ctx.set_unit(UnitType::Inches);
        ctx.drag_handle(Orientation::Horizontal, 0.0);
        ctx.drag_handle(Orientation::Horizontal, 144.0);

        let readout = ctx.ruler_readout(Orientation::Horizontal).unwrap();
        assert_eq!(readout.composed(), "2.00 in • 1 x");

        ctx.open_session(ScreenRect(Rect::new(0.0, 0.0, 100.0, 100.0)), screen(), 900.0, 2.5);
        let readout = ctx.ruler_readout(Orientation::Horizontal).unwrap();
        assert_eq!(readout.magnification_label, "2.5 x");
    }

    #[test]
    fn session_inherits_ruler_visibility() {
        let mut ctx = context();
        ctx.set_ruler_shown(Orientation::Horizontal, true);
        let session =
            ctx.open_session(ScreenRect(Rect::new(0.0, 0.0, 100.0, 100.0)), screen(), 900.0, 2.0);
        assert!(session.is_ruler_shown(Orientation::Horizontal));
        assert!(!session.is_ruler_shown(Orientation::Vertical));
    }

    #[test]
    fn persist_and_reload() {
        let mut ctx = context();
        ctx.set_unit(UnitType::Millimeters);
        ctx.drag_handle(Orientation::Horizontal, 33.0);
        ctx.drag_handle(Orientation::Horizontal, 333.0);
        ctx.persist().unwrap();

        let reloaded = AppContext::new(ctx.store().clone());
        assert_eq!(reloaded.preferences().unit_type, UnitType::Millimeters);
        assert_eq!(
            reloaded.ruler(Orientation::Horizontal).dividers().pair(),
            ctx.ruler(Orientation::Horizontal).dividers().pair()
        );
    }

    #[test]
    fn readout_divides_by_backing_scale_unless_overridden() {
        let mut ctx = context();
        ctx.set_unit(UnitType::Inches);
        ctx.open_session(ScreenRect(Rect::new(0.0, 0.0, 100.0, 100.0)), screen(), 900.0, 2.0);
        ctx.drag_handle(Orientation::Horizontal, 0.0);
        ctx.drag_handle(Orientation::Horizontal, 288.0);

        let readout = ctx.ruler_readout(Orientation::Horizontal).unwrap();
        assert_eq!(readout.composed(), "1.00 in • 2 x");

        assert!(ctx.set_measurement_scale(1.0, true));
        let readout = ctx.ruler_readout(Orientation::Horizontal).unwrap();
        assert_eq!(readout.composed(), "2.00 in • 2 x • scale 1.00");
    }

    #[test]
    fn invalid_measurement_scale_is_ignored() {
        let mut ctx = context();
        let mut rx = ctx.events().subscribe();
        for bad in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            assert!(!ctx.set_measurement_scale(bad, true));
        }
        assert_eq!(ctx.preferences().measurement_scale, 1.0);
        assert!(!ctx.preferences().show_scale_override);
        assert!(rx.try_recv().is_err());

        assert!(ctx.set_measurement_scale(1.5, true));
        assert_eq!(
            rx.try_recv().unwrap(),
            MeasureEvent::MeasurementScaleChanged { scale: 1.5, show_override: true }
        );
        assert!(!ctx.set_measurement_scale(1.5, true));
    }

    #[test]
    fn vertical_ruler_length_is_its_own() {
        let mut ctx = context();
        assert_eq!(ctx.ruler(Orientation::Vertical).dividers().axis_length(), 400.0);

        ctx.resize_ruler(Orientation::Vertical, 250.0);
        assert_eq!(ctx.preferences().window_frame_height, 250.0);
        assert_eq!(ctx.preferences().window_frame_width, 600.0);
        ctx.persist().unwrap();

        let reloaded = AppContext::new(ctx.store().clone());
        assert_eq!(reloaded.ruler(Orientation::Vertical).dividers().axis_length(), 250.0);
        assert_eq!(reloaded.ruler(Orientation::Horizontal).dividers().axis_length(), 600.0);
    }

    #[test]
    fn resize_resets_out_of_bounds_dividers() {
        let mut ctx = context();
        ctx.drag_handle(Orientation::Horizontal, 33.0);
        ctx.drag_handle(Orientation::Horizontal, 500.0);
        ctx.resize_ruler(Orientation::Horizontal, 300.0);

        let pair = ctx.ruler(Orientation::Horizontal).dividers().pair();
        assert_eq!(pair.first, Some(100.0));
        assert_eq!(pair.second, Some(200.0));
        assert_eq!(ctx.preferences().window_frame_width, 300.0);
    }
}
