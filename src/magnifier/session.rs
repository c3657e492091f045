// magnifier/session.rs - Selection Session
//
// One magnifier window: the selected screen region, its magnification and the
// overlays attached to it. Created when a drag-selection or window pick completes
// and dropped when the magnifier window closes.

use crate::constants::magnifier::{MAX_MAGNIFICATION, MIN_MAGNIFICATION, ZOOM_STEP};
use crate::geometry::{screen_to_global, GlobalRect, Rect, ScreenRect, Size};
use crate::readout::DeltaReadout;
use crate::ruler::Orientation;
use crate::units::UnitType;

use super::crosshair::CrosshairModel;
use super::sample::CenterSampleReadout;
use crate::capture::CaptureFrame;

/// Display that owns a selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenInfo {
    /// Screen frame in bottom-left-origin screen space
    pub frame: Rect,
    /// Physical-to-logical pixel ratio
    pub backing_scale: f64,
}

/// What the magnifier readout shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagnifierReadoutMode {
    CrosshairOnly,
    CrosshairPlusRulers,
}

#[derive(Debug, Clone)]
pub struct SelectionSession {
    id: u64,
    selection_rect_screen: ScreenRect,
    selection_rect_global: GlobalRect,
    screen: ScreenInfo,
    primary_screen_height: f64,
    magnification: f64,
    is_visible: bool,
    horizontal_ruler_shown: bool,
    vertical_ruler_shown: bool,
    crosshair: CrosshairModel,
}

fn clamp_magnification(magnification: f64) -> f64 {
    if magnification.is_nan() {
        return MIN_MAGNIFICATION;
    }
    magnification.clamp(MIN_MAGNIFICATION, MAX_MAGNIFICATION)
}

impl SelectionSession {
    pub fn new(
        id: u64,
        selection: ScreenRect,
        screen: ScreenInfo,
        primary_screen_height: f64,
        magnification: f64,
    ) -> Self {
        let magnification = clamp_magnification(magnification);
        let viewport = Size::new(
            selection.0.size.width * magnification,
            selection.0.size.height * magnification,
        );
        Self {
            id,
            selection_rect_screen: selection,
            selection_rect_global: screen_to_global(selection, primary_screen_height),
            screen,
            primary_screen_height,
            magnification,
            is_visible: true,
            horizontal_ruler_shown: false,
            vertical_ruler_shown: false,
            crosshair: CrosshairModel::new(viewport),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn selection_rect_screen(&self) -> ScreenRect {
        self.selection_rect_screen
    }

    pub fn selection_rect_global(&self) -> GlobalRect {
        self.selection_rect_global
    }

    pub fn screen(&self) -> ScreenInfo {
        self.screen
    }

    pub fn screen_scale(&self) -> f64 {
        self.screen.backing_scale
    }

    /// Rect handed to the capture pipeline
    pub fn capture_rect(&self) -> GlobalRect {
        self.selection_rect_global
    }

    /// Move or resize the selection. Returns false when nothing changed.
    pub fn set_selection_rect(&mut self, selection: ScreenRect) -> bool {
        if selection == self.selection_rect_screen {
            return false;
        }
        self.selection_rect_screen = selection;
        self.selection_rect_global = screen_to_global(selection, self.primary_screen_height);
        self.sync_viewport();
        true
    }

    pub fn magnification(&self) -> f64 {
        self.magnification
    }

    /// Set magnification, clamped to `[1, 10]`. Returns the applied value.
    pub fn set_magnification(&mut self, magnification: f64) -> f64 {
        self.magnification = clamp_magnification(magnification);
        self.sync_viewport();
        self.magnification
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set_magnification(self.magnification + ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set_magnification(self.magnification - ZOOM_STEP)
    }

    /// Size of the magnified viewport in on-screen points
    pub fn viewport_size(&self) -> Size {
        let size = self.selection_rect_screen.0.size;
        Size::new(size.width * self.magnification, size.height * self.magnification)
    }

    fn sync_viewport(&mut self) {
        let viewport = self.viewport_size();
        self.crosshair.set_viewport_size(viewport);
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.is_visible = visible;
    }

    pub fn is_ruler_shown(&self, orientation: Orientation) -> bool {
        match orientation {
            Orientation::Horizontal => self.horizontal_ruler_shown,
            Orientation::Vertical => self.vertical_ruler_shown,
        }
    }

    pub fn set_ruler_shown(&mut self, orientation: Orientation, shown: bool) {
        match orientation {
            Orientation::Horizontal => self.horizontal_ruler_shown = shown,
            Orientation::Vertical => self.vertical_ruler_shown = shown,
        }
    }

    pub fn readout_mode(&self) -> MagnifierReadoutMode {
        if self.horizontal_ruler_shown || self.vertical_ruler_shown {
            MagnifierReadoutMode::CrosshairPlusRulers
        } else {
            MagnifierReadoutMode::CrosshairOnly
        }
    }

    pub fn crosshair(&self) -> &CrosshairModel {
        &self.crosshair
    }

    pub fn crosshair_mut(&mut self) -> &mut CrosshairModel {
        &mut self.crosshair
    }

    /// Color under the viewport center for `frame`
    pub fn center_sample(
        &self,
        frame: &CaptureFrame,
        content_frame: Rect,
    ) -> Option<CenterSampleReadout> {
        CenterSampleReadout::make(
            frame,
            self.viewport_size(),
            content_frame,
            self.magnification,
            self.screen.backing_scale,
        )
    }

    pub fn delta_readout(&self, unit: UnitType, measurement_scale: f64) -> DeltaReadout {
        DeltaReadout::make(
            self.crosshair.primary(),
            self.crosshair.secondary(),
            unit,
            measurement_scale,
            self.magnification,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::PixelFormat;
    use crate::geometry::Point;

    fn session() -> SelectionSession {
        SelectionSession::new(
            1,
            ScreenRect(Rect::new(100.0, 600.0, 80.0, 40.0)),
            ScreenInfo { frame: Rect::new(0.0, 0.0, 1440.0, 900.0), backing_scale: 2.0 },
            900.0,
            2.0,
        )
    }

    #[test]
    fn global_rect_is_flipped() {
        assert_eq!(session().capture_rect().0, Rect::new(100.0, 260.0, 80.0, 40.0));
    }

    #[test]
    fn magnification_is_clamped() {
        let mut s = session();
        assert_eq!(s.set_magnification(25.0), 10.0);
        assert_eq!(s.set_magnification(0.2), 1.0);
        assert_eq!(s.set_magnification(f64::NAN), 1.0);
        assert_eq!(s.zoom_in(), 1.5);
        assert_eq!(s.zoom_out(), 1.0);
        assert_eq!(s.zoom_out(), 1.0);
    }

    #[test]
    fn readout_mode_follows_rulers() {
        let mut s = session();
        assert_eq!(s.readout_mode(), MagnifierReadoutMode::CrosshairOnly);
        s.set_ruler_shown(Orientation::Vertical, true);
        assert_eq!(s.readout_mode(), MagnifierReadoutMode::CrosshairPlusRulers);
        s.set_ruler_shown(Orientation::Vertical, false);
        assert_eq!(s.readout_mode(), MagnifierReadoutMode::CrosshairOnly);
    }

    #[test]
    fn zooming_out_pulls_crosshairs_into_smaller_viewport() {
        let mut s = session();
        s.crosshair_mut().set_secondary(Point::new(80.0, 40.0));
        s.set_magnification(1.0);
        assert_eq!(s.crosshair().secondary(), Point::new(40.0, 20.0));
    }

    #[test]
    fn delta_readout_uses_session_magnification() {
        let mut s = session();
        s.crosshair_mut().set_secondary(Point::new(30.0, 15.0));
        let readout = s.delta_readout(UnitType::Pixels, 1.0);
        assert_eq!(readout.composed(), "ΔX 15 px • ΔY 8 px");
    }

    #[test]
    fn center_sample_uses_backing_scale() {
        let s = session();
        let frame =
            CaptureFrame::from_fn(160, 80, PixelFormat::Bgra8, |x, y| (x as u8, y as u8, 0));
        let viewport = s.viewport_size();
        let readout = s
            .center_sample(&frame, Rect::new(0.0, 0.0, viewport.width, viewport.height))
            .unwrap();
        assert_eq!((readout.pixel_x, readout.pixel_y), (80, 40));
    }

    #[test]
    fn unchanged_selection_is_a_no_op() {
        let mut s = session();
        let rect = s.selection_rect_screen();
        assert!(!s.set_selection_rect(rect));
        assert!(s.set_selection_rect(ScreenRect(Rect::new(0.0, 0.0, 10.0, 10.0))));
    }
}
