// ruler/dividers.rs - Divider Range Model
//
// Two ordered markers along one axis. Markers are created lazily by the first
// two drags and afterwards the nearer marker follows the pointer. Once both
// exist the model keeps 0 <= first <= second <= axis_length.

use log::debug;

use super::{DividerHandle, DividerSlot};
use crate::geometry::clamp_f64;
use crate::settings::{read_value, write_value, KeyValueStore};

/// Snapshot of both markers after an update
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DividerPair {
    pub first: Option<f64>,
    pub second: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct DividerRangeModel<H: DividerHandle> {
    first: Option<f64>,
    second: Option<f64>,
    selected_handle: H,
    axis_length: f64,
    storage_key: String,
}

impl<H: DividerHandle> DividerRangeModel<H> {
    pub fn new(storage_key: impl Into<String>, axis_length: f64) -> Self {
        Self {
            first: None,
            second: None,
            selected_handle: H::from_slot(DividerSlot::First),
            axis_length,
            storage_key: storage_key.into(),
        }
    }

    pub fn first(&self) -> Option<f64> {
        self.first
    }

    pub fn second(&self) -> Option<f64> {
        self.second
    }

    pub fn pair(&self) -> DividerPair {
        DividerPair { first: self.first, second: self.second }
    }

    pub fn selected_handle(&self) -> H {
        self.selected_handle
    }

    pub fn select(&mut self, handle: H) {
        self.selected_handle = handle;
    }

    pub fn axis_length(&self) -> f64 {
        self.axis_length
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Span between the markers, once both exist
    pub fn distance(&self) -> Option<f64> {
        Some(self.second? - self.first?)
    }

    /// Feed a drag position into the model.
    ///
    /// The first two calls create the markers (swapping roles to keep them
    /// ordered); later calls move whichever marker is nearer, ties going to the
    /// first marker. The moved marker becomes the selected handle.
    pub fn update_dividers(&mut self, raw_value: f64, max_value: f64) -> DividerPair {
        let value = clamp_f64(raw_value, 0.0, max_value);

        let moved = match (self.first, self.second) {
            (None, _) => {
                self.first = Some(value);
                DividerSlot::First
            }
            (Some(first), None) => {
                if value < first {
                    self.first = Some(value);
                    self.second = Some(first);
                    DividerSlot::First
                } else {
                    self.second = Some(value);
                    DividerSlot::Second
                }
            }
            (Some(first), Some(second)) => {
                if value <= first {
                    self.first = Some(value);
                    DividerSlot::First
                } else if value >= second {
                    self.second = Some(value);
                    DividerSlot::Second
                } else if value - first <= second - value {
                    self.first = Some(value);
                    DividerSlot::First
                } else {
                    self.second = Some(value);
                    DividerSlot::Second
                }
            }
        };

        self.selected_handle = H::from_slot(moved);
        self.pair()
    }

    /// Bring markers back inside `[0, axis_length]` and in order.
    ///
    /// With `reset_out_of_bounds` offending markers go back to the default
    /// thirds of the axis; otherwise they are clamped in place.
    pub fn normalize(&mut self, reset_out_of_bounds: bool) {
        let length = self.axis_length;
        if !(length > 0.0) {
            return;
        }
        let in_bounds = |v: f64| v.is_finite() && (0.0..=length).contains(&v);

        match (self.first, self.second) {
            (Some(first), Some(second)) => {
                if in_bounds(first) && in_bounds(second) && first <= second {
                    return;
                }
                if reset_out_of_bounds {
                    self.first = Some(length / 3.0);
                    self.second = Some(length * 2.0 / 3.0);
                } else {
                    let a = clamp_f64(first, 0.0, length);
                    let b = clamp_f64(second, 0.0, length);
                    self.first = Some(a.min(b));
                    self.second = Some(a.max(b));
                }
                debug!(
                    "Normalized dividers '{}' to {:?}/{:?}",
                    self.storage_key, self.first, self.second
                );
            }
            (Some(first), None) if !in_bounds(first) => {
                self.first = Some(if reset_out_of_bounds {
                    length / 3.0
                } else {
                    clamp_f64(first, 0.0, length)
                });
            }
            // A lone second marker is never produced by updates; fold it into first.
            (None, Some(second)) => {
                self.second = None;
                self.first = Some(clamp_f64(second, 0.0, length));
            }
            _ => {}
        }
    }

    /// Store a new axis length and renormalize. Returns false when unchanged.
    pub fn set_axis_length(&mut self, axis_length: f64, reset_out_of_bounds: bool) -> bool {
        if axis_length == self.axis_length {
            return false;
        }
        self.axis_length = axis_length;
        self.normalize(reset_out_of_bounds);
        true
    }

    /// Move the selected marker by `delta` points without crossing the other one.
    pub fn nudge_selected(&mut self, delta: f64) -> DividerPair {
        let length = self.axis_length.max(0.0);
        match self.selected_handle.slot() {
            DividerSlot::First => {
                if let Some(first) = self.first {
                    let upper = self.second.unwrap_or(length);
                    self.first = Some(clamp_f64(first + delta, 0.0, upper));
                }
            }
            DividerSlot::Second => {
                if let Some(second) = self.second {
                    let lower = self.first.unwrap_or(0.0);
                    self.second = Some(clamp_f64(second + delta, lower, length));
                }
            }
        }
        self.pair()
    }

    pub fn clear(&mut self) {
        self.first = None;
        self.second = None;
        self.selected_handle = H::from_slot(DividerSlot::First);
    }

    fn key(&self, suffix: &str) -> String {
        format!("{}.{}", self.storage_key, suffix)
    }

    /// Persist markers and the selected slot under this model's storage key.
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        for (suffix, value) in [("first", self.first), ("second", self.second)] {
            match value {
                Some(v) => write_value(store, &self.key(suffix), &v),
                None => store.remove(&self.key(suffix)),
            }
        }
        write_value(store, &self.key("selected"), &self.selected_handle.slot());
    }

    /// Load persisted markers; missing or malformed values keep the current state.
    pub fn restore(&mut self, store: &dyn KeyValueStore) {
        let finite = |v: f64| v.is_finite().then_some(v);
        let first = read_value::<f64>(store, &self.key("first")).and_then(finite);
        let second = read_value::<f64>(store, &self.key("second")).and_then(finite);

        match (first, second) {
            (Some(a), Some(b)) => {
                self.first = Some(a.min(b));
                self.second = Some(a.max(b));
            }
            (Some(a), None) | (None, Some(a)) => {
                self.first = Some(a);
                self.second = None;
            }
            (None, None) => {}
        }
        if let Some(slot) = read_value::<DividerSlot>(store, &self.key("selected")) {
            self.selected_handle = H::from_slot(slot);
        }
        self.normalize(false);
    }
}
