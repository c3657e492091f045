// settings.rs - Preference Persistence
//
// Preferences live in an opaque key-value store. A missing or malformed key is
// never an error: the built-in default is used instead.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::constants::ruler::{
    DEFAULT_BACKGROUND_SIZE, DEFAULT_LENGTH, DEFAULT_NUDGE_STEP, DEFAULT_VERTICAL_LENGTH,
};
use crate::constants::snap::MAX_TOLERANCE_POINTS;
use crate::ruler::HandleSnapConfiguration;
use crate::units::UnitType;

/// Keys used for the scalar preferences
pub mod keys {
    pub const UNIT_TYPE: &str = "unitType";
    pub const SNAP_ENABLED: &str = "snap.enabled";
    pub const SNAP_TOLERANCE: &str = "snap.tolerancePoints";
    pub const SNAP_GRID_STEP: &str = "snap.gridStepPoints";
    pub const SNAP_TO_MAJOR_TICKS: &str = "snap.toMajorTicks";
    pub const RULER_BACKGROUND_SIZE: &str = "ruler.backgroundSize";
    pub const WINDOW_FRAME_WIDTH: &str = "ruler.windowFrameWidth";
    pub const WINDOW_FRAME_HEIGHT: &str = "ruler.windowFrameHeight";
    pub const NUDGE_STEP: &str = "ruler.nudgeStep";
    pub const MEASUREMENT_SCALE: &str = "readout.measurementScale";
    pub const SHOW_SCALE_OVERRIDE: &str = "readout.showScaleOverride";

    /// Prefix for per-orientation divider state
    pub fn dividers(orientation: &str) -> String {
        format!("dividers.{orientation}")
    }
}

/// Opaque key-value store backing the preferences
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&mut self, key: &str, value: Value);

    fn remove(&mut self, key: &str);

    /// Write pending changes to the backing medium
    fn flush(&mut self) -> Result<()>;
}

/// Typed read; absent or malformed values come back as `None`.
pub fn read_value<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let value = store.get(key)?;
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            debug!("Ignoring malformed preference '{}': {}", key, e);
            None
        }
    }
}

/// Typed write; values that fail to serialize are logged and skipped.
pub fn write_value<T: Serialize + ?Sized>(store: &mut dyn KeyValueStore, key: &str, value: &T) {
    match serde_json::to_value(value) {
        Ok(v) => store.set(key, v),
        Err(e) => warn!("Failed to serialize preference '{}': {}", key, e),
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, Value>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Store persisted as a pretty-printed JSON object on disk
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
    dirty: bool,
}

impl JsonFileStore {
    /// `<config dir>/RustRuler/preferences.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("RustRuler")
            .join("preferences.json")
    }

    pub fn open_default() -> Self {
        Self::open(Self::default_path())
    }

    /// Load the store at `path`. A missing or unreadable file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(contents) => match serde_json::from_str(&contents) {
                    Ok(values) => {
                        info!("Preferences loaded from {:?}", path);
                        values
                    }
                    Err(e) => {
                        error!("Failed to parse preferences: {}", e);
                        BTreeMap::new()
                    }
                },
                Err(e) => {
                    error!("Failed to read preferences file: {}", e);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        Self { path, values, dirty: false }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        if self.values.get(key) != Some(&value) {
            self.values.insert(key.to_string(), value);
            self.dirty = true;
        }
    }

    fn remove(&mut self, key: &str) {
        if self.values.remove(key).is_some() {
            self.dirty = true;
        }
    }

    fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create preferences directory {:?}", dir))?;
        }
        let json = serde_json::to_string_pretty(&self.values)
            .context("Failed to serialize preferences")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write preferences to {:?}", self.path))?;
        self.dirty = false;
        info!("Preferences saved to {:?}", self.path);
        Ok(())
    }
}

/// Scalar user preferences
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub unit_type: UnitType,
    pub snap: HandleSnapConfiguration,
    /// Thickness of the ruler background, in points
    pub ruler_background_size: f64,
    /// Length of the horizontal ruler window, in points
    pub window_frame_width: f64,
    /// Length of the vertical ruler window, in points
    pub window_frame_height: f64,
    /// Keyboard nudge step, in backing pixels
    pub nudge_step: f64,
    pub measurement_scale: f64,
    pub show_scale_override: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            unit_type: UnitType::default(),
            snap: HandleSnapConfiguration::default(),
            ruler_background_size: DEFAULT_BACKGROUND_SIZE,
            window_frame_width: DEFAULT_LENGTH,
            window_frame_height: DEFAULT_VERTICAL_LENGTH,
            nudge_step: DEFAULT_NUDGE_STEP,
            measurement_scale: 1.0,
            show_scale_override: false,
        }
    }
}

fn positive(v: f64) -> Option<f64> {
    (v.is_finite() && v > 0.0).then_some(v)
}

impl Preferences {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let defaults = Self::default();

        let snap = HandleSnapConfiguration {
            snap_enabled: read_value(store, keys::SNAP_ENABLED)
                .unwrap_or(defaults.snap.snap_enabled),
            snap_tolerance_points: read_value::<f64>(store, keys::SNAP_TOLERANCE)
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v.min(MAX_TOLERANCE_POINTS))
                .unwrap_or(defaults.snap.snap_tolerance_points),
            snap_grid_step_points: read_value::<f64>(store, keys::SNAP_GRID_STEP)
                .and_then(positive),
            snap_to_major_ticks: read_value(store, keys::SNAP_TO_MAJOR_TICKS)
                .unwrap_or(defaults.snap.snap_to_major_ticks),
        };

        Self {
            unit_type: read_value(store, keys::UNIT_TYPE).unwrap_or(defaults.unit_type),
            snap,
            ruler_background_size: read_value::<f64>(store, keys::RULER_BACKGROUND_SIZE)
                .and_then(positive)
                .unwrap_or(defaults.ruler_background_size),
            window_frame_width: read_value::<f64>(store, keys::WINDOW_FRAME_WIDTH)
                .and_then(positive)
                .unwrap_or(defaults.window_frame_width),
            window_frame_height: read_value::<f64>(store, keys::WINDOW_FRAME_HEIGHT)
                .and_then(positive)
                .unwrap_or(defaults.window_frame_height),
            nudge_step: read_value::<f64>(store, keys::NUDGE_STEP)
                .and_then(positive)
                .unwrap_or(defaults.nudge_step),
            measurement_scale: read_value::<f64>(store, keys::MEASUREMENT_SCALE)
                .and_then(positive)
                .unwrap_or(defaults.measurement_scale),
            show_scale_override: read_value(store, keys::SHOW_SCALE_OVERRIDE)
                .unwrap_or(defaults.show_scale_override),
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        write_value(store, keys::UNIT_TYPE, &self.unit_type);
        write_value(store, keys::SNAP_ENABLED, &self.snap.snap_enabled);
        write_value(store, keys::SNAP_TOLERANCE, &self.snap.snap_tolerance_points);
        match self.snap.snap_grid_step_points {
            Some(step) => write_value(store, keys::SNAP_GRID_STEP, &step),
            None => store.remove(keys::SNAP_GRID_STEP),
        }
        write_value(store, keys::SNAP_TO_MAJOR_TICKS, &self.snap.snap_to_major_ticks);
        write_value(store, keys::RULER_BACKGROUND_SIZE, &self.ruler_background_size);
        write_value(store, keys::WINDOW_FRAME_WIDTH, &self.window_frame_width);
        write_value(store, keys::WINDOW_FRAME_HEIGHT, &self.window_frame_height);
        write_value(store, keys::NUDGE_STEP, &self.nudge_step);
        write_value(store, keys::MEASUREMENT_SCALE, &self.measurement_scale);
        write_value(store, keys::SHOW_SCALE_OVERRIDE, &self.show_scale_override);
    }
}
