//! Gesture configuration
//!
//! Area restrictions and thresholds are supplied as partial overrides merged
//! over the defaults. Files use TOML:
//!
//! ```toml
//! [area]
//! left = 10        # pixels
//! bottom = "25%"   # percentage of the surface height
//!
//! [threshold]
//! start = 5
//! swipe = 3
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use tracing::{info, warn};

use crate::surface::SurfaceGeometry;

/// Distance the pointer must travel along the dominant axis before dragging
pub const DEFAULT_START_THRESHOLD: f64 = 10.0;
/// Final step length along the dominant axis that turns a drag end into a swipe
pub const DEFAULT_SWIPE_THRESHOLD: f64 = 10.0;

#[derive(Error, Debug, PartialEq)]
pub enum MeasureError {
    #[error("invalid measure {0:?}, expected pixels (\"12\", \"12px\") or a percentage (\"25%\")")]
    Invalid(String),

    #[error("measure must be a finite, non-negative number, got {0}")]
    OutOfRange(f64),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse gesture config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("threshold {name} must be a finite, non-negative distance, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
}

/// A linear measure relative to one surface dimension
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure {
    Pixels(f64),
    /// Percentage of the dimension, 0-100
    Percent(f64),
}

impl Measure {
    pub fn pixels(value: f64) -> Result<Self, MeasureError> {
        check_range(value).map(Self::Pixels)
    }

    pub fn percent(value: f64) -> Result<Self, MeasureError> {
        check_range(value).map(Self::Percent)
    }

    /// Resolve to pixels against `dimension`
    pub fn resolve(&self, dimension: f64) -> f64 {
        match *self {
            Self::Pixels(px) => px,
            Self::Percent(pct) => dimension * pct / 100.0,
        }
    }
}

fn check_range(value: f64) -> Result<f64, MeasureError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(MeasureError::OutOfRange(value))
    }
}

impl FromStr for Measure {
    type Err = MeasureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || MeasureError::Invalid(s.to_string());

        if let Some(pct) = trimmed.strip_suffix('%') {
            let value = pct.trim_end().parse::<f64>().map_err(|_| invalid())?;
            Measure::percent(value)
        } else {
            let px = trimmed.strip_suffix("px").unwrap_or(trimmed).trim_end();
            let value = px.parse::<f64>().map_err(|_| invalid())?;
            Measure::pixels(value)
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(px) => write!(f, "{px}px"),
            Self::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

impl Serialize for Measure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Pixels(px) => serializer.serialize_f64(*px),
            Self::Percent(_) => serializer.collect_str(self),
        }
    }
}

impl<'de> Deserialize<'de> for Measure {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MeasureVisitor;

        impl Visitor<'_> for MeasureVisitor {
            type Value = Measure;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number of pixels or a string like \"12px\" or \"25%\"")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Measure, E> {
                Measure::pixels(v as f64).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Measure, E> {
                Measure::pixels(v as f64).map_err(E::custom)
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Measure, E> {
                Measure::pixels(v).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Measure, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(MeasureVisitor)
    }
}

/// Edge constraints on where a gesture may start.
///
/// Each edge is measured inward from the matching side of the surface. `None`
/// leaves that side unrestricted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AreaRestriction {
    pub top: Option<Measure>,
    pub right: Option<Measure>,
    pub bottom: Option<Measure>,
    pub left: Option<Measure>,
}

/// Edge of the surface an area restriction applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl AreaRestriction {
    /// Return the first edge (top, right, bottom, left) that excludes `(x, y)`.
    ///
    /// Top and left reject with `<`, right and bottom with `>`, so a point
    /// exactly on a boundary is accepted.
    pub fn violated_edge(&self, x: f64, y: f64, geometry: SurfaceGeometry) -> Option<Edge> {
        let SurfaceGeometry { width, height } = geometry;

        if let Some(top) = self.top {
            if y < top.resolve(height) {
                return Some(Edge::Top);
            }
        }
        if let Some(right) = self.right {
            if x > width - right.resolve(width) {
                return Some(Edge::Right);
            }
        }
        if let Some(bottom) = self.bottom {
            if y > height - bottom.resolve(height) {
                return Some(Edge::Bottom);
            }
        }
        if let Some(left) = self.left {
            if x < left.resolve(width) {
                return Some(Edge::Left);
            }
        }
        None
    }

    pub fn contains(&self, x: f64, y: f64, geometry: SurfaceGeometry) -> bool {
        self.violated_edge(x, y, geometry).is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Threshold {
    /// Dead zone before a watched gesture is promoted to dragging
    pub start: f64,
    /// Minimum final step that classifies a drag end as a swipe
    pub swipe: f64,
}

impl Threshold {
    pub fn new(start: f64, swipe: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            start: check_threshold("start", start)?,
            swipe: check_threshold("swipe", swipe)?,
        })
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    check_range(value).map_err(|_| ConfigError::InvalidThreshold { name, value })
}

impl Default for Threshold {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_THRESHOLD,
            swipe: DEFAULT_SWIPE_THRESHOLD,
        }
    }
}

/// Configuration of one gesture recognizer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GestureConfig {
    pub area: AreaRestriction,
    pub threshold: Threshold,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct AreaOverrides {
    #[serde(default)]
    pub top: Option<Measure>,
    #[serde(default)]
    pub right: Option<Measure>,
    #[serde(default)]
    pub bottom: Option<Measure>,
    #[serde(default)]
    pub left: Option<Measure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct ThresholdOverrides {
    #[serde(default, deserialize_with = "start_distance")]
    pub start: Option<f64>,
    #[serde(default, deserialize_with = "swipe_distance")]
    pub swipe: Option<f64>,
}

fn start_distance<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = f64::deserialize(deserializer)?;
    check_threshold("start", value).map(Some).map_err(de::Error::custom)
}

fn swipe_distance<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = f64::deserialize(deserializer)?;
    check_threshold("swipe", value).map(Some).map_err(de::Error::custom)
}

/// Partial configuration as read from a file; unknown keys are ignored
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct GestureOverrides {
    #[serde(default)]
    pub area: AreaOverrides,
    #[serde(default, alias = "treshold")]
    pub threshold: ThresholdOverrides,
}

impl GestureOverrides {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}

impl GestureConfig {
    /// Merge `overrides` over this configuration, keeping unset fields
    pub fn with_overrides(mut self, overrides: GestureOverrides) -> Self {
        let area = overrides.area;
        self.area.top = area.top.or(self.area.top);
        self.area.right = area.right.or(self.area.right);
        self.area.bottom = area.bottom.or(self.area.bottom);
        self.area.left = area.left.or(self.area.left);

        let threshold = overrides.threshold;
        self.threshold.start = threshold.start.unwrap_or(self.threshold.start);
        self.threshold.swipe = threshold.swipe.unwrap_or(self.threshold.swipe);
        self
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let overrides = GestureOverrides::from_toml_str(contents)?;
        Ok(Self::default().with_overrides(overrides))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        info!("Loaded gesture config from {:?}", path);
        Ok(config)
    }

    /// Default config file location
    pub fn config_path() -> Option<PathBuf> {
        std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
            .ok()
            .map(|dir| dir.join("flick/gestures.toml"))
    }

    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring gesture config: {}", e);
                Self::default()
            }
        }
    }
}
