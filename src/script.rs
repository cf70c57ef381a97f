//! Replay scripts
//!
//! A script declares one or more surfaces and a sequence of raw input steps.
//! Replaying it routes every step through the surface's input adapter and
//! recognizer and collects the signals that fire.
//!
//! ```toml
//! [[surface]]
//! name = "panel"
//! width = 300
//! height = 200
//! area = { left = 10 }
//! threshold = { start = 5, swipe = 3 }
//!
//! [[step]]
//! type = "touch_down"
//! x = 20
//! y = 50
//!
//! [[step]]
//! resize = { width = 640, height = 480 }
//! ```

use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{AreaOverrides, GestureConfig, GestureOverrides, ThresholdOverrides};
use crate::events::EventLog;
use crate::input::{GestureDetail, InputAdapter, RawInput};
use crate::surface::{AttachError, SurfaceGeometry, SurfaceId, SurfaceRegistry};

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse script: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("script declares no surfaces")]
    NoSurfaces,

    #[error(transparent)]
    Attach(#[from] AttachError),

    #[error("step {step} targets unknown surface {name:?}")]
    UnknownSurface { step: usize, name: String },

    #[error("step {step} must name a surface when the script declares several")]
    AmbiguousSurface { step: usize },
}

#[derive(Debug, Clone, Deserialize)]
pub struct SurfaceSpec {
    pub name: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub area: AreaOverrides,
    #[serde(default, alias = "treshold")]
    pub threshold: ThresholdOverrides,
}

impl SurfaceSpec {
    fn overrides(&self) -> GestureOverrides {
        GestureOverrides {
            area: self.area,
            threshold: self.threshold,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptStep {
    #[serde(default)]
    pub surface: Option<String>,
    #[serde(flatten)]
    pub action: StepAction,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StepAction {
    Resize { resize: SurfaceGeometry },
    Input(RawInput),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default, rename = "surface")]
    pub surfaces: Vec<SurfaceSpec>,
    #[serde(default, rename = "step")]
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn from_toml_str(contents: &str) -> Result<Self, ScriptError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}

/// A signal fired while replaying a script
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayEvent {
    pub step: usize,
    pub surface: String,
    pub event: &'static str,
    pub detail: GestureDetail,
}

struct AttachedSurface {
    adapter: InputAdapter,
    geometry: Rc<Cell<SurfaceGeometry>>,
}

/// Surfaces, adapters and recognizers set up from a script
pub struct Replay {
    registry: SurfaceRegistry<Rc<Cell<SurfaceGeometry>>, EventLog>,
    surfaces: HashMap<SurfaceId, AttachedSurface>,
    default_surface: Option<SurfaceId>,
}

impl Replay {
    /// Attach a recognizer to every surface the script declares, with the
    /// surface's own settings merged over `base`
    pub fn new(script: &Script, base: GestureConfig) -> Result<Self, ScriptError> {
        if script.surfaces.is_empty() {
            return Err(ScriptError::NoSurfaces);
        }

        let mut registry = SurfaceRegistry::new();
        let mut surfaces = HashMap::new();

        for spec in &script.surfaces {
            let id = SurfaceId::new(spec.name.as_str());
            let geometry = Rc::new(Cell::new(SurfaceGeometry::new(spec.width, spec.height)));
            let config = base.with_overrides(spec.overrides());

            registry.attach(id.clone(), config, Rc::clone(&geometry), EventLog::default())?;
            debug!(surface = %id, ?config, "Surface ready");
            surfaces.insert(
                id,
                AttachedSurface {
                    adapter: InputAdapter::new(),
                    geometry,
                },
            );
        }

        let default_surface = match script.surfaces.as_slice() {
            [only] => Some(SurfaceId::new(only.name.as_str())),
            _ => None,
        };

        Ok(Self {
            registry,
            surfaces,
            default_surface,
        })
    }

    /// Apply step number `index` and return the signals it fired
    pub fn apply(&mut self, index: usize, step: &ScriptStep) -> Result<Vec<ReplayEvent>, ScriptError> {
        let id = match (&step.surface, &self.default_surface) {
            (Some(name), _) => SurfaceId::new(name.as_str()),
            (None, Some(only)) => only.clone(),
            (None, None) => return Err(ScriptError::AmbiguousSurface { step: index }),
        };

        let unknown = || ScriptError::UnknownSurface {
            step: index,
            name: id.to_string(),
        };
        let surface = self.surfaces.get_mut(&id).ok_or_else(unknown)?;
        let recognizer = self.registry.get_mut(&id).ok_or_else(unknown)?;

        match step.action {
            StepAction::Resize { resize } => {
                debug!(surface = %id, width = resize.width, height = resize.height, "Surface resized");
                surface.geometry.set(resize);
            }
            StepAction::Input(raw) => {
                if let Some(sample) = surface.adapter.normalize(raw) {
                    recognizer.handle(sample);
                }
            }
        }

        Ok(recognizer
            .sink_mut()
            .drain()
            .into_iter()
            .map(|e| ReplayEvent {
                step: index,
                surface: id.to_string(),
                event: e.name,
                detail: e.detail,
            })
            .collect())
    }

    /// Replay every step of `script` in order
    pub fn run(&mut self, script: &Script) -> Result<Vec<ReplayEvent>, ScriptError> {
        let mut fired = Vec::new();
        for (index, step) in script.steps.iter().enumerate() {
            fired.extend(self.apply(index, step)?);
        }
        info!(steps = script.steps.len(), signals = fired.len(), "Replay finished");
        Ok(fired)
    }
}
