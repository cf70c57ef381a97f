//! Surfaces that gestures are recognized on
//!
//! A surface is anything with a width and a height that receives pointer input
//! in its own coordinate space (origin at the top-left corner). This module
//! provides:
//! - Point math shared by the recognizer
//! - The geometry snapshot read when a gesture starts
//! - A registry that keeps exactly one recognizer per surface

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::ops::Sub;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::GestureConfig;
use crate::events::EventSink;
use crate::input::GestureRecognizer;

/// A position or delta in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height of a surface at the moment it was read
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceGeometry {
    pub width: f64,
    pub height: f64,
}

impl SurfaceGeometry {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Supplies the current surface size on demand.
///
/// The recognizer queries this once per start sample, so a provider backed by
/// shared state picks up resizes between gestures.
pub trait GeometryProvider {
    fn geometry(&self) -> SurfaceGeometry;
}

impl GeometryProvider for SurfaceGeometry {
    fn geometry(&self) -> SurfaceGeometry {
        *self
    }
}

impl GeometryProvider for Rc<Cell<SurfaceGeometry>> {
    fn geometry(&self) -> SurfaceGeometry {
        self.get()
    }
}

/// Identifies a surface within a [`SurfaceRegistry`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(String);

impl SurfaceId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SurfaceId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AttachError {
    #[error("surface {0} already has a gesture recognizer attached")]
    AlreadyAttached(SurfaceId),
}

/// Owns the gesture recognizers of a set of surfaces.
///
/// Attaching is the only way to create a recognizer for a surface, and a
/// surface accepts one recognizer at a time.
pub struct SurfaceRegistry<G, S> {
    recognizers: HashMap<SurfaceId, GestureRecognizer<G, S>>,
}

impl<G, S> Default for SurfaceRegistry<G, S> {
    fn default() -> Self {
        Self {
            recognizers: HashMap::new(),
        }
    }
}

impl<G: GeometryProvider, S: EventSink> SurfaceRegistry<G, S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a recognizer to `id`, failing if one is already attached
    pub fn attach(
        &mut self,
        id: SurfaceId,
        config: GestureConfig,
        geometry: G,
        sink: S,
    ) -> Result<&mut GestureRecognizer<G, S>, AttachError> {
        use std::collections::hash_map::Entry;

        match self.recognizers.entry(id) {
            Entry::Occupied(entry) => Err(AttachError::AlreadyAttached(entry.key().clone())),
            Entry::Vacant(entry) => {
                debug!(surface = %entry.key(), "Attached gesture recognizer");
                Ok(entry.insert(GestureRecognizer::new(config, geometry, sink)))
            }
        }
    }

    /// Tear down the recognizer of `id`, abandoning any gesture in progress
    pub fn detach(&mut self, id: &SurfaceId) -> Option<GestureRecognizer<G, S>> {
        let removed = self.recognizers.remove(id);
        if removed.is_some() {
            debug!(surface = %id, "Detached gesture recognizer");
        }
        removed
    }

    pub fn get(&self, id: &SurfaceId) -> Option<&GestureRecognizer<G, S>> {
        self.recognizers.get(id)
    }

    pub fn get_mut(&mut self, id: &SurfaceId) -> Option<&mut GestureRecognizer<G, S>> {
        self.recognizers.get_mut(id)
    }

    pub fn is_attached(&self, id: &SurfaceId) -> bool {
        self.recognizers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.recognizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recognizers.is_empty()
    }

    pub fn surfaces(&self) -> impl Iterator<Item = &SurfaceId> {
        self.recognizers.keys()
    }
}
