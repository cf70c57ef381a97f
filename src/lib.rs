//! Flick gestures - drag and swipe recognition for touch surfaces
//!
//! Features:
//! - Start-area restrictions per surface edge, in pixels or percentages
//! - Dead-zone threshold before a touch turns into a drag
//! - Dominant axis and direction tracking
//! - Swipe classification from the final step of a drag
//! - Generic, per-axis and per-direction signals for every event

pub mod config;
pub mod events;
pub mod input;
pub mod script;
pub mod surface;

pub use config::{AreaRestriction, GestureConfig, Measure, Threshold};
pub use events::{EventBus, EventKind, EventLog, EventSink};
pub use input::{
    Axis, Direction, GestureDetail, GestureRecognizer, GestureState, InputAdapter, PointerSample,
    RawInput,
};
pub use surface::{GeometryProvider, Point, SurfaceGeometry, SurfaceId, SurfaceRegistry};
