//! Input handling - pointer normalization and gesture recognition
//!
//! This module provides:
//! - Raw mouse/touch event types
//! - The input adapter that normalizes them into pointer samples
//! - Drag and swipe recognition

mod gestures;
mod handler;
mod touch;

pub use gestures::*;
pub use handler::*;
pub use touch::*;
