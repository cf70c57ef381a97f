//! Input adapter shared by every backend
//!
//! Backends translate their events into [`RawInput`] and pass them through an
//! [`InputAdapter`], which turns mouse and touch alike into the
//! start/move/stop samples the recognizer consumes. Only one pointer drives a
//! gesture: whichever source presses first owns it until release, and
//! everything else (secondary fingers, mouse events emulated from touch) is
//! dropped.

use tracing::trace;

use super::gestures::PointerSample;
use super::touch::{InputSource, RawInput, PRIMARY_BUTTON};
use crate::surface::Point;

#[derive(Debug, Default)]
pub struct InputAdapter {
    active: Option<InputSource>,
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source currently driving a gesture
    pub fn active_source(&self) -> Option<InputSource> {
        self.active
    }

    /// Translate a raw event into a sample, or `None` if it doesn't affect
    /// the gesture
    pub fn normalize(&mut self, event: RawInput) -> Option<PointerSample> {
        let sample = match event {
            RawInput::MouseDown { x, y, button } => {
                if button != PRIMARY_BUTTON {
                    return None;
                }
                self.press(InputSource::Mouse, Point::new(x, y))
            }
            RawInput::TouchDown { slot, x, y } => {
                self.press(InputSource::Touch { slot }, Point::new(x, y))
            }
            RawInput::MouseMove { x, y } | RawInput::TouchMotion { x, y, .. } => {
                event
                    .source()
                    .is_some_and(|source| self.active == Some(source))
                    .then(|| PointerSample::Move(Point::new(x, y)))
            }
            RawInput::MouseUp { button } => {
                if button != PRIMARY_BUTTON {
                    return None;
                }
                self.release(InputSource::Mouse)
            }
            RawInput::TouchUp { slot } => self.release(InputSource::Touch { slot }),
            RawInput::TouchCancel => match self.active {
                Some(InputSource::Touch { .. }) => {
                    self.active = None;
                    Some(PointerSample::Stop)
                }
                _ => None,
            },
        };

        if sample.is_none() {
            trace!(?event, active = ?self.active, "Dropped input event");
        }
        sample
    }

    fn press(&mut self, source: InputSource, pos: Point) -> Option<PointerSample> {
        if self.active.is_some() {
            return None;
        }
        self.active = Some(source);
        Some(PointerSample::Start(pos))
    }

    fn release(&mut self, source: InputSource) -> Option<PointerSample> {
        if self.active != Some(source) {
            return None;
        }
        self.active = None;
        Some(PointerSample::Stop)
    }
}
