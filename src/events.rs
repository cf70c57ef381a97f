//! Gesture event names and dispatch
//!
//! Every logical event fans out to three concrete signals so listeners can
//! subscribe at the granularity they need:
//! - generic (`dragStart`)
//! - axis-qualified (`dragXStart`)
//! - direction-qualified (`dragRightStart`)

use std::collections::HashMap;

use tracing::trace;

use crate::input::{Axis, Direction, GestureDetail};

/// Logical gesture event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Start,
    Move,
    End,
    Swipe,
}

/// Granularity of a concrete signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Qualifier {
    Generic,
    Axis(Axis),
    Direction(Direction),
}

// Rows follow `EventKind`, columns follow `Qualifier::column`.
const EVENT_NAMES: [[&str; 7]; 4] = [
    [
        "dragStart",
        "dragXStart",
        "dragYStart",
        "dragUpStart",
        "dragDownStart",
        "dragLeftStart",
        "dragRightStart",
    ],
    [
        "dragMove",
        "dragXMove",
        "dragYMove",
        "dragUpMove",
        "dragDownMove",
        "dragLeftMove",
        "dragRightMove",
    ],
    [
        "dragEnd",
        "dragXEnd",
        "dragYEnd",
        "dragUpEnd",
        "dragDownEnd",
        "dragLeftEnd",
        "dragRightEnd",
    ],
    // Swipe direction names keep the axis letter: swipeXRight, swipeYUp
    [
        "swipe",
        "swipeX",
        "swipeY",
        "swipeYUp",
        "swipeYDown",
        "swipeXLeft",
        "swipeXRight",
    ],
];

impl EventKind {
    pub const ALL: [EventKind; 4] = [Self::Start, Self::Move, Self::End, Self::Swipe];

    fn row(self) -> usize {
        match self {
            Self::Start => 0,
            Self::Move => 1,
            Self::End => 2,
            Self::Swipe => 3,
        }
    }

    /// Concrete signal name for this event at the given granularity
    pub fn name(self, qualifier: Qualifier) -> &'static str {
        EVENT_NAMES[self.row()][qualifier.column()]
    }

    /// The three concrete names a dispatch of this event produces for `detail`
    pub fn fan_out(self, detail: &GestureDetail) -> [&'static str; 3] {
        [
            self.name(Qualifier::Generic),
            self.name(Qualifier::Axis(detail.axis)),
            self.name(Qualifier::Direction(detail.direction)),
        ]
    }
}

impl Qualifier {
    fn column(self) -> usize {
        match self {
            Self::Generic => 0,
            Self::Axis(Axis::X) => 1,
            Self::Axis(Axis::Y) => 2,
            Self::Direction(Direction::Up) => 3,
            Self::Direction(Direction::Down) => 4,
            Self::Direction(Direction::Left) => 5,
            Self::Direction(Direction::Right) => 6,
        }
    }
}

/// Receives concrete gesture signals.
///
/// Dispatch is synchronous and fire-and-forget: the recognizer does not
/// observe what the sink does with a signal.
pub trait EventSink {
    fn dispatch(&mut self, name: &'static str, detail: &GestureDetail);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn dispatch(&mut self, name: &'static str, detail: &GestureDetail) {
        (**self).dispatch(name, detail);
    }
}

/// Dispatch `kind` to `sink` as its generic, axis and direction signals
pub fn emit<S: EventSink + ?Sized>(sink: &mut S, kind: EventKind, detail: &GestureDetail) {
    for name in kind.fan_out(detail) {
        trace!(event = name, ?detail, "Dispatching gesture signal");
        sink.dispatch(name, detail);
    }
}

type Handler = Box<dyn FnMut(&'static str, &GestureDetail)>;

/// Delivers signals to handlers subscribed by name or to every signal
#[derive(Default)]
pub struct EventBus {
    named: HashMap<&'static str, Vec<Handler>>,
    any: Vec<Handler>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to one concrete signal, e.g. `"dragXMove"`
    pub fn on<F>(&mut self, name: &'static str, handler: F)
    where
        F: FnMut(&'static str, &GestureDetail) + 'static,
    {
        self.named.entry(name).or_default().push(Box::new(handler));
    }

    /// Subscribe to every signal
    pub fn on_any<F>(&mut self, handler: F)
    where
        F: FnMut(&'static str, &GestureDetail) + 'static,
    {
        self.any.push(Box::new(handler));
    }

    pub fn subscriber_count(&self) -> usize {
        self.any.len() + self.named.values().map(Vec::len).sum::<usize>()
    }
}

impl EventSink for EventBus {
    fn dispatch(&mut self, name: &'static str, detail: &GestureDetail) {
        if let Some(handlers) = self.named.get_mut(name) {
            for handler in handlers.iter_mut() {
                handler(name, detail);
            }
        }
        for handler in self.any.iter_mut() {
            handler(name, detail);
        }
    }
}

/// A signal as recorded by [`EventLog`]
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchedEvent {
    pub name: &'static str,
    pub detail: GestureDetail,
}

/// Records every signal in dispatch order
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<DispatchedEvent>,
}

impl EventLog {
    pub fn names(&self) -> Vec<&'static str> {
        self.events.iter().map(|e| e.name).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Remove and return everything recorded so far
    pub fn drain(&mut self) -> Vec<DispatchedEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for EventLog {
    fn dispatch(&mut self, name: &'static str, detail: &GestureDetail) {
        self.events.push(DispatchedEvent {
            name,
            detail: *detail,
        });
    }
}
