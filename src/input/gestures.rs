//! Drag and swipe recognition for a single surface
//!
//! A gesture moves through three states:
//! - `Inactive`: waiting for a start sample inside the allowed area
//! - `Watching`: started, but hasn't moved past the start threshold yet
//! - `Dragging`: threshold crossed, move events stream until stop
//!
//! Stopping a drag always emits an end event. When the last single step
//! along the dominant axis was longer than the swipe threshold, a swipe
//! event follows, with its direction taken from that step instead of from
//! the whole drag.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GestureConfig;
use crate::events::{emit, EventKind, EventSink};
use crate::surface::{GeometryProvider, Point};

/// Dominant axis of travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Axis with the larger absolute component; ties go to Y
    pub fn dominant(delta: Point) -> Self {
        if delta.x.abs() > delta.y.abs() {
            Axis::X
        } else {
            Axis::Y
        }
    }

    /// Component of `p` along this axis
    pub fn of(self, p: Point) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }

    /// Direction labels ordered [positive, non-positive]
    pub fn directions(self) -> [Direction; 2] {
        match self {
            Axis::X => [Direction::Right, Direction::Left],
            Axis::Y => [Direction::Down, Direction::Up],
        }
    }

    /// Direction of travel for a signed component along this axis
    pub fn direction(self, value: f64) -> Direction {
        let [positive, non_positive] = self.directions();
        if value > 0.0 {
            positive
        } else {
            non_positive
        }
    }
}

/// Cardinal direction of travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Gesture lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Inactive,
    Watching,
    Dragging,
}

/// Payload carried by every gesture signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureDetail {
    pub axis: Axis,
    pub direction: Direction,
    /// Step since the previous sample
    pub movement_x: f64,
    pub movement_y: f64,
    /// Distance since dragging began (dead zone removed along `axis`)
    pub distance_x: f64,
    pub distance_y: f64,
}

/// Normalized pointer sample delivered by an input adapter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerSample {
    Start(Point),
    Move(Point),
    Stop,
}

/// Positions of the gesture in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub start: Point,
    pub current: Point,
    /// Current minus start
    pub distance: Point,
    /// Current minus previous sample
    pub movement: Point,
    pub axis: Axis,
}

impl Track {
    fn new(pos: Point) -> Self {
        Self {
            start: pos,
            current: pos,
            distance: Point::default(),
            movement: Point::default(),
            axis: Axis::dominant(Point::default()),
        }
    }

    fn update(&mut self, pos: Point) {
        self.movement = pos - self.current;
        self.distance = pos - self.start;
        self.current = pos;
        self.axis = Axis::dominant(self.distance);
    }

    /// Direction of the whole drag
    pub fn drag_direction(&self) -> Direction {
        self.axis.direction(self.axis.of(self.distance))
    }

    /// Direction of the last step
    pub fn swipe_direction(&self) -> Direction {
        self.axis.direction(self.axis.of(self.movement))
    }
}

// The track lives inside the phase so an inactive recognizer can't hold one
#[derive(Debug, Clone, Copy, Default)]
enum Phase {
    #[default]
    Inactive,
    Watching(Track),
    Dragging(Track),
}

/// Gesture recognizer state machine for one surface
pub struct GestureRecognizer<G, S> {
    config: GestureConfig,
    geometry: G,
    sink: S,
    phase: Phase,
}

impl<G: GeometryProvider, S: EventSink> GestureRecognizer<G, S> {
    pub fn new(config: GestureConfig, geometry: G, sink: S) -> Self {
        Self {
            config,
            geometry,
            sink,
            phase: Phase::Inactive,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn state(&self) -> GestureState {
        match self.phase {
            Phase::Inactive => GestureState::Inactive,
            Phase::Watching(_) => GestureState::Watching,
            Phase::Dragging(_) => GestureState::Dragging,
        }
    }

    /// Positions of the current gesture, `None` while inactive
    pub fn track(&self) -> Option<&Track> {
        match &self.phase {
            Phase::Inactive => None,
            Phase::Watching(track) | Phase::Dragging(track) => Some(track),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Feed one normalized sample
    pub fn handle(&mut self, sample: PointerSample) {
        match sample {
            PointerSample::Start(pos) => self.start(pos),
            PointerSample::Move(pos) => self.move_to(pos),
            PointerSample::Stop => self.stop(),
        }
    }

    /// Handle a start sample
    pub fn start(&mut self, pos: Point) {
        let geometry = self.geometry.geometry();

        if let Some(edge) = self.config.area.violated_edge(pos.x, pos.y, geometry) {
            debug!(x = pos.x, y = pos.y, ?edge, "Gesture start outside allowed area");
            self.reset();
            return;
        }

        self.phase = Phase::Watching(Track::new(pos));
        debug!(x = pos.x, y = pos.y, "Watching gesture");
    }

    /// Handle a move sample
    pub fn move_to(&mut self, pos: Point) {
        let (mut track, dragging) = match self.phase {
            Phase::Inactive => return,
            Phase::Watching(track) => (track, false),
            Phase::Dragging(track) => (track, true),
        };
        track.update(pos);

        if !dragging && track.axis.of(track.distance).abs() <= self.config.threshold.start {
            self.phase = Phase::Watching(track);
            return;
        }
        self.phase = Phase::Dragging(track);

        let detail = self.detail(&track, track.drag_direction());
        if !dragging {
            debug!(axis = ?track.axis, "Drag started");
            emit(&mut self.sink, EventKind::Start, &detail);
        }
        emit(&mut self.sink, EventKind::Move, &detail);
    }

    /// Handle a stop sample
    pub fn stop(&mut self) {
        match std::mem::take(&mut self.phase) {
            Phase::Dragging(track) => {
                let mut detail = self.detail(&track, track.drag_direction());
                emit(&mut self.sink, EventKind::End, &detail);
                debug!(direction = ?detail.direction, "Drag ended");

                if track.axis.of(track.movement).abs() > self.config.threshold.swipe {
                    detail.direction = track.swipe_direction();
                    debug!(direction = ?detail.direction, "Swipe");
                    emit(&mut self.sink, EventKind::Swipe, &detail);
                }
            }
            Phase::Watching(_) => {
                debug!("Gesture stopped before crossing start threshold");
            }
            Phase::Inactive => {}
        }
    }

    fn reset(&mut self) {
        self.phase = Phase::Inactive;
    }

    /// Build the signal payload, reporting distance from where dragging began
    fn detail(&self, track: &Track, direction: Direction) -> GestureDetail {
        let dead_zone = self.config.threshold.start;
        let adjust = |axis: Axis, value: f64| {
            if axis != track.axis {
                value
            } else if value > 0.0 {
                value - dead_zone
            } else {
                value + dead_zone
            }
        };

        GestureDetail {
            axis: track.axis,
            direction,
            movement_x: track.movement.x,
            movement_y: track.movement.y,
            distance_x: adjust(Axis::X, track.distance.x),
            distance_y: adjust(Axis::Y, track.distance.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AreaRestriction, Measure, Threshold};
    use crate::events::EventLog;
    use crate::surface::SurfaceGeometry;

    const SURFACE: SurfaceGeometry = SurfaceGeometry::new(300.0, 200.0);

    fn config(area: AreaRestriction, start: f64, swipe: f64) -> GestureConfig {
        GestureConfig {
            area,
            threshold: Threshold { start, swipe },
        }
    }

    fn scenario_recognizer() -> GestureRecognizer<SurfaceGeometry, EventLog> {
        let area = AreaRestriction {
            left: Some(Measure::Pixels(10.0)),
            ..Default::default()
        };
        GestureRecognizer::new(config(area, 5.0, 3.0), SURFACE, EventLog::default())
    }

    fn plain_recognizer(start: f64, swipe: f64) -> GestureRecognizer<SurfaceGeometry, EventLog> {
        GestureRecognizer::new(
            config(AreaRestriction::default(), start, swipe),
            SURFACE,
            EventLog::default(),
        )
    }

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_drag_scenario() {
        let mut r = scenario_recognizer();

        r.start(p(20.0, 50.0));
        assert_eq!(r.state(), GestureState::Watching);
        assert!(r.sink().is_empty());

        r.move_to(p(27.0, 50.0));
        assert_eq!(r.state(), GestureState::Dragging);
        assert_eq!(
            r.sink().names(),
            vec![
                "dragStart",
                "dragXStart",
                "dragRightStart",
                "dragMove",
                "dragXMove",
                "dragRightMove",
            ]
        );
        let start = r.sink().events[0].detail;
        assert_eq!(start.axis, Axis::X);
        assert_eq!(start.direction, Direction::Right);
        assert_eq!(start.distance_x, 2.0);
        assert_eq!(start.distance_y, 0.0);
        assert_eq!(start.movement_x, 7.0);
        r.sink_mut().clear();

        r.move_to(p(31.0, 50.0));
        assert_eq!(r.sink().names(), vec!["dragMove", "dragXMove", "dragRightMove"]);
        r.sink_mut().clear();

        r.stop();
        assert_eq!(r.state(), GestureState::Inactive);
        assert!(r.track().is_none());
        assert_eq!(
            r.sink().names(),
            vec!["dragEnd", "dragXEnd", "dragRightEnd", "swipe", "swipeX", "swipeXRight"]
        );
        let swipe = r.sink().events[3].detail;
        assert_eq!(swipe.movement_x, 4.0);
        assert_eq!(swipe.distance_x, 6.0);
    }

    #[test]
    fn test_start_outside_area_is_ignored() {
        let mut r = scenario_recognizer();

        r.start(p(5.0, 50.0));
        assert_eq!(r.state(), GestureState::Inactive);
        assert!(r.track().is_none());

        r.move_to(p(60.0, 50.0));
        r.stop();
        assert!(r.sink().is_empty());
    }

    #[test]
    fn test_start_while_dragging_restarts_watching() {
        let mut r = scenario_recognizer();
        r.start(p(20.0, 50.0));
        r.move_to(p(40.0, 50.0));
        assert_eq!(r.state(), GestureState::Dragging);
        r.sink_mut().clear();

        r.start(p(100.0, 120.0));
        assert_eq!(r.state(), GestureState::Watching);
        let track = r.track().unwrap();
        assert_eq!(track.start, p(100.0, 120.0));
        assert_eq!(track.current, p(100.0, 120.0));
        assert_eq!(track.distance, Point::default());
        assert!(r.sink().is_empty());

        r.move_to(p(102.0, 120.0));
        assert_eq!(r.state(), GestureState::Watching);
        assert!(r.sink().is_empty());
    }

    #[test]
    fn test_start_outside_area_while_watching_resets() {
        let mut r = scenario_recognizer();
        r.start(p(20.0, 50.0));
        assert_eq!(r.state(), GestureState::Watching);

        r.start(p(5.0, 50.0));
        assert_eq!(r.state(), GestureState::Inactive);
        assert!(r.track().is_none());

        r.move_to(p(60.0, 50.0));
        r.stop();
        assert!(r.sink().is_empty());
    }

    #[test]
    fn test_start_on_boundary_is_accepted() {
        let mut r = scenario_recognizer();
        r.start(p(10.0, 50.0));
        assert_eq!(r.state(), GestureState::Watching);
    }

    #[test]
    fn test_area_uses_fresh_geometry() {
        use std::cell::Cell;
        use std::rc::Rc;

        let shared = Rc::new(Cell::new(SURFACE));
        let area = AreaRestriction {
            right: Some(Measure::Percent(10.0)),
            ..Default::default()
        };
        let mut r = GestureRecognizer::new(
            config(area, 5.0, 3.0),
            Rc::clone(&shared),
            EventLog::default(),
        );

        r.start(p(265.0, 20.0));
        assert_eq!(r.state(), GestureState::Watching);
        r.stop();

        shared.set(SurfaceGeometry::new(280.0, 200.0));
        r.start(p(265.0, 20.0));
        assert_eq!(r.state(), GestureState::Inactive);
    }

    #[test]
    fn test_below_threshold_keeps_watching() {
        let mut r = plain_recognizer(5.0, 3.0);
        r.start(p(100.0, 100.0));
        r.move_to(p(105.0, 100.0));
        r.move_to(p(103.0, 96.0));
        assert_eq!(r.state(), GestureState::Watching);
        assert!(r.sink().is_empty());

        r.stop();
        assert_eq!(r.state(), GestureState::Inactive);
        assert!(r.sink().is_empty());
    }

    #[test]
    fn test_single_start_event_per_drag() {
        let mut r = plain_recognizer(5.0, 3.0);
        r.start(p(100.0, 100.0));
        for y in [103.0, 108.0, 112.0, 120.0] {
            r.move_to(p(100.0, y));
        }

        let names = r.sink().names();
        assert_eq!(names.iter().filter(|n| **n == "dragStart").count(), 1);
        assert_eq!(names.iter().filter(|n| **n == "dragMove").count(), 3);
        assert_eq!(names[..3], ["dragStart", "dragYStart", "dragDownStart"]);
    }

    #[test]
    fn test_axis_ties_resolve_to_y() {
        assert_eq!(Axis::dominant(p(3.0, 3.0)), Axis::Y);
        assert_eq!(Axis::dominant(p(-3.0, 3.0)), Axis::Y);
        assert_eq!(Axis::dominant(p(4.0, 3.0)), Axis::X);
        assert_eq!(Axis::dominant(p(0.0, 0.0)), Axis::Y);
    }

    #[test]
    fn test_zero_distance_direction() {
        let mut r = plain_recognizer(0.0, 3.0);
        r.start(p(50.0, 50.0));
        r.move_to(p(50.0, 50.0));

        let track = r.track().unwrap();
        assert_eq!(track.axis, Axis::Y);
        assert_eq!(track.drag_direction(), Direction::Up);
        assert_eq!(r.state(), GestureState::Watching);
    }

    #[test]
    fn test_diagonal_tie_drags_along_y() {
        let mut r = plain_recognizer(2.0, 10.0);
        r.start(p(50.0, 50.0));
        r.move_to(p(47.0, 47.0));

        assert_eq!(r.state(), GestureState::Dragging);
        let detail = r.sink().events[0].detail;
        assert_eq!(detail.axis, Axis::Y);
        assert_eq!(detail.direction, Direction::Up);
        assert_eq!(detail.distance_y, -1.0);
        assert_eq!(detail.distance_x, -3.0);
    }

    #[test]
    fn test_swipe_direction_comes_from_last_step() {
        let mut r = plain_recognizer(5.0, 3.0);
        r.start(p(100.0, 100.0));
        r.move_to(p(140.0, 100.0));
        r.move_to(p(130.0, 100.0));
        r.sink_mut().clear();

        r.stop();
        assert_eq!(
            r.sink().names(),
            vec!["dragEnd", "dragXEnd", "dragRightEnd", "swipe", "swipeX", "swipeXLeft"]
        );
        assert_eq!(r.sink().events[0].detail.direction, Direction::Right);
        assert_eq!(r.sink().events[3].detail.direction, Direction::Left);
    }

    #[test]
    fn test_slow_release_is_not_a_swipe() {
        let mut r = plain_recognizer(5.0, 3.0);
        r.start(p(100.0, 100.0));
        r.move_to(p(100.0, 80.0));
        r.move_to(p(100.0, 77.0));
        r.sink_mut().clear();

        r.stop();
        assert_eq!(r.sink().names(), vec!["dragEnd", "dragYEnd", "dragUpEnd"]);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut r = plain_recognizer(5.0, 5.0);
        r.start(p(0.0, 0.0));
        r.move_to(p(5.0, 0.0));
        assert_eq!(r.state(), GestureState::Watching);

        r.move_to(p(10.0, 0.0));
        assert_eq!(r.state(), GestureState::Dragging);
        r.sink_mut().clear();

        r.stop();
        assert_eq!(r.sink().len(), 3);
    }

    #[test]
    fn test_move_while_inactive_is_ignored() {
        let mut r = plain_recognizer(5.0, 3.0);
        r.move_to(p(40.0, 40.0));
        r.stop();
        assert_eq!(r.state(), GestureState::Inactive);
        assert!(r.sink().is_empty());
    }

    #[test]
    fn test_negative_travel_adds_dead_zone_back() {
        let mut r = plain_recognizer(5.0, 3.0);
        r.start(p(100.0, 100.0));
        r.move_to(p(92.0, 101.0));

        let detail = r.sink().events[0].detail;
        assert_eq!(detail.direction, Direction::Left);
        assert_eq!(detail.distance_x, -3.0);
        assert_eq!(detail.distance_y, 1.0);
    }

    #[test]
    fn test_fan_out_payloads_match() {
        let mut r = plain_recognizer(5.0, 3.0);
        r.start(p(100.0, 100.0));
        r.move_to(p(100.0, 130.0));
        r.stop();

        for chunk in r.sink().events.chunks(3) {
            assert_eq!(chunk.len(), 3);
            assert!(chunk.iter().all(|e| e.detail == chunk[0].detail));
        }
    }

    #[test]
    fn test_new_gesture_after_stop() {
        let mut r = plain_recognizer(5.0, 3.0);
        r.handle(PointerSample::Start(p(10.0, 10.0)));
        r.handle(PointerSample::Move(p(30.0, 10.0)));
        r.handle(PointerSample::Stop);
        r.sink_mut().clear();

        r.handle(PointerSample::Start(p(200.0, 100.0)));
        r.handle(PointerSample::Move(p(200.0, 90.0)));
        let detail = r.sink().events[0].detail;
        assert_eq!(r.sink().events[0].name, "dragStart");
        assert_eq!(detail.axis, Axis::Y);
        assert_eq!(detail.distance_y, -5.0);
    }
}
