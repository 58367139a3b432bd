//! Seeded reference path generation
//!
//! A path is a polyline running down a tall virtual canvas, built from
//! randomly chosen sections (long wobbly drops, slopes, S-curves) that are
//! approximated by short straight sub-segments. The same seed and canvas
//! size always produce the same path.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::geometry::{closest_param_on_segment, distance_point_to_segment};
use super::rng::Mulberry32;
use crate::consts::{MARGIN, START_SIDE_OFFSET};
use crate::error::TraceError;
use crate::{Point, clamp_to_lane, lane_bounds, path_height};

/// Long drop: vertical distance range and wobble amplitude range
const DROP_DISTANCE: (f64, f64) = (300.0, 700.0);
const DROP_WOBBLE: (f64, f64) = (10.0, 40.0);
const DROP_STEP: f64 = 20.0;

/// Slope: vertical distance range and horizontal offset range
const SLOPE_DISTANCE: (f64, f64) = (200.0, 500.0);
const SLOPE_OFFSET: (f64, f64) = (60.0, 180.0);
const SLOPE_STEP: f64 = 25.0;

/// S-curve: vertical height range and horizontal swing range
const CURVE_HEIGHT: (f64, f64) = (250.0, 500.0);
const CURVE_WIDTH: (f64, f64) = (40.0, 120.0);
const CURVE_STEP: f64 = 30.0;

/// One straight piece of the reference path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    pub start: Point,
    pub end: Point,
    pub length: f64,
    /// Sum of all segment lengths up to and including this one
    pub accumulated_length: f64,
}

/// Section archetypes the path is assembled from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section {
    /// Mostly vertical run with a gentle sine wobble
    LongDrop,
    /// Straight diagonal toward the left edge
    SlopeLeft,
    /// Straight diagonal toward the right edge
    SlopeRight,
    /// One full sine period sideways
    SCurve,
}

impl Section {
    /// Selection table; the long drop fills two of five slots
    const TABLE: [Section; 5] = [
        Section::LongDrop,
        Section::LongDrop,
        Section::SlopeLeft,
        Section::SlopeRight,
        Section::SCurve,
    ];

    /// Map a draw in [0, 1) onto the selection table
    pub fn from_roll(roll: f64) -> Self {
        let slot = ((roll * Self::TABLE.len() as f64) as usize).min(Self::TABLE.len() - 1);
        Self::TABLE[slot]
    }

    /// Nominal vertical step between sub-segment endpoints
    pub fn step(&self) -> f64 {
        match self {
            Section::LongDrop => DROP_STEP,
            Section::SlopeLeft | Section::SlopeRight => SLOPE_STEP,
            Section::SCurve => CURVE_STEP,
        }
    }
}

/// Everything one generator run produces; immutable once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPath {
    pub seed: u32,
    pub width: f64,
    pub height: f64,
    pub segments: Vec<PathSegment>,
    /// Where the player's trail is expected to begin
    pub starting_point: Point,
    /// The finish: end point of the last segment
    pub end_line: Point,
    pub total_length: f64,
}

impl GeneratedPath {
    /// First point of the reference line
    pub fn start(&self) -> Point {
        self.segments.first().map(|s| s.start).unwrap_or(self.starting_point)
    }

    /// Virtual height the path was generated for
    pub fn path_height(&self) -> f64 {
        path_height(self.height)
    }

    /// Number of leading segments fully inside `revealed_length`
    pub fn revealed_count(&self, revealed_length: f64) -> usize {
        self.segments
            .partition_point(|s| s.accumulated_length <= revealed_length)
    }

    /// Polyline vertices: the first start point followed by every end point
    pub fn points(&self) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.segments.len() + 1);
        if let Some(first) = self.segments.first() {
            points.push(first.start);
        }
        points.extend(self.segments.iter().map(|s| s.end));
        points
    }

    /// Index and distance of the segment among the first `count` closest to `p`
    pub fn nearest_segment(&self, p: Point, count: usize) -> Option<(usize, f64)> {
        self.segments
            .iter()
            .take(count)
            .enumerate()
            .map(|(i, s)| (i, distance_point_to_segment(p, s.start, s.end)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Arc-length position along the path of the point nearest to `p`,
    /// searching only the first `count` segments
    pub fn progress_of(&self, p: Point, count: usize) -> f64 {
        match self.nearest_segment(p, count) {
            Some((i, _)) => {
                let seg = &self.segments[i];
                let t = closest_param_on_segment(p, seg.start, seg.end);
                seg.accumulated_length - seg.length + t * seg.length
            }
            None => 0.0,
        }
    }
}

/// Incremental builder holding the RNG and the growing segment list
struct PathBuilder {
    rng: Mulberry32,
    width: f64,
    limit: f64,
    current: Point,
    accumulated: f64,
    segments: Vec<PathSegment>,
}

impl PathBuilder {
    fn done(&self) -> bool {
        self.current.y >= self.limit
    }

    /// Append a sub-segment to `(x, y)`, clamping x to the lane.
    /// Returns true once the bottom of the path has been reached.
    fn push(&mut self, x: f64, y: f64) -> bool {
        let end = Point::new(clamp_to_lane(x, self.width), y);
        let length = self.current.distance(end);
        self.accumulated += length;
        self.segments.push(PathSegment {
            start: self.current,
            end,
            length,
            accumulated_length: self.accumulated,
        });
        self.current = end;
        self.done()
    }

    /// Emit a section `distance` tall, sampling `shape(t)` for x at each step
    fn emit(&mut self, distance: f64, step: f64, shape: impl Fn(f64) -> f64) {
        let base_y = self.current.y;
        let steps = (distance / step).ceil().max(1.0) as usize;
        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            if self.push(shape(t), base_y + distance * t) {
                break;
            }
        }
    }

    fn section(&mut self, section: Section) {
        let base_x = self.current.x;
        match section {
            Section::LongDrop => {
                let distance = self.rng.range(DROP_DISTANCE.0, DROP_DISTANCE.1);
                let amplitude = self.rng.range(DROP_WOBBLE.0, DROP_WOBBLE.1);
                self.emit(distance, DROP_STEP, |t| base_x + amplitude * (t * TAU).sin());
            }
            Section::SlopeLeft | Section::SlopeRight => {
                let distance = self.rng.range(SLOPE_DISTANCE.0, SLOPE_DISTANCE.1);
                let offset = self.rng.range(SLOPE_OFFSET.0, SLOPE_OFFSET.1);
                let direction = if section == Section::SlopeLeft { -1.0 } else { 1.0 };
                let (lo, hi) = lane_bounds(self.width);
                let mut target = base_x + direction * offset;
                if target < lo || target > hi {
                    target = base_x - direction * offset;
                }
                self.emit(distance, SLOPE_STEP, |t| base_x + (target - base_x) * t);
            }
            Section::SCurve => {
                let height = self.rng.range(CURVE_HEIGHT.0, CURVE_HEIGHT.1);
                let width = self.rng.range(CURVE_WIDTH.0, CURVE_WIDTH.1);
                let direction = if self.rng.coin() { -1.0 } else { 1.0 };
                self.emit(height, CURVE_STEP, |t| {
                    base_x + direction * width * (t * TAU).sin()
                });
            }
        }
    }
}

/// Generate the reference path for `seed` on a `width` x `height` canvas
pub fn generate_path(seed: u32, width: f64, height: f64) -> Result<GeneratedPath, TraceError> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(width) || !valid(height) {
        return Err(TraceError::InvalidCanvas { width, height });
    }

    let mut rng = Mulberry32::new(seed);
    let (lo, hi) = lane_bounds(width);

    let first = Point::new(rng.range(lo, hi), MARGIN);

    // Player starts beside the line, on the drawn side unless that leaves the lane
    let side = if rng.coin() { -1.0 } else { 1.0 };
    let mut start_x = first.x + side * START_SIDE_OFFSET;
    if start_x < lo || start_x > hi {
        start_x = first.x - side * START_SIDE_OFFSET;
    }
    let starting_point = Point::new(start_x.clamp(lo, hi), MARGIN);

    let mut builder = PathBuilder {
        rng,
        width,
        limit: path_height(height) - MARGIN,
        current: first,
        accumulated: 0.0,
        segments: Vec::new(),
    };

    while !builder.done() {
        let roll = builder.rng.next_f64();
        builder.section(Section::from_roll(roll));
    }

    let segments = builder.segments;
    let last = segments.last().copied().ok_or(TraceError::EmptyPath)?;

    log::debug!(
        "Generated path seed={} canvas={}x{}: {} segments, length {:.1}",
        seed,
        width,
        height,
        segments.len(),
        last.accumulated_length
    );

    Ok(GeneratedPath {
        seed,
        width,
        height,
        segments,
        starting_point,
        end_line: last.end,
        total_length: last.accumulated_length,
    })
}
