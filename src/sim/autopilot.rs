//! Demo player that traces the revealed line from a fixed side offset
//!
//! The trail is the reference polyline shifted sideways. Because the path
//! only ever moves downward, a horizontal shift never meets the original,
//! so the autopilot cannot cross the line.

use super::state::{Session, SessionPhase};
use super::tick::append_trail_point;
use crate::Point;
use crate::consts::START_SIDE_OFFSET;

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Horizontal shift applied to every path vertex
    offset: f64,
    /// Next path vertex to trace (0 = first segment's start)
    next_vertex: usize,
}

impl Autopilot {
    /// Trace on the side the session's starting point lies on
    pub fn for_session(session: &Session) -> Self {
        let path = session.path();
        let dx = path.starting_point.x - path.start().x;
        let offset = if dx.abs() < 1.0 {
            START_SIDE_OFFSET
        } else {
            dx
        };
        Self::with_offset(offset)
    }

    pub fn with_offset(offset: f64) -> Self {
        Self {
            offset,
            next_vertex: 0,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Trail points for every vertex revealed since the last call
    pub fn pending(&mut self, session: &Session) -> Vec<Point> {
        if session.phase() != SessionPhase::Running {
            return Vec::new();
        }
        let path = session.path();
        let revealed = session.reveal().revealed_segment_count;
        let shift = Point::new(self.offset, 0.0);

        // Vertex i is the start of segment i; vertex n is the end of segment n-1
        let mut points = Vec::new();
        while self.next_vertex <= revealed {
            let vertex = match self.next_vertex {
                0 => path.start(),
                i => path.segments[i - 1].end,
            };
            points.push(vertex + shift);
            self.next_vertex += 1;
        }
        points
    }

    /// Append the pending points to the session, stopping if the round ends.
    /// Returns how many points were accepted.
    pub fn feed(&mut self, session: &mut Session) -> usize {
        let mut added = 0;
        for point in self.pending(session) {
            if !append_trail_point(session, point) {
                break;
            }
            added += 1;
        }
        added
    }

    /// Start over for a fresh round
    pub fn rewind(&mut self) {
        self.next_vertex = 0;
    }
}
