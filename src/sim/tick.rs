//! Per-tick session update and the adherence rules
//!
//! Advances the countdown, round time and reveal length, then checks the
//! player's latest input against the revealed part of the path.

use super::geometry::{distance_point_to_segment, segments_intersect};
use super::state::{EndReason, Session, SessionEvent, SessionPhase};
use crate::Point;
use crate::consts::*;

/// Advance the session by `dt` seconds; non-positive or non-finite deltas are ignored
pub fn tick(session: &mut Session, dt: f64) {
    if !(dt.is_finite() && dt > 0.0) {
        log::warn!("Tick ignored: dt {}", dt);
        return;
    }
    match session.phase {
        SessionPhase::Countdown => {
            session.countdown_remaining -= dt;
            if session.countdown_remaining <= TIME_EPSILON {
                session.countdown_remaining = 0.0;
                session.phase = SessionPhase::Running;
                session.events.push(SessionEvent::RoundStarted);
                log::debug!("Round started");
            }
        }
        SessionPhase::Running => tick_running(session, dt),
        SessionPhase::Idle | SessionPhase::Paused | SessionPhase::Ended => {}
    }
}

fn tick_running(session: &mut Session, dt: f64) {
    session.elapsed += dt;

    let mut length = session.reveal.revealed_length + session.profile.reveal_speed * dt;

    // Near the end of the round the finish must be visible
    if session.elapsed >= CATCH_UP_SECS - TIME_EPSILON && !session.fully_revealed {
        length = session.path.total_length;
    }
    session.set_reveal(length);

    if !session.fully_revealed && session.reveal.revealed_length >= session.path.total_length {
        session.fully_revealed = true;
        session.events.push(SessionEvent::FullyRevealed);
    }

    if session.elapsed >= ROUND_SECS - TIME_EPSILON {
        session.end(EndReason::TimeUp);
        return;
    }

    if let Some(reason) = check_adherence(session) {
        session.end(reason);
    }
}

/// Record one input sample and check it; only accepted while running
pub fn append_trail_point(session: &mut Session, point: Point) -> bool {
    if session.phase != SessionPhase::Running {
        return false;
    }
    session.trail.push(point);
    if let Some(reason) = check_adherence(session) {
        session.end(reason);
    }
    true
}

/// Apply the rules to the latest trail point, first match wins:
/// finish reached, then line crossed, then too far from the line.
pub fn check_adherence(session: &Session) -> Option<EndReason> {
    let &[.., prev, last] = session.trail.as_slice() else {
        return None;
    };

    if last.distance(session.path.end_line) <= FINISH_RADIUS {
        return Some(EndReason::Finished);
    }

    let revealed = &session.path.segments[..session.reveal.revealed_segment_count];
    if revealed.is_empty() {
        return None;
    }

    let mut min_distance = f64::INFINITY;
    for seg in revealed {
        if segments_intersect(prev, last, seg.start, seg.end) {
            return Some(EndReason::CrossedLine);
        }
        let d = distance_point_to_segment(last, seg.start, seg.end);
        if d < CROSSING_DISTANCE {
            return Some(EndReason::CrossedLine);
        }
        min_distance = min_distance.min(d);
    }

    if min_distance > session.profile.max_distance_from_line {
        return Some(EndReason::TooFar);
    }

    None
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::settings::Difficulty;
    use crate::sim::generate_path;
    use crate::sim::path::{GeneratedPath, PathSegment};

    /// A straight vertical line x = 100 from y = 0 to y = 1000 in 10 segments
    fn straight_path() -> GeneratedPath {
        let segments = (0..10)
            .map(|i| {
                let y0 = i as f64 * 100.0;
                PathSegment {
                    start: Point::new(100.0, y0),
                    end: Point::new(100.0, y0 + 100.0),
                    length: 100.0,
                    accumulated_length: (i + 1) as f64 * 100.0,
                }
            })
            .collect();
        GeneratedPath {
            seed: 0,
            width: 400.0,
            height: 800.0,
            segments,
            starting_point: Point::new(130.0, 0.0),
            end_line: Point::new(100.0, 1000.0),
            total_length: 1000.0,
        }
    }

    fn running(path: GeneratedPath) -> Session {
        let mut s = Session::new(Arc::new(path), Difficulty::Easy.profile());
        s.start();
        tick(&mut s, COUNTDOWN_SECS);
        assert_eq!(s.phase(), SessionPhase::Running);
        s.drain_events();
        s
    }

    #[test]
    fn test_countdown_to_running() {
        let path = generate_path(42, 400.0, 800.0).unwrap();
        let mut s = Session::new(Arc::new(path), Difficulty::Easy.profile());
        s.start();
        for _ in 0..299 {
            tick(&mut s, SIM_DT);
        }
        assert_eq!(s.phase(), SessionPhase::Countdown);
        tick(&mut s, SIM_DT);
        assert_eq!(s.phase(), SessionPhase::Running);
        // Countdown does not consume round time or reveal
        assert_eq!(s.elapsed(), 0.0);
        assert_eq!(s.reveal().revealed_length, INITIAL_REVEAL);
    }

    #[test]
    fn test_reveal_grows_with_speed() {
        let mut s = running(straight_path());
        tick(&mut s, 1.0);
        assert!((s.reveal().revealed_length - 350.0).abs() < 1e-9);
        assert_eq!(s.reveal().revealed_segment_count, 3);
    }

    #[test]
    fn test_reveal_clamped_to_total() {
        let mut s = running(straight_path());
        for _ in 0..10 {
            tick(&mut s, 1.0);
        }
        assert_eq!(s.reveal().revealed_length, 1000.0);
        assert_eq!(s.reveal().revealed_segment_count, 10);
        assert!(s.drain_events().contains(&SessionEvent::FullyRevealed));
    }

    #[test]
    fn test_catch_up_reveals_everything() {
        let path = generate_path(42, 400.0, 800.0).unwrap();
        let total = path.total_length;
        let segment_count = path.segments.len();
        let mut s = running(path);
        tick(&mut s, 26.9);
        assert!(s.reveal().revealed_length < total);
        tick(&mut s, 0.2);
        assert_eq!(s.reveal().revealed_length, total);
        assert_eq!(s.reveal().revealed_segment_count, segment_count);
        assert_eq!(s.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_pause_freezes_time_and_reveal() {
        let mut s = running(straight_path());
        tick(&mut s, 0.5);
        assert!(s.pause());
        let frozen = s.reveal();
        let elapsed = s.elapsed();
        for _ in 0..100 {
            tick(&mut s, SIM_DT);
        }
        assert_eq!(s.reveal(), frozen);
        assert_eq!(s.elapsed(), elapsed);
        assert!(s.resume());
        tick(&mut s, 0.5);
        assert!((s.elapsed() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_points_ignored_unless_running() {
        let path = straight_path();
        let mut s = Session::new(Arc::new(path), Difficulty::Easy.profile());
        assert!(!append_trail_point(&mut s, Point::new(130.0, 0.0)));
        s.start();
        assert!(!append_trail_point(&mut s, Point::new(130.0, 0.0)));
        assert!(s.trail().is_empty());
    }

    #[test]
    fn test_single_point_never_ends() {
        let mut s = running(straight_path());
        // On the line, but a single point is not checked
        append_trail_point(&mut s, Point::new(100.0, 50.0));
        assert_eq!(s.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_crossing_ends_round() {
        let mut s = running(straight_path());
        append_trail_point(&mut s, Point::new(130.0, 20.0));
        append_trail_point(&mut s, Point::new(70.0, 40.0));
        assert_eq!(s.phase(), SessionPhase::Ended);
        assert_eq!(s.outcome().unwrap().reason, EndReason::CrossedLine);
        assert!(!s.outcome().unwrap().won);
    }

    #[test]
    fn test_touching_counts_as_crossing() {
        let mut s = running(straight_path());
        append_trail_point(&mut s, Point::new(130.0, 20.0));
        append_trail_point(&mut s, Point::new(103.0, 40.0));
        assert_eq!(s.outcome().unwrap().reason, EndReason::CrossedLine);
    }

    #[test]
    fn test_too_far_ends_round() {
        let mut s = running(straight_path());
        let limit = s.profile().max_distance_from_line;
        append_trail_point(&mut s, Point::new(130.0, 20.0));
        append_trail_point(&mut s, Point::new(100.0 + limit, 40.0));
        assert_eq!(s.phase(), SessionPhase::Running);
        append_trail_point(&mut s, Point::new(100.0 + limit + 1.0, 60.0));
        assert_eq!(s.phase(), SessionPhase::Ended);
        assert_eq!(s.outcome().unwrap().reason, EndReason::TooFar);
    }

    #[test]
    fn test_distance_measured_against_revealed_part_only() {
        let mut s = running(straight_path());
        // Only the top 200 px are visible; a point beside y=600 is far from them
        append_trail_point(&mut s, Point::new(130.0, 150.0));
        append_trail_point(&mut s, Point::new(130.0, 600.0));
        assert_eq!(s.outcome().unwrap().reason, EndReason::TooFar);
    }

    #[test]
    fn test_finish_beats_crossing() {
        let mut s = running(straight_path());
        tick(&mut s, 10.0);
        // This move crosses the line and lands next to the finish
        append_trail_point(&mut s, Point::new(130.0, 980.0));
        append_trail_point(&mut s, Point::new(90.0, 990.0));
        let outcome = s.outcome().unwrap();
        assert!(outcome.won);
        assert_eq!(outcome.reason, EndReason::Finished);
    }

    #[test]
    fn test_timeout() {
        let mut s = running(straight_path());
        tick(&mut s, 29.9);
        assert_eq!(s.phase(), SessionPhase::Running);
        tick(&mut s, 0.1);
        assert_eq!(s.phase(), SessionPhase::Ended);
        let outcome = s.outcome().unwrap();
        assert_eq!(outcome.reason, EndReason::TimeUp);
        assert!(!outcome.won);
    }

    #[test]
    fn test_bad_deltas_are_ignored() {
        let mut s = running(straight_path());
        tick(&mut s, 1.0);
        let before = s.reveal();
        let elapsed = s.elapsed();
        tick(&mut s, -1.0);
        tick(&mut s, f64::NAN);
        tick(&mut s, f64::INFINITY);
        tick(&mut s, 0.0);
        assert_eq!(s.reveal(), before);
        assert_eq!(s.elapsed(), elapsed);
        assert_eq!(s.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_negative_delta_does_not_rewind_countdown() {
        let path = straight_path();
        let mut s = Session::new(Arc::new(path), Difficulty::Easy.profile());
        s.start();
        tick(&mut s, 1.0);
        tick(&mut s, -10.0);
        assert!((s.countdown_remaining() - (COUNTDOWN_SECS - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_new_stroke_is_not_joined_to_the_last() {
        let mut s = running(straight_path());
        // Lift on the left of the line, touch down on the right
        append_trail_point(&mut s, Point::new(80.0, 120.0));
        append_trail_point(&mut s, Point::new(80.0, 140.0));
        assert!(s.begin_stroke());
        append_trail_point(&mut s, Point::new(120.0, 150.0));
        assert_eq!(s.phase(), SessionPhase::Running);
        assert_eq!(s.trail(), &[Point::new(120.0, 150.0)]);

        append_trail_point(&mut s, Point::new(120.0, 170.0));
        assert_eq!(s.phase(), SessionPhase::Running);
        // Drawing across within one stroke still loses
        append_trail_point(&mut s, Point::new(80.0, 180.0));
        assert_eq!(s.outcome().unwrap().reason, EndReason::CrossedLine);
    }

    #[test]
    fn test_begin_stroke_only_while_running() {
        let path = straight_path();
        let mut s = Session::new(Arc::new(path), Difficulty::Easy.profile());
        assert!(!s.begin_stroke());
        s.start();
        assert!(!s.begin_stroke());
    }

    #[test]
    fn test_ended_session_ignores_ticks_and_points() {
        let mut s = running(straight_path());
        tick(&mut s, 30.0);
        let elapsed = s.elapsed();
        tick(&mut s, 1.0);
        assert_eq!(s.elapsed(), elapsed);
        assert!(!append_trail_point(&mut s, Point::new(130.0, 10.0)));
        let ended = s
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SessionEvent::Ended(_)))
            .count();
        assert_eq!(ended, 1);
    }
}
