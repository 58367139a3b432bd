//! Session state and phase transitions
//!
//! A session runs one round against one generated path. Per-tick updates and
//! the adherence rules live in `tick`; this module owns the data and the
//! command-driven transitions (start, pause, resume, reset, cancel).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::path::GeneratedPath;
use crate::Point;
use crate::consts::*;
use crate::settings::DifficultyProfile;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for a start command
    Idle,
    /// Pre-round countdown
    Countdown,
    /// Round in progress: time and reveal advance
    Running,
    /// Round frozen
    Paused,
    /// Round finished with an outcome
    Ended,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    Finished,
    TimeUp,
    CrossedLine,
    TooFar,
}

impl EndReason {
    /// Message shown to the player
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::Finished => "finished",
            EndReason::TimeUp => "time's up",
            EndReason::CrossedLine => "crossed the line",
            EndReason::TooFar => "too far from the line",
        }
    }

    pub fn is_win(&self) -> bool {
        matches!(self, EndReason::Finished)
    }
}

/// Result of a finished round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub won: bool,
    pub reason: EndReason,
    /// Round time when the session ended
    pub elapsed_secs: f64,
    pub seed: u32,
}

/// How much of the path is visible
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RevealState {
    pub revealed_length: f64,
    pub revealed_segment_count: usize,
}

/// Notifications for the host, drained after each call
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    CountdownStarted,
    RoundStarted,
    Paused,
    Resumed,
    /// The whole path is now visible
    FullyRevealed,
    Ended(Outcome),
    /// Round abandoned without an outcome
    Cancelled,
    Reset,
}

/// One round against one generated path
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) path: Arc<GeneratedPath>,
    pub(crate) profile: DifficultyProfile,
    pub(crate) phase: SessionPhase,
    pub(crate) countdown_remaining: f64,
    pub(crate) elapsed: f64,
    pub(crate) reveal: RevealState,
    pub(crate) fully_revealed: bool,
    pub(crate) trail: Vec<Point>,
    pub(crate) outcome: Option<Outcome>,
    pub(crate) events: Vec<SessionEvent>,
}

impl Session {
    pub fn new(path: Arc<GeneratedPath>, profile: DifficultyProfile) -> Self {
        Self {
            path,
            profile,
            phase: SessionPhase::Idle,
            countdown_remaining: 0.0,
            elapsed: 0.0,
            reveal: RevealState::default(),
            fully_revealed: false,
            trail: Vec::new(),
            outcome: None,
            events: Vec::new(),
        }
    }

    pub fn path(&self) -> &Arc<GeneratedPath> {
        &self.path
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn reveal(&self) -> RevealState {
        self.reveal
    }

    /// Player trail of the current stroke, in input order
    pub fn trail(&self) -> &[Point] {
        &self.trail
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Round time elapsed (excludes countdown and pauses)
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn countdown_remaining(&self) -> f64 {
        self.countdown_remaining.max(0.0)
    }

    pub fn time_remaining(&self) -> f64 {
        (ROUND_SECS - self.elapsed).max(0.0)
    }

    /// Arc-length position of the player's latest point along the revealed path
    pub fn progress(&self) -> f64 {
        match self.trail.last() {
            Some(&p) => self
                .path
                .progress_of(p, self.reveal.revealed_segment_count),
            None => 0.0,
        }
    }

    /// How far the reveal head is ahead of the player
    pub fn lag(&self) -> f64 {
        (self.reveal.revealed_length - self.progress()).max(0.0)
    }

    /// True when the player trails the reveal head by more than the profile allows
    pub fn is_lagging(&self) -> bool {
        self.phase == SessionPhase::Running
            && !self.trail.is_empty()
            && self.lag() > self.profile.min_progress_behind
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Idle -> Countdown
    pub fn start(&mut self) -> bool {
        if self.phase != SessionPhase::Idle {
            log::warn!("Start ignored in {:?}", self.phase);
            return false;
        }
        self.clear_round();
        self.countdown_remaining = COUNTDOWN_SECS;
        self.set_reveal(INITIAL_REVEAL.min(self.path.total_length));
        self.phase = SessionPhase::Countdown;
        self.events.push(SessionEvent::CountdownStarted);
        log::debug!("Countdown started (seed {})", self.path.seed);
        true
    }

    /// Running -> Paused
    pub fn pause(&mut self) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }
        self.phase = SessionPhase::Paused;
        self.events.push(SessionEvent::Paused);
        log::debug!("Paused at {:.2}s", self.elapsed);
        true
    }

    /// Paused -> Running, continuing from the frozen time
    pub fn resume(&mut self) -> bool {
        if self.phase != SessionPhase::Paused {
            return false;
        }
        self.phase = SessionPhase::Running;
        self.events.push(SessionEvent::Resumed);
        log::debug!("Resumed at {:.2}s", self.elapsed);
        true
    }

    /// Finger down: the next point starts a new stroke and is not joined to
    /// the previous one. Only meaningful while running.
    pub fn begin_stroke(&mut self) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }
        self.trail.clear();
        true
    }

    /// Any phase -> Idle, keeping the path
    pub fn reset(&mut self) {
        self.clear_round();
        self.phase = SessionPhase::Idle;
        self.events.push(SessionEvent::Reset);
        log::debug!("Session reset");
    }

    /// Abandon the round: back to Idle with nothing recorded
    pub fn cancel(&mut self) -> bool {
        if self.phase == SessionPhase::Idle {
            return false;
        }
        // Ended rounds already carry their outcome; cancelling only tears down
        if self.phase != SessionPhase::Ended {
            self.events.push(SessionEvent::Cancelled);
            log::info!("Round cancelled at {:.2}s", self.elapsed);
        }
        self.clear_round();
        self.phase = SessionPhase::Idle;
        true
    }

    /// Record the outcome and enter Ended; no-op if already ended
    pub(crate) fn end(&mut self, reason: EndReason) {
        if self.phase == SessionPhase::Ended {
            return;
        }
        let outcome = Outcome {
            won: reason.is_win(),
            reason,
            elapsed_secs: self.elapsed,
            seed: self.path.seed,
        };
        self.phase = SessionPhase::Ended;
        self.outcome = Some(outcome);
        self.events.push(SessionEvent::Ended(outcome));
        log::info!(
            "Round ended after {:.2}s: {} ({})",
            self.elapsed,
            if outcome.won { "won" } else { "lost" },
            reason.as_str()
        );
    }

    /// Set the reveal length (clamped to the path) and recount the visible prefix
    pub(crate) fn set_reveal(&mut self, length: f64) {
        let length = length.min(self.path.total_length);
        self.reveal = RevealState {
            revealed_length: length,
            revealed_segment_count: self.path.revealed_count(length),
        };
    }

    fn clear_round(&mut self) {
        self.trail.clear();
        self.elapsed = 0.0;
        self.countdown_remaining = 0.0;
        self.reveal = RevealState::default();
        self.fully_revealed = false;
        self.outcome = None;
    }
}
