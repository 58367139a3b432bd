//! Host-facing game facade
//!
//! Owns the current generated path and session, drives the session at a
//! fixed timestep and forwards finished rounds to the completion sink.

use std::sync::Arc;

use crate::Point;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::daily::{CompletionSink, SeedProvider};
use crate::error::TraceError;
use crate::settings::DifficultyProfile;
use crate::sim::{
    GeneratedPath, Session, SessionEvent, SessionPhase, append_trail_point, generate_path, tick,
};

/// The in-process API a UI layer talks to
pub struct TraceGame<C: CompletionSink> {
    path: Option<Arc<GeneratedPath>>,
    session: Option<Session>,
    sink: C,
    accumulator: f64,
}

impl<C: CompletionSink> TraceGame<C> {
    pub fn new(sink: C) -> Self {
        Self {
            path: None,
            session: None,
            sink,
            accumulator: 0.0,
        }
    }

    /// Build the path for `seed` and publish it, replacing any previous path.
    /// A session on the old path is dropped without recording anything.
    pub fn generate_path(
        &mut self,
        seed: u32,
        width: f64,
        height: f64,
    ) -> Result<Arc<GeneratedPath>, TraceError> {
        let path = Arc::new(generate_path(seed, width, height)?);
        log::info!(
            "Path ready: seed {} on {}x{} ({} segments, {:.0} px)",
            seed,
            width,
            height,
            path.segments.len(),
            path.total_length
        );

        if let Some(session) = self.session.take() {
            if !matches!(session.phase(), SessionPhase::Idle | SessionPhase::Ended) {
                log::info!("Dropping unfinished round for new path");
            }
        }
        self.path = Some(Arc::clone(&path));
        self.accumulator = 0.0;
        Ok(path)
    }

    /// Generate from a host-supplied seed source
    pub fn generate_from(
        &mut self,
        seeds: &impl SeedProvider,
        width: f64,
        height: f64,
    ) -> Result<Arc<GeneratedPath>, TraceError> {
        self.generate_path(seeds.seed(), width, height)
    }

    /// Begin a round (countdown first) on the current path
    pub fn start_session(&mut self, profile: DifficultyProfile) -> Result<(), TraceError> {
        let path = self.path.as_ref().ok_or(TraceError::NoActiveSession)?;
        let mut session = Session::new(Arc::clone(path), profile);
        session.start();
        log::info!(
            "Session started: seed {}, speed {} px/s, tolerance {} px",
            path.seed,
            profile.reveal_speed,
            profile.max_distance_from_line
        );
        self.session = Some(session);
        self.accumulator = 0.0;
        self.flush();
        Ok(())
    }

    pub fn pause_session(&mut self) -> Result<bool, TraceError> {
        let changed = self.session_mut()?.pause();
        self.flush();
        Ok(changed)
    }

    pub fn resume_session(&mut self) -> Result<bool, TraceError> {
        let changed = self.session_mut()?.resume();
        self.flush();
        Ok(changed)
    }

    /// Back to Idle on the same path
    pub fn reset_session(&mut self) -> Result<(), TraceError> {
        self.session_mut()?.reset();
        self.accumulator = 0.0;
        self.flush();
        Ok(())
    }

    /// Leave the round immediately; nothing is recorded
    pub fn exit_session(&mut self) -> Result<bool, TraceError> {
        let changed = self.session_mut()?.cancel();
        self.accumulator = 0.0;
        self.flush();
        Ok(changed)
    }

    /// Advance the session by exactly `dt` seconds
    pub fn tick(&mut self, dt: f64) -> Result<SessionPhase, TraceError> {
        let session = self.session_mut()?;
        tick(session, dt);
        let phase = session.phase();
        self.flush();
        Ok(phase)
    }

    /// Advance by a rendered frame's delta using fixed `SIM_DT` steps.
    /// Returns the number of steps taken.
    pub fn advance_frame(&mut self, frame_dt: f64) -> Result<u32, TraceError> {
        if self.session.is_none() {
            return Err(TraceError::NoActiveSession);
        }
        if !frame_dt.is_finite() {
            log::warn!("Frame ignored: dt {}", frame_dt);
            return Ok(0);
        }
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.tick(SIM_DT)?;
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog instead of spiralling
            self.accumulator = 0.0;
        }
        Ok(substeps)
    }

    /// Record an input sample; returns whether it was accepted
    pub fn append_trail_point(&mut self, point: Point) -> Result<bool, TraceError> {
        let accepted = append_trail_point(self.session_mut()?, point);
        self.flush();
        Ok(accepted)
    }

    /// Start a new stroke; the next point is not joined to the previous one
    pub fn begin_stroke(&mut self) -> Result<bool, TraceError> {
        Ok(self.session_mut()?.begin_stroke())
    }

    pub fn path(&self) -> Option<&Arc<GeneratedPath>> {
        self.path.as_ref()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> Option<SessionPhase> {
        self.session.as_ref().map(Session::phase)
    }

    pub fn sink(&self) -> &C {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut C {
        &mut self.sink
    }

    fn session_mut(&mut self) -> Result<&mut Session, TraceError> {
        self.session.as_mut().ok_or(TraceError::NoActiveSession)
    }

    /// Forward finished rounds to the sink
    fn flush(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        for event in session.drain_events() {
            match event {
                SessionEvent::Ended(outcome) => self.sink.record(&outcome),
                other => log::debug!("Session event: {:?}", other),
            }
        }
    }
}

impl<C: CompletionSink + Default> Default for TraceGame<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}
