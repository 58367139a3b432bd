//! Collaborators supplied by the host app
//!
//! The daily date-to-seed mapping and any storage of results belong to the
//! host. The core only sees a seed coming in and outcomes going out.

use serde::{Deserialize, Serialize};

use crate::sim::{EndReason, Outcome};

/// Supplies the seed for the puzzle being played
pub trait SeedProvider {
    fn seed(&self) -> u32;
}

/// A fixed seed, for replays and archive puzzles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedSeed(pub u32);

impl SeedProvider for FixedSeed {
    fn seed(&self) -> u32 {
        self.0
    }
}

/// Receives the outcome of every finished round, exactly once per round
pub trait CompletionSink {
    fn record(&mut self, outcome: &Outcome);
}

/// Discards outcomes
impl CompletionSink for () {
    fn record(&mut self, _outcome: &Outcome) {}
}

/// In-memory record of finished rounds, newest last
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionLog {
    pub entries: Vec<Outcome>,
}

impl CompletionLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn wins(&self) -> usize {
        self.entries.iter().filter(|o| o.won).count()
    }

    pub fn losses(&self) -> usize {
        self.entries.len() - self.wins()
    }

    /// Fastest winning time, if any round was won
    pub fn best_time(&self) -> Option<f64> {
        self.entries
            .iter()
            .filter(|o| o.won)
            .map(|o| o.elapsed_secs)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Consecutive wins at the end of the log
    pub fn current_streak(&self) -> usize {
        self.entries.iter().rev().take_while(|o| o.won).count()
    }

    /// How often each loss reason occurred
    pub fn losses_by(&self, reason: EndReason) -> usize {
        self.entries
            .iter()
            .filter(|o| !o.won && o.reason == reason)
            .count()
    }

    /// Latest outcome for a seed
    pub fn last_for_seed(&self, seed: u32) -> Option<&Outcome> {
        self.entries.iter().rev().find(|o| o.seed == seed)
    }
}

impl CompletionSink for CompletionLog {
    fn record(&mut self, outcome: &Outcome) {
        log::info!(
            "Recorded seed {}: {} after {:.2}s",
            outcome.seed,
            outcome.reason.as_str(),
            outcome.elapsed_secs
        );
        self.entries.push(*outcome);
    }
}
