//! Line Trace - a daily line-tracing puzzle core
//!
//! Core modules:
//! - `sim`: Deterministic path generation, reveal timing and adherence rules
//! - `game`: Host-facing facade with a fixed-step frame driver
//! - `settings`: Difficulty profiles and player preferences
//! - `daily`: Seed and completion collaborators supplied by the host
//! - `web`: wasm-bindgen bridge for WebView hosts

pub mod daily;
pub mod error;
pub mod game;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use daily::{CompletionLog, CompletionSink, FixedSeed, SeedProvider};
pub use error::TraceError;
pub use game::TraceGame;
pub use settings::{Difficulty, DifficultyProfile, Settings};

use glam::DVec2;

/// A coordinate in canvas space (pixels, y grows downward)
pub type Point = DVec2;

/// Game configuration constants
pub mod consts {
    /// Fixed update timestep used by the frame driver (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will integrate
    pub const MAX_FRAME_DT: f64 = 0.1;

    /// Lane margin on the left, right and top of the canvas
    pub const MARGIN: f64 = 60.0;
    /// Floor on the virtual path height
    pub const MIN_PATH_HEIGHT: f64 = 8000.0;
    /// Virtual path height as a multiple of the canvas height
    pub const PATH_HEIGHT_SCALE: f64 = 12.0;
    /// Horizontal distance between the player's start and the first path point
    pub const START_SIDE_OFFSET: f64 = 30.0;

    /// Countdown before the round starts
    pub const COUNTDOWN_SECS: f64 = 5.0;
    /// Round time cap
    pub const ROUND_SECS: f64 = 30.0;
    /// After this much round time the whole path is shown
    pub const CATCH_UP_SECS: f64 = 27.0;
    /// Path length visible when the countdown begins
    pub const INITIAL_REVEAL: f64 = 200.0;

    /// Reaching this close to the finish wins the round
    pub const FINISH_RADIUS: f64 = 50.0;
    /// Getting this close to the line counts as crossing it
    pub const CROSSING_DISTANCE: f64 = 4.0;

    /// Slack when comparing accumulated float time against thresholds
    pub const TIME_EPSILON: f64 = 1e-9;
}

/// Clamp an x coordinate to the drawable lane of a canvas of the given width
#[inline]
pub fn clamp_to_lane(x: f64, width: f64) -> f64 {
    let (lo, hi) = lane_bounds(width);
    x.clamp(lo, hi)
}

/// Left and right lane bounds; the lane collapses onto the margin on very narrow canvases
#[inline]
pub fn lane_bounds(width: f64) -> (f64, f64) {
    use consts::MARGIN;
    (MARGIN, (width - MARGIN).max(MARGIN))
}

/// Effective path height for a canvas height
#[inline]
pub fn path_height(height: f64) -> f64 {
    use consts::{MIN_PATH_HEIGHT, PATH_HEIGHT_SCALE};
    (height * PATH_HEIGHT_SCALE).max(MIN_PATH_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_bounds() {
        assert_eq!(lane_bounds(400.0), (60.0, 340.0));
        // Narrower than two margins: lane pinned to the margin
        assert_eq!(lane_bounds(100.0), (60.0, 60.0));
        assert_eq!(clamp_to_lane(10.0, 400.0), 60.0);
        assert_eq!(clamp_to_lane(399.0, 400.0), 340.0);
        assert_eq!(clamp_to_lane(200.0, 400.0), 200.0);
    }

    #[test]
    fn test_path_height() {
        assert_eq!(path_height(800.0), 9600.0);
        assert_eq!(path_height(300.0), 8000.0);
    }
}
