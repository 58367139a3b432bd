//! WebView bridge
//!
//! Exposes the game facade to JavaScript. The host page owns the render loop
//! and input; it forwards frame deltas and pointer samples here and reads
//! back the phase, reveal count and outcome.

use wasm_bindgen::prelude::*;

use crate::daily::CompletionLog;
use crate::game::TraceGame;
use crate::settings::{Difficulty, Settings};
use crate::sim::SessionPhase;
use crate::{Point, TraceError};

fn to_js(err: TraceError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // Logging may already be set up by a previous module instance
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub struct WebTraceGame {
    game: TraceGame<CompletionLog>,
    settings: Settings,
}

#[wasm_bindgen]
impl WebTraceGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            game: TraceGame::new(CompletionLog::new()),
            settings: Settings::load(),
        }
    }

    /// Build the path for `seed` on a canvas of `width` x `height`
    pub fn generate(&mut self, seed: u32, width: f64, height: f64) -> Result<(), JsValue> {
        self.game
            .generate_path(seed, width, height)
            .map(|_| ())
            .map_err(to_js)
    }

    /// Start a round; an empty or unknown name uses the saved difficulty
    pub fn start(&mut self, difficulty: &str) -> Result<(), JsValue> {
        if let Some(d) = Difficulty::from_str(difficulty) {
            if d != self.settings.difficulty {
                self.settings.difficulty = d;
                self.settings.save();
            }
        }
        self.game
            .start_session(self.settings.effective_profile())
            .map_err(to_js)
    }

    pub fn pause(&mut self) -> Result<bool, JsValue> {
        self.game.pause_session().map_err(to_js)
    }

    pub fn resume(&mut self) -> Result<bool, JsValue> {
        self.game.resume_session().map_err(to_js)
    }

    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.game.reset_session().map_err(to_js)
    }

    pub fn exit(&mut self) -> Result<bool, JsValue> {
        self.game.exit_session().map_err(to_js)
    }

    /// Advance by a frame delta in seconds
    pub fn advance(&mut self, dt: f64) -> Result<u32, JsValue> {
        self.game.advance_frame(dt).map_err(to_js)
    }

    /// Finger down: start a new stroke
    pub fn begin_stroke(&mut self) -> Result<bool, JsValue> {
        self.game.begin_stroke().map_err(to_js)
    }

    pub fn add_point(&mut self, x: f64, y: f64) -> Result<bool, JsValue> {
        self.game
            .append_trail_point(Point::new(x, y))
            .map_err(to_js)
    }

    /// Phase name, or "None" before a session exists
    pub fn phase(&self) -> String {
        match self.game.phase() {
            Some(phase) => format!("{:?}", phase),
            None => "None".to_string(),
        }
    }

    pub fn revealed_count(&self) -> usize {
        self.game
            .session()
            .map(|s| s.reveal().revealed_segment_count)
            .unwrap_or(0)
    }

    pub fn time_remaining(&self) -> f64 {
        self.game
            .session()
            .map(|s| match s.phase() {
                SessionPhase::Countdown => s.countdown_remaining(),
                _ => s.time_remaining(),
            })
            .unwrap_or(0.0)
    }

    pub fn is_lagging(&self) -> bool {
        self.game.session().is_some_and(|s| s.is_lagging())
    }

    /// Path vertices flattened as [x0, y0, x1, y1, ...]
    pub fn path_points(&self) -> Vec<f64> {
        self.game
            .path()
            .map(|p| p.points().iter().flat_map(|v| [v.x, v.y]).collect())
            .unwrap_or_default()
    }

    /// Player start as [x, y]
    pub fn starting_point(&self) -> Vec<f64> {
        self.game
            .path()
            .map(|p| vec![p.starting_point.x, p.starting_point.y])
            .unwrap_or_default()
    }

    /// Latest outcome as JSON, or null while the round is open
    pub fn outcome_json(&self) -> Option<String> {
        let outcome = self.game.session()?.outcome()?;
        serde_json::to_string(outcome).ok()
    }
}

impl Default for WebTraceGame {
    fn default() -> Self {
        Self::new()
    }
}
