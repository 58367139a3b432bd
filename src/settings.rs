//! Difficulty profiles and player preferences
//!
//! Persisted as JSON in LocalStorage on the web build.

use serde::{Deserialize, Serialize};

use crate::error::TraceError;

/// Named difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Tunables for this level
    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                reveal_speed: 150.0,
                max_distance_from_line: 120.0,
                min_progress_behind: 600.0,
            },
            Difficulty::Medium => DifficultyProfile {
                reveal_speed: 200.0,
                max_distance_from_line: 90.0,
                min_progress_behind: 450.0,
            },
            Difficulty::Hard => DifficultyProfile {
                reveal_speed: 260.0,
                max_distance_from_line: 60.0,
                min_progress_behind: 300.0,
            },
        }
    }
}

/// How forgiving a session is; fixed for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Path length revealed per second (px/s)
    pub reveal_speed: f64,
    /// Trail points farther than this from the revealed line lose the round (px)
    pub max_distance_from_line: f64,
    /// Lag behind the reveal head beyond which the player is flagged as lagging (px)
    pub min_progress_behind: f64,
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Difficulty::default().profile()
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Custom tunables replacing the difficulty's profile (practice mode)
    #[serde(default)]
    pub profile_override: Option<DifficultyProfile>,

    // === HUD ===
    /// Show the round timer
    pub show_timer: bool,

    // === Feedback ===
    /// Vibrate on win/loss where the host supports it
    pub haptics: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            profile_override: None,
            show_timer: true,
            haptics: true,
        }
    }
}

impl Settings {
    /// Create settings for a difficulty level
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Profile sessions should run with
    pub fn effective_profile(&self) -> DifficultyProfile {
        self.profile_override
            .unwrap_or_else(|| self.difficulty.profile())
    }

    pub fn from_json(json: &str) -> Result<Self, TraceError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, TraceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "line_trace_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
