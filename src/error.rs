//! Error types for the line-trace core.
//!
//! Gameplay outcomes (win, timeout, crossing, drifting) are not errors; they
//! end the session and are reported as an `Outcome`.

use thiserror::Error;

/// Errors produced by generation and the session API.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Canvas width or height was zero, negative or not finite.
    #[error("invalid canvas: {width}x{height} (width and height must be positive)")]
    InvalidCanvas { width: f64, height: f64 },

    /// Generation produced no segments.
    #[error("path generation produced no segments")]
    EmptyPath,

    /// A session command arrived before a path was generated and a session started.
    #[error("no active session: generate a path and start a session first")]
    NoActiveSession,

    /// Settings JSON could not be read or written.
    #[error("settings: {0}")]
    Settings(#[from] serde_json::Error),

    /// A path or outcome could not be serialized for output.
    #[error("output: {0}")]
    Output(serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_canvas_includes_dimensions() {
        let err = TraceError::InvalidCanvas {
            width: 0.0,
            height: 800.0,
        };
        let msg = format!("{err}");
        assert!(msg.contains("0x800"), "missing dimensions in: {msg}");
    }

    #[test]
    fn settings_error_wraps_json_error() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: TraceError = json_err.into();
        assert!(format!("{err}").starts_with("settings:"));
    }

    #[test]
    fn output_error_is_not_a_settings_error() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = TraceError::Output(json_err);
        assert!(format!("{err}").starts_with("output:"));
    }

    #[test]
    fn trace_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TraceError>();
    }
}
