//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time advances only through `tick`
//! - Trail points are processed strictly in append order
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod geometry;
pub mod path;
pub mod rng;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use geometry::{
    closest_param_on_segment, distance_point_to_segment, min_distance_between_segments,
    segments_intersect,
};
pub use path::{GeneratedPath, PathSegment, Section, generate_path};
pub use rng::Mulberry32;
pub use state::{EndReason, Outcome, RevealState, Session, SessionEvent, SessionPhase};
pub use tick::{append_trail_point, check_adherence, tick};
