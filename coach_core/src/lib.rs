#![forbid(unsafe_code)]

//! Core domain model and business logic for the Formcoach engine.
//!
//! This crate provides:
//! - The pose data model (joints, landmarks, keypoint frames)
//! - Frame throttling and form-quality scoring
//! - The workout session state machine (play/pause/rest/advance/complete)
//! - Aggregate statistics, streaks, and achievements
//! - Persistence (JSONL session log, config)

pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod pose;
pub mod scoring;
pub mod session;
pub mod stats;
pub mod store;
pub mod throttle;
pub mod types;

// Re-export commonly used types
pub use catalog::{build_default_catalog, get_default_catalog, Catalog};
pub use config::Config;
pub use error::{Error, Result};
pub use pose::{BodyJoint, KeypointFrame, Landmark};
pub use scoring::{Feedback, FormAssessment, ScoringConfig};
pub use session::WorkoutSessionMachine;
pub use stats::{aggregate, evaluate_achievements, SessionStats, TimeRange};
pub use store::{JsonlResultStore, ResultSink};
pub use throttle::FrameThrottle;
pub use types::*;
