//! Core domain types for the Formcoach engine.
//!
//! This module defines:
//! - Exercises and plans (static reference data, read-only during a session)
//! - Session status and the finalized session result
//! - Display categories supplementing the raw timing data

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Calories burned per minute of moderate exercise (rough estimate)
pub const CALORIES_PER_MINUTE: u32 = 7;

// ============================================================================
// Exercise Types
// ============================================================================

/// Broad exercise category
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutCategory {
    Strength,
    Cardio,
    Flexibility,
    Hiit,
    WarmUp,
    CoolDown,
}

/// Difficulty rating
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// A single named movement with timing and rep/set targets.
///
/// Immutable reference data; the session machine never mutates it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: WorkoutCategory,
    pub difficulty: Difficulty,
    pub duration_seconds: u32,
    pub reps: Option<u32>,
    pub sets: Option<u32>,
    pub rest_between_sets_seconds: u32,
    pub instructions: Vec<String>,
}

impl Exercise {
    /// Validate static inputs before a session may start.
    ///
    /// An exercise with neither a duration nor rep/set targets can never
    /// complete, so it is rejected rather than silently corrected.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() || self.name.is_empty() {
            return Err(Error::Config(format!(
                "exercise '{}' has an empty id or name",
                self.id
            )));
        }
        if self.duration_seconds == 0 && (self.reps.is_none() || self.sets.is_none()) {
            return Err(Error::Config(format!(
                "exercise '{}' has zero duration and no rep/set targets",
                self.id
            )));
        }
        Ok(())
    }
}

/// An ordered sequence of exercises executed back-to-back in one session.
///
/// Insertion order is execution order. Immutable once a session starts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExercisePlan {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: WorkoutCategory,
    pub difficulty: Difficulty,
    pub exercises: Vec<Exercise>,
    pub estimated_duration_minutes: u32,
}

impl ExercisePlan {
    pub fn validate(&self) -> Result<()> {
        if self.exercises.is_empty() {
            return Err(Error::Config(format!("plan '{}' has no exercises", self.id)));
        }
        for exercise in &self.exercises {
            exercise.validate()?;
        }
        Ok(())
    }
}

// ============================================================================
// Session Types
// ============================================================================

/// Lifecycle state of an active session.
///
/// `Completed` is terminal; no event transitions out of it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Running,
    Paused,
    Resting,
    Completed,
}

/// What a session runs over: a single exercise or an ordered plan
#[derive(Clone, Debug)]
pub enum SessionTarget {
    Single(Exercise),
    Plan(ExercisePlan),
}

impl SessionTarget {
    pub fn validate(&self) -> Result<()> {
        match self {
            SessionTarget::Single(exercise) => exercise.validate(),
            SessionTarget::Plan(plan) => plan.validate(),
        }
    }

    /// Display name for logs and persisted results
    pub fn name(&self) -> &str {
        match self {
            SessionTarget::Single(exercise) => &exercise.name,
            SessionTarget::Plan(plan) => &plan.name,
        }
    }

    /// Number of exercises this session will run through
    pub fn exercise_count(&self) -> usize {
        match self {
            SessionTarget::Single(_) => 1,
            SessionTarget::Plan(plan) => plan.exercises.len(),
        }
    }
}

/// Finalized summary of one session, created exactly once at termination and
/// handed to the persistence collaborator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionResult {
    pub id: Uuid,
    pub target_name: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub total_duration_seconds: u32,
    pub exercises_completed: u32,
    pub exercises_planned: u32,
    pub total_reps_completed: u32,
    pub average_form_score: f64,
    pub calories_burned: u32,
}

impl SessionResult {
    /// Estimated calories for a session length (7 cal/min, floored)
    pub fn estimate_calories(total_duration_seconds: u32) -> u32 {
        (total_duration_seconds / 60) * CALORIES_PER_MINUTE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_exercise() -> Exercise {
        Exercise {
            id: "test".into(),
            name: "Test".into(),
            description: String::new(),
            category: WorkoutCategory::Strength,
            difficulty: Difficulty::Beginner,
            duration_seconds: 30,
            reps: None,
            sets: None,
            rest_between_sets_seconds: 30,
            instructions: vec![],
        }
    }

    #[test]
    fn test_exercise_validation_accepts_duration_only() {
        assert!(bare_exercise().validate().is_ok());
    }

    #[test]
    fn test_exercise_validation_rejects_no_targets() {
        let mut exercise = bare_exercise();
        exercise.duration_seconds = 0;
        assert!(matches!(exercise.validate(), Err(Error::Config(_))));

        // Reps and sets together substitute for a duration
        exercise.reps = Some(10);
        exercise.sets = Some(3);
        assert!(exercise.validate().is_ok());
    }

    #[test]
    fn test_empty_plan_rejected() {
        let plan = ExercisePlan {
            id: "empty".into(),
            name: "Empty".into(),
            description: String::new(),
            category: WorkoutCategory::Strength,
            difficulty: Difficulty::Beginner,
            exercises: vec![],
            estimated_duration_minutes: 0,
        };
        assert!(matches!(plan.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_calorie_estimate_floors_partial_minutes() {
        assert_eq!(SessionResult::estimate_calories(59), 0);
        assert_eq!(SessionResult::estimate_calories(60), 7);
        assert_eq!(SessionResult::estimate_calories(130), 14);
    }
}
