//! Built-in exercise and plan catalog.
//!
//! Default content so a fresh install can run sessions without authoring
//! anything. Plans embed their exercises by value; execution order is the
//! vector order.

use crate::types::{Difficulty, Exercise, ExercisePlan, WorkoutCategory};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// The complete catalog of exercises and plans
#[derive(Clone, Debug)]
pub struct Catalog {
    pub exercises: HashMap<String, Exercise>,
    pub plans: HashMap<String, ExercisePlan>,
}

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog with built-in exercises and plans
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns
/// a cached reference. This function is retained for testing and custom
/// catalog creation.
pub fn build_default_catalog() -> Catalog {
    let squats = Exercise {
        id: "squats".into(),
        name: "Squats".into(),
        description: "A compound lower body workout targeting quads, glutes, and core.".into(),
        category: WorkoutCategory::Strength,
        difficulty: Difficulty::Beginner,
        duration_seconds: 45,
        reps: Some(12),
        sets: Some(3),
        rest_between_sets_seconds: 30,
        instructions: vec![
            "Stand with feet shoulder-width apart".into(),
            "Lower your body as if sitting back into a chair".into(),
            "Keep your chest up and core engaged".into(),
            "Push through your heels to stand".into(),
        ],
    };

    let pushups = Exercise {
        id: "pushups".into(),
        name: "Push-ups".into(),
        description: "Classic upper body workout for chest, shoulders, and triceps.".into(),
        category: WorkoutCategory::Strength,
        difficulty: Difficulty::Beginner,
        duration_seconds: 45,
        reps: Some(10),
        sets: Some(3),
        rest_between_sets_seconds: 30,
        instructions: vec![
            "Start in a plank position".into(),
            "Lower your chest to the ground".into(),
            "Keep your core tight".into(),
            "Push back up to starting position".into(),
        ],
    };

    let jumping_jacks = Exercise {
        id: "jumping_jacks".into(),
        name: "Jumping Jacks".into(),
        description: "Full body cardio workout to elevate heart rate.".into(),
        category: WorkoutCategory::Cardio,
        difficulty: Difficulty::Beginner,
        duration_seconds: 60,
        reps: None,
        sets: None,
        rest_between_sets_seconds: 30,
        instructions: vec![
            "Start standing with arms at sides".into(),
            "Jump while spreading legs and raising arms".into(),
            "Return to starting position".into(),
            "Repeat at a steady pace".into(),
        ],
    };

    let lunges = Exercise {
        id: "lunges".into(),
        name: "Lunges".into(),
        description: "Unilateral leg workout for balance and strength.".into(),
        category: WorkoutCategory::Strength,
        difficulty: Difficulty::Intermediate,
        duration_seconds: 60,
        reps: Some(10),
        sets: Some(3),
        rest_between_sets_seconds: 30,
        instructions: vec![
            "Step forward with one leg".into(),
            "Lower until both knees are at 90 degrees".into(),
            "Push back to starting position".into(),
            "Alternate legs".into(),
        ],
    };

    let plank = Exercise {
        id: "plank".into(),
        name: "Plank".into(),
        description: "Isometric core workout for stability and strength.".into(),
        category: WorkoutCategory::Strength,
        difficulty: Difficulty::Beginner,
        duration_seconds: 30,
        reps: None,
        sets: None,
        rest_between_sets_seconds: 30,
        instructions: vec![
            "Start in a forearm plank position".into(),
            "Keep your body in a straight line".into(),
            "Engage your core".into(),
            "Hold the position".into(),
        ],
    };

    let burpees = Exercise {
        id: "burpees".into(),
        name: "Burpees".into(),
        description: "High-intensity full body workout.".into(),
        category: WorkoutCategory::Hiit,
        difficulty: Difficulty::Advanced,
        duration_seconds: 45,
        reps: Some(10),
        sets: Some(3),
        rest_between_sets_seconds: 30,
        instructions: vec![
            "Start standing".into(),
            "Drop into a squat and place hands on floor".into(),
            "Jump feet back to plank".into(),
            "Do a push-up, jump feet forward, then jump up".into(),
        ],
    };

    let all = [squats, pushups, jumping_jacks, lunges, plank, burpees];

    let mut plans = HashMap::new();
    plans.insert(
        "quick_morning_stretch".into(),
        ExercisePlan {
            id: "quick_morning_stretch".into(),
            name: "Quick Morning Stretch".into(),
            description: "Start your day right with this energizing routine.".into(),
            category: WorkoutCategory::WarmUp,
            difficulty: Difficulty::Beginner,
            exercises: all[..3].to_vec(),
            estimated_duration_minutes: 15,
        },
    );
    plans.insert(
        "full_body_burn".into(),
        ExercisePlan {
            id: "full_body_burn".into(),
            name: "Full Body Burn".into(),
            description: "A complete plan hitting all major muscle groups.".into(),
            category: WorkoutCategory::Strength,
            difficulty: Difficulty::Intermediate,
            exercises: all.to_vec(),
            estimated_duration_minutes: 30,
        },
    );
    plans.insert(
        "hiit_blast".into(),
        ExercisePlan {
            id: "hiit_blast".into(),
            name: "HIIT Blast".into(),
            description: "High intensity intervals for maximum calorie burn.".into(),
            category: WorkoutCategory::Hiit,
            difficulty: Difficulty::Advanced,
            exercises: all[3..].to_vec(),
            estimated_duration_minutes: 20,
        },
    );

    let exercises = all
        .into_iter()
        .map(|exercise| (exercise.id.clone(), exercise))
        .collect();

    Catalog { exercises, plans }
}

impl Catalog {
    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, exercise) in &self.exercises {
            if id != &exercise.id {
                errors.push(format!(
                    "Exercise key '{}' doesn't match exercise.id '{}'",
                    id, exercise.id
                ));
            }
            if let Err(e) = exercise.validate() {
                errors.push(e.to_string());
            }
        }

        for (id, plan) in &self.plans {
            if id != &plan.id {
                errors.push(format!(
                    "Plan key '{}' doesn't match plan.id '{}'",
                    id, plan.id
                ));
            }
            if let Err(e) = plan.validate() {
                errors.push(e.to_string());
            }
            for exercise in &plan.exercises {
                if !self.exercises.contains_key(&exercise.id) {
                    errors.push(format!(
                        "Plan '{}' embeds exercise '{}' missing from the catalog",
                        id, exercise.id
                    ));
                }
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        let catalog = build_default_catalog();
        assert_eq!(catalog.exercises.len(), 6);
        assert_eq!(catalog.plans.len(), 3);
    }

    #[test]
    fn test_default_catalog_validates() {
        let catalog = build_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_plans_embed_known_exercises() {
        let catalog = build_default_catalog();
        for plan in catalog.plans.values() {
            assert!(!plan.exercises.is_empty());
            for exercise in &plan.exercises {
                assert!(
                    catalog.exercises.contains_key(&exercise.id),
                    "Exercise {} embedded but not in catalog",
                    exercise.id
                );
            }
        }
    }

    #[test]
    fn test_every_exercise_can_start_a_session() {
        let catalog = build_default_catalog();
        for exercise in catalog.exercises.values() {
            assert!(exercise.validate().is_ok(), "{} invalid", exercise.id);
        }
    }

    #[test]
    fn test_cached_catalog_matches_builder() {
        let cached = get_default_catalog();
        let built = build_default_catalog();
        assert_eq!(cached.exercises.len(), built.exercises.len());
        assert_eq!(cached.plans.len(), built.plans.len());
    }
}
