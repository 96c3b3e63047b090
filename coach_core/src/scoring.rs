//! Form-quality scoring.
//!
//! A pure heuristic over a single [`KeypointFrame`]: gate on postural joint
//! visibility, then penalize left/right misalignment of shoulders and hips.
//! Absent optional landmarks skip their penalty; missing evidence is not
//! treated as misalignment. The thresholds are hand-tuned and exposed via
//! [`ScoringConfig`] rather than baked in.

use serde::{Deserialize, Serialize};

use crate::pose::{BodyJoint, KeypointFrame};

/// Tunable scoring parameters, loadable from the `[scoring]` config section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Minimum visible postural joints before any score is produced
    #[serde(default = "default_min_visible_landmarks")]
    pub min_visible_landmarks: usize,

    /// Max left/right y-difference before an alignment penalty applies
    #[serde(default = "default_alignment_threshold")]
    pub alignment_threshold: f32,

    /// Score deducted per misaligned joint pair
    #[serde(default = "default_alignment_penalty")]
    pub alignment_penalty: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_visible_landmarks: default_min_visible_landmarks(),
            alignment_threshold: default_alignment_threshold(),
            alignment_penalty: default_alignment_penalty(),
        }
    }
}

fn default_min_visible_landmarks() -> usize {
    4
}

fn default_alignment_threshold() -> f32 {
    0.1
}

fn default_alignment_penalty() -> f64 {
    0.2
}

/// Coaching feedback band, derived from the numeric score
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    /// Too few postural joints visible to judge anything
    InsufficientVisibility,
    Excellent,
    Great,
    Good,
    NeedsAdjustment,
    CheckForm,
}

impl Feedback {
    /// Human-readable coaching message
    pub fn message(&self) -> &'static str {
        match self {
            Feedback::InsufficientVisibility => "Make sure your full body is visible",
            Feedback::Excellent => "Perfect form!",
            Feedback::Great => "Great form! Keep it up!",
            Feedback::Good => "Good! Watch your posture",
            Feedback::NeedsAdjustment => "Adjust your position",
            Feedback::CheckForm => "Check your form",
        }
    }

    /// Band mapping, evaluated high-to-low over non-overlapping ranges
    fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            Feedback::Excellent
        } else if score >= 0.8 {
            Feedback::Great
        } else if score >= 0.7 {
            Feedback::Good
        } else if score >= 0.5 {
            Feedback::NeedsAdjustment
        } else {
            Feedback::CheckForm
        }
    }
}

/// Result of scoring one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormAssessment {
    /// Form quality in [0, 1]
    pub score: f64,
    pub feedback: Feedback,
}

impl FormAssessment {
    /// Assessment for a frame that failed the visibility gate
    pub fn insufficient_visibility() -> Self {
        Self {
            score: 0.0,
            feedback: Feedback::InsufficientVisibility,
        }
    }
}

/// Score a frame against the alignment heuristics.
///
/// Never fails: an unusable frame yields score 0.0 with
/// [`Feedback::InsufficientVisibility`] (a hard gate, not a penalty).
pub fn score(frame: &KeypointFrame, config: &ScoringConfig) -> FormAssessment {
    let visible = frame.visible_postural_count();
    if visible < config.min_visible_landmarks {
        tracing::debug!(
            "Insufficient postural visibility: {}/{} joints",
            visible,
            BodyJoint::POSTURAL.len()
        );
        return FormAssessment::insufficient_visibility();
    }

    let mut score = 1.0f64;

    score -= pair_alignment_penalty(
        frame,
        BodyJoint::LeftShoulder,
        BodyJoint::RightShoulder,
        config,
    );
    score -= pair_alignment_penalty(frame, BodyJoint::LeftHip, BodyJoint::RightHip, config);

    let score = score.clamp(0.0, 1.0);

    FormAssessment {
        score,
        feedback: Feedback::from_score(score),
    }
}

/// Penalty for one left/right joint pair; zero unless both sides are visible
/// and their vertical difference exceeds the threshold.
fn pair_alignment_penalty(
    frame: &KeypointFrame,
    left: BodyJoint,
    right: BodyJoint,
    config: &ScoringConfig,
) -> f64 {
    match (frame.visible(left), frame.visible(right)) {
        (Some(l), Some(r)) if (l.y - r.y).abs() > config.alignment_threshold => {
            tracing::debug!(
                "Alignment penalty: {:?}/{:?} differ by {:.3}",
                left,
                right,
                (l.y - r.y).abs()
            );
            config.alignment_penalty
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Landmark;

    /// Frame with all six postural joints visible at the given y offsets
    fn postural_frame(shoulder_y: (f32, f32), hip_y: (f32, f32)) -> KeypointFrame {
        KeypointFrame::new()
            .with(
                BodyJoint::LeftShoulder,
                Landmark::new_2d(0.3, shoulder_y.0, 0.9),
            )
            .with(
                BodyJoint::RightShoulder,
                Landmark::new_2d(0.7, shoulder_y.1, 0.9),
            )
            .with(BodyJoint::LeftHip, Landmark::new_2d(0.35, hip_y.0, 0.9))
            .with(BodyJoint::RightHip, Landmark::new_2d(0.65, hip_y.1, 0.9))
            .with(BodyJoint::LeftKnee, Landmark::new_2d(0.35, 0.8, 0.9))
            .with(BodyJoint::RightKnee, Landmark::new_2d(0.65, 0.8, 0.9))
    }

    #[test]
    fn test_insufficient_visibility_is_hard_gate() {
        // Only shoulders and one hip visible (3 of 6)
        let frame = KeypointFrame::new()
            .with(BodyJoint::LeftShoulder, Landmark::new_2d(0.3, 0.4, 0.9))
            .with(BodyJoint::RightShoulder, Landmark::new_2d(0.7, 0.9, 0.9))
            .with(BodyJoint::LeftHip, Landmark::new_2d(0.35, 0.6, 0.9));

        let assessment = score(&frame, &ScoringConfig::default());
        assert_eq!(assessment.score, 0.0);
        assert_eq!(assessment.feedback, Feedback::InsufficientVisibility);
    }

    #[test]
    fn test_empty_frame_scores_zero() {
        let assessment = score(&KeypointFrame::new(), &ScoringConfig::default());
        assert_eq!(assessment.score, 0.0);
        assert_eq!(assessment.feedback, Feedback::InsufficientVisibility);
    }

    #[test]
    fn test_aligned_body_scores_perfect() {
        let frame = postural_frame((0.4, 0.4), (0.6, 0.6));
        let assessment = score(&frame, &ScoringConfig::default());

        assert_eq!(assessment.score, 1.0);
        assert_eq!(assessment.feedback, Feedback::Excellent);
    }

    #[test]
    fn test_misaligned_shoulders_cost_exactly_one_penalty() {
        let frame = postural_frame((0.4, 0.55), (0.6, 0.6));
        let assessment = score(&frame, &ScoringConfig::default());

        assert_eq!(assessment.score, 0.8);
        assert_eq!(assessment.feedback, Feedback::Great);
    }

    #[test]
    fn test_both_pairs_misaligned_stack_penalties() {
        let frame = postural_frame((0.4, 0.55), (0.6, 0.75));
        let assessment = score(&frame, &ScoringConfig::default());

        assert!((assessment.score - 0.6).abs() < 1e-9);
        assert_eq!(assessment.feedback, Feedback::NeedsAdjustment);
    }

    #[test]
    fn test_misalignment_at_threshold_is_not_penalized() {
        // Exactly 0.1 apart: threshold is strict (> 0.1)
        let frame = postural_frame((0.4, 0.5), (0.6, 0.6));
        let assessment = score(&frame, &ScoringConfig::default());

        assert_eq!(assessment.score, 1.0);
    }

    #[test]
    fn test_hidden_pair_skips_penalty() {
        // Knees + hips visible, shoulders absent: gate passes with 4 joints
        // and the shoulder penalty has no evidence to apply.
        let frame = KeypointFrame::new()
            .with(BodyJoint::LeftHip, Landmark::new_2d(0.35, 0.6, 0.9))
            .with(BodyJoint::RightHip, Landmark::new_2d(0.65, 0.6, 0.9))
            .with(BodyJoint::LeftKnee, Landmark::new_2d(0.35, 0.8, 0.9))
            .with(BodyJoint::RightKnee, Landmark::new_2d(0.65, 0.8, 0.9));

        let assessment = score(&frame, &ScoringConfig::default());
        assert_eq!(assessment.score, 1.0);
    }

    #[test]
    fn test_feedback_bands() {
        assert_eq!(Feedback::from_score(0.95), Feedback::Excellent);
        assert_eq!(Feedback::from_score(0.9), Feedback::Excellent);
        assert_eq!(Feedback::from_score(0.85), Feedback::Great);
        assert_eq!(Feedback::from_score(0.75), Feedback::Good);
        assert_eq!(Feedback::from_score(0.6), Feedback::NeedsAdjustment);
        assert_eq!(Feedback::from_score(0.2), Feedback::CheckForm);
    }
}
