//! Body-pose data model.
//!
//! The engine consumes already-extracted joint coordinates; it never talks to
//! a camera or an inference model. A [`KeypointFrame`] is one snapshot of the
//! joints a pose extractor managed to detect, stored as a fixed-size array
//! indexed by [`BodyJoint`] discriminant so iteration over "all joints" or
//! the postural subset is exhaustive and allocation-free.

use serde::{Deserialize, Serialize};

/// Visibility gate applied by the scorer. Extractors typically report any
/// landmark above a much lower confidence (~0.1); scoring decisions require
/// this stricter threshold.
pub const VISIBILITY_THRESHOLD: f32 = 0.5;

/// The closed set of tracked joints.
///
/// Discriminants index into [`KeypointFrame`]'s backing array, so variants
/// must stay contiguous from zero.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[repr(usize)]
pub enum BodyJoint {
    Nose = 0,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl BodyJoint {
    /// Number of tracked joints (array size for [`KeypointFrame`])
    pub const COUNT: usize = 17;

    /// All joints, in discriminant order
    pub const ALL: [BodyJoint; Self::COUNT] = [
        BodyJoint::Nose,
        BodyJoint::LeftEye,
        BodyJoint::RightEye,
        BodyJoint::LeftEar,
        BodyJoint::RightEar,
        BodyJoint::LeftShoulder,
        BodyJoint::RightShoulder,
        BodyJoint::LeftElbow,
        BodyJoint::RightElbow,
        BodyJoint::LeftWrist,
        BodyJoint::RightWrist,
        BodyJoint::LeftHip,
        BodyJoint::RightHip,
        BodyJoint::LeftKnee,
        BodyJoint::RightKnee,
        BodyJoint::LeftAnkle,
        BodyJoint::RightAnkle,
    ];

    /// The six postural joints used as the scoring visibility gate
    pub const POSTURAL: [BodyJoint; 6] = [
        BodyJoint::LeftShoulder,
        BodyJoint::RightShoulder,
        BodyJoint::LeftHip,
        BodyJoint::RightHip,
        BodyJoint::LeftKnee,
        BodyJoint::RightKnee,
    ];
}

/// A single tracked joint position with detection confidence.
///
/// `z` is zero when the extractor provides only 2D coordinates.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub confidence: f32,
}

impl Landmark {
    /// 2D landmark constructor (z = 0)
    pub fn new_2d(x: f32, y: f32, confidence: f32) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            confidence,
        }
    }

    /// Whether this landmark passes the scoring visibility gate
    pub fn visible(&self) -> bool {
        self.confidence > VISIBILITY_THRESHOLD
    }
}

/// One pose observation: up to [`BodyJoint::COUNT`] named landmarks.
///
/// Absent entries mean the extractor did not detect that joint. Frames are
/// built once per processed camera frame and treated as immutable afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeypointFrame {
    landmarks: [Option<Landmark>; BodyJoint::COUNT],
}

impl KeypointFrame {
    /// Empty frame (no joints detected)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion, used when converting extractor output
    pub fn with(mut self, joint: BodyJoint, landmark: Landmark) -> Self {
        self.landmarks[joint as usize] = Some(landmark);
        self
    }

    pub fn set(&mut self, joint: BodyJoint, landmark: Landmark) {
        self.landmarks[joint as usize] = Some(landmark);
    }

    pub fn get(&self, joint: BodyJoint) -> Option<&Landmark> {
        self.landmarks[joint as usize].as_ref()
    }

    /// Landmark only if it passes the visibility gate
    pub fn visible(&self, joint: BodyJoint) -> Option<&Landmark> {
        self.get(joint).filter(|lm| lm.visible())
    }

    /// Count of detected joints (any confidence)
    pub fn detected_count(&self) -> usize {
        self.landmarks.iter().filter(|lm| lm.is_some()).count()
    }

    /// Count of postural joints passing the visibility gate
    pub fn visible_postural_count(&self) -> usize {
        BodyJoint::POSTURAL
            .iter()
            .filter(|&&joint| self.visible(joint).is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_discriminants_are_contiguous() {
        for (idx, joint) in BodyJoint::ALL.iter().enumerate() {
            assert_eq!(*joint as usize, idx);
        }
    }

    #[test]
    fn test_visibility_gate() {
        let visible = Landmark::new_2d(0.5, 0.5, 0.9);
        let faint = Landmark::new_2d(0.5, 0.5, 0.3);

        assert!(visible.visible());
        assert!(!faint.visible());
    }

    #[test]
    fn test_frame_get_set() {
        let mut frame = KeypointFrame::new();
        assert!(frame.get(BodyJoint::Nose).is_none());

        frame.set(BodyJoint::Nose, Landmark::new_2d(0.4, 0.2, 0.95));
        assert_eq!(frame.get(BodyJoint::Nose).unwrap().x, 0.4);
        assert_eq!(frame.detected_count(), 1);
    }

    #[test]
    fn test_visible_postural_count_ignores_low_confidence() {
        let frame = KeypointFrame::new()
            .with(BodyJoint::LeftShoulder, Landmark::new_2d(0.3, 0.4, 0.9))
            .with(BodyJoint::RightShoulder, Landmark::new_2d(0.7, 0.4, 0.9))
            .with(BodyJoint::LeftHip, Landmark::new_2d(0.35, 0.6, 0.4))
            .with(BodyJoint::Nose, Landmark::new_2d(0.5, 0.1, 0.99));

        // Left hip is detected but below the gate; nose is not postural.
        assert_eq!(frame.visible_postural_count(), 2);
    }
}
