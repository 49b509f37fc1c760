//! The 33-point body landmark set and its skeleton edges.

use std::fmt;

/// A named body landmark, in model output order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PoseLandmark {
    Nose,
    LeftEyeInner,
    LeftEye,
    LeftEyeOuter,
    RightEyeInner,
    RightEye,
    RightEyeOuter,
    LeftEar,
    RightEar,
    MouthLeft,
    MouthRight,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftPinky,
    RightPinky,
    LeftIndex,
    RightIndex,
    LeftThumb,
    RightThumb,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
}

impl PoseLandmark {
    /// Number of landmarks the model reports for one pose.
    pub const COUNT: usize = 33;

    /// Every landmark in model output order.
    pub const ALL: [PoseLandmark; Self::COUNT] = [
        PoseLandmark::Nose,
        PoseLandmark::LeftEyeInner,
        PoseLandmark::LeftEye,
        PoseLandmark::LeftEyeOuter,
        PoseLandmark::RightEyeInner,
        PoseLandmark::RightEye,
        PoseLandmark::RightEyeOuter,
        PoseLandmark::LeftEar,
        PoseLandmark::RightEar,
        PoseLandmark::MouthLeft,
        PoseLandmark::MouthRight,
        PoseLandmark::LeftShoulder,
        PoseLandmark::RightShoulder,
        PoseLandmark::LeftElbow,
        PoseLandmark::RightElbow,
        PoseLandmark::LeftWrist,
        PoseLandmark::RightWrist,
        PoseLandmark::LeftPinky,
        PoseLandmark::RightPinky,
        PoseLandmark::LeftIndex,
        PoseLandmark::RightIndex,
        PoseLandmark::LeftThumb,
        PoseLandmark::RightThumb,
        PoseLandmark::LeftHip,
        PoseLandmark::RightHip,
        PoseLandmark::LeftKnee,
        PoseLandmark::RightKnee,
        PoseLandmark::LeftAnkle,
        PoseLandmark::RightAnkle,
        PoseLandmark::LeftHeel,
        PoseLandmark::RightHeel,
        PoseLandmark::LeftFootIndex,
        PoseLandmark::RightFootIndex,
    ];

    /// Position in model output order.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Upper snake case name, e.g. `LEFT_SHOULDER`.
    pub fn name(self) -> &'static str {
        match self {
            PoseLandmark::Nose => "NOSE",
            PoseLandmark::LeftEyeInner => "LEFT_EYE_INNER",
            PoseLandmark::LeftEye => "LEFT_EYE",
            PoseLandmark::LeftEyeOuter => "LEFT_EYE_OUTER",
            PoseLandmark::RightEyeInner => "RIGHT_EYE_INNER",
            PoseLandmark::RightEye => "RIGHT_EYE",
            PoseLandmark::RightEyeOuter => "RIGHT_EYE_OUTER",
            PoseLandmark::LeftEar => "LEFT_EAR",
            PoseLandmark::RightEar => "RIGHT_EAR",
            PoseLandmark::MouthLeft => "MOUTH_LEFT",
            PoseLandmark::MouthRight => "MOUTH_RIGHT",
            PoseLandmark::LeftShoulder => "LEFT_SHOULDER",
            PoseLandmark::RightShoulder => "RIGHT_SHOULDER",
            PoseLandmark::LeftElbow => "LEFT_ELBOW",
            PoseLandmark::RightElbow => "RIGHT_ELBOW",
            PoseLandmark::LeftWrist => "LEFT_WRIST",
            PoseLandmark::RightWrist => "RIGHT_WRIST",
            PoseLandmark::LeftPinky => "LEFT_PINKY",
            PoseLandmark::RightPinky => "RIGHT_PINKY",
            PoseLandmark::LeftIndex => "LEFT_INDEX",
            PoseLandmark::RightIndex => "RIGHT_INDEX",
            PoseLandmark::LeftThumb => "LEFT_THUMB",
            PoseLandmark::RightThumb => "RIGHT_THUMB",
            PoseLandmark::LeftHip => "LEFT_HIP",
            PoseLandmark::RightHip => "RIGHT_HIP",
            PoseLandmark::LeftKnee => "LEFT_KNEE",
            PoseLandmark::RightKnee => "RIGHT_KNEE",
            PoseLandmark::LeftAnkle => "LEFT_ANKLE",
            PoseLandmark::RightAnkle => "RIGHT_ANKLE",
            PoseLandmark::LeftHeel => "LEFT_HEEL",
            PoseLandmark::RightHeel => "RIGHT_HEEL",
            PoseLandmark::LeftFootIndex => "LEFT_FOOT_INDEX",
            PoseLandmark::RightFootIndex => "RIGHT_FOOT_INDEX",
        }
    }
}

impl fmt::Display for PoseLandmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Skeleton edges between landmark indices.
pub const POSE_CONNECTIONS: [(usize, usize); 35] = [
    // face
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 7),
    (0, 4),
    (4, 5),
    (5, 6),
    (6, 8),
    (9, 10),
    // torso and arms
    (11, 12),
    (11, 13),
    (13, 15),
    (15, 17),
    (15, 19),
    (15, 21),
    (17, 19),
    (12, 14),
    (14, 16),
    (16, 18),
    (16, 20),
    (16, 22),
    (18, 20),
    (11, 23),
    (12, 24),
    (23, 24),
    // legs
    (23, 25),
    (24, 26),
    (25, 27),
    (26, 28),
    (27, 29),
    (28, 30),
    (29, 31),
    (30, 32),
    (27, 31),
    (28, 32),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_discriminant_order() {
        for (i, lm) in PoseLandmark::ALL.iter().enumerate() {
            assert_eq!(lm.index(), i);
        }
    }

    #[test]
    fn names_are_upper_snake_case() {
        assert_eq!(PoseLandmark::Nose.name(), "NOSE");
        assert_eq!(PoseLandmark::LeftEyeInner.to_string(), "LEFT_EYE_INNER");
        assert_eq!(PoseLandmark::RightFootIndex.name(), "RIGHT_FOOT_INDEX");
        for lm in PoseLandmark::ALL {
            assert!(lm
                .name()
                .chars()
                .all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn connections_reference_known_landmarks() {
        for (a, b) in POSE_CONNECTIONS {
            assert!(a < PoseLandmark::COUNT && b < PoseLandmark::COUNT);
            assert_ne!(a, b);
        }
    }
}
