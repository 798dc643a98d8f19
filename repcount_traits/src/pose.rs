//! Pose data delivered by the external estimation provider.
//!
//! Joint naming follows the 33-point BlazePose topology: the provider's
//! landmark index is the enum discriminant, and the snake_case name is what
//! configuration files and recordings use.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Joint {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl Joint {
    /// Every joint, ordered by provider index.
    pub const ALL: [Joint; 33] = [
        Joint::Nose,
        Joint::LeftEyeInner,
        Joint::LeftEye,
        Joint::LeftEyeOuter,
        Joint::RightEyeInner,
        Joint::RightEye,
        Joint::RightEyeOuter,
        Joint::LeftEar,
        Joint::RightEar,
        Joint::MouthLeft,
        Joint::MouthRight,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftPinky,
        Joint::RightPinky,
        Joint::LeftIndex,
        Joint::RightIndex,
        Joint::LeftThumb,
        Joint::RightThumb,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
        Joint::LeftHeel,
        Joint::RightHeel,
        Joint::LeftFootIndex,
        Joint::RightFootIndex,
    ];

    /// Provider landmark index.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Joint::Nose => "nose",
            Joint::LeftEyeInner => "left_eye_inner",
            Joint::LeftEye => "left_eye",
            Joint::LeftEyeOuter => "left_eye_outer",
            Joint::RightEyeInner => "right_eye_inner",
            Joint::RightEye => "right_eye",
            Joint::RightEyeOuter => "right_eye_outer",
            Joint::LeftEar => "left_ear",
            Joint::RightEar => "right_ear",
            Joint::MouthLeft => "mouth_left",
            Joint::MouthRight => "mouth_right",
            Joint::LeftShoulder => "left_shoulder",
            Joint::RightShoulder => "right_shoulder",
            Joint::LeftElbow => "left_elbow",
            Joint::RightElbow => "right_elbow",
            Joint::LeftWrist => "left_wrist",
            Joint::RightWrist => "right_wrist",
            Joint::LeftPinky => "left_pinky",
            Joint::RightPinky => "right_pinky",
            Joint::LeftIndex => "left_index",
            Joint::RightIndex => "right_index",
            Joint::LeftThumb => "left_thumb",
            Joint::RightThumb => "right_thumb",
            Joint::LeftHip => "left_hip",
            Joint::RightHip => "right_hip",
            Joint::LeftKnee => "left_knee",
            Joint::RightKnee => "right_knee",
            Joint::LeftAnkle => "left_ankle",
            Joint::RightAnkle => "right_ankle",
            Joint::LeftHeel => "left_heel",
            Joint::RightHeel => "right_heel",
            Joint::LeftFootIndex => "left_foot_index",
            Joint::RightFootIndex => "right_foot_index",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a joint name is not part of the topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownJoint(pub String);

impl fmt::Display for UnknownJoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown joint name '{}'", self.0)
    }
}

impl std::error::Error for UnknownJoint {}

impl FromStr for Joint {
    type Err = UnknownJoint;

    /// Accepts snake_case names, case-insensitively, with `-` as an alias for `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|j| j.as_str() == norm)
            .ok_or_else(|| UnknownJoint(s.to_string()))
    }
}

/// One joint estimate for one frame.
///
/// Coordinates are in the provider's normalized image space (x right, y down).
/// `z` is relative depth when the provider supplies it; `confidence` is the
/// visibility score in [0, 1] and may be absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: Option<f32>,
    pub confidence: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            z: None,
            confidence: None,
        }
    }

    pub fn with_z(mut self, z: f32) -> Self {
        self.z = Some(z);
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// All landmarks the provider produced for a single frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoseFrame {
    /// Provider timestamp in milliseconds (monotonic, arrival order).
    pub timestamp_ms: u64,
    pub landmarks: BTreeMap<Joint, Landmark>,
}

impl PoseFrame {
    pub fn new(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            landmarks: BTreeMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, joint: Joint, landmark: Landmark) -> Self {
        self.landmarks.insert(joint, landmark);
        self
    }

    pub fn insert(&mut self, joint: Joint, landmark: Landmark) {
        self.landmarks.insert(joint, landmark);
    }

    #[inline]
    pub fn get(&self, joint: Joint) -> Option<&Landmark> {
        self.landmarks.get(&joint)
    }
}
