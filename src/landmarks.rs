//! Landmark data model shared by the classifier and the frame driver.
//!
//! Coordinates are normalized to the image plane: `x` and `y` lie in
//! `[0, 1]` with the origin at the top-left corner and `y` growing
//! downward. A smaller `y` is therefore higher in the picture.

use crate::{
    constants::{NUM_POSE_LANDMARKS, POSE_ROW_VALUES, UNSCORED_CONFIDENCE},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A single detected keypoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, 0 = left edge
    pub x: f32,
    /// Vertical position, 0 = top edge
    pub y: f32,
    /// Relative depth, if the detector reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
    /// Detector confidence (visibility) in `[0, 1]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f32>,
}

impl Landmark {
    /// Create a 2D landmark without a confidence score
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            z: None,
            visibility: None,
        }
    }

    /// Attach a depth value
    #[must_use]
    pub const fn with_z(mut self, z: f32) -> Self {
        self.z = Some(z);
        self
    }

    /// Attach a confidence score
    #[must_use]
    pub const fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Confidence used for gating; unscored landmarks count as fully confident
    #[must_use]
    pub fn confidence(&self) -> f32 {
        self.visibility.unwrap_or(UNSCORED_CONFIDENCE)
    }

    /// Whether the image-plane position is usable at all
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Usable position with confidence at or above `threshold`.
    ///
    /// A NaN confidence never passes.
    #[must_use]
    pub fn is_reliable(&self, threshold: f32) -> bool {
        self.is_finite() && self.confidence() >= threshold
    }
}

macro_rules! body_parts {
    ($($variant:ident = $index:literal => $name:literal),+ $(,)?) => {
        /// Named body landmarks in MediaPipe pose index order
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum BodyPart {
            $(
                #[allow(missing_docs)]
                $variant = $index,
            )+
        }

        impl BodyPart {
            /// Every body part, ordered by detector index
            pub const ALL: [BodyPart; NUM_POSE_LANDMARKS] = [$(BodyPart::$variant),+];

            /// Snake-case identifier, e.g. `left_wrist`
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(BodyPart::$variant => $name,)+
                }
            }
        }
    };
}

body_parts! {
    Nose = 0 => "nose",
    LeftEyeInner = 1 => "left_eye_inner",
    LeftEye = 2 => "left_eye",
    LeftEyeOuter = 3 => "left_eye_outer",
    RightEyeInner = 4 => "right_eye_inner",
    RightEye = 5 => "right_eye",
    RightEyeOuter = 6 => "right_eye_outer",
    LeftEar = 7 => "left_ear",
    RightEar = 8 => "right_ear",
    MouthLeft = 9 => "mouth_left",
    MouthRight = 10 => "mouth_right",
    LeftShoulder = 11 => "left_shoulder",
    RightShoulder = 12 => "right_shoulder",
    LeftElbow = 13 => "left_elbow",
    RightElbow = 14 => "right_elbow",
    LeftWrist = 15 => "left_wrist",
    RightWrist = 16 => "right_wrist",
    LeftPinky = 17 => "left_pinky",
    RightPinky = 18 => "right_pinky",
    LeftIndex = 19 => "left_index",
    RightIndex = 20 => "right_index",
    LeftThumb = 21 => "left_thumb",
    RightThumb = 22 => "right_thumb",
    LeftHip = 23 => "left_hip",
    RightHip = 24 => "right_hip",
    LeftKnee = 25 => "left_knee",
    RightKnee = 26 => "right_knee",
    LeftAnkle = 27 => "left_ankle",
    RightAnkle = 28 => "right_ankle",
    LeftHeel = 29 => "left_heel",
    RightHeel = 30 => "right_heel",
    LeftFootIndex = 31 => "left_foot_index",
    RightFootIndex = 32 => "right_foot_index",
}

impl BodyPart {
    /// Detector index of this landmark
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a body part by detector index
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BodyPart {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|part| part.name() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown body part: {s}")))
    }
}

/// All landmarks detected in one video frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameLandmarks {
    points: BTreeMap<BodyPart, Landmark>,
}

impl FrameLandmarks {
    /// Create an empty frame
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a frame from the detector's indexed rows.
    ///
    /// Each row holds `x, y` and optionally `z` and `visibility`, in that
    /// order; row `i` is the landmark with detector index `i`.
    ///
    /// # Errors
    ///
    /// Returns an error if there are more rows than pose landmarks or a row
    /// has fewer than two or more than four values.
    pub fn from_pose_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self> {
        if rows.len() > NUM_POSE_LANDMARKS {
            return Err(Error::InvalidInput(format!(
                "Expected at most {NUM_POSE_LANDMARKS} pose rows, got {}",
                rows.len()
            )));
        }

        let mut frame = Self::new();
        for (part, row) in BodyPart::ALL.iter().copied().zip(rows) {
            let landmark = match *row.as_ref() {
                [x, y] => Landmark::new(x, y),
                [x, y, z] => Landmark::new(x, y).with_z(z),
                [x, y, z, visibility] => Landmark::new(x, y).with_z(z).with_visibility(visibility),
                ref other => {
                    return Err(Error::InvalidInput(format!(
                        "Pose row for {part} has {} values, expected 2 to {POSE_ROW_VALUES}",
                        other.len()
                    )))
                }
            };
            frame.insert(part, landmark);
        }
        Ok(frame)
    }

    /// Insert or replace a landmark, returning the previous one
    pub fn insert(&mut self, part: BodyPart, landmark: Landmark) -> Option<Landmark> {
        self.points.insert(part, landmark)
    }

    /// Landmark for `part`, if detected
    #[must_use]
    pub fn get(&self, part: BodyPart) -> Option<&Landmark> {
        self.points.get(&part)
    }

    /// Landmark for `part` only if it passes the confidence gate
    #[must_use]
    pub fn reliable(&self, part: BodyPart, threshold: f32) -> Option<&Landmark> {
        self.get(part).filter(|landmark| landmark.is_reliable(threshold))
    }

    /// Number of landmarks in the frame
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the frame holds no landmarks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether any landmark has a usable position
    #[must_use]
    pub fn has_pose(&self) -> bool {
        self.points.values().any(Landmark::is_finite)
    }

    /// Iterate landmarks in detector index order
    pub fn iter(&self) -> impl Iterator<Item = (BodyPart, &Landmark)> {
        self.points.iter().map(|(part, landmark)| (*part, landmark))
    }
}

impl FromIterator<(BodyPart, Landmark)> for FrameLandmarks {
    fn from_iter<I: IntoIterator<Item = (BodyPart, Landmark)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}
