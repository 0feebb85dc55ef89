//! Constants used throughout the crate

/// Number of landmarks in the MediaPipe pose topology
pub const NUM_POSE_LANDMARKS: usize = 33;

/// Values per row in an indexed pose array (x, y, z, visibility)
pub const POSE_ROW_VALUES: usize = 4;

/// Minimum landmark confidence for a rule to consider it
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Vertical distance a wrist must clear above its shoulder
pub const DEFAULT_RAISE_MARGIN: f32 = 0.0;

/// Confidence assumed for landmarks reported without a visibility score
pub const UNSCORED_CONFIDENCE: f32 = 1.0;

/// Default window for majority-vote smoothing
pub const DEFAULT_MAJORITY_WINDOW: usize = 5;

/// Default consecutive-frame count for debounce smoothing
pub const DEFAULT_DEBOUNCE_FRAMES: usize = 3;

/// Rule names in their default evaluation order
pub const DEFAULT_RULE_ORDER: [&str; 3] = ["raise_left_hand", "raise_right_hand", "standing"];
