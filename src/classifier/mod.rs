//! Rule-based action classification for a single frame of landmarks.
//!
//! The classifier walks an ordered list of [`ActionRule`]s and returns the
//! result of the first rule that matches. When nothing matches, the frame is
//! labelled [`Action::Unknown`]. Classification never fails and keeps no
//! state between frames, so one classifier can be shared across threads.

/// Built-in rules and the rule factory
pub mod rules;

use crate::{
    constants::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_RAISE_MARGIN},
    landmarks::{BodyPart, FrameLandmarks},
};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use rules::{create_rule, default_rules, HandRaiseRule, StandingRule};

/// Discrete action labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Resting upright pose
    Standing,
    /// Left wrist above left shoulder
    RaisingLeftHand,
    /// Right wrist above right shoulder
    RaisingRightHand,
    /// Not enough landmark data to decide
    Unknown,
}

impl Action {
    /// Every label, in declaration order
    pub const ALL: [Action; 4] = [
        Action::Standing,
        Action::RaisingLeftHand,
        Action::RaisingRightHand,
        Action::Unknown,
    ];

    /// Human-readable label for display
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Action::Standing => "Standing",
            Action::RaisingLeftHand => "Raising Left Hand",
            Action::RaisingRightHand => "Raising Right Hand",
            Action::Unknown => "Unknown",
        }
    }

    /// Snake-case identifier, matching the serialized form
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Action::Standing => "standing",
            Action::RaisingLeftHand => "raising_left_hand",
            Action::RaisingRightHand => "raising_right_hand",
            Action::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Landmark pair and measurement that caused a rule to fire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    /// Landmark being tested, e.g. the wrist
    pub subject: BodyPart,
    /// Landmark it is compared against, e.g. the shoulder
    pub reference: BodyPart,
    /// `reference.y - subject.y`; positive means the subject is higher
    pub margin: f32,
}

/// Output of classifying one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Classified action
    pub action: Action,
    /// Justification, when the rule has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Trigger>,
}

impl ActionResult {
    /// Result without a trigger
    #[must_use]
    pub const fn new(action: Action) -> Self {
        Self { action, trigger: None }
    }

    /// Fallback result for frames no rule could decide
    #[must_use]
    pub const fn unknown() -> Self {
        Self::new(Action::Unknown)
    }

    /// Attach the triggering landmark pair
    #[must_use]
    pub const fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Human-readable label of the action
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.action.label()
    }
}

/// Tunable gates shared by all rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sensitivity {
    /// Minimum landmark confidence (inclusive)
    pub confidence_threshold: f32,
    /// Distance a wrist must clear above its shoulder (strict)
    pub raise_margin: f32,
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            raise_margin: DEFAULT_RAISE_MARGIN,
        }
    }
}

/// One predicate/label pair in the classifier's priority list
pub trait ActionRule: Send + Sync {
    /// Return a result if this rule matches the frame
    fn evaluate(&self, frame: &FrameLandmarks, sensitivity: &Sensitivity) -> Option<ActionResult>;

    /// Get rule name
    fn name(&self) -> &str;
}

/// Ordered rule list evaluated first-match-wins
pub struct ActionClassifier {
    sensitivity: Sensitivity,
    rules: Vec<Box<dyn ActionRule>>,
}

impl ActionClassifier {
    /// Classifier with the built-in rules in their default order
    #[must_use]
    pub fn new(sensitivity: Sensitivity) -> Self {
        Self::with_rules(sensitivity, default_rules())
    }

    /// Classifier with an explicit rule order
    #[must_use]
    pub fn with_rules(sensitivity: Sensitivity, rules: Vec<Box<dyn ActionRule>>) -> Self {
        Self { sensitivity, rules }
    }

    /// Append a rule after all existing ones
    pub fn push_rule(&mut self, rule: Box<dyn ActionRule>) {
        self.rules.push(rule);
    }

    /// Classify one frame.
    ///
    /// Total and deterministic: missing, non-finite or low-confidence
    /// landmarks only make their rule fall through.
    #[must_use]
    pub fn classify(&self, frame: &FrameLandmarks) -> ActionResult {
        self.rules
            .iter()
            .find_map(|rule| rule.evaluate(frame, &self.sensitivity))
            .unwrap_or_else(ActionResult::unknown)
    }

    /// Gates in effect
    #[must_use]
    pub fn sensitivity(&self) -> &Sensitivity {
        &self.sensitivity
    }

    /// Rule names in evaluation order
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }
}

impl Default for ActionClassifier {
    fn default() -> Self {
        Self::new(Sensitivity::default())
    }
}

impl fmt::Debug for ActionClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionClassifier")
            .field("sensitivity", &self.sensitivity)
            .field("rules", &self.rule_names())
            .finish()
    }
}
