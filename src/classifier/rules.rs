use super::{Action, ActionResult, ActionRule, Sensitivity, Trigger};
use crate::{
    constants::DEFAULT_RULE_ORDER,
    landmarks::{BodyPart, FrameLandmarks},
    Error, Result,
};

/// Wrist held above the shoulder on one side
pub struct HandRaiseRule {
    name: &'static str,
    wrist: BodyPart,
    shoulder: BodyPart,
    action: Action,
}

impl HandRaiseRule {
    /// Left wrist above left shoulder
    #[must_use]
    pub const fn left() -> Self {
        Self {
            name: "raise_left_hand",
            wrist: BodyPart::LeftWrist,
            shoulder: BodyPart::LeftShoulder,
            action: Action::RaisingLeftHand,
        }
    }

    /// Right wrist above right shoulder
    #[must_use]
    pub const fn right() -> Self {
        Self {
            name: "raise_right_hand",
            wrist: BodyPart::RightWrist,
            shoulder: BodyPart::RightShoulder,
            action: Action::RaisingRightHand,
        }
    }
}

impl ActionRule for HandRaiseRule {
    fn evaluate(&self, frame: &FrameLandmarks, sensitivity: &Sensitivity) -> Option<ActionResult> {
        let wrist = frame.reliable(self.wrist, sensitivity.confidence_threshold)?;
        let shoulder = frame.reliable(self.shoulder, sensitivity.confidence_threshold)?;

        // Image y grows downward, so a raised wrist has the smaller y
        let margin = shoulder.y - wrist.y;
        if margin > sensitivity.raise_margin {
            Some(ActionResult::new(self.action).with_trigger(Trigger {
                subject: self.wrist,
                reference: self.shoulder,
                margin,
            }))
        } else {
            None
        }
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Default resting pose: torso fully visible
pub struct StandingRule;

impl StandingRule {
    const TORSO: [BodyPart; 4] = [
        BodyPart::LeftShoulder,
        BodyPart::RightShoulder,
        BodyPart::LeftHip,
        BodyPart::RightHip,
    ];
}

impl ActionRule for StandingRule {
    fn evaluate(&self, frame: &FrameLandmarks, sensitivity: &Sensitivity) -> Option<ActionResult> {
        Self::TORSO
            .iter()
            .all(|part| frame.reliable(*part, sensitivity.confidence_threshold).is_some())
            .then(|| ActionResult::new(Action::Standing))
    }

    fn name(&self) -> &str {
        "standing"
    }
}

/// Create a rule by name
///
/// # Errors
///
/// Returns an error if the name does not match a built-in rule
pub fn create_rule(rule_name: &str) -> Result<Box<dyn ActionRule>> {
    match rule_name.to_lowercase().as_str() {
        "raise_left_hand" | "left_hand" => Ok(Box::new(HandRaiseRule::left())),
        "raise_right_hand" | "right_hand" => Ok(Box::new(HandRaiseRule::right())),
        "standing" => Ok(Box::new(StandingRule)),
        _ => Err(Error::RuleError(format!("Unknown rule: {rule_name}"))),
    }
}

/// Built-in rules: left raise, right raise, standing
#[must_use]
pub fn default_rules() -> Vec<Box<dyn ActionRule>> {
    DEFAULT_RULE_ORDER
        .iter()
        .filter_map(|name| create_rule(name).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Landmark;

    fn frame(points: &[(BodyPart, f32, f32, f32)]) -> FrameLandmarks {
        points
            .iter()
            .map(|&(part, x, y, conf)| (part, Landmark::new(x, y).with_visibility(conf)))
            .collect()
    }

    #[test]
    fn test_hand_raise_requires_both_landmarks() {
        let rule = HandRaiseRule::left();
        let sensitivity = Sensitivity::default();

        let wrist_only = frame(&[(BodyPart::LeftWrist, 0.3, 0.2, 0.9)]);
        assert!(rule.evaluate(&wrist_only, &sensitivity).is_none());

        let both = frame(&[
            (BodyPart::LeftWrist, 0.3, 0.2, 0.9),
            (BodyPart::LeftShoulder, 0.3, 0.5, 0.9),
        ]);
        assert!(rule.evaluate(&both, &sensitivity).is_some());
    }

    #[test]
    fn test_hand_raise_confidence_gate() {
        let rule = HandRaiseRule::right();
        let sensitivity = Sensitivity::default();

        let weak_wrist = frame(&[
            (BodyPart::RightWrist, 0.7, 0.2, 0.49),
            (BodyPart::RightShoulder, 0.7, 0.5, 0.9),
        ]);
        assert!(rule.evaluate(&weak_wrist, &sensitivity).is_none());

        // Threshold is inclusive
        let at_threshold = frame(&[
            (BodyPart::RightWrist, 0.7, 0.2, 0.5),
            (BodyPart::RightShoulder, 0.7, 0.5, 0.5),
        ]);
        assert!(rule.evaluate(&at_threshold, &sensitivity).is_some());
    }

    #[test]
    fn test_hand_raise_margin() {
        let rule = HandRaiseRule::left();
        let points = frame(&[
            (BodyPart::LeftWrist, 0.3, 0.35, 0.9),
            (BodyPart::LeftShoulder, 0.3, 0.5, 0.9),
        ]);

        assert!(rule.evaluate(&points, &Sensitivity::default()).is_some());

        let strict = Sensitivity {
            raise_margin: 0.2,
            ..Sensitivity::default()
        };
        assert!(rule.evaluate(&points, &strict).is_none());
    }

    #[test]
    fn test_level_wrist_is_not_raised() {
        let rule = HandRaiseRule::left();
        let level = frame(&[
            (BodyPart::LeftWrist, 0.3, 0.5, 0.9),
            (BodyPart::LeftShoulder, 0.3, 0.5, 0.9),
        ]);
        assert!(rule.evaluate(&level, &Sensitivity::default()).is_none());
    }

    #[test]
    fn test_standing_needs_full_torso() {
        let sensitivity = Sensitivity::default();
        let mut torso = frame(&[
            (BodyPart::LeftShoulder, 0.4, 0.3, 0.9),
            (BodyPart::RightShoulder, 0.6, 0.3, 0.9),
            (BodyPart::LeftHip, 0.4, 0.7, 0.9),
        ]);
        assert!(StandingRule.evaluate(&torso, &sensitivity).is_none());

        torso.insert(BodyPart::RightHip, Landmark::new(0.6, 0.7).with_visibility(0.2));
        assert!(StandingRule.evaluate(&torso, &sensitivity).is_none());

        torso.insert(BodyPart::RightHip, Landmark::new(0.6, 0.7).with_visibility(0.8));
        assert_eq!(
            StandingRule.evaluate(&torso, &sensitivity),
            Some(ActionResult::new(Action::Standing))
        );
    }

    #[test]
    fn test_create_rule() {
        assert_eq!(create_rule("raise_left_hand").unwrap().name(), "raise_left_hand");
        assert_eq!(create_rule("Right_Hand").unwrap().name(), "raise_right_hand");
        assert_eq!(create_rule("standing").unwrap().name(), "standing");
        assert!(create_rule("jumping").is_err());
        assert_eq!(default_rules().len(), DEFAULT_RULE_ORDER.len());
    }
}
