use super::LabelSmoother;
use crate::classifier::Action;

/// Switch labels only after the new one holds for `frames` consecutive frames
pub struct Debounce {
    frames: usize,
    current: Option<Action>,
    candidate: Option<Action>,
    streak: usize,
}

impl Debounce {
    /// Require `frames` consecutive frames before switching labels
    #[must_use]
    pub fn new(frames: usize) -> Self {
        Self {
            frames,
            current: None,
            candidate: None,
            streak: 0,
        }
    }
}

impl LabelSmoother for Debounce {
    fn apply(&mut self, action: Action) -> Action {
        let Some(current) = self.current else {
            self.current = Some(action);
            return action;
        };

        if action == current {
            self.candidate = None;
            self.streak = 0;
            return current;
        }

        if self.candidate == Some(action) {
            self.streak += 1;
        } else {
            self.candidate = Some(action);
            self.streak = 1;
        }

        if self.streak >= self.frames {
            self.current = Some(action);
            self.candidate = None;
            self.streak = 0;
            action
        } else {
            current
        }
    }

    fn reset(&mut self) {
        self.current = None;
        self.candidate = None;
        self.streak = 0;
    }

    fn name(&self) -> &str {
        "Debounce"
    }
}
