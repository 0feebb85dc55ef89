use std::collections::{BTreeMap, VecDeque};

use super::LabelSmoother;
use crate::classifier::Action;

/// Most frequent action over the last `window_size` frames
pub struct MajorityVote {
    window_size: usize,
    history: VecDeque<Action>,
}

impl MajorityVote {
    /// Vote over the last `window_size` frames
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size,
            history: VecDeque::with_capacity(window_size),
        }
    }

    /// Ties go to whichever tied action was seen most recently
    fn winner(&self) -> Option<Action> {
        let mut counts: BTreeMap<Action, usize> = BTreeMap::new();
        for action in &self.history {
            *counts.entry(*action).or_insert(0) += 1;
        }

        let mut best: Option<(Action, usize)> = None;
        for action in self.history.iter().rev() {
            let count = counts[action];
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((*action, count));
            }
        }
        best.map(|(action, _)| action)
    }
}

impl LabelSmoother for MajorityVote {
    fn apply(&mut self, action: Action) -> Action {
        if self.history.len() >= self.window_size {
            self.history.pop_front();
        }
        self.history.push_back(action);

        self.winner().unwrap_or(action)
    }

    fn reset(&mut self) {
        self.history.clear();
    }

    fn name(&self) -> &str {
        "MajorityVote"
    }
}
