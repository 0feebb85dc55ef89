//! Caller-side temporal smoothing of action labels.
//!
//! The classifier judges every frame on its own, so its output can flicker
//! when a wrist hovers near shoulder height. These smoothers sit after the
//! classifier and stabilise the label stream without touching the
//! classifier itself.

/// Majority vote over a sliding window
pub mod majority;

/// Debounce that requires a label to persist before switching
pub mod debounce;

use crate::{
    classifier::Action,
    constants::{DEFAULT_DEBOUNCE_FRAMES, DEFAULT_MAJORITY_WINDOW},
    Error, Result,
};

/// Trait for all label smoothers
pub trait LabelSmoother: Send + Sync {
    /// Feed the newest frame's action and get the smoothed action
    fn apply(&mut self, action: Action) -> Action;

    /// Reset smoother state
    fn reset(&mut self);

    /// Get smoother name
    fn name(&self) -> &str;
}

/// Pass-through smoother
pub struct NoSmoothing;

impl LabelSmoother for NoSmoothing {
    fn apply(&mut self, action: Action) -> Action {
        action
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoSmoothing"
    }
}

/// Smoother families understood by [`create_smoother`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmootherKind {
    /// Pass-through
    None,
    /// Majority vote over a window
    Majority,
    /// Consecutive-frame debounce
    Debounce,
}

impl SmootherKind {
    /// Canonical config name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SmootherKind::None => "none",
            SmootherKind::Majority => "majority",
            SmootherKind::Debounce => "debounce",
        }
    }

    /// Whether the kind uses the window/frame-count parameter
    #[must_use]
    pub const fn takes_window(self) -> bool {
        !matches!(self, SmootherKind::None)
    }
}

/// Parsed form of a smoother spec such as `majority:7`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmootherSpec {
    /// Smoother family
    pub kind: SmootherKind,
    /// Explicit window, if the spec carried one
    pub window: Option<usize>,
}

/// Parse a smoother spec without building the smoother
///
/// # Errors
///
/// Returns an error for unknown smoother names and for parameters that are
/// not positive integers.
pub fn parse_smoother_spec(spec: &str) -> Result<SmootherSpec> {
    let lowered = spec.to_lowercase();
    let mut parts = lowered.split(':');
    let name = parts.next().unwrap_or_default();
    let param = parts.next();

    if parts.next().is_some() {
        return Err(Error::SmoothingError(format!("Too many parameters: {spec}")));
    }

    match name {
        "none" | "nosmoothing" => match param {
            None => Ok(SmootherSpec {
                kind: SmootherKind::None,
                window: None,
            }),
            Some(_) => Err(Error::SmoothingError("'none' takes no parameters".to_string())),
        },
        "majority" | "majority_vote" => Ok(SmootherSpec {
            kind: SmootherKind::Majority,
            window: parse_count(param, "Window size")?,
        }),
        "debounce" => Ok(SmootherSpec {
            kind: SmootherKind::Debounce,
            window: parse_count(param, "Frame count")?,
        }),
        _ => Err(Error::SmoothingError(format!("Unknown smoother type: {spec}"))),
    }
}

/// Create a smoother from a spec such as `none`, `majority:7` or `debounce:3`
///
/// # Errors
///
/// Returns an error for unknown smoother names and for parameters that are
/// not positive integers.
pub fn create_smoother(spec: &str) -> Result<Box<dyn LabelSmoother>> {
    let parsed = parse_smoother_spec(spec)?;
    match parsed.kind {
        SmootherKind::None => Ok(Box::new(NoSmoothing)),
        SmootherKind::Majority => Ok(Box::new(majority::MajorityVote::new(
            parsed.window.unwrap_or(DEFAULT_MAJORITY_WINDOW),
        ))),
        SmootherKind::Debounce => Ok(Box::new(debounce::Debounce::new(
            parsed.window.unwrap_or(DEFAULT_DEBOUNCE_FRAMES),
        ))),
    }
}

fn parse_count(param: Option<&str>, what: &str) -> Result<Option<usize>> {
    let Some(raw) = param else {
        return Ok(None);
    };

    let value = raw
        .trim()
        .parse::<usize>()
        .map_err(|_| Error::SmoothingError(format!("{what} must be a positive integer, got '{raw}'")))?;

    if value == 0 {
        return Err(Error::SmoothingError(format!("{what} must be greater than 0")));
    }
    Ok(Some(value))
}
