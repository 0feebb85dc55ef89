//! Action inference from body pose landmarks.
//!
//! This library turns the per-frame output of a pose landmark detector
//! (such as MediaPipe Pose) into a discrete action label:
//! - [`landmarks`] holds the landmark data model and detector adapters
//! - [`classifier`] maps one frame to an [`classifier::Action`] using an
//!   ordered list of geometric rules
//! - [`smoothing`] offers optional caller-side label stabilisation
//! - [`app`] drives a JSON-lines stream of frames through the pipeline
//!
//! Detection itself, video capture and rendering are left to other tools;
//! this crate only consumes landmark coordinates.
//!
//! # Examples
//!
//! ## Classifying a Frame
//!
//! ```
//! use landmark_action::classifier::{Action, ActionClassifier};
//! use landmark_action::landmarks::{BodyPart, FrameLandmarks, Landmark};
//!
//! let classifier = ActionClassifier::default();
//!
//! let mut frame = FrameLandmarks::new();
//! frame.insert(BodyPart::LeftWrist, Landmark::new(0.3, 0.2).with_visibility(0.9));
//! frame.insert(BodyPart::LeftShoulder, Landmark::new(0.3, 0.5).with_visibility(0.9));
//!
//! let result = classifier.classify(&frame);
//! assert_eq!(result.action, Action::RaisingLeftHand);
//! println!("Action: {}", result.label());
//! ```
//!
//! ## Tuning Sensitivity
//!
//! ```
//! use landmark_action::classifier::{Action, ActionClassifier, Sensitivity};
//! use landmark_action::landmarks::{BodyPart, FrameLandmarks, Landmark};
//!
//! // Require the wrist to be well above the shoulder
//! let classifier = ActionClassifier::new(Sensitivity {
//!     confidence_threshold: 0.7,
//!     raise_margin: 0.2,
//! });
//!
//! let frame: FrameLandmarks = [
//!     (BodyPart::RightWrist, Landmark::new(0.7, 0.4).with_visibility(0.95)),
//!     (BodyPart::RightShoulder, Landmark::new(0.7, 0.5).with_visibility(0.95)),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(classifier.classify(&frame).action, Action::Unknown);
//! ```
//!
//! ## Smoothing Labels
//!
//! ```
//! use landmark_action::classifier::Action;
//! use landmark_action::smoothing::create_smoother;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut smoother = create_smoother("majority:3")?;
//!
//! smoother.apply(Action::Standing);
//! smoother.apply(Action::Standing);
//! // A single flickering frame is outvoted
//! assert_eq!(smoother.apply(Action::RaisingLeftHand), Action::Standing);
//! # Ok(())
//! # }
//! ```

/// Landmark data model and detector adapters
pub mod landmarks;

/// Rule-based action classifier
pub mod classifier;

/// Label smoothing across frames
pub mod smoothing;

/// Frame-stream driver
pub mod app;

/// Error types and result handling
pub mod error;

/// Constants used throughout the crate
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
