//! Frame-stream driver: the loop that sits between a landmark detector and
//! whatever displays the labels.
//!
//! Input is JSON lines, one frame per line, in either of two shapes:
//!
//! ```text
//! {"frame": 7, "landmarks": {"left_wrist": {"x": 0.3, "y": 0.2, "visibility": 0.9}, ...}}
//! {"frame": 8, "pose": [[0.51, 0.12, -0.3, 0.99], ...]}
//! ```
//!
//! `frame` is optional; when absent the frame's position in the stream is
//! used. Every non-blank line produces exactly one output record.

use crate::{
    classifier::{Action, ActionClassifier, Trigger},
    config::Config,
    landmarks::{BodyPart, FrameLandmarks, Landmark},
    smoothing::LabelSmoother,
    Error, Result,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// Where frames are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Standard input
    Stdin,
    /// JSON-lines file
    File(PathBuf),
}

/// How results are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `frame <n>: <label>`
    #[default]
    Text,
    /// One JSON object per frame
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" | "jsonl" => Ok(Self::Json),
            _ => Err(Error::InvalidInput(format!("Unknown output format: {s}"))),
        }
    }
}

/// One line of detector output
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FrameRecord {
    Named {
        #[serde(default)]
        frame: Option<u64>,
        landmarks: BTreeMap<String, Landmark>,
    },
    Indexed {
        #[serde(default)]
        frame: Option<u64>,
        pose: Vec<Vec<f32>>,
    },
}

/// Parse one JSON line into a frame index (if given) and its landmarks
///
/// Named landmarks outside the pose topology (hand or face points from a
/// holistic detector, say) are skipped.
///
/// # Errors
///
/// Returns an error if the line is not a recognised frame record or an
/// indexed pose has the wrong shape.
pub fn parse_frame_record(line: &str) -> Result<(Option<u64>, FrameLandmarks)> {
    match serde_json::from_str::<FrameRecord>(line)? {
        FrameRecord::Named { frame, landmarks } => Ok((frame, pose_landmarks(landmarks))),
        FrameRecord::Indexed { frame, pose } => Ok((frame, FrameLandmarks::from_pose_rows(&pose)?)),
    }
}

fn pose_landmarks(entries: BTreeMap<String, Landmark>) -> FrameLandmarks {
    let mut frame = FrameLandmarks::new();
    for (name, landmark) in entries {
        match name.parse::<BodyPart>() {
            Ok(part) => {
                frame.insert(part, landmark);
            }
            Err(_) => debug!("Skipping unknown landmark: {}", name),
        }
    }
    frame
}

/// Best-effort `frame` index from a line that failed to parse as a record
fn recover_frame_index(line: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(line).ok()?.get("frame")?.as_u64()
}

/// Result for one frame as handed to the display layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameOutput {
    /// Frame index
    pub frame: u64,
    /// Smoothed action
    pub action: Action,
    /// Display label of the smoothed action
    pub label: &'static str,
    /// Action before smoothing
    pub raw: Action,
    /// Whether any usable landmark was present
    pub pose_detected: bool,
    /// Justification of the raw action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Trigger>,
}

impl FrameOutput {
    fn render_text(&self) -> String {
        if self.pose_detected {
            format!("frame {}: {}", self.frame, self.label)
        } else {
            format!("frame {}: {} (no pose detected)", self.frame, self.label)
        }
    }
}

/// Totals for a processed stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames classified, malformed ones included
    pub frames: u64,
    /// Lines that could not be parsed
    pub malformed: u64,
    /// Frames per smoothed action
    pub counts: BTreeMap<Action, u64>,
}

/// Classifies a stream of landmark frames
pub struct ActionApp {
    classifier: ActionClassifier,
    smoother: Box<dyn LabelSmoother>,
    format: OutputFormat,
    summary: RunSummary,
}

impl ActionApp {
    /// Create the driver from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration names an unknown rule or smoother
    pub fn new(config: &Config, format: OutputFormat) -> Result<Self> {
        info!("Initializing action classifier");
        let classifier = config.create_classifier()?;
        let smoother = config.create_smoother()?;

        info!(
            "Rules: {:?}, confidence threshold {}, raise margin {}",
            classifier.rule_names(),
            classifier.sensitivity().confidence_threshold,
            classifier.sensitivity().raise_margin
        );
        info!("Label smoothing: {}", smoother.name());

        Ok(Self {
            classifier,
            smoother,
            format,
            summary: RunSummary::default(),
        })
    }

    /// Classify one frame and push the result through the smoother
    pub fn process_frame(&mut self, frame_index: u64, frame: &FrameLandmarks) -> FrameOutput {
        let result = self.classifier.classify(frame);
        let action = self.smoother.apply(result.action);

        debug!(
            "Frame {}: {} landmarks, raw {}, smoothed {}",
            frame_index,
            frame.len(),
            result.action.name(),
            action.name()
        );

        self.summary.frames += 1;
        *self.summary.counts.entry(action).or_insert(0) += 1;

        FrameOutput {
            frame: frame_index,
            action,
            label: action.label(),
            raw: result.action,
            pose_detected: frame.has_pose(),
            trigger: result.trigger,
        }
    }

    /// Parse and classify one input line; blank lines yield `None`.
    ///
    /// A malformed line is still classified, as an empty frame.
    pub fn process_line(&mut self, line: &str, position: u64) -> Option<FrameOutput> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let (frame_index, landmarks) = match parse_frame_record(trimmed) {
            Ok((frame, landmarks)) => (frame.unwrap_or(position), landmarks),
            Err(e) => {
                warn!("Malformed frame record at position {}: {}", position, e);
                self.summary.malformed += 1;
                (recover_frame_index(trimmed).unwrap_or(position), FrameLandmarks::new())
            }
        };

        Some(self.process_frame(frame_index, &landmarks))
    }

    /// Read every frame from `reader` and write one result per frame to `writer`
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails
    pub fn run<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> Result<RunSummary> {
        info!("Starting frame processing");

        let mut frame_count = 0;
        for line in reader.lines() {
            let line = line?;
            let Some(output) = self.process_line(&line, frame_count) else {
                continue;
            };
            frame_count += 1;

            match self.format {
                OutputFormat::Text => writeln!(writer, "{}", output.render_text())?,
                OutputFormat::Json => {
                    serde_json::to_writer(&mut writer, &output)?;
                    writeln!(writer)?;
                }
            }
        }
        writer.flush()?;

        info!(
            "Processed {} frames ({} malformed)",
            self.summary.frames, self.summary.malformed
        );
        for (action, count) in &self.summary.counts {
            info!("  {}: {}", action.label(), count);
        }

        Ok(self.summary.clone())
    }

    /// Totals so far
    #[must_use]
    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Clear smoother state and totals
    pub fn reset(&mut self) {
        self.smoother.reset();
        self.summary = RunSummary::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_record() {
        let (frame, landmarks) =
            parse_frame_record(r#"{"frame": 4, "landmarks": {"nose": {"x": 0.5, "y": 0.1}}}"#).unwrap();
        assert_eq!(frame, Some(4));
        assert!(landmarks.get(BodyPart::Nose).is_some());
    }

    #[test]
    fn test_parse_indexed_record() {
        let (frame, landmarks) = parse_frame_record(r#"{"pose": [[0.5, 0.1, 0.0, 0.9], [0.4, 0.1]]}"#).unwrap();
        assert_eq!(frame, None);
        assert_eq!(landmarks.len(), 2);
        assert_eq!(landmarks.get(BodyPart::Nose).unwrap().visibility, Some(0.9));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_frame_record("not json").is_err());
        assert!(parse_frame_record(r#"{"frame": 1}"#).is_err());
        assert!(parse_frame_record(r#"{"landmarks": {"nose": {"x": "high"}}}"#).is_err());
        assert!(parse_frame_record(r#"{"pose": [[0.1]]}"#).is_err());
    }

    #[test]
    fn test_parse_skips_unknown_landmark_names() {
        let (frame, landmarks) = parse_frame_record(
            r#"{"frame": 2, "landmarks": {"nose": {"x": 0.5, "y": 0.1}, "tail": {"x": 0.1, "y": 0.9}}}"#,
        )
        .unwrap();
        assert_eq!(frame, Some(2));
        assert_eq!(landmarks.len(), 1);
        assert!(landmarks.get(BodyPart::Nose).is_some());
    }

    #[test]
    fn test_malformed_line_keeps_frame_index() {
        let mut app = ActionApp::new(&Config::default(), OutputFormat::Text).unwrap();

        let output = app.process_line(r#"{"frame": 42, "pose": "missing"}"#, 0).unwrap();
        assert_eq!(output.frame, 42);
        assert_eq!(output.action, Action::Unknown);
        assert_eq!(app.summary().malformed, 1);
    }

    #[test]
    fn test_reset_clears_summary_and_smoother() {
        let mut config = Config::default();
        config.smoothing.method = "debounce".to_string();
        config.smoothing.window = 3;
        let mut app = ActionApp::new(&config, OutputFormat::Text).unwrap();

        let standing = r#"{"landmarks": {"left_shoulder": {"x": 0.6, "y": 0.3}, "right_shoulder": {"x": 0.4, "y": 0.3},
                           "left_hip": {"x": 0.6, "y": 0.7}, "right_hip": {"x": 0.4, "y": 0.7}}}"#;
        assert_eq!(app.process_line(standing, 0).unwrap().action, Action::Standing);
        assert_eq!(app.process_line("{}", 1).unwrap().action, Action::Standing);
        assert_eq!(app.summary().frames, 2);

        app.reset();
        assert_eq!(app.summary(), &RunSummary::default());
        // Debounce forgot the standing label, so the first frame passes through
        assert_eq!(app.process_line("{}", 2).unwrap().action, Action::Unknown);
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_malformed_line_counts_as_unknown() {
        let mut app = ActionApp::new(&Config::default(), OutputFormat::Text).unwrap();

        assert!(app.process_line("   ", 0).is_none());

        let output = app.process_line("{broken", 3).unwrap();
        assert_eq!(output.frame, 3);
        assert_eq!(output.action, Action::Unknown);
        assert!(!output.pose_detected);
        assert_eq!(app.summary().malformed, 1);
        assert_eq!(app.summary().frames, 1);
    }
}
