//! Edge case tests for the classifier, landmark adapters and smoothers


use landmark_action::{
    classifier::{Action, ActionClassifier, Sensitivity},
    landmarks::{BodyPart, FrameLandmarks, Landmark},
    smoothing::create_smoother,
};
use std::sync::Arc;
use std::thread;
use test_helpers::{frame, point, resting_torso};

#[test]
fn test_extreme_coordinates_never_panic() {
    let classifier = ActionClassifier::default();
    let extreme_values = vec![
        (f32::INFINITY, f32::NEG_INFINITY),
        (f32::NEG_INFINITY, f32::INFINITY),
        (f32::NAN, f32::NAN),
        (f32::MAX, f32::MIN),
        (1e30, -1e30),
        (-5.0, 7.0),
    ];

    for (x, y) in extreme_values {
        let mut frame = resting_torso();
        frame.insert(BodyPart::LeftWrist, point(x, y, 0.9));
        frame.insert(BodyPart::LeftShoulder, point(x, y, 0.9));
        // Just ensure classification stays total
        let _ = classifier.classify(&frame);
    }
}

#[test]
fn test_non_finite_landmark_counts_as_missing() {
    let classifier = ActionClassifier::default();

    let mut raised = frame(&[
        (BodyPart::LeftWrist, 0.3, f32::NAN, 0.9),
        (BodyPart::LeftShoulder, 0.3, 0.5, 0.9),
    ]);
    assert_eq!(classifier.classify(&raised).action, Action::Unknown);

    // An infinite shoulder would make any wrist look raised
    raised.insert(BodyPart::LeftWrist, point(0.3, 0.2, 0.9));
    raised.insert(BodyPart::LeftShoulder, point(0.3, f32::INFINITY, 0.9));
    assert_eq!(classifier.classify(&raised).action, Action::Unknown);

    let mut torso = resting_torso();
    torso.insert(BodyPart::RightHip, point(f32::NAN, 0.7, 0.9));
    assert_eq!(classifier.classify(&torso).action, Action::Unknown);
}

#[test]
fn test_out_of_range_but_finite_coordinates_are_compared() {
    // Detectors report off-screen points slightly outside [0, 1]
    let classifier = ActionClassifier::default();
    let frame = frame(&[
        (BodyPart::RightWrist, 0.9, -0.05, 0.8),
        (BodyPart::RightShoulder, 0.8, 0.4, 0.8),
    ]);
    assert_eq!(classifier.classify(&frame).action, Action::RaisingRightHand);
}

#[test]
fn test_threshold_extremes() {
    let mut frame = resting_torso();
    frame.insert(BodyPart::LeftWrist, point(0.6, 0.1, 0.0));

    let permissive = ActionClassifier::new(Sensitivity {
        confidence_threshold: 0.0,
        ..Sensitivity::default()
    });
    assert_eq!(permissive.classify(&frame).action, Action::RaisingLeftHand);

    let strict = ActionClassifier::new(Sensitivity {
        confidence_threshold: 1.0,
        ..Sensitivity::default()
    });
    assert_eq!(strict.classify(&frame).action, Action::Unknown);

    // NaN threshold rejects every landmark instead of panicking
    let broken = ActionClassifier::new(Sensitivity {
        confidence_threshold: f32::NAN,
        ..Sensitivity::default()
    });
    assert_eq!(broken.classify(&frame).action, Action::Unknown);
}

#[test]
fn test_partial_torso_is_unknown() {
    let classifier = ActionClassifier::default();
    let parts = [
        BodyPart::LeftShoulder,
        BodyPart::RightShoulder,
        BodyPart::LeftHip,
        BodyPart::RightHip,
    ];

    for missing in parts {
        let frame: FrameLandmarks = parts
            .iter()
            .filter(|part| **part != missing)
            .map(|&part| (part, Landmark::new(0.5, 0.5)))
            .collect();
        assert_eq!(classifier.classify(&frame).action, Action::Unknown, "missing {missing}");
    }
}

#[test]
fn test_unrelated_landmarks_only() {
    let classifier = ActionClassifier::default();
    let frame = frame(&[
        (BodyPart::Nose, 0.5, 0.1, 0.99),
        (BodyPart::LeftKnee, 0.45, 0.8, 0.9),
        (BodyPart::RightAnkle, 0.55, 0.95, 0.9),
    ]);
    assert_eq!(classifier.classify(&frame).action, Action::Unknown);
}

#[test]
fn test_shared_classifier_across_threads() {
    let classifier = Arc::new(ActionClassifier::default());
    let expected = classifier.classify(&resting_torso());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let classifier = Arc::clone(&classifier);
            thread::spawn(move || {
                let frame = resting_torso();
                (0..100).map(|_| classifier.classify(&frame)).collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for result in handle.join().unwrap() {
            assert_eq!(result, expected);
        }
    }
}

#[test]
fn test_smoother_reset_behavior() {
    for spec in ["majority:3", "debounce:3"] {
        let mut smoother = create_smoother(spec).unwrap();

        smoother.apply(Action::Standing);
        smoother.apply(Action::Standing);
        assert_eq!(smoother.apply(Action::RaisingLeftHand), Action::Standing, "{spec}");

        smoother.reset();
        assert_eq!(smoother.apply(Action::RaisingLeftHand), Action::RaisingLeftHand, "{spec}");
    }
}

#[test]
fn test_pose_rows_with_non_finite_values() {
    let rows = vec![[f32::NAN, 0.5, 0.0, 0.9]; 33];
    let frame = FrameLandmarks::from_pose_rows(&rows).unwrap();

    assert_eq!(frame.len(), 33);
    assert!(!frame.has_pose());
    assert_eq!(ActionClassifier::default().classify(&frame).action, Action::Unknown);
}
