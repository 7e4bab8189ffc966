use crate::classifier::core::{Msg, Status};
use crate::classifier::tests::fixture::{
    solid_frame, FeatureExtractorFailing, Fixture, BLUE, GREEN, RED, YELLOW,
};
use crate::device_display::interface::DisplaySurface;
use crate::device_input::interface::Command;
use crate::library::logger::interface::Level;
use image::DynamicImage;
use std::time::{Duration, Instant};

fn train_all_classes(f: &mut Fixture) {
    f.add_example(0, RED);
    f.add_example(1, GREEN);
    f.add_example(2, BLUE);
    f.add_example(3, YELLOW);
}

#[test]
fn test_tick_before_any_example_writes_nothing() {
    let mut f = Fixture::new();

    f.app.dispatch(Msg::Tick(Instant::now())).unwrap();

    assert_eq!(f.app.model().prediction, None);
    for surface in DisplaySurface::ALL {
        assert_eq!(f.device_display.write_count(surface), 0);
    }
}

#[test]
fn test_trained_classes_are_predicted() {
    let mut f = Fixture::new();
    f.add_example(0, RED);
    f.add_example(0, RED);
    f.add_example(0, RED);
    f.add_example(1, GREEN);

    f.device_camera.set_frame(solid_frame(RED));
    f.app.dispatch(Msg::Tick(Instant::now())).unwrap();

    let prediction = f.app.model().prediction.clone().unwrap();
    assert_eq!(prediction.class_index, 0);
    assert_eq!(prediction.top_confidence(), 0.75);
    assert_eq!(
        f.device_display.text(DisplaySurface::Certainty).as_deref(),
        Some("PREDICTION CERTAINTY: HIGH_CERTAINTY")
    );
    assert_eq!(
        f.device_display.text(DisplaySurface::Predictions).as_deref(),
        Some("Top Prediction: A\nTop prediction's probability: 0.75\nClass A: 0.75\nClass B: 0.25")
    );
}

#[test]
fn test_out_of_order_example_is_dropped() {
    let mut f = Fixture::new();

    f.add_example(2, BLUE);

    assert_eq!(f.app.model().frontier, 0);
    assert_eq!(f.app.knn_classifier().num_examples(), 0);
    assert_eq!(f.app.model().error, None);
}

#[test]
fn test_frontier_follows_store() {
    let mut f = Fixture::new();

    f.add_example(0, RED);
    f.add_example(1, GREEN);
    f.add_example(0, RED);

    assert_eq!(f.app.model().frontier, 2);
    assert_eq!(f.app.knn_classifier().num_classes(), 2);
    assert_eq!(f.app.knn_classifier().num_examples(), 3);
}

#[test]
fn test_no_action_images_are_sampled() {
    let mut f = Fixture::new();
    train_all_classes(&mut f);

    f.device_camera.set_frame(solid_frame([40, 40, 40]));
    let now = Instant::now() + Duration::from_millis(1200);
    f.app.dispatch(Msg::Tick(now)).unwrap();

    let model = f.app.model();
    assert_eq!(model.no_action.sample_count, 1);
    assert_eq!(model.no_action.last_sample_time, now);
    assert_eq!(f.app.knn_classifier().num_classes(), 5);
    assert_eq!(
        f.device_display.text(DisplaySurface::NoActionStatus).as_deref(),
        Some("Number of no-action images: 1\nIs the system actively adding No-action images? Yes")
    );

    // too soon for another one
    f.app
        .dispatch(Msg::Tick(now + Duration::from_millis(10)))
        .unwrap();
    assert_eq!(f.app.model().no_action.sample_count, 1);
}

#[test]
fn test_toggled_off_sampler_adds_nothing() {
    let mut f = Fixture::new();
    train_all_classes(&mut f);

    f.app.dispatch(Msg::ToggleNoActionSampling).unwrap();
    f.app
        .dispatch(Msg::Tick(Instant::now() + Duration::from_millis(1200)))
        .unwrap();

    assert_eq!(f.app.model().no_action.sample_count, 0);
    assert_eq!(f.app.knn_classifier().num_examples(), 4);
    assert_eq!(
        f.device_display.text(DisplaySurface::NoActionStatus).as_deref(),
        Some("Number of no-action images: 0\nIs the system actively adding No-action images? No")
    );
}

#[test]
fn test_extractor_failure_is_reported() {
    let mut f = Fixture::with_feature_extractor(Box::new(FeatureExtractorFailing));

    f.add_example(0, RED);

    assert_eq!(f.app.model().frontier, 0);
    assert_eq!(f.app.model().error.as_deref(), Some("model not loaded"));
    assert_eq!(
        f.device_display.text(DisplaySurface::Predictions).as_deref(),
        Some("Error: model not loaded")
    );
    assert_eq!(f.logger.count(Level::Error), 1);
}

#[test]
fn test_failed_tick_clears_certainty() {
    let mut f = Fixture::new();
    f.add_example(0, RED);

    f.device_camera.set_frame(solid_frame(RED));
    f.app.dispatch(Msg::Tick(Instant::now())).unwrap();
    assert_eq!(
        f.device_display.text(DisplaySurface::Certainty).as_deref(),
        Some("PREDICTION CERTAINTY: SUPER_CERTAIN")
    );

    f.device_camera.set_frame(DynamicImage::new_rgb8(0, 0));
    f.app.dispatch(Msg::Tick(Instant::now())).unwrap();

    assert_eq!(
        f.device_display.text(DisplaySurface::Predictions).as_deref(),
        Some("Error: Cannot extract features from an empty frame")
    );
    assert_eq!(
        f.device_display.text(DisplaySurface::Certainty).as_deref(),
        Some("PREDICTION CERTAINTY: ")
    );
}

#[test]
fn test_camera_failure_aborts_run() {
    let mut f = Fixture::new();
    f.device_camera.set_fail_start(true);

    assert!(f.app.run().is_err());
}

#[test]
fn test_run_handles_commands_until_quit() {
    let mut f = Fixture::new();
    f.device_camera.set_frame(solid_frame(RED));

    f.commands.send(Command::AddExample(0)).unwrap();
    f.commands.send(Command::AddExample(2)).unwrap();
    f.commands.send(Command::AddExample(1)).unwrap();
    f.commands.send(Command::ToggleNoActionSampling).unwrap();
    f.commands.send(Command::Quit).unwrap();

    f.app.run().unwrap();

    let model = f.app.model();
    assert_eq!(model.status, Status::Stopped);
    assert_eq!(model.frontier, 2);
    assert!(!model.no_action.enabled);
    assert_eq!(f.app.knn_classifier().num_examples(), 2);
}
