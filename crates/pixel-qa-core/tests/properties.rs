//! End-to-end properties of the detection engine on synthetic images.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use pixel_qa_core::domain::{DetectionDetails, FillColor};
use pixel_qa_core::{
    AspectRatio, CompositeDetector, DetectionConfig, Detector, DetectorKind, Preset,
    RatioConfig, RatioDetector,
};
use pixel_qa_test_support::{SyntheticImageBuilder, BLACK, WHITE};

fn engine(preset: Preset) -> CompositeDetector {
    CompositeDetector::new(&DetectionConfig::from_preset(preset)).expect("presets are valid")
}

#[test]
fn clean_image_passes_every_preset() {
    // 4:3 and at least 500px: accepted by every preset's ratio rules.
    let image = SyntheticImageBuilder::gradient(800, 600);
    for preset in Preset::ALL {
        let analysis = engine(preset).analyze_image(&image).expect("analysis");
        assert!(
            !analysis.is_problematic,
            "{preset}: clean image flagged: {:?}",
            analysis.issues().collect::<Vec<_>>()
        );
    }
}

#[test]
fn analysis_is_deterministic() {
    let image = SyntheticImageBuilder::letterboxed_image();
    let engine = engine(Preset::Default);
    let first = engine.analyze_image(&image).expect("first run");
    let second = engine.analyze_image(&image).expect("second run");
    assert_eq!(first, second);
}

#[test]
fn aggregation_matches_results() {
    for image in [
        SyntheticImageBuilder::clean_image(),
        SyntheticImageBuilder::letterboxed_image(),
        SyntheticImageBuilder::blank_image(),
        SyntheticImageBuilder::checkerboard(120, 120),
    ] {
        let analysis = engine(Preset::Default).analyze_image(&image).expect("analysis");
        let any = analysis.detection_results.iter().any(|r| r.is_problematic);
        assert_eq!(analysis.is_problematic, any);
        for result in &analysis.detection_results {
            assert!((0.0..=1.0).contains(&result.confidence));
        }
    }
}

#[test]
fn results_follow_registry_order_and_skip_disabled() {
    let config = DetectionConfig::custom([("DETECTOR_BACKGROUND_ENABLED", "no")]).expect("valid");
    let analysis = CompositeDetector::new(&config)
        .expect("valid")
        .analyze_image(&SyntheticImageBuilder::clean_image())
        .expect("analysis");

    let kinds: Vec<_> = analysis
        .detection_results
        .iter()
        .map(|r| r.detector_name)
        .collect();
    assert_eq!(
        kinds,
        [
            DetectorKind::BorderFill,
            DetectorKind::UniformColor,
            DetectorKind::Ratio
        ]
    );
}

#[test]
fn full_hd_matches_sixteen_by_nine() {
    let detector = RatioDetector::new(RatioConfig {
        tolerance: 0.01,
        target_ratios: vec![AspectRatio::new(16, 9)],
        ..RatioConfig::default()
    });
    let result = detector
        .detect(&SyntheticImageBuilder::solid(1920, 1080, WHITE).buffer)
        .expect("detect");
    assert!(!result.is_problematic);
}

#[test]
fn top_black_band_is_reported() {
    let config = DetectionConfig::custom([
        ("BORDER_FILL_BLACK_FILL_THRESHOLD", "0.05"),
        ("BORDER_FILL_UNIFORMITY_REQUIRED", "0.90"),
    ])
    .expect("valid");
    let image = SyntheticImageBuilder::top_band(200, 100, 10, BLACK);
    let analysis = CompositeDetector::new(&config)
        .expect("valid")
        .analyze_image(&image)
        .expect("analysis");

    let result = analysis.result(DetectorKind::BorderFill).expect("border fill ran");
    let DetectionDetails::BorderFill(details) = &result.details else {
        panic!("expected BorderFillDetails");
    };
    let top = details.top_border.as_ref().expect("top strip checked");
    assert!(top.is_problematic);
    assert_eq!(top.dominant_fill, Some(FillColor::Black));
    assert!((top.black_percentage - 0.10).abs() < 1e-9);
    assert!(analysis.is_problematic);
}

#[test]
fn heavy_letterbox_flagged_by_every_preset() {
    let cases = [
        (SyntheticImageBuilder::letterboxed(400, 400, 80, BLACK), FillColor::Black),
        (SyntheticImageBuilder::letterboxed(600, 600, 200, WHITE), FillColor::White),
    ];
    for (image, fill) in &cases {
        for preset in Preset::ALL {
            let analysis = engine(preset).analyze_image(image).expect("analysis");
            let result = analysis.result(DetectorKind::BorderFill).expect("border fill ran");
            assert!(
                result.is_problematic,
                "{preset}: {fill:?} padding not flagged (confidence {})",
                result.confidence
            );
            assert!((result.confidence - 1.0).abs() < f64::EPSILON, "{preset}");

            let DetectionDetails::BorderFill(details) = &result.details else {
                panic!("expected BorderFillDetails");
            };
            for strip in [&details.top_border, &details.bottom_border] {
                let strip = strip.as_ref().expect("both strips checked");
                assert!(strip.is_problematic, "{preset}: {:?} strip", strip.region);
                assert_eq!(strip.dominant_fill, Some(*fill));
            }
        }
    }
}

#[test]
fn solid_image_is_fully_uniform() {
    let analysis = engine(Preset::Default)
        .analyze_image(&SyntheticImageBuilder::solid(300, 300, [90, 140, 60]))
        .expect("analysis");
    let result = analysis.result(DetectorKind::UniformColor).expect("uniform ran");
    assert!(result.is_problematic);
    assert!((result.confidence - 1.0).abs() < f64::EPSILON);
}

#[test]
fn strict_rejects_tiny_images() {
    let analysis = engine(Preset::Strict)
        .analyze_image(&SyntheticImageBuilder::gradient(40, 40))
        .expect("analysis");
    let result = analysis.result(DetectorKind::Ratio).expect("ratio ran");
    let DetectionDetails::Ratio(details) = &result.details else {
        panic!("expected RatioDetails");
    };
    assert!(!details.dimension_issues.is_empty());
    assert!(result.is_problematic);
    assert!(analysis.is_problematic);
}

#[test]
fn boolean_overrides_follow_truthiness_rules() {
    let mut overrides = HashMap::new();
    overrides.insert("DETECTOR_BORDER_FILL_ENABLED", "yes");
    overrides.insert("DETECTOR_UNIFORM_COLOR_ENABLED", "off");
    overrides.insert("DETECTOR_BACKGROUND_ENABLED", "banana");
    let config = DetectionConfig::custom(&overrides).expect("valid");

    assert!(config.enable_border_fill);
    assert!(!config.enable_uniform_color);
    assert!(config.enable_background);
}

#[test]
fn zero_area_image_fails_with_context() {
    let err = engine(Preset::Default)
        .analyze_image(&SyntheticImageBuilder::empty())
        .expect_err("zero-area image");
    assert_eq!(err.image(), "synthetic://empty");
    assert_eq!(err.detector(), "border_fill");
}

#[test]
fn engine_is_shareable_across_threads() {
    let engine = Arc::new(engine(Preset::Photo));
    let images = [
        SyntheticImageBuilder::clean_image(),
        SyntheticImageBuilder::letterboxed_image(),
        SyntheticImageBuilder::blank_image(),
    ];
    let expected: Vec<_> = images
        .iter()
        .map(|i| engine.analyze_image(i).expect("analysis"))
        .collect();

    let handles: Vec<_> = images
        .into_iter()
        .map(|image| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.analyze_image(&image).expect("analysis"))
        })
        .collect();
    let actual: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(actual, expected);
}
