use glint_sweep::detect::MIN_SEPARATION;
use glint_sweep::{analyze_frame, DetectionKind, FrameAnalyzer, RgbaFrame, ScanMode};

fn dark_frame(width: u32, height: u32) -> RgbaFrame {
    RgbaFrame::filled(width, height, [12, 12, 16])
}

fn with_spot(mut frame: RgbaFrame, x: u32, y: u32, level: u8) -> RgbaFrame {
    frame.set_pixel(x, y, [level, level, level, 255]);
    frame
}

/// A scattered field of glints at assorted levels on the sampling grid.
fn busy_frame() -> RgbaFrame {
    let mut frame = dark_frame(96, 96);
    let spots = [
        (0, 0, 255),
        (4, 4, 250),
        (8, 0, 245),
        (24, 8, 230),
        (28, 12, 241),
        (40, 40, 210),
        (44, 44, 205),
        (60, 20, 255),
        (64, 24, 225),
        (88, 88, 201),
        (92, 84, 222),
        (48, 72, 239),
    ];
    for (x, y, level) in spots {
        frame.set_pixel(x, y, [level, level, level, 255]);
    }
    frame
}

#[test]
fn all_black_basic_frame_is_clear() {
    let frame = RgbaFrame::filled(4, 4, [0, 0, 0]);
    let result = analyze_frame(frame.pixels(), 4, 4, ScanMode::Basic);

    assert!(result.detections.is_empty());
    assert_eq!(result.confidence, 0.0);
    assert!(!result.optical_detection);
    assert!(!result.ir_detection);

    let json = serde_json::to_value(&result).expect("serialize");
    assert_eq!(json["scanMode"], "basic");
    assert_eq!(json["opticalDetection"], false);
}

#[test]
fn single_saturated_pixel_in_ir_mode() {
    let frame = with_spot(dark_frame(16, 16), 8, 8, 255);
    let result = analyze_frame(frame.pixels(), 16, 16, ScanMode::Ir);

    assert_eq!(result.detections.len(), 1);
    let detection = &result.detections[0];
    assert_eq!(detection.kind, DetectionKind::Ir);
    assert_eq!((detection.location.x, detection.location.y), (8, 8));
    assert_eq!((detection.location.width, detection.location.height), (20, 20));
    assert_eq!(detection.confidence, 1.0);
    assert!(result.ir_detection);
    assert!(!result.optical_detection);
    assert_eq!(result.confidence, 1.0);
}

#[test]
fn two_distant_clusters_in_advanced_mode() {
    let mut frame = dark_frame(64, 16);
    // First cluster: a dimmer glint with a neighbour on the grid.
    frame.set_pixel(4, 4, [240, 240, 240, 255]);
    frame.set_pixel(8, 4, [230, 230, 230, 255]);
    // Second cluster, 36 px away.
    frame.set_pixel(40, 4, [255, 255, 255, 255]);

    let result = analyze_frame(frame.pixels(), 64, 16, ScanMode::Advanced);

    assert_eq!(result.detections.len(), 2);
    assert!(result
        .detections
        .iter()
        .all(|d| d.kind == DetectionKind::Camera));

    let first = &result.detections[0];
    assert_eq!((first.location.x, first.location.y), (4, 4));
    assert!((first.confidence - 20.0 / 35.0).abs() < 1e-6);

    let second = &result.detections[1];
    assert_eq!((second.location.x, second.location.y), (40, 4));
    assert_eq!(second.confidence, 1.0);

    assert!(result.optical_detection);
    assert_eq!(result.confidence, 1.0);
}

#[test]
fn off_grid_pixels_are_never_sampled() {
    let frame = with_spot(dark_frame(16, 16), 5, 6, 255);
    let result = analyze_frame(frame.pixels(), 16, 16, ScanMode::Ir);
    assert!(result.is_clear());
}

#[test]
fn threshold_must_be_strictly_exceeded() {
    for mode in ScanMode::ALL {
        let at = with_spot(dark_frame(8, 8), 4, 4, mode.threshold());
        assert!(analyze_frame(at.pixels(), 8, 8, mode).is_clear(), "{mode}");

        let above = with_spot(dark_frame(8, 8), 4, 4, mode.threshold() + 1);
        let result = analyze_frame(above.pixels(), 8, 8, mode);
        assert_eq!(result.detections.len(), 1, "{mode}");
        assert!(result.detections[0].confidence > 0.0);
    }
}

#[test]
fn clear_in_looser_mode_is_clear_in_stricter_modes() {
    assert!(ScanMode::Basic.threshold() >= ScanMode::Advanced.threshold());
    assert!(ScanMode::Advanced.threshold() >= ScanMode::Ir.threshold());

    for level in 0..=255u8 {
        let frame = with_spot(dark_frame(16, 16), 4, 8, level);
        let counts: Vec<usize> = [ScanMode::Basic, ScanMode::Advanced, ScanMode::Ir]
            .iter()
            .map(|&mode| analyze_frame(frame.pixels(), 16, 16, mode).detections.len())
            .collect();
        assert!(
            counts[0] <= counts[1] && counts[1] <= counts[2],
            "level {level}: basic/advanced/ir counts {counts:?}"
        );
        let expected_ir = usize::from(level > ScanMode::Ir.threshold());
        assert_eq!(counts[2], expected_ir, "level {level}");
    }
}

#[test]
fn analysis_is_idempotent_apart_from_timestamp() {
    let frame = busy_frame();
    for mode in ScanMode::ALL {
        let a = analyze_frame(frame.pixels(), frame.width, frame.height, mode);
        let b = analyze_frame(frame.pixels(), frame.width, frame.height, mode);
        assert!(a.same_findings(&b), "{mode}");
    }
}

#[test]
fn detections_keep_their_distance() {
    let frame = busy_frame();
    for mode in ScanMode::ALL {
        let result = analyze_frame(frame.pixels(), frame.width, frame.height, mode);
        for (i, a) in result.detections.iter().enumerate() {
            for b in &result.detections[i + 1..] {
                let distance = a.location.distance_to(b.location.x, b.location.y);
                assert!(
                    distance >= MIN_SEPARATION,
                    "{mode}: {:?} and {:?} are {distance} px apart",
                    a.location,
                    b.location
                );
            }
        }
    }
}

#[test]
fn confidences_are_bounded_and_top_level_is_max() {
    let frame = busy_frame();
    for mode in ScanMode::ALL {
        let result = analyze_frame(frame.pixels(), frame.width, frame.height, mode);
        assert!(!result.detections.is_empty(), "{mode}");
        for detection in &result.detections {
            assert!(detection.confidence > 0.0 && detection.confidence <= 1.0);
        }
        let max = result
            .detections
            .iter()
            .map(|d| d.confidence)
            .fold(0.0_f32, f32::max);
        assert_eq!(result.confidence, max);
    }
}

#[test]
fn malformed_buffer_degrades_to_clear_result() {
    let mut analyzer = FrameAnalyzer::new();
    let short = vec![255u8; 10];
    let result = analyzer.analyze(&short, 4, 4, ScanMode::Advanced);
    assert!(result.is_clear());
    assert_eq!(result.scan_mode, ScanMode::Advanced);
    assert_eq!(analyzer.failures(), 1);
    assert_eq!(analyzer.frames_analyzed(), 1);
}

#[test]
fn zero_sized_frame_is_clear() {
    let result = analyze_frame(&[], 0, 0, ScanMode::Basic);
    assert!(result.is_clear());
}
