use super::*;

#[test]
fn zero_duration_still_emits_one_frame() {
    assert_eq!(frames_for_secs(0.0, 12.0), 1);
    assert_eq!(frames_for_secs(0.01, 12.0), 1);
    assert_eq!(frames_for_secs(f64::NAN, 12.0), 1);
}

#[test]
fn frame_counts_round_to_nearest() {
    assert_eq!(frames_for_secs(0.35, 12.0), 4);
    assert_eq!(frames_for_secs(1.0, 30.0), 30);
    assert_eq!(frames_for_secs(0.125, 12.0), 2);
}

#[test]
fn half_second_hold_at_ten_fps_is_five_frames() {
    assert_eq!(hold_frames_for_secs(0.5, 10.0), 5);
    assert_eq!(hold_frames_for_secs(0.0, 10.0), 0);
    assert_eq!(hold_frames_for_secs(-1.0, 10.0), 0);
}

#[test]
fn progress_spans_unit_interval() {
    assert_eq!(progress(0, 1), 0.0);
    assert_eq!(progress(0, 5), 0.0);
    assert_eq!(progress(4, 5), 1.0);
    assert_eq!(progress(2, 5), 0.5);
}

#[test]
fn clock_emits_animated_then_hold_frames() {
    let frames: Vec<_> = StepClock::new(FrameIndex(10), 4, 2, Ease::Linear).collect();
    assert_eq!(frames.len(), 6);
    assert_eq!(frames[0].index, FrameIndex(10));
    assert_eq!(frames[5].index, FrameIndex(15));
    assert_eq!(frames[0].t, 0.0);
    assert_eq!(frames[3].t, 1.0);
    assert!(!frames[3].holding);
    assert!(frames[4].holding && frames[5].holding);
    assert_eq!(frames[5].t, 1.0);
}

#[test]
fn clock_progress_is_monotone_within_a_step() {
    let clock = StepClock::new(FrameIndex(0), 9, 3, Ease::Cosine);
    assert_eq!(clock.len(), 12);
    let ts: Vec<f64> = clock.map(|c| c.t).collect();
    assert!(ts.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn clock_never_has_zero_animated_frames() {
    let frames: Vec<_> = StepClock::new(FrameIndex(0), 0, 0, Ease::Cosine).collect();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].u, 0.0);
}
