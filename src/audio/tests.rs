use super::dispatch::{downmix_into, FrameDispatcher};
use crossbeam_channel::bounded;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn downmix_averages_stereo_pairs() {
    let mut buf = Vec::new();
    let samples = [1.0f32, -1.0, 0.5, 0.5];
    downmix_into(&mut buf, &samples, 2, |sample| sample);
    assert_eq!(buf, vec![0.0, 0.5]);
}

#[test]
fn downmix_preserves_mono_input() {
    let mut buf = Vec::new();
    let samples = [0.1f32, 0.2, 0.3];
    downmix_into(&mut buf, &samples, 1, |sample| sample);
    assert_eq!(buf, samples);
}

#[test]
fn downmix_halves_interleaved_stereo_length() {
    // The chunk/2 relationship: a chunk of raw interleaved stereo values
    // decodes to half as many mono samples.
    let chunk = vec![0.25f32; 1024];
    let mut buf = Vec::new();
    downmix_into(&mut buf, &chunk, 2, |sample| sample);
    assert_eq!(buf.len(), 512);
}

#[test]
fn downmix_applies_conversion() {
    let mut buf = Vec::new();
    let samples = [16_384i16, -16_384, 32_767, 32_767];
    downmix_into(&mut buf, &samples, 2, |sample| f32::from(sample) / 32_768.0);
    assert!((buf[0] - 0.0).abs() < 1e-6);
    assert!((buf[1] - 0.99997).abs() < 1e-4);
}

#[test]
fn downmix_averages_trailing_partial_group() {
    let mut buf = Vec::new();
    let samples = [1.0f32, 3.0, 5.0];
    downmix_into(&mut buf, &samples, 2, |sample| sample);
    assert_eq!(buf, vec![2.0, 5.0]);
}

#[test]
fn dispatcher_emits_fixed_size_frames() {
    let (tx, rx) = bounded::<Vec<f32>>(4);
    let dropped = Arc::new(AtomicUsize::new(0));
    let mut dispatcher = FrameDispatcher::new(3, tx, dropped.clone());

    dispatcher.push(&[1.0f32, 2.0], 1, |sample| sample);
    assert!(rx.try_recv().is_err());

    dispatcher.push(&[3.0f32, 4.0], 1, |sample| sample);
    assert_eq!(rx.try_recv().expect("missing frame"), vec![1.0, 2.0, 3.0]);
    assert_eq!(dropped.load(Ordering::Relaxed), 0);
}

#[test]
fn dispatcher_drops_frames_on_full_channel() {
    let (tx, rx) = bounded::<Vec<f32>>(1);
    let dropped = Arc::new(AtomicUsize::new(0));
    let mut dispatcher = FrameDispatcher::new(2, tx, dropped.clone());

    dispatcher.push(&[1.0f32, 2.0, 3.0, 4.0], 1, |sample| sample);

    assert_eq!(rx.try_recv().expect("missing frame"), vec![1.0, 2.0]);
    assert_eq!(dropped.load(Ordering::Relaxed), 1);
}

#[test]
fn dispatcher_downmixes_before_framing() {
    let (tx, rx) = bounded::<Vec<f32>>(4);
    let dropped = Arc::new(AtomicUsize::new(0));
    let mut dispatcher = FrameDispatcher::new(2, tx, dropped);

    dispatcher.push(&[1.0f32, 3.0, -1.0, -3.0, 0.0, 1.0, 2.0, 3.0], 2, |sample| {
        sample
    });

    assert_eq!(rx.try_recv().expect("missing frame"), vec![2.0, -2.0]);
    assert_eq!(rx.try_recv().expect("missing frame"), vec![0.5, 2.5]);
}
