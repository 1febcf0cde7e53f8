use super::AppConfig;
use clap::Parser;

fn parse(args: &[&str]) -> AppConfig {
    let mut argv = vec!["chimeclick"];
    argv.extend_from_slice(args);
    AppConfig::parse_from(argv)
}

#[test]
fn default_config_is_valid() {
    assert!(parse(&[]).validate().is_ok());
}

#[test]
fn rejects_zero_chunk_size() {
    assert!(parse(&["--chunk-size", "0"]).validate().is_err());
    assert!(parse(&["--chunk-size", "1"]).validate().is_err());
    assert!(parse(&["--chunk-size", "2"]).validate().is_ok());
}

#[test]
fn rejects_zero_sample_rate() {
    assert!(parse(&["--sample-rate", "0"]).validate().is_err());
}

#[test]
fn rejects_zero_channels() {
    assert!(parse(&["--channels", "0"]).validate().is_err());
}

#[test]
fn rejects_non_positive_refresh_time() {
    assert!(parse(&["--refresh-time-s", "0"]).validate().is_err());
    assert!(parse(&["--refresh-time-s", "-1.0"]).validate().is_err());
}

#[test]
fn rejects_zero_ambient_mem() {
    assert!(parse(&["--ambient-mem", "0"]).validate().is_err());
    assert!(parse(&["--ambient-mem", "1"]).validate().is_ok());
}

#[test]
fn rejects_burst_fraction_out_of_range() {
    assert!(parse(&["--burst-fraction", "1.5"]).validate().is_err());
    assert!(parse(&["--burst-fraction", "-0.1"]).validate().is_err());
    assert!(parse(&["--burst-fraction", "0.0"]).validate().is_ok());
    assert!(parse(&["--burst-fraction", "1.0"]).validate().is_ok());
}

#[test]
fn rejects_negative_debounce() {
    assert!(parse(&["--click-debounce-s", "-0.5"]).validate().is_err());
    assert!(parse(&["--click-debounce-s", "0"]).validate().is_ok());
}

#[test]
fn rejects_channel_capacity_out_of_bounds() {
    assert!(parse(&["--channel-capacity", "4"]).validate().is_err());
    assert!(parse(&["--channel-capacity", "2048"]).validate().is_err());
    assert!(parse(&["--channel-capacity", "8"]).validate().is_ok());
}

#[test]
fn rejects_fixed_coordinates_with_random_target() {
    let cfg = parse(&["--random-target", "--click-x", "10"]);
    assert!(cfg.validate().is_err());
    assert!(parse(&["--random-target"]).validate().is_ok());
    assert!(parse(&["--click-x", "10", "--click-y", "20"]).validate().is_ok());
}

#[test]
fn rejects_refresh_window_shorter_than_one_chunk() {
    // 0.01s at 44100 Hz holds 441 samples, less than one 1024-sample chunk.
    assert!(parse(&["--refresh-time-s", "0.01"]).validate().is_err());
}

#[test]
fn detector_config_mirrors_cli_values() {
    let cfg = parse(&[
        "--chunk-size",
        "2048",
        "--sample-rate",
        "48000",
        "--burst-fraction",
        "0.1",
        "--ambient-mem",
        "3",
    ]);
    let detector = cfg.detector_config();
    assert_eq!(detector.chunk_size, 2048);
    assert_eq!(detector.sample_rate, 48_000);
    assert_eq!(detector.ambient_mem, 3);
    assert!((detector.burst_fraction - 0.1).abs() < 1e-12);
}

#[test]
fn default_geometry_derives_frames_and_threshold() {
    let detector = parse(&[]).detector_config();
    assert_eq!(detector.frame_size(), 512);
    assert_eq!(detector.frames_per_window(), 430);
    assert!((detector.burst_threshold() - 1024.0 * 0.3).abs() < 1e-3);
}
