pub mod audio;
pub mod click;
pub mod config;
pub mod detector;
pub mod telemetry;

pub use click::{ClickTarget, Clicker, DummyClicker, SystemClicker};
pub use config::AppConfig;
pub use detector::{detect_from_pcm, run_live, DetectionSummary, Detector, DetectorConfig};
