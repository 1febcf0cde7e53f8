//! Pointer click collaborator.
//!
//! The detector loop fires clicks through the `Clicker` trait so the real
//! pointer can be swapped for a dry-run or test double.

use crate::config::AppConfig;
use anyhow::{anyhow, Result};
use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use rand::Rng;
use tracing::info;

/// Display size assumed when no display can be queried in dummy mode.
pub const FALLBACK_DISPLAY: (i32, i32) = (1920, 1080);

/// Where triggered clicks land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Every click lands on the same point.
    Fixed { x: i32, y: i32 },
    /// Every click draws a fresh point on the display.
    Random { width: i32, height: i32 },
}

impl ClickTarget {
    /// Default fixed target: horizontally centered, 40% down the screen.
    pub fn centered(width: i32, height: i32) -> Self {
        let (x, y) = centered_point(width, height);
        Self::Fixed { x, y }
    }

    /// Coordinates for the next click.
    pub fn next_point(&self, rng: &mut impl Rng) -> (i32, i32) {
        match *self {
            ClickTarget::Fixed { x, y } => (x, y),
            ClickTarget::Random { width, height } => (
                rng.gen_range(0..width.max(1)),
                rng.gen_range(0..height.max(1)),
            ),
        }
    }
}

/// Pick the click target for this run from the CLI flags and display size.
pub fn resolve_target(config: &AppConfig, display: (i32, i32)) -> ClickTarget {
    let (width, height) = display;
    if config.random_target {
        return ClickTarget::Random { width, height };
    }
    let (x, y) = centered_point(width, height);
    ClickTarget::Fixed {
        x: config.click_x.unwrap_or(x),
        y: config.click_y.unwrap_or(y),
    }
}

fn centered_point(width: i32, height: i32) -> (i32, i32) {
    (width / 2, (f64::from(height) * 0.4) as i32)
}

/// Fire-and-forget pointer click at absolute screen coordinates.
pub trait Clicker {
    fn click(&mut self, x: i32, y: i32) -> Result<()>;
}

/// Drives the real pointer through the OS input stack.
pub struct SystemClicker {
    enigo: Enigo,
}

impl SystemClicker {
    pub fn new() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|err| anyhow!("failed to connect to the input stack: {err}"))?;
        Ok(Self { enigo })
    }

    /// Main display dimensions, used to derive the default click target.
    pub fn display_size(&self) -> Result<(i32, i32)> {
        self.enigo
            .main_display()
            .map_err(|err| anyhow!("failed to query display size: {err}"))
    }
}

impl Clicker for SystemClicker {
    fn click(&mut self, x: i32, y: i32) -> Result<()> {
        info!(x, y, "click");
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|err| anyhow!("failed to move pointer to ({x}, {y}): {err}"))?;
        self.enigo
            .button(Button::Left, Direction::Click)
            .map_err(|err| anyhow!("failed to press the left button: {err}"))?;
        Ok(())
    }
}

/// Logs the would-be click and does nothing. Dry-run mode.
#[derive(Debug, Default)]
pub struct DummyClicker;

impl Clicker for DummyClicker {
    fn click(&mut self, x: i32, y: i32) -> Result<()> {
        info!(x, y, "click (dummy mode, not performed)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(args: &[&str]) -> AppConfig {
        let mut argv = vec!["chimeclick"];
        argv.extend_from_slice(args);
        AppConfig::parse_from(argv)
    }

    #[test]
    fn centered_target_halves_width_and_truncates_height() {
        assert_eq!(
            ClickTarget::centered(1920, 1080),
            ClickTarget::Fixed { x: 960, y: 432 }
        );
        // Truncation, not rounding, on the vertical fraction.
        assert_eq!(
            ClickTarget::centered(1279, 1023),
            ClickTarget::Fixed { x: 639, y: 409 }
        );
    }

    #[test]
    fn fixed_target_always_returns_same_point() {
        let target = ClickTarget::Fixed { x: 10, y: 20 };
        let mut rng = rand::thread_rng();
        for _ in 0..4 {
            assert_eq!(target.next_point(&mut rng), (10, 20));
        }
    }

    #[test]
    fn random_target_stays_inside_display() {
        let target = ClickTarget::Random {
            width: 640,
            height: 480,
        };
        let mut rng = rand::thread_rng();
        for _ in 0..64 {
            let (x, y) = target.next_point(&mut rng);
            assert!((0..640).contains(&x));
            assert!((0..480).contains(&y));
        }
    }

    #[test]
    fn resolve_target_defaults_to_centered_fixed() {
        let target = resolve_target(&config(&[]), (1920, 1080));
        assert_eq!(target, ClickTarget::Fixed { x: 960, y: 432 });
    }

    #[test]
    fn resolve_target_honors_explicit_coordinates() {
        let target = resolve_target(&config(&["--click-x", "5"]), (1920, 1080));
        assert_eq!(target, ClickTarget::Fixed { x: 5, y: 432 });
        let target = resolve_target(&config(&["--click-x", "5", "--click-y", "7"]), (1920, 1080));
        assert_eq!(target, ClickTarget::Fixed { x: 5, y: 7 });
    }

    #[test]
    fn resolve_target_random_mode_uses_display_bounds() {
        let target = resolve_target(&config(&["--random-target"]), (800, 600));
        assert_eq!(
            target,
            ClickTarget::Random {
                width: 800,
                height: 600
            }
        );
    }

    #[test]
    fn dummy_clicker_always_succeeds() {
        let mut clicker = DummyClicker;
        assert!(clicker.click(1, 2).is_ok());
    }
}
