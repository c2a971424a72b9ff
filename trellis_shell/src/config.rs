// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window configuration.

use kurbo::Rect;
use serde::Deserialize;
use trellis_canvas::Rgba;

use crate::error::Result;

/// Settings for opening a [`Window`](crate::Window).
///
/// Every field has a default, so a RON document only needs the fields it
/// changes:
///
/// ```rust
/// use trellis_shell::WindowConfig;
///
/// let config = WindowConfig::from_ron("(title: \"Sketch\", horizontal_resolution: 1280)").unwrap();
/// assert_eq!(config.title, "Sketch");
/// assert!(!config.fullscreen);
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Title reported by the window's root box.
    pub title: String,
    /// Index of the monitor to open on; out-of-range values are clamped.
    pub monitor: usize,
    /// Cover the whole monitor.
    pub fullscreen: bool,
    /// Requested width in pixels. Values of 100 or less select 800.
    pub horizontal_resolution: u32,
    /// Root background as linear RGBA.
    pub background: [f32; 4],
    /// How often an idle shell polls for pending redraws.
    pub redraw_interval_ms: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: String::from("Main Window"),
            monitor: 0,
            fullscreen: false,
            horizontal_resolution: 800,
            background: [0.5, 0.5, 0.5, 1.0],
            redraw_interval_ms: 30,
        }
    }
}

impl WindowConfig {
    /// Parse a configuration from RON text.
    pub fn from_ron(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    /// The background colour.
    pub fn background(&self) -> Rgba {
        Rgba::from(self.background)
    }

    /// The monitor to open on, clamping the configured index.
    pub fn select_monitor(&self, monitors: &[Rect]) -> Option<Rect> {
        let last = monitors.len().checked_sub(1)?;
        monitors.get(self.monitor.min(last)).copied()
    }

    /// Window bounds on `monitor`, in desktop pixels.
    ///
    /// Fullscreen windows take the whole monitor. Otherwise the width is the
    /// requested resolution (800 when 100 or less) clamped to the monitor,
    /// the height is 9/16 of it clamped likewise, and the window is centred.
    pub fn window_bounds(&self, monitor: Rect) -> Rect {
        if self.fullscreen {
            return monitor;
        }
        let monitor_w = whole_pixels(monitor.width());
        let monitor_h = whole_pixels(monitor.height());
        let requested = if self.horizontal_resolution > 100 {
            self.horizontal_resolution
        } else {
            800
        };
        let width = requested.min(monitor_w);
        let height = ((width / 16) * 9).min(monitor_h);
        let x = monitor.x0 + f64::from((monitor_w - width) / 2);
        let y = monitor.y0 + f64::from((monitor_h - height) / 2);
        Rect::new(x, y, x + f64::from(width), y + f64::from(height))
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Monitor extents are small non-negative pixel counts."
)]
fn whole_pixels(extent: f64) -> u32 {
    if extent > 0.0 { extent as u32 } else { 0 }
}
