#![forbid(unsafe_code)]

//! Page agent configuration.
//!
//! # Defaults
//!
//! | Setting | Default | Range | Description |
//! |---------|---------|-------|-------------|
//! | `style` | `spatial` | `spatial`, `linear` | Navigation variant |
//! | `spatial.epsilon` | 4px | 0-32px | Directional tolerance |
//! | `spatial.axis_weight` | 1000 | ≥ 1 | Primary-axis multiplier |
//! | `spatial.row_band_ratio` | 0.6 | 0.1-2.0 | Same-row band, in card heights |
//! | `scroll_margin` | 40px | ≥ 0 | Keep-visible margin before scrolling |
//! | `seek_step_secs` | 5s | 0.5-120s | Seek command step |
//! | `toast_duration_ms` | 1500ms | 250-10000ms | Toast auto-hide |
//!
//! Every field is optional in JSON; missing fields take the default and the
//! result is passed through [`NavConfig::validated`].
//!
//! # Example
//!
//! ```
//! use tubenav_agent::config::{NavConfig, NavStyle};
//!
//! let config = NavConfig::from_json(r#"{ "style": "linear", "seek_step_secs": 10 }"#).unwrap();
//! assert_eq!(config.style, NavStyle::Linear);
//! assert_eq!(config.seek_step_secs, 10.0);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tubenav_core::keybinding::KeyBindings;

use crate::spatial::SpatialParams;

/// Navigation variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavStyle {
    /// Directional keys move by geometry; always active.
    #[default]
    Spatial,
    /// A toggled mode where keys step through cards in document order.
    Linear,
}

/// Inline style applied to the selected card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Emphasis {
    pub box_shadow: String,
    pub border_radius: String,
    pub background: String,
}

impl Default for Emphasis {
    fn default() -> Self {
        Self {
            box_shadow: "0 0 0 3px #3ea6ff".to_string(),
            border_radius: "12px".to_string(),
            background: "rgba(62, 166, 255, 0.15)".to_string(),
        }
    }
}

impl Emphasis {
    /// CSS properties the highlight touches.
    pub const PROPERTY_NAMES: [&'static str; 3] = ["box-shadow", "border-radius", "background"];

    /// `(property, value)` pairs, in application order.
    pub fn properties(&self) -> [(&'static str, &str); 3] {
        let [shadow, radius, background] = Self::PROPERTY_NAMES;
        [
            (shadow, self.box_shadow.as_str()),
            (radius, self.border_radius.as_str()),
            (background, self.background.as_str()),
        ]
    }
}

/// Page agent settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub style: NavStyle,
    pub bindings: KeyBindings,
    pub emphasis: Emphasis,
    pub spatial: SpatialParams,
    pub scroll_margin: f64,
    pub seek_step_secs: f64,
    pub toast_duration_ms: u64,
    pub site_origin: String,
    pub home_path: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            style: NavStyle::Spatial,
            bindings: KeyBindings::default(),
            emphasis: Emphasis::default(),
            spatial: SpatialParams::default(),
            scroll_margin: 40.0,
            seek_step_secs: 5.0,
            toast_duration_ms: 1500,
            site_origin: "https://www.youtube.com".to_string(),
            home_path: "/".to_string(),
        }
    }
}

impl NavConfig {
    /// The toggled, arrow-key variant.
    #[must_use]
    pub fn linear() -> Self {
        Self {
            style: NavStyle::Linear,
            bindings: KeyBindings::arrows(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: NavStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    #[must_use]
    pub fn with_spatial(mut self, spatial: SpatialParams) -> Self {
        self.spatial = spatial;
        self
    }

    #[must_use]
    pub fn with_scroll_margin(mut self, margin: f64) -> Self {
        self.scroll_margin = margin;
        self
    }

    #[must_use]
    pub fn with_seek_step(mut self, seconds: f64) -> Self {
        self.seek_step_secs = seconds;
        self
    }

    /// Parse JSON and validate.
    pub fn from_json(json: &str) -> tubenav_core::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    /// Clamp numeric settings to safe ranges.
    ///
    /// Non-finite values fall back to the default before clamping.
    #[must_use]
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        let sp = &mut self.spatial;
        sp.epsilon = finite_or(sp.epsilon, defaults.spatial.epsilon).clamp(0.0, 32.0);
        sp.axis_weight = finite_or(sp.axis_weight, defaults.spatial.axis_weight).max(1.0);
        sp.row_band_ratio =
            finite_or(sp.row_band_ratio, defaults.spatial.row_band_ratio).clamp(0.1, 2.0);
        self.scroll_margin = finite_or(self.scroll_margin, defaults.scroll_margin).max(0.0);
        self.seek_step_secs = finite_or(self.seek_step_secs, defaults.seek_step_secs).clamp(0.5, 120.0);
        self.toast_duration_ms = self.toast_duration_ms.clamp(250, 10_000);
        let origin_len = self.site_origin.trim_end_matches('/').len();
        self.site_origin.truncate(origin_len);
        if !self.home_path.starts_with('/') {
            self.home_path.insert(0, '/');
        }
        self
    }

    /// Toast auto-hide delay.
    #[must_use]
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    /// Absolute URL of the site root.
    #[must_use]
    pub fn home_url(&self) -> String {
        format!("{}{}", self.site_origin, self.home_path)
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}
