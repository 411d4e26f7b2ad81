//! Colour/physics theme consumed by the propagation and render steps.
//!
//! Themes arrive from outside (a JSON file, a preset, an external update) and
//! are immutable for the duration of a frame. Swapping the theme between
//! frames has no transition: the next frame simply uses the new values.

use crate::constants::{DAMPING_MAX, DAMPING_MIN, SHIMMER_MAX, SHIMMER_MIN};
use crate::error::Error;
use crate::types::Rgb;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq)]
pub struct ThemeConfig {
    /// Per-step decay factor in (0,1); 0.85..0.99 looks like water.
    pub damping: f32,
    /// Refraction intensity in [1,20].
    pub shimmer: f32,
    /// Tint colour blended into strongly displaced pixels.
    pub base_color: Rgb,
    /// Colour of the specular highlight on wave crests.
    pub highlight_color: Rgb,
    /// Display only; the kernel never reads it.
    pub label: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            damping: 0.97,
            shimmer: 8.0,
            base_color: Rgb::new(0x1e, 0x90, 0xff),
            highlight_color: Rgb::new(0xff, 0xff, 0xff),
            label: "Ocean".to_string(),
        }
    }
}

impl ThemeConfig {
    /// Build a theme from raw external values. Colours use the
    /// malformed-means-black rule; numbers are clamped into their working ranges.
    pub fn from_parts(damping: f32, shimmer: f32, base: &str, highlight: &str, label: &str) -> Self {
        Self {
            damping: sanitize_damping(damping),
            shimmer: sanitize_shimmer(shimmer),
            base_color: parse_hex_color(base),
            highlight_color: parse_hex_color(highlight),
            label: label.to_string(),
        }
    }

    /// Built-in themes, cycled with the T key.
    pub fn presets() -> Vec<ThemeConfig> {
        vec![
            ThemeConfig::default(),
            ThemeConfig::from_parts(0.95, 12.0, "#ff4500", "#ffd700", "Lava"),
            ThemeConfig::from_parts(0.98, 6.0, "#39ff14", "#e0ffe0", "Toxic"),
            ThemeConfig::from_parts(0.99, 16.0, "#8a8d91", "#ffffff", "Mercury"),
        ]
    }

    /// Load a theme from a JSON file. Missing fields keep the default theme's value.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        let file: ThemeFile = serde_json::from_str(json)?;
        Ok(file.into())
    }

    /// Save the theme as pretty JSON (colours written back as `#rrggbb`).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(&ThemeFile::from(self))?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Parse `#RRGGBB` (the `#` is optional, hex digits in either case).
/// Anything else maps to black instead of failing.
pub fn parse_hex_color(s: &str) -> Rgb {
    let hex = s.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Rgb::BLACK;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
    Rgb::new(channel(0), channel(2), channel(4))
}

pub fn to_hex_color(c: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

fn sanitize_damping(d: f32) -> f32 {
    if d.is_finite() { d.clamp(DAMPING_MIN, DAMPING_MAX) } else { ThemeConfig::default().damping }
}

fn sanitize_shimmer(s: f32) -> f32 {
    if s.is_finite() { s.clamp(SHIMMER_MIN, SHIMMER_MAX) } else { ThemeConfig::default().shimmer }
}

/// On-disk shape of a theme: the same record the external theme service produces.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ThemeFile {
    #[serde(default = "default_damping")]
    damping: f32,
    #[serde(default = "default_shimmer")]
    shimmer: f32,
    #[serde(default = "default_base")]
    base_color: String,
    #[serde(default = "default_highlight")]
    highlight_color: String,
    #[serde(default = "default_label")]
    label: String,
}

fn default_damping() -> f32 {
    ThemeConfig::default().damping
}
fn default_shimmer() -> f32 {
    ThemeConfig::default().shimmer
}
fn default_base() -> String {
    to_hex_color(ThemeConfig::default().base_color)
}
fn default_highlight() -> String {
    to_hex_color(ThemeConfig::default().highlight_color)
}
fn default_label() -> String {
    ThemeConfig::default().label
}

impl From<ThemeFile> for ThemeConfig {
    fn from(f: ThemeFile) -> Self {
        ThemeConfig::from_parts(f.damping, f.shimmer, &f.base_color, &f.highlight_color, &f.label)
    }
}

impl From<&ThemeConfig> for ThemeFile {
    fn from(t: &ThemeConfig) -> Self {
        ThemeFile {
            damping: t.damping,
            shimmer: t.shimmer,
            base_color: to_hex_color(t.base_color),
            highlight_color: to_hex_color(t.highlight_color),
            label: t.label.clone(),
        }
    }
}
