//! Live settings read by the engine every frame.

use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

pub const TOY_SIZE: RangeInclusive<f64> = 16.0..=200.0;
pub const TRAIL_WIDTH: RangeInclusive<f64> = 4.0..=64.0;
pub const TRAIL_LENGTH: RangeInclusive<f64> = 10.0..=120.0;
pub const AUTO_SPEED: RangeInclusive<f64> = 1.0..=100.0;

/// Toy size at which a glyph is drawn at its catalog base size.
const REFERENCE_TOY_SIZE: f64 = 36.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Manual,
    Auto,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(Mode::Manual),
            "auto" | "autonomous" => Ok(Mode::Auto),
            other => Err(format!("unknown mode '{other}'")),
        }
    }
}

fn clamp(v: f64, range: &RangeInclusive<f64>) -> f64 {
    if v.is_nan() {
        *range.start()
    } else {
        v.clamp(*range.start(), *range.end())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub toy: String,
    pub scene: String,
    pub mode: Mode,
    toy_size: f64,
    trail_width: f64,
    trail_length: f64,
    auto_speed: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            toy: "mouse".to_string(),
            scene: "grass".to_string(),
            mode: Mode::Manual,
            toy_size: 36.0,
            trail_width: 24.0,
            trail_length: 50.0,
            auto_speed: 40.0,
        }
    }
}

impl Config {
    /// Default settings with the given motion mode.
    pub fn with_mode(mode: Mode) -> Self {
        Config {
            mode,
            ..Config::default()
        }
    }

    pub fn toy_size(&self) -> f64 {
        self.toy_size
    }

    pub fn trail_width(&self) -> f64 {
        self.trail_width
    }

    pub fn trail_length(&self) -> f64 {
        self.trail_length
    }

    pub fn auto_speed(&self) -> f64 {
        self.auto_speed
    }

    pub fn set_toy_size(&mut self, v: f64) {
        self.toy_size = clamp(v, &TOY_SIZE);
    }

    pub fn set_trail_width(&mut self, v: f64) {
        self.trail_width = clamp(v, &TRAIL_WIDTH);
    }

    pub fn set_trail_length(&mut self, v: f64) {
        self.trail_length = clamp(v, &TRAIL_LENGTH);
    }

    pub fn set_auto_speed(&mut self, v: f64) {
        self.auto_speed = clamp(v, &AUTO_SPEED);
    }

    /// Rope rest length for the current trail length.
    pub fn seg_len(&self) -> f64 {
        4.0 + self.trail_length * 0.22
    }

    pub fn stroke_width(&self) -> f64 {
        (self.trail_width / 8.0).max(1.0)
    }

    /// Glyph size in px for a toy with the given catalog base size.
    pub fn glyph_px(&self, base_size: f64) -> f64 {
        (base_size * (self.toy_size / REFERENCE_TOY_SIZE)).round()
    }

    /// Apply overrides from a URL query string such as `?mode=auto&toy=laser`.
    /// Unknown ids and unparsable numbers are skipped with a warning.
    pub fn apply_query(&mut self, search: &str, catalog: &Catalog) {
        if let Some(v) = query_param(search, "mode") {
            match v.parse() {
                Ok(mode) => self.mode = mode,
                Err(e) => log::warn!("ignoring query: {e}"),
            }
        }
        if let Some(v) = query_param(search, "toy") {
            match catalog.toy(&v) {
                Ok(toy) => self.toy = toy.id.clone(),
                Err(e) => log::warn!("ignoring query: {e}"),
            }
        }
        if let Some(v) = query_param(search, "scene") {
            match catalog.scene(&v) {
                Ok(scene) => self.scene = scene.id.clone(),
                Err(e) => log::warn!("ignoring query: {e}"),
            }
        }
        let numeric: [(&str, fn(&mut Config, f64)); 4] = [
            ("size", Config::set_toy_size),
            ("width", Config::set_trail_width),
            ("length", Config::set_trail_length),
            ("speed", Config::set_auto_speed),
        ];
        for (key, set) in numeric {
            if let Some(v) = query_param(search, key) {
                match v.trim().parse::<f64>() {
                    Ok(n) => set(self, n),
                    Err(_) => log::warn!("ignoring query: {key}='{v}' is not a number"),
                }
            }
        }
    }
}

/// Simple query string lookup; values are percent-decoded.
pub fn query_param(search: &str, key: &str) -> Option<String> {
    let s = search.trim_start_matches('?');
    for pair in s.split('&') {
        let mut it = pair.splitn(2, '=');
        let k = it.next()?;
        let v = it.next().unwrap_or("");
        if k == key {
            return Some(url_decode(v));
        }
    }
    None
}

fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_encoding::percent_decode_str(&s)
        .decode_utf8_lossy()
        .to_string()
}
