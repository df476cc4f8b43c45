use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paint::{Gradient, Rgba, TrailStyle};

const BUILTIN: &str = include_str!("../catalog.json");

/// A pickable toy: the glyph drawn at the anchor and how its trail looks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Toy {
    pub id: String,
    pub label: String,
    pub glyph: String,
    /// Glyph size in px at the default toy size.
    pub base_size: f64,
    #[serde(default)]
    pub laser: bool,
}

impl Toy {
    pub fn trail_style(&self) -> TrailStyle {
        if self.laser {
            TrailStyle::Laser
        } else {
            TrailStyle::Normal
        }
    }
}

/// Purely decorative particles drawn over a scene backdrop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decor {
    #[default]
    None,
    Stars,
    Grass,
    Snow,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    pub label: String,
    pub gradient: Gradient,
    pub accent: Rgba,
    #[serde(default)]
    pub decor: Decor,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub toys: Vec<Toy>,
    pub scenes: Vec<Scene>,
}

impl Catalog {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Catalog compiled into the binary.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN)
    }

    pub fn toy(&self, id: &str) -> Result<&Toy, ConfigError> {
        self.toys
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ConfigError::UnknownToy(id.to_string()))
    }

    pub fn scene(&self, id: &str) -> Result<&Scene, ConfigError> {
        self.scenes
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ConfigError::UnknownScene(id.to_string()))
    }
}
