//! Asset Catalog
//!
//! What the asset collaborator managed to load: actor prototypes per
//! category, each with an optional set of named animation clips. Models
//! themselves stay with the renderer; the simulation only needs names,
//! scales and clip lengths.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game::error::{LoadError, read_file};

/// A named animation clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipDesc {
    pub name: String,
    /// Clip length in seconds
    pub duration: f32,
}

impl ClipDesc {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// A loaded actor model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorPrototype {
    pub name: String,
    #[serde(default = "unit_scale")]
    pub scale: f32,
    #[serde(default)]
    pub clips: Vec<ClipDesc>,
}

fn unit_scale() -> f32 {
    1.0
}

impl ActorPrototype {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scale: 1.0,
            clips: Vec::new(),
        }
    }

    pub fn with_clips(mut self, clips: impl IntoIterator<Item = ClipDesc>) -> Self {
        self.clips = clips.into_iter().collect();
        self
    }
}

/// Prototypes by category. Empty lists are fine: spawns fall back to
/// placeholder boxes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetCatalog {
    pub enemies: Vec<ActorPrototype>,
    pub npcs: Vec<ActorPrototype>,
    /// First-person hands rig
    pub hands: Option<ActorPrototype>,
}

impl AssetCatalog {
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        Self::from_json_str(&read_file(path)?)
    }

    /// Number of assets the loader has to wait for.
    pub fn asset_count(&self) -> usize {
        self.enemies.len() + self.npcs.len() + usize::from(self.hands.is_some())
    }
}
