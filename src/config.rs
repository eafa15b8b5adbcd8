//! Render configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Color palette for traces, as RGB triples.
pub const PALETTE: [(u8, u8, u8); 10] = [
    (52, 152, 219),  // Blue
    (231, 76, 60),   // Red
    (46, 204, 113),  // Green
    (155, 89, 182),  // Purple
    (243, 156, 18),  // Orange
    (26, 188, 156),  // Teal
    (233, 30, 99),   // Pink
    (0, 188, 212),   // Cyan
    (121, 85, 72),   // Brown
    (96, 125, 139),  // Blue Grey
];

/// Options for the static renderer. Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub title_font_size: u32,
    pub font_family: String,
    pub palette: Vec<(u8, u8, u8)>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 640,
            title_font_size: 24,
            font_family: "sans-serif".to_string(),
            palette: PALETTE.to_vec(),
        }
    }
}

impl RenderOptions {
    /// Load options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Color for the trace at `index`, cycling through the palette.
    pub fn color(&self, index: usize) -> (u8, u8, u8) {
        if self.palette.is_empty() {
            return PALETTE[index % PALETTE.len()];
        }
        self.palette[index % self.palette.len()]
    }
}
