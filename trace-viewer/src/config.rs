//! Configuration loading and parsing

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use trace_timeline::ReconstructConfig;

/// Main application configuration (loaded from viewer.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub filtering: ReconstructConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    /// Trace log to open
    pub log: Option<PathBuf>,
}

/// Rendering knobs shared by every panel
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ViewConfig {
    /// Height of one panel in points
    #[serde(default = "default_panel_height")]
    pub panel_height: f32,
    /// Radius of occurrence markers
    #[serde(default = "default_point_radius")]
    pub point_radius: f32,
    /// Pointer distance (screen points) at which an occurrence is hovered
    #[serde(default = "default_hover_radius")]
    pub hover_radius: f32,
    /// Text shown in place of an absent interval detail
    #[serde(default = "default_annotation_placeholder")]
    pub annotation_placeholder: String,
}

fn default_panel_height() -> f32 {
    140.0
}

fn default_point_radius() -> f32 {
    5.0
}

fn default_hover_radius() -> f32 {
    8.0
}

fn default_annotation_placeholder() -> String {
    "No arguments".to_string()
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            panel_height: default_panel_height(),
            point_radius: default_point_radius(),
            hover_radius: default_hover_radius(),
            annotation_placeholder: default_annotation_placeholder(),
        }
    }
}

impl AppConfig {
    /// Apply command-line overrides on top of the file values
    pub fn apply_overrides(&mut self, log: Option<PathBuf>, pids: &[String]) {
        if log.is_some() {
            self.input.log = log;
        }
        if !pids.is_empty() {
            self.filtering = self.filtering.clone().with_pid_filter(pids.to_vec());
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}
