use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result},
    timing,
};

/// Main configuration for motion-splitter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Producer-side planning settings
    pub planner: PlannerConfig,

    /// Consumer-side splitting settings
    pub splitter: SplitterConfig,

    /// Per-track export settings
    pub export: ExportConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.planner.validate()?;
        self.export.validate()?;
        Ok(())
    }
}

/// Clip planning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Authoring frame rate written into the manifest
    pub fps: f64,

    /// Gap inserted between consecutive clips (milliseconds)
    pub gap_ms: i64,

    /// Gap expressed in frames; takes precedence over `gap_ms` when set
    pub gap_frames: Option<i64>,

    /// Provenance label written into the manifest
    pub source: String,

    /// Character the motions are applied to
    pub avatar_name: String,

    /// Motion file extensions accepted into a batch (without the dot)
    pub supported_extensions: Vec<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            fps: 30.0,
            gap_ms: 0,
            gap_frames: None,
            source: "Motion Batch Loader".to_string(),
            avatar_name: "Avatar".to_string(),
            supported_extensions: ["rlmotion", "imotion", "imotionplus", "fbx", "bvh"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl PlannerConfig {
    /// Gap between clips in milliseconds
    ///
    /// A frame gap is converted at the authoring rate, truncating toward zero.
    pub fn effective_gap_ms(&self) -> i64 {
        match self.gap_frames {
            Some(frames) if frames > 0 => timing::frames_to_ms(frames, self.fps),
            Some(_) => 0,
            None => self.gap_ms,
        }
    }

    fn validate(&self) -> Result<()> {
        if !timing::is_valid_fps(self.fps) {
            return Err(ConfigError::InvalidValue {
                key: "planner.fps".to_string(),
                value: self.fps.to_string()
            }.into());
        }

        if self.gap_ms < 0 {
            return Err(ConfigError::InvalidValue {
                key: "planner.gap_ms".to_string(),
                value: self.gap_ms.to_string()
            }.into());
        }

        if let Some(frames) = self.gap_frames.filter(|f| *f < 0) {
            return Err(ConfigError::InvalidValue {
                key: "planner.gap_frames".to_string(),
                value: frames.to_string()
            }.into());
        }

        if self.supported_extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "planner.supported_extensions".to_string(),
                value: "[]".to_string()
            }.into());
        }

        Ok(())
    }
}

/// How out-of-order timeline markers are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerOrder {
    /// Sort markers by frame before splitting
    #[default]
    Sort,
    /// Reject markers that are not already ascending
    Strict,
}

/// Clip splitting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Start every split clip at frame 0
    pub offset_to_zero: bool,

    /// Re-derive frame boundaries from milliseconds at the timeline's rate
    pub override_fps: bool,

    /// Marker ordering policy
    pub marker_order: MarkerOrder,

    /// Lay split clips out as tracks
    pub create_tracks: bool,

    /// Keep the combined action after splitting
    pub keep_original_action: bool,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            offset_to_zero: true,
            override_fps: true,
            marker_order: MarkerOrder::Sort,
            create_tracks: true,
            keep_original_action: false,
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory receiving one file per track
    pub output_dir: PathBuf,

    /// Extension of each exported file
    pub extension: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("exported"),
            extension: "json".to_string(),
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<()> {
        if self.extension.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "export.extension".to_string(),
                value: self.extension.clone()
            }.into());
        }

        Ok(())
    }
}
