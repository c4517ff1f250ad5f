// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::geo::Coordinate;
use crate::proximity::MAX_NEAREST_COUNT;
use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleStyle {
    pub radius_px: f64,
    pub color: String,
    pub fill: bool,
    pub fill_color: String,
}

impl Default for CircleStyle {
    fn default() -> Self {
        Self {
            radius_px: 5.0,
            color: "skyblue".to_string(),
            fill: true,
            fill_color: "skyblue".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Used when no filter selects anything to center on.
    pub default_center: Coordinate,
    pub zoom_start: f64,
    pub tiles_url: String,
    pub tiles_attribution: String,
    /// Airports listed per flight, at most [`MAX_NEAREST_COUNT`].
    pub nearest_count: usize,
    pub airport_marker: CircleStyle,
    pub overlay_color: String,
    /// (width, height) in pixels.
    pub flight_icon_size: (u32, u32),
    pub popup_max_width: u32,
    pub map_height: String,
    /// Directory searched for `<name>.png` icon overrides.
    pub icon_dir: Option<PathBuf>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: crate::filter::DEFAULT_CENTER,
            zoom_start: 3.7,
            tiles_url: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png"
                .to_string(),
            tiles_attribution: "&copy; OpenStreetMap contributors &copy; CARTO".to_string(),
            nearest_count: crate::proximity::DEFAULT_NEAREST_COUNT,
            airport_marker: CircleStyle::default(),
            overlay_color: "#3388ff".to_string(),
            flight_icon_size: (33, 35),
            popup_max_width: 250,
            map_height: "100%".to_string(),
            icon_dir: None,
        }
    }
}

impl MapConfig {
    /// Reads `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file; using defaults — path={}", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: MapConfig = serde_json::from_str(&content)
            .with_context(|| format!("Malformed config {}", path.display()))?;
        if config.nearest_count > MAX_NEAREST_COUNT {
            warn!(
                "Capping nearest_count — configured={} max={}",
                config.nearest_count, MAX_NEAREST_COUNT
            );
            config.nearest_count = MAX_NEAREST_COUNT;
        }
        Ok(config)
    }

    /// Reads the config from the per-user config directory.
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_root().join(CONFIG_FILE))
    }

}

pub fn get_config_root() -> PathBuf {
    directories::ProjectDirs::from("org", "flightmap", "FlightMap")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
