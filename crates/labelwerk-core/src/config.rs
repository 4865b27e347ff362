// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Render configuration. Built by the caller and passed into every entry point.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{LabelError, Result};
use crate::types::BackendKind;

/// Largest canvas side a configuration may ask for, in pixels.
pub const MAX_CANVAS_PX: u32 = 20_000;

/// Ranked font file candidates. The first one that loads wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontCandidates {
    pub regular: Vec<PathBuf>,
    /// Tried before `regular` when a bold face is wanted.
    pub bold: Vec<PathBuf>,
}

impl Default for FontCandidates {
    fn default() -> Self {
        Self {
            regular: [
                "DejaVuSans-Bold.ttf",
                "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
                "DejaVuSans.ttf",
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                "/Library/Fonts/Arial.ttf",
                "Arial.ttf",
            ]
            .into_iter()
            .map(PathBuf::from)
            .collect(),
            bold: [
                "DejaVuSans-Bold.ttf",
                "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
                "/Library/Fonts/Arial Bold.ttf",
                "/Library/Fonts/Arialbd.ttf",
                "Arial Bold.ttf",
                "Arialbd.ttf",
            ]
            .into_iter()
            .map(PathBuf::from)
            .collect(),
        }
    }
}

impl FontCandidates {
    /// No outline fonts at all; the renderer falls back to its built-in face.
    pub fn none() -> Self {
        Self {
            regular: Vec::new(),
            bold: Vec::new(),
        }
    }
}

/// Settings for one render call. Immutable once handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Side length of the square label in centimetres.
    pub label_side_cm: f32,
    /// Print resolution in dots per inch; embedded in the output file.
    pub dpi: u32,
    /// Directory that receives `label_*.png` files.
    pub output_dir: PathBuf,
    pub fonts: FontCandidates,
    /// Highest-ranked first. An empty list always yields the placeholder.
    pub barcode_backends: Vec<BackendKind>,
    /// Where backends that need a transient file put it. `None` = system temp.
    pub scratch_dir: Option<PathBuf>,
    /// Case size substituted for records that carry none.
    pub default_case_size: Option<f64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            label_side_cm: 10.0,
            dpi: 300,
            output_dir: PathBuf::from("labels/final_labels"),
            fonts: FontCandidates::default(),
            barcode_backends: vec![BackendKind::Vector, BackendKind::Raster],
            scratch_dir: None,
            default_case_size: None,
        }
    }
}

impl RenderConfig {
    /// Load a (possibly partial) JSON configuration and validate it.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        debug!(
            side_cm = config.label_side_cm,
            dpi = config.dpi,
            backends = config.barcode_backends.len(),
            "Render configuration loaded"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.label_side_cm.is_finite() || self.label_side_cm <= 0.0 {
            return Err(LabelError::Config(format!(
                "label side must be a positive length, got {} cm",
                self.label_side_cm
            )));
        }
        if self.dpi == 0 {
            return Err(LabelError::Config("dpi must be greater than zero".into()));
        }
        let side_px = f64::from(self.label_side_cm) / 2.54 * f64::from(self.dpi);
        if side_px > f64::from(MAX_CANVAS_PX) {
            return Err(LabelError::Config(format!(
                "canvas of {side_px:.0} px exceeds the {MAX_CANVAS_PX} px limit"
            )));
        }
        Ok(())
    }

    /// Directory for transient barcode artifacts.
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}
