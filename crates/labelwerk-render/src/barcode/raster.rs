// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster backend — writes the encoded symbol to a PNG artifact in the scratch
// directory, reads it back and resamples it to the target box. The artifact is
// removed whether or not the round trip succeeds.

use std::path::{Path, PathBuf};

use image::GrayImage;
use image::imageops::{self, FilterType};
use labelwerk_core::BackendKind;
use labelwerk_core::error::{LabelError, Result};
use tracing::{debug, instrument};

use super::symbology::encode_code128;
use super::{BAR_HEIGHT_MODULES, BarcodeBackend, fit_within};

/// Pixels per module in the intermediate artifact.
const ARTIFACT_MODULE_PX: u32 = 2;

#[derive(Debug, Clone)]
pub struct RasterBackend {
    scratch_dir: PathBuf,
}

impl RasterBackend {
    /// Fails when `scratch_dir` is not an existing directory.
    pub fn new(scratch_dir: PathBuf) -> Result<Self> {
        if !scratch_dir.is_dir() {
            return Err(LabelError::Config(format!(
                "barcode scratch directory {} does not exist",
                scratch_dir.display()
            )));
        }
        Ok(Self { scratch_dir })
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    fn round_trip(&self, symbol: &GrayImage) -> Result<GrayImage> {
        let artifact = tempfile::Builder::new()
            .prefix("labelwerk-bar-")
            .suffix(".png")
            .tempfile_in(&self.scratch_dir)?;

        symbol
            .save_with_format(artifact.path(), image::ImageFormat::Png)
            .map_err(|err| LabelError::Image(format!("writing barcode artifact: {err}")))?;
        let decoded = image::open(artifact.path())
            .map_err(|err| LabelError::Image(format!("reading barcode artifact: {err}")))?
            .into_luma8();
        debug!(path = %artifact.path().display(), "Barcode artifact round-tripped");

        artifact.close()?;
        Ok(decoded)
    }
}

impl BarcodeBackend for RasterBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Raster
    }

    #[instrument(skip(self), fields(scratch = %self.scratch_dir.display()))]
    fn render(&self, value: &str, target_width: u32, target_height: u32) -> Result<GrayImage> {
        let row = encode_code128(value)?;
        let symbol = row.to_bitmap(ARTIFACT_MODULE_PX, BAR_HEIGHT_MODULES * ARTIFACT_MODULE_PX);
        let decoded = self.round_trip(&symbol)?;

        let (width, height, _) = fit_within(
            decoded.width(),
            decoded.height(),
            target_width.max(1),
            target_height.max(1),
        );
        let mut scaled = imageops::resize(&decoded, width, height, FilterType::Lanczos3);
        // Resampling leaves grey fringes; snap back to pure black and white.
        for pixel in scaled.pixels_mut() {
            pixel.0[0] = if pixel.0[0] < 128 { 0 } else { 255 };
        }
        Ok(scaled)
    }
}
