// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Barcode module — a ranked list of Code 128 backends resolved once from the
// render configuration, degrading to a deterministic placeholder pattern.
//
// Fallback order: configured backends in rank order, then the placeholder.
// The provider never returns an error; a label without a scannable barcode
// still gets a visually stable bar pattern.

pub mod placeholder;
pub mod raster;
pub mod symbology;
pub mod vector;

use std::path::PathBuf;

use image::GrayImage;
use labelwerk_core::error::Result;
use labelwerk_core::{BackendKind, RenderConfig};
use tracing::{debug, info, instrument, warn};

pub use placeholder::placeholder_bars;
pub use raster::RasterBackend;
pub use vector::VectorBackend;

/// Native bar height in modules (12 mm bars at 0.2 mm modules).
pub const BAR_HEIGHT_MODULES: u32 = 60;

/// Where a bitmap came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarcodeSource {
    Backend(BackendKind),
    Placeholder,
}

/// A barcode ready to paste: black bars on white, already scaled.
#[derive(Debug, Clone)]
pub struct BarcodeBitmap {
    pub image: GrayImage,
    pub source: BarcodeSource,
}

impl BarcodeBitmap {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn is_placeholder(&self) -> bool {
        self.source == BarcodeSource::Placeholder
    }
}

/// One way of producing a scaled barcode.
pub trait BarcodeBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Encode `value` and scale it uniformly to fit inside the target box.
    fn render(&self, value: &str, target_width: u32, target_height: u32) -> Result<GrayImage>;
}

/// Uniform scale that fits `native` inside `target`, and the scaled size.
///
/// Each output dimension is at least one pixel.
pub fn fit_within(
    native_width: u32,
    native_height: u32,
    target_width: u32,
    target_height: u32,
) -> (u32, u32, f64) {
    let scale = (f64::from(target_width) / f64::from(native_width.max(1)))
        .min(f64::from(target_height) / f64::from(native_height.max(1)));
    let width = ((f64::from(native_width) * scale) as u32).max(1);
    let height = ((f64::from(native_height) * scale) as u32).max(1);
    (width, height, scale)
}

/// Ranked barcode backends. Built once; shared read-only across renders.
pub struct BarcodeProvider {
    backends: Vec<Box<dyn BarcodeBackend>>,
}

impl std::fmt::Debug for BarcodeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.backends.iter().map(|b| b.kind()))
            .finish()
    }
}

impl BarcodeProvider {
    pub fn new(backends: Vec<Box<dyn BarcodeBackend>>) -> Self {
        Self { backends }
    }

    /// No backends: every render yields the placeholder.
    pub fn placeholder_only() -> Self {
        Self::new(Vec::new())
    }

    /// Build the backend list from the configured ranking. Backends whose
    /// prerequisites are missing are left out here, not checked per call.
    #[instrument(skip_all, fields(ranking = ?config.barcode_backends))]
    pub fn from_config(config: &RenderConfig) -> Self {
        Self::from_ranking(&config.barcode_backends, config.scratch_dir())
    }

    pub fn from_ranking(ranking: &[BackendKind], scratch_dir: PathBuf) -> Self {
        let mut backends: Vec<Box<dyn BarcodeBackend>> = Vec::new();
        for kind in ranking {
            if backends.iter().any(|b| b.kind() == *kind) {
                continue;
            }
            match kind {
                BackendKind::Vector => backends.push(Box::new(VectorBackend)),
                BackendKind::Raster => match RasterBackend::new(scratch_dir.clone()) {
                    Ok(backend) => backends.push(Box::new(backend)),
                    Err(err) => warn!(error = %err, "Raster barcode backend unavailable"),
                },
            }
        }
        info!(
            backends = ?backends.iter().map(|b| b.kind()).collect::<Vec<_>>(),
            "Barcode backends resolved"
        );
        Self { backends }
    }

    pub fn kinds(&self) -> Vec<BackendKind> {
        self.backends.iter().map(|b| b.kind()).collect()
    }

    /// Render `value` to fit `target_width` x `target_height`. Never fails.
    #[instrument(skip(self), fields(backends = self.backends.len()))]
    pub fn render(&self, value: &str, target_width: u32, target_height: u32) -> BarcodeBitmap {
        let max_width = target_width.max(1);
        let max_height = target_height.max(1);

        for backend in &self.backends {
            match backend.render(value, target_width, target_height) {
                Ok(image)
                    if image.width() > 0
                        && image.height() > 0
                        && image.width() <= max_width
                        && image.height() <= max_height =>
                {
                    debug!(
                        backend = %backend.kind(),
                        width = image.width(),
                        height = image.height(),
                        "Barcode rendered"
                    );
                    return BarcodeBitmap {
                        image,
                        source: BarcodeSource::Backend(backend.kind()),
                    };
                }
                Ok(image) => warn!(
                    backend = %backend.kind(),
                    width = image.width(),
                    height = image.height(),
                    "Barcode backend returned a bitmap outside the target box; trying next"
                ),
                Err(err) => warn!(
                    backend = %backend.kind(),
                    error = %err,
                    "Barcode backend failed; trying next"
                ),
            }
        }

        warn!("No barcode backend succeeded; drawing placeholder bars");
        BarcodeBitmap {
            image: placeholder_bars(target_width, target_height),
            source: BarcodeSource::Placeholder,
        }
    }
}
