// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Label persistence — lossless PNG with the print resolution stored in the
// pHYs chunk, plus housekeeping for the output directory.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::RgbImage;
use labelwerk_core::error::{LabelError, Result};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::canvas::composer::RenderedLabel;

const METRES_PER_INCH: f64 = 0.0254;

/// Extensions treated as generated label files.
const LABEL_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Pixels per metre for a resolution in dots per inch.
pub fn pixels_per_metre(dpi: u32) -> u32 {
    (f64::from(dpi) / METRES_PER_INCH).round() as u32
}

fn encoding_error(err: png::EncodingError) -> LabelError {
    match err {
        png::EncodingError::IoError(io) => LabelError::Io(io),
        other => LabelError::Encode(other.to_string()),
    }
}

/// Encode an RGB canvas as PNG with `dpi` recorded in both axes.
pub fn encode_png<W: Write>(image: &RgbImage, dpi: u32, writer: W) -> Result<()> {
    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let ppm = pixels_per_metre(dpi);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: ppm,
        yppu: ppm,
        unit: png::Unit::Meter,
    }));

    let mut png_writer = encoder.write_header().map_err(encoding_error)?;
    png_writer
        .write_image_data(image.as_raw())
        .map_err(encoding_error)?;
    png_writer.finish().map_err(encoding_error)
}

/// Short random token for labels saved without a caller-supplied stem.
fn random_stem() -> String {
    Uuid::new_v4().simple().to_string()[..6].to_string()
}

/// Write `label` to `dir/label_{stem}.png`, creating `dir` if needed.
///
/// File names are unique only if the caller's stems are; concurrent saves
/// with distinct stems into one directory are safe.
#[instrument(skip_all, fields(dir = %dir.as_ref().display(), dpi = label.dpi))]
pub fn save(label: &RenderedLabel, dir: impl AsRef<Path>, stem: Option<&str>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let stem = stem.map(str::to_string).unwrap_or_else(random_stem);
    let path = dir.join(format!("label_{stem}.png"));

    let mut writer = BufWriter::new(File::create(&path)?);
    encode_png(&label.image, label.dpi, &mut writer)?;
    writer.flush()?;

    debug!(path = %path.display(), "Label saved");
    Ok(path)
}

fn is_label_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                LABEL_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
}

/// Image files in `dir`, sorted by path. A missing directory has none.
pub fn list_label_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if is_label_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Delete every image file in `dir` and return how many were removed.
#[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
pub fn clear_label_files(dir: impl AsRef<Path>) -> Result<usize> {
    let files = list_label_files(dir.as_ref())?;
    for file in &files {
        fs::remove_file(file)?;
    }
    info!(removed = files.len(), "Output directory cleared");
    Ok(files.len())
}
