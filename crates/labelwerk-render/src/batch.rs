// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Parallel batch rendering on a rayon pool.
//
// Each task renders one record and writes its own files; tasks share nothing
// but the read-only renderer and the output directory. A failed save is
// recorded against its job and does not stop the rest of the batch.

use std::path::{Path, PathBuf};
use std::time::Instant;

use labelwerk_core::error::{LabelError, Result};
use labelwerk_core::{LabelJob, LabelRecord, RenderConfig};
use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::canvas::composer::{LabelRenderer, RenderedLabel};
use crate::output;

/// One file written by a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedLabel {
    /// Record index from the job.
    pub index: usize,
    pub stem: String,
    pub path: PathBuf,
}

/// One copy that could not be written.
#[derive(Debug)]
pub struct BatchFailure {
    pub index: usize,
    pub stem: String,
    pub error: LabelError,
}

/// Outcome of [`LabelRenderer::render_and_save`].
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Ordered by job, then copy.
    pub saved: Vec<SavedLabel>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total(&self) -> usize {
        self.saved.len() + self.failures.len()
    }
}

impl LabelRenderer {
    /// Render every record in parallel. Output order matches input order.
    #[instrument(skip_all, fields(records = records.len()))]
    pub fn render_batch(&self, records: &[LabelRecord]) -> Vec<RenderedLabel> {
        records.par_iter().map(|record| self.render(record)).collect()
    }

    /// Render each job once and save one file per copy stem into the
    /// configured output directory.
    pub fn render_and_save(&self, jobs: &[LabelJob]) -> BatchReport {
        self.render_and_save_into(jobs, &self.config().output_dir)
    }

    #[instrument(skip_all, fields(jobs = jobs.len(), dir = %dir.display()))]
    pub fn render_and_save_into(&self, jobs: &[LabelJob], dir: &Path) -> BatchReport {
        let started = Instant::now();
        let outcomes: Vec<Vec<std::result::Result<SavedLabel, BatchFailure>>> = jobs
            .par_iter()
            .map(|job| self.save_job(job, dir))
            .collect();

        let mut report = BatchReport::default();
        for outcome in outcomes.into_iter().flatten() {
            match outcome {
                Ok(saved) => report.saved.push(saved),
                Err(failure) => report.failures.push(failure),
            }
        }

        info!(
            saved = report.saved.len(),
            failed = report.failures.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch finished"
        );
        report
    }

    /// Same as [`render_and_save`](Self::render_and_save) on a dedicated pool
    /// of `threads` workers.
    pub fn render_and_save_with_threads(
        &self,
        jobs: &[LabelJob],
        threads: usize,
    ) -> Result<BatchReport> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|err| LabelError::Config(format!("worker pool: {err}")))?;
        Ok(pool.install(|| self.render_and_save(jobs)))
    }

    fn save_job(
        &self,
        job: &LabelJob,
        dir: &Path,
    ) -> Vec<std::result::Result<SavedLabel, BatchFailure>> {
        let label = self.render(&job.record);
        job.stems
            .iter()
            .map(|stem| match output::save(&label, dir, Some(stem)) {
                Ok(path) => Ok(SavedLabel {
                    index: job.index,
                    stem: stem.clone(),
                    path,
                }),
                Err(error) => {
                    warn!(index = job.index, stem = %stem, error = %error, "Saving label failed");
                    Err(BatchFailure {
                        index: job.index,
                        stem: stem.clone(),
                        error,
                    })
                }
            })
            .collect()
    }
}

/// Render `records` in parallel with a renderer built once for `config`.
pub fn render_batch(records: &[LabelRecord], config: &RenderConfig) -> Result<Vec<RenderedLabel>> {
    Ok(LabelRenderer::new(config.clone())?.render_batch(records))
}
