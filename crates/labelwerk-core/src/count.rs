// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Label counting — how many case labels a record needs, and the copy plan
// that turns a table of records into named output files.

use tracing::{debug, info};

use crate::types::LabelRecord;

/// `ceil(outstanding / case_size)`, or 0 when either input is missing,
/// non-finite or not positive. Never fails.
pub fn final_labels(outstanding: Option<f64>, case_size: Option<f64>) -> u32 {
    let outstanding = outstanding.filter(|v| v.is_finite()).unwrap_or(0.0);
    let case_size = case_size.filter(|v| v.is_finite()).unwrap_or(0.0);
    if case_size > 0.0 && outstanding > 0.0 {
        let count = (outstanding / case_size).ceil();
        if count >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            count as u32
        }
    } else {
        0
    }
}

/// The record's own case size when it is a number, else the default.
pub fn effective_case_size(case_size: Option<f64>, default: Option<f64>) -> Option<f64> {
    case_size
        .filter(|v| !v.is_nan())
        .or_else(|| default.filter(|v| *v > 0.0))
}

impl LabelRecord {
    /// Labels this record needs, with `default_case_size` filling a gap.
    pub fn label_count(&self, default_case_size: Option<f64>) -> u32 {
        final_labels(
            Some(self.outstanding),
            effective_case_size(self.case_size, default_case_size),
        )
    }
}

/// One record scheduled for rendering, with a file stem per copy.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelJob {
    /// Position of the record in the caller's table.
    pub index: usize,
    pub record: LabelRecord,
    /// `"{index}_{copy}"` for each copy, in order.
    pub stems: Vec<String>,
}

impl LabelJob {
    pub fn copies(&self) -> usize {
        self.stems.len()
    }
}

/// Expand a table into render jobs. Blank rows and rows needing zero labels
/// are skipped.
pub fn plan_copies(records: &[LabelRecord], default_case_size: Option<f64>) -> Vec<LabelJob> {
    let jobs: Vec<LabelJob> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| !record.is_blank())
        .filter_map(|(index, record)| {
            let count = record.label_count(default_case_size);
            if count == 0 {
                debug!(index, "Record needs no labels");
                return None;
            }
            Some(LabelJob {
                index,
                record: record.clone(),
                stems: (0..count).map(|copy| format!("{index}_{copy}")).collect(),
            })
        })
        .collect();

    info!(
        records = records.len(),
        jobs = jobs.len(),
        labels = jobs.iter().map(LabelJob::copies).sum::<usize>(),
        "Copy plan built"
    );
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_up_partial_cases() {
        assert_eq!(final_labels(Some(125.0), Some(60.0)), 3);
        assert_eq!(final_labels(Some(120.0), Some(60.0)), 2);
        assert_eq!(final_labels(Some(1.0), Some(60.0)), 1);
        assert_eq!(final_labels(Some(0.5), Some(0.25)), 2);
    }

    #[test]
    fn matches_ceiling_for_a_range_of_inputs() {
        for outstanding in 0..300u32 {
            for case_size in [1u32, 7, 12, 60, 250] {
                let expected = outstanding.div_ceil(case_size);
                assert_eq!(
                    final_labels(Some(f64::from(outstanding)), Some(f64::from(case_size))),
                    expected,
                    "{outstanding}/{case_size}"
                );
            }
        }
    }

    #[test]
    fn invalid_case_size_means_no_labels() {
        assert_eq!(final_labels(Some(125.0), Some(0.0)), 0);
        assert_eq!(final_labels(Some(125.0), Some(-6.0)), 0);
        assert_eq!(final_labels(Some(125.0), None), 0);
        assert_eq!(final_labels(Some(125.0), Some(f64::NAN)), 0);
    }

    #[test]
    fn invalid_outstanding_means_no_labels() {
        assert_eq!(final_labels(None, Some(60.0)), 0);
        assert_eq!(final_labels(Some(-5.0), Some(60.0)), 0);
        assert_eq!(final_labels(Some(f64::INFINITY), Some(60.0)), 0);
    }

    #[test]
    fn default_case_size_only_fills_gaps() {
        assert_eq!(effective_case_size(None, Some(60.0)), Some(60.0));
        assert_eq!(effective_case_size(Some(f64::NAN), Some(60.0)), Some(60.0));
        assert_eq!(effective_case_size(Some(12.0), Some(60.0)), Some(12.0));
        assert_eq!(effective_case_size(Some(0.0), Some(60.0)), Some(0.0));
        assert_eq!(effective_case_size(None, Some(0.0)), None);
    }

    #[test]
    fn plan_expands_copies_and_skips_empty_rows() {
        let records = vec![
            LabelRecord::new("A", "Alpha").with_quantity(125.0, Some(60.0)),
            LabelRecord::default().with_quantity(500.0, Some(1.0)),
            LabelRecord::new("B", "Beta").with_quantity(0.0, Some(60.0)),
            LabelRecord::new("C", "Gamma").with_quantity(10.0, None),
        ];

        let jobs = plan_copies(&records, Some(6.0));
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].index, 0);
        assert_eq!(jobs[0].stems, vec!["0_0", "0_1", "0_2"]);
        assert_eq!(jobs[1].index, 3);
        assert_eq!(jobs[1].copies(), 2);
    }
}
