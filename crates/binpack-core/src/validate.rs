//! Post-hoc checks of sheet layouts.
//!
//! Coordinates are compared on a 0.1 mm fixed-point grid so accumulated
//! floating point noise in kerf arithmetic does not produce false positives.

use crate::types::{Bin, PackResult, Placement};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Fixed-point steps per input unit
const PRECISION: f64 = 10.0;

fn to_fixed(value: f64) -> i64 {
    (value * PRECISION).round() as i64
}

/// Problem found on a sheet layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementIssue {
    #[error("Sheet {sheet}: panel {id} at {x},{y} ({width}x{height}) exceeds the sheet bounds")]
    OutOfBounds {
        sheet: usize,
        id: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },

    #[error("Sheet {sheet}: panels {first} and {second} overlap")]
    Overlap {
        sheet: usize,
        first: String,
        second: String,
    },

    #[error("Sheet {sheet}: recorded used area {recorded} differs from placed area {actual}")]
    AreaMismatch {
        sheet: usize,
        recorded: f64,
        actual: f64,
    },
}

/// Outcome of validating a whole result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub sheets: usize,
    pub panels: usize,
    pub padding: f64,
    pub issues: Vec<PlacementIssue>,
}

impl ValidationReport {
    /// Plain-text report listing every issue.
    pub fn render(&self) -> String {
        let mut report = String::new();
        let _ = writeln!(report, "Sheets: {}", self.sheets);
        let _ = writeln!(report, "Panels: {}", self.panels);
        let _ = writeln!(report, "Kerf: {}", self.padding);
        let _ = writeln!(
            report,
            "Validation: {}",
            if self.valid { "PASS" } else { "FAIL" }
        );
        for issue in &self.issues {
            let _ = writeln!(report, "  - {}", issue);
        }
        report
    }
}

fn label(placement: &Placement, index: usize) -> String {
    placement
        .id
        .clone()
        .unwrap_or_else(|| format!("#{}", index + 1))
}

fn in_bounds(placement: &Placement, bin: &Bin) -> bool {
    to_fixed(placement.x) >= 0
        && to_fixed(placement.y) >= 0
        && to_fixed(placement.x + placement.width) <= to_fixed(bin.width)
        && to_fixed(placement.y + placement.height) <= to_fixed(bin.height)
}

/// Padded footprints (`width + padding`, `height + padding`) intersect.
fn footprints_overlap(a: &Placement, b: &Placement, padding: f64) -> bool {
    let separated_x = to_fixed(a.x + a.width + padding) <= to_fixed(b.x)
        || to_fixed(b.x + b.width + padding) <= to_fixed(a.x);
    let separated_y = to_fixed(a.y + a.height + padding) <= to_fixed(b.y)
        || to_fixed(b.y + b.height + padding) <= to_fixed(a.y);

    !(separated_x || separated_y)
}

/// Checks bounds, pairwise kerf separation and area bookkeeping of one sheet.
pub fn validate_bin(bin: &Bin, sheet: usize, padding: f64) -> Vec<PlacementIssue> {
    let mut issues = Vec::new();

    for (i, placement) in bin.rects.iter().enumerate() {
        if !in_bounds(placement, bin) {
            issues.push(PlacementIssue::OutOfBounds {
                sheet,
                id: label(placement, i),
                x: placement.x,
                y: placement.y,
                width: placement.width,
                height: placement.height,
            });
        }
    }

    for (i, first) in bin.rects.iter().enumerate() {
        for (j, second) in bin.rects.iter().enumerate().skip(i + 1) {
            if footprints_overlap(first, second, padding) {
                issues.push(PlacementIssue::Overlap {
                    sheet,
                    first: label(first, i),
                    second: label(second, j),
                });
            }
        }
    }

    let actual: f64 = bin.rects.iter().map(Placement::area).sum();
    if to_fixed(actual) != to_fixed(bin.used_area) {
        issues.push(PlacementIssue::AreaMismatch {
            sheet,
            recorded: bin.used_area,
            actual,
        });
    }

    issues
}

/// Validates every sheet of `result`.
pub fn validate_result(result: &PackResult, padding: f64) -> ValidationReport {
    let issues: Vec<PlacementIssue> = result
        .bins
        .iter()
        .enumerate()
        .flat_map(|(sheet, bin)| validate_bin(bin, sheet + 1, padding))
        .collect();

    ValidationReport {
        valid: issues.is_empty(),
        sheets: result.bins.len(),
        panels: result.bins.iter().map(|b| b.rects.len()).sum(),
        padding,
        issues,
    }
}
