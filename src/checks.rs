// SPDX-License-Identifier: Apache-2.0

//! The full verification pass: every generator, the quadrant round trip and
//! the 4x to 2x approximation, each diffed against a reference table.
//!
//! Mismatches are collected into the summary. Precondition violations and
//! reference load failures abort the run.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

use thiserror::Error;

use crate::compare::{CompareReport, compare_pixel_expr};
use crate::convert::convert_4_to_2;
use crate::generator::generate;
use crate::hq_error::{HqError, HqResult};
use crate::pixel_expr::{PixelExprTable, Scale};
use crate::quadrant::{expand_quadrant, extract_top_left_quadrant};
use crate::reference::{LoadError, ReferenceSource, reference_path, save_table};
use crate::relevant_edges::{RelevantEdges, find_relevant_edges};

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Precondition(#[from] HqError),

    #[error("failed to load or store a table: {0}")]
    Load(#[from] LoadError),
}

#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Produce a relevant-edge report for every available reference.
    pub relevant_edges: bool,

    /// If set, write each generated full table as `hq<zoom>x.json` here.
    pub write_generated: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub name: String,
    pub report: CompareReport,
}

#[derive(Debug, Clone, Default)]
pub struct CheckSummary {
    pub relevant_edges: Vec<RelevantEdges>,
    pub outcomes: Vec<CheckOutcome>,
    /// Names of checks that had no reference to run against.
    pub skipped: Vec<String>,
}

impl CheckSummary {
    pub fn total_mismatches(&self) -> usize {
        self.outcomes
            .iter()
            .map(|outcome| outcome.report.mismatch_count())
            .sum()
    }

    pub fn outcome(&self, name: &str) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|outcome| outcome.name == name)
    }

    fn record(&mut self, name: String, report: CompareReport) {
        log::info!("{}: {} mismatches", name, report.mismatch_count());
        self.outcomes.push(CheckOutcome { name, report });
    }

    fn skip(&mut self, name: String, missing: &[Scale]) {
        let missing: Vec<String> = missing.iter().map(Scale::to_string).collect();
        log::warn!(
            "{}: skipped, no {} reference table",
            name,
            missing.join("/")
        );
        self.skipped.push(name);
    }
}

impl fmt::Display for CheckSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.relevant_edges {
            write!(f, "{}", report)?;
        }
        for outcome in &self.outcomes {
            writeln!(f, "== {} ==", outcome.name)?;
            write!(f, "{}", outcome.report)?;
            writeln!(f)?;
        }
        for name in &self.skipped {
            writeln!(f, "skipped: {}", name)?;
        }
        writeln!(f, "Total mismatches: {}", self.total_mismatches())
    }
}

/// Expands the generated quadrant table for `scale` to a full table.
pub fn generated_full_table(scale: Scale) -> HqResult<PixelExprTable> {
    expand_quadrant(&generate(scale)?)
}

/// Extracting and re-expanding the top-left quadrant must reproduce the
/// reference, i.e. the reference is mirror symmetric.
pub fn check_quadrants(reference: &PixelExprTable) -> HqResult<CompareReport> {
    let expanded = expand_quadrant(&extract_top_left_quadrant(reference)?)?;
    compare_pixel_expr(&expanded, reference)
}

/// Converts the 4x reference to 2x and diffs it against the 2x reference.
pub fn check_convert_4_to_2(
    reference4: &PixelExprTable,
    reference2: &PixelExprTable,
) -> HqResult<CompareReport> {
    let quadrant2 = convert_4_to_2(&extract_top_left_quadrant(reference4)?)?;
    compare_pixel_expr(&expand_quadrant(&quadrant2)?, reference2)
}

pub fn check_generated(scale: Scale, reference: &PixelExprTable) -> HqResult<CompareReport> {
    compare_pixel_expr(&generated_full_table(scale)?, reference)
}

/// The generated 4x table converted to 2x, diffed against the generated 2x
/// table. Needs no reference.
pub fn check_generator_consistency() -> HqResult<CompareReport> {
    let converted = expand_quadrant(&convert_4_to_2(&generate(Scale::X4)?)?)?;
    compare_pixel_expr(&converted, &generated_full_table(Scale::X2)?)
}

fn load_references(
    source: &dyn ReferenceSource,
) -> Result<BTreeMap<Scale, PixelExprTable>, LoadError> {
    let mut references = BTreeMap::new();
    for scale in Scale::ALL {
        if let Some(table) = source.reference(scale)? {
            if table.zoom() != scale.zoom() {
                return Err(HqError::ZoomMismatch {
                    lhs: table.zoom(),
                    rhs: scale.zoom(),
                }
                .into());
            }
            references.insert(scale, table);
        }
    }
    Ok(references)
}

pub fn run_all_checks(
    source: &dyn ReferenceSource,
    options: &CheckOptions,
) -> Result<CheckSummary, CheckError> {
    let start = Instant::now();
    let references = load_references(source)?;
    log::info!(
        "run_all_checks: {} reference table(s) available",
        references.len()
    );
    let mut summary = CheckSummary::default();

    if options.relevant_edges {
        for table in references.values() {
            summary.relevant_edges.push(find_relevant_edges(table)?);
        }
    }

    for scale in Scale::ALL {
        let name = format!("quadrant round trip {}", scale);
        match references.get(&scale) {
            Some(reference) => summary.record(name, check_quadrants(reference)?),
            None => summary.skip(name, &[scale]),
        }
    }

    let name = "convert 4x to 2x".to_string();
    match (references.get(&Scale::X4), references.get(&Scale::X2)) {
        (Some(reference4), Some(reference2)) => {
            summary.record(name, check_convert_4_to_2(reference4, reference2)?)
        }
        _ => summary.skip(name, &[Scale::X4, Scale::X2]),
    }

    for scale in Scale::ALL {
        let name = format!("generate {}", scale);
        match references.get(&scale) {
            Some(reference) => summary.record(name, check_generated(scale, reference)?),
            None => summary.skip(name, &[scale]),
        }
    }

    summary.record(
        "generated 4x to 2x vs generated 2x".to_string(),
        check_generator_consistency()?,
    );

    if let Some(dir) = &options.write_generated {
        std::fs::create_dir_all(dir).map_err(LoadError::from)?;
        for scale in Scale::ALL {
            let path = reference_path(dir, scale);
            save_table(&path, &generated_full_table(scale)?)?;
            log::info!("wrote generated {} table to {}", scale, path.display());
        }
    }

    log::info!(
        "run_all_checks: {} checks, {} skipped, {} mismatches in {:?}",
        summary.outcomes.len(),
        summary.skipped.len(),
        summary.total_mismatches(),
        start.elapsed()
    );
    Ok(summary)
}
