// SPDX-License-Identifier: Apache-2.0

//! Case-by-case diff of two full weight tables.
//!
//! A mismatch is data, not an error: the comparison always visits all cases
//! and the report renders every differing case followed by the total.

use std::fmt;

use crate::case::Case;
use crate::hq_error::{HqError, HqResult};
use crate::pixel_expr::{PixelExpr, PixelExprTable};
use crate::weights::format_weight_row;

/// One case whose expressions differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseDiff {
    pub case: Case,
    pub lhs: PixelExpr,
    pub rhs: PixelExpr,
}

impl CaseDiff {
    /// Sub-pixel indices whose weights differ.
    pub fn differing_sub_pixels(&self) -> Vec<usize> {
        self.lhs
            .iter()
            .zip(&self.rhs)
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| i)
            .collect()
    }

    fn render(&self, zoom: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "case: {}", self.case)?;
        for sy in 0..zoom {
            for ny in 0..3 {
                let mut line = String::from("  ");
                for sx in 0..zoom {
                    let sub_pixel = sy * zoom + sx;
                    let lhs = &self.lhs[sub_pixel];
                    let rhs = &self.rhs[sub_pixel];
                    if sx > 0 {
                        line.push_str("       ");
                    }
                    format_weight_row(&mut line, &lhs.as_slice()[ny * 3..ny * 3 + 3])?;
                    line.push_str(if lhs == rhs { "   . " } else { "   ! " });
                    format_weight_row(&mut line, &rhs.as_slice()[ny * 3..ny * 3 + 3])?;
                }
                writeln!(f, "{}", line)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareReport {
    pub zoom: usize,
    pub diffs: Vec<CaseDiff>,
}

impl CompareReport {
    pub fn mismatch_count(&self) -> usize {
        self.diffs.len()
    }

    pub fn is_match(&self) -> bool {
        self.diffs.is_empty()
    }
}

impl fmt::Display for CompareReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diff in &self.diffs {
            diff.render(self.zoom, f)?;
        }
        writeln!(f, "Number of mismatches: {}", self.mismatch_count())
    }
}

/// Diffs `lhs` against `rhs`; both must have the same zoom factor.
pub fn compare_pixel_expr(lhs: &PixelExprTable, rhs: &PixelExprTable) -> HqResult<CompareReport> {
    if lhs.zoom() != rhs.zoom() {
        return Err(HqError::ZoomMismatch {
            lhs: lhs.zoom(),
            rhs: rhs.zoom(),
        });
    }
    let diffs: Vec<CaseDiff> = lhs
        .iter()
        .zip(rhs.exprs())
        .filter(|((_, a), b)| a != b)
        .map(|((case, a), b)| CaseDiff {
            case,
            lhs: a.clone(),
            rhs: b.clone(),
        })
        .collect();
    for diff in &diffs {
        log::debug!(
            "mismatch in case {} at sub-pixels {:?}",
            diff.case,
            diff.differing_sub_pixels()
        );
    }
    Ok(CompareReport {
        zoom: lhs.zoom(),
        diffs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::CASE_COUNT;
    use crate::weights::Weights;
    use pretty_assertions::assert_eq;

    fn centre_table(zoom: usize) -> Vec<PixelExpr> {
        vec![vec![Weights::new([0, 0, 0, 0, 1, 0, 0, 0, 0]); zoom * zoom]; CASE_COUNT]
    }

    #[test]
    fn test_identical_tables() {
        let a = PixelExprTable::new(2, centre_table(2)).unwrap();
        let report = compare_pixel_expr(&a, &a).unwrap();
        assert!(report.is_match());
        assert_eq!(report.to_string(), "Number of mismatches: 0\n");
    }

    #[test]
    fn test_zoom_mismatch() {
        let a = PixelExprTable::new(2, centre_table(2)).unwrap();
        let b = PixelExprTable::new(3, centre_table(3)).unwrap();
        assert_eq!(
            compare_pixel_expr(&a, &b).unwrap_err(),
            HqError::ZoomMismatch { lhs: 2, rhs: 3 }
        );
    }

    #[test]
    fn test_render_single_mismatch() {
        let a = PixelExprTable::new(2, centre_table(2)).unwrap();
        let mut exprs = centre_table(2);
        exprs[5][1] = Weights::new([0, 1, 0, 0, 3, 0, 0, 0, 0]);
        let b = PixelExprTable::new(2, exprs).unwrap();
        let report = compare_pixel_expr(&a, &b).unwrap();
        assert_eq!(report.mismatch_count(), 1);
        assert_eq!(report.diffs[0].differing_sub_pixels(), vec![1]);
        let want = "\
case: 5 (0000 0000 0101)
    0   0   0   .   0   0   0         0   0   0   !   0   1   0
    0   1   0   .   0   1   0         0   1   0   !   0   3   0
    0   0   0   .   0   0   0         0   0   0   !   0   0   0

    0   0   0   .   0   0   0         0   0   0   .   0   0   0
    0   1   0   .   0   1   0         0   1   0   .   0   1   0
    0   0   0   .   0   0   0         0   0   0   .   0   0   0

Number of mismatches: 1
";
        assert_eq!(report.to_string(), want);
    }
}
