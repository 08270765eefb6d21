// SPDX-License-Identifier: Apache-2.0

//! Per-scale weight generators.
//!
//! Each generator evaluates hand-tuned rule tables for every case and
//! produces the top-left quadrant table for its zoom factor:
//! - `zoom2`: a single sub-pixel.
//! - `zoom3`: a 2x2 quadrant where slot 3 is the centre of the output grid.
//! - `zoom4`: a 2x2 quadrant with four independent corner positions.
//!
//! Components of one sub-pixel are completed to `WEIGHT_TOTAL` by a residual
//! toward the centre pixel, then reduced to lowest terms.

use std::time::Instant;

use rayon::prelude::*;

use crate::case::Case;
use crate::hq_error::{HqError, HqResult};
use crate::pixel_expr::{PixelExpr, QuadrantTable, Scale};
use crate::symmetry::{QUADRANT_DIAGONAL, Symmetry};
use crate::weights::{WEIGHT_TOTAL, Weights};

pub mod zoom2;
pub mod zoom3;
pub mod zoom4;

/// Appends the residual that brings `components` up to `WEIGHT_TOTAL`.
///
/// The result is not simplified, so it always sums to `WEIGHT_TOTAL`.
pub fn complete_weights(case: Case, components: &[u32]) -> HqResult<Weights> {
    let residual = components
        .iter()
        .try_fold(0u32, |acc, &w| acc.checked_add(w))
        .and_then(|used| WEIGHT_TOTAL.checked_sub(used))
        .ok_or_else(|| HqError::WeightOverflow {
            case,
            components: components.to_vec(),
            total: WEIGHT_TOTAL,
        })?;
    let mut weights = components.to_vec();
    weights.push(residual);
    Ok(Weights::new(weights))
}

/// Evaluates `f` for every case in parallel, in case order.
pub(crate) fn per_case<T, F>(f: F) -> HqResult<Vec<T>>
where
    T: Send,
    F: Fn(Case) -> HqResult<T> + Sync + Send,
{
    Case::all()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(f)
        .collect()
}

/// Fills the sub-pixel mirrored in the quadrant diagonal from `column`:
/// entry `case` is `column[diag(case)]` with top and left neighbours swapped.
pub(crate) fn diagonal_mirror_column(
    column: &[Weights],
    diag: &Symmetry,
) -> HqResult<Vec<Weights>> {
    per_case(|case| {
        column[diag.apply_case(case).index()]
            .permuted(QUADRANT_DIAGONAL.as_slice())
    })
}

/// Zips per-sub-pixel columns into one `PixelExpr` per case.
pub(crate) fn transpose_columns(columns: Vec<Vec<Weights>>) -> Vec<PixelExpr> {
    let case_count = columns.first().map_or(0, |c| c.len());
    let mut exprs: Vec<PixelExpr> = (0..case_count)
        .map(|_| Vec::with_capacity(columns.len()))
        .collect();
    for column in columns {
        for (expr, weights) in exprs.iter_mut().zip(column) {
            expr.push(weights);
        }
    }
    exprs
}

/// Runs the generator for `scale`.
pub fn generate(scale: Scale) -> HqResult<QuadrantTable> {
    let start = Instant::now();
    let table = match scale {
        Scale::X2 => zoom2::gen_expr2(),
        Scale::X3 => zoom3::gen_expr3(),
        Scale::X4 => zoom4::gen_expr4(),
    }?;
    log::info!(
        "generated {} quadrant table in {:?}",
        scale,
        start.elapsed()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::CASE_COUNT;

    #[test]
    fn test_complete_weights_appends_residual() {
        let w = complete_weights(Case::FLAT, &[4, 6, 2]).unwrap();
        assert_eq!(w, Weights::new([4, 6, 2, 4]));
        assert_eq!(w.sum(), Ok(WEIGHT_TOTAL));
    }

    #[test]
    fn test_complete_weights_overflow() {
        let err = complete_weights(Case(7), &[8, 8, 1]).unwrap_err();
        assert_eq!(
            err,
            HqError::WeightOverflow {
                case: Case(7),
                components: vec![8, 8, 1],
                total: WEIGHT_TOTAL,
            }
        );
    }

    #[test]
    fn test_complete_weights_wrapping_components() {
        assert!(matches!(
            complete_weights(Case(7), &[u32::MAX, 2]),
            Err(HqError::WeightOverflow { .. })
        ));
    }

    #[test]
    fn test_transpose_columns() {
        let a = vec![Weights::new([1]); 3];
        let b = vec![Weights::new([2]); 3];
        let exprs = transpose_columns(vec![a, b]);
        assert_eq!(exprs.len(), 3);
        assert_eq!(exprs[1], vec![Weights::new([1]), Weights::new([2])]);
    }

    #[test]
    fn test_generate_shapes() {
        for scale in Scale::ALL {
            let table = generate(scale).unwrap();
            assert_eq!(table.zoom(), scale.zoom());
            assert_eq!(table.exprs().len(), CASE_COUNT);
        }
    }
}
