// SPDX-License-Identifier: Apache-2.0

//! Reduction of a full sub-pixel table to its top-left quadrant and the
//! reconstruction of the full table by mirror symmetry.
//!
//! Every sub-pixel in the top-left quadrant only blends the centre with the
//! top-left 2x2 block of neighbours (0, 1, 3, 4), so its 9-entry weights
//! collapse to 4 entries. The other three quadrants are reflections of the
//! first: the sub-pixel at the mirrored position uses the mirrored
//! neighbourhood, and therefore the quadrant entry of the mirrored case.

use std::time::Instant;

use rayon::prelude::*;

use crate::case::Case;
use crate::hq_error::{HqError, HqResult};
use crate::pixel_expr::{
    FULL_WEIGHTS_LEN, PixelExpr, PixelExprTable, QUADRANT_WEIGHTS_LEN, QuadrantTable,
    quadrant_width,
};
use crate::symmetry::{Mirror, Symmetry};
use crate::weights::Weights;

/// Neighbours outside the support of a top-left sub-pixel.
const OUTSIDE_TOP_LEFT: [usize; 5] = [2, 5, 6, 7, 8];
/// Neighbours kept in quadrant form, in quadrant slot order.
const TOP_LEFT: [usize; QUADRANT_WEIGHTS_LEN] = [0, 1, 3, 4];

/// Drops the neighbours outside the top-left support.
///
/// Fails if any of them carries a non-zero weight.
pub fn extract_top_left_weights(weights: &Weights) -> HqResult<Weights> {
    weights.expect_len(FULL_WEIGHTS_LEN)?;
    if let Some(&neighbour) = OUTSIDE_TOP_LEFT.iter().find(|&&n| weights.get(n) != 0) {
        return Err(HqError::OutsideQuadrantSupport {
            neighbour,
            weights: weights.0.clone(),
        });
    }
    Ok(Weights::new(
        TOP_LEFT.iter().map(|&n| weights.get(n)).collect::<Vec<_>>(),
    ))
}

/// Inverse of `extract_top_left_weights`: zero-pads back to 9 entries.
pub fn expand_top_left_weights(weights: &Weights) -> HqResult<Weights> {
    weights.expect_len(QUADRANT_WEIGHTS_LEN)?;
    let mut full = Weights::zeros(FULL_WEIGHTS_LEN);
    for (slot, &neighbour) in TOP_LEFT.iter().enumerate() {
        full.0[neighbour] = weights.get(slot);
    }
    Ok(full)
}

/// Sub-pixel indices (in the full grid) of the top-left quadrant, row-major.
fn quadrant_map(zoom: usize) -> Vec<usize> {
    let width = quadrant_width(zoom);
    (0..width)
        .flat_map(|qy| (0..width).map(move |qx| qy * zoom + qx))
        .collect()
}

pub fn extract_top_left_quadrant(table: &PixelExprTable) -> HqResult<QuadrantTable> {
    let zoom = table.zoom();
    let map = quadrant_map(zoom);
    let exprs = table
        .exprs()
        .iter()
        .map(|expr| {
            map.iter()
                .map(|&sub_pixel| extract_top_left_weights(&expr[sub_pixel]))
                .collect::<HqResult<PixelExpr>>()
        })
        .collect::<HqResult<Vec<_>>>()?;
    QuadrantTable::new(zoom, exprs)
}

/// Where a full-grid sub-pixel takes its weights from.
#[derive(Debug, Clone, Copy)]
struct MirrorSource {
    quadrant_index: usize,
    symmetry: Symmetry,
}

fn mirror_map(zoom: usize) -> HqResult<Vec<MirrorSource>> {
    let width = quadrant_width(zoom);
    let mut map: Vec<Option<MirrorSource>> = vec![None; zoom * zoom];
    for quadrant_index in 0..width * width {
        let (qy, qx) = (quadrant_index / width, quadrant_index % width);
        // On odd zooms the middle row/column is reached both directly and
        // mirrored; the unmirrored source is written last and wins.
        for (ty, flip_y) in [(zoom - qy - 1, true), (qy, false)] {
            for (tx, flip_x) in [(zoom - qx - 1, true), (qx, false)] {
                let symmetry = Mirror::from_flips(flip_x, flip_y).symmetry()?;
                map[ty * zoom + tx] = Some(MirrorSource {
                    quadrant_index,
                    symmetry,
                });
            }
        }
    }
    map.into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or(HqError::NotSquare {
            sub_pixels: zoom * zoom,
        })
}

/// Rebuilds the full `zoom x zoom` table from its top-left quadrant.
pub fn expand_quadrant(quadrant: &QuadrantTable) -> HqResult<PixelExprTable> {
    let start = Instant::now();
    let zoom = quadrant.zoom();
    let map = mirror_map(zoom)?;
    let exprs = Case::all()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|case| {
            map.iter()
                .map(|source| {
                    let mirrored_case = source.symmetry.apply_case(case);
                    let weights = quadrant.weights(mirrored_case, source.quadrant_index);
                    source
                        .symmetry
                        .apply_weights(&expand_top_left_weights(weights)?)
                })
                .collect::<HqResult<PixelExpr>>()
        })
        .collect::<HqResult<Vec<_>>>()?;
    log::debug!("expand_quadrant: zoom={} in {:?}", zoom, start.elapsed());
    PixelExprTable::new(zoom, exprs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::CASE_COUNT;
    use pretty_assertions::assert_eq;

    fn w(v: &[u32]) -> Weights {
        Weights::new(v)
    }

    #[test]
    fn test_extract_top_left_weights() {
        let got = extract_top_left_weights(&w(&[1, 2, 0, 3, 4, 0, 0, 0, 0])).unwrap();
        assert_eq!(got, w(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_extract_top_left_weights_rejects_outside_support() {
        let err = extract_top_left_weights(&w(&[0, 1, 0, 1, 2, 0, 0, 1, 0])).unwrap_err();
        assert!(matches!(
            err,
            HqError::OutsideQuadrantSupport { neighbour: 7, .. }
        ));
    }

    #[test]
    fn test_expand_top_left_weights_pads_zeroes() {
        let got = expand_top_left_weights(&w(&[1, 2, 3, 4])).unwrap();
        assert_eq!(got, w(&[1, 2, 0, 3, 4, 0, 0, 0, 0]));
        assert_eq!(extract_top_left_weights(&got).unwrap(), w(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_quadrant_map() {
        assert_eq!(quadrant_map(2), vec![0]);
        assert_eq!(quadrant_map(3), vec![0, 1, 3, 4]);
        assert_eq!(quadrant_map(4), vec![0, 1, 4, 5]);
    }

    #[test]
    fn test_mirror_map_prefers_unmirrored_on_odd_zoom() {
        let map = mirror_map(3).unwrap();
        let sources: Vec<usize> = map.iter().map(|s| s.quadrant_index).collect();
        assert_eq!(sources, vec![0, 1, 0, 2, 3, 2, 0, 1, 0]);
        // The centre column/row comes straight from the quadrant.
        assert!(map[1].symmetry.neighbours.is_identity());
        assert!(map[4].symmetry.neighbours.is_identity());
        assert!(!map[5].symmetry.neighbours.is_identity());
    }

    #[test]
    fn test_expand_flat_quadrant_zoom2() {
        // Every case: blend centre 2:1:1 with top and left neighbours.
        let exprs = vec![vec![w(&[0, 1, 1, 2])]; CASE_COUNT];
        let quadrant = QuadrantTable::new(2, exprs).unwrap();
        let full = expand_quadrant(&quadrant).unwrap();
        assert_eq!(
            full.expr(Case::FLAT),
            &vec![
                w(&[0, 1, 0, 1, 2, 0, 0, 0, 0]),
                w(&[0, 1, 0, 0, 2, 1, 0, 0, 0]),
                w(&[0, 0, 0, 1, 2, 0, 0, 1, 0]),
                w(&[0, 0, 0, 0, 2, 1, 0, 1, 0]),
            ]
        );
    }

    #[test]
    fn test_expand_uses_mirrored_case() {
        // Weight toward the top neighbour only when edge (1,4) differs.
        let exprs = Case::all()
            .map(|case| {
                if case.bit(5) {
                    vec![w(&[0, 1, 0, 1])]
                } else {
                    vec![w(&[0, 0, 0, 1])]
                }
            })
            .collect();
        let quadrant = QuadrantTable::new(2, exprs).unwrap();
        let full = expand_quadrant(&quadrant).unwrap();
        // Edge 10 is (4,7): the bottom sub-pixels see it as their (1,4).
        let expr = full.expr(Case(1 << 10));
        assert_eq!(expr[0], w(&[0, 0, 0, 0, 1, 0, 0, 0, 0]));
        assert_eq!(expr[2], w(&[0, 0, 0, 0, 1, 0, 0, 1, 0]));
        assert_eq!(expr[3], w(&[0, 0, 0, 0, 1, 0, 0, 1, 0]));
    }

    #[test]
    fn test_extract_then_expand_round_trip() {
        let exprs = Case::all()
            .map(|case| {
                let k = u32::from(case.0 % 3);
                vec![w(&[k, 1, 2 - k.min(2), 4]); 4]
            })
            .collect();
        let quadrant = QuadrantTable::new(3, exprs).unwrap();
        let full = expand_quadrant(&quadrant).unwrap();
        let back = extract_top_left_quadrant(&full).unwrap();
        assert_eq!(back, quadrant);
        assert_eq!(expand_quadrant(&back).unwrap(), full);
    }
}
