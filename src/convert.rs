// SPDX-License-Identifier: Apache-2.0

//! Approximation of a 2x quadrant table from a 4x one.
//!
//! The four 4x quadrant sub-pixels cover the single 2x quadrant sub-pixel,
//! so their weights (each rescaled to `CONVERSION_TOTAL`) are summed and
//! reduced. For two groups of cases the reduced weights are snapped to the
//! coarser 2x palette; all other cases pass through unchanged.

use std::time::Instant;

use rayon::prelude::*;

use crate::case::Case;
use crate::hq_error::{HqError, HqResult};
use crate::pixel_expr::{PixelExpr, QUADRANT_WEIGHTS_LEN, QuadrantTable};
use crate::weights::{CONVERSION_TOTAL, Weights};

/// Bits 4..8 of the case: the four corner-to-centre edges plus (1,4).
fn snap_group(case: Case) -> u16 {
    (case.0 >> 4) & 0xF
}

/// A requantization applied to the reduced sum of one case group.
struct Snap {
    groups: &'static [u16],
    /// Sorted multiset the reduced sum must equal.
    expected: &'static [u32],
    map: &'static [(u32, u32)],
}

static SNAPS: [Snap; 2] = [
    Snap {
        groups: &[2, 6, 8, 12],
        expected: &[0, 2, 7, 23],
        map: &[(0, 0), (2, 1), (7, 1), (23, 2)],
    },
    Snap {
        groups: &[0, 1, 4, 5],
        expected: &[0, 3, 3, 10],
        map: &[(0, 0), (3, 1), (10, 2)],
    },
];

impl Snap {
    fn for_case(case: Case) -> Option<&'static Snap> {
        let group = snap_group(case);
        SNAPS.iter().find(|snap| snap.groups.contains(&group))
    }

    fn apply(&self, case: Case, weights: &Weights) -> HqResult<Weights> {
        let mut sorted = weights.0.clone();
        sorted.sort_unstable();
        if sorted != self.expected {
            return Err(HqError::UnexpectedWeightMultiset {
                case,
                got: weights.0.clone(),
                expected: self.expected.to_vec(),
            });
        }
        let snapped = weights
            .as_slice()
            .iter()
            .map(|w| {
                self.map
                    .iter()
                    .find(|(from, _)| from == w)
                    .map(|&(_, to)| to)
                    .ok_or_else(|| HqError::UnexpectedWeightMultiset {
                        case,
                        got: weights.0.clone(),
                        expected: self.expected.to_vec(),
                    })
            })
            .collect::<HqResult<Vec<_>>>()?;
        Ok(Weights::new(snapped))
    }
}

/// Converts the 4x quadrant expression of one case to its 2x counterpart.
pub fn convert_expr_4_to_2(case: Case, expr4: &PixelExpr) -> HqResult<PixelExpr> {
    let mut sum = vec![0u32; QUADRANT_WEIGHTS_LEN];
    for weights in expr4 {
        weights.expect_len(QUADRANT_WEIGHTS_LEN)?;
        for (acc, w) in sum.iter_mut().zip(weights.scaled_to(CONVERSION_TOTAL)?.0) {
            *acc += w;
        }
    }
    let reduced = Weights::new(sum).simplified();
    let weights2 = match Snap::for_case(case) {
        Some(snap) => snap.apply(case, &reduced)?,
        None => reduced,
    };
    Ok(vec![weights2])
}

pub fn convert_4_to_2(quadrant4: &QuadrantTable) -> HqResult<QuadrantTable> {
    if quadrant4.zoom() != 4 {
        return Err(HqError::ZoomMismatch {
            lhs: quadrant4.zoom(),
            rhs: 4,
        });
    }
    let start = Instant::now();
    let exprs = quadrant4
        .iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(case, expr4)| convert_expr_4_to_2(case, expr4))
        .collect::<HqResult<Vec<_>>>()?;
    log::debug!("convert_4_to_2 in {:?}", start.elapsed());
    QuadrantTable::new(2, exprs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::zoom4::gen_expr4;
    use test_case::test_case;

    fn w(v: &[u32]) -> Weights {
        Weights::new(v)
    }

    fn flat_expr4() -> PixelExpr {
        vec![
            w(&[0, 1, 1, 2]),
            w(&[0, 2, 1, 5]),
            w(&[0, 1, 2, 5]),
            w(&[0, 1, 1, 6]),
        ]
    }

    #[test]
    fn test_flat_case_snaps_group_b() {
        // Sums to (0, 192, 192, 640) -> (0, 3, 3, 10) -> (0, 1, 1, 2).
        let got = convert_expr_4_to_2(Case::FLAT, &flat_expr4()).unwrap();
        assert_eq!(got, vec![w(&[0, 1, 1, 2])]);
    }

    #[test]
    fn test_group_a_snap() {
        let expr = vec![
            w(&[3, 0, 0, 5]),
            w(&[1, 0, 0, 3]),
            w(&[1, 0, 2, 5]),
            w(&[1, 0, 0, 7]),
        ];
        // Sums to (224, 0, 64, 736) -> (7, 0, 2, 23) -> (1, 0, 1, 2).
        let got = convert_expr_4_to_2(Case(0x020), &expr).unwrap();
        assert_eq!(got, vec![w(&[1, 0, 1, 2])]);
    }

    #[test]
    fn test_group_a_precondition_violation() {
        let expr = vec![w(&[1, 1, 1, 1]); 4];
        let err = convert_expr_4_to_2(Case(0x0C0), &expr).unwrap_err();
        assert_eq!(
            err,
            HqError::UnexpectedWeightMultiset {
                case: Case(0x0C0),
                got: vec![1, 1, 1, 1],
                expected: vec![0, 2, 7, 23],
            }
        );
    }

    #[test]
    fn test_snap_precondition_violation() {
        // Group 0 demands {0, 3, 3, 10}; uniform weights reduce to (1, 1, 1, 1).
        let expr = vec![w(&[1, 1, 1, 1]); 4];
        let err = convert_expr_4_to_2(Case::FLAT, &expr).unwrap_err();
        assert_eq!(
            err,
            HqError::UnexpectedWeightMultiset {
                case: Case::FLAT,
                got: vec![1, 1, 1, 1],
                expected: vec![0, 3, 3, 10],
            }
        );
    }

    #[test]
    fn test_other_groups_pass_through_unsnapped() {
        // Group 3: same input as the flat case but left unsnapped.
        let got = convert_expr_4_to_2(Case(0x030), &vec![w(&[1, 1, 1, 1]); 4]).unwrap();
        assert_eq!(got, vec![w(&[1, 1, 1, 1])]);
    }

    #[test_case(0x030, &[0, 0, 1, 3]; "group 3")]
    #[test_case(0x0A0, &[0, 1, 1, 2]; "group 10")]
    #[test_case(0x9A0, &[0, 1, 1, 6]; "group 10 with cross edges")]
    #[test_case(0x0F0, &[0, 3, 3, 2]; "group 15")]
    #[test_case(0x000, &[0, 1, 1, 2]; "flat, snapped")]
    #[test_case(0x020, &[1, 0, 1, 2]; "group 2, snapped")]
    #[test_case(0x080, &[1, 1, 0, 2]; "group 8, snapped")]
    #[test_case(0x920, &[1, 0, 1, 2]; "group 2 with cross edges")]
    fn test_convert_generated_table(case: u16, want: &[u32]) {
        let table2 = convert_4_to_2(&gen_expr4().unwrap()).unwrap();
        assert_eq!(table2.zoom(), 2);
        assert_eq!(table2.weights(Case(case), 0), &w(want));
    }

    #[test]
    fn test_rejects_non_4x_input() {
        let table = crate::generator::zoom3::gen_expr3().unwrap();
        assert_eq!(
            convert_4_to_2(&table).unwrap_err(),
            HqError::ZoomMismatch { lhs: 3, rhs: 4 }
        );
    }
}
