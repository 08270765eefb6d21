// SPDX-License-Identifier: Apache-2.0

//! 4x generator.
//!
//! Quadrant slots: 0 is the outer corner, 1 the outer top sub-pixel, 2 the
//! outer left sub-pixel (diagonal mirror of 1) and 3 the inner corner next
//! to the centre of the output.

use crate::case::Case;
use crate::hq_error::HqResult;
use crate::pixel_expr::QuadrantTable;
use crate::rules::{Rule, RuleTable};
use crate::symmetry::Symmetry;
use crate::weights::Weights;

use super::{complete_weights, diagonal_mirror_column, per_case, transpose_columns};

/// Masked values for which neither corner component applies.
const CORNER_CLEAR: &[u16] = &[
    0x1A8, 0x4A8, 0x0A0, 0x1A0, 0x2A0, 0x3A0, 0x4A0, 0x5A0, 0x7A0, 0x8A0, 0x9A0, 0xAA0, 0xBA0,
    0xCA0, 0xDA0, 0xEA0, 0x0E0, 0x2E0, 0x4E0, 0x5E0, 0x8E0, 0x9E0, 0xAE0, 0xCE0,
];

pub static Z4_S0_W0: RuleTable = RuleTable {
    rules: &[
        Rule::one_of(0xFF8, CORNER_CLEAR, 0),
        Rule::equals(0x0B0, 0x000, 0),
        Rule::equals(0x010, 0x010, 0),
    ],
    default: 6,
};

pub static Z4_S0_W1: RuleTable = RuleTable {
    rules: &[
        Rule::one_of(
            0xFF8,
            &[
                0x0A0, 0x1A0, 0x2A0, 0x4A0, 0x8A0, 0xAA0, 0x0E0, 0x8E0, 0x0F0, 0x1F0, 0x4F0, 0x5F0,
                0x8F0, 0x9F0, 0xCF0, 0xDF0,
            ],
            8,
        ),
        Rule::equals(0x0F8, 0x0B0, 8),
        Rule::one_of(
            0xFF4,
            &[
                0x090, 0x190, 0x290, 0x390, 0x590, 0x790, 0x890, 0x990, 0xB90, 0xC90, 0xE90, 0xA90,
                0xD90, 0xF90, 0x0D0, 0x1D0, 0x2D0, 0x3D0, 0x5D0, 0x8D0, 0x9D0, 0xAD0, 0xBD0, 0xCD0,
                0xDD0, 0xED0, 0xFD0,
            ],
            6,
        ),
        Rule::equals(0x0B4, 0x094, 6),
        Rule::one_of(0xFF1, &[0x130, 0x170, 0x330, 0x370, 0x770], 4),
        Rule::one_of(
            0xFF8,
            &[
                0x3A0, 0x5A0, 0x7A0, 0x9A0, 0xBA0, 0xCA0, 0xDA0, 0xEA0, 0x2E0, 0x4E0, 0x5E0, 0x9E0,
                0xAE0, 0xCE0, 0x2F0, 0x3F0, 0x6F0, 0x7F0, 0xAF0, 0xBF0, 0xEF0, 0xFF0,
            ],
            4,
        ),
        Rule::equals(0x0A0, 0x000, 4),
    ],
    default: 0,
};

pub static Z4_S1_W0: RuleTable = RuleTable {
    rules: &[
        Rule::one_of(
            0xFF8,
            &[
                0x6A0, 0xFA0, 0x1E0, 0xDE0, 0x6E0, 0xEE0, 0x3E0, 0x7E0, 0xBE0, 0xFE0, 0x9A8, 0xCA8,
                0x0A8, 0x8A8, 0x5A8, 0xDA8, 0x2A8, 0x3A8, 0x6A8, 0x7A8, 0xAA8, 0xBA8, 0xEA8, 0xFA8,
            ],
            4,
        ),
        Rule::one_of(0x0F8, &[0x020, 0x060, 0x028, 0x068, 0x0E8], 4),
        Rule::equals(0x0B0, 0x080, 2),
    ],
    default: 0,
};

pub static Z4_S1_W1: RuleTable = RuleTable {
    rules: &[
        Rule::one_of(0xFF1, &[0x130, 0x170, 0x330, 0x370, 0x770], 12),
        Rule::one_of(0xFF8, &[0x0E0, 0x0F0, 0x8E0, 0x8F0, 0xCF0], 10),
        Rule::one_of(
            0xFF8,
            &[
                0x0A0, 0x1A0, 0x2A0, 0x4A0, 0x8A0, 0xAA0, 0x1F0, 0x4F0, 0x5F0, 0x9F0, 0xDF0,
            ],
            8,
        ),
        Rule::equals(0x0F8, 0x0B0, 8),
        Rule::equals(0x0B0, 0x090, 6),
        Rule::one_of(
            0xFF8,
            &[
                0x3A0, 0x5A0, 0x7A0, 0x9A0, 0xBA0, 0xCA0, 0xDA0, 0xEA0, 0x2E0, 0x4E0, 0x5E0, 0xAE0,
                0x9E0, 0xCE0,
            ],
            4,
        ),
        Rule::one_of(0x0B0, &[0x000, 0x010, 0x080], 4),
    ],
    default: 0,
};

pub static Z4_S1_W2: RuleTable = RuleTable {
    rules: &[
        Rule::one_of(0xFF8, &[0x0E0, 0x0F0, 0x8E0, 0x8F0, 0xCF0], 6),
        Rule::one_of(0xFF8, &[0x2A0, 0x2B0, 0xAA0, 0xAB0, 0xBB0], 4),
        Rule::one_of(
            0xFF1,
            &[
                0x030, 0x230, 0x430, 0x530, 0x630, 0x730, 0x830, 0x930, 0xA30, 0xB30, 0xC30, 0xD30,
                0xE30, 0xF30, 0x070, 0x270, 0x470, 0x570, 0x670, 0x870, 0x970, 0xA70, 0xB70, 0xC70,
                0xD70, 0xE70, 0xF70,
            ],
            2,
        ),
        Rule::one_of(0x0B1, &[0x000, 0x001, 0x010, 0x011, 0x031], 2),
    ],
    default: 0,
};

pub static Z4_S3_W0: RuleTable = RuleTable {
    rules: &[
        Rule::one_of(0xFF8, CORNER_CLEAR, 0),
        Rule::equals(0x0B0, 0x000, 0),
        Rule::equals(0x010, 0x010, 0),
    ],
    default: 2,
};

pub static Z4_S3_W1: RuleTable = RuleTable {
    rules: &[
        Rule::one_of(
            0xFF8,
            &[
                0x2A0, 0x2B0, 0xAA0, 0xAB0, 0xBB0, 0x0E0, 0x8E0, 0x0F0, 0x8F0, 0xCF0,
            ],
            2,
        ),
        Rule::one_of(0x0B0, &[0x000, 0x010, 0x090], 2),
    ],
    default: 0,
};

/// Outer corner before reduction.
pub fn slot0_raw(case: Case, diag: &Symmetry) -> HqResult<Weights> {
    let w0 = Z4_S0_W0.eval(case);
    let w1 = Z4_S0_W1.eval(case);
    let w2 = Z4_S0_W1.eval_mirrored(case, diag);
    complete_weights(case, &[w0, w1, w2])
}

/// Outer top sub-pixel before reduction.
pub fn slot1_raw(case: Case) -> HqResult<Weights> {
    let w0 = Z4_S1_W0.eval(case);
    let w1 = Z4_S1_W1.eval(case);
    let w2 = Z4_S1_W2.eval(case);
    complete_weights(case, &[w0, w1, w2])
}

/// Inner corner before reduction.
pub fn slot3_raw(case: Case, diag: &Symmetry) -> HqResult<Weights> {
    let w0 = Z4_S3_W0.eval(case);
    let w1 = Z4_S3_W1.eval(case);
    let w2 = Z4_S3_W1.eval_mirrored(case, diag);
    complete_weights(case, &[w0, w1, w2])
}

pub fn gen_expr4() -> HqResult<QuadrantTable> {
    let diag = Symmetry::diagonal()?;
    let slot0 = per_case(|case| Ok(slot0_raw(case, &diag)?.simplified()))?;
    let slot1 = per_case(|case| Ok(slot1_raw(case)?.simplified()))?;
    let slot2 = diagonal_mirror_column(&slot1, &diag)?;
    let slot3 = per_case(|case| Ok(slot3_raw(case, &diag)?.simplified()))?;
    QuadrantTable::new(4, transpose_columns(vec![slot0, slot1, slot2, slot3]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::WEIGHT_TOTAL;
    use pretty_assertions::assert_eq;

    fn w(v: &[u32]) -> Weights {
        Weights::new(v)
    }

    #[test]
    fn test_raw_weights_sum_to_total() {
        let diag = Symmetry::diagonal().unwrap();
        for case in Case::all() {
            assert_eq!(slot0_raw(case, &diag).unwrap().sum(), Ok(WEIGHT_TOTAL));
            assert_eq!(slot1_raw(case).unwrap().sum(), Ok(WEIGHT_TOTAL));
            assert_eq!(slot3_raw(case, &diag).unwrap().sum(), Ok(WEIGHT_TOTAL));
        }
    }

    #[test]
    fn test_flat_case() {
        let table = gen_expr4().unwrap();
        assert_eq!(
            table.expr(Case::FLAT),
            &vec![
                w(&[0, 1, 1, 2]),
                w(&[0, 2, 1, 5]),
                w(&[0, 1, 2, 5]),
                w(&[0, 1, 1, 6]),
            ]
        );
    }

    #[test]
    fn test_fixtures() {
        let table = gen_expr4().unwrap();
        assert_eq!(
            table.expr(Case(0x0A0)),
            &vec![
                w(&[0, 1, 1, 0]),
                w(&[0, 1, 0, 1]),
                w(&[0, 0, 1, 1]),
                w(&[0, 0, 0, 1]),
            ]
        );
        assert_eq!(
            table.expr(Case(0x130)),
            &vec![
                w(&[0, 1, 0, 3]),
                w(&[0, 3, 0, 1]),
                w(&[0, 0, 3, 5]),
                w(&[0, 0, 1, 7]),
            ]
        );
    }

    #[test]
    fn test_corner_tables_share_clear_list() {
        for &value in CORNER_CLEAR {
            let case = Case(value);
            assert_eq!(Z4_S0_W0.matching_rule(case), Some(0));
            assert_eq!(Z4_S3_W0.matching_rule(case), Some(0));
        }
    }
}
