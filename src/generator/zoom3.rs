// SPDX-License-Identifier: Apache-2.0

//! 3x generator.
//!
//! Quadrant slots: 0 is the corner sub-pixel, 1 the top edge middle, 2 the
//! left edge middle (diagonal mirror of 1) and 3 the centre of the output,
//! which always copies the source pixel.

use crate::case::Case;
use crate::hq_error::HqResult;
use crate::pixel_expr::QuadrantTable;
use crate::rules::{Rule, RuleTable};
use crate::symmetry::Symmetry;
use crate::weights::Weights;

use super::{complete_weights, diagonal_mirror_column, per_case, transpose_columns};

pub static Z3_S0_W0: RuleTable = RuleTable {
    rules: &[
        Rule::one_of(0xFF8, &[0x1A8, 0x4A8, 0x5E0, 0x7A0, 0x9E0, 0xEA0], 0),
        Rule::one_of(
            0x7F8,
            &[0x0A0, 0x0E0, 0x1A0, 0x2A0, 0x2E0, 0x3A0, 0x4A0, 0x4E0, 0x5A0],
            0,
        ),
        Rule::equals(0x0B0, 0x000, 0),
        Rule::equals(0x010, 0x010, 0),
    ],
    default: 4,
};

pub static Z3_S0_W1: RuleTable = RuleTable {
    rules: &[
        Rule::one_of(
            0xFF8,
            &[
                0x0E0, 0x0F0, 0x2A0, 0x2B0, 0x8E0, 0x8F0, 0xAA0, 0xAB0, 0xBB0, 0xCF0,
            ],
            8,
        ),
        Rule::one_of(
            0xFF8,
            &[
                0x0A0, 0x1A0, 0x4A0, 0x8A0, 0x1F0, 0x4F0, 0x5F0, 0x9F0, 0xDF0, 0x0B0, 0x1B0, 0x3B0,
                0x4B0, 0x5B0, 0x6B0, 0x7B0, 0x8B0, 0x9B0, 0xCB0, 0xDB0, 0xEB0, 0xFB0,
            ],
            7,
        ),
        Rule::one_of(0xFF1, &[0x130, 0x170, 0x330, 0x370, 0x770], 4),
        Rule::one_of(
            0xFF8,
            &[
                0x3A0, 0x5A0, 0x7A0, 0x9A0, 0xBA0, 0xCA0, 0xDA0, 0xEA0, 0x2E0, 0x4E0, 0x5E0, 0x9E0,
                0xAE0, 0xCE0, 0x2F0, 0x3F0, 0x6F0, 0x7F0, 0xAF0, 0xBF0, 0xEF0, 0xFF0,
            ],
            4,
        ),
        Rule::one_of(0x0F0, &[0x000, 0x010, 0x040, 0x050, 0x090, 0x0D0], 4),
    ],
    default: 0,
};

pub static Z3_S1_W1: RuleTable = RuleTable {
    rules: &[
        Rule::one_of(0xFF1, &[0x170, 0x130, 0x330, 0x370, 0x770], 12),
        Rule::one_of(0xFF8, &[0x0E0, 0x0F0, 0x8E0, 0x8F0, 0xCF0], 12),
        Rule::one_of(0xFF1, &[0x920, 0x960, 0xB20, 0xB60, 0xBE0], 4),
        Rule::one_of(0xFF8, &[0x2A0, 0x2B0, 0xAA0, 0xAB0, 0xBB0], 4),
        Rule::equals(0x020, 0x000, 4),
        Rule::one_of(
            0xFF1,
            &[
                0x120, 0x160, 0x1E0, 0x320, 0x360, 0x3E0, 0x520, 0x560, 0x570, 0x5E0, 0x760, 0x7E0,
                0x9E0, 0xD60, 0xDE0, 0xDF0, 0xF60, 0xFE0,
            ],
            2,
        ),
        Rule::one_of(
            0xFF8,
            &[
                0x0A0, 0x0B0, 0x1B0, 0x3B0, 0x4A0, 0x4B0, 0x4F0, 0x5B0, 0x6B0, 0x7B0, 0x7F0, 0x8A0,
                0x8B0, 0x9B0, 0xCB0, 0xDB0, 0xEB0, 0xFB0,
            ],
            2,
        ),
    ],
    default: 0,
};

/// Corner sub-pixel before reduction.
pub fn slot0_raw(case: Case, diag: &Symmetry) -> HqResult<Weights> {
    let w0 = Z3_S0_W0.eval(case);
    let w1 = Z3_S0_W1.eval(case);
    let w2 = Z3_S0_W1.eval_mirrored(case, diag);
    complete_weights(case, &[w0, w1, w2])
}

/// Top edge sub-pixel before reduction; only the top neighbour blends in.
pub fn slot1_raw(case: Case) -> HqResult<Weights> {
    complete_weights(case, &[0, Z3_S1_W1.eval(case), 0])
}

pub fn gen_expr3() -> HqResult<QuadrantTable> {
    let diag = Symmetry::diagonal()?;
    let slot0 = per_case(|case| Ok(slot0_raw(case, &diag)?.simplified()))?;
    let slot1 = per_case(|case| Ok(slot1_raw(case)?.simplified()))?;
    let slot2 = diagonal_mirror_column(&slot1, &diag)?;
    let slot3 = per_case(|_| Ok(Weights::new([0, 0, 0, 1])))?;
    QuadrantTable::new(3, transpose_columns(vec![slot0, slot1, slot2, slot3]))
}
