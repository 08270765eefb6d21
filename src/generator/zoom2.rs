// SPDX-License-Identifier: Apache-2.0

//! 2x generator: one sub-pixel per quadrant.
//!
//! Slot 0 blends the top-left corner (`W0`), the top neighbour (`W1`) and
//! the left neighbour (`W1` on the diagonally mirrored case).

use crate::case::Case;
use crate::hq_error::HqResult;
use crate::pixel_expr::QuadrantTable;
use crate::rules::{Rule, RuleTable};
use crate::symmetry::Symmetry;
use crate::weights::Weights;

use super::{complete_weights, per_case};

pub static Z2_S0_W0: RuleTable = RuleTable {
    rules: &[
        Rule::one_of(
            0xFF8,
            &[
                0x0A0, 0x1A0, 0x2A0, 0x3A0, 0x4A0, 0x5A0, 0x7A0, 0x8A0, 0x9A0, 0xAA0, 0xBA0, 0xCA0,
                0xDA0, 0xEA0, 0x1A8, 0x4A8, 0x0E0, 0x2E0, 0x4E0, 0x5E0, 0x8E0, 0x9E0, 0xAE0, 0xCE0,
            ],
            0,
        ),
        Rule::equals(0x0B0, 0x000, 0),
        Rule::equals(0x010, 0x010, 0),
    ],
    default: 4,
};

pub static Z2_S0_W1: RuleTable = RuleTable {
    rules: &[
        Rule::one_of(
            0xFF8,
            &[
                0x2A0, 0xAA0, 0x2B0, 0xAB0, 0xBB0, 0xCF0, 0x0E0, 0x8E0, 0x0F0, 0x8F0,
            ],
            6,
        ),
        Rule::one_of(0x3FC, &[0x1D0, 0x1D8, 0x1F0, 0x1F4], 4),
        Rule::one_of(0x0B4, &[0x000, 0x010, 0x080, 0x004, 0x014, 0x084, 0x094], 4),
        Rule::one_of(0xFF1, &[0x130, 0x170, 0x330, 0x370, 0x770], 4),
        Rule::one_of(
            0xFF4,
            &[
                0x0D0, 0x2D0, 0x3D0, 0x8D0, 0xAD0, 0xBD0, 0xCD0, 0xED0, 0xFD0, 0x090, 0x190, 0x290,
                0x390, 0x590, 0x790, 0x890, 0x990, 0xA90, 0xB90, 0xC90, 0xD90, 0xE90, 0xF90,
            ],
            4,
        ),
        Rule::one_of(
            0xFF8,
            &[
                0x0A0, 0x1A0, 0x4A0, 0x8A0, 0x0B0, 0x1B0, 0x3B0, 0x4B0, 0x5B0, 0x6B0, 0x7B0, 0x8B0,
                0x9B0, 0xCB0, 0xDB0, 0xEB0, 0xFB0, 0x4F0,
            ],
            4,
        ),
        Rule::one_of(
            0xFF8,
            &[
                0x3A0, 0x5A0, 0x7A0, 0x9A0, 0xBA0, 0xCA0, 0xDA0, 0xEA0, 0x2E0, 0x4E0, 0x5E0, 0x9E0,
                0xAE0, 0xCE0,
            ],
            2,
        ),
        Rule::one_of(0xFF4, &[0x490, 0x4D0, 0x690, 0x6D0, 0x7D0], 2),
        Rule::equals(0x2F8, 0x2F0, 1),
    ],
    default: 0,
};

/// Slot 0 before reduction; always sums to 16.
pub fn slot0_raw(case: Case, diag: &Symmetry) -> HqResult<Weights> {
    let w0 = Z2_S0_W0.eval(case);
    let w1 = Z2_S0_W1.eval(case);
    let w2 = Z2_S0_W1.eval_mirrored(case, diag);
    complete_weights(case, &[w0, w1, w2])
}

pub fn gen_expr2() -> HqResult<QuadrantTable> {
    let diag = Symmetry::diagonal()?;
    let exprs = per_case(|case| Ok(vec![slot0_raw(case, &diag)?.simplified()]))?;
    QuadrantTable::new(2, exprs)
}
