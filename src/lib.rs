// SPDX-License-Identifier: Apache-2.0

//! Generation and verification of the per-case blend-weight tables used by
//! the hq family of edge-directed pixel upscalers (2x, 3x and 4x).

pub mod case;
pub mod checks;
pub mod compare;
pub mod convert;
pub mod generator;
pub mod hq_error;
pub mod minimize;
pub mod pixel_expr;
pub mod quadrant;
pub mod reference;
pub mod relevant_edges;
pub mod rules;
pub mod symmetry;
pub mod weights;
