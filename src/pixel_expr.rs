// SPDX-License-Identifier: Apache-2.0

//! Per-case weight tables.
//!
//! A `PixelExpr` lists the weights of every output sub-pixel of one source
//! pixel, row-major. A `PixelExprTable` holds one `PixelExpr` per `Case` for
//! the full `zoom x zoom` grid with 9-entry weights; a `QuadrantTable` holds
//! only the top-left `quadrant_width(zoom)^2` sub-pixels with 4-entry weights.
//! Both validate their shape on construction and are immutable afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::case::{CASE_COUNT, Case};
use crate::hq_error::{HqError, HqResult};
use crate::weights::Weights;

pub type PixelExpr = Vec<Weights>;

pub const FULL_WEIGHTS_LEN: usize = 9;
pub const QUADRANT_WEIGHTS_LEN: usize = 4;

/// Upscaling factors with a generator and a reference table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
pub enum Scale {
    #[value(name = "2x")]
    X2,
    #[value(name = "3x")]
    X3,
    #[value(name = "4x")]
    X4,
}

impl Scale {
    pub const ALL: [Scale; 3] = [Scale::X2, Scale::X3, Scale::X4];

    pub fn zoom(self) -> usize {
        match self {
            Scale::X2 => 2,
            Scale::X3 => 3,
            Scale::X4 => 4,
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.zoom())
    }
}

/// Side length of the top-left quadrant: `ceil(zoom / 2)`.
pub fn quadrant_width(zoom: usize) -> usize {
    (zoom + 1) / 2
}

/// Infers the zoom factor from the number of sub-pixels per case.
pub fn get_zoom(exprs: &[PixelExpr]) -> HqResult<usize> {
    let sub_pixels = exprs.first().map_or(0, |expr| expr.len());
    let zoom = (1..=sub_pixels).find(|z| z * z >= sub_pixels).unwrap_or(0);
    if zoom == 0 || zoom * zoom != sub_pixels {
        return Err(HqError::NotSquare { sub_pixels });
    }
    Ok(zoom)
}

fn validate_shape(exprs: &[PixelExpr], sub_pixels: usize, weights_len: usize) -> HqResult<()> {
    if exprs.len() != CASE_COUNT {
        return Err(HqError::WrongCaseCount {
            got: exprs.len(),
            expected: CASE_COUNT,
        });
    }
    for (case, expr) in Case::all().zip(exprs) {
        if expr.len() != sub_pixels {
            return Err(HqError::SubPixelCount {
                case,
                expected: sub_pixels,
                got: expr.len(),
            });
        }
        for weights in expr {
            weights.expect_len(weights_len)?;
            weights.sum()?;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelExprTable {
    zoom: usize,
    exprs: Vec<PixelExpr>,
}

impl PixelExprTable {
    pub fn new(zoom: usize, exprs: Vec<PixelExpr>) -> HqResult<Self> {
        validate_shape(&exprs, zoom * zoom, FULL_WEIGHTS_LEN)?;
        Ok(Self { zoom, exprs })
    }

    /// Builds a table whose zoom is inferred with `get_zoom`.
    pub fn from_exprs(exprs: Vec<PixelExpr>) -> HqResult<Self> {
        let zoom = get_zoom(&exprs)?;
        Self::new(zoom, exprs)
    }

    pub fn zoom(&self) -> usize {
        self.zoom
    }

    pub fn expr(&self, case: Case) -> &PixelExpr {
        &self.exprs[case.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Case, &PixelExpr)> {
        Case::all().zip(self.exprs.iter())
    }

    pub fn exprs(&self) -> &[PixelExpr] {
        &self.exprs
    }

    pub fn into_exprs(self) -> Vec<PixelExpr> {
        self.exprs
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuadrantTable {
    zoom: usize,
    exprs: Vec<PixelExpr>,
}

impl QuadrantTable {
    pub fn new(zoom: usize, exprs: Vec<PixelExpr>) -> HqResult<Self> {
        let width = quadrant_width(zoom);
        validate_shape(&exprs, width * width, QUADRANT_WEIGHTS_LEN)?;
        Ok(Self { zoom, exprs })
    }

    pub fn zoom(&self) -> usize {
        self.zoom
    }

    pub fn width(&self) -> usize {
        quadrant_width(self.zoom)
    }

    pub fn sub_pixel_count(&self) -> usize {
        self.width() * self.width()
    }

    pub fn expr(&self, case: Case) -> &PixelExpr {
        &self.exprs[case.index()]
    }

    pub fn weights(&self, case: Case, sub_pixel: usize) -> &Weights {
        &self.exprs[case.index()][sub_pixel]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Case, &PixelExpr)> {
        Case::all().zip(self.exprs.iter())
    }

    pub fn exprs(&self) -> &[PixelExpr] {
        &self.exprs
    }

    /// The case-to-weights function of a single quadrant sub-pixel.
    pub fn sub_pixel_column(&self, sub_pixel: usize) -> Vec<Weights> {
        self.exprs
            .iter()
            .map(|expr| expr[sub_pixel].clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(sub_pixels: usize, weights: &[u32]) -> Vec<PixelExpr> {
        vec![vec![Weights::new(weights); sub_pixels]; CASE_COUNT]
    }

    #[test]
    fn test_quadrant_width() {
        assert_eq!(quadrant_width(2), 1);
        assert_eq!(quadrant_width(3), 2);
        assert_eq!(quadrant_width(4), 2);
    }

    #[test]
    fn test_get_zoom() {
        assert_eq!(get_zoom(&uniform(9, &[0; 9])).unwrap(), 3);
        assert_eq!(get_zoom(&uniform(16, &[0; 9])).unwrap(), 4);
        assert_eq!(
            get_zoom(&uniform(5, &[0; 9])),
            Err(HqError::NotSquare { sub_pixels: 5 })
        );
        assert!(get_zoom(&[]).is_err());
    }

    #[test]
    fn test_table_validates_shape() {
        let centre = uniform(4, &[0, 0, 0, 0, 1, 0, 0, 0, 0]);
        assert!(PixelExprTable::from_exprs(centre).is_ok());
        assert!(matches!(
            PixelExprTable::new(2, uniform(4, &[0, 0, 0, 1])),
            Err(HqError::WeightsLength { expected: 9, .. })
        ));
        assert!(matches!(
            PixelExprTable::new(2, vec![vec![Weights::zeros(9); 4]; 12]),
            Err(HqError::WrongCaseCount { got: 12, .. })
        ));
        assert!(QuadrantTable::new(4, uniform(4, &[0, 0, 0, 1])).is_ok());
        assert!(matches!(
            QuadrantTable::new(4, uniform(1, &[0, 0, 0, 1])),
            Err(HqError::SubPixelCount { expected: 4, got: 1, .. })
        ));
    }

    #[test]
    fn test_scale_display() {
        let names: Vec<String> = Scale::ALL.iter().map(Scale::to_string).collect();
        assert_eq!(names, ["2x", "3x", "4x"]);
    }
}
