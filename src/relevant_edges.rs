// SPDX-License-Identifier: Apache-2.0

//! Which edges influence which quadrant weight.
//!
//! For each quadrant sub-pixel and each of its 4 neighbours, an edge is
//! relevant when flipping that edge bit changes the neighbour's normalized
//! weight for at least one case. The report draws every such edge set as a
//! small glyph diagram of the 3x3 neighbourhood.

use std::fmt;

use rayon::prelude::*;

use crate::case::{CENTER, Case, EDGE_COUNT, EDGES};
use crate::hq_error::{HqError, HqResult};
use crate::pixel_expr::{PixelExpr, PixelExprTable, QUADRANT_WEIGHTS_LEN, QuadrantTable};
use crate::quadrant::extract_top_left_quadrant;
use crate::weights::Weights;

/// Rescales every tuple of the table to the largest sum found in it.
pub fn normalize_weights(exprs: &[PixelExpr]) -> HqResult<Vec<PixelExpr>> {
    let max_sum = exprs
        .iter()
        .flat_map(|expr| expr.iter().map(Weights::sum))
        .collect::<HqResult<Vec<u32>>>()?
        .into_iter()
        .max()
        .unwrap_or(0);
    exprs
        .iter()
        .map(|expr| {
            expr.iter()
                .map(|weights| weights.scaled_to(max_sum))
                .collect::<HqResult<PixelExpr>>()
        })
        .collect()
}

/// Draws the 3x3 diagram of `edge_nums`; the centre is `o`.
///
/// Star edges draw `\ | / -` at the neighbour cell, cross edges draw `/` or
/// `\` at the corner they cut, and a `/` over a `\` becomes `X`.
pub fn format_edges(edge_nums: &[usize]) -> HqResult<[String; 3]> {
    let mut cells = ['.'; 9];
    cells[usize::from(CENTER)] = 'o';
    let mut combine = |cell: usize, ch: char| -> HqResult<()> {
        let old = cells[cell];
        cells[cell] = match (old, ch) {
            ('.', _) => ch,
            ('/', '\\') | ('\\', '/') => 'X',
            _ => return Err(HqError::GlyphConflict { cell, old, new: ch }),
        };
        Ok(())
    };
    for &edge_num in edge_nums {
        let &(a, b) = EDGES
            .get(edge_num)
            .ok_or(HqError::EdgeOutOfRange(edge_num))?;
        if a == CENTER || b == CENTER {
            let other = usize::from(a + b - CENTER);
            let glyph = ['\\', '|', '/', '-'][if other < 4 { other } else { 8 - other }];
            combine(other, glyph)?;
        } else {
            let x = if a == 3 || b == 3 { 0 } else { 2 };
            let y = if a == 1 || b == 1 { 0 } else { 2 };
            combine(y * 3 + x, if x == y { '/' } else { '\\' })?;
        }
    }
    Ok(std::array::from_fn(|row| {
        cells[row * 3..row * 3 + 3].iter().collect()
    }))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighbourEdges {
    pub edges: Vec<usize>,
    /// No relevant edge and a zero weight in every case.
    pub zero: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelevantEdges {
    pub zoom: usize,
    pub width: usize,
    /// Indexed by quadrant sub-pixel, then quadrant neighbour slot.
    pub sub_pixels: Vec<[NeighbourEdges; QUADRANT_WEIGHTS_LEN]>,
}

fn scan_neighbour(normalized: &[PixelExpr], sub_pixel: usize, neighbour: usize) -> NeighbourEdges {
    let weight = |case: Case| normalized[case.index()][sub_pixel].get(neighbour);
    let edges: Vec<usize> = (0..EDGE_COUNT)
        .filter(|&edge| {
            Case::all().any(|case| weight(case) != weight(case.with_edge_flipped(edge)))
        })
        .collect();
    let zero = edges.is_empty() && Case::all().all(|case| weight(case) == 0);
    NeighbourEdges { edges, zero }
}

pub fn relevant_edges_of_quadrant(quadrant: &QuadrantTable) -> HqResult<RelevantEdges> {
    let normalized = normalize_weights(quadrant.exprs())?;
    let sub_pixels = (0..quadrant.sub_pixel_count())
        .into_par_iter()
        .map(|sub_pixel| {
            std::array::from_fn(|neighbour| {
                scan_neighbour(&normalized, sub_pixel, neighbour)
            })
        })
        .collect();
    Ok(RelevantEdges {
        zoom: quadrant.zoom(),
        width: quadrant.width(),
        sub_pixels,
    })
}

/// Scans the top-left quadrant of a full table.
pub fn find_relevant_edges(table: &PixelExprTable) -> HqResult<RelevantEdges> {
    relevant_edges_of_quadrant(&extract_top_left_quadrant(table)?)
}

impl RelevantEdges {
    /// Text lines of the report body, 10 per quadrant row.
    pub fn render_lines(&self) -> HqResult<Vec<String>> {
        let mut lines = vec![String::new(); self.width * 10];
        for (sub_pixel, neighbours) in self.sub_pixels.iter().enumerate() {
            // Two rows of two diagrams, each followed by a spacer row.
            let mut grid: Vec<Vec<String>> = vec![Vec::new(); 8];
            for (neighbour, info) in neighbours.iter().enumerate() {
                let centre = if info.zero {
                    '.'
                } else {
                    char::from(b'0' + neighbour as u8)
                };
                let base = (neighbour / 2) * 4;
                for (row_num, row) in format_edges(&info.edges)?.into_iter().enumerate() {
                    let row = if row_num == 1 {
                        row.chars()
                            .enumerate()
                            .map(|(i, ch)| if i == 1 { centre } else { ch })
                            .collect::<String>()
                    } else {
                        row
                    };
                    grid[base + row_num].push(row);
                }
                grid[base + 3].push("   ".to_string());
            }
            let block = (sub_pixel / self.width) * 10;
            for (line_num, cells) in grid.iter().enumerate() {
                let line = format!("  {}  |", cells.join("  "));
                lines[block + line_num + 1].push_str(&line);
                if line_num == 7 {
                    lines[block].push_str(&line);
                    let rule = "-".repeat(line.len() - 2);
                    lines[block + 9].push_str(&format!("{}s{}", rule, sub_pixel));
                }
            }
        }
        Ok(lines)
    }

    pub fn render(&self) -> HqResult<String> {
        let mut out = format!("Relevant edges for zoom {}:\n\n", self.zoom);
        for line in self.render_lines()? {
            out.push_str("  ");
            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
        Ok(out)
    }
}

impl fmt::Display for RelevantEdges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.render().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
