// SPDX-License-Identifier: Apache-2.0

//! Compression of a case-to-weights function into ternary case patterns.
//!
//! Cases producing the same weights are grouped; each group starts as one
//! fully specified pattern per case and patterns differing in a single
//! position are merged into one with a wildcard there, one position at a
//! time until nothing merges. The result is minimal by absorption, not
//! necessarily globally minimal.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::case::{CASE_COUNT, Case, EDGE_COUNT};
use crate::hq_error::{HqError, HqResult};
use crate::weights::Weights;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Trit {
    Zero,
    One,
    Any,
}

impl Trit {
    fn as_char(self) -> char {
        match self {
            Trit::Zero => '0',
            Trit::One => '1',
            Trit::Any => 'x',
        }
    }

    fn flipped(self) -> Option<Trit> {
        match self {
            Trit::Zero => Some(Trit::One),
            Trit::One => Some(Trit::Zero),
            Trit::Any => None,
        }
    }
}

/// A cube of cases; position 0 is the most significant edge (edge 11).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pattern([Trit; EDGE_COUNT]);

impl Pattern {
    pub fn from_case(case: Case) -> Self {
        Self(std::array::from_fn(|pos| {
            if case.bit(EDGE_COUNT - 1 - pos) {
                Trit::One
            } else {
                Trit::Zero
            }
        }))
    }

    pub fn matches(&self, case: Case) -> bool {
        self.0.iter().enumerate().all(|(pos, trit)| match trit {
            Trit::Any => true,
            Trit::One => case.bit(EDGE_COUNT - 1 - pos),
            Trit::Zero => !case.bit(EDGE_COUNT - 1 - pos),
        })
    }

    /// Every case covered by the pattern, ascending.
    pub fn cases(&self) -> Vec<Case> {
        Case::all().filter(|&case| self.matches(case)).collect()
    }

    fn with(&self, pos: usize, trit: Trit) -> Self {
        let mut out = *self;
        out.0[pos] = trit;
        out
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for trit in &self.0 {
            write!(f, "{}", trit.as_char())?;
        }
        Ok(())
    }
}

/// Merges pattern pairs that differ only at `pos` until none remain.
fn merge_position(patterns: &mut BTreeSet<Pattern>, pos: usize) {
    let mut changed = true;
    while changed {
        changed = false;
        let snapshot: Vec<Pattern> = patterns.iter().copied().collect();
        for part in snapshot {
            if !patterns.contains(&part) {
                continue;
            }
            let Some(flipped) = part.0[pos].flipped() else {
                continue;
            };
            let dual = part.with(pos, flipped);
            if patterns.remove(&dual) {
                patterns.remove(&part);
                patterns.insert(part.with(pos, Trit::Any));
                changed = true;
            }
        }
    }
}

fn minimize(cases: &[Case]) -> Vec<Pattern> {
    let mut patterns: BTreeSet<Pattern> = cases.iter().map(|&c| Pattern::from_case(c)).collect();
    for pos in 0..EDGE_COUNT {
        merge_position(&mut patterns, pos);
    }
    patterns.into_iter().collect()
}

/// The patterns describing exactly the cases that map to `weights`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFunctionSummary {
    pub weights: Weights,
    pub patterns: Vec<Pattern>,
}

impl fmt::Display for CaseFunctionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.weights)?;
        for pattern in &self.patterns {
            writeln!(f, "    {}", pattern)?;
        }
        Ok(())
    }
}

/// Groups the 4096 entries of `case_to_weights` by value, in ascending
/// weights order, and minimizes each group's case set.
pub fn analyze_case_function(case_to_weights: &[Weights]) -> HqResult<Vec<CaseFunctionSummary>> {
    if case_to_weights.len() != CASE_COUNT {
        return Err(HqError::WrongCaseCount {
            got: case_to_weights.len(),
            expected: CASE_COUNT,
        });
    }
    let mut groups: BTreeMap<&Weights, Vec<Case>> = BTreeMap::new();
    for (case, weights) in Case::all().zip(case_to_weights) {
        groups.entry(weights).or_default().push(case);
    }
    Ok(groups
        .into_iter()
        .map(|(weights, cases)| CaseFunctionSummary {
            weights: weights.clone(),
            patterns: minimize(&cases),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::zoom2::gen_expr2;
    use maplit::btreeset;
    use pretty_assertions::assert_eq;

    fn pattern(s: &str) -> Pattern {
        let trits: Vec<Trit> = s
            .chars()
            .map(|c| match c {
                '0' => Trit::Zero,
                '1' => Trit::One,
                _ => Trit::Any,
            })
            .collect();
        Pattern(trits.try_into().unwrap())
    }

    #[test]
    fn test_pattern_from_case_is_msb_first() {
        assert_eq!(Pattern::from_case(Case(0x0A1)).to_string(), "000010100001");
    }

    #[test]
    fn test_merge_to_single_wildcard() {
        let mut set = btreeset! {
            Pattern::from_case(Case(0b0100)),
            Pattern::from_case(Case(0b0101)),
        };
        merge_position(&mut set, EDGE_COUNT - 1);
        assert_eq!(set, btreeset! { pattern("00000000010x") });
    }

    #[test]
    fn test_constant_function_is_one_pattern() {
        let weights = vec![Weights::new([0, 0, 0, 1]); CASE_COUNT];
        let got = analyze_case_function(&weights).unwrap();
        assert_eq!(
            got,
            vec![CaseFunctionSummary {
                weights: Weights::new([0, 0, 0, 1]),
                patterns: vec![pattern("xxxxxxxxxxxx")],
            }]
        );
    }

    #[test]
    fn test_single_bit_function() {
        let weights: Vec<Weights> = Case::all()
            .map(|case| Weights::new([u32::from(case.bit(5)), 1]))
            .collect();
        let got = analyze_case_function(&weights).unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].patterns, vec![pattern("xxxxxx0xxxxx")]);
        assert_eq!(got[1].patterns, vec![pattern("xxxxxx1xxxxx")]);
        assert_eq!(got[1].to_string(), "  1   1:\n    xxxxxx1xxxxx\n");
    }

    #[test]
    fn test_patterns_partition_generated_table() {
        let table = gen_expr2().unwrap();
        let column = table.sub_pixel_column(0);
        let summaries = analyze_case_function(&column).unwrap();
        let mut covered = vec![0usize; CASE_COUNT];
        for summary in &summaries {
            for pattern in &summary.patterns {
                for case in pattern.cases() {
                    assert_eq!(&column[case.index()], &summary.weights, "{case}");
                    covered[case.index()] += 1;
                }
            }
        }
        assert!(covered.iter().all(|&n| n == 1));
    }

    #[test]
    fn test_rejects_short_input() {
        assert!(analyze_case_function(&[Weights::zeros(4)]).is_err());
    }
}
