// SPDX-License-Identifier: Apache-2.0

//! Ordered bitmask rule tables.
//!
//! A classifier maps a `Case` to a small weight component by testing
//! `case & mask` against each rule in turn; the first rule that matches
//! decides the weight, and the table's default applies when none does.

use crate::case::Case;
use crate::symmetry::Symmetry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    /// `case & mask` equals the value.
    Equals(u16),
    /// `case & mask` is one of the values.
    OneOf(&'static [u16]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub mask: u16,
    pub matches: Match,
    pub weight: u32,
}

impl Rule {
    pub const fn one_of(mask: u16, values: &'static [u16], weight: u32) -> Self {
        Self {
            mask,
            matches: Match::OneOf(values),
            weight,
        }
    }

    pub const fn equals(mask: u16, value: u16, weight: u32) -> Self {
        Self {
            mask,
            matches: Match::Equals(value),
            weight,
        }
    }

    pub fn is_match(&self, case: Case) -> bool {
        let masked = case.masked(self.mask);
        match self.matches {
            Match::Equals(value) => masked == value,
            Match::OneOf(values) => values.contains(&masked),
        }
    }
}

/// A first-match-wins decision list with a default.
#[derive(Debug, Clone, Copy)]
pub struct RuleTable {
    pub rules: &'static [Rule],
    pub default: u32,
}

impl RuleTable {
    /// Index of the rule that decides `case`, or `None` for the default.
    pub fn matching_rule(&self, case: Case) -> Option<usize> {
        self.rules.iter().position(|rule| rule.is_match(case))
    }

    pub fn eval(&self, case: Case) -> u32 {
        match self.matching_rule(case) {
            Some(index) => self.rules[index].weight,
            None => self.default,
        }
    }

    /// Evaluates the table on `case` as seen through `symmetry`.
    ///
    /// Used to derive the weight of one diagonal neighbour from the table
    /// written for the other.
    pub fn eval_mirrored(&self, case: Case, symmetry: &Symmetry) -> u32 {
        self.eval(symmetry.apply_case(case))
    }
}
