//! MC/DC pair selection.
//!
//! A condition `c` is *independently covered* by a set of rows when it
//! contains two rows that
//!
//! 1. produce different decision outcomes,
//! 2. assign different values to `c`, and
//! 3. agree on every other condition.
//!
//! [`select_pairs`] looks for such an isolating pair for each condition. It
//! scans rows in the order given, with the first row in the outer loop and the
//! second in the inner loop, and keeps the first pair it meets. Conditions
//! without a pair are coverage gaps, reported through [`Coverage::missing`].
//!
//! The rows may come from an exhaustive truth table (then the union of the
//! chosen pairs is a minimal MC/DC test set) or from observed executions (then
//! it is the subset of observations that proves coverage).
//!
//! # Example
//!
//! ```
//! use mcdc_rs::expr::Expr;
//! use mcdc_rs::{mcdc, table};
//!
//! let e = Expr::or([Expr::atom("a"), Expr::atom("b")]);
//! let conditions = vec!["a".to_string(), "b".to_string()];
//! let rows = table::generate(&e, &conditions).unwrap();
//!
//! let coverage = mcdc::select_pairs(&conditions, &rows);
//! assert!(coverage.is_complete());
//! assert_eq!(coverage.test_cases().len(), 3);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{Assignment, Row};

/// Two rows that isolate the effect of a single condition.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct IsolatingPair {
    pub first: Row,
    pub second: Row,
}

/// Result of pair selection for one decision.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Coverage {
    /// All conditions of the decision, sorted.
    conditions: Vec<String>,
    /// Chosen pair for every covered condition.
    pairs: BTreeMap<String, IsolatingPair>,
}

impl Coverage {
    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn pairs(&self) -> &BTreeMap<String, IsolatingPair> {
        &self.pairs
    }

    pub fn pair(&self, condition: &str) -> Option<&IsolatingPair> {
        self.pairs.get(condition)
    }

    /// Conditions with an isolating pair, sorted.
    pub fn covered(&self) -> BTreeSet<&str> {
        self.pairs.keys().map(String::as_str).collect()
    }

    /// Conditions without an isolating pair, sorted.
    pub fn missing(&self) -> Vec<&str> {
        self.conditions
            .iter()
            .map(String::as_str)
            .filter(|c| !self.pairs.contains_key(*c))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.pairs.len() == self.conditions.len()
    }

    /// Distinct rows appearing in any chosen pair, sorted by assignment.
    pub fn test_cases(&self) -> Vec<Row> {
        let mut cases: BTreeMap<&Assignment, bool> = BTreeMap::new();
        for pair in self.pairs.values() {
            for row in [&pair.first, &pair.second] {
                cases.entry(&row.assignment).or_insert(row.outcome);
            }
        }
        cases
            .into_iter()
            .map(|(assignment, outcome)| Row::new(assignment.clone(), outcome))
            .collect()
    }
}

/// Selects an isolating pair of rows for each of `conditions`.
///
/// Deterministic: the same rows in the same order always yield the same pairs.
/// Absence of a pair is not an error but a gap in the returned [`Coverage`].
pub fn select_pairs<S: AsRef<str>>(conditions: &[S], rows: &[Row]) -> Coverage {
    let conditions: Vec<String> = conditions
        .iter()
        .map(|c| c.as_ref().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut pairs = BTreeMap::new();
    for condition in &conditions {
        match find_pair(condition, &conditions, rows) {
            Some(pair) => {
                log::debug!("covered `{}` by [{}] / [{}]", condition, pair.first, pair.second);
                pairs.insert(condition.clone(), pair);
            }
            None => log::debug!("no isolating pair for `{}` among {} rows", condition, rows.len()),
        }
    }

    Coverage { conditions, pairs }
}

fn find_pair(condition: &str, conditions: &[String], rows: &[Row]) -> Option<IsolatingPair> {
    for first in rows {
        for second in rows {
            if first.outcome == second.outcome {
                continue;
            }
            if first.assignment.differs_only_in(&second.assignment, condition, conditions) {
                return Some(IsolatingPair {
                    first: first.clone(),
                    second: second.clone(),
                });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;
    use crate::table;

    use test_log::test;

    fn names(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    fn row(conditions: &[String], values: &[bool], outcome: bool) -> Row {
        Row::new(Assignment::from_values(conditions, values), outcome)
    }

    fn assert_isolates(coverage: &Coverage) {
        for (condition, pair) in coverage.pairs() {
            assert_ne!(pair.first.outcome, pair.second.outcome);
            assert!(pair
                .first
                .assignment
                .differs_only_in(&pair.second.assignment, condition, coverage.conditions()));
        }
    }

    #[test]
    fn test_and_first_pairs() {
        let conditions = names(&["a", "b"]);
        let e = Expr::and([Expr::atom("a"), Expr::atom("b")]);
        let rows = table::generate(&e, &conditions).unwrap();
        let coverage = select_pairs(&conditions, &rows);

        assert!(coverage.is_complete());
        let pa = coverage.pair("a").unwrap();
        assert_eq!(pa.first, row(&conditions, &[true, true], true));
        assert_eq!(pa.second, row(&conditions, &[false, true], false));
        let pb = coverage.pair("b").unwrap();
        assert_eq!(pb.first, row(&conditions, &[true, true], true));
        assert_eq!(pb.second, row(&conditions, &[true, false], false));

        assert_eq!(
            coverage.test_cases(),
            vec![
                row(&conditions, &[false, true], false),
                row(&conditions, &[true, false], false),
                row(&conditions, &[true, true], true),
            ]
        );
    }

    #[test]
    fn test_coupled_condition_uncovered() {
        // `a and not a` is constant, so `a` can never flip the outcome.
        let conditions = names(&["a"]);
        let e = Expr::and([Expr::atom("a"), Expr::atom("a").not()]);
        let rows = table::generate(&e, &conditions).unwrap();
        let coverage = select_pairs(&conditions, &rows);

        assert!(!coverage.is_complete());
        assert!(coverage.covered().is_empty());
        assert_eq!(coverage.missing(), vec!["a"]);
        assert!(coverage.test_cases().is_empty());
    }

    #[test]
    fn test_opaque_masks_condition() {
        // `f(x) and b`: the opaque operand is always false, so `b` is masked.
        let conditions = names(&["b"]);
        let e = Expr::and([Expr::opaque("f(x)"), Expr::atom("b")]);
        let rows = table::generate(&e, &conditions).unwrap();
        assert_eq!(select_pairs(&conditions, &rows).missing(), vec!["b"]);
    }

    #[test]
    fn test_partial_rows() {
        let conditions = names(&["a", "b", "c"]);
        let rows = vec![
            row(&conditions, &[false, false, false], false),
            row(&conditions, &[true, false, false], true),
        ];
        let coverage = select_pairs(&conditions, &rows);
        assert_eq!(coverage.covered().into_iter().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(coverage.missing(), vec!["b", "c"]);
        assert_isolates(&coverage);
    }

    #[test]
    fn test_no_rows() {
        let coverage = select_pairs(&["x"], &[]);
        assert_eq!(coverage.missing(), vec!["x"]);
    }

    #[test]
    fn test_idempotent() {
        let conditions = names(&["a", "b", "c"]);
        let e = Expr::or([
            Expr::and([Expr::atom("a"), Expr::atom("b")]),
            Expr::atom("c"),
        ]);
        let rows = table::generate(&e, &conditions).unwrap();
        let first = select_pairs(&conditions, &rows);
        let second = select_pairs(&conditions, &rows);
        assert_eq!(first, second);
        assert!(first.is_complete());
        assert_isolates(&first);
    }

    #[test]
    fn test_conditions_sorted_and_deduplicated() {
        let coverage = select_pairs(&["b", "a", "b"], &[]);
        assert_eq!(coverage.conditions(), &names(&["a", "b"])[..]);
    }

    #[test]
    fn test_isolation_exhaustive_small() {
        // Every 3-condition expression shape over and/or/not is checked for isolation.
        let conditions = names(&["a", "b", "c"]);
        let leaves = || [Expr::atom("a"), Expr::atom("b"), Expr::atom("c").not()];
        let shapes = vec![
            Expr::and(leaves()),
            Expr::or(leaves()),
            Expr::and([Expr::or([Expr::atom("a"), Expr::atom("b")]), Expr::atom("c")]),
            Expr::or([Expr::and([Expr::atom("a"), Expr::atom("b")]), Expr::atom("c").not()]),
            Expr::or([Expr::atom("a"), Expr::atom("b"), Expr::atom("a")]).not(),
        ];
        for e in shapes {
            let rows = table::generate(&e, &conditions).unwrap();
            let coverage = select_pairs(&conditions, &rows);
            assert_isolates(&coverage);
            assert!(coverage.covered().len() + coverage.missing().len() == conditions.len());
        }
    }
}
