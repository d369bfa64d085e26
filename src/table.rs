//! Exhaustive truth tables.
//!
//! Rows are enumerated in a fixed order: the first row assigns `true` to every
//! condition, the last assigns `false` to every condition, and the *last*
//! condition alternates fastest. This order is part of the contract, since the
//! pair selector keeps the first isolating pair it meets.
//!
//! # Example
//!
//! ```
//! use mcdc_rs::expr::Expr;
//! use mcdc_rs::table;
//!
//! let e = Expr::and([Expr::atom("a"), Expr::atom("b")]);
//! let conditions = vec!["a".to_string(), "b".to_string()];
//! let rows = table::generate(&e, &conditions).unwrap();
//!
//! assert_eq!(rows.len(), 4);
//! assert!(rows[0].outcome); // a=true, b=true
//! assert!(!rows[3].outcome); // a=false, b=false
//! ```

use num_bigint::BigUint;

use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::types::{Assignment, Row};

/// Hard ceiling on the number of conditions [`generate`] will enumerate.
pub const MAX_TABLE_CONDITIONS: usize = 32;

/// Number of rows in a truth table over `n` conditions, i.e. `2^n`.
pub fn row_count(n: usize) -> BigUint {
    BigUint::from(1u32) << n
}

/// Iterator over all `2^n` combinations of truth values, in table order.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    next: u64,
    end: u64,
}

impl Combinations {
    /// # Panics
    ///
    /// Panics if `n` exceeds [`MAX_TABLE_CONDITIONS`].
    pub fn new(n: usize) -> Self {
        assert!(n <= MAX_TABLE_CONDITIONS, "too many conditions to enumerate: {}", n);
        Self {
            n,
            next: 0,
            end: 1u64 << n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<bool>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let i = self.next;
        self.next += 1;
        // Bit 0 of the counter maps to `true`, so counting up walks from all-true to all-false.
        Some((0..self.n).map(|j| (i >> (self.n - 1 - j)) & 1 == 0).collect())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.end - self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Combinations {}

/// Enumerates every assignment over `conditions` and evaluates `expr` on each.
///
/// Returns exactly `2^n` rows for `n` conditions.
///
/// # Errors
///
/// - [`Error::TooManyConditions`] if `conditions` is longer than [`MAX_TABLE_CONDITIONS`].
/// - [`Error::MissingCondition`] if `conditions` does not include every condition of `expr`.
pub fn generate(expr: &Expr, conditions: &[String]) -> Result<Vec<Row>> {
    if conditions.len() > MAX_TABLE_CONDITIONS {
        return Err(Error::TooManyConditions {
            count: conditions.len(),
            limit: MAX_TABLE_CONDITIONS,
        });
    }
    log::debug!("generate(expr = {}, n = {})", expr, conditions.len());

    Combinations::new(conditions.len())
        .map(|values| {
            let assignment = Assignment::from_values(conditions, &values);
            let outcome = expr.eval(&assignment)?;
            Ok(Row::new(assignment, outcome))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    use test_log::test;

    fn names(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_combinations_order() {
        let rows: Vec<_> = Combinations::new(2).collect();
        assert_eq!(
            rows,
            vec![
                vec![true, true],
                vec![true, false],
                vec![false, true],
                vec![false, false],
            ]
        );
    }

    #[test]
    fn test_combinations_empty() {
        let rows: Vec<_> = Combinations::new(0).collect();
        assert_eq!(rows, vec![Vec::<bool>::new()]);
    }

    #[test]
    fn test_row_count() {
        assert_eq!(row_count(0), BigUint::from(1u32));
        assert_eq!(row_count(3), BigUint::from(8u32));
        assert_eq!(row_count(40).to_string(), "1099511627776");
    }

    #[test]
    fn test_generate_matches_direct_evaluation() {
        // (a and not b) or (c and d)
        let e = Expr::or([
            Expr::and([Expr::atom("a"), Expr::atom("b").not()]),
            Expr::and([Expr::atom("c"), Expr::atom("d")]),
        ]);
        let conditions = names(&["a", "b", "c", "d"]);
        let rows = generate(&e, &conditions).unwrap();
        assert_eq!(rows.len(), 16);

        let distinct: HashSet<_> = rows.iter().map(|r| r.assignment.clone()).collect();
        assert_eq!(distinct.len(), 16);

        for row in &rows {
            let v = |c: &str| row.assignment.get(c).unwrap();
            let expected = (v("a") && !v("b")) || (v("c") && v("d"));
            assert_eq!(row.outcome, expected, "row {}", row);
        }
    }

    #[test]
    fn test_generate_rejects_incomplete_conditions() {
        let e = Expr::and([Expr::atom("a"), Expr::atom("b")]);
        let err = generate(&e, &names(&["a"])).unwrap_err();
        assert!(matches!(err, Error::MissingCondition { .. }));
    }

    #[test]
    fn test_generate_rejects_huge_tables() {
        let conditions: Vec<String> = (0..=MAX_TABLE_CONDITIONS).map(|i| format!("c{}", i)).collect();
        let e = Expr::and(conditions.iter().cloned().map(Expr::Atom));
        let err = generate(&e, &conditions).unwrap_err();
        assert!(matches!(err, Error::TooManyConditions { count: 33, limit: 32 }));
    }
}
