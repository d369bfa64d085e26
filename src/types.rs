//! Truth assignments and truth-table rows.
//!
//! An [`Assignment`] maps the canonical text of every condition of a decision
//! to a boolean. Keys are kept sorted, so two assignments with the same
//! content are equal, hash equally and order by their values in sorted
//! condition order (`false < true`).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A truth value for each condition of one decision, keyed by canonical text.
#[derive(Debug, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment(BTreeMap<String, bool>);

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zips `conditions` with `values` into an assignment.
    ///
    /// # Panics
    ///
    /// Panics if the two slices differ in length.
    pub fn from_values(conditions: &[String], values: &[bool]) -> Self {
        assert_eq!(conditions.len(), values.len(), "one value per condition is required");
        conditions.iter().cloned().zip(values.iter().copied()).collect()
    }

    pub fn get(&self, condition: &str) -> Option<bool> {
        self.0.get(condition).copied()
    }

    pub fn insert(&mut self, condition: impl Into<String>, value: bool) -> Option<bool> {
        self.0.insert(condition.into(), value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Condition names, in sorted order.
    pub fn conditions(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Checks that the key set is exactly `conditions` (order and duplicates aside).
    pub fn covers_exactly<S: AsRef<str>>(&self, conditions: &[S]) -> bool {
        let mut expected: Vec<&str> = conditions.iter().map(AsRef::as_ref).collect();
        expected.sort_unstable();
        expected.dedup();
        self.0.len() == expected.len() && self.conditions().eq(expected.into_iter())
    }

    /// Checks that `self` and `other` differ in `condition` and agree on every other key.
    pub fn differs_only_in(&self, other: &Assignment, condition: &str, conditions: &[String]) -> bool {
        if self.get(condition) == other.get(condition) {
            return false;
        }
        conditions
            .iter()
            .filter(|c| c.as_str() != condition)
            .all(|c| self.get(c) == other.get(c))
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Assignment(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (condition, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}={:<5}", condition, value)?;
        }
        Ok(())
    }
}

/// One row of a truth table: an assignment together with the decision outcome.
///
/// Observed rows share this representation; see [`ObservedRow`].
/// On the wire a row is the pair `[assignment, outcome]`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "(Assignment, bool)", into = "(Assignment, bool)")]
pub struct Row {
    pub assignment: Assignment,
    pub outcome: bool,
}

/// A row recorded during a real execution rather than produced by enumeration.
pub type ObservedRow = Row;

impl Row {
    pub fn new(assignment: Assignment, outcome: bool) -> Self {
        Self { assignment, outcome }
    }
}

impl From<(Assignment, bool)> for Row {
    fn from((assignment, outcome): (Assignment, bool)) -> Self {
        Row::new(assignment, outcome)
    }
}

impl From<Row> for (Assignment, bool) {
    fn from(row: Row) -> Self {
        (row.assignment, row.outcome)
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | Outcome: {}", self.assignment, self.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn names(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_assignment_content_equality() {
        let a: Assignment = [("b", false), ("a", true)].into_iter().collect();
        let b: Assignment = [("a", true), ("b", false)].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.conditions().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_assignment_ordering_follows_values() {
        let conditions = names(&["a", "b"]);
        let ff = Assignment::from_values(&conditions, &[false, false]);
        let ft = Assignment::from_values(&conditions, &[false, true]);
        let tf = Assignment::from_values(&conditions, &[true, false]);
        assert!(ff < ft);
        assert!(ft < tf);
    }

    #[test]
    fn test_covers_exactly() {
        let conditions = names(&["x < 1", "y"]);
        let asg = Assignment::from_values(&conditions, &[true, false]);
        assert!(asg.covers_exactly(&conditions));
        assert!(asg.covers_exactly(&["y", "x < 1"]));
        assert!(!asg.covers_exactly(&["y"]));
        assert!(!asg.covers_exactly(&["y", "x < 1", "z"]));
    }

    #[test]
    fn test_differs_only_in() {
        let conditions = names(&["a", "b", "c"]);
        let r1 = Assignment::from_values(&conditions, &[true, true, false]);
        let r2 = Assignment::from_values(&conditions, &[false, true, false]);
        let r3 = Assignment::from_values(&conditions, &[false, false, false]);
        assert!(r1.differs_only_in(&r2, "a", &conditions));
        assert!(!r1.differs_only_in(&r2, "b", &conditions));
        assert!(!r1.differs_only_in(&r3, "a", &conditions));
    }

    #[test]
    fn test_row_wire_format() {
        let row = Row::new([("a", true), ("b", false)].into_iter().collect(), true);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"[{"a":true,"b":false},true]"#);
        let back: Row = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn test_row_display() {
        let row = Row::new([("a", true), ("b", false)].into_iter().collect(), false);
        assert_eq!(row.to_string(), "a=true  | b=false | Outcome: false");
    }
}
