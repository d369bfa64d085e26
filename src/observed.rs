//! Observed rows: assignments recorded during real executions.
//!
//! Observations arrive as one flat list for the whole program. For each
//! decision, only rows whose key set is exactly the decision's condition set
//! are relevant, and repeated assignments collapse to the first one seen.
//!
//! The interchange format is a JSON array of `[assignment, outcome]` pairs:
//!
//! ```json
//! [
//!   [{"ano < 1": true, "ano > 9999": false}, true],
//!   [{"ano < 1": false, "ano > 9999": false}, false]
//! ]
//! ```

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::types::ObservedRow;

/// Reads observed rows from JSON.
pub fn load<R: Read>(reader: R) -> Result<Vec<ObservedRow>> {
    let rows: Vec<ObservedRow> = serde_json::from_reader(reader)?;
    log::debug!("loaded {} observed rows", rows.len());
    Ok(rows)
}

/// Reads observed rows from a JSON file.
pub fn from_file(path: impl AsRef<Path>) -> Result<Vec<ObservedRow>> {
    let file = std::fs::File::open(path)?;
    load(std::io::BufReader::new(file))
}

/// Rows whose assignment covers exactly `conditions`, in their original order.
pub fn relevant<'a, S: AsRef<str>>(
    rows: &'a [ObservedRow],
    conditions: &'a [S],
) -> impl Iterator<Item = &'a ObservedRow> + 'a {
    rows.iter().filter(move |row| row.assignment.covers_exactly(conditions))
}

/// Collapses rows with identical assignments, keeping the first outcome seen.
///
/// Order of first appearance is preserved. Conflicting outcomes for the same
/// assignment are not rejected, only logged.
pub fn dedup<'a>(rows: impl IntoIterator<Item = &'a ObservedRow>) -> Vec<ObservedRow> {
    let mut seen = HashMap::new();
    let mut unique = Vec::new();
    for row in rows {
        match seen.get(&row.assignment) {
            None => {
                seen.insert(&row.assignment, row.outcome);
                unique.push(row.clone());
            }
            Some(&outcome) if outcome != row.outcome => {
                log::warn!(
                    "conflicting outcomes for [{}]: keeping {}, ignoring {}",
                    row.assignment,
                    outcome,
                    row.outcome
                );
            }
            Some(_) => {}
        }
    }
    unique
}

/// The distinct observed cases relevant to a decision over `conditions`.
pub fn unique_cases<S: AsRef<str>>(rows: &[ObservedRow], conditions: &[S]) -> Vec<ObservedRow> {
    dedup(relevant(rows, conditions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Assignment, Row};

    use test_log::test;

    fn row(pairs: &[(&str, bool)], outcome: bool) -> Row {
        let assignment: Assignment = pairs.iter().map(|&(k, v)| (k, v)).collect();
        Row::new(assignment, outcome)
    }

    #[test]
    fn test_load() {
        let json = r#"[[{"ano < 1": true, "ano > 9999": false}, true], [{"x": false}, false]]"#;
        let rows = load(json.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], row(&[("ano < 1", true), ("ano > 9999", false)], true));
        assert_eq!(rows[1], row(&[("x", false)], false));
    }

    #[test]
    fn test_load_malformed() {
        assert!(load(r#"[[{"a": 1}, true]]"#.as_bytes()).is_err());
        assert!(load(r#"{"a": true}"#.as_bytes()).is_err());
    }

    #[test]
    fn test_relevant_requires_exact_key_set() {
        let rows = vec![
            row(&[("a", true), ("b", true)], true),
            row(&[("a", true)], true),
            row(&[("a", true), ("b", false), ("c", true)], false),
            row(&[("b", false), ("a", false)], false),
        ];
        let picked: Vec<_> = relevant(&rows, &["a", "b"]).cloned().collect();
        assert_eq!(picked, vec![rows[0].clone(), rows[3].clone()]);
    }

    #[test]
    fn test_dedup_keeps_first() {
        let rows = vec![
            row(&[("a", true)], true),
            row(&[("a", false)], false),
            row(&[("a", true)], true),
            row(&[("a", false)], true),
        ];
        let unique = dedup(&rows);
        assert_eq!(unique, vec![row(&[("a", true)], true), row(&[("a", false)], false)]);
    }

    #[test]
    fn test_unique_cases() {
        let rows = vec![
            row(&[("a", true), ("b", true)], true),
            row(&[("z", true)], true),
            row(&[("b", true), ("a", true)], true),
        ];
        assert_eq!(unique_cases(&rows, &["a", "b"]).len(), 1);
    }
}
