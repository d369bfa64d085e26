//! Sink for observed rows.
//!
//! Instrumented code calls [`Recorder::record`] right before each decision is
//! taken. The recorder is an explicit value owned by the caller: nothing is
//! written behind its back, and the accumulated rows are handed over with
//! [`Recorder::export`] (JSON, readable by [`observed::load`][crate::observed::load])
//! or [`Recorder::into_rows`].
//!
//! # Example
//!
//! ```
//! use mcdc_rs::recorder::Recorder;
//! use mcdc_rs::types::Assignment;
//!
//! let mut recorder = Recorder::new();
//! for ano in [0, 1, 9999, 10000] {
//!     let (low, high) = (ano < 1, ano > 9999);
//!     let assignment: Assignment = [("ano < 1", low), ("ano > 9999", high)].into_iter().collect();
//!     if recorder.record(assignment, low || high) {
//!         // invalid year
//!     }
//! }
//! assert_eq!(recorder.len(), 4);
//!
//! let mut json = Vec::new();
//! recorder.export(&mut json).unwrap();
//! ```

use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::types::{Assignment, ObservedRow, Row};

#[derive(Debug, Clone, Default)]
pub struct Recorder {
    rows: Vec<ObservedRow>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one evaluation of a decision and passes its outcome through.
    pub fn record(&mut self, assignment: Assignment, outcome: bool) -> bool {
        self.rows.push(Row::new(assignment, outcome));
        outcome
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ObservedRow] {
        &self.rows
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn into_rows(self) -> Vec<ObservedRow> {
        self.rows
    }

    /// Writes all rows recorded so far as JSON.
    pub fn export<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer(&mut writer, &self.rows)?;
        writer.flush()?;
        log::debug!("exported {} observed rows", self.rows.len());
        Ok(())
    }

    /// Writes all rows recorded so far to a JSON file, replacing it.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.export(std::io::BufWriter::new(file))
    }
}
