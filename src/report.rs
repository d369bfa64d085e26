//! Coverage reports over all decisions of a program.
//!
//! Two modes share condition extraction and pair selection but differ in
//! where rows come from:
//!
//! - [`enumerate`] builds the full truth table of each decision and reports
//!   the minimal MC/DC test set;
//! - [`verify`] uses rows observed during a real run and reports whether they
//!   achieve MC/DC, naming the conditions they fail to demonstrate.
//!
//! Decisions without atomic conditions carry no MC/DC obligation and are left
//! out. Both reports keep the decisions in document order and render as text
//! through [`Display`][std::fmt::Display].

use std::fmt;

use num_bigint::BigUint;

use crate::decision::Decision;
use crate::error::Result;
use crate::mcdc::{self, Coverage};
use crate::observed;
use crate::table;
use crate::types::{ObservedRow, Row};

/// Options shared by both report modes.
///
/// # Examples
///
/// ```
/// use mcdc_rs::report::ReportConfig;
///
/// let config = ReportConfig {
///     max_conditions: 8,
///     ..ReportConfig::default()
/// };
/// assert_eq!(config.rule_width, 30);
/// ```
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Decisions with more conditions are not enumerated (default: 16).
    pub max_conditions: usize,
    /// Width of the `=` rule between decisions (default: 30).
    pub rule_width: usize,
    /// Whether to print the source line of each decision (default: true).
    pub show_lines: bool,
}

impl ReportConfig {
    /// The largest decision that is actually enumerated.
    ///
    /// Never above [`table::MAX_TABLE_CONDITIONS`], whatever `max_conditions` says.
    pub fn enumeration_limit(&self) -> usize {
        self.max_conditions.min(table::MAX_TABLE_CONDITIONS)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_conditions: 16,
            rule_width: 30,
            show_lines: true,
        }
    }
}

/// Per-decision header shared by both report kinds.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DecisionHeader {
    pub line: usize,
    pub text: String,
    pub conditions: Vec<String>,
}

impl DecisionHeader {
    fn of(decision: &Decision) -> Self {
        Self {
            line: decision.line(),
            text: decision.text(),
            conditions: decision.conditions().to_vec(),
        }
    }

    fn fmt_with(&self, f: &mut fmt::Formatter<'_>, config: &ReportConfig) -> fmt::Result {
        write!(f, "Decision: if {}", self.text)?;
        if config.show_lines {
            write!(f, "  (line {})", self.line)?;
        }
        writeln!(f)?;
        writeln!(f, "Conditions: {}", self.conditions.join(", "))?;
        writeln!(f)
    }
}

/// What enumeration produced for one decision.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Enumeration {
    /// Pair selection ran over the full truth table.
    Selected(Coverage),
    /// The decision has too many conditions to enumerate.
    Skipped { rows: BigUint },
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EnumeratedDecision {
    pub header: DecisionHeader,
    pub result: Enumeration,
}

impl EnumeratedDecision {
    /// The minimal MC/DC test cases, sorted by assignment values.
    pub fn test_cases(&self) -> Vec<Row> {
        match &self.result {
            Enumeration::Selected(coverage) => coverage.test_cases(),
            Enumeration::Skipped { .. } => Vec::new(),
        }
    }
}

/// Report of MC/DC test cases derived by exhaustive enumeration.
#[derive(Debug, Clone)]
pub struct EnumerativeReport {
    pub decisions: Vec<EnumeratedDecision>,
    config: ReportConfig,
}

/// Generates the minimal MC/DC test set for every decision.
///
/// # Errors
///
/// Only propagates failures of [`table::generate`], which indicate a mismatch
/// between a decision and its own condition set.
pub fn enumerate(decisions: &[Decision], config: &ReportConfig) -> Result<EnumerativeReport> {
    let mut blocks = Vec::new();
    for decision in decisions {
        if decision.is_trivial() {
            log::debug!("line {}: no conditions in `{}`, skipping", decision.line(), decision.text());
            continue;
        }
        let header = DecisionHeader::of(decision);
        let n = decision.conditions().len();

        let result = if n > config.enumeration_limit() {
            let rows = table::row_count(n);
            log::warn!(
                "line {}: {} conditions ({} rows) exceed the enumeration limit of {}",
                decision.line(),
                n,
                rows,
                config.enumeration_limit()
            );
            Enumeration::Skipped { rows }
        } else {
            let rows = table::generate(decision.expr(), decision.conditions())?;
            Enumeration::Selected(mcdc::select_pairs(decision.conditions(), &rows))
        };
        blocks.push(EnumeratedDecision { header, result });
    }
    Ok(EnumerativeReport {
        decisions: blocks,
        config: config.clone(),
    })
}

impl fmt::Display for EnumerativeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(self.config.rule_width);
        writeln!(f, "MC/DC Test Report")?;
        writeln!(f, "{}", rule)?;
        writeln!(f)?;

        for block in &self.decisions {
            block.header.fmt_with(f, &self.config)?;
            match &block.result {
                Enumeration::Skipped { rows } => {
                    writeln!(
                        f,
                        "Not enumerated: {} conditions give {} combinations (limit is {} conditions).",
                        block.header.conditions.len(),
                        rows,
                        self.config.enumeration_limit()
                    )?;
                    writeln!(f, "Use observed mode to verify this decision.")?;
                }
                Enumeration::Selected(coverage) => {
                    let cases = coverage.test_cases();
                    if cases.is_empty() {
                        writeln!(f, "No MC/DC pairs possible for this decision.")?;
                    } else {
                        writeln!(f, "MC/DC Test Cases:")?;
                        writeln!(f, "{}", "-".repeat(20))?;
                        for (i, case) in cases.iter().enumerate() {
                            writeln!(f, "Test {}: {}", i + 1, case)?;
                        }
                        let missing = coverage.missing();
                        if !missing.is_empty() {
                            writeln!(f)?;
                            writeln!(f, "Not independently testable: {}", missing.join(", "))?;
                        }
                    }
                }
            }
            writeln!(f)?;
            writeln!(f, "{}", rule)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Observed cases and resulting coverage of one decision.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VerifiedDecision {
    pub header: DecisionHeader,
    /// Distinct relevant observations, in first-seen order.
    pub cases: Vec<ObservedRow>,
    pub coverage: Coverage,
}

impl VerifiedDecision {
    pub fn passed(&self) -> bool {
        self.coverage.is_complete()
    }
}

/// Report of MC/DC achieved by observed executions.
#[derive(Debug, Clone)]
pub struct VerificationReport {
    pub decisions: Vec<VerifiedDecision>,
    config: ReportConfig,
}

impl VerificationReport {
    /// Whether every decision is fully covered.
    pub fn passed(&self) -> bool {
        self.decisions.iter().all(VerifiedDecision::passed)
    }

    /// Decisions with at least one uncovered condition.
    pub fn failures(&self) -> impl Iterator<Item = &VerifiedDecision> {
        self.decisions.iter().filter(|d| !d.passed())
    }
}

/// Checks MC/DC of every decision against observed rows.
///
/// For each decision only rows over exactly its conditions are considered,
/// and repeated assignments count once.
pub fn verify(decisions: &[Decision], observed: &[ObservedRow], config: &ReportConfig) -> VerificationReport {
    let mut blocks = Vec::new();
    for decision in decisions {
        if decision.is_trivial() {
            log::debug!("line {}: no conditions in `{}`, skipping", decision.line(), decision.text());
            continue;
        }
        let cases = observed::unique_cases(observed, decision.conditions());
        let coverage = mcdc::select_pairs(decision.conditions(), &cases);
        log::debug!(
            "line {}: {} unique observations, {}/{} conditions covered",
            decision.line(),
            cases.len(),
            coverage.covered().len(),
            coverage.conditions().len()
        );
        blocks.push(VerifiedDecision {
            header: DecisionHeader::of(decision),
            cases,
            coverage,
        });
    }
    VerificationReport {
        decisions: blocks,
        config: config.clone(),
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(self.config.rule_width);
        writeln!(f, "MC/DC Verification Report")?;
        writeln!(f, "{}", rule)?;
        writeln!(f)?;

        for block in &self.decisions {
            block.header.fmt_with(f, &self.config)?;
            if block.cases.is_empty() {
                writeln!(f, "No observed cases for this decision.")?;
            } else {
                writeln!(f, "Observed Cases (unique):")?;
                writeln!(f, "{}", "-".repeat(20))?;
                for case in &block.cases {
                    writeln!(f, "{}", case)?;
                }
            }
            writeln!(f)?;
            if block.passed() {
                writeln!(f, "MC/DC Coverage: PASS")?;
            } else {
                writeln!(f, "MC/DC Coverage: FAIL (missing: {})", block.coverage.missing().join(", "))?;
            }
            writeln!(f)?;
            writeln!(f, "{}", rule)?;
            writeln!(f)?;
        }
        Ok(())
    }
}
