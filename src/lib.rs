//! # mcdc-rs: MC/DC test generation and verification
//!
//! **Modified Condition/Decision Coverage** (MC/DC) requires that every atomic
//! condition of a decision is shown to *independently* affect the decision's
//! outcome: there must be two test cases that differ only in that condition and
//! produce different outcomes. It is the structural coverage criterion of
//! DO-178C level A and similar safety standards.
//!
//! This crate finds the decisions (`if`/`elif` tests) of a Python-like program,
//! decomposes them into atomic conditions, and either
//!
//! - **enumerates** the full truth table of each decision and selects a minimal
//!   set of test cases achieving MC/DC, or
//! - **verifies** a set of assignments *observed* while running a real test
//!   suite, reporting which conditions the suite fails to demonstrate.
//!
//! ## Basic Usage
//!
//! ```rust
//! use mcdc_rs::decision::Program;
//! use mcdc_rs::report::{self, ReportConfig};
//!
//! let program = Program::parse("if a and b:\n    pass\n").unwrap();
//! let report = report::enumerate(program.decisions(), &ReportConfig::default()).unwrap();
//!
//! // For `a and b`: TT -> true, FT -> false, TF -> false.
//! assert_eq!(report.decisions[0].test_cases().len(), 3);
//! println!("{}", report);
//! ```
//!
//! ## Core Components
//!
//! - **[`expr`]**: Boolean expression trees and condition extraction.
//! - **[`eval`]**: Structural evaluation under an assignment.
//! - **[`table`]**: Exhaustive truth tables.
//! - **[`mcdc`]**: The isolating-pair selection at the heart of MC/DC.
//! - **[`report`]**: Enumerative and observed-mode reports.
//!
//! Source handling lives in [`lexer`], [`parser`] and [`decision`]; observed
//! rows are read by [`observed`] and collected by [`recorder`].

pub mod decision;
pub mod error;
pub mod eval;
pub mod expr;
pub mod lexer;
pub mod mcdc;
pub mod observed;
pub mod parser;
pub mod recorder;
pub mod report;
pub mod table;
pub mod types;

pub use error::{Error, Result};
