//! Decisions found in a program.
//!
//! A [`Decision`] is the test of one `if` (or `elif`) statement. A
//! [`Program`] holds the decisions of one source file in document order.
//!
//! # Example
//!
//! ```
//! use mcdc_rs::decision::Program;
//!
//! let src = "\
//! def check(ano):
//!     if ano < 1 or ano > 9999:
//!         raise ValueError()
//!     elif ano % 4 == 0:
//!         return True
//! ";
//! let program = Program::parse(src).unwrap();
//! assert_eq!(program.decisions().len(), 2);
//! assert_eq!(program.decisions()[0].conditions(), ["ano < 1", "ano > 9999"]);
//! assert_eq!(program.decisions()[1].line(), 4);
//! ```

use std::path::Path;

use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::lexer::{self, Token};
use crate::parser;

/// One boolean guard of a conditional branch.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Decision {
    line: usize,
    expr: Expr,
    conditions: Vec<String>,
}

impl Decision {
    /// Creates a decision from its test expression, found on `line`.
    pub fn new(expr: Expr, line: usize) -> Self {
        let conditions = expr.conditions().into_iter().collect();
        Self { line, expr, conditions }
    }

    /// 1-based line number of the statement.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Canonical text of every atomic condition, sorted.
    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    /// Whether the decision has no atomic conditions, and hence no MC/DC obligation.
    pub fn is_trivial(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Source rendering of the test.
    pub fn text(&self) -> String {
        self.expr.to_string()
    }
}

/// The decisions of one program, in document order.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Program {
    decisions: Vec<Decision>,
}

impl Program {
    pub fn new(decisions: Vec<Decision>) -> Self {
        Self { decisions }
    }

    /// Finds every `if`/`elif` statement in `src`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the source cannot be tokenized or a test
    /// is malformed.
    pub fn parse(src: &str) -> Result<Self> {
        let mut decisions = Vec::new();
        for logical in lexer::tokenize(src)? {
            let Some(first) = logical.tokens.first() else {
                continue;
            };
            if !(first.is_name("if") || first.is_name("elif")) {
                continue;
            }
            let test = test_tokens(&logical.tokens[1..])
                .ok_or_else(|| Error::parse(logical.line, format!("expected ':' after `{}` condition", first)))?;
            let expr = parser::parse_expr(test, logical.line)?;
            log::debug!("line {}: decision `{}`", logical.line, expr);
            decisions.push(Decision::new(expr, logical.line));
        }
        Ok(Self { decisions })
    }

    /// Reads and parses a source file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let src = std::fs::read_to_string(path)?;
        Self::parse(&src)
    }

    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    pub fn into_decisions(self) -> Vec<Decision> {
        self.decisions
    }
}

/// Tokens of the test: everything before the first `:` outside brackets.
fn test_tokens(tokens: &[Token]) -> Option<&[Token]> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        if token.is_open() {
            depth += 1;
        } else if token.is_close() {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && token.is_op(":") {
            return Some(&tokens[..i]);
        }
    }
    None
}
