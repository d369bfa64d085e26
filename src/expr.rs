//! Boolean expressions of a decision.
//!
//! An [`Expr`] is the test of one `if`, decomposed into connectives
//! (`and`, `or`, `not`) over atomic conditions. Atomic conditions are
//! identified by their canonical text: two syntactically identical
//! conditions are the *same* condition, so `a or b or a` has two conditions.
//!
//! Sub-expressions that are neither connectives nor conditions (calls,
//! constants, arithmetic) are kept as [`Expr::Opaque`]. They contribute no
//! condition and evaluate to `false`.

use std::collections::BTreeSet;
use std::fmt;

/// A boolean expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// Atomic condition, by canonical text.
    Atom(String),
    /// Logical NOT.
    Not(Box<Expr>),
    /// Logical AND over all children.
    And(Vec<Expr>),
    /// Logical OR over all children.
    Or(Vec<Expr>),
    /// Anything outside the boolean grammar, by canonical text.
    Opaque(String),
}

impl Expr {
    pub fn atom(text: impl Into<String>) -> Self {
        Expr::Atom(text.into())
    }

    pub fn opaque(text: impl Into<String>) -> Self {
        Expr::Opaque(text.into())
    }

    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }

    pub fn and(children: impl IntoIterator<Item = Expr>) -> Self {
        Expr::And(children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Or(children.into_iter().collect())
    }

    /// The distinct atomic conditions of this expression, sorted by canonical text.
    ///
    /// Negation introduces no new condition: `not x` and `x` share `x`.
    pub fn conditions(&self) -> BTreeSet<String> {
        let mut acc = BTreeSet::new();
        self.collect_conditions(&mut acc);
        acc
    }

    fn collect_conditions(&self, acc: &mut BTreeSet<String>) {
        match self {
            Expr::Atom(text) => {
                acc.insert(text.clone());
            }
            Expr::Not(e) => e.collect_conditions(acc),
            Expr::And(children) | Expr::Or(children) => {
                for child in children {
                    child.collect_conditions(acc);
                }
            }
            Expr::Opaque(_) => {}
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Or(_) => 1,
            Expr::And(_) => 2,
            Expr::Not(_) => 3,
            Expr::Atom(_) | Expr::Opaque(_) => 4,
        }
    }

    fn fmt_child(&self, f: &mut fmt::Formatter<'_>, parenthesize: bool) -> fmt::Result {
        if parenthesize {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }

    fn fmt_connective(f: &mut fmt::Formatter<'_>, children: &[Expr], op: &str, prec: u8) -> fmt::Result {
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", op)?;
            }
            // Same-kind children are explicit groups, otherwise they would have been flattened.
            child.fmt_child(f, child.precedence() <= prec)?;
        }
        Ok(())
    }
}

/// Renders the expression in source syntax, parenthesizing only where needed.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Atom(text) | Expr::Opaque(text) => write!(f, "{}", text),
            Expr::Not(e) => {
                write!(f, "not ")?;
                e.fmt_child(f, e.precedence() < self.precedence())
            }
            Expr::And(children) => Expr::fmt_connective(f, children, "and", self.precedence()),
            Expr::Or(children) => Expr::fmt_connective(f, children, "or", self.precedence()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_conditions_deduplicated() {
        let e = Expr::or([Expr::atom("a"), Expr::atom("b"), Expr::atom("a")]);
        let conditions: Vec<_> = e.conditions().into_iter().collect();
        assert_eq!(conditions, vec!["a", "b"]);
    }

    #[test]
    fn test_conditions_through_negation() {
        let e = Expr::and([Expr::atom("x > 0"), Expr::atom("x > 0").not()]);
        assert_eq!(e.conditions().len(), 1);
    }

    #[test]
    fn test_conditions_skip_opaque() {
        let e = Expr::and([Expr::opaque("f(x)"), Expr::atom("y")]);
        let conditions: Vec<_> = e.conditions().into_iter().collect();
        assert_eq!(conditions, vec!["y"]);
        assert!(Expr::opaque("True").conditions().is_empty());
    }

    #[test]
    fn test_display_precedence() {
        let e = Expr::or([
            Expr::and([Expr::atom("a"), Expr::atom("b")]),
            Expr::atom("c").not(),
        ]);
        assert_eq!(e.to_string(), "a and b or not c");

        let e = Expr::and([Expr::or([Expr::atom("a"), Expr::atom("b")]), Expr::atom("c")]);
        assert_eq!(e.to_string(), "(a or b) and c");

        let e = Expr::or([Expr::atom("a"), Expr::atom("b")]).not();
        assert_eq!(e.to_string(), "not (a or b)");
    }

    #[test]
    fn test_display_explicit_group() {
        let e = Expr::and([Expr::atom("a"), Expr::and([Expr::atom("b"), Expr::atom("c")])]);
        assert_eq!(e.to_string(), "a and (b and c)");
    }
}
