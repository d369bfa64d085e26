use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::types::Assignment;

impl Expr {
    /// Evaluates the expression structurally under `assignment`.
    ///
    /// This simulates the decision rather than executing it: every child of a
    /// connective is evaluated, `and` is universal and `or` existential over the
    /// children. [`Expr::Opaque`] evaluates to `false`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCondition`] if a condition of the expression has
    /// no value in `assignment`. A partial assignment is a caller bug and is never
    /// silently defaulted.
    pub fn eval(&self, assignment: &Assignment) -> Result<bool> {
        match self {
            Expr::Atom(text) => assignment.get(text).ok_or_else(|| Error::MissingCondition {
                condition: text.clone(),
            }),
            Expr::Not(e) => Ok(!e.eval(assignment)?),
            Expr::And(children) => {
                let mut result = true;
                for child in children {
                    result &= child.eval(assignment)?;
                }
                Ok(result)
            }
            Expr::Or(children) => {
                let mut result = false;
                for child in children {
                    result |= child.eval(assignment)?;
                }
                Ok(result)
            }
            Expr::Opaque(_) => Ok(false),
        }
    }
}
