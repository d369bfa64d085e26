//! Recursive-descent parser for decision tests.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expr     ::= conditional | or_expr
//! or_expr  ::= and_expr ("or" and_expr)*
//! and_expr ::= not_expr ("and" not_expr)*
//! not_expr ::= "not" not_expr | operand
//! operand  ::= maximal token run up to a top-level "and" / "or"
//! ```
//!
//! A `conditional` is any run with a top-level `if ... else`, `lambda` or
//! `:=`. These bind looser than `and`/`or`, so the whole run is a single
//! [`Expr::Opaque`].
//!
//! An operand wrapped in a single pair of parentheses is parsed again as a
//! nested expression, so `(a or b)` becomes a group and `(x > 1)` loses its
//! redundant parentheses. Other operands are classified:
//!
//! - a lone identifier is an atomic condition,
//! - a run with a top-level comparison (`<`, `==`, `in`, `is not`, ...) is an
//!   atomic condition,
//! - anything else is [`Expr::Opaque`].
//!
//! Conditions are named by their canonical text, see [`render`].

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::lexer::{self, Token, TokenKind};

const COMPARISONS: &[&str] = &["<", ">", "==", "!=", "<=", ">="];

/// Parses a decision test from its tokens. `line` is used in error messages.
pub fn parse_expr(tokens: &[Token], line: usize) -> Result<Expr> {
    if tokens.is_empty() {
        return Err(Error::parse(line, "empty condition"));
    }
    let mut parser = Parser::new(tokens, line);
    let expr = parser.expr()?;
    if let Some(token) = parser.current() {
        return Err(Error::parse(line, format!("unexpected `{}`", token)));
    }
    Ok(expr)
}

/// Parses a standalone boolean expression such as `a > 1 and not b`.
impl FromStr for Expr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lines = lexer::tokenize(s)?;
        match lines.as_slice() {
            [] => Err(Error::parse(1, "empty condition")),
            [single] => parse_expr(&single.tokens, single.line),
            [_, second, ..] => Err(Error::parse(second.line, "expression spans several logical lines")),
        }
    }
}

/// Parser state over the tokens of one test.
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    line: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], line: usize) -> Self {
        Self { tokens, pos: 0, line }
    }

    // Token access

    fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn rest(&self) -> &'a [Token] {
        &self.tokens[self.pos..]
    }

    fn eat(&mut self, name: &str) -> bool {
        if self.current().is_some_and(|t| t.is_name(name)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    // Parsing

    /// Whole expression: a conditional expression swallows everything.
    fn expr(&mut self) -> Result<Expr> {
        let rest = self.rest();
        if is_conditional(rest) {
            self.pos = self.tokens.len();
            return Ok(Expr::opaque(render(rest)));
        }
        self.or_expr()
    }

    /// Or expressions: `a or b or c`, flattened.
    fn or_expr(&mut self) -> Result<Expr> {
        let mut children = vec![self.and_expr()?];
        while self.eat("or") {
            children.push(self.and_expr()?);
        }
        Ok(if children.len() == 1 {
            children.remove(0)
        } else {
            Expr::Or(children)
        })
    }

    /// And expressions: `a and b and c`, flattened.
    fn and_expr(&mut self) -> Result<Expr> {
        let mut children = vec![self.not_expr()?];
        while self.eat("and") {
            children.push(self.not_expr()?);
        }
        Ok(if children.len() == 1 {
            children.remove(0)
        } else {
            Expr::And(children)
        })
    }

    fn not_expr(&mut self) -> Result<Expr> {
        if self.eat("not") {
            return Ok(self.not_expr()?.not());
        }
        self.operand()
    }

    fn operand(&mut self) -> Result<Expr> {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(token) = self.current() {
            if depth == 0 && (token.is_name("and") || token.is_name("or")) {
                break;
            }
            if token.is_open() {
                depth += 1;
            } else if token.is_close() {
                if depth == 0 {
                    return Err(Error::parse(self.line, format!("unmatched `{}`", token)));
                }
                depth -= 1;
            }
            self.pos += 1;
        }

        let operand = &self.tokens[start..self.pos];
        match operand.first() {
            None => {
                let msg = match self.current() {
                    Some(token) => format!("expected an operand before `{}`", token),
                    None => "expected an operand at end of condition".to_string(),
                };
                Err(Error::parse(self.line, msg))
            }
            Some(_) if depth > 0 => Err(Error::parse(self.line, "unclosed bracket in condition")),
            Some(_) => classify(operand, self.line),
        }
    }
}

/// Checks for a top-level `x if c else y`, `lambda` or `:=`.
fn is_conditional(tokens: &[Token]) -> bool {
    has_top_level(tokens, |t| t.is_name("if") || t.is_name("lambda") || t.is_op(":="))
}

fn classify(operand: &[Token], line: usize) -> Result<Expr> {
    if let Some(inner) = strip_parens(operand) {
        // A parenthesized conditional keeps its parentheses.
        if !inner.is_empty() && !has_top_level(inner, |t| t.is_op(",")) && !is_conditional(inner) {
            return parse_expr(inner, line);
        }
    }

    if let [token] = operand {
        if token.kind == TokenKind::Name && !token.is_keyword() {
            return Ok(Expr::atom(token.text.clone()));
        }
    }

    let is_comparison = |t: &Token| {
        (t.kind == TokenKind::Op && COMPARISONS.contains(&t.text.as_str())) || t.is_name("in") || t.is_name("is")
    };
    if has_top_level(operand, is_comparison) {
        Ok(Expr::atom(render(operand)))
    } else {
        Ok(Expr::opaque(render(operand)))
    }
}

/// The tokens inside `( ... )` if the parentheses enclose the whole run.
fn strip_parens(tokens: &[Token]) -> Option<&[Token]> {
    let (first, last) = (tokens.first()?, tokens.last()?);
    if tokens.len() < 2 || !first.is_op("(") || !last.is_op(")") {
        return None;
    }
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        if token.is_open() {
            depth += 1;
        } else if token.is_close() {
            depth -= 1;
            if depth == 0 && i != tokens.len() - 1 {
                return None;
            }
        }
    }
    Some(&tokens[1..tokens.len() - 1])
}

fn has_top_level(tokens: &[Token], pred: impl Fn(&Token) -> bool) -> bool {
    let mut depth = 0usize;
    for token in tokens {
        if token.is_open() {
            depth += 1;
        } else if token.is_close() {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && pred(token) {
            return true;
        }
    }
    false
}

/// Renders tokens as canonical source text.
///
/// Binary operators and keywords are surrounded by single spaces; brackets,
/// commas, attribute dots, calls, subscripts and unary operators are written
/// tightly. Spelling differences in whitespace therefore vanish:
/// `x<1`, `x < 1` and `x  <1` all render as `x < 1`.
pub fn render(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut brackets: Vec<&str> = Vec::new();
    let mut prev: Option<&Token> = None;
    // Set when the next token must be written without a leading space.
    let mut glue = true;

    for token in tokens {
        let text = token.text.as_str();
        let tight_before = token.is_close()
            || token.is_op(",")
            || token.is_op(".")
            || token.is_op(":")
            || (token.is_op("=") && brackets.last() == Some(&"("))
            || ((token.is_op("(") || token.is_op("[")) && prev.is_some_and(is_value_end));

        if !glue && !tight_before {
            out.push(' ');
        }
        out.push_str(text);

        glue = token.is_open()
            || token.is_op(".")
            || (token.is_op("=") && brackets.last() == Some(&"("))
            || (token.is_op(":") && brackets.last() == Some(&"["))
            || (is_unary_candidate(token) && prev.map_or(true, |p| !is_value_end(p)));

        if token.is_open() {
            brackets.push(text);
        } else if token.is_close() {
            brackets.pop();
        }
        prev = Some(token);
    }
    out
}

fn is_unary_candidate(token: &Token) -> bool {
    token.is_op("-") || token.is_op("+") || token.is_op("~")
}

/// Checks whether a token can end an operand, so that a following `(` is a call.
fn is_value_end(token: &Token) -> bool {
    match token.kind {
        TokenKind::Name => !token.is_keyword() || matches!(token.text.as_str(), "True" | "False" | "None"),
        TokenKind::Number | TokenKind::Str => true,
        TokenKind::Op => token.is_close(),
    }
}
