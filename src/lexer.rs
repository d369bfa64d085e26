//! Tokenizer for Python-like source.
//!
//! The lexer only knows enough of the language to find decisions: it splits
//! the source into *logical lines* (physical lines joined while a bracket is
//! open or after a trailing backslash), drops comments, and keeps string
//! literals verbatim. Indentation is not tracked.

use std::fmt;

use crate::error::{Error, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TokenKind {
    /// Identifier or keyword.
    Name,
    Number,
    /// String literal, including prefix and quotes.
    Str,
    /// Operator or delimiter.
    Op,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn is_name(&self, name: &str) -> bool {
        self.kind == TokenKind::Name && self.text == name
    }

    pub fn is_op(&self, op: &str) -> bool {
        self.kind == TokenKind::Op && self.text == op
    }

    pub fn is_open(&self) -> bool {
        self.kind == TokenKind::Op && matches!(self.text.as_str(), "(" | "[" | "{")
    }

    pub fn is_close(&self) -> bool {
        self.kind == TokenKind::Op && matches!(self.text.as_str(), ")" | "]" | "}")
    }

    /// Checks for a reserved word (as opposed to a plain identifier).
    pub fn is_keyword(&self) -> bool {
        self.kind == TokenKind::Name && KEYWORDS.contains(&self.text.as_str())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
    "elif", "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda", "nonlocal",
    "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

/// Operators, longest first.
const OPERATORS: &[&str] = &[
    "**=", "//=", ">>=", "<<=", "...", "!=", "==", "<=", ">=", "->", ":=", "**", "//", "<<", ">>", "+=", "-=",
    "*=", "/=", "%=", "&=", "|=", "^=", "@=", "+", "-", "*", "/", "%", "@", "&", "|", "^", "~", "<", ">", "(", ")",
    "[", "]", "{", "}", ",", ":", ".", ";", "=",
];

/// A run of tokens forming one logical line of source.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LogicalLine {
    /// 1-based number of the physical line the logical line starts on.
    pub line: usize,
    pub tokens: Vec<Token>,
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    /// Open brackets with the line they were opened on.
    brackets: Vec<(char, usize)>,
    current: Vec<Token>,
    current_line: usize,
    lines: Vec<LogicalLine>,
}

/// Splits `src` into logical lines of tokens.
///
/// # Errors
///
/// Returns [`Error::Parse`] on unterminated strings, unmatched or unclosed
/// brackets, and characters that cannot start a token.
pub fn tokenize(src: &str) -> Result<Vec<LogicalLine>> {
    let mut lexer = Lexer {
        chars: src.chars().collect(),
        pos: 0,
        line: 1,
        brackets: Vec::new(),
        current: Vec::new(),
        current_line: 1,
        lines: Vec::new(),
    };
    lexer.run()?;
    Ok(lexer.lines)
}

impl Lexer {
    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn push(&mut self, kind: TokenKind, text: String, line: usize) {
        if self.current.is_empty() {
            self.current_line = line;
        }
        self.current.push(Token::new(kind, text));
    }

    fn end_line(&mut self) {
        if !self.current.is_empty() {
            let tokens = std::mem::take(&mut self.current);
            self.lines.push(LogicalLine {
                line: self.current_line,
                tokens,
            });
        }
    }

    fn run(&mut self) -> Result<()> {
        while let Some(c) = self.peek(0) {
            match c {
                '#' => {
                    while self.peek(0).is_some_and(|c| c != '\n') {
                        self.pos += 1;
                    }
                }
                '\\' if self.peek(1) == Some('\n') => {
                    self.pos += 2;
                    self.line += 1;
                }
                '\\' if self.peek(1) == Some('\r') && self.peek(2) == Some('\n') => {
                    self.pos += 3;
                    self.line += 1;
                }
                '\n' => {
                    self.pos += 1;
                    if self.brackets.is_empty() {
                        self.end_line();
                    }
                    self.line += 1;
                }
                c if c.is_whitespace() => self.pos += 1,
                '"' | '\'' => self.string(0)?,
                c if c.is_alphabetic() || c == '_' => match self.string_prefix_len() {
                    Some(len) => self.string(len)?,
                    None => self.name(),
                },
                c if c.is_ascii_digit() => self.number(),
                '.' if self.peek(1).is_some_and(|c| c.is_ascii_digit()) => self.number(),
                _ => self.operator()?,
            }
        }

        if let Some(&(open, line)) = self.brackets.last() {
            return Err(Error::parse(line, format!("'{}' was never closed", open)));
        }
        self.end_line();
        Ok(())
    }

    /// Length of a string prefix (`r`, `b`, `f`, `rb`, ...) at the cursor, if a quote follows it.
    fn string_prefix_len(&self) -> Option<usize> {
        let is_prefix = |c: char| matches!(c.to_ascii_lowercase(), 'r' | 'b' | 'u' | 'f');
        let mut len = 0;
        while len < 2 && self.peek(len).is_some_and(is_prefix) {
            len += 1;
        }
        match self.peek(len) {
            Some('"' | '\'') if len > 0 => Some(len),
            _ => None,
        }
    }

    fn string(&mut self, prefix_len: usize) -> Result<()> {
        let start = self.pos;
        let start_line = self.line;
        self.pos += prefix_len;
        let quote = self.chars[self.pos];
        let triple = self.peek(1) == Some(quote) && self.peek(2) == Some(quote);
        self.pos += if triple { 3 } else { 1 };

        loop {
            match self.peek(0) {
                None => return Err(Error::parse(start_line, "unterminated string literal")),
                Some('\\') => {
                    if self.peek(1) == Some('\n') {
                        self.line += 1;
                    }
                    self.pos += 2;
                }
                Some('\n') if !triple => return Err(Error::parse(start_line, "unterminated string literal")),
                Some('\n') => {
                    self.line += 1;
                    self.pos += 1;
                }
                Some(c) if c == quote => {
                    if !triple {
                        self.pos += 1;
                        break;
                    }
                    if self.peek(1) == Some(quote) && self.peek(2) == Some(quote) {
                        self.pos += 3;
                        break;
                    }
                    self.pos += 1;
                }
                Some(_) => self.pos += 1,
            }
        }

        let end = self.pos.min(self.chars.len());
        let text: String = self.chars[start..end].iter().collect();
        self.push(TokenKind::Str, text, start_line);
        Ok(())
    }

    fn name(&mut self) {
        let start = self.pos;
        while self.peek(0).is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let text = self.chars[start..self.pos].iter().collect();
        self.push(TokenKind::Name, text, self.line);
    }

    fn number(&mut self) {
        let start = self.pos;
        while let Some(c) = self.peek(0) {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                self.pos += 1;
            } else if matches!(c, '+' | '-')
                && matches!(self.chars[self.pos - 1], 'e' | 'E')
                && !self.chars[start..self.pos].iter().any(|c| matches!(c, 'x' | 'X'))
            {
                // Exponent sign, as in `1e-5`.
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = self.chars[start..self.pos].iter().collect();
        self.push(TokenKind::Number, text, self.line);
    }

    fn operator(&mut self) -> Result<()> {
        let op = OPERATORS.iter().find(|op| {
            op.chars()
                .enumerate()
                .all(|(i, c)| self.peek(i) == Some(c))
        });
        let Some(op) = op else {
            let c = self.chars[self.pos];
            return Err(Error::parse(self.line, format!("unexpected character '{}'", c)));
        };

        match *op {
            "(" | "[" | "{" => {
                let c = self.chars[self.pos];
                self.brackets.push((c, self.line));
            }
            ")" | "]" | "}" => {
                let close = self.chars[self.pos];
                let expected = match close {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match self.brackets.pop() {
                    Some((open, _)) if open == expected => {}
                    Some((open, line)) => {
                        return Err(Error::parse(
                            self.line,
                            format!("closing '{}' does not match '{}' opened on line {}", close, open, line),
                        ))
                    }
                    None => return Err(Error::parse(self.line, format!("unmatched '{}'", close))),
                }
            }
            _ => {}
        }

        self.pos += op.len();
        self.push(TokenKind::Op, op.to_string(), self.line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn texts(line: &LogicalLine) -> Vec<&str> {
        line.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_simple_lines() {
        let lines = tokenize("x = 1\nif x >= 2:\n    y = x\n").unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(texts(&lines[1]), vec!["if", "x", ">=", "2", ":"]);
        assert_eq!(lines[1].line, 2);
        assert_eq!(lines[2].line, 3);
    }

    #[test]
    fn test_brackets_join_lines() {
        let lines = tokenize("if (a and\n    b):\n    pass\n").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(texts(&lines[0]), vec!["if", "(", "a", "and", "b", ")", ":"]);
        assert_eq!(lines[1].line, 3);
    }

    #[test]
    fn test_backslash_continuation() {
        let lines = tokenize("if a or \\\n   b:\n  pass").unwrap();
        assert_eq!(texts(&lines[0]), vec!["if", "a", "or", "b", ":"]);
        assert_eq!(lines[1].line, 3);
    }

    #[test]
    fn test_comments_dropped() {
        let lines = tokenize("# header\nif a: # why\n    pass\n").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(texts(&lines[0]), vec!["if", "a", ":"]);
    }

    #[test]
    fn test_strings() {
        let lines = tokenize("if s == 'a#b' or t != r\"x\\\"y\":\n  pass\n").unwrap();
        let tokens = &lines[0].tokens;
        assert_eq!(tokens[3], Token::new(TokenKind::Str, "'a#b'"));
        assert_eq!(tokens[7], Token::new(TokenKind::Str, "r\"x\\\"y\""));
    }

    #[test]
    fn test_triple_quoted_string_spans_lines() {
        let lines = tokenize("doc = \"\"\"one\ntwo\"\"\"\nif a:\n  pass\n").unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].line, 3);
    }

    #[test]
    fn test_operators_longest_match() {
        let lines = tokenize("a<=b!=c**d:=e").unwrap();
        assert_eq!(texts(&lines[0]), vec!["a", "<=", "b", "!=", "c", "**", "d", ":=", "e"]);
    }

    #[test]
    fn test_numbers() {
        let lines = tokenize("x = 1e-5 + 0x1F + .5 + 1_000").unwrap();
        assert_eq!(texts(&lines[0]), vec!["x", "=", "1e-5", "+", "0x1F", "+", ".5", "+", "1_000"]);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("x = 1\nif s == 'abc:\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn test_unclosed_bracket() {
        let err = tokenize("if (a and b:\n  pass\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn test_unmatched_bracket() {
        let err = tokenize("x = 1)\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn test_unexpected_character() {
        assert!(tokenize("x = $y").is_err());
    }
}
