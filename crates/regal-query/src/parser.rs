//! Recursive-descent parser for the recommendation query language.
//!
//! ```text
//! term         ::= intersection | union | final
//! intersection ::= "INTERSECTION" "(" term "," term ")"
//! union        ::= "UNION" "(" term "," term ")"
//! final        ::= strategy WS digits
//! strategy     ::= "S1" | "S2" | "S3"
//! ```
//!
//! All keywords match case-insensitively. Whitespace is skipped at every
//! production boundary and required only between a strategy and its product
//! id. The whole input must be consumed.

use crate::ast::{Strategy, Term};
use crate::error::ParseError;

/// Parse a query string into a [`Term`].
pub fn parse(input: &str) -> Result<Term, ParseError> {
    let mut cursor = Cursor::new(input);
    let term = cursor.parse_term()?;
    cursor.skip_ws();
    if !cursor.at_end() {
        return Err(ParseError::TrailingInput(cursor.rest().to_string()));
    }
    Ok(term)
}

// ─────────────────────────────────────────────
// Cursor
// ─────────────────────────────────────────────

/// Single-pass cursor over the input. Keywords are matched with one
/// fixed-length case-insensitive peek; `INTERSECTION` and `UNION` are
/// reserved, so a term starting with either is always a composite.
struct Cursor<'a> {
    input: &'a str,
    pos:   usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Consume a fixed keyword case-insensitively; on mismatch the cursor
    /// stays put.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        match self.rest().get(..keyword.len()) {
            Some(head) if head.eq_ignore_ascii_case(keyword) => {
                self.pos += keyword.len();
                true
            }
            _ => false,
        }
    }

    fn eat_char(&mut self, wanted: char) -> bool {
        if self.rest().starts_with(wanted) {
            self.pos += wanted.len_utf8();
            true
        } else {
            false
        }
    }

    // ── Productions ────────────────────────────────────

    fn parse_term(&mut self) -> Result<Term, ParseError> {
        self.skip_ws();
        if self.at_end() {
            return Err(ParseError::MissingTerm);
        }
        if self.eat_keyword("INTERSECTION") {
            return self.parse_composite("INTERSECTION", Term::Intersection);
        }
        if self.eat_keyword("UNION") {
            return self.parse_composite("UNION", Term::Union);
        }
        self.parse_final()
    }

    /// `keyword` has already been consumed.
    fn parse_composite(
        &mut self,
        keyword: &'static str,
        build: fn(Box<Term>, Box<Term>) -> Term,
    ) -> Result<Term, ParseError> {
        self.skip_ws();
        if !self.eat_char('(') {
            return Err(ParseError::ExpectedOpenParen(keyword));
        }
        let left = self.parse_term()?;
        self.skip_ws();
        if !self.eat_char(',') {
            return Err(ParseError::ExpectedComma(keyword));
        }
        let right = self.parse_term()?;
        self.skip_ws();
        if !self.eat_char(')') {
            return Err(ParseError::ExpectedCloseParen(keyword));
        }
        Ok(build(Box::new(left), Box::new(right)))
    }

    fn parse_final(&mut self) -> Result<Term, ParseError> {
        let strategy = self.parse_strategy()?;

        let before = self.pos;
        self.skip_ws();
        if self.pos == before {
            return Err(ParseError::ExpectedProductId(strategy.token()));
        }

        let digits: &str = {
            let rest = self.rest();
            let len = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
            &rest[..len]
        };
        let product_id: u64 = digits
            .parse()
            .map_err(|_| ParseError::ExpectedProductId(strategy.token()))?;
        self.pos += digits.len();

        Ok(Term::final_term(strategy, product_id))
    }

    fn parse_strategy(&mut self) -> Result<Strategy, ParseError> {
        const STRATEGIES: [(&str, Strategy); 3] = [
            ("S1", Strategy::Sibling),
            ("S2", Strategy::Successor),
            ("S3", Strategy::Predecessor),
        ];
        for (token, strategy) in STRATEGIES {
            if self.eat_keyword(token) {
                return Ok(strategy);
            }
        }
        Err(ParseError::ExpectedStrategy(self.rest().to_string()))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
