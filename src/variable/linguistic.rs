//! Linguistic expression parser
//!
//! Parses expressions such as `very hot or (warm and not cold)` over the
//! terms of one [`FuzzyVariable`](super::FuzzyVariable).
//!
//! Grammar (keywords are case-insensitive):
//!
//! ```text
//! expr    := conj ("or" conj)*
//! conj    := unary ("and" unary)*
//! unary   := "not" unary | MODIFIER unary | primary
//! primary := TERM | "(" expr ")"
//! ```
//!
//! An identifier is read as a modifier only when the registry knows it and
//! an operand follows; otherwise it is a term reference.

use std::fmt;

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{map, recognize},
    sequence::pair,
};
use tracing::debug;

use crate::error::{FuzzyError, FuzzyResult};
use crate::modifiers::ModifierRegistry;
use crate::set::FuzzySet;

/// Lexical token kinds
#[derive(Debug, Clone, PartialEq)]
enum TokenKind<'a> {
    Ident(&'a str),
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq)]
struct Token<'a> {
    kind: TokenKind<'a>,
    offset: usize,
}

impl Token<'_> {
    fn text(&self) -> &str {
        match self.kind {
            TokenKind::Ident(s) => s,
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
        }
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self.kind, TokenKind::Ident(s) if s.eq_ignore_ascii_case(keyword))
    }

    /// Can this token begin an operand?
    fn starts_operand(&self) -> bool {
        match self.kind {
            TokenKind::LParen => true,
            TokenKind::RParen => false,
            TokenKind::Ident(_) => !self.is_keyword("and") && !self.is_keyword("or"),
        }
    }
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
    ))(input)
}

fn token(input: &str) -> IResult<&str, TokenKind<'_>> {
    alt((
        map(char('('), |_| TokenKind::LParen),
        map(char(')'), |_| TokenKind::RParen),
        map(identifier, TokenKind::Ident),
    ))(input)
}

fn ws(input: &str) -> IResult<&str, &str> {
    multispace0(input)
}

fn tokenize(input: &str) -> FuzzyResult<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut rest = input;
    loop {
        if let Ok((after, _)) = ws(rest) {
            rest = after;
        }
        if rest.is_empty() {
            return Ok(tokens);
        }
        let offset = input.len() - rest.len();
        match token(rest) {
            Ok((after, kind)) => {
                tokens.push(Token { kind, offset });
                rest = after;
            }
            Err(_) => {
                let bad: String = rest.chars().take(1).collect();
                return Err(FuzzyError::unexpected_token(&bad, offset));
            }
        }
    }
}

/// Parsed linguistic expression
#[derive(Debug, Clone, PartialEq)]
pub enum LinguisticExpr {
    /// Reference to a term, with its byte offset in the source
    Term { name: String, offset: usize },
    Not(Box<LinguisticExpr>),
    And(Box<LinguisticExpr>, Box<LinguisticExpr>),
    Or(Box<LinguisticExpr>, Box<LinguisticExpr>),
    Modifier(String, Box<LinguisticExpr>),
}

impl LinguisticExpr {
    /// Parse `input`, treating the names in `modifiers` as modifiers
    pub fn parse(input: &str, modifiers: &ModifierRegistry) -> FuzzyResult<LinguisticExpr> {
        let tokens = tokenize(input)?;
        let mut parser = Parser {
            tokens: &tokens,
            pos: 0,
            modifiers,
        };
        let expr = parser.expr()?;
        if let Some(extra) = parser.peek() {
            return Err(FuzzyError::unexpected_token(extra.text(), extra.offset));
        }
        debug!(input, parsed = %expr, "parsed linguistic expression");
        Ok(expr)
    }

    /// Evaluate into set algebra, resolving term names with `lookup`
    pub fn evaluate<'a, F>(
        &self,
        variable: &str,
        lookup: &F,
        modifiers: &ModifierRegistry,
    ) -> FuzzyResult<FuzzySet>
    where
        F: Fn(&str) -> Option<&'a FuzzySet>,
    {
        match self {
            LinguisticExpr::Term { name, offset } => lookup(name)
                .cloned()
                .ok_or_else(|| FuzzyError::unknown_term(name, variable, *offset)),
            LinguisticExpr::Not(inner) => {
                Ok(inner.evaluate(variable, lookup, modifiers)?.complement())
            }
            LinguisticExpr::And(a, b) => {
                let left = a.evaluate(variable, lookup, modifiers)?;
                let right = b.evaluate(variable, lookup, modifiers)?;
                Ok(left.intersection(&right))
            }
            LinguisticExpr::Or(a, b) => {
                let left = a.evaluate(variable, lookup, modifiers)?;
                let right = b.evaluate(variable, lookup, modifiers)?;
                Ok(left.union(&right))
            }
            LinguisticExpr::Modifier(name, inner) => {
                let set = inner.evaluate(variable, lookup, modifiers)?;
                modifiers.apply(name, &set)
            }
        }
    }

    /// Names of every term referenced, in source order
    pub fn terms(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_terms(&mut out);
        out
    }

    fn collect_terms<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            LinguisticExpr::Term { name, .. } => out.push(name),
            LinguisticExpr::Not(inner) | LinguisticExpr::Modifier(_, inner) => {
                inner.collect_terms(out)
            }
            LinguisticExpr::And(a, b) | LinguisticExpr::Or(a, b) => {
                a.collect_terms(out);
                b.collect_terms(out);
            }
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            LinguisticExpr::Or(..) => 1,
            LinguisticExpr::And(..) => 2,
            LinguisticExpr::Not(_) | LinguisticExpr::Modifier(..) => 3,
            LinguisticExpr::Term { .. } => 4,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for LinguisticExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinguisticExpr::Term { name, .. } => write!(f, "{}", name),
            LinguisticExpr::Not(inner) => {
                write!(f, "not ")?;
                inner.fmt_operand(f, 3)
            }
            LinguisticExpr::Modifier(name, inner) => {
                write!(f, "{} ", name)?;
                inner.fmt_operand(f, 3)
            }
            // left-associative: the right operand needs parens at equal precedence
            LinguisticExpr::And(a, b) => {
                a.fmt_operand(f, 2)?;
                write!(f, " and ")?;
                b.fmt_operand(f, 3)
            }
            LinguisticExpr::Or(a, b) => {
                a.fmt_operand(f, 1)?;
                write!(f, " or ")?;
                b.fmt_operand(f, 2)
            }
        }
    }
}

struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
    modifiers: &'t ModifierRegistry,
}

impl<'t, 'a> Parser<'t, 'a> {
    fn peek(&self) -> Option<&'t Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, ahead: usize) -> Option<&'t Token<'a>> {
        self.tokens.get(self.pos + ahead)
    }

    fn advance(&mut self) -> Option<&'t Token<'a>> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> FuzzyResult<LinguisticExpr> {
        let mut lhs = self.conj()?;
        while self.peek().is_some_and(|t| t.is_keyword("or")) {
            self.advance();
            let rhs = self.conj()?;
            lhs = LinguisticExpr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn conj(&mut self) -> FuzzyResult<LinguisticExpr> {
        let mut lhs = self.unary()?;
        while self.peek().is_some_and(|t| t.is_keyword("and")) {
            self.advance();
            let rhs = self.unary()?;
            lhs = LinguisticExpr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> FuzzyResult<LinguisticExpr> {
        let Some(token) = self.peek() else {
            return Err(FuzzyError::unexpected_end("a term"));
        };
        if token.is_keyword("not") {
            self.advance();
            return Ok(LinguisticExpr::Not(Box::new(self.unary()?)));
        }
        if let TokenKind::Ident(name) = token.kind {
            let operand_follows = self.peek_at(1).is_some_and(Token::starts_operand);
            if operand_follows && self.modifiers.contains(name) {
                self.advance();
                let inner = self.unary()?;
                return Ok(LinguisticExpr::Modifier(name.to_lowercase(), Box::new(inner)));
            }
        }
        self.primary()
    }

    fn primary(&mut self) -> FuzzyResult<LinguisticExpr> {
        let Some(token) = self.advance() else {
            return Err(FuzzyError::unexpected_end("a term"));
        };
        match token.kind {
            TokenKind::Ident(_) if token.is_keyword("and") || token.is_keyword("or") => {
                Err(FuzzyError::unexpected_token(token.text(), token.offset))
            }
            TokenKind::Ident(name) => Ok(LinguisticExpr::Term {
                name: name.to_string(),
                offset: token.offset,
            }),
            TokenKind::LParen => {
                let inner = self.expr()?;
                match self.advance() {
                    Some(close) if close.kind == TokenKind::RParen => Ok(inner),
                    Some(other) => Err(FuzzyError::unexpected_token(other.text(), other.offset)
                        .with_hint("expected ')'")),
                    None => Err(FuzzyError::unexpected_end("')'")),
                }
            }
            TokenKind::RParen => Err(FuzzyError::unexpected_token(token.text(), token.offset)),
        }
    }
}
