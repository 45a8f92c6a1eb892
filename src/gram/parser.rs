//! Gram recursive descent parser.
//!
//! Parses token streams into `Pattern<Subject>` trees. Supports:
//! - Nodes `(id:Label {k: v})` and relationship chains in every arrow form
//! - Groups `[id:Label {k: v} | element, ...]`, nested to any depth
//! - Annotations `@key(value)` in front of any pattern
//! - The full value literal grammar
//!
//! Structural rules are checked inline and the first violation is returned.

use super::lexer::{Token, TokenKind};
use super::options::ParseOptions;
use crate::model::{Pattern, PropertyMap, Subject, Symbol, Value};
use crate::{Limit, Location, ParseError, Result};

/// Parser state — wraps a token slice with cursor and the stack of
/// currently open brackets.
struct Parser<'t> {
    tokens: &'t [Token],
    source: &'t str,
    pos: usize,
    /// Token indices of unclosed `(`, `[`, `{`, innermost last.
    open: Vec<usize>,
    max_depth: usize,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token], source: &'t str, options: &ParseOptions) -> Self {
        Self { tokens, source, pos: 0, open: Vec::new(), max_depth: options.max_depth }
    }

    fn peek(&self) -> &'t Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn advance(&mut self) -> &'t Token {
        let tok = self.peek();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&'t Token> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    fn location(&self, offset: usize) -> Location {
        Location::from_offset(self.source, offset)
    }

    fn here(&self) -> Location {
        self.location(self.peek().span.start)
    }

    /// Error for the current token. Running out of input inside a bracket
    /// reports the innermost unclosed bracket instead.
    fn unexpected(&self, expected: &str) -> ParseError {
        if self.at(TokenKind::Eof) {
            if let Some(&idx) = self.open.last() {
                let opener = &self.tokens[idx];
                return ParseError::UnclosedBracket {
                    location: self.location(opener.span.start),
                    bracket: opener.text.chars().next().unwrap_or('('),
                };
            }
        }
        ParseError::UnexpectedToken {
            location: self.here(),
            found: describe(self.peek()),
            expected: expected.to_string(),
        }
    }

    /// Consume an opening bracket and enter one nesting level.
    fn open(&mut self, kind: TokenKind) -> Result<()> {
        if !self.at(kind) {
            return Err(self.unexpected(kind.describe()));
        }
        if self.open.len() >= self.max_depth {
            return Err(ParseError::LimitExceeded {
                location: self.here(),
                limit: Limit::Depth(self.max_depth),
            });
        }
        self.open.push(self.pos);
        self.advance();
        Ok(())
    }

    /// Consume the closing bracket for the innermost open one.
    fn close(&mut self, kind: TokenKind) -> Result<()> {
        if !self.at(kind) {
            return Err(self.unexpected(kind.describe()));
        }
        self.advance();
        self.open.pop();
        Ok(())
    }
}

fn describe(tok: &Token) -> String {
    match tok.kind {
        TokenKind::Identifier | TokenKind::StringLiteral | TokenKind::Integer | TokenKind::Decimal => {
            format!("{} '{}'", tok.kind.describe(), tok.text)
        }
        kind => kind.describe().to_string(),
    }
}

/// Relationship orientation as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// `-->`, `-[..]->`, `->`, `~~>`
    Right,
    /// `<--`, `<-[..]-`, `<-`, `<~~`
    Left,
    /// `--`, `<-->`, `~~`, `<~~>` and their detailed forms
    Both,
}

// ============================================================================
// Entry points
// ============================================================================

/// Parse every top-level pattern in the token stream.
pub(crate) fn parse_document(
    tokens: &[Token],
    source: &str,
    options: &ParseOptions,
) -> Result<Vec<Pattern<Subject>>> {
    let mut p = Parser::new(tokens, source, options);
    let mut patterns = Vec::new();
    while !p.at(TokenKind::Eof) {
        patterns.push(parse_annotated(&mut p)?);
    }
    Ok(patterns)
}

/// Parse exactly one top-level pattern.
pub(crate) fn parse_single_pattern(
    tokens: &[Token],
    source: &str,
    options: &ParseOptions,
) -> Result<Pattern<Subject>> {
    let mut p = Parser::new(tokens, source, options);
    if p.at(TokenKind::Eof) {
        return Err(p.unexpected("a pattern"));
    }
    let pattern = parse_annotated(&mut p)?;
    if !p.at(TokenKind::Eof) {
        return Err(p.unexpected("end of input after a single pattern"));
    }
    Ok(pattern)
}

// ============================================================================
// Patterns
// ============================================================================

/// `@k(v) @k2(v2) pattern`, or a bare pattern.
fn parse_annotated(p: &mut Parser) -> Result<Pattern<Subject>> {
    if !p.at(TokenKind::At) {
        return parse_pattern(p);
    }

    let start = p.peek().span.start;
    let mut first_name = None;
    let mut annotations = PropertyMap::new();

    while p.at(TokenKind::At) {
        p.advance();
        let name_tok = p.expect(TokenKind::Identifier)?;
        let name = name_tok.text.clone();
        if annotations.contains_key(&name) {
            return Err(ParseError::DuplicateKey {
                location: p.location(name_tok.span.start),
                key: name,
            });
        }
        p.open(TokenKind::LParen)?;
        if p.at(TokenKind::RParen) {
            return Err(ParseError::EmptyPropertyValue { location: p.here(), key: name });
        }
        let value = parse_value(p)?;
        p.close(TokenKind::RParen)?;
        first_name.get_or_insert_with(|| name.clone());
        annotations.insert(name, value);
    }

    if !(p.at(TokenKind::LParen) || p.at(TokenKind::LBracket)) {
        return Err(ParseError::DanglingAnnotation {
            location: p.location(start),
            name: first_name.unwrap_or_default(),
        });
    }

    let inner = parse_pattern(p)?;
    let mut subject = Subject::anonymous();
    subject.properties = annotations;
    Ok(Pattern::pattern(subject, vec![inner]))
}

fn parse_pattern(p: &mut Parser) -> Result<Pattern<Subject>> {
    match p.peek_kind() {
        TokenKind::LParen => parse_path(p),
        TokenKind::LBracket => parse_group(p),
        TokenKind::LBrace => Err(ParseError::OrphanProperties { location: p.here() }),
        _ => Err(p.unexpected("'(' or '['")),
    }
}

/// A node optionally followed by relationship segments.
///
/// One segment yields the relationship pattern itself: an anonymous-or-named
/// relationship subject over `[source, target]`. Longer chains yield an
/// anonymous pattern over the segments in order.
fn parse_path(p: &mut Parser) -> Result<Pattern<Subject>> {
    let mut segments = Vec::new();
    let mut current = parse_node(p)?;

    while starts_relationship(p.peek_kind()) {
        let (rel, direction) = parse_relationship(p)?;
        let next = parse_node(p)?;
        let (source, target) = match direction {
            Direction::Left => (next.clone(), current),
            Direction::Right | Direction::Both => (current, next.clone()),
        };
        segments.push(Pattern::pattern(rel, vec![Pattern::point(source), Pattern::point(target)]));
        current = next;
    }

    Ok(match segments.len() {
        0 => Pattern::point(current),
        1 => segments.remove(0),
        _ => Pattern::pattern(Subject::anonymous(), segments),
    })
}

/// `( subject )`. A node may not directly contain another node.
fn parse_node(p: &mut Parser) -> Result<Subject> {
    p.open(TokenKind::LParen)?;
    if p.at(TokenKind::LParen) {
        return Err(ParseError::InvalidNesting { location: p.here() });
    }
    let subject = parse_subject(p)?;
    p.close(TokenKind::RParen)?;
    Ok(subject)
}

/// One arrow family: the plain stroke and its left and right heads.
#[derive(Debug, Clone, Copy)]
struct Stroke {
    line: TokenKind,
    left: TokenKind,
    right: TokenKind,
    expected: &'static str,
}

const DASH: Stroke = Stroke {
    line: TokenKind::Dash,
    left: TokenKind::LeftArrow,
    right: TokenKind::Arrow,
    expected: "'-' or '->'",
};

const SQUIGGLE: Stroke = Stroke {
    line: TokenKind::Tilde,
    left: TokenKind::LeftTildeArrow,
    right: TokenKind::TildeArrow,
    expected: "'~' or '~>'",
};

fn starts_relationship(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Dash
            | TokenKind::LeftArrow
            | TokenKind::Arrow
            | TokenKind::Tilde
            | TokenKind::LeftTildeArrow
            | TokenKind::TildeArrow
    )
}

/// A relationship segment in either the dash or the squiggle family. The
/// two halves of one segment must come from the same family.
fn parse_relationship(p: &mut Parser) -> Result<(Subject, Direction)> {
    let stroke = match p.peek_kind() {
        TokenKind::Tilde | TokenKind::LeftTildeArrow | TokenKind::TildeArrow => SQUIGGLE,
        _ => DASH,
    };

    // `->` / `~>` shorthand
    if p.eat(stroke.right) {
        return Ok((Subject::anonymous(), Direction::Right));
    }

    let left = p.eat(stroke.left);
    if !left {
        p.expect(stroke.line)?;
    }

    let subject = if p.at(TokenKind::LBracket) {
        p.open(TokenKind::LBracket)?;
        let subject = parse_subject(p)?;
        p.close(TokenKind::RBracket)?;
        subject
    } else if left && p.at(TokenKind::LParen) {
        // `<-` / `<~` shorthand
        return Ok((Subject::anonymous(), Direction::Left));
    } else {
        Subject::anonymous()
    };

    if p.eat(stroke.right) {
        let direction = if left { Direction::Both } else { Direction::Right };
        Ok((subject, direction))
    } else if p.eat(stroke.line) {
        let direction = if left { Direction::Left } else { Direction::Both };
        Ok((subject, direction))
    } else {
        Err(p.unexpected(stroke.expected))
    }
}

/// `[ subject | element, ... ]`
fn parse_group(p: &mut Parser) -> Result<Pattern<Subject>> {
    p.open(TokenKind::LBracket)?;
    let subject = parse_subject(p)?;

    let mut elements = Vec::new();
    if p.eat(TokenKind::Pipe) {
        elements.push(parse_element(p)?);
        while p.eat(TokenKind::Comma) {
            elements.push(parse_element(p)?);
        }
    }

    p.close(TokenKind::RBracket)?;
    Ok(Pattern::pattern(subject, elements))
}

/// Group element: a pattern, or a bare identifier referring to a subject.
fn parse_element(p: &mut Parser) -> Result<Pattern<Subject>> {
    if p.at(TokenKind::Identifier) {
        let mut subject = Subject::anonymous();
        subject.identity = Symbol(p.advance().text.clone());
        return Ok(Pattern::point(subject));
    }
    parse_annotated(p)
}

/// Optional identity, labels and record, shared by nodes, relationship
/// details and groups.
fn parse_subject(p: &mut Parser) -> Result<Subject> {
    let mut subject = Subject::anonymous();

    if p.at(TokenKind::Identifier) {
        subject.identity = Symbol(p.advance().text.clone());
    }

    while p.eat(TokenKind::Colon) {
        let label = p.expect(TokenKind::Identifier)?;
        subject.labels.insert(label.text.clone());
    }

    if p.at(TokenKind::LBrace) {
        subject.properties = parse_record(p)?;
    }

    Ok(subject)
}

// ============================================================================
// Records and values
// ============================================================================

/// `{ key: value, ... }` — no leading, trailing or doubled commas.
fn parse_record(p: &mut Parser) -> Result<PropertyMap> {
    p.open(TokenKind::LBrace)?;
    let mut props = PropertyMap::new();

    if !p.at(TokenKind::RBrace) {
        loop {
            let key_tok = p.peek();
            if !matches!(key_tok.kind, TokenKind::Identifier | TokenKind::StringLiteral) {
                return Err(p.unexpected("property key"));
            }
            p.advance();
            let key = key_tok.text.clone();
            if props.contains_key(&key) {
                return Err(ParseError::DuplicateKey {
                    location: p.location(key_tok.span.start),
                    key,
                });
            }

            p.expect(TokenKind::Colon)?;
            if p.at(TokenKind::RBrace) || p.at(TokenKind::Comma) {
                return Err(ParseError::EmptyPropertyValue { location: p.here(), key });
            }
            let value = parse_value(p)?;
            props.insert(key, value);

            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
    }

    p.close(TokenKind::RBrace)?;
    Ok(props)
}

fn parse_value(p: &mut Parser) -> Result<Value> {
    let tok = p.peek();
    match tok.kind {
        TokenKind::StringLiteral => {
            p.advance();
            Ok(Value::String(tok.text.clone()))
        }
        TokenKind::True => {
            p.advance();
            Ok(Value::Boolean(true))
        }
        TokenKind::False => {
            p.advance();
            Ok(Value::Boolean(false))
        }
        TokenKind::Identifier => {
            p.advance();
            Ok(Value::Symbol(tok.text.clone()))
        }
        TokenKind::Integer | TokenKind::Decimal => parse_number(p),
        TokenKind::LBracket => parse_array(p),
        TokenKind::LBrace => Ok(Value::Map(parse_record(p)?)),
        _ => Err(p.unexpected("value")),
    }
}

/// Integer, decimal, range `N..M`, or measurement `N unit` with the unit
/// written immediately after the number.
fn parse_number(p: &mut Parser) -> Result<Value> {
    let tok = p.advance();

    if p.eat(TokenKind::DotDot) {
        let upper_tok = p.peek();
        if !matches!(upper_tok.kind, TokenKind::Integer | TokenKind::Decimal) {
            return Err(p.unexpected("range upper bound"));
        }
        p.advance();
        let lower = number_as_f64(p, tok)?;
        let upper = number_as_f64(p, upper_tok)?;
        return Value::range(lower, upper).map_err(|_| ParseError::UnexpectedToken {
            location: p.location(upper_tok.span.start),
            found: format!("upper bound {}", upper_tok.text),
            expected: format!("an upper bound of at least {}", tok.text),
        });
    }

    let next = p.peek();
    if next.kind == TokenKind::Identifier && next.span.start == tok.span.end {
        p.advance();
        return Ok(Value::Measurement {
            magnitude: number_as_f64(p, tok)?,
            unit: next.text.clone(),
        });
    }

    match tok.kind {
        TokenKind::Integer => tok
            .text
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| invalid_number(p, tok)),
        _ => number_as_f64(p, tok).map(Value::Decimal),
    }
}

fn number_as_f64(p: &Parser, tok: &Token) -> Result<f64> {
    tok.text.parse::<f64>().map_err(|_| invalid_number(p, tok))
}

fn invalid_number(p: &Parser, tok: &Token) -> ParseError {
    ParseError::UnexpectedToken {
        location: p.location(tok.span.start),
        found: describe(tok),
        expected: "a number".into(),
    }
}

fn parse_array(p: &mut Parser) -> Result<Value> {
    p.open(TokenKind::LBracket)?;
    let mut items = Vec::new();
    if !p.at(TokenKind::RBracket) {
        items.push(parse_value(p)?);
        while p.eat(TokenKind::Comma) {
            items.push(parse_value(p)?);
        }
    }
    p.close(TokenKind::RBracket)?;
    Ok(Value::Array(items))
}
