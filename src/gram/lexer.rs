//! Gram lexer — tokenizes notation text.

use crate::{LexError, Location};

/// A token from the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Literal payload: unescaped string contents, unquoted identifier
    /// text, or the digits of a number (sign included).
    pub text: String,
}

/// Source span in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Integer, Decimal, StringLiteral, True, False,
    // Bare or backtick-quoted name
    Identifier,
    // Punctuation
    LParen, RParen, LBracket, RBracket, LBrace, RBrace,
    Colon, Comma, Pipe, At,
    Arrow,      // ->
    LeftArrow,  // <-
    Dash,       // -
    TildeArrow,     // ~>
    LeftTildeArrow, // <~
    Tilde,          // ~
    DotDot,     // ..
    Eof,
}

impl TokenKind {
    /// Human-readable form used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Integer => "integer",
            TokenKind::Decimal => "decimal",
            TokenKind::StringLiteral => "string",
            TokenKind::True | TokenKind::False => "boolean",
            TokenKind::Identifier => "identifier",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::Pipe => "'|'",
            TokenKind::At => "'@'",
            TokenKind::Arrow => "'->'",
            TokenKind::LeftArrow => "'<-'",
            TokenKind::Dash => "'-'",
            TokenKind::TildeArrow => "'~>'",
            TokenKind::LeftTildeArrow => "'<~'",
            TokenKind::Tilde => "'~'",
            TokenKind::DotDot => "'..'",
            TokenKind::Eof => "end of input",
        }
    }
}

/// True when `s` lexes as a single bare identifier: a letter or underscore
/// followed by letters, digits or underscores.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Tokenize gram notation. The returned stream always ends with `Eof`.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();
    let loc = |offset: usize| Location::from_offset(input, offset);

    while let Some(&(pos, ch)) = chars.peek() {
        match ch {
            // Skip whitespace
            c if c.is_whitespace() => { chars.next(); }

            // Skip block comments /* ... */
            '/' if matches!(chars.clone().nth(1), Some((_, '*'))) => {
                chars.next(); // skip '/'
                chars.next(); // skip '*'
                loop {
                    match chars.next() {
                        Some((_, '*')) => {
                            if matches!(chars.peek(), Some(&(_, '/'))) {
                                chars.next();
                                break;
                            }
                        }
                        Some(_) => {}
                        None => return Err(LexError::UnterminatedComment { location: loc(pos) }),
                    }
                }
            }

            // Skip line comments
            '/' if matches!(chars.clone().nth(1), Some((_, '/'))) => {
                while chars.peek().is_some_and(|&(_, c)| c != '\n') {
                    chars.next();
                }
            }

            // String literals
            '\'' | '"' => {
                chars.next();
                match read_quoted(&mut chars, ch) {
                    Some((end, text)) => tokens.push(Token {
                        kind: TokenKind::StringLiteral,
                        span: Span { start: pos, end },
                        text,
                    }),
                    None => return Err(LexError::UnterminatedString { location: loc(pos) }),
                }
            }

            // Backtick-quoted identifiers
            '`' => {
                chars.next();
                match read_quoted(&mut chars, '`') {
                    Some((end, text)) => tokens.push(Token {
                        kind: TokenKind::Identifier,
                        span: Span { start: pos, end },
                        text,
                    }),
                    None => return Err(LexError::UnterminatedIdentifier { location: loc(pos) }),
                }
            }

            // Numbers, optionally negative
            c if c.is_ascii_digit()
                || (c == '-' && chars.clone().nth(1).is_some_and(|(_, d)| d.is_ascii_digit())) =>
            {
                let mut num = String::new();
                if c == '-' {
                    num.push('-');
                    chars.next();
                }
                let mut is_decimal = false;
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_digit() {
                        num.push(c);
                        chars.next();
                    } else if c == '.'
                        && !is_decimal
                        && chars.clone().nth(1).is_some_and(|(_, d)| d.is_ascii_digit())
                    {
                        // A '.' only belongs to the number when a digit follows;
                        // `1..10` is Integer, DotDot, Integer.
                        is_decimal = true;
                        num.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let valid = if is_decimal {
                    num.parse::<f64>().is_ok()
                } else {
                    num.parse::<i64>().is_ok()
                };
                if !valid {
                    return Err(LexError::InvalidNumber { location: loc(pos), text: num });
                }
                tokens.push(Token {
                    kind: if is_decimal { TokenKind::Decimal } else { TokenKind::Integer },
                    span: Span { start: pos, end: pos + num.len() },
                    text: num,
                });
            }

            // Identifiers and boolean keywords
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let kind = match ident.as_str() {
                    "true" => TokenKind::True,
                    "false" => TokenKind::False,
                    _ => TokenKind::Identifier,
                };
                tokens.push(Token {
                    kind,
                    span: Span { start: pos, end: pos + ident.len() },
                    text: ident,
                });
            }

            // Punctuation
            '(' => { chars.next(); tokens.push(punct(TokenKind::LParen, pos, "(")); }
            ')' => { chars.next(); tokens.push(punct(TokenKind::RParen, pos, ")")); }
            '[' => { chars.next(); tokens.push(punct(TokenKind::LBracket, pos, "[")); }
            ']' => { chars.next(); tokens.push(punct(TokenKind::RBracket, pos, "]")); }
            '{' => { chars.next(); tokens.push(punct(TokenKind::LBrace, pos, "{")); }
            '}' => { chars.next(); tokens.push(punct(TokenKind::RBrace, pos, "}")); }
            ',' => { chars.next(); tokens.push(punct(TokenKind::Comma, pos, ",")); }
            ':' => { chars.next(); tokens.push(punct(TokenKind::Colon, pos, ":")); }
            '|' => { chars.next(); tokens.push(punct(TokenKind::Pipe, pos, "|")); }
            '@' => { chars.next(); tokens.push(punct(TokenKind::At, pos, "@")); }
            '.' if matches!(chars.clone().nth(1), Some((_, '.'))) => {
                chars.next();
                chars.next();
                tokens.push(punct(TokenKind::DotDot, pos, ".."));
            }
            '<' if matches!(chars.clone().nth(1), Some((_, '-'))) => {
                chars.next();
                chars.next();
                tokens.push(punct(TokenKind::LeftArrow, pos, "<-"));
            }
            '<' if matches!(chars.clone().nth(1), Some((_, '~'))) => {
                chars.next();
                chars.next();
                tokens.push(punct(TokenKind::LeftTildeArrow, pos, "<~"));
            }
            '~' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '>'))) {
                    chars.next();
                    tokens.push(punct(TokenKind::TildeArrow, pos, "~>"));
                } else {
                    tokens.push(punct(TokenKind::Tilde, pos, "~"));
                }
            }
            '-' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '>'))) {
                    chars.next();
                    tokens.push(punct(TokenKind::Arrow, pos, "->"));
                } else {
                    tokens.push(punct(TokenKind::Dash, pos, "-"));
                }
            }

            other => {
                return Err(LexError::UnexpectedCharacter { location: loc(pos), found: other });
            }
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span { start: input.len(), end: input.len() },
        text: String::new(),
    });

    Ok(tokens)
}

/// Read up to and including the closing `quote`, unescaping as we go.
/// Returns the end offset (one past the closing quote) and the contents, or
/// `None` if the input ends first.
fn read_quoted(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    quote: char,
) -> Option<(usize, String)> {
    let mut s = String::new();
    loop {
        match chars.next()? {
            (_, '\\') => {
                let (_, escaped) = chars.next()?;
                match escaped {
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    'r' => s.push('\r'),
                    '\\' => s.push('\\'),
                    '"' | '\'' | '`' => s.push(escaped),
                    c => { s.push('\\'); s.push(c); }
                }
            }
            (end, c) if c == quote => return Some((end + c.len_utf8(), s)),
            (_, c) => s.push(c),
        }
    }
}

fn punct(kind: TokenKind, pos: usize, text: &str) -> Token {
    Token {
        kind,
        span: Span { start: pos, end: pos + text.len() },
        text: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_node_with_label() {
        assert_eq!(kinds("(n:Person)"), vec![
            TokenKind::LParen,
            TokenKind::Identifier, // n
            TokenKind::Colon,
            TokenKind::Identifier, // Person
            TokenKind::RParen,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn test_relationship_pattern() {
        assert_eq!(kinds("(a)-[:KNOWS]->(b)"), vec![
            TokenKind::LParen,
            TokenKind::Identifier, // a
            TokenKind::RParen,
            TokenKind::Dash,
            TokenKind::LBracket,
            TokenKind::Colon,
            TokenKind::Identifier, // KNOWS
            TokenKind::RBracket,
            TokenKind::Arrow,
            TokenKind::LParen,
            TokenKind::Identifier, // b
            TokenKind::RParen,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn test_arrow_forms() {
        use TokenKind::*;
        assert_eq!(kinds("-->"), vec![Dash, Arrow, Eof]);
        assert_eq!(kinds("<--"), vec![LeftArrow, Dash, Eof]);
        assert_eq!(kinds("<-->"), vec![LeftArrow, Arrow, Eof]);
        assert_eq!(kinds("--"), vec![Dash, Dash, Eof]);
        assert_eq!(kinds("~~"), vec![Tilde, Tilde, Eof]);
        assert_eq!(kinds("~~>"), vec![Tilde, TildeArrow, Eof]);
        assert_eq!(kinds("<~~"), vec![LeftTildeArrow, Tilde, Eof]);
    }

    #[test]
    fn test_string_literal() {
        let tokens = tokenize(r#""hello \"world\"\n""#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].text, "hello \"world\"\n");

        let single = tokenize("'it\\'s'").unwrap();
        assert_eq!(single[0].text, "it's");
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize("30 95.5 -7 -2.25").unwrap();
        let pairs: Vec<_> = tokens.iter().map(|t| (t.kind, t.text.as_str())).collect();
        assert_eq!(pairs, vec![
            (TokenKind::Integer, "30"),
            (TokenKind::Decimal, "95.5"),
            (TokenKind::Integer, "-7"),
            (TokenKind::Decimal, "-2.25"),
            (TokenKind::Eof, ""),
        ]);
    }

    #[test]
    fn test_range_operator() {
        use TokenKind::*;
        assert_eq!(kinds("1..10"), vec![Integer, DotDot, Integer, Eof]);
        assert_eq!(kinds("-5..-1"), vec![Integer, DotDot, Integer, Eof]);
        assert_eq!(kinds("1.5..2.5"), vec![Decimal, DotDot, Decimal, Eof]);
    }

    #[test]
    fn test_measurement_spans_are_adjacent() {
        let tokens = tokenize("5kg 5 kg").unwrap();
        assert_eq!(tokens[0].span.end, tokens[1].span.start);
        assert_ne!(tokens[2].span.end, tokens[3].span.start);
    }

    #[test]
    fn test_booleans_and_quoted_identifiers() {
        let tokens = tokenize("true false `true` `two words`").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::True);
        assert_eq!(tokens[1].kind, TokenKind::False);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].text, "true");
        assert_eq!(tokens[3].text, "two words");
    }

    #[test]
    fn test_comments_are_skipped() {
        use TokenKind::*;
        assert_eq!(kinds("// comment\n(hello)"), vec![LParen, Identifier, RParen, Eof]);
        assert_eq!(kinds("(a) /* multi\nline */ (b)").len(), 7);
    }

    #[test]
    fn test_unterminated_string_offset() {
        let err = tokenize("(a {name: \"Alice})").unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString { .. }));
        assert_eq!(err.location().offset, 10);
    }

    #[test]
    fn test_unterminated_block_comment() {
        assert!(matches!(
            tokenize("(a) /* unterminated"),
            Err(LexError::UnterminatedComment { .. })
        ));
    }

    #[test]
    fn test_unexpected_character_offset() {
        let err = tokenize("(a) # (b)").unwrap_err();
        assert_eq!(err, LexError::UnexpectedCharacter {
            location: Location { offset: 4, line: 1, column: 5 },
            found: '#',
        });
    }

    #[test]
    fn test_integer_overflow() {
        assert!(matches!(
            tokenize("99999999999999999999"),
            Err(LexError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("alice"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("two words"));
    }
}
