//! Lexer for JSON-ish input.

use std::borrow::Cow;

use crate::error::{Error, LexError};
use crate::pos::Pos;
use crate::token::{StrPrefix, Token, TokenKind, is_ident_char, is_ident_start};
#[allow(unused_imports)]
use crate::trace;

const NEG_INFINITY: &str = "-Infinity";

/// A lexer that produces tokens from source text.
///
/// Whitespace and `//` line comments are consumed silently between
/// tokens. The lexer keeps a single token of lookahead so callers get
/// `peek`/`consume`/`expect`.
pub struct Lexer<'src> {
    /// The full source text.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current position in `source`.
    pos: Pos,
    /// One token of lookahead.
    peeked: Option<Token<'src>>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: Pos::start(),
            peeked: None,
        }
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self) -> Result<&Token<'src>, Error> {
        if self.peeked.is_none() {
            let token = self.next_token()?;
            self.peeked = Some(token);
        }
        Ok(self.peeked.as_ref().unwrap())
    }

    /// Consume and return the next token.
    pub fn consume(&mut self) -> Result<Token<'src>, Error> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.next_token(),
        }
    }

    /// Consume the next token, requiring it to be of the given kind.
    pub fn expect(
        &mut self,
        kind: TokenKind,
        expected: &'static str,
    ) -> Result<Token<'src>, Error> {
        let token = self.consume()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(Error::parse(
                crate::error::ParseError::UnexpectedToken {
                    expected,
                    found: token.describe(),
                },
                token.pos,
            ))
        }
    }

    /// Peek at the next character without consuming it.
    #[inline]
    fn peek_char(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    /// Peek at the second character without consuming.
    #[inline]
    fn peek_char2(&self) -> Option<char> {
        self.remaining.chars().nth(1)
    }

    /// Advance by one character and return it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos.offset += c.len_utf8() as u32;
        if c == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else {
            self.pos.column += 1;
        }
        self.remaining = &self.remaining[c.len_utf8()..];
        Some(c)
    }

    /// Check if the remaining text starts with the given prefix.
    #[inline]
    fn starts_with(&self, prefix: &str) -> bool {
        self.remaining.starts_with(prefix)
    }

    /// The source text from `start` to the current position.
    fn text_from(&self, start: Pos) -> &'src str {
        &self.source[start.offset as usize..self.pos.offset as usize]
    }

    fn token(&self, kind: TokenKind, start: Pos) -> Token<'src> {
        let text = self.text_from(start);
        trace!("token {:?} at {:?}: {:?}", kind, start, text);
        Token::new(kind, text, start)
    }

    /// Advance past whitespace and `//` line comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.starts_with("//") => {
                    while let Some(c) = self.peek_char() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Produce the next token.
    fn next_token(&mut self) -> Result<Token<'src>, Error> {
        self.skip_trivia();
        let start = self.pos;
        let Some(c) = self.peek_char() else {
            return Ok(self.token(TokenKind::Eof, start));
        };

        match c {
            '{' => {
                self.advance();
                Ok(self.token(TokenKind::LBrace, start))
            }
            '}' => {
                self.advance();
                Ok(self.token(TokenKind::RBrace, start))
            }
            '[' => {
                self.advance();
                Ok(self.token(TokenKind::LBracket, start))
            }
            ']' => {
                self.advance();
                Ok(self.token(TokenKind::RBracket, start))
            }
            '(' => {
                self.advance();
                Ok(self.token(TokenKind::LParen, start))
            }
            ')' => {
                self.advance();
                Ok(self.token(TokenKind::RParen, start))
            }
            ',' => {
                self.advance();
                Ok(self.token(TokenKind::Comma, start))
            }
            ':' => {
                self.advance();
                Ok(self.token(TokenKind::Colon, start))
            }

            '"' | '\'' => self.lex_string(start, StrPrefix::default(), c),
            '<' => self.lex_repr(start),
            '/' => self.lex_regex(start),

            '-' => {
                // `-Infinity` is a reserved identifier, not a number
                if self.starts_with(NEG_INFINITY)
                    && !self.remaining[NEG_INFINITY.len()..]
                        .chars()
                        .next()
                        .is_some_and(is_ident_char)
                {
                    for _ in 0..NEG_INFINITY.len() {
                        self.advance();
                    }
                    Ok(self.token(TokenKind::Ident, start))
                } else if self.peek_char2().is_some_and(|c| c.is_ascii_digit()) {
                    self.lex_number(start)
                } else {
                    self.advance();
                    Err(Error::lex(LexError::UnrecognisedChar('-'), start))
                }
            }

            c if c.is_ascii_digit() => self.lex_number(start),
            c if is_ident_start(c) => self.lex_ident(start),

            _ => {
                self.advance();
                Err(Error::lex(LexError::UnrecognisedChar(c), start))
            }
        }
    }

    /// Lex a number: optional `-`, integer part, optional fraction and
    /// exponent; or a `0x` hexadecimal integer.
    fn lex_number(&mut self, start: Pos) -> Result<Token<'src>, Error> {
        if self.peek_char() == Some('-') {
            self.advance();
        }

        if self.peek_char() == Some('0') {
            self.advance();
            if self.peek_char() == Some('x') && self.peek_char2().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
                while matches!(self.peek_char(), Some(c) if c.is_ascii_hexdigit()) {
                    self.advance();
                }
                return Ok(self.token(TokenKind::Number, start));
            }
        } else {
            while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Fraction: only if a digit follows the dot
        if self.peek_char() == Some('.') && self.peek_char2().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Exponent: only if digits follow
        if matches!(self.peek_char(), Some('e' | 'E')) {
            let mut chars = self.remaining.chars();
            chars.next();
            let has_digits = match chars.next() {
                Some('+' | '-') => chars.next().is_some_and(|c| c.is_ascii_digit()),
                Some(c) => c.is_ascii_digit(),
                None => false,
            };
            if has_digits {
                self.advance();
                if matches!(self.peek_char(), Some('+' | '-')) {
                    self.advance();
                }
                while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        Ok(self.token(TokenKind::Number, start))
    }

    /// Lex an identifier, a prefixed string, or a `new X` compound head.
    fn lex_ident(&mut self, start: Pos) -> Result<Token<'src>, Error> {
        if let Some((prefix, quote)) = self.try_string_prefix() {
            return self.lex_string(start, prefix, quote);
        }

        while matches!(self.peek_char(), Some(c) if is_ident_char(c)) {
            self.advance();
        }

        // `new` + whitespace + identifier forms a single compound lexeme,
        // so `new Date(...)` parses as a call with head `new Date`.
        if self.text_from(start) == "new" {
            let ws: usize = self
                .remaining
                .chars()
                .take_while(|c| c.is_whitespace())
                .map(|c| c.len_utf8())
                .sum();
            if ws > 0 && self.remaining[ws..].chars().next().is_some_and(is_ident_start) {
                while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
                    self.advance();
                }
                while matches!(self.peek_char(), Some(c) if is_ident_char(c)) {
                    self.advance();
                }
            }
        }

        Ok(self.token(TokenKind::Ident, start))
    }

    /// If the upcoming characters are a string prefix followed by a
    /// quote, consume the prefix and return it with the quote character.
    fn try_string_prefix(&mut self) -> Option<(StrPrefix, char)> {
        let mut chars = self.remaining.chars();
        let c0 = chars.next()?;
        if !is_prefix_letter(c0) {
            return None;
        }
        match chars.next() {
            Some(quote @ ('"' | '\'')) => {
                self.advance();
                let mut prefix = StrPrefix::default();
                prefix.apply(c0);
                Some((prefix, quote))
            }
            Some(c1) if is_prefix_letter(c1) => match chars.next() {
                Some(quote @ ('"' | '\'')) => {
                    self.advance();
                    self.advance();
                    let mut prefix = StrPrefix::default();
                    prefix.apply(c0);
                    prefix.apply(c1);
                    Some((prefix, quote))
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// Lex a string literal. The prefix letters (if any) are already
    /// consumed; the current character is the opening quote.
    fn lex_string(
        &mut self,
        start: Pos,
        prefix: StrPrefix,
        quote: char,
    ) -> Result<Token<'src>, Error> {
        self.advance(); // opening quote
        let body_start = self.pos.offset as usize;
        // `None` while the decoded body is still a plain slice of the source
        let mut owned: Option<String> = None;

        loop {
            match self.peek_char() {
                None => return Err(Error::lex(LexError::UnterminatedString, start)),
                Some('\n') => {
                    let pos = self.pos;
                    return Err(Error::lex(LexError::NewlineInString, pos));
                }
                Some('\\') => {
                    let esc_pos = self.pos;
                    let mut buf = match owned.take() {
                        Some(buf) => buf,
                        None => self.source[body_start..self.pos.offset as usize].to_string(),
                    };
                    self.advance(); // backslash
                    if prefix.raw {
                        buf.push('\\');
                        match self.peek_char() {
                            None => return Err(Error::lex(LexError::UnterminatedString, start)),
                            Some('\n') => {
                                let pos = self.pos;
                                return Err(Error::lex(LexError::NewlineInString, pos));
                            }
                            Some(c) => {
                                self.advance();
                                buf.push(c);
                            }
                        }
                    } else {
                        buf.push(self.decode_escape(quote, esc_pos)?);
                    }
                    owned = Some(buf);
                }
                Some(c) if c == quote => break,
                Some(c) => {
                    self.advance();
                    if let Some(buf) = owned.as_mut() {
                        buf.push(c);
                    }
                }
            }
        }

        let body_end = self.pos.offset as usize;
        self.advance(); // closing quote
        let value = match owned {
            Some(buf) => Cow::Owned(buf),
            None => Cow::Borrowed(&self.source[body_start..body_end]),
        };
        Ok(Token::with_value(
            TokenKind::Str,
            self.text_from(start),
            value,
            start,
        ))
    }

    /// Decode one escape sequence. The backslash is already consumed;
    /// `esc_pos` is its position, for error reporting.
    fn decode_escape(&mut self, quote: char, esc_pos: Pos) -> Result<char, Error> {
        let invalid = |lexer: &Self| {
            Error::lex(
                LexError::InvalidEscape(lexer.text_from(esc_pos).to_string()),
                esc_pos,
            )
        };

        let Some(c) = self.peek_char() else {
            return Err(Error::lex(LexError::UnterminatedString, esc_pos));
        };
        self.advance();
        match c {
            '\\' => Ok('\\'),
            '/' => Ok('/'),
            '\'' => Ok('\''),
            '"' => Ok('"'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'b' => Ok('\u{0008}'),
            'f' => Ok('\u{000C}'),
            'x' => {
                let code = self.hex_value(2, esc_pos)?;
                char::from_u32(code).ok_or_else(|| invalid(self))
            }
            'U' => {
                let code = self.hex_value(8, esc_pos)?;
                char::from_u32(code).ok_or_else(|| invalid(self))
            }
            'u' => {
                if self.peek_char() == Some('{') {
                    self.advance();
                    let mut code: u32 = 0;
                    let mut any = false;
                    loop {
                        match self.peek_char() {
                            Some('}') => {
                                self.advance();
                                break;
                            }
                            Some(c) if c.is_ascii_hexdigit() => {
                                self.advance();
                                any = true;
                                code = code * 16 + c.to_digit(16).unwrap_or(0);
                                if code > 0x0010_FFFF {
                                    return Err(invalid(self));
                                }
                            }
                            _ => return Err(invalid(self)),
                        }
                    }
                    if !any {
                        return Err(invalid(self));
                    }
                    char::from_u32(code).ok_or_else(|| invalid(self))
                } else {
                    let hi = self.hex_value(4, esc_pos)?;
                    if (0xD800..0xDC00).contains(&hi) {
                        // High surrogate: a `\uHHHH` low surrogate must follow
                        if self.starts_with("\\u") {
                            self.advance();
                            self.advance();
                            let lo = self.hex_value(4, esc_pos)?;
                            if (0xDC00..0xE000).contains(&lo) {
                                let code = 0x0001_0000 + ((hi - 0xD800) << 10) + (lo - 0xDC00);
                                return char::from_u32(code).ok_or_else(|| invalid(self));
                            }
                        }
                        return Err(invalid(self));
                    }
                    char::from_u32(hi).ok_or_else(|| invalid(self))
                }
            }
            c if c == quote => Ok(c),
            _ => Err(invalid(self)),
        }
    }

    /// Read exactly `digits` hex digits.
    fn hex_value(&mut self, digits: u32, esc_pos: Pos) -> Result<u32, Error> {
        let mut code: u32 = 0;
        for _ in 0..digits {
            match self.peek_char() {
                Some(c) if c.is_ascii_hexdigit() => {
                    self.advance();
                    code = code.wrapping_mul(16) + c.to_digit(16).unwrap_or(0);
                }
                _ => {
                    return Err(Error::lex(
                        LexError::InvalidEscape(self.text_from(esc_pos).to_string()),
                        esc_pos,
                    ));
                }
            }
        }
        Ok(code)
    }

    /// Lex a `<...>` repr. The body may not contain `<` or `>`.
    fn lex_repr(&mut self, start: Pos) -> Result<Token<'src>, Error> {
        self.advance(); // '<'
        loop {
            match self.peek_char() {
                None | Some('<') => return Err(Error::lex(LexError::UnterminatedRepr, start)),
                Some('>') => {
                    self.advance();
                    break;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        Ok(self.token(TokenKind::Repr, start))
    }

    /// Lex a `/pattern/flags` regex literal. (A `//` comment never
    /// reaches here; trivia skipping eats it first.)
    fn lex_regex(&mut self, start: Pos) -> Result<Token<'src>, Error> {
        self.advance(); // '/'
        let body_start = self.pos.offset as usize;
        let mut owned: Option<String> = None;

        loop {
            match self.peek_char() {
                None => return Err(Error::lex(LexError::UnterminatedRegex, start)),
                Some('/') => break,
                Some('\\') => {
                    let mut buf = match owned.take() {
                        Some(buf) => buf,
                        None => self.source[body_start..self.pos.offset as usize].to_string(),
                    };
                    self.advance();
                    match self.peek_char() {
                        None => return Err(Error::lex(LexError::UnterminatedRegex, start)),
                        Some(c) => {
                            self.advance();
                            // Simple escapes decode; anything else stays
                            // literal so regex classes like `\d` survive.
                            match c {
                                '\\' => buf.push('\\'),
                                '/' => buf.push('/'),
                                '\'' => buf.push('\''),
                                '"' => buf.push('"'),
                                'n' => buf.push('\n'),
                                'r' => buf.push('\r'),
                                't' => buf.push('\t'),
                                'b' => buf.push('\u{0008}'),
                                'f' => buf.push('\u{000C}'),
                                _ => {
                                    buf.push('\\');
                                    buf.push(c);
                                }
                            }
                        }
                    }
                    owned = Some(buf);
                }
                Some(c) => {
                    self.advance();
                    if let Some(buf) = owned.as_mut() {
                        buf.push(c);
                    }
                }
            }
        }

        let body_end = self.pos.offset as usize;
        self.advance(); // closing '/'
        while matches!(self.peek_char(), Some(c) if is_ident_char(c)) {
            self.advance();
        }
        let value = match owned {
            Some(buf) => Cow::Owned(buf),
            None => Cow::Borrowed(&self.source[body_start..body_end]),
        };
        Ok(Token::with_value(
            TokenKind::Regex,
            self.text_from(start),
            value,
            start,
        ))
    }
}

/// Whether `c` is a string prefix letter.
#[inline]
fn is_prefix_letter(c: char) -> bool {
    matches!(c, 'r' | 'R' | 'b' | 'B' | 'u' | 'U' | 'f' | 'F')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<(TokenKind, &str)> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.consume().expect("lex error");
            if token.kind == TokenKind::Eof {
                break;
            }
            tokens.push((token.kind, token.text));
        }
        tokens
    }

    fn lex_err(source: &str) -> Error {
        let mut lexer = Lexer::new(source);
        loop {
            match lexer.consume() {
                Ok(token) if token.kind == TokenKind::Eof => panic!("no error in {source:?}"),
                Ok(_) => {}
                Err(err) => return err,
            }
        }
    }

    fn one_value(source: &str) -> Cow<'_, str> {
        let mut lexer = Lexer::new(source);
        let token = lexer.consume().expect("lex error");
        token.value.expect("token has no decoded value")
    }

    #[test]
    fn test_structural_tokens() {
        assert_eq!(lex("{"), vec![(TokenKind::LBrace, "{")]);
        assert_eq!(lex("}"), vec![(TokenKind::RBrace, "}")]);
        assert_eq!(lex("["), vec![(TokenKind::LBracket, "[")]);
        assert_eq!(lex("]"), vec![(TokenKind::RBracket, "]")]);
        assert_eq!(lex("("), vec![(TokenKind::LParen, "(")]);
        assert_eq!(lex(")"), vec![(TokenKind::RParen, ")")]);
        assert_eq!(lex(","), vec![(TokenKind::Comma, ",")]);
        assert_eq!(lex(":"), vec![(TokenKind::Colon, ":")]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(lex("42"), vec![(TokenKind::Number, "42")]);
        assert_eq!(lex("-42"), vec![(TokenKind::Number, "-42")]);
        assert_eq!(lex("0"), vec![(TokenKind::Number, "0")]);
        assert_eq!(lex("3.14"), vec![(TokenKind::Number, "3.14")]);
        assert_eq!(lex("5.12e-1"), vec![(TokenKind::Number, "5.12e-1")]);
        assert_eq!(lex("1E6"), vec![(TokenKind::Number, "1E6")]);
        assert_eq!(lex("0.5"), vec![(TokenKind::Number, "0.5")]);
        assert_eq!(lex("0x1f2A"), vec![(TokenKind::Number, "0x1f2A")]);
    }

    #[test]
    fn test_number_boundaries() {
        // The dot is not part of the number unless digits follow
        assert_eq!(
            lex("1,2"),
            vec![
                (TokenKind::Number, "1"),
                (TokenKind::Comma, ","),
                (TokenKind::Number, "2"),
            ]
        );
        // `e` without digits stays outside the lexeme
        assert_eq!(
            lex("1 e"),
            vec![(TokenKind::Number, "1"), (TokenKind::Ident, "e")]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(lex(r#""hello""#), vec![(TokenKind::Str, r#""hello""#)]);
        assert_eq!(lex("'hello'"), vec![(TokenKind::Str, "'hello'")]);
        assert_eq!(one_value(r#""hello""#), "hello");
        assert_eq!(one_value(r#""say \"hi\"""#), "say \"hi\"");
        assert_eq!(one_value(r#""a\nb\tc""#), "a\nb\tc");
        assert_eq!(one_value(r#""aAb""#), "aAb");
        assert_eq!(one_value(r#""\u{1F600}""#), "\u{1F600}");
        assert_eq!(one_value(r#""😀""#), "\u{1F600}");
        assert_eq!(one_value(r#""\U0001F600""#), "\u{1F600}");
        assert_eq!(one_value(r#""\x6F""#), "o");
        // A quote of the other flavour needs no escape
        assert_eq!(one_value(r#"'say "hi"'"#), "say \"hi\"");
        assert_eq!(one_value(r#""it\'s""#), "it's");
    }

    #[test]
    fn test_string_prefixes() {
        assert_eq!(lex(r"r'Hell\w'"), vec![(TokenKind::Str, r"r'Hell\w'")]);
        assert_eq!(one_value(r"r'Hell\w'"), r"Hell\w");
        assert_eq!(one_value(r#"b"Hell\x6F""#), "Hello");
        assert_eq!(one_value(r#"u"Hellо""#), "Hell\u{043E}");
        assert_eq!(one_value("f'{x}'"), "{x}");
        assert_eq!(one_value(r#"rb"a\b""#), r"a\b");
        // Raw backslash still guards the closing quote
        assert_eq!(one_value(r"r'a\'b'"), r"a\'b");
        // A prefix letter without a quote is just an identifier
        assert_eq!(lex("run"), vec![(TokenKind::Ident, "run")]);
        assert_eq!(lex("fr"), vec![(TokenKind::Ident, "fr")]);
    }

    #[test]
    fn test_string_errors() {
        assert!(matches!(
            lex_err(r#""abc"#),
            Error::Lex {
                kind: LexError::UnterminatedString,
                ..
            }
        ));
        assert!(matches!(
            lex_err("\"a\nb\""),
            Error::Lex {
                kind: LexError::NewlineInString,
                ..
            }
        ));
        assert!(matches!(
            lex_err(r#""a\qb""#),
            Error::Lex {
                kind: LexError::InvalidEscape(_),
                ..
            }
        ));
        assert!(matches!(
            lex_err(r#""\uD800x""#),
            Error::Lex {
                kind: LexError::InvalidEscape(_),
                ..
            }
        ));
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(lex("foo"), vec![(TokenKind::Ident, "foo")]);
        assert_eq!(lex("$ref"), vec![(TokenKind::Ident, "$ref")]);
        assert_eq!(lex("_x9"), vec![(TokenKind::Ident, "_x9")]);
        assert_eq!(lex("true"), vec![(TokenKind::Ident, "true")]);
        assert_eq!(lex("None"), vec![(TokenKind::Ident, "None")]);
        assert_eq!(lex("-Infinity"), vec![(TokenKind::Ident, "-Infinity")]);
    }

    #[test]
    fn test_compound_new() {
        assert_eq!(
            lex("new Date("),
            vec![(TokenKind::Ident, "new Date"), (TokenKind::LParen, "(")]
        );
        // Original spacing is preserved in the lexeme
        assert_eq!(lex("new  Date"), vec![(TokenKind::Ident, "new  Date")]);
        // `new` alone stays a plain identifier
        assert_eq!(
            lex("new, x"),
            vec![
                (TokenKind::Ident, "new"),
                (TokenKind::Comma, ","),
                (TokenKind::Ident, "x"),
            ]
        );
    }

    #[test]
    fn test_repr() {
        assert_eq!(
            lex("<Foo object at 0x7f>"),
            vec![(TokenKind::Repr, "<Foo object at 0x7f>")]
        );
        assert!(matches!(
            lex_err("<never closed"),
            Error::Lex {
                kind: LexError::UnterminatedRepr,
                ..
            }
        ));
        assert!(matches!(
            lex_err("<a < b>"),
            Error::Lex {
                kind: LexError::UnterminatedRepr,
                ..
            }
        ));
    }

    #[test]
    fn test_regex() {
        assert_eq!(lex("/ab+c/i"), vec![(TokenKind::Regex, "/ab+c/i")]);
        assert_eq!(lex("/x/"), vec![(TokenKind::Regex, "/x/")]);
        assert_eq!(one_value(r"/a\/b/"), "a/b");
        assert_eq!(one_value(r"/\d+/"), r"\d+");
        assert!(matches!(
            lex_err("/abc"),
            Error::Lex {
                kind: LexError::UnterminatedRegex,
                ..
            }
        ));
    }

    #[test]
    fn test_trivia() {
        assert_eq!(lex("  \t\n 1"), vec![(TokenKind::Number, "1")]);
        assert_eq!(lex("// comment\n1"), vec![(TokenKind::Number, "1")]);
        assert_eq!(
            lex("1 // trailing comment"),
            vec![(TokenKind::Number, "1")]
        );
        assert_eq!(lex(""), vec![]);
        assert_eq!(lex("// only a comment"), vec![]);
    }

    #[test]
    fn test_positions() {
        let mut lexer = Lexer::new("{\n  ab: 1}");
        let token = lexer.consume().unwrap();
        assert_eq!((token.pos.line, token.pos.column, token.pos.offset), (1, 1, 0));
        let token = lexer.consume().unwrap();
        assert_eq!(token.text, "ab");
        assert_eq!((token.pos.line, token.pos.column, token.pos.offset), (2, 3, 4));
    }

    #[test]
    fn test_unrecognised_char() {
        assert!(matches!(
            lex_err("&"),
            Error::Lex {
                kind: LexError::UnrecognisedChar('&'),
                ..
            }
        ));
    }

    #[test]
    fn test_peek_and_expect() {
        let mut lexer = Lexer::new("[1]");
        assert_eq!(lexer.peek().unwrap().kind, TokenKind::LBracket);
        assert_eq!(lexer.consume().unwrap().kind, TokenKind::LBracket);
        assert_eq!(lexer.consume().unwrap().kind, TokenKind::Number);
        assert!(lexer.expect(TokenKind::RBracket, "`]`").is_ok());
        assert_eq!(lexer.peek().unwrap().kind, TokenKind::Eof);
    }
}
