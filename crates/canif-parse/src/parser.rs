//! Recursive-descent, event-emitting parser.

use std::borrow::Cow;

use crate::error::{Error, ParseError};
use crate::event::{Atom, AtomKind, Event, Key, KeyKind, Reserved};
use crate::lexer::Lexer;
use crate::pos::Pos;
use crate::sink::EventSink;
use crate::token::{StrPrefix, Token, TokenKind};
#[allow(unused_imports)]
use crate::trace;

/// Parses one value off the source, pushing events into a sink as it
/// goes. Nothing is retained beyond one token of lookahead and, for the
/// `{` map-or-set decision, a single buffered key candidate.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
}

impl<'src> Parser<'src> {
    /// Create a new parser for the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            lexer: Lexer::new(source),
        }
    }

    /// Parse exactly one top-level value, emitting its events into
    /// `sink`. Anything but whitespace and comments after the value is
    /// an error.
    pub fn parse<S: EventSink<'src>>(mut self, sink: &mut S) -> Result<(), Error> {
        self.value(sink)?;
        let (kind, pos) = self.peek_info()?;
        if kind != TokenKind::Eof {
            return Err(Error::parse(ParseError::TrailingData, pos));
        }
        Ok(())
    }

    /// Convenience: parse and collect all events.
    pub fn parse_to_vec(self) -> Result<Vec<Event<'src>>, Error> {
        let mut events = Vec::new();
        self.parse(&mut events)?;
        Ok(events)
    }

    fn peek_info(&mut self) -> Result<(TokenKind, Pos), Error> {
        let token = self.lexer.peek()?;
        Ok((token.kind, token.pos))
    }

    /// Build an unexpected-token error at the current lookahead.
    fn err_unexpected(&mut self, expected: &'static str) -> Error {
        match self.lexer.peek() {
            Ok(token) => Error::parse(
                ParseError::UnexpectedToken {
                    expected,
                    found: token.describe(),
                },
                token.pos,
            ),
            Err(err) => err,
        }
    }

    /// value := atom | mapOrSet | array | tupleOrCall | reprBlob
    fn value<S: EventSink<'src>>(&mut self, sink: &mut S) -> Result<(), Error> {
        let (kind, pos) = self.peek_info()?;
        match kind {
            TokenKind::LBracket => self.array(sink),
            TokenKind::LParen => {
                let open = self.lexer.consume()?;
                sink.event(Event::TupleOpen)?;
                self.tuple_body(sink, "tuple", true, open.pos)
            }
            TokenKind::LBrace => self.brace(sink),
            TokenKind::Number | TokenKind::Str | TokenKind::Regex | TokenKind::Repr => {
                let token = self.lexer.consume()?;
                sink.event(Event::Atom(atom_from(token)))
            }
            TokenKind::Ident => {
                let token = self.lexer.consume()?;
                self.ident_value(sink, token)
            }
            _ => Err(Error::parse(ParseError::ExpectedValue, pos)),
        }
    }

    /// An identifier in value position: a reserved or bare atom, or the
    /// head of a function call when `(` follows.
    fn ident_value<S: EventSink<'src>>(
        &mut self,
        sink: &mut S,
        token: Token<'src>,
    ) -> Result<(), Error> {
        if Reserved::classify(token.text).is_none()
            && self.peek_info()?.0 == TokenKind::LParen
        {
            sink.event(Event::Call { head: token.text })?;
            let open = self.lexer.consume()?;
            sink.event(Event::TupleOpen)?;
            self.tuple_body(sink, "function call", false, open.pos)
        } else {
            sink.event(Event::Atom(atom_from(token)))
        }
    }

    /// array := '[' items_allowing_empty_slots ']'
    fn array<S: EventSink<'src>>(&mut self, sink: &mut S) -> Result<(), Error> {
        let open = self.lexer.consume()?;
        sink.event(Event::ArrayOpen)?;
        let mut len = 0usize;
        loop {
            let (kind, _) = self.peek_info()?;
            match kind {
                TokenKind::RBracket => break,
                TokenKind::Eof => {
                    return Err(Error::parse(
                        ParseError::UnterminatedContainer { container: "array" },
                        open.pos,
                    ));
                }
                TokenKind::Comma => {
                    // A comma with no value since the last one is an
                    // empty slot; the comma also separates.
                    self.lexer.consume()?;
                    sink.event(Event::Atom(Atom {
                        kind: AtomKind::EmptySlot,
                        raw: Cow::Borrowed(""),
                        value: None,
                    }))?;
                    len += 1;
                    continue;
                }
                _ => {}
            }
            self.value(sink)?;
            len += 1;
            let (kind, _) = self.peek_info()?;
            match kind {
                TokenKind::Comma => {
                    self.lexer.consume()?;
                }
                TokenKind::RBracket => break,
                TokenKind::Eof => {
                    return Err(Error::parse(
                        ParseError::UnterminatedContainer { container: "array" },
                        open.pos,
                    ));
                }
                _ => return Err(self.err_unexpected("`,` or `]`")),
            }
        }
        self.lexer.consume()?; // ']'
        sink.event(Event::ArrayClose { len })
    }

    /// Elements of a tuple or of a call's argument list, up to and
    /// including the `)`. A bare 1-tuple requires its comma, so that
    /// `(1)` is rejected the way the notations we read reject it.
    fn tuple_body<S: EventSink<'src>>(
        &mut self,
        sink: &mut S,
        container: &'static str,
        bare: bool,
        open_pos: Pos,
    ) -> Result<(), Error> {
        let mut len = 0usize;
        loop {
            let (kind, pos) = self.peek_info()?;
            match kind {
                TokenKind::RParen => break,
                TokenKind::Eof => {
                    return Err(Error::parse(
                        ParseError::UnterminatedContainer { container },
                        open_pos,
                    ));
                }
                TokenKind::Comma => return Err(Error::parse(ParseError::ExpectedValue, pos)),
                _ => {}
            }
            self.value(sink)?;
            len += 1;
            let (kind, pos) = self.peek_info()?;
            match kind {
                TokenKind::Comma => {
                    self.lexer.consume()?;
                }
                TokenKind::RParen => {
                    if bare && len == 1 {
                        return Err(Error::parse(
                            ParseError::UnexpectedToken {
                                expected: "`,`",
                                found: "`)`".to_string(),
                            },
                            pos,
                        ));
                    }
                    break;
                }
                TokenKind::Eof => {
                    return Err(Error::parse(
                        ParseError::UnterminatedContainer { container },
                        open_pos,
                    ));
                }
                _ => return Err(self.err_unexpected("`,` or `)`")),
            }
        }
        self.lexer.consume()?; // ')'
        sink.event(Event::TupleClose { len })
    }

    /// `{` opens either a mapping or a set; which one is only known
    /// once the token after the first item is seen. Map keys can only
    /// be single atoms, so buffering that one candidate token is enough
    /// to emit the right open event first.
    fn brace<S: EventSink<'src>>(&mut self, sink: &mut S) -> Result<(), Error> {
        let open = self.lexer.consume()?; // '{'
        let (kind, pos) = self.peek_info()?;
        trace!("brace container, first token {:?}", kind);
        match kind {
            TokenKind::RBrace => {
                // Maps win on empty
                self.lexer.consume()?;
                sink.event(Event::MapOpen)?;
                sink.event(Event::MapClose { len: 0 })
            }
            TokenKind::Eof => Err(Error::parse(
                ParseError::UnterminatedContainer { container: "mapping" },
                open.pos,
            )),
            TokenKind::Comma => Err(Error::parse(ParseError::ExpectedValue, pos)),
            TokenKind::Number | TokenKind::Str => {
                let token = self.lexer.consume()?;
                if self.peek_info()?.0 == TokenKind::Colon {
                    self.map_rest(sink, quoted_key(token), open.pos)
                } else {
                    sink.event(Event::SetOpen)?;
                    sink.event(Event::Atom(atom_from(token)))?;
                    self.set_rest(sink, open.pos)
                }
            }
            TokenKind::Ident => {
                let token = self.lexer.consume()?;
                match self.peek_info()?.0 {
                    TokenKind::Colon => {
                        let key = Key {
                            raw: Cow::Borrowed(token.text),
                            value: Cow::Borrowed(token.text),
                            kind: KeyKind::Bare,
                        };
                        self.map_rest(sink, key, open.pos)
                    }
                    TokenKind::LParen if Reserved::classify(token.text).is_none() => {
                        sink.event(Event::SetOpen)?;
                        sink.event(Event::Call { head: token.text })?;
                        let call_open = self.lexer.consume()?;
                        sink.event(Event::TupleOpen)?;
                        self.tuple_body(sink, "function call", false, call_open.pos)?;
                        self.set_rest(sink, open.pos)
                    }
                    _ => {
                        sink.event(Event::SetOpen)?;
                        sink.event(Event::Atom(atom_from(token)))?;
                        self.set_rest(sink, open.pos)
                    }
                }
            }
            _ => {
                // Anything else cannot be a key, so this is a set
                sink.event(Event::SetOpen)?;
                self.value(sink)?;
                self.set_rest(sink, open.pos)
            }
        }
    }

    /// The rest of a mapping. The first key is already parsed and the
    /// `:` after it is the current lookahead.
    fn map_rest<S: EventSink<'src>>(
        &mut self,
        sink: &mut S,
        first_key: Key<'src>,
        open_pos: Pos,
    ) -> Result<(), Error> {
        sink.event(Event::MapOpen)?;
        sink.event(Event::MapKey(first_key))?;
        self.lexer.consume()?; // ':'
        self.value(sink)?;
        let mut len = 1usize;
        loop {
            let (kind, _) = self.peek_info()?;
            match kind {
                TokenKind::Comma => {
                    self.lexer.consume()?;
                }
                TokenKind::RBrace => break,
                TokenKind::Eof => {
                    return Err(Error::parse(
                        ParseError::UnterminatedContainer { container: "mapping" },
                        open_pos,
                    ));
                }
                _ => return Err(self.err_unexpected("`,` or `}`")),
            }
            if self.peek_info()?.0 == TokenKind::RBrace {
                break; // trailing comma
            }
            let (kind, _) = self.peek_info()?;
            let key = match kind {
                TokenKind::Number | TokenKind::Str => {
                    let token = self.lexer.consume()?;
                    quoted_key(token)
                }
                TokenKind::Ident => {
                    let token = self.lexer.consume()?;
                    Key {
                        raw: Cow::Borrowed(token.text),
                        value: Cow::Borrowed(token.text),
                        kind: KeyKind::Bare,
                    }
                }
                TokenKind::Eof => {
                    return Err(Error::parse(
                        ParseError::UnterminatedContainer { container: "mapping" },
                        open_pos,
                    ));
                }
                _ => return Err(self.err_unexpected("a mapping key")),
            };
            sink.event(Event::MapKey(key))?;
            let (kind, pos) = self.peek_info()?;
            if kind != TokenKind::Colon {
                return Err(Error::parse(ParseError::MissingColon, pos));
            }
            self.lexer.consume()?;
            self.value(sink)?;
            len += 1;
        }
        self.lexer.consume()?; // '}'
        sink.event(Event::MapClose { len })
    }

    /// The rest of a set. `SetOpen` and the first element are already
    /// emitted.
    fn set_rest<S: EventSink<'src>>(&mut self, sink: &mut S, open_pos: Pos) -> Result<(), Error> {
        let mut len = 1usize;
        loop {
            let (kind, _) = self.peek_info()?;
            match kind {
                TokenKind::Comma => {
                    self.lexer.consume()?;
                }
                TokenKind::RBrace => break,
                TokenKind::Eof => {
                    return Err(Error::parse(
                        ParseError::UnterminatedContainer { container: "set" },
                        open_pos,
                    ));
                }
                _ => return Err(self.err_unexpected("`,` or `}`")),
            }
            if self.peek_info()?.0 == TokenKind::RBrace {
                break; // trailing comma
            }
            self.value(sink)?;
            len += 1;
        }
        self.lexer.consume()?; // '}'
        sink.event(Event::SetClose { len })
    }
}

/// A string or number token used as a mapping key.
fn quoted_key(token: Token<'_>) -> Key<'_> {
    let value = match token.value {
        Some(value) => value,
        None => Cow::Borrowed(token.text),
    };
    Key {
        raw: Cow::Borrowed(token.text),
        value,
        kind: KeyKind::Quoted,
    }
}

/// Turn a value token into its atom.
fn atom_from(token: Token<'_>) -> Atom<'_> {
    let kind = match token.kind {
        TokenKind::Number => AtomKind::Number,
        TokenKind::Str => AtomKind::Str {
            prefix: StrPrefix::of(token.text),
        },
        TokenKind::Regex => AtomKind::Regex {
            flags: regex_flags(token.text),
        },
        TokenKind::Repr => AtomKind::Repr,
        _ => match Reserved::classify(token.text) {
            Some(reserved) => AtomKind::Reserved(reserved),
            None => AtomKind::Ident,
        },
    };
    Atom {
        kind,
        raw: Cow::Borrowed(token.text),
        value: token.value,
    }
}

/// The flag letters of a regex lexeme. Flags contain no `/`, so the
/// last slash of the lexeme is the closing delimiter.
fn regex_flags(lexeme: &str) -> &str {
    match lexeme.rfind('/') {
        Some(i) => &lexeme[i + 1..],
        None => "",
    }
}
