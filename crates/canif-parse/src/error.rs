//! The shared error type for the pipeline.

use thiserror::Error;

use crate::Pos;

/// Any error the pipeline can produce: lexical, syntactic, or I/O.
///
/// Lex and parse errors carry the position of the offending input; the
/// `Display` rendering is the one-line diagnostic the CLI prints.
#[derive(Debug, Error)]
pub enum Error {
    /// The input could not be split into tokens.
    #[error("{kind} at {pos}")]
    Lex {
        /// What went wrong.
        kind: LexError,
        /// Where it went wrong.
        pos: Pos,
    },

    /// The token stream does not form a value.
    #[error("{kind} at {pos}")]
    Parse {
        /// What went wrong.
        kind: ParseError,
        /// Where it went wrong.
        pos: Pos,
    },

    /// Reading the input or writing the output failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn lex(kind: LexError, pos: Pos) -> Self {
        Error::Lex { kind, pos }
    }

    pub(crate) fn parse(kind: ParseError, pos: Pos) -> Self {
        Error::Parse { kind, pos }
    }

    /// The position of a lex or parse error, if this is one.
    pub fn pos(&self) -> Option<Pos> {
        match self {
            Error::Lex { pos, .. } | Error::Parse { pos, .. } => Some(*pos),
            Error::Io(_) => None,
        }
    }
}

/// Lexical error kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A string literal ran off the end of the input.
    #[error("unterminated string literal")]
    UnterminatedString,
    /// A literal newline appeared inside a string literal.
    #[error("newline inside string literal")]
    NewlineInString,
    /// An escape sequence was not one of the recognised forms.
    #[error("invalid escape sequence `{0}`")]
    InvalidEscape(String),
    /// A `<...>` repr never closed.
    #[error("unterminated `<...>` repr")]
    UnterminatedRepr,
    /// A `/.../'` regex literal never closed.
    #[error("unterminated regex literal")]
    UnterminatedRegex,
    /// A character that cannot start any token.
    #[error("unrecognised character `{0}`")]
    UnrecognisedChar(char),
}

/// Syntactic error kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The parser found something other than what the grammar allows here.
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        /// Description of the acceptable tokens.
        expected: &'static str,
        /// Description of the token actually found.
        found: String,
    },
    /// A container was still open at end of input.
    #[error("unterminated {container}")]
    UnterminatedContainer {
        /// "array", "tuple", "mapping", "set", or "function call".
        container: &'static str,
    },
    /// A mapping key was not followed by `:`.
    #[error("expected `:` after mapping key")]
    MissingColon,
    /// A value was required and absent.
    #[error("expected a value")]
    ExpectedValue,
    /// Input continued after the top-level value.
    #[error("trailing data after the document")]
    TrailingData,
}
