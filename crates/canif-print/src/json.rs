//! Streaming JSON lowerer.
//!
//! An [`EventSink`] adapter that rewrites the event stream so that
//! whatever printer sits behind it emits strict JSON: tuples become
//! arrays, sets and function calls become tagged one-entry mappings,
//! non-JSON atoms become tagged strings, and every key and string is
//! re-encoded as a double-quoted JSON literal.

use std::borrow::Cow;

use canif_parse::{Atom, AtomKind, Error, Event, EventSink, Key, KeyKind, Reserved, StrPrefix};

use crate::escape;

/// Which rewrite applies when a tuple closes.
#[derive(Debug, Clone, Copy)]
enum TupleFrame {
    /// A plain tuple: closes as an array.
    Plain,
    /// A call's argument list: closes the array and the wrapping map.
    CallArgs,
}

/// The lowering adapter. Wraps any sink; typically a
/// [`Printer`](crate::Printer).
pub struct JsonLowerer<S> {
    inner: S,
    /// One entry per open tuple. All other containers close
    /// unambiguously and need no state.
    tuples: Vec<TupleFrame>,
    /// A call head was seen; the next `TupleOpen` is its argument list.
    call_pending: bool,
}

impl<S> JsonLowerer<S> {
    /// Wrap a sink.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            tuples: Vec::new(),
            call_pending: false,
        }
    }

    /// Unwrap the inner sink.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

/// A synthesized, always-quoted key.
fn json_key(value: Cow<'_, str>) -> Key<'_> {
    Key {
        raw: Cow::Owned(escape::json_string(&value)),
        value,
        kind: KeyKind::Quoted,
    }
}

/// A synthesized plain string atom.
fn json_string_atom(value: Cow<'_, str>) -> Atom<'_> {
    Atom {
        kind: AtomKind::Str {
            prefix: StrPrefix::default(),
        },
        raw: Cow::Owned(escape::json_string(&value)),
        value: Some(value),
    }
}

fn null_atom<'src>() -> Atom<'src> {
    Atom {
        kind: AtomKind::Reserved(Reserved::Null),
        raw: Cow::Borrowed("null"),
        value: None,
    }
}

/// Rewrite a hexadecimal lexeme to decimal so it survives as JSON.
/// Decimal lexemes pass through byte-identical; a hex lexeme too large
/// for `u128` is left alone rather than truncated.
fn lower_number(atom: Atom<'_>) -> Atom<'_> {
    let text = atom.raw.as_ref();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    if let Some(hex) = digits.strip_prefix("0x")
        && let Ok(value) = u128::from_str_radix(hex, 16)
    {
        return Atom {
            kind: AtomKind::Number,
            raw: Cow::Owned(format!("{sign}{value}")),
            value: None,
        };
    }
    atom
}

impl<'src, S: EventSink<'src>> EventSink<'src> for JsonLowerer<S> {
    fn event(&mut self, event: Event<'src>) -> Result<(), Error> {
        match event {
            // Containers that already are JSON pass through
            Event::MapOpen => self.inner.event(Event::MapOpen),
            Event::MapClose { len } => self.inner.event(Event::MapClose { len }),
            Event::ArrayOpen => self.inner.event(Event::ArrayOpen),
            Event::ArrayClose { len } => self.inner.event(Event::ArrayClose { len }),

            // Tuples become arrays; a call's argument tuple also closes
            // the map wrapped around it
            Event::TupleOpen => {
                if self.call_pending {
                    self.call_pending = false;
                    self.tuples.push(TupleFrame::CallArgs);
                } else {
                    self.tuples.push(TupleFrame::Plain);
                }
                self.inner.event(Event::ArrayOpen)
            }
            Event::TupleClose { len } => match self.tuples.pop() {
                Some(TupleFrame::CallArgs) => {
                    self.inner.event(Event::ArrayClose { len })?;
                    self.inner.event(Event::MapClose { len: 1 })
                }
                _ => self.inner.event(Event::ArrayClose { len }),
            },

            // Sets become `{"$set": [...]}`
            Event::SetOpen => {
                self.inner.event(Event::MapOpen)?;
                self.inner.event(Event::MapKey(json_key(Cow::Borrowed("$set"))))?;
                self.inner.event(Event::ArrayOpen)
            }
            Event::SetClose { len } => {
                self.inner.event(Event::ArrayClose { len })?;
                self.inner.event(Event::MapClose { len: 1 })
            }

            // Calls become `{"$$head": [...]}`; a literal `oid` head
            // gets the BSON spelling
            Event::Call { head } => {
                let tag = if head == "oid" {
                    Cow::Borrowed("$oid")
                } else {
                    Cow::Owned(format!("$${head}"))
                };
                self.inner.event(Event::MapOpen)?;
                self.inner.event(Event::MapKey(json_key(tag)))?;
                self.call_pending = true;
                Ok(())
            }

            // Every key prints as a JSON string of its decoded text
            Event::MapKey(key) => self.inner.event(Event::MapKey(json_key(key.value))),

            Event::Atom(atom) => self.lower_atom(atom),
        }
    }
}

impl<S> JsonLowerer<S> {
    fn lower_atom<'src>(&mut self, atom: Atom<'src>) -> Result<(), Error>
    where
        S: EventSink<'src>,
    {
        let lowered = match atom.kind {
            AtomKind::Number => Event::Atom(lower_number(atom)),
            AtomKind::Str { .. } => {
                let value = match atom.value {
                    Some(value) => value,
                    None => atom.raw,
                };
                Event::Atom(json_string_atom(value))
            }
            AtomKind::Reserved(Reserved::Bool(value)) => Event::Atom(Atom {
                kind: atom.kind,
                raw: Cow::Borrowed(if value { "true" } else { "false" }),
                value: None,
            }),
            AtomKind::Reserved(Reserved::Null)
            | AtomKind::Reserved(Reserved::Lossy)
            | AtomKind::EmptySlot => Event::Atom(null_atom()),
            AtomKind::Ident => {
                Event::Atom(json_string_atom(Cow::Owned(format!("$${}", atom.raw))))
            }
            AtomKind::Repr => {
                Event::Atom(json_string_atom(Cow::Owned(format!("$repr{}", atom.raw))))
            }
            AtomKind::Regex { flags } => {
                // `{"$regex": "...", "$options": "..."}` in the style of
                // MongoDB extended JSON; `$options` only when flags exist
                let pattern = match atom.value {
                    Some(value) => value,
                    None => atom.raw,
                };
                self.inner.event(Event::MapOpen)?;
                self.inner
                    .event(Event::MapKey(json_key(Cow::Borrowed("$regex"))))?;
                self.inner.event(Event::Atom(json_string_atom(pattern)))?;
                let mut len = 1;
                if !flags.is_empty() {
                    self.inner
                        .event(Event::MapKey(json_key(Cow::Borrowed("$options"))))?;
                    self.inner
                        .event(Event::Atom(json_string_atom(Cow::Borrowed(flags))))?;
                    len = 2;
                }
                return self.inner.event(Event::MapClose { len });
            }
        };
        self.inner.event(lowered)
    }
}
