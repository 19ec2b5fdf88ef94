//! Tree builder from parse events.

use canif_parse::{Atom, AtomKind, Error, Event, EventSink, Reserved};

use crate::value::{Object, Value};

/// What kind of items container is being filled.
enum ItemsKind {
    Array,
    Tuple,
    Set,
    Call { head: String },
}

enum Frame {
    Map {
        entries: Vec<(String, Value)>,
        key: Option<String>,
    },
    Items {
        kind: ItemsKind,
        items: Vec<Value>,
    },
}

/// Builder that constructs a [`Value`] from parse events.
///
/// Never fails as a sink; feed it a complete, balanced event stream
/// (which a successful parse guarantees) and [`finish`](Self::finish)
/// yields the value.
pub struct TreeBuilder {
    stack: Vec<Frame>,
    root: Option<Value>,
    /// A call head waiting for its argument tuple.
    call_pending: Option<String>,
}

impl TreeBuilder {
    /// Create a new tree builder.
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            root: None,
            call_pending: None,
        }
    }

    /// Finish building and return the value, or `None` if no complete
    /// value was received.
    pub fn finish(self) -> Option<Value> {
        if self.stack.is_empty() { self.root } else { None }
    }

    fn push_value(&mut self, value: Value) {
        match self.stack.last_mut() {
            Some(Frame::Items { items, .. }) => items.push(value),
            Some(Frame::Map { entries, key }) => {
                if let Some(key) = key.take() {
                    entries.push((key, value));
                }
            }
            None => self.root = Some(value),
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<'src> EventSink<'src> for TreeBuilder {
    fn event(&mut self, event: Event<'src>) -> Result<(), Error> {
        match event {
            Event::MapOpen => {
                self.stack.push(Frame::Map {
                    entries: Vec::new(),
                    key: None,
                });
            }
            Event::MapKey(map_key) => {
                if let Some(Frame::Map { key, .. }) = self.stack.last_mut() {
                    *key = Some(map_key.value.into_owned());
                }
            }
            Event::MapClose { .. } => {
                if let Some(Frame::Map { entries, .. }) = self.stack.pop() {
                    self.push_value(Value::Object(Object { entries }));
                }
            }

            Event::ArrayOpen => self.stack.push(Frame::Items {
                kind: ItemsKind::Array,
                items: Vec::new(),
            }),
            Event::SetOpen => self.stack.push(Frame::Items {
                kind: ItemsKind::Set,
                items: Vec::new(),
            }),
            Event::TupleOpen => {
                let kind = match self.call_pending.take() {
                    Some(head) => ItemsKind::Call { head },
                    None => ItemsKind::Tuple,
                };
                self.stack.push(Frame::Items {
                    kind,
                    items: Vec::new(),
                });
            }
            Event::Call { head } => {
                self.call_pending = Some(head.to_string());
            }

            Event::ArrayClose { .. } | Event::TupleClose { .. } | Event::SetClose { .. } => {
                if let Some(Frame::Items { kind, items }) = self.stack.pop() {
                    let value = match kind {
                        ItemsKind::Array | ItemsKind::Tuple => Value::Array(items),
                        ItemsKind::Set => Value::Object(Object {
                            entries: vec![("$set".to_string(), Value::Array(items))],
                        }),
                        ItemsKind::Call { head } => {
                            let tag = if head == "oid" {
                                "$oid".to_string()
                            } else {
                                format!("$${head}")
                            };
                            Value::Object(Object {
                                entries: vec![(tag, Value::Array(items))],
                            })
                        }
                    };
                    self.push_value(value);
                }
            }

            Event::Atom(atom) => {
                let value = atom_value(atom);
                self.push_value(value);
            }
        }
        Ok(())
    }
}

fn atom_value(atom: Atom<'_>) -> Value {
    match atom.kind {
        AtomKind::Number => Value::Number(atom.raw.into_owned()),
        AtomKind::Str { .. } => {
            let value = match atom.value {
                Some(value) => value,
                None => atom.raw,
            };
            Value::String(value.into_owned())
        }
        AtomKind::Reserved(Reserved::Bool(b)) => Value::Bool(b),
        AtomKind::Reserved(Reserved::Null) | AtomKind::Reserved(Reserved::Lossy) => Value::Null,
        AtomKind::Ident => Value::String(format!("$${}", atom.raw)),
        AtomKind::Repr => Value::String(format!("$repr{}", atom.raw)),
        AtomKind::Regex { flags } => {
            let pattern = match atom.value {
                Some(value) => value,
                None => atom.raw,
            };
            let mut entries = vec![("$regex".to_string(), Value::String(pattern.into_owned()))];
            if !flags.is_empty() {
                entries.push(("$options".to_string(), Value::String(flags.to_string())));
            }
            Value::Object(Object { entries })
        }
        AtomKind::EmptySlot => Value::Null,
    }
}
