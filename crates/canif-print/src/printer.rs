//! Incremental printer for parse events.

use std::io::Write;

use canif_parse::{Atom, AtomKind, Error, Event, EventSink, Key, KeyKind};

use crate::escape;
use crate::options::PrintOptions;

/// What kind of container a frame is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Map,
    Array,
    Tuple,
    Set,
    Call,
}

/// Per-depth printing state.
#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    /// Items emitted so far (entries, for maps).
    len: usize,
    /// A key was just written; the next value follows it on the line.
    expect_value: bool,
    /// The previous item was an array empty slot.
    last_was_slot: bool,
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            len: 0,
            expect_value: false,
            last_was_slot: false,
        }
    }
}

/// Writes a formatted rendering of the event stream to an output sink,
/// one event at a time.
///
/// Layout only ever depends on the current frame stack and the options,
/// so memory use is proportional to nesting depth. Write errors
/// surface as [`Error::Io`] from [`event`](EventSink::event) and abort
/// the parse driving this printer.
pub struct Printer<W: Write> {
    out: W,
    options: PrintOptions,
    stack: Vec<Frame>,
    /// A `Call` head has been written; the tuple that follows is its
    /// argument list.
    call_pending: bool,
}

impl<W: Write> Printer<W> {
    /// Create a printer writing to `out`.
    pub fn new(out: W, options: PrintOptions) -> Self {
        Self {
            out,
            options,
            stack: Vec::new(),
            call_pending: false,
        }
    }

    /// Terminate the output with the final newline and flush.
    ///
    /// Call this once the parse has completed successfully.
    pub fn finish(mut self) -> Result<(), Error> {
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }

    fn newline_indent(&mut self, depth: usize) -> std::io::Result<()> {
        self.out.write_all(b"\n")?;
        write!(self.out, "{:1$}", "", depth * self.options.indent)
    }

    /// Separate an item from what came before it: indentation after an
    /// open bracket, a comma between siblings, nothing after a key.
    fn begin_item(&mut self, is_slot: bool) -> Result<(), Error> {
        let flat = self.options.indent == 0;
        let (first, bare_comma) = match self.stack.last_mut() {
            None => return Ok(()),
            Some(frame) => {
                if frame.expect_value {
                    frame.expect_value = false;
                    return Ok(());
                }
                let first = frame.len == 0;
                let bare_comma = is_slot || frame.last_was_slot;
                frame.len += 1;
                frame.last_was_slot = is_slot;
                (first, bare_comma)
            }
        };
        let depth = self.stack.len();
        if first {
            if !flat {
                self.newline_indent(depth)?;
            }
        } else if flat {
            // Slots print nothing, so the separators around one stay
            // bare to keep `[1,,,4]` re-readable.
            if bare_comma {
                self.out.write_all(b",")?;
            } else {
                self.out.write_all(b", ")?;
            }
        } else {
            self.out.write_all(b",")?;
            self.newline_indent(depth)?;
        }
        Ok(())
    }

    fn open(&mut self, kind: FrameKind, bracket: &[u8]) -> Result<(), Error> {
        self.begin_item(false)?;
        self.out.write_all(bracket)?;
        self.stack.push(Frame::new(kind));
        Ok(())
    }

    fn close(&mut self, bracket: &[u8]) -> Result<(), Error> {
        let Some(frame) = self.stack.pop() else {
            return Ok(());
        };
        if frame.len > 0 {
            // Two commas are syntax, not style: a 1-tuple keeps its
            // comma or it would read back as a parenthesised scalar,
            // and a trailing empty slot keeps its comma or it would
            // vanish on the next read.
            let forced = (frame.kind == FrameKind::Tuple && frame.len == 1) || frame.last_was_slot;
            if self.options.indent == 0 {
                if forced {
                    self.out.write_all(b",")?;
                }
            } else {
                if self.options.trailing_commas || forced {
                    self.out.write_all(b",")?;
                }
                self.newline_indent(self.stack.len())?;
            }
        }
        self.out.write_all(bracket)?;
        Ok(())
    }

    fn map_key(&mut self, key: Key<'_>) -> Result<(), Error> {
        self.begin_item(false)?;
        if self.options.ensure_ascii && key.kind == KeyKind::Quoted {
            self.out.write_all(escape::ensure_ascii(&key.raw).as_bytes())?;
        } else {
            self.out.write_all(key.raw.as_bytes())?;
        }
        self.out.write_all(b": ")?;
        if let Some(frame) = self.stack.last_mut() {
            frame.expect_value = true;
        }
        Ok(())
    }

    fn atom(&mut self, atom: Atom<'_>) -> Result<(), Error> {
        let is_slot = matches!(atom.kind, AtomKind::EmptySlot);
        self.begin_item(is_slot)?;
        if is_slot {
            return Ok(());
        }
        if self.options.ensure_ascii && matches!(atom.kind, AtomKind::Str { .. }) {
            self.out.write_all(escape::ensure_ascii(&atom.raw).as_bytes())?;
        } else {
            self.out.write_all(atom.raw.as_bytes())?;
        }
        Ok(())
    }
}

impl<'src, W: Write> EventSink<'src> for Printer<W> {
    fn event(&mut self, event: Event<'src>) -> Result<(), Error> {
        match event {
            Event::MapOpen => self.open(FrameKind::Map, b"{"),
            Event::ArrayOpen => self.open(FrameKind::Array, b"["),
            Event::SetOpen => self.open(FrameKind::Set, b"{"),
            Event::TupleOpen => {
                if self.call_pending {
                    self.call_pending = false;
                    self.out.write_all(b"(")?;
                    self.stack.push(Frame::new(FrameKind::Call));
                    Ok(())
                } else {
                    self.open(FrameKind::Tuple, b"(")
                }
            }
            Event::MapClose { .. } | Event::SetClose { .. } => self.close(b"}"),
            Event::ArrayClose { .. } => self.close(b"]"),
            Event::TupleClose { .. } => self.close(b")"),
            Event::MapKey(key) => self.map_key(key),
            Event::Call { head } => {
                self.begin_item(false)?;
                self.out.write_all(head.as_bytes())?;
                self.call_pending = true;
                Ok(())
            }
            Event::Atom(atom) => self.atom(atom),
        }
    }
}
