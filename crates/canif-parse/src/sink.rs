//! The sink the parser pushes events into.

use crate::Error;
use crate::event::Event;

/// Consumer of parse events.
///
/// The parser calls [`event`](EventSink::event) for every event as it
/// is discovered; nothing is buffered. Returning an error aborts the
/// parse immediately and propagates out of
/// [`Parser::parse`](crate::Parser::parse), so a failing output sink
/// (e.g. a closed pipe) stops the pipeline without reading further
/// input.
pub trait EventSink<'src> {
    /// Handle one event.
    fn event(&mut self, event: Event<'src>) -> Result<(), Error>;
}

/// Collect events into a `Vec`. Mostly useful in tests.
impl<'src> EventSink<'src> for Vec<Event<'src>> {
    fn event(&mut self, event: Event<'src>) -> Result<(), Error> {
        self.push(event);
        Ok(())
    }
}
