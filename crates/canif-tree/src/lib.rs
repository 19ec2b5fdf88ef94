//! In-memory values for canif documents.
//!
//! This crate re-consumes the event stream from `canif-parse` into a
//! plain [`Value`] tree, for callers who want the data rather than a
//! reformatted rendering.

mod builder;
mod value;

pub use builder::TreeBuilder;
pub use canif_parse::{Error, ParseError, Pos};
pub use value::{Object, Value};

/// Parse one document into a [`Value`].
pub fn parse(source: &str) -> Result<Value, Error> {
    let mut builder = TreeBuilder::new();
    canif_parse::Parser::new(source).parse(&mut builder)?;
    builder
        .finish()
        .ok_or_else(|| Error::Parse {
            kind: ParseError::ExpectedValue,
            pos: Pos::start(),
        })
}

/// Read all of `reader` and parse one document into a [`Value`].
pub fn load<R: std::io::Read>(mut reader: R) -> Result<Value, Error> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    parse(&source)
}
