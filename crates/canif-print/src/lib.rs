//! Incremental printing for canif parse events.
//!
//! Two [`EventSink`](canif_parse::EventSink) implementations live here:
//! [`Printer`], which writes a formatted rendering of the event stream
//! to any `io::Write`, and [`JsonLowerer`], an adapter that rewrites
//! the stream into strict-JSON-compatible events on the way to a
//! printer. Composing them gives the two output modes:
//!
//! ```
//! use canif_parse::Parser;
//! use canif_print::{JsonLowerer, PrintOptions, Printer};
//!
//! let mut out = Vec::new();
//! let options = PrintOptions::default().for_json();
//! let mut sink = JsonLowerer::new(Printer::new(&mut out, options));
//! Parser::new("{'a': (1, 2)}").parse(&mut sink)?;
//! sink.into_inner().finish()?;
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "{\n    \"a\": [\n        1,\n        2\n    ]\n}\n"
//! );
//! # Ok::<(), canif_parse::Error>(())
//! ```

mod escape;
mod json;
mod options;
mod printer;

pub use escape::{ensure_ascii, json_string};
pub use json::JsonLowerer;
pub use options::PrintOptions;
pub use printer::Printer;
