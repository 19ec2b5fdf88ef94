//! Input/output character encodings.
//!
//! The pipeline itself works on `str`; this module maps the byte
//! streams at the edges. The supported table is deliberately small:
//! UTF-8 (the default), ASCII, and Latin-1.

use std::io::{self, Write};

/// A supported character encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Ascii,
    Latin1,
}

/// The names `by_name` accepts, for error messages.
pub const SUPPORTED: &str = "utf-8, ascii, latin-1";

impl Encoding {
    /// Look an encoding up by name, case-insensitively.
    pub fn by_name(name: &str) -> Option<Encoding> {
        match name.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(Encoding::Utf8),
            "ascii" | "us-ascii" => Some(Encoding::Ascii),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Some(Encoding::Latin1),
            _ => None,
        }
    }

    /// Decode a whole input byte stream.
    pub fn decode(&self, bytes: Vec<u8>) -> io::Result<String> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes).map_err(|err| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("input is not valid UTF-8: {err}"),
                )
            }),
            Encoding::Ascii => {
                if let Some(byte) = bytes.iter().find(|b| !b.is_ascii()) {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("input is not ASCII (byte 0x{byte:02x})"),
                    ));
                }
                // ASCII is a UTF-8 subset
                String::from_utf8(bytes).map_err(|err| {
                    io::Error::new(io::ErrorKind::InvalidData, err.to_string())
                })
            }
            Encoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

/// Transcodes UTF-8 text writes into the target encoding.
///
/// Each `write` must carry complete UTF-8 sequences; the printer only
/// ever writes whole string slices, so that holds throughout the
/// pipeline.
pub struct EncodingWriter<W: Write> {
    inner: W,
    encoding: Encoding,
}

impl<W: Write> EncodingWriter<W> {
    pub fn new(inner: W, encoding: Encoding) -> Self {
        Self { inner, encoding }
    }
}

impl<W: Write> Write for EncodingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.encoding {
            Encoding::Utf8 => return self.inner.write(buf),
            Encoding::Ascii | Encoding::Latin1 => {
                let text = std::str::from_utf8(buf).map_err(|err| {
                    io::Error::new(io::ErrorKind::InvalidData, err.to_string())
                })?;
                let limit = match self.encoding {
                    Encoding::Ascii => 0x80,
                    _ => 0x100,
                };
                for c in text.chars() {
                    let code = c as u32;
                    if code >= limit {
                        return Err(io::Error::new(
                            io::ErrorKind::InvalidData,
                            format!("character {c:?} is not representable in the output encoding"),
                        ));
                    }
                    self.inner.write_all(&[code as u8])?;
                }
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
