//! Flat, row-wrapped rendering of typed buffers
//!
//! Values are emitted in row-major order as whitespace-separated tokens. A
//! newline replaces the separator after every `line_length` tokens, so each
//! output line holds one run of the fastest-varying dimension.

use crate::element::Element;
use crate::reader::{with_values, TypedBuffer};
use std::io::{self, Write};

/// What follows a token in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Space,
    Newline,
}

impl Separator {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Space => " ",
            Self::Newline => "\n",
        }
    }
}

/// Lazy sequence of `(token, separator)` pairs over one buffer
pub struct FlatTokens<'a> {
    values: Box<dyn Iterator<Item = String> + 'a>,
    line_length: usize,
    column: usize,
}

impl<'a> FlatTokens<'a> {
    /// Walk `buffer` with rows of `line_length` tokens
    ///
    /// A line length of zero is treated as one.
    #[must_use]
    pub fn new(buffer: &'a TypedBuffer, line_length: usize) -> Self {
        Self {
            values: tokens(buffer),
            line_length: line_length.max(1),
            column: 0,
        }
    }
}

impl Iterator for FlatTokens<'_> {
    type Item = (String, Separator);

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.values.next()?;
        self.column += 1;
        let separator = if self.column == self.line_length {
            self.column = 0;
            Separator::Newline
        } else {
            Separator::Space
        };
        Some((token, separator))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

/// Formatted values of a buffer, without separators
pub fn tokens(buffer: &TypedBuffer) -> Box<dyn Iterator<Item = String> + '_> {
    with_values!(buffer, values => boxed_tokens(values))
}

fn boxed_tokens<T: Element>(values: &[T]) -> Box<dyn Iterator<Item = String> + '_> {
    Box::new(values.iter().map(|&v| v.token()))
}

/// Write `buffer` as rows of `line_length` tokens
///
/// A trailing partial row is terminated with a newline. An empty buffer writes
/// nothing.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_flat<W: Write + ?Sized>(
    buffer: &TypedBuffer,
    line_length: usize,
    out: &mut W,
) -> io::Result<()> {
    let mut last = None;
    for (token, separator) in FlatTokens::new(buffer, line_length) {
        out.write_all(token.as_bytes())?;
        out.write_all(separator.as_str().as_bytes())?;
        last = Some(separator);
    }
    if last == Some(Separator::Space) {
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Render `buffer` into a `String`, as [`write_flat`] would write it
#[must_use]
pub fn render(buffer: &TypedBuffer, line_length: usize) -> String {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_flat(buffer, line_length, &mut out);
    String::from_utf8_lossy(&out).into_owned()
}
