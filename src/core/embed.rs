//! Locating and splicing a JSON array embedded in a larger text document.
//!
//! The flashcard page inlines its HSK1 vocabulary as `const h1=[...]`. The
//! surrounding markup shifts between edits, so the array is found by its
//! assignment marker plus a balanced-bracket scan rather than a fixed offset.
//! Only the array span is ever replaced; everything else stays byte-identical.

use thiserror::Error;

/// Default assignment marker for the HSK1 vocabulary array
pub const DEFAULT_MARKER: &str = "const h1=";

/// Errors that can occur while locating the embedded array
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("Marker not found: {0}")]
    MarkerNotFound(String),

    #[error("Expected '[' after marker at byte {0}")]
    NotAnArray(usize),

    #[error("Unbalanced brackets starting at byte {0}")]
    Unbalanced(usize),

    #[error("Embedded JSON is invalid: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Byte span of an embedded structure within its host document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedSpan {
    /// Offset of the opening bracket
    pub start: usize,

    /// Offset one past the closing bracket
    pub end: usize,
}

impl EmbeddedSpan {
    /// The embedded text
    pub fn slice<'a>(&self, document: &'a str) -> &'a str {
        &document[self.start..self.end]
    }
}

/// Find the array assigned after the first occurrence of `marker`.
///
/// Brackets inside JSON string literals are ignored.
pub fn locate_array(document: &str, marker: &str) -> Result<EmbeddedSpan, EmbedError> {
    let after_marker = document
        .find(marker)
        .map(|i| i + marker.len())
        .ok_or_else(|| EmbedError::MarkerNotFound(marker.to_string()))?;

    let rest = &document[after_marker..];
    let start = after_marker + (rest.len() - rest.trim_start().len());
    if !document[start..].starts_with('[') {
        return Err(EmbedError::NotAnArray(start));
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in document[start..].bytes().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(EmbeddedSpan {
                        start,
                        end: start + offset + 1,
                    });
                }
            }
            _ => {}
        }
    }

    Err(EmbedError::Unbalanced(start))
}

/// Replace the span with new text, keeping the rest of the document intact
pub fn splice(document: &str, span: EmbeddedSpan, replacement: &str) -> String {
    let mut out = String::with_capacity(document.len() - (span.end - span.start) + replacement.len());
    out.push_str(&document[..span.start]);
    out.push_str(replacement);
    out.push_str(&document[span.end..]);
    out
}
