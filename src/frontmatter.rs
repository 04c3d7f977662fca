//! Front matter codec.
//!
//! A content document is an optional YAML header fenced by `---` lines,
//! followed by free-form body text:
//!
//! ```text
//! ---
//! title: Hello
//! published: false
//! ---
//!
//! Body text starts here.
//! ```
//!
//! Decoding splits the header from the body and parses the header into a
//! [`ContentMetadata`] mapping. Encoding turns a mapping back into header text.
//! The pair is a best-effort round trip: change detection compares encoded
//! text, never raw file bytes, so key order and quoting normalization by the
//! encoder never count as a change on their own.
//!
//! The closing fence may also be `...`. Blank lines between the closing fence
//! and the body are not part of the body. A document without a complete header
//! decodes to empty metadata and the whole text as body.

use crate::metadata::ContentMetadata;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Fence line opening and closing a header.
pub const DELIMITER: &str = "---";

const ALT_CLOSING_DELIMITER: &str = "...";
const BOM: char = '\u{feff}';

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Front matter must be a mapping, found {0}")]
    NotAMapping(&'static str),
}

/// A decoded document: header metadata plus body text.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub meta: ContentMetadata,
    pub body: String,
}

/// Decode/encode contract between file text and metadata.
pub trait MetadataCodec {
    /// Split `text` into metadata and body.
    fn decode(&self, text: &str) -> Result<Document, CodecError>;

    /// Encode metadata as header text (without fences).
    fn encode(&self, meta: &ContentMetadata) -> Result<String, CodecError>;
}

/// YAML front matter codec backed by `serde_yaml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl MetadataCodec for YamlCodec {
    fn decode(&self, text: &str) -> Result<Document, CodecError> {
        let Some((header, body)) = split_front_matter(text) else {
            return Ok(Document {
                meta: ContentMetadata::new(),
                body: text.to_string(),
            });
        };

        let meta = match serde_yaml::from_str::<Value>(header)? {
            Value::Null => ContentMetadata::new(),
            Value::Mapping(mapping) => ContentMetadata::from_mapping(mapping),
            other => return Err(CodecError::NotAMapping(value_kind(&other))),
        };

        Ok(Document {
            meta,
            body: body.to_string(),
        })
    }

    fn encode(&self, meta: &ContentMetadata) -> Result<String, CodecError> {
        let mapping: &Mapping = meta.as_mapping();
        Ok(serde_yaml::to_string(mapping)?)
    }
}

/// Assemble full file text from encoded header text and a body.
///
/// The layout is fixed: fence, header (trimmed), fence, one blank line, then
/// the body with its leading whitespace removed.
pub fn render_document(encoded_header: &str, body: &str) -> String {
    format!(
        "{DELIMITER}\n{}\n{DELIMITER}\n\n{}",
        encoded_header.trim(),
        body.trim_start()
    )
}

/// Locate the header and body slices of `text`.
///
/// Returns `None` when the text does not open with a fence line or the fence
/// is never closed.
fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let after_open = strip_fence_line(text, DELIMITER)?;

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        let trimmed = content.trim_end();
        if trimmed == DELIMITER || trimmed == ALT_CLOSING_DELIMITER {
            let header = &after_open[..offset];
            let rest = &after_open[offset + trimmed.len()..];
            return Some((header, body_after_fence(rest)));
        }
        offset += line.len();
    }
    None
}

/// If `text` starts with `fence` alone on its line, return what follows the
/// line break.
fn strip_fence_line<'a>(text: &'a str, fence: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(fence)?;
    let rest = rest.strip_prefix('\r').unwrap_or(rest);
    rest.strip_prefix('\n')
}

/// Drop the remainder of the closing fence line and any blank lines after it.
///
/// Indentation on the first non-blank line is kept.
fn body_after_fence(rest: &str) -> &str {
    let content_start = rest.len() - rest.trim_start().len();
    if content_start == rest.len() {
        return "";
    }
    match rest[..content_start].rfind('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
