//! Field references
//!
//! A field reference selects a value within a [`Record`]. Two shapes are accepted:
//!
//! - a bare top-level key, e.g. `status`
//! - a bracketed path, e.g. `[http][response][status]`, walked from left to right
//!
//! Parsing is strict (empty brackets, unbalanced brackets and text outside of brackets are
//! rejected), resolution is not: a missing key or a non-object value along the path resolves
//! to [`None`], which is rendered as an empty cell.

use std::{fmt::Display, str::FromStr};

use itertools::Itertools;
use thiserror::Error;

use crate::core::record::{Record, Value};

/// Reason a field reference was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldReferenceErrorKind {
    /// The reference is the empty string
    #[error("reference is empty")]
    Empty,
    /// A `[]` pair without a key in between
    #[error("empty brackets at byte {0}")]
    EmptySegment(usize),
    /// A `[` without matching `]`
    #[error("unclosed '[' at byte {0}")]
    UnclosedBracket(usize),
    /// A bracket where none is allowed (inside a segment or a bare key)
    #[error("unexpected '{found}' at byte {position}")]
    UnexpectedBracket {
        /// The bracket character found
        found: char,
        /// Byte offset of the bracket
        position: usize,
    },
    /// Text between or after bracketed segments
    #[error("unexpected text outside of brackets at byte {0}")]
    TextOutsideBrackets(usize),
}

/// A field reference that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid field reference '{reference}': {kind}")]
pub struct FieldReferenceError {
    /// The reference as configured
    pub reference: String,
    /// What is wrong with it
    pub kind: FieldReferenceErrorKind,
}

/// Parsed path selecting a (possibly nested) value of a [`Record`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldReference {
    source: String,
    segments: Vec<String>,
}

impl FieldReference {
    /// Parse a bare key (`foo`) or a bracketed path (`[foo][bar]`)
    pub fn parse(reference: &str) -> Result<Self, FieldReferenceError> {
        let segments = parse_segments(reference).map_err(|kind| FieldReferenceError {
            reference: reference.to_string(),
            kind,
        })?;
        Ok(Self {
            source: reference.to_string(),
            segments,
        })
    }

    /// The reference exactly as it was configured (used as default header label)
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Path segments, outermost key first
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// `true` if the reference addresses a value below the top level
    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }

    /// Bracketed form of the reference, e.g. `[foo]` for the bare key `foo`
    pub fn canonical(&self) -> String {
        self.segments.iter().map(|s| format!("[{s}]")).join("")
    }

    /// Look up the referenced value in `record`
    ///
    /// Returns [`None`] (absent) if a key is missing or an intermediate value is not an object.
    pub fn resolve<'a>(&self, record: &'a Record) -> Option<&'a Value> {
        let (first, rest) = self.segments.split_first()?;
        let mut current = record.get(first)?;
        for segment in rest {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}

impl Display for FieldReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for FieldReference {
    type Err = FieldReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for FieldReference {
    type Error = FieldReferenceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

fn parse_segments(reference: &str) -> Result<Vec<String>, FieldReferenceErrorKind> {
    if reference.is_empty() {
        return Err(FieldReferenceErrorKind::Empty);
    }
    if !reference.starts_with('[') {
        return match reference.find(['[', ']']) {
            Some(position) => Err(FieldReferenceErrorKind::UnexpectedBracket {
                found: char::from(reference.as_bytes()[position]),
                position,
            }),
            None => Ok(vec![reference.to_string()]),
        };
    }

    let mut segments = Vec::new();
    let mut rest = reference;
    let mut offset = 0;
    while !rest.is_empty() {
        let Some(body) = rest.strip_prefix('[') else {
            return Err(FieldReferenceErrorKind::TextOutsideBrackets(offset));
        };
        let Some(end) = body.find(']') else {
            return Err(FieldReferenceErrorKind::UnclosedBracket(offset));
        };
        let segment = &body[..end];
        if segment.is_empty() {
            return Err(FieldReferenceErrorKind::EmptySegment(offset));
        }
        if let Some(inner) = segment.find('[') {
            return Err(FieldReferenceErrorKind::UnexpectedBracket {
                found: '[',
                position: offset + 1 + inner,
            });
        }
        segments.push(segment.to_string());
        offset += end + 2;
        rest = &body[end + 1..];
    }
    Ok(segments)
}
