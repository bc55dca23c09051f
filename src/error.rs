//! Error types for mesh container reading and writing
//!
//! This module provides the error taxonomy shared by every codec layer.
//! All errors carry an error code for categorization and a message with
//! enough context to locate the defect.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! Categories:
//! - **E1xxx**: I/O and archive errors
//! - **E2xxx**: Structure and format errors
//! - **E3xxx**: Integrity errors and numeric parse errors
//! - **E4xxx**: Version errors
//! - **E5xxx**: Invalid arguments
//!
//! ## Common Error Codes
//!
//! - `E1001`: I/O error reading or writing the container
//! - `E1002`: ZIP archive format error
//! - `E1003`: Missing required entry in archive
//! - `E2001`: XML parsing error
//! - `E2004`: Invalid binary or container format
//! - `E3001`: Triangulation or value-list integrity failure
//! - `E4001`: Unsupported file version
//! - `E5001`: Invalid argument

use std::io;
use thiserror::Error;

/// Result type for container operations
pub type Result<T> = std::result::Result<T, Error>;

/// Taxonomy category of an [`Error`]
///
/// Callers that implement retry policies usually only need this coarse
/// classification: `Io` failures may be transient, everything else is a
/// property of the input and will fail the same way again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Failure of the underlying input/output transport
    Io,
    /// Structurally invalid input
    Format,
    /// File written by a newer, incompatible codec
    Version,
    /// Fingerprint or value-list consistency failure
    Integrity,
    /// Invalid construction input or lookup
    Argument,
}

/// Errors that can occur when reading, writing or building mesh containers
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred while reading or writing the container
    ///
    /// **Error Code**: E1001
    ///
    /// **Common Causes**:
    /// - File not found
    /// - Insufficient permissions
    /// - Disk read or write error
    #[error("[E1001] I/O error: {0}")]
    Io(#[from] io::Error),

    /// ZIP archive error
    ///
    /// **Error Code**: E1002
    ///
    /// **Common Causes**:
    /// - Corrupted ZIP file
    /// - Unsupported compression method
    /// - Truncated archive
    ///
    /// **Suggestions**:
    /// - Verify the file is a complete container (ZIP) archive
    /// - Try re-fetching or re-exporting the file
    #[error("[E1002] ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Missing required entry in the container archive
    ///
    /// **Error Code**: E1003
    ///
    /// **Common Causes**:
    /// - Incomplete container
    /// - Missing `metadata.xml`
    /// - Value dataset declared in metadata but its entry is absent
    ///
    /// **Suggestions**:
    /// - Ensure the archive contains every entry its metadata references
    #[error("[E1003] Missing required entry: {0}")]
    MissingEntry(String),

    /// XML parsing error
    ///
    /// **Error Code**: E2001
    ///
    /// **Common Causes**:
    /// - Malformed XML syntax
    /// - Invalid character encoding
    /// - Unclosed tags
    #[error("[E2001] XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML attribute error
    ///
    /// **Error Code**: E2002
    ///
    /// **Common Causes**:
    /// - Missing required attribute
    /// - Invalid attribute value
    /// - Duplicate attribute
    #[error("[E2002] XML attribute error: {0}")]
    XmlAttr(String),

    /// Invalid metadata document structure
    ///
    /// **Error Code**: E2003
    ///
    /// **Common Causes**:
    /// - Missing required XML elements
    /// - Invalid element nesting
    #[error("[E2003] Invalid XML structure: {0}")]
    InvalidXml(String),

    /// Invalid binary or container format
    ///
    /// **Error Code**: E2004
    ///
    /// **Common Causes**:
    /// - Negative array length
    /// - Truncated array data
    /// - Empty string where a value is mandatory
    /// - Presence marker that is neither 0 nor 1
    ///
    /// **Suggestions**:
    /// - Verify the file was written completely
    /// - Check that the file was not modified by another tool
    #[error("[E2004] Invalid container format: {0}")]
    InvalidFormat(String),

    /// XML writing error
    ///
    /// **Error Code**: E2005
    ///
    /// **Common Causes**:
    /// - Failed to serialize XML
    /// - I/O error during writing
    #[error("[E2005] XML writing error: {0}")]
    XmlWrite(String),

    /// Integrity failure
    ///
    /// **Error Code**: E3001
    ///
    /// **Common Causes**:
    /// - Values archive computed against a different triangulation
    /// - Value list length does not match the part's mesh count
    /// - Stored fingerprint does not match the stored geometry
    ///
    /// **Suggestions**:
    /// - Re-fetch the base geometry together with the values
    #[error("[E3001] Integrity error: {0}")]
    Integrity(String),

    /// Parse error for numeric values
    ///
    /// **Error Code**: E3002
    ///
    /// **Common Causes**:
    /// - Invalid number format
    /// - Empty required numeric field
    #[error("[E3002] Parse error: {0}")]
    ParseError(String),

    /// Unsupported file version
    ///
    /// **Error Code**: E4001
    ///
    /// **Common Causes**:
    /// - File written by a newer codec with an incompatible major version
    /// - Missing or unparseable `fileVersion` element
    ///
    /// **Suggestions**:
    /// - Upgrade the reader; this error is never resolved by retrying
    #[error("[E4001] Unsupported file version: {0}")]
    UnsupportedVersion(String),

    /// Invalid argument
    ///
    /// **Error Code**: E5001
    ///
    /// **Common Causes**:
    /// - Duplicate color-scale stop values
    /// - Negative size or inverted bounds
    /// - Out-of-range index lookup
    #[error("[E5001] Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<std::num::ParseFloatError> for Error {
    fn from(err: std::num::ParseFloatError) -> Self {
        Error::ParseError(format!("Failed to parse floating-point number: {}", err))
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Self {
        Error::ParseError(format!("Failed to parse integer: {}", err))
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttr(format!("Attribute parsing failed: {}", err))
    }
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Self {
        Error::ParseError(format!("Failed to parse identifier: {}", err))
    }
}

impl Error {
    /// Taxonomy category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::Zip(zip::result::ZipError::Io(_)) => ErrorKind::Io,
            Error::Zip(_)
            | Error::MissingEntry(_)
            | Error::Xml(_)
            | Error::XmlAttr(_)
            | Error::InvalidXml(_)
            | Error::InvalidFormat(_)
            | Error::XmlWrite(_)
            | Error::ParseError(_) => ErrorKind::Format,
            Error::Integrity(_) => ErrorKind::Integrity,
            Error::UnsupportedVersion(_) => ErrorKind::Version,
            Error::InvalidArgument(_) => ErrorKind::Argument,
        }
    }

    /// Create a MissingEntry error for an archive entry name
    pub fn missing_entry(name: &str) -> Self {
        Error::MissingEntry(name.to_string())
    }

    /// Create an InvalidFormat error with context about what structure is invalid
    ///
    /// # Arguments
    /// * `context` - What part of the format is invalid (e.g., "mesh 3", "edges.bin")
    /// * `message` - Description of the error
    pub fn invalid_format_context(context: &str, message: &str) -> Self {
        Error::InvalidFormat(format!("{}: {}", context, message))
    }

    /// Create a ParseError with context about what was being parsed
    ///
    /// # Arguments
    /// * `field_name` - The name of the field being parsed (e.g., "partCount")
    /// * `value` - The value that failed to parse
    /// * `expected_type` - The expected type (e.g., "non-negative integer")
    pub fn parse_error_with_context(field_name: &str, value: &str, expected_type: &str) -> Self {
        Error::ParseError(format!(
            "Failed to parse '{}': expected {}, got '{}'",
            field_name, expected_type, value
        ))
    }

    /// Create an XmlWrite error
    pub fn xml_write(message: String) -> Self {
        Error::XmlWrite(message)
    }

    /// Convert an I/O error raised while decoding a binary entry
    ///
    /// Running out of data inside an entry means the entry itself is
    /// truncated, so `UnexpectedEof` becomes a format error. Every other I/O
    /// failure belongs to the transport and propagates unchanged.
    pub(crate) fn from_decode_io(err: io::Error, context: &str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::invalid_format_context(context, "unexpected end of data (truncated entry)")
        } else {
            Error::Io(err)
        }
    }
}
