//! Errors reported while loading SDF.

use compact_str::CompactString;
use std::fmt;

/// Result type of this crate.
pub type SDFResult<T> = Result<T, SDFError>;

/// Where an error happened. Lines and columns start at 1;
/// line 0 means the error is not tied to a source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub filename: CompactString,
    pub line: usize,
    pub column: usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SDFErrorKind {
    /// A character that cannot start any token.
    Lexical,
    /// A token sequence the grammar does not accept.
    Syntax,
    /// The input could not be opened or read.
    Io,
    /// An internal invariant was broken. Never caused by input alone.
    Internal
}

/// The first failure of a parse, with its location.
#[derive(Debug, Clone, PartialEq)]
pub struct SDFError {
    pub kind: SDFErrorKind,
    pub message: String,
    pub location: Location
}

impl Location {
    #[inline]
    pub fn new(filename: impl Into<CompactString>, line: usize, column: usize) -> Self {
        Location { filename: filename.into(), line, column }
    }
}

impl SDFError {
    #[inline]
    pub fn new(kind: SDFErrorKind, message: impl Into<String>, location: Location) -> Self {
        SDFError { kind, message: message.into(), location }
    }

    pub fn io(filename: &str, e: std::io::Error) -> Self {
        SDFError::new(SDFErrorKind::Io, e.to_string(), Location::new(filename, 0, 0))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.filename)
        } else {
            write!(f, "{}:{}:{}", self.filename, self.line, self.column)
        }
    }
}

impl fmt::Display for SDFErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SDFErrorKind::Lexical => "lexical",
            SDFErrorKind::Syntax => "syntax",
            SDFErrorKind::Io => "io",
            SDFErrorKind::Internal => "internal"
        })
    }
}

impl fmt::Display for SDFError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} error: {}", self.location, self.kind, self.message)
    }
}

impl std::error::Error for SDFError {}
