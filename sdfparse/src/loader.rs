//! Loading SDF from files and readers, with an overridable error hook.
//!
//! A [`Loader`] either holds a fully parsed [`SDFDelayFile`] or nothing.
//! Failures go to its [`ErrorReporter`]: the default one writes the
//! error to standard error, [`CollectReporter`] keeps it for the
//! caller to propagate.

use crate::error::{SDFError, SDFResult};
use crate::{parser, SDFDelayFile};
use log::debug;
use std::io::Read;
use std::path::Path;

/// Display name used for readers without a file name.
pub const DEFAULT_STREAM_NAME: &str = "<inputstream>";

/// Receives the error of a failed load.
pub trait ErrorReporter {
    fn on_error(&mut self, error: SDFError);
}

/// Reports errors on standard error.
#[derive(Debug, Default)]
pub struct StderrReporter;

impl ErrorReporter for StderrReporter {
    fn on_error(&mut self, e: SDFError) {
        eprintln!("{}", e);
    }
}

/// Keeps the most recent error.
#[derive(Debug, Default)]
pub struct CollectReporter {
    error: Option<SDFError>
}

impl CollectReporter {
    #[inline]
    pub fn error(&self) -> Option<&SDFError> {
        self.error.as_ref()
    }

    #[inline]
    pub fn take_error(&mut self) -> Option<SDFError> {
        self.error.take()
    }
}

impl ErrorReporter for CollectReporter {
    #[inline]
    fn on_error(&mut self, e: SDFError) {
        self.error = Some(e);
    }
}

/// Closures work as reporters, e.g. to forward into another error channel.
impl<F: FnMut(SDFError)> ErrorReporter for F {
    #[inline]
    fn on_error(&mut self, e: SDFError) {
        self(e)
    }
}

/// Drives the parser and owns the result.
#[derive(Debug, Default)]
pub struct Loader<R: ErrorReporter = StderrReporter> {
    reporter: R,
    delayfile: Option<SDFDelayFile>
}

impl Loader {
    /// A loader reporting to standard error.
    #[inline]
    pub fn new() -> Self {
        Loader::with_reporter(StderrReporter)
    }
}

impl<R: ErrorReporter> Loader<R> {
    #[inline]
    pub fn with_reporter(reporter: R) -> Self {
        Loader { reporter, delayfile: None }
    }

    /// Load the SDF file at `path`. Returns whether it succeeded.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let filename = path.display().to_string();
        let res = std::fs::read_to_string(path)
            .map_err(|e| SDFError::io(&filename, e))
            .and_then(|src| parser::parse_str(&src, &filename));
        self.finish(res)
    }

    /// Load SDF from `reader`; `filename` only shows up in errors.
    pub fn load_reader(&mut self, mut reader: impl Read, filename: Option<&str>) -> bool {
        let filename = filename.unwrap_or(DEFAULT_STREAM_NAME);
        let mut src = String::new();
        let res = reader.read_to_string(&mut src)
            .map_err(|e| SDFError::io(filename, e))
            .and_then(|_| parser::parse_str(&src, filename));
        self.finish(res)
    }

    /// Load SDF from a string.
    pub fn load_str(&mut self, src: &str, filename: &str) -> bool {
        self.finish(parser::parse_str(src, filename))
    }

    fn finish(&mut self, res: SDFResult<SDFDelayFile>) -> bool {
        match res {
            Ok(sdf) => {
                debug!("loaded SDF with {} cells", sdf.cells.len());
                self.delayfile = Some(sdf);
                true
            }
            Err(e) => {
                debug!("load failed at {}", e.location);
                self.delayfile = None;
                self.reporter.on_error(e);
                false
            }
        }
    }

    /// The document of the last successful load.
    #[inline]
    pub fn delayfile(&self) -> Option<&SDFDelayFile> {
        self.delayfile.as_ref()
    }

    #[inline]
    pub fn into_delayfile(self) -> Option<SDFDelayFile> {
        self.delayfile
    }

    #[inline]
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    #[inline]
    pub fn reporter_mut(&mut self) -> &mut R {
        &mut self.reporter
    }
}
