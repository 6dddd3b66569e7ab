//! Standard delay format (SDF) parser and writer for EDA applications.
//!
//! ## How to use
//! See [`SDFDelayFile::parse_str`] for the `Result`-style entry, or
//! [`Loader`] for loading with an overridable error reporting hook.
//! A parsed file can be written back with [`write::to_string`].
//!
//! Only absolute IO path delays and setup/hold/recovery/removal
//! timing checks are supported.

use compact_str::CompactString;
use std::path::Path;

pub mod error;
pub mod escape;
pub mod lexer;
pub mod loader;
pub mod parser;
pub mod write;

pub use error::{Location, SDFError, SDFErrorKind, SDFResult};
pub use escape::{escape, unescape, EscapeStyle};
pub use loader::{CollectReporter, ErrorReporter, Loader, StderrReporter};

/// The main entry of SDF: a whole `DELAYFILE`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SDFDelayFile {
    pub header: SDFHeader,
    pub cells: Vec<SDFCell>
}

/// The header information of SDF.
///
/// Built once by [`SDFHeaderBuilder`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SDFHeader {
    sdfversion: CompactString,
    design: CompactString,
    vendor: CompactString,
    program: CompactString,
    version: CompactString,
    divider: CompactString,
    timescale: SDFTimescale
}

/// Collects header fields while parsing, then produces an [`SDFHeader`].
#[derive(Debug, Clone)]
pub struct SDFHeaderBuilder {
    header: SDFHeader
}

/// The `TIMESCALE` of a file, e.g. `1 ns`.
#[derive(Debug, Clone, PartialEq)]
pub struct SDFTimescale {
    pub value: f64,
    pub unit: CompactString
}

/// One SDF cell with its delay and timing check definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct SDFCell {
    pub celltype: CompactString,
    /// Instance path in its SDF textual form. Empty for `(INSTANCE)`.
    pub instance: CompactString,
    pub delay: SDFDelay,
    pub timing_check: SDFTimingCheck
}

/// The kinds of delay blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SDFDelayType {
    #[default]
    Absolute
}

/// One `DELAY` block. Written only when it has IO paths.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SDFDelay {
    pub delay_type: SDFDelayType,
    pub iopaths: Vec<SDFIOPath>
}

/// SDF IO path delay, from `input` to `output`.
#[derive(Debug, Clone, PartialEq)]
pub struct SDFIOPath {
    pub input: SDFPortSpec,
    pub output: SDFPortSpec,
    pub rise: SDFRealTriple,
    pub fall: SDFRealTriple
}

/// The kinds of timing checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SDFTimingKind {
    Setup, Hold, Recovery, Removal
}

/// One timing check entry, e.g. `(SETUP D (posedge CLK) (1:1:1))`.
#[derive(Debug, Clone, PartialEq)]
pub struct SDFTiming {
    pub kind: SDFTimingKind,
    /// The checked (data) port, first in SDF source order.
    pub port: SDFPortSpec,
    /// The reference (clock) port.
    pub clock: SDFPortSpec,
    pub value: SDFRealTriple
}

/// One `TIMINGCHECK` block. Written only when it has entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SDFTimingCheck {
    pub timings: Vec<SDFTiming>
}

/// The types of specified edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SDFPortEdge {
    #[default]
    None,
    Posedge, Negedge
}

/// A port with edge specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SDFPortSpec {
    /// Port name in its SDF textual form, escapes kept.
    pub port: CompactString,
    pub edge: SDFPortEdge
}

/// A `(min:typ:max)` value. Each corner may be unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SDFRealTriple {
    pub min: Option<f64>,
    pub typ: Option<f64>,
    pub max: Option<f64>
}

impl SDFDelayFile {
    /// Parse a SDF source string to the SDF object, or an error with its location.
    #[inline]
    pub fn parse_str(s: &str) -> SDFResult<SDFDelayFile> {
        parser::parse_str(s, "<string>")
    }

    /// Read and parse the SDF file at `path`.
    pub fn parse_file(path: impl AsRef<Path>) -> SDFResult<SDFDelayFile> {
        let path = path.as_ref();
        let filename = path.display().to_string();
        let src = std::fs::read_to_string(path)
            .map_err(|e| SDFError::io(&filename, e))?;
        parser::parse_str(&src, &filename)
    }
}

impl Default for SDFHeader {
    #[inline]
    fn default() -> Self {
        SDFHeader {
            sdfversion: CompactString::default(),
            design: CompactString::default(),
            vendor: CompactString::default(),
            program: CompactString::default(),
            version: CompactString::default(),
            divider: ".".into(),
            timescale: SDFTimescale::default()
        }
    }
}

impl SDFHeader {
    #[inline]
    pub fn builder(sdfversion: impl Into<CompactString>) -> SDFHeaderBuilder {
        SDFHeaderBuilder::new(sdfversion)
    }

    #[inline]
    pub fn sdfversion(&self) -> &str { &self.sdfversion }
    #[inline]
    pub fn design(&self) -> &str { &self.design }
    #[inline]
    pub fn vendor(&self) -> &str { &self.vendor }
    #[inline]
    pub fn program(&self) -> &str { &self.program }
    #[inline]
    pub fn version(&self) -> &str { &self.version }
    /// The hierarchy divider, `.` unless the file says otherwise.
    #[inline]
    pub fn divider(&self) -> &str { &self.divider }
    #[inline]
    pub fn timescale(&self) -> &SDFTimescale { &self.timescale }
}

impl SDFHeaderBuilder {
    pub fn new(sdfversion: impl Into<CompactString>) -> Self {
        SDFHeaderBuilder {
            header: SDFHeader {
                sdfversion: sdfversion.into(),
                ..SDFHeader::default()
            }
        }
    }

    pub fn design(mut self, design: impl Into<CompactString>) -> Self {
        self.header.design = design.into();
        self
    }

    pub fn vendor(mut self, vendor: impl Into<CompactString>) -> Self {
        self.header.vendor = vendor.into();
        self
    }

    pub fn program(mut self, program: impl Into<CompactString>) -> Self {
        self.header.program = program.into();
        self
    }

    pub fn version(mut self, version: impl Into<CompactString>) -> Self {
        self.header.version = version.into();
        self
    }

    pub fn divider(mut self, divider: impl Into<CompactString>) -> Self {
        self.header.divider = divider.into();
        self
    }

    pub fn timescale(mut self, timescale: SDFTimescale) -> Self {
        self.header.timescale = timescale;
        self
    }

    #[inline]
    pub fn build(self) -> SDFHeader {
        self.header
    }
}

/// Units accepted in `TIMESCALE`, with their factor to seconds.
pub const TIMESCALE_UNITS: [(&str, f64); 6] = [
    ("s", 1.), ("ms", 1e-3), ("us", 1e-6),
    ("ns", 1e-9), ("ps", 1e-12), ("fs", 1e-15)
];

impl Default for SDFTimescale {
    /// default 1ns
    #[inline]
    fn default() -> Self {
        SDFTimescale { value: 1., unit: "ns".into() }
    }
}

impl SDFTimescale {
    #[inline]
    pub fn new(value: f64, unit: impl Into<CompactString>) -> Self {
        SDFTimescale { value, unit: unit.into() }
    }

    /// The timescale in seconds, or `None` for an unknown unit.
    pub fn seconds(&self) -> Option<f64> {
        TIMESCALE_UNITS.iter()
            .find(|(u, _)| self.unit.eq_ignore_ascii_case(u))
            .map(|(_, f)| self.value * f)
    }
}

impl SDFCell {
    #[inline]
    pub fn new(celltype: impl Into<CompactString>, instance: impl Into<CompactString>) -> Self {
        SDFCell {
            celltype: celltype.into(),
            instance: instance.into(),
            delay: SDFDelay::default(),
            timing_check: SDFTimingCheck::default()
        }
    }
}

impl SDFDelay {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.iopaths.is_empty()
    }
}

impl SDFTimingCheck {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }
}

impl SDFTimingKind {
    pub const ALL: [SDFTimingKind; 4] = [
        SDFTimingKind::Setup, SDFTimingKind::Hold,
        SDFTimingKind::Recovery, SDFTimingKind::Removal
    ];

    /// The SDF keyword of this check.
    #[inline]
    pub fn keyword(self) -> &'static str {
        match self {
            SDFTimingKind::Setup => "SETUP",
            SDFTimingKind::Hold => "HOLD",
            SDFTimingKind::Recovery => "RECOVERY",
            SDFTimingKind::Removal => "REMOVAL"
        }
    }
}

impl SDFPortSpec {
    #[inline]
    pub fn new(port: impl Into<CompactString>, edge: SDFPortEdge) -> Self {
        SDFPortSpec { port: port.into(), edge }
    }

    /// A port without edge qualifier.
    #[inline]
    pub fn plain(port: impl Into<CompactString>) -> Self {
        SDFPortSpec::new(port, SDFPortEdge::None)
    }

    /// The port name with SDF escapes removed.
    #[inline]
    pub fn unescaped_port(&self) -> String {
        unescape(&self.port)
    }
}

impl SDFRealTriple {
    /// All three corners unspecified, written as `()`.
    #[inline]
    pub fn unspecified() -> Self {
        SDFRealTriple { min: None, typ: None, max: None }
    }

    #[inline]
    pub fn new(min: f64, typ: f64, max: f64) -> Self {
        SDFRealTriple { min: Some(min), typ: Some(typ), max: Some(max) }
    }

    /// Two-value form: `typ` takes the value of `max`.
    #[inline]
    pub fn new2(min: f64, max: f64) -> Self {
        SDFRealTriple::new(min, max, max)
    }

    /// The same value on all three corners.
    #[inline]
    pub fn single(v: f64) -> Self {
        SDFRealTriple::new(v, v, v)
    }

    #[inline]
    pub fn is_unspecified(&self) -> bool {
        self.min.is_none() && self.typ.is_none() && self.max.is_none()
    }
}
