//! SDF writer.
//!
//! Writes one construct per line, indented by two spaces per level.
//! Empty `DELAY` and `TIMINGCHECK` blocks are left out, as are empty
//! optional header strings, so the output parses back to the same tree
//! but not necessarily to the same bytes.

use super::*;
use std::fmt::{self, Display, Formatter};
use std::io::{self, BufWriter, Write};

/// Write `sdf` to `dest`, starting at indentation level `depth`.
pub fn write_delayfile(sdf: &SDFDelayFile, mut dest: impl Write, depth: usize) -> io::Result<()> {
    write!(dest, "{}", Printed { sdf, depth })?;
    dest.flush()
}

/// Write `sdf` to the file `path`.
pub fn save(sdf: &SDFDelayFile, path: impl AsRef<Path>) -> io::Result<()> {
    let f = std::fs::File::create(path)?;
    write_delayfile(sdf, BufWriter::new(f), 0)
}

/// Write `sdf` to an SDF-format [`String`].
#[inline]
pub fn to_string(sdf: &SDFDelayFile) -> String {
    Printed { sdf, depth: 0 }.to_string()
}

struct Printed<'a> {
    sdf: &'a SDFDelayFile,
    depth: usize
}

impl Display for Printed<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        SDFWriter { dest: f, level: self.depth }.write_delayfile(self.sdf)
    }
}

impl Display for SDFDelayFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Printed { sdf: self, depth: 0 }.fmt(f)
    }
}

/// Pre-order writer keeping the current indentation level.
struct SDFWriter<'f, 'a> {
    dest: &'f mut Formatter<'a>,
    level: usize
}

impl SDFWriter<'_, '_> {
    /// Write one line at the current indentation level.
    #[inline]
    fn line(&mut self, args: fmt::Arguments) -> fmt::Result {
        writeln!(self.dest, "{:width$}{}", "", args, width = 2 * self.level)
    }

    /// Open a block with `(KEYWORD` on its own line and indent.
    #[inline]
    fn open(&mut self, keyword: &str) -> fmt::Result {
        self.line(format_args!("({keyword}"))?;
        self.level += 1;
        Ok(())
    }

    #[inline]
    fn close(&mut self) -> fmt::Result {
        self.level -= 1;
        self.line(format_args!(")"))
    }

    fn write_delayfile(&mut self, sdf: &SDFDelayFile) -> fmt::Result {
        self.open("DELAYFILE")?;
        self.write_header(&sdf.header)?;
        for cell in &sdf.cells {
            self.write_cell(cell)?;
        }
        self.close()
    }

    fn write_header(&mut self, header: &SDFHeader) -> fmt::Result {
        self.line(format_args!("(SDFVERSION \"{}\")", header.sdfversion()))?;
        for (keyword, value) in [
            ("DESIGN", header.design()),
            ("VENDOR", header.vendor()),
            ("PROGRAM", header.program()),
            ("VERSION", header.version())
        ] {
            if !value.is_empty() {
                self.line(format_args!("({keyword} \"{value}\")"))?;
            }
        }
        self.line(format_args!("(DIVIDER {})", header.divider()))?;
        self.line(format_args!("(TIMESCALE {})", header.timescale()))
    }

    fn write_cell(&mut self, cell: &SDFCell) -> fmt::Result {
        self.open("CELL")?;
        self.line(format_args!("(CELLTYPE \"{}\")", cell.celltype))?;
        if cell.instance.is_empty() {
            self.line(format_args!("(INSTANCE)"))?;
        } else {
            self.line(format_args!("(INSTANCE {})", cell.instance))?;
        }
        self.write_delay(&cell.delay)?;
        self.write_timing_check(&cell.timing_check)?;
        self.close()
    }

    fn write_delay(&mut self, delay: &SDFDelay) -> fmt::Result {
        if delay.is_empty() {
            return Ok(());
        }
        self.open("DELAY")?;
        self.open(delay.delay_type.keyword())?;
        for p in &delay.iopaths {
            self.line(format_args!(
                "(IOPATH {} {} {} {})", p.input, p.output, p.rise, p.fall))?;
        }
        self.close()?;
        self.close()
    }

    fn write_timing_check(&mut self, tc: &SDFTimingCheck) -> fmt::Result {
        if tc.is_empty() {
            return Ok(());
        }
        self.open("TIMINGCHECK")?;
        for t in &tc.timings {
            self.line(format_args!(
                "({} {} {} {})", t.kind, t.port, t.clock, t.value))?;
        }
        self.close()
    }
}

impl SDFDelayType {
    #[inline]
    pub fn keyword(self) -> &'static str {
        match self {
            SDFDelayType::Absolute => "ABSOLUTE"
        }
    }
}

impl Display for SDFTimingKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl Display for SDFTimescale {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

impl Display for SDFPortSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.edge {
            SDFPortEdge::None => write!(f, "{}", self.port),
            SDFPortEdge::Posedge => write!(f, "(posedge {})", self.port),
            SDFPortEdge::Negedge => write!(f, "(negedge {})", self.port)
        }
    }
}

impl Display for SDFRealTriple {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_unspecified() {
            return f.write_str("()");
        }
        let corner = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        write!(f, "({}:{}:{})", corner(self.min), corner(self.typ), corner(self.max))
    }
}
