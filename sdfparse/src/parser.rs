//! Recursive descent parser from SDF tokens to data structure.
//!
//! Every construct starts with `(` and a keyword, so one token of
//! lookahead decides every branch. Parsing stops at the first error.

use super::*;
use crate::lexer::{Keyword, Lexer, Token, TokenKind};
use log::debug;

/// Parse SDF source `src`; `filename` is used in error locations.
pub fn parse_str(src: &str, filename: &str) -> SDFResult<SDFDelayFile> {
    let mut parser = Parser::new(Lexer::new(src, filename))?;
    let sdf = parser.parse_delayfile()?;
    debug!("parsed {}: {} cells", filename, sdf.cells.len());
    Ok(sdf)
}

/// Header items in the order the grammar allows them.
const HEADER_ORDER: [Keyword; 7] = [
    Keyword::SdfVersion, Keyword::Design, Keyword::Vendor,
    Keyword::Program, Keyword::Version, Keyword::Divider,
    Keyword::Timescale
];

/// SDF parser holding one token of lookahead.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    peeked: Token
}

impl<'src> Parser<'src> {
    pub fn new(mut lexer: Lexer<'src>) -> SDFResult<Self> {
        let peeked = lexer.next_token()?;
        Ok(Parser { lexer, peeked })
    }

    #[inline]
    fn peek(&self) -> &Token {
        &self.peeked
    }

    /// Consume the lookahead token and pull the following one.
    fn advance(&mut self) -> SDFResult<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.peeked, next))
    }

    fn error_at(&self, tok: &Token, msg: impl Into<String>) -> SDFError {
        SDFError::new(SDFErrorKind::Syntax, msg, self.lexer.location(tok.pos))
    }

    /// Error naming the expected tokens and the lookahead token.
    fn unexpected(&self, expected: &str) -> SDFError {
        let tok = self.peek();
        self.error_at(tok, format!("expected {}, found {}", expected, tok.describe()))
    }

    #[inline]
    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> SDFResult<Token> {
        if self.peek_is(kind) {
            self.advance()
        } else {
            Err(self.unexpected(expected))
        }
    }

    #[inline]
    fn expect_lparen(&mut self) -> SDFResult<()> {
        self.expect(TokenKind::LParen, "'('").map(drop)
    }

    #[inline]
    fn expect_rparen(&mut self) -> SDFResult<()> {
        self.expect(TokenKind::RParen, "')'").map(drop)
    }

    fn expect_keyword(&mut self, kw: Keyword) -> SDFResult<()> {
        self.expect(TokenKind::Keyword(kw), &format!("keyword {kw}")).map(drop)
    }

    /// Any keyword; the caller dispatches on it.
    fn keyword(&mut self, expected: &str) -> SDFResult<(Keyword, Token)> {
        match self.peek().kind {
            TokenKind::Keyword(kw) => Ok((kw, self.advance()?)),
            _ => Err(self.unexpected(expected))
        }
    }

    fn qstring(&mut self) -> SDFResult<CompactString> {
        self.expect(TokenKind::QString, "string").map(|t| t.text)
    }

    /// An identifier. Keyword and number tokens are accepted too, since
    /// nothing stops a port from being called `DELAY` or an instance `1`.
    fn ident(&mut self) -> SDFResult<CompactString> {
        match self.peek().kind {
            TokenKind::Ident | TokenKind::Keyword(_) | TokenKind::Number(_) =>
                Ok(self.advance()?.text),
            _ => Err(self.unexpected("identifier"))
        }
    }

    fn number(&mut self) -> SDFResult<f64> {
        match self.peek().kind {
            TokenKind::Number(v) => {
                self.advance()?;
                Ok(v)
            }
            _ => Err(self.unexpected("number"))
        }
    }

    /// `'(' DELAYFILE Header Cell* ')'` followed by end of input.
    ///
    /// Header items and cells both open with `(` and a keyword, so the
    /// keyword after each `(` decides which one follows. Header items
    /// must come in `HEADER_ORDER`, at most once each, and before
    /// any cell.
    pub fn parse_delayfile(&mut self) -> SDFResult<SDFDelayFile> {
        self.expect_lparen()?;
        self.expect_keyword(Keyword::DelayFile)?;
        self.expect_lparen()?;
        self.expect_keyword(Keyword::SdfVersion)?;
        let mut header = SDFHeaderBuilder::new(self.qstring()?);
        self.expect_rparen()?;

        let mut rank = 0;
        let mut cells = Vec::new();
        while !self.peek_is(TokenKind::RParen) {
            if !self.peek_is(TokenKind::LParen) {
                return Err(self.unexpected("'(' or ')'"));
            }
            self.advance()?;
            let (kw, tok) = self.keyword("keyword CELL")?;
            if kw == Keyword::Cell {
                cells.push(self.parse_cell()?);
                continue;
            }
            let r = HEADER_ORDER.iter().position(|&k| k == kw);
            match r {
                Some(r) if cells.is_empty() && r > rank => {
                    rank = r;
                    header = self.parse_header_item(header, kw, &tok)?;
                }
                Some(_) => return Err(self.error_at(&tok, format!(
                    "keyword {kw} out of order or repeated in header"))),
                None => return Err(self.error_at(&tok, format!(
                    "expected keyword CELL, found {}", tok.describe())))
            }
        }
        self.expect_rparen()?;
        self.expect(TokenKind::Eof, "end of input")?;
        Ok(SDFDelayFile { header: header.build(), cells })
    }

    /// One header item after its `(` and keyword, up to and including `)`.
    fn parse_header_item(
        &mut self, builder: SDFHeaderBuilder, kw: Keyword, tok: &Token
    ) -> SDFResult<SDFHeaderBuilder> {
        let builder = match kw {
            Keyword::Design => builder.design(self.qstring()?),
            Keyword::Vendor => builder.vendor(self.qstring()?),
            Keyword::Program => builder.program(self.qstring()?),
            Keyword::Version => builder.version(self.qstring()?),
            Keyword::Divider => builder.divider(self.parse_divider()?),
            Keyword::Timescale => builder.timescale(self.parse_timescale()?),
            _ => return Err(SDFError::new(
                SDFErrorKind::Internal,
                format!("header keyword {kw} has no handler"),
                self.lexer.location(tok.pos)))
        };
        self.expect_rparen()?;
        Ok(builder)
    }

    fn parse_divider(&mut self) -> SDFResult<CompactString> {
        let tok = self.peek().clone();
        if tok.kind != TokenKind::Ident {
            return Err(self.unexpected("hierarchy divider"));
        }
        let divider = self.advance()?.text;
        if divider.chars().count() != 1 {
            return Err(self.error_at(&tok, format!(
                "hierarchy divider must be one character, found {divider}")));
        }
        Ok(divider)
    }

    /// `number unit`, or the two glued together as in `1ns`.
    fn parse_timescale(&mut self) -> SDFResult<SDFTimescale> {
        let tok = self.peek().clone();
        let (value, unit) = match tok.kind {
            TokenKind::Number(v) => {
                self.advance()?;
                if !self.peek_is(TokenKind::Ident) {
                    return Err(self.unexpected("time unit"));
                }
                (v, self.advance()?.text)
            }
            TokenKind::Ident => {
                self.advance()?;
                let Some((v, u)) = split_glued_timescale(&tok.text) else {
                    return Err(self.error_at(&tok, format!(
                        "expected timescale, found {}", tok.describe())));
                };
                let v = v.parse::<f64>().map_err(|e| SDFError::new(
                    SDFErrorKind::Internal, e.to_string(), self.lexer.location(tok.pos)))?;
                if !v.is_finite() {
                    return Err(SDFError::new(
                        SDFErrorKind::Lexical, format!("number {v} out of range"),
                        self.lexer.location(tok.pos)));
                }
                (v, CompactString::from(u))
            }
            _ => return Err(self.unexpected("timescale"))
        };
        if value.is_nan() || value <= 0. {
            return Err(self.error_at(&tok, format!("timescale must be positive, found {value}")));
        }
        let timescale = SDFTimescale::new(value, unit);
        if timescale.seconds().is_none() {
            return Err(self.error_at(&tok, format!("unknown time unit {}", timescale.unit)));
        }
        Ok(timescale)
    }

    /// Cell body after `(CELL`.
    fn parse_cell(&mut self) -> SDFResult<SDFCell> {
        self.expect_lparen()?;
        self.expect_keyword(Keyword::CellType)?;
        let celltype = self.qstring()?;
        self.expect_rparen()?;
        self.expect_lparen()?;
        self.expect_keyword(Keyword::Instance)?;
        let instance = if self.peek_is(TokenKind::RParen) {
            CompactString::default()
        } else {
            self.ident()?
        };
        self.expect_rparen()?;
        let mut cell = SDFCell::new(celltype, instance);

        let mut seen_delay = false;
        let mut seen_timing_check = false;
        while !self.peek_is(TokenKind::RParen) {
            if !self.peek_is(TokenKind::LParen) {
                return Err(self.unexpected("'(' or ')'"));
            }
            self.advance()?;
            let expected = match (seen_delay, seen_timing_check) {
                (false, false) => "keyword DELAY or TIMINGCHECK",
                (true, false) => "keyword TIMINGCHECK",
                _ => "')'"
            };
            let (kw, tok) = self.keyword(expected)?;
            match kw {
                Keyword::Delay if !seen_delay && !seen_timing_check => {
                    seen_delay = true;
                    cell.delay = self.parse_delay()?;
                }
                Keyword::TimingCheck if !seen_timing_check => {
                    seen_timing_check = true;
                    cell.timing_check = self.parse_timing_check()?;
                }
                _ => return Err(self.error_at(&tok, format!(
                    "expected {}, found {}", expected, tok.describe())))
            }
        }
        self.expect_rparen()?;
        Ok(cell)
    }

    /// Delay body after `(DELAY`: `'(' ABSOLUTE Iopath+ ')' ')'`.
    fn parse_delay(&mut self) -> SDFResult<SDFDelay> {
        self.expect_lparen()?;
        self.expect_keyword(Keyword::Absolute)?;
        let mut iopaths = Vec::new();
        loop {
            self.expect_lparen()?;
            self.expect_keyword(Keyword::IOPath)?;
            iopaths.push(self.parse_iopath()?);
            if self.peek_is(TokenKind::RParen) {
                break;
            }
        }
        self.expect_rparen()?;
        self.expect_rparen()?;
        Ok(SDFDelay { delay_type: SDFDelayType::Absolute, iopaths })
    }

    /// IO path body after `(IOPATH`. A single value applies to both
    /// rise and fall.
    fn parse_iopath(&mut self) -> SDFResult<SDFIOPath> {
        let input = self.parse_port_spec()?;
        let output = self.parse_port_spec()?;
        let rise = self.parse_real_triple()?;
        let fall = if self.peek_is(TokenKind::LParen) {
            self.parse_real_triple()?
        } else {
            rise
        };
        self.expect_rparen()?;
        Ok(SDFIOPath { input, output, rise, fall })
    }

    /// Timing check body after `(TIMINGCHECK`.
    fn parse_timing_check(&mut self) -> SDFResult<SDFTimingCheck> {
        let mut timings = Vec::new();
        loop {
            self.expect_lparen()?;
            let (kw, tok) = self.keyword("keyword SETUP, HOLD, RECOVERY or REMOVAL")?;
            let kind = match kw {
                Keyword::Setup => SDFTimingKind::Setup,
                Keyword::Hold => SDFTimingKind::Hold,
                Keyword::Recovery => SDFTimingKind::Recovery,
                Keyword::Removal => SDFTimingKind::Removal,
                _ => return Err(self.error_at(&tok, format!(
                    "expected keyword SETUP, HOLD, RECOVERY or REMOVAL, found {}",
                    tok.describe())))
            };
            let port = self.parse_port_spec()?;
            let clock = self.parse_port_spec()?;
            let value = self.parse_real_triple()?;
            self.expect_rparen()?;
            timings.push(SDFTiming { kind, port, clock, value });
            if self.peek_is(TokenKind::RParen) {
                break;
            }
        }
        self.expect_rparen()?;
        Ok(SDFTimingCheck { timings })
    }

    /// `ident | '(' (posedge|negedge) ident ')'`
    fn parse_port_spec(&mut self) -> SDFResult<SDFPortSpec> {
        match self.peek().kind {
            TokenKind::LParen => {}
            TokenKind::Ident | TokenKind::Keyword(_) | TokenKind::Number(_) =>
                return self.ident().map(SDFPortSpec::plain),
            _ => return Err(self.unexpected("port or '('"))
        }
        self.advance()?;
        let edge = match self.peek().kind {
            TokenKind::Keyword(Keyword::Posedge) => SDFPortEdge::Posedge,
            TokenKind::Keyword(Keyword::Negedge) => SDFPortEdge::Negedge,
            _ => return Err(self.unexpected("keyword posedge or negedge"))
        };
        self.advance()?;
        let port = self.ident()?;
        self.expect_rparen()?;
        Ok(SDFPortSpec { port, edge })
    }

    /// `'(' number? ':' number? ':' number? ')' | '(' number ')' | '(' ')'`
    fn parse_real_triple(&mut self) -> SDFResult<SDFRealTriple> {
        self.expect_lparen()?;
        let first = self.optional_number()?;
        if self.peek_is(TokenKind::RParen) {
            self.advance()?;
            return Ok(first.map(SDFRealTriple::single).unwrap_or_default());
        }
        self.expect(TokenKind::Colon, "number, ':' or ')'")?;
        let typ = self.optional_number()?;
        self.expect(TokenKind::Colon, "number or ':'")?;
        let max = self.optional_number()?;
        self.expect_rparen()?;
        Ok(SDFRealTriple { min: first, typ, max })
    }

    /// A number if the lookahead is one.
    fn optional_number(&mut self) -> SDFResult<Option<f64>> {
        match self.peek().kind {
            TokenKind::Number(_) => self.number().map(Some),
            _ => Ok(None)
        }
    }
}

/// Split a glued timescale such as `1ns` or `1e3ps` into value and
/// unit. The unit is matched as a suffix, so an exponent is not taken
/// for the start of it.
fn split_glued_timescale(text: &str) -> Option<(&str, &str)> {
    TIMESCALE_UNITS.iter().find_map(|(unit, _)| {
        let at = text.len().checked_sub(unit.len())?;
        let (v, u) = (text.get(..at)?, text.get(at..)?);
        (u.eq_ignore_ascii_case(unit) && lexer::is_real_literal(v)).then_some((v, u))
    })
}
