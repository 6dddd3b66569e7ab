use sdfparse::*;

const SDF_COUNTER: &str = include_str!("counter.sdf");

fn parse(src: &str) -> SDFDelayFile {
    match SDFDelayFile::parse_str(src) {
        Ok(sdf) => sdf,
        Err(e) => panic!("Parsing error: {e}")
    }
}

#[test]
fn test_minimal_round_trip() {
    let sdf = parse(r#"(DELAYFILE (SDFVERSION "3.0") (DIVIDER .) (TIMESCALE 1 ns))"#);
    let text = write::to_string(&sdf);
    assert_eq!(text, "\
(DELAYFILE
  (SDFVERSION \"3.0\")
  (DIVIDER .)
  (TIMESCALE 1 ns)
)
");
    assert_eq!(parse(&text), sdf);
}

#[test]
fn test_counter_round_trip() {
    let sdf = parse(SDF_COUNTER);
    let text = write::to_string(&sdf);
    let again = parse(&text);
    assert_eq!(again, sdf);
    assert_eq!(write::to_string(&again), text);
}

#[test]
fn test_cell_layout() {
    let sdf = parse(SDF_COUNTER);
    let text = write::to_string(&sdf);
    assert!(text.contains("\
  (CELL
    (CELLTYPE \"DFF\")
    (INSTANCE q\\[0\\])
    (DELAY
      (ABSOLUTE
        (IOPATH (posedge clock) Q (303:303:303) (303:303:303))
      )
    )
    (TIMINGCHECK
      (SETUP D (posedge clock) (-46:-46:-46))
      (HOLD D (posedge clock) (50::))
    )
  )
"), "{text}");
    assert!(text.contains("(IOPATH (negedge rst_n) Q (120:120:120) ())"), "{text}");
    assert!(text.contains("(REMOVAL rst_n (posedge clock) ())"), "{text}");
}

#[test]
fn test_empty_blocks_elided() {
    let header = SDFHeader::builder("3.0").design("top").build();
    let sdf = SDFDelayFile {
        header,
        cells: vec![SDFCell::new("INV", "u1")]
    };
    let text = write::to_string(&sdf);
    assert!(!text.contains("DELAY\n"), "{text}");
    assert!(!text.contains("TIMINGCHECK"), "{text}");
    assert!(!text.contains("VENDOR"), "{text}");
    assert!(text.contains("(DESIGN \"top\")"), "{text}");

    let again = parse(&text);
    assert_eq!(again, sdf);
    assert!(again.cells[0].delay.is_empty());
    assert!(again.cells[0].timing_check.is_empty());
}

#[test]
fn test_depth() {
    let sdf = SDFDelayFile {
        header: SDFHeader::builder("3.0").build(),
        cells: Vec::new()
    };
    let mut out = Vec::new();
    write::write_delayfile(&sdf, &mut out, 2).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("    (DELAYFILE\n      (SDFVERSION \"3.0\")\n"), "{text}");
    assert!(text.ends_with("\n    )\n"), "{text}");
    assert_eq!(parse(&text), sdf);
}

#[test]
fn test_real_triple() {
    assert_eq!(SDFRealTriple::unspecified().to_string(), "()");
    assert_eq!(SDFRealTriple::default(), SDFRealTriple::unspecified());
    assert_eq!(SDFRealTriple::new2(1., 2.), SDFRealTriple::new(1., 2., 2.));
    assert_eq!(SDFRealTriple::new(0.5, 1., 1.25).to_string(), "(0.5:1:1.25)");
    assert_eq!(SDFRealTriple { min: None, typ: Some(3.), max: None }.to_string(), "(:3:)");
    assert_ne!(SDFRealTriple::single(1.), SDFRealTriple::unspecified());
}

#[test]
fn test_escaped_names_written_verbatim() {
    let mut cell = SDFCell::new("DFF", escape("top.u1/q[3]", EscapeStyle::ExcludeLastIndex));
    cell.timing_check.timings.push(SDFTiming {
        kind: SDFTimingKind::Setup,
        port: SDFPortSpec::plain(escape("d$in", EscapeStyle::AllChars)),
        clock: SDFPortSpec::new("clk", SDFPortEdge::Posedge),
        value: SDFRealTriple::new2(0.1, 0.2)
    });
    let sdf = SDFDelayFile {
        header: SDFHeader::builder("3.0").divider("/").build(),
        cells: vec![cell]
    };
    let text = write::to_string(&sdf);
    assert!(text.contains(r"(INSTANCE top\.u1\/q[3])"), "{text}");
    assert!(text.contains(r"(SETUP d\$in (posedge clk) (0.1:0.2:0.2))"), "{text}");
    let again = parse(&text);
    assert_eq!(again, sdf);
    assert_eq!(again.cells[0].timing_check.timings[0].port.unescaped_port(), "d$in");
}

#[test]
fn test_display_matches_to_string() {
    let sdf = parse(SDF_COUNTER);
    assert_eq!(sdf.to_string(), write::to_string(&sdf));
}
