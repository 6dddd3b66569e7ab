use itertools::Itertools;
use miniserde::Serialize;
use rustc_hash::FxHashMap;
use sdfparse::{SDFDelayFile, SDFTimingKind};
use std::env;

/// Summary printed as JSON when `SDF_STATS_JSON` is set.
#[derive(Serialize)]
struct Statistics {
    file: String,
    sdfversion: String,
    design: String,
    cells: usize,
    iopaths: usize,
    timing_checks: usize,
    celltypes: Vec<CelltypeCount>
}

#[derive(Serialize)]
struct CelltypeCount {
    celltype: String,
    count: usize
}

fn main() {
    clilog::init_stderr_color_debug();
    let args: Vec<String> = env::args().collect();
    assert!(args.len() == 2,
            "Usage: {} <sdf_path>", args[0]);

    let sdf = match SDFDelayFile::parse_file(&args[1]) {
        Ok(sdf) => sdf,
        Err(e) => panic!("{}", e)
    };
    let header = &sdf.header;

    clilog::info!("SDF file {}", args[1]);
    clilog::info!("VERSION {:?}", header.sdfversion());
    clilog::info!("DESIGN {:?}, CREATED BY {:?} {:?} {:?}",
                  header.design(), header.vendor(), header.program(), header.version());
    clilog::info!("DIVIDER {:?}, TIMESCALE {}", header.divider(), header.timescale());
    clilog::info!("# Cells = {}", sdf.cells.len());
    let iopaths = sdf.cells.iter().map(|c| c.delay.iopaths.len()).sum::<usize>();
    clilog::info!("# IO paths = {}", iopaths);

    let kinds = sdf.cells.iter()
        .flat_map(|c| c.timing_check.timings.iter().map(|t| t.kind))
        .counts();
    for kind in SDFTimingKind::ALL {
        clilog::info!("# {} = {}", kind, kinds.get(&kind).copied().unwrap_or(0));
    }

    let mut per_celltype = FxHashMap::<&str, usize>::default();
    for cell in &sdf.cells {
        *per_celltype.entry(cell.celltype.as_str()).or_default() += 1;
    }
    let celltypes = per_celltype.into_iter()
        .sorted_by(|a, b| numeric_sort::cmp(a.0, b.0))
        .map(|(celltype, count)| CelltypeCount { celltype: celltype.into(), count })
        .collect_vec();
    for c in &celltypes {
        clilog::info!("  {} x{}", c.celltype, c.count);
    }

    if env::var_os("SDF_STATS_JSON").is_some() {
        let stats = Statistics {
            file: args[1].clone(),
            sdfversion: header.sdfversion().into(),
            design: header.design().into(),
            cells: sdf.cells.len(),
            iopaths,
            timing_checks: kinds.values().sum(),
            celltypes
        };
        println!("{}", miniserde::json::to_string(&stats));
    }
}
