use log::error;
use sdfparse::{write, Loader};
use std::io::stdout;
use std::process::ExitCode;

fn main() -> ExitCode {
    clilog::init_stderr_color_debug();
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        println!("Usage: {} <sdf_file>", args.first().map(String::as_str).unwrap_or("sdfload"));
        return ExitCode::FAILURE;
    }

    let mut loader = Loader::new();
    if !loader.load_file(&args[1]) {
        println!("Failed to load SDF");
        return ExitCode::FAILURE;
    }
    let Some(sdf) = loader.delayfile() else {
        error!("loader reported success without a document");
        return ExitCode::FAILURE;
    };
    println!("Successfully loaded SDF");
    clilog::info!("{}: {} cells", args[1], sdf.cells.len());

    // SDF_PRINT re-emits the file in canonical form.
    if std::env::var_os("SDF_PRINT").is_some() {
        if let Err(e) = write::write_delayfile(sdf, stdout().lock(), 0) {
            error!("could not write SDF: {}", e);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
