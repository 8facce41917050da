// sinc: front end of the SIN compiler

use std::fs;
use std::path::Path;

use sinc::config::FrontendConfig;
use sinc::driver::Frontend;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("sinc");

    if args.len() < 2 {
        eprintln!("Error: No input file provided");
        eprintln!();
        eprintln!("Usage: {} <file.sin> [--no-symbols]", program_name);
        eprintln!();
        eprintln!("Set RUST_LOG=debug to trace each parsed statement.");
        std::process::exit(1);
    }

    let source_file = &args[1];

    if !Path::new(source_file).exists() {
        eprintln!("Error: File '{}' not found", source_file);
        eprintln!("Usage: {} <file.sin> [--no-symbols]", program_name);
        std::process::exit(1);
    }

    let mut config = FrontendConfig::default();
    if args.iter().skip(2).any(|arg| arg == "--no-symbols") {
        config = config.without_symbols();
    }

    // Read source code
    let source = fs::read_to_string(source_file)?;

    eprintln!("Compiling {}...", source_file);
    let output = match Frontend::new(config).compile(&source) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    for diagnostic in &output.diagnostics {
        eprintln!("{}", diagnostic);
    }
    for error in &output.errors {
        eprintln!("{}", error);
    }

    eprintln!(
        "Parsed {} top-level statements; {} symbols registered.",
        output.ast.len(),
        output.symbols.len()
    );

    if !output.is_success() {
        eprintln!("Compilation failed with {} error(s).", output.errors.len());
        std::process::exit(1);
    }

    Ok(())
}
