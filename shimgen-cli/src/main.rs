//! shimgen CLI - extract C structs and defines into a self-contained shim header.
//!
//! Features:
//! - Transitive `struct` reference resolution across the whole header tree
//! - Host and target macro shims
//! - Deterministic output (lexical file order)
//! - Provenance banner with git revision metadata

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};

use shimgen_core::{
    init_logging, load_config, log_info, log_warn, DeclarationOrder, FindRequest,
    LogOptions, ShimConfig, Shimgen, StructOrder,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Extract C structs and defines into a shim header")]
pub struct Cli {
    /// Root of the header tree to scan
    directory_path: PathBuf,

    /// Config file naming the structs and defines to extract (TOML, or JSON by extension)
    config_file: PathBuf,

    /// Log every file and name visited during the scan
    #[arg(long)]
    debug: bool,

    /// Omit the "#pragma once" provenance banner
    #[arg(long)]
    no_header: bool,

    /// Emit diagnostics as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Struct definition order: discovery or reverse
    #[arg(long, value_name = "ORDER")]
    struct_order: Option<StructOrder>,

    /// Forward declaration order: requested-last or discovery
    #[arg(long = "decl-order", value_name = "ORDER")]
    decl_order: Option<DeclarationOrder>,

    /// Only scan files whose name ends in this suffix
    #[arg(long, default_value = ".h")]
    header_suffix: String,
}

/// Loads the config file and turns it into a validated request.
fn load_request(config_file: &Path) -> Result<(ShimConfig, FindRequest)> {
    let config = load_config(config_file)
        .with_context(|| format!("Failed to load config: {}", config_file.display()))?;
    let request = FindRequest::from_config(&config)
        .with_context(|| format!("Invalid request in: {}", config_file.display()))?;
    if request.is_empty() {
        log_warn(&format!(
            "{} requests no structs or defines",
            config_file.display()
        ));
    }
    Ok((config, request))
}

/// Builds the extraction run: config output policy first, then CLI overrides.
fn build(cli: &Cli, config: &ShimConfig, request: FindRequest) -> Result<Shimgen> {
    let mut shimgen = Shimgen::new(&cli.directory_path, request)
        .header_suffix(cli.header_suffix.as_str())
        .with_output_config(&config.output)
        .with_context(|| format!("Invalid [output] table in: {}", cli.config_file.display()))?;

    if cli.no_header {
        shimgen = shimgen.no_header(true);
    }
    if let Some(order) = cli.struct_order {
        shimgen = shimgen.struct_order(order);
    }
    if let Some(order) = cli.decl_order {
        shimgen = shimgen.declaration_order(order);
    }
    Ok(shimgen)
}

/// Runs the extraction. `Ok(None)` means nothing was found to emit.
fn run(cli: &Cli) -> Result<Option<String>> {
    let (config, request) = load_request(&cli.config_file)?;
    let shimgen = build(cli, &config, request)?;
    let header = shimgen
        .generate()
        .with_context(|| format!("Extraction from {} failed", cli.directory_path.display()))?;
    Ok(header)
}

fn main() {
    // Global panic guard
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] shimgen internal error: {}", info);
        eprintln!("[PANIC] The process will exit with code 2.");
        std::process::exit(2);
    }));

    let cli = Cli::parse();

    init_logging(LogOptions {
        debug: cli.debug,
        json: cli.log_json,
    });

    match run(&cli) {
        Ok(Some(header)) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = stdout.write_all(header.as_bytes()).and_then(|_| stdout.flush()) {
                eprintln!("Error: failed to write header: {}", e);
                std::process::exit(1);
            }
            log_info(&format!("header written ({} bytes)", header.len()));
        }
        Ok(None) => {
            eprintln!("No structs or defines found; nothing written.");
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
