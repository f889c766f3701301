use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use ropsym::parse_address_offset;
use ropsym_core::catalog::SymbolCatalog;
use ropsym_core::image::load_image;
use ropsym_core::report::Reporter;
use ropsym_core::resolve::resolve_catalog;

/// Resolve ROP gadget and export symbol addresses in a binary image.
///
/// This CLI is a thin wrapper around `ropsym-core` (exposed in code as
/// `ropsym_core`). All substantive logic lives in the library so it can be
/// tested thoroughly and reused from other frontends.
///
/// Resolved symbols are printed to stdout as `label = 0xADDRESS;` lines,
/// directly consumable as a linker-script fragment. Unresolved symbols are
/// reported on stderr and make the process exit non-zero.
#[derive(Parser, Debug)]
#[command(
    name = "ropsym",
    version,
    about = "Resolve ROP gadget and export symbol addresses in a binary image",
    long_about = None
)]
struct Cli {
    /// Path to the YAML symbol catalog.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: PathBuf,

    /// Path to the binary image to search.
    #[arg(short = 'b', long = "binary", value_name = "FILE")]
    binary: PathBuf,

    /// Offset added to every resolved address. Decimal or 0x-prefixed hex,
    /// optionally negative.
    #[arg(
        long = "address-offset",
        value_name = "OFFSET",
        default_value = "0",
        value_parser = parse_address_offset,
        allow_hyphen_values = true
    )]
    address_offset: i64,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let catalog = SymbolCatalog::from_yaml_file(&cli.config)
        .with_context(|| format!("Failed to load symbol catalog {}", cli.config.display()))?;
    let image = load_image(&cli.binary)
        .with_context(|| format!("Failed to load binary image {}", cli.binary.display()))?;

    let stdout = io::stdout().lock();
    let stderr = io::stderr().lock();
    let mut reporter = Reporter::new(stdout, stderr);
    let summary =
        resolve_catalog(&catalog, &image.code, &image.exports, cli.address_offset, &mut reporter)
            .context("Failed to write report")?;

    // Exit non-zero on partial resolution so scripts can notice, rather than
    // leaving "some symbols missing" indistinguishable from full success.
    Ok(if summary.all_resolved() { ExitCode::SUCCESS } else { ExitCode::from(1) })
}
