use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lockscope::diagnostics::TracingSink;
use lockscope::export::{self, ExportData, ExportFormat};
use lockscope::parser::{package_json, Manifest};
use lockscope::scan;

#[derive(Parser)]
#[command(name = "lockscope")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Extract resolved dependencies from yarn lockfiles", long_about = None)]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract dependencies from a single yarn.lock
    Parse {
        /// Path to the yarn.lock file
        lockfile: PathBuf,

        /// Manifest used to classify direct dependencies
        /// (defaults to the package.json next to the lockfile)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Output format: json, csv, or markdown
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Find and extract every yarn.lock under a directory
    Scan {
        /// Directory to scan (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format: json, csv, or markdown
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show version information
    Version,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Reads the manifest for report headers.
fn read_manifest(path: Option<&Path>) -> Option<Manifest> {
    package_json::parse_file(path?).ok()
}

fn run_parse(
    lockfile: &Path,
    manifest: Option<PathBuf>,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<()> {
    let manifest = manifest.or_else(|| scan::sibling_manifest(lockfile));
    let report = scan::analyze_lockfile(lockfile, manifest.as_deref(), &mut TracingSink)?;
    let data = ExportData::from_report(report, read_manifest(manifest.as_deref()).as_ref());

    let mut writer = open_output(output)?;
    export::export(format, &data, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn run_scan(root: &Path, format: ExportFormat, output: Option<&Path>) -> Result<()> {
    let reports = scan::scan_directory(root, &mut TracingSink)
        .with_context(|| format!("Failed to scan {}", root.display()))?;
    if reports.is_empty() {
        tracing::warn!("No yarn.lock files found under {}", root.display());
    }

    let data: Vec<ExportData> = reports
        .into_iter()
        .map(|report| {
            let manifest = read_manifest(report.manifest.as_deref());
            ExportData::from_report(report, manifest.as_ref())
        })
        .collect();

    let mut writer = open_output(output)?;
    export::export_many(format, &data, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Parse {
            lockfile,
            manifest,
            format,
            output,
        }) => run_parse(&lockfile, manifest, format, output.as_deref()),
        Some(Commands::Scan {
            path,
            format,
            output,
        }) => run_scan(&path, format, output.as_deref()),
        Some(Commands::Version) => {
            println!("lockscope v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => {
            println!("lockscope - yarn lockfile dependency extractor");
            println!("Run 'lockscope parse yarn.lock' to extract dependencies");
            println!("Run 'lockscope --help' for more information");
            Ok(())
        }
    }
}
