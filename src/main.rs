use clap::{Parser, Subcommand};
use prepublish::resolve::Resolver;
use prepublish::slug::SlugMinter;
use prepublish::store::{DocumentStore, DryRunStore, FsStore};
use prepublish::types::{DocumentReport, RunSummary};
use prepublish::{config, output, scan};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("PREPUBLISH_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("PREPUBLISH_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "prepublish")]
#[command(about = "Resolve publish state and review slugs in front-matter documents")]
#[command(long_about = "\
Resolve publish state and review slugs in front-matter documents

Every document starts with a YAML header between --- fences. prepublish reads
the header, decides whether the document is public, and gives hidden documents
a review slug:

  ---
  title: Hello
  publish date: 2030-01-01T09:00:00Z   # future date: published becomes false
  published: false                     # draft: gets ___UNPUBLISHED___<id> in slugs
  secret: true                         # secret: fresh review slug on every run
  slugs: []
  ---

Headers are rewritten only when something changed; the body is kept.

Run 'prepublish gen-config' to generate a documented prepublish.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory (holds prepublish.toml; scanned when no paths are given)
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Print the report as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve documents and rewrite their headers where needed
    Resolve {
        /// Files or directories (default: the content directory)
        paths: Vec<PathBuf>,
    },
    /// Report what resolve would change without writing anything
    Check {
        /// Files or directories (default: the content directory)
        paths: Vec<PathBuf>,
    },
    /// Print a stock prepublish.toml with all options documented
    GenConfig,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    documents: &'a [DocumentReport],
    summary: RunSummary,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Command::Resolve { paths } => {
            let reports = resolve_all(&cli.source, paths, FsStore)?;
            emit(&reports, cli.json, false)?;
        }
        Command::Check { paths } => {
            let store = DryRunStore::new();
            let reports = resolve_all(&cli.source, paths, &store)?;
            debug!(pending = store.pending_writes().len(), "dry run finished");
            emit(&reports, cli.json, true)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve every document named by `targets` (or found under `source`).
fn resolve_all(
    source: &Path,
    targets: &[PathBuf],
    store: impl DocumentStore,
) -> Result<Vec<DocumentReport>, Box<dyn std::error::Error>> {
    let config = config::load_config(source)?;
    let documents = scan::expand_targets(targets, source, &config.content.extensions)?;
    let resolver = Resolver::new(store, SlugMinter::system(config.slugs));

    let mut reports = Vec::with_capacity(documents.len());
    for path in &documents {
        let decision = resolver.resolve(path)?;
        reports.push(DocumentReport::from_decision(path, source, &decision));
    }
    Ok(reports)
}

fn emit(
    reports: &[DocumentReport],
    json: bool,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let report = JsonReport {
            documents: reports,
            summary: RunSummary::from_reports(reports),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_reports(reports, dry_run);
    }
    Ok(())
}
