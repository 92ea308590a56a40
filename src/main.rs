/*!
# Path Context Extractor CLI

Unified entry point for build and lookup runs: one engine, one mode flag.
Triples go to stdout, diagnostics and progress to stderr, vocabularies to
`<root>/out/` in build mode.
*/

use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use path_context_extractor::core::{collect_source_files, SetupError};
use path_context_extractor::engine::{run_extraction, ExtractionConfig};
use path_context_extractor::extract::DEFAULT_WINDOW;
use path_context_extractor::vocab::persist::OUT_DIR;
use path_context_extractor::vocab::VocabularySet;

#[derive(Parser)]
#[command(
    name = "pathctx",
    version = env!("CARGO_PKG_VERSION"),
    about = "Extracts AST path-context triples from C/C++ sources"
)]
struct Cli {
    /// Directory scanned recursively for .c/.cpp/.cc/.cxx files
    root: PathBuf,

    /// Pair-sampling window width
    #[arg(default_value_t = DEFAULT_WINDOW)]
    window: usize,

    /// Vocabulary mode: grow new tables or look up frozen ones
    #[arg(long, value_enum, default_value = "build")]
    mode: Mode,

    /// Number of worker threads (0 = hardware parallelism)
    #[arg(long, default_value_t = 0)]
    workers: usize,

    /// Base RNG seed; worker k samples with seed + k
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    Build,
    Lookup,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return;
        }
        Err(err) => {
            let _ = err.print();
            process::exit(1);
        }
    };

    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {:#}", err);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    if !cli.root.is_dir() {
        return Err(SetupError::MissingRoot(cli.root).into());
    }

    let files = collect_source_files(&cli.root);
    if files.is_empty() {
        return Err(SetupError::NoEligibleFiles(cli.root).into());
    }

    let vocab_dir = cli.root.join(OUT_DIR);
    let vocabs = match cli.mode {
        Mode::Build => VocabularySet::growable(),
        Mode::Lookup => {
            let vocabs = VocabularySet::load(&vocab_dir)?;
            if vocabs.paths.is_empty() {
                return Err(SetupError::EmptyPathVocabulary.into());
            }
            vocabs
        }
    };

    let config = ExtractionConfig {
        window: cli.window,
        workers: cli.workers,
        seed: cli.seed,
        progress: true,
    };
    let summary = run_extraction(files, &vocabs, &config, io::stdout())?;

    if matches!(cli.mode, Mode::Build) {
        vocabs.save(&vocab_dir)?;
        info!(
            "vocabularies written to {} ({} tokens, {} types, {} paths)",
            vocab_dir.display(),
            vocabs.tokens.len(),
            vocabs.types.len(),
            vocabs.paths.len()
        );
    }

    info!(
        "done: {}/{} files, {} skipped",
        summary.processed, summary.total_files, summary.skipped
    );
    Ok(())
}
