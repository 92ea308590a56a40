//! Advisory utility: counts files whose AST contains syntax error nodes.
//!
//! Purely informational — error nodes never gate extraction, which filters
//! them out per node instead.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use path_context_extractor::ast::{AstParser, SourceLanguage};
use path_context_extractor::core::{collect_source_files, read_source};

#[derive(Parser, Debug)]
#[command(
    name = "errorcount",
    version = env!("CARGO_PKG_VERSION"),
    about = "Counts C/C++ files whose AST contains syntax errors"
)]
struct Args {
    /// Directory scanned recursively for .c/.cpp/.cc/.cxx files
    root: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Print each offending file as it is found
    #[arg(short, long)]
    list: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Human,
    Json,
}

#[derive(Serialize)]
struct ErrorReport {
    total_files: usize,
    files_with_errors: usize,
    unreadable_files: usize,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("error: {:#}", err);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    if !args.root.is_dir() {
        anyhow::bail!("root directory does not exist: {}", args.root.display());
    }
    let files = collect_source_files(&args.root);
    if files.is_empty() {
        anyhow::bail!("no C/C++ source files found under {}", args.root.display());
    }

    let total = files.len();
    let queue = Mutex::new(VecDeque::from(files));
    let error_files = AtomicUsize::new(0);
    let unreadable = AtomicUsize::new(0);
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{pos}/{len} ({percent}%) {bar:40.cyan/blue}")
            .context("failed to set progress style")?,
    );

    thread::scope(|scope| {
        for _ in 0..num_cpus::get() {
            let queue = &queue;
            let error_files = &error_files;
            let unreadable = &unreadable;
            let bar = &bar;
            scope.spawn(move || {
                let mut parser = match AstParser::new() {
                    Ok(parser) => parser,
                    Err(err) => {
                        eprintln!("failed to initialize parsers: {:#}", err);
                        return;
                    }
                };
                loop {
                    let file = {
                        let mut queue = queue.lock().expect("file queue lock poisoned");
                        match queue.pop_front() {
                            Some(file) => file,
                            None => return,
                        }
                    };
                    let source = match read_source(&file) {
                        Ok(source) => source,
                        Err(err) => {
                            bar.println(format!("cannot open {}: {}", file.display(), err));
                            unreadable.fetch_add(1, Ordering::Relaxed);
                            bar.inc(1);
                            continue;
                        }
                    };
                    let has_error = parser
                        .parse(&source, SourceLanguage::from_path(&file))
                        .map(|tree| tree.root_node().has_error())
                        .unwrap_or(false);
                    if has_error {
                        error_files.fetch_add(1, Ordering::Relaxed);
                        if args.list {
                            bar.println(format!("[syntax error] {}", file.display()));
                        }
                    }
                    bar.inc(1);
                }
            });
        }
    });
    bar.finish_and_clear();

    let report = ErrorReport {
        total_files: total,
        files_with_errors: error_files.load(Ordering::Relaxed),
        unreadable_files: unreadable.load(Ordering::Relaxed),
    };

    match args.format {
        OutputFormat::Human => {
            println!("{}", style("=== Syntax error summary ===").bold());
            println!("Files scanned:     {}", report.total_files);
            println!(
                "Files with errors: {}",
                if report.files_with_errors > 0 {
                    style(report.files_with_errors).red()
                } else {
                    style(report.files_with_errors).green()
                }
            );
            println!("Unreadable files:  {}", report.unreadable_files);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
