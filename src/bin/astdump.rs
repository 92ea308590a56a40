//! Debug utility: prints the full tree-sitter AST of C/C++ sources.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tree_sitter::Node;

use path_context_extractor::ast::{AstParser, SourceLanguage};
use path_context_extractor::core::{collect_source_files, is_source_file, read_source};

#[derive(Parser, Debug)]
#[command(
    name = "astdump",
    version = env!("CARGO_PKG_VERSION"),
    about = "Prints the full AST of C/C++ source files",
    long_about = "Single-threaded debug printer: one indented line per named node \
                  with kind, position and named-child count"
)]
struct Args {
    /// Source file or directory to dump
    path: PathBuf,

    /// Also print each node's source text
    #[arg(long)]
    show_text: bool,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("error: {:#}", err);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let files = if args.path.is_file() {
        vec![args.path.clone()]
    } else if args.path.is_dir() {
        collect_source_files(&args.path)
    } else {
        anyhow::bail!("{} is neither a file nor a directory", args.path.display());
    };

    if files.is_empty() {
        anyhow::bail!("no C/C++ source files under {}", args.path.display());
    }

    let mut parser = AstParser::new()?;
    for file in &files {
        if !is_source_file(file) {
            continue;
        }
        dump_file(file, &mut parser, args.show_text)?;
    }
    Ok(())
}

fn dump_file(path: &Path, parser: &mut AstParser, show_text: bool) -> Result<()> {
    let source = read_source(path).with_context(|| format!("cannot open {}", path.display()))?;
    let tree = parser
        .parse(&source, SourceLanguage::from_path(path))
        .with_context(|| format!("parser produced no tree for {}", path.display()))?;

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    println!("[{}]", name);

    let mut stack: Vec<(Node<'_>, usize)> = vec![(tree.root_node(), 0)];
    while let Some((node, depth)) = stack.pop() {
        print_node(&node, depth, &source, show_text);
        for i in (0..node.named_child_count()).rev() {
            if let Some(child) = node.named_child(i) {
                stack.push((child, depth + 1));
            }
        }
    }
    Ok(())
}

fn print_node(node: &Node<'_>, depth: usize, source: &[u8], show_text: bool) {
    let start = node.start_position();
    let mut line = format!(
        "{}{} @ L{}:C{} @child_count{}",
        " ".repeat(depth * 2),
        node.kind(),
        start.row + 1,
        start.column + 1,
        node.named_child_count()
    );
    if show_text {
        let text = String::from_utf8_lossy(&source[node.start_byte()..node.end_byte()]);
        line.push_str(&format!(" \"{}\"", text));
    }
    println!("{}", line);
}
