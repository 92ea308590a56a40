/*!
# Extraction Engine

Fixed-size worker pool draining a shared FIFO of source files. Per file
the owning worker parses (grammar picked by extension), collects the
sampleable leaf sequence, samples windowed pairs, and appends one complete
output line under the single output lock — lines from different files
never interleave, and triples within a line keep their enumeration order.

Shared mutable state is limited to the file queue, the vocabulary tables,
the output writer, and the processed-file counter. Parsers and RNGs are
worker-owned; ASTs and path buffers never cross threads.
*/

use std::collections::VecDeque;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info};

use crate::ast::{collect_leaves, AstParser, SourceLanguage};
use crate::core::fs_utils::read_source;
use crate::extract::sampler::{sample_pairs, DEFAULT_WINDOW};
use crate::vocab::VocabularySet;

/// Engine knobs. `workers == 0` means hardware parallelism; a set `seed`
/// derives each worker's RNG from `seed + worker index` for reproducible
/// sampling (byte-identical output additionally needs a single worker).
pub struct ExtractionConfig {
    pub window: usize,
    pub workers: usize,
    pub seed: Option<u64>,
    pub progress: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            workers: 0,
            seed: None,
            progress: false,
        }
    }
}

/// Advisory counters reported after the pool joins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total_files: usize,
    pub processed: usize,
    pub skipped: usize,
}

/// Runs the pool over `files`, writing one line per processed file to
/// `out`. Returns once the queue is drained and all workers have joined.
pub fn run_extraction<W: Write + Send>(
    files: Vec<PathBuf>,
    vocabs: &VocabularySet,
    config: &ExtractionConfig,
    out: W,
) -> Result<RunSummary> {
    let worker_count = if config.workers == 0 {
        num_cpus::get()
    } else {
        config.workers
    };
    let total_files = files.len();

    let bar = if config.progress {
        let bar = ProgressBar::new(total_files as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{pos}/{len} ({percent}%) {bar:40.cyan/blue} {msg}")
                .context("failed to set progress style")?,
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    info!(
        "starting {} workers over {} files (window {})",
        worker_count, total_files, config.window
    );

    let queue = Mutex::new(VecDeque::from(files));
    let output = Mutex::new(out);
    let processed = AtomicUsize::new(0);
    let skipped = AtomicUsize::new(0);

    thread::scope(|scope| {
        for worker_id in 0..worker_count {
            let queue = &queue;
            let output = &output;
            let processed = &processed;
            let skipped = &skipped;
            let bar = &bar;
            scope.spawn(move || {
                worker_loop(
                    worker_id, queue, vocabs, config, output, processed, skipped, bar,
                );
            });
        }
    });

    bar.finish_and_clear();
    output
        .lock()
        .expect("output lock poisoned")
        .flush()
        .context("failed to flush output stream")?;

    let summary = RunSummary {
        total_files,
        processed: processed.load(Ordering::Relaxed),
        skipped: skipped.load(Ordering::Relaxed),
    };
    info!(
        "finished: {}/{} files processed, {} skipped",
        summary.processed, summary.total_files, summary.skipped
    );
    Ok(summary)
}

#[allow(clippy::too_many_arguments)]
fn worker_loop<W: Write + Send>(
    worker_id: usize,
    queue: &Mutex<VecDeque<PathBuf>>,
    vocabs: &VocabularySet,
    config: &ExtractionConfig,
    output: &Mutex<W>,
    processed: &AtomicUsize,
    skipped: &AtomicUsize,
    bar: &ProgressBar,
) {
    let mut parser = match AstParser::new() {
        Ok(parser) => parser,
        Err(err) => {
            error!("worker {}: failed to initialize parsers: {:#}", worker_id, err);
            return;
        }
    };
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(worker_id as u64)),
        None => StdRng::from_entropy(),
    };

    loop {
        // The queue lock guards only the pop; it is released before any
        // parsing or vocabulary access.
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
                error!("cannot open {}: {}", file.display(), err);
                skipped.fetch_add(1, Ordering::Relaxed);
                bar.inc(1);
                continue;
            }
        };

        let language = SourceLanguage::from_path(&file);
        let tree = match parser.parse(&source, language) {
            Some(tree) => tree,
            None => {
                error!("parser produced no tree for {}", file.display());
                skipped.fetch_add(1, Ordering::Relaxed);
                bar.inc(1);
                continue;
            }
        };

        let leaves = collect_leaves(tree.root_node());
        if leaves.len() < 2 {
            debug!(
                "{}: fewer than two sampleable leaves, no output line",
                file.display()
            );
            processed.fetch_add(1, Ordering::Relaxed);
            bar.inc(1);
            continue;
        }

        let triples = sample_pairs(&leaves, &source, vocabs, config.window, &mut rng);
        let name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());

        {
            let mut out = output.lock().expect("output lock poisoned");
            if let Err(err) = writeln!(out, "{} {}", name, triples.join(" ")) {
                error!("failed to write line for {}: {}", file.display(), err);
            }
        }

        processed.fetch_add(1, Ordering::Relaxed);
        bar.inc(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;

    /// Test writer that shares its buffer with the asserting thread.
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn unreadable_files_are_skipped_not_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let good = dir.path().join("good.c");
        std::fs::write(&good, "int x = 1;").unwrap();
        let missing = dir.path().join("missing.c");

        let vocabs = VocabularySet::growable();
        let config = ExtractionConfig {
            workers: 1,
            seed: Some(1),
            ..Default::default()
        };
        let out = SharedBuffer::default();
        let summary =
            run_extraction(vec![missing, good], &vocabs, &config, out.clone()).unwrap();

        assert_eq!(summary.total_files, 2);
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.skipped, 1);
        assert!(out.contents().starts_with("good.c "));
    }

    #[test]
    fn degenerate_files_produce_no_line() {
        let dir = tempfile::TempDir::new().unwrap();
        let empty = dir.path().join("empty.c");
        std::fs::write(&empty, "").unwrap();

        let vocabs = VocabularySet::growable();
        let config = ExtractionConfig {
            workers: 1,
            seed: Some(1),
            ..Default::default()
        };
        let out = SharedBuffer::default();
        let summary = run_extraction(vec![empty], &vocabs, &config, out.clone()).unwrap();

        assert_eq!(summary.processed, 1);
        assert_eq!(out.contents(), "", "no output line for a leafless file");
    }

    #[test]
    fn lines_never_interleave_across_workers() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut files = Vec::new();
        for i in 0..12 {
            let path = dir.path().join(format!("f{i}.c"));
            std::fs::write(&path, format!("int a{i} = {i}; int b{i} = a{i} + {i};")).unwrap();
            files.push(path);
        }

        let vocabs = VocabularySet::growable();
        let config = ExtractionConfig {
            workers: 4,
            seed: Some(9),
            ..Default::default()
        };
        let out = SharedBuffer::default();
        let summary = run_extraction(files, &vocabs, &config, out.clone()).unwrap();
        assert_eq!(summary.processed, 12);

        let contents = out.contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 12);
        for line in lines {
            let mut parts = line.split(' ');
            let name = parts.next().unwrap();
            assert!(name.starts_with('f') && name.ends_with(".c"), "bad line: {line}");
            for triple in parts.filter(|t| !t.is_empty()) {
                assert_eq!(triple.split(',').count(), 3, "bad triple in: {line}");
            }
        }
    }
}
