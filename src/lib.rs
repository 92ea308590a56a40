/*!
# Path Context Extractor

Concurrent extractor of structural path-context features from C/C++ ASTs,
feeding code-embedding model training. For every source file it samples
pairs of terminal tokens, encodes the structural path through their lowest
common ancestor, and emits `(token_id, path_id, token_id)` triples backed
by deduplicated integer vocabularies.

## Core Features

- **Tree-sitter parsing** with the C grammar for `.c` and the C++ grammar
  for `.cpp`/`.cc`/`.cxx`
- **Depth-aligned LCA path construction** over named, non-error nodes
- **Mode-dependent vocabularies** — growable during build runs, frozen
  (miss → 0) during lookup runs, one lock per table
- **Windowed stochastic pair sampling** with worker-private, seedable RNGs
- **Fixed worker pool** over a shared FIFO; one output line per file,
  never interleaved
- **Plain-text vocabulary persistence** under `<root>/out/`

## Architecture

```text
Path Context Extractor
├── core     - Error taxonomy, file discovery and readers
├── ast      - Tree-sitter provider, leaf classifier, normalization
├── extract  - LCA path builder, windowed pair sampler
├── vocab    - Dedup id tables (build/lookup modes), persistence
└── engine   - Worker pool, output emission, progress reporting
```

## Usage

### CLI
```bash
# Build vocabularies while emitting triples
pathctx ./corpus 200

# Re-emit triples against frozen vocabularies
pathctx ./corpus 200 --mode lookup

# Reproducible single-worker run
pathctx ./corpus --workers 1 --seed 42
```

### Library
```rust,no_run
use path_context_extractor::{extract_file, VocabularySet};

let vocabs = VocabularySet::growable();
let line = extract_file("demo.c".as_ref(), &vocabs, 200, Some(7))?;
if let Some(line) = line {
    println!("{line}");
}
# anyhow::Ok(())
```
*/

pub mod ast;
pub mod core;
pub mod engine;
pub mod extract;
pub mod vocab;

pub use ast::{collect_leaves, is_sampleable, AstParser, SourceLanguage};
pub use crate::core::{collect_source_files, SetupError};
pub use engine::{run_extraction, ExtractionConfig, RunSummary};
pub use extract::{candidate_pair_count, lowest_common_ancestor, path_between, sample_pairs,
    DEFAULT_WINDOW};
pub use vocab::{VocabMode, Vocabulary, VocabularySet, UNKNOWN_ID};

use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Extracts the output line for a single file, outside the worker pool.
///
/// Returns `Ok(None)` when the file has fewer than two sampleable leaves.
/// Convenient for tests and one-off inspection; the CLI goes through
/// [`run_extraction`] instead.
pub fn extract_file(
    path: &Path,
    vocabs: &VocabularySet,
    window: usize,
    seed: Option<u64>,
) -> Result<Option<String>> {
    let source = crate::core::read_source(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut parser = AstParser::new()?;
    let tree = parser
        .parse(&source, SourceLanguage::from_path(path))
        .with_context(|| format!("parser produced no tree for {}", path.display()))?;

    let leaves = collect_leaves(tree.root_node());
    if leaves.len() < 2 {
        return Ok(None);
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let triples = sample_pairs(&leaves, &source, vocabs, window, &mut rng);
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Some(format!("{} {}", name, triples.join(" "))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_file_produces_a_line_for_a_simple_declaration() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("tiny.c");
        std::fs::write(&file, "int x = 1;").unwrap();

        let vocabs = VocabularySet::growable();
        let line = extract_file(&file, &vocabs, DEFAULT_WINDOW, Some(3))
            .unwrap()
            .expect("a simple declaration has sampleable leaves");
        assert!(line.starts_with("tiny.c "));
    }

    #[test]
    fn extract_file_returns_none_for_an_empty_source() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("empty.c");
        std::fs::write(&file, "").unwrap();

        let vocabs = VocabularySet::growable();
        assert!(extract_file(&file, &vocabs, DEFAULT_WINDOW, Some(3))
            .unwrap()
            .is_none());
    }
}
