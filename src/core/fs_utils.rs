//! File system helpers (source discovery, raw readers)
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Extensions recognized as C/C++ sources. `.c` selects the C grammar,
/// everything else the C++ grammar.
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "cpp", "cc", "cxx"];

/// Returns true for files the extractor should process.
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Recursively collects all C/C++ source files under `root`, in walk order.
///
/// Unreadable directory entries are logged and skipped; they never abort
/// the scan.
pub fn collect_source_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("skipping unreadable directory entry: {}", err);
                continue;
            }
        };
        if entry.file_type().is_file() && is_source_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files
}

/// Reads a source file as raw bytes. Sources are handed to the parser
/// untouched; token text is recovered lossily when emitting triples.
pub fn read_source(path: &Path) -> std::io::Result<Vec<u8>> {
    fs::read(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_all_four_extensions() {
        for name in ["a.c", "b.cpp", "c.cc", "d.cxx"] {
            assert!(is_source_file(Path::new(name)), "{name} should match");
        }
    }

    #[test]
    fn rejects_headers_and_extensionless_files() {
        for name in ["a.h", "b.hpp", "Makefile", "c.rs", "d.C"] {
            assert!(!is_source_file(Path::new(name)), "{name} should not match");
        }
    }

    #[test]
    fn collects_sources_recursively() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("sub/deeper");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("main.c"), "int main() {}").unwrap();
        fs::write(nested.join("util.cpp"), "int f() { return 0; }").unwrap();
        fs::write(nested.join("notes.txt"), "not code").unwrap();

        let files = collect_source_files(dir.path());
        assert_eq!(files.len(), 2);
    }
}
