//! Vocabulary persistence under `<root>/out/`.
//!
//! Plain text, one entry per line:
//!
//! ```text
//! token_vocab.txt   <normalized_token> <id>
//! type_vocab.txt    <normalized_type> <id>
//! path_vocab.txt    <id_0>,<id_1>,...,<id_n>, <id>
//! ```
//!
//! Build runs dump all three tables once, after the worker pool has
//! joined. Lookup runs load them at startup and treat them as immutable.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};

use super::VocabularySet;

/// Directory under the scan root holding the persisted tables.
pub const OUT_DIR: &str = "out";

pub const TOKEN_VOCAB_FILE: &str = "token_vocab.txt";
pub const TYPE_VOCAB_FILE: &str = "type_vocab.txt";
pub const PATH_VOCAB_FILE: &str = "path_vocab.txt";

impl VocabularySet {
    /// Writes all three tables into `dir`, creating it if needed.
    /// Single-threaded; callers invoke this after the pool has joined.
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create vocabulary directory {}", dir.display()))?;

        write_text_vocab(&dir.join(TOKEN_VOCAB_FILE), self.tokens.entries_by_id())?;
        write_text_vocab(&dir.join(TYPE_VOCAB_FILE), self.types.entries_by_id())?;

        let path_file = dir.join(PATH_VOCAB_FILE);
        let mut writer = BufWriter::new(
            File::create(&path_file)
                .with_context(|| format!("failed to create {}", path_file.display()))?,
        );
        for (sequence, id) in self.paths.entries_by_id() {
            let joined = sequence
                .iter()
                .map(|type_id| type_id.to_string())
                .collect::<Vec<_>>()
                .join(",");
            writeln!(writer, "{}, {}", joined, id)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Loads a frozen set from `dir`. Fails on unreadable or malformed
    /// files; emptiness policy is left to the caller.
    pub fn load(dir: &Path) -> Result<Self> {
        let tokens = read_text_vocab(&dir.join(TOKEN_VOCAB_FILE))?;
        let types = read_text_vocab(&dir.join(TYPE_VOCAB_FILE))?;
        let paths = read_path_vocab(&dir.join(PATH_VOCAB_FILE))?;
        Ok(VocabularySet::frozen(tokens, types, paths))
    }
}

fn write_text_vocab(path: &Path, entries: Vec<(String, u32)>) -> Result<()> {
    let mut writer = BufWriter::new(
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
    );
    for (key, id) in entries {
        writeln!(writer, "{} {}", key, id)?;
    }
    writer.flush()?;
    Ok(())
}

fn read_text_vocab(path: &Path) -> Result<HashMap<String, u32>> {
    let reader = BufReader::new(
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
    );
    let mut map = HashMap::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let Some((key, id)) = line.rsplit_once(' ') else {
            bail!("{}:{}: malformed vocabulary line", path.display(), line_no + 1);
        };
        let id: u32 = id
            .trim()
            .parse()
            .with_context(|| format!("{}:{}: bad id", path.display(), line_no + 1))?;
        map.insert(key.to_string(), id);
    }
    Ok(map)
}

fn read_path_vocab(path: &Path) -> Result<HashMap<Vec<u32>, u32>> {
    let reader = BufReader::new(
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
    );
    let mut map = HashMap::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        // The id follows the last comma: `1,2,3, 17`.
        let Some((sequence_part, id_part)) = line.rsplit_once(',') else {
            bail!("{}:{}: malformed path line", path.display(), line_no + 1);
        };
        let id: u32 = id_part
            .trim()
            .parse()
            .with_context(|| format!("{}:{}: bad path id", path.display(), line_no + 1))?;
        let mut sequence = Vec::new();
        for part in sequence_part.split(',') {
            let type_id: u32 = part
                .trim()
                .parse()
                .with_context(|| format!("{}:{}: bad type id", path.display(), line_no + 1))?;
            sequence.push(type_id);
        }
        map.insert(sequence, id);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{VocabMode, UNKNOWN_ID};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn round_trip_preserves_every_id() {
        let built = VocabularySet::growable();
        let tok_x = built.tokens.get_or_assign("x".to_string());
        let tok_one = built.tokens.get_or_assign("1".to_string());
        let ty_ident = built.types.get_or_assign("identifier".to_string());
        let ty_num = built.types.get_or_assign("number|literal".to_string());
        let path_id = built.paths.get_or_assign(vec![ty_ident, ty_num]);

        let dir = TempDir::new().unwrap();
        built.save(dir.path()).unwrap();

        let loaded = VocabularySet::load(dir.path()).unwrap();
        assert_eq!(loaded.mode(), VocabMode::Frozen);
        assert_eq!(loaded.tokens.lookup("x"), tok_x);
        assert_eq!(loaded.tokens.lookup("1"), tok_one);
        assert_eq!(loaded.types.lookup("identifier"), ty_ident);
        assert_eq!(loaded.types.lookup("number|literal"), ty_num);
        assert_eq!(loaded.paths.lookup(&vec![ty_ident, ty_num][..]), path_id);
    }

    #[test]
    fn absent_keys_resolve_to_unknown_after_reload() {
        let built = VocabularySet::growable();
        built.tokens.get_or_assign("present".to_string());
        built.types.get_or_assign("identifier".to_string());
        built.paths.get_or_assign(vec![1]);

        let dir = TempDir::new().unwrap();
        built.save(dir.path()).unwrap();
        let loaded = VocabularySet::load(dir.path()).unwrap();

        assert_eq!(loaded.tokens.lookup("never-seen"), UNKNOWN_ID);
        assert_eq!(loaded.paths.lookup(&vec![9, 9, 9][..]), UNKNOWN_ID);
    }

    #[test]
    fn path_lines_use_the_trailing_id_format() {
        let built = VocabularySet::growable();
        built.paths.get_or_assign(vec![4, 7, 4]);

        let dir = TempDir::new().unwrap();
        built.save(dir.path()).unwrap();

        let contents = std::fs::read_to_string(dir.path().join(PATH_VOCAB_FILE)).unwrap();
        assert_eq!(contents, "4,7,4, 1\n");
    }

    #[test]
    fn single_element_paths_survive_the_round_trip() {
        let built = VocabularySet::growable();
        let id = built.paths.get_or_assign(vec![42]);

        let dir = TempDir::new().unwrap();
        built.save(dir.path()).unwrap();
        let loaded = VocabularySet::load(dir.path()).unwrap();
        assert_eq!(loaded.paths.lookup(&vec![42][..]), id);
    }

    #[test]
    fn missing_files_are_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(VocabularySet::load(dir.path()).is_err());
    }
}
