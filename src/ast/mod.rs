/*!
# AST Provider

Thin wrapper around the tree-sitter C and C++ grammars. Every worker thread
owns its own [`AstParser`]; parser state is never shared. The rest of the
crate consumes plain `tree_sitter::Node` values (kind, flags, byte range,
parent and named-child navigation, identity comparison).

Also home to the text normalization applied to every token and node-type
string before it touches a vocabulary: all whitespace is stripped and `_`
is replaced by `|`, so identical surface text always maps to the same key.
*/

use std::path::Path;

use anyhow::{Context, Result};
use tree_sitter::{Language, Node, Parser, Tree};

pub mod leaves;

pub use leaves::{collect_leaves, is_sampleable};

/// Grammar selection, decided purely by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    C,
    Cpp,
}

impl SourceLanguage {
    /// `.c` parses with the C grammar; every other recognized extension
    /// (`.cpp`, `.cc`, `.cxx`) with the C++ grammar.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("c") => SourceLanguage::C,
            _ => SourceLanguage::Cpp,
        }
    }

    fn grammar(self) -> Language {
        match self {
            SourceLanguage::C => tree_sitter_c::LANGUAGE.into(),
            SourceLanguage::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        }
    }
}

/// Per-worker parser pair. Both grammars are loaded up front so a worker
/// can alternate between `.c` and `.cpp` files without re-initialization.
pub struct AstParser {
    c: Parser,
    cpp: Parser,
}

impl AstParser {
    pub fn new() -> Result<Self> {
        let mut c = Parser::new();
        c.set_language(&SourceLanguage::C.grammar())
            .context("failed to load C grammar")?;
        let mut cpp = Parser::new();
        cpp.set_language(&SourceLanguage::Cpp.grammar())
            .context("failed to load C++ grammar")?;
        Ok(Self { c, cpp })
    }

    /// Parses raw source bytes. Returns `None` only when tree-sitter gives
    /// up entirely; trees containing error nodes are returned as-is and
    /// filtered downstream.
    pub fn parse(&mut self, source: &[u8], language: SourceLanguage) -> Option<Tree> {
        match language {
            SourceLanguage::C => self.c.parse(source, None),
            SourceLanguage::Cpp => self.cpp.parse(source, None),
        }
    }
}

/// Normalizes token or type text into its vocabulary key: strips every
/// whitespace character and substitutes `|` for `_`.
pub fn normalize_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '_' { '|' } else { c })
        .collect()
}

/// The normalized vocabulary key of a node's type name.
pub fn type_key(node: &Node) -> String {
    normalize_text(node.kind())
}

/// The source text a node spans, recovered lossily from raw bytes.
pub fn node_text(node: &Node, source: &[u8]) -> String {
    String::from_utf8_lossy(&source[node.start_byte()..node.end_byte()]).into_owned()
}
