//! Windowed terminal-pair sampling and triple encoding.
//!
//! For a leaf sequence of length L and window width W, every ordered pair
//! (i, j) with i < j and j − i < W is a candidate; each candidate survives
//! an independent Bernoulli(0.5) draw from the calling worker's private
//! RNG. Surviving pairs are encoded as `token1_id,path_id,token2_id`
//! through the vocabulary set. O(L·W), not O(L²).

use rand::Rng;
use tree_sitter::Node;

use crate::ast::{node_text, normalize_text, type_key};
use crate::extract::lca::path_between;
use crate::vocab::VocabularySet;

/// Default window width for pair enumeration.
pub const DEFAULT_WINDOW: usize = 200;

/// Samples path-context triples for one file's leaf sequence.
///
/// Returned triples follow the deterministic (i, j) enumeration order;
/// only the keep/skip decisions depend on `rng`. Pairs whose structural
/// path is empty are skipped silently.
pub fn sample_pairs<R: Rng>(
    leaves: &[Node<'_>],
    source: &[u8],
    vocabs: &VocabularySet,
    window: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut triples = Vec::new();
    if leaves.len() < 2 {
        return triples;
    }

    for i in 0..leaves.len() {
        let hi = leaves.len().min(i + window);
        for j in (i + 1)..hi {
            if !rng.gen_bool(0.5) {
                continue;
            }
            if let Some(triple) = encode_pair(leaves[i], leaves[j], source, vocabs) {
                triples.push(triple);
            }
        }
    }
    triples
}

/// Encodes one leaf pair as `t1,p,t2`, or `None` when the connecting path
/// is empty.
fn encode_pair(
    a: Node<'_>,
    b: Node<'_>,
    source: &[u8],
    vocabs: &VocabularySet,
) -> Option<String> {
    let path = path_between(a, b);
    let (first, last) = match (path.first(), path.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return None,
    };

    let token1_id = vocabs.tokens.id_for(normalize_text(&node_text(&first, source)));
    let type_ids: Vec<u32> = path
        .iter()
        .map(|node| vocabs.types.id_for(type_key(node)))
        .collect();
    let token2_id = vocabs.tokens.id_for(normalize_text(&node_text(&last, source)));
    let path_id = vocabs.paths.id_for(type_ids);

    Some(format!("{},{},{}", token1_id, path_id, token2_id))
}

/// Number of candidate pairs the sampler enumerates for a leaf sequence of
/// `len` under `window`. Every emitted triple set is a subset of these.
pub fn candidate_pair_count(len: usize, window: usize) -> usize {
    (0..len)
        .map(|i| len.min(i + window).saturating_sub(i + 1))
        .sum()
}
