//! Prior-knowledge context assembled from the memory store.

use crate::memory_types::MemoryItem;

/// Upper bound on the assembled context, in characters.
pub const MAX_CONTEXT_CHARS: usize = 1000;

const SEPARATOR: &str = ". ";

/// Join memory contents in the given order with `". "` and keep the first
/// [`MAX_CONTEXT_CHARS`] characters.
///
/// The cut is a hard character cut and may land mid-word. Characters are
/// Unicode scalar values, so multi-byte text is never split inside a code point.
pub fn build_context(items: &[MemoryItem]) -> String {
    let joined = items
        .iter()
        .map(|item| item.content.as_str())
        .collect::<Vec<_>>()
        .join(SEPARATOR);

    match joined.char_indices().nth(MAX_CONTEXT_CHARS) {
        Some((byte_idx, _)) => joined[..byte_idx].to_string(),
        None => joined,
    }
}
