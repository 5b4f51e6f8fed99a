//! Word-window chunking with configurable size and overlap.

use grounded_core::{AppError, AppResult};

/// Default window length, in words.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default number of words shared by consecutive windows.
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

/// Reject chunking parameters that would never advance.
pub fn validate_params(chunk_size: usize, overlap: usize) -> AppResult<()> {
    if chunk_size == 0 {
        return Err(AppError::Config(
            "Chunk size must be greater than zero".to_string(),
        ));
    }

    if overlap >= chunk_size {
        return Err(AppError::Config(format!(
            "Chunk overlap ({}) must be smaller than chunk size ({})",
            overlap, chunk_size
        )));
    }

    Ok(())
}

/// Split `text` into windows of `chunk_size` words, each starting
/// `chunk_size - overlap` words after the previous one.
///
/// Words are whitespace-separated runs; each chunk is rejoined with single
/// spaces. The last window may be shorter than `chunk_size`.
///
/// # Example
/// ```
/// use grounded_knowledge::chunker::chunk_words;
///
/// let chunks = chunk_words("a b c d e", 3, 1).unwrap();
/// assert_eq!(chunks, vec!["a b c", "c d e", "e"]);
/// ```
pub fn chunk_words(text: &str, chunk_size: usize, overlap: usize) -> AppResult<Vec<String>> {
    validate_params(chunk_size, overlap)?;

    let words: Vec<&str> = text.split_whitespace().collect();
    let step = chunk_size - overlap;

    let mut chunks = Vec::with_capacity(words.len() / step + 1);
    let mut start = 0;

    while start < words.len() {
        let end = (start + chunk_size).min(words.len());
        let chunk = words[start..end].join(" ");

        if !chunk.trim().is_empty() {
            chunks.push(chunk);
        }

        start += step;
    }

    tracing::debug!(
        "Chunked {} words into {} chunks (size: {}, overlap: {})",
        words.len(),
        chunks.len(),
        chunk_size,
        overlap
    );

    Ok(chunks)
}

/// Stable index key for the `sequence`-th chunk of a document.
pub fn chunk_id(document_id: &str, sequence: usize) -> String {
    format!("{}_chunk_{}", document_id, sequence)
}
