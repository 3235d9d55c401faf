//! Sentence-aware chunking under a byte-length budget.
//!
//! A document is split on ASCII periods, and the resulting sentence
//! fragments are packed back together greedily so that no chunk exceeds
//! the budget. Each fragment keeps its trailing period, so concatenating
//! the returned chunks reproduces the input text exactly.

use tracing::debug;

use crate::error::{Error, Result};

/// Default chunk budget in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Split `text` into chunks of at most `size` bytes, breaking at sentence
/// boundaries where possible.
///
/// A sentence longer than the budget cannot fit in any chunk: the
/// accumulator is flushed and the sentence is emitted as two chunks split
/// where the budget runs out (backed up to the nearest UTF-8 character
/// boundary). Its tail may exceed the budget; oversized sentences are
/// never merged with their neighbors.
///
/// A sentence that would overflow the accumulator flushes it and starts
/// the next one, so no content is ever dropped. The final accumulator is
/// pushed even when empty, which keeps the output non-empty for any
/// input; callers skip empty chunks.
pub fn chunk(text: &str, size: usize) -> Result<Vec<String>> {
    if size == 0 {
        return Err(Error::InvalidChunkSize(size));
    }

    let fragments: Vec<&str> = text.split('.').collect();
    let last = fragments.len() - 1;

    let mut chunks = Vec::new();
    let mut current = String::new();

    for (i, fragment) in fragments.iter().enumerate() {
        // Restore the period the split consumed; the fragment after the
        // final period never had one.
        let sentence = if i < last {
            format!("{fragment}.")
        } else {
            (*fragment).to_string()
        };

        if sentence.len() > size {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let cut = floor_char_boundary(&sentence, size);
            let (head, tail) = sentence.split_at(cut);
            chunks.push(head.to_string());
            chunks.push(tail.to_string());
            continue;
        }

        if current.len() + sentence.len() > size {
            chunks.push(std::mem::take(&mut current));
        }
        current.push_str(&sentence);
    }

    chunks.push(current);

    debug!(chunks = chunks.len(), budget = size, "chunked document");
    Ok(chunks)
}

/// Largest index `<= at` that lands on a character boundary of `s`.
fn floor_char_boundary(s: &str, at: usize) -> usize {
    let mut cut = at.min(s.len());
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_rejected() {
        let err = chunk("some text", 0).unwrap_err();
        assert!(matches!(err, Error::InvalidChunkSize(0)));
    }

    #[test]
    fn two_sentences_fit_one_chunk() {
        let chunks = chunk("A.B.", 100).unwrap();
        assert_eq!(chunks, vec!["A.B."]);
    }

    #[test]
    fn exact_budget_sentence_is_not_split() {
        // "abc." is exactly 4 bytes
        let chunks = chunk("abc.", 4).unwrap();
        assert_eq!(chunks, vec!["abc."]);
    }

    #[test]
    fn oversized_sentence_is_split_in_two() {
        let chunks = chunk("aaaaaaaaaa", 4).unwrap();
        assert_eq!(chunks, vec!["aaaa", "aaaaaa", ""]);
        assert_eq!(chunks[0].len(), 4);
        assert_eq!(chunks[1].len(), 6);
    }

    #[test]
    fn oversized_sentence_flushes_accumulator_first() {
        let chunks = chunk("hi.aaaaaaaaaa", 4).unwrap();
        assert_eq!(chunks, vec!["hi.", "aaaa", "aaaaaa", ""]);
    }

    #[test]
    fn overflow_fragment_is_carried_forward() {
        // The second sentence does not fit next to the first; it must
        // start the next chunk, not get lost in the flush.
        let chunks = chunk("aaaa.bbbb.", 6).unwrap();
        assert_eq!(chunks, vec!["aaaa.", "bbbb.", ""]);
        assert_eq!(chunks.concat(), "aaaa.bbbb.");
    }

    #[test]
    fn chunks_reassemble_to_input() {
        let text = "One sentence. Another, somewhat longer sentence. \
                    Ünïcöde täils. Short. A final run without a period";
        for size in [1, 2, 3, 5, 8, 13, 64, 1024] {
            let chunks = chunk(text, size).unwrap();
            assert_eq!(chunks.concat(), text, "budget {size}");
        }
    }

    #[test]
    fn chunks_respect_budget_at_sentence_granularity() {
        let text = "alpha. beta. gamma. delta. epsilon.";
        let chunks = chunk(text, 10).unwrap();
        for c in &chunks {
            // No sentence here exceeds the budget, so every chunk obeys it.
            assert!(c.len() <= 10, "chunk {c:?} over budget");
        }
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn multibyte_split_backs_up_to_char_boundary() {
        // Four 2-byte characters with no period; budget lands mid-char.
        let text = "éééé";
        let chunks = chunk(text, 5).unwrap();
        assert_eq!(chunks.concat(), text);
        assert_eq!(chunks[0], "éé");
        assert_eq!(chunks[1], "éé");
    }

    #[test]
    fn empty_input_yields_single_empty_chunk() {
        let chunks = chunk("", 16).unwrap();
        assert_eq!(chunks, vec![""]);
    }
}
