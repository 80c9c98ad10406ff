// src/segment.rs
// Word-aware splitter for the radio's byte-limited payloads.

/// Hard payload limit of a single Meshtastic text message, in UTF-8 bytes.
pub const MAX_PAYLOAD_BYTES: usize = 200;

/// Appended to the final chunk when trailing words had to be dropped.
pub const TRUNCATION_MARKER: &str = " [...]";

// Budget held back on the final chunk so the marker always fits.
const TRUNCATION_RESERVE: usize = TRUNCATION_MARKER.len();

/// Split `text` into at most `max_chunks` pieces, each at most `max_bytes`
/// UTF-8 bytes long *including* its ` i/N` position suffix.
///
/// Invariant kept from the original broadcaster: a message that already fits
/// in `max_bytes` comes back as a single chunk with NO suffix. The suffix is
/// applied only when splitting actually happened, so downstream readers can
/// tell a whole message from part 1 of a series.
///
/// Lossy edge cases, by policy rather than accident:
/// - a single word longer than `max_bytes` is dropped entirely;
/// - words past the `max_chunks` cap are dropped and the last chunk ends
///   with ` [...]`.
pub fn segment(text: &str, max_bytes: usize, max_chunks: usize) -> Vec<String> {
    if text.len() <= max_bytes {
        return vec![text.trim().to_string()];
    }

    let max_chunks = max_chunks.max(1);
    // Worst-case suffix, e.g. " 2/2" for max_chunks = 2.
    let suffix_reserve = format!(" {max_chunks}/{max_chunks}").len();
    let mut extra_reserve = 0usize;

    let mut chunks: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_size = 0usize; // UTF-8 bytes, counting one separator per word

    for word in text.split_whitespace() {
        let word_size = word.len();

        // A word that cannot fit any chunk on its own is skipped outright.
        if word_size > max_bytes {
            continue;
        }

        if chunks.len() + 1 == max_chunks {
            extra_reserve = TRUNCATION_RESERVE;
        }
        let budget = max_bytes.saturating_sub(suffix_reserve + extra_reserve);

        if current_size + word_size + 1 <= budget {
            current.push(word);
            current_size += word_size + 1;
        } else {
            chunks.push(current.join(" "));
            if chunks.len() == max_chunks {
                // Cap reached: mark the cut and drop whatever is left.
                if let Some(last) = chunks.last_mut() {
                    last.push_str(TRUNCATION_MARKER);
                }
                current.clear();
                break;
            }
            current = vec![word];
            current_size = word_size;
        }
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    let total = chunks.len();
    chunks
        .into_iter()
        .enumerate()
        .map(|(i, c)| format!("{} {}/{}", c.trim(), i + 1, total))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_passes_through_unsuffixed() {
        let out = segment("  Hello world  ", 200, 2);
        assert_eq!(out, vec!["Hello world".to_string()]);
    }

    #[test]
    fn split_chunks_stay_within_budget_and_count() {
        let text = "alert for north region flooding now";
        let out = segment(text, 20, 2);
        assert!(out.len() <= 2);
        for c in &out {
            assert!(c.len() <= 20, "chunk too long: {c:?}");
        }
        // Every chunk carries its position once splitting occurred.
        for (i, c) in out.iter().enumerate() {
            assert!(c.ends_with(&format!("{}/{}", i + 1, out.len())));
        }
    }

    #[test]
    fn truncation_marks_last_chunk_and_drops_tail() {
        let text = "aaaa bbbb cccc dddd eeee ffff gggg hhhh iiii jjjj";
        let out = segment(text, 20, 2);
        assert_eq!(out.len(), 2);
        let last = out.last().unwrap();
        let body = last.rsplit_once(' ').unwrap().0;
        assert!(body.ends_with("[...]"), "missing marker: {last:?}");
        assert!(!last.contains("jjjj"));
    }

    #[test]
    fn chunks_reproduce_a_prefix_of_the_word_sequence() {
        let text = "ett två tre fyra fem sex sju åtta nio tio elva tolv";
        let out = segment(text, 24, 3);
        let mut rebuilt: Vec<&str> = Vec::new();
        for c in &out {
            let body = c.rsplit_once(' ').unwrap().0;
            let body = body.strip_suffix("[...]").unwrap_or(body).trim();
            rebuilt.extend(body.split_whitespace());
        }
        let original: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(rebuilt[..], original[..rebuilt.len()]);
    }

    #[test]
    fn oversized_word_is_dropped_not_looped() {
        let giant = "x".repeat(64);
        let text = format!("before {giant} after and some more words to force a split");
        let out = segment(&text, 30, 4);
        assert!(out.iter().all(|c| !c.contains(&giant)));
        assert!(out.iter().any(|c| c.contains("before")));
        assert!(out.iter().any(|c| c.contains("after")));
    }

    #[test]
    fn byte_budget_counts_utf8_bytes_not_chars() {
        // "åäö" is 3 chars but 6 bytes; 8-byte budget forces a split that a
        // char count would not.
        let text = "åäö åäö åäö";
        let out = segment(text, 12, 4);
        assert!(out.len() > 1);
        for c in &out {
            assert!(c.len() <= 12);
        }
    }

    #[test]
    fn deterministic_output() {
        let text = "varning för höga flöden i norra delarna under onsdagen";
        let a = segment(text, 25, 3);
        let b = segment(text, 25, 3);
        assert_eq!(a, b);
    }
}
