//! Overlapping text chunker that breaks at natural boundaries
//!
//! Windows are measured in characters. A window ends at the last paragraph
//! break it contains, else the last line break, sentence boundary or
//! whitespace, and only falls back to a hard cut when none of those lies in
//! the back half of the window. The next window starts at most `overlap`
//! characters before the previous end, snapped forward to a word start.
//!
//! Windows holding only whitespace are not emitted, so consecutive spans may
//! leave a whitespace-only gap between them (and before the first or after
//! the last span). No other text is ever skipped.

use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;

/// Byte range of one chunk inside the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpan {
    pub start: usize,
    pub end: usize,
}

impl ChunkSpan {
    /// Borrow the chunk text from its source
    pub fn as_str<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Text chunker with configurable size and overlap
#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Maximum overlap between consecutive chunks in characters
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker. Overlap is clamped below the chunk size.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        }
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Split text into owned chunk strings
    pub fn chunk(&self, text: &str) -> Vec<String> {
        self.chunk_spans(text)
            .iter()
            .map(|span| span.as_str(text).to_string())
            .collect()
    }

    /// Split text into ordered byte spans
    pub fn chunk_spans(&self, text: &str) -> Vec<ChunkSpan> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut spans = Vec::new();
        let mut start = 0usize;

        loop {
            let rest = &text[start..];
            let limit = match nth_char_offset(rest, self.chunk_size) {
                Some(offset) => start + offset,
                None => {
                    push_span(&mut spans, text, start, text.len());
                    break;
                }
            };

            // `rest` holds more than chunk_size > overlap characters
            let floor = start + nth_char_offset(rest, self.overlap).unwrap_or(0);
            let end = self.find_break(text, start, floor, limit);
            push_span(&mut spans, text, start, end);

            if text[end..].trim().is_empty() {
                break;
            }
            start = self.next_start(text, end);
        }

        spans
    }

    /// Pick the end of the window `[start, limit)`; always beyond `floor`
    fn find_break(&self, text: &str, start: usize, floor: usize, limit: usize) -> usize {
        let window = &text[start..limit];
        let min_rel = (floor - start).max(window.len() / 2);

        if let Some(pos) = window.rfind("\n\n") {
            if pos + 2 > min_rel {
                return start + pos + 2;
            }
        }

        if let Some(pos) = window.rfind('\n') {
            if pos + 1 > min_rel {
                return start + pos + 1;
            }
        }

        if let Some(pos) = window
            .split_sentence_bound_indices()
            .map(|(i, _)| i)
            .filter(|&i| i > min_rel)
            .last()
        {
            return start + pos;
        }

        if let Some((pos, ch)) = window
            .char_indices()
            .rev()
            .find(|(i, c)| c.is_whitespace() && i + c.len_utf8() > min_rel)
        {
            return start + pos + ch.len_utf8();
        }

        limit
    }

    /// Start of the window following `[start, end)`
    fn next_start(&self, text: &str, end: usize) -> usize {
        if self.overlap == 0 {
            return end;
        }

        let candidate = text[..end]
            .char_indices()
            .rev()
            .nth(self.overlap - 1)
            .map(|(i, _)| i)
            .unwrap_or(end);

        if is_word_start(text, candidate) {
            return candidate;
        }

        let region = &text[candidate..end];
        let snapped = region
            .char_indices()
            .skip_while(|(_, c)| !c.is_whitespace())
            .find(|(_, c)| !c.is_whitespace())
            .map(|(i, _)| candidate + i);

        match snapped {
            Some(pos) if pos < end => pos,
            _ => candidate,
        }
    }
}

/// Split `text` into windows of at most `max_size` characters overlapping by at most `overlap`
pub fn chunk(text: &str, max_size: usize, overlap: usize) -> Vec<String> {
    TextChunker::new(max_size, overlap).chunk(text)
}

/// Byte offset of the `n`th character, or `None` if `s` has `n` characters or fewer
fn nth_char_offset(s: &str, n: usize) -> Option<usize> {
    s.char_indices().nth(n).map(|(i, _)| i)
}

fn is_word_start(text: &str, pos: usize) -> bool {
    let at_word = text[pos..].chars().next().is_some_and(|c| !c.is_whitespace());
    let after_space = pos == 0 || text[..pos].chars().next_back().is_some_and(char::is_whitespace);
    at_word && after_space
}

fn push_span(spans: &mut Vec<ChunkSpan>, text: &str, start: usize, end: usize) {
    if !text[start..end].trim().is_empty() {
        spans.push(ChunkSpan { start, end });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(chunk("", 5000, 256).is_empty());
        assert!(chunk(" \n\n\t ", 5000, 256).is_empty());
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        assert_eq!(chunk("short text", 5000, 256), vec!["short text".to_string()]);
    }

    #[test]
    fn test_text_of_exactly_max_size_is_single_chunk() {
        let text = "y".repeat(40);
        assert_eq!(chunk(&text, 40, 10), vec![text.clone()]);
    }

    #[test]
    fn test_hard_cut_keeps_exact_overlap() {
        let text = "x".repeat(50);
        let chunker = TextChunker::new(20, 5);
        let spans = chunker.chunk_spans(&text);

        assert_eq!(
            spans,
            vec![
                ChunkSpan { start: 0, end: 20 },
                ChunkSpan { start: 15, end: 35 },
                ChunkSpan { start: 30, end: 50 },
            ]
        );
    }

    #[test]
    fn test_prefers_paragraph_break() {
        let text = format!("{}\n\n{}", "A".repeat(30), "B".repeat(30));
        let chunks = chunk(&text, 40, 0);

        assert_eq!(chunks, vec![format!("{}\n\n", "A".repeat(30)), "B".repeat(30)]);
    }

    #[test]
    fn test_prefers_sentence_over_word() {
        let text = "One two three. Four five six. Seven eight nine.";
        let chunks = chunk(text, 35, 0);

        assert_eq!(chunks, vec!["One two three. Four five six. ", "Seven eight nine."]);
    }

    #[test]
    fn test_falls_back_to_word_break() {
        let chunks = chunk("alpha beta gamma delta", 12, 0);
        assert_eq!(chunks, vec!["alpha beta ", "gamma delta"]);
    }

    #[test]
    fn test_overlap_snaps_to_word_start() {
        let text = "alpha beta gamma delta epsilon zeta eta theta";
        let chunker = TextChunker::new(20, 8);
        let spans = chunker.chunk_spans(text);

        assert!(spans.len() > 1);
        for pair in spans.windows(2) {
            let next = pair[1];
            assert!(next.start <= pair[0].end);
            assert!(is_word_start(text, next.start));
        }
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let text = "é".repeat(30);
        for piece in chunk(&text, 10, 3) {
            assert!(piece.chars().count() <= 10);
        }
    }

    /// Rebuild `text` from spans, dropping each span's overlap with its predecessor
    /// and checking that anything between spans is whitespace
    fn rebuild_from_spans(text: &str, spans: &[ChunkSpan]) -> String {
        let mut rebuilt = String::new();
        let mut covered = 0;
        for span in spans {
            assert!(span.end > covered, "span {:?} ends inside covered text", span);
            if span.start > covered {
                assert!(text[covered..span.start].trim().is_empty(), "gap {:?}", &text[covered..span.start]);
                covered = span.start;
            }
            rebuilt.push_str(&text[covered..span.end]);
            covered = span.end;
        }
        assert!(text[covered..].trim().is_empty());
        rebuilt
    }

    fn without_whitespace(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn test_whitespace_windows_leave_only_whitespace_gaps() {
        let text = "é.\r\n\t\n\n\n\ta";
        let spans = TextChunker::new(1, 0).chunk_spans(text);
        let rebuilt = rebuild_from_spans(text, &spans);
        assert_eq!(without_whitespace(&rebuilt), "é.a");
        assert!(spans.iter().all(|s| !s.as_str(text).trim().is_empty()));

        let text = "Clause one.\n\n\n\n\n\n\n\n\n\nClause two.";
        let spans = TextChunker::new(4, 1).chunk_spans(text);
        let rebuilt = rebuild_from_spans(text, &spans);
        assert_eq!(without_whitespace(&rebuilt), without_whitespace(text));
    }

    fn spaced_text() -> impl Strategy<Value = String> {
        prop::collection::vec(prop_oneof![Just("a"), Just("é"), Just("."), Just(" "), Just("\n"), Just("\t"), Just("\r\n")], 0..80)
            .prop_map(|parts| parts.concat())
    }

    fn document_text() -> impl Strategy<Value = String> {
        let word = "[a-zé]{1,8}";
        let sep = prop_oneof![Just(" "), Just("\n"), Just("\n\n"), Just(". "), Just(", ")];
        prop::collection::vec((word, sep), 0..200).prop_map(|parts| {
            parts
                .into_iter()
                .map(|(w, s)| format!("{}{}", w, s))
                .collect::<String>()
        })
    }

    fn size_and_overlap() -> impl Strategy<Value = (usize, usize)> {
        (20usize..200).prop_flat_map(|size| (Just(size), 0..size))
    }

    proptest! {
        #[test]
        fn prop_chunks_never_exceed_max_size(text in document_text(), (size, overlap) in size_and_overlap()) {
            for piece in chunk(&text, size, overlap) {
                prop_assert!(piece.chars().count() <= size);
            }
        }

        #[test]
        fn prop_stripping_overlap_rebuilds_text(text in document_text(), (size, overlap) in size_and_overlap()) {
            let spans = TextChunker::new(size, overlap).chunk_spans(&text);
            if text.trim().is_empty() {
                prop_assert!(spans.is_empty());
                return Ok(());
            }

            prop_assert_eq!(spans[0].start, 0);
            let mut rebuilt = spans[0].as_str(&text).to_string();
            for pair in spans.windows(2) {
                let (prev, next) = (pair[0], pair[1]);
                prop_assert!(next.start > prev.start);
                prop_assert!(next.start <= prev.end);
                prop_assert!(text[next.start..prev.end].chars().count() <= overlap);
                rebuilt.push_str(&text[prev.end..next.end]);
            }

            let last = spans[spans.len() - 1];
            prop_assert_eq!(rebuilt.as_str(), &text[..last.end]);
            prop_assert!(text[last.end..].trim().is_empty());
        }

        #[test]
        fn prop_small_windows_only_skip_whitespace(text in spaced_text(), (size, overlap) in (1usize..8).prop_flat_map(|size| (Just(size), 0..size))) {
            let spans = TextChunker::new(size, overlap).chunk_spans(&text);
            for pair in spans.windows(2) {
                prop_assert!(pair[1].start > pair[0].start);
            }
            let rebuilt = rebuild_from_spans(&text, &spans);
            prop_assert_eq!(without_whitespace(&rebuilt), without_whitespace(&text));
        }

        #[test]
        fn prop_chunking_is_deterministic(text in document_text(), (size, overlap) in size_and_overlap()) {
            prop_assert_eq!(chunk(&text, size, overlap), chunk(&text, size, overlap));
        }
    }
}
