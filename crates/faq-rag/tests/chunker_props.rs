//! Property tests for the recursive text splitter

use faq_rag::ingestion::RecursiveTextSplitter;
use proptest::prelude::*;

/// Words separated by spaces, newlines and blank lines
fn arb_document() -> impl Strategy<Value = (String, Vec<String>)> {
    proptest::collection::vec(("[a-z]{1,12}", prop_oneof![Just(" "), Just("\n"), Just("\n\n")]), 1..600)
        .prop_map(|parts| {
            let words: Vec<String> = parts.iter().map(|(w, _)| w.clone()).collect();
            let text: String = parts.iter().map(|(w, sep)| format!("{}{}", w, sep)).collect();
            (text, words)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn chunks_never_exceed_chunk_size(text in "\\PC{0,4000}") {
        let splitter = RecursiveTextSplitter::default();
        for chunk in splitter.split_text(&text) {
            prop_assert!(chunk.chars().count() <= 1000);
            prop_assert!(!chunk.is_empty());
            prop_assert_eq!(chunk.trim(), chunk.as_str());
        }
    }

    #[test]
    fn every_word_survives_splitting((text, words) in arb_document()) {
        let splitter = RecursiveTextSplitter::new(200, 40);
        let chunks = splitter.split_text(&text);

        for chunk in &chunks {
            prop_assert!(chunk.chars().count() <= 200);
        }
        for word in &words {
            prop_assert!(chunks.iter().any(|c| c.contains(word.as_str())));
        }
    }

    #[test]
    fn consecutive_chunks_overlap_at_most_overlap(len in 1001usize..5000) {
        let text: String = (0..len).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let chunks = RecursiveTextSplitter::default().split_text(&text);

        prop_assert!(chunks.len() >= 2);
        for pair in chunks.windows(2) {
            // Unbroken text: the next chunk begins with exactly the overlap tail
            let tail: String = pair[0].chars().skip(800).collect();
            prop_assert!(pair[1].starts_with(&tail));
            prop_assert_eq!(tail.chars().count(), 200);
        }
    }
}
