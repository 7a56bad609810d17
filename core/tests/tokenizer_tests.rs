use sift_core::tokenizer::{terms, tokenize};

#[test]
fn it_normalizes_and_stems() {
    let toks = tokenize("Running Runners RUN! The café's menu.");
    let words: Vec<String> = toks.into_iter().map(|(w, _)| w).collect();
    // Stemming to "run" should appear
    assert!(words.contains(&"run".to_string()));
    // NFKC keeps the accent; lowercase + stem still collapse the case variants
    assert!(words.iter().any(|w| w.starts_with("caf")));
}

#[test]
fn it_filters_stopwords() {
    let toks = tokenize("The quick brown fox and the lazy dog");
    let words: Vec<String> = toks.into_iter().map(|(w, _)| w).collect();
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
}

#[test]
fn positions_count_dropped_words() {
    let toks = tokenize("the cat");
    assert_eq!(toks, vec![("cat".to_string(), 1)]);
}

#[test]
fn query_literals_match_document_terms() {
    let doc = terms("Searching indexes");
    for word in ["searching", "SEARCHES", "indexes"] {
        let t = terms(word);
        assert_eq!(t.len(), 1);
        assert!(doc.contains(&t[0]), "{word} -> {t:?} not in {doc:?}");
    }
}
