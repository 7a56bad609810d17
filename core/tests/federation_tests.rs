use sift_core::{build_federation, Collection, DocId, Engine, EngineConfig, Indexer, SuperEngine};
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

fn engine(name: &str, first_id: DocId, texts: &[&str]) -> Engine {
    let col = Collection::from_texts(name, first_id, texts);
    Engine::new(name, Arc::new(Indexer::new(&col).build().unwrap()), EngineConfig::default())
}

#[test]
fn disjoint_single_document_collections() {
    let fed = SuperEngine::new(vec![
        engine("left", 1, &["rust rust systems"]),
        engine("right", 1000, &["rust"]),
    ])
    .unwrap();
    let res = fed.search("rust");
    let mut ids: Vec<DocId> = res.iter().map(|r| r.doc_id).collect();
    assert_eq!(res.len(), 2);
    assert!(res[0].score >= res[1].score);
    ids.sort();
    assert_eq!(ids, vec![1, 1000]);
}

#[test]
fn merge_equals_sorted_union_of_members() {
    let members = vec![
        engine("a", 1, &["cat dog", "dog dog", "bird"]),
        engine("b", 10, &["dog", "cat cat dog", "fish"]),
        engine("c", 20, &["zebra"]),
    ];
    let fed = SuperEngine::new(members.clone()).unwrap();

    for q in ["dog", "cat dog", "fish bird", "zebra", "nothing"] {
        let mut expected: Vec<_> = members.iter().flat_map(|e| e.vect_search(q)).collect();
        expected.sort_by(sift_core::compare_results);
        assert_eq!(fed.search(q), expected, "query {q}");
    }
}

#[test]
fn merged_order_is_total() {
    let fed = SuperEngine::new(vec![
        engine("a", 1, &["apple", "apple pear"]),
        engine("b", 3, &["apple", "apple pear"]),
    ])
    .unwrap();
    let res = fed.search("apple");
    for w in res.windows(2) {
        assert!(w[0].score > w[1].score || (w[0].score == w[1].score && w[0].doc_id < w[1].doc_id));
    }
    assert_eq!(res, fed.search("apple"));
}

#[test]
fn boolean_search_stays_per_collection() {
    let fed = SuperEngine::new(vec![engine("a", 1, &["cat"]), engine("b", 2, &["cat"])]).unwrap();
    assert_eq!(fed.bool_search("a", "cat"), Some(vec![1]));
    assert_eq!(fed.bool_search("b", "NOT cat"), Some(vec![]));
}

#[test]
fn builds_from_input_files() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("news.jsonl");
    let b = dir.path().join("blogs.json");
    fs::write(&a, "{\"id\":\"n1\",\"title\":\"Rust release\",\"body\":\"the rust compiler\"}\n").unwrap();
    fs::write(&b, r#"[{"id":"b1","title":"Gardening","body":"rust on leaves"},{"id":"b2","title":"Cooking","body":"pasta"}]"#).unwrap();

    let fed = build_federation(&[a, b], EngineConfig::default()).unwrap();
    assert_eq!(fed.engines().len(), 2);
    assert_eq!(fed.num_docs(), 3);
    let hits = fed.search("rust");
    assert_eq!(hits.len(), 2);
    let ext: Vec<&str> = hits.iter().map(|h| fed.doc(h.doc_id).unwrap().external_id.as_str()).collect();
    assert!(ext.contains(&"n1") && ext.contains(&"b1"));
    assert_eq!(fed.bool_search("blogs", "pasta OR rust"), Some(vec![1, 2]));
}
