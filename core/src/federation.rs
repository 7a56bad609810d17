//! Federated ranking across independently indexed collections.

use crate::engine::Engine;
use crate::result::{sort_results, SearchResult};
use crate::{DocId, DocMeta};
use anyhow::{bail, Result};
use rayon::prelude::*;
use std::collections::HashMap;

/// Owns one [`Engine`] per collection and merges their vector rankings.
#[derive(Debug, Clone, Default)]
pub struct SuperEngine {
    engines: Vec<Engine>,
    // doc id -> index into `engines`
    owners: HashMap<DocId, usize>,
}

impl SuperEngine {
    /// Fails when two engines share a name or register the same document id,
    /// since merged results identify documents by id alone.
    pub fn new(engines: Vec<Engine>) -> Result<Self> {
        let mut owners: HashMap<DocId, usize> = HashMap::new();
        for (i, engine) in engines.iter().enumerate() {
            if engines[..i].iter().any(|e| e.name() == engine.name()) {
                bail!("duplicate collection name {}", engine.name());
            }
            for &doc_id in engine.artifacts().docs().keys() {
                if let Some(&prev) = owners.get(&doc_id) {
                    bail!(
                        "document id {doc_id} registered by both {} and {}",
                        engines[prev].name(),
                        engine.name()
                    );
                }
                owners.insert(doc_id, i);
            }
        }
        tracing::info!(collections = engines.len(), num_docs = owners.len(), "federation ready");
        Ok(Self { engines, owners })
    }

    /// Vector search on every member in parallel, merged by score.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        let mut res: Vec<SearchResult> = self
            .engines
            .par_iter()
            .map(|engine| engine.vect_search(query))
            .flatten_iter()
            .collect();
        sort_results(&mut res);
        res
    }

    /// Boolean search is per collection only.
    pub fn bool_search(&self, collection: &str, query: &str) -> Option<Vec<DocId>> {
        self.engine(collection).map(|e| e.bool_search(query))
    }

    pub fn engines(&self) -> &[Engine] {
        &self.engines
    }

    pub fn engine(&self, name: &str) -> Option<&Engine> {
        self.engines.iter().find(|e| e.name() == name)
    }

    pub fn doc(&self, doc_id: DocId) -> Option<&DocMeta> {
        let owner = *self.owners.get(&doc_id)?;
        self.engines[owner].artifacts().doc(doc_id)
    }

    /// Name of the collection holding `doc_id`.
    pub fn collection_of(&self, doc_id: DocId) -> Option<&str> {
        self.owners.get(&doc_id).map(|&i| self.engines[i].name())
    }

    pub fn num_docs(&self) -> usize {
        self.owners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;
    use crate::indexer::Indexer;
    use crate::EngineConfig;
    use std::sync::Arc;

    fn engine(name: &str, first_id: DocId, texts: &[&str]) -> Engine {
        let col = Collection::from_texts(name, first_id, texts);
        Engine::new(name, Arc::new(Indexer::new(&col).build().unwrap()), EngineConfig::default())
    }

    #[test]
    fn rejects_overlapping_doc_ids() {
        let err = SuperEngine::new(vec![engine("a", 1, &["cat"]), engine("b", 1, &["dog"])]).unwrap_err();
        assert!(err.to_string().contains("document id 1"));
    }

    #[test]
    fn rejects_duplicate_names() {
        assert!(SuperEngine::new(vec![engine("a", 1, &["cat"]), engine("a", 2, &["dog"])]).is_err());
    }

    #[test]
    fn registry_lookup_spans_members() {
        let fed = SuperEngine::new(vec![engine("a", 1, &["cat"]), engine("b", 10, &["dog"])]).unwrap();
        assert_eq!(fed.num_docs(), 2);
        assert_eq!(fed.collection_of(10), Some("b"));
        assert_eq!(fed.doc(1).map(|m| m.title.as_str()), Some("doc 1"));
        assert!(fed.doc(5).is_none());
        assert_eq!(fed.bool_search("b", "dog"), Some(vec![10]));
        assert_eq!(fed.bool_search("z", "dog"), None);
    }

    #[test]
    fn empty_federation_answers_nothing() {
        let fed = SuperEngine::new(Vec::new()).unwrap();
        assert!(fed.search("cat").is_empty());
    }
}
