use crate::tokenizer::terms;
use crate::{DocId, DocMeta, TermId};
use anyhow::{bail, Result};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocId,
    pub meta: DocMeta,
    /// Normalized terms, stopwords already removed.
    pub tokens: Vec<String>,
}

/// An ordered set of tokenized documents, the unit the indexer consumes.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub name: String,
    documents: BTreeMap<DocId, Document>,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), documents: BTreeMap::new() }
    }

    /// Tokenize `text` and add it under `id`.
    pub fn push(&mut self, id: DocId, meta: DocMeta, text: &str) -> Result<()> {
        self.push_tokens(id, meta, terms(text))
    }

    pub fn push_tokens(&mut self, id: DocId, meta: DocMeta, tokens: Vec<String>) -> Result<()> {
        if self.documents.contains_key(&id) {
            bail!("collection {}: duplicate document id {id}", self.name);
        }
        self.documents.insert(id, Document { id, meta, tokens });
        Ok(())
    }

    /// Build a collection from raw texts with consecutive ids starting at `first_id`.
    pub fn from_texts<S: AsRef<str>>(name: impl Into<String>, first_id: DocId, texts: &[S]) -> Self {
        let mut col = Self::new(name);
        for (offset, text) in texts.iter().enumerate() {
            let id = first_id + offset as DocId;
            let meta = DocMeta { external_id: id.to_string(), title: format!("doc {id}"), url: None };
            col.documents.insert(id, Document { id, meta, tokens: terms(text.as_ref()) });
        }
        col
    }

    /// Documents in ascending id order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Assign term ids in first-occurrence order over documents in id order.
    pub fn build_vocabulary(&self) -> HashMap<String, TermId> {
        let mut vocab: HashMap<String, TermId> = HashMap::new();
        for doc in self.documents.values() {
            for token in &doc.tokens {
                let next = vocab.len() as TermId;
                vocab.entry(token.clone()).or_insert(next);
            }
        }
        vocab
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_ids_follow_first_occurrence() {
        let col = Collection::from_texts("c", 1, &["cat dog", "dog dog bird"]);
        let vocab = col.build_vocabulary();
        assert_eq!(vocab["cat"], 0);
        assert_eq!(vocab["dog"], 1);
        assert_eq!(vocab["bird"], 2);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut col = Collection::new("c");
        col.push(3, DocMeta::default(), "one").unwrap();
        assert!(col.push(3, DocMeta::default(), "two").is_err());
        assert_eq!(col.len(), 1);
    }
}
