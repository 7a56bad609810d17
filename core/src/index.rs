use anyhow::{bail, Result};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub type TermId = u32;
pub type DocId = u32;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocMeta {
    pub external_id: String,
    pub title: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Posting {
    pub doc_id: DocId,
    pub tf: f64, // raw occurrence count of the term in the document
}

/// Everything the query engine reads: vocabulary, postings, IDF and norm tables
/// and the document registry. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct IndexArtifacts {
    vocabulary: HashMap<String, TermId>,
    postings: HashMap<TermId, Vec<Posting>>, // postings sorted by doc_id
    idf: HashMap<TermId, f64>,
    doc_norms: HashMap<DocId, f64>,
    docs: BTreeMap<DocId, DocMeta>,
}

impl IndexArtifacts {
    /// Assemble artifacts, checking the cross-table invariants the engine relies on.
    pub fn new(
        vocabulary: HashMap<String, TermId>,
        mut postings: HashMap<TermId, Vec<Posting>>,
        idf: HashMap<TermId, f64>,
        doc_norms: HashMap<DocId, f64>,
        docs: BTreeMap<DocId, DocMeta>,
    ) -> Result<Self> {
        for (term_id, plist) in postings.iter_mut() {
            match idf.get(term_id) {
                Some(v) if v.is_finite() && *v > 0.0 => {}
                Some(v) => bail!("term {term_id} has non-positive idf {v}"),
                None => bail!("term {term_id} has postings but no idf entry"),
            }
            plist.sort_by_key(|p| p.doc_id);
            if plist.windows(2).any(|w| w[0].doc_id == w[1].doc_id) {
                bail!("term {term_id} has duplicate postings for one document");
            }
            if let Some(p) = plist.iter().find(|p| !docs.contains_key(&p.doc_id)) {
                bail!("term {term_id} posts unregistered document {}", p.doc_id);
            }
        }
        for doc_id in docs.keys() {
            match doc_norms.get(doc_id) {
                Some(n) if n.is_finite() && *n > 0.0 => {}
                Some(n) => bail!("document {doc_id} has non-positive norm {n}"),
                None => bail!("document {doc_id} has no norm entry"),
            }
        }
        Ok(Self { vocabulary, postings, idf, doc_norms, docs })
    }

    pub fn term_id(&self, term: &str) -> Option<TermId> {
        self.vocabulary.get(term).copied()
    }

    pub fn postings(&self, term_id: TermId) -> &[Posting] {
        self.postings.get(&term_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ascending ids of documents with a non-zero frequency for `term_id`.
    pub fn term_docs(&self, term_id: TermId) -> Vec<DocId> {
        self.postings(term_id)
            .iter()
            .filter(|p| p.tf != 0.0)
            .map(|p| p.doc_id)
            .collect()
    }

    pub fn idf(&self, term_id: TermId) -> Option<f64> {
        self.idf.get(&term_id).copied()
    }

    pub fn doc_norm(&self, doc_id: DocId) -> Option<f64> {
        self.doc_norms.get(&doc_id).copied()
    }

    pub fn doc(&self, doc_id: DocId) -> Option<&DocMeta> {
        self.docs.get(&doc_id)
    }

    pub fn docs(&self) -> &BTreeMap<DocId, DocMeta> {
        &self.docs
    }

    /// All registered document ids, ascending.
    pub fn universe(&self) -> Vec<DocId> {
        self.docs.keys().copied().collect()
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    pub fn num_terms(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn num_postings(&self) -> usize {
        self.postings.values().map(Vec::len).sum()
    }

    /// Rough heap footprint of the tables, for build logs.
    pub fn approx_size_bytes(&self) -> usize {
        use std::mem::size_of;
        let vocab: usize = self
            .vocabulary
            .keys()
            .map(|k| k.len() + size_of::<String>() + size_of::<TermId>())
            .sum();
        let postings = self.num_postings() * size_of::<Posting>()
            + self.postings.len() * (size_of::<TermId>() + size_of::<Vec<Posting>>());
        let idf = self.idf.len() * (size_of::<TermId>() + size_of::<f64>());
        let norms = self.doc_norms.len() * (size_of::<DocId>() + size_of::<f64>());
        let docs: usize = self
            .docs
            .values()
            .map(|m| {
                size_of::<DocId>()
                    + size_of::<DocMeta>()
                    + m.external_id.len()
                    + m.title.len()
                    + m.url.as_ref().map_or(0, String::len)
            })
            .sum();
        vocab + postings + idf + norms + docs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_doc() -> (HashMap<String, TermId>, BTreeMap<DocId, DocMeta>) {
        let vocab = HashMap::from([("rust".to_string(), 0)]);
        let docs = BTreeMap::from([(7, DocMeta::default())]);
        (vocab, docs)
    }

    #[test]
    fn sorts_postings_on_construction() {
        let vocab = HashMap::from([("rust".to_string(), 0)]);
        let docs = BTreeMap::from([(1, DocMeta::default()), (2, DocMeta::default())]);
        let postings = HashMap::from([(0, vec![Posting { doc_id: 2, tf: 1.0 }, Posting { doc_id: 1, tf: 3.0 }])]);
        let idf = HashMap::from([(0, 0.5)]);
        let norms = HashMap::from([(1, 1.0), (2, 1.0)]);
        let a = IndexArtifacts::new(vocab, postings, idf, norms, docs).unwrap();
        assert_eq!(a.term_docs(0), vec![1, 2]);
        assert_eq!(a.universe(), vec![1, 2]);
    }

    #[test]
    fn rejects_missing_idf() {
        let (vocab, docs) = one_doc();
        let postings = HashMap::from([(0, vec![Posting { doc_id: 7, tf: 1.0 }])]);
        let err = IndexArtifacts::new(vocab, postings, HashMap::new(), HashMap::from([(7, 1.0)]), docs);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_missing_norm_and_unknown_doc() {
        let (vocab, docs) = one_doc();
        let postings = HashMap::from([(0, vec![Posting { doc_id: 7, tf: 1.0 }])]);
        let idf = HashMap::from([(0, 1.0)]);
        assert!(IndexArtifacts::new(vocab.clone(), postings, idf.clone(), HashMap::new(), docs.clone()).is_err());

        let stray = HashMap::from([(0, vec![Posting { doc_id: 8, tf: 1.0 }])]);
        assert!(IndexArtifacts::new(vocab, stray, idf, HashMap::from([(7, 1.0)]), docs).is_err());
    }

    #[test]
    fn zero_frequency_postings_are_not_members() {
        let (vocab, docs) = one_doc();
        let postings = HashMap::from([(0, vec![Posting { doc_id: 7, tf: 0.0 }])]);
        let a = IndexArtifacts::new(vocab, postings, HashMap::from([(0, 1.0)]), HashMap::from([(7, 1.0)]), docs).unwrap();
        assert!(a.term_docs(0).is_empty());
        assert_eq!(a.term_id("rust"), Some(0));
        assert_eq!(a.term_id("go"), None);
    }
}
