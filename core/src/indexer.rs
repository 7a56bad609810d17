use crate::collection::Collection;
use crate::{DocId, DocMeta, IndexArtifacts, Posting, TermId};
use anyhow::Result;
use std::collections::{BTreeMap, HashMap};

/// Builds TF-IDF index artifacts for one collection.
pub struct Indexer<'a> {
    collection: &'a Collection,
}

impl<'a> Indexer<'a> {
    pub fn new(collection: &'a Collection) -> Self {
        Self { collection }
    }

    pub fn build(&self) -> Result<IndexArtifacts> {
        let col = self.collection;
        let dictionary = col.build_vocabulary();

        let mut df: HashMap<TermId, u32> = HashMap::new();
        let mut postings_raw: HashMap<TermId, Vec<Posting>> = HashMap::new();
        let mut doc_terms: HashMap<DocId, Vec<(TermId, f64)>> = HashMap::new();
        let mut docs: BTreeMap<DocId, DocMeta> = BTreeMap::new();

        for doc in col.documents() {
            let mut tf_counts: BTreeMap<TermId, u32> = BTreeMap::new();
            for token in &doc.tokens {
                if let Some(&tid) = dictionary.get(token) {
                    *tf_counts.entry(tid).or_insert(0) += 1;
                }
            }
            let entry = doc_terms.entry(doc.id).or_default();
            for (tid, tf_raw) in tf_counts {
                *df.entry(tid).or_insert(0) += 1;
                postings_raw.entry(tid).or_default().push(Posting { doc_id: doc.id, tf: tf_raw as f64 });
                entry.push((tid, tf_raw as f64));
            }
            docs.insert(doc.id, doc.meta.clone());
        }

        // Smoothed idf stays positive even for terms present in every document.
        let n = col.len().max(1) as f64;
        let idf: HashMap<TermId, f64> = df
            .iter()
            .map(|(&tid, &df_t)| (tid, (1.0 + n / df_t.max(1) as f64).ln()))
            .collect();

        let mut doc_norms: HashMap<DocId, f64> = HashMap::with_capacity(docs.len());
        for doc_id in docs.keys() {
            let sq: f64 = doc_terms
                .get(doc_id)
                .map(|ts| ts.iter().map(|(tid, tf)| (tf * idf[tid]).powi(2)).sum())
                .unwrap_or(0.0);
            let norm = if sq > 0.0 { 1.0 / sq.sqrt() } else { 1.0 };
            doc_norms.insert(*doc_id, norm);
        }

        let artifacts = IndexArtifacts::new(dictionary, postings_raw, idf, doc_norms, docs)?;
        tracing::info!(
            collection = %col.name,
            num_docs = artifacts.num_docs(),
            num_terms = artifacts.num_terms(),
            num_postings = artifacts.num_postings(),
            size_kb = artifacts.approx_size_bytes() / 1024,
            "index build complete"
        );
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_tables_for_every_document() {
        let col = Collection::from_texts("pets", 1, &["cat dog", "dog dog", "the"]);
        let a = Indexer::new(&col).build().unwrap();
        assert_eq!(a.universe(), vec![1, 2, 3]);
        let dog = a.term_id("dog").unwrap();
        let cat = a.term_id("cat").unwrap();
        assert_eq!(a.term_docs(dog), vec![1, 2]);
        assert_eq!(a.postings(dog)[1].tf, 2.0);
        assert!((a.idf(dog).unwrap() - 2.5f64.ln()).abs() < 1e-12);
        assert!((a.idf(cat).unwrap() - 4f64.ln()).abs() < 1e-12);
        // stopword-only document keeps a unit norm
        assert_eq!(a.doc_norm(3), Some(1.0));
    }

    #[test]
    fn idf_positive_when_term_in_every_document() {
        let col = Collection::from_texts("pets", 1, &["dog", "dog"]);
        let a = Indexer::new(&col).build().unwrap();
        let dog = a.term_id("dog").unwrap();
        assert!((a.idf(dog).unwrap() - 2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn norm_is_inverse_vector_length() {
        let col = Collection::from_texts("pets", 1, &["dog dog", "cat"]);
        let a = Indexer::new(&col).build().unwrap();
        let dog = a.term_id("dog").unwrap();
        let w = 2.0 * a.idf(dog).unwrap();
        assert!((a.doc_norm(1).unwrap() - 1.0 / w).abs() < 1e-12);
    }
}
