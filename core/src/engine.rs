use crate::bool_query::{parse, BoolQuery, BoolQueryGroup, Operator};
use crate::docset::{intersect, subtract, union};
use crate::result::{sort_results, SearchResult};
use crate::tokenizer::terms;
use crate::{DocId, EngineConfig, IndexArtifacts};
use std::collections::HashMap;
use std::sync::Arc;

/// Answers boolean and vector-space queries against one collection.
///
/// Cloning is cheap: the index artifacts are shared and never mutated, so
/// clones (or `&Engine` across threads) can serve queries concurrently.
#[derive(Debug, Clone)]
pub struct Engine {
    name: String,
    artifacts: Arc<IndexArtifacts>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(name: impl Into<String>, artifacts: Arc<IndexArtifacts>, config: EngineConfig) -> Self {
        Self { name: name.into(), artifacts, config }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn artifacts(&self) -> &IndexArtifacts {
        &self.artifacts
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Ascending ids of documents matching the boolean expression `query`.
    pub fn bool_search(&self, query: &str) -> Vec<DocId> {
        let evaluated = self.bool_evaluate(query);
        let res = evaluated.result().map(<[DocId]>::to_vec).unwrap_or_default();
        tracing::debug!(collection = %self.name, query, hits = res.len(), "boolean search");
        res
    }

    /// Parse `query`, wrap it in a pass-through group and evaluate it, returning
    /// the evaluated tree.
    pub fn bool_evaluate(&self, query: &str) -> BoolQueryGroup {
        let root = BoolQueryGroup::new(Operator::Ret, vec![parse(query)]);
        self.evaluate_group(&root)
    }

    fn evaluate_group(&self, group: &BoolQueryGroup) -> BoolQueryGroup {
        let mut children = Vec::with_capacity(group.children().len());
        let mut sub_results: Vec<Vec<DocId>> = Vec::with_capacity(group.children().len());
        for child in group.children() {
            match child {
                BoolQuery::Term(term) => {
                    let docs = self
                        .artifacts
                        .term_id(term)
                        .map(|tid| self.artifacts.term_docs(tid))
                        .unwrap_or_default();
                    sub_results.push(docs);
                    children.push(child.clone());
                }
                BoolQuery::Missing => {
                    sub_results.push(Vec::new());
                    children.push(BoolQuery::Missing);
                }
                BoolQuery::Group(sub) => {
                    let evaluated = self.evaluate_group(sub);
                    sub_results.push(evaluated.result().map(<[DocId]>::to_vec).unwrap_or_default());
                    children.push(BoolQuery::Group(evaluated));
                }
            }
        }
        let res = self.combine(group.operator(), sub_results);
        group.evaluated(children, res)
    }

    fn combine(&self, op: Operator, sub_results: Vec<Vec<DocId>>) -> Vec<DocId> {
        match op {
            Operator::And => intersect(&sub_results),
            Operator::Or => union(&sub_results),
            Operator::Not => subtract(&self.artifacts.universe(), &sub_results),
            Operator::Ret => sub_results.into_iter().flatten().collect(),
        }
    }

    /// Rank documents by TF-IDF cosine similarity with `query`.
    pub fn vect_search(&self, query: &str) -> Vec<SearchResult> {
        let q_terms = terms(query);
        if q_terms.is_empty() {
            return Vec::new();
        }
        let total = q_terms.len() as f64;

        // distinct terms with occurrence counts, in first-occurrence order
        let mut distinct: Vec<(&str, u32)> = Vec::new();
        let mut slot: HashMap<&str, usize> = HashMap::new();
        for term in &q_terms {
            match slot.get(term.as_str()) {
                Some(&i) => distinct[i].1 += 1,
                None => {
                    slot.insert(term.as_str(), distinct.len());
                    distinct.push((term.as_str(), 1));
                }
            }
        }

        let index = &self.artifacts;
        let mut q_norm_factor = 0.0f64;
        let mut scores: HashMap<DocId, f64> = HashMap::new();
        let mut matched_terms = 0usize;
        for (term, occurrences) in distinct {
            let Some(tid) = index.term_id(term) else { continue };
            let Some(idf) = index.idf(tid) else { continue };
            matched_terms += 1;
            let tf = occurrences as f64 / total;
            let q_weight = tf * idf;
            q_norm_factor += q_weight * q_weight;

            for p in index.postings(tid) {
                let Some(norm) = index.doc_norm(p.doc_id) else { continue };
                let doc_weight = norm * p.tf * idf;
                *scores.entry(p.doc_id).or_insert(0.0) += doc_weight * doc_weight;
            }
        }

        if q_norm_factor == 0.0 {
            tracing::debug!(collection = %self.name, query, "no query term in vocabulary");
            return Vec::new();
        }
        let q_len = q_norm_factor.sqrt();

        let mut res: Vec<SearchResult> = scores
            .into_iter()
            .filter(|(_, score)| *score != 0.0)
            .filter_map(|(doc_id, score)| {
                let norm = index.doc_norm(doc_id).filter(|n| *n > 0.0)?;
                let normed = score / (q_len * norm.sqrt());
                (normed > self.config.min_score).then_some(SearchResult { doc_id, score: normed })
            })
            .collect();
        sort_results(&mut res);

        tracing::debug!(
            collection = %self.name,
            query,
            query_terms = q_terms.len(),
            matched_terms,
            hits = res.len(),
            "vector search"
        );
        res
    }
}
