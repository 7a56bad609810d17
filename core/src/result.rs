use crate::DocId;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    pub doc_id: DocId,
    pub score: f64,
}

/// Score descending, then doc id ascending.
pub fn compare_results(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| a.doc_id.cmp(&b.doc_id))
}

pub fn sort_results(results: &mut [SearchResult]) {
    results.sort_by(compare_results);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_break_on_doc_id() {
        let mut r = vec![
            SearchResult { doc_id: 9, score: 0.5 },
            SearchResult { doc_id: 3, score: 0.5 },
            SearchResult { doc_id: 4, score: 0.9 },
        ];
        sort_results(&mut r);
        let ids: Vec<_> = r.iter().map(|r| r.doc_id).collect();
        assert_eq!(ids, vec![4, 3, 9]);
    }
}
