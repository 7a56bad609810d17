use sift_core::{DocId, SearchResult, SuperEngine};
use std::io::{self, Write};
use std::time::Duration;

/// Renders query results against the merged document registry.
pub struct Display<'a> {
    engine: &'a SuperEngine,
    top: usize,
}

impl<'a> Display<'a> {
    pub fn new(engine: &'a SuperEngine, top: usize) -> Self {
        Self { engine, top }
    }

    pub fn show_ranked(&self, out: &mut impl Write, res: &[SearchResult], elapsed: Duration) -> io::Result<()> {
        for (rank, r) in res.iter().take(self.top).enumerate() {
            writeln!(out, "{:>3}. [{}] {:.4}  {}", rank + 1, r.doc_id, r.score, self.title(r.doc_id))?;
        }
        self.footer(out, res.len(), elapsed)
    }

    pub fn show_boolean(&self, out: &mut impl Write, collection: &str, res: &[DocId], elapsed: Duration) -> io::Result<()> {
        writeln!(out, "== {collection}")?;
        for doc_id in res.iter().take(self.top) {
            writeln!(out, "  [{doc_id}] {}", self.title(*doc_id))?;
        }
        self.footer(out, res.len(), elapsed)
    }

    fn title(&self, doc_id: DocId) -> &str {
        self.engine.doc(doc_id).map(|m| m.title.as_str()).unwrap_or("<unknown>")
    }

    fn footer(&self, out: &mut impl Write, total: usize, elapsed: Duration) -> io::Result<()> {
        if total > self.top {
            writeln!(out, "  ... {} more", total - self.top)?;
        }
        writeln!(out, "{total} results in {elapsed:?}")?;
        writeln!(out, "----")
    }
}
