use crate::collection::Collection;
use crate::{DocId, DocMeta};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: String,
    title: String,
    body: String,
    url: Option<String>,
}

/// Loads JSON/JSONL inputs into collections, handing out document ids from a
/// single counter so ids never collide across the collections it produces.
#[derive(Debug, Default)]
pub struct CollectionLoader {
    next_doc_id: DocId,
}

impl CollectionLoader {
    pub fn new() -> Self { Self::default() }

    pub fn starting_at(first_id: DocId) -> Self {
        Self { next_doc_id: first_id }
    }

    /// One collection from a `.json`/`.jsonl` file or a directory of them.
    pub fn load(&mut self, input: &Path) -> Result<Collection> {
        let name = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("collection")
            .to_string();
        let mut col = Collection::new(name);

        let mut files: Vec<PathBuf> = Vec::new();
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
                let p = entry.path();
                if p.is_file() && matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl")) {
                    files.push(p.to_path_buf());
                }
            }
        } else if input.is_file() {
            files.push(input.to_path_buf());
        } else {
            anyhow::bail!("input {} does not exist", input.display());
        }

        for file in files {
            let loaded = if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
                self.load_jsonl(&file, &mut col)
            } else {
                self.load_json(&file, &mut col)
            };
            loaded.with_context(|| format!("loading {}", file.display()))?;
        }
        tracing::info!(collection = %col.name, num_docs = col.len(), "ingested documents");
        Ok(col)
    }

    /// Load each input as its own collection.
    pub fn load_all<P: AsRef<Path>>(&mut self, inputs: &[P]) -> Result<Vec<Collection>> {
        inputs.iter().map(|p| self.load(p.as_ref())).collect()
    }

    fn load_jsonl(&mut self, file: &Path, col: &mut Collection) -> Result<()> {
        let reader = BufReader::new(File::open(file)?);
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() { continue; }
            let doc: InputDoc = serde_json::from_str(&line).with_context(|| format!("line {}", lineno + 1))?;
            self.ingest_doc(doc, col)?;
        }
        Ok(())
    }

    fn load_json(&mut self, file: &Path, col: &mut Collection) -> Result<()> {
        let reader = BufReader::new(File::open(file)?);
        let json: serde_json::Value = serde_json::from_reader(reader)?;
        match json {
            serde_json::Value::Array(arr) => {
                for v in arr {
                    let doc: InputDoc = serde_json::from_value(v)?;
                    self.ingest_doc(doc, col)?;
                }
            }
            serde_json::Value::Object(_) => {
                let doc: InputDoc = serde_json::from_value(json)?;
                self.ingest_doc(doc, col)?;
            }
            _ => anyhow::bail!("expected a JSON object or array"),
        }
        Ok(())
    }

    fn ingest_doc(&mut self, doc: InputDoc, col: &mut Collection) -> Result<()> {
        let doc_id = self.next_doc_id;
        self.next_doc_id += 1;
        let text = format!("{}\n{}", doc.title, doc.body);
        col.push(doc_id, DocMeta { external_id: doc.id, title: doc.title, url: doc.url }, &text)
    }
}
