pub mod bool_query;
pub mod collection;
pub mod config;
pub mod docset;
pub mod engine;
pub mod federation;
pub mod index;
pub mod indexer;
pub mod ingest;
pub mod result;
pub mod tokenizer;

pub use bool_query::{BoolQuery, BoolQueryGroup, Operator};
pub use collection::{Collection, Document};
pub use config::{EngineConfig, MINIMUM_SCORE};
pub use engine::Engine;
pub use federation::SuperEngine;
pub use index::*;
pub use indexer::Indexer;
pub use ingest::CollectionLoader;
pub use result::{compare_results, SearchResult};

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

/// Load every input as its own collection, index each one and federate them.
pub fn build_federation<P: AsRef<Path>>(inputs: &[P], config: EngineConfig) -> Result<SuperEngine> {
    let collections = CollectionLoader::new().load_all(inputs)?;
    let mut engines = Vec::with_capacity(collections.len());
    for col in &collections {
        let artifacts = Indexer::new(col).build()?;
        engines.push(Engine::new(col.name.clone(), Arc::new(artifacts), config));
    }
    SuperEngine::new(engines)
}
