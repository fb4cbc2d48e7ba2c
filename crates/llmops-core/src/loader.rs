//! Corpus loading from blob storage.

use std::sync::Arc;

use llmops_io::{BlobLocation, BlobStore};

use crate::domain::{Corpus, GateError, Result};

/// Reads corpora stored as JSON arrays of strings.
#[derive(Clone)]
pub struct CorpusLoader {
    store: Arc<dyn BlobStore>,
}

impl CorpusLoader {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// Fetch and parse the corpus at `location`.
    ///
    /// Storage failures surface as [`GateError::Collaborator`]; anything that
    /// is not a non-empty JSON array of strings is a
    /// [`GateError::CorpusFormat`].
    pub async fn load(&self, location: &BlobLocation) -> Result<Corpus> {
        let bytes = self.store.get_location(location).await?;
        let corpus = parse_corpus(location, &bytes)?;
        crate::obs::emit_corpus_loaded(&location.to_string(), corpus.len());
        Ok(corpus)
    }
}

impl std::fmt::Debug for CorpusLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorpusLoader").finish_non_exhaustive()
    }
}

fn parse_corpus(location: &BlobLocation, bytes: &[u8]) -> Result<Corpus> {
    let format_error = |reason: String| GateError::CorpusFormat {
        location: location.to_string(),
        reason,
    };

    let text = std::str::from_utf8(bytes)
        .map_err(|e| format_error(format!("not valid UTF-8: {e}")))?;
    let texts: Vec<String> = serde_json::from_str(text)
        .map_err(|e| format_error(format!("expected a JSON array of strings: {e}")))?;
    Corpus::new(texts).map_err(|e| format_error(e.to_string()))
}
