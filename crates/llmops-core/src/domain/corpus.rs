//! Evaluation corpora.

use std::sync::Arc;

use super::error::ValidationError;

/// Ordered, non-empty sequence of texts, one per evaluation example.
///
/// Corpora for one run are aligned by position: element `i` of the reference,
/// base and custom corpora all describe example `i`. Cloning shares the
/// underlying slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus(Arc<[String]>);

impl Corpus {
    pub fn new(texts: Vec<String>) -> Result<Self, ValidationError> {
        if texts.is_empty() {
            return Err(ValidationError::EmptyCorpus);
        }
        Ok(Self(texts.into()))
    }

    /// Build a corpus from anything yielding string-like items.
    pub fn from_texts<I, S>(texts: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(texts.into_iter().map(Into::into).collect())
    }

    pub fn texts(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl TryFrom<Vec<String>> for Corpus {
    type Error = ValidationError;

    fn try_from(texts: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(texts)
    }
}
