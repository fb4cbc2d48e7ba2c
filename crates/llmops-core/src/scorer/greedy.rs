//! Greedy token matching in embedding space.
//!
//! Each text is split into tokens and every token is embedded. Precision is
//! the mean, over hypothesis tokens, of the best cosine similarity to any
//! reference token; recall is the same in the other direction; F-measure is
//! their harmonic mean. The quality of the score depends entirely on the
//! [`TokenEmbedder`]; the built-in [`HashedTrigramEmbedder`] gives a cheap,
//! deterministic, lexical notion of similarity.

use super::{PairScore, ScorerError, SimilarityScorer};

/// Maps a token to a vector. Vectors need not be normalised.
pub trait TokenEmbedder: Send + Sync {
    fn name(&self) -> &str;

    fn embed(&self, token: &str) -> Vec<f64>;
}

/// Embeds a token as hashed counts of its character trigrams.
///
/// The token is padded with `^` and `$` so that short tokens still yield at
/// least one trigram. All components are non-negative, so cosine similarity
/// stays within `[0, 1]`.
#[derive(Debug, Clone)]
pub struct HashedTrigramEmbedder {
    dimension: usize,
}

impl HashedTrigramEmbedder {
    pub const DEFAULT_DIMENSION: usize = 1024;

    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }
}

impl Default for HashedTrigramEmbedder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSION)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(PRIME))
}

impl TokenEmbedder for HashedTrigramEmbedder {
    fn name(&self) -> &str {
        "hashed-trigram"
    }

    fn embed(&self, token: &str) -> Vec<f64> {
        let padded: Vec<char> = format!("^{token}$").chars().collect();
        let mut vector = vec![0.0; self.dimension];
        for window in padded.windows(3) {
            let trigram: String = window.iter().collect();
            let bucket = (fnv1a(trigram.as_bytes()) % self.dimension as u64) as usize;
            vector[bucket] += 1.0;
        }
        vector
    }
}

/// BERTScore-style greedy matcher over a pluggable embedder.
#[derive(Debug, Clone)]
pub struct GreedyMatchScorer<E = HashedTrigramEmbedder> {
    embedder: E,
    name: String,
}

impl<E: TokenEmbedder> GreedyMatchScorer<E> {
    pub fn new(embedder: E) -> Self {
        let name = format!("greedy-match/{}", embedder.name());
        Self { embedder, name }
    }

    fn embed_text(&self, text: &str) -> Vec<Vec<f64>> {
        tokenize(text)
            .map(|token| normalize(self.embedder.embed(&token)))
            .collect()
    }

    fn score_pair(&self, hypothesis: &str, reference: &str) -> PairScore {
        let hyp = self.embed_text(hypothesis);
        let refs = self.embed_text(reference);

        match (hyp.is_empty(), refs.is_empty()) {
            (true, true) => {
                return PairScore {
                    precision: 1.0,
                    recall: 1.0,
                    f_measure: 1.0,
                }
            }
            (true, false) | (false, true) => {
                return PairScore {
                    precision: 0.0,
                    recall: 0.0,
                    f_measure: 0.0,
                }
            }
            (false, false) => {}
        }

        let precision = greedy_match(&hyp, &refs);
        let recall = greedy_match(&refs, &hyp);
        let f_measure = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        PairScore {
            precision,
            recall,
            f_measure: f_measure.clamp(0.0, 1.0),
        }
    }
}

impl Default for GreedyMatchScorer<HashedTrigramEmbedder> {
    fn default() -> Self {
        Self::new(HashedTrigramEmbedder::default())
    }
}

impl<E: TokenEmbedder> SimilarityScorer for GreedyMatchScorer<E> {
    fn name(&self) -> &str {
        &self.name
    }

    fn score_pairs(
        &self,
        hypotheses: &[String],
        references: &[String],
    ) -> Result<Vec<PairScore>, ScorerError> {
        if hypotheses.len() != references.len() {
            return Err(ScorerError {
                backend: self.name.clone(),
                reason: format!(
                    "{} hypotheses vs {} references",
                    hypotheses.len(),
                    references.len()
                ),
            });
        }
        Ok(hypotheses
            .iter()
            .zip(references)
            .map(|(h, r)| self.score_pair(h, r))
            .collect())
    }
}

/// Lower-cased alphanumeric runs.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn normalize(mut vector: Vec<f64>) -> Vec<f64> {
    let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|v| *v /= norm);
    }
    vector
}

/// Mean over `from` of the best similarity to any vector in `to`.
fn greedy_match(from: &[Vec<f64>], to: &[Vec<f64>]) -> f64 {
    let total: f64 = from
        .iter()
        .map(|a| {
            to.iter()
                .map(|b| a.iter().zip(b).map(|(x, y)| x * y).sum::<f64>())
                .fold(0.0_f64, f64::max)
                .clamp(0.0, 1.0)
        })
        .sum();
    (total / from.len() as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn scorer() -> GreedyMatchScorer {
        GreedyMatchScorer::default()
    }

    #[test]
    fn identical_texts_score_one() {
        let scorer = scorer();
        let refs = texts(&["a cat sat", "dog ran"]);
        let scores = scorer.score_pairs(&refs, &refs).unwrap();
        for s in scores {
            assert!((s.f_measure - 1.0).abs() < 1e-9, "{s:?}");
        }
    }

    #[test]
    fn case_and_punctuation_ignored() {
        let scorer = scorer();
        let scores = scorer
            .score_pairs(&texts(&["The Dog, ran!"]), &texts(&["the dog ran"]))
            .unwrap();
        assert!((scores[0].f_measure - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unrelated_texts_score_lower_than_related() {
        let scorer = scorer();
        let scores = scorer
            .score_pairs(
                &texts(&["the cat sat on the mat", "quantum flux capacitor"]),
                &texts(&["a cat sat on a mat", "a cat sat on a mat"]),
            )
            .unwrap();
        assert!(scores[0].f_measure > scores[1].f_measure);
        assert!(scores[1].f_measure < 0.5);
    }

    #[test]
    fn empty_texts() {
        let scorer = scorer();
        let scores = scorer
            .score_pairs(&texts(&["", "", "words"]), &texts(&["", "words", ""]))
            .unwrap();
        assert_eq!(scores[0].f_measure, 1.0);
        assert_eq!(scores[1].f_measure, 0.0);
        assert_eq!(scores[2].f_measure, 0.0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let scorer = scorer();
        let hyps = texts(&["model output one", "second answer"]);
        let refs = texts(&["reference output", "the second answer"]);
        assert_eq!(
            scorer.score_pairs(&hyps, &refs).unwrap(),
            scorer.score_pairs(&hyps, &refs).unwrap()
        );
    }

    #[test]
    fn embedder_pads_short_tokens() {
        let embedder = HashedTrigramEmbedder::new(64);
        let v = embedder.embed("a");
        assert_eq!(v.iter().sum::<f64>(), 1.0);
    }
}
