//! Local hashing embedder built from word and character-trigram features.

use crate::embeddings::provider::EmbeddingProvider;
use nurture_core::AppResult;
use std::collections::HashMap;

const STOP_WORDS: &[&str] = &[
    "the", "and", "are", "was", "were", "for", "with", "from", "this", "that", "have", "has",
    "had", "its", "their", "they", "them", "what", "which", "how", "can", "you", "your",
];

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Deterministic offline embedder.
///
/// Each content word contributes its whole-word hash and the hashes of its
/// boundary-padded trigrams, weighted by the square root of its frequency.
/// Vectors are L2-normalized; text without content words embeds to zeros.
#[derive(Debug)]
pub struct TrigramProvider {
    dimensions: usize,
}

impl TrigramProvider {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        for (word, count) in content_words(text) {
            let weight = (count as f32).sqrt();
            vector[self.bucket(word.as_bytes())] += weight;

            let padded: Vec<char> = format!("^{}$", word).chars().collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                vector[self.bucket(trigram.as_bytes())] += 0.5 * weight;
            }
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }

    fn bucket(&self, bytes: &[u8]) -> usize {
        let hash = bytes
            .iter()
            .fold(FNV_OFFSET, |acc, b| (acc ^ *b as u64).wrapping_mul(FNV_PRIME));
        (hash % self.dimensions as u64) as usize
    }
}

/// Lowercased alphanumeric words of three or more characters, minus stop words.
fn content_words(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for word in text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 2 && !STOP_WORDS.contains(w))
    {
        *counts.entry(word.to_string()).or_insert(0) += 1;
    }
    counts
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramProvider {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(v: &[f32]) -> f32 {
        v.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[tokio::test]
    async fn test_dimensions_and_normalization() {
        let provider = TrigramProvider::new(384);
        let embedding = provider.embed("Folic acid supports healthy development").await.unwrap();

        assert_eq!(embedding.len(), 384);
        assert!((norm(&embedding) - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_deterministic() {
        let provider = TrigramProvider::new(256);
        let first = provider.embed("signs of pregnancy").await.unwrap();
        let second = provider.embed("signs of pregnancy").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_punctuation_ignored() {
        let provider = TrigramProvider::new(256);
        let plain = provider.embed("signs pregnancy").await.unwrap();
        let punctuated = provider.embed("Signs... pregnancy?").await.unwrap();
        assert_eq!(plain, punctuated);
    }

    #[tokio::test]
    async fn test_related_text_scores_higher() {
        let provider = TrigramProvider::new(384);
        let query = provider.embed("What are the signs of pregnancy?").await.unwrap();
        let related = provider
            .embed("Common early signs of pregnancy include a missed period and nausea.")
            .await
            .unwrap();
        let unrelated = provider
            .embed("Postpartum recovery needs rest, hydration and gentle movement.")
            .await
            .unwrap();

        assert!(cosine(&query, &related) > cosine(&query, &unrelated));
    }

    #[tokio::test]
    async fn test_only_stop_words_embed_to_zero() {
        let provider = TrigramProvider::new(64);
        let embedding = provider.embed("what are the").await.unwrap();
        assert!(embedding.iter().all(|&x| x == 0.0));
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let provider = TrigramProvider::new(128);
        let texts = vec!["nausea".to_string(), "fatigue".to_string()];
        let batch = provider.embed_batch(&texts).await.unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], provider.embed("nausea").await.unwrap());
        assert_eq!(batch[1], provider.embed("fatigue").await.unwrap());
    }
}
