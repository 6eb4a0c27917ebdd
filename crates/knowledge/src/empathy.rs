//! Empathetic response selection.
//!
//! Maps an emotion tag to a canned phrase from the utterance corpus. Tags are
//! compared after trimming and lowercasing both sides; there is no fuzzy
//! matching. When several utterances share a tag, one is picked uniformly at
//! random on every call.

use crate::types::{EmpatheticUtterance, DEFAULT_EMOTION};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use std::sync::{Arc, Mutex};

/// Phrase returned when no utterance carries the requested tag.
pub const DEFAULT_EMPATHETIC_PHRASE: &str = "I'm here to help in any way I can.";

/// Normalize an emotion tag for comparison.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Selects a canned phrase for an emotion tag. Never fails.
pub struct EmpatheticSelector {
    utterances: Arc<[EmpatheticUtterance]>,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl std::fmt::Debug for EmpatheticSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmpatheticSelector")
            .field("utterances", &self.utterances.len())
            .finish()
    }
}

impl EmpatheticSelector {
    /// Create a selector seeded from OS entropy.
    pub fn new(utterances: Arc<[EmpatheticUtterance]>) -> Self {
        Self::with_rng(utterances, StdRng::from_entropy())
    }

    /// Create a selector with a fixed seed.
    pub fn seeded(utterances: Arc<[EmpatheticUtterance]>, seed: u64) -> Self {
        Self::with_rng(utterances, StdRng::seed_from_u64(seed))
    }

    /// Create a selector with a caller-supplied random source.
    pub fn with_rng(utterances: Arc<[EmpatheticUtterance]>, rng: impl RngCore + Send + 'static) -> Self {
        Self {
            utterances,
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// All utterances whose tag matches `tag` after normalization.
    pub fn candidates(&self, tag: &str) -> Vec<&str> {
        let wanted = normalize_tag(tag);
        self.utterances
            .iter()
            .filter(|entry| normalize_tag(&entry.tags) == wanted)
            .map(|entry| entry.utterance.as_str())
            .collect()
    }

    /// Pick a phrase for `emotion_tag`; `None` means `"neutral"`.
    pub fn select(&self, emotion_tag: Option<&str>) -> String {
        tracing::info!("Emotion tag received: {:?}", emotion_tag);

        let tag = match emotion_tag {
            Some(tag) => tag,
            None => {
                tracing::warn!("Received no emotion tag; defaulting to '{}'", DEFAULT_EMOTION);
                DEFAULT_EMOTION
            }
        };

        let candidates = self.candidates(tag);

        // A poisoned lock still holds a usable generator
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        match candidates.choose(&mut **rng) {
            Some(utterance) => utterance.to_string(),
            None => {
                tracing::warn!("No matches found for tag '{}'; returning default response", tag);
                DEFAULT_EMPATHETIC_PHRASE.to_string()
            }
        }
    }
}
