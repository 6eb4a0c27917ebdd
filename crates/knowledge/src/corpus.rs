//! Read-only corpora loaded once at startup.
//!
//! A corpus that is missing or unreadable degrades to an empty collection:
//! the failure is logged and the process keeps serving requests.

use crate::types::{EmpatheticUtterance, Resource};
use nurture_core::{AppError, AppResult};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

/// Immutable snapshots of both corpora, shared across requests.
#[derive(Debug, Clone, Default)]
pub struct Corpora {
    pub resources: Arc<[Resource]>,
    pub utterances: Arc<[EmpatheticUtterance]>,
}

/// Summary counts for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CorpusStats {
    pub resources: usize,
    pub utterances: usize,
    pub tags: Vec<String>,
}

impl Corpora {
    pub fn new(resources: Vec<Resource>, utterances: Vec<EmpatheticUtterance>) -> Self {
        Self {
            resources: resources.into(),
            utterances: utterances.into(),
        }
    }

    /// Load both corpora, degrading each to empty on failure.
    pub fn load(resources_path: &Path, utterances_path: &Path) -> Self {
        let resources = load_or_empty::<Resource>("resource", resources_path);
        let utterances = load_or_empty::<EmpatheticUtterance>("utterance", utterances_path);

        tracing::info!(
            "Loaded {} resources and {} empathetic utterances",
            resources.len(),
            utterances.len()
        );

        Self::new(resources, utterances)
    }

    pub fn stats(&self) -> CorpusStats {
        let tags: BTreeSet<String> = self
            .utterances
            .iter()
            .map(|u| crate::empathy::normalize_tag(&u.tags))
            .filter(|t| !t.is_empty())
            .collect();

        CorpusStats {
            resources: self.resources.len(),
            utterances: self.utterances.len(),
            tags: tags.into_iter().collect(),
        }
    }
}

/// Read a JSON array corpus file.
pub fn load_json_corpus<T: DeserializeOwned>(path: &Path) -> AppResult<Vec<T>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("Failed to read corpus {:?}: {}", path, e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| AppError::Config(format!("Failed to parse corpus {:?}: {}", path, e)))
}

fn load_or_empty<T: DeserializeOwned>(label: &str, path: &Path) -> Vec<T> {
    match load_json_corpus(path) {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("{} corpus unavailable, continuing with an empty one: {}", label, e);
            Vec::new()
        }
    }
}
