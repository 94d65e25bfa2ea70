//! Static pest knowledge base: loaded once, read-only afterwards.
//!
//! Load failures never propagate out of [`KnowledgeBase::load_or_empty`]: a
//! missing or malformed file yields an empty handle and every dependent
//! output degrades to empty strings or omitted lines.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use mb_protocol::PestId;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Reference data for one pest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PestKnowledgeEntry {
    #[serde(default)]
    pub scientific_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub organic_treatments: Vec<String>,
    #[serde(default)]
    pub prevention: Vec<String>,
    /// Free-text activity window, surfaced as `peak_activity`.
    #[serde(default)]
    pub timing: String,
}

/// On-disk layout: `{"common_pests": {"<pest_id>": {...}}}`.
#[derive(Debug, Deserialize)]
struct KnowledgeFile {
    #[serde(default)]
    common_pests: HashMap<String, PestKnowledgeEntry>,
}

/// Immutable, cheaply clonable handle to the pest knowledge base.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    pests: Arc<HashMap<PestId, PestKnowledgeEntry>>,
}

impl KnowledgeBase {
    /// Knowledge base with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (PestId, PestKnowledgeEntry)>) -> Self {
        Self {
            pests: Arc::new(entries.into_iter().collect()),
        }
    }

    /// Parse the JSON document. Unknown pest keys are skipped.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let file: KnowledgeFile = serde_json::from_str(json).map_err(|e| EngineError::Parse {
            path: "<knowledge base>".into(),
            message: e.to_string(),
        })?;

        let mut pests = HashMap::new();
        for (key, entry) in file.common_pests {
            match PestId::from_key(&key) {
                Some(pest) => {
                    pests.insert(pest, entry);
                }
                None => tracing::debug!(pest = %key, "skipping unknown pest in knowledge base"),
            }
        }
        Ok(Self {
            pests: Arc::new(pests),
        })
    }

    /// Read and parse the knowledge base file.
    pub fn try_load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EngineError::NotFound(path.display().to_string())
            } else {
                EngineError::Io(format!("{}: {e}", path.display()))
            }
        })?;
        Self::from_json_str(&contents).map_err(|e| match e {
            EngineError::Parse { message, .. } => EngineError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Load the knowledge base, degrading to an empty one on any failure.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(kb) => {
                tracing::info!(path = %path.display(), pests = kb.len(), "pest knowledge base loaded");
                kb
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "could not load pest knowledge base");
                Self::empty()
            }
        }
    }

    pub fn entry(&self, pest: PestId) -> Option<&PestKnowledgeEntry> {
        self.pests.get(&pest)
    }

    /// Description, or "" when the pest has no entry.
    pub fn description(&self, pest: PestId) -> &str {
        self.entry(pest).map_or("", |e| e.description.as_str())
    }

    /// Activity window, or "" when the pest has no entry.
    pub fn timing(&self, pest: PestId) -> &str {
        self.entry(pest).map_or("", |e| e.timing.as_str())
    }

    /// First listed organic treatment.
    pub fn first_treatment(&self, pest: PestId) -> Option<&str> {
        self.entry(pest)
            .and_then(|e| e.organic_treatments.first())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pests.is_empty()
    }

    /// Known pests with entries, in [`PestId::ALL`] order.
    pub fn pests(&self) -> impl Iterator<Item = (PestId, &PestKnowledgeEntry)> {
        PestId::ALL
            .into_iter()
            .filter_map(|p| self.pests.get(&p).map(|e| (p, e)))
    }
}
