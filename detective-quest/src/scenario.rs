//! Static case data: room layout, which clue lies in which room, and which suspect
//! each clue implicates. Loaded from JSON and checked before play.

use crate::graph::{LocationGraph, LocationId, RoomSpec};
use crate::suspect_index::{DEFAULT_BUCKET_COUNT, IndexError, SuspectIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const MANSION_JSON: &str = include_str!("../scenarios/mansion.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimony {
    pub clue: String,
    pub suspect: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_title")]
    pub title: String,
    pub layout: RoomSpec,
    /// Location name -> clue text.
    #[serde(default)]
    pub clues: BTreeMap<String, String>,
    #[serde(default)]
    pub testimony: Vec<Testimony>,
    /// Roster shown at the accusation prompt.
    #[serde(default)]
    pub suspects: Vec<String>,
    #[serde(default = "default_bucket_count")]
    pub bucket_count: usize,
}

fn default_title() -> String {
    "Untitled case".to_string()
}

fn default_bucket_count() -> usize {
    DEFAULT_BUCKET_COUNT
}

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid scenario JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Layout contains a location with an empty name")]
    EmptyName,
    #[error("Duplicate location name: {0}")]
    DuplicateLocation(String),
    #[error("Clue '{clue}' in '{location}' does not implicate any suspect")]
    UnresolvedClue { location: String, clue: String },
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// A validated scenario, ready to be investigated.
#[derive(Debug)]
pub struct Case {
    pub title: String,
    pub graph: LocationGraph,
    pub clues: HashMap<String, String>,
    pub index: SuspectIndex,
    pub suspects: Vec<String>,
}

impl Case {
    pub fn clue_at(&self, location: LocationId) -> Option<&str> {
        self.clues
            .get(self.graph.name(location))
            .map(String::as_str)
    }
}

impl Scenario {
    /// The built-in mansion case.
    pub fn mansion() -> Result<Self, ScenarioError> {
        Self::from_json(MANSION_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let json = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn into_case(self) -> Result<Case, ScenarioError> {
        let graph = LocationGraph::build(&self.layout);

        let mut seen = HashSet::new();
        for id in graph.iter() {
            let name = graph.name(id);
            if name.is_empty() {
                return Err(ScenarioError::EmptyName);
            }
            if !seen.insert(name) {
                return Err(ScenarioError::DuplicateLocation(name.to_string()));
            }
        }

        let mut index = SuspectIndex::with_buckets(self.bucket_count)?;
        for testimony in &self.testimony {
            index.insert(&testimony.clue, &testimony.suspect);
        }
        for bucket in 0..index.bucket_count() {
            debug!("Bucket {}: {} entries", bucket, index.chain_len(bucket));
        }

        let mut clues = HashMap::new();
        for (location, clue) in self.clues {
            if !seen.contains(location.as_str()) {
                warn!("Ignoring clue '{}' for unknown location '{}'", clue, location);
                continue;
            }
            if index.lookup(&clue).is_none() {
                return Err(ScenarioError::UnresolvedClue { location, clue });
            }
            clues.insert(location, clue);
        }

        let suspects = if self.suspects.is_empty() {
            let mut roster: Vec<String> = Vec::new();
            for testimony in &self.testimony {
                if !roster.contains(&testimony.suspect) {
                    roster.push(testimony.suspect.clone());
                }
            }
            roster
        } else {
            self.suspects
        };
        for suspect in &suspects {
            if !self.testimony.iter().any(|t| &t.suspect == suspect) {
                warn!("Suspect '{}' is not implicated by any clue", suspect);
            }
        }

        info!(
            "Case '{}' ready: {} locations, {} clues, {} suspects",
            self.title,
            graph.len(),
            clues.len(),
            suspects.len()
        );

        Ok(Case {
            title: self.title,
            graph,
            clues,
            index,
            suspects,
        })
    }
}
