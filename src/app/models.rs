//! Data models for HEASARC metadata queries
//!
//! Mission listings and per-mission column sets returned by the metadata
//! operations of the client.

use serde::{Deserialize, Serialize};

/// A table (mission catalog) served by a W3Browse instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    /// Name used as the `tablehead` mission, e.g. `integral_rev3_scw`
    pub name: String,
    pub description: String,
}

impl Mission {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Missions available on a server, in the order the server lists them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissionList {
    missions: Vec<Mission>,
}

impl MissionList {
    pub fn new(missions: Vec<Mission>) -> Self {
        Self { missions }
    }

    pub fn len(&self) -> usize {
        self.missions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mission> {
        self.missions.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.missions.iter().map(|m| m.name.as_str()).collect()
    }

    /// Case-insensitive lookup by mission name
    pub fn find(&self, name: &str) -> Option<&Mission> {
        self.missions
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }
}

impl<'a> IntoIterator for &'a MissionList {
    type Item = &'a Mission;
    type IntoIter = std::slice::Iter<'a, Mission>;

    fn into_iter(self) -> Self::IntoIter {
        self.missions.iter()
    }
}

/// Column names of one mission, in catalog order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnList {
    names: Vec<String>,
}

impl ColumnList {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Mission parameters are matched without regard to case
    pub fn contains_ignore_case(&self, name: &str) -> bool {
        self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.names.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn into_vec(self) -> Vec<String> {
        self.names
    }
}

impl<'a> IntoIterator for &'a ColumnList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}
