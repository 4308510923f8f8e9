use serde::{Deserialize, Serialize};

use crate::types::UnitFloat;

/// One entry of `relationships[]`. Entries are ordered and `name_or_id` is
/// not unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Relationship {
    pub name_or_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub history: String,
    pub metrics: RelationshipMetrics,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationshipMetrics {
    pub trust: UnitFloat,
    pub affection: UnitFloat,
    pub tension: UnitFloat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Story {
    pub goals: Goals,
    pub stakes: String,
    pub obstacles: Vec<String>,
    pub arc: StoryArc,
    pub timeline: Vec<TimelineEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Goals {
    pub short_term: Vec<String>,
    pub long_term: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoryArc {
    pub setup: String,
    pub flaws_exposed: String,
    pub turning_points: Vec<String>,
    pub growth: String,
    pub resolution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimelineEntry {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub age: String,
    pub title: String,
    pub summary: String,
    pub impact: String,
}
