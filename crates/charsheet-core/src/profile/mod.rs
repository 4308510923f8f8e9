pub mod identity;
pub mod setting;
pub mod story;

use serde::{Deserialize, Serialize};

use self::identity::{Appearance, Background, Capabilities, Identity, Personality, Voice};
use self::setting::Setting;
use self::story::{Relationship, Story};
use crate::types::Language;

/// Top-level character profile document.
///
/// Field order matches the canonical schema so serialization preserves the
/// declared key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CharacterProfile {
    pub meta: Meta,
    pub identity: Identity,
    pub description: String,
    pub appearance: Appearance,
    pub personality: Personality,
    pub background: Background,
    pub capabilities: Capabilities,
    pub relationships: Vec<Relationship>,
    pub story: Story,
    pub voice: Voice,
    pub setting: Setting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Meta {
    pub id: String,
    pub version: String,
    pub language: Language,
    pub tags: Vec<String>,
    pub created_by: String,
    /// ISO-8601 with an explicit offset, e.g. `2025-01-02T03:04:05+09:00`.
    pub updated_at: String,
    pub license: String,
}

impl CharacterProfile {
    /// Display name, falling back to the first alias.
    pub fn display_name(&self) -> &str {
        if !self.identity.name.trim().is_empty() {
            return &self.identity.name;
        }
        self.identity
            .aliases
            .first()
            .map(String::as_str)
            .unwrap_or("-")
    }
}
