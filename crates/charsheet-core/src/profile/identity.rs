use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Identity {
    pub name: String,
    pub aliases: Vec<String>,
    pub pronouns: String,
    pub age: String,
    pub species_or_race: String,
    pub role_or_occupation: String,
    pub archetype: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Appearance {
    pub height: String,
    pub build: String,
    pub distinct_features: Vec<String>,
    pub clothing_style: String,
    pub color_palette: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Personality {
    pub summary: String,
    pub traits_positive: Vec<String>,
    pub traits_negative: Vec<String>,
    pub values: Vec<String>,
    pub quirks: Vec<String>,
    pub motivations: Vec<String>,
    pub fears: Vec<String>,
    pub temperament: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Background {
    pub birthplace: String,
    pub family: Vec<String>,
    pub education: String,
    pub culture: String,
    pub formative_events: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Capabilities {
    pub skills: Vec<String>,
    pub powers_or_magic: Vec<String>,
    pub equipment: Vec<String>,
    pub weaknesses: Vec<String>,
    pub constraints_or_costs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Voice {
    pub diction: String,
    pub tone: String,
    pub catchphrases: Vec<String>,
    pub dialogue_examples: Vec<String>,
}
