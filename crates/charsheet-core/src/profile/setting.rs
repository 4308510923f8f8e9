use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Setting {
    pub world: String,
    pub era: String,
    pub locations: Vec<String>,
    pub tech_level_or_magic_rules: String,
}
