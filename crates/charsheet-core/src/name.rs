use serde::Serialize;
use serde_json::Value;

use crate::errors::{ValidationErrors, ViolationReason};

/// Longest accepted name after trimming, in UTF-16 code units. A character
/// outside the Basic Multilingual Plane (most emoji) counts as two.
pub const MAX_NAME_UNITS: usize = 100;

/// Whitespace stripped from both ends of a name: ASCII and Unicode space
/// separators, line and paragraph separators, and U+FEFF.
fn is_name_padding(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{b}'
            | '\u{c}'
            | '\r'
            | ' '
            | '\u{a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\u{feff}'
    )
}

/// Length of `s` as counted against [`MAX_NAME_UNITS`].
pub fn name_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// A validated, trimmed character name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameRequest {
    name: String,
}

impl NameRequest {
    /// Validate a bare name string.
    pub fn parse(raw: &str) -> Result<Self, ValidationErrors> {
        let mut errs = ValidationErrors::default();
        let trimmed = raw.trim_matches(is_name_padding);
        if trimmed.is_empty() {
            errs.push_field("name", ViolationReason::Required);
        } else if name_len(trimmed) > MAX_NAME_UNITS {
            errs.push_field("name", ViolationReason::TooLong);
        }
        if errs.is_empty() {
            Ok(Self {
                name: trimmed.to_string(),
            })
        } else {
            Err(errs)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_name(self) -> String {
        self.name
    }
}

/// Validate a decoded request body of the form `{ "name": "<text>" }`.
///
/// Unknown keys are ignored. Every violation is collected.
pub fn validate_name_request(raw: &Value) -> Result<NameRequest, ValidationErrors> {
    let Some(obj) = raw.as_object() else {
        let mut errs = ValidationErrors::default();
        errs.form.push("expected_object".to_string());
        errs.push_field("name", ViolationReason::Required);
        return Err(errs);
    };

    match obj.get("name") {
        None => {
            let mut errs = ValidationErrors::default();
            errs.push_field("name", ViolationReason::Required);
            Err(errs)
        }
        Some(Value::String(s)) => NameRequest::parse(s),
        Some(_) => {
            let mut errs = ValidationErrors::default();
            errs.push_field("name", ViolationReason::InvalidType);
            Err(errs)
        }
    }
}
