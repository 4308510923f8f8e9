use std::sync::LazyLock;

use anyhow::{Context, Result};
use jsonschema::error::ValidationErrorKind;
use jsonschema::Validator;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::{CheckIssue, CheckReport, SchemaViolation};
use crate::profile::CharacterProfile;

/// Canonical CharacterProfile schema, verbatim.
pub const SCHEMA_JSON: &str = include_str!("../schema/character-profile.schema.json");

#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    #[error("embedded schema is invalid JSON: {0}")]
    Json(String),
    #[error("schema compilation failed: {0}")]
    Compile(String),
}

struct Compiled {
    schema: Value,
    validator: Validator,
}

static COMPILED: LazyLock<Result<Compiled, SchemaError>> = LazyLock::new(|| {
    let schema: Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| SchemaError::Json(e.to_string()))?;
    let validator = Validator::new(&schema).map_err(|e| SchemaError::Compile(e.to_string()))?;
    Ok(Compiled { schema, validator })
});

fn compiled() -> Result<&'static Compiled, SchemaError> {
    COMPILED.as_ref().map_err(Clone::clone)
}

/// The parsed canonical schema. Sent to the provider as the output contract
/// and embedded in the system instruction.
pub fn schema() -> Result<&'static Value, SchemaError> {
    compiled().map(|c| &c.schema)
}

/// Every schema violation in `candidate`, in validator order.
pub fn schema_violations(candidate: &Value) -> Vec<SchemaViolation> {
    let c = match compiled() {
        Ok(c) => c,
        Err(e) => {
            return vec![SchemaViolation {
                path: String::new(),
                keyword: "schema".to_string(),
                message: e.to_string(),
            }]
        }
    };
    let mut out = Vec::new();
    for error in c.validator.iter_errors(candidate) {
        let parent = error.instance_path.to_string();
        let message = error.to_string();
        match &error.kind {
            ValidationErrorKind::Required { property } => {
                let name = property.as_str().map_or_else(|| property.to_string(), str::to_string);
                out.push(SchemaViolation {
                    path: child_pointer(&parent, &name),
                    keyword: "required".to_string(),
                    message,
                });
            }
            ValidationErrorKind::AdditionalProperties { unexpected } => {
                for key in unexpected {
                    out.push(SchemaViolation {
                        path: child_pointer(&parent, key),
                        keyword: "additionalProperties".to_string(),
                        message: format!("unexpected property '{key}'"),
                    });
                }
            }
            kind => out.push(SchemaViolation {
                path: parent,
                keyword: keyword_of(kind).to_string(),
                message,
            }),
        }
    }
    out
}

/// Deep structural check of a candidate profile.
///
/// Never repairs input. On success the typed profile is returned; otherwise
/// every violation found, each with the JSON pointer of the offending (or
/// missing) value.
pub fn validate_profile(candidate: &Value) -> Result<CharacterProfile, Vec<SchemaViolation>> {
    let violations = schema_violations(candidate);
    if !violations.is_empty() {
        return Err(violations);
    }
    decode(candidate).map_err(|v| vec![v])
}

fn decode(candidate: &Value) -> Result<CharacterProfile, SchemaViolation> {
    CharacterProfile::deserialize(candidate).map_err(|e| SchemaViolation {
        path: String::new(),
        keyword: "decode".to_string(),
        message: e.to_string(),
    })
}

fn child_pointer(parent: &str, key: &str) -> String {
    let escaped = key.replace('~', "~0").replace('/', "~1");
    format!("{parent}/{escaped}")
}

fn keyword_of(kind: &ValidationErrorKind) -> &'static str {
    match kind {
        ValidationErrorKind::Type { .. } => "type",
        ValidationErrorKind::Enum { .. } => "enum",
        ValidationErrorKind::Pattern { .. } => "pattern",
        ValidationErrorKind::Minimum { .. } => "minimum",
        ValidationErrorKind::Maximum { .. } => "maximum",
        ValidationErrorKind::Required { .. } => "required",
        ValidationErrorKind::AdditionalProperties { .. } => "additionalProperties",
        _ => "schema",
    }
}

/// Validate multiple files, printing results. Returns (passed, failed) counts.
pub fn validate_files(paths: &[String]) -> Result<(usize, usize)> {
    let mut passed = 0usize;
    let mut failed = 0usize;
    for path in paths {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("cannot read {path}"))?;
        let data: Value =
            serde_json::from_str(&content).with_context(|| format!("{path}: invalid JSON"))?;
        match validate_profile(&data) {
            Ok(_) => {
                eprintln!("  ok  {path}");
                passed += 1;
            }
            Err(violations) => {
                failed += 1;
                eprintln!("  FAIL {path}");
                for v in violations {
                    eprintln!("       {v}");
                }
            }
        }
    }
    Ok((passed, failed))
}

/// Full check producing a structured report (for `charsheet check --json`).
pub fn check(data: &Value, file: &str) -> CheckReport {
    let mut errors: Vec<CheckIssue> = schema_violations(data)
        .into_iter()
        .map(|v| CheckIssue {
            code: "E001".to_string(),
            check: "schema".to_string(),
            message: v.message,
            path: Some(json_path(&v.path)),
        })
        .collect();

    if errors.is_empty() {
        if let Err(v) = decode(data) {
            errors.push(CheckIssue {
                code: "E002".to_string(),
                check: "decode".to_string(),
                message: v.message,
                path: None,
            });
        }
    }

    CheckReport {
        file: file.to_string(),
        pass: errors.is_empty(),
        errors,
    }
}

fn json_path(pointer: &str) -> String {
    if pointer.is_empty() {
        "$(root)".to_string()
    } else {
        format!("${pointer}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::sample_profile_at;
    use serde_json::json;

    fn valid() -> Value {
        sample_profile_at("ルフィ", "luffy-001", "2025-01-02T03:04:05+09:00")
    }

    fn paths(violations: &[SchemaViolation]) -> Vec<&str> {
        violations.iter().map(|v| v.path.as_str()).collect()
    }

    #[test]
    fn embedded_schema_compiles() {
        let s = schema().unwrap();
        assert_eq!(s["title"], "CharacterProfile");
        assert_eq!(s["additionalProperties"], false);
    }

    #[test]
    fn sample_passes() {
        let p = validate_profile(&valid()).unwrap();
        assert_eq!(p.identity.name, "ルフィ");
        assert_eq!(p.meta.id, "luffy-001");
    }

    #[test]
    fn missing_nested_field_reports_its_own_path() {
        let mut v = valid();
        v["setting"].as_object_mut().unwrap().remove("era");
        let errs = validate_profile(&v).unwrap_err();
        assert_eq!(paths(&errs), vec!["/setting/era"]);
        assert_eq!(errs[0].keyword, "required");
    }

    #[test]
    fn missing_field_at_each_depth_is_located() {
        let cases = [
            ("/meta", "license"),
            ("/story/arc", "growth"),
            ("/story/goals", "long_term"),
            ("/relationships/0/metrics", "tension"),
            ("/story/timeline/0", "date"),
            ("", "voice"),
        ];
        for (parent, field) in cases {
            let mut v = valid();
            let target = if parent.is_empty() {
                &mut v
            } else {
                v.pointer_mut(parent).unwrap()
            };
            target.as_object_mut().unwrap().remove(field);
            let errs = validate_profile(&v).unwrap_err();
            assert_eq!(paths(&errs), vec![format!("{parent}/{field}")]);
        }
    }

    #[test]
    fn metrics_bounds_are_inclusive() {
        for ok in [0.0, 1.0, 0.5] {
            let mut v = valid();
            v["relationships"][0]["metrics"]["trust"] = json!(ok);
            assert!(validate_profile(&v).is_ok(), "{ok} should pass");
        }
        for bad in [-0.01, 1.01] {
            let mut v = valid();
            v["relationships"][0]["metrics"]["affection"] = json!(bad);
            let errs = validate_profile(&v).unwrap_err();
            assert_eq!(paths(&errs), vec!["/relationships/0/metrics/affection"]);
        }
    }

    #[test]
    fn unknown_language_rejected() {
        let mut v = valid();
        v["meta"]["language"] = json!("jp");
        let errs = validate_profile(&v).unwrap_err();
        assert_eq!(errs[0].path, "/meta/language");
        assert_eq!(errs[0].keyword, "enum");
    }

    #[test]
    fn updated_at_requires_offset() {
        for bad in ["2025-01-02T03:04:05", "2025-01-02T03:04:05Z", "2025-01-02"] {
            let mut v = valid();
            v["meta"]["updated_at"] = json!(bad);
            let errs = validate_profile(&v).unwrap_err();
            assert_eq!(errs[0].keyword, "pattern", "{bad}");
        }
        let mut v = valid();
        v["meta"]["updated_at"] = json!("2025-01-02T03:04:05.123-05:00");
        assert!(validate_profile(&v).is_ok());
    }

    #[test]
    fn malformed_timeline_date_rejected() {
        let mut v = valid();
        v["story"]["timeline"][0]["date"] = json!("2000/01/01");
        let errs = validate_profile(&v).unwrap_err();
        assert_eq!(paths(&errs), vec!["/story/timeline/0/date"]);
    }

    #[test]
    fn unknown_keys_rejected_at_any_depth() {
        let mut v = valid();
        v["extra"] = json!(1);
        v["voice"]["accent"] = json!("none");
        let errs = validate_profile(&v).unwrap_err();
        let mut got = paths(&errs);
        got.sort_unstable();
        assert_eq!(got, vec!["/extra", "/voice/accent"]);
    }

    #[test]
    fn collects_every_violation() {
        let mut v = valid();
        v["setting"].as_object_mut().unwrap().remove("era");
        v["meta"]["language"] = json!("xx");
        assert_eq!(validate_profile(&v).unwrap_err().len(), 2);
    }

    #[test]
    fn non_object_rejected_at_root() {
        let errs = validate_profile(&json!("profile")).unwrap_err();
        assert_eq!(errs[0].path, "");
        assert_eq!(errs[0].keyword, "type");
    }

    #[test]
    fn roundtrip_preserves_schema_key_order() {
        let profile = validate_profile(&valid()).unwrap();
        let encoded = serde_json::to_value(&profile).unwrap();
        assert_eq!(encoded, valid());

        let schema_keys: Vec<&String> = schema().unwrap()["properties"]
            .as_object()
            .unwrap()
            .keys()
            .collect();
        let encoded_keys: Vec<&String> = encoded.as_object().unwrap().keys().collect();
        assert_eq!(encoded_keys, schema_keys);

        let back: CharacterProfile = serde_json::from_value(encoded).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn check_reports_codes_and_paths() {
        let report = check(&valid(), "ok.json");
        assert!(report.pass);
        assert!(report.errors.is_empty());

        let mut v = valid();
        v["setting"].as_object_mut().unwrap().remove("era");
        let report = check(&v, "bad.json");
        assert!(!report.pass);
        assert_eq!(report.errors[0].code, "E001");
        assert_eq!(report.errors[0].path.as_deref(), Some("$/setting/era"));
    }
}
