use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Why a single input field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationReason {
    Required,
    TooLong,
    InvalidType,
}

impl ViolationReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationReason::Required => "required",
            ViolationReason::TooLong => "too_long",
            ViolationReason::InvalidType => "invalid_type",
        }
    }
}

impl fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field-level input violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: ViolationReason,
}

/// Every problem found in one request body, collected rather than
/// short-circuited on the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    /// Problems with the body as a whole (not tied to a field).
    pub form: Vec<String>,
    pub fields: Vec<FieldViolation>,
}

/// Flattened `{ formErrors, fieldErrors }` report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedErrors {
    pub form_errors: Vec<String>,
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.form.is_empty() && self.fields.is_empty()
    }

    pub fn push_field(&mut self, field: &str, reason: ViolationReason) {
        self.fields.push(FieldViolation {
            field: field.to_string(),
            reason,
        });
    }

    /// True if any violation names `field`.
    pub fn mentions(&self, field: &str) -> bool {
        self.fields.iter().any(|v| v.field == field)
    }

    pub fn flatten(&self) -> FlattenedErrors {
        let mut field_errors: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for v in &self.fields {
            field_errors
                .entry(v.field.clone())
                .or_default()
                .push(v.reason.as_str().to_string());
        }
        FlattenedErrors {
            form_errors: self.form.clone(),
            field_errors,
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.form.clone();
        parts.extend(self.fields.iter().map(|v| format!("{}: {}", v.field, v.reason)));
        write!(f, "{}", parts.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// One place where a candidate profile departs from the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    /// JSON pointer of the offending value. For a missing field this is the
    /// pointer the field would have had.
    pub path: String,
    /// Schema keyword that failed (`required`, `enum`, `pattern`, ...).
    pub keyword: String,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loc = if self.path.is_empty() {
            "(root)"
        } else {
            self.path.as_str()
        };
        write!(f, "{loc}: {}", self.message)
    }
}

/// Structured check result for `charsheet check --json`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub file: String,
    pub pass: bool,
    pub errors: Vec<CheckIssue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckIssue {
    pub code: String,
    pub check: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Failure reading a saved profile. Shown to end users only through
/// [`StoreError::display_message`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid profile file name: {0:?}")]
    InvalidFileName(String),
    #[error("profile not found: {0}")]
    NotFound(String),
    #[error("cannot read {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{file}: {message}")]
    Decode { file: String, message: String },
}

impl StoreError {
    /// Generic localized message for display layers.
    pub fn display_message(&self) -> &'static str {
        match self {
            StoreError::InvalidFileName(_) => "file パラメータが不正です",
            _ => "ファイルの読み込みに失敗しました",
        }
    }
}
