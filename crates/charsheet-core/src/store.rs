use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::errors::StoreError;
use crate::schema::validate_profile;
use crate::profile::CharacterProfile;
use crate::traits::ProfileStore;

// ASCII word characters only; no separators, no dot segments.
static FILE_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+\.json$").ok());

/// True if `file` is an acceptable bare profile file name.
pub fn is_valid_file_name(file: &str) -> bool {
    FILE_NAME.as_ref().is_some_and(|re| re.is_match(file))
}

/// Profiles saved as `<name>.json` files in one directory.
#[derive(Debug, Clone)]
pub struct DirProfileStore {
    dir: PathBuf,
}

impl DirProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, file: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_file_name(file) {
            return Err(StoreError::InvalidFileName(file.to_string()));
        }
        Ok(self.dir.join(file))
    }
}

impl ProfileStore for DirProfileStore {
    fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    file: self.dir.display().to_string(),
                    source,
                })
            }
        };

        let mut files: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| is_valid_file_name(name))
            .collect();
        files.sort_unstable_by(|a, b| b.cmp(a));
        Ok(files)
    }

    fn read(&self, file: &str) -> Result<CharacterProfile, StoreError> {
        let path = self.path_for(file)?;
        let content = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                StoreError::NotFound(file.to_string())
            } else {
                StoreError::Io {
                    file: file.to_string(),
                    source,
                }
            }
        })?;
        decode_profile(file, &content)
    }
}

/// Parse and validate a saved profile's text.
pub fn decode_profile(file: &str, content: &str) -> Result<CharacterProfile, StoreError> {
    let data: Value = serde_json::from_str(content).map_err(|e| StoreError::Decode {
        file: file.to_string(),
        message: format!("invalid JSON: {e}"),
    })?;
    validate_profile(&data).map_err(|violations| StoreError::Decode {
        file: file.to_string(),
        message: violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; "),
    })
}
