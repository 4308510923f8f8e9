use crate::errors::StoreError;
use crate::profile::CharacterProfile;

/// Read-only access to saved profiles.
///
/// File names are bare (`luffy.json`), never paths. Implementations must
/// reject names that do not match [`crate::store::is_valid_file_name`].
pub trait ProfileStore: Send + Sync {
    /// Profile file names, newest-first by name.
    fn list(&self) -> Result<Vec<String>, StoreError>;

    /// Read and validate one saved profile.
    fn read(&self, file: &str) -> Result<CharacterProfile, StoreError>;
}
