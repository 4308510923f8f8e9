#![forbid(unsafe_code)]

pub mod errors;
pub mod list;
pub mod name;
pub mod profile;
pub mod prompt;
pub mod render;
pub mod schema;
pub mod store;
pub mod templates;
pub mod traits;
pub mod types;

pub use errors::{SchemaViolation, StoreError, ValidationErrors};
pub use name::{validate_name_request, NameRequest};
pub use profile::CharacterProfile;
pub use schema::validate_profile;
pub use traits::ProfileStore;
