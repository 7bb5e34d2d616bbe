//! Entity id and token generation.

use ulid::Ulid;
use uuid::Uuid;

/// Generates entity ids and access tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdGenerator;

impl IdGenerator {
    /// Create a new generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// New entity id: a lowercase ULID.
    ///
    /// ULIDs sort lexicographically in creation order, which is what
    /// lets listings paginate with a plain `id < until_id` filter
    /// instead of a timestamp cursor.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// New access token. UUIDv4 rather than ULID so the token carries
    /// no timestamp.
    #[must_use]
    pub fn generate_token(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}
