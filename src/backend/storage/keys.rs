// Logical storage keys.

// Durable
pub const CONTENT_DATA: &str = "content.data";
pub const CONTENT_ETAG: &str = "content.etag";
pub const CONTENT_LAST_FETCHED_AT: &str = "content.lastFetchedAt";
pub const CREDENTIAL_HASH: &str = "credential.hash";
pub const CREDENTIAL_SALT: &str = "credential.salt";
pub const CREDENTIAL_ITERATIONS: &str = "credential.iterations";

// Session only
pub const SESSION_UNLOCKED: &str = "session.unlocked";
pub const SESSION_LAST_ACTIVE_AT: &str = "session.lastActiveAt";
