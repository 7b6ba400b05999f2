//! Header names understood by the group producer.
//!
//! Lookups on [`crate::Message`] are case-insensitive, so `"ID"` and `"id"`
//! address the same header.

/// Operation selector
pub const OPERATION: &str = "operation";

/// Group identifier for get / update / delete
pub const ID: &str = "ID";

/// Group name
pub const NAME: &str = "name";

/// Group description
pub const DESCRIPTION: &str = "description";

/// Owning domain
pub const DOMAIN_ID: &str = "domainId";

/// Group identifier for membership operations (also accepted by delete)
pub const GROUP_ID: &str = "groupId";

/// User identifier for membership operations
pub const USER_ID: &str = "userId";
