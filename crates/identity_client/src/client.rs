//! Group service abstraction
//!
//! Defines the trait the producer uses to reach the identity service, so the
//! real client and in-memory/test clients are interchangeable.

use std::future::Future;

use contracts::{ActionResponse, Group};

use crate::error::Result;

/// Keystone v3 group operations
///
/// Each method is one remote call. Destructive calls report service-side
/// refusals through [`ActionResponse`]; transport and request failures come
/// back as `Err`.
pub trait GroupService: Send + Sync {
    /// Create a group
    ///
    /// # Returns
    /// The stored group, with its id assigned
    fn create(&self, group: &Group) -> impl Future<Output = Result<Group>> + Send;

    /// Fetch a group by id
    ///
    /// Returns `None` if the group does not exist
    fn get(&self, group_id: &str) -> impl Future<Output = Result<Option<Group>>> + Send;

    /// List all groups
    fn list(&self) -> impl Future<Output = Result<Vec<Group>>> + Send;

    /// Update a group
    ///
    /// The group must carry its id.
    fn update(&self, group: &Group) -> impl Future<Output = Result<Group>> + Send;

    /// Delete a group by id
    fn delete(&self, group_id: &str) -> impl Future<Output = Result<ActionResponse>> + Send;

    /// Add a user to a group
    fn add_user_to_group(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> impl Future<Output = Result<ActionResponse>> + Send;

    /// Check whether a user belongs to a group
    fn check_group_user(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Remove a user from a group
    fn remove_user_from_group(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> impl Future<Output = Result<ActionResponse>> + Send;
}
