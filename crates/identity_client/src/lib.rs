//! # Identity Client
//!
//! Group-service client abstraction for the Keystone producer.
//!
//! Responsibilities:
//! - Define the `GroupService` trait the producer calls into
//! - Provide an in-memory implementation (directory seeding, failure injection)
//!
//! Transport to a real Keystone deployment is supplied by the caller as another
//! `GroupService` implementation.

pub mod client;
pub mod error;
pub mod in_memory;

pub use client::GroupService;
pub use contracts::{ActionResponse, Group};
pub use error::{IdentityClientError, Result};
pub use in_memory::{InMemoryConfig, InMemoryGroupService};
