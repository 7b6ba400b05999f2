//! # Contracts
//!
//! Shared data structures for the Keystone group producer.
//! Every other crate depends on this one; it depends on none of them.
//!
//! ## Message Model
//! - A [`Message`] carries case-insensitive string headers, a single [`Body`] slot
//!   and a fault flag
//! - The operation to run is selected by the [`headers::OPERATION`] header

mod action;
mod config;
mod error;
pub mod headers;
mod group;
mod message;
mod operation;

pub use action::ActionResponse;
pub use config::*;
pub use error::*;
pub use group::Group;
pub use message::{Body, Message};
pub use operation::Operation;
