//! # Producer
//!
//! Keystone group producer.
//!
//! Responsibilities:
//! - Resolve the operation named by a `Message`
//! - Make exactly one `GroupService` call per message
//! - Write the result, or a fault description, back onto the message
//! - Host the producer behind a bounded queue (`RouteHandle`)

pub mod error;
pub mod handle;
pub mod metrics;
pub mod producer;

pub use contracts::{Body, Message, Operation};
pub use error::ProducerError;
pub use handle::RouteHandle;
pub use metrics::{RouteMetrics, RouteMetricsSnapshot};
pub use producer::GroupProducer;
