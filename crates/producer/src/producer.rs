//! GroupProducer - operation dispatch onto a `GroupService`

use std::sync::Arc;
use std::time::Instant;

use contracts::{headers, ActionResponse, Body, EndpointConfig, Group, Message, Operation};
use identity_client::GroupService;
use observability::Outcome;
use tracing::{debug, instrument, warn};

use crate::error::ProducerError;

/// Producer for Keystone group operations
///
/// Reads the operation and its parameters from a [`Message`], performs one
/// call on the injected service and writes the outcome back onto the same
/// message.
pub struct GroupProducer<S: GroupService> {
    service: Arc<S>,
    default_operation: Option<Operation>,
}

impl<S: GroupService> GroupProducer<S> {
    /// Create a producer with no default operation
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            default_operation: None,
        }
    }

    /// Create a producer using the endpoint's default operation
    pub fn from_endpoint(service: Arc<S>, endpoint: &EndpointConfig) -> Self {
        Self::new(service).with_default_operation(endpoint.operation)
    }

    /// Operation used when a message has no `operation` header
    pub fn with_default_operation(mut self, operation: Option<Operation>) -> Self {
        self.default_operation = operation;
        self
    }

    /// Process one message in place
    ///
    /// The fault flag is cleared first. On any error the message ends up with
    /// `fault = true` and the error text as its body; the error is returned
    /// as well so callers can log or count it.
    #[instrument(name = "group_producer_process", skip(self, message))]
    pub async fn process(&self, message: &mut Message) -> Result<(), ProducerError> {
        let started = Instant::now();
        message.set_fault(false);

        let operation = self.resolve_operation(message);
        let label = operation.as_ref().map_or("unknown", |op| op.as_str());

        let result = match operation {
            Ok(op) => self.execute(op, message).await,
            Err(e) => Err(e),
        };

        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
        match &result {
            Ok(()) => {
                debug!(operation = label, body = message.body().kind(), "operation completed");
                observability::record_operation(label, Outcome::Success, latency_ms);
            }
            Err(e) => {
                warn!(operation = label, error = %e, "operation failed");
                message.set_fault(true);
                message.set_body(Body::Text(e.to_string()));
                observability::record_operation(label, Outcome::Fault, latency_ms);
                observability::record_fault(label, e.kind());
            }
        }

        result
    }

    /// Operation header, falling back to the configured default
    pub fn resolve_operation(&self, message: &Message) -> Result<Operation, ProducerError> {
        match message.header(headers::OPERATION) {
            Some(name) if !name.trim().is_empty() => name
                .parse()
                .map_err(|_| ProducerError::unsupported(Some(name))),
            _ => self
                .default_operation
                .ok_or_else(|| ProducerError::unsupported(None)),
        }
    }

    async fn execute(&self, operation: Operation, message: &mut Message) -> Result<(), ProducerError> {
        match operation {
            Operation::Create => self.create(message).await,
            Operation::Get => self.get(message).await,
            Operation::GetAll => self.get_all(message).await,
            Operation::Update => self.update(message).await,
            Operation::Delete => self.delete(message).await,
            Operation::AddUserToGroup => self.add_user(message).await,
            Operation::CheckUserGroup => self.check_user(message).await,
            Operation::RemoveUserFromGroup => self.remove_user(message).await,
        }
    }

    async fn create(&self, message: &mut Message) -> Result<(), ProducerError> {
        let created = match message.body() {
            Body::Group(group) => self.service.create(group).await,
            Body::Empty => {
                let group = group_from_headers(message)?;
                self.service.create(&group).await
            }
            other => return Err(invalid_body(other)),
        }
        .map_err(|e| ProducerError::remote_call(Operation::Create, e))?;

        message.set_body(Body::Group(created));
        Ok(())
    }

    #[instrument(name = "group_producer_get", skip(self, message))]
    async fn get(&self, message: &mut Message) -> Result<(), ProducerError> {
        let group_id = required_header(message, headers::ID)?;
        let found = self
            .service
            .get(&group_id)
            .await
            .map_err(|e| ProducerError::remote_call(Operation::Get, e))?;

        match found {
            Some(group) => message.set_body(Body::Group(group)),
            None => {
                debug!(group_id = %group_id, "group not found");
                message.set_body(Body::Empty);
            }
        }
        Ok(())
    }

    async fn get_all(&self, message: &mut Message) -> Result<(), ProducerError> {
        let groups = self
            .service
            .list()
            .await
            .map_err(|e| ProducerError::remote_call(Operation::GetAll, e))?;

        message.set_body(Body::Groups(groups));
        Ok(())
    }

    async fn update(&self, message: &mut Message) -> Result<(), ProducerError> {
        let updated = match message.body() {
            Body::Group(group) => self.service.update(group).await,
            Body::Empty => {
                let group_id = required_header(message, headers::ID)?;
                let group = group_from_headers(message)?.with_id(group_id);
                self.service.update(&group).await
            }
            other => return Err(invalid_body(other)),
        }
        .map_err(|e| ProducerError::remote_call(Operation::Update, e))?;

        message.set_body(Body::Group(updated));
        Ok(())
    }

    #[instrument(name = "group_producer_delete", skip(self, message))]
    async fn delete(&self, message: &mut Message) -> Result<(), ProducerError> {
        let group_id = required_header(message, headers::ID)
            .or_else(|_| required_header(message, headers::GROUP_ID))
            .map_err(|_| ProducerError::missing_header(headers::ID))?;

        let response = self
            .service
            .delete(&group_id)
            .await
            .map_err(|e| ProducerError::remote_call(Operation::Delete, e))?;

        check_action(&response, || format!("Delete group with ID {group_id}"))
    }

    async fn add_user(&self, message: &mut Message) -> Result<(), ProducerError> {
        let (group_id, user_id) = membership_headers(message)?;
        let response = self
            .service
            .add_user_to_group(&group_id, &user_id)
            .await
            .map_err(|e| ProducerError::remote_call(Operation::AddUserToGroup, e))?;

        check_action(&response, || {
            format!("Add user {user_id} to group {group_id}")
        })
    }

    async fn check_user(&self, message: &mut Message) -> Result<(), ProducerError> {
        let (group_id, user_id) = membership_headers(message)?;
        let is_member = self
            .service
            .check_group_user(&group_id, &user_id)
            .await
            .map_err(|e| ProducerError::remote_call(Operation::CheckUserGroup, e))?;

        message.set_body(Body::Flag(is_member));
        Ok(())
    }

    async fn remove_user(&self, message: &mut Message) -> Result<(), ProducerError> {
        let (group_id, user_id) = membership_headers(message)?;
        let response = self
            .service
            .remove_user_from_group(&group_id, &user_id)
            .await
            .map_err(|e| ProducerError::remote_call(Operation::RemoveUserFromGroup, e))?;

        check_action(&response, || {
            format!("Remove user {user_id} from group {group_id}")
        })
    }
}

/// Non-blank header value
fn required_header(message: &Message, name: &str) -> Result<String, ProducerError> {
    message
        .header(name)
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| ProducerError::missing_header(name))
}

fn membership_headers(message: &Message) -> Result<(String, String), ProducerError> {
    let user_id = required_header(message, headers::USER_ID)?;
    let group_id = required_header(message, headers::GROUP_ID)?;
    Ok((group_id, user_id))
}

/// Build a group from `name` (required), `description` and `domainId`
fn group_from_headers(message: &Message) -> Result<Group, ProducerError> {
    let mut group = Group::new(required_header(message, headers::NAME)?);
    if let Some(description) = message.header(headers::DESCRIPTION) {
        group = group.with_description(description);
    }
    if let Some(domain_id) = message.header(headers::DOMAIN_ID) {
        group = group.with_domain_id(domain_id);
    }
    Ok(group)
}

fn invalid_body(body: &Body) -> ProducerError {
    ProducerError::InvalidBody {
        expected: "group",
        found: body.kind(),
    }
}

fn check_action(
    response: &ActionResponse,
    action: impl FnOnce() -> String,
) -> Result<(), ProducerError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ProducerError::RemoteActionFailure {
        action: action(),
        message: response.fault().unwrap_or("unknown error").to_string(),
        code: response.code(),
    })
}
