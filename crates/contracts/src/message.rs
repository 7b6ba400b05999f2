//! Message - request/response envelope passed through the producer
//!
//! One message per request. The producer mutates it in place and the caller
//! reads the result back from the same value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Group;

/// Payload slot of a [`Message`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    #[default]
    Empty,
    Group(Group),
    Groups(Vec<Group>),
    Text(String),
    Flag(bool),
}

impl Body {
    /// Short variant name (used in error messages and logs)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Group(_) => "group",
            Self::Groups(_) => "groups",
            Self::Text(_) => "text",
            Self::Flag(_) => "flag",
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_groups(&self) -> Option<&[Group]> {
        match self {
            Self::Groups(groups) => Some(groups),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

/// Mutable envelope: headers, one body, fault flag
///
/// Header names are stored lowercased, so lookups ignore case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MessageRepr")]
pub struct Message {
    headers: BTreeMap<String, String>,
    body: Body,
    fault: bool,
}

#[derive(Deserialize)]
struct MessageRepr {
    #[serde(default)]
    headers: BTreeMap<String, String>,
    #[serde(default)]
    body: Body,
    #[serde(default)]
    fault: bool,
}

impl From<MessageRepr> for Message {
    fn from(repr: MessageRepr) -> Self {
        let mut message = Message {
            headers: BTreeMap::new(),
            body: repr.body,
            fault: repr.fault,
        };
        for (name, value) in repr.headers {
            message.set_header(&name, value);
        }
        message
    }
}

fn normalize(name: &str) -> String {
    name.to_ascii_lowercase()
}

impl Message {
    /// Create an empty message
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style header insert
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Builder-style body
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Set a header, replacing any value stored under the same name (any case)
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(normalize(name), value.into());
    }

    /// Look up a header by name, ignoring case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&normalize(name)).map(String::as_str)
    }

    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        self.headers.remove(&normalize(name))
    }

    /// All headers (names lowercased)
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn set_body(&mut self, body: Body) {
        self.body = body;
    }

    /// Move the body out, leaving [`Body::Empty`]
    pub fn take_body(&mut self) -> Body {
        std::mem::take(&mut self.body)
    }

    pub fn is_fault(&self) -> bool {
        self.fault
    }

    pub fn set_fault(&mut self, fault: bool) {
        self.fault = fault;
    }
}
