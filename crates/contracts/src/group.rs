//! Group - identity service group entity

use serde::{Deserialize, Serialize};

/// Keystone v3 group
///
/// `id` is assigned by the identity service and is `None` until the group
/// has been created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
}

impl Group {
    /// Create a group with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            domain_id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_domain_id(mut self, domain_id: impl Into<String>) -> Self {
        self.domain_id = Some(domain_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let group = Group::new("group Name")
            .with_description("desc")
            .with_domain_id("domain");
        assert_eq!(group.id, None);
        assert_eq!(group.name, "group Name");
        assert_eq!(group.description.as_deref(), Some("desc"));
        assert_eq!(group.domain_id.as_deref(), Some("domain"));
    }

    #[test]
    fn test_json_omits_missing_fields() {
        let json = serde_json::to_string(&Group::new("ops")).unwrap();
        assert_eq!(json, r#"{"name":"ops"}"#);
    }
}
