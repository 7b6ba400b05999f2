//! Operation - closed set of actions a message can request

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ContractError;

/// Group operation selected by the `operation` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Create,
    Get,
    GetAll,
    Update,
    Delete,
    AddUserToGroup,
    CheckUserGroup,
    RemoveUserFromGroup,
}

impl Operation {
    /// All supported operations, in declaration order
    pub const ALL: [Operation; 8] = [
        Self::Create,
        Self::Get,
        Self::GetAll,
        Self::Update,
        Self::Delete,
        Self::AddUserToGroup,
        Self::CheckUserGroup,
        Self::RemoveUserFromGroup,
    ];

    /// Wire value carried in the `operation` header
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Get => "get",
            Self::GetAll => "getAll",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::AddUserToGroup => "addUserToGroup",
            Self::CheckUserGroup => "checkUserGroup",
            Self::RemoveUserFromGroup => "removeUserFromGroup",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ContractError::unknown_operation(s))
    }
}
