//! ActionResponse - outcome of destructive identity calls

use std::fmt;

use serde::{Deserialize, Serialize};

/// Success or failure returned by delete and membership calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fault: Option<String>,
    code: u16,
}

impl ActionResponse {
    /// Successful action (code 200)
    pub fn success() -> Self {
        Self {
            success: true,
            fault: None,
            code: 200,
        }
    }

    /// Failed action with a message and status code
    pub fn failed(message: impl Into<String>, code: u16) -> Self {
        Self {
            success: false,
            fault: Some(message.into()),
            code,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Failure message, `None` on success
    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    pub fn code(&self) -> u16 {
        self.code
    }
}

impl fmt::Display for ActionResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.fault {
            Some(message) if !self.success => write!(f, "{} (code {})", message, self.code),
            _ => write!(f, "success (code {})", self.code),
        }
    }
}
