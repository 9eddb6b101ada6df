//! The restricted command language actions are expressed in.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single capability invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandInvocation {
    /// Name of the bound capability to call.
    pub call: String,
    /// Positional arguments passed through as JSON values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,
}

/// One invocation or an ordered sequence of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandProgram {
    Single(CommandInvocation),
    Sequence(Vec<CommandInvocation>),
}

impl CommandProgram {
    pub fn parse(code: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(code)
    }

    pub fn into_invocations(self) -> Vec<CommandInvocation> {
        match self {
            Self::Single(invocation) => vec![invocation],
            Self::Sequence(invocations) => invocations,
        }
    }
}

/// Strip a markdown code fence some models wrap their program in.
pub fn strip_code_fences(code: &str) -> &str {
    let trimmed = code.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. ```json) up to the first newline.
    let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or("");
    body.strip_suffix("```").unwrap_or(body).trim()
}
