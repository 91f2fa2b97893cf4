//! Internal role aliases.
//!
//! Roles are fixed-purpose keys used by the inference pipeline instead of a
//! public catalog id. In live mode each role points at a catalog id through
//! an explicit table; in test mode each role gets a mock model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fixed internal model roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoleAlias {
    #[serde(rename = "chat-model")]
    ChatModel,
    #[serde(rename = "chat-model-reasoning")]
    ChatModelReasoning,
    #[serde(rename = "title-model")]
    TitleModel,
    #[serde(rename = "artifact-model")]
    ArtifactModel,
}

impl RoleAlias {
    pub const ALL: [RoleAlias; 4] = [
        RoleAlias::ChatModel,
        RoleAlias::ChatModelReasoning,
        RoleAlias::TitleModel,
        RoleAlias::ArtifactModel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleAlias::ChatModel => "chat-model",
            RoleAlias::ChatModelReasoning => "chat-model-reasoning",
            RoleAlias::TitleModel => "title-model",
            RoleAlias::ArtifactModel => "artifact-model",
        }
    }
}

impl fmt::Display for RoleAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleAlias {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleAlias::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("invalid role alias: {s}"))
    }
}

/// Live role table: role, target catalog id, reasoning tag to extract.
pub(crate) fn live_role_targets() -> [(RoleAlias, &'static str, Option<&'static str>); 4] {
    [
        (RoleAlias::ChatModel, "gemini-2.0-flash-exp", None),
        (RoleAlias::ChatModelReasoning, "o1", Some("think")),
        (RoleAlias::TitleModel, "gemini-1.5-flash", None),
        (RoleAlias::ArtifactModel, "gemini-1.5-pro", None),
    ]
}
