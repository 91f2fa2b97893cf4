//! Deterministic mock models used when running in test mode.

use super::roles::RoleAlias;

/// A canned-response model bound to a role alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockModel {
    role: RoleAlias,
}

impl MockModel {
    pub fn new(role: RoleAlias) -> Self {
        Self { role }
    }

    pub fn role(&self) -> RoleAlias {
        self.role
    }

    /// Identifier in the same `provider/model` shape live clients report.
    pub fn identifier(&self) -> String {
        format!("mock/{}", self.role)
    }

    /// Canned reply for a prompt. Same input always gives the same output.
    pub fn respond(&self, prompt: &str) -> String {
        match self.role {
            RoleAlias::ChatModel => "Hello, world!".to_string(),
            RoleAlias::ChatModelReasoning => {
                "<think>The user said hello, so I should greet them back.</think>Hello, world!"
                    .to_string()
            }
            RoleAlias::TitleModel => "This is a test title".to_string(),
            RoleAlias::ArtifactModel => format!("# Document\n\n{}", prompt.trim()),
        }
    }
}
