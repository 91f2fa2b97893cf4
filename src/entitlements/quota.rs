//! Daily message quota checks.

use serde::Serialize;

/// Usage against a daily message quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaStatus {
    pub used: u32,
    pub limit: u32,
    pub remaining: u32,
    pub exceeded: bool,
}

impl QuotaStatus {
    /// Compare messages sent today against the class limit.
    ///
    /// `exceeded` is set once `used` reaches the limit, so the next message
    /// must be refused.
    pub fn new(used: u32, limit: u32) -> Self {
        Self {
            used,
            limit,
            remaining: limit.saturating_sub(used),
            exceeded: used >= limit,
        }
    }

    pub fn can_send(&self) -> bool {
        !self.exceeded
    }
}
