//! Approval threshold configuration

use serde::{Deserialize, Serialize};

/// Minimum number of approvals a review needs before it counts as approved.
///
/// Loaded once at startup and injected into the review service; never
/// mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalConfig {
    pub min_count: u32,
}

impl ApprovalConfig {
    pub const DEFAULT_MIN_COUNT: u32 = 3;

    pub fn new(min_count: u32) -> Self {
        Self { min_count }
    }

    pub fn is_approved(&self, approval_count: u32) -> bool {
        approval_count >= self.min_count
    }
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        let config = ApprovalConfig::new(2);
        assert!(!config.is_approved(0));
        assert!(!config.is_approved(1));
        assert!(config.is_approved(2));
        assert!(config.is_approved(5));
    }

    #[test]
    fn default_threshold() {
        assert_eq!(ApprovalConfig::default().min_count, 3);
    }
}
