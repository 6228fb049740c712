//! Skip policy derived from a UI onboarding configuration.
//!
//! The engine only exposes the policy; enforcing it is the job of the caller
//! (see the policy-guarded skip use case in the application crate).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipPolicy {
    pub allow_skip: bool,
    pub max_skip_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipDecision {
    Allowed { remaining: u32 },
    Disabled,
    LimitReached { max_skip_count: u32 },
}

impl SkipPolicy {
    pub fn evaluate(&self, skips_used: u32) -> SkipDecision {
        if !self.allow_skip {
            return SkipDecision::Disabled;
        }
        if skips_used >= self.max_skip_count {
            return SkipDecision::LimitReached {
                max_skip_count: self.max_skip_count,
            };
        }
        SkipDecision::Allowed {
            remaining: self.max_skip_count - skips_used,
        }
    }
}

impl SkipDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, SkipDecision::Allowed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_policy_rejects_every_skip() {
        let policy = SkipPolicy {
            allow_skip: false,
            max_skip_count: 10,
        };
        assert_eq!(policy.evaluate(0), SkipDecision::Disabled);
    }

    #[test]
    fn test_limit_locks_skip_after_max_count() {
        let policy = SkipPolicy {
            allow_skip: true,
            max_skip_count: 2,
        };
        assert_eq!(policy.evaluate(0), SkipDecision::Allowed { remaining: 2 });
        assert_eq!(policy.evaluate(1), SkipDecision::Allowed { remaining: 1 });
        assert_eq!(
            policy.evaluate(2),
            SkipDecision::LimitReached { max_skip_count: 2 }
        );
        assert!(!policy.evaluate(5).is_allowed());
    }
}
