//! Workflow configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::workflow::WorkflowPolicy;

/// Days allowed for each human step before a workflow counts as overdue.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default = "default_sla_days")]
    pub review_sla_days: u32,

    #[serde(default = "default_sla_days")]
    pub approval_sla_days: u32,
}

impl WorkflowConfig {
    pub fn policy(&self) -> WorkflowPolicy {
        WorkflowPolicy {
            review_sla_days: self.review_sla_days,
            approval_sla_days: self.approval_sla_days,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for days in [self.review_sla_days, self.approval_sla_days] {
            if days == 0 || days > 365 {
                return Err(ValidationError::InvalidSla(days));
            }
        }
        Ok(())
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            review_sla_days: default_sla_days(),
            approval_sla_days: default_sla_days(),
        }
    }
}

fn default_sla_days() -> u32 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_matches_engine_default() {
        assert_eq!(WorkflowConfig::default().policy(), WorkflowPolicy::default());
    }

    #[test]
    fn test_rejects_zero_sla() {
        let config = WorkflowConfig {
            review_sla_days: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSla(0)));
    }

    #[test]
    fn test_rejects_sla_over_a_year() {
        let config = WorkflowConfig {
            approval_sla_days: 400,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSla(400)));
    }
}
