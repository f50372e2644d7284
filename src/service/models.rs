use crate::common::DnsChange;

pub const MESSAGE_UPDATED: &str = "DNS record(s) updated successfully";
pub const MESSAGE_DRY_RUN: &str = "Dry run completed, no changes applied";
pub const WARNING_WAN2_UNRESOLVED: &str = "WAN2 record configured but IP not found in UniFi API";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct WanRecord {
    pub record: String,
    pub ip: String,
}

/// Outcome of a successful pass.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub message: String,
    pub wan1: WanRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wan2: Option<WanRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// The batch that was (or in a dry run, would have been) submitted.
    #[serde(skip)]
    pub changes: Vec<DnsChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum ReconciliationResult {
    Success(Reconciliation),
    Failure { error: String },
}

impl ReconciliationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Success(_) => 200,
            Self::Failure { .. } => 500,
        }
    }

    /// The `{statusCode, body}` document printed by the CLI.
    pub fn to_response(&self) -> serde_json::Value {
        serde_json::json!({
            "statusCode": self.status_code(),
            "body": self,
        })
    }
}

impl From<crate::common::Result<Reconciliation>> for ReconciliationResult {
    fn from(value: crate::common::Result<Reconciliation>) -> Self {
        match value {
            Ok(reconciliation) => Self::Success(reconciliation),
            Err(err) => Self::Failure {
                error: err.to_string(),
            },
        }
    }
}
