//! Billing account reference returned by the billing provisioner

use serde::{Deserialize, Serialize};
use std::fmt;

/// External billing account identifier plus status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAccount {
    pub account_id: String,
    pub status: String,
}

impl BillingAccount {
    pub fn new(account_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            status: status.into(),
        }
    }
}

impl fmt::Display for BillingAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.account_id, self.status)
    }
}
