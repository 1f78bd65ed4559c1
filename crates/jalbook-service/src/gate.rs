//! # Access Gate
//!
//! The authentication boundary, modeled as a capability wrapper: the shell
//! holds an [`AccessGate`], and only a correct passcode hands out the
//! [`SupplyService`] behind it. There are no user accounts; the business
//! runs on one shared passcode, so the gate is deliberately minimal.
//!
//! Session persistence (staying unlocked across app restarts) is the
//! shell's concern, not modeled here.

use crate::error::ServiceError;
use crate::service::SupplyService;

/// Guards the service behind a shared passcode.
#[derive(Debug, Clone)]
pub struct AccessGate {
    service: SupplyService,
    passcode: String,
}

impl AccessGate {
    /// Wraps a service behind the given passcode.
    pub fn new(service: SupplyService, passcode: impl Into<String>) -> Self {
        AccessGate {
            service,
            passcode: passcode.into(),
        }
    }

    /// Returns the service if the passcode matches.
    ///
    /// ## Errors
    /// `Unauthorized` on a wrong passcode. The error carries no hint about
    /// the expected value.
    pub fn unlock(&self, attempt: &str) -> Result<&SupplyService, ServiceError> {
        if attempt == self.passcode {
            Ok(&self.service)
        } else {
            Err(ServiceError::unauthorized())
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use jalbook_core::RateTable;
    use jalbook_db::{Database, DbConfig};

    #[tokio::test]
    async fn test_unlock_with_correct_passcode() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let gate = AccessGate::new(SupplyService::new(db, RateTable::standard()), "jal123");

        let service = gate.unlock("jal123").unwrap();
        assert!(service.get_customers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unlock_with_wrong_passcode() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let gate = AccessGate::new(SupplyService::new(db, RateTable::standard()), "jal123");

        let err = gate.unlock("wrong").unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }
}
