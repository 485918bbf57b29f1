use crate::services::{ServiceError, VerificationStatus};
use log::{debug, warn};

/// What a verification-status response means for the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// KYC was started but not finished: reopen the KYC prompt.
    PromptKyc,
    /// The address is verified.
    Verified,
    /// Nothing to change. Covers unknown addresses and failed lookups.
    Unchanged,
}

/// Interpret a verification lookup.
///
/// An unknown address (`not_found`, or HTTP 404) is not an error. Any
/// other failure is logged and otherwise ignored.
pub fn interpret(address: &str, result: Result<VerificationStatus, ServiceError>) -> VerificationOutcome {
    match result {
        Ok(VerificationStatus::Pending) => VerificationOutcome::PromptKyc,
        Ok(VerificationStatus::Success) => VerificationOutcome::Verified,
        Ok(VerificationStatus::NotFound) => VerificationOutcome::Unchanged,
        Err(e) if e.is_not_found() => {
            debug!("{} has no verification record", address);
            VerificationOutcome::Unchanged
        }
        Err(e) => {
            warn!("verification status lookup for {} failed: {}", address, e);
            VerificationOutcome::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "0x1111111111111111111111111111111111111111";

    #[test]
    fn test_statuses() {
        assert_eq!(
            interpret(ADDRESS, Ok(VerificationStatus::Pending)),
            VerificationOutcome::PromptKyc
        );
        assert_eq!(
            interpret(ADDRESS, Ok(VerificationStatus::Success)),
            VerificationOutcome::Verified
        );
        assert_eq!(
            interpret(ADDRESS, Ok(VerificationStatus::NotFound)),
            VerificationOutcome::Unchanged
        );
    }

    #[test]
    fn test_failures_are_swallowed() {
        let not_found = ServiceError::Http {
            status: 404,
            message: "not found".into(),
        };
        assert_eq!(interpret(ADDRESS, Err(not_found)), VerificationOutcome::Unchanged);
        assert_eq!(
            interpret(ADDRESS, Err(ServiceError::Network("reset".into()))),
            VerificationOutcome::Unchanged
        );
    }
}
