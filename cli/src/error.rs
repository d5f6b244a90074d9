//! Error types for the wallet client.
//!
//! Every failure a user action can hit maps onto one [`WalletError`] variant.
//! The `Display` text of each variant is exactly the status line shown to the
//! user, so the presentation layer can write `err.to_string()` straight into
//! its status slot.

use thiserror::Error;

use crate::provider::ProviderError;
use crate::units::AmountError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// Provider missing or not logged in. Non-fatal; leaves the session empty.
    #[error("Please install and login to TronLink")]
    ProviderUnavailable,

    /// An action was invoked before the session was bound to a provider.
    #[error("TronWeb not initialized")]
    NotInitialized,

    /// Required input missing or unparsable. No contract call was made.
    #[error("{0}")]
    Validation(String),

    /// Non-owner attempted to mint. No contract call was made.
    ///
    /// This is a client-side gate only; the contract enforces the real
    /// owner restriction.
    #[error("Only owner can mint tokens")]
    Unauthorized,

    /// Balance read or transaction submission failed. The message already
    /// carries the action prefix ("Send failed: ...").
    #[error("{0}")]
    Submission(String),
}

pub type Result<T> = std::result::Result<T, WalletError>;

impl WalletError {
    pub fn validation(msg: impl Into<String>) -> Self {
        WalletError::Validation(msg.into())
    }

    /// Wrap a provider failure with the action prefix used in the status line.
    pub fn submission(prefix: &str, err: &ProviderError) -> Self {
        WalletError::Submission(format!("{prefix}: {}", err.reason()))
    }
}

impl From<AmountError> for WalletError {
    fn from(e: AmountError) -> Self {
        WalletError::Validation(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_matches_display() {
        assert_eq!(
            WalletError::ProviderUnavailable.to_string(),
            "Please install and login to TronLink"
        );
        assert_eq!(
            WalletError::Unauthorized.to_string(),
            "Only owner can mint tokens"
        );
        assert_eq!(
            WalletError::validation("Enter mint amount").to_string(),
            "Enter mint amount"
        );
    }

    #[test]
    fn submission_embeds_provider_reason() {
        let err = WalletError::submission(
            "Send failed",
            &ProviderError::CallFailed("REVERT opcode executed".into()),
        );
        assert_eq!(err.to_string(), "Send failed: REVERT opcode executed");
    }
}
