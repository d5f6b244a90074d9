//! Session bridge: which account is attached to the client, and whether it
//! is the contract owner.

use tracing::{debug, info};

use crate::error::{Result, WalletError};
use crate::provider::{ProviderStatus, WalletProvider};

/// Result of re-probing the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountChange {
    Unchanged,
    /// A different account is selected (or one became available).
    Switched { from: Option<String>, to: String },
    /// The provider went away or was locked.
    Lost { previous: String },
}

#[derive(Debug, Default)]
pub struct Session {
    active_address: Option<String>,
}

impl Session {
    /// Ask the provider for its status once.
    ///
    /// A missing or locked provider is not fatal: callers show the error as
    /// an informational status line and carry on with `Session::default()`.
    pub fn initialize(provider: &dyn WalletProvider) -> Result<Session> {
        match provider.status() {
            ProviderStatus::Ready { address } => {
                info!(%address, "wallet provider ready");
                Ok(Session {
                    active_address: Some(address),
                })
            }
            status => {
                info!(?status, "wallet provider unavailable");
                Err(WalletError::ProviderUnavailable)
            }
        }
    }

    pub fn active_address(&self) -> Option<&str> {
        self.active_address.as_deref()
    }

    pub fn is_ready(&self) -> bool {
        self.active_address.is_some()
    }

    /// Owner flag for the *current* address. Never cached.
    pub fn is_owner(&self, owner_address: &str) -> bool {
        role(self.active_address().unwrap_or(""), owner_address)
    }

    /// Re-check the provider and adopt whatever account it reports now.
    pub fn sync(&mut self, provider: &dyn WalletProvider) -> AccountChange {
        let current = provider.status().address().map(str::to_owned);
        if current == self.active_address {
            return AccountChange::Unchanged;
        }
        let previous = std::mem::replace(&mut self.active_address, current.clone());
        debug!(?previous, ?current, "active account changed");
        match current {
            Some(to) => AccountChange::Switched { from: previous, to },
            None => AccountChange::Lost {
                previous: previous.unwrap_or_default(),
            },
        }
    }
}

/// True iff `address` is non-empty and equals `owner_address` ignoring case.
///
/// UI gate only. The contract enforces the owner restriction on `mintDaily`.
pub fn role(address: &str, owner_address: &str) -> bool {
    !address.is_empty() && address.eq_ignore_ascii_case(owner_address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::RecordingProvider;

    const OWNER: &str = "TXyZOwnerAddr1111111111111111111";

    #[test]
    fn role_requires_exact_match_ignoring_case() {
        assert!(role(OWNER, OWNER));
        assert!(role(&OWNER.to_lowercase(), OWNER));
        assert!(role(&OWNER.to_uppercase(), OWNER));
        assert!(!role("TSomeoneElse", OWNER));
        assert!(!role(&OWNER[1..], OWNER));
    }

    #[test]
    fn empty_address_is_never_owner() {
        assert!(!role("", OWNER));
        assert!(!role("", ""));
    }

    #[test]
    fn missing_provider_leaves_session_empty() {
        for status in [ProviderStatus::NotInstalled, ProviderStatus::NotReady] {
            let provider = RecordingProvider::with_status(status);
            let err = Session::initialize(&provider).unwrap_err();
            assert_eq!(err, WalletError::ProviderUnavailable);
            let session = Session::default();
            assert!(!session.is_ready());
            assert!(!session.is_owner(OWNER));
            assert_eq!(provider.call_count(), 0);
        }
    }

    #[test]
    fn ready_provider_binds_selected_address() {
        let provider = RecordingProvider::ready("TUser");
        let session = Session::initialize(&provider).unwrap();
        assert_eq!(session.active_address(), Some("TUser"));
    }

    #[test]
    fn owner_flag_follows_account_switches() {
        let provider = RecordingProvider::ready("TUser");
        let mut session = Session::initialize(&provider).unwrap();
        assert!(!session.is_owner(OWNER));

        provider.switch_account(ProviderStatus::Ready {
            address: OWNER.to_lowercase(),
        });
        assert_eq!(
            session.sync(&provider),
            AccountChange::Switched {
                from: Some("TUser".into()),
                to: OWNER.to_lowercase(),
            }
        );
        assert!(session.is_owner(OWNER));
        assert_eq!(session.sync(&provider), AccountChange::Unchanged);

        provider.switch_account(ProviderStatus::NotReady);
        assert_eq!(
            session.sync(&provider),
            AccountChange::Lost {
                previous: OWNER.to_lowercase()
            }
        );
        assert!(!session.is_owner(OWNER));
    }
}
