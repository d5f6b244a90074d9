//! Wallet-provider capability contract.
//!
//! The client never holds keys. Everything that touches the chain goes
//! through a [`WalletProvider`]: it reports whether a logged-in account is
//! available and hands out [`TokenContract`] bindings whose send methods are
//! signed and broadcast by the provider itself.

use thiserror::Error;

/// Readiness of the injected wallet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderStatus {
    /// Wallet reachable and an account is selected.
    Ready { address: String },
    /// Wallet reachable but locked or without a selected account.
    NotReady,
    /// No wallet answered at all.
    NotInstalled,
}

impl ProviderStatus {
    pub fn address(&self) -> Option<&str> {
        match self {
            ProviderStatus::Ready { address } => Some(address.as_str()),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("wallet provider not installed")]
    NotInstalled,

    /// The provider or contract rejected the call (revert, user rejection).
    #[error("call failed: {0}")]
    CallFailed(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// The bare reason, without the variant prefix, for status lines.
    pub fn reason(&self) -> String {
        match self {
            ProviderError::NotInstalled => "wallet provider not installed".into(),
            ProviderError::CallFailed(m)
            | ProviderError::Transport(m)
            | ProviderError::Malformed(m) => m.clone(),
        }
    }
}

/// Options attached to a state-mutating call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SendOptions {
    /// Maximum fee (in sun) the network may burn for this transaction.
    pub fee_limit: u64,
}

/// Transaction identifier returned when the provider accepts a submission.
pub type TxId = String;

/// Binding to the FlashCoin contract at a fixed address.
pub trait TokenContract {
    /// `balanceOf(owner)` in base units.
    fn balance_of(&self, owner: &str) -> Result<u128, ProviderError>;

    /// `transfer(to, amount)`; signed and broadcast by the provider.
    fn transfer(&self, to: &str, amount: u128, opts: SendOptions) -> Result<TxId, ProviderError>;

    /// `mintDaily(to, amount)`; owner-only on the contract side.
    fn mint_daily(&self, to: &str, amount: u128, opts: SendOptions)
        -> Result<TxId, ProviderError>;
}

pub trait WalletProvider {
    fn status(&self) -> ProviderStatus;

    fn contract(&self, address: &str) -> Result<Box<dyn TokenContract + '_>, ProviderError>;
}
