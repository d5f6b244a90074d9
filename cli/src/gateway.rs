//! Token gateway: balance reads and `transfer` / `mintDaily` submissions
//! against the FlashCoin contract.
//!
//! Each operation runs validate → convert → submit in order and returns its
//! own result. Nothing here retries, times out on its own, or deduplicates:
//! a transport error after broadcast looks exactly like one before it, and
//! the next balance read is the only reconciliation.

use tracing::{debug, info, warn};

use crate::error::{Result, WalletError};
use crate::provider::{SendOptions, TokenContract, TxId, WalletProvider};
use crate::session::Session;
use crate::units;

/// Fee ceiling attached to every state-mutating call, in sun.
pub const FEE_LIMIT: u64 = 100_000_000;

/// Accepted submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub tx_id: TxId,
    /// Status line for the presentation layer.
    pub message: String,
}

pub struct TokenGateway<'p> {
    provider: &'p dyn WalletProvider,
    contract_address: String,
}

impl<'p> TokenGateway<'p> {
    pub fn new(provider: &'p dyn WalletProvider, contract_address: impl Into<String>) -> Self {
        Self {
            provider,
            contract_address: contract_address.into(),
        }
    }

    pub fn contract_address(&self) -> &str {
        &self.contract_address
    }

    fn bind(&self, prefix: &str) -> Result<Box<dyn TokenContract + 'p>> {
        self.provider
            .contract(&self.contract_address)
            .map_err(|e| WalletError::submission(prefix, &e))
    }

    /// Read `balanceOf(active)` and return it as a display decimal.
    ///
    /// On error the caller keeps whatever balance it showed before.
    pub fn fetch_balance(&self, session: &Session) -> Result<String> {
        const PREFIX: &str = "Error fetching balance";
        let owner = session
            .active_address()
            .ok_or(WalletError::NotInitialized)?;

        let contract = self.bind(PREFIX)?;
        let raw = contract.balance_of(owner).map_err(|e| {
            warn!(error = %e, "balance read failed");
            WalletError::submission(PREFIX, &e)
        })?;
        let shown = units::to_display(raw);
        debug!(%owner, raw, %shown, "balance fetched");
        Ok(shown)
    }

    /// Submit `transfer(recipient, amount * 10^6)` with [`FEE_LIMIT`].
    pub fn send_tokens(&self, session: &Session, recipient: &str, amount: &str) -> Result<Receipt> {
        const PREFIX: &str = "Send failed";
        if !session.is_ready() {
            return Err(WalletError::NotInitialized);
        }
        if recipient.is_empty() || amount.is_empty() {
            return Err(WalletError::validation("Enter recipient and amount"));
        }
        let base_units = units::to_base_units(amount)?;

        let contract = self.bind(PREFIX)?;
        info!(%recipient, base_units, "Sending tokens...");
        let tx_id = contract
            .transfer(recipient, base_units, SendOptions { fee_limit: FEE_LIMIT })
            .map_err(|e| {
                warn!(error = %e, "transfer rejected");
                WalletError::submission(PREFIX, &e)
            })?;

        info!(%tx_id, "transfer accepted");
        Ok(Receipt {
            message: format!("Transaction sent! TXID: {tx_id}"),
            tx_id,
        })
    }

    /// Submit `mintDaily(active, amount * 10^6)` with [`FEE_LIMIT`].
    ///
    /// `is_owner` is a UI gate only; the contract rejects non-owner mints
    /// regardless of what this client decides.
    pub fn mint_daily_tokens(
        &self,
        session: &Session,
        is_owner: bool,
        mint_amount: &str,
    ) -> Result<Receipt> {
        const PREFIX: &str = "Mint failed";
        let to = match session.active_address() {
            Some(addr) if is_owner => addr,
            _ => return Err(WalletError::Unauthorized),
        };
        if mint_amount.is_empty() {
            return Err(WalletError::validation("Enter mint amount"));
        }
        let base_units = units::to_base_units(mint_amount)?;

        let contract = self.bind(PREFIX)?;
        info!(%to, base_units, "Minting tokens...");
        let tx_id = contract
            .mint_daily(to, base_units, SendOptions { fee_limit: FEE_LIMIT })
            .map_err(|e| {
                warn!(error = %e, "mintDaily rejected");
                WalletError::submission(PREFIX, &e)
            })?;

        info!(%tx_id, "mintDaily accepted");
        Ok(Receipt {
            message: format!("Mint transaction sent! TXID: {tx_id}"),
            tx_id,
        })
    }
}
