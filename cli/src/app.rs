//! Presentation model for the wallet: connected account, balance, the send
//! and mint forms, and one status line.
//!
//! The status line is last-write-wins. Each operation also returns its own
//! result, so a caller that needs per-request outcomes reads the return
//! value and ignores [`WalletApp::status`].

use tracing::debug;

use crate::config::Config;
use crate::error::{Result, WalletError};
use crate::gateway::{Receipt, TokenGateway};
use crate::provider::WalletProvider;
use crate::session::{AccountChange, Session};

/// An accepted send or mint, plus the balance read that followed it.
///
/// The read can fail after the transaction was accepted; `receipt` still
/// holds the tx id even when the status line shows the read error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settled {
    pub receipt: Receipt,
    pub balance: Result<String>,
}

pub struct WalletApp<'p> {
    provider: &'p dyn WalletProvider,
    gateway: TokenGateway<'p>,
    owner_address: String,
    session: Session,
    balance: String,
    status: String,

    pub recipient: String,
    pub amount: String,
    pub mint_amount: String,
}

impl<'p> WalletApp<'p> {
    pub fn new(provider: &'p dyn WalletProvider, config: &Config) -> Self {
        Self {
            provider,
            gateway: TokenGateway::new(provider, config.contract_address.clone()),
            owner_address: config.owner_address.clone(),
            session: Session::default(),
            balance: "0".to_owned(),
            status: String::new(),
            recipient: String::new(),
            amount: String::new(),
            mint_amount: String::new(),
        }
    }

    /// Bind to the provider and, if an account is selected, load its balance.
    ///
    /// Errors are the missing provider or the first balance read; either is
    /// also on the status line, and the app stays usable.
    pub fn start(&mut self) -> Result<()> {
        self.session = match Session::initialize(self.provider) {
            Ok(session) => session,
            Err(e) => {
                self.session = Session::default();
                self.status = e.to_string();
                return Err(e);
            }
        };
        self.refresh_balance().map(|_| ())
    }

    /// Re-check the provider; reload the balance when the account changed.
    pub fn poll(&mut self) -> AccountChange {
        let change = self.session.sync(self.provider);
        match &change {
            AccountChange::Unchanged => {}
            AccountChange::Switched { from, .. } => {
                // Reconnected: the install hint no longer applies.
                if from.is_none() {
                    self.status.clear();
                }
                let _ = self.refresh_balance();
            }
            AccountChange::Lost { .. } => {
                self.balance = "0".to_owned();
                self.status = WalletError::ProviderUnavailable.to_string();
            }
        }
        change
    }

    /// Reload the balance. Leaves the old value in place on failure.
    pub fn refresh_balance(&mut self) -> Result<String> {
        if !self.session.is_ready() {
            return Err(WalletError::NotInitialized);
        }
        match self.gateway.fetch_balance(&self.session) {
            Ok(balance) => {
                self.balance = balance.clone();
                Ok(balance)
            }
            Err(e) => {
                self.status = e.to_string();
                Err(e)
            }
        }
    }

    /// Submit the send form. Clears it on acceptance, keeps it on failure.
    pub fn send(&mut self) -> Result<Settled> {
        let res = self
            .gateway
            .send_tokens(&self.session, &self.recipient, &self.amount);
        self.settle(res, |app| {
            app.recipient.clear();
            app.amount.clear();
        })
    }

    /// Submit the mint form. Owner only.
    pub fn mint(&mut self) -> Result<Settled> {
        let res = self
            .gateway
            .mint_daily_tokens(&self.session, self.is_owner(), &self.mint_amount);
        self.settle(res, |app| app.mint_amount.clear())
    }

    fn settle(
        &mut self,
        res: Result<Receipt>,
        clear_inputs: impl FnOnce(&mut Self),
    ) -> Result<Settled> {
        match res {
            Ok(receipt) => {
                self.status = receipt.message.clone();
                clear_inputs(self);
                // Balance read failures overwrite the status line.
                let balance = self.refresh_balance();
                Ok(Settled { receipt, balance })
            }
            Err(e) => {
                debug!(error = %e, "action failed; inputs kept for retry");
                self.status = e.to_string();
                Err(e)
            }
        }
    }

    pub fn account(&self) -> Option<&str> {
        self.session.active_address()
    }

    pub fn balance(&self) -> &str {
        &self.balance
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn contract_address(&self) -> &str {
        self.gateway.contract_address()
    }

    pub fn is_owner(&self) -> bool {
        self.session.is_owner(&self.owner_address)
    }

    /// Whether the mint form is shown at all.
    pub fn mint_form_enabled(&self) -> bool {
        self.is_owner()
    }
}
