//! FlashCoin wallet client.
//!
//! A thin adapter between a user and the FlashCoin TRC20 contract. Keys,
//! signing, broadcast and confirmation all belong to an external wallet
//! provider; this crate only reads the holder's balance and submits
//! `transfer` / `mintDaily` calls through it.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`session`] | Bind to the provider, track the active account and owner flag |
//! | [`gateway`] | Balance reads and transaction submission |
//! | [`units`]   | Exact display ↔ base-unit conversion (6 decimals) |
//! | [`provider`] | Capability contract the provider must satisfy |
//! | [`bridge`]  | JSON-RPC provider for an external wallet bridge |
//! | [`app`]     | Presentation model: forms, balance, status line |
//! | [`config`]  | Contract / owner / endpoint configuration |
//!
//! # Trust boundary
//!
//! The owner check that hides the mint form is a convenience. Real
//! authorisation lives in the contract's `mintDaily`.

pub mod app;
pub mod bridge;
pub mod config;
pub mod error;
pub mod gateway;
pub mod provider;
pub mod session;
pub mod units;

pub use app::WalletApp;
pub use error::{Result, WalletError};
