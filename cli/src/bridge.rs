//! JSON-RPC client for an external wallet bridge.
//!
//! The bridge is a local process (a browser-extension relay or a hardware
//! wallet daemon) that owns the keys, signs and broadcasts. This module only
//! speaks its request/response protocol over HTTP:
//!
//! ```text
//! wallet_status   {}                                        -> { "ready": bool, "address": "T..." }
//! contract_call   { contract, method, args }                -> "<decimal base units>"
//! contract_send   { contract, method, args, options:{feeLimit} } -> "<txid>"
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::provider::{
    ProviderError, ProviderStatus, SendOptions, TokenContract, TxId, WalletProvider,
};

/// Default bridge endpoint.
pub const DEFAULT_PROVIDER_URL: &str = "http://127.0.0.1:8545";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ── JSON-RPC envelope ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct StatusResult {
    ready: bool,
    #[serde(default)]
    address: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendOptionsWire {
    fee_limit: u64,
}

// ── Provider ──────────────────────────────────────────────────────────────────

pub struct BridgeProvider {
    url: String,
    client: reqwest::blocking::Client,
}

impl BridgeProvider {
    pub fn new(url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        debug!(%method, url = %self.url, "wallet bridge request");

        let resp: RpcResponse = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .map_err(|e| ProviderError::Transport(e.to_string()))?
            .json()
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        into_result(resp)
    }
}

fn into_result(resp: RpcResponse) -> Result<Value, ProviderError> {
    if let Some(err) = resp.error {
        return Err(ProviderError::CallFailed(err.message));
    }
    resp.result
        .ok_or_else(|| ProviderError::Malformed("response has neither result nor error".into()))
}

fn parse_status(value: Value) -> ProviderStatus {
    match serde_json::from_value::<StatusResult>(value) {
        Ok(StatusResult {
            ready: true,
            address: Some(address),
        }) if !address.is_empty() => ProviderStatus::Ready { address },
        Ok(_) => ProviderStatus::NotReady,
        Err(e) => {
            debug!(error = %e, "unreadable wallet_status result");
            ProviderStatus::NotReady
        }
    }
}

/// Contract reads come back as decimal strings (uint256 does not fit a JSON
/// number); accept plain numbers too.
fn parse_amount(value: &Value) -> Result<u128, ProviderError> {
    match value {
        Value::String(s) => s
            .parse()
            .map_err(|_| ProviderError::Malformed(format!("not a base-unit amount: {s}"))),
        Value::Number(n) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| ProviderError::Malformed(format!("not a base-unit amount: {n}"))),
        other => Err(ProviderError::Malformed(format!(
            "not a base-unit amount: {other}"
        ))),
    }
}

/// State-mutating contract methods the client submits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SendMethod {
    Transfer,
    MintDaily,
}

impl SendMethod {
    fn abi_name(self) -> &'static str {
        match self {
            SendMethod::Transfer => "transfer",
            SendMethod::MintDaily => "mintDaily",
        }
    }
}

fn balance_of_params(contract: &str, owner: &str) -> Value {
    json!({
        "contract": contract,
        "method": "balanceOf",
        "args": [owner],
    })
}

/// Amounts travel as decimal strings so uint256 values survive JSON.
fn send_params(
    contract: &str,
    method: SendMethod,
    to: &str,
    amount: u128,
    opts: SendOptions,
) -> Value {
    json!({
        "contract": contract,
        "method": method.abi_name(),
        "args": [to, amount.to_string()],
        "options": SendOptionsWire {
            fee_limit: opts.fee_limit,
        },
    })
}

/// A bridge nobody answers for is "not installed"; one that answers but
/// refuses or garbles the status is "not ready".
fn status_from_error(err: &ProviderError) -> ProviderStatus {
    match err {
        ProviderError::Transport(_) | ProviderError::NotInstalled => ProviderStatus::NotInstalled,
        ProviderError::CallFailed(_) | ProviderError::Malformed(_) => ProviderStatus::NotReady,
    }
}

fn parse_tx_id(value: Value) -> Result<TxId, ProviderError> {
    match value {
        Value::String(s) if !s.is_empty() => Ok(s),
        other => Err(ProviderError::Malformed(format!(
            "expected transaction id, got {other}"
        ))),
    }
}

impl WalletProvider for BridgeProvider {
    fn status(&self) -> ProviderStatus {
        match self.request("wallet_status", json!({})) {
            Ok(value) => parse_status(value),
            Err(e) => {
                debug!(error = %e, "wallet bridge status unavailable");
                status_from_error(&e)
            }
        }
    }

    fn contract(&self, address: &str) -> Result<Box<dyn TokenContract + '_>, ProviderError> {
        Ok(Box::new(BridgeContract {
            bridge: self,
            address: address.to_owned(),
        }))
    }
}

struct BridgeContract<'a> {
    bridge: &'a BridgeProvider,
    address: String,
}

impl BridgeContract<'_> {
    fn send(
        &self,
        method: SendMethod,
        to: &str,
        amount: u128,
        opts: SendOptions,
    ) -> Result<TxId, ProviderError> {
        let value = self.bridge.request(
            "contract_send",
            send_params(&self.address, method, to, amount, opts),
        )?;
        parse_tx_id(value)
    }
}

impl TokenContract for BridgeContract<'_> {
    fn balance_of(&self, owner: &str) -> Result<u128, ProviderError> {
        let value = self
            .bridge
            .request("contract_call", balance_of_params(&self.address, owner))?;
        parse_amount(&value)
    }

    fn transfer(&self, to: &str, amount: u128, opts: SendOptions) -> Result<TxId, ProviderError> {
        self.send(SendMethod::Transfer, to, amount, opts)
    }

    fn mint_daily(&self, to: &str, amount: u128, opts: SendOptions) -> Result<TxId, ProviderError> {
        self.send(SendMethod::MintDaily, to, amount, opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(raw: &str) -> RpcResponse {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn rpc_error_becomes_call_failed() {
        let resp = response(r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"REVERT opcode executed"}}"#);
        assert_eq!(
            into_result(resp),
            Err(ProviderError::CallFailed("REVERT opcode executed".into()))
        );
    }

    #[test]
    fn empty_envelope_is_malformed() {
        let resp = response(r#"{"jsonrpc":"2.0","id":1}"#);
        assert!(matches!(into_result(resp), Err(ProviderError::Malformed(_))));
    }

    #[test]
    fn status_requires_ready_flag_and_address() {
        assert_eq!(
            parse_status(json!({"ready": true, "address": "TUser"})),
            ProviderStatus::Ready {
                address: "TUser".into()
            }
        );
        assert_eq!(
            parse_status(json!({"ready": false, "address": "TUser"})),
            ProviderStatus::NotReady
        );
        assert_eq!(parse_status(json!({"ready": true})), ProviderStatus::NotReady);
        assert_eq!(
            parse_status(json!({"ready": true, "address": ""})),
            ProviderStatus::NotReady
        );
        assert_eq!(parse_status(json!("yes")), ProviderStatus::NotReady);
    }

    #[test]
    fn amounts_accept_strings_and_numbers() {
        assert_eq!(parse_amount(&json!("1500000")).unwrap(), 1_500_000);
        assert_eq!(parse_amount(&json!(42)).unwrap(), 42);
        assert_eq!(
            parse_amount(&json!("340282366920938463463374607431768211455")).unwrap(),
            u128::MAX
        );
        assert!(parse_amount(&json!("-1")).is_err());
        assert!(parse_amount(&json!(1.5)).is_err());
        assert!(parse_amount(&json!(null)).is_err());
    }

    #[test]
    fn tx_id_must_be_non_empty_string() {
        assert_eq!(parse_tx_id(json!("0xabc")).unwrap(), "0xabc");
        assert!(parse_tx_id(json!("")).is_err());
        assert!(parse_tx_id(json!({"txid": "0xabc"})).is_err());
    }

    #[test]
    fn send_options_use_camel_case() {
        let wire = serde_json::to_value(SendOptionsWire {
            fee_limit: 100_000_000,
        })
        .unwrap();
        assert_eq!(wire, json!({"feeLimit": 100_000_000}));
    }

    #[test]
    fn unreachable_bridge_reports_not_installed() {
        assert_eq!(
            status_from_error(&ProviderError::Transport("connection refused".into())),
            ProviderStatus::NotInstalled
        );
        assert_eq!(
            status_from_error(&ProviderError::Malformed("expected value".into())),
            ProviderStatus::NotReady
        );
        assert_eq!(
            status_from_error(&ProviderError::CallFailed("wallet locked".into())),
            ProviderStatus::NotReady
        );
    }

    #[test]
    fn balance_of_request_body() {
        assert_eq!(
            balance_of_params("TFlashCoin", "TUser"),
            json!({
                "contract": "TFlashCoin",
                "method": "balanceOf",
                "args": ["TUser"],
            })
        );
    }

    #[test]
    fn transfer_request_body() {
        let opts = SendOptions {
            fee_limit: crate::gateway::FEE_LIMIT,
        };
        assert_eq!(
            send_params("TFlashCoin", SendMethod::Transfer, "TBob", 2_500_000, opts),
            json!({
                "contract": "TFlashCoin",
                "method": "transfer",
                "args": ["TBob", "2500000"],
                "options": { "feeLimit": 100_000_000 },
            })
        );
    }

    #[test]
    fn mint_daily_request_body() {
        let opts = SendOptions {
            fee_limit: crate::gateway::FEE_LIMIT,
        };
        assert_eq!(
            send_params("TFlashCoin", SendMethod::MintDaily, "TOwner", u128::MAX, opts),
            json!({
                "contract": "TFlashCoin",
                "method": "mintDaily",
                "args": ["TOwner", "340282366920938463463374607431768211455"],
                "options": { "feeLimit": 100_000_000 },
            })
        );
    }
}
