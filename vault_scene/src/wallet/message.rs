//! Inbound host payloads and their validation.
//!
//! Host text is untrusted. Anything that is not a recognisable `setWallet`
//! message is rejected with a logged reason and otherwise ignored, so newer
//! hosts can send message types this build does not know about.

use bevy::log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::wallet::denomination::{self, CoinBatch};

/// Discriminator of the only inbound message type the vault acts on.
pub const SET_WALLET: &str = "setWallet";

/// A single token holding as sent by the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub symbol: String,
    #[serde(default, deserialize_with = "null_as_nan")]
    pub amount: f64,
}

impl Balance {
    pub fn new(symbol: impl Into<String>, amount: f64) -> Self {
        Self {
            symbol: symbol.into(),
            amount,
        }
    }
}

/// A validated `setWallet` message. Balance order is the host's order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WalletUpdate {
    pub balances: Vec<Balance>,
}

impl WalletUpdate {
    pub fn new(balances: Vec<Balance>) -> Self {
        Self { balances }
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Coin batches in message order, including empty ones.
    pub fn batches(&self) -> impl Iterator<Item = CoinBatch> + '_ {
        self.balances
            .iter()
            .map(|balance| denomination::compute(&balance.symbol, balance.amount))
    }
}

/// Why a host payload was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("payload is blank")]
    Blank,
    #[error("payload is not a valid message: {0}")]
    Malformed(String),
    #[error("payload is null or an empty object")]
    Empty,
    #[error("unsupported message type {0:?}")]
    UnsupportedType(String),
}

#[derive(Deserialize)]
struct RawMessage {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    balances: Option<Vec<Balance>>,
}

/// Decode and validate a host payload.
pub fn validate(raw: &str) -> Result<WalletUpdate, Rejection> {
    if raw.trim().is_empty() {
        return Err(Rejection::Blank);
    }

    let value: Value =
        serde_json::from_str(raw).map_err(|err| Rejection::Malformed(err.to_string()))?;
    match &value {
        Value::Null => return Err(Rejection::Empty),
        Value::Object(fields) if fields.is_empty() => return Err(Rejection::Empty),
        Value::Object(_) => {}
        _ => return Err(Rejection::Malformed("expected a JSON object".to_string())),
    }

    let message: RawMessage =
        serde_json::from_value(value).map_err(|err| Rejection::Malformed(err.to_string()))?;
    let kind = message.kind.unwrap_or_default();
    if !kind.eq_ignore_ascii_case(SET_WALLET) {
        return Err(Rejection::UnsupportedType(kind));
    }

    Ok(WalletUpdate {
        balances: message.balances.unwrap_or_default(),
    })
}

/// Like [`validate`], but logs and swallows the rejection.
pub fn parse(raw: &str) -> Option<WalletUpdate> {
    match validate(raw) {
        Ok(update) => Some(update),
        Err(rejection) => {
            warn!("vault: ignoring host payload: {rejection}");
            None
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_set_wallet_and_keeps_order() {
        let update = validate(
            r#"{"type":"setWallet","balances":[
                {"symbol":"eth","amount":3.5},
                {"symbol":"BTC","amount":1234.5},
                {"symbol":"usdc","amount":0}
            ]}"#,
        )
        .unwrap();

        let symbols: Vec<_> = update.balances.iter().map(|b| b.symbol.as_str()).collect();
        assert_eq!(symbols, ["eth", "BTC", "usdc"]);
        assert_eq!(update.balances[1].amount, 1234.5);
    }

    #[test]
    fn type_match_is_case_insensitive() {
        assert!(validate(r#"{"type":"SETWALLET","balances":[]}"#).is_ok());
        assert!(validate(r#"{"type":"setwallet"}"#).is_ok());
    }

    #[test]
    fn missing_or_null_balances_mean_no_holdings() {
        assert!(validate(r#"{"type":"setWallet"}"#).unwrap().is_empty());
        assert!(validate(r#"{"type":"setWallet","balances":null}"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn malformed_text_is_rejected() {
        assert_eq!(validate(""), Err(Rejection::Blank));
        assert_eq!(validate("  \n\t"), Err(Rejection::Blank));
        assert!(matches!(validate("{not json"), Err(Rejection::Malformed(_))));
        assert!(matches!(validate("[1,2]"), Err(Rejection::Malformed(_))));
        assert!(matches!(
            validate(r#"{"type":"setWallet","balances":{"symbol":"BTC"}}"#),
            Err(Rejection::Malformed(_))
        ));
    }

    #[test]
    fn null_and_empty_objects_are_rejected() {
        assert_eq!(validate("null"), Err(Rejection::Empty));
        assert_eq!(validate("{}"), Err(Rejection::Empty));
    }

    #[test]
    fn unknown_types_are_ignored() {
        assert_eq!(
            validate(r#"{"type":"ping"}"#),
            Err(Rejection::UnsupportedType("ping".to_string()))
        );
        assert_eq!(
            validate(r#"{"balances":[]}"#),
            Err(Rejection::UnsupportedType(String::new()))
        );
        assert!(parse(r#"{"type":"setWallets","balances":[]}"#).is_none());
    }

    #[test]
    fn missing_balance_fields_fall_back() {
        let update = validate(
            r#"{"type":"setWallet","balances":[{"amount":5},{"symbol":null,"amount":null},{"symbol":"dot"}]}"#,
        )
        .unwrap();

        assert_eq!(update.balances[0].symbol, "");
        assert_eq!(update.balances[0].amount, 5.0);
        assert!(update.balances[1].amount.is_nan());
        assert_eq!(update.balances[2].amount, 0.0);

        let batches: Vec<_> = update.batches().collect();
        assert_eq!(batches[0].symbol, "UNKNOWN");
        assert_eq!(batches[0].coin_count, 5);
        assert!(batches[1].is_empty());
        assert!(batches[2].is_empty());
    }
}
