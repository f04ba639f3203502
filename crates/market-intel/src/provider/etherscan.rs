//! Ethereum gas and supply data from Etherscan (API key required).

use serde::Deserialize;
use serde_json::Value;

use crate::errors::IntelError;
use crate::http::{RateLimitedClient, Request, SourceTag};

pub const BASE_URL: &str = "https://api.etherscan.io/api";
pub const CREDENTIAL: &str = "ETHERSCAN_API_KEY";
const TAG: SourceTag = SourceTag::Etherscan;
const WEI_PER_ETH: f64 = 1e18;

/// Etherscan wraps every answer as `{status, message, result}`; `status`
/// is `"1"` on success.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
}

/// Gas oracle tiers in gwei.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GasOracle {
    pub safe: f64,
    pub propose: f64,
    pub fast: f64,
    pub base_fee: f64,
    pub gas_used_ratio: String,
}

#[derive(Clone)]
pub struct EtherscanApi {
    client: RateLimitedClient,
    base_url: String,
    api_key: String,
}

impl EtherscanApi {
    pub fn new(client: RateLimitedClient, api_key: String) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_string(),
            api_key,
        }
    }

    async fn call(&self, module: &str, action: &str) -> Result<Value, IntelError> {
        let request = Request::get(&self.base_url)
            .query("module", module)
            .query("action", action)
            .query("apikey", &self.api_key);

        let envelope: Envelope = self.client.get_json(TAG, request).await?;
        if envelope.status != "1" {
            return Err(IntelError::no_data(format!(
                "Etherscan {}/{} returned status {:?}: {}",
                module, action, envelope.status, envelope.message
            )));
        }
        Ok(envelope.result)
    }

    pub async fn gas_oracle(&self) -> Result<GasOracle, IntelError> {
        let result = self.call("gastracker", "gasoracle").await?;
        parse_gas_oracle(&result)
    }

    /// Total ETH supply.
    pub async fn total_supply(&self) -> Result<f64, IntelError> {
        let result = self.call("stats", "ethsupply").await?;
        number(&result)
            .map(|wei| wei / WEI_PER_ETH)
            .ok_or_else(|| IntelError::malformed(TAG, "ethsupply result is not a number"))
    }

    /// ETH held by the staking deposit contract.
    pub async fn staking_total(&self) -> Result<f64, IntelError> {
        let result = self.call("stats", "ethsupply2").await?;
        result
            .get("Eth2Staking")
            .and_then(number)
            .map(|wei| wei / WEI_PER_ETH)
            .ok_or_else(|| IntelError::malformed(TAG, "ethsupply2 result has no Eth2Staking"))
    }
}

/// Numbers arrive as JSON strings (sometimes decimals) or plain numbers.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn parse_gas_oracle(result: &Value) -> Result<GasOracle, IntelError> {
    let field = |name: &str| result.get(name).and_then(number);

    let fast = field("FastGasPrice")
        .ok_or_else(|| IntelError::malformed(TAG, "gas oracle has no FastGasPrice"))?;

    Ok(GasOracle {
        safe: field("SafeGasPrice").unwrap_or_default(),
        propose: field("ProposeGasPrice").unwrap_or_default(),
        fast,
        base_fee: field("suggestBaseFee").unwrap_or_default(),
        gas_used_ratio: result
            .get("gasUsedRatio")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_gas_oracle_decimal_strings() {
        let result = json!({
            "LastBlock": "19000000",
            "SafeGasPrice": "12.5",
            "ProposeGasPrice": "14",
            "FastGasPrice": "18.25",
            "suggestBaseFee": "11.9832",
            "gasUsedRatio": "0.45,0.51,0.99"
        });
        let oracle = parse_gas_oracle(&result).unwrap();
        assert_eq!(oracle.safe, 12.5);
        assert_eq!(oracle.propose, 14.0);
        assert_eq!(oracle.fast, 18.25);
        assert!((oracle.base_fee - 11.9832).abs() < 1e-9);
        assert_eq!(oracle.gas_used_ratio, "0.45,0.51,0.99");
    }

    #[test]
    fn test_parse_gas_oracle_rejects_error_string() {
        let result = json!("Invalid API Key");
        assert!(parse_gas_oracle(&result).is_err());
    }

    #[test]
    fn test_number_accepts_big_wei_strings() {
        let wei = number(&json!("120000000000000000000000000")).unwrap();
        assert!((wei / WEI_PER_ETH - 120_000_000.0).abs() < 1.0);
        assert_eq!(number(&json!(42)), Some(42.0));
        assert_eq!(number(&json!(null)), None);
    }
}
