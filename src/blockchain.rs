use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::{future::Future, time::Duration};
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::{
    config::NetworkConfig,
    error::{ArbResult, ArbitrageError},
    types::{deserialize_amount, BuiltTransaction, Confirmation, SignedSubmission},
};

const CONFIRMATION_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn build(&self, transaction: &BuiltTransaction) -> ArbResult<Vec<u8>>;

    async fn submit(&self, submission: &SignedSubmission) -> ArbResult<String>;

    async fn wait_for_confirmation(&self, digest: &str, timeout: Duration) -> ArbResult<Confirmation>;

    async fn get_balance(&self, owner: &str, coin_type: &str) -> ArbResult<u64>;

    async fn reference_gas_price(&self) -> ArbResult<u64>;
}

#[async_trait]
pub trait BundleSubmitter: Send + Sync {
    async fn submit_bundle(&self, submissions: &[SignedSubmission]) -> ArbResult<Value>;
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceResult {
    #[serde(deserialize_with = "deserialize_amount")]
    total_balance: u64,
}

#[derive(Clone)]
struct JsonRpcTransport {
    http_client: Client,
    url: String,
}

impl JsonRpcTransport {
    fn new(url: &str, request_timeout: Duration) -> ArbResult<Self> {
        let http_client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ArbitrageError::rpc(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            url: url.to_string(),
        })
    }

    async fn call(&self, method: &str, params: Value) -> ArbResult<Option<Value>> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        debug!("RPC call {} -> {}", method, self.url);

        let response = self
            .http_client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ArbitrageError::rpc(format!("{} request failed: {}", method, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ArbitrageError::rpc(format!("{} returned {}: {}", method, status, body)));
        }

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| ArbitrageError::rpc(format!("{} response malformed: {}", method, e)))?;

        if let Some(error) = parsed.error {
            return Err(ArbitrageError::rpc(format!(
                "{} failed with code {}: {}",
                method, error.code, error.message
            )));
        }

        Ok(parsed.result.filter(|v| !v.is_null()))
    }
}

pub struct SuiRpcClient {
    transport: JsonRpcTransport,
}

impl SuiRpcClient {
    pub fn new(config: &NetworkConfig) -> ArbResult<Self> {
        info!("Using Sui full node RPC: {}", config.rpc_url);
        let transport = JsonRpcTransport::new(
            &config.rpc_url,
            Duration::from_millis(config.request_timeout_ms),
        )?;
        Ok(Self { transport })
    }

    async fn call_required(&self, method: &str, params: Value) -> ArbResult<Value> {
        self.transport
            .call(method, params)
            .await?
            .ok_or_else(|| ArbitrageError::rpc(format!("{} returned no result", method)))
    }

    pub async fn health_check(&self) -> ArbResult<()> {
        let gas_price = self.reference_gas_price().await?;
        debug!("Health check passed - reference gas price: {} MIST", gas_price);
        Ok(())
    }
}

#[async_trait]
impl ChainClient for SuiRpcClient {
    async fn build(&self, transaction: &BuiltTransaction) -> ArbResult<Vec<u8>> {
        let bytes = BASE64
            .decode(transaction.tx_bytes.trim())
            .map_err(|e| ArbitrageError::submission(format!("transaction bytes are not base64: {}", e)))?;
        if bytes.is_empty() {
            return Err(ArbitrageError::submission("aggregator returned an empty transaction"));
        }
        Ok(bytes)
    }

    async fn submit(&self, submission: &SignedSubmission) -> ArbResult<String> {
        let params = json!([
            BASE64.encode(&submission.tx_bytes),
            [submission.signature],
            { "showEffects": true },
            "WaitForEffectsCert",
        ]);

        let result = self
            .call_required("sui_executeTransactionBlock", params)
            .await
            .map_err(|e| ArbitrageError::submission(e.to_string()))?;

        result
            .get("digest")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ArbitrageError::submission("execution response carried no digest"))
    }

    async fn wait_for_confirmation(&self, digest: &str, timeout: Duration) -> ArbResult<Confirmation> {
        poll_confirmation(digest, timeout, CONFIRMATION_POLL_INTERVAL, || {
            self.transport.call(
                "sui_getTransactionBlock",
                json!([digest, { "showEffects": true }]),
            )
        })
        .await
    }

    async fn get_balance(&self, owner: &str, coin_type: &str) -> ArbResult<u64> {
        let result = self
            .call_required("suix_getBalance", json!([owner, coin_type]))
            .await?;
        let balance: BalanceResult = serde_json::from_value(result)
            .map_err(|e| ArbitrageError::rpc(format!("malformed balance response: {}", e)))?;
        Ok(balance.total_balance)
    }

    async fn reference_gas_price(&self) -> ArbResult<u64> {
        let result = self
            .call_required("suix_getReferenceGasPrice", json!([]))
            .await?;
        parse_u64_value(&result)
            .ok_or_else(|| ArbitrageError::rpc(format!("malformed gas price: {}", result)))
    }
}

pub struct JsonRpcBundleClient {
    transport: JsonRpcTransport,
    method: String,
}

impl JsonRpcBundleClient {
    pub fn new(url: &str, method: &str, request_timeout: Duration) -> ArbResult<Self> {
        info!("Using bundle endpoint: {} ({})", url, method);
        Ok(Self {
            transport: JsonRpcTransport::new(url, request_timeout)?,
            method: method.to_string(),
        })
    }
}

#[async_trait]
impl BundleSubmitter for JsonRpcBundleClient {
    async fn submit_bundle(&self, submissions: &[SignedSubmission]) -> ArbResult<Value> {
        let params = bundle_params(submissions);
        let result = self
            .transport
            .call(&self.method, params)
            .await
            .map_err(|e| ArbitrageError::submission(e.to_string()))?;
        Ok(result.unwrap_or(Value::Null))
    }
}

// `[[tx_b64, ...], [[sig_b64], ...]]`
pub fn bundle_params(submissions: &[SignedSubmission]) -> Value {
    let tx_bytes: Vec<String> = submissions
        .iter()
        .map(|s| BASE64.encode(&s.tx_bytes))
        .collect();
    let signatures: Vec<Vec<String>> = submissions
        .iter()
        .map(|s| vec![s.signature.clone()])
        .collect();
    json!([tx_bytes, signatures])
}

async fn poll_confirmation<F, Fut>(
    digest: &str,
    timeout: Duration,
    poll_interval: Duration,
    mut fetch_block: F,
) -> ArbResult<Confirmation>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ArbResult<Option<Value>>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        match fetch_block().await {
            Ok(Some(block)) => return Ok(parse_confirmation(digest, &block)),
            Ok(None) => debug!("Transaction {} not yet indexed", digest),
            // The node answers with an error until the digest is known.
            Err(e) => debug!("Transaction {} not yet available: {}", digest, e),
        }

        if Instant::now() + poll_interval > deadline {
            return Err(ArbitrageError::Confirmation {
                digest: digest.to_string(),
                reason: format!("not seen within {:?}", timeout),
            });
        }
        sleep(poll_interval).await;
    }
}

fn parse_confirmation(digest: &str, block: &Value) -> Confirmation {
    let status = block
        .pointer("/effects/status/status")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let error = block
        .pointer("/effects/status/error")
        .and_then(Value::as_str);

    Confirmation {
        digest: digest.to_string(),
        success: status == "success",
        status: match error {
            Some(error) => format!("{}: {}", status, error),
            None => status.to_string(),
        },
    }
}

fn parse_u64_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

pub fn is_valid_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(hex_part) => hex_part.len() == 64 && hex::decode(hex_part).is_ok(),
        None => false,
    }
}
