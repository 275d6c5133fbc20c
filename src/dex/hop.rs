use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::{
    config::QuoterConfig,
    dex::traits::QuoteProvider,
    error::{ArbResult, ArbitrageError},
    types::{deserialize_amount, BuiltTransaction, ExecutionPlan, Quote, QuoteRequest, TokenInfo},
};

const QUOTE_PATH: &str = "/api/v2/quote";
const TX_PATH: &str = "/api/v2/tx";
const TOKENS_PATH: &str = "/api/v2/tokens";

#[derive(Debug, Serialize)]
struct QuoteBody<'a> {
    token_in: &'a str,
    token_out: &'a str,
    amount_in: String,
    use_alpha_router: bool,
    api_key: &'a str,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(deserialize_with = "deserialize_amount")]
    amount_out_with_fee: u64,
    trade: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct TxBody<'a> {
    trade: &'a serde_json::Value,
    sui_address: &'a str,
    gas_budget: u64,
    max_slippage_bps: u32,
    return_output_coin_argument: bool,
    api_key: &'a str,
    fee_bps: u32,
    fee_wallet: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokensResponse {
    tokens: Vec<TokenInfo>,
}

pub struct HopClient {
    http_client: Client,
    config: QuoterConfig,
}

impl HopClient {
    pub fn new(config: QuoterConfig, request_timeout: Duration) -> ArbResult<Self> {
        let http_client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ArbitrageError::quote(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        response: reqwest::Response,
    ) -> ArbResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ArbitrageError::quote(format!("{} read failed: {}", endpoint, e)))?;

        debug!("Hop {} status: {}, body length: {}", endpoint, status, body.len());

        if !status.is_success() {
            return Err(ArbitrageError::quote(format!(
                "{} returned {}: {}",
                endpoint, status, body
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            ArbitrageError::quote(format!("Failed to parse {} response: {}. Body: {}", endpoint, e, body))
        })
    }
}

#[async_trait]
impl QuoteProvider for HopClient {
    fn name(&self) -> &str {
        "hop"
    }

    async fn fetch_quote(&self, request: &QuoteRequest) -> ArbResult<Quote> {
        let body = QuoteBody {
            token_in: &request.token_in,
            token_out: &request.token_out,
            amount_in: request.amount_in.to_string(),
            use_alpha_router: self.config.use_alpha_router,
            api_key: &self.config.api_key,
        };

        let response = self
            .http_client
            .post(self.url(QUOTE_PATH))
            .json(&body)
            .send()
            .await
            .map_err(|e| ArbitrageError::quote(format!("quote request failed: {}", e)))?;

        let parsed: QuoteResponse = self.read_json("quote", response).await?;

        Ok(Quote {
            token_in: request.token_in.clone(),
            token_out: request.token_out.clone(),
            amount_in: request.amount_in,
            amount_out: parsed.amount_out_with_fee,
            trade: parsed.trade,
        })
    }

    async fn fetch_tx(&self, plan: &ExecutionPlan) -> ArbResult<BuiltTransaction> {
        let body = TxBody {
            trade: &plan.trade,
            sui_address: &plan.sender,
            gas_budget: plan.gas_budget,
            max_slippage_bps: plan.max_slippage_bps,
            return_output_coin_argument: plan.return_output_coin_argument,
            api_key: &self.config.api_key,
            fee_bps: self.config.fee_bps,
            fee_wallet: &self.config.fee_wallet,
        };

        let response = self
            .http_client
            .post(self.url(TX_PATH))
            .json(&body)
            .send()
            .await
            .map_err(|e| ArbitrageError::quote(format!("tx request failed: {}", e)))?;

        self.read_json("tx", response).await
    }

    async fn fetch_tokens(&self) -> ArbResult<Vec<TokenInfo>> {
        let response = self
            .http_client
            .get(self.url(TOKENS_PATH))
            .query(&[("api_key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ArbitrageError::quote(format!("tokens request failed: {}", e)))?;

        let parsed: TokensResponse = self.read_json("tokens", response).await?;
        Ok(parsed.tokens)
    }
}
