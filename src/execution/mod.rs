pub mod balance;
pub mod bundled;
pub mod sequential;

pub use balance::{wait_for_balance, BalancePolicy};
pub use bundled::BundledExecutor;
pub use sequential::SequentialExecutor;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use tracing::debug;

use crate::{
    blockchain::{ChainClient, JsonRpcBundleClient},
    config::Config,
    dex::QuoteProvider,
    error::ArbResult,
    signer::TransactionSigner,
    types::{ExecutionMode, ExecutionOutcome, ExecutionPlan, Quote, RoundTripResult, SignedSubmission},
};

#[async_trait]
pub trait ExecutionStrategy: Send + Sync {
    fn mode(&self) -> ExecutionMode;

    async fn execute(&self, round_trip: &RoundTripResult) -> ArbResult<ExecutionOutcome>;
}

#[derive(Clone)]
pub struct LegBuilder {
    quoter: Arc<dyn QuoteProvider>,
    chain: Arc<dyn ChainClient>,
    signer: Arc<dyn TransactionSigner>,
    gas_budget: u64,
    max_slippage_bps: u32,
}

impl LegBuilder {
    pub fn new(
        quoter: Arc<dyn QuoteProvider>,
        chain: Arc<dyn ChainClient>,
        signer: Arc<dyn TransactionSigner>,
        gas_budget: u64,
        max_slippage_bps: u32,
    ) -> Self {
        Self {
            quoter,
            chain,
            signer,
            gas_budget,
            max_slippage_bps,
        }
    }

    pub fn plan(&self, quote: &Quote) -> ExecutionPlan {
        ExecutionPlan {
            trade: quote.trade.clone(),
            sender: self.signer.address().to_string(),
            gas_budget: self.gas_budget,
            max_slippage_bps: self.max_slippage_bps,
            return_output_coin_argument: false,
        }
    }

    pub async fn build_signed(&self, quote: &Quote) -> ArbResult<SignedSubmission> {
        let plan = self.plan(quote);
        let transaction = self.quoter.fetch_tx(&plan).await?;
        let tx_bytes = self.chain.build(&transaction).await?;
        let signature = self.signer.sign_transaction(&tx_bytes)?;

        debug!(
            "Signed leg {} -> {} ({} bytes)",
            quote.token_in,
            quote.token_out,
            tx_bytes.len()
        );

        Ok(SignedSubmission {
            tx_bytes,
            signature,
        })
    }

    pub fn owner(&self) -> &str {
        self.signer.address()
    }

    pub fn max_slippage_bps(&self) -> u32 {
        self.max_slippage_bps
    }

    pub fn chain(&self) -> &Arc<dyn ChainClient> {
        &self.chain
    }
}

pub fn from_config(
    config: &Config,
    quoter: Arc<dyn QuoteProvider>,
    chain: Arc<dyn ChainClient>,
    signer: Arc<dyn TransactionSigner>,
) -> Result<Box<dyn ExecutionStrategy>> {
    let legs = LegBuilder::new(
        quoter,
        chain,
        signer,
        config.execution.gas_budget,
        config.execution.max_slippage_bps,
    );

    let strategy: Box<dyn ExecutionStrategy> = match config.execution.mode {
        ExecutionMode::Sequential => Box::new(SequentialExecutor::new(
            legs,
            BalancePolicy {
                poll_interval: Duration::from_millis(config.execution.balance_poll_interval_ms),
                max_attempts: config.execution.balance_poll_attempts,
            },
            Duration::from_millis(config.network.confirmation_timeout_ms),
        )),
        ExecutionMode::Bundled => {
            let url = config
                .network
                .bundle_rpc_url
                .as_deref()
                .ok_or_else(|| anyhow!("bundled execution requires network.bundle_rpc_url"))?;
            let bundler = JsonRpcBundleClient::new(
                url,
                &config.network.bundle_method,
                Duration::from_millis(config.network.request_timeout_ms),
            )?;
            Box::new(BundledExecutor::new(legs, Arc::new(bundler)))
        }
    };
    Ok(strategy)
}

pub fn min_amount_out(quoted: u64, max_slippage_bps: u32) -> u64 {
    let kept_bps = 10_000u128.saturating_sub(max_slippage_bps as u128);
    ((quoted as u128 * kept_bps) / 10_000) as u64
}
