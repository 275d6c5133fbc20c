use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::{json, Value};
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tokio::sync::broadcast;

use crate::{
    blockchain::{BundleSubmitter, ChainClient},
    bot::BotEvent,
    dex::QuoteProvider,
    error::{ArbResult, ArbitrageError},
    execution::LegBuilder,
    signer::Ed25519Signer,
    types::{
        BuiltTransaction, Confirmation, ExecutionPlan, Quote, QuoteRequest, RoundTripResult,
        SignedSubmission, TokenInfo,
    },
};

pub const TEST_SEED: [u8; 32] = [42u8; 32];

#[derive(Clone, Default)]
pub struct CallTrace(Arc<Mutex<Vec<String>>>);

impl CallTrace {
    pub fn record(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

fn trade_for(token_in: &str, token_out: &str) -> Value {
    json!({ "from": token_in, "to": token_out })
}

pub fn quote(token_in: &str, token_out: &str, amount_in: u64, amount_out: u64) -> Quote {
    Quote {
        token_in: token_in.to_string(),
        token_out: token_out.to_string(),
        amount_in,
        amount_out,
        trade: trade_for(token_in, token_out),
    }
}

pub fn round_trip(amount_in: u64, out_ab: u64, out_ba: u64) -> RoundTripResult {
    RoundTripResult {
        quote_a2b: quote("A", "B", amount_in, out_ab),
        quote_b2a: quote("B", "A", out_ab, out_ba),
        round_trip_ratio: crate::arbitrage::fixed_point::ratio(out_ba, amount_in)
            .unwrap_or_default(),
        profit_or_loss: out_ba as i128 - amount_in as i128,
        token_a: "A".to_string(),
        token_b: "B".to_string(),
    }
}

#[derive(Clone)]
pub struct MockQuoter {
    trace: CallTrace,
    quotes: Arc<Mutex<VecDeque<ArbResult<u64>>>>,
    tokens: Arc<Mutex<Vec<TokenInfo>>>,
    failing_tx_from: Arc<Mutex<Option<String>>>,
}

impl MockQuoter {
    pub fn new() -> Self {
        Self {
            trace: CallTrace::default(),
            quotes: Arc::new(Mutex::new(VecDeque::new())),
            tokens: Arc::new(Mutex::new(Vec::new())),
            failing_tx_from: Arc::new(Mutex::new(None)),
        }
    }

    pub fn trace(&self) -> CallTrace {
        self.trace.clone()
    }

    pub fn script_quotes(&self, amounts: &[u64]) {
        let mut quotes = self.quotes.lock().unwrap();
        quotes.extend(amounts.iter().map(|a| Ok(*a)));
    }

    pub fn script_quote_error(&self, message: &str) {
        self.quotes
            .lock()
            .unwrap()
            .push_back(Err(ArbitrageError::quote(message)));
    }

    pub fn set_tokens(&self, tokens: Vec<TokenInfo>) {
        *self.tokens.lock().unwrap() = tokens;
    }

    pub fn fail_tx_for(&self, token_in: &str) {
        *self.failing_tx_from.lock().unwrap() = Some(token_in.to_string());
    }
}

#[async_trait]
impl QuoteProvider for MockQuoter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_quote(&self, request: &QuoteRequest) -> ArbResult<Quote> {
        self.trace.record(format!(
            "fetch_quote {}->{} {}",
            request.token_in, request.token_out, request.amount_in
        ));

        let amount_out = self
            .quotes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ArbitrageError::quote("no quote scripted")))?;

        Ok(quote(&request.token_in, &request.token_out, request.amount_in, amount_out))
    }

    async fn fetch_tx(&self, plan: &ExecutionPlan) -> ArbResult<BuiltTransaction> {
        let from = plan.trade["from"].as_str().unwrap_or("?").to_string();
        let to = plan.trade["to"].as_str().unwrap_or("?").to_string();
        self.trace.record(format!("fetch_tx {}->{}", from, to));

        if self.failing_tx_from.lock().unwrap().as_deref() == Some(from.as_str()) {
            return Err(ArbitrageError::quote(format!("no route for {}", from)));
        }

        Ok(BuiltTransaction {
            tx_bytes: BASE64.encode(format!("tx:{}->{}", from, to)),
        })
    }

    async fn fetch_tokens(&self) -> ArbResult<Vec<TokenInfo>> {
        self.trace.record("fetch_tokens");
        Ok(self.tokens.lock().unwrap().clone())
    }
}

#[derive(Clone)]
pub struct MockChain {
    trace: CallTrace,
    balances: Arc<Mutex<VecDeque<u64>>>,
    balance_error: Arc<Mutex<Option<String>>>,
    submit_error: Arc<Mutex<Option<String>>>,
    confirmations_fail: Arc<Mutex<bool>>,
    gas_price: Arc<Mutex<ArbResult<u64>>>,
    balance_queries: Arc<AtomicUsize>,
    submissions: Arc<AtomicUsize>,
}

impl MockChain {
    pub fn new(trace: CallTrace) -> Self {
        Self {
            trace,
            balances: Arc::new(Mutex::new(VecDeque::from(vec![0]))),
            balance_error: Arc::new(Mutex::new(None)),
            submit_error: Arc::new(Mutex::new(None)),
            confirmations_fail: Arc::new(Mutex::new(false)),
            gas_price: Arc::new(Mutex::new(Ok(750))),
            balance_queries: Arc::new(AtomicUsize::new(0)),
            submissions: Arc::new(AtomicUsize::new(0)),
        }
    }

    // Successive balance reads; the last value repeats forever.
    pub fn script_balances(&self, balances: &[u64]) {
        *self.balances.lock().unwrap() = balances.iter().copied().collect();
    }

    pub fn fail_balance(&self, message: &str) {
        *self.balance_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_submissions(&self, message: &str) {
        *self.submit_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_confirmations(&self) {
        *self.confirmations_fail.lock().unwrap() = true;
    }

    pub fn set_gas_price(&self, price: ArbResult<u64>) {
        *self.gas_price.lock().unwrap() = price;
    }

    pub fn balance_queries(&self) -> usize {
        self.balance_queries.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn build(&self, transaction: &BuiltTransaction) -> ArbResult<Vec<u8>> {
        self.trace.record("build");
        BASE64
            .decode(&transaction.tx_bytes)
            .map_err(|e| ArbitrageError::submission(e.to_string()))
    }

    async fn submit(&self, _submission: &SignedSubmission) -> ArbResult<String> {
        self.trace.record("submit");
        let n = self.submissions.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(message) = self.submit_error.lock().unwrap().clone() {
            return Err(ArbitrageError::Submission(message));
        }
        Ok(format!("digest-{}", n))
    }

    async fn wait_for_confirmation(&self, digest: &str, _timeout: Duration) -> ArbResult<Confirmation> {
        self.trace.record(format!("confirm {}", digest));
        let failed = *self.confirmations_fail.lock().unwrap();
        Ok(Confirmation {
            digest: digest.to_string(),
            success: !failed,
            status: if failed { "failure: MoveAbort" } else { "success" }.to_string(),
        })
    }

    async fn get_balance(&self, _owner: &str, coin_type: &str) -> ArbResult<u64> {
        self.trace.record(format!("get_balance {}", coin_type));
        self.balance_queries.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.balance_error.lock().unwrap().clone() {
            return Err(ArbitrageError::Rpc(message));
        }

        let mut balances = self.balances.lock().unwrap();
        let value = if balances.len() > 1 {
            balances.pop_front().unwrap_or_default()
        } else {
            balances.front().copied().unwrap_or_default()
        };
        Ok(value)
    }

    async fn reference_gas_price(&self) -> ArbResult<u64> {
        self.trace.record("reference_gas_price");
        self.gas_price.lock().unwrap().clone()
    }
}

#[derive(Clone)]
pub struct MockBundler {
    trace: CallTrace,
    submitted: Arc<Mutex<Vec<SignedSubmission>>>,
    rejection: Arc<Mutex<Option<String>>>,
}

impl MockBundler {
    pub fn new(trace: CallTrace) -> Self {
        Self {
            trace,
            submitted: Arc::new(Mutex::new(Vec::new())),
            rejection: Arc::new(Mutex::new(None)),
        }
    }

    pub fn reject(&self, message: &str) {
        *self.rejection.lock().unwrap() = Some(message.to_string());
    }

    pub fn submitted(&self) -> Vec<SignedSubmission> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl BundleSubmitter for MockBundler {
    async fn submit_bundle(&self, submissions: &[SignedSubmission]) -> ArbResult<Value> {
        self.trace.record(format!("submit_bundle {}", submissions.len()));
        if let Some(message) = self.rejection.lock().unwrap().clone() {
            return Err(ArbitrageError::Submission(message));
        }
        self.submitted.lock().unwrap().extend_from_slice(submissions);
        Ok(json!({ "accepted": true }))
    }
}

pub async fn next_event(receiver: &mut broadcast::Receiver<BotEvent>) -> anyhow::Result<BotEvent> {
    receiver
        .recv()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to receive event: {}", e))
}

pub fn test_signer() -> Arc<Ed25519Signer> {
    Arc::new(Ed25519Signer::from_seed(TEST_SEED))
}

pub fn leg_builder(quoter: &MockQuoter, chain: &MockChain) -> LegBuilder {
    LegBuilder::new(
        Arc::new(quoter.clone()),
        Arc::new(chain.clone()),
        test_signer(),
        50_000_000,
        100,
    )
}
