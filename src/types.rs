use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub token_in: String,
    pub token_out: String,
    pub amount_in: u64,
    pub amount_out: u64,
    // Opaque route descriptor, handed back unchanged when building the transaction.
    pub trade: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteRequest {
    pub token_in: String,
    pub token_out: String,
    pub amount_in: u64,
}

impl QuoteRequest {
    pub fn new(token_in: &str, token_out: &str, amount_in: u64) -> Self {
        Self {
            token_in: token_in.to_string(),
            token_out: token_out.to_string(),
            amount_in,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeOutcome {
    Profit,
    Loss,
    BreakEven,
}

impl TradeOutcome {
    pub fn classify(profit_or_loss: i128) -> Self {
        match profit_or_loss {
            p if p > 0 => TradeOutcome::Profit,
            p if p < 0 => TradeOutcome::Loss,
            _ => TradeOutcome::BreakEven,
        }
    }
}

impl fmt::Display for TradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeOutcome::Profit => write!(f, "profit"),
            TradeOutcome::Loss => write!(f, "loss"),
            TradeOutcome::BreakEven => write!(f, "break even"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundTripResult {
    pub quote_a2b: Quote,
    pub quote_b2a: Quote,
    pub round_trip_ratio: String,
    pub profit_or_loss: i128,
    pub token_a: String,
    pub token_b: String,
}

impl RoundTripResult {
    pub fn outcome(&self) -> TradeOutcome {
        TradeOutcome::classify(self.profit_or_loss)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionPlan {
    pub trade: serde_json::Value,
    pub sender: String,
    pub gas_budget: u64,
    pub max_slippage_bps: u32,
    pub return_output_coin_argument: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuiltTransaction {
    #[serde(alias = "transaction")]
    pub tx_bytes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedSubmission {
    pub tx_bytes: Vec<u8>,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub digest: String,
    pub success: bool,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    Sequential,
    Bundled,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Sequential => write!(f, "sequential"),
            ExecutionMode::Bundled => write!(f, "bundled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Sequential {
        leg_a_digest: String,
        leg_b_digest: String,
        intermediate_balance: u64,
    },
    Bundled {
        response: serde_json::Value,
    },
}

impl ExecutionOutcome {
    pub fn mode(&self) -> ExecutionMode {
        match self {
            ExecutionOutcome::Sequential { .. } => ExecutionMode::Sequential,
            ExecutionOutcome::Bundled { .. } => ExecutionMode::Bundled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenInfo {
    pub coin_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub decimals: u32,
}

pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(u64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(n) => Ok(n),
        Amount::Text(s) => s.trim().parse::<u64>().map_err(serde::de::Error::custom),
    }
}
