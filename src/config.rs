use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

use crate::{blockchain::is_valid_address, types::ExecutionMode};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub network: NetworkConfig,
    pub quoter: QuoterConfig,
    pub tokens: TokenConfig,
    pub arbitrage: ArbitrageConfig,
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub bot: BotConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NetworkConfig {
    pub rpc_url: String,
    #[serde(default)]
    pub bundle_rpc_url: Option<String>,
    #[serde(default = "default_bundle_method")]
    pub bundle_method: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_confirmation_timeout_ms")]
    pub confirmation_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct QuoterConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub fee_bps: u32,
    #[serde(default)]
    pub fee_wallet: String,
    #[serde(default)]
    pub use_alpha_router: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TokenConfig {
    pub token_a: String,
    pub token_b: String,
    #[serde(default = "default_token_a_decimals")]
    pub token_a_decimals: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CostModel {
    Static,
    ReferenceGasPrice,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ArbitrageConfig {
    pub amount_in: String,
    pub estimated_cost: String,
    #[serde(default = "default_cost_model")]
    pub cost_model: CostModel,
    #[serde(default = "default_gas_units_per_leg")]
    pub gas_units_per_leg: u64,
    pub check_interval_ms: u64,
    #[serde(default = "default_ratio_decimal_places")]
    pub ratio_decimal_places: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub enabled: bool,
    pub mode: ExecutionMode,
    pub gas_budget: u64,
    pub max_slippage_bps: u32,
    #[serde(default = "default_balance_poll_interval_ms")]
    pub balance_poll_interval_ms: u64,
    #[serde(default = "default_balance_poll_attempts")]
    pub balance_poll_attempts: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BotMode {
    Monitor,
    Scan,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BotConfig {
    pub mode: BotMode,
    pub report_every_cycles: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            mode: BotMode::Monitor,
            report_every_cycles: 100,
        }
    }
}

fn default_bundle_method() -> String {
    "sui_executeTransactionBlocks".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_confirmation_timeout_ms() -> u64 {
    30_000
}

fn default_token_a_decimals() -> u32 {
    9
}

fn default_cost_model() -> CostModel {
    CostModel::Static
}

fn default_gas_units_per_leg() -> u64 {
    5_000_000
}

fn default_ratio_decimal_places() -> u32 {
    6
}

fn default_balance_poll_interval_ms() -> u64 {
    1_000
}

fn default_balance_poll_attempts() -> u32 {
    30
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let mut settings = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::Environment::with_prefix("ARBITRAGE").separator("__"));

        if let Ok(rpc_url) = std::env::var("SUI_RPC_URL") {
            settings = settings.set_override("network.rpc_url", rpc_url)?;
        }

        if let Ok(bundle_url) = std::env::var("BUNDLE_RPC_URL") {
            settings = settings.set_override("network.bundle_rpc_url", bundle_url)?;
        }

        if let Ok(api_key) = std::env::var("HOP_API_KEY") {
            settings = settings.set_override("quoter.api_key", api_key)?;
        }

        if let Ok(fee_wallet) = std::env::var("HOP_FEE_WALLET") {
            settings = settings.set_override("quoter.fee_wallet", fee_wallet)?;
        }

        let config: Config = settings
            .build()?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let amount_in = self.arbitrage.amount_in()?;
        if amount_in == 0 {
            return Err(anyhow!("arbitrage.amount_in must be greater than zero"));
        }
        self.arbitrage.estimated_cost()?;

        if self.tokens.token_a == self.tokens.token_b {
            return Err(anyhow!("tokens.token_a and tokens.token_b must differ"));
        }
        if self.arbitrage.check_interval_ms == 0 {
            return Err(anyhow!("arbitrage.check_interval_ms must be greater than zero"));
        }
        if self.execution.max_slippage_bps > 10_000 {
            return Err(anyhow!(
                "execution.max_slippage_bps must be at most 10000, got {}",
                self.execution.max_slippage_bps
            ));
        }
        if !self.quoter.fee_wallet.is_empty() && !is_valid_address(&self.quoter.fee_wallet) {
            return Err(anyhow!(
                "quoter.fee_wallet '{}' is not a valid Sui address",
                self.quoter.fee_wallet
            ));
        }
        if self.execution.balance_poll_attempts == 0 {
            return Err(anyhow!("execution.balance_poll_attempts must be greater than zero"));
        }
        if self.execution.enabled
            && self.execution.mode == ExecutionMode::Bundled
            && self.network.bundle_rpc_url.is_none()
        {
            return Err(anyhow!("bundled execution requires network.bundle_rpc_url"));
        }
        Ok(())
    }
}

impl ArbitrageConfig {
    pub fn amount_in(&self) -> anyhow::Result<u64> {
        parse_amount(&self.amount_in).context("Invalid arbitrage.amount_in")
    }

    pub fn estimated_cost(&self) -> anyhow::Result<u64> {
        parse_amount(&self.estimated_cost).context("Invalid arbitrage.estimated_cost")
    }
}

pub fn parse_amount(raw: &str) -> anyhow::Result<u64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != '_').collect();
    cleaned
        .parse::<u64>()
        .map_err(|e| anyhow!("'{}' is not an unsigned integer amount: {}", raw, e))
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        network: NetworkConfig {
            rpc_url: "http://127.0.0.1:9000".to_string(),
            bundle_rpc_url: Some("http://127.0.0.1:9100".to_string()),
            bundle_method: default_bundle_method(),
            request_timeout_ms: 1_000,
            confirmation_timeout_ms: 1_000,
        },
        quoter: QuoterConfig {
            base_url: "http://127.0.0.1:9200".to_string(),
            api_key: String::new(),
            fee_bps: 0,
            fee_wallet: String::new(),
            use_alpha_router: false,
        },
        tokens: TokenConfig {
            token_a: "0x2::sui::SUI".to_string(),
            token_b: "0x5d4b::coin::COIN".to_string(),
            token_a_decimals: 9,
        },
        arbitrage: ArbitrageConfig {
            amount_in: "1_000_000_000".to_string(),
            estimated_cost: "400000".to_string(),
            cost_model: CostModel::Static,
            gas_units_per_leg: default_gas_units_per_leg(),
            check_interval_ms: 10,
            ratio_decimal_places: 6,
        },
        execution: ExecutionConfig {
            enabled: true,
            mode: ExecutionMode::Sequential,
            gas_budget: 50_000_000,
            max_slippage_bps: 100,
            balance_poll_interval_ms: 1,
            balance_poll_attempts: 30,
        },
        bot: BotConfig::default(),
    }
}
