use std::sync::Arc;
use tracing::{debug, warn};

use crate::{blockchain::ChainClient, config::CostModel};

const LEGS_PER_ROUND_TRIP: u64 = 2;

// True only when the round trip clears the cost of submitting both legs.
pub fn is_profitable(profit_or_loss: i128, estimated_cost: u64) -> bool {
    profit_or_loss > estimated_cost as i128
}

pub struct CostEstimator {
    model: CostModel,
    static_cost: u64,
    gas_units_per_leg: u64,
    chain: Option<Arc<dyn ChainClient>>,
}

impl CostEstimator {
    pub fn fixed(static_cost: u64) -> Self {
        Self {
            model: CostModel::Static,
            static_cost,
            gas_units_per_leg: 0,
            chain: None,
        }
    }

    pub fn new(
        model: CostModel,
        static_cost: u64,
        gas_units_per_leg: u64,
        chain: Option<Arc<dyn ChainClient>>,
    ) -> Self {
        Self {
            model,
            static_cost,
            gas_units_per_leg,
            chain,
        }
    }

    // Falls back to the static figure whenever a live estimate is unavailable.
    pub async fn estimate(&self) -> u64 {
        match (self.model, &self.chain) {
            (CostModel::Static, _) => self.static_cost,
            (CostModel::ReferenceGasPrice, None) => {
                warn!("Live cost model configured without a chain client, using static cost");
                self.static_cost
            }
            (CostModel::ReferenceGasPrice, Some(chain)) => match chain.reference_gas_price().await {
                Ok(gas_price) => {
                    let cost = gas_price
                        .saturating_mul(self.gas_units_per_leg)
                        .saturating_mul(LEGS_PER_ROUND_TRIP);
                    debug!(
                        "Live cost estimate: {} (gas price {} x {} units x {} legs)",
                        cost, gas_price, self.gas_units_per_leg, LEGS_PER_ROUND_TRIP
                    );
                    cost
                }
                Err(e) => {
                    warn!("Failed to fetch reference gas price, using static cost: {}", e);
                    self.static_cost
                }
            },
        }
    }
}
