use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::{
    blockchain::BundleSubmitter,
    error::ArbResult,
    execution::{ExecutionStrategy, LegBuilder},
    types::{ExecutionMode, ExecutionOutcome, RoundTripResult},
};

// Leg B->A is built from the quoted amount, not observed proceeds.
pub struct BundledExecutor {
    legs: LegBuilder,
    bundler: Arc<dyn BundleSubmitter>,
}

impl BundledExecutor {
    pub fn new(legs: LegBuilder, bundler: Arc<dyn BundleSubmitter>) -> Self {
        Self { legs, bundler }
    }
}

#[async_trait]
impl ExecutionStrategy for BundledExecutor {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Bundled
    }

    async fn execute(&self, round_trip: &RoundTripResult) -> ArbResult<ExecutionOutcome> {
        let leg_a = self.legs.build_signed(&round_trip.quote_a2b).await?;
        let leg_b = self.legs.build_signed(&round_trip.quote_b2a).await?;

        info!(
            "Submitting bundle of 2 legs ({} + {} bytes)",
            leg_a.tx_bytes.len(),
            leg_b.tx_bytes.len()
        );

        let response = self.bundler.submit_bundle(&[leg_a, leg_b]).await?;
        info!("Bundle accepted: {}", response);

        Ok(ExecutionOutcome::Bundled { response })
    }
}
