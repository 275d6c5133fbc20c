use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

use crate::{
    error::{ArbResult, ArbitrageError},
    execution::{balance::wait_for_balance, min_amount_out, BalancePolicy, ExecutionStrategy, LegBuilder},
    types::{Confirmation, ExecutionMode, ExecutionOutcome, RoundTripResult, SignedSubmission},
};

pub struct SequentialExecutor {
    legs: LegBuilder,
    balance_policy: BalancePolicy,
    confirmation_timeout: Duration,
}

impl SequentialExecutor {
    pub fn new(legs: LegBuilder, balance_policy: BalancePolicy, confirmation_timeout: Duration) -> Self {
        Self {
            legs,
            balance_policy,
            confirmation_timeout,
        }
    }

    async fn submit_and_confirm(&self, label: &str, submission: &SignedSubmission) -> ArbResult<String> {
        let chain = self.legs.chain();
        let digest = chain.submit(submission).await?;
        info!("Leg {} submitted: {}", label, digest);

        let confirmation = chain
            .wait_for_confirmation(&digest, self.confirmation_timeout)
            .await?;
        ensure_success(&confirmation)?;

        info!("Leg {} confirmed: {}", label, digest);
        Ok(digest)
    }
}

#[async_trait]
impl ExecutionStrategy for SequentialExecutor {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Sequential
    }

    async fn execute(&self, round_trip: &RoundTripResult) -> ArbResult<ExecutionOutcome> {
        let owner = self.legs.owner().to_string();
        let chain = self.legs.chain().clone();

        let baseline = chain.get_balance(&owner, &round_trip.token_b).await?;
        let expected = baseline.saturating_add(min_amount_out(
            round_trip.quote_a2b.amount_out,
            self.legs.max_slippage_bps(),
        ));

        let leg_a = self.legs.build_signed(&round_trip.quote_a2b).await?;
        let leg_a_digest = self.submit_and_confirm("A->B", &leg_a).await?;

        let intermediate_balance = wait_for_balance(
            chain.as_ref(),
            &owner,
            &round_trip.token_b,
            expected,
            self.balance_policy,
        )
        .await
        .map_err(|e| {
            if matches!(e, ArbitrageError::BalanceTimeout { .. }) {
                warn!(
                    "Leg A->B {} landed but proceeds never arrived; leg B->A skipped",
                    leg_a_digest
                );
            }
            e
        })?;

        let leg_b = self.legs.build_signed(&round_trip.quote_b2a).await?;
        let leg_b_digest = self.submit_and_confirm("B->A", &leg_b).await?;

        Ok(ExecutionOutcome::Sequential {
            leg_a_digest,
            leg_b_digest,
            intermediate_balance,
        })
    }
}

pub(crate) fn ensure_success(confirmation: &Confirmation) -> ArbResult<()> {
    if confirmation.success {
        Ok(())
    } else {
        Err(ArbitrageError::submission(format!(
            "transaction {} failed on chain: {}",
            confirmation.digest, confirmation.status
        )))
    }
}
