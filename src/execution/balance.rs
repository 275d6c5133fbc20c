use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::{
    blockchain::ChainClient,
    error::{ArbResult, ArbitrageError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalancePolicy {
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for BalancePolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1_000),
            max_attempts: 30,
        }
    }
}

// No sleep follows the final attempt.
pub async fn wait_for_balance(
    chain: &dyn ChainClient,
    owner: &str,
    coin_type: &str,
    expected: u64,
    policy: BalancePolicy,
) -> ArbResult<u64> {
    let mut observed = 0;

    for attempt in 1..=policy.max_attempts {
        observed = chain.get_balance(owner, coin_type).await?;
        if observed >= expected {
            debug!(
                "Balance of {} reached {} (need {}) on attempt {}",
                coin_type, observed, expected, attempt
            );
            return Ok(observed);
        }

        debug!(
            "Balance of {} is {} (need {}), attempt {}/{}",
            coin_type, observed, expected, attempt, policy.max_attempts
        );

        if attempt < policy.max_attempts {
            sleep(policy.poll_interval).await;
        }
    }

    Err(ArbitrageError::BalanceTimeout {
        coin_type: coin_type.to_string(),
        expected,
        observed,
        attempts: policy.max_attempts,
    })
}
