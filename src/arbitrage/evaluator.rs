use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    arbitrage::fixed_point::{divide, to_display_units},
    dex::QuoteProvider,
    error::ArbResult,
    types::{QuoteRequest, RoundTripResult, TradeOutcome},
};

pub struct RoundTripEvaluator {
    quoter: Arc<dyn QuoteProvider>,
    decimal_places: u32,
    token_a_decimals: u32,
}

impl RoundTripEvaluator {
    pub fn new(quoter: Arc<dyn QuoteProvider>, decimal_places: u32, token_a_decimals: u32) -> Self {
        Self {
            quoter,
            decimal_places,
            token_a_decimals,
        }
    }

    pub async fn evaluate(
        &self,
        amount_in: u64,
        token_a: &str,
        token_b: &str,
    ) -> ArbResult<RoundTripResult> {
        let quote_a2b = self
            .quoter
            .fetch_quote(&QuoteRequest::new(token_a, token_b, amount_in))
            .await?;
        info!("{} to {} amount out: {}", token_a, token_b, quote_a2b.amount_out);

        let quote_b2a = self
            .quoter
            .fetch_quote(&QuoteRequest::new(token_b, token_a, quote_a2b.amount_out))
            .await?;
        info!("{} to {} amount out: {}", token_b, token_a, quote_b2a.amount_out);

        let round_trip_ratio = divide(quote_b2a.amount_out, amount_in, self.decimal_places)?;
        let profit_or_loss = quote_b2a.amount_out as i128 - amount_in as i128;

        let result = RoundTripResult {
            quote_a2b,
            quote_b2a,
            round_trip_ratio,
            profit_or_loss,
            token_a: token_a.to_string(),
            token_b: token_b.to_string(),
        };
        self.log_outcome(&result);

        Ok(result)
    }

    fn log_outcome(&self, result: &RoundTripResult) {
        let display_amount = to_display_units(result.profit_or_loss, self.token_a_decimals);
        match result.outcome() {
            TradeOutcome::Profit => info!(
                "Profit: {} ({}), round trip ratio: {}",
                result.profit_or_loss, display_amount, result.round_trip_ratio
            ),
            TradeOutcome::Loss => info!(
                "Loss: {} ({}), round trip ratio: {}",
                result.profit_or_loss, display_amount, result.round_trip_ratio
            ),
            TradeOutcome::BreakEven => info!("Break even, round trip ratio: {}", result.round_trip_ratio),
        }
        debug!("Round trip {} -> {} -> {} evaluated", result.token_a, result.token_b, result.token_a);
    }
}
