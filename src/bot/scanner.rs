use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    arbitrage::RoundTripEvaluator,
    dex::QuoteProvider,
    error::{ArbResult, ArbitrageError},
    types::{RoundTripResult, TokenInfo},
};

#[derive(Debug)]
pub struct ScanEntry {
    pub token: TokenInfo,
    pub result: Result<RoundTripResult, ArbitrageError>,
}

pub struct TokenScanner {
    quoter: Arc<dyn QuoteProvider>,
    evaluator: RoundTripEvaluator,
}

impl TokenScanner {
    pub fn new(quoter: Arc<dyn QuoteProvider>, evaluator: RoundTripEvaluator) -> Self {
        Self { quoter, evaluator }
    }

    pub async fn scan(&self, amount_in: u64, base_token: &str) -> ArbResult<Vec<ScanEntry>> {
        let tokens = self.quoter.fetch_tokens().await?;
        info!(
            "Scanning {} tokens from {} against {}",
            tokens.len(),
            self.quoter.name(),
            base_token
        );

        let mut entries = Vec::new();
        for token in tokens.into_iter().filter(|t| t.coin_type != base_token) {
            let result = self
                .evaluator
                .evaluate(amount_in, base_token, &token.coin_type)
                .await;

            match &result {
                Ok(round_trip) => info!(
                    "{} ({}): ratio {} {}",
                    token.ticker,
                    token.coin_type,
                    round_trip.round_trip_ratio,
                    round_trip.outcome()
                ),
                Err(e) => warn!("Skipping {} ({}): {}", token.ticker, token.coin_type, e),
            }

            entries.push(ScanEntry { token, result });
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{testing::MockQuoter, types::TradeOutcome};

    fn token(coin_type: &str, ticker: &str) -> TokenInfo {
        TokenInfo {
            coin_type: coin_type.to_string(),
            name: ticker.to_string(),
            ticker: ticker.to_string(),
            decimals: 9,
        }
    }

    fn scanner(quoter: &MockQuoter) -> TokenScanner {
        let shared: Arc<dyn QuoteProvider> = Arc::new(quoter.clone());
        TokenScanner::new(shared.clone(), RoundTripEvaluator::new(shared, 6, 9))
    }

    #[tokio::test]
    async fn test_scan_skips_base_and_keeps_going_after_errors() {
        let quoter = MockQuoter::new();
        quoter.set_tokens(vec![token("A", "SUI"), token("B", "USDC"), token("C", "CETUS")]);
        quoter.script_quote_error("no route");
        quoter.script_quotes(&[500, 1_100]);

        let entries = scanner(&quoter).scan(1_000, "A").await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].token.ticker, "USDC");
        assert!(entries[0].result.is_err());

        let round_trip = entries[1].result.as_ref().unwrap();
        assert_eq!(round_trip.token_b, "C");
        assert_eq!(round_trip.round_trip_ratio, "1.1");
        assert_eq!(round_trip.outcome(), TradeOutcome::Profit);

        assert_eq!(
            quoter.trace().calls(),
            vec![
                "fetch_tokens",
                "fetch_quote A->B 1000",
                "fetch_quote A->C 1000",
                "fetch_quote C->A 500",
            ]
        );
    }

    #[tokio::test]
    async fn test_scan_with_empty_list() {
        let quoter = MockQuoter::new();
        let entries = scanner(&quoter).scan(1_000, "A").await.unwrap();
        assert!(entries.is_empty());
    }
}
