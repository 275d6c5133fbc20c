use async_trait::async_trait;

use crate::{
    error::ArbResult,
    types::{BuiltTransaction, ExecutionPlan, Quote, QuoteRequest, TokenInfo},
};

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_quote(&self, request: &QuoteRequest) -> ArbResult<Quote>;

    async fn fetch_tx(&self, plan: &ExecutionPlan) -> ArbResult<BuiltTransaction>;

    async fn fetch_tokens(&self) -> ArbResult<Vec<TokenInfo>>;
}
