use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{broadcast, watch},
    time::sleep,
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    arbitrage::{is_profitable, CostEstimator, RoundTripEvaluator},
    blockchain::{ChainClient, SuiRpcClient},
    bot::{metrics::BotMetrics, scheduler::BotEvent},
    config::Config,
    dex::{HopClient, QuoteProvider},
    error::ArbResult,
    execution::{self, ExecutionStrategy},
    signer::TransactionSigner,
    types::{ExecutionOutcome, RoundTripResult},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorParams {
    pub amount_in: u64,
    pub token_a: String,
    pub token_b: String,
    pub interval: Duration,
}

impl MonitorParams {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            amount_in: config.arbitrage.amount_in()?,
            token_a: config.tokens.token_a.clone(),
            token_b: config.tokens.token_b.clone(),
            interval: Duration::from_millis(config.arbitrage.check_interval_ms),
        })
    }
}

#[derive(Debug, Clone)]
pub struct CycleReport {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub result: RoundTripResult,
    pub estimated_cost: u64,
    pub profitable: bool,
    pub execution: Option<ExecutionOutcome>,
}

pub struct ArbitrageBot {
    params: MonitorParams,
    evaluator: RoundTripEvaluator,
    cost_estimator: CostEstimator,
    executor: Option<Box<dyn ExecutionStrategy>>,
    metrics: BotMetrics,
    events: broadcast::Sender<BotEvent>,
    report_every_cycles: u64,
    cycle_count: u64,
}

impl ArbitrageBot {
    pub fn new(
        params: MonitorParams,
        evaluator: RoundTripEvaluator,
        cost_estimator: CostEstimator,
        executor: Option<Box<dyn ExecutionStrategy>>,
        events: broadcast::Sender<BotEvent>,
        token_decimals: u32,
    ) -> Self {
        Self {
            params,
            evaluator,
            cost_estimator,
            executor,
            metrics: BotMetrics::new(token_decimals),
            events,
            report_every_cycles: 0,
            cycle_count: 0,
        }
    }

    pub async fn from_config(
        config: &Config,
        signer: Option<Arc<dyn TransactionSigner>>,
        events: broadcast::Sender<BotEvent>,
    ) -> Result<Self> {
        info!("Initializing round trip bot");

        let request_timeout = Duration::from_millis(config.network.request_timeout_ms);
        let quoter: Arc<dyn QuoteProvider> =
            Arc::new(HopClient::new(config.quoter.clone(), request_timeout)?);

        let sui_client = SuiRpcClient::new(&config.network)?;
        sui_client
            .health_check()
            .await
            .context("Sui RPC health check failed")?;
        let chain: Arc<dyn ChainClient> = Arc::new(sui_client);

        let evaluator = RoundTripEvaluator::new(
            quoter.clone(),
            config.arbitrage.ratio_decimal_places,
            config.tokens.token_a_decimals,
        );

        let cost_estimator = CostEstimator::new(
            config.arbitrage.cost_model,
            config.arbitrage.estimated_cost()?,
            config.arbitrage.gas_units_per_leg,
            Some(chain.clone()),
        );

        let executor = if config.execution.enabled {
            let signer = signer.ok_or_else(|| {
                anyhow!("Execution is enabled but no signing key was provided")
            })?;
            info!(
                "Execution enabled in {} mode for {}",
                config.execution.mode,
                signer.address()
            );
            Some(execution::from_config(config, quoter, chain, signer)?)
        } else {
            info!("Execution disabled, running in observe-only mode");
            None
        };

        let mut bot = Self::new(
            MonitorParams::from_config(config)?,
            evaluator,
            cost_estimator,
            executor,
            events,
            config.tokens.token_a_decimals,
        );
        bot.report_every_cycles = config.bot.report_every_cycles;

        info!("Round trip bot initialized successfully");
        Ok(bot)
    }

    // Runs cycles until `shutdown` flips to true. A cycle in flight is always
    // allowed to finish; the signal is only observed between cycles.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(
            "Starting monitoring loop: {} of {} via {} every {:?}",
            self.params.amount_in, self.params.token_a, self.params.token_b, self.params.interval
        );
        let _ = self.events.send(BotEvent::Started);

        while !stop_requested(&shutdown) {
            self.cycle_count += 1;
            let cycle = self.cycle_count;
            debug!("Starting monitoring cycle #{}", cycle);

            match self.run_single_cycle().await {
                Ok(report) => {
                    self.metrics.record_cycle();
                    let _ = self.events.send(BotEvent::CycleCompleted {
                        cycle,
                        outcome: report.result.outcome(),
                        profit_or_loss: report.result.profit_or_loss,
                        executed: report.execution.as_ref().map(ExecutionOutcome::mode),
                    });
                }
                Err(e) => {
                    error!("Error in monitoring cycle #{}: {}", cycle, e);
                    self.metrics.record_cycle();
                    self.metrics.record_error(&e.to_string());
                    let _ = self.events.send(BotEvent::CycleFailed {
                        cycle,
                        error: e.to_string(),
                    });
                }
            }

            if self.report_every_cycles > 0 && cycle % self.report_every_cycles == 0 {
                info!("\n{}", self.metrics.generate_report());
            }

            if wait_or_shutdown(&mut shutdown, self.params.interval).await {
                break;
            }
        }

        info!("Monitoring loop stopped after {} cycles", self.cycle_count);
        let _ = self.events.send(BotEvent::Stopped {
            cycles: self.cycle_count,
        });
        Ok(())
    }

    pub async fn run_single_cycle(&mut self) -> ArbResult<CycleReport> {
        let id = Uuid::new_v4();
        let started_at = Utc::now();

        let result = self
            .evaluator
            .evaluate(self.params.amount_in, &self.params.token_a, &self.params.token_b)
            .await?;
        self.metrics
            .record_evaluation(result.outcome(), result.profit_or_loss);

        let estimated_cost = self.cost_estimator.estimate().await;
        let profitable = is_profitable(result.profit_or_loss, estimated_cost);
        debug!(
            "Cycle {}: profit_or_loss={} estimated_cost={} profitable={}",
            id, result.profit_or_loss, estimated_cost, profitable
        );

        let execution = if profitable {
            self.metrics.record_gate_pass();
            match &self.executor {
                Some(executor) => {
                    info!(
                        "Round trip clears cost ({} > {}), executing in {} mode",
                        result.profit_or_loss,
                        estimated_cost,
                        executor.mode()
                    );
                    self.metrics.record_execution_attempt();
                    let outcome = executor.execute(&result).await?;
                    self.metrics
                        .record_execution_success(outcome.mode(), result.profit_or_loss);
                    info!("Execution finished: {:?}", outcome);
                    Some(outcome)
                }
                None => {
                    info!(
                        "Round trip clears cost ({} > {}) but execution is disabled",
                        result.profit_or_loss, estimated_cost
                    );
                    None
                }
            }
        } else {
            None
        };

        Ok(CycleReport {
            id,
            started_at,
            result,
            estimated_cost,
            profitable,
            execution,
        })
    }

    pub fn metrics(&self) -> &BotMetrics {
        &self.metrics
    }
}

fn stop_requested(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow()
}

async fn wait_or_shutdown(shutdown: &mut watch::Receiver<bool>, interval: Duration) -> bool {
    tokio::select! {
        _ = sleep(interval) => stop_requested(shutdown),
        changed = shutdown.changed() => match changed {
            Ok(()) => stop_requested(shutdown),
            Err(_) => {
                warn!("Shutdown handle dropped, loop can no longer be stopped");
                sleep(interval).await;
                false
            }
        },
    }
}
