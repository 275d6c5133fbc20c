use anyhow::Result;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    arbitrage::to_display_units,
    types::{ExecutionMode, TradeOutcome},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotMetrics {
    pub started_at: DateTime<Utc>,
    pub total_cycles_completed: u64,
    pub profitable_round_trips: u64,
    pub losing_round_trips: u64,
    pub break_even_round_trips: u64,
    pub gate_passes: u64,
    pub executions_attempted: u64,
    pub executions_succeeded: u64,
    pub sequential_executions: u64,
    pub bundled_executions: u64,
    pub best_profit_or_loss: Option<i128>,
    pub cumulative_quoted_profit: BigDecimal,
    pub error_count: u64,
    pub last_error: Option<String>,
    pub last_updated: DateTime<Utc>,
    token_decimals: u32,
}

impl BotMetrics {
    pub fn new(token_decimals: u32) -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            total_cycles_completed: 0,
            profitable_round_trips: 0,
            losing_round_trips: 0,
            break_even_round_trips: 0,
            gate_passes: 0,
            executions_attempted: 0,
            executions_succeeded: 0,
            sequential_executions: 0,
            bundled_executions: 0,
            best_profit_or_loss: None,
            cumulative_quoted_profit: BigDecimal::from(0),
            error_count: 0,
            last_error: None,
            last_updated: now,
            token_decimals,
        }
    }

    pub fn record_evaluation(&mut self, outcome: TradeOutcome, profit_or_loss: i128) {
        match outcome {
            TradeOutcome::Profit => self.profitable_round_trips += 1,
            TradeOutcome::Loss => self.losing_round_trips += 1,
            TradeOutcome::BreakEven => self.break_even_round_trips += 1,
        }

        self.best_profit_or_loss = Some(match self.best_profit_or_loss {
            Some(best) if best >= profit_or_loss => best,
            _ => profit_or_loss,
        });
        self.last_updated = Utc::now();
    }

    pub fn record_gate_pass(&mut self) {
        self.gate_passes += 1;
    }

    pub fn record_execution_attempt(&mut self) {
        self.executions_attempted += 1;
    }

    // Only quoted profit is tracked; realised amounts depend on on-chain fills.
    pub fn record_execution_success(&mut self, mode: ExecutionMode, profit_or_loss: i128) {
        self.executions_succeeded += 1;
        match mode {
            ExecutionMode::Sequential => self.sequential_executions += 1,
            ExecutionMode::Bundled => self.bundled_executions += 1,
        }
        self.cumulative_quoted_profit += to_display_units(profit_or_loss, self.token_decimals);
        self.last_updated = Utc::now();
    }

    pub fn record_cycle(&mut self) {
        self.total_cycles_completed += 1;
        self.last_updated = Utc::now();
    }

    pub fn record_error(&mut self, error_message: &str) {
        self.error_count += 1;
        self.last_error = Some(error_message.to_string());
        self.last_updated = Utc::now();
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_cycles_completed == 0 {
            return 0.0;
        }
        let failed = self.error_count.min(self.total_cycles_completed);
        (self.total_cycles_completed - failed) as f64 / self.total_cycles_completed as f64
    }

    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Round Trip Bot Metrics ===\n");
        report.push_str(&format!(
            "Uptime: {} seconds\n",
            (self.last_updated - self.started_at).num_seconds()
        ));
        report.push_str(&format!("Total Cycles: {}\n", self.total_cycles_completed));
        report.push_str(&format!(
            "Round Trips: {} profit / {} loss / {} break even\n",
            self.profitable_round_trips, self.losing_round_trips, self.break_even_round_trips
        ));
        report.push_str(&format!("Gate Passes: {}\n", self.gate_passes));
        report.push_str(&format!(
            "Executions: {}/{} succeeded ({} sequential, {} bundled)\n",
            self.executions_succeeded,
            self.executions_attempted,
            self.sequential_executions,
            self.bundled_executions
        ));
        if let Some(best) = self.best_profit_or_loss {
            report.push_str(&format!("Best Round Trip: {}\n", best));
        }
        report.push_str(&format!("Cumulative Quoted Profit: {}\n", self.cumulative_quoted_profit));
        report.push_str(&format!("Success Rate: {:.2}%\n", self.success_rate() * 100.0));
        report.push_str(&format!("Error Count: {}\n", self.error_count));

        if let Some(ref error) = self.last_error {
            report.push_str(&format!("Last Error: {}\n", error));
        }

        report.push_str(&format!("Last Updated: {}\n", self.last_updated));
        report
    }

    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize metrics: {}", e))
    }
}
