pub mod metrics;
pub mod orchestrator;
pub mod scanner;
pub mod scheduler;

pub use metrics::BotMetrics;
pub use orchestrator::{ArbitrageBot, CycleReport, MonitorParams};
pub use scanner::{ScanEntry, TokenScanner};
pub use scheduler::{BotController, BotEvent};
