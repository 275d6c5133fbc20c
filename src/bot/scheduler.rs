use tokio::sync::{broadcast, watch};
use tracing::info;

use crate::types::{ExecutionMode, TradeOutcome};

#[derive(Debug, Clone, PartialEq)]
pub enum BotEvent {
    Started,
    CycleCompleted {
        cycle: u64,
        outcome: TradeOutcome,
        profit_or_loss: i128,
        executed: Option<ExecutionMode>,
    },
    CycleFailed {
        cycle: u64,
        error: String,
    },
    Stopped {
        cycles: u64,
    },
}

pub struct BotController {
    shutdown_sender: watch::Sender<bool>,
    event_sender: broadcast::Sender<BotEvent>,
}

impl BotController {
    pub fn new() -> Self {
        let (shutdown_sender, _) = watch::channel(false);
        let (event_sender, _) = broadcast::channel(100);

        Self {
            shutdown_sender,
            event_sender,
        }
    }

    pub fn stop(&self) {
        if !*self.shutdown_sender.borrow() {
            info!("Stop requested");
        }
        self.shutdown_sender.send_replace(true);
    }

    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_sender.subscribe()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BotEvent> {
        self.event_sender.subscribe()
    }

    pub fn event_sender(&self) -> broadcast::Sender<BotEvent> {
        self.event_sender.clone()
    }
}

impl Default for BotController {
    fn default() -> Self {
        Self::new()
    }
}
