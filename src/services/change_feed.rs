// src/services/change_feed.rs

use std::{collections::HashMap, sync::Arc};

use tokio::sync::broadcast::{self, error::RecvError};

use crate::models::notification::{ChangeEvent, Table};

const CHANNEL_CAPACITY: usize = 256;

/// Pub/sub em processo: um canal broadcast por tabela.
/// Só alimenta notificações; nunca altera o estado do domínio.
#[derive(Clone)]
pub struct ChangeFeed {
    channels: Arc<HashMap<Table, broadcast::Sender<ChangeEvent>>>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed {
    pub fn new() -> Self {
        let channels = Table::ALL
            .into_iter()
            .map(|table| (table, broadcast::channel(CHANNEL_CAPACITY).0))
            .collect();
        Self { channels: Arc::new(channels) }
    }

    /// Sem assinantes é um no-op.
    pub fn publish(&self, event: ChangeEvent) {
        if let Some(sender) = self.channels.get(&event.table) {
            let _ = sender.send(event);
        }
    }

    pub fn subscribe(&self, table: Table) -> Subscription {
        let receiver = self
            .channels
            .get(&table)
            .map(broadcast::Sender::subscribe)
            // Sem canal, a assinatura já nasce encerrada.
            .unwrap_or_else(|| broadcast::channel(1).1);
        Subscription { table, receiver }
    }

    pub fn subscriber_count(&self, table: Table) -> usize {
        self.channels
            .get(&table)
            .map(broadcast::Sender::receiver_count)
            .unwrap_or(0)
    }
}

/// Assinatura de uma tabela. O drop encerra a assinatura.
pub struct Subscription {
    table: Table,
    receiver: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    /// Próximo evento; `None` quando o feed foi encerrado.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Assinatura de '{}' perdeu {} eventos", self.table.as_str(), skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
