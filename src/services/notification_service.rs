// src/services/notification_service.rs

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{Arc, PoisonError, RwLock, Weak},
};

use chrono::Utc;
use tokio::{sync::watch, task::JoinHandle};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        notification::{
            ChangeEvent, ChangeKind, ChangedRecord, Notification, NotificationCategory,
            NotificationKind, NotificationList, Table,
        },
        tenancy::MessScope,
    },
    services::change_feed::ChangeFeed,
};

// Quantas notificações ficam guardadas por mess
pub const INBOX_CAPACITY: usize = 50;

struct Stored {
    notification: Notification,
    read_by: HashSet<Uuid>,
}

/// Transforma eventos do feed em notificações por mess, com leitura controlada por usuário.
pub struct NotificationCenter {
    inboxes: RwLock<HashMap<Uuid, VecDeque<Stored>>>,
    // Nunca recebe valores: o drop do sender avisa o listener que o centro acabou.
    alive: watch::Sender<()>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self {
            inboxes: RwLock::new(HashMap::new()),
            alive: watch::channel(()).0,
        }
    }

    /// Regras de síntese. Eventos que não geram notificação retornam None.
    pub fn synthesize(event: &ChangeEvent) -> Option<Notification> {
        let (kind, category, title, message, entity_id) = match (&event.record, event.kind) {
            (ChangedRecord::Expense(expense), ChangeKind::Insert) => (
                NotificationKind::Info,
                NotificationCategory::Expense,
                "Nova despesa lançada",
                format!("Despesa de {} registrada: {}.", expense.amount, expense.title),
                expense.id,
            ),
            (ChangedRecord::Inventory(item), ChangeKind::Update) if item.is_out_of_stock() => (
                NotificationKind::Error,
                NotificationCategory::Inventory,
                "Alerta crítico de estoque",
                format!("{} acabou.", item.name),
                item.id,
            ),
            (ChangedRecord::Inventory(item), ChangeKind::Update) if item.is_low_stock() => (
                NotificationKind::Warning,
                NotificationCategory::Inventory,
                "Alerta de estoque baixo",
                format!("{} está acabando ({} {} restantes).", item.name, item.current_stock, item.unit),
                item.id,
            ),
            (ChangedRecord::Payment(payment), ChangeKind::Insert) => (
                NotificationKind::Success,
                NotificationCategory::Payment,
                "Pagamento recebido",
                format!("Pagamento de {} recebido.", payment.amount),
                payment.id,
            ),
            _ => return None,
        };

        Some(Notification {
            id: Uuid::new_v4(),
            kind,
            category,
            title: title.to_string(),
            message,
            entity_id: Some(entity_id),
            created_at: Utc::now(),
            read: false,
        })
    }

    pub fn handle(&self, event: &ChangeEvent) {
        if let Some(notification) = Self::synthesize(event) {
            self.push(event.mess_id, notification);
        }
    }

    pub fn push(&self, mess_id: Uuid, notification: Notification) {
        let mut inboxes = self.inboxes.write().unwrap_or_else(PoisonError::into_inner);
        let inbox = inboxes.entry(mess_id).or_default();
        inbox.push_front(Stored { notification, read_by: HashSet::new() });
        inbox.truncate(INBOX_CAPACITY);
    }

    /// Mais recentes primeiro, com `read` calculado para o usuário do escopo.
    pub fn list(&self, scope: &MessScope) -> NotificationList {
        let inboxes = self.inboxes.read().unwrap_or_else(PoisonError::into_inner);
        let notifications: Vec<Notification> = inboxes
            .get(&scope.mess_id())
            .map(|inbox| {
                inbox
                    .iter()
                    .map(|stored| Notification {
                        read: stored.read_by.contains(&scope.user_id()),
                        ..stored.notification.clone()
                    })
                    .collect()
            })
            .unwrap_or_default();

        let unread_count = notifications.iter().filter(|n| !n.read).count();
        NotificationList { notifications, unread_count }
    }

    pub fn mark_read(&self, scope: &MessScope, id: Uuid) -> Result<(), AppError> {
        let mut inboxes = self.inboxes.write().unwrap_or_else(PoisonError::into_inner);
        let stored = inboxes
            .get_mut(&scope.mess_id())
            .and_then(|inbox| inbox.iter_mut().find(|s| s.notification.id == id))
            .ok_or(AppError::NotFound("notificação"))?;
        stored.read_by.insert(scope.user_id());
        Ok(())
    }

    pub fn mark_all_read(&self, scope: &MessScope) {
        let mut inboxes = self.inboxes.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(inbox) = inboxes.get_mut(&scope.mess_id()) {
            for stored in inbox.iter_mut() {
                stored.read_by.insert(scope.user_id());
            }
        }
    }

    /// Assina os três tópicos (despesas, estoque, pagamentos). O listener guarda só um Weak
    /// e termina quando o centro é descartado.
    pub fn spawn_listener(self: &Arc<Self>, feed: &ChangeFeed) -> JoinHandle<()> {
        let center: Weak<Self> = Arc::downgrade(self);
        let mut alive = self.alive.subscribe();
        let mut expenses = feed.subscribe(Table::Expenses);
        let mut inventory = feed.subscribe(Table::InventoryItems);
        let mut payments = feed.subscribe(Table::MemberPayments);
        tracing::debug!(
            "Listener de notificações ativo ({} assinantes em despesas)",
            feed.subscriber_count(Table::Expenses)
        );

        tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    _ = alive.changed() => break,
                    event = expenses.recv() => event,
                    event = inventory.recv() => event,
                    event = payments.recv() => event,
                };

                let Some(event) = event else { break };
                let Some(center) = center.upgrade() else { break };
                center.handle(&event);
            }
            tracing::debug!("Listener de notificações encerrado");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use rust_decimal::Decimal;

    use crate::test_utils::{admin_scope, member_scope_in, sample_expense, sample_item, sample_payment};

    fn event(mess_id: Uuid, kind: ChangeKind, record: ChangedRecord) -> ChangeEvent {
        let table = match &record {
            ChangedRecord::Expense(_) => Table::Expenses,
            ChangedRecord::Payment(_) => Table::MemberPayments,
            ChangedRecord::Inventory(_) => Table::InventoryItems,
            ChangedRecord::Menu(_) => Table::MenuItems,
            ChangedRecord::Profile(_) => Table::Profiles,
        };
        ChangeEvent { table, kind, mess_id, user_id: Uuid::new_v4(), record }
    }

    #[test]
    fn synthesis_rules() {
        let mess = Uuid::new_v4();

        let expense = event(mess, ChangeKind::Insert, ChangedRecord::Expense(sample_expense(mess, "Gás", 1100)));
        let n = NotificationCenter::synthesize(&expense).unwrap();
        assert_eq!(n.kind, NotificationKind::Info);
        assert_eq!(n.category, NotificationCategory::Expense);

        let low = event(mess, ChangeKind::Update, ChangedRecord::Inventory(sample_item(mess, 2, 5)));
        assert_eq!(NotificationCenter::synthesize(&low).unwrap().kind, NotificationKind::Warning);

        let out = event(mess, ChangeKind::Update, ChangedRecord::Inventory(sample_item(mess, 0, 5)));
        assert_eq!(NotificationCenter::synthesize(&out).unwrap().kind, NotificationKind::Error);

        let healthy = event(mess, ChangeKind::Update, ChangedRecord::Inventory(sample_item(mess, 9, 5)));
        assert!(NotificationCenter::synthesize(&healthy).is_none());

        let paid = event(
            mess,
            ChangeKind::Insert,
            ChangedRecord::Payment(sample_payment(mess, Uuid::new_v4(), Decimal::from(3000))),
        );
        assert_eq!(NotificationCenter::synthesize(&paid).unwrap().kind, NotificationKind::Success);

        let expense_update = event(mess, ChangeKind::Update, ChangedRecord::Expense(sample_expense(mess, "Gás", 1)));
        assert!(NotificationCenter::synthesize(&expense_update).is_none());
    }

    #[test]
    fn read_state_is_per_user() {
        let center = NotificationCenter::new();
        let admin = admin_scope();
        let member = member_scope_in(admin.mess_id());

        for i in 0..3 {
            center.handle(&event(
                admin.mess_id(),
                ChangeKind::Insert,
                ChangedRecord::Expense(sample_expense(admin.mess_id(), "Item", i)),
            ));
        }

        let first = center.list(&admin).notifications[0].id;
        center.mark_read(&admin, first).unwrap();

        assert_eq!(center.list(&admin).unread_count, 2);
        assert_eq!(center.list(&member).unread_count, 3);

        center.mark_all_read(&member);
        assert_eq!(center.list(&member).unread_count, 0);
        assert!(matches!(center.mark_read(&admin, Uuid::new_v4()), Err(AppError::NotFound(_))));
    }

    #[test]
    fn inbox_is_capped_and_newest_first() {
        let center = NotificationCenter::new();
        let scope = admin_scope();

        for i in 0..(INBOX_CAPACITY as i64 + 5) {
            center.handle(&event(
                scope.mess_id(),
                ChangeKind::Insert,
                ChangedRecord::Expense(sample_expense(scope.mess_id(), "Item", i)),
            ));
        }

        let list = center.list(&scope);
        assert_eq!(list.notifications.len(), INBOX_CAPACITY);
        assert!(list.notifications[0].message.contains("54"));
    }

    #[tokio::test]
    async fn listener_delivers_and_stops_when_center_is_dropped() {
        let feed = ChangeFeed::new();
        let center = Arc::new(NotificationCenter::new());
        let handle = center.spawn_listener(&feed);
        let scope = admin_scope();

        feed.publish(event(
            scope.mess_id(),
            ChangeKind::Insert,
            ChangedRecord::Expense(sample_expense(scope.mess_id(), "Pão", 80)),
        ));

        let mut delivered = false;
        for _ in 0..50 {
            if center.list(&scope).unread_count == 1 {
                delivered = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(delivered);

        drop(center);
        tokio::time::timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
        assert_eq!(feed.subscriber_count(Table::Expenses), 0);
    }
}
