// src/models/notification.rs

use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{
    finance::{Expense, MemberPayment},
    inventory::InventoryItem,
    menu::MenuItem,
    tenancy::Profile,
};

// Tópicos do feed de mudanças (um canal por tabela).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Expenses,
    MemberPayments,
    InventoryItems,
    MenuItems,
    Profiles,
}

impl Table {
    pub const ALL: [Table; 5] = [
        Table::Expenses,
        Table::MemberPayments,
        Table::InventoryItems,
        Table::MenuItems,
        Table::Profiles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Expenses => "expenses",
            Table::MemberPayments => "member_payments",
            Table::InventoryItems => "inventory_items",
            Table::MenuItems => "menu_items",
            Table::Profiles => "profiles",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl ChangeKind {
    // Sufixo usado na action do log de atividades
    pub fn verb(&self) -> &'static str {
        match self {
            ChangeKind::Insert => "created",
            ChangeKind::Update => "updated",
            ChangeKind::Delete => "deleted",
        }
    }
}

#[derive(Debug, Clone)]
pub enum ChangedRecord {
    Expense(Expense),
    Payment(MemberPayment),
    Inventory(InventoryItem),
    Menu(MenuItem),
    Profile(Profile),
}

// Evento publicado depois de cada mutação bem-sucedida.
// Em Delete, `record` é o estado anterior à remoção.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub table: Table,
    pub kind: ChangeKind,
    pub mess_id: Uuid,
    pub user_id: Uuid,
    pub record: ChangedRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Expense,
    Inventory,
    Payment,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub category: NotificationCategory,
    #[schema(example = "New Expense Added")]
    pub title: String,
    pub message: String,
    pub entity_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    // Calculado por usuário
    pub read: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationList {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}
