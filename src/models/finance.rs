// src/models/finance.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use sqlx::FromRow;
use chrono::{DateTime, Utc, NaiveDate};
use rust_decimal::Decimal;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::validation::validate_not_negative;

// =========================================================================
//  DESPESAS DO MESS
// =========================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,

    #[schema(ignore)]
    pub mess_id: Uuid,

    // user_id de quem lançou a despesa
    pub added_by: Uuid,

    #[schema(example = "Arroz 25kg")]
    pub title: String,

    pub description: Option<String>,

    #[schema(example = "1250.00")]
    pub amount: Decimal,

    #[schema(example = "groceries")]
    pub category: String,

    #[schema(value_type = String, format = Date, example = "2026-10-01")]
    pub expense_date: NaiveDate,

    pub receipt_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: String,

    pub description: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    pub amount: Decimal,

    // Vazio => "other"
    pub category: Option<String>,

    // Ausente => data de hoje (default do banco)
    #[schema(value_type = Option<String>, format = Date)]
    pub expense_date: Option<NaiveDate>,

    pub receipt_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub expense_date: Option<NaiveDate>,
    pub receipt_url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExpenseFilter {
    /// Inclusive
    pub since: Option<NaiveDate>,
    /// Inclusive
    pub until: Option<NaiveDate>,
    pub category: Option<String>,
}

// =========================================================================
//  PAGAMENTOS DOS MEMBROS
// =========================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberPayment {
    pub id: Uuid,

    #[schema(ignore)]
    pub mess_id: Uuid,

    // id do Profile (não o user_id)
    pub member_id: Uuid,

    #[schema(example = "3000.00")]
    pub amount: Decimal,

    #[schema(value_type = String, format = Date, example = "2026-10-05")]
    pub payment_date: NaiveDate,

    #[schema(example = "cash")]
    pub payment_method: Option<String>,

    pub reference_number: Option<String>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub member_id: Uuid,

    #[validate(custom(function = "validate_not_negative"))]
    pub amount: Decimal,

    #[schema(value_type = Option<String>, format = Date)]
    pub payment_date: Option<NaiveDate>,

    pub payment_method: Option<String>,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPatch {
    pub amount: Option<Decimal>,
    #[schema(value_type = Option<String>, format = Date)]
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PaymentFilter {
    pub member_id: Option<Uuid>,
    /// Inclusive
    pub since: Option<NaiveDate>,
}

// =========================================================================
//  ORÇAMENTO POR CATEGORIA
// =========================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBudget {
    #[schema(ignore)]
    pub mess_id: Uuid,

    #[schema(example = "groceries")]
    pub category: String,

    #[schema(example = "15000.00")]
    pub monthly_amount: Decimal,

    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetInput {
    #[validate(custom(function = "validate_not_negative"))]
    pub monthly_amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Safe,
    Warning,
    Exceeded,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLine {
    pub category: String,
    pub budget: Decimal,
    pub spent: Decimal,
    pub percentage: Decimal,
    pub status: BudgetStatus,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetReport {
    pub lines: Vec<BudgetLine>,
    pub total_budget: Decimal,
    pub total_spent: Decimal,
    pub total_percentage: Decimal,
    pub status: BudgetStatus,
    // true quando o mess ainda não cadastrou orçamentos e os valores padrão foram usados
    pub using_defaults: bool,
}

// =========================================================================
//  RESUMOS
// =========================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    pub total_expenses: Decimal,
    pub total_payments: Decimal,
    // pagamentos - despesas
    pub balance: Decimal,
    pub current_month_expenses: Decimal,
    pub current_month_payments: Decimal,
    pub member_count: usize,
}

// Visão do próprio membro: quanto deve no mês e quanto já pagou.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberCostSummary {
    pub monthly_share: Decimal,
    pub total_paid: Decimal,
    // pago - cota (negativo = em débito)
    pub balance: Decimal,
    #[schema(value_type = String, format = Date)]
    pub due_date: NaiveDate,
    pub member_count: usize,
    pub recent_payments: Vec<MemberPayment>,
}
