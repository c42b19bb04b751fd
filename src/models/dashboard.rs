// src/models/dashboard.rs

use serde::Serialize;
use rust_decimal::Decimal;
use utoipa::ToSchema;

use crate::models::activity::Activity;

// Total de um mês (period = "YYYY-MM")
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    #[schema(example = "2026-10")]
    pub period: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

// Página de relatórios
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessReport {
    pub total_expenses: Decimal,
    pub member_count: usize,
    pub low_stock_count: usize,
    pub expenses_by_category: Vec<CategoryTotal>,
    // Últimos 6 meses com lançamentos, em ordem cronológica
    pub monthly_expenses: Vec<MonthlyTotal>,
    // total_expenses dividido pelos meses acima (mínimo 1)
    pub average_monthly_expense: Decimal,
    pub recent_activities: Vec<Activity>,
}

// Cards do topo do dashboard
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub member_count: usize,
    pub month_expenses: Decimal,
    pub last_month_expenses: Decimal,
    // null quando o mês anterior não teve despesas ("N/A")
    pub expense_growth: Option<Decimal>,
    pub menu_item_count: usize,
    pub stock_item_count: usize,
    pub low_stock_count: usize,
}
