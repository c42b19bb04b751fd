// src/services/aggregation.rs
//
// Funções puras de agregação usadas pelos relatórios, dashboard e orçamento.
// Nunca falham: valores ausentes contam como zero e categorias vazias caem em "other".

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{
    dashboard::{CategoryTotal, MonthlyTotal},
    finance::{BudgetLine, BudgetStatus},
    inventory::{InventoryItem, StockStatus},
    menu::{DayMenu, MenuItem},
};

pub const FALLBACK_CATEGORY: &str = "other";

const DAY_NAMES: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];

pub fn sum_by<T>(rows: &[T], amount: impl Fn(&T) -> Option<Decimal>) -> Decimal {
    rows.iter().filter_map(&amount).sum()
}

pub fn group_sum_by_key<T>(
    rows: &[T],
    key: impl Fn(&T) -> Option<&str>,
    amount: impl Fn(&T) -> Option<Decimal>,
) -> BTreeMap<String, Decimal> {
    let mut groups = BTreeMap::new();
    for row in rows {
        let key = key(row)
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(FALLBACK_CATEGORY);
        *groups.entry(key.to_string()).or_insert(Decimal::ZERO) += amount(row).unwrap_or_default();
    }
    groups
}

/// Mapa categoria => total como lista, maior gasto primeiro (empate por nome).
pub fn category_totals(groups: BTreeMap<String, Decimal>) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();
    totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    totals
}

/// Agrupa por mês do calendário e devolve no máximo `months_back` meses, os mais recentes,
/// em ordem cronológica. Meses sem lançamentos não aparecem.
pub fn month_bucket<T>(
    rows: &[T],
    date: impl Fn(&T) -> Option<NaiveDate>,
    amount: impl Fn(&T) -> Option<Decimal>,
    months_back: usize,
) -> Vec<MonthlyTotal> {
    let mut buckets: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
    for row in rows {
        let Some(d) = date(row) else { continue };
        *buckets.entry((d.year(), d.month())).or_insert(Decimal::ZERO) += amount(row).unwrap_or_default();
    }

    let skip = buckets.len().saturating_sub(months_back);
    buckets
        .into_iter()
        .skip(skip)
        .map(|((year, month), total)| MonthlyTotal {
            period: format!("{:04}-{:02}", year, month),
            total,
        })
        .collect()
}

// Itens zerados também contam como estoque baixo.
pub fn low_stock_filter(items: &[InventoryItem]) -> Vec<InventoryItem> {
    items.iter().filter(|i| stock_status(i) != StockStatus::InStock).cloned().collect()
}

pub fn out_of_stock_filter(items: &[InventoryItem]) -> Vec<InventoryItem> {
    items.iter().filter(|i| stock_status(i) == StockStatus::OutOfStock).cloned().collect()
}

pub fn stock_status(item: &InventoryItem) -> StockStatus {
    if item.is_out_of_stock() {
        StockStatus::OutOfStock
    } else if item.is_low_stock() {
        StockStatus::Low
    } else {
        StockStatus::InStock
    }
}

// Σ estoque atual × custo unitário
pub fn inventory_value(items: &[InventoryItem]) -> Decimal {
    items.iter().map(|i| i.current_stock * i.cost_per_unit).sum()
}

/// Percentual gasto do orçamento, com 2 casas. Orçamento zero => 0.
pub fn percentage(spent: Decimal, budget: Decimal) -> Decimal {
    if budget.is_zero() {
        return Decimal::ZERO;
    }
    (spent / budget * Decimal::ONE_HUNDRED).round_dp(2)
}

pub fn status_from_percentage(pct: Decimal) -> BudgetStatus {
    if pct <= Decimal::from(80) {
        BudgetStatus::Safe
    } else if pct <= Decimal::ONE_HUNDRED {
        BudgetStatus::Warning
    } else {
        BudgetStatus::Exceeded
    }
}

pub fn split_even_share(total: Decimal, member_count: usize) -> Decimal {
    if member_count == 0 {
        return Decimal::ZERO;
    }
    (total / Decimal::from(member_count)).round_dp(2)
}

// pago - cota; negativo significa débito
pub fn member_balance(paid: Decimal, share: Decimal) -> Decimal {
    paid - share
}

/// Variação percentual em relação ao mês anterior. `None` quando a base é zero ("N/A").
pub fn growth_rate(current: Decimal, previous: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    Some(((current - previous) / previous * Decimal::ONE_HUNDRED).round_dp(2))
}

/// Média por mês com lançamento; sem meses, divide por 1.
pub fn monthly_average(total: Decimal, months: usize) -> Decimal {
    (total / Decimal::from(months.max(1))).round_dp(2)
}

/// Uma linha por categoria orçada, na ordem dos orçamentos recebidos.
pub fn budget_lines(spending: &BTreeMap<String, Decimal>, budgets: &[(String, Decimal)]) -> Vec<BudgetLine> {
    budgets
        .iter()
        .map(|(category, budget)| {
            let spent = spending.get(category).copied().unwrap_or_default();
            let pct = percentage(spent, *budget);
            BudgetLine {
                category: category.clone(),
                budget: *budget,
                spent,
                percentage: pct,
                status: status_from_percentage(pct),
            }
        })
        .collect()
}

pub fn day_name(day_of_week: i16) -> &'static str {
    usize::try_from(day_of_week)
        .ok()
        .and_then(|d| DAY_NAMES.get(d).copied())
        .unwrap_or("Unknown")
}

/// Cardápio semanal: sempre 7 dias (domingo = 0), mantendo a ordem dos itens recebidos.
pub fn group_by_day(items: &[MenuItem]) -> Vec<DayMenu> {
    (0..7i16)
        .map(|day| DayMenu {
            day_of_week: day,
            day_name: day_name(day),
            items: items.iter().filter(|i| i.day_of_week == day).cloned().collect(),
        })
        .collect()
}

/// Primeiro e último dia do mês de `date`.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date);
    (first, last)
}

pub fn previous_month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let (first, _) = month_bounds(date);
    match first.pred_opt() {
        Some(last_of_previous) => month_bounds(last_of_previous),
        None => (first, first),
    }
}

pub fn in_range(date: NaiveDate, (from, to): (NaiveDate, NaiveDate)) -> bool {
    date >= from && date <= to
}
