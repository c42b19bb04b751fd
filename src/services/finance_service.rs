// src/services/finance_service.rs

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, validation::normalize_category},
    db::{BudgetStore, ExpenseRepo, MemberRepo, PaymentRepo, Repository},
    models::{
        finance::{
            BudgetInput, BudgetReport, CategoryBudget, Expense, ExpenseFilter, ExpensePatch,
            FinanceSummary, MemberCostSummary, MemberPayment, NewExpense, NewPayment,
            PaymentFilter, PaymentPatch,
        },
        tenancy::{MemberFilter, MessScope, Role},
    },
    services::{
        aggregation::{
            budget_lines, group_sum_by_key, in_range, member_balance, month_bounds, percentage,
            split_even_share, status_from_percentage, sum_by,
        },
        report_cache::ReportCache,
    },
};

// Orçamento usado enquanto o mess não cadastra o seu
pub const DEFAULT_BUDGETS: [(&str, i64); 4] = [
    ("groceries", 15000),
    ("utilities", 5000),
    ("maintenance", 3000),
    ("other", 2000),
];

const RECENT_PAYMENTS: usize = 10;

#[derive(Clone)]
pub struct FinanceService {
    expenses: ExpenseRepo,
    payments: PaymentRepo,
    members: MemberRepo,
    budgets: Arc<dyn BudgetStore>,
    cache: ReportCache,
}

impl FinanceService {
    pub fn new(
        expenses: ExpenseRepo,
        payments: PaymentRepo,
        members: MemberRepo,
        budgets: Arc<dyn BudgetStore>,
        cache: ReportCache,
    ) -> Self {
        Self { expenses, payments, members, budgets, cache }
    }

    // ---
    // Despesas
    // ---

    pub async fn list_expenses(&self, scope: &MessScope, filter: &ExpenseFilter) -> Result<Vec<Expense>, AppError> {
        self.expenses.list(scope, filter).await
    }

    pub async fn get_expense(&self, scope: &MessScope, id: Uuid) -> Result<Expense, AppError> {
        self.expenses.get(scope, id).await
    }

    pub async fn create_expense(&self, scope: &MessScope, new: NewExpense) -> Result<Expense, AppError> {
        scope.ensure_role(Role::Manager)?;
        self.expenses.insert(scope, new).await
    }

    pub async fn update_expense(&self, scope: &MessScope, id: Uuid, patch: ExpensePatch) -> Result<Expense, AppError> {
        scope.ensure_role(Role::Manager)?;
        self.expenses.update(scope, id, patch).await
    }

    pub async fn delete_expense(&self, scope: &MessScope, id: Uuid) -> Result<(), AppError> {
        scope.ensure_role(Role::Manager)?;
        self.expenses.delete(scope, id).await
    }

    // ---
    // Pagamentos
    // ---

    /// Membros comuns só enxergam os próprios pagamentos.
    pub async fn list_payments(&self, scope: &MessScope, filter: PaymentFilter) -> Result<Vec<MemberPayment>, AppError> {
        let filter = if scope.role() < Role::Manager {
            PaymentFilter { member_id: Some(scope.profile_id()), ..filter }
        } else {
            filter
        };
        self.payments.list(scope, &filter).await
    }

    pub async fn get_payment(&self, scope: &MessScope, id: Uuid) -> Result<MemberPayment, AppError> {
        let payment = self.payments.get(scope, id).await?;
        if scope.role() < Role::Manager && payment.member_id != scope.profile_id() {
            return Err(AppError::NotFound("pagamento"));
        }
        Ok(payment)
    }

    pub async fn record_payment(&self, scope: &MessScope, new: NewPayment) -> Result<MemberPayment, AppError> {
        scope.ensure_role(Role::Manager)?;
        self.payments.insert(scope, new).await
    }

    pub async fn update_payment(&self, scope: &MessScope, id: Uuid, patch: PaymentPatch) -> Result<MemberPayment, AppError> {
        scope.ensure_role(Role::Manager)?;
        self.payments.update(scope, id, patch).await
    }

    pub async fn delete_payment(&self, scope: &MessScope, id: Uuid) -> Result<(), AppError> {
        scope.ensure_role(Role::Manager)?;
        self.payments.delete(scope, id).await
    }

    // ---
    // Resumos
    // ---

    pub async fn summary(&self, scope: &MessScope, today: NaiveDate) -> Result<FinanceSummary, AppError> {
        let expenses = self.expenses.list(scope, &ExpenseFilter::default()).await?;
        let payments = self.payments.list(scope, &PaymentFilter::default()).await?;
        let members = self.members.list(scope, &MemberFilter::default()).await?;
        let month = month_bounds(today);

        let total_expenses = sum_by(&expenses, |e| Some(e.amount));
        let total_payments = sum_by(&payments, |p| Some(p.amount));

        Ok(FinanceSummary {
            total_expenses,
            total_payments,
            balance: total_payments - total_expenses,
            current_month_expenses: sum_by(&expenses, |e| {
                in_range(e.expense_date, month).then_some(e.amount)
            }),
            current_month_payments: sum_by(&payments, |p| {
                in_range(p.payment_date, month).then_some(p.amount)
            }),
            member_count: members.len(),
        })
    }

    /// Cota do mês = despesas do mês ÷ membros; vence no último dia do mês.
    pub async fn member_summary(&self, scope: &MessScope, today: NaiveDate) -> Result<MemberCostSummary, AppError> {
        let (first, last) = month_bounds(today);

        let month_expenses = self
            .expenses
            .list(scope, &ExpenseFilter { since: Some(first), until: Some(last), category: None })
            .await?;
        let member_count = self.members.list(scope, &MemberFilter::default()).await?.len();
        let my_payments = self
            .payments
            .list(scope, &PaymentFilter { member_id: Some(scope.profile_id()), since: None })
            .await?;

        let monthly_share = split_even_share(sum_by(&month_expenses, |e| Some(e.amount)), member_count);
        let total_paid = sum_by(&my_payments, |p| {
            in_range(p.payment_date, (first, last)).then_some(p.amount)
        });

        Ok(MemberCostSummary {
            monthly_share,
            total_paid,
            balance: member_balance(total_paid, monthly_share),
            due_date: last,
            member_count,
            recent_payments: my_payments.into_iter().take(RECENT_PAYMENTS).collect(),
        })
    }

    // ---
    // Orçamento
    // ---

    pub async fn budget_report(&self, scope: &MessScope, today: NaiveDate) -> Result<BudgetReport, AppError> {
        let stored = self.budgets.all(scope).await?;
        let using_defaults = stored.is_empty();
        let budgets: Vec<(String, Decimal)> = if using_defaults {
            DEFAULT_BUDGETS
                .iter()
                .map(|(category, amount)| (category.to_string(), Decimal::from(*amount)))
                .collect()
        } else {
            stored.into_iter().map(|b| (b.category, b.monthly_amount)).collect()
        };

        let (first, last) = month_bounds(today);
        let month_expenses = self
            .expenses
            .list(scope, &ExpenseFilter { since: Some(first), until: Some(last), category: None })
            .await?;
        let spending = group_sum_by_key(&month_expenses, |e| Some(e.category.as_str()), |e| Some(e.amount));

        let lines = budget_lines(&spending, &budgets);
        let total_budget = sum_by(&lines, |l| Some(l.budget));
        let total_spent = sum_by(&lines, |l| Some(l.spent));
        let total_percentage = percentage(total_spent, total_budget);

        Ok(BudgetReport {
            lines,
            total_budget,
            total_spent,
            total_percentage,
            status: status_from_percentage(total_percentage),
            using_defaults,
        })
    }

    pub async fn set_budget(&self, scope: &MessScope, category: &str, input: BudgetInput) -> Result<CategoryBudget, AppError> {
        scope.ensure_role(Role::Manager)?;
        input.validate()?;
        let budget = self
            .budgets
            .upsert(scope, &normalize_category(Some(category)), input.monthly_amount)
            .await?;
        self.cache.invalidate(scope.mess_id());
        Ok(budget)
    }

    pub async fn delete_budget(&self, scope: &MessScope, category: &str) -> Result<(), AppError> {
        scope.ensure_role(Role::Manager)?;
        self.budgets.remove(scope, &normalize_category(Some(category))).await?;
        self.cache.invalidate(scope.mess_id());
        Ok(())
    }
}
