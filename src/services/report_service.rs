// src/services/report_service.rs

use chrono::NaiveDate;

use crate::{
    common::error::AppError,
    db::{ExpenseRepo, InventoryRepo, MemberRepo, MenuRepo, Repository},
    models::{
        dashboard::{DashboardStats, MessReport},
        finance::ExpenseFilter,
        inventory::{InventoryFilter, StockLevel},
        menu::MenuFilter,
        tenancy::{MemberFilter, MessScope},
    },
    services::{
        activity_service::ActivityLogger,
        aggregation::{
            category_totals, group_sum_by_key, growth_rate, in_range, month_bounds, month_bucket,
            monthly_average, previous_month_bounds, sum_by,
        },
        report_cache::ReportCache,
    },
};

const REPORT_MONTHS: usize = 6;
const REPORT_ACTIVITIES: i64 = 10;

// Relatórios e dashboard: só leitura, resultado guardado no ReportCache.
#[derive(Clone)]
pub struct ReportService {
    expenses: ExpenseRepo,
    members: MemberRepo,
    inventory: InventoryRepo,
    menu: MenuRepo,
    logger: ActivityLogger,
    cache: ReportCache,
}

impl ReportService {
    pub fn new(
        expenses: ExpenseRepo,
        members: MemberRepo,
        inventory: InventoryRepo,
        menu: MenuRepo,
        logger: ActivityLogger,
        cache: ReportCache,
    ) -> Self {
        Self { expenses, members, inventory, menu, logger, cache }
    }

    pub async fn report(&self, scope: &MessScope) -> Result<MessReport, AppError> {
        self.cache
            .get_or_compute(scope.mess_id(), || self.compute_report(scope))
            .await
    }

    pub async fn dashboard(&self, scope: &MessScope, today: NaiveDate) -> Result<DashboardStats, AppError> {
        self.cache
            .get_or_compute(scope.mess_id(), || self.compute_dashboard(scope, today))
            .await
    }

    async fn compute_report(&self, scope: &MessScope) -> Result<MessReport, AppError> {
        let expenses = self.expenses.list(scope, &ExpenseFilter::default()).await?;
        let member_count = self.members.list(scope, &MemberFilter::default()).await?.len();
        let low_stock = self
            .inventory
            .list(scope, &InventoryFilter { category: None, stock: Some(StockLevel::Low) })
            .await?;
        let recent_activities = self.logger.recent(scope, REPORT_ACTIVITIES).await?;

        let by_category = group_sum_by_key(&expenses, |e| Some(e.category.as_str()), |e| Some(e.amount));

        let total_expenses = sum_by(&expenses, |e| Some(e.amount));
        let monthly_expenses = month_bucket(&expenses, |e| Some(e.expense_date), |e| Some(e.amount), REPORT_MONTHS);

        Ok(MessReport {
            total_expenses,
            member_count,
            low_stock_count: low_stock.len(),
            expenses_by_category: category_totals(by_category),
            average_monthly_expense: monthly_average(total_expenses, monthly_expenses.len()),
            monthly_expenses,
            recent_activities,
        })
    }

    async fn compute_dashboard(&self, scope: &MessScope, today: NaiveDate) -> Result<DashboardStats, AppError> {
        let (current, previous) = (month_bounds(today), previous_month_bounds(today));
        let expenses = self
            .expenses
            .list(scope, &ExpenseFilter { since: Some(previous.0), until: Some(current.1), category: None })
            .await?;
        let member_count = self.members.list(scope, &MemberFilter::default()).await?.len();
        let menu_item_count = self.menu.list(scope, &MenuFilter::default()).await?.len();
        let stock = self.inventory.list(scope, &InventoryFilter::default()).await?;

        let month_expenses = sum_by(&expenses, |e| in_range(e.expense_date, current).then_some(e.amount));
        let last_month_expenses = sum_by(&expenses, |e| in_range(e.expense_date, previous).then_some(e.amount));

        Ok(DashboardStats {
            member_count,
            month_expenses,
            last_month_expenses,
            expense_growth: growth_rate(month_expenses, last_month_expenses),
            menu_item_count,
            stock_item_count: stock.len(),
            low_stock_count: stock.iter().filter(|i| i.is_low_stock()).count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::{
        models::finance::ExpensePatch,
        test_utils::{date, new_expense_on, new_item, settle, World},
    };

    #[tokio::test]
    async fn report_buckets_and_categories() {
        let world = World::new();
        let (admin_user, _mess) = world.mess_with_admin("A").await;
        let admin = world.resolver.resolve_scope(admin_user.id).await.unwrap();

        for month in 1..=8 {
            world
                .finance
                .create_expense(&admin, new_expense_on(100 * month as i64, "groceries", date(2026, month, 5)))
                .await
                .unwrap();
        }
        world.finance.create_expense(&admin, new_expense_on(50, "", date(2026, 8, 6))).await.unwrap();
        world.inventory.create(&admin, new_item("Sal", 1, 2, 20)).await.unwrap();
        settle().await;

        let report = world.report.report(&admin).await.unwrap();
        assert_eq!(report.total_expenses, Decimal::from(3650));
        assert_eq!(report.member_count, 1);
        assert_eq!(report.low_stock_count, 1);
        assert_eq!(report.monthly_expenses.len(), 6);
        assert_eq!(report.monthly_expenses[0].period, "2026-03");
        assert_eq!(report.monthly_expenses[5].total, Decimal::from(850));
        assert_eq!(report.average_monthly_expense, Decimal::new(60833, 2));
        assert_eq!(report.expenses_by_category[0].category, "groceries");
        assert_eq!(report.expenses_by_category[1].category, "other");
        assert_eq!(report.recent_activities.len(), 10);
    }

    #[tokio::test]
    async fn dashboard_growth_and_cache_invalidation() {
        let world = World::new();
        let (admin_user, _mess) = world.mess_with_admin("A").await;
        let admin = world.resolver.resolve_scope(admin_user.id).await.unwrap();
        let today = date(2026, 10, 19);

        let first = world
            .finance
            .create_expense(&admin, new_expense_on(1000, "groceries", today))
            .await
            .unwrap();

        // Sem despesas no mês anterior: crescimento indefinido
        let stats = world.report.dashboard(&admin, today).await.unwrap();
        assert_eq!(stats.month_expenses, Decimal::from(1000));
        assert_eq!(stats.expense_growth, None);

        world
            .finance
            .update_expense(
                &admin,
                first.id,
                ExpensePatch { expense_date: Some(date(2026, 9, 10)), ..Default::default() },
            )
            .await
            .unwrap();
        world.finance.create_expense(&admin, new_expense_on(1500, "groceries", today)).await.unwrap();

        let stats = world.report.dashboard(&admin, today).await.unwrap();
        assert_eq!(stats.last_month_expenses, Decimal::from(1000));
        assert_eq!(stats.month_expenses, Decimal::from(1500));
        assert_eq!(stats.expense_growth, Some(Decimal::from(50)));
    }

    #[tokio::test]
    async fn report_read_right_after_a_mutation_catches_up_with_the_activity_log() {
        let world = World::new();
        let (admin_user, _mess) = world.mess_with_admin("A").await;
        let admin = world.resolver.resolve_scope(admin_user.id).await.unwrap();
        settle().await;

        world
            .finance
            .create_expense(&admin, new_expense_on(300, "groceries", date(2026, 10, 1)))
            .await
            .unwrap();
        // Lido antes da atividade ser gravada
        world.report.report(&admin).await.unwrap();
        settle().await;

        let report = world.report.report(&admin).await.unwrap();
        assert_eq!(report.recent_activities.len(), world.activities.all().len());
        assert!(report.recent_activities.iter().any(|a| a.action == "expense_created"));
    }
}
