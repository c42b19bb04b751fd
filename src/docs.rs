// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Tenancy ---
        handlers::tenancy::get_me,
        handlers::tenancy::update_me,
        handlers::tenancy::list_available,
        handlers::tenancy::create_mess,
        handlers::tenancy::join_mess,
        handlers::tenancy::get_current,
        handlers::tenancy::update_current,

        // --- Members ---
        handlers::members::list_members,
        handlers::members::update_member,
        handlers::members::remove_member,

        // --- Finance ---
        handlers::finance::list_expenses,
        handlers::finance::create_expense,
        handlers::finance::get_expense,
        handlers::finance::update_expense,
        handlers::finance::delete_expense,
        handlers::finance::list_payments,
        handlers::finance::record_payment,
        handlers::finance::get_payment,
        handlers::finance::update_payment,
        handlers::finance::delete_payment,
        handlers::finance::get_summary,
        handlers::finance::get_my_costs,
        handlers::finance::get_budget_report,
        handlers::finance::set_budget,
        handlers::finance::delete_budget,

        // --- Inventory ---
        handlers::inventory::list_items,
        handlers::inventory::create_item,
        handlers::inventory::get_overview,
        handlers::inventory::get_item,
        handlers::inventory::update_item,
        handlers::inventory::delete_item,

        // --- Menu ---
        handlers::menu::list_dishes,
        handlers::menu::create_dish,
        handlers::menu::get_weekly,
        handlers::menu::get_dish,
        handlers::menu::update_dish,
        handlers::menu::delete_dish,

        // --- Dashboard ---
        handlers::dashboard::get_dashboard,
        handlers::dashboard::get_report,
        handlers::dashboard::list_activities,

        // --- Notifications ---
        handlers::notifications::list_notifications,
        handlers::notifications::mark_read,
        handlers::notifications::mark_all_read,
    ),
    components(
        schemas(
            // --- Tenancy ---
            models::tenancy::Mess,
            models::tenancy::NewMess,
            models::tenancy::MessPatch,
            models::tenancy::Role,
            models::tenancy::Profile,
            models::tenancy::MemberPatch,
            models::tenancy::ProfileUpdate,
            models::auth::MeResponse,

            // --- Finance ---
            models::finance::Expense,
            models::finance::NewExpense,
            models::finance::ExpensePatch,
            models::finance::MemberPayment,
            models::finance::NewPayment,
            models::finance::PaymentPatch,
            models::finance::CategoryBudget,
            models::finance::BudgetInput,
            models::finance::BudgetStatus,
            models::finance::BudgetLine,
            models::finance::BudgetReport,
            models::finance::FinanceSummary,
            models::finance::MemberCostSummary,

            // --- Inventory ---
            models::inventory::InventoryItem,
            models::inventory::NewInventoryItem,
            models::inventory::InventoryPatch,
            models::inventory::StockLevel,
            models::inventory::CategoryCount,
            models::inventory::InventoryOverview,

            // --- Menu ---
            models::menu::MealCategory,
            models::menu::MenuItem,
            models::menu::NewMenuItem,
            models::menu::MenuPatch,
            models::menu::DayMenu,

            // --- Dashboard ---
            models::activity::Activity,
            models::dashboard::MonthlyTotal,
            models::dashboard::CategoryTotal,
            models::dashboard::MessReport,
            models::dashboard::DashboardStats,

            // --- Notifications ---
            models::notification::NotificationKind,
            models::notification::NotificationCategory,
            models::notification::Notification,
            models::notification::NotificationList,
        )
    ),
    tags(
        (name = "Tenancy", description = "Perfil, onboarding e dados do mess"),
        (name = "Members", description = "Membros e cargos"),
        (name = "Finance", description = "Despesas, pagamentos, cotas e orçamento"),
        (name = "Inventory", description = "Estoque da cozinha"),
        (name = "Menu", description = "Cardápio semanal"),
        (name = "Dashboard", description = "Indicadores, relatórios e log de atividades"),
        (name = "Notifications", description = "Alertas gerados pelas mudanças no mess")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
