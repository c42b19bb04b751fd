// src/handlers/finance.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::tenancy::MessContext,
    models::finance::{
        BudgetInput, BudgetReport, CategoryBudget, Expense, ExpenseFilter, ExpensePatch,
        FinanceSummary, MemberCostSummary, MemberPayment, NewExpense, NewPayment, PaymentFilter,
        PaymentPatch,
    },
};

// =========================================================================
//  DESPESAS
// =========================================================================

#[utoipa::path(
    get,
    path = "/api/expenses",
    tag = "Finance",
    params(ExpenseFilter),
    responses((status = 200, description = "Despesas do mess, mais recentes primeiro", body = Vec<Expense>)),
    security(("api_jwt" = []))
)]
pub async fn list_expenses(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Query(filter): Query<ExpenseFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let expenses = app_state.finance_service.list_expenses(&scope, &filter).await?;
    Ok((StatusCode::OK, Json(expenses)))
}

#[utoipa::path(
    post,
    path = "/api/expenses",
    tag = "Finance",
    request_body = NewExpense,
    responses(
        (status = 201, description = "Despesa lançada", body = Expense),
        (status = 403, description = "Exige gerente"),
        (status = 422, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_expense(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Json(payload): Json<NewExpense>,
) -> Result<impl IntoResponse, ApiError> {
    let expense = app_state.finance_service.create_expense(&scope, payload).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

#[utoipa::path(
    get,
    path = "/api/expenses/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID da despesa")),
    responses(
        (status = 200, description = "Despesa", body = Expense),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_expense(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let expense = app_state.finance_service.get_expense(&scope, id).await?;
    Ok((StatusCode::OK, Json(expense)))
}

#[utoipa::path(
    put,
    path = "/api/expenses/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID da despesa")),
    request_body = ExpensePatch,
    responses(
        (status = 200, description = "Despesa atualizada", body = Expense),
        (status = 400, description = "Valor negativo"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_expense(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpensePatch>,
) -> Result<impl IntoResponse, ApiError> {
    let expense = app_state.finance_service.update_expense(&scope, id, payload).await?;
    Ok((StatusCode::OK, Json(expense)))
}

#[utoipa::path(
    delete,
    path = "/api/expenses/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID da despesa")),
    responses(
        (status = 204, description = "Despesa removida"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_expense(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.finance_service.delete_expense(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
//  PAGAMENTOS
// =========================================================================

#[utoipa::path(
    get,
    path = "/api/payments",
    tag = "Finance",
    params(PaymentFilter),
    responses((status = 200, description = "Pagamentos (membros comuns só veem os seus)", body = Vec<MemberPayment>)),
    security(("api_jwt" = []))
)]
pub async fn list_payments(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Query(filter): Query<PaymentFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = app_state.finance_service.list_payments(&scope, filter).await?;
    Ok((StatusCode::OK, Json(payments)))
}

#[utoipa::path(
    post,
    path = "/api/payments",
    tag = "Finance",
    request_body = NewPayment,
    responses(
        (status = 201, description = "Pagamento registrado", body = MemberPayment),
        (status = 403, description = "Exige gerente, ou membro de outro mess")
    ),
    security(("api_jwt" = []))
)]
pub async fn record_payment(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Json(payload): Json<NewPayment>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = app_state.finance_service.record_payment(&scope, payload).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

#[utoipa::path(
    get,
    path = "/api/payments/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID do pagamento")),
    responses(
        (status = 200, description = "Pagamento", body = MemberPayment),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_payment(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = app_state.finance_service.get_payment(&scope, id).await?;
    Ok((StatusCode::OK, Json(payment)))
}

#[utoipa::path(
    put,
    path = "/api/payments/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID do pagamento")),
    request_body = PaymentPatch,
    responses(
        (status = 200, description = "Pagamento atualizado", body = MemberPayment),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_payment(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = app_state.finance_service.update_payment(&scope, id, payload).await?;
    Ok((StatusCode::OK, Json(payment)))
}

#[utoipa::path(
    delete,
    path = "/api/payments/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID do pagamento")),
    responses(
        (status = 204, description = "Pagamento removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_payment(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.finance_service.delete_payment(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
//  RESUMOS E ORÇAMENTO
// =========================================================================

#[utoipa::path(
    get,
    path = "/api/finance/summary",
    tag = "Finance",
    responses((status = 200, description = "Totais do mess e do mês corrente", body = FinanceSummary)),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
) -> Result<impl IntoResponse, ApiError> {
    let today = Utc::now().date_naive();
    let summary = app_state.finance_service.summary(&scope, today).await?;
    Ok((StatusCode::OK, Json(summary)))
}

#[utoipa::path(
    get,
    path = "/api/finance/me",
    tag = "Finance",
    responses((status = 200, description = "Cota do mês e saldo do membro", body = MemberCostSummary)),
    security(("api_jwt" = []))
)]
pub async fn get_my_costs(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
) -> Result<impl IntoResponse, ApiError> {
    let today = Utc::now().date_naive();
    let costs = app_state.finance_service.member_summary(&scope, today).await?;
    Ok((StatusCode::OK, Json(costs)))
}

#[utoipa::path(
    get,
    path = "/api/budgets",
    tag = "Finance",
    responses((status = 200, description = "Orçamento por categoria vs. gasto do mês", body = BudgetReport)),
    security(("api_jwt" = []))
)]
pub async fn get_budget_report(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
) -> Result<impl IntoResponse, ApiError> {
    let today = Utc::now().date_naive();
    let report = app_state.finance_service.budget_report(&scope, today).await?;
    Ok((StatusCode::OK, Json(report)))
}

#[utoipa::path(
    put,
    path = "/api/budgets/{category}",
    tag = "Finance",
    params(("category" = String, Path, description = "Categoria da despesa")),
    request_body = BudgetInput,
    responses(
        (status = 200, description = "Orçamento gravado", body = CategoryBudget),
        (status = 403, description = "Exige gerente")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_budget(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Path(category): Path<String>,
    Json(payload): Json<BudgetInput>,
) -> Result<impl IntoResponse, ApiError> {
    let budget = app_state.finance_service.set_budget(&scope, &category, payload).await?;
    Ok((StatusCode::OK, Json(budget)))
}

#[utoipa::path(
    delete,
    path = "/api/budgets/{category}",
    tag = "Finance",
    params(("category" = String, Path, description = "Categoria da despesa")),
    responses(
        (status = 204, description = "Orçamento removido"),
        (status = 404, description = "Categoria sem orçamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_budget(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.finance_service.delete_budget(&scope, &category).await?;
    Ok(StatusCode::NO_CONTENT)
}
